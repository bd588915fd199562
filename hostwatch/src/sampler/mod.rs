//! Resource sampling: disk capacity, physical memory and process CPU time.

pub mod command;
pub mod cpu;
pub mod disk;
pub mod memory;

pub use command::{CommandOutput, CommandRunner, SystemCommandRunner};
pub use cpu::{cpu_usage_percent, ProcessHandle, ProcessProbe, SysinfoProcessProbe};
pub use disk::{DiskProvider, SystemDiskProvider};
pub use memory::{
    FreeMemoryProvider, MemoryProvider, UnsupportedMemoryProvider, VmStatMemoryProvider,
    WmicMemoryProvider,
};

use crate::platform::Platform;

/// The set of measurement backends a monitor samples from.
pub struct Providers {
    pub disk: Box<dyn DiskProvider>,
    pub memory: Box<dyn MemoryProvider>,
    pub process: Box<dyn ProcessProbe>,
}

impl Providers {
    /// Production providers for the host platform.
    pub fn detect() -> Self {
        Self::for_platform(Platform::detect())
    }

    pub fn for_platform(platform: Platform) -> Self {
        let memory: Box<dyn MemoryProvider> = match platform {
            Platform::Windows => Box::new(WmicMemoryProvider::default()),
            Platform::Linux => Box::new(FreeMemoryProvider::default()),
            Platform::MacOs => Box::new(VmStatMemoryProvider::default()),
            Platform::Other(os) => Box::new(UnsupportedMemoryProvider::new(os)),
        };

        Self {
            disk: Box::new(SystemDiskProvider::new()),
            memory,
            process: Box::new(SysinfoProcessProbe),
        }
    }
}
