//! Resource monitor: lifecycle, summaries and the two polling loops.

mod loops;
mod thresholds;

use std::sync::Arc;

use tracing::{debug, info};

use hostwatch_types::{DiskInfo, MemoryInfo};

use crate::context::HostContext;
use crate::error::SamplerResult;
use crate::sampler::{cpu_usage_percent, ProcessHandle, Providers};
use crate::settings::Settings;

pub use thresholds::ThresholdOutcome;

pub struct ResourceMonitor {
    context: Arc<dyn HostContext>,
    settings: Settings,
    providers: Providers,
    process: Option<ProcessHandle>,
}

impl ResourceMonitor {
    /// Bind `context` and acquire the current process handle using the
    /// providers of the host platform.
    pub fn setup(context: Arc<dyn HostContext>, settings: Settings) -> Self {
        Self::with_providers(context, settings, Providers::detect())
    }

    /// Like [`setup`](Self::setup) with explicit measurement providers.
    ///
    /// If the process handle cannot be acquired, CPU reporting stays
    /// unavailable for the lifetime of the monitor.
    pub fn with_providers(
        context: Arc<dyn HostContext>,
        settings: Settings,
        providers: Providers,
    ) -> Self {
        let process = match providers.process.acquire() {
            Ok(handle) => {
                debug!("Resource monitor bound to process {}", handle.pid());
                Some(handle)
            }
            Err(e) => {
                context.warning(&format!(
                    "Unable to get a handle to the agent process, CPU usage will not be reported: {e}"
                ));
                None
            }
        };

        info!(
            "Resource monitor set up (memory provider: {})",
            providers.memory.name()
        );

        Self {
            context,
            settings,
            providers,
            process,
        }
    }

    /// Replace the bound context. The process handle is kept.
    pub fn set_context(&mut self, context: Arc<dyn HostContext>) {
        self.context = context;
    }

    pub fn context(&self) -> &Arc<dyn HostContext> {
        &self.context
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    pub fn has_process_handle(&self) -> bool {
        self.process.is_some()
    }

    /// Release the process handle. Safe to call repeatedly.
    pub fn dispose(&mut self) {
        if let Some(handle) = self.process.take() {
            debug!("Released handle of process {}", handle.pid());
        }
    }

    /// Fresh disk figures for the filesystem the agent runs from.
    pub fn sample_disk(&self) -> SamplerResult<DiskInfo> {
        self.providers.disk.disk_info()
    }

    /// Fresh physical memory figures.
    pub fn sample_memory(&self) -> SamplerResult<MemoryInfo> {
        self.providers.memory.memory_info()
    }

    pub fn disk_info_string(&self) -> String {
        match self.sample_disk() {
            Ok(disk) => disk.to_string(),
            Err(e) => format!("Unable to get disk info: {e}"),
        }
    }

    pub fn memory_info_string(&self) -> String {
        match self.sample_memory() {
            Ok(memory) => memory.to_string(),
            Err(e) => format!("Unable to get memory info: {e}"),
        }
    }

    pub fn cpu_info_string(&self) -> String {
        let Some(handle) = &self.process else {
            return "CPU usage unavailable".to_string();
        };

        match self.providers.process.processor_time(handle) {
            Ok(processor_time) => match cpu_usage_percent(processor_time, handle.elapsed()) {
                Some(usage) => format!("{usage:.2}% average since agent start"),
                None => "CPU usage unavailable".to_string(),
            },
            Err(e) => format!("Unable to get CPU info: {e}"),
        }
    }

    /// One line combining the disk, memory and CPU summaries.
    pub fn diagnostic_line(&self) -> String {
        format!(
            "Agent running environment resource - Disk: {} | Memory: {} | CPU: {}",
            self.disk_info_string(),
            self.memory_info_string(),
            self.cpu_info_string()
        )
    }
}

impl Drop for ResourceMonitor {
    fn drop(&mut self) {
        self.dispose();
    }
}
