//! Host resource sampling for a running build agent.
//!
//! [`ResourceMonitor`] samples disk, memory and CPU figures and reports them
//! through a [`HostContext`]: a routine diagnostic line on a short interval and
//! low-resource warnings on a longer one.

pub mod context;
pub mod error;
pub mod init_telemetry;
pub mod monitor;
pub mod platform;
pub mod sampler;
pub mod settings;
pub mod stop_flag;

pub use context::{HostContext, TracingContext};
pub use error::{SamplerError, SamplerResult};
pub use hostwatch_types::{DiskInfo, MemoryInfo};
pub use monitor::{ResourceMonitor, ThresholdOutcome};
pub use settings::Settings;
pub use stop_flag::StopFlag;
