//! Platform memory providers.
//!
//! Each provider shells out to the platform's memory reporting tool and parses
//! its text output from fixed line/field positions. The parsers are plain
//! functions so their layout contract can be tested against captured output.

mod free;
mod vm_stat;
mod wmic;

use std::sync::Arc;

use hostwatch_types::MemoryInfo;

use super::command::{CommandRunner, SystemCommandRunner};
use crate::error::{SamplerError, SamplerResult};

pub use free::{parse_free_output, FreeMemoryProvider};
pub use vm_stat::{parse_vm_stat_output, VmStatMemoryProvider};
pub use wmic::{parse_wmic_output, WmicMemoryProvider};

/// Source of the host's physical memory figures.
pub trait MemoryProvider: Send + Sync {
    /// Short name used in log lines.
    fn name(&self) -> &str;

    fn memory_info(&self) -> SamplerResult<MemoryInfo>;
}

/// Selected on hosts without a supported memory tool.
#[derive(Debug, Clone)]
pub struct UnsupportedMemoryProvider {
    os: String,
}

impl UnsupportedMemoryProvider {
    pub fn new(os: impl Into<String>) -> Self {
        Self { os: os.into() }
    }
}

impl MemoryProvider for UnsupportedMemoryProvider {
    fn name(&self) -> &str {
        "unsupported"
    }

    fn memory_info(&self) -> SamplerResult<MemoryInfo> {
        Err(SamplerError::Unsupported(format!(
            "memory sampling is not supported on {}",
            self.os
        )))
    }
}

pub(crate) fn system_runner() -> Arc<dyn CommandRunner> {
    Arc::new(SystemCommandRunner)
}

/// Parse an unsigned integer field, reporting drift as a parse error.
pub(crate) fn parse_field(program: &str, what: &str, raw: &str) -> SamplerResult<u64> {
    raw.trim()
        .parse::<u64>()
        .map_err(|e| SamplerError::parse(program, format!("{what} '{raw}' is not a number: {e}")))
}
