/*!
 * Value types shared by the hostwatch sampler and its consumers.
 *
 * Every value here is derived fresh from a single sample call and carries no
 * identity beyond it.
 */

use serde::{Deserialize, Serialize};
use std::fmt;

/// Number of bytes in one megabyte, as used for all byte -> MB conversions.
pub const BYTES_PER_MB: u64 = 1024 * 1024;

/// Number of kilobytes in one megabyte.
pub const KB_PER_MB: u64 = 1024;

/// Convert a byte count to whole megabytes, truncating.
pub fn bytes_to_mb(bytes: u64) -> u64 {
    bytes / BYTES_PER_MB
}

/// Convert a kilobyte count to whole megabytes, truncating.
pub fn kb_to_mb(kb: u64) -> u64 {
    kb / KB_PER_MB
}

/// Round to two decimal places.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

/// `part / total * 100` rounded to two decimals, `None` when `total` is zero.
pub fn percent_of(part: u64, total: u64) -> Option<f64> {
    if total == 0 {
        return None;
    }
    Some(round2(part as f64 / total as f64 * 100.0))
}

/// Capacity of the filesystem the agent runs from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DiskInfo {
    pub total_space_mb: u64,
    pub free_space_mb: u64,
    /// Root path plus OS volume label. Only populated on Windows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub volume_label: Option<String>,
}

impl DiskInfo {
    pub fn new(total_space_mb: u64, free_space_mb: u64) -> Self {
        Self {
            total_space_mb,
            free_space_mb,
            volume_label: None,
        }
    }

    pub fn with_volume_label(mut self, label: impl Into<String>) -> Self {
        self.volume_label = Some(label.into());
        self
    }

    /// Free space in percent, rounded to two decimals.
    pub fn free_percent(&self) -> Option<f64> {
        percent_of(self.free_space_mb, self.total_space_mb)
    }

    /// Used space in percent, derived as `100 - free_percent`.
    pub fn used_percent(&self) -> Option<f64> {
        self.free_percent().map(|free| round2(100.0 - free))
    }
}

impl fmt::Display for DiskInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(label) = &self.volume_label {
            write!(f, "{label} ")?;
        }
        write!(
            f,
            "{} MB free out of {} MB",
            self.free_space_mb, self.total_space_mb
        )
    }
}

/// Physical memory of the host.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct MemoryInfo {
    pub total_memory_mb: u64,
    pub used_memory_mb: u64,
}

impl MemoryInfo {
    pub fn new(total_memory_mb: u64, used_memory_mb: u64) -> Self {
        Self {
            total_memory_mb,
            used_memory_mb,
        }
    }

    /// Used memory in percent, rounded to two decimals.
    pub fn used_percent(&self) -> Option<f64> {
        percent_of(self.used_memory_mb, self.total_memory_mb)
    }

    /// Free memory in percent, derived as `100 - used_percent`.
    pub fn free_percent(&self) -> Option<f64> {
        self.used_percent().map(|used| round2(100.0 - used))
    }
}

impl fmt::Display for MemoryInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "used {} MB out of {} MB",
            self.used_memory_mb, self.total_memory_mb
        )
    }
}
