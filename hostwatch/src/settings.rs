use std::time::Duration;

use config::{Config, ConfigError, Environment};
use serde::Deserialize;

/// Diagnostic loop interval.
pub const DIAGNOSTIC_INTERVAL_MS: u64 = 5_000;
/// Threshold warning loop interval.
pub const WARNING_INTERVAL_MS: u64 = 10_000;
/// Shortest interval a builder accepts.
const MIN_INTERVAL_MS: u64 = 1;
/// Warn when free disk space is at or below this percentage.
pub const DISK_FREE_THRESHOLD_PERCENT: f64 = 5.0;
/// Warn when free memory is at or below this percentage.
pub const MEMORY_FREE_THRESHOLD_PERCENT: f64 = 5.0;

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[allow(unused)]
#[readonly::make]
pub struct Settings {
    pub diagnostic_interval_ms: u64,
    pub warning_interval_ms: u64,
    pub disk_free_threshold_percent: f64,
    pub memory_free_threshold_percent: f64,
}

impl Default for Settings {
    fn default() -> Self {
        Settings {
            diagnostic_interval_ms: DIAGNOSTIC_INTERVAL_MS,
            warning_interval_ms: WARNING_INTERVAL_MS,
            disk_free_threshold_percent: DISK_FREE_THRESHOLD_PERCENT,
            memory_free_threshold_percent: MEMORY_FREE_THRESHOLD_PERCENT,
        }
    }
}

impl Settings {
    pub fn get_environment() -> Environment {
        Environment::default()
            .prefix("HOSTWATCH")
            .prefix_separator("__")
            .separator("__")
            .try_parsing(true)
    }

    /// Defaults overridden by `HOSTWATCH__*` environment variables.
    ///
    /// Only the runner binary reads the environment; the library always uses
    /// whatever `Settings` it is handed.
    pub fn new() -> Result<Self, ConfigError> {
        Self::from_environment(Self::get_environment())
    }

    pub(crate) fn from_environment(environment: Environment) -> Result<Self, ConfigError> {
        let s = Config::builder()
            .set_default("diagnostic_interval_ms", DIAGNOSTIC_INTERVAL_MS)?
            .set_default("warning_interval_ms", WARNING_INTERVAL_MS)?
            .set_default("disk_free_threshold_percent", DISK_FREE_THRESHOLD_PERCENT)?
            .set_default(
                "memory_free_threshold_percent",
                MEMORY_FREE_THRESHOLD_PERCENT,
            )?
            .add_source(environment)
            .build()?;

        let settings: Settings = s.try_deserialize()?;
        if settings.diagnostic_interval_ms == 0 || settings.warning_interval_ms == 0 {
            return Err(ConfigError::Message(
                "monitor intervals must be greater than zero".into(),
            ));
        }
        Ok(settings)
    }

    /// Override both loop intervals. Values are clamped to at least 1 ms.
    pub fn with_intervals(mut self, diagnostic: Duration, warning: Duration) -> Self {
        self.diagnostic_interval_ms = interval_ms(diagnostic);
        self.warning_interval_ms = interval_ms(warning);
        self
    }

    pub fn with_thresholds(mut self, disk_free_percent: f64, memory_free_percent: f64) -> Self {
        self.disk_free_threshold_percent = disk_free_percent;
        self.memory_free_threshold_percent = memory_free_percent;
        self
    }

    pub fn diagnostic_interval(&self) -> Duration {
        Duration::from_millis(self.diagnostic_interval_ms)
    }

    pub fn warning_interval(&self) -> Duration {
        Duration::from_millis(self.warning_interval_ms)
    }
}

fn interval_ms(interval: Duration) -> u64 {
    u64::try_from(interval.as_millis())
        .unwrap_or(u64::MAX)
        .max(MIN_INTERVAL_MS)
}
