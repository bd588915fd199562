use super::ResourceMonitor;

/// Result of one threshold check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThresholdOutcome {
    /// Free capacity is above the threshold.
    Healthy,
    /// A low-resource warning was emitted.
    Warned,
    /// Figures were unavailable; a warning saying so was emitted.
    Degraded,
    /// The helper program is missing; only a trace line was emitted.
    Skipped,
}

const UNKNOWN_VOLUME: &str = "the agent volume";

impl ResourceMonitor {
    /// Warn when free disk space is at or below the configured threshold.
    pub fn check_disk_utilization(&self) -> ThresholdOutcome {
        let threshold = self.settings.disk_free_threshold_percent;

        let disk = match self.sample_disk() {
            Ok(disk) => disk,
            Err(e) => {
                self.context
                    .warning(&format!("Unable to get disk info: {e}"));
                return ThresholdOutcome::Degraded;
            }
        };

        let (Some(free_pct), Some(used_pct)) = (disk.free_percent(), disk.used_percent()) else {
            self.context
                .warning("Unable to get disk info: reported total disk space is 0 MB");
            return ThresholdOutcome::Degraded;
        };

        if free_pct <= threshold {
            let volume = disk.volume_label.as_deref().unwrap_or(UNKNOWN_VOLUME);
            self.context.warning(&format!(
                "Free disk space on {volume} is at or below {threshold}%; currently used: {used_pct:.2}%"
            ));
            return ThresholdOutcome::Warned;
        }

        ThresholdOutcome::Healthy
    }

    /// Warn when free memory is at or below the configured threshold.
    ///
    /// A missing memory helper program is only traced, on every call.
    pub fn check_memory_utilization(&self) -> ThresholdOutcome {
        let threshold = self.settings.memory_free_threshold_percent;

        let memory = match self.sample_memory() {
            Ok(memory) => memory,
            Err(e) if e.is_utility_unavailable() => {
                self.context.trace(&format!(
                    "Memory utility '{}' is not available, skipping free memory check: {e}",
                    self.providers.memory.name()
                ));
                return ThresholdOutcome::Skipped;
            }
            Err(e) => {
                self.context
                    .warning(&format!("Unable to get memory info: {e}"));
                return ThresholdOutcome::Degraded;
            }
        };

        let (Some(used_pct), Some(free_pct)) = (memory.used_percent(), memory.free_percent())
        else {
            self.context
                .warning("Unable to get memory info: reported total memory is 0 MB");
            return ThresholdOutcome::Degraded;
        };

        if free_pct <= threshold {
            self.context.warning(&format!(
                "Free memory is at or below {threshold}%; currently used: {used_pct:.2}%"
            ));
            return ThresholdOutcome::Warned;
        }

        ThresholdOutcome::Healthy
    }
}
