use crate::stop_flag::StopFlag;

/// Capabilities the hosting agent lends to the monitor.
///
/// The monitor never owns the context; it holds a shared reference that can be
/// swapped with [`ResourceMonitor::set_context`](crate::ResourceMonitor::set_context).
pub trait HostContext: Send + Sync {
    /// Cancellation signal observed by both monitor loops.
    fn stop_flag(&self) -> &StopFlag;

    /// Routine diagnostics.
    fn debug(&self, message: &str);

    /// User visible alerts.
    fn warning(&self, message: &str);

    /// Lowest severity, for expected conditions that must not alarm users.
    fn trace(&self, message: &str);
}

/// Forwards every sink to `tracing` under the `hostwatch` target.
#[derive(Debug, Clone, Default)]
pub struct TracingContext {
    stop_flag: StopFlag,
}

impl TracingContext {
    pub fn new(stop_flag: StopFlag) -> Self {
        Self { stop_flag }
    }
}

impl HostContext for TracingContext {
    fn stop_flag(&self) -> &StopFlag {
        &self.stop_flag
    }

    fn debug(&self, message: &str) {
        tracing::debug!(target: "hostwatch", "{}", message);
    }

    fn warning(&self, message: &str) {
        tracing::warn!(target: "hostwatch", "{}", message);
    }

    fn trace(&self, message: &str) {
        tracing::trace!(target: "hostwatch", "{}", message);
    }
}
