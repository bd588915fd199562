use std::time::{Duration, SystemTime, UNIX_EPOCH};

use sysinfo::{Pid, ProcessRefreshKind, ProcessesToUpdate, System};
use tracing::debug;

use crate::error::{SamplerError, SamplerResult};

/// Reference to the current process, acquired once at setup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProcessHandle {
    pid: u32,
    started_at: SystemTime,
}

impl ProcessHandle {
    pub fn new(pid: u32, started_at: SystemTime) -> Self {
        Self { pid, started_at }
    }

    pub fn pid(&self) -> u32 {
        self.pid
    }

    pub fn started_at(&self) -> SystemTime {
        self.started_at
    }

    /// Wall clock time since the process started, zero if the clock went backwards.
    pub fn elapsed(&self) -> Duration {
        SystemTime::now()
            .duration_since(self.started_at)
            .unwrap_or_default()
    }
}

/// Process accounting used for the CPU estimate.
pub trait ProcessProbe: Send + Sync {
    /// Acquire a handle to the current process.
    fn acquire(&self) -> SamplerResult<ProcessHandle>;

    /// Total processor time consumed by the process since it started.
    fn processor_time(&self, handle: &ProcessHandle) -> SamplerResult<Duration>;
}

/// Cumulative CPU usage since process start, in percent.
///
/// This is an average over the whole process lifetime, not the current load.
/// Returns `None` when no wall clock time has elapsed yet.
pub fn cpu_usage_percent(processor_time: Duration, elapsed: Duration) -> Option<f64> {
    let elapsed_ms = elapsed.as_secs_f64() * 1000.0;
    if elapsed_ms <= 0.0 {
        return None;
    }
    Some(processor_time.as_secs_f64() * 1000.0 / elapsed_ms * 100.0)
}

/// Reads process accounting through `sysinfo`.
#[derive(Debug, Default, Clone, Copy)]
pub struct SysinfoProcessProbe;

impl SysinfoProcessProbe {
    fn with_process<T>(
        pid: Pid,
        f: impl FnOnce(&sysinfo::Process) -> T,
    ) -> SamplerResult<T> {
        let mut system = System::new();
        system.refresh_processes_specifics(
            ProcessesToUpdate::Some(&[pid]),
            true,
            ProcessRefreshKind::nothing().with_cpu(),
        );

        system
            .process(pid)
            .map(f)
            .ok_or_else(|| SamplerError::Process(format!("process {pid} not found")))
    }
}

impl ProcessProbe for SysinfoProcessProbe {
    fn acquire(&self) -> SamplerResult<ProcessHandle> {
        let pid = sysinfo::get_current_pid()
            .map_err(|e| SamplerError::Process(format!("failed to get current PID: {e}")))?;

        let start_time = Self::with_process(pid, |process| process.start_time())?;
        debug!("Acquired process handle for PID {} started at {}", pid, start_time);

        Ok(ProcessHandle::new(
            pid.as_u32(),
            UNIX_EPOCH + Duration::from_secs(start_time),
        ))
    }

    fn processor_time(&self, handle: &ProcessHandle) -> SamplerResult<Duration> {
        let pid = Pid::from_u32(handle.pid());
        let cpu_ms = Self::with_process(pid, |process| process.accumulated_cpu_time())?;
        Ok(Duration::from_millis(cpu_ms))
    }
}
