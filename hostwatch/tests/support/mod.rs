#![allow(dead_code)]

use std::{
    io,
    sync::{
        atomic::{AtomicUsize, Ordering},
        Arc, Mutex,
    },
    time::{Duration, SystemTime},
};

use hostwatch::{
    sampler::{DiskProvider, MemoryProvider, ProcessHandle, ProcessProbe, Providers},
    DiskInfo, HostContext, MemoryInfo, SamplerError, SamplerResult, StopFlag,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Debug,
    Warning,
    Trace,
}

/// Host context that records every emitted line.
#[derive(Default)]
pub struct RecordingContext {
    stop_flag: StopFlag,
    entries: Mutex<Vec<(Level, String)>>,
}

impl RecordingContext {
    pub fn new() -> Arc<Self> {
        Arc::new(Self::default())
    }

    pub fn entries(&self) -> Vec<(Level, String)> {
        self.entries.lock().unwrap().clone()
    }

    pub fn messages(&self, level: Level) -> Vec<String> {
        self.entries()
            .into_iter()
            .filter(|(l, _)| *l == level)
            .map(|(_, message)| message)
            .collect()
    }

    pub fn warnings(&self) -> Vec<String> {
        self.messages(Level::Warning)
    }

    fn push(&self, level: Level, message: &str) {
        self.entries.lock().unwrap().push((level, message.to_string()));
    }
}

impl HostContext for RecordingContext {
    fn stop_flag(&self) -> &StopFlag {
        &self.stop_flag
    }

    fn debug(&self, message: &str) {
        self.push(Level::Debug, message);
    }

    fn warning(&self, message: &str) {
        self.push(Level::Warning, message);
    }

    fn trace(&self, message: &str) {
        self.push(Level::Trace, message);
    }
}

pub struct FakeDisk(pub Result<DiskInfo, String>);

impl DiskProvider for FakeDisk {
    fn disk_info(&self) -> SamplerResult<DiskInfo> {
        self.0.clone().map_err(SamplerError::Disk)
    }
}

pub enum MemoryBehavior {
    Report(MemoryInfo),
    NotInstalled,
    Garbled,
}

/// Memory provider that counts calls.
pub struct FakeMemory {
    behavior: MemoryBehavior,
    calls: Arc<AtomicUsize>,
}

impl FakeMemory {
    pub fn new(behavior: MemoryBehavior) -> Self {
        Self {
            behavior,
            calls: Arc::new(AtomicUsize::new(0)),
        }
    }

    pub fn calls(&self) -> Arc<AtomicUsize> {
        self.calls.clone()
    }
}

impl MemoryProvider for FakeMemory {
    fn name(&self) -> &str {
        "free"
    }

    fn memory_info(&self) -> SamplerResult<MemoryInfo> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        match &self.behavior {
            MemoryBehavior::Report(info) => Ok(*info),
            MemoryBehavior::NotInstalled => Err(SamplerError::UtilityUnavailable {
                program: "free".to_string(),
                source: io::Error::new(io::ErrorKind::NotFound, "No such file or directory"),
            }),
            MemoryBehavior::Garbled => Err(SamplerError::Parse {
                program: "free".to_string(),
                reason: "memory row (line 2) is missing".to_string(),
            }),
        }
    }
}

/// Process probe reporting a fixed processor time for a process started
/// `age` ago, or failing to acquire at all.
pub struct FakeProbe {
    pub acquirable: bool,
    pub age: Duration,
    pub processor_time: Duration,
}

impl FakeProbe {
    pub fn unavailable() -> Self {
        Self {
            acquirable: false,
            age: Duration::ZERO,
            processor_time: Duration::ZERO,
        }
    }

    pub fn busy(age: Duration, processor_time: Duration) -> Self {
        Self {
            acquirable: true,
            age,
            processor_time,
        }
    }
}

impl ProcessProbe for FakeProbe {
    fn acquire(&self) -> SamplerResult<ProcessHandle> {
        if !self.acquirable {
            return Err(SamplerError::Process("access denied".to_string()));
        }
        Ok(ProcessHandle::new(4242, SystemTime::now() - self.age))
    }

    fn processor_time(&self, _handle: &ProcessHandle) -> SamplerResult<Duration> {
        Ok(self.processor_time)
    }
}

pub fn providers(disk: FakeDisk, memory: FakeMemory, process: FakeProbe) -> Providers {
    Providers {
        disk: Box::new(disk),
        memory: Box::new(memory),
        process: Box::new(process),
    }
}

/// Providers reporting plenty of free disk and memory.
pub fn healthy_providers() -> Providers {
    providers(
        FakeDisk(Ok(DiskInfo::new(100_000, 50_000))),
        FakeMemory::new(MemoryBehavior::Report(MemoryInfo::new(16_000, 4_000))),
        FakeProbe::busy(Duration::from_secs(100), Duration::from_secs(25)),
    )
}
