use std::sync::Arc;

use hostwatch_types::{kb_to_mb, MemoryInfo};

use super::{parse_field, system_runner, MemoryProvider};
use crate::error::{SamplerError, SamplerResult};
use crate::sampler::command::{run_utility, CommandRunner};

const PROGRAM: &str = "wmic";
const ARGS: &[&str] = &[
    "OS",
    "get",
    "FreePhysicalMemory,TotalVisibleMemorySize",
    "/Value",
];

/// Windows memory provider backed by the WMI command line tool.
#[derive(Clone)]
pub struct WmicMemoryProvider {
    runner: Arc<dyn CommandRunner>,
}

impl Default for WmicMemoryProvider {
    fn default() -> Self {
        Self::new(system_runner())
    }
}

impl WmicMemoryProvider {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl MemoryProvider for WmicMemoryProvider {
    fn name(&self) -> &str {
        PROGRAM
    }

    fn memory_info(&self) -> SamplerResult<MemoryInfo> {
        let stdout = run_utility(self.runner.as_ref(), PROGRAM, ARGS)?;
        parse_wmic_output(&stdout)
    }
}

/// Parse `wmic OS get FreePhysicalMemory,TotalVisibleMemorySize /Value`.
///
/// Blank lines are dropped; the first remaining line must be
/// `FreePhysicalMemory=<kb>` and the second `TotalVisibleMemorySize=<kb>`.
pub fn parse_wmic_output(output: &str) -> SamplerResult<MemoryInfo> {
    let lines: Vec<&str> = output
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .collect();

    let free_kb = value_at(&lines, 0, "FreePhysicalMemory")?;
    let total_kb = value_at(&lines, 1, "TotalVisibleMemorySize")?;

    Ok(MemoryInfo::new(
        kb_to_mb(total_kb),
        kb_to_mb(total_kb.saturating_sub(free_kb)),
    ))
}

fn value_at(lines: &[&str], index: usize, key: &str) -> SamplerResult<u64> {
    let line = lines
        .get(index)
        .ok_or_else(|| SamplerError::parse(PROGRAM, format!("{key} (line {index}) is missing")))?;

    match line.split_once('=') {
        Some((found, value)) if found.trim() == key => parse_field(PROGRAM, key, value),
        _ => Err(SamplerError::parse(
            PROGRAM,
            format!("expected {key}=<value> at line {index}, got '{line}'"),
        )),
    }
}
