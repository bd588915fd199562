use std::sync::Arc;

use hostwatch_types::MemoryInfo;

use super::{parse_field, system_runner, MemoryProvider};
use crate::error::{SamplerError, SamplerResult};
use crate::sampler::command::{run_utility, CommandRunner};

const PROGRAM: &str = "free";

/// Linux memory provider backed by `free -m`.
#[derive(Clone)]
pub struct FreeMemoryProvider {
    runner: Arc<dyn CommandRunner>,
}

impl Default for FreeMemoryProvider {
    fn default() -> Self {
        Self::new(system_runner())
    }
}

impl FreeMemoryProvider {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl MemoryProvider for FreeMemoryProvider {
    fn name(&self) -> &str {
        PROGRAM
    }

    fn memory_info(&self) -> SamplerResult<MemoryInfo> {
        let stdout = run_utility(self.runner.as_ref(), PROGRAM, &["-m"])?;
        parse_free_output(&stdout)
    }
}

/// Parse `free -m` output.
///
/// The second line is the memory row; field 1 is total MB, field 2 is used MB.
pub fn parse_free_output(output: &str) -> SamplerResult<MemoryInfo> {
    let row = output
        .lines()
        .nth(1)
        .ok_or_else(|| SamplerError::parse(PROGRAM, "memory row (line 2) is missing"))?;

    let fields: Vec<&str> = row.split_whitespace().collect();
    if fields.len() < 3 {
        return Err(SamplerError::parse(
            PROGRAM,
            format!("memory row has {} fields, expected at least 3", fields.len()),
        ));
    }

    let total = parse_field(PROGRAM, "total", fields[1])?;
    let used = parse_field(PROGRAM, "used", fields[2])?;

    Ok(MemoryInfo::new(total, used))
}
