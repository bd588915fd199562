use std::sync::Arc;

use hostwatch_types::{bytes_to_mb, MemoryInfo};

use super::{parse_field, system_runner, MemoryProvider};
use crate::error::{SamplerError, SamplerResult};
use crate::sampler::command::{run_utility, CommandRunner};

const PROGRAM: &str = "vm_stat";

const PAGE_SIZE_MARKER: &str = "page size of";

// (line index, expected label) of every page counter that is read
const FREE: (usize, &str) = (1, "Pages free");
const ACTIVE: (usize, &str) = (2, "Pages active");
const INACTIVE: (usize, &str) = (3, "Pages inactive");
const SPECULATIVE: (usize, &str) = (4, "Pages speculative");
const WIRED: (usize, &str) = (6, "Pages wired down");
const OCCUPIED: (usize, &str) = (16, "Pages occupied by compressor");

/// macOS memory provider backed by `vm_stat`.
#[derive(Clone)]
pub struct VmStatMemoryProvider {
    runner: Arc<dyn CommandRunner>,
}

impl Default for VmStatMemoryProvider {
    fn default() -> Self {
        Self::new(system_runner())
    }
}

impl VmStatMemoryProvider {
    pub fn new(runner: Arc<dyn CommandRunner>) -> Self {
        Self { runner }
    }
}

impl MemoryProvider for VmStatMemoryProvider {
    fn name(&self) -> &str {
        PROGRAM
    }

    fn memory_info(&self) -> SamplerResult<MemoryInfo> {
        let stdout = run_utility(self.runner.as_ref(), PROGRAM, &[])?;
        parse_vm_stat_output(&stdout)
    }
}

/// Parse `vm_stat` output.
///
/// The page size comes from the header line. Free memory is
/// `free + inactive` pages, used memory is
/// `active + speculative + wired + occupied by compressor` pages.
pub fn parse_vm_stat_output(output: &str) -> SamplerResult<MemoryInfo> {
    let lines: Vec<&str> = output.lines().collect();

    let header = lines
        .first()
        .ok_or_else(|| SamplerError::parse(PROGRAM, "output is empty"))?;
    let page_size = parse_page_size(header)?;

    let free = sum_pages(&lines, &[FREE, INACTIVE])?;
    let used = sum_pages(&lines, &[ACTIVE, SPECULATIVE, WIRED, OCCUPIED])?;

    let free_bytes = free.checked_mul(page_size).ok_or_else(overflow)?;
    let used_bytes = used.checked_mul(page_size).ok_or_else(overflow)?;
    let total_bytes = free_bytes.checked_add(used_bytes).ok_or_else(overflow)?;

    Ok(MemoryInfo::new(
        bytes_to_mb(total_bytes),
        bytes_to_mb(used_bytes),
    ))
}

fn overflow() -> SamplerError {
    SamplerError::parse(PROGRAM, "page counts overflow")
}

fn sum_pages(lines: &[&str], counters: &[(usize, &str)]) -> SamplerResult<u64> {
    counters.iter().try_fold(0u64, |sum, &counter| {
        sum.checked_add(pages_at(lines, counter)?).ok_or_else(overflow)
    })
}

fn parse_page_size(header: &str) -> SamplerResult<u64> {
    let raw = header
        .split(PAGE_SIZE_MARKER)
        .nth(1)
        .and_then(|rest| rest.split_whitespace().next())
        .ok_or_else(|| {
            SamplerError::parse(PROGRAM, format!("no page size in header '{header}'"))
        })?;
    parse_field(PROGRAM, "page size", raw)
}

fn pages_at(lines: &[&str], (index, label): (usize, &str)) -> SamplerResult<u64> {
    let line = lines
        .get(index)
        .ok_or_else(|| SamplerError::parse(PROGRAM, format!("line {index} ({label}) is missing")))?;

    if !line.trim_start().starts_with(label) {
        return Err(SamplerError::parse(
            PROGRAM,
            format!("expected '{label}' at line {index}, got '{line}'"),
        ));
    }

    let raw = line
        .split_whitespace()
        .last()
        .map(|value| value.trim_end_matches('.'))
        .unwrap_or_default();
    parse_field(PROGRAM, label, raw)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sampler::command::CommandOutput;
    use std::io;

    const VM_STAT_OUTPUT: &str = r#"Mach Virtual Memory Statistics: (page size of 16384 bytes)
Pages free:                               13516.
Pages active:                            275404.
Pages inactive:                          271836.
Pages speculative:                         2483.
Pages throttled:                              0.
Pages wired down:                        153092.
Pages purgeable:                           6009.
"Translation faults":                 812745513.
Pages copy-on-write:                   29026626.
Pages zero filled:                    418655207.
Pages reactivated:                     13364567.
Pages purged:                           6395116.
File-backed pages:                       158476.
Anonymous pages:                         391247.
Pages stored in compressor:             1022867.
Pages occupied by compressor:            298041.
Decompressions:                        30227735.
Compressions:                          41556614.
Pageins:                               20484421.
Pageouts:                                169780.
Swapins:                                1076548.
Swapouts:                               1271740.
"#;

    struct Canned;

    impl CommandRunner for Canned {
        fn run(&self, program: &str, args: &[&str]) -> io::Result<CommandOutput> {
            assert_eq!(program, "vm_stat");
            assert!(args.is_empty());
            Ok(CommandOutput::success(VM_STAT_OUTPUT))
        }
    }

    #[test]
    fn test_parse_vm_stat_output() {
        let info = parse_vm_stat_output(VM_STAT_OUTPUT).unwrap();

        let page_size = 16384u64;
        let free_bytes = (13516 + 271836) * page_size;
        let used_bytes = (275404 + 2483 + 153092 + 298041) * page_size;

        assert_eq!(info.used_memory_mb, used_bytes / 1_048_576);
        assert_eq!(info.total_memory_mb, (free_bytes + used_bytes) / 1_048_576);
        assert_eq!(info, MemoryInfo::new(15849, 11390));
    }

    #[test]
    fn test_intel_page_size() {
        let output = VM_STAT_OUTPUT.replace("page size of 16384", "page size of 4096");
        let info = parse_vm_stat_output(&output).unwrap();
        assert_eq!(info, MemoryInfo::new(3962, 2847));
    }

    #[test]
    fn test_missing_page_size_is_parse_error() {
        let output = VM_STAT_OUTPUT.replace("(page size of 16384 bytes)", "");
        let err = parse_vm_stat_output(&output).unwrap_err();
        assert!(err.to_string().contains("no page size"));
    }

    #[test]
    fn test_shifted_layout_is_parse_error() {
        // a counter inserted before "Pages wired down" moves every later line
        let output = VM_STAT_OUTPUT.replace(
            "Pages throttled:",
            "Pages new counter:                            1.\nPages throttled:",
        );
        let err = parse_vm_stat_output(&output).unwrap_err();
        assert!(err.to_string().contains("expected 'Pages wired down' at line 6"));
    }

    #[test]
    fn test_truncated_output_is_parse_error() {
        let truncated: String = VM_STAT_OUTPUT.lines().take(10).collect::<Vec<_>>().join("\n");
        let err = parse_vm_stat_output(&truncated).unwrap_err();
        assert!(err.to_string().contains("line 16"));
    }

    #[test]
    fn test_huge_page_counts_are_parse_error() {
        let output = VM_STAT_OUTPUT.replace(
            "Pages free:                               13516.",
            "Pages free:                               1152921504606846976.",
        );
        let err = parse_vm_stat_output(&output).unwrap_err();
        assert!(matches!(err, SamplerError::Parse { .. }));
        assert!(err.to_string().contains("page counts overflow"));

        let output = VM_STAT_OUTPUT.replace(
            "Pages active:                            275404.",
            "Pages active:                            18446744073709551615.",
        );
        let err = parse_vm_stat_output(&output).unwrap_err();
        assert!(err.to_string().contains("page counts overflow"));
    }

    #[test]
    fn test_empty_output_is_parse_error() {
        assert!(matches!(
            parse_vm_stat_output(""),
            Err(SamplerError::Parse { .. })
        ));
    }

    #[test]
    fn test_provider_uses_runner() {
        let provider = VmStatMemoryProvider::new(Arc::new(Canned));
        assert_eq!(provider.memory_info().unwrap(), MemoryInfo::new(15849, 11390));
    }
}
