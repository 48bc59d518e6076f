use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tracing::debug;

use crate::error::MeasurementError;

/// Memory counters from a meminfo file, in bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MemInfo {
    pub total: u64,
    pub free: u64,
    pub cached: u64,
    pub buffers: u64,
    /// The kernel's own estimate, absent on old kernels.
    pub kernel_available: Option<u64>,
}

impl MemInfo {
    /// Free memory plus what the page cache and buffers can give back.
    pub fn available(&self) -> u64 {
        self.free
            .saturating_add(self.cached)
            .saturating_add(self.buffers)
    }

    /// Like [`MemInfo::available`], but prefers `MemAvailable` when
    /// `kernel_estimate` is set and the kernel reports it.
    pub fn available_with(&self, kernel_estimate: bool) -> u64 {
        match (kernel_estimate, self.kernel_available) {
            (true, Some(available)) => available,
            _ => self.available(),
        }
    }
}

pub fn read_meminfo(path: &Path) -> Result<MemInfo, MeasurementError> {
    let content = fs::read_to_string(path).map_err(|source| MeasurementError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    parse_meminfo(&content, path)
}

/// Parse meminfo content. `source` only names the file in errors.
pub fn parse_meminfo(content: &str, source: &Path) -> Result<MemInfo, MeasurementError> {
    let counters: HashMap<String, (u64, &str)> = content
        .lines()
        .filter_map(parse_meminfo_line)
        .map(|(key, value, unit)| (key.to_ascii_lowercase(), (value, unit)))
        .collect();
    debug!("parsed {} counters from {}", counters.len(), source.display());

    let counter = |name: &'static str| -> Result<Option<u64>, MeasurementError> {
        match counters.get(&name.to_ascii_lowercase()) {
            None => Ok(None),
            Some(&(value, unit)) => {
                let multiplier = unit_multiplier(unit).ok_or_else(|| {
                    MeasurementError::UnsupportedUnit {
                        path: source.to_path_buf(),
                        counter: name.to_string(),
                        unit: unit.to_string(),
                    }
                })?;
                Ok(Some(value.saturating_mul(multiplier)))
            }
        }
    };
    let required = |name: &'static str| -> Result<u64, MeasurementError> {
        counter(name)?.ok_or_else(|| MeasurementError::MissingCounter {
            path: source.to_path_buf(),
            counter: name,
        })
    };

    let info = MemInfo {
        total: required("MemTotal")?,
        free: required("MemFree")?,
        cached: required("Cached")?,
        buffers: required("Buffers")?,
        kernel_available: counter("MemAvailable")?,
    };
    if info.total == 0 {
        return Err(MeasurementError::ZeroTotal {
            path: source.to_path_buf(),
        });
    }
    Ok(info)
}

/// Split `Key:   value [unit]`. Lines of any other shape are skipped.
fn parse_meminfo_line(line: &str) -> Option<(&str, u64, &str)> {
    let (key, rest) = line.split_once(':')?;
    let key = key.trim();
    if key.is_empty()
        || !key
            .chars()
            .all(|c| c.is_ascii_alphanumeric() || matches!(c, '_' | '(' | ')'))
    {
        return None;
    }

    let mut fields = rest.split_whitespace();
    let value = fields.next()?.parse::<u64>().ok()?;
    let unit = fields.next().unwrap_or("");
    if fields.next().is_some() {
        return None;
    }
    Some((key, value, unit))
}

fn unit_multiplier(unit: &str) -> Option<u64> {
    match unit {
        "" => Some(1),
        u if u.eq_ignore_ascii_case("kb") => Some(1024),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SAMPLE: &str = "\
MemTotal:       16384000 kB
MemFree:         1024000 kB
MemAvailable:    9000000 kB
Buffers:          512000 kB
Cached:          2048000 kB
SwapCached:            0 kB
Active(anon):    4000000 kB
HugePages_Total:       0
Hugepagesize:       2048 kB
";

    fn src() -> &'static Path {
        Path::new("/proc/meminfo")
    }

    #[test]
    fn test_parse_meminfo_converts_kb_to_bytes() {
        let info = parse_meminfo(SAMPLE, src()).unwrap();
        assert_eq!(info.total, 16384000 * 1024);
        assert_eq!(info.free, 1024000 * 1024);
        assert_eq!(info.cached, 2048000 * 1024);
        assert_eq!(info.buffers, 512000 * 1024);
        assert_eq!(info.kernel_available, Some(9000000 * 1024));
    }

    #[test]
    fn test_available_counts_cache_and_buffers() {
        let info = parse_meminfo(SAMPLE, src()).unwrap();
        assert_eq!(info.available(), (1024000 + 2048000 + 512000) * 1024);
        assert_eq!(info.available_with(false), info.available());
        assert_eq!(info.available_with(true), 9000000 * 1024);
    }

    #[test]
    fn test_kernel_estimate_falls_back_when_absent() {
        let content = "MemTotal: 1000 kB\nMemFree: 100 kB\nBuffers: 10 kB\nCached: 50 kB\n";
        let info = parse_meminfo(content, src()).unwrap();
        assert_eq!(info.kernel_available, None);
        assert_eq!(info.available_with(true), 160 * 1024);
    }

    #[test]
    fn test_missing_counter() {
        let content = "MemTotal: 1000 kB\nMemFree: 100 kB\nCached: 50 kB\n";
        let err = parse_meminfo(content, src()).unwrap_err();
        assert!(matches!(err, MeasurementError::MissingCounter { counter: "Buffers", .. }));
    }

    #[test]
    fn test_unsupported_unit() {
        let content = "MemTotal: 1000 MB\nMemFree: 100 kB\nBuffers: 10 kB\nCached: 50 kB\n";
        let err = parse_meminfo(content, src()).unwrap_err();
        assert!(matches!(err, MeasurementError::UnsupportedUnit { .. }));
    }

    #[test]
    fn test_zero_total() {
        let content = "MemTotal: 0 kB\nMemFree: 0 kB\nBuffers: 0 kB\nCached: 0 kB\n";
        assert!(matches!(
            parse_meminfo(content, src()),
            Err(MeasurementError::ZeroTotal { .. })
        ));
    }

    #[test]
    fn test_parse_meminfo_line() {
        assert_eq!(parse_meminfo_line("MemTotal:  42 kB"), Some(("MemTotal", 42, "kB")));
        assert_eq!(parse_meminfo_line("HugePages_Total:  0"), Some(("HugePages_Total", 0, "")));
        assert_eq!(parse_meminfo_line("Active(file):  7 kB"), Some(("Active(file)", 7, "kB")));
        assert_eq!(parse_meminfo_line("garbage"), None);
        assert_eq!(parse_meminfo_line("Key: notanumber kB"), None);
        assert_eq!(parse_meminfo_line("Key: 1 kB extra"), None);
        assert_eq!(parse_meminfo_line(": 1 kB"), None);
    }

    #[test]
    fn test_keys_are_case_insensitive() {
        let content = "memtotal: 1000 kB\nMEMFREE: 100 kB\nbuffers: 10 kB\ncached: 50 kB\n";
        let info = parse_meminfo(content, src()).unwrap();
        assert_eq!(info.total, 1000 * 1024);
    }

    #[test]
    fn test_read_meminfo_missing_file() {
        let err = read_meminfo(Path::new("/nonexistent/meminfo")).unwrap_err();
        assert!(matches!(err, MeasurementError::Read { .. }));
        assert!(err.to_string().contains("/nonexistent/meminfo"));
    }
}
