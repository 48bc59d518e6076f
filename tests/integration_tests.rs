use proptest::prelude::*;
use resource_checks::{
    classify, evaluate, format_bytes, load_runtime_config_with_env, parse_meminfo,
    parse_size_to_bytes, parse_threshold, run_check, Bound, Direction, DirSizeCheck,
    DirSizeCheckConfig, Measurement, MeasurementError, MemoryCheck, MemoryCheckConfig,
    MockEnvironment, Status, ThresholdPair, ThresholdSpec, ThresholdSpecPair,
};
use std::fs;
use std::path::{Path, PathBuf};

const GIB: u64 = 1024 * 1024 * 1024;

fn measurement(value: u64) -> Measurement {
    Measurement {
        label: "value",
        value,
        total: None,
        summary: format!("value is {}", format_bytes(value)),
    }
}

#[test]
fn test_available_memory_example() {
    // total 16 GiB, free 1 GiB, cached 2 GiB, buffers 0.5 GiB
    let content = format!(
        "MemTotal: {} kB\nMemFree: {} kB\nCached: {} kB\nBuffers: {} kB\n",
        16 * GIB / 1024,
        GIB / 1024,
        2 * GIB / 1024,
        GIB / 2 / 1024
    );
    let info = parse_meminfo(&content, Path::new("/proc/meminfo")).unwrap();
    assert_eq!(info.available(), 3 * GIB + GIB / 2);

    let thresholds = ThresholdPair::new(Some(4 * GIB), Some(2 * GIB), Direction::LowIsBad);
    assert_eq!(classify(info.available(), &thresholds).0, Status::Warning);
}

#[test]
fn test_directory_size_example() {
    let thresholds = ThresholdPair::new(Some(10 * GIB), Some(15 * GIB), Direction::HighIsBad);
    assert_eq!(classify(12 * GIB, &thresholds).0, Status::Warning);
    assert_eq!(classify(15 * GIB, &thresholds).0, Status::Critical);
    assert_eq!(classify(9 * GIB, &thresholds).0, Status::Ok);
}

#[test]
fn test_threshold_parsing_edge_cases() {
    // Whitespace around values
    assert_eq!(parse_size_to_bytes("  10G  "), Some(10 * GIB));
    assert_eq!(parse_size_to_bytes("\t512\n"), Some(512));

    // Same text, different direction
    let low = parse_threshold("--warning", "20%", Direction::LowIsBad).unwrap();
    assert_eq!(low, ThresholdSpec { low: Some(Bound::Percent(20.0)), high: None });
    let high = parse_threshold("--warning", "20%", Direction::HighIsBad).unwrap();
    assert_eq!(high, ThresholdSpec { low: None, high: Some(Bound::Percent(20.0)) });

    // Explicit ranges ignore direction
    let a = parse_threshold("--warning", "1G:2G", Direction::LowIsBad).unwrap();
    let b = parse_threshold("--warning", "1G:2G", Direction::HighIsBad).unwrap();
    assert_eq!(a, b);
}

#[test]
fn test_memory_check_end_to_end_with_percentages() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("meminfo");
    fs::write(
        &path,
        "MemTotal: 1000000 kB\nMemFree: 20000 kB\nBuffers: 10000 kB\nCached: 20000 kB\n",
    )
    .unwrap();

    let config = MemoryCheckConfig {
        meminfo_path: path,
        thresholds: ThresholdSpecPair {
            warning: Some(ThresholdSpec { low: Some(Bound::Percent(20.0)), high: None }),
            critical: Some(ThresholdSpec { low: Some(Bound::Percent(10.0)), high: None }),
        },
        kernel_estimate: false,
    };
    let report = run_check(&MemoryCheck::new(&config));
    assert_eq!(report.status, Status::Critical);
    assert_eq!(report.exit_code, 2);
    assert!(report.message.contains("(5.00%)"));
    assert!(report.message.contains("at or below critical threshold"));
    assert_eq!(report.total, Some(1000000 * 1024));
}

#[test]
fn test_dir_size_check_end_to_end() {
    let dir = tempfile::tempdir().unwrap();
    fs::create_dir(dir.path().join("logs")).unwrap();
    fs::write(dir.path().join("logs/app.log"), vec![b'a'; 3000]).unwrap();
    fs::write(dir.path().join("index"), vec![b'i'; 100]).unwrap();

    let config = DirSizeCheckConfig {
        dir: dir.path().to_path_buf(),
        thresholds: ThresholdSpecPair {
            warning: Some(ThresholdSpec { low: None, high: Some(Bound::Bytes(2048)) }),
            critical: Some(ThresholdSpec { low: None, high: Some(Bound::Bytes(4096)) }),
        },
        same_filesystem: true,
        follow_links: false,
    };
    let report = run_check(&DirSizeCheck::new(&config));
    assert_eq!(report.status, Status::Warning);
    assert_eq!(report.value, Some(3100));
    assert!(report.render_text().ends_with(
        "size is 3.027KB, at or above warning threshold 2.000KB | size=3100B;2047;4095;0;"
    ));
}

#[test]
fn test_runtime_config_environment_isolation() {
    let config = load_runtime_config_with_env(&MockEnvironment::new());
    assert_eq!(config.meminfo_path, PathBuf::from("/proc/meminfo"));

    let env = MockEnvironment::new().with_var("MEMINFO_PATH", "/host/proc/meminfo");
    let config = load_runtime_config_with_env(&env);
    assert_eq!(config.meminfo_path, PathBuf::from("/host/proc/meminfo"));
}

fn direction() -> impl Strategy<Value = Direction> {
    prop_oneof![Just(Direction::LowIsBad), Just(Direction::HighIsBad)]
}

proptest! {
    #[test]
    fn prop_safe_side_of_warning_is_ok(warning in 1u64..u64::MAX / 2, offset in 1u64..1_000_000) {
        // High is bad: anything strictly below warning is OK
        let value = warning.saturating_sub(offset);
        prop_assume!(value < warning);
        let critical = warning.saturating_mul(2);
        let thresholds = ThresholdPair::new(Some(warning), Some(critical), Direction::HighIsBad);
        prop_assert_eq!(classify(value, &thresholds).0, Status::Ok);

        // Low is bad: anything strictly above warning is OK
        let value = warning + offset;
        let thresholds = ThresholdPair::new(Some(warning), Some(warning / 2), Direction::LowIsBad);
        prop_assert_eq!(classify(value, &thresholds).0, Status::Ok);
    }

    #[test]
    fn prop_exactly_at_warning_is_warning(warning in 1u64..u64::MAX / 2, dir in direction()) {
        let critical = match dir {
            Direction::LowIsBad => warning - 1,
            Direction::HighIsBad => warning + 1,
        };
        let thresholds = ThresholdPair::new(Some(warning), Some(critical), dir);
        prop_assert_eq!(classify(warning, &thresholds).0, Status::Warning);
    }

    #[test]
    fn prop_at_or_beyond_critical_is_critical(
        critical in 1u64..u64::MAX / 4,
        beyond in 0u64..1_000_000,
        dir in direction(),
    ) {
        let (warning, value) = match dir {
            Direction::LowIsBad => (critical.saturating_mul(2), critical.saturating_sub(beyond)),
            Direction::HighIsBad => (critical / 2, critical + beyond),
        };
        let thresholds = ThresholdPair::new(Some(warning), Some(critical), dir);
        prop_assert_eq!(classify(value, &thresholds).0, Status::Critical);
    }

    #[test]
    fn prop_no_critical_without_critical_bound(
        value in any::<u64>(),
        warning in proptest::option::of(any::<u64>()),
        dir in direction(),
    ) {
        let thresholds = ThresholdPair::new(warning, None, dir);
        prop_assert_ne!(classify(value, &thresholds).0, Status::Critical);
    }

    #[test]
    fn prop_measurement_failure_is_unknown(
        warning in proptest::option::of(any::<u64>()),
        critical in proptest::option::of(any::<u64>()),
        dir in direction(),
    ) {
        let thresholds = ThresholdPair::new(warning, critical, dir);
        let outcome: Result<Measurement, MeasurementError> = Err(MeasurementError::NotADirectory {
            path: PathBuf::from("/nope"),
        });
        prop_assert_eq!(evaluate(&outcome, &thresholds).status, Status::Unknown);
    }

    #[test]
    fn prop_evaluate_matches_classify(
        value in any::<u64>(),
        warning in proptest::option::of(any::<u64>()),
        critical in proptest::option::of(any::<u64>()),
        dir in direction(),
    ) {
        let thresholds = ThresholdPair::new(warning, critical, dir);
        let eval = evaluate(&Ok(measurement(value)), &thresholds);
        prop_assert_eq!(eval.status, classify(value, &thresholds).0);
        prop_assert!(eval.message.starts_with("value is "));
    }
}
