use mmbench::driver::report::{
    BASELINE_HEADER, OPT_HEADER, PARALLEL_HEADER, PARALLEL_RECORD_HEADER, write_baseline_csv,
    write_opt_csv, write_parallel_csv, write_parallel_records_csv,
};
use mmbench::driver::{
    BaselineTable, BenchConfig, ParallelConfig, ParallelRunner, run_benchmark, run_size,
};
use mmbench::{Algorithm, BenchError, KernelParams};

fn small_config(algorithm: Algorithm) -> BenchConfig {
    BenchConfig {
        repeats: 2,
        params: KernelParams {
            block_size: 4,
            density: 0.2,
        },
        ..BenchConfig::new(vec![4, 9], algorithm)
    }
}

#[test]
fn test_every_algorithm_reports_each_size() {
    for algorithm in Algorithm::ALL {
        let reports = run_benchmark(&small_config(algorithm)).unwrap();
        assert_eq!(reports.len(), 2);
        for (report, n) in reports.iter().zip([4, 9]) {
            assert_eq!(report.algorithm, algorithm);
            assert_eq!(report.size, n);
            assert_eq!(report.samples.len(), 2);
            assert!(report.avg_time_ms >= 0.0);
            let mean = report.samples.iter().map(|s| s.elapsed_ms).sum::<f64>() / 2.0;
            assert!((report.avg_time_ms - mean).abs() < 1e-12);
            assert!(report.peak_rss_mb >= report.samples[0].memory.rss_mb);
        }
    }
}

#[test]
fn test_repetitions_use_incrementing_seeds() {
    let mut config = small_config(Algorithm::Basic);
    config.base_seed = 100;
    config.repeats = 3;
    let report = run_size(&config, 5).unwrap();
    let seeds: Vec<u64> = report.samples.iter().map(|s| s.seed).collect();
    assert_eq!(seeds, vec![100, 101, 102]);
}

#[test]
fn test_repeated_runs_compute_identical_products() {
    let config = small_config(Algorithm::Blocked);
    let first = run_size(&config, 12).unwrap();
    let second = run_size(&config, 12).unwrap();
    let sums = |r: &mmbench::driver::SizeReport| {
        r.samples.iter().map(|s| s.checksum.to_bits()).collect::<Vec<_>>()
    };
    assert_eq!(sums(&first), sums(&second));
}

#[test]
fn test_kernels_produce_same_checksums() {
    let basic = run_size(&small_config(Algorithm::Basic), 10).unwrap();
    for algorithm in [Algorithm::Transposed, Algorithm::Blocked] {
        let other = run_size(&small_config(algorithm), 10).unwrap();
        for (a, b) in basic.samples.iter().zip(&other.samples) {
            assert!((a.checksum - b.checksum).abs() <= 1e-9 * a.checksum.abs());
        }
    }
}

#[test]
fn test_invalid_config_fails_before_running() {
    let mut config = small_config(Algorithm::Sparse);
    config.params.density = 0.0;
    assert!(matches!(
        run_benchmark(&config),
        Err(BenchError::InvalidParameter { name: "density", .. })
    ));

    let config = BenchConfig::new(vec![], Algorithm::Basic);
    assert!(run_benchmark(&config).is_err());
}

#[test]
fn test_run_size_rejects_zero_size() {
    let config = small_config(Algorithm::Basic);
    assert!(matches!(
        run_size(&config, 0),
        Err(BenchError::InvalidParameter { name: "sizes", .. })
    ));
}

#[test]
fn test_run_size_rejects_zero_repeats() {
    let mut config = small_config(Algorithm::Blocked);
    config.repeats = 0;
    assert!(matches!(
        run_size(&config, 4),
        Err(BenchError::InvalidParameter { name: "repeats", .. })
    ));
}

#[test]
fn test_run_size_checks_kernel_params() {
    let mut config = small_config(Algorithm::Blocked);
    config.params.block_size = 0;
    assert!(matches!(
        run_size(&config, 4),
        Err(BenchError::InvalidParameter { name: "block_size", .. })
    ));
}

#[test]
fn test_run_size_accepts_size_outside_config_list() {
    let config = small_config(Algorithm::Transposed);
    let report = run_size(&config, 7).unwrap();
    assert_eq!(report.size, 7);
    assert_eq!(report.samples.len(), 2);
}

#[test]
fn test_run_point_rejects_zero_size_and_workers() {
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![4], vec![1])
    };
    let mut runner = ParallelRunner::new(config).unwrap();
    assert!(matches!(
        runner.run_point(0, 2),
        Err(BenchError::InvalidParameter { name: "sizes", .. })
    ));
    assert!(matches!(
        runner.run_point(4, 0),
        Err(BenchError::InvalidParameter { name: "workers", .. })
    ));
    // nothing was recorded by the rejected calls
    assert!(runner.baselines().get(0).is_none());
    assert!(runner.baselines().get(4).is_none());
}

#[test]
fn test_single_worker_speedup_is_exactly_one() {
    let config = ParallelConfig {
        repeats: 2,
        ..ParallelConfig::new(vec![6, 16], vec![1])
    };
    let reports = ParallelRunner::new(config).unwrap().run().unwrap();
    assert_eq!(reports.len(), 2);
    for report in &reports {
        assert_eq!(report.workers, 1);
        assert_eq!(report.speedup, 1.0);
        assert_eq!(report.efficiency, 1.0);
        assert!(report.records.iter().all(|r| r.speedup == 1.0));
    }
}

#[test]
fn test_speedup_uses_single_worker_baseline() {
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![24], vec![4, 1])
    };
    let mut runner = ParallelRunner::new(config).unwrap();
    let reports = runner.run().unwrap();

    // p=1 runs first even when listed last
    assert_eq!(reports[0].workers, 1);
    assert_eq!(reports[1].workers, 4);

    let t1 = runner.baselines().get(24).unwrap();
    assert_eq!(t1, reports[0].avg_time_ms);
    let expected = t1 / reports[1].avg_time_ms;
    assert!((reports[1].speedup - expected).abs() < 1e-12);
    assert!((reports[1].efficiency - expected / 4.0).abs() < 1e-12);
}

#[test]
fn test_missing_baseline_defaults_speedup() {
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![8], vec![3])
    };
    let reports = ParallelRunner::new(config).unwrap().run().unwrap();
    assert_eq!(reports[0].speedup, 1.0);
    assert!((reports[0].efficiency - 1.0 / 3.0).abs() < 1e-12);
}

#[test]
fn test_seeded_baselines_are_used() {
    let mut table = BaselineTable::default();
    table.record(8, 1.0e9);
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![8], vec![2])
    };
    let mut runner = ParallelRunner::new(config).unwrap().with_baselines(table);
    let reports = runner.run().unwrap();
    assert!(reports[0].speedup > 1.0);
}

#[test]
fn test_more_workers_than_rows() {
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![3], vec![1, 7])
    };
    let reports = ParallelRunner::new(config).unwrap().run().unwrap();
    let sums: Vec<f64> = reports.iter().map(|r| r.records[0].sample.checksum).collect();
    assert!((sums[0] - sums[1]).abs() <= 1e-9 * sums[0].abs());
}

#[test]
fn test_zero_workers_rejected() {
    let config = ParallelConfig::new(vec![8], vec![0]);
    assert!(matches!(
        ParallelRunner::new(config),
        Err(BenchError::InvalidParameter { name: "workers", .. })
    ));
}

// ============================================================
// CSV output
// ============================================================

fn csv_lines(bytes: Vec<u8>) -> Vec<Vec<String>> {
    String::from_utf8(bytes)
        .unwrap()
        .lines()
        .map(|l| l.split(',').map(str::to_string).collect())
        .collect()
}

#[test]
fn test_baseline_csv_layout() {
    let reports = run_benchmark(&small_config(Algorithm::Basic)).unwrap();
    let mut out = Vec::new();
    write_baseline_csv(&mut out, &reports).unwrap();

    let lines = csv_lines(out);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], BASELINE_HEADER);
    assert_eq!(lines[1][0], "rust");
    assert_eq!(lines[1][1], "4");
    assert_eq!(lines[2][1], "9");
    assert!(lines.iter().all(|l| l.len() == BASELINE_HEADER.len()));
}

#[test]
fn test_opt_csv_layout() {
    let reports = run_benchmark(&small_config(Algorithm::Sparse)).unwrap();
    let mut out = Vec::new();
    write_opt_csv(&mut out, &reports).unwrap();

    let lines = csv_lines(out);
    assert_eq!(lines[0], OPT_HEADER);
    assert_eq!(lines[1][1], "sparse");
    assert_eq!(lines[1][2], "4");
    assert_eq!(lines[1][9], "4");
    assert_eq!(lines[1][10], "0.2");
}

#[test]
fn test_parallel_csv_layout() {
    let config = ParallelConfig {
        repeats: 1,
        ..ParallelConfig::new(vec![5], vec![1, 2])
    };
    let reports = ParallelRunner::new(config).unwrap().run().unwrap();
    let mut out = Vec::new();
    write_parallel_csv(&mut out, &reports).unwrap();

    let lines = csv_lines(out);
    assert_eq!(lines.len(), 3);
    assert_eq!(lines[0], PARALLEL_HEADER);
    assert_eq!(lines[1][2], "1");
    assert_eq!(lines[1][5], "1.000");
    assert_eq!(lines[2][2], "2");
}

#[test]
fn test_parallel_records_csv_has_row_per_repeat() {
    let config = ParallelConfig {
        repeats: 3,
        ..ParallelConfig::new(vec![6], vec![1, 2])
    };
    let reports = ParallelRunner::new(config).unwrap().run().unwrap();
    let mut out = Vec::new();
    write_parallel_records_csv(&mut out, &reports).unwrap();

    let lines = csv_lines(out);
    assert_eq!(lines[0], PARALLEL_RECORD_HEADER);
    assert_eq!(lines.len(), 1 + 2 * 3);
    assert!(lines.iter().all(|l| l.len() == PARALLEL_RECORD_HEADER.len()));

    let keys: Vec<(&str, &str)> = lines[1..]
        .iter()
        .map(|l| (l[2].as_str(), l[3].as_str()))
        .collect();
    assert_eq!(
        keys,
        vec![("1", "0"), ("1", "1"), ("1", "2"), ("2", "0"), ("2", "1"), ("2", "2")]
    );
    // single-worker repetitions always report speedup 1
    assert!(lines[1..4].iter().all(|l| l[5] == "1.000"));

    let rec = &reports[1].records[2];
    assert_eq!(lines[6][4], format!("{:.3}", rec.sample.elapsed_ms));
    assert_eq!(lines[6][5], format!("{:.3}", rec.speedup));
}
