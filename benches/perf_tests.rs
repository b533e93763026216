use criterion::{black_box, criterion_group, criterion_main, Criterion};
use log::{info, LevelFilter};
use log4rs::{
    append::file::FileAppender,
    config::{Appender, Config, Root},
    encode::pattern::PatternEncoder,
};
use std::io::{self, Write};
use std::sync::{Arc, Once};
use std::time::Instant;
use tempfile::tempdir;
use wpilog_logger::{EngineConfig, LogEngine, Loggable, NullTelemetry, Pose2d, StorageProvider};

const BUFFER_SIZE: usize = 4 * 1024 * 1024; // 4MB buffer
const ITERATIONS: usize = 50_000;

static LOGGER_INIT: Once = Once::new();

// Storage that drops every byte - for measuring encoding and framing only
struct NullStorage;

impl StorageProvider for NullStorage {
    fn open_sink(&self, _target: &str) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(io::sink()))
    }
}

fn setup_log4rs(log_file: &str) {
    LOGGER_INIT.call_once(|| {
        let logfile = FileAppender::builder()
            .encoder(Box::new(PatternEncoder::new("{d} - {m}{n}")))
            .append(true)
            .build(log_file)
            .unwrap();

        let config = Config::builder()
            .appender(Appender::builder().build("logfile", Box::new(logfile)))
            .build(Root::builder().appender("logfile").build(LevelFilter::Info))
            .unwrap();

        log4rs::init_config(config).unwrap();
    });
}

fn null_engine() -> LogEngine {
    let engine = LogEngine::new(
        NullStorage,
        Arc::new(NullTelemetry),
        EngineConfig::default().with_buffer_capacity(BUFFER_SIZE),
    );
    engine.setup("bench.wpilog").unwrap();
    engine
}

fn bench_scalar_logging(c: &mut Criterion) {
    let engine = null_engine();
    let mut i = 0u64;
    c.bench_function("log_double", |b| {
        b.iter(|| {
            i += 1;
            engine.log("/Drive/Speed", black_box(i as f64 * 0.01), false).unwrap()
        })
    });
    c.bench_function("log_pose2d", |b| {
        b.iter(|| {
            engine
                .log("/Odometry/Robot", black_box(Pose2d::new(1.0, 2.0, 0.5)), false)
                .unwrap()
        })
    });
    c.bench_function("log_string_array", |b| {
        b.iter(|| {
            engine
                .log("/Robot/Modes", black_box(vec!["disabled", "auto", "teleop"]), false)
                .unwrap()
        })
    });
}

fn bench_logging_comparison(c: &mut Criterion) {
    let mut group = c.benchmark_group("Logging Comparison");
    group.sample_size(10); // Fewer samples due to I/O operations

    group.bench_function("wpilog_vs_traditional", |b| {
        b.iter(|| {
            let dir = tempdir().unwrap();
            let engine = null_engine();

            let binary_start = Instant::now();
            for i in 0..ITERATIONS {
                let t = i as f64 * 0.02;
                engine.log("/Drive/Speed", 1.5 * t, false).unwrap();
                engine.log("/Drive/Enabled", i % 2 == 0, false).unwrap();
                engine.log("/Odometry/Robot", Pose2d::new(t, 0.1 * t, 0.3 * t), false).unwrap();
            }
            engine.close().unwrap();
            let binary_duration = binary_start.elapsed();

            let traditional_log_file = dir.path().join("traditional.log");
            setup_log4rs(&traditional_log_file.to_string_lossy());

            let traditional_start = Instant::now();
            for i in 0..ITERATIONS {
                let t = i as f64 * 0.02;
                info!("/Drive/Speed={}", 1.5 * t);
                info!("/Drive/Enabled={}", i % 2 == 0);
                info!("/Odometry/Robot={}", Pose2d::new(t, 0.1 * t, 0.3 * t).to_log_value());
            }
            let traditional_duration = traditional_start.elapsed();

            println!("\nPerformance comparison ({} iterations, 3 values each):", ITERATIONS);
            println!("WPILOG logging (null sink): {:?}", binary_duration);
            println!("Traditional logging (with I/O): {:?}", traditional_duration);
            println!(
                "Speedup: {:.2}x",
                traditional_duration.as_secs_f64() / binary_duration.as_secs_f64()
            );

            black_box((binary_duration, traditional_duration))
        });
    });

    group.finish();
}

criterion_group!(benches, bench_scalar_logging, bench_logging_comparison);
criterion_main!(benches);
