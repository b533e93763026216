use std::env;
use std::process::ExitCode;

use tracing::{error, info};
use wpilog_logger::diagnostics::init_tracing;
use wpilog_logger::{log_fields, DiagnosticsConfig, LogEngine, Pose2d, Result};

/// Writes a short synthetic drive trace into the directory given as the
/// first argument (default: current directory).
fn run(dir: &str) -> Result<String> {
    let engine = LogEngine::in_dir(dir);
    let file = engine.setup_default()?;
    info!(dir, file = %file, "writing demo log");

    engine.log("/Robot/Modes", vec!["disabled", "auto", "teleop"], false)?;
    for step in 0..50 {
        let t = step as f64 * 0.02;
        let speed = 1.5 * t;
        let heading = 0.3 * t;
        let enabled = step > 5;
        log_fields!(engine, "/Drive", false; speed, heading, enabled)?;
        engine.log("/Drive/Wheels", [speed, speed * 0.98, speed, speed * 1.01], false)?;
        engine.log("/Odometry/Robot", Pose2d::new(speed * t, 0.1 * t, heading), step % 10 == 0)?;
    }
    engine.close()?;
    Ok(file)
}

fn main() -> ExitCode {
    let _guard = init_tracing(&DiagnosticsConfig::from_env());
    let dir = env::args().nth(1).unwrap_or_else(|| ".".to_string());

    match run(&dir) {
        Ok(file) => {
            println!("{}", file);
            ExitCode::SUCCESS
        }
        Err(err) => {
            error!(error = %err, "demo failed");
            ExitCode::FAILURE
        }
    }
}
