mod common;

use std::fs;
use std::sync::Arc;

use common::{memory_engine, parse_log, parse_start};
use tempfile::tempdir;
use wpilog_logger::binary_encoder::decode;
use wpilog_logger::{
    log_fields, supplier, AutoLogManager, EngineConfig, FileStorage, LogEngine, LogSource,
    NullTelemetry, Result,
};

const TARGET: &str = "features.wpilog";

#[test]
fn test_file_storage_prefers_existing_root() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("card");
    let internal = dir.path().join("internal");
    fs::create_dir(&internal).unwrap();

    let storage = FileStorage::new([missing.clone(), internal.clone()]);
    assert_eq!(storage.choose_root().unwrap(), internal.as_path());
    assert!(!missing.exists(), "Unused roots should not be created");
}

#[test]
fn test_file_storage_creates_first_root() {
    let dir = tempdir().unwrap();
    let first = dir.path().join("a").join("logs");
    let second = dir.path().join("b");

    let storage = FileStorage::new([first.clone(), second.clone()]);
    assert_eq!(storage.path_for("x.wpilog").unwrap(), first.join("x.wpilog"));
    assert!(first.is_dir());
    assert!(!second.exists());
}

#[test]
fn test_engine_writes_file() {
    let dir = tempdir().unwrap();
    let engine = LogEngine::new(
        FileStorage::in_dir(dir.path()),
        Arc::new(NullTelemetry),
        EngineConfig::default().with_extra_header("team=1234"),
    );
    engine.setup(TARGET).unwrap();
    engine.log("/speed", 3.5, false).unwrap();
    engine.close().unwrap();

    let bytes = fs::read(dir.path().join(TARGET)).unwrap();
    let log = parse_log(&bytes);
    assert_eq!(log.version, 0x0100);
    assert_eq!(log.extra_header, "team=1234");

    let start = log.start_for("/speed").unwrap();
    assert_eq!(start.type_tag, "double");
    let data = log.data_for(start.entry_id);
    assert_eq!(data.len(), 1);
    assert_eq!(data[0].payload, 3.5f64.to_le_bytes());
}

#[test]
fn test_buffered_bytes_reach_file_on_flush() {
    let dir = tempdir().unwrap();
    let engine = LogEngine::new(
        FileStorage::in_dir(dir.path()),
        Arc::new(NullTelemetry),
        EngineConfig::default().with_buffer_capacity(1 << 20),
    );
    engine.setup(TARGET).unwrap();
    engine.log("/count", 7i64, false).unwrap();
    engine.flush().unwrap();

    let bytes = fs::read(dir.path().join(TARGET)).unwrap();
    let log = parse_log(&bytes);
    let id = engine.entry_id("/count").unwrap();
    assert_eq!(log.data_for(id)[0].payload, 7i64.to_le_bytes());
}

#[test]
fn test_setup_default_names_file() {
    let dir = tempdir().unwrap();
    let engine = LogEngine::new(
        FileStorage::in_dir(dir.path()),
        Arc::new(NullTelemetry),
        EngineConfig::default(),
    );
    let name = engine.setup_default().unwrap();
    engine.close().unwrap();

    assert!(name.ends_with(".wpilog"));
    assert!(dir.path().join(&name).is_file());
}

#[test]
fn test_supplier_logs_each_value() {
    let (engine, storage, telemetry) = memory_engine();
    engine.setup(TARGET).unwrap();
    let engine = Arc::new(engine);

    let mut reading = 0i64;
    let mut ticks = supplier::wrap(
        engine.clone(),
        "/Arm/Ticks",
        move || {
            reading += 10;
            reading
        },
        true,
    );
    assert_eq!(ticks().unwrap(), 10);
    assert_eq!(ticks().unwrap(), 20);
    engine.flush().unwrap();

    let log = parse_log(&storage.contents(TARGET));
    let id = engine.entry_id("/Arm/Ticks").unwrap();
    let values: Vec<_> = log
        .data_for(id)
        .iter()
        .map(|r| decode("int64", &r.payload).unwrap().to_string())
        .collect();
    assert_eq!(values, vec!["10", "20"]);
    assert_eq!(telemetry.posts.lock().unwrap().len(), 2);
}

struct Elevator {
    height: f64,
    at_goal: bool,
}

impl LogSource for Elevator {
    fn log_to(&self, engine: &LogEngine) -> Result<()> {
        let height = self.height;
        let at_goal = self.at_goal;
        log_fields!(engine, "/Elevator", false; height, at_goal)
    }
}

#[test]
fn test_auto_log_periodic() {
    let (engine, storage, _) = memory_engine();
    engine.setup(TARGET).unwrap();

    let manager = AutoLogManager::new();
    assert!(manager.is_empty());
    manager.register(Arc::new(Elevator {
        height: 0.75,
        at_goal: true,
    }));
    manager.register(Arc::new(|engine: &LogEngine| {
        engine.log("/Intake/Running", false, false).map(|_| ())
    }));
    assert_eq!(manager.len(), 2);

    manager.periodic(&engine).unwrap();
    manager.periodic(&engine).unwrap();
    engine.flush().unwrap();

    let log = parse_log(&storage.contents(TARGET));
    let names: Vec<_> = log.starts().into_iter().skip(3).map(|s| s.name).collect();
    assert_eq!(names, vec!["/Elevator/height", "/Elevator/at_goal", "/Intake/Running"]);

    let start = log.start_for("/Elevator/at_goal").unwrap();
    assert_eq!(start.type_tag, "boolean");
    assert_eq!(log.data_for(start.entry_id).len(), 2);
}

#[test]
fn test_periodic_stops_at_first_error() {
    let (engine, storage, _) = memory_engine();
    engine.setup(TARGET).unwrap();
    engine.log("/shared", 1.0, false).unwrap();

    let manager = AutoLogManager::new();
    manager.register(Arc::new(|engine: &LogEngine| {
        engine.log("/shared", "wrong type", false).map(|_| ())
    }));
    manager.register(Arc::new(|engine: &LogEngine| {
        engine.log("/never", 1i32, false).map(|_| ())
    }));

    assert!(manager.periodic(&engine).is_err());
    assert!(engine.entry_id("/never").is_none());
    assert!(engine.is_open(), "Usage errors keep the session open");

    engine.flush().unwrap();
    let log = parse_log(&storage.contents(TARGET));
    assert!(log.records.iter().filter(|r| r.entry_id == 0).map(parse_start).all(|s| s.name != "/never"));
}
