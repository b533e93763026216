//! # WPILOG Logger
//!
//! A structured, append-only telemetry logger. Named values of varying types
//! are timestamped and written into a single WPILOG file that log viewers
//! such as AdvantageScope can open directly.
//!
//! ## Key Features
//!
//! * Stable numeric ids per name, assigned in first-use order
//! * Start records always precede the first data record of an entry
//! * Byte-exact little-endian encoding for scalars, arrays, strings and structs
//! * Struct schemas registered once per session, with built-in 2D geometry
//! * Safe to share across threads; records never interleave
//!
//! ## Main Components
//!
//! * `LogEngine`: facade tying the pieces below together (one per session)
//! * `record_writer`: frames control and data records onto the sink
//! * `binary_encoder`: payload layouts for every value kind
//! * `entry_registry` / `schema_registry`: id allocation and struct schemas
//! * `time_base`: microsecond clock relative to session start
//!
//! ## Quick Start
//!
//! ```no_run
//! use std::sync::Arc;
//! use wpilog_logger::{EngineConfig, FileStorage, LogEngine, TracingTelemetry};
//!
//! # fn main() -> wpilog_logger::Result<()> {
//! let engine = LogEngine::new(
//!     FileStorage::new(["/media/sdcard/logs", "/var/log/robot"]),
//!     Arc::new(TracingTelemetry),
//!     EngineConfig::default(),
//! );
//! engine.setup("practice.wpilog")?;
//!
//! engine.log("/Drive/LeftVelocity", 1.25, false)?;
//! engine.log("/Drive/Modes", vec!["teleop", "field-relative"], false)?;
//! engine.log_pose2d("/Odometry/Robot", 3.0, 1.5, 0.78, true)?;
//!
//! engine.register_struct("Wheel", "double speed;double angle")?;
//! engine.log_value(
//!     "/Drive/FrontLeft",
//!     &wpilog_logger::LogValue::Struct { schema: "Wheel".into(), fields: vec![2.0, 0.1] },
//!     false,
//! )?;
//!
//! engine.close()?;
//! # Ok(())
//! # }
//! ```

pub mod auto_log;
pub mod binary_encoder;
pub mod config;
pub mod diagnostics;
pub mod engine;
pub mod entry_registry;
pub mod error;
pub mod geometry;
pub mod loggable;
pub mod record_writer;
pub mod schema_registry;
pub mod storage;
pub mod supplier;
pub mod telemetry;
pub mod time_base;
pub mod value;

pub use auto_log::{AutoLogManager, LogSource};
pub use config::{DiagnosticsConfig, EngineConfig};
pub use engine::{LogEngine, SessionStats};
pub use entry_registry::{Entry, EntryRegistry};
pub use error::{Error, ErrorKind, Result};
pub use geometry::{Pose2d, Rotation2d, Translation2d};
pub use loggable::Loggable;
pub use schema_registry::SchemaRegistry;
pub use storage::{FileStorage, StorageProvider};
pub use telemetry::{NullTelemetry, Telemetry, TracingTelemetry};
pub use value::LogValue;
