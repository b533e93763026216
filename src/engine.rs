//! The logging facade.
//!
//! [`LogEngine`] ties the pieces together: for every `log` call it resolves
//! the entry id, emits a Start record the first time a name is seen, encodes
//! the value, appends the data record and optionally mirrors the value to
//! the telemetry side-channel.
//!
//! All session state sits behind one lock held from id resolution until the
//! data record is written. Records therefore never interleave, a Start record
//! always precedes the first data record of its entry, and timestamps are
//! non-decreasing in file order.

use std::io::{BufWriter, Write};
use std::path::PathBuf;
use std::sync::Arc;

use parking_lot::Mutex;
use tracing::{debug, error, info, warn};

use crate::binary_encoder::encode;
use crate::config::{default_file_name, EngineConfig};
use crate::entry_registry::{Entry, EntryRegistry};
use crate::error::{Error, Result};
use crate::geometry::{Pose2d, Rotation2d, Translation2d, BUILTIN_SCHEMAS};
use crate::loggable::Loggable;
use crate::record_writer::RecordWriter;
use crate::schema_registry::{schema_entry_name, SchemaRegistry, SCHEMA_TYPE_TAG};
use crate::storage::{FileStorage, StorageProvider};
use crate::telemetry::{Telemetry, TracingTelemetry};
use crate::time_base::TimeBase;
use crate::value::{bare_schema_name, LogValue};

type SessionWriter = RecordWriter<BufWriter<Box<dyn Write + Send>>>;

/// Counters of the open session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct SessionStats {
    /// Records written, control records included
    pub records: u64,
    /// Bytes written, file header included
    pub bytes: u64,
    /// Entries declared, schema entries included
    pub entries: usize,
}

struct Session {
    target: String,
    writer: SessionWriter,
    entries: EntryRegistry,
    schemas: SchemaRegistry,
    clock: TimeBase,
}

impl Session {
    fn append(&mut self, name: &str, value: &LogValue) -> Result<()> {
        let type_tag = value.type_tag();
        self.check_type(name, &type_tag)?;
        if let LogValue::Struct { schema, fields } = value {
            self.schemas.check_value(schema, fields.len())?;
        }

        let payload = encode(value);
        if u32::try_from(payload.len()).is_err() {
            return Err(Error::PayloadTooLarge(payload.len()));
        }
        self.write_entry(name, &type_tag, &payload)
    }

    /// An entry keeps the type it was declared with for the whole session.
    fn check_type(&self, name: &str, type_tag: &str) -> Result<()> {
        match self.entries.get(name) {
            Some(existing) if existing.type_tag != type_tag => Err(Error::TypeMismatch {
                name: name.to_string(),
                existing: existing.type_tag,
                requested: type_tag.to_string(),
            }),
            _ => Ok(()),
        }
    }

    /// Resolves `name`, declares it if new, then writes `payload`.
    fn write_entry(&mut self, name: &str, type_tag: &str, payload: &[u8]) -> Result<()> {
        self.check_type(name, type_tag)?;
        let resolved = self.entries.resolve(name, type_tag);
        if resolved.is_new {
            debug!(id = resolved.id, name, type_tag, "starting entry");
            self.writer
                .write_control_start(resolved.id, name, type_tag, "", self.clock.now())
                .map_err(Error::Write)?;
        }
        self.writer
            .write_data_record(resolved.id, payload, self.clock.now())
            .map_err(Error::Write)
    }

    fn register_struct(&mut self, name: &str, field_list: &str) -> Result<bool> {
        if let Some(existing) = self.schemas.get(name) {
            if existing.field_list != field_list {
                warn!(
                    schema = %existing.name,
                    registered = %existing.field_list,
                    ignored = field_list,
                    "struct schema already registered with a different field list"
                );
            }
            return Ok(false);
        }
        self.check_type(&schema_entry_name(bare_schema_name(name)), SCHEMA_TYPE_TAG)?;

        let schema = match self.schemas.register(name, field_list)? {
            Some(schema) => schema,
            None => return Ok(false),
        };
        debug!(schema = %schema.name, fields = field_list, "registering struct schema");
        self.write_entry(&schema.entry_name(), SCHEMA_TYPE_TAG, field_list.as_bytes())?;
        Ok(true)
    }

    fn stats(&self) -> SessionStats {
        SessionStats {
            records: self.writer.records_written(),
            bytes: self.writer.bytes_written(),
            entries: self.entries.len(),
        }
    }
}

enum State {
    Idle,
    Open(Session),
    Closed,
}

impl State {
    fn session_mut(&mut self) -> Result<&mut Session> {
        match self {
            State::Open(session) => Ok(session),
            State::Idle => Err(Error::NotStarted),
            State::Closed => Err(Error::Closed),
        }
    }

    fn session(&self) -> Option<&Session> {
        match self {
            State::Open(session) => Some(session),
            _ => None,
        }
    }
}

/// Structured telemetry logger writing one WPILOG file per session.
///
/// The engine is `Send + Sync`; share it through an `Arc` and call `log`
/// from any thread. A session runs from [`setup`](Self::setup) to
/// [`close`](Self::close); setting up again after a close starts a new file
/// with fresh ids and a fresh time base.
///
/// # Examples
///
/// ```no_run
/// # use wpilog_logger::LogEngine;
/// # fn main() -> wpilog_logger::Result<()> {
/// let engine = LogEngine::in_dir("/tmp/logs");
/// engine.setup("match.wpilog")?;
///
/// let speed = engine.log("/Drive/Speed", 3.5, false)?;
/// engine.log("/Drive/Enabled", true, true)?;
/// engine.log_pose2d("/Odometry/Pose", 1.0, 2.0, 0.5, false)?;
/// assert_eq!(speed, 3.5);
///
/// engine.close()?;
/// # Ok(())
/// # }
/// ```
pub struct LogEngine {
    storage: Box<dyn StorageProvider>,
    telemetry: Arc<dyn Telemetry>,
    config: EngineConfig,
    state: Mutex<State>,
}

impl LogEngine {
    pub fn new(
        storage: impl StorageProvider + 'static,
        telemetry: Arc<dyn Telemetry>,
        config: EngineConfig,
    ) -> Self {
        Self {
            storage: Box::new(storage),
            telemetry,
            config,
            state: Mutex::new(State::Idle),
        }
    }

    /// Engine writing into `dir`, posting to `tracing` and configured from
    /// the environment.
    pub fn in_dir(dir: impl Into<PathBuf>) -> Self {
        Self::new(
            FileStorage::in_dir(dir),
            Arc::new(TracingTelemetry),
            EngineConfig::from_env(),
        )
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    /// Opens `target` through the storage collaborator and starts a session.
    ///
    /// Writes the file header, resets the time base and registers the
    /// built-in geometry schemas.
    pub fn setup(&self, target: &str) -> Result<()> {
        let mut state = self.state.lock();
        if let State::Open(_) = *state {
            return Err(Error::AlreadyOpen);
        }

        let setup_err = |source: std::io::Error| Error::Setup {
            target: target.to_string(),
            source,
        };
        let sink = self.storage.open_sink(target).map_err(setup_err)?;
        let mut writer =
            RecordWriter::buffered(sink, self.config.buffer_capacity, &self.config.extra_header);
        writer.write_header().map_err(setup_err)?;

        let mut clock = TimeBase::new();
        clock.start();
        let mut session = Session {
            target: target.to_string(),
            writer,
            entries: EntryRegistry::new(),
            schemas: SchemaRegistry::new(),
            clock,
        };
        for (name, fields) in BUILTIN_SCHEMAS {
            session.register_struct(name, fields).map_err(|err| match err {
                Error::Write(source) => setup_err(source),
                other => other,
            })?;
        }

        info!(file = target, "log session opened");
        *state = State::Open(session);
        Ok(())
    }

    /// Starts a session in a file named after the current local time.
    pub fn setup_default(&self) -> Result<String> {
        let target = default_file_name();
        self.setup(&target)?;
        Ok(target)
    }

    /// Runs `op` on the open session; a fatal error closes the session.
    fn with_session<R>(&self, op: impl FnOnce(&mut Session) -> Result<R>) -> Result<R> {
        let mut state = self.state.lock();
        let result = op(state.session_mut()?);
        if let Err(err) = &result {
            if err.is_fatal() {
                if let Some(session) = state.session() {
                    error!(file = %session.target, error = %err, "log session failed, closing");
                }
                *state = State::Closed;
            }
        }
        result
    }

    /// Writes `value` under `name` and posts it to telemetry when `post`.
    ///
    /// The first call for a name fixes its type; later calls with another
    /// type fail with [`Error::TypeMismatch`] and write nothing. With a
    /// non-zero [`EngineConfig::buffer_capacity`], an `Ok` only means the
    /// record was buffered; sink failures surface on a later call.
    pub fn log_value(&self, name: &str, value: &LogValue, post: bool) -> Result<()> {
        self.with_session(|session| session.append(name, value))?;
        if post {
            self.telemetry.post(name, &value.to_string());
        }
        Ok(())
    }

    /// Logs any [`Loggable`] value and hands it back.
    pub fn log<T: Loggable>(&self, name: &str, value: T, post: bool) -> Result<T> {
        self.log_value(name, &value.to_log_value(), post)?;
        Ok(value)
    }

    pub fn log_pose2d(&self, name: &str, x: f64, y: f64, heading: f64, post: bool) -> Result<Pose2d> {
        self.log(name, Pose2d::new(x, y, heading), post)
    }

    pub fn log_translation2d(&self, name: &str, x: f64, y: f64, post: bool) -> Result<Translation2d> {
        self.log(name, Translation2d::new(x, y), post)
    }

    pub fn log_rotation2d(&self, name: &str, radians: f64, post: bool) -> Result<Rotation2d> {
        self.log(name, Rotation2d::new(radians), post)
    }

    /// Publishes a struct schema once per session.
    ///
    /// Returns `false` when a schema of that name was already registered;
    /// the earlier field list stays in effect.
    pub fn register_struct(&self, name: &str, field_list: &str) -> Result<bool> {
        self.with_session(|session| session.register_struct(name, field_list))
    }

    /// Pushes buffered records to the sink.
    pub fn flush(&self) -> Result<()> {
        self.with_session(|session| session.writer.flush().map_err(Error::Write))
    }

    /// Flushes and closes the session. Closing twice is a no-op.
    pub fn close(&self) -> Result<()> {
        let mut state = self.state.lock();
        match std::mem::replace(&mut *state, State::Closed) {
            State::Open(mut session) => {
                let stats = session.stats();
                session.writer.flush().map_err(Error::Write)?;
                info!(
                    file = %session.target,
                    records = stats.records,
                    bytes = stats.bytes,
                    "log session closed"
                );
                Ok(())
            }
            State::Idle => {
                *state = State::Idle;
                Err(Error::NotStarted)
            }
            State::Closed => Ok(()),
        }
    }

    pub fn is_open(&self) -> bool {
        matches!(*self.state.lock(), State::Open(_))
    }

    /// Id assigned to `name` in the open session.
    pub fn entry_id(&self, name: &str) -> Option<u32> {
        self.entry(name).map(|entry| entry.id)
    }

    pub fn entry(&self, name: &str) -> Option<Entry> {
        self.state.lock().session().and_then(|s| s.entries.get(name))
    }

    /// Entries declared in the open session, schema entries included.
    pub fn entry_count(&self) -> usize {
        self.state.lock().session().map_or(0, |s| s.entries.len())
    }

    pub fn has_schema(&self, name: &str) -> bool {
        self.state
            .lock()
            .session()
            .map_or(false, |s| s.schemas.contains(name))
    }

    /// Counters of the open session, `None` when no session is open.
    pub fn stats(&self) -> Option<SessionStats> {
        self.state.lock().session().map(Session::stats)
    }
}

impl Drop for LogEngine {
    fn drop(&mut self) {
        if let State::Open(session) = self.state.get_mut() {
            if let Err(err) = session.writer.flush() {
                warn!(file = %session.target, error = %err, "failed to flush log on drop");
            }
        }
    }
}
