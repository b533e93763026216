use std::io;
use thiserror::Error;

/// Errors raised by the logging engine.
///
/// Every variant belongs to one of three classes (see [`ErrorKind`]):
/// setup failures, write failures and usage errors. Setup and write
/// failures are fatal to the session; usage errors leave the file intact.
#[derive(Debug, Error)]
pub enum Error {
    /// The sink could not be opened or the file header could not be written.
    #[error("failed to open log `{target}`: {source}")]
    Setup {
        /// Name handed to the storage collaborator
        target: String,
        #[source]
        source: io::Error,
    },

    /// An I/O failure while appending a record or flushing the sink.
    #[error("failed to write log record: {0}")]
    Write(#[source] io::Error),

    /// `log` or `register_struct` was called before `setup`.
    #[error("logging session has not been set up")]
    NotStarted,

    /// The session was closed, or poisoned by an earlier write failure.
    #[error("logging session is closed")]
    Closed,

    /// `setup` was called while a session was still open.
    #[error("logging session is already open")]
    AlreadyOpen,

    /// A name was logged with a type other than the one it was started with.
    #[error("entry `{name}` was started as `{existing}` but logged as `{requested}`")]
    TypeMismatch {
        name: String,
        existing: String,
        requested: String,
    },

    /// A struct value was logged before its schema was registered.
    #[error("struct schema `{0}` has not been registered")]
    UnregisteredSchema(String),

    /// A struct field list could not be parsed.
    #[error("invalid struct schema `{name}`: {reason}")]
    InvalidSchema { name: String, reason: String },

    /// A struct value carries a different number of fields than its schema.
    #[error("struct `{schema}` expects {expected} fields, got {actual}")]
    StructArity {
        schema: String,
        expected: usize,
        actual: usize,
    },

    /// A payload does not fit the 32-bit length field of the record frame.
    #[error("payload of {0} bytes exceeds the record length limit")]
    PayloadTooLarge(usize),
}

/// Coarse classification of [`Error`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Setup,
    Write,
    Usage,
}

impl Error {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Error::Setup { .. } => ErrorKind::Setup,
            Error::Write(_) => ErrorKind::Write,
            _ => ErrorKind::Usage,
        }
    }

    /// Whether the session can no longer be used after this error.
    pub fn is_fatal(&self) -> bool {
        matches!(self.kind(), ErrorKind::Setup | ErrorKind::Write)
    }
}

pub type Result<T> = std::result::Result<T, Error>;
