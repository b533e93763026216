#![allow(dead_code)]

use std::collections::HashMap;
use std::io::{self, Write};
use std::sync::{Arc, Mutex};

use wpilog_logger::{EngineConfig, LogEngine, StorageProvider, Telemetry};

/// Sink appending into a shared buffer.
#[derive(Clone, Default)]
pub struct SharedBuffer(pub Arc<Mutex<Vec<u8>>>);

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Storage keeping every opened target in memory.
#[derive(Clone, Default)]
pub struct MemoryStorage {
    files: Arc<Mutex<HashMap<String, SharedBuffer>>>,
}

impl MemoryStorage {
    pub fn contents(&self, target: &str) -> Vec<u8> {
        let files = self.files.lock().unwrap();
        let buffer = files.get(target).expect("target was never opened");
        let data = buffer.0.lock().unwrap().clone();
        data
    }
}

impl StorageProvider for MemoryStorage {
    fn open_sink(&self, target: &str) -> io::Result<Box<dyn Write + Send>> {
        let buffer = SharedBuffer::default();
        self.files.lock().unwrap().insert(target.to_string(), buffer.clone());
        Ok(Box::new(buffer))
    }
}

/// Storage whose sinks fail once `limit` bytes have been accepted.
pub struct FailingAfter {
    pub limit: usize,
}

struct LimitedSink {
    remaining: usize,
}

impl Write for LimitedSink {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if buf.len() > self.remaining {
            return Err(io::Error::new(io::ErrorKind::Other, "device full"));
        }
        self.remaining -= buf.len();
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl StorageProvider for FailingAfter {
    fn open_sink(&self, _target: &str) -> io::Result<Box<dyn Write + Send>> {
        Ok(Box::new(LimitedSink { remaining: self.limit }))
    }
}

/// Telemetry remembering every post.
#[derive(Default)]
pub struct RecordingTelemetry {
    pub posts: Mutex<Vec<(String, String)>>,
}

impl Telemetry for RecordingTelemetry {
    fn post(&self, name: &str, value: &str) {
        self.posts.lock().unwrap().push((name.to_string(), value.to_string()));
    }
}

/// Engine over in-memory storage with unbuffered writes.
pub fn memory_engine() -> (LogEngine, MemoryStorage, Arc<RecordingTelemetry>) {
    let storage = MemoryStorage::default();
    let telemetry = Arc::new(RecordingTelemetry::default());
    let engine = LogEngine::new(
        storage.clone(),
        telemetry.clone(),
        EngineConfig::default().with_buffer_capacity(0),
    );
    (engine, storage, telemetry)
}

#[derive(Debug, Clone, PartialEq)]
pub struct Record {
    pub entry_id: u32,
    pub timestamp: u64,
    pub payload: Vec<u8>,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Start {
    pub entry_id: u32,
    pub name: String,
    pub type_tag: String,
    pub metadata: String,
}

#[derive(Debug)]
pub struct ParsedLog {
    pub version: u16,
    pub extra_header: String,
    pub records: Vec<Record>,
}

fn u32_at(data: &[u8], pos: usize) -> u32 {
    u32::from_le_bytes(data[pos..pos + 4].try_into().unwrap())
}

/// Splits a log file into header and records, panicking on malformed input.
pub fn parse_log(data: &[u8]) -> ParsedLog {
    assert_eq!(&data[0..6], b"WPILOG", "bad magic");
    let version = u16::from_le_bytes([data[6], data[7]]);
    let extra_len = u32_at(data, 8) as usize;
    let extra_header = String::from_utf8(data[12..12 + extra_len].to_vec()).unwrap();

    let mut pos = 12 + extra_len;
    let mut records = Vec::new();
    while pos < data.len() {
        assert_eq!(data[pos], 0x7F, "bad record marker at {}", pos);
        let entry_id = u32_at(data, pos + 1);
        let len = u32_at(data, pos + 5) as usize;
        let timestamp = u64::from_le_bytes(data[pos + 9..pos + 17].try_into().unwrap());
        let payload = data[pos + 17..pos + 17 + len].to_vec();
        records.push(Record {
            entry_id,
            timestamp,
            payload,
        });
        pos += 17 + len;
    }

    ParsedLog {
        version,
        extra_header,
        records,
    }
}

/// Decodes the payload of a Start control record.
pub fn parse_start(record: &Record) -> Start {
    assert_eq!(record.entry_id, 0, "not a control record");
    let p = &record.payload;
    assert_eq!(p[0], 0, "not a Start control record");
    let entry_id = u32_at(p, 1);
    let mut pos = 5;
    let mut read_str = || {
        let len = u32_at(p, pos) as usize;
        let s = String::from_utf8(p[pos + 4..pos + 4 + len].to_vec()).unwrap();
        pos += 4 + len;
        s
    };
    let name = read_str();
    let type_tag = read_str();
    let metadata = read_str();
    Start {
        entry_id,
        name,
        type_tag,
        metadata,
    }
}

impl ParsedLog {
    pub fn starts(&self) -> Vec<Start> {
        self.records
            .iter()
            .filter(|r| r.entry_id == 0)
            .map(parse_start)
            .collect()
    }

    pub fn start_for(&self, name: &str) -> Option<Start> {
        self.starts().into_iter().find(|s| s.name == name)
    }

    pub fn data_for(&self, entry_id: u32) -> Vec<&Record> {
        self.records.iter().filter(|r| r.entry_id == entry_id).collect()
    }
}
