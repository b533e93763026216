use std::io::{self, BufWriter, Write};

use crate::binary_encoder::{encode_start, put_u32};
use crate::entry_registry::CONTROL_ENTRY_ID;

/// Magic bytes at the start of every log file.
pub const FILE_MAGIC: &[u8; 6] = b"WPILOG";

/// Format version written after the magic (1.0).
pub const FORMAT_VERSION: u16 = 0x0100;

/// Framing byte at the start of every record.
///
/// The byte is a constant: ids, lengths and timestamps are always written at
/// full width, so readers must not treat it as a length-class bitfield.
pub const RECORD_MARKER: u8 = 0x7F;

/// Size of the record frame before the payload.
///
/// Format: `[marker(1) | entry_id(4) | payload_len(4) | timestamp(8)]`
pub const RECORD_HEADER_SIZE: usize = 1 + 4 + 4 + 8;

/// Appends framed records to an exclusively owned byte sink.
///
/// Each record is assembled in memory and handed to the sink with a single
/// `write_all`, so records from different callers never interleave as long
/// as calls are serialized by the owner. The writer does not enforce
/// Start-before-data ordering; that is the engine's job.
///
/// # Examples
///
/// ```
/// # use wpilog_logger::record_writer::RecordWriter;
/// let mut writer = RecordWriter::new(Vec::new(), "");
/// writer.write_header().unwrap();
/// writer.write_control_start(1, "speed", "double", "", 0).unwrap();
/// writer.write_data_record(1, &3.5f64.to_le_bytes(), 10).unwrap();
/// assert_eq!(writer.records_written(), 2);
/// ```
pub struct RecordWriter<W: Write> {
    sink: W,
    extra_header: String,
    records: u64,
    bytes: u64,
    frame: Vec<u8>,
}

impl<W: Write> RecordWriter<W> {
    pub fn new(sink: W, extra_header: &str) -> Self {
        Self {
            sink,
            extra_header: extra_header.to_string(),
            records: 0,
            bytes: 0,
            frame: Vec::with_capacity(256),
        }
    }

    /// Writes the file header: magic, version and the extra header string.
    pub fn write_header(&mut self) -> io::Result<()> {
        let extra = self.extra_header.as_bytes();
        let len = frame_len(extra.len())?;
        self.frame.clear();
        self.frame.extend_from_slice(FILE_MAGIC);
        self.frame.extend_from_slice(&FORMAT_VERSION.to_le_bytes());
        put_u32(&mut self.frame, len);
        self.frame.extend_from_slice(extra);
        self.sink.write_all(&self.frame)?;
        self.bytes += self.frame.len() as u64;
        Ok(())
    }

    /// Writes one data record for `entry_id`.
    pub fn write_data_record(&mut self, entry_id: u32, payload: &[u8], timestamp: u64) -> io::Result<()> {
        let len = frame_len(payload.len())?;
        self.frame.clear();
        self.frame.push(RECORD_MARKER);
        put_u32(&mut self.frame, entry_id);
        put_u32(&mut self.frame, len);
        self.frame.extend_from_slice(&timestamp.to_le_bytes());
        self.frame.extend_from_slice(payload);

        self.sink.write_all(&self.frame)?;
        self.records += 1;
        self.bytes += self.frame.len() as u64;
        Ok(())
    }

    /// Writes a Start control record declaring `entry_id`.
    pub fn write_control_start(
        &mut self,
        entry_id: u32,
        name: &str,
        type_tag: &str,
        metadata: &str,
        timestamp: u64,
    ) -> io::Result<()> {
        let payload = encode_start(entry_id, name, type_tag, metadata);
        self.write_data_record(CONTROL_ENTRY_ID, &payload, timestamp)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.sink.flush()
    }

    /// Records written so far, control records included.
    pub fn records_written(&self) -> u64 {
        self.records
    }

    /// Bytes handed to the sink so far, header included.
    pub fn bytes_written(&self) -> u64 {
        self.bytes
    }

    pub fn get_ref(&self) -> &W {
        &self.sink
    }

    pub fn into_inner(self) -> W {
        self.sink
    }
}

impl<W: Write> RecordWriter<BufWriter<W>> {
    /// Wraps `sink` in a `BufWriter` of `capacity` bytes.
    pub fn buffered(sink: W, capacity: usize, extra_header: &str) -> Self {
        Self::new(BufWriter::with_capacity(capacity, sink), extra_header)
    }
}

fn frame_len(len: usize) -> io::Result<u32> {
    u32::try_from(len).map_err(|_| {
        io::Error::new(
            io::ErrorKind::InvalidInput,
            format!("payload of {} bytes exceeds the record length limit", len),
        )
    })
}
