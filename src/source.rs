//! Line source: lazy, forward-only reading of a log dump one physical line at a time.
//!
//! Lines are decoded with the encoding the caller declares (no sniffing) and
//! handed to a [`LineSink`]. Reading stops at the first failure: the sink sees
//! no further lines and is dropped together with whatever it accumulated.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::PathBuf;

use tracing::debug;

use crate::BranchflowError;

// ─── Encoding ───────────────────────────────────────────────────────

/// Character encoding of a log dump.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Encoding {
    /// Strict UTF-8. Invalid bytes abort reading.
    #[default]
    Utf8,
    /// UTF-8 with U+FFFD replacement for invalid sequences.
    Utf8Lossy,
    /// ISO-8859-1: every byte maps to the code point of the same value.
    Latin1,
}

impl Encoding {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Utf8 => "utf8",
            Self::Utf8Lossy => "utf8-lossy",
            Self::Latin1 => "latin1",
        }
    }

    fn decode(&self, bytes: &[u8], line_no: usize) -> Result<String, BranchflowError> {
        match self {
            Self::Utf8 => std::str::from_utf8(bytes)
                .map(str::to_string)
                .map_err(|_| BranchflowError::Decode {
                    line_no,
                    encoding: self.as_str().to_string(),
                }),
            Self::Utf8Lossy => Ok(String::from_utf8_lossy(bytes).into_owned()),
            Self::Latin1 => Ok(bytes.iter().map(|&b| b as char).collect()),
        }
    }
}

impl std::fmt::Display for Encoding {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Encoding {
    type Err = BranchflowError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "utf8" | "utf-8" => Ok(Self::Utf8),
            "utf8-lossy" | "utf-8-lossy" | "lossy" => Ok(Self::Utf8Lossy),
            "latin1" | "latin-1" | "iso-8859-1" | "iso8859-1" => Ok(Self::Latin1),
            other => Err(BranchflowError::UnknownEncoding(other.to_string())),
        }
    }
}

// ─── Source descriptor ──────────────────────────────────────────────

/// A log file plus the encoding it was written in.
#[derive(Debug, Clone)]
pub struct SourceFile {
    pub path: PathBuf,
    pub encoding: Encoding,
}

impl SourceFile {
    pub fn new(path: impl Into<PathBuf>, encoding: Encoding) -> Self {
        Self {
            path: path.into(),
            encoding,
        }
    }
}

// ─── Line iterator ──────────────────────────────────────────────────

/// Forward-only line reader. Restartable only by opening the source again.
///
/// Yields lines without their `\n` / `\r\n` terminator. After the first error
/// the iterator is exhausted.
pub struct LineSource<R> {
    reader: R,
    encoding: Encoding,
    line_no: usize,
    buf: Vec<u8>,
    failed: bool,
}

impl LineSource<BufReader<File>> {
    /// Open a log file for reading.
    pub fn open(file: &SourceFile) -> Result<Self, BranchflowError> {
        let handle = File::open(&file.path)?;
        debug!(path = %file.path.display(), encoding = %file.encoding, "Opened log file");
        Ok(Self::new(BufReader::with_capacity(64 * 1024, handle), file.encoding))
    }
}

impl<R: BufRead> LineSource<R> {
    pub fn new(reader: R, encoding: Encoding) -> Self {
        Self {
            reader,
            encoding,
            line_no: 0,
            buf: Vec::new(),
            failed: false,
        }
    }
}

impl<R: BufRead> Iterator for LineSource<R> {
    type Item = Result<String, BranchflowError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.failed {
            return None;
        }
        self.buf.clear();
        match self.reader.read_until(b'\n', &mut self.buf) {
            Ok(0) => None,
            Ok(_) => {
                self.line_no += 1;
                if self.buf.last() == Some(&b'\n') {
                    self.buf.pop();
                    if self.buf.last() == Some(&b'\r') {
                        self.buf.pop();
                    }
                }
                let decoded = self.encoding.decode(&self.buf, self.line_no);
                if decoded.is_err() {
                    self.failed = true;
                }
                Some(decoded)
            }
            Err(e) => {
                self.failed = true;
                Some(Err(e.into()))
            }
        }
    }
}

// ─── Push-style driver ──────────────────────────────────────────────

/// Consumer of a line stream with a single completion or error outcome.
pub trait LineSink {
    type Output;

    /// Called once per line, in file order. An error stops the stream.
    fn on_line(&mut self, line: &str) -> Result<(), BranchflowError>;

    /// Called exactly once after the last line, unless reading failed.
    fn on_end(self) -> Result<Self::Output, BranchflowError>;

    /// Called at most once, when reading or decoding fails. No callback
    /// follows it; the sink is dropped afterwards.
    fn on_error(&mut self, _error: &BranchflowError) {}
}

/// Push every line of `source` into `sink`.
///
/// Returns the sink's output, or the first error (read, decode or sink). A
/// read or decode error is reported to [`LineSink::on_error`] first; an error
/// raised by the sink itself is not echoed back to it. Either way `on_end`
/// is never called after a failure.
pub fn drive<R: BufRead, S: LineSink>(
    source: LineSource<R>,
    mut sink: S,
) -> Result<S::Output, BranchflowError> {
    for line in source {
        match line {
            Ok(line) => sink.on_line(&line)?,
            Err(e) => {
                sink.on_error(&e);
                return Err(e);
            }
        }
    }
    sink.on_end()
}
