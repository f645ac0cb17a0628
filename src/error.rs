//! Unified error type for log parsing and model reconstruction.

use thiserror::Error;

/// All errors that can occur while turning a log dump into a repository model.
#[derive(Error, Debug)]
pub enum BranchflowError {
    /// I/O error (log file unreadable, read failed mid-stream)
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A line could not be decoded with the declared encoding
    #[error("Line {line_no} is not valid {encoding}")]
    Decode { line_no: usize, encoding: String },

    /// A record violates the grammar's mandatory-field contract
    #[error("Malformed log at line {line_no}: {message}\n  > {line}")]
    Structure {
        line_no: usize,
        line: String,
        message: String,
    },

    /// Invalid line pattern in a grammar
    #[error("Invalid regex pattern '{pattern}': {source}")]
    InvalidRegex {
        pattern: String,
        #[source]
        source: regex::Error,
    },

    /// Caller asked for a log format no grammar exists for
    #[error("Unsupported log type '{0}'. Supported types: git, hg")]
    UnknownFormat(String),

    /// Caller asked for an encoding the line source cannot decode
    #[error("Unsupported encoding '{0}'. Supported encodings: utf8, utf8-lossy, latin1")]
    UnknownEncoding(String),

    /// Configuration file could not be read
    #[error("Failed to read config file {path}: {message}")]
    Config { path: String, message: String },

    /// Configuration file is not valid JSON for the config schema
    #[error("Invalid config: {0}")]
    ConfigParse(#[from] serde_json::Error),
}

impl BranchflowError {
    /// Build a structural error for the given physical line.
    pub fn structure(line_no: usize, line: &str, message: impl Into<String>) -> Self {
        BranchflowError::Structure {
            line_no,
            line: line.to_string(),
            message: message.into(),
        }
    }
}
