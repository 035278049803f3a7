//! Error types for arbconv

use std::io;
use std::path::PathBuf;
use thiserror::Error;

/// Result type for arbconv operations
pub type Result<T> = std::result::Result<T, ArbError>;

/// Header framing errors
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FormatError {
    /// First three bytes are not the ARB magic
    #[error("not an ARB file: expected magic {want}, got {got}", want = hex::encode(crate::codec::MAGIC), got = hex::encode(.found))]
    BadMagic {
        /// Bytes found where the magic should be
        found: [u8; 3],
    },

    /// Reserved header bytes differ from the literal (strict header check only)
    #[error("unexpected reserved header bytes: expected {want}, got {got}", want = hex::encode(crate::codec::RESERVED), got = hex::encode(.found))]
    UnexpectedReserved {
        /// Bytes found in the reserved field
        found: [u8; 5],
    },
}

/// Errors that can occur in arbconv
#[derive(Debug, Error)]
pub enum ArbError {
    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// Input file does not exist
    #[error("file not found: {}", .0.display())]
    FileNotFound(PathBuf),

    /// Invalid ARB header
    #[error(transparent)]
    Format(#[from] FormatError),

    /// Byte block or record count differs from the fixed layout
    #[error("{what}: expected {expected}, found {actual}")]
    SizeMismatch {
        /// What was being counted
        what: &'static str,
        /// Required count
        expected: usize,
        /// Actual count
        actual: usize,
    },

    /// Malformed table record
    #[error("line {line}: {message}")]
    Parse {
        /// 1-based line number
        line: usize,
        /// Description of the problem
        message: String,
    },

    /// Amplitude cannot be encoded under the active range policy
    #[error("sample {index}: value {value} is out of range")]
    ValueOutOfRange {
        /// Sample index within the waveform
        index: usize,
        /// Offending amplitude
        value: f64,
    },

    /// Configuration error
    #[error("Configuration error: {0}")]
    Config(String),

    /// PNG encoding failed
    #[error("PNG encoding error: {0}")]
    Png(String),
}
