//! Error types for the xbee library.

use thiserror::Error;

/// The main error type for xbee operations.
#[derive(Debug, Error)]
pub enum Error {
    /// Serial port error.
    #[error("serial port error: {0}")]
    Serial(#[from] tokio_serial::Error),

    /// I/O error.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Frame encoding/decoding error.
    #[error("frame error: {0}")]
    Frame(#[from] FrameError),

    /// A required field was not supplied when building a packet.
    #[error("{field} cannot be missing")]
    MissingArgument { field: &'static str },

    /// A numeric field is outside its valid range.
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: i64,
        min: i64,
        max: i64,
    },

    /// Invalid 16-bit or 64-bit address.
    #[error("invalid address: {reason}")]
    InvalidAddress { reason: String },

    /// AT command is not a two-character ASCII mnemonic.
    #[error("invalid AT command: {command:?}")]
    InvalidAtCommand { command: String },

    /// Connection is not established.
    #[error("not connected")]
    NotConnected,
}

/// Frame-specific errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum FrameError {
    /// Frame data exceeds the 16-bit length field.
    #[error("frame too large: {size} bytes exceeds maximum {max}")]
    TooLarge { size: usize, max: usize },

    /// Frame checksum does not match its contents.
    #[error("checksum mismatch: expected {expected:#04x}, got {found:#04x}")]
    ChecksumMismatch { expected: u8, found: u8 },

    /// Payload bytes do not match the layout of their frame type.
    #[error("malformed {frame_type} frame: {reason}")]
    Malformed {
        frame_type: &'static str,
        reason: String,
    },
}

/// Result type alias for xbee operations.
pub type Result<T> = std::result::Result<T, Error>;
