//! API frame encoding and decoding.
//!
//! The wire format wraps every payload in a delimited, checksummed frame:
//! ```text
//! ┌──────────┬──────────────┬────────────┬─────────────────┬──────────┐
//! │  0x7E    │ length (BE)  │ frame type │    API data     │ checksum │
//! │  1 byte  │   2 bytes    │   1 byte   │  length-1 bytes │  1 byte  │
//! └──────────┴──────────────┴────────────┴─────────────────┴──────────┘
//! ```
//!
//! The length counts the frame type and API data. The checksum is
//! `0xFF` minus the low byte of the sum of those same bytes.
//!
//! In escaped mode (API mode 2) every byte after the delimiter that equals
//! `0x7E`, `0x7D`, `0x11` or `0x13` is sent as `0x7D` followed by the byte
//! XOR `0x20`. Length and checksum always refer to the unescaped bytes.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::FrameError;

/// Start delimiter of every frame.
pub const START_DELIMITER: u8 = 0x7E;

/// Escape marker used in escaped mode.
pub const ESCAPE_BYTE: u8 = 0x7D;

/// Software flow control XON.
pub const XON: u8 = 0x11;

/// Software flow control XOFF.
pub const XOFF: u8 = 0x13;

/// Value XORed into an escaped byte.
pub const ESCAPE_XOR: u8 = 0x20;

/// Maximum frame data size (frame type plus API data).
pub const MAX_FRAME_DATA: usize = 65535;

/// API operating mode of the module's serial interface.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum OperatingMode {
    /// API mode without escaping (`AP=1`).
    #[default]
    Api,
    /// API mode with escaped control bytes (`AP=2`).
    ApiEscaped,
}

/// A validated frame before its payload has been interpreted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawFrame {
    /// Frame type discriminator.
    pub frame_type: u8,
    /// API data following the frame type.
    pub data: Bytes,
}

/// Computes the frame checksum over frame type and API data.
#[must_use]
pub fn checksum(data: &[u8]) -> u8 {
    let sum = data.iter().fold(0u8, |acc, &b| acc.wrapping_add(b));
    0xFF - sum
}

const fn needs_escape(byte: u8) -> bool {
    matches!(byte, START_DELIMITER | ESCAPE_BYTE | XON | XOFF)
}

/// Encodes a frame type and API data into a complete frame.
///
/// # Errors
///
/// Returns [`FrameError::TooLarge`] if the frame data does not fit the
/// 16-bit length field.
pub fn encode(frame_type: u8, payload: &[u8], mode: OperatingMode) -> Result<Bytes, FrameError> {
    let data_len = 1 + payload.len();
    let length = u16::try_from(data_len).map_err(|_| FrameError::TooLarge {
        size: data_len,
        max: MAX_FRAME_DATA,
    })?;

    let mut body = BytesMut::with_capacity(2 + data_len + 1);
    body.put_u16(length);
    body.put_u8(frame_type);
    body.put_slice(payload);
    let sum = checksum(&body[2..]);
    body.put_u8(sum);

    let mut frame = BytesMut::with_capacity(1 + body.len());
    frame.put_u8(START_DELIMITER);
    match mode {
        OperatingMode::Api => frame.put_slice(&body),
        OperatingMode::ApiEscaped => {
            for &byte in body.iter() {
                if needs_escape(byte) {
                    frame.put_u8(ESCAPE_BYTE);
                    frame.put_u8(byte ^ ESCAPE_XOR);
                } else {
                    frame.put_u8(byte);
                }
            }
        }
    }
    Ok(frame.freeze())
}

/// Result of scanning the buffer for one frame.
enum Scan {
    /// The frame is not complete yet.
    NeedMore,
    /// A new delimiter appeared at this offset before the frame completed.
    Restart(usize),
    /// A whole frame: bytes consumed from the buffer and the unescaped
    /// length, data and checksum.
    Complete { consumed: usize, bytes: Vec<u8> },
}

/// Frame decoder that handles partial data.
#[derive(Debug, Default)]
pub struct FrameDecoder {
    buffer: BytesMut,
    mode: OperatingMode,
}

impl FrameDecoder {
    /// Creates a new frame decoder for unescaped API mode.
    #[must_use]
    pub fn new() -> Self {
        Self::with_mode(OperatingMode::Api)
    }

    /// Creates a new frame decoder for the given operating mode.
    #[must_use]
    pub fn with_mode(mode: OperatingMode) -> Self {
        Self {
            buffer: BytesMut::new(),
            mode,
        }
    }

    /// Returns the operating mode.
    #[must_use]
    pub const fn mode(&self) -> OperatingMode {
        self.mode
    }

    /// Feeds data into the decoder.
    pub fn feed(&mut self, data: &[u8]) {
        self.buffer.extend_from_slice(data);
    }

    /// Attempts to decode the next complete frame.
    ///
    /// Returns `Ok(Some(frame))` if a complete frame was decoded,
    /// `Ok(None)` if more data is needed, or an error if the frame is invalid.
    /// Bytes before a start delimiter are discarded. An invalid frame is
    /// dropped, so the next call continues with the following bytes.
    ///
    /// # Errors
    ///
    /// Returns a `FrameError` if:
    /// - The checksum does not match
    /// - The frame has a zero length
    pub fn decode(&mut self) -> Result<Option<RawFrame>, FrameError> {
        loop {
            let Some(start) = self.buffer.iter().position(|&b| b == START_DELIMITER) else {
                if !self.buffer.is_empty() {
                    tracing::debug!(
                        "discarding {} bytes without start delimiter",
                        self.buffer.len()
                    );
                    self.buffer.clear();
                }
                return Ok(None);
            };

            if start > 0 {
                tracing::debug!("discarding {} bytes before start delimiter", start);
                self.buffer.advance(start);
            }

            match self.scan() {
                Scan::NeedMore => return Ok(None),
                Scan::Restart(offset) => {
                    tracing::debug!("truncated frame of {} bytes, resynchronising", offset);
                    self.buffer.advance(offset);
                }
                Scan::Complete { consumed, bytes } => {
                    self.buffer.advance(consumed);
                    return validate(&bytes).map(Some);
                }
            }
        }
    }

    /// Reads one frame starting at the delimiter at offset 0.
    fn scan(&self) -> Scan {
        let escaped = self.mode == OperatingMode::ApiEscaped;
        let mut bytes = Vec::new();
        let mut total = None;
        let mut i = 1;

        while i < self.buffer.len() {
            let mut byte = self.buffer[i];
            if escaped {
                if byte == START_DELIMITER {
                    return Scan::Restart(i);
                }
                if byte == ESCAPE_BYTE {
                    if i + 1 >= self.buffer.len() {
                        return Scan::NeedMore;
                    }
                    i += 1;
                    // A delimiter is never escaped, so the frame was cut short.
                    if self.buffer[i] == START_DELIMITER {
                        return Scan::Restart(i);
                    }
                    byte = self.buffer[i] ^ ESCAPE_XOR;
                }
            }
            bytes.push(byte);
            i += 1;

            if bytes.len() == 2 {
                let length = usize::from(u16::from_be_bytes([bytes[0], bytes[1]]));
                total = Some(2 + length + 1);
            }
            if total == Some(bytes.len()) {
                return Scan::Complete { consumed: i, bytes };
            }
        }

        Scan::NeedMore
    }

    /// Returns the number of bytes currently buffered.
    #[must_use]
    pub fn buffered(&self) -> usize {
        self.buffer.len()
    }

    /// Clears the internal buffer.
    pub fn clear(&mut self) {
        self.buffer.clear();
    }
}

/// Checks length and checksum of `[len_hi, len_lo, data.., checksum]`.
fn validate(bytes: &[u8]) -> Result<RawFrame, FrameError> {
    let data = &bytes[2..bytes.len() - 1];
    let found = bytes[bytes.len() - 1];

    if data.is_empty() {
        return Err(FrameError::Malformed {
            frame_type: "API",
            reason: "frame length is zero".into(),
        });
    }

    let expected = checksum(data);
    if expected != found {
        return Err(FrameError::ChecksumMismatch { expected, found });
    }

    Ok(RawFrame {
        frame_type: data[0],
        data: Bytes::copy_from_slice(&data[1..]),
    })
}
