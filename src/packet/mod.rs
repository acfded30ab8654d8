//! Typed API frame payloads.
//!
//! Every frame type this library understands has a payload struct that
//! implements [`ApiPayload`]. [`Packet`] is the closed set of those payloads
//! and dispatches decoding on the frame type byte.

pub mod at_command;
pub mod modem_status;
pub mod remote_at_command;
pub mod transmit;

use std::fmt;
use std::sync::atomic::{AtomicU8, Ordering};

use bytes::{Buf, Bytes, BytesMut};

use crate::error::{Error, FrameError, Result};
use crate::protocol::{FrameType, OperatingMode, RawFrame, encode_frame};
use crate::types::{Address16, Address64, AtCommand, StatusCode, pretty_hex};

pub use at_command::{AtCommandPacket, AtCommandResponsePacket};
pub use modem_status::ModemStatusPacket;
pub use remote_at_command::{
    RemoteAtCommandPacket, RemoteAtCommandResponseBuilder, RemoteAtCommandResponsePacket,
};
pub use transmit::{ReceivePacket, TransmitRequestPacket, TransmitStatusPacket};

/// Ordered `(label, value)` pairs describing a payload for diagnostics.
pub type Parameters = Vec<(&'static str, String)>;

/// Contract shared by all frame payloads.
pub trait ApiPayload: Sized {
    /// Frame type discriminator of this payload.
    const FRAME_TYPE: FrameType;

    /// Whether the payload carries a frame ID echoed in the response.
    const NEEDS_FRAME_ID: bool;

    /// Returns the frame ID, if the payload carries one.
    fn frame_id(&self) -> Option<u8>;

    /// Appends the API data (everything after the frame type byte).
    fn encode_into(&self, buf: &mut BytesMut);

    /// Returns the API data as a new buffer.
    fn encode(&self) -> Bytes {
        let mut buf = BytesMut::new();
        self.encode_into(&mut buf);
        buf.freeze()
    }

    /// Parses the API data of a frame of this type.
    fn decode(data: &[u8]) -> Result<Self>;

    /// Describes each field for logging. Never used for encoding.
    fn parameters(&self) -> Parameters;
}

/// Checks that a frame ID fits in one byte.
pub(crate) fn check_frame_id(frame_id: i64) -> Result<u8> {
    u8::try_from(frame_id).map_err(|_| Error::OutOfRange {
        field: "frame ID",
        value: frame_id,
        min: 0,
        max: 255,
    })
}

pub(crate) fn malformed(frame_type: FrameType, reason: impl Into<String>) -> Error {
    Error::Frame(FrameError::Malformed {
        frame_type: frame_type.name(),
        reason: reason.into(),
    })
}

pub(crate) fn ensure_len(frame_type: FrameType, data: &[u8], min: usize) -> Result<()> {
    if data.len() < min {
        return Err(malformed(
            frame_type,
            format!("need at least {min} bytes, got {}", data.len()),
        ));
    }
    Ok(())
}

/// Fixed-layout payloads must not carry trailing bytes.
pub(crate) fn ensure_exact_len(frame_type: FrameType, data: &[u8], len: usize) -> Result<()> {
    if data.len() != len {
        return Err(malformed(
            frame_type,
            format!("expected {len} bytes, got {}", data.len()),
        ));
    }
    Ok(())
}

pub(crate) fn get_address64(buf: &mut &[u8]) -> Address64 {
    let mut bytes = [0u8; 8];
    buf.copy_to_slice(&mut bytes);
    Address64::new(bytes)
}

pub(crate) fn get_address16(buf: &mut &[u8]) -> Address16 {
    let mut bytes = [0u8; 2];
    buf.copy_to_slice(&mut bytes);
    Address16::new(bytes)
}

pub(crate) fn get_command(frame_type: FrameType, buf: &mut &[u8]) -> Result<AtCommand> {
    let mut bytes = [0u8; 2];
    buf.copy_to_slice(&mut bytes);
    AtCommand::from_bytes(&bytes)
        .map_err(|_| malformed(frame_type, format!("invalid AT command {}", pretty_hex(&bytes))))
}

pub(crate) fn get_status<S: StatusCode>(frame_type: FrameType, code: u8) -> Result<S> {
    S::lookup(code).ok_or_else(|| malformed(frame_type, format!("unknown status {code:#04x}")))
}

/// Remaining bytes, or `None` when nothing is left.
pub(crate) fn optional_bytes(rest: &[u8]) -> Option<Bytes> {
    (!rest.is_empty()).then(|| Bytes::copy_from_slice(rest))
}

/// Empty values are stored as absent; the wire cannot tell them apart.
pub(crate) fn normalize(value: Bytes) -> Option<Bytes> {
    (!value.is_empty()).then_some(value)
}

pub(crate) fn byte_param(value: u8) -> String {
    format!("{value:02X} ({value})")
}

pub(crate) fn command_param(command: &AtCommand) -> String {
    format!("{} ({command})", pretty_hex(command.as_bytes()))
}

pub(crate) fn status_param<S: StatusCode>(status: S) -> String {
    format!("{:02X} ({})", status.value(), status.description())
}

/// Renders a command parameter or response, as text for string commands.
pub(crate) fn value_param(command: &AtCommand, value: &[u8]) -> String {
    if command.is_string_command() {
        format!("{} ({})", pretty_hex(value), String::from_utf8_lossy(value))
    } else {
        pretty_hex(value)
    }
}

/// Hands out frame IDs in `1..=255`, skipping 0 on wrap-around.
///
/// Frame ID 0 tells the module not to send a response.
#[derive(Debug)]
pub struct FrameIdGenerator {
    next: AtomicU8,
}

impl FrameIdGenerator {
    /// Creates a generator starting at 1.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            next: AtomicU8::new(1),
        }
    }

    /// Returns the next frame ID.
    pub fn next_id(&self) -> u8 {
        loop {
            let id = self.next.fetch_add(1, Ordering::Relaxed);
            if id != 0 {
                return id;
            }
        }
    }
}

impl Default for FrameIdGenerator {
    fn default() -> Self {
        Self::new()
    }
}

/// Any API frame payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Packet {
    /// Local AT command.
    AtCommand(AtCommandPacket),
    /// Transmit request.
    TransmitRequest(TransmitRequestPacket),
    /// Remote AT command request.
    RemoteAtCommand(RemoteAtCommandPacket),
    /// Local AT command response.
    AtCommandResponse(AtCommandResponsePacket),
    /// Modem status.
    ModemStatus(ModemStatusPacket),
    /// Transmit status.
    TransmitStatus(TransmitStatusPacket),
    /// Received data.
    Receive(ReceivePacket),
    /// Remote AT command response.
    RemoteAtCommandResponse(RemoteAtCommandResponsePacket),
    /// Frame type this library does not model.
    Unknown { frame_type: u8, data: Bytes },
}

impl Packet {
    /// Decodes the API data of a frame with the given frame type.
    ///
    /// Unknown frame types are kept as [`Packet::Unknown`].
    pub fn decode(frame_type: u8, data: &[u8]) -> Result<Self> {
        let Some(kind) = FrameType::from_byte(frame_type) else {
            tracing::debug!("unknown frame type {:#04x}", frame_type);
            return Ok(Self::Unknown {
                frame_type,
                data: Bytes::copy_from_slice(data),
            });
        };

        let packet = match kind {
            FrameType::AtCommand => Self::AtCommand(AtCommandPacket::decode(data)?),
            FrameType::TransmitRequest => {
                Self::TransmitRequest(TransmitRequestPacket::decode(data)?)
            }
            FrameType::RemoteAtCommandRequest => {
                Self::RemoteAtCommand(RemoteAtCommandPacket::decode(data)?)
            }
            FrameType::AtCommandResponse => {
                Self::AtCommandResponse(AtCommandResponsePacket::decode(data)?)
            }
            FrameType::ModemStatus => Self::ModemStatus(ModemStatusPacket::decode(data)?),
            FrameType::TransmitStatus => Self::TransmitStatus(TransmitStatusPacket::decode(data)?),
            FrameType::ReceivePacket => Self::Receive(ReceivePacket::decode(data)?),
            FrameType::RemoteAtCommandResponse => {
                Self::RemoteAtCommandResponse(RemoteAtCommandResponsePacket::decode(data)?)
            }
        };
        Ok(packet)
    }

    /// Decodes a validated frame.
    pub fn from_raw(frame: &RawFrame) -> Result<Self> {
        Self::decode(frame.frame_type, &frame.data)
    }

    /// Returns the frame type byte.
    #[must_use]
    pub fn frame_type_byte(&self) -> u8 {
        match self {
            Self::Unknown { frame_type, .. } => *frame_type,
            _ => self.frame_type().map_or(0, u8::from),
        }
    }

    /// Returns the frame type, or `None` for unknown frames.
    #[must_use]
    pub const fn frame_type(&self) -> Option<FrameType> {
        match self {
            Self::AtCommand(_) => Some(AtCommandPacket::FRAME_TYPE),
            Self::TransmitRequest(_) => Some(TransmitRequestPacket::FRAME_TYPE),
            Self::RemoteAtCommand(_) => Some(RemoteAtCommandPacket::FRAME_TYPE),
            Self::AtCommandResponse(_) => Some(AtCommandResponsePacket::FRAME_TYPE),
            Self::ModemStatus(_) => Some(ModemStatusPacket::FRAME_TYPE),
            Self::TransmitStatus(_) => Some(TransmitStatusPacket::FRAME_TYPE),
            Self::Receive(_) => Some(ReceivePacket::FRAME_TYPE),
            Self::RemoteAtCommandResponse(_) => Some(RemoteAtCommandResponsePacket::FRAME_TYPE),
            Self::Unknown { .. } => None,
        }
    }

    /// Returns true if the payload carries a frame ID.
    #[must_use]
    pub const fn needs_frame_id(&self) -> bool {
        match self {
            Self::AtCommand(_) => AtCommandPacket::NEEDS_FRAME_ID,
            Self::TransmitRequest(_) => TransmitRequestPacket::NEEDS_FRAME_ID,
            Self::RemoteAtCommand(_) => RemoteAtCommandPacket::NEEDS_FRAME_ID,
            Self::AtCommandResponse(_) => AtCommandResponsePacket::NEEDS_FRAME_ID,
            Self::ModemStatus(_) => ModemStatusPacket::NEEDS_FRAME_ID,
            Self::TransmitStatus(_) => TransmitStatusPacket::NEEDS_FRAME_ID,
            Self::Receive(_) => ReceivePacket::NEEDS_FRAME_ID,
            Self::RemoteAtCommandResponse(_) => RemoteAtCommandResponsePacket::NEEDS_FRAME_ID,
            Self::Unknown { .. } => false,
        }
    }

    /// Returns the frame ID, if the payload carries one.
    #[must_use]
    pub fn frame_id(&self) -> Option<u8> {
        match self {
            Self::AtCommand(p) => p.frame_id(),
            Self::TransmitRequest(p) => p.frame_id(),
            Self::RemoteAtCommand(p) => p.frame_id(),
            Self::AtCommandResponse(p) => p.frame_id(),
            Self::ModemStatus(p) => p.frame_id(),
            Self::TransmitStatus(p) => p.frame_id(),
            Self::Receive(p) => p.frame_id(),
            Self::RemoteAtCommandResponse(p) => p.frame_id(),
            Self::Unknown { .. } => None,
        }
    }

    /// Returns the API data (everything after the frame type byte).
    #[must_use]
    pub fn encode_payload(&self) -> Bytes {
        match self {
            Self::AtCommand(p) => p.encode(),
            Self::TransmitRequest(p) => p.encode(),
            Self::RemoteAtCommand(p) => p.encode(),
            Self::AtCommandResponse(p) => p.encode(),
            Self::ModemStatus(p) => p.encode(),
            Self::TransmitStatus(p) => p.encode(),
            Self::Receive(p) => p.encode(),
            Self::RemoteAtCommandResponse(p) => p.encode(),
            Self::Unknown { data, .. } => data.clone(),
        }
    }

    /// Encodes the packet as a complete frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the payload does not fit in a single frame.
    pub fn to_frame(&self, mode: OperatingMode) -> Result<Bytes> {
        Ok(encode_frame(
            self.frame_type_byte(),
            &self.encode_payload(),
            mode,
        )?)
    }

    /// Describes each field for logging.
    #[must_use]
    pub fn parameters(&self) -> Parameters {
        match self {
            Self::AtCommand(p) => p.parameters(),
            Self::TransmitRequest(p) => p.parameters(),
            Self::RemoteAtCommand(p) => p.parameters(),
            Self::AtCommandResponse(p) => p.parameters(),
            Self::ModemStatus(p) => p.parameters(),
            Self::TransmitStatus(p) => p.parameters(),
            Self::Receive(p) => p.parameters(),
            Self::RemoteAtCommandResponse(p) => p.parameters(),
            Self::Unknown { data, .. } => {
                if data.is_empty() {
                    Vec::new()
                } else {
                    vec![("Data", pretty_hex(data))]
                }
            }
        }
    }
}

impl fmt::Display for Packet {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.frame_type().map_or("Unknown", |t| t.name());
        write!(f, "Frame type: {:02X} ({name})", self.frame_type_byte())?;
        for (label, value) in self.parameters() {
            write!(f, "\n{label}: {value}")?;
        }
        Ok(())
    }
}

impl From<AtCommandPacket> for Packet {
    fn from(packet: AtCommandPacket) -> Self {
        Self::AtCommand(packet)
    }
}

impl From<TransmitRequestPacket> for Packet {
    fn from(packet: TransmitRequestPacket) -> Self {
        Self::TransmitRequest(packet)
    }
}

impl From<RemoteAtCommandPacket> for Packet {
    fn from(packet: RemoteAtCommandPacket) -> Self {
        Self::RemoteAtCommand(packet)
    }
}

impl From<AtCommandResponsePacket> for Packet {
    fn from(packet: AtCommandResponsePacket) -> Self {
        Self::AtCommandResponse(packet)
    }
}

impl From<ModemStatusPacket> for Packet {
    fn from(packet: ModemStatusPacket) -> Self {
        Self::ModemStatus(packet)
    }
}

impl From<TransmitStatusPacket> for Packet {
    fn from(packet: TransmitStatusPacket) -> Self {
        Self::TransmitStatus(packet)
    }
}

impl From<ReceivePacket> for Packet {
    fn from(packet: ReceivePacket) -> Self {
        Self::Receive(packet)
    }
}

impl From<RemoteAtCommandResponsePacket> for Packet {
    fn from(packet: RemoteAtCommandResponsePacket) -> Self {
        Self::RemoteAtCommandResponse(packet)
    }
}
