//! API frame type discriminators.
//!
//! The frame type is the first byte after the length field and selects
//! the layout of the rest of the frame.

use std::fmt;

/// Frame types understood by this library.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum FrameType {
    // Requests to the local module
    /// Local AT command, applied immediately.
    AtCommand = 0x08,
    /// Transmit data to a remote node.
    TransmitRequest = 0x10,
    /// AT command for a remote node.
    RemoteAtCommandRequest = 0x17,

    // Frames from the local module
    /// Response to a local AT command.
    AtCommandResponse = 0x88,
    /// Unsolicited modem status.
    ModemStatus = 0x8A,
    /// Delivery status of a transmit request.
    TransmitStatus = 0x8B,
    /// Data received from a remote node.
    ReceivePacket = 0x90,
    /// Response to a remote AT command.
    RemoteAtCommandResponse = 0x97,
}

impl FrameType {
    /// Attempts to parse a frame type from a byte.
    #[must_use]
    pub const fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            0x08 => Some(Self::AtCommand),
            0x10 => Some(Self::TransmitRequest),
            0x17 => Some(Self::RemoteAtCommandRequest),
            0x88 => Some(Self::AtCommandResponse),
            0x8A => Some(Self::ModemStatus),
            0x8B => Some(Self::TransmitStatus),
            0x90 => Some(Self::ReceivePacket),
            0x97 => Some(Self::RemoteAtCommandResponse),
            _ => None,
        }
    }

    /// Returns the frame type name as shown in diagnostics.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        match self {
            Self::AtCommand => "AT Command",
            Self::TransmitRequest => "Transmit Request",
            Self::RemoteAtCommandRequest => "Remote AT Command Request",
            Self::AtCommandResponse => "AT Command Response",
            Self::ModemStatus => "Modem Status",
            Self::TransmitStatus => "Transmit Status",
            Self::ReceivePacket => "Receive Packet",
            Self::RemoteAtCommandResponse => "Remote AT Command Response",
        }
    }

    /// Returns true if the frame is sent by the local module to the host.
    #[must_use]
    pub const fn is_inbound(&self) -> bool {
        (*self as u8) >= 0x80
    }
}

impl From<FrameType> for u8 {
    fn from(frame_type: FrameType) -> Self {
        frame_type as Self
    }
}

impl fmt::Display for FrameType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_type_from_byte() {
        assert_eq!(FrameType::from_byte(0x08), Some(FrameType::AtCommand));
        assert_eq!(
            FrameType::from_byte(0x97),
            Some(FrameType::RemoteAtCommandResponse)
        );
        assert_eq!(FrameType::from_byte(0xFF), None);
    }

    #[test]
    fn test_is_inbound() {
        assert!(!FrameType::AtCommand.is_inbound());
        assert!(!FrameType::RemoteAtCommandRequest.is_inbound());
        assert!(FrameType::ModemStatus.is_inbound());
        assert!(FrameType::RemoteAtCommandResponse.is_inbound());
    }

    #[test]
    fn test_frame_type_conversion() {
        let byte: u8 = FrameType::TransmitRequest.into();
        assert_eq!(byte, 0x10);
        assert_eq!(FrameType::ReceivePacket.to_string(), "Receive Packet");
    }
}
