//! Modem status notification.

use bytes::{BufMut, BytesMut};

use crate::error::Result;
use crate::packet::{ApiPayload, Parameters, ensure_exact_len, get_status, status_param};
use crate::protocol::FrameType;
use crate::types::ModemStatus;

/// Unsolicited status change reported by the local module.
///
/// Format:
/// ```text
/// [status:1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ModemStatusPacket {
    status: ModemStatus,
}

impl ModemStatusPacket {
    /// Creates a modem status notification.
    #[must_use]
    pub const fn new(status: ModemStatus) -> Self {
        Self { status }
    }

    /// Returns the reported status.
    #[must_use]
    pub const fn status(&self) -> ModemStatus {
        self.status
    }
}

impl ApiPayload for ModemStatusPacket {
    const FRAME_TYPE: FrameType = FrameType::ModemStatus;
    const NEEDS_FRAME_ID: bool = false;

    fn frame_id(&self) -> Option<u8> {
        None
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.status as u8);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_exact_len(Self::FRAME_TYPE, data, 1)?;
        Ok(Self::new(get_status(Self::FRAME_TYPE, data[0])?))
    }

    fn parameters(&self) -> Parameters {
        vec![("Status", status_param(self.status))]
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FrameError};

    #[test]
    fn test_modem_status() {
        let packet = ModemStatusPacket::decode(&[0x00]).unwrap();
        assert_eq!(packet.status(), ModemStatus::HardwareReset);
        assert_eq!(&packet.encode()[..], &[0x00]);
        assert_eq!(
            packet.parameters(),
            vec![("Status", "00 (Device was reset)".to_string())]
        );
    }

    #[test]
    fn test_modem_status_invalid() {
        assert!(ModemStatusPacket::decode(&[]).is_err());
        assert!(ModemStatusPacket::decode(&[0x55]).is_err());
    }

    #[test]
    fn test_modem_status_trailing_bytes() {
        assert!(matches!(
            ModemStatusPacket::decode(&[0x02, 0xDE, 0xAD]),
            Err(Error::Frame(FrameError::Malformed {
                frame_type: "Modem Status",
                ..
            }))
        ));
    }

    #[test]
    fn test_modem_status_xbee3_codes() {
        let packet = ModemStatusPacket::decode(&[0x32]).unwrap();
        assert_eq!(packet.status(), ModemStatus::BluetoothConnected);
        assert_eq!(&packet.encode()[..], &[0x32]);
        assert_eq!(
            ModemStatusPacket::decode(&[0x35]).unwrap().status(),
            ModemStatus::CellularUpdateStarted
        );
    }
}
