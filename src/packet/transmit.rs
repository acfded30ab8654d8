//! Data transmission: transmit request, transmit status and receive packet.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::packet::{
    ApiPayload, Parameters, byte_param, check_frame_id, ensure_exact_len, ensure_len,
    get_address16, get_address64, get_status, status_param,
};
use crate::protocol::FrameType;
use crate::types::{Address16, Address64, DeliveryStatus, DiscoveryStatus, pretty_hex};

/// Request to send RF data to a remote node.
///
/// Format:
/// ```text
/// [frame_id:1] [dest_addr64:8] [dest_addr16:2] [radius:1] [options:1] [data...]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransmitRequestPacket {
    frame_id: u8,
    dest_address_64: Address64,
    dest_address_16: Address16,
    broadcast_radius: u8,
    options: u8,
    data: Bytes,
}

impl TransmitRequestPacket {
    /// Creates a transmit request.
    ///
    /// A broadcast radius of 0 uses the network's maximum hop count.
    pub fn new(
        frame_id: impl Into<i64>,
        dest_address_64: Address64,
        dest_address_16: Address16,
        broadcast_radius: u8,
        options: u8,
        data: impl Into<Bytes>,
    ) -> Result<Self> {
        Ok(Self {
            frame_id: check_frame_id(frame_id.into())?,
            dest_address_64,
            dest_address_16,
            broadcast_radius,
            options,
            data: data.into(),
        })
    }

    /// Returns the 64-bit destination address.
    #[must_use]
    pub const fn dest_address_64(&self) -> Address64 {
        self.dest_address_64
    }

    /// Returns the 16-bit destination address.
    #[must_use]
    pub const fn dest_address_16(&self) -> Address16 {
        self.dest_address_16
    }

    /// Returns the maximum number of hops for broadcasts.
    #[must_use]
    pub const fn broadcast_radius(&self) -> u8 {
        self.broadcast_radius
    }

    /// Returns the transmit options bit field.
    #[must_use]
    pub const fn options(&self) -> u8 {
        self.options
    }

    /// Returns the RF data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ApiPayload for TransmitRequestPacket {
    const FRAME_TYPE: FrameType = FrameType::TransmitRequest;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.dest_address_64.as_bytes());
        buf.put_slice(self.dest_address_16.as_bytes());
        buf.put_u8(self.broadcast_radius);
        buf.put_u8(self.options);
        buf.put_slice(&self.data);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, 13)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let dest_address_64 = get_address64(&mut buf);
        let dest_address_16 = get_address16(&mut buf);
        let broadcast_radius = buf.get_u8();
        let options = buf.get_u8();

        Ok(Self {
            frame_id,
            dest_address_64,
            dest_address_16,
            broadcast_radius,
            options,
            data: Bytes::copy_from_slice(buf),
        })
    }

    fn parameters(&self) -> Parameters {
        let mut params = vec![
            ("Frame ID", byte_param(self.frame_id)),
            (
                "64-bit dest. address",
                self.dest_address_64.to_pretty_string(),
            ),
            (
                "16-bit dest. address",
                self.dest_address_16.to_pretty_string(),
            ),
            ("Broadcast radius", byte_param(self.broadcast_radius)),
            ("Options", format!("{:02X}", self.options)),
        ];
        if !self.data.is_empty() {
            params.push(("RF data", pretty_hex(&self.data)));
        }
        params
    }
}

/// Delivery report for a [`TransmitRequestPacket`].
///
/// Format:
/// ```text
/// [frame_id:1] [dest_addr16:2] [retries:1] [delivery_status:1] [discovery_status:1]
/// ```
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TransmitStatusPacket {
    frame_id: u8,
    dest_address_16: Address16,
    retry_count: u8,
    delivery_status: DeliveryStatus,
    discovery_status: DiscoveryStatus,
}

impl TransmitStatusPacket {
    /// Creates a transmit status.
    pub fn new(
        frame_id: impl Into<i64>,
        dest_address_16: Address16,
        retry_count: u8,
        delivery_status: DeliveryStatus,
        discovery_status: DiscoveryStatus,
    ) -> Result<Self> {
        Ok(Self {
            frame_id: check_frame_id(frame_id.into())?,
            dest_address_16,
            retry_count,
            delivery_status,
            discovery_status,
        })
    }

    /// Returns the 16-bit address the data was delivered to.
    #[must_use]
    pub const fn dest_address_16(&self) -> Address16 {
        self.dest_address_16
    }

    /// Returns the number of application retries.
    #[must_use]
    pub const fn retry_count(&self) -> u8 {
        self.retry_count
    }

    /// Returns the delivery outcome.
    #[must_use]
    pub const fn delivery_status(&self) -> DeliveryStatus {
        self.delivery_status
    }

    /// Returns the route discovery overhead.
    #[must_use]
    pub const fn discovery_status(&self) -> DiscoveryStatus {
        self.discovery_status
    }
}

impl ApiPayload for TransmitStatusPacket {
    const FRAME_TYPE: FrameType = FrameType::TransmitStatus;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.dest_address_16.as_bytes());
        buf.put_u8(self.retry_count);
        buf.put_u8(self.delivery_status as u8);
        buf.put_u8(self.discovery_status as u8);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_exact_len(Self::FRAME_TYPE, data, 6)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let dest_address_16 = get_address16(&mut buf);
        let retry_count = buf.get_u8();
        let delivery_status = get_status(Self::FRAME_TYPE, buf.get_u8())?;
        let discovery_status = get_status(Self::FRAME_TYPE, buf.get_u8())?;

        Ok(Self {
            frame_id,
            dest_address_16,
            retry_count,
            delivery_status,
            discovery_status,
        })
    }

    fn parameters(&self) -> Parameters {
        vec![
            ("Frame ID", byte_param(self.frame_id)),
            (
                "16-bit dest. address",
                self.dest_address_16.to_pretty_string(),
            ),
            ("Tx. retry count", byte_param(self.retry_count)),
            ("Delivery status", status_param(self.delivery_status)),
            ("Discovery status", status_param(self.discovery_status)),
        ]
    }
}

/// RF data received from a remote node.
///
/// Format:
/// ```text
/// [source_addr64:8] [source_addr16:2] [options:1] [data...]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReceivePacket {
    source_address_64: Address64,
    source_address_16: Address16,
    options: u8,
    data: Bytes,
}

impl ReceivePacket {
    /// Receive option: packet was acknowledged.
    pub const OPTION_ACKNOWLEDGED: u8 = 0x01;

    /// Receive option: packet was a broadcast.
    pub const OPTION_BROADCAST: u8 = 0x02;

    /// Creates a receive packet.
    #[must_use]
    pub fn new(
        source_address_64: Address64,
        source_address_16: Address16,
        options: u8,
        data: impl Into<Bytes>,
    ) -> Self {
        Self {
            source_address_64,
            source_address_16,
            options,
            data: data.into(),
        }
    }

    /// Returns the 64-bit address of the sender.
    #[must_use]
    pub const fn source_address_64(&self) -> Address64 {
        self.source_address_64
    }

    /// Returns the 16-bit address of the sender.
    #[must_use]
    pub const fn source_address_16(&self) -> Address16 {
        self.source_address_16
    }

    /// Returns the receive options bit field.
    #[must_use]
    pub const fn options(&self) -> u8 {
        self.options
    }

    /// Returns true if the packet was sent as a broadcast.
    #[must_use]
    pub const fn is_broadcast(&self) -> bool {
        self.options & Self::OPTION_BROADCAST != 0
    }

    /// Returns the RF data.
    #[must_use]
    pub fn data(&self) -> &[u8] {
        &self.data
    }
}

impl ApiPayload for ReceivePacket {
    const FRAME_TYPE: FrameType = FrameType::ReceivePacket;
    const NEEDS_FRAME_ID: bool = false;

    fn frame_id(&self) -> Option<u8> {
        None
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_slice(self.source_address_64.as_bytes());
        buf.put_slice(self.source_address_16.as_bytes());
        buf.put_u8(self.options);
        buf.put_slice(&self.data);
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, 11)?;

        let mut buf = data;
        let source_address_64 = get_address64(&mut buf);
        let source_address_16 = get_address16(&mut buf);
        let options = buf.get_u8();

        Ok(Self {
            source_address_64,
            source_address_16,
            options,
            data: Bytes::copy_from_slice(buf),
        })
    }

    fn parameters(&self) -> Parameters {
        let mut params = vec![
            (
                "64-bit source address",
                self.source_address_64.to_pretty_string(),
            ),
            (
                "16-bit source address",
                self.source_address_16.to_pretty_string(),
            ),
            ("Receive options", format!("{:02X}", self.options)),
        ];
        if !self.data.is_empty() {
            params.push(("RF data", pretty_hex(&self.data)));
        }
        params
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{Error, FrameError};

    #[test]
    fn test_transmit_request_encode() {
        let packet = TransmitRequestPacket::new(
            0x01,
            Address64::BROADCAST,
            Address16::UNKNOWN,
            0,
            0,
            "Hi",
        )
        .unwrap();

        assert_eq!(
            &packet.encode()[..],
            &[
                0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x00, 0xFF, 0xFF, 0xFF, 0xFE, 0x00, 0x00, b'H',
                b'i'
            ]
        );
        assert_eq!(TransmitRequestPacket::decode(&packet.encode()).unwrap(), packet);
    }

    #[test]
    fn test_transmit_request_without_data() {
        let packet = TransmitRequestPacket::new(
            1,
            Address64::COORDINATOR,
            Address16::COORDINATOR,
            0,
            0,
            Bytes::new(),
        )
        .unwrap();
        assert_eq!(packet.encode().len(), 13);
        assert_eq!(packet.parameters().len(), 5);
        assert_eq!(TransmitRequestPacket::decode(&packet.encode()).unwrap(), packet);
    }

    #[test]
    fn test_transmit_request_frame_id_range() {
        assert!(
            TransmitRequestPacket::new(-5, Address64::BROADCAST, Address16::UNKNOWN, 0, 0, "x")
                .is_err()
        );
    }

    #[test]
    fn test_transmit_status_decode() {
        let packet = TransmitStatusPacket::decode(&[0x47, 0x12, 0x34, 0x02, 0x24, 0x01]).unwrap();
        assert_eq!(packet.frame_id(), Some(0x47));
        assert_eq!(packet.dest_address_16(), Address16::from(0x1234_u16));
        assert_eq!(packet.retry_count(), 2);
        assert_eq!(packet.delivery_status(), DeliveryStatus::AddressNotFound);
        assert_eq!(packet.discovery_status(), DiscoveryStatus::Address);
        assert_eq!(
            packet.parameters()[3],
            ("Delivery status", "24 (Address not found)".to_string())
        );
        assert_eq!(
            &packet.encode()[..],
            &[0x47, 0x12, 0x34, 0x02, 0x24, 0x01]
        );
    }

    #[test]
    fn test_transmit_status_malformed() {
        assert!(TransmitStatusPacket::decode(&[0x47, 0x12, 0x34, 0x02, 0x24]).is_err());
        assert!(TransmitStatusPacket::decode(&[0x47, 0x12, 0x34, 0x02, 0xAA, 0x01]).is_err());
    }

    #[test]
    fn test_transmit_status_trailing_bytes() {
        let err =
            TransmitStatusPacket::decode(&[0x47, 0x12, 0x34, 0x02, 0x00, 0x01, 0xFF, 0xFF])
                .unwrap_err();
        assert!(matches!(
            err,
            Error::Frame(FrameError::Malformed {
                frame_type: "Transmit Status",
                ..
            })
        ));
    }

    #[test]
    fn test_receive_packet() {
        let data = [
            0x00, 0x13, 0xA2, 0x00, 0x40, 0x52, 0x2B, 0xAA, 0x7D, 0x84, 0x02, b'T', b'x',
        ];
        let packet = ReceivePacket::decode(&data).unwrap();
        assert_eq!(packet.source_address_64().to_u64(), 0x0013_A200_4052_2BAA);
        assert_eq!(packet.source_address_16().to_u16(), 0x7D84);
        assert!(packet.is_broadcast());
        assert_eq!(packet.data(), b"Tx");
        assert_eq!(packet.frame_id(), None);
        assert!(!ReceivePacket::NEEDS_FRAME_ID);
        assert_eq!(&packet.encode()[..], &data);
        assert_eq!(packet.parameters()[3], ("RF data", "54 78".to_string()));
    }

    #[test]
    fn test_receive_packet_too_short() {
        assert!(ReceivePacket::decode(&[0u8; 10]).is_err());
    }
}
