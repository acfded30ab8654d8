//! Remote AT command request and response.
//!
//! A remote AT command is addressed to another node. The local module
//! forwards it over the air and reports the remote node's answer in a
//! [`RemoteAtCommandResponsePacket`]. Some commands, such as `ND`, produce
//! several responses for a single request.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::{Error, Result};
use crate::packet::{
    ApiPayload, Parameters, byte_param, check_frame_id, command_param, ensure_len,
    get_address16, get_address64, get_command, get_status, normalize, optional_bytes,
    status_param, value_param,
};
use crate::protocol::FrameType;
use crate::types::{Address16, Address64, AtCommand, AtCommandStatus};

/// Remote command option: apply changes immediately.
pub const APPLY_CHANGES: u8 = 0x02;

/// AT command for a remote node.
///
/// Format:
/// ```text
/// [frame_id:1] [dest_addr64:8] [dest_addr16:2] [options:1] [command:2] [parameter...]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAtCommandPacket {
    frame_id: u8,
    dest_address_64: Address64,
    dest_address_16: Address16,
    options: u8,
    command: AtCommand,
    parameter: Option<Bytes>,
}

impl RemoteAtCommandPacket {
    /// Creates a remote command.
    pub fn new(
        frame_id: impl Into<i64>,
        dest_address_64: Address64,
        dest_address_16: Address16,
        options: u8,
        command: &str,
        parameter: Option<Bytes>,
    ) -> Result<Self> {
        Ok(Self {
            frame_id: check_frame_id(frame_id.into())?,
            dest_address_64,
            dest_address_16,
            options,
            command: AtCommand::new(command)?,
            parameter: parameter.and_then(normalize),
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

    /// Returns the command options bit field.
    #[must_use]
    pub const fn options(&self) -> u8 {
        self.options
    }

    /// Returns the AT command.
    #[must_use]
    pub const fn command(&self) -> AtCommand {
        self.command
    }

    /// Returns the parameter, if any.
    #[must_use]
    pub fn parameter(&self) -> Option<&[u8]> {
        self.parameter.as_deref()
    }
}

impl ApiPayload for RemoteAtCommandPacket {
    const FRAME_TYPE: FrameType = FrameType::RemoteAtCommandRequest;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.dest_address_64.as_bytes());
        buf.put_slice(self.dest_address_16.as_bytes());
        buf.put_u8(self.options);
        buf.put_slice(self.command.as_bytes());
        if let Some(parameter) = &self.parameter {
            buf.put_slice(parameter);
        }
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, 14)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let dest_address_64 = get_address64(&mut buf);
        let dest_address_16 = get_address16(&mut buf);
        let options = buf.get_u8();
        let command = get_command(Self::FRAME_TYPE, &mut buf)?;

        Ok(Self {
            frame_id,
            dest_address_64,
            dest_address_16,
            options,
            command,
            parameter: optional_bytes(buf),
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
            ("Command options", format!("{:02X}", self.options)),
            ("AT Command", command_param(&self.command)),
        ];
        if let Some(parameter) = &self.parameter {
            params.push(("Parameter", value_param(&self.command, parameter)));
        }
        params
    }
}

/// Response of a remote node to a [`RemoteAtCommandPacket`].
///
/// Format:
/// ```text
/// [frame_id:1] [source_addr64:8] [source_addr16:2] [command:2] [status:1] [value...]
/// ```
///
/// All fields except the value are fixed at construction. The value may be
/// attached or replaced later, since it is often filled in after the
/// response has been received.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RemoteAtCommandResponsePacket {
    frame_id: u8,
    source_address_64: Address64,
    source_address_16: Address16,
    command: AtCommand,
    status: AtCommandStatus,
    value: Option<Bytes>,
}

impl RemoteAtCommandResponsePacket {
    /// Minimum size of the API data: frame ID, addresses, command and status.
    pub const MIN_LEN: usize = 1 + 8 + 2 + 2 + 1;

    /// Starts building a response.
    #[must_use]
    pub fn builder() -> RemoteAtCommandResponseBuilder {
        RemoteAtCommandResponseBuilder::default()
    }

    /// Returns the 64-bit address of the responding node.
    #[must_use]
    pub const fn source_address_64(&self) -> Address64 {
        self.source_address_64
    }

    /// Returns the 16-bit address of the responding node.
    #[must_use]
    pub const fn source_address_16(&self) -> Address16 {
        self.source_address_16
    }

    /// Returns the AT command.
    #[must_use]
    pub const fn command(&self) -> AtCommand {
        self.command
    }

    /// Returns the command status.
    #[must_use]
    pub const fn status(&self) -> AtCommandStatus {
        self.status
    }

    /// Returns the response value, if any.
    #[must_use]
    pub fn value(&self) -> Option<&[u8]> {
        self.value.as_deref()
    }

    /// Returns the response value as text, if any.
    #[must_use]
    pub fn value_as_string(&self) -> Option<String> {
        self.value
            .as_ref()
            .map(|v| String::from_utf8_lossy(v).into_owned())
    }

    /// Replaces the response value. An empty value clears it.
    pub fn set_value(&mut self, value: impl Into<Bytes>) {
        self.value = normalize(value.into());
    }

    /// Replaces the response value with the bytes of `value`.
    pub fn set_value_str(&mut self, value: &str) {
        self.set_value(Bytes::copy_from_slice(value.as_bytes()));
    }

    /// Removes the response value.
    pub fn clear_value(&mut self) {
        self.value = None;
    }
}

impl ApiPayload for RemoteAtCommandResponsePacket {
    const FRAME_TYPE: FrameType = FrameType::RemoteAtCommandResponse;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.source_address_64.as_bytes());
        buf.put_slice(self.source_address_16.as_bytes());
        buf.put_slice(self.command.as_bytes());
        buf.put_u8(self.status as u8);
        if let Some(value) = &self.value {
            buf.put_slice(value);
        }
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, Self::MIN_LEN)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let source_address_64 = get_address64(&mut buf);
        let source_address_16 = get_address16(&mut buf);
        let command = get_command(Self::FRAME_TYPE, &mut buf)?;
        let status = get_status(Self::FRAME_TYPE, buf.get_u8())?;

        Ok(Self {
            frame_id,
            source_address_64,
            source_address_16,
            command,
            status,
            value: optional_bytes(buf),
        })
    }

    fn parameters(&self) -> Parameters {
        let mut params = vec![
            ("Frame ID", byte_param(self.frame_id)),
            (
                "64-bit source address",
                self.source_address_64.to_pretty_string(),
            ),
            (
                "16-bit source address",
                self.source_address_16.to_pretty_string(),
            ),
            ("AT Command", command_param(&self.command)),
            ("Status", status_param(self.status)),
        ];
        if let Some(value) = &self.value {
            params.push(("Response", value_param(&self.command, value)));
        }
        params
    }
}

/// Builder for [`RemoteAtCommandResponsePacket`].
///
/// All fields except the frame ID (default 0) and the value are required.
#[derive(Debug, Clone, Default)]
pub struct RemoteAtCommandResponseBuilder {
    frame_id: i64,
    source_address_64: Option<Address64>,
    source_address_16: Option<Address16>,
    command: Option<String>,
    status: Option<AtCommandStatus>,
    value: Option<Bytes>,
}

impl RemoteAtCommandResponseBuilder {
    /// Sets the frame ID. Must be within `0..=255`.
    #[must_use]
    pub fn frame_id(mut self, frame_id: impl Into<i64>) -> Self {
        self.frame_id = frame_id.into();
        self
    }

    /// Sets the 64-bit address of the responding node.
    #[must_use]
    pub const fn source_address_64(mut self, address: Address64) -> Self {
        self.source_address_64 = Some(address);
        self
    }

    /// Sets the 16-bit address of the responding node.
    #[must_use]
    pub const fn source_address_16(mut self, address: Address16) -> Self {
        self.source_address_16 = Some(address);
        self
    }

    /// Sets the AT command.
    #[must_use]
    pub fn command(mut self, command: impl Into<String>) -> Self {
        self.command = Some(command.into());
        self
    }

    /// Sets the command status.
    #[must_use]
    pub const fn status(mut self, status: AtCommandStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// Sets the response value.
    #[must_use]
    pub fn value(mut self, value: impl Into<Bytes>) -> Self {
        self.value = Some(value.into());
        self
    }

    /// Validates the fields and builds the packet.
    ///
    /// # Errors
    ///
    /// Returns [`Error::MissingArgument`] naming the first missing field,
    /// [`Error::OutOfRange`] for a frame ID outside `0..=255`, or
    /// [`Error::InvalidAtCommand`] for a command that is not two ASCII
    /// characters.
    pub fn build(self) -> Result<RemoteAtCommandResponsePacket> {
        let source_address_64 = self.source_address_64.ok_or(Error::MissingArgument {
            field: "64-bit source address",
        })?;
        let source_address_16 = self.source_address_16.ok_or(Error::MissingArgument {
            field: "16-bit source address",
        })?;
        let command = self.command.ok_or(Error::MissingArgument {
            field: "AT command",
        })?;
        let status = self.status.ok_or(Error::MissingArgument {
            field: "AT command status",
        })?;
        let frame_id = check_frame_id(self.frame_id)?;
        let command = AtCommand::new(&command)?;

        Ok(RemoteAtCommandResponsePacket {
            frame_id,
            source_address_64,
            source_address_16,
            command,
            status,
            value: self.value.and_then(normalize),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::FrameError;

    const ND_RESPONSE: [u8; 14] = [
        0x01, 0x00, 0x13, 0xA2, 0x00, 0x40, 0xA0, 0x4D, 0x2D, 0xFF, 0xFE, 0x4E, 0x44, 0x00,
    ];

    fn builder() -> RemoteAtCommandResponseBuilder {
        RemoteAtCommandResponsePacket::builder()
            .frame_id(1)
            .source_address_64(Address64::from_hex("0013A20040A04D2D").unwrap())
            .source_address_16(Address16::UNKNOWN)
            .command("ND")
            .status(AtCommandStatus::Ok)
    }

    #[test]
    fn test_encode_node_discovery_response() {
        let packet = builder().build().unwrap();
        assert_eq!(&packet.encode()[..], &ND_RESPONSE);
        assert!(RemoteAtCommandResponsePacket::NEEDS_FRAME_ID);
        assert_eq!(packet.frame_id(), Some(1));
    }

    #[test]
    fn test_decode_node_discovery_response() {
        let packet = RemoteAtCommandResponsePacket::decode(&ND_RESPONSE).unwrap();
        assert_eq!(packet.frame_id(), Some(1));
        assert_eq!(packet.source_address_64().to_string(), "0013A20040A04D2D");
        assert_eq!(packet.source_address_16(), Address16::UNKNOWN);
        assert_eq!(packet.command().as_str(), "ND");
        assert_eq!(packet.status(), AtCommandStatus::Ok);
        assert_eq!(packet.value(), None);
        assert_eq!(packet, builder().build().unwrap());
    }

    #[test]
    fn test_encoded_layout() {
        let value = [0x01, 0x02, 0x03];
        let packet = builder()
            .frame_id(0xFF)
            .status(AtCommandStatus::InvalidParameter)
            .value(Bytes::copy_from_slice(&value))
            .build()
            .unwrap();
        let encoded = packet.encode();

        assert_eq!(encoded.len(), 1 + 8 + 2 + 2 + 1 + value.len());
        assert_eq!(encoded[0], 0xFF);
        assert_eq!(&encoded[1..9], packet.source_address_64().as_bytes());
        assert_eq!(&encoded[9..11], packet.source_address_16().as_bytes());
        assert_eq!(&encoded[11..13], b"ND");
        assert_eq!(encoded[13], 0x03);
        assert_eq!(&encoded[14..], &value);
    }

    #[test]
    fn test_roundtrip_with_value() {
        let packet = builder()
            .command("NI")
            .value("Router 1")
            .build()
            .unwrap();
        let decoded = RemoteAtCommandResponsePacket::decode(&packet.encode()).unwrap();
        assert_eq!(decoded, packet);
        assert_eq!(decoded.value_as_string().as_deref(), Some("Router 1"));
    }

    #[test]
    fn test_empty_value_is_absent() {
        let packet = builder().value(Bytes::new()).build().unwrap();
        assert_eq!(packet.value(), None);
        assert_eq!(packet.encode().len(), RemoteAtCommandResponsePacket::MIN_LEN);
        assert_eq!(
            RemoteAtCommandResponsePacket::decode(&packet.encode()).unwrap(),
            packet
        );
    }

    #[test]
    fn test_frame_id_out_of_range() {
        for frame_id in [-1_i64, 256, 1000, i64::MIN] {
            let err = builder().frame_id(frame_id).build().unwrap_err();
            assert!(matches!(
                err,
                Error::OutOfRange {
                    field: "frame ID",
                    min: 0,
                    max: 255,
                    ..
                }
            ));
        }
        assert!(builder().frame_id(0).build().is_ok());
        assert!(builder().frame_id(255).build().is_ok());
    }

    #[test]
    fn test_missing_fields() {
        let cases = [
            (
                RemoteAtCommandResponseBuilder {
                    source_address_64: None,
                    ..builder()
                },
                "64-bit source address",
            ),
            (
                RemoteAtCommandResponseBuilder {
                    source_address_16: None,
                    ..builder()
                },
                "16-bit source address",
            ),
            (
                RemoteAtCommandResponseBuilder {
                    command: None,
                    ..builder()
                },
                "AT command",
            ),
            (
                RemoteAtCommandResponseBuilder {
                    status: None,
                    ..builder()
                },
                "AT command status",
            ),
        ];

        for (incomplete, expected) in cases {
            match incomplete.build() {
                Err(Error::MissingArgument { field }) => assert_eq!(field, expected),
                other => panic!("expected missing {expected}, got {other:?}"),
            }
        }
    }

    #[test]
    fn test_empty_and_invalid_command() {
        assert!(matches!(
            builder().command("").build(),
            Err(Error::MissingArgument {
                field: "AT command"
            })
        ));
        assert!(matches!(
            builder().command("NDX").build(),
            Err(Error::InvalidAtCommand { .. })
        ));
    }

    #[test]
    fn test_decode_too_short() {
        for len in 0..RemoteAtCommandResponsePacket::MIN_LEN {
            let err = RemoteAtCommandResponsePacket::decode(&ND_RESPONSE[..len]).unwrap_err();
            assert!(matches!(err, Error::Frame(FrameError::Malformed { .. })));
        }
    }

    #[test]
    fn test_decode_unknown_status() {
        let mut data = ND_RESPONSE;
        data[13] = 0xAA;
        assert!(matches!(
            RemoteAtCommandResponsePacket::decode(&data),
            Err(Error::Frame(FrameError::Malformed { .. }))
        ));
    }

    #[test]
    fn test_set_value() {
        let mut packet = builder().build().unwrap();

        packet.set_value_str("hello");
        assert_eq!(packet.value_as_string().as_deref(), Some("hello"));
        assert_eq!(packet.value(), Some(&b"hello"[..]));

        packet.set_value(vec![0x00_u8, 0xFF]);
        assert_eq!(packet.value(), Some(&[0x00, 0xFF][..]));

        packet.clear_value();
        assert_eq!(packet.value(), None);
        assert_eq!(packet.value_as_string(), None);
    }

    #[test]
    fn test_parameters_without_value() {
        let params = builder().build().unwrap().parameters();
        assert_eq!(
            params,
            vec![
                ("Frame ID", "01 (1)".to_string()),
                ("64-bit source address", "00 13 A2 00 40 A0 4D 2D".to_string()),
                ("16-bit source address", "FF FE".to_string()),
                ("AT Command", "4E 44 (ND)".to_string()),
                ("Status", "00 (Status OK)".to_string()),
            ]
        );
    }

    #[test]
    fn test_parameters_with_value() {
        let mut packet = builder().build().unwrap();
        packet.set_value(vec![0xAB_u8, 0xCD]);
        let params = packet.parameters();
        assert_eq!(params.len(), 6);
        assert_eq!(params[5], ("Response", "AB CD".to_string()));

        let packet = builder().command("NI").value("node").build().unwrap();
        assert_eq!(
            packet.parameters()[5],
            ("Response", "6E 6F 64 65 (node)".to_string())
        );
    }

    #[test]
    fn test_remote_command_roundtrip() {
        let packet = RemoteAtCommandPacket::new(
            0x10,
            Address64::from_hex("0013A20040A04D2D").unwrap(),
            Address16::UNKNOWN,
            APPLY_CHANGES,
            "D0",
            Some(Bytes::from_static(&[0x05])),
        )
        .unwrap();

        let encoded = packet.encode();
        assert_eq!(
            &encoded[..],
            &[
                0x10, 0x00, 0x13, 0xA2, 0x00, 0x40, 0xA0, 0x4D, 0x2D, 0xFF, 0xFE, 0x02, b'D', b'0',
                0x05
            ]
        );
        assert_eq!(RemoteAtCommandPacket::decode(&encoded).unwrap(), packet);
        assert_eq!(packet.parameters().len(), 6);
    }

    #[test]
    fn test_remote_command_too_short() {
        assert!(RemoteAtCommandPacket::decode(&[0x10; 13]).is_err());
    }
}
