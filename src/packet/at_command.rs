//! Local AT command request and response.

use bytes::{Buf, BufMut, Bytes, BytesMut};

use crate::error::Result;
use crate::packet::{
    ApiPayload, Parameters, byte_param, check_frame_id, command_param, ensure_len, get_command,
    get_status, normalize, optional_bytes, status_param, value_param,
};
use crate::protocol::FrameType;
use crate::types::{AtCommand, AtCommandStatus};

/// AT command for the local module.
///
/// Format:
/// ```text
/// [frame_id:1] [command:2] [parameter...]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCommandPacket {
    frame_id: u8,
    command: AtCommand,
    parameter: Option<Bytes>,
}

impl AtCommandPacket {
    /// Creates a command without a parameter (a query).
    pub fn new(frame_id: impl Into<i64>, command: &str) -> Result<Self> {
        Ok(Self {
            frame_id: check_frame_id(frame_id.into())?,
            command: AtCommand::new(command)?,
            parameter: None,
        })
    }

    /// Creates a command that sets a parameter.
    pub fn with_parameter(
        frame_id: impl Into<i64>,
        command: &str,
        parameter: impl Into<Bytes>,
    ) -> Result<Self> {
        let mut packet = Self::new(frame_id, command)?;
        packet.parameter = normalize(parameter.into());
        Ok(packet)
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

impl ApiPayload for AtCommandPacket {
    const FRAME_TYPE: FrameType = FrameType::AtCommand;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.command.as_bytes());
        if let Some(parameter) = &self.parameter {
            buf.put_slice(parameter);
        }
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, 3)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let command = get_command(Self::FRAME_TYPE, &mut buf)?;

        Ok(Self {
            frame_id,
            command,
            parameter: optional_bytes(buf),
        })
    }

    fn parameters(&self) -> Parameters {
        let mut params = vec![
            ("Frame ID", byte_param(self.frame_id)),
            ("AT Command", command_param(&self.command)),
        ];
        if let Some(parameter) = &self.parameter {
            params.push(("Parameter", value_param(&self.command, parameter)));
        }
        params
    }
}

/// Response of the local module to an [`AtCommandPacket`].
///
/// Format:
/// ```text
/// [frame_id:1] [command:2] [status:1] [value...]
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AtCommandResponsePacket {
    frame_id: u8,
    command: AtCommand,
    status: AtCommandStatus,
    value: Option<Bytes>,
}

impl AtCommandResponsePacket {
    /// Creates a response.
    pub fn new(
        frame_id: impl Into<i64>,
        command: &str,
        status: AtCommandStatus,
        value: Option<Bytes>,
    ) -> Result<Self> {
        Ok(Self {
            frame_id: check_frame_id(frame_id.into())?,
            command: AtCommand::new(command)?,
            status,
            value: value.and_then(normalize),
        })
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
}

impl ApiPayload for AtCommandResponsePacket {
    const FRAME_TYPE: FrameType = FrameType::AtCommandResponse;
    const NEEDS_FRAME_ID: bool = true;

    fn frame_id(&self) -> Option<u8> {
        Some(self.frame_id)
    }

    fn encode_into(&self, buf: &mut BytesMut) {
        buf.put_u8(self.frame_id);
        buf.put_slice(self.command.as_bytes());
        buf.put_u8(self.status as u8);
        if let Some(value) = &self.value {
            buf.put_slice(value);
        }
    }

    fn decode(data: &[u8]) -> Result<Self> {
        ensure_len(Self::FRAME_TYPE, data, 4)?;

        let mut buf = data;
        let frame_id = buf.get_u8();
        let command = get_command(Self::FRAME_TYPE, &mut buf)?;
        let status = get_status(Self::FRAME_TYPE, buf.get_u8())?;

        Ok(Self {
            frame_id,
            command,
            status,
            value: optional_bytes(buf),
        })
    }

    fn parameters(&self) -> Parameters {
        let mut params = vec![
            ("Frame ID", byte_param(self.frame_id)),
            ("AT Command", command_param(&self.command)),
            ("Status", status_param(self.status)),
        ];
        if let Some(value) = &self.value {
            params.push(("Response", value_param(&self.command, value)));
        }
        params
    }
}
