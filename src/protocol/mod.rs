//! Wire-level protocol for XBee API frames.
//!
//! This module contains:
//! - Frame type discriminators
//! - Frame encoding and streaming decoding, in both API operating modes

pub mod frame;
pub mod frame_type;

pub use frame::{
    FrameDecoder, MAX_FRAME_DATA, OperatingMode, RawFrame, START_DELIMITER, checksum,
    encode as encode_frame,
};
pub use frame_type::FrameType;
