//! 16-bit and 64-bit XBee addresses.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of a 64-bit address in bytes.
pub const ADDRESS_64_LEN: usize = 8;

/// Length of a 16-bit address in bytes.
pub const ADDRESS_16_LEN: usize = 2;

/// Formats bytes as uppercase hex pairs separated by single spaces.
///
/// Used for diagnostics only; the canonical form has no separators.
#[must_use]
pub fn pretty_hex(bytes: &[u8]) -> String {
    bytes
        .iter()
        .map(|b| format!("{b:02X}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Parses hex text into a fixed-width array.
///
/// Accepts an optional `0x` prefix. Shorter input is left-padded with zeros.
fn parse_hex<const N: usize>(text: &str) -> Result<[u8; N]> {
    let digits = text
        .strip_prefix("0x")
        .or_else(|| text.strip_prefix("0X"))
        .unwrap_or(text);

    if digits.is_empty() {
        return Err(Error::InvalidAddress {
            reason: "empty hex string".into(),
        });
    }
    if digits.len() > N * 2 {
        return Err(Error::InvalidAddress {
            reason: format!(
                "{digits:?} has {} hex digits, at most {} allowed",
                digits.len(),
                N * 2
            ),
        });
    }

    let padded = format!("{digits:0>width$}", width = N * 2);
    let mut out = [0u8; N];
    hex::decode_to_slice(&padded, &mut out).map_err(|e| Error::InvalidAddress {
        reason: format!("{digits:?}: {e}"),
    })?;
    Ok(out)
}

fn exact<const N: usize>(bytes: &[u8]) -> Result<[u8; N]> {
    <[u8; N]>::try_from(bytes).map_err(|_| Error::InvalidAddress {
        reason: format!("expected {N} bytes, got {}", bytes.len()),
    })
}

/// A 64-bit (IEEE extended) device address, stored big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address64([u8; ADDRESS_64_LEN]);

impl Address64 {
    /// Address of the network coordinator.
    pub const COORDINATOR: Self = Self([0; ADDRESS_64_LEN]);

    /// Broadcast address.
    pub const BROADCAST: Self = Self([0, 0, 0, 0, 0, 0, 0xFF, 0xFF]);

    /// Placeholder used when the 64-bit address is not known.
    pub const UNKNOWN: Self = Self([0xFF; ADDRESS_64_LEN]);

    /// Creates an address from its 8 bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_64_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice that must be exactly 8 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        exact(bytes).map(Self)
    }

    /// Parses an address from hex text, e.g. `0013A20040A04D2D`.
    pub fn from_hex(text: &str) -> Result<Self> {
        parse_hex(text).map(Self)
    }

    /// Returns the address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_64_LEN] {
        &self.0
    }

    /// Returns the address as a big-endian integer.
    #[must_use]
    pub const fn to_u64(self) -> u64 {
        u64::from_be_bytes(self.0)
    }

    /// Returns the address as spaced hex, e.g. `00 13 A2 00 40 A0 4D 2D`.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        pretty_hex(&self.0)
    }
}

impl From<u64> for Address64 {
    fn from(value: u64) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<[u8; ADDRESS_64_LEN]> for Address64 {
    fn from(bytes: [u8; ADDRESS_64_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address64 {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl FromStr for Address64 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address64 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

/// A 16-bit network address, stored big-endian.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Address16([u8; ADDRESS_16_LEN]);

impl Address16 {
    /// Address of the network coordinator.
    pub const COORDINATOR: Self = Self([0, 0]);

    /// Broadcast address.
    pub const BROADCAST: Self = Self([0xFF, 0xFF]);

    /// Placeholder used when the 16-bit address is not known.
    pub const UNKNOWN: Self = Self([0xFF, 0xFE]);

    /// Creates an address from its 2 bytes.
    #[must_use]
    pub const fn new(bytes: [u8; ADDRESS_16_LEN]) -> Self {
        Self(bytes)
    }

    /// Creates an address from a slice that must be exactly 2 bytes long.
    pub fn from_slice(bytes: &[u8]) -> Result<Self> {
        exact(bytes).map(Self)
    }

    /// Parses an address from hex text, e.g. `FFFE`.
    pub fn from_hex(text: &str) -> Result<Self> {
        parse_hex(text).map(Self)
    }

    /// Returns the address bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; ADDRESS_16_LEN] {
        &self.0
    }

    /// Returns the address as a big-endian integer.
    #[must_use]
    pub const fn to_u16(self) -> u16 {
        u16::from_be_bytes(self.0)
    }

    /// Returns the address as spaced hex, e.g. `FF FE`.
    #[must_use]
    pub fn to_pretty_string(&self) -> String {
        pretty_hex(&self.0)
    }
}

impl From<u16> for Address16 {
    fn from(value: u16) -> Self {
        Self(value.to_be_bytes())
    }
}

impl From<[u8; ADDRESS_16_LEN]> for Address16 {
    fn from(bytes: [u8; ADDRESS_16_LEN]) -> Self {
        Self(bytes)
    }
}

impl TryFrom<&[u8]> for Address16 {
    type Error = Error;

    fn try_from(bytes: &[u8]) -> Result<Self> {
        Self::from_slice(bytes)
    }
}

impl FromStr for Address16 {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::from_hex(s)
    }
}

impl fmt::Display for Address16 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&hex::encode_upper(self.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_address64_from_hex() {
        let addr = Address64::from_hex("0013A20040A04D2D").unwrap();
        assert_eq!(
            addr.as_bytes(),
            &[0x00, 0x13, 0xA2, 0x00, 0x40, 0xA0, 0x4D, 0x2D]
        );
        assert_eq!(addr.to_string(), "0013A20040A04D2D");
        assert_eq!(addr.to_pretty_string(), "00 13 A2 00 40 A0 4D 2D");
    }

    #[test]
    fn test_address64_hex_prefix_and_padding() {
        assert_eq!(Address64::from_hex("0xFFFF").unwrap(), Address64::BROADCAST);
        assert_eq!(Address64::from_hex("0").unwrap(), Address64::COORDINATOR);
        assert_eq!(
            Address64::from_hex("0013a20040a04d2d").unwrap(),
            Address64::from(0x0013_A200_40A0_4D2D_u64)
        );
    }

    #[test]
    fn test_address64_invalid_hex() {
        assert!(matches!(
            Address64::from_hex(""),
            Err(Error::InvalidAddress { .. })
        ));
        assert!(matches!(
            Address64::from_hex("0013A20040A04D2D00"),
            Err(Error::InvalidAddress { .. })
        ));
        assert!(matches!(
            Address64::from_hex("0013A2004ZA04D2D"),
            Err(Error::InvalidAddress { .. })
        ));
    }

    #[test]
    fn test_address64_from_slice() {
        let addr = Address64::from_slice(&[0xFF; 8]).unwrap();
        assert_eq!(addr, Address64::UNKNOWN);
        assert!(Address64::from_slice(&[0u8; 7]).is_err());
        assert!(Address64::from_slice(&[0u8; 9]).is_err());
    }

    #[test]
    fn test_address16_round_values() {
        let addr = Address16::from_hex("FFFE").unwrap();
        assert_eq!(addr, Address16::UNKNOWN);
        assert_eq!(addr.to_u16(), 0xFFFE);
        assert_eq!(addr.to_string(), "FFFE");
        assert_eq!(addr.to_pretty_string(), "FF FE");
        assert_eq!(Address16::from(0x1234_u16).as_bytes(), &[0x12, 0x34]);
        assert_eq!("0x1".parse::<Address16>().unwrap(), Address16::new([0, 1]));
    }

    #[test]
    fn test_address16_invalid() {
        assert!(Address16::from_hex("12345").is_err());
        assert!(Address16::from_slice(&[1]).is_err());
    }

    #[test]
    fn test_pretty_hex() {
        assert_eq!(pretty_hex(&[]), "");
        assert_eq!(pretty_hex(&[0x4E, 0x44]), "4E 44");
    }
}
