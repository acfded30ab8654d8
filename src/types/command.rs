//! AT command mnemonics.

use std::fmt;
use std::str::FromStr;

use crate::error::{Error, Result};

/// Length of an AT command mnemonic in bytes.
pub const AT_COMMAND_LEN: usize = 2;

/// Commands whose parameter or response is a text string.
const STRING_COMMANDS: [&str; 6] = ["NI", "KY", "NK", "ZU", "ZV", "CC"];

/// A two-character AT command mnemonic such as `ND` or `NI`.
///
/// The wire format carries the command without a length prefix, so the
/// width is fixed here and decoders always consume exactly two bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct AtCommand([u8; AT_COMMAND_LEN]);

impl AtCommand {
    /// Creates a command from its text.
    ///
    /// An empty string is reported as a missing command; anything other than
    /// two printable ASCII characters is rejected.
    pub fn new(command: &str) -> Result<Self> {
        if command.is_empty() {
            return Err(Error::MissingArgument {
                field: "AT command",
            });
        }
        Self::from_bytes(command.as_bytes()).map_err(|_| Error::InvalidAtCommand {
            command: command.to_owned(),
        })
    }

    /// Creates a command from its raw bytes.
    pub fn from_bytes(bytes: &[u8]) -> Result<Self> {
        match <[u8; AT_COMMAND_LEN]>::try_from(bytes) {
            Ok(raw) if raw.iter().all(u8::is_ascii_graphic) => Ok(Self(raw)),
            _ => Err(Error::InvalidAtCommand {
                command: String::from_utf8_lossy(bytes).into_owned(),
            }),
        }
    }

    /// Returns the command bytes.
    #[must_use]
    pub const fn as_bytes(&self) -> &[u8; AT_COMMAND_LEN] {
        &self.0
    }

    /// Returns the command text.
    #[must_use]
    pub fn as_str(&self) -> &str {
        // Construction only admits ASCII.
        std::str::from_utf8(&self.0).unwrap_or_default()
    }

    /// Returns true if this command exchanges its value as text.
    ///
    /// Only affects how values are rendered in diagnostics.
    #[must_use]
    pub fn is_string_command(&self) -> bool {
        STRING_COMMANDS.contains(&self.as_str())
    }
}

impl FromStr for AtCommand {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::new(s)
    }
}

impl fmt::Display for AtCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_valid_command() {
        let cmd = AtCommand::new("ND").unwrap();
        assert_eq!(cmd.as_bytes(), b"ND");
        assert_eq!(cmd.as_str(), "ND");
        assert_eq!(cmd.to_string(), "ND");
    }

    #[test]
    fn test_empty_command_is_missing() {
        assert!(matches!(
            AtCommand::new(""),
            Err(Error::MissingArgument {
                field: "AT command"
            })
        ));
    }

    #[test]
    fn test_invalid_commands() {
        assert!(matches!(
            AtCommand::new("N"),
            Err(Error::InvalidAtCommand { .. })
        ));
        assert!(matches!(
            AtCommand::new("NDX"),
            Err(Error::InvalidAtCommand { .. })
        ));
        assert!(AtCommand::new("N ").is_err());
        assert!(AtCommand::from_bytes(&[0x00, 0x41]).is_err());
    }

    #[test]
    fn test_string_commands() {
        assert!(AtCommand::new("NI").unwrap().is_string_command());
        assert!(AtCommand::new("KY").unwrap().is_string_command());
        assert!(!AtCommand::new("ND").unwrap().is_string_command());
        assert!(!AtCommand::new("SH").unwrap().is_string_command());
    }
}
