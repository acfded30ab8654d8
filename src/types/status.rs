//! Status code enumerations carried in response frames.
//!
//! Every enumeration maps a one-byte code to a variant with a fixed
//! description. Reverse lookup is lenient: unknown codes give `None`.

use std::fmt;

/// Description returned by [`StatusCode::describe`] for unmapped codes.
pub const UNKNOWN_DESCRIPTION: &str = "Unknown";

/// Shared behaviour of one-byte status enumerations.
pub trait StatusCode: Copy + Sized + 'static {
    /// Every variant, in code order.
    const ALL: &'static [Self];

    /// Returns the wire code.
    fn value(self) -> u8;

    /// Returns the human-readable description.
    fn description(self) -> &'static str;

    /// Looks up a variant by its wire code.
    #[must_use]
    fn lookup(code: u8) -> Option<Self> {
        Self::ALL.iter().copied().find(|s| s.value() == code)
    }

    /// Returns the description for a code, or [`UNKNOWN_DESCRIPTION`].
    #[must_use]
    fn describe(code: u8) -> &'static str {
        Self::lookup(code).map_or(UNKNOWN_DESCRIPTION, Self::description)
    }
}

fn fmt_status<S: StatusCode>(status: S, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{:02X}: {}", status.value(), status.description())
}

/// Outcome of an AT command.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum AtCommandStatus {
    /// Command succeeded.
    Ok = 0x00,
    /// Command failed.
    Error = 0x01,
    /// Command is not recognised.
    InvalidCommand = 0x02,
    /// Parameter is not valid for the command.
    InvalidParameter = 0x03,
    /// Remote command could not be delivered.
    TxFailure = 0x04,
}

impl StatusCode for AtCommandStatus {
    const ALL: &'static [Self] = &[
        Self::Ok,
        Self::Error,
        Self::InvalidCommand,
        Self::InvalidParameter,
        Self::TxFailure,
    ];

    fn value(self) -> u8 {
        self as u8
    }

    fn description(self) -> &'static str {
        match self {
            Self::Ok => "Status OK",
            Self::Error => "Status Error",
            Self::InvalidCommand => "Invalid command",
            Self::InvalidParameter => "Invalid parameter",
            Self::TxFailure => "TX failure",
        }
    }
}

impl fmt::Display for AtCommandStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_status(*self, f)
    }
}

/// Unsolicited modem status reported by the local module.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum ModemStatus {
    /// Hardware reset or power up.
    HardwareReset = 0x00,
    /// Watchdog timer reset.
    WatchdogReset = 0x01,
    /// Joined a network.
    Joined = 0x02,
    /// Left the network.
    Disassociated = 0x03,
    /// Configuration error or synchronisation lost.
    SyncLost = 0x04,
    /// Coordinator realignment.
    CoordinatorRealignment = 0x05,
    /// Coordinator started a network.
    CoordinatorStarted = 0x06,
    /// Network security key was updated.
    KeyUpdated = 0x07,
    /// Network woke up.
    NetworkWokeUp = 0x08,
    /// Network went to sleep.
    NetworkSlept = 0x0C,
    /// Supply voltage limit exceeded.
    VoltageExceeded = 0x0D,
    /// Remote Manager connected.
    RemoteManagerConnected = 0x0E,
    /// Remote Manager disconnected.
    RemoteManagerDisconnected = 0x0F,
    /// Configuration changed while a join was in progress.
    ConfigChangedWhileJoining = 0x11,
    /// Access fault.
    AccessFault = 0x12,
    /// Fatal error.
    FatalError = 0x13,
    /// Bluetooth LE connection established.
    BluetoothConnected = 0x32,
    /// Bluetooth LE connection closed.
    BluetoothDisconnected = 0x33,
    /// Cellular band mask configuration failed.
    BandmaskConfigFailed = 0x34,
    /// Cellular component update started.
    CellularUpdateStarted = 0x35,
    /// Cellular component update failed.
    CellularUpdateFailed = 0x36,
    /// Cellular component update completed.
    CellularUpdateCompleted = 0x37,
    /// Firmware update started.
    FirmwareUpdateStarted = 0x38,
    /// Firmware update failed.
    FirmwareUpdateFailed = 0x39,
    /// Firmware update being applied.
    FirmwareUpdateApplying = 0x3A,
    /// Secure session established.
    SecureSessionEstablished = 0x3B,
    /// Secure session ended.
    SecureSessionEnded = 0x3C,
    /// Secure session authentication failed.
    SecureSessionAuthFailed = 0x3D,
    /// Stack error.
    StackError = 0x80,
}

impl StatusCode for ModemStatus {
    const ALL: &'static [Self] = &[
        Self::HardwareReset,
        Self::WatchdogReset,
        Self::Joined,
        Self::Disassociated,
        Self::SyncLost,
        Self::CoordinatorRealignment,
        Self::CoordinatorStarted,
        Self::KeyUpdated,
        Self::NetworkWokeUp,
        Self::NetworkSlept,
        Self::VoltageExceeded,
        Self::RemoteManagerConnected,
        Self::RemoteManagerDisconnected,
        Self::ConfigChangedWhileJoining,
        Self::AccessFault,
        Self::FatalError,
        Self::BluetoothConnected,
        Self::BluetoothDisconnected,
        Self::BandmaskConfigFailed,
        Self::CellularUpdateStarted,
        Self::CellularUpdateFailed,
        Self::CellularUpdateCompleted,
        Self::FirmwareUpdateStarted,
        Self::FirmwareUpdateFailed,
        Self::FirmwareUpdateApplying,
        Self::SecureSessionEstablished,
        Self::SecureSessionEnded,
        Self::SecureSessionAuthFailed,
        Self::StackError,
    ];

    fn value(self) -> u8 {
        self as u8
    }

    fn description(self) -> &'static str {
        match self {
            Self::HardwareReset => "Device was reset",
            Self::WatchdogReset => "Watchdog timer was reset",
            Self::Joined => "Device joined to network",
            Self::Disassociated => "Device disassociated",
            Self::SyncLost => "Configuration error/synchronization lost",
            Self::CoordinatorRealignment => "Coordinator realignment",
            Self::CoordinatorStarted => "The coordinator started",
            Self::KeyUpdated => "Network security key was updated",
            Self::NetworkWokeUp => "Network woke up",
            Self::NetworkSlept => "Network went to sleep",
            Self::VoltageExceeded => "Voltage supply limit exceeded",
            Self::RemoteManagerConnected => "Remote Manager connected",
            Self::RemoteManagerDisconnected => "Remote Manager disconnected",
            Self::ConfigChangedWhileJoining => "Modem configuration changed while joining",
            Self::AccessFault => "Access fault",
            Self::FatalError => "Fatal error",
            Self::BluetoothConnected => "BLE Connect",
            Self::BluetoothDisconnected => "BLE Disconnect",
            Self::BandmaskConfigFailed => "Bandmask configuration failed",
            Self::CellularUpdateStarted => "Cellular component update started",
            Self::CellularUpdateFailed => "Cellular component update failed",
            Self::CellularUpdateCompleted => "Cellular component update completed",
            Self::FirmwareUpdateStarted => "XBee firmware update started",
            Self::FirmwareUpdateFailed => "XBee firmware update failed",
            Self::FirmwareUpdateApplying => "XBee firmware update applying",
            Self::SecureSessionEstablished => "Secure session successfully established",
            Self::SecureSessionEnded => "Secure session ended",
            Self::SecureSessionAuthFailed => "Secure session authentication failed",
            Self::StackError => "Stack error",
        }
    }
}

impl fmt::Display for ModemStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_status(*self, f)
    }
}

/// Delivery outcome reported by a transmit status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DeliveryStatus {
    /// Delivered.
    Success = 0x00,
    /// MAC acknowledgement not received.
    NoAck = 0x01,
    /// Clear channel assessment failed.
    CcaFailure = 0x02,
    /// Purged before the stack was up.
    Purged = 0x03,
    /// Physical error on the transceiver interface.
    PhysicalError = 0x04,
    /// Invalid destination endpoint.
    InvalidDestinationEndpoint = 0x15,
    /// No buffers available.
    NoBuffers = 0x18,
    /// Network acknowledgement failure.
    NetworkAckFailure = 0x21,
    /// Not joined to a network.
    NotJoined = 0x22,
    /// Frame was addressed to the sender.
    SelfAddressed = 0x23,
    /// Destination address not found.
    AddressNotFound = 0x24,
    /// No route to the destination.
    RouteNotFound = 0x25,
    /// Broadcast relay not heard from any neighbour.
    BroadcastFailed = 0x26,
    /// Invalid binding table index.
    InvalidBindingIndex = 0x2B,
    /// Invalid endpoint.
    InvalidEndpoint = 0x2C,
    /// Software error.
    SoftwareError = 0x31,
    /// Out of buffers, timers or similar resources.
    ResourceError = 0x32,
    /// Payload exceeds the maximum for the destination.
    PayloadTooLarge = 0x74,
    /// Indirect message was never requested.
    IndirectMessageUnrequested = 0x75,
}

impl StatusCode for DeliveryStatus {
    const ALL: &'static [Self] = &[
        Self::Success,
        Self::NoAck,
        Self::CcaFailure,
        Self::Purged,
        Self::PhysicalError,
        Self::InvalidDestinationEndpoint,
        Self::NoBuffers,
        Self::NetworkAckFailure,
        Self::NotJoined,
        Self::SelfAddressed,
        Self::AddressNotFound,
        Self::RouteNotFound,
        Self::BroadcastFailed,
        Self::InvalidBindingIndex,
        Self::InvalidEndpoint,
        Self::SoftwareError,
        Self::ResourceError,
        Self::PayloadTooLarge,
        Self::IndirectMessageUnrequested,
    ];

    fn value(self) -> u8 {
        self as u8
    }

    fn description(self) -> &'static str {
        match self {
            Self::Success => "Success",
            Self::NoAck => "No acknowledgement received",
            Self::CcaFailure => "CCA failure",
            Self::Purged => "Transmission purged, it was attempted before stack was up",
            Self::PhysicalError => "Physical error occurred on the interface",
            Self::InvalidDestinationEndpoint => "Invalid destination endpoint",
            Self::NoBuffers => "No buffers",
            Self::NetworkAckFailure => "Network ACK Failure",
            Self::NotJoined => "Not joined to network",
            Self::SelfAddressed => "Self-addressed",
            Self::AddressNotFound => "Address not found",
            Self::RouteNotFound => "Route not found",
            Self::BroadcastFailed => "Broadcast source failed to hear a neighbor relay the message",
            Self::InvalidBindingIndex => "Invalid binding table index",
            Self::InvalidEndpoint => "Invalid endpoint",
            Self::SoftwareError => "A software error occurred",
            Self::ResourceError => "Resource error lack of free buffers, timers, etc.",
            Self::PayloadTooLarge => "Data payload too large",
            Self::IndirectMessageUnrequested => "Indirect message unrequested",
        }
    }
}

impl fmt::Display for DeliveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_status(*self, f)
    }
}

/// Route discovery overhead reported by a transmit status frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum DiscoveryStatus {
    /// No discovery overhead.
    NoOverhead = 0x00,
    /// Address discovery.
    Address = 0x01,
    /// Route discovery.
    Route = 0x02,
    /// Address and route discovery.
    AddressAndRoute = 0x03,
    /// Extended timeout discovery.
    ExtendedTimeout = 0x40,
}

impl StatusCode for DiscoveryStatus {
    const ALL: &'static [Self] = &[
        Self::NoOverhead,
        Self::Address,
        Self::Route,
        Self::AddressAndRoute,
        Self::ExtendedTimeout,
    ];

    fn value(self) -> u8 {
        self as u8
    }

    fn description(self) -> &'static str {
        match self {
            Self::NoOverhead => "No discovery overhead",
            Self::Address => "Address discovery",
            Self::Route => "Route discovery",
            Self::AddressAndRoute => "Address and route",
            Self::ExtendedTimeout => "Extended timeout discovery",
        }
    }
}

impl fmt::Display for DiscoveryStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt_status(*self, f)
    }
}
