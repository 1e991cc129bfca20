// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::fmt;

use super::{ConstPackedSizeBytes, PACKET_SIZE, SNTP_VERSION};
use crate::timestamp::Timestamp;

/// **NTP Short Format** - Used in delay and dispersion header fields.
///
/// 16 bits of seconds and 16 bits of binary fraction.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |          Seconds              |           Fraction            |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ShortFormat {
    /// Whole seconds.
    pub seconds: u16,
    /// Binary fraction of a second.
    pub fraction: u16,
}

/// Warning of an impending leap second in the last minute of the current day.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum LeapIndicator {
    /// No warning.
    #[default]
    NoWarning = 0,
    /// Last minute of the day has 61 seconds.
    AddOne = 1,
    /// Last minute of the day has 59 seconds.
    SubOne = 2,
    /// Alarm condition: the server clock is not synchronized.
    Unknown = 3,
}

impl LeapIndicator {
    /// Decode the two leap-indicator bits. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b11 {
            0 => LeapIndicator::NoWarning,
            1 => LeapIndicator::AddOne,
            2 => LeapIndicator::SubOne,
            _ => LeapIndicator::Unknown,
        }
    }
}

/// 3-bit protocol version number.
#[derive(Copy, Clone, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Version(u8);

impl Version {
    /// NTP version 3.
    pub const V3: Self = Version(3);
    /// NTP / SNTP version 4.
    pub const V4: Self = Version(4);

    /// Build a version from its 3-bit field, or `None` if it does not fit.
    pub fn new(v: u8) -> Option<Self> {
        (v <= 0b111).then_some(Version(v))
    }

    /// The raw version number.
    pub fn value(&self) -> u8 {
        self.0
    }
}

impl Default for Version {
    fn default() -> Self {
        Version(SNTP_VERSION)
    }
}

/// Association mode.
///
/// All eight 3-bit values are represented so that decoding a packet never
/// fails on the mode field; validation decides which modes are acceptable.
#[derive(Copy, Clone, Debug, Default, Eq, Hash, PartialEq)]
pub enum Mode {
    /// Reserved.
    Reserved = 0,
    /// Symmetric active.
    SymmetricActive = 1,
    /// Symmetric passive.
    SymmetricPassive = 2,
    /// Client.
    #[default]
    Client = 3,
    /// Server.
    Server = 4,
    /// Broadcast.
    Broadcast = 5,
    /// NTP control message.
    Control = 6,
    /// Reserved for private use.
    Private = 7,
}

impl Mode {
    /// Decode the three mode bits. Higher bits are ignored.
    pub fn from_bits(bits: u8) -> Self {
        match bits & 0b111 {
            0 => Mode::Reserved,
            1 => Mode::SymmetricActive,
            2 => Mode::SymmetricPassive,
            3 => Mode::Client,
            4 => Mode::Server,
            5 => Mode::Broadcast,
            6 => Mode::Control,
            _ => Mode::Private,
        }
    }
}

/// Pack leap indicator, version and mode into the first header byte.
pub fn pack_li_vn_mode(li: LeapIndicator, vn: Version, mode: Mode) -> u8 {
    ((li as u8) << 6) | ((vn.0 & 0b111) << 3) | (mode as u8)
}

/// Split the first header byte into leap indicator, version and mode.
pub fn unpack_li_vn_mode(byte: u8) -> (LeapIndicator, Version, Mode) {
    (
        LeapIndicator::from_bits(byte >> 6),
        Version((byte >> 3) & 0b111),
        Mode::from_bits(byte),
    )
}

/// Distance in hops from the reference clock.
///
/// | Value  | Meaning                                             |
/// | ------ | --------------------------------------------------- |
/// | 0      | unspecified or invalid (kiss-of-death)              |
/// | 1      | primary server (e.g., equipped with a GPS receiver) |
/// | 2-15   | secondary server (via NTP)                          |
/// | 16     | unsynchronized                                      |
/// | 17-255 | reserved                                            |
#[derive(Copy, Clone, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Stratum(pub u8);

impl Stratum {
    /// Unspecified or invalid; marks a kiss-of-death packet.
    pub const UNSPECIFIED: Self = Stratum(0);
    /// Primary reference.
    pub const PRIMARY: Self = Stratum(1);
    /// Highest secondary stratum, and what an unreferenced SNTP server reports.
    pub const SECONDARY_MAX: Self = Stratum(15);
    /// Unsynchronized.
    pub const UNSYNCHRONIZED: Self = Stratum(16);

    /// Whether a packet with this stratum is a kiss-of-death.
    pub fn is_kiss_of_death(&self) -> bool {
        *self == Self::UNSPECIFIED
    }
}

/// A four-character kiss-of-death code carried in the reference id of a
/// stratum-0 packet.
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct KissCode(pub [u8; 4]);

impl KissCode {
    /// Access denied; the client must stop sending to this server.
    pub const DENY: Self = KissCode(*b"DENY");
    /// Access restricted; the client must stop sending to this server.
    pub const RSTR: Self = KissCode(*b"RSTR");
    /// Rate exceeded; the client must reduce its polling rate.
    pub const RATE: Self = KissCode(*b"RATE");

    /// Parse one to four ASCII characters, upper-casing and zero-padding.
    pub fn parse(code: &str) -> Option<Self> {
        let bytes = code.as_bytes();
        if bytes.is_empty() || bytes.len() > 4 || !bytes.iter().all(u8::is_ascii_alphanumeric) {
            return None;
        }
        let mut out = [0u8; 4];
        for (dst, src) in out.iter_mut().zip(bytes) {
            *dst = src.to_ascii_uppercase();
        }
        Some(KissCode(out))
    }
}

impl fmt::Display for KissCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        ReferenceId(self.0).fmt(f)
    }
}

/// The 32-bit reference identifier.
///
/// Its meaning depends on the stratum: a kiss code for stratum 0, an ASCII
/// source name for stratum 1, an address or hash above that. The bytes are
/// kept verbatim; interpretation is left to the reader.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, PartialEq)]
pub struct ReferenceId(pub [u8; 4]);

impl ReferenceId {
    /// All-zero reference id: no kiss code, no source.
    pub const NONE: Self = ReferenceId([0; 4]);

    /// The raw bytes.
    pub fn as_bytes(&self) -> [u8; 4] {
        self.0
    }

    /// The reference id read as a kiss code.
    pub fn as_kiss_code(&self) -> KissCode {
        KissCode(self.0)
    }
}

impl From<KissCode> for ReferenceId {
    fn from(code: KissCode) -> Self {
        ReferenceId(code.0)
    }
}

impl fmt::Display for ReferenceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text: Vec<u8> = self.0.iter().copied().take_while(|b| *b != 0).collect();
        if !text.is_empty() && text.iter().all(u8::is_ascii_graphic) {
            f.write_str(&String::from_utf8_lossy(&text))
        } else {
            write!(f, "0x{:08x}", u32::from_be_bytes(self.0))
        }
    }
}

/// An SNTP packet.
///
/// ```text
///  0                   1                   2                   3
///  0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1 2 3 4 5 6 7 8 9 0 1
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |LI | VN  |Mode |    Stratum    |     Poll      |   Precision   |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Root Delay                           |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                       Root Dispersion                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// |                          Reference ID                         |
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// +                     Reference Timestamp (64)                  +
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// +                      Origin Timestamp (64)                    +
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// +                      Receive Timestamp (64)                   +
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// +                      Transmit Timestamp (64)                  +
/// +-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+-+
/// ```
///
/// Requests and responses share this exact 48-byte layout. Authentication
/// trailers are not part of it.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub struct Packet {
    /// Leap second warning (or the unsynchronized alarm).
    pub leap_indicator: LeapIndicator,
    /// Protocol version.
    pub version: Version,
    /// Association mode.
    pub mode: Mode,
    /// Server stratum.
    pub stratum: Stratum,
    /// Log2 of the poll interval in seconds.
    pub poll: i8,
    /// Log2 of the server clock precision in seconds.
    pub precision: i8,
    /// Round-trip delay to the reference clock.
    pub root_delay: ShortFormat,
    /// Dispersion to the reference clock.
    pub root_dispersion: ShortFormat,
    /// Reference identifier or kiss code.
    pub reference_id: ReferenceId,
    /// Time the server clock was last set.
    pub reference_timestamp: Timestamp,
    /// Client transmit time echoed by the server (T1).
    pub origin_timestamp: Timestamp,
    /// Time the request arrived at the server (T2).
    pub receive_timestamp: Timestamp,
    /// Time the packet left its sender (T1 in a request, T3 in a response).
    pub transmit_timestamp: Timestamp,
}

impl Packet {
    /// A client-mode request carrying only a transmit timestamp.
    pub fn client_request(transmit_timestamp: Timestamp) -> Self {
        Packet {
            transmit_timestamp,
            ..Packet::default()
        }
    }

    /// Whether this packet is a kiss-of-death (stratum 0).
    pub fn is_kiss_of_death(&self) -> bool {
        self.stratum.is_kiss_of_death()
    }

    /// The kiss code, if this packet is a kiss-of-death.
    pub fn kiss_code(&self) -> Option<KissCode> {
        self.is_kiss_of_death()
            .then(|| self.reference_id.as_kiss_code())
    }
}

impl Default for Packet {
    fn default() -> Self {
        Packet {
            leap_indicator: LeapIndicator::NoWarning,
            version: Version::V4,
            mode: Mode::Client,
            stratum: Stratum::UNSPECIFIED,
            poll: 0,
            precision: 0,
            root_delay: ShortFormat::default(),
            root_dispersion: ShortFormat::default(),
            reference_id: ReferenceId::NONE,
            reference_timestamp: Timestamp::ZERO,
            origin_timestamp: Timestamp::ZERO,
            receive_timestamp: Timestamp::ZERO,
            transmit_timestamp: Timestamp::ZERO,
        }
    }
}

impl ConstPackedSizeBytes for ShortFormat {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for Timestamp {
    const PACKED_SIZE_BYTES: usize = 8;
}

impl ConstPackedSizeBytes for ReferenceId {
    const PACKED_SIZE_BYTES: usize = 4;
}

impl ConstPackedSizeBytes for Packet {
    const PACKED_SIZE_BYTES: usize = PACKET_SIZE;
}
