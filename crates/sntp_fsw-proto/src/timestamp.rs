// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! NTP timestamps and the arithmetic the four-timestamp exchange needs.
//!
//! A [`Timestamp`] is the 64-bit NTP short era format: 32 bits of seconds since
//! 1900-01-01 00:00:00 UTC and 32 bits of binary fraction (2^-32 s units). The
//! seconds field wraps every 2^32 seconds (the next wrap is in February 2036),
//! so differences are always taken modulo 2^32 and interpreted as the signed
//! minimal residue. That keeps offsets correct for clocks straddling an era
//! boundary as long as the two readings are within ~68 years of each other.
//!
//! Host time is read through the [`Clock`] trait so that tests and the server
//! test utility can inject skew.

use std::fmt;
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use log::warn;

use crate::status::Status;

/// Seconds from 1900-01-01 00:00:00 UTC to the Unix epoch.
pub const EPOCH_DELTA: u64 = 2_208_988_800;

/// Seconds in one NTP era (2^32).
pub const ERA_SECONDS: u64 = 1 << 32;

/// Fraction units in one second.
pub const FRACTIONS_PER_SECOND: u64 = 1 << 32;

/// Fraction units per millisecond used by [`millis_to_fractions`].
///
/// This is 2^32 / 1000 rounded up, so a fraction built from whole
/// milliseconds never truncates back to one millisecond less.
pub const FRACTIONS_PER_MILLISECOND: u32 = 4_294_968;

const NANOS_PER_SECOND: u64 = 1_000_000_000;

/// Convert a timestamp fraction to whole milliseconds, truncating.
///
/// Never returns more than 999.
pub const fn fractions_to_millis(fraction: u32) -> u32 {
    ((fraction as u64 * 1000) >> 32) as u32
}

/// Convert a sub-second millisecond count to fraction units.
///
/// Only `ms < 1000` is meaningful; whole seconds belong in
/// [`Timestamp::seconds`]. Larger inputs wrap rather than panic.
pub const fn millis_to_fractions(ms: u32) -> u32 {
    ms.wrapping_mul(FRACTIONS_PER_MILLISECOND)
}

/// A 64-bit NTP timestamp.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct Timestamp {
    /// Seconds since the start of the current NTP era.
    pub seconds: u32,
    /// Sub-second remainder in 2^-32 s units.
    pub fraction: u32,
}

impl Timestamp {
    /// The all-zero timestamp, which NTP uses for "unknown".
    pub const ZERO: Timestamp = Timestamp {
        seconds: 0,
        fraction: 0,
    };

    /// Build a timestamp from its raw fields.
    pub const fn new(seconds: u32, fraction: u32) -> Self {
        Timestamp { seconds, fraction }
    }

    /// Build a timestamp from whole seconds plus a sub-second millisecond count.
    pub const fn from_millis(seconds: u32, millis: u32) -> Self {
        Timestamp {
            seconds,
            fraction: millis_to_fractions(millis),
        }
    }

    /// Read the host wall clock.
    ///
    /// Fails with [`Status::TimeNotSupported`] if the host clock reads earlier
    /// than the Unix epoch.
    pub fn now() -> Result<Self, Status> {
        SystemClock.now()
    }

    /// Convert a host time to an NTP timestamp.
    ///
    /// Times at or after the 2036 rollover land in era 1 and wrap, which is
    /// what the wire format carries.
    pub fn from_system_time(time: SystemTime) -> Result<Self, Status> {
        match time.duration_since(UNIX_EPOCH) {
            Ok(since_unix) => Ok(Self::from_unix_duration(since_unix)),
            Err(err) => {
                warn!(
                    "host clock reads {:?} before the Unix epoch",
                    err.duration()
                );
                Err(Status::TimeNotSupported)
            }
        }
    }

    /// Convert a duration since the Unix epoch to an NTP timestamp.
    pub fn from_unix_duration(since_unix: Duration) -> Self {
        let ntp_secs = since_unix.as_secs().wrapping_add(EPOCH_DELTA);
        let nanos = u64::from(since_unix.subsec_nanos());
        Timestamp {
            seconds: (ntp_secs % ERA_SECONDS) as u32,
            fraction: ((nanos << 32) / NANOS_PER_SECOND) as u32,
        }
    }

    /// Seconds since the Unix epoch, assuming era 0.
    pub fn unix_seconds_era0(self) -> i64 {
        i64::from(self.seconds) - EPOCH_DELTA as i64
    }

    /// Whole milliseconds of the fraction.
    pub const fn millis(self) -> u32 {
        fractions_to_millis(self.fraction)
    }

    /// Whether both fields are zero.
    pub const fn is_zero(self) -> bool {
        self.seconds == 0 && self.fraction == 0
    }

    /// Serialize to the 8-byte big-endian wire form.
    pub fn encode_for_wire(self) -> [u8; 8] {
        let mut wire = [0u8; 8];
        wire[..4].copy_from_slice(&self.seconds.to_be_bytes());
        wire[4..].copy_from_slice(&self.fraction.to_be_bytes());
        wire
    }

    /// Parse the 8-byte big-endian wire form. Inverse of [`encode_for_wire`](Self::encode_for_wire).
    pub fn decode_from_wire(wire: [u8; 8]) -> Self {
        let [s0, s1, s2, s3, f0, f1, f2, f3] = wire;
        Timestamp {
            seconds: u32::from_be_bytes([s0, s1, s2, s3]),
            fraction: u32::from_be_bytes([f0, f1, f2, f3]),
        }
    }

    /// Signed time elapsed from `earlier` to `self`.
    ///
    /// The seconds difference is the signed minimal residue modulo 2^32, so a
    /// reading of `0x0000_0001` after `0xFFFF_FFFE` is three seconds later.
    pub fn delta_since(self, earlier: Timestamp) -> NtpDuration {
        let secs = i128::from(self.seconds.wrapping_sub(earlier.seconds) as i32);
        let frac = i128::from(self.fraction) - i128::from(earlier.fraction);
        NtpDuration::saturating_from_units((secs << 32) + frac)
    }

    /// Shift this timestamp by a signed duration, wrapping across eras.
    pub fn offset_by(self, by: NtpDuration) -> Self {
        let raw = (u64::from(self.seconds) << 32) | u64::from(self.fraction);
        let shifted = raw.wrapping_add(by.units() as u64);
        Timestamp {
            seconds: (shifted >> 32) as u32,
            fraction: shifted as u32,
        }
    }
}

impl fmt::Display for Timestamp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{:03}", self.seconds, self.millis())
    }
}

/// A signed span of time in 2^-32 s units.
#[derive(Clone, Copy, Debug, Default, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct NtpDuration(i64);

impl NtpDuration {
    /// Zero length.
    pub const ZERO: NtpDuration = NtpDuration(0);

    /// Build from raw 2^-32 s units.
    pub const fn from_units(units: i64) -> Self {
        NtpDuration(units)
    }

    fn saturating_from_units(units: i128) -> Self {
        NtpDuration(units.clamp(i128::from(i64::MIN), i128::from(i64::MAX)) as i64)
    }

    /// Build from signed milliseconds.
    pub fn from_millis(ms: i64) -> Self {
        Self::saturating_from_units(i128::from(ms) * i128::from(FRACTIONS_PER_SECOND) / 1000)
    }

    /// Raw 2^-32 s units.
    pub const fn units(self) -> i64 {
        self.0
    }

    /// Milliseconds, rounded to the nearest whole millisecond.
    ///
    /// Rounding absorbs the sub-unit error [`millis_to_fractions`] introduces,
    /// so spans built from whole milliseconds report back exactly.
    pub fn as_millis(self) -> i64 {
        let scaled = i128::from(self.0) * 1000;
        let per_second = i128::from(FRACTIONS_PER_SECOND);
        let half = per_second / 2;
        let rounded = if scaled >= 0 {
            (scaled + half) / per_second
        } else {
            (scaled - half) / per_second
        };
        rounded as i64
    }

    /// Seconds as a float, for display.
    pub fn as_secs_f64(self) -> f64 {
        self.0 as f64 / FRACTIONS_PER_SECOND as f64
    }
}

/// Clock offset `((t2 - t1) + (t3 - t4)) / 2` of the server relative to the client.
///
/// Positive means the server clock is ahead.
pub fn clock_offset(t1: Timestamp, t2: Timestamp, t3: Timestamp, t4: Timestamp) -> NtpDuration {
    let outbound = i128::from(t2.delta_since(t1).units());
    let inbound = i128::from(t3.delta_since(t4).units());
    NtpDuration::saturating_from_units((outbound + inbound) / 2)
}

/// Round-trip delay `(t4 - t1) - (t3 - t2)`: time on the wire excluding server hold time.
pub fn round_trip_delay(
    t1: Timestamp,
    t2: Timestamp,
    t3: Timestamp,
    t4: Timestamp,
) -> NtpDuration {
    let total = i128::from(t4.delta_since(t1).units());
    let held = i128::from(t3.delta_since(t2).units());
    NtpDuration::saturating_from_units(total - held)
}

/// A source of the current time.
pub trait Clock {
    /// Read the current time.
    fn now(&self) -> Result<Timestamp, Status>;
}

impl<C: Clock + ?Sized> Clock for &C {
    fn now(&self) -> Result<Timestamp, Status> {
        (**self).now()
    }
}

/// The host wall clock.
#[derive(Clone, Copy, Debug, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> Result<Timestamp, Status> {
        Timestamp::from_system_time(SystemTime::now())
    }
}

/// Another clock shifted by a fixed amount.
///
/// Used to simulate a server or client whose clock is skewed.
#[derive(Clone, Copy, Debug, Default)]
pub struct OffsetClock<C = SystemClock> {
    inner: C,
    skew: NtpDuration,
}

impl<C: Clock> OffsetClock<C> {
    /// Wrap `inner`, adding `skew` to every reading.
    pub fn new(inner: C, skew: NtpDuration) -> Self {
        OffsetClock { inner, skew }
    }

    /// The configured skew.
    pub fn skew(&self) -> NtpDuration {
        self.skew
    }
}

impl<C: Clock> Clock for OffsetClock<C> {
    fn now(&self) -> Result<Timestamp, Status> {
        Ok(self.inner.now()?.offset_by(self.skew))
    }
}
