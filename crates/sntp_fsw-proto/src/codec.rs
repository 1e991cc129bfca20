// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Request/response serialization and response validation.
//!
//! Every function here works on caller-owned buffers and returns a
//! [`Status`] on failure without touching any other state.

use log::debug;

use crate::protocol::{
    KissCode, LeapIndicator, Mode, PACKET_SIZE, Packet, ReferenceId, Stratum,
    TRANSMIT_TIMESTAMP_OFFSET, Version,
};
use crate::status::Status;
use crate::timestamp::{NtpDuration, Timestamp, clock_offset, round_trip_delay};

/// Mask of the transmit fraction bits kept from the clock reading; the rest
/// carry the correlator.
const CORRELATOR_KEEP_MASK: u32 = 0xFFFF_0000;

/// Table mapping kiss-of-death codes to rejection statuses.
///
/// The default table follows RFC 4330: `DENY` and `RSTR` mean stop using the
/// server, `RATE` means back off. Codes not in the table map to the fallback,
/// [`Status::RejectedResponseOtherCode`] unless changed.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct KissCodePolicy {
    entries: Vec<(KissCode, Status)>,
    fallback: Status,
}

impl Default for KissCodePolicy {
    fn default() -> Self {
        KissCodePolicy {
            entries: vec![
                (KissCode::DENY, Status::RejectedResponseChangeServer),
                (KissCode::RSTR, Status::RejectedResponseChangeServer),
                (KissCode::RATE, Status::RejectedResponseRetryWithBackoff),
            ],
            fallback: Status::RejectedResponseOtherCode,
        }
    }
}

impl KissCodePolicy {
    /// A table with no entries; every code maps to the fallback.
    pub fn empty() -> Self {
        KissCodePolicy {
            entries: Vec::new(),
            fallback: Status::RejectedResponseOtherCode,
        }
    }

    /// Map `code` to `status`, replacing any existing entry.
    ///
    /// Fails with [`Status::BadParameter`] if `status` is not in the
    /// rejection family.
    pub fn insert(&mut self, code: KissCode, status: Status) -> Result<(), Status> {
        if !status.is_rejection() {
            return Err(Status::BadParameter);
        }
        match self.entries.iter_mut().find(|(c, _)| *c == code) {
            Some(entry) => entry.1 = status,
            None => self.entries.push((code, status)),
        }
        Ok(())
    }

    /// Set the status for codes not in the table.
    pub fn set_fallback(&mut self, status: Status) -> Result<(), Status> {
        if !status.is_rejection() {
            return Err(Status::BadParameter);
        }
        self.fallback = status;
        Ok(())
    }

    /// The rejection status for `code`.
    pub fn classify(&self, code: KissCode) -> Status {
        self.entries
            .iter()
            .find(|(c, _)| *c == code)
            .map_or(self.fallback, |(_, status)| *status)
    }
}

/// A validated server response and the offset computed from it.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub struct SntpResponse {
    /// Leap indicator reported by the server.
    pub leap_indicator: LeapIndicator,
    /// Protocol version of the response.
    pub version: Version,
    /// Association mode of the response (always server).
    pub mode: Mode,
    /// Server stratum.
    pub stratum: Stratum,
    /// Server reference identifier.
    pub reference_id: ReferenceId,
    /// Client transmit time echoed by the server (T1).
    pub origin_timestamp: Timestamp,
    /// Server receive time (T2).
    pub receive_timestamp: Timestamp,
    /// Server transmit time (T3).
    pub transmit_timestamp: Timestamp,
    /// Local receive time (T4).
    pub destination_timestamp: Timestamp,
    /// `((T2 - T1) + (T3 - T4)) / 2`; positive when the server is ahead.
    pub clock_offset: NtpDuration,
    /// `(T4 - T1) - (T3 - T2)`.
    pub round_trip_delay: NtpDuration,
}

impl SntpResponse {
    /// The server's transmit time, the best estimate of server "now".
    pub fn server_time(&self) -> Timestamp {
        self.transmit_timestamp
    }

    /// Clock offset in milliseconds.
    pub fn clock_offset_ms(&self) -> i64 {
        self.clock_offset.as_millis()
    }

    /// Round-trip delay in milliseconds.
    pub fn round_trip_delay_ms(&self) -> i64 {
        self.round_trip_delay.as_millis()
    }
}

/// Write a client request into `buf`.
///
/// The low 16 bits of the transmit fraction are replaced with the upper 16
/// bits of `correlator`, so the origin echo check also rejects responses to a
/// different request issued in the same ~15 µs window. Returns the transmit
/// timestamp as written; pass that to [`deserialize_response`].
///
/// Fails with [`Status::BadParameter`] if `buf` is shorter than [`PACKET_SIZE`].
pub fn serialize_request(
    transmit_time: Timestamp,
    correlator: u32,
    buf: &mut [u8],
) -> Result<Timestamp, Status> {
    if buf.len() < PACKET_SIZE {
        debug!(
            "request buffer of {} bytes is smaller than {}",
            buf.len(),
            PACKET_SIZE
        );
        return Err(Status::BadParameter);
    }
    let sent = Timestamp {
        seconds: transmit_time.seconds,
        fraction: (transmit_time.fraction & CORRELATOR_KEEP_MASK) | (correlator >> 16),
    };
    Packet::client_request(sent)
        .write_into(buf)
        .map_err(|_| Status::BadParameter)?;
    Ok(sent)
}

/// Parse a request datagram.
///
/// Fails with [`Status::BadParameter`] unless `buf` is exactly [`PACKET_SIZE`]
/// bytes. No field is validated here; see the server's request checks.
pub fn deserialize_request(buf: &[u8]) -> Result<Packet, Status> {
    Packet::read_from(buf).map_err(|e| {
        debug!("malformed request: {}", e);
        Status::BadParameter
    })
}

/// Parse and validate a response with the default [`KissCodePolicy`].
pub fn deserialize_response(
    request_transmit_time: Timestamp,
    local_receive_time: Timestamp,
    buf: &[u8],
) -> Result<SntpResponse, Status> {
    deserialize_response_with_policy(
        request_transmit_time,
        local_receive_time,
        buf,
        &KissCodePolicy::default(),
    )
}

/// Parse and validate a response datagram and compute the clock offset.
///
/// `request_transmit_time` is the value [`serialize_request`] returned (T1);
/// `local_receive_time` is the local clock read as soon as the datagram
/// arrived (T4).
///
/// Checks, in order:
/// 1. length is exactly [`PACKET_SIZE`] (`InvalidResponse`)
/// 2. mode is server and version is 4 (`InvalidResponse`)
/// 3. origin timestamp echoes `request_transmit_time` (`InvalidResponse`)
/// 4. stratum 0 is a kiss-of-death, classified through `policy`
/// 5. transmit timestamp is non-zero (`InvalidResponse`)
/// 6. leap indicator is not the unsynchronized alarm (`RejectedResponse`)
pub fn deserialize_response_with_policy(
    request_transmit_time: Timestamp,
    local_receive_time: Timestamp,
    buf: &[u8],
    policy: &KissCodePolicy,
) -> Result<SntpResponse, Status> {
    let packet = Packet::read_from(buf).map_err(|e| {
        debug!("response rejected: {}", e);
        Status::InvalidResponse
    })?;

    if packet.mode != Mode::Server || packet.version != Version::V4 {
        debug!(
            "response rejected: mode {:?} version {}",
            packet.mode,
            packet.version.value()
        );
        return Err(Status::InvalidResponse);
    }

    if packet.origin_timestamp != request_transmit_time {
        debug!(
            "response rejected: origin {:?} does not match request {:?}",
            packet.origin_timestamp, request_transmit_time
        );
        return Err(Status::InvalidResponse);
    }

    if let Some(code) = packet.kiss_code() {
        let status = policy.classify(code);
        debug!("kiss-of-death {}: {}", code, status);
        return Err(status);
    }

    if packet.transmit_timestamp.is_zero() {
        debug!("response rejected: zero transmit timestamp");
        return Err(Status::InvalidResponse);
    }

    if packet.leap_indicator == LeapIndicator::Unknown {
        debug!("response rejected: server clock unsynchronized");
        return Err(Status::RejectedResponse);
    }

    let t1 = request_transmit_time;
    let t2 = packet.receive_timestamp;
    let t3 = packet.transmit_timestamp;
    let t4 = local_receive_time;

    Ok(SntpResponse {
        leap_indicator: packet.leap_indicator,
        version: packet.version,
        mode: packet.mode,
        stratum: packet.stratum,
        reference_id: packet.reference_id,
        origin_timestamp: packet.origin_timestamp,
        receive_timestamp: t2,
        transmit_timestamp: t3,
        destination_timestamp: t4,
        clock_offset: clock_offset(t1, t2, t3, t4),
        round_trip_delay: round_trip_delay(t1, t2, t3, t4),
    })
}

/// Write any packet (normally a server response) into `buf`.
///
/// Fails with [`Status::BufferTooSmall`] if `buf` is shorter than [`PACKET_SIZE`].
pub fn serialize_response(packet: &Packet, buf: &mut [u8]) -> Result<usize, Status> {
    packet.write_into(buf).map_err(|_| Status::BufferTooSmall)
}

/// Overwrite the transmit timestamp of an already serialized packet.
///
/// Lets a sender take its final clock reading after everything else has been
/// encoded.
pub fn patch_transmit_timestamp(buf: &mut [u8], transmit: Timestamp) -> Result<(), Status> {
    let field = buf
        .get_mut(TRANSMIT_TIMESTAMP_OFFSET..PACKET_SIZE)
        .ok_or(Status::BufferTooSmall)?;
    field.copy_from_slice(&transmit.encode_for_wire());
    Ok(())
}
