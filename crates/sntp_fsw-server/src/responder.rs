// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! One request in, one response out.
//!
//! Timing rules:
//! - the receive timestamp is read as soon as the datagram is in hand
//! - the transmit timestamp is read after everything else is encoded and
//!   patched into the finished buffer just before sending
//!
//! Nothing here touches the server counters; the loops in
//! [`crate::blocking`] and [`crate::server`] account for each outcome.

use std::net::SocketAddr;

use sntp_proto::codec::{deserialize_request, patch_transmit_timestamp, serialize_response};
use sntp_proto::protocol::{LeapIndicator, Mode, PACKET_SIZE, Packet, ShortFormat, Version};
use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, Timestamp};
use sntp_proto::transport::DatagramTransport;
use tracing::{debug, warn};

use crate::server_common::{ServerConfig, ServerContext};

/// Receive buffer size; one byte over a packet so oversize datagrams show.
pub(crate) const RECV_BUF_SIZE: usize = PACKET_SIZE + 1;

/// Check a decoded packet is something the server answers.
///
/// Fails with [`Status::InvalidResponse`] unless the mode is client and the
/// transmit timestamp is non-zero.
pub fn validate_request(request: &Packet) -> Result<(), Status> {
    if request.mode != Mode::Client {
        debug!(mode = ?request.mode, "request dropped: not client mode");
        return Err(Status::InvalidResponse);
    }
    if request.transmit_timestamp.is_zero() {
        debug!("request dropped: zero transmit timestamp");
        return Err(Status::InvalidResponse);
    }
    Ok(())
}

/// Build the response to `request`, received at `receive_time`.
///
/// The transmit timestamp is left zero; [`prepare_reply`] fills it in.
pub fn build_response(config: &ServerConfig, request: &Packet, receive_time: Timestamp) -> Packet {
    Packet {
        leap_indicator: LeapIndicator::NoWarning,
        version: Version::V4,
        mode: Mode::Server,
        stratum: config.stratum,
        poll: if config.echo_poll { request.poll } else { 0 },
        precision: config.precision,
        root_delay: ShortFormat::default(),
        root_dispersion: ShortFormat::default(),
        reference_id: config.reference_id,
        reference_timestamp: Timestamp::ZERO,
        origin_timestamp: request.transmit_timestamp,
        receive_timestamp: receive_time,
        transmit_timestamp: Timestamp::ZERO,
    }
}

/// Turn a received datagram into the encoded reply.
///
/// `clock` is read last, for the transmit timestamp. Fails with
/// [`Status::BadParameter`] for a datagram that is not exactly one packet and
/// [`Status::InvalidResponse`] for a packet that is not a client request.
pub fn prepare_reply<C: Clock>(
    config: &ServerConfig,
    datagram: &[u8],
    receive_time: Timestamp,
    clock: &C,
) -> Result<[u8; PACKET_SIZE], Status> {
    let request = deserialize_request(datagram).inspect_err(|_| {
        debug!(len = datagram.len(), "request dropped: wrong size");
    })?;
    validate_request(&request)?;

    let response = build_response(config, &request, receive_time);
    let mut buf = [0u8; PACKET_SIZE];
    serialize_response(&response, &mut buf)?;
    patch_transmit_timestamp(&mut buf, clock.now()?)?;
    Ok(buf)
}

/// Answer one already received datagram through `transport`.
pub(crate) fn respond<T, C>(
    config: &ServerConfig,
    transport: &T,
    clock: &C,
    datagram: &[u8],
    from: SocketAddr,
    receive_time: Timestamp,
) -> Result<SocketAddr, Status>
where
    T: DatagramTransport,
    C: Clock,
{
    let reply = prepare_reply(config, datagram, receive_time, clock)?;
    match transport.send_to(&reply, from) {
        Ok(PACKET_SIZE) => {
            debug!(%from, "response sent");
            Ok(from)
        }
        Ok(n) => {
            warn!(%from, sent = n, "short send");
            Err(Status::NetworkFailure)
        }
        Err(e) => {
            warn!(%from, error = %e, "unable to send reply");
            Err(Status::NetworkFailure)
        }
    }
}

/// Wait for one request and answer it.
///
/// Returns the client address on success. A wait that ends with nothing
/// received fails with [`Status::NoResponseReceived`]; a dropped datagram
/// fails with the status explaining why. Counters are not updated.
pub fn process_request<T, C>(ctx: &ServerContext, transport: &T, clock: &C) -> Result<SocketAddr, Status>
where
    T: DatagramTransport,
    C: Clock,
{
    let mut buf = [0u8; RECV_BUF_SIZE];
    let (len, from) = transport
        .recv_from(&mut buf, ctx.config().receive_timeout)
        .map_err(|e| Status::from_recv_error(&e))?;
    let receive_time = clock.now()?;
    debug!(%from, len, "request received");

    respond(ctx.config(), transport, clock, &buf[..len], from, receive_time)
}
