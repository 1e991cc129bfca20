// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async SNTP query using the Tokio runtime.
//!
//! The exchange is the same as [`run_query`](crate::run_query): one request,
//! one bounded wait, the same validation. The bounded wait is
//! [`tokio::time::timeout`] around the receive instead of a socket read
//! timeout.
//!
//! These functions must be called from within a Tokio runtime.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> Result<(), sntp_client::Status> {
//! use sntp_client::ClientConfig;
//!
//! let config = ClientConfig::new("127.0.0.1:123".parse().unwrap());
//! let response = sntp_client::async_sntp::query(&config).await?;
//! println!("offset {} ms", response.clock_offset_ms());
//! # Ok(())
//! # }
//! ```

use log::debug;
use tokio::net::UdpSocket;

use sntp_proto::codec::SntpResponse;
use sntp_proto::protocol::PACKET_SIZE;
use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, SystemClock};

use crate::client::bind_addr_for;
use crate::config::ClientConfig;
use crate::exchange::{accept_response, prepare_request};

/// Query the configured server from an ephemeral local port.
pub async fn query(config: &ClientConfig) -> Result<SntpResponse, Status> {
    let server = config.validate()?;
    let sock = UdpSocket::bind(bind_addr_for(&server, 0))
        .await
        .map_err(|e| {
            debug!("bind failed: {}", e);
            Status::NetworkFailure
        })?;
    query_with_socket(config, &sock, SystemClock).await
}

/// Query the configured server through an already bound socket.
pub async fn query_with_socket<C: Clock>(
    config: &ClientConfig,
    sock: &UdpSocket,
    clock: C,
) -> Result<SntpResponse, Status> {
    let server = config.validate()?;

    let mut send_buf = [0u8; PACKET_SIZE];
    let sent = prepare_request(&clock, &mut send_buf)?;

    let sz = sock
        .send_to(&send_buf, server)
        .await
        .map_err(|e| Status::from_send_error(&e))?;
    if sz != PACKET_SIZE {
        return Err(Status::NetworkFailure);
    }
    debug!("sent: {} bytes to {}", sz, server);

    let mut recv_buf = [0u8; PACKET_SIZE + 1];
    let received = tokio::time::timeout(config.receive_timeout(), sock.recv_from(&mut recv_buf))
        .await
        .map_err(|_| Status::NoResponseReceived)?;
    let t4 = clock.now();

    let (len, from) = received.map_err(|e| Status::from_recv_error(&e))?;
    if len == 0 {
        return Err(Status::NoResponseReceived);
    }
    debug!("recv: {} bytes from {}", len, from);

    accept_response(config, server, sent, t4?, &recv_buf[..len], from)
}
