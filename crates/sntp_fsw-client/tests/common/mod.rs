// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared helpers for integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(dead_code, unreachable_pub)]

use std::net::{SocketAddr, UdpSocket};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sntp_client::protocol::{Mode, PACKET_SIZE, Packet, Stratum};
use sntp_client::timestamp::{NtpDuration, Timestamp};

/// Bind a loopback socket that answers exactly one datagram with `reply`.
///
/// `reply` sees the raw request and returns the bytes to send back, or
/// `None` to stay silent. The thread exits after one datagram or two seconds.
pub fn spawn_one_shot_responder<F>(reply: F) -> (SocketAddr, JoinHandle<()>)
where
    F: FnOnce(&[u8]) -> Option<Vec<u8>> + Send + 'static,
{
    let sock = UdpSocket::bind("127.0.0.1:0").expect("bind responder");
    sock.set_read_timeout(Some(Duration::from_secs(2)))
        .expect("set timeout");
    let addr = sock.local_addr().expect("local addr");
    let handle = thread::spawn(move || {
        let mut buf = [0u8; 512];
        let Ok((len, from)) = sock.recv_from(&mut buf) else {
            return;
        };
        if let Some(bytes) = reply(&buf[..len]) {
            let _ = sock.send_to(&bytes, from);
        }
    });
    (addr, handle)
}

/// A well-formed stratum-15 reply to `request`, with the server clock
/// running `skew_ms` ahead of the host.
pub fn skewed_reply(request: &[u8], skew_ms: i64) -> Vec<u8> {
    let request = Packet::read_from(request).expect("request parses");
    let skew = NtpDuration::from_millis(skew_ms);
    let now = Timestamp::now().expect("host clock").offset_by(skew);
    Packet {
        mode: Mode::Server,
        stratum: Stratum::SECONDARY_MAX,
        origin_timestamp: request.transmit_timestamp,
        receive_timestamp: now,
        transmit_timestamp: now,
        ..Packet::default()
    }
    .to_bytes()
    .to_vec()
}

/// Assert a request datagram is a well-formed client request.
pub fn assert_client_request(request: &[u8]) {
    assert_eq!(request.len(), PACKET_SIZE);
    let packet = Packet::read_from(request).expect("request parses");
    assert_eq!(packet.mode, Mode::Client);
    assert!(!packet.transmit_timestamp.is_zero());
}
