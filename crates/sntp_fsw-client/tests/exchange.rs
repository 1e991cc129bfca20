// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking client exchanges against loopback responders.

mod common;

use std::time::Duration;

use common::{assert_client_request, skewed_reply, spawn_one_shot_responder};
use sntp_client::client::SntpClient;
use sntp_client::protocol::{KissCode, Mode, Packet, Stratum};
use sntp_client::{ClientConfig, Status, run_query};

const TIMEOUT: Duration = Duration::from_millis(500);

fn client_for(addr: std::net::SocketAddr) -> SntpClient {
    SntpClient::builder()
        .server(addr)
        .receive_timeout(TIMEOUT)
        .build()
        .expect("client builds")
}

#[test]
fn server_ahead_gives_positive_offset() {
    let (addr, handle) = spawn_one_shot_responder(|req| {
        assert_client_request(req);
        Some(skewed_reply(req, 5_000))
    });
    let response = client_for(addr).query().expect("query succeeds");
    handle.join().unwrap();

    let offset = response.clock_offset_ms();
    assert!((4_900..=5_100).contains(&offset), "offset {offset}");
    assert!(response.round_trip_delay_ms() >= 0);
    assert_eq!(response.stratum, Stratum::SECONDARY_MAX);
}

#[test]
fn server_behind_gives_negative_offset() {
    let (addr, handle) = spawn_one_shot_responder(|req| Some(skewed_reply(req, -3_000)));
    let response = client_for(addr).query().expect("query succeeds");
    handle.join().unwrap();

    let offset = response.clock_offset_ms();
    assert!((-3_100..=-2_900).contains(&offset), "offset {offset}");
}

#[test]
fn silent_server_times_out() {
    let (addr, handle) = spawn_one_shot_responder(|_| None);
    let err = client_for(addr).query().unwrap_err();
    handle.join().unwrap();
    assert_eq!(err, Status::NoResponseReceived);
    assert!(err.is_timeout());
}

#[test]
fn truncated_reply_is_network_failure() {
    let (addr, handle) = spawn_one_shot_responder(|req| {
        let mut reply = skewed_reply(req, 0);
        reply.truncate(40);
        Some(reply)
    });
    let err = client_for(addr).query().unwrap_err();
    handle.join().unwrap();
    assert_eq!(err, Status::NetworkFailure);
}

#[test]
fn replayed_reply_is_invalid() {
    // The responder answers with an origin that was never sent.
    let (addr, handle) = spawn_one_shot_responder(|req| {
        let mut reply = skewed_reply(req, 0);
        reply[31] ^= 0xFF;
        Some(reply)
    });
    let err = client_for(addr).query().unwrap_err();
    handle.join().unwrap();
    assert_eq!(err, Status::InvalidResponse);
}

#[test]
fn kiss_of_death_is_rejected() {
    let (addr, handle) = spawn_one_shot_responder(|req| {
        let request = Packet::read_from(req).unwrap();
        let reply = Packet {
            mode: Mode::Server,
            stratum: Stratum::UNSPECIFIED,
            reference_id: KissCode::DENY.into(),
            origin_timestamp: request.transmit_timestamp,
            ..Packet::default()
        };
        Some(reply.to_bytes().to_vec())
    });
    let err = client_for(addr).query().unwrap_err();
    handle.join().unwrap();
    assert_eq!(err, Status::RejectedResponseChangeServer);
    assert!(err.is_rejection());
}

#[test]
fn run_query_on_caller_socket() {
    let (addr, handle) = spawn_one_shot_responder(|req| Some(skewed_reply(req, 0)));
    let socket = std::net::UdpSocket::bind("127.0.0.1:0").unwrap();
    let config = ClientConfig::new(addr).with_receive_timeout(TIMEOUT);
    let response = run_query(&config, &socket, sntp_client::timestamp::SystemClock)
        .expect("query succeeds");
    handle.join().unwrap();
    assert!(response.clock_offset_ms().abs() < 100);
}
