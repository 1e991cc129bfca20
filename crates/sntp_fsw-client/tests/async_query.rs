// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Async client queries against loopback responders.

#![cfg(feature = "tokio")]

mod common;

use std::time::Duration;

use common::{skewed_reply, spawn_one_shot_responder};
use sntp_client::timestamp::SystemClock;
use sntp_client::{ClientConfig, Status, async_sntp};

#[tokio::test]
async fn async_query_reports_skew() {
    let (addr, handle) = spawn_one_shot_responder(|req| Some(skewed_reply(req, 2_000)));
    let config = ClientConfig::new(addr).with_receive_timeout(Duration::from_millis(500));
    let response = async_sntp::query(&config).await.expect("query succeeds");
    handle.join().unwrap();
    let offset = response.clock_offset_ms();
    assert!((1_900..=2_100).contains(&offset), "offset {offset}");
}

#[tokio::test]
async fn async_query_with_socket_times_out() {
    let (addr, handle) = spawn_one_shot_responder(|_| None);
    let sock = tokio::net::UdpSocket::bind("127.0.0.1:0").await.unwrap();
    let config = ClientConfig::new(addr).with_receive_timeout(Duration::from_millis(100));
    let err = async_sntp::query_with_socket(&config, &sock, SystemClock)
        .await
        .unwrap_err();
    handle.join().unwrap();
    assert_eq!(err, Status::NoResponseReceived);
}
