// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The async client against the Tokio server.

#![cfg(feature = "tokio")]

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use sntp_client::{ClientConfig, async_sntp};
use sntp_server::protocol::KissCode;
use sntp_server::server::SntpServer;
use sntp_server::timestamp::NtpDuration;
use sntp_server::{ServerCounters, Status};

async fn spawn(builder: sntp_server::server::SntpServerBuilder) -> SocketAddr {
    let server = builder
        .listen("127.0.0.1:0".parse().unwrap())
        .build()
        .await
        .expect("failed to bind test server");
    let addr = server.local_addr().expect("failed to get local addr");
    tokio::spawn(async move {
        let _ = server.run().await;
    });
    addr
}

fn config(addr: SocketAddr) -> ClientConfig {
    ClientConfig::new(addr).with_receive_timeout(Duration::from_millis(500))
}

#[tokio::test]
async fn skewed_server_offset() {
    let counters = Arc::new(ServerCounters::new());
    let addr = spawn(
        SntpServer::builder()
            .skew(NtpDuration::from_millis(-2_000))
            .counters(counters.clone()),
    )
    .await;

    let response = async_sntp::query(&config(addr)).await.expect("query succeeds");
    let offset = response.clock_offset_ms();
    assert!((-2_100..=-1_900).contains(&offset), "offset {offset}");
    assert_eq!(counters.snapshot().requests_received, 1);
}

#[tokio::test]
async fn kiss_server_rejects() {
    let addr = spawn(SntpServer::builder().kiss_code(KissCode::RSTR)).await;
    let err = async_sntp::query(&config(addr)).await.unwrap_err();
    assert_eq!(err, Status::RejectedResponseChangeServer);
}
