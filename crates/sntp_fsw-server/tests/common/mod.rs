// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared test helpers for server integration tests.

// Integration test helpers are `pub` so each `tests/*.rs` file can import them
// via `mod common`, but not every file uses every helper.
#![allow(dead_code, unreachable_pub)]

use std::net::SocketAddr;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::thread::{self, JoinHandle};
use std::time::Duration;

use sntp_server::blocking::BlockingServer;
use sntp_server::timestamp::{NtpDuration, OffsetClock, SystemClock};
use sntp_server::{ServerConfig, ServerContext};

/// A blocking server running on its own thread; stopped on drop.
pub struct RunningServer {
    pub addr: SocketAddr,
    pub context: ServerContext,
    shutdown: Arc<AtomicBool>,
    handle: Option<JoinHandle<()>>,
}

impl Drop for RunningServer {
    fn drop(&mut self) {
        self.shutdown.store(true, Ordering::Relaxed);
        if let Some(handle) = self.handle.take() {
            let _ = handle.join();
        }
    }
}

/// Spawn a blocking server on an ephemeral loopback port.
///
/// The server's clock runs `skew_ms` ahead of the host clock. A short
/// receive timeout keeps shutdown prompt.
pub fn spawn_server(config: ServerConfig, skew_ms: i64) -> RunningServer {
    let config = config.with_receive_timeout(Duration::from_millis(20));
    let server = BlockingServer::bind("127.0.0.1:0".parse().unwrap(), config)
        .expect("failed to bind test server")
        .with_clock(OffsetClock::new(SystemClock, NtpDuration::from_millis(skew_ms)));
    let addr = server.local_addr().expect("failed to get local addr");
    let context = server.context().clone();
    let shutdown = Arc::new(AtomicBool::new(false));
    let flag = shutdown.clone();
    let handle = thread::spawn(move || server.run(&flag));
    RunningServer {
        addr,
        context,
        shutdown,
        handle: Some(handle),
    }
}

/// Send `datagram` from a fresh socket and wait briefly for any reply.
pub fn send_raw(addr: SocketAddr, datagram: &[u8], timeout: Duration) -> Option<Vec<u8>> {
    let sock = std::net::UdpSocket::bind("127.0.0.1:0").expect("bind failed");
    sock.set_read_timeout(Some(timeout)).expect("set timeout");
    sock.send_to(datagram, addr).expect("send failed");
    let mut buf = [0u8; 512];
    sock.recv_from(&mut buf).ok().map(|(n, _)| buf[..n].to_vec())
}

/// Poll `check` until it holds or a second passes.
pub fn eventually(check: impl Fn() -> bool) -> bool {
    for _ in 0..100 {
        if check() {
            return true;
        }
        thread::sleep(Duration::from_millis(10));
    }
    false
}
