// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking SNTP server over `std::net::UdpSocket`.
//!
//! The receive wait is bounded by
//! [`ServerConfig::receive_timeout`](crate::ServerConfig::receive_timeout)
//! (one second by default) so a host loop gets control back periodically,
//! for example to service housekeeping commands or to notice shutdown.
//!
//! # Examples
//!
//! ```no_run
//! use std::sync::atomic::AtomicBool;
//! use sntp_server::blocking::BlockingServer;
//! use sntp_server::ServerConfig;
//!
//! let server = BlockingServer::bind("0.0.0.0:123".parse().unwrap(), ServerConfig::new())?;
//! let shutdown = AtomicBool::new(false);
//! server.run(&shutdown);
//! # Ok::<(), std::io::Error>(())
//! ```

use std::io;
use std::net::{SocketAddr, UdpSocket};
use std::sync::atomic::{AtomicBool, Ordering};

use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, SystemClock};
use tracing::{debug, info, warn};

use crate::responder::{RECV_BUF_SIZE, respond};
use crate::server_common::{ServerConfig, ServerContext};
use crate::socket::SocketOptions;

/// A single-threaded server answering one request per [`poll_once`](Self::poll_once).
#[derive(Debug)]
pub struct BlockingServer<C = SystemClock> {
    socket: UdpSocket,
    context: ServerContext,
    clock: C,
}

impl BlockingServer<SystemClock> {
    /// Bind `addr` and answer with `config`, reading the host clock.
    pub fn bind(addr: SocketAddr, config: ServerConfig) -> io::Result<Self> {
        Self::bind_with_options(addr, ServerContext::new(config), &SocketOptions::default())
    }

    /// Bind `addr`, marking replies with the given DSCP value.
    pub fn bind_with_dscp(addr: SocketAddr, config: ServerConfig, dscp: u8) -> io::Result<Self> {
        let opts = SocketOptions { dscp: Some(dscp) };
        Self::bind_with_options(addr, ServerContext::new(config), &opts)
    }

    /// Bind `addr` reporting into an existing context.
    pub fn bind_context(addr: SocketAddr, context: ServerContext) -> io::Result<Self> {
        Self::bind_with_options(addr, context, &SocketOptions::default())
    }

    fn bind_with_options(
        addr: SocketAddr,
        context: ServerContext,
        opts: &SocketOptions,
    ) -> io::Result<Self> {
        let socket = opts.bind_udp(addr, false)?;
        // A zero timeout means "block forever" to std; keep the loop bounded.
        let timeout = context.config().receive_timeout.max(std::time::Duration::from_millis(1));
        socket.set_read_timeout(Some(timeout))?;
        debug!("SNTP server listening on {}", socket.local_addr()?);
        Ok(BlockingServer {
            socket,
            context,
            clock: SystemClock,
        })
    }
}

impl<C: Clock> BlockingServer<C> {
    /// Read time from `clock` instead, e.g. an
    /// [`OffsetClock`](sntp_proto::timestamp::OffsetClock) for skew testing.
    pub fn with_clock<D: Clock>(self, clock: D) -> BlockingServer<D> {
        BlockingServer {
            socket: self.socket,
            context: self.context,
            clock,
        }
    }

    /// The local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.socket.local_addr()
    }

    /// Configuration and counters.
    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// Wait up to the receive timeout for one datagram and answer it.
    ///
    /// Returns `Ok(None)` if nothing arrived, `Ok(Some(client))` once a reply
    /// is sent. A datagram that was dropped or could not be answered is
    /// counted and returned as its status. Receive errors other than a
    /// timeout are returned as [`Status::NetworkFailure`] without counting.
    pub fn poll_once(&self) -> Result<Option<SocketAddr>, Status> {
        let mut buf = [0u8; RECV_BUF_SIZE];
        let (len, from) = match self.socket.recv_from(&mut buf) {
            Ok(received) => received,
            Err(e) => {
                return match Status::from_recv_error(&e) {
                    Status::NoResponseReceived => Ok(None),
                    status => {
                        warn!(error = %e, "unexpected receive error");
                        Err(status)
                    }
                };
            }
        };
        let outcome = self.clock.now().and_then(|receive_time| {
            respond(
                self.context.config(),
                &self.socket,
                &self.clock,
                &buf[..len],
                from,
                receive_time,
            )
        });
        self.context.counters().record_request(&outcome);
        match outcome {
            Ok(client) => Ok(Some(client)),
            Err(status) => {
                debug!(%from, len, %status, "request not answered");
                Err(status)
            }
        }
    }

    /// Answer requests until `shutdown` is set.
    ///
    /// Individual failures are logged and counted, never fatal. `shutdown` is
    /// checked at least once per receive timeout.
    pub fn run(&self, shutdown: &AtomicBool) {
        info!(addr = ?self.socket.local_addr().ok(), "SNTP server listening");
        while !shutdown.load(Ordering::Relaxed) {
            if let Err(status) = self.poll_once() {
                debug!(%status, "poll failed");
            }
        }
        info!(counters = ?self.context.counters().snapshot(), "SNTP server stopped");
    }
}
