// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP server using the Tokio runtime.
//!
//! Same responder as [`crate::blocking`], driven by `tokio::net::UdpSocket`.
//! Requests are still answered one at a time on a single task.
//!
//! # Examples
//!
//! ```no_run
//! # async fn example() -> std::io::Result<()> {
//! use sntp_server::server::SntpServer;
//!
//! let server = SntpServer::builder()
//!     .listen("0.0.0.0:123".parse().unwrap())
//!     .stratum(sntp_server::protocol::Stratum(2))
//!     .build()
//!     .await?;
//!
//! server.run().await
//! # }
//! ```

use std::io;
use std::net::SocketAddr;
use std::sync::Arc;

use sntp_proto::protocol::{KissCode, PORT, Stratum};
use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, NtpDuration, OffsetClock, SystemClock};
use tokio::net::UdpSocket;
use tracing::{debug, warn};

use crate::responder::{RECV_BUF_SIZE, prepare_reply};
use crate::server_common::{ServerConfig, ServerContext, ServerCounters};
use crate::socket::SocketOptions;

/// Builder for configuring and creating an [`SntpServer`].
#[derive(Debug)]
pub struct SntpServerBuilder {
    listen_addr: SocketAddr,
    config: ServerConfig,
    counters: Option<Arc<ServerCounters>>,
    skew: NtpDuration,
    socket_opts: SocketOptions,
}

impl Default for SntpServerBuilder {
    fn default() -> Self {
        SntpServerBuilder {
            listen_addr: SocketAddr::from(([0, 0, 0, 0], PORT)),
            config: ServerConfig::default(),
            counters: None,
            skew: NtpDuration::ZERO,
            socket_opts: SocketOptions::default(),
        }
    }
}

impl SntpServerBuilder {
    /// Address to listen on. Defaults to `0.0.0.0:123`.
    pub fn listen(mut self, addr: SocketAddr) -> Self {
        self.listen_addr = addr;
        self
    }

    /// Replace the whole response configuration.
    pub fn config(mut self, config: ServerConfig) -> Self {
        self.config = config;
        self
    }

    /// Stratum reported in responses.
    pub fn stratum(mut self, stratum: Stratum) -> Self {
        self.config.stratum = stratum;
        self
    }

    /// Answer every request with a kiss-of-death carrying `code`.
    pub fn kiss_code(mut self, code: KissCode) -> Self {
        self.config = self.config.with_kiss_code(code);
        self
    }

    /// Report time shifted by `skew` from the host clock.
    pub fn skew(mut self, skew: NtpDuration) -> Self {
        self.skew = skew;
        self
    }

    /// Mark replies with a DSCP value.
    pub fn dscp(mut self, dscp: u8) -> Self {
        self.socket_opts.dscp = Some(dscp);
        self
    }

    /// Report into shared counters instead of fresh ones.
    pub fn counters(mut self, counters: Arc<ServerCounters>) -> Self {
        self.counters = Some(counters);
        self
    }

    /// Build the server. Binds to the configured listen address.
    pub async fn build(self) -> io::Result<SntpServer> {
        let std_sock = self.socket_opts.bind_udp(self.listen_addr, true)?;
        let sock = UdpSocket::from_std(std_sock)?;
        debug!("SNTP server listening on {}", sock.local_addr()?);

        let context = match self.counters {
            Some(counters) => ServerContext::with_counters(self.config, counters),
            None => ServerContext::new(self.config),
        };
        Ok(SntpServer {
            sock,
            context,
            clock: OffsetClock::new(SystemClock, self.skew),
        })
    }
}

/// An SNTP server that responds to client requests.
///
/// Created via [`SntpServer::builder()`]. Call [`run()`](SntpServer::run) to
/// start serving requests.
#[derive(Debug)]
pub struct SntpServer {
    sock: UdpSocket,
    context: ServerContext,
    clock: OffsetClock,
}

impl SntpServer {
    /// Create a builder for configuring the server.
    pub fn builder() -> SntpServerBuilder {
        SntpServerBuilder::default()
    }

    /// Configuration and counters.
    pub fn context(&self) -> &ServerContext {
        &self.context
    }

    /// Get the local address the server is bound to.
    pub fn local_addr(&self) -> io::Result<SocketAddr> {
        self.sock.local_addr()
    }

    /// Run the server, processing incoming requests indefinitely.
    ///
    /// This future runs until an I/O error occurs on the receive side. Use
    /// `tokio::select!` or a shutdown signal to stop the server gracefully.
    pub async fn run(self) -> io::Result<()> {
        let mut recv_buf = [0u8; RECV_BUF_SIZE];

        loop {
            let (recv_len, src_addr) = self.sock.recv_from(&mut recv_buf).await?;
            let outcome = self.answer(&recv_buf[..recv_len], src_addr).await;
            self.context.counters().record_request(&outcome);
            if let Err(status) = outcome {
                debug!("dropped packet from {}: {}", src_addr, status);
            }
        }
    }

    async fn answer(&self, datagram: &[u8], from: SocketAddr) -> Result<SocketAddr, Status> {
        let receive_time = self.clock.now()?;
        let reply = prepare_reply(self.context.config(), datagram, receive_time, &self.clock)?;
        self.sock.send_to(&reply, from).await.map_err(|e| {
            warn!(%from, error = %e, "unable to send reply");
            Status::NetworkFailure
        })?;
        Ok(from)
    }
}
