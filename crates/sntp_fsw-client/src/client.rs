// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Blocking client context.
//!
//! [`SntpClient`] bundles a configured [`ClientConfig`] with the UDP socket
//! it queries through, so a host loop can call [`SntpClient::query`]
//! repeatedly without re-binding.

use log::debug;
use std::net::{SocketAddr, UdpSocket};
use std::time::Duration;

use sntp_proto::codec::{KissCodePolicy, SntpResponse};
use sntp_proto::status::Status;
use sntp_proto::timestamp::{Clock, SystemClock};

use crate::config::{ClientConfig, DEFAULT_RECEIVE_TIMEOUT};
use crate::exchange::run_query;

/// Pick the unspecified local address matching the target's family.
pub(crate) fn bind_addr_for(target: &SocketAddr, local_port: u16) -> SocketAddr {
    match target {
        SocketAddr::V4(_) => SocketAddr::from(([0, 0, 0, 0], local_port)),
        SocketAddr::V6(_) => SocketAddr::from(([0u16; 8], local_port)),
    }
}

/// Builder for [`SntpClient`].
#[derive(Clone, Debug)]
pub struct SntpClientBuilder {
    server: Option<SocketAddr>,
    local_port: u16,
    receive_timeout: Duration,
    kiss_policy: KissCodePolicy,
}

impl Default for SntpClientBuilder {
    fn default() -> Self {
        SntpClientBuilder {
            server: None,
            local_port: 0,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            kiss_policy: KissCodePolicy::default(),
        }
    }
}

impl SntpClientBuilder {
    /// Server to query.
    pub fn server(mut self, addr: SocketAddr) -> Self {
        self.server = Some(addr);
        self
    }

    /// Local UDP port to bind; 0 (the default) lets the OS choose.
    pub fn local_port(mut self, port: u16) -> Self {
        self.local_port = port;
        self
    }

    /// Bounded receive wait per query.
    pub fn receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Kiss-of-death classification table.
    pub fn kiss_policy(mut self, policy: KissCodePolicy) -> Self {
        self.kiss_policy = policy;
        self
    }

    /// Bind the socket and build the client.
    ///
    /// Fails with [`Status::ContextNotInitialized`] if no server was set and
    /// [`Status::NetworkFailure`] if the local port cannot be bound.
    pub fn build(self) -> Result<SntpClient, Status> {
        let server = self.server.ok_or(Status::ContextNotInitialized)?;
        let config = ClientConfig::new(server)
            .with_receive_timeout(self.receive_timeout)
            .with_kiss_policy(self.kiss_policy);
        config.validate()?;

        let bind_addr = bind_addr_for(&server, self.local_port);
        let socket = UdpSocket::bind(bind_addr).map_err(|e| {
            debug!("bind {} failed: {}", bind_addr, e);
            Status::NetworkFailure
        })?;
        debug!("{:?}", socket.local_addr());
        Ok(SntpClient { config, socket })
    }
}

/// A client bound to a local UDP socket.
#[derive(Debug)]
pub struct SntpClient {
    config: ClientConfig,
    socket: UdpSocket,
}

impl SntpClient {
    /// Start building a client.
    pub fn builder() -> SntpClientBuilder {
        SntpClientBuilder::default()
    }

    /// The configuration queries run with.
    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    /// Local address of the socket.
    pub fn local_addr(&self) -> Result<SocketAddr, Status> {
        self.socket
            .local_addr()
            .map_err(|_| Status::NetworkFailure)
    }

    /// Run one exchange against the configured server using the host clock.
    pub fn query(&self) -> Result<SntpResponse, Status> {
        self.query_with_clock(SystemClock)
    }

    /// Run one exchange reading time from `clock`.
    pub fn query_with_clock<C: Clock>(&self, clock: C) -> Result<SntpResponse, Status> {
        run_query(&self.config, &self.socket, clock)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bind_addr_matches_family() {
        let v4: SocketAddr = "192.0.2.1:123".parse().unwrap();
        let v6: SocketAddr = "[2001:db8::1]:123".parse().unwrap();
        assert_eq!(bind_addr_for(&v4, 0), "0.0.0.0:0".parse().unwrap());
        assert_eq!(bind_addr_for(&v6, 4123), "[::]:4123".parse().unwrap());
    }

    #[test]
    fn build_without_server_fails() {
        let err = SntpClient::builder().build().unwrap_err();
        assert_eq!(err, Status::ContextNotInitialized);
    }

    #[test]
    fn build_with_zero_timeout_fails() {
        let err = SntpClient::builder()
            .server("127.0.0.1:123".parse().unwrap())
            .receive_timeout(Duration::ZERO)
            .build()
            .unwrap_err();
        assert_eq!(err, Status::BadParameter);
    }

    #[test]
    fn query_silent_server_times_out() {
        // A bound socket that never answers.
        let silent = UdpSocket::bind("127.0.0.1:0").unwrap();
        let client = SntpClient::builder()
            .server(silent.local_addr().unwrap())
            .receive_timeout(Duration::from_millis(50))
            .build()
            .unwrap();
        assert!(client.local_addr().unwrap().port() != 0);
        assert_eq!(client.query().unwrap_err(), Status::NoResponseReceived);
    }
}
