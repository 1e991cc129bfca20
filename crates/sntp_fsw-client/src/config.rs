// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::net::SocketAddr;
use std::time::Duration;

use sntp_proto::codec::KissCodePolicy;
use sntp_proto::status::Status;

/// How long a query waits for the reply by default.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// What a client exchange talks to and how long it waits.
///
/// A default config has no server; running an exchange with it fails with
/// [`Status::ContextNotInitialized`].
#[derive(Clone, Debug)]
pub struct ClientConfig {
    server: Option<SocketAddr>,
    receive_timeout: Duration,
    kiss_policy: KissCodePolicy,
}

impl Default for ClientConfig {
    fn default() -> Self {
        ClientConfig {
            server: None,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
            kiss_policy: KissCodePolicy::default(),
        }
    }
}

impl ClientConfig {
    /// Config for querying `server` with default timeout and kiss policy.
    pub fn new(server: SocketAddr) -> Self {
        ClientConfig {
            server: Some(server),
            ..ClientConfig::default()
        }
    }

    /// Set the bounded receive wait.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// Set the kiss-of-death classification table.
    pub fn with_kiss_policy(mut self, policy: KissCodePolicy) -> Self {
        self.kiss_policy = policy;
        self
    }

    /// The server address, if one was configured.
    pub fn server(&self) -> Option<SocketAddr> {
        self.server
    }

    /// The bounded receive wait.
    pub fn receive_timeout(&self) -> Duration {
        self.receive_timeout
    }

    /// The kiss-of-death classification table.
    pub fn kiss_policy(&self) -> &KissCodePolicy {
        &self.kiss_policy
    }

    /// Check the config is usable and return the server address.
    pub(crate) fn validate(&self) -> Result<SocketAddr, Status> {
        let server = self.server.ok_or(Status::ContextNotInitialized)?;
        if self.receive_timeout.is_zero() {
            return Err(Status::BadParameter);
        }
        Ok(server)
    }
}
