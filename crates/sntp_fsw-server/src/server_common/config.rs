// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! What the server puts in every response.
//!
//! A default [`ServerConfig`] answers as an unsynchronized-but-usable stratum
//! 15 server with no reference identifier. Configuring a kiss code turns every
//! response into a kiss-of-death, which lets clients exercise their rejection
//! handling against a real server.

use std::time::Duration;

use sntp_proto::protocol::{KissCode, ReferenceId, Stratum};

/// Stratum reported when none is configured.
pub const DEFAULT_STRATUM: Stratum = Stratum::SECONDARY_MAX;

/// How long a server loop blocks in receive before checking for shutdown.
pub const DEFAULT_RECEIVE_TIMEOUT: Duration = Duration::from_secs(1);

/// Response fields and loop timing for a server.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct ServerConfig {
    /// Stratum written into every response.
    pub stratum: Stratum,
    /// Reference identifier, or the kiss code when one is configured.
    pub reference_id: ReferenceId,
    /// Log2 of the server clock precision in seconds.
    pub precision: i8,
    /// Copy the request's poll field into the response.
    pub echo_poll: bool,
    /// Bounded receive wait per loop iteration.
    pub receive_timeout: Duration,
}

impl Default for ServerConfig {
    fn default() -> Self {
        ServerConfig {
            stratum: DEFAULT_STRATUM,
            reference_id: ReferenceId::NONE,
            precision: 0,
            echo_poll: true,
            receive_timeout: DEFAULT_RECEIVE_TIMEOUT,
        }
    }
}

impl ServerConfig {
    /// Default configuration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Report `stratum` in responses.
    pub fn with_stratum(mut self, stratum: Stratum) -> Self {
        self.stratum = stratum;
        self
    }

    /// Answer every request with a kiss-of-death carrying `code`.
    ///
    /// Clients only recognize kiss codes at stratum 0, so this also sets the
    /// stratum.
    pub fn with_kiss_code(mut self, code: KissCode) -> Self {
        self.stratum = Stratum::UNSPECIFIED;
        self.reference_id = code.into();
        self
    }

    /// Report `precision` (log2 seconds) in responses.
    pub fn with_precision(mut self, precision: i8) -> Self {
        self.precision = precision;
        self
    }

    /// Set the bounded receive wait of the server loops.
    pub fn with_receive_timeout(mut self, timeout: Duration) -> Self {
        self.receive_timeout = timeout;
        self
    }

    /// The configured kiss code, if responses are kiss-of-death packets.
    pub fn kiss_code(&self) -> Option<KissCode> {
        self.stratum
            .is_kiss_of_death()
            .then(|| self.reference_id.as_kiss_code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::default();
        assert_eq!(config.stratum, Stratum(15));
        assert_eq!(config.reference_id, ReferenceId::NONE);
        assert_eq!(config.receive_timeout, Duration::from_secs(1));
        assert!(config.echo_poll);
        assert_eq!(config.kiss_code(), None);
    }

    #[test]
    fn kiss_code_forces_stratum_zero() {
        let config = ServerConfig::new()
            .with_stratum(Stratum(2))
            .with_kiss_code(KissCode::RATE);
        assert_eq!(config.stratum, Stratum::UNSPECIFIED);
        assert_eq!(config.kiss_code(), Some(KissCode::RATE));
    }

    #[test]
    fn builder_chaining() {
        let config = ServerConfig::new()
            .with_stratum(Stratum(3))
            .with_precision(-18)
            .with_receive_timeout(Duration::from_millis(100));
        assert_eq!(config.stratum, Stratum(3));
        assert_eq!(config.precision, -18);
        assert_eq!(config.receive_timeout, Duration::from_millis(100));
    }
}
