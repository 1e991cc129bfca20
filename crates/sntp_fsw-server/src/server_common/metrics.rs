// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Lock-free server counters using atomic integers.
//!
//! All counters use relaxed ordering. Values read while a server loop is
//! running are individually exact but not a consistent set.

use std::net::SocketAddr;
use std::sync::atomic::{AtomicU64, Ordering};

use sntp_proto::status::Status;

/// Request and command counters, updated by the server loops.
///
/// # Examples
///
/// ```no_run
/// use std::sync::Arc;
/// use sntp_server::blocking::BlockingServer;
/// use sntp_server::ServerConfig;
///
/// let server = BlockingServer::bind("127.0.0.1:1123".parse().unwrap(), ServerConfig::new())?;
/// let counters = Arc::clone(server.context().counters());
///
/// // Read counters from another thread
/// let snap = counters.snapshot();
/// println!("requests: {}", snap.requests_received);
/// # Ok::<(), std::io::Error>(())
/// ```
#[derive(Debug, Default)]
pub struct ServerCounters {
    /// Datagrams received (valid or not).
    pub requests_received: AtomicU64,
    /// Datagrams dropped because they were not a whole packet.
    pub bad_requests: AtomicU64,
    /// Whole packets dropped because they were not a usable client request.
    pub invalid_requests: AtomicU64,
    /// Responses sent.
    pub responses_sent: AtomicU64,
    /// Valid requests that could not be answered: the send failed or the
    /// clock could not be read.
    pub send_failures: AtomicU64,
    /// Housekeeping commands accepted.
    pub command_counter: AtomicU64,
    /// Housekeeping commands rejected.
    pub command_error_counter: AtomicU64,
}

impl ServerCounters {
    /// Counters all at zero.
    pub fn new() -> Self {
        Self::default()
    }

    /// Return a point-in-time snapshot of all counters.
    pub fn snapshot(&self) -> CountersSnapshot {
        CountersSnapshot {
            requests_received: self.requests_received.load(Ordering::Relaxed),
            bad_requests: self.bad_requests.load(Ordering::Relaxed),
            invalid_requests: self.invalid_requests.load(Ordering::Relaxed),
            responses_sent: self.responses_sent.load(Ordering::Relaxed),
            send_failures: self.send_failures.load(Ordering::Relaxed),
            command_counter: self.command_counter.load(Ordering::Relaxed),
            command_error_counter: self.command_error_counter.load(Ordering::Relaxed),
        }
    }

    /// Zero every counter.
    pub fn reset(&self) {
        for counter in [
            &self.requests_received,
            &self.bad_requests,
            &self.invalid_requests,
            &self.responses_sent,
            &self.send_failures,
            &self.command_counter,
            &self.command_error_counter,
        ] {
            counter.store(0, Ordering::Relaxed);
        }
    }

    /// Account for one received datagram and what became of it.
    pub(crate) fn record_request(&self, outcome: &Result<SocketAddr, Status>) {
        self.requests_received.fetch_add(1, Ordering::Relaxed);
        let counter = match outcome {
            Ok(_) => &self.responses_sent,
            Err(Status::BadParameter) => &self.bad_requests,
            Err(Status::NetworkFailure | Status::SendTimeout | Status::TimeNotSupported) => {
                &self.send_failures
            }
            Err(_) => &self.invalid_requests,
        };
        counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_command(&self) {
        self.command_counter.fetch_add(1, Ordering::Relaxed);
    }

    #[inline]
    pub(crate) fn inc_command_error(&self) {
        self.command_error_counter.fetch_add(1, Ordering::Relaxed);
    }
}

/// A point-in-time copy of [`ServerCounters`].
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct CountersSnapshot {
    /// Datagrams received (valid or not).
    pub requests_received: u64,
    /// Datagrams dropped because they were not a whole packet.
    pub bad_requests: u64,
    /// Whole packets dropped because they were not a usable client request.
    pub invalid_requests: u64,
    /// Responses sent.
    pub responses_sent: u64,
    /// Valid requests that could not be answered: the send failed or the
    /// clock could not be read.
    pub send_failures: u64,
    /// Housekeeping commands accepted.
    pub command_counter: u64,
    /// Housekeeping commands rejected.
    pub command_error_counter: u64,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn client() -> SocketAddr {
        "127.0.0.1:40000".parse().unwrap()
    }

    #[test]
    fn new_counters_are_zero() {
        assert_eq!(ServerCounters::new().snapshot(), CountersSnapshot::default());
    }

    #[test]
    fn outcomes_land_in_their_counter() {
        let c = ServerCounters::new();
        c.record_request(&Ok(client()));
        c.record_request(&Ok(client()));
        c.record_request(&Err(Status::BadParameter));
        c.record_request(&Err(Status::InvalidResponse));
        c.record_request(&Err(Status::NetworkFailure));
        c.record_request(&Err(Status::TimeNotSupported));
        let s = c.snapshot();
        assert_eq!(s.requests_received, 6);
        assert_eq!(s.responses_sent, 2);
        assert_eq!(s.bad_requests, 1);
        assert_eq!(s.invalid_requests, 1);
        assert_eq!(s.send_failures, 2);
    }

    #[test]
    fn reset_zeroes_everything() {
        let c = ServerCounters::new();
        c.record_request(&Ok(client()));
        c.inc_command();
        c.inc_command_error();
        c.reset();
        assert_eq!(c.snapshot(), CountersSnapshot::default());
    }
}
