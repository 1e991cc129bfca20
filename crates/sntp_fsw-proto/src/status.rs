// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! The closed set of SNTP outcomes.
//!
//! Every fallible operation in the workspace returns `Result<T, Status>`. The
//! error arm never carries [`Status::Success`]; that variant exists so the
//! taxonomy can be reported as a single numeric code (telemetry, exit codes)
//! with [`Status::of`].
//!
//! Several variants are reserved for extensions that are not built here
//! (DNS-resolved server pools, authentication). They are part of the enum so
//! that downstream `match` statements stay exhaustive when those arrive.

use std::fmt;
use std::io;

/// Outcome of an SNTP codec call, client exchange or server response.
///
/// Discriminants are stable and double as the numeric status code.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Status {
    /// The operation completed.
    Success = 0,
    /// An argument had an invalid size or value.
    BadParameter = 1,
    /// The server rejected the request without a more specific kiss code.
    RejectedResponse = 2,
    /// Kiss-of-death asking the client to stop using this server.
    RejectedResponseChangeServer = 3,
    /// Kiss-of-death asking the client to reduce its request rate.
    RejectedResponseRetryWithBackoff = 4,
    /// Kiss-of-death with a code the configured policy does not map.
    RejectedResponseOtherCode = 5,
    /// An output buffer was smaller than the fixed packet size.
    BufferTooSmall = 6,
    /// Response length, origin echo, version or mode did not match.
    InvalidResponse = 7,
    /// The computed poll interval was shorter than one second.
    ZeroPollInterval = 8,
    /// The host clock reads a time the protocol cannot represent.
    TimeNotSupported = 9,
    /// Reserved: server name resolution failed.
    DnsFailure = 10,
    /// A transport send or receive failed for a reason other than timeout.
    NetworkFailure = 11,
    /// Reserved: the server could not be authenticated.
    ServerNotAuthenticated = 12,
    /// Reserved: authentication data did not verify.
    AuthFailure = 13,
    /// The transport timed out while sending.
    SendTimeout = 14,
    /// Reserved: an overall response deadline elapsed.
    ResponseTimeout = 15,
    /// No datagram arrived within the bounded receive window.
    NoResponseReceived = 16,
    /// A context was used before it was given a server to talk to.
    ContextNotInitialized = 17,
}

/// Text returned by [`status_code_to_str`] for codes outside the taxonomy.
pub const UNKNOWN_STATUS_TEXT: &str = "Unknown SNTP status";

const STATUS_TABLE: [Status; 18] = [
    Status::Success,
    Status::BadParameter,
    Status::RejectedResponse,
    Status::RejectedResponseChangeServer,
    Status::RejectedResponseRetryWithBackoff,
    Status::RejectedResponseOtherCode,
    Status::BufferTooSmall,
    Status::InvalidResponse,
    Status::ZeroPollInterval,
    Status::TimeNotSupported,
    Status::DnsFailure,
    Status::NetworkFailure,
    Status::ServerNotAuthenticated,
    Status::AuthFailure,
    Status::SendTimeout,
    Status::ResponseTimeout,
    Status::NoResponseReceived,
    Status::ContextNotInitialized,
];

impl Status {
    /// Every status, in code order.
    pub const ALL: [Status; 18] = STATUS_TABLE;

    /// Diagnostic name of this status.
    pub const fn as_str(self) -> &'static str {
        match self {
            Status::Success => "SntpSuccess",
            Status::BadParameter => "SntpErrorBadParameter",
            Status::RejectedResponse => "SntpRejectedResponse",
            Status::RejectedResponseChangeServer => "SntpRejectedResponseChangeServer",
            Status::RejectedResponseRetryWithBackoff => "SntpRejectedResponseRetryWithBackoff",
            Status::RejectedResponseOtherCode => "SntpRejectedResponseOtherCode",
            Status::BufferTooSmall => "SntpErrorBufferTooSmall",
            Status::InvalidResponse => "SntpInvalidResponse",
            Status::ZeroPollInterval => "SntpZeroPollInterval",
            Status::TimeNotSupported => "SntpErrorTimeNotSupported",
            Status::DnsFailure => "SntpErrorDnsFailure",
            Status::NetworkFailure => "SntpErrorNetworkFailure",
            Status::ServerNotAuthenticated => "SntpServerNotAuthenticated",
            Status::AuthFailure => "SntpErrorAuthFailure",
            Status::SendTimeout => "SntpErrorSendTimeout",
            Status::ResponseTimeout => "SntpErrorResponseTimeout",
            Status::NoResponseReceived => "SntpNoResponseReceived",
            Status::ContextNotInitialized => "SntpErrorContextNotInitialized",
        }
    }

    /// Numeric status code.
    pub const fn code(self) -> u8 {
        self as u8
    }

    /// Look up a status by numeric code.
    pub fn from_code(code: u8) -> Option<Status> {
        STATUS_TABLE.get(usize::from(code)).copied()
    }

    /// Collapse a result into its status.
    pub fn of<T>(result: &Result<T, Status>) -> Status {
        match result {
            Ok(_) => Status::Success,
            Err(status) => *status,
        }
    }

    /// Whether this is [`Status::Success`].
    pub fn is_success(self) -> bool {
        self == Status::Success
    }

    /// Whether this belongs to the kiss-of-death rejection family.
    pub fn is_rejection(self) -> bool {
        matches!(
            self,
            Status::RejectedResponse
                | Status::RejectedResponseChangeServer
                | Status::RejectedResponseRetryWithBackoff
                | Status::RejectedResponseOtherCode
        )
    }

    /// Whether this is a timeout-class outcome, as opposed to a hard failure.
    pub fn is_timeout(self) -> bool {
        matches!(
            self,
            Status::SendTimeout | Status::ResponseTimeout | Status::NoResponseReceived
        )
    }

    /// Whether this variant is reserved for functionality not built here.
    pub fn is_reserved(self) -> bool {
        matches!(
            self,
            Status::DnsFailure | Status::ServerNotAuthenticated | Status::AuthFailure
        )
    }

    /// Classify a transport receive error.
    ///
    /// `WouldBlock` and `TimedOut` are what a socket with a read timeout
    /// reports when nothing arrived; everything else is a hard failure.
    pub fn from_recv_error(err: &io::Error) -> Status {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Status::NoResponseReceived,
            _ => Status::NetworkFailure,
        }
    }

    /// Classify a transport send error.
    pub fn from_send_error(err: &io::Error) -> Status {
        match err.kind() {
            io::ErrorKind::WouldBlock | io::ErrorKind::TimedOut => Status::SendTimeout,
            _ => Status::NetworkFailure,
        }
    }
}

/// Diagnostic text for a raw status code, including codes outside the taxonomy.
pub fn status_code_to_str(code: u8) -> &'static str {
    Status::from_code(code).map_or(UNKNOWN_STATUS_TEXT, Status::as_str)
}

impl fmt::Display for Status {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::error::Error for Status {}

impl From<Status> for io::Error {
    fn from(status: Status) -> io::Error {
        let kind = match status {
            Status::BadParameter | Status::BufferTooSmall | Status::ContextNotInitialized => {
                io::ErrorKind::InvalidInput
            }
            Status::InvalidResponse => io::ErrorKind::InvalidData,
            Status::SendTimeout | Status::ResponseTimeout | Status::NoResponseReceived => {
                io::ErrorKind::TimedOut
            }
            Status::RejectedResponse
            | Status::RejectedResponseChangeServer
            | Status::RejectedResponseRetryWithBackoff
            | Status::RejectedResponseOtherCode
            | Status::ServerNotAuthenticated
            | Status::AuthFailure => io::ErrorKind::ConnectionRefused,
            Status::TimeNotSupported | Status::ZeroPollInterval => io::ErrorKind::Unsupported,
            Status::Success | Status::DnsFailure | Status::NetworkFailure => io::ErrorKind::Other,
        };
        io::Error::new(kind, status)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn codes_follow_table_order() {
        for (i, status) in Status::ALL.iter().enumerate() {
            assert_eq!(status.code() as usize, i);
            assert_eq!(Status::from_code(i as u8), Some(*status));
        }
        assert_eq!(Status::from_code(18), None);
    }

    #[test]
    fn diagnostic_text() {
        assert_eq!(Status::Success.as_str(), "SntpSuccess");
        assert_eq!(Status::BadParameter.to_string(), "SntpErrorBadParameter");
        assert_eq!(
            Status::RejectedResponseRetryWithBackoff.as_str(),
            "SntpRejectedResponseRetryWithBackoff"
        );
        assert_eq!(
            Status::ContextNotInitialized.as_str(),
            "SntpErrorContextNotInitialized"
        );
        assert_eq!(status_code_to_str(11), "SntpErrorNetworkFailure");
        assert_eq!(status_code_to_str(18), UNKNOWN_STATUS_TEXT);
        assert_eq!(status_code_to_str(255), "Unknown SNTP status");
    }

    #[test]
    fn families() {
        let rejections: Vec<_> = Status::ALL.iter().filter(|s| s.is_rejection()).collect();
        assert_eq!(rejections.len(), 4);
        assert!(Status::NoResponseReceived.is_timeout());
        assert!(!Status::NetworkFailure.is_timeout());
        assert!(Status::DnsFailure.is_reserved());
        assert!(Status::AuthFailure.is_reserved());
        assert!(!Status::InvalidResponse.is_reserved());
    }

    #[test]
    fn of_collapses_results() {
        let ok: Result<u32, Status> = Ok(5);
        let err: Result<u32, Status> = Err(Status::InvalidResponse);
        assert_eq!(Status::of(&ok), Status::Success);
        assert_eq!(Status::of(&err), Status::InvalidResponse);
    }

    #[test]
    fn transport_error_classification() {
        let would_block = io::Error::from(io::ErrorKind::WouldBlock);
        let timed_out = io::Error::from(io::ErrorKind::TimedOut);
        let refused = io::Error::from(io::ErrorKind::ConnectionRefused);
        assert_eq!(
            Status::from_recv_error(&would_block),
            Status::NoResponseReceived
        );
        assert_eq!(Status::from_recv_error(&timed_out), Status::NoResponseReceived);
        assert_eq!(Status::from_recv_error(&refused), Status::NetworkFailure);
        assert_eq!(Status::from_send_error(&timed_out), Status::SendTimeout);
        assert_eq!(Status::from_send_error(&refused), Status::NetworkFailure);
    }

    #[test]
    fn into_io_error() {
        let err: io::Error = Status::NoResponseReceived.into();
        assert_eq!(err.kind(), io::ErrorKind::TimedOut);
        let err: io::Error = Status::InvalidResponse.into();
        assert_eq!(err.kind(), io::ErrorKind::InvalidData);
        assert_eq!(err.to_string(), "SntpInvalidResponse");
    }
}
