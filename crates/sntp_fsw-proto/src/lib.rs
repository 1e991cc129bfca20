// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP protocol engine: wire types, timestamp arithmetic and the status taxonomy.
//!
//! This crate holds everything the client and server roles share. It performs
//! no I/O of its own; sockets are handed in through [`transport::DatagramTransport`]
//! and time is read through [`timestamp::Clock`].

#![warn(missing_docs)]

/// Byte-level parse errors for the fixed-size packet layout.
pub mod error;

/// Request/response serialization and response validation.
pub mod codec;

/// Poll interval calculation from clock tolerance and desired accuracy.
pub mod poll;

/// SNTP packet types and constants (RFC 4330 / RFC 5905).
pub mod protocol;

/// The closed set of outcomes returned by every fallible operation.
pub mod status;

/// NTP timestamps, host clock access and era-aware differences.
pub mod timestamp;

/// The datagram capability the core sends and receives through.
pub mod transport;

pub use codec::{
    KissCodePolicy, SntpResponse, deserialize_request, deserialize_response,
    deserialize_response_with_policy, serialize_request, serialize_response,
};
pub use protocol::{PACKET_SIZE, Packet};
pub use status::Status;
pub use timestamp::{Clock, NtpDuration, SystemClock, Timestamp};
pub use transport::DatagramTransport;
