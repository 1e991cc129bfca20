// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP server responder.
//!
//! Answers one client request at a time: read the clock on arrival, decode
//! and check the request, echo its transmit time as the origin, and read the
//! clock again right before sending. Malformed datagrams are dropped and
//! logged, never answered.
//!
//! The pure pieces live in [`responder`]; [`blocking::BlockingServer`] and the
//! Tokio `server::SntpServer` (with the `tokio` feature) wrap them in a
//! receive loop and keep the
//! [`ServerCounters`](server_common::ServerCounters) up to date.
//!
//! # Feature Flags
//!
//! | Feature | Default | Description |
//! |---------|---------|-------------|
//! | `cli` | yes | Builds the `sntp-server` test utility (`clap`, `tracing-subscriber`). |
//! | `tokio` | no | SNTP server loop on the Tokio runtime. |

#![warn(missing_docs)]

// Re-export protocol modules for convenience.
pub use sntp_proto::{codec, protocol, status, timestamp, transport};
pub use sntp_proto::{Status, Timestamp};

/// Socket creation via `socket2`.
mod socket;

/// Server configuration, context, counters and housekeeping commands.
pub mod server_common;

/// Request validation and response building.
pub mod responder;

/// Blocking server loop over `std::net::UdpSocket`.
pub mod blocking;

/// SNTP server using the Tokio runtime.
#[cfg(feature = "tokio")]
pub mod server;

pub use responder::{build_response, prepare_reply, process_request, validate_request};
pub use server_common::{Command, CountersSnapshot, ServerConfig, ServerContext, ServerCounters};
