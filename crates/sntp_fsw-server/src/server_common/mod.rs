// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Shared types for the SNTP server loops, used by both the blocking
//! [`crate::blocking`] and Tokio `crate::server` modules.

mod command;
mod config;
mod context;
mod metrics;

pub use self::command::Command;
pub use self::config::{DEFAULT_RECEIVE_TIMEOUT, DEFAULT_STRATUM, ServerConfig};
pub use self::context::ServerContext;
pub use self::metrics::{CountersSnapshot, ServerCounters};
