// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use std::sync::Arc;

use sntp_proto::status::Status;
use tracing::{info, warn};

use super::{Command, ServerConfig, ServerCounters};

/// Configuration plus the counters a server loop reports through.
///
/// Cloning is cheap and clones share the same counters.
#[derive(Clone, Debug, Default)]
pub struct ServerContext {
    config: ServerConfig,
    counters: Arc<ServerCounters>,
}

impl ServerContext {
    /// Context with fresh counters.
    pub fn new(config: ServerConfig) -> Self {
        ServerContext {
            config,
            counters: Arc::new(ServerCounters::new()),
        }
    }

    /// Context reporting into existing `counters`.
    pub fn with_counters(config: ServerConfig, counters: Arc<ServerCounters>) -> Self {
        ServerContext { config, counters }
    }

    /// The response configuration.
    pub fn config(&self) -> &ServerConfig {
        &self.config
    }

    /// The shared counters.
    pub fn counters(&self) -> &Arc<ServerCounters> {
        &self.counters
    }

    /// Execute a housekeeping command given by function code.
    ///
    /// Unknown codes bump the command error counter and fail with
    /// [`Status::BadParameter`].
    pub fn execute_command(&self, code: u8) -> Result<Command, Status> {
        let Some(command) = Command::from_code(code) else {
            warn!(code, "invalid housekeeping command code");
            self.counters.inc_command_error();
            return Err(Status::BadParameter);
        };
        match command {
            Command::Noop => {
                self.counters.inc_command();
                info!(version = env!("CARGO_PKG_VERSION"), "NOOP command");
            }
            Command::ResetCounters => {
                self.counters.reset();
                info!("RESET command");
            }
        }
        Ok(command)
    }
}
