// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Housekeeping commands a host application can send to a running server.

use std::fmt;

/// A housekeeping command, identified on the wire by its function code.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
#[repr(u8)]
pub enum Command {
    /// Do nothing except count the command.
    Noop = 0,
    /// Zero every server counter.
    ResetCounters = 1,
}

impl Command {
    /// Look up a command by function code.
    pub fn from_code(code: u8) -> Option<Self> {
        match code {
            0 => Some(Command::Noop),
            1 => Some(Command::ResetCounters),
            _ => None,
        }
    }

    /// The function code of this command.
    pub fn code(self) -> u8 {
        self as u8
    }
}

impl fmt::Display for Command {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Command::Noop => f.write_str("NOOP"),
            Command::ResetCounters => f.write_str("RESET"),
        }
    }
}
