// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! SNTP packet types and the byte-level layout.
//!
//! The `ReadBytes` / `WriteBytes` traits extend byteorder's `ReadBytesExt` and
//! `WriteBytesExt` so every field type reads and writes itself in network
//! byte order. Field names and meanings follow RFC 4330 and RFC 5905.

/// Default UDP port an SNTP server listens on.
pub const PORT: u16 = 123;

/// Protocol version this implementation speaks.
pub const SNTP_VERSION: u8 = 4;

/// Size in bytes of every request and response.
pub const PACKET_SIZE: usize = 48;

/// Byte offset of the transmit timestamp within a packet.
pub const TRANSMIT_TIMESTAMP_OFFSET: usize = 40;

mod io;
mod traits;
mod types;

pub use self::traits::*;
pub use self::types::*;
