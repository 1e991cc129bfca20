// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{ReadBytesExt, WriteBytesExt};
use std::io;

/// Writes any SNTP field type to network-endian bytes.
///
/// Blanket-implemented for every `byteorder::WriteBytesExt`.
pub trait WriteBytes {
    /// Write `field` to this writer in network byte order.
    fn write_bytes<P: WriteToBytes>(&mut self, field: P) -> io::Result<()>;
}

/// Reads any SNTP field type from network-endian bytes.
///
/// Blanket-implemented for every `byteorder::ReadBytesExt`.
pub trait ReadBytes {
    /// Read a field of type `P` from this reader in network byte order.
    fn read_bytes<P: ReadFromBytes>(&mut self) -> io::Result<P>;
}

/// SNTP field types that can be written to network-endian bytes.
pub trait WriteToBytes {
    /// Write the field to `writer`.
    fn write_to_bytes<W: WriteBytesExt>(&self, writer: W) -> io::Result<()>;
}

/// SNTP field types that can be read from network-endian bytes.
pub trait ReadFromBytes: Sized {
    /// Read the field from `reader`.
    fn read_from_bytes<R: ReadBytesExt>(reader: R) -> io::Result<Self>;
}

/// Types whose packed size on the wire never varies.
pub trait ConstPackedSizeBytes {
    /// Packed size in bytes.
    const PACKED_SIZE_BYTES: usize;
}
