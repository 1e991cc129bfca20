// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

//! Errors raised while reading or writing the fixed-size packet layout.
//!
//! [`ParseError`] is the low-level error of [`Packet::read_from`] and
//! [`Packet::write_into`]. The codec functions translate it into a
//! [`Status`](crate::Status) chosen for the call site, since the same byte
//! shortfall means `BadParameter` for a request and `InvalidResponse` for a
//! response.
//!
//! [`Packet::read_from`]: crate::Packet::read_from
//! [`Packet::write_into`]: crate::Packet::write_into

use std::fmt;
use std::io;

/// Errors that can occur while parsing or serializing an SNTP packet.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum ParseError {
    /// The buffer is too short for the fixed packet layout.
    BufferTooShort {
        /// Number of bytes needed.
        needed: usize,
        /// Number of bytes available.
        available: usize,
    },
    /// The buffer is longer than the fixed packet layout allows.
    TrailingBytes {
        /// Number of bytes expected.
        expected: usize,
        /// Number of bytes supplied.
        actual: usize,
    },
}

impl fmt::Display for ParseError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ParseError::BufferTooShort { needed, available } => {
                write!(
                    f,
                    "buffer too short: needed {} bytes, got {}",
                    needed, available
                )
            }
            ParseError::TrailingBytes { expected, actual } => {
                write!(
                    f,
                    "unexpected packet length: expected {} bytes, got {}",
                    expected, actual
                )
            }
        }
    }
}

impl From<ParseError> for io::Error {
    fn from(err: ParseError) -> io::Error {
        let kind = match &err {
            ParseError::BufferTooShort { .. } => io::ErrorKind::UnexpectedEof,
            ParseError::TrailingBytes { .. } => io::ErrorKind::InvalidData,
        };
        io::Error::new(kind, err)
    }
}

impl std::error::Error for ParseError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn display_buffer_too_short() {
        let err = ParseError::BufferTooShort {
            needed: 48,
            available: 10,
        };
        assert_eq!(err.to_string(), "buffer too short: needed 48 bytes, got 10");
    }

    #[test]
    fn display_trailing_bytes() {
        let err = ParseError::TrailingBytes {
            expected: 48,
            actual: 68,
        };
        assert_eq!(
            err.to_string(),
            "unexpected packet length: expected 48 bytes, got 68"
        );
    }

    #[test]
    fn into_io_error_kind() {
        let io_err: io::Error = ParseError::BufferTooShort {
            needed: 48,
            available: 0,
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::UnexpectedEof);

        let io_err: io::Error = ParseError::TrailingBytes {
            expected: 48,
            actual: 49,
        }
        .into();
        assert_eq!(io_err.kind(), io::ErrorKind::InvalidData);
    }
}
