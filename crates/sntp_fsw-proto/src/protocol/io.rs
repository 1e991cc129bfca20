// Copyright 2026 U.S. Federal Government (in countries where recognized)
// SPDX-License-Identifier: Apache-2.0

use byteorder::{BE, ReadBytesExt, WriteBytesExt};
use std::io;

use super::{
    ConstPackedSizeBytes, PACKET_SIZE, Packet, ReadBytes, ReadFromBytes, ReferenceId, ShortFormat,
    Stratum, WriteBytes, WriteToBytes, pack_li_vn_mode, unpack_li_vn_mode,
};
use crate::error::ParseError;
use crate::timestamp::Timestamp;

// Writers.

impl<W> WriteBytes for W
where
    W: WriteBytesExt,
{
    fn write_bytes<P: WriteToBytes>(&mut self, field: P) -> io::Result<()> {
        field.write_to_bytes(self)
    }
}

impl<P> WriteToBytes for &P
where
    P: WriteToBytes,
{
    fn write_to_bytes<W: WriteBytesExt>(&self, writer: W) -> io::Result<()> {
        (*self).write_to_bytes(writer)
    }
}

impl WriteToBytes for ShortFormat {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u16::<BE>(self.seconds)?;
        writer.write_u16::<BE>(self.fraction)
    }
}

impl WriteToBytes for Timestamp {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u32::<BE>(self.seconds)?;
        writer.write_u32::<BE>(self.fraction)
    }
}

impl WriteToBytes for ReferenceId {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_all(&self.0)
    }
}

impl WriteToBytes for Packet {
    fn write_to_bytes<W: WriteBytesExt>(&self, mut writer: W) -> io::Result<()> {
        writer.write_u8(pack_li_vn_mode(
            self.leap_indicator,
            self.version,
            self.mode,
        ))?;
        writer.write_u8(self.stratum.0)?;
        writer.write_i8(self.poll)?;
        writer.write_i8(self.precision)?;
        writer.write_bytes(self.root_delay)?;
        writer.write_bytes(self.root_dispersion)?;
        writer.write_bytes(self.reference_id)?;
        writer.write_bytes(self.reference_timestamp)?;
        writer.write_bytes(self.origin_timestamp)?;
        writer.write_bytes(self.receive_timestamp)?;
        writer.write_bytes(self.transmit_timestamp)
    }
}

// Readers.

impl<R> ReadBytes for R
where
    R: ReadBytesExt,
{
    fn read_bytes<P: ReadFromBytes>(&mut self) -> io::Result<P> {
        P::read_from_bytes(self)
    }
}

impl ReadFromBytes for ShortFormat {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let seconds = reader.read_u16::<BE>()?;
        let fraction = reader.read_u16::<BE>()?;
        Ok(ShortFormat { seconds, fraction })
    }
}

impl ReadFromBytes for Timestamp {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let seconds = reader.read_u32::<BE>()?;
        let fraction = reader.read_u32::<BE>()?;
        Ok(Timestamp { seconds, fraction })
    }
}

impl ReadFromBytes for ReferenceId {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let mut raw = [0u8; 4];
        reader.read_exact(&mut raw)?;
        Ok(ReferenceId(raw))
    }
}

impl ReadFromBytes for Packet {
    fn read_from_bytes<R: ReadBytesExt>(mut reader: R) -> io::Result<Self> {
        let (leap_indicator, version, mode) = unpack_li_vn_mode(reader.read_u8()?);
        let stratum = Stratum(reader.read_u8()?);
        let poll = reader.read_i8()?;
        let precision = reader.read_i8()?;
        let root_delay = reader.read_bytes()?;
        let root_dispersion = reader.read_bytes()?;
        let reference_id = reader.read_bytes()?;
        let reference_timestamp = reader.read_bytes()?;
        let origin_timestamp = reader.read_bytes()?;
        let receive_timestamp = reader.read_bytes()?;
        let transmit_timestamp = reader.read_bytes()?;
        Ok(Packet {
            leap_indicator,
            version,
            mode,
            stratum,
            poll,
            precision,
            root_delay,
            root_dispersion,
            reference_id,
            reference_timestamp,
            origin_timestamp,
            receive_timestamp,
            transmit_timestamp,
        })
    }
}

// Fixed-size buffer entry points.

impl Packet {
    /// Parse a packet from a buffer of exactly [`PACKET_SIZE`] bytes.
    pub fn read_from(buf: &[u8]) -> Result<Packet, ParseError> {
        if buf.len() < Packet::PACKED_SIZE_BYTES {
            return Err(ParseError::BufferTooShort {
                needed: Packet::PACKED_SIZE_BYTES,
                available: buf.len(),
            });
        }
        if buf.len() > Packet::PACKED_SIZE_BYTES {
            return Err(ParseError::TrailingBytes {
                expected: Packet::PACKED_SIZE_BYTES,
                actual: buf.len(),
            });
        }
        let mut reader = buf;
        reader.read_bytes().map_err(|_| ParseError::BufferTooShort {
            needed: Packet::PACKED_SIZE_BYTES,
            available: buf.len(),
        })
    }

    /// Serialize into the first [`PACKET_SIZE`] bytes of `buf`.
    ///
    /// Returns the number of bytes written.
    pub fn write_into(&self, buf: &mut [u8]) -> Result<usize, ParseError> {
        let available = buf.len();
        if available < Packet::PACKED_SIZE_BYTES {
            return Err(ParseError::BufferTooShort {
                needed: Packet::PACKED_SIZE_BYTES,
                available,
            });
        }
        let mut writer = &mut buf[..Packet::PACKED_SIZE_BYTES];
        writer
            .write_bytes(self)
            .map_err(|_| ParseError::BufferTooShort {
                needed: Packet::PACKED_SIZE_BYTES,
                available,
            })?;
        Ok(Packet::PACKED_SIZE_BYTES)
    }

    /// Serialize into a fresh fixed-size array.
    ///
    /// A [`PACKET_SIZE`] buffer always holds a packet, so [`write_into`](Self::write_into)
    /// cannot fail here; debug builds assert it.
    pub fn to_bytes(&self) -> [u8; PACKET_SIZE] {
        let mut buf = [0u8; PACKET_SIZE];
        match self.write_into(&mut buf) {
            Ok(written) => debug_assert_eq!(written, PACKET_SIZE),
            Err(err) => debug_assert!(false, "packet did not fit {PACKET_SIZE} bytes: {err}"),
        }
        buf
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::protocol::{KissCode, LeapIndicator, Mode, Version};

    fn sample() -> Packet {
        Packet {
            leap_indicator: LeapIndicator::AddOne,
            version: Version::V4,
            mode: Mode::Server,
            stratum: Stratum(2),
            poll: 6,
            precision: -20,
            root_delay: ShortFormat {
                seconds: 1,
                fraction: 0x8000,
            },
            root_dispersion: ShortFormat {
                seconds: 0,
                fraction: 0x0100,
            },
            reference_id: ReferenceId(*b"GPS\0"),
            reference_timestamp: Timestamp::new(0xE000_0000, 1),
            origin_timestamp: Timestamp::new(0xE000_0001, 2),
            receive_timestamp: Timestamp::new(0xE000_0002, 3),
            transmit_timestamp: Timestamp::new(0xE000_0003, 4),
        }
    }

    #[test]
    fn field_offsets() {
        let bytes = sample().to_bytes();
        assert_eq!(bytes[0], 0x64);
        assert_eq!(bytes[1], 2);
        assert_eq!(bytes[2], 6);
        assert_eq!(bytes[3] as i8, -20);
        assert_eq!(&bytes[4..8], &[0, 1, 0x80, 0]);
        assert_eq!(&bytes[12..16], b"GPS\0");
        assert_eq!(&bytes[24..32], &[0xE0, 0, 0, 1, 0, 0, 0, 2]);
        assert_eq!(&bytes[32..40], &[0xE0, 0, 0, 2, 0, 0, 0, 3]);
        assert_eq!(&bytes[40..48], &[0xE0, 0, 0, 3, 0, 0, 0, 4]);
    }

    #[test]
    fn read_back_written_packet() {
        let packet = sample();
        let bytes = packet.to_bytes();
        assert_eq!(Packet::read_from(&bytes).unwrap(), packet);
    }

    #[test]
    fn read_rejects_short_and_long_buffers() {
        assert_eq!(
            Packet::read_from(&[0u8; 47]),
            Err(ParseError::BufferTooShort {
                needed: 48,
                available: 47
            })
        );
        assert_eq!(
            Packet::read_from(&[0u8; 68]),
            Err(ParseError::TrailingBytes {
                expected: 48,
                actual: 68
            })
        );
    }

    #[test]
    fn to_bytes_matches_write_into() {
        let packet = sample();
        let mut buf = [0u8; PACKET_SIZE];
        assert_eq!(packet.write_into(&mut buf).unwrap(), PACKET_SIZE);
        assert_eq!(packet.to_bytes(), buf);
        assert_ne!(buf, [0u8; PACKET_SIZE]);
    }

    #[test]
    fn write_into_oversized_buffer_leaves_tail() {
        let mut buf = [0xAAu8; 64];
        let written = sample().write_into(&mut buf).unwrap();
        assert_eq!(written, 48);
        assert!(buf[48..].iter().all(|b| *b == 0xAA));
    }

    #[test]
    fn write_into_short_buffer_fails() {
        let mut buf = [0u8; 16];
        assert!(matches!(
            sample().write_into(&mut buf),
            Err(ParseError::BufferTooShort { needed: 48, .. })
        ));
    }

    #[test]
    fn kiss_code_survives_round_trip() {
        let packet = Packet {
            stratum: Stratum::UNSPECIFIED,
            reference_id: KissCode::DENY.into(),
            ..sample()
        };
        let parsed = Packet::read_from(&packet.to_bytes()).unwrap();
        assert_eq!(parsed.kiss_code(), Some(KissCode::DENY));
    }
}
