//! Bounds-checked little-endian reads over a byte buffer.
//!
//! [`ByteReader`] owns a read position over a borrowed buffer and exposes
//! sequential read primitives that each advance the position and fail
//! cleanly past the end, carrying the offset at which the read started.
//! The input buffer is never mutated.

use std::io::Cursor;

use byteorder::{LittleEndian, ReadBytesExt};

use super::io_lines::DecodeError;

/// Sequential reader over a byte slice.
pub(crate) struct ByteReader<'a> {
    cursor: Cursor<&'a [u8]>,
}

impl<'a> ByteReader<'a> {
    pub fn new(data: &'a [u8]) -> Self {
        Self {
            cursor: Cursor::new(data),
        }
    }

    /// Current read position in bytes from the start of the buffer.
    pub fn position(&self) -> usize {
        self.cursor.position() as usize
    }

    /// Moves the read position. Positions past the end are legal; the
    /// next read fails with a truncation error.
    pub fn set_position(&mut self, position: usize) {
        self.cursor.set_position(position as u64);
    }

    /// Bytes left between the read position and the end of the buffer.
    pub fn remaining(&self) -> usize {
        self.cursor.get_ref().len().saturating_sub(self.position())
    }

    pub fn read_u8(&mut self, what: &'static str) -> Result<u8, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u8()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    pub fn read_u16(&mut self, what: &'static str) -> Result<u16, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u16::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    pub fn read_u32(&mut self, what: &'static str) -> Result<u32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_u32::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    pub fn read_i32(&mut self, what: &'static str) -> Result<i32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_i32::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    pub fn read_f32(&mut self, what: &'static str) -> Result<f32, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_f32::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    pub fn read_f64(&mut self, what: &'static str) -> Result<f64, DecodeError> {
        let offset = self.position();
        self.cursor
            .read_f64::<LittleEndian>()
            .map_err(|_| DecodeError::Truncated { what, offset })
    }

    /// Borrows `len` bytes from the buffer and advances past them.
    pub fn read_bytes(&mut self, len: usize, what: &'static str) -> Result<&'a [u8], DecodeError> {
        let offset = self.position();
        if len > self.remaining() {
            return Err(DecodeError::Truncated { what, offset });
        }
        self.cursor.set_position((offset + len) as u64);
        Ok(&self.cursor.get_ref()[offset..offset + len])
    }

    /// Advances past `len` bytes without interpreting them.
    pub fn skip(&mut self, len: usize, what: &'static str) -> Result<(), DecodeError> {
        self.read_bytes(len, what).map(|_| ())
    }

    /// Reads a little-endian base-128 variable-length unsigned integer.
    ///
    /// Each byte contributes 7 data bits; the high bit is the
    /// continuation flag. There is no explicit maximum length: the loop
    /// accumulates until the continuation bit clears or the buffer
    /// exhausts. Bits beyond the 64-bit accumulator are discarded.
    pub fn read_varuint(&mut self, what: &'static str) -> Result<u64, DecodeError> {
        let mut value = 0u64;
        let mut shift = 0u32;
        loop {
            let byte = self.read_u8(what)?;
            if shift < u64::BITS {
                value |= u64::from(byte & 0x7f) << shift;
            }
            if byte & 0x80 == 0 {
                return Ok(value);
            }
            shift += 7;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_sequential_reads_advance() {
        let data = [0x01, 0x00, 0x00, 0x00, 0x00, 0x00, 0x80, 0x3f];
        let mut r = ByteReader::new(&data);
        assert_eq!(r.read_u32("first").unwrap(), 1);
        assert_eq!(r.read_f32("second").unwrap(), 1.0);
        assert_eq!(r.position(), 8);
        assert_eq!(r.remaining(), 0);
    }

    #[test]
    fn test_read_past_end_reports_offset() {
        let data = [0xaa, 0xbb];
        let mut r = ByteReader::new(&data);
        let err = r.read_u32("count").unwrap_err();
        assert_eq!(
            err,
            DecodeError::Truncated {
                what: "count",
                offset: 0
            }
        );
    }

    #[test]
    fn test_read_bytes_borrows_without_copying() {
        let data = [1u8, 2, 3, 4, 5];
        let mut r = ByteReader::new(&data);
        r.skip(1, "lead").unwrap();
        assert_eq!(r.read_bytes(3, "body").unwrap(), &[2, 3, 4]);
        assert_eq!(r.position(), 4);
    }

    #[test]
    fn test_varuint_single_and_multi_byte() {
        let mut r = ByteReader::new(&[0x05]);
        assert_eq!(r.read_varuint("tag").unwrap(), 5);

        // 300 = 0b10_0101100 -> 0xac 0x02
        let mut r = ByteReader::new(&[0xac, 0x02]);
        assert_eq!(r.read_varuint("tag").unwrap(), 300);
    }

    #[test]
    fn test_varuint_truncated_continuation() {
        let mut r = ByteReader::new(&[0x80]);
        assert!(matches!(
            r.read_varuint("tag"),
            Err(DecodeError::Truncated { .. })
        ));
    }

    #[test]
    fn test_varuint_overlong_does_not_panic() {
        // Eleven continuation bytes push the shift past 64 bits; the
        // excess bits are discarded instead of overflowing.
        let data = [0xff; 11];
        let mut r = ByteReader::new(&data);
        let mut with_end = data.to_vec();
        with_end.push(0x00);
        let mut r2 = ByteReader::new(&with_end);
        assert!(r.read_varuint("tag").is_err());
        assert!(r2.read_varuint("tag").is_ok());
    }
}
