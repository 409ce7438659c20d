//! # Wire Serialization
//!
//! Little-endian primitives for the region protocol.
//!
//! ## Design
//!
//! - One writer per encode call, one reader per decode call: no shared state
//! - Every read is bounds checked and reports how many bytes were missing
//! - Length and count prefixes are checked against the remaining bytes
//!   before anything is allocated

use crate::error::{DecodeError, DecodeResult, EncodeError, EncodeResult};

/// Largest length a `u16` prefix can carry.
pub const MAX_SHORT_BLOB: usize = u16::MAX as usize;

/// Maximum encoded size of a `u32` varint.
const MAX_VARINT_BYTES: usize = 5;

/// Wire writer - appends to an owned, growable buffer.
///
/// Reuse one writer across ticks with [`WireWriter::clear`] to keep the
/// allocation.
#[derive(Clone, Debug, Default)]
pub struct WireWriter {
    buffer: Vec<u8>,
}

impl WireWriter {
    /// Creates an empty writer.
    #[must_use]
    pub const fn new() -> Self {
        Self { buffer: Vec::new() }
    }

    /// Creates an empty writer with room for `capacity` bytes.
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buffer: Vec::with_capacity(capacity),
        }
    }

    /// Empties the writer for reuse.
    #[inline]
    pub fn clear(&mut self) {
        self.buffer.clear();
    }

    /// Returns the number of bytes written.
    #[inline]
    #[must_use]
    pub fn len(&self) -> usize {
        self.buffer.len()
    }

    /// Returns true if no bytes have been written.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.buffer.is_empty()
    }

    /// Returns a slice of the written data.
    #[inline]
    #[must_use]
    pub fn as_slice(&self) -> &[u8] {
        &self.buffer
    }

    /// Consumes the writer, returning the bytes.
    #[must_use]
    pub fn into_bytes(self) -> Vec<u8> {
        self.buffer
    }

    /// Discards everything written after `len`.
    ///
    /// Used to drop a half-written record when encoding fails.
    #[inline]
    pub fn truncate(&mut self, len: usize) {
        self.buffer.truncate(len);
    }

    /// Writes a single byte.
    #[inline]
    pub fn write_u8(&mut self, value: u8) {
        self.buffer.push(value);
    }

    /// Writes a u16 in little-endian format.
    #[inline]
    pub fn write_u16(&mut self, value: u16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an i16 in little-endian format.
    #[inline]
    pub fn write_i16(&mut self, value: i16) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a u32 in little-endian format.
    #[inline]
    pub fn write_u32(&mut self, value: u32) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes an f64 in little-endian format.
    #[inline]
    pub fn write_f64(&mut self, value: f64) {
        self.buffer.extend_from_slice(&value.to_le_bytes());
    }

    /// Writes a LEB128 varint (7 bits per byte, low group first).
    pub fn write_varint(&mut self, mut value: u32) {
        loop {
            #[allow(clippy::cast_possible_truncation)]
            let byte = (value & 0x7F) as u8;
            value >>= 7;
            if value == 0 {
                self.buffer.push(byte);
                return;
            }
            self.buffer.push(byte | 0x80);
        }
    }

    /// Writes a varint element count.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::TooManyElements`] if `count` exceeds `u32`.
    pub fn write_count(&mut self, field: &'static str, count: usize) -> EncodeResult<()> {
        let count = u32::try_from(count).map_err(|_| EncodeError::TooManyElements { field, len: count })?;
        self.write_varint(count);
        Ok(())
    }

    /// Writes raw bytes with no prefix.
    #[inline]
    pub fn write_bytes(&mut self, bytes: &[u8]) {
        self.buffer.extend_from_slice(bytes);
    }

    /// Writes a `u16` length followed by the bytes.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::BlobTooLong`] if `bytes` exceeds 65 535 bytes.
    pub fn write_short_blob(&mut self, field: &'static str, bytes: &[u8]) -> EncodeResult<()> {
        let len = u16::try_from(bytes.len()).map_err(|_| EncodeError::BlobTooLong {
            field,
            len: bytes.len(),
            max: MAX_SHORT_BLOB,
        })?;
        self.write_u16(len);
        self.write_bytes(bytes);
        Ok(())
    }

    /// Writes a blob that may be absent: varint `0` for `None`, `len + 1`
    /// followed by the bytes otherwise.
    ///
    /// # Errors
    ///
    /// Returns [`EncodeError::TooManyElements`] if the blob is 4 GiB or more.
    pub fn write_nullable_blob(&mut self, field: &'static str, bytes: Option<&[u8]>) -> EncodeResult<()> {
        match bytes {
            None => {
                self.write_varint(0);
                Ok(())
            }
            Some(bytes) => {
                let prefix = u32::try_from(bytes.len())
                    .ok()
                    .and_then(|len| len.checked_add(1))
                    .ok_or(EncodeError::TooManyElements { field, len: bytes.len() })?;
                self.write_varint(prefix);
                self.write_bytes(bytes);
                Ok(())
            }
        }
    }
}

/// Wire reader - a cursor over a borrowed buffer.
#[derive(Clone, Debug)]
pub struct WireReader<'a> {
    buffer: &'a [u8],
    position: usize,
}

impl<'a> WireReader<'a> {
    /// Creates a new reader from a buffer.
    #[must_use]
    pub const fn new(buffer: &'a [u8]) -> Self {
        Self { buffer, position: 0 }
    }

    /// Returns the number of bytes consumed.
    #[inline]
    #[must_use]
    pub const fn position(&self) -> usize {
        self.position
    }

    /// Returns the number of bytes remaining.
    #[inline]
    #[must_use]
    pub const fn remaining(&self) -> usize {
        self.buffer.len().saturating_sub(self.position)
    }

    /// Returns true once every byte has been consumed.
    #[inline]
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.remaining() == 0
    }

    /// Consumes exactly `len` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if fewer remain.
    #[inline]
    pub fn read_bytes(&mut self, len: usize) -> DecodeResult<&'a [u8]> {
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::UnexpectedEof { needed: len, remaining });
        }
        let slice = &self.buffer[self.position..self.position + len];
        self.position += len;
        Ok(slice)
    }

    #[inline]
    fn read_array<const N: usize>(&mut self) -> DecodeResult<[u8; N]> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    /// Reads a single byte.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] at end of buffer.
    #[inline]
    pub fn read_u8(&mut self) -> DecodeResult<u8> {
        Ok(self.read_array::<1>()?[0])
    }

    /// Reads a u16 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than 2 bytes remain.
    #[inline]
    pub fn read_u16(&mut self) -> DecodeResult<u16> {
        self.read_array().map(u16::from_le_bytes)
    }

    /// Reads an i16 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than 2 bytes remain.
    #[inline]
    pub fn read_i16(&mut self) -> DecodeResult<i16> {
        self.read_array().map(i16::from_le_bytes)
    }

    /// Reads a u32 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than 4 bytes remain.
    #[inline]
    pub fn read_u32(&mut self) -> DecodeResult<u32> {
        self.read_array().map(u32::from_le_bytes)
    }

    /// Reads an f64 in little-endian format.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::UnexpectedEof`] if fewer than 8 bytes remain.
    #[inline]
    pub fn read_f64(&mut self) -> DecodeResult<f64> {
        self.read_array().map(f64::from_le_bytes)
    }

    /// Reads a LEB128 varint.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::VarintOverflow`] if the value does not fit in
    /// 32 bits, or [`DecodeError::UnexpectedEof`] if the buffer ends first.
    pub fn read_varint(&mut self) -> DecodeResult<u32> {
        let mut value: u32 = 0;
        for index in 0..MAX_VARINT_BYTES {
            let byte = self.read_u8()?;
            let group = u32::from(byte & 0x7F);
            // The fifth byte may only carry the top 4 bits.
            if index == MAX_VARINT_BYTES - 1 && (byte & 0x80 != 0 || group > 0x0F) {
                return Err(DecodeError::VarintOverflow);
            }
            value |= group << (7 * index);
            if byte & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::VarintOverflow)
    }

    /// Reads a varint element count and checks it against the bytes left,
    /// assuming every element takes at least `min_element_size` bytes.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::LengthExceedsBuffer`] if the count cannot be
    /// satisfied by the remaining bytes.
    pub fn read_count(&mut self, field: &'static str, min_element_size: usize) -> DecodeResult<usize> {
        let count = self.read_varint()? as usize;
        let remaining = self.remaining();
        if count.saturating_mul(min_element_size) > remaining {
            return Err(DecodeError::LengthExceedsBuffer { field, len: count, remaining });
        }
        Ok(count)
    }

    /// Reads a `u16`-length-prefixed blob.
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::LengthExceedsBuffer`] if the prefix overruns
    /// the buffer.
    pub fn read_short_blob(&mut self, field: &'static str) -> DecodeResult<&'a [u8]> {
        let len = usize::from(self.read_u16()?);
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::LengthExceedsBuffer { field, len, remaining });
        }
        self.read_bytes(len)
    }

    /// Reads a blob written by [`WireWriter::write_nullable_blob`].
    ///
    /// # Errors
    ///
    /// Returns [`DecodeError::LengthExceedsBuffer`] if the prefix overruns
    /// the buffer.
    pub fn read_nullable_blob(&mut self, field: &'static str) -> DecodeResult<Option<&'a [u8]>> {
        let prefix = self.read_varint()? as usize;
        if prefix == 0 {
            return Ok(None);
        }
        let len = prefix - 1;
        let remaining = self.remaining();
        if len > remaining {
            return Err(DecodeError::LengthExceedsBuffer { field, len, remaining });
        }
        self.read_bytes(len).map(Some)
    }
}
