//! Bounds-checked view over a flat byte blob
//!
//! Both blob formats store little-endian 16-bit offsets relative to the
//! start of the blob. Every read goes through [`BlobView`] so a bad offset
//! becomes a [`FormatError::OutOfBounds`] instead of a stray read.

use crate::error::FormatError;

#[derive(Debug, Clone, Copy)]
pub struct BlobView<'a> {
    bytes: &'a [u8],
}

impl<'a> BlobView<'a> {
    pub fn new(bytes: &'a [u8]) -> Self {
        BlobView { bytes }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    pub fn bytes(&self) -> &'a [u8] {
        self.bytes
    }

    fn out_of_bounds(&self, offset: usize) -> FormatError {
        FormatError::OutOfBounds {
            offset,
            len: self.bytes.len(),
        }
    }

    /// Read a single byte
    pub fn u8_at(&self, offset: usize) -> Result<u8, FormatError> {
        self.bytes
            .get(offset)
            .copied()
            .ok_or_else(|| self.out_of_bounds(offset))
    }

    /// Read a little-endian word
    pub fn u16_at(&self, offset: usize) -> Result<u16, FormatError> {
        let lo = self.u8_at(offset)?;
        let hi = self
            .u8_at(offset + 1)
            .map_err(|_| self.out_of_bounds(offset))?;
        Ok(u16::from_le_bytes([lo, hi]))
    }

    /// Borrow `len` bytes starting at `offset`
    pub fn slice(&self, offset: usize, len: usize) -> Result<&'a [u8], FormatError> {
        let end = offset
            .checked_add(len)
            .ok_or_else(|| self.out_of_bounds(offset))?;
        self.bytes
            .get(offset..end)
            .ok_or_else(|| self.out_of_bounds(offset))
    }

    /// Borrow a fixed-size array starting at `offset`
    pub fn array<const N: usize>(&self, offset: usize) -> Result<&'a [u8; N], FormatError> {
        let s = self.slice(offset, N)?;
        <&[u8; N]>::try_from(s).map_err(|_| self.out_of_bounds(offset))
    }

    /// Text span starting at `offset`, ending at the first NUL or the end of
    /// the blob, whichever comes first
    pub fn text_at(&self, offset: usize) -> Result<&'a str, FormatError> {
        let tail = self
            .bytes
            .get(offset..)
            .ok_or_else(|| self.out_of_bounds(offset))?;
        let end = tail.iter().position(|&b| b == 0).unwrap_or(tail.len());
        std::str::from_utf8(&tail[..end]).map_err(|_| FormatError::BadText { offset })
    }
}
