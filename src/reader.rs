//! reader.rs
//!
//! A bounds-checked cursor over an in-memory SMF buffer.
//!
//! Everything in a MIDI file is read front to back, so the reader is just a
//! slice plus an offset. Every read either returns the bytes it asked for or
//! fails with [`DecodeError::TruncatedInput`] carrying the offset at which the
//! data ran out. Multi-byte integers in SMF chunks are big-endian; we lean on
//! `byteorder` for those.
//!
//! The one oddity is [`ByteReader::unread`]: the running-status rule means the
//! event decoder sometimes reads a byte as a status candidate, finds out it is
//! really the first data byte, and has to step back.

use byteorder::{BigEndian, ByteOrder};

use crate::error::DecodeError;

/// Largest number of bytes a variable-length quantity may occupy.
pub const VARLEN_MAX_BYTES: usize = 4;

#[derive(Debug, Clone)]
pub struct ByteReader<'a> {
    buf: &'a [u8],
    pos: usize,
}

impl<'a> ByteReader<'a> {
    pub fn new(buf: &'a [u8]) -> Self {
        Self { buf, pos: 0 }
    }

    /// Current offset from the start of the buffer.
    pub fn position(&self) -> usize {
        self.pos
    }

    pub fn remaining(&self) -> usize {
        self.buf.len() - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.remaining() == 0
    }

    pub fn read_u8(&mut self) -> Result<u8, DecodeError> {
        let b = *self.buf.get(self.pos).ok_or(DecodeError::TruncatedInput {
            position: self.pos,
            wanted: 1,
        })?;
        self.pos += 1;
        Ok(b)
    }

    /// Borrow the next `n` bytes and advance past them.
    pub fn read_bytes(&mut self, n: usize) -> Result<&'a [u8], DecodeError> {
        if n > self.remaining() {
            return Err(DecodeError::TruncatedInput {
                position: self.pos,
                wanted: n - self.remaining(),
            });
        }
        let out = &self.buf[self.pos..self.pos + n];
        self.pos += n;
        Ok(out)
    }

    pub fn read_array<const N: usize>(&mut self) -> Result<[u8; N], DecodeError> {
        let mut out = [0u8; N];
        out.copy_from_slice(self.read_bytes(N)?);
        Ok(out)
    }

    pub fn skip(&mut self, n: usize) -> Result<(), DecodeError> {
        self.read_bytes(n).map(|_| ())
    }

    pub fn read_u16_be(&mut self) -> Result<u16, DecodeError> {
        Ok(BigEndian::read_u16(self.read_bytes(2)?))
    }

    pub fn read_u24_be(&mut self) -> Result<u32, DecodeError> {
        Ok(BigEndian::read_u24(self.read_bytes(3)?))
    }

    pub fn read_u32_be(&mut self) -> Result<u32, DecodeError> {
        Ok(BigEndian::read_u32(self.read_bytes(4)?))
    }

    /// Step back over the byte just read.
    pub fn unread(&mut self) {
        self.pos = self.pos.saturating_sub(1);
    }

    /// Decode a MIDI variable-length quantity.
    ///
    /// Seven bits per byte, most significant group first. A set high bit means
    /// another byte follows. Anything needing more than four bytes is rejected
    /// as malformed instead of being read indefinitely.
    pub fn read_varlen(&mut self) -> Result<u32, DecodeError> {
        let start = self.pos;
        let mut value: u32 = 0;
        for _ in 0..VARLEN_MAX_BYTES {
            let b = self.read_u8()?;
            value = (value << 7) | u32::from(b & 0x7F);
            if b & 0x80 == 0 {
                return Ok(value);
            }
        }
        Err(DecodeError::MalformedVarint { position: start })
    }
}

/// Encode `value` as a variable-length quantity.
///
/// Only the low 28 bits are representable; higher bits are dropped.
pub fn encode_varlen(value: u32) -> Vec<u8> {
    let value = value & 0x0FFF_FFFF;
    let mut groups = vec![(value & 0x7F) as u8];
    let mut rest = value >> 7;
    while rest > 0 {
        groups.push((rest & 0x7F) as u8 | 0x80);
        rest >>= 7;
    }
    groups.reverse();
    groups
}
