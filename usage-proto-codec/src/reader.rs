// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::varint::MAX_VARINT_LEN;
use crate::{DecodeContext, DecodeError, DecodeErrorKind, WireType, MIN_FIELD};

/// A cursor over an encoded buffer.
///
/// Every length read off the wire is checked against the bytes that are left
/// before anything is sliced or allocated, so a corrupt length can't make the
/// decoder reserve more memory than the input holds.
#[derive(Clone, Copy, Debug)]
pub struct Reader<'a> {
    buf: &'a [u8],
}

impl<'a> Reader<'a> {
    #[inline]
    pub const fn new(buf: &'a [u8]) -> Self {
        Self { buf }
    }

    #[inline]
    pub const fn remaining(&self) -> usize {
        self.buf.len()
    }

    #[inline]
    pub const fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    /// The bytes that haven't been consumed yet.
    #[inline]
    pub const fn as_slice(&self) -> &'a [u8] {
        self.buf
    }

    #[inline]
    fn advance(&mut self, len: usize) -> Result<&'a [u8], DecodeError> {
        if len > self.buf.len() {
            return Err(DecodeErrorKind::Truncated {
                needed: len,
                remaining: self.buf.len(),
            }
            .into());
        }
        let (head, tail) = self.buf.split_at(len);
        self.buf = tail;
        Ok(head)
    }

    pub fn read_varint(&mut self) -> Result<u64, DecodeError> {
        let mut value = 0u64;
        for (i, &byte) in self.buf.iter().take(MAX_VARINT_LEN).enumerate() {
            // The tenth byte only has room for the single remaining bit.
            if i == MAX_VARINT_LEN - 1 && byte > 1 {
                return Err(DecodeErrorKind::InvalidVarint.into());
            }
            value |= u64::from(byte & 0x7F) << (i * 7);
            if byte < 0x80 {
                self.buf = &self.buf[i + 1..];
                return Ok(value);
            }
        }
        if self.buf.len() < MAX_VARINT_LEN {
            Err(DecodeErrorKind::Truncated {
                needed: self.buf.len() + 1,
                remaining: self.buf.len(),
            }
            .into())
        } else {
            Err(DecodeErrorKind::InvalidVarint.into())
        }
    }

    /// Reads a field key and splits it into the field number and wire type.
    pub fn read_key(&mut self) -> Result<(u32, WireType), DecodeError> {
        let key = self.read_varint()?;
        if key > u64::from(u32::MAX) {
            return Err(DecodeErrorKind::InvalidKey(key).into());
        }
        let wire_type = WireType::try_from(key & 0x7)?;
        let number = (key >> 3) as u32;
        if number < MIN_FIELD {
            return Err(DecodeErrorKind::InvalidFieldNumber.into());
        }
        Ok((number, wire_type))
    }

    pub fn read_fixed32(&mut self) -> Result<u32, DecodeError> {
        let mut bytes = [0u8; 4];
        bytes.copy_from_slice(self.advance(4)?);
        Ok(u32::from_le_bytes(bytes))
    }

    pub fn read_fixed64(&mut self) -> Result<u64, DecodeError> {
        let mut bytes = [0u8; 8];
        bytes.copy_from_slice(self.advance(8)?);
        Ok(u64::from_le_bytes(bytes))
    }

    /// Splits off the next `len` bytes as their own reader.
    pub fn split_to(&mut self, len: usize) -> Result<Reader<'a>, DecodeError> {
        if len > self.buf.len() {
            return Err(DecodeErrorKind::LengthOverrun {
                len: len as u64,
                remaining: self.buf.len(),
            }
            .into());
        }
        self.advance(len).map(Reader::new)
    }

    /// Reads a varint length prefix and splits off that many bytes.
    pub fn read_length_delimited(&mut self) -> Result<Reader<'a>, DecodeError> {
        let len = self.read_varint()?;
        if len > self.buf.len() as u64 {
            return Err(DecodeErrorKind::LengthOverrun {
                len,
                remaining: self.buf.len(),
            }
            .into());
        }
        self.advance(len as usize).map(Reader::new)
    }

    /// Reads a length-prefixed run of bytes without copying it.
    #[inline]
    pub fn read_bytes(&mut self) -> Result<&'a [u8], DecodeError> {
        self.read_length_delimited().map(|reader| reader.buf)
    }

    /// Skips over the value of a field this schema doesn't know about.
    pub fn skip_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        match wire_type {
            WireType::Varint => self.read_varint().map(drop),
            WireType::Fixed64 => self.advance(8).map(drop),
            WireType::LengthDelimited => self.read_length_delimited().map(drop),
            WireType::Fixed32 => self.advance(4).map(drop),
            WireType::StartGroup => {
                let ctx = ctx.enter_recursion()?;
                loop {
                    let (inner, inner_wire_type) = self.read_key()?;
                    if inner_wire_type == WireType::EndGroup {
                        return if inner == number {
                            Ok(())
                        } else {
                            Err(DecodeErrorKind::UnexpectedEndGroup.into())
                        };
                    }
                    self.skip_field(inner, inner_wire_type, ctx)?;
                }
            }
            WireType::EndGroup => Err(DecodeErrorKind::UnexpectedEndGroup.into()),
        }
    }
}
