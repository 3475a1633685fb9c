// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Base-128 [`varint`] primitives and the zig-zag mapping used by `sint32`
//! and `sint64` fields.
//!
//! [`varint`]: https://protobuf.dev/programming-guides/encoding/#varints

use bytes::BufMut;

/// A 64-bit varint never takes more than 10 bytes.
pub const MAX_VARINT_LEN: usize = 10;

/// The number of bytes it takes to encode `value` as a varint.
#[must_use]
#[inline]
pub const fn encoded_len(value: u64) -> usize {
    // https://github.com/google/protobuf/blob/3.3.x/src/google/protobuf/io/coded_stream.h#L1301-L1309
    ((((value | 1).leading_zeros() ^ 63) * 9 + 73) / 64) as usize
}

/// Encodes a varint according to protobuf semantics.
#[inline]
pub fn encode<B: BufMut>(mut value: u64, buf: &mut B) {
    loop {
        if value < 0x80 {
            buf.put_u8(value as u8);
            return;
        }
        buf.put_u8(((value & 0x7F) | 0x80) as u8);
        value >>= 7;
    }
}

#[inline]
pub const fn zigzag_encode64(value: i64) -> u64 {
    ((value << 1) ^ (value >> 63)) as u64
}

#[inline]
pub const fn zigzag_decode64(value: u64) -> i64 {
    ((value >> 1) as i64) ^ -((value & 1) as i64)
}
