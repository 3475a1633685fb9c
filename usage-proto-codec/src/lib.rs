// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! A schema-driven codec for the protobuf wire format.
//!
//! Messages are declared once with [`message!`], which generates the Rust
//! struct, the [`Message`] implementation and a static [`MessageDescriptor`]
//! from the same field list. Encoding, decoding, [`Message::verify`] and the
//! plain-object conversions all dispatch off that single list, so the field
//! numbers used by producers and consumers cannot drift apart.
//!
//! Each struct field names a [`FieldCodec`] which decides how the field is
//! laid out on the wire:
//!
//! - [`Singular`] for optional scalars, enums and embedded messages. Presence
//!   is tracked with `Option`, so an explicit zero is still written.
//! - [`Repeated`] for lists. Numeric lists are written packed and read in
//!   either packed or unpacked form.
//! - [`Map`] for `map<string, V>` fields, written as repeated entry messages.
//! - [`OneofField`] for oneof groups, backed by an enum declared with
//!   [`oneof!`].
//!
//! Unknown fields are skipped on decode, which keeps old and new schema
//! versions interoperable.

mod descriptor;
mod enumeration;
mod error;
pub mod field;
mod macros;
mod message;
mod object;
mod oneof;
mod reader;
pub mod scalar;
mod value;
pub mod varint;
mod verify;

pub use descriptor::*;
pub use enumeration::*;
pub use error::*;
pub use field::{FieldCodec, Map, OneofField, Repeated, Singular};
pub use message::*;
pub use object::*;
pub use oneof::*;
pub use reader::*;
pub use value::*;
pub use verify::*;

use bytes::BufMut;

/// Items the declaration macros expand to. Not part of the public API.
#[doc(hidden)]
pub mod __private {
    pub use bytes::BufMut;
    pub use serde_json;
    pub use tracing;
}

/// The smallest possible protobuf field number.
pub const MIN_FIELD: u32 = 1;

/// The largest possible protobuf field number.
pub const MAX_FIELD: u32 = (1 << 29) - 1;

/// Represents the wire type for the in-wire protobuf encoding. Groups are
/// only recognized so that unknown group fields can be skipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
#[repr(u8)]
pub enum WireType {
    Varint = 0,
    Fixed64 = 1,
    LengthDelimited = 2,
    StartGroup = 3,
    EndGroup = 4,
    Fixed32 = 5,
}

impl TryFrom<u64> for WireType {
    type Error = DecodeError;

    #[inline]
    fn try_from(value: u64) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(WireType::Varint),
            1 => Ok(WireType::Fixed64),
            2 => Ok(WireType::LengthDelimited),
            3 => Ok(WireType::StartGroup),
            4 => Ok(WireType::EndGroup),
            5 => Ok(WireType::Fixed32),
            _ => Err(DecodeErrorKind::InvalidWireType(value).into()),
        }
    }
}

/// A tag is a combination of a wire_type, stored in the least significant
/// three bits, and the field number that is defined in the .proto file.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Tag(u32);

impl Tag {
    #[cfg_attr(debug_assertions, track_caller)]
    #[inline]
    pub const fn new(field: u32, wire_type: WireType) -> Self {
        debug_assert!(field >= MIN_FIELD && field <= MAX_FIELD);
        Self((field << 3) | wire_type as u32)
    }

    #[inline]
    pub const fn field(self) -> u32 {
        self.0 >> 3
    }

    #[inline]
    pub const fn encoded_len(self) -> usize {
        varint::encoded_len(self.0 as u64)
    }

    #[inline]
    pub fn encode<B: BufMut>(self, buf: &mut B) {
        varint::encode(u64::from(self.0), buf)
    }
}

/// The number of bytes a tag for `field` occupies. The wire type never
/// changes the length since it only occupies the low three bits.
#[inline]
pub const fn key_len(field: u32) -> usize {
    Tag::new(field, WireType::Varint).encoded_len()
}
