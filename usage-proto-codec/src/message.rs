// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::field::JsonObject;
use crate::object::as_object;
use crate::{
    varint, verify, ConversionError, ConversionOptions, DecodeError, DecodeErrorKind, EncodeError,
    MessageDescriptor, Reader, VerifyError, WireType,
};
use bytes::{BufMut, Bytes};
use serde_json::Value;
use std::borrow::Cow;
use std::fmt::Debug;

/// Configures decoding.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct DecodeOptions {
    /// How many levels of embedded messages are followed before decoding
    /// fails with [`DecodeErrorKind::RecursionLimitReached`].
    pub recursion_limit: u32,
}

impl DecodeOptions {
    pub const DEFAULT_RECURSION_LIMIT: u32 = 100;
}

impl Default for DecodeOptions {
    fn default() -> Self {
        Self {
            recursion_limit: Self::DEFAULT_RECURSION_LIMIT,
        }
    }
}

/// Per-call decoding state threaded through nested messages.
#[derive(Clone, Copy, Debug)]
pub struct DecodeContext {
    recursion_budget: u32,
}

impl DecodeContext {
    pub fn new(options: &DecodeOptions) -> Self {
        Self {
            recursion_budget: options.recursion_limit,
        }
    }

    /// Returns the context for one level deeper.
    #[inline]
    pub fn enter_recursion(self) -> Result<Self, DecodeError> {
        match self.recursion_budget.checked_sub(1) {
            Some(recursion_budget) => Ok(Self { recursion_budget }),
            None => Err(DecodeErrorKind::RecursionLimitReached.into()),
        }
    }
}

impl Default for DecodeContext {
    fn default() -> Self {
        Self::new(&DecodeOptions::default())
    }
}

/// A protobuf message with a static schema.
///
/// Implementations are generated by [`message!`](crate::message); only the
/// required methods are specific to a type, the rest are derived from them.
pub trait Message: Clone + Debug + Default + PartialEq + Send + Sync {
    /// The field table shared by encoding, decoding, verification and
    /// plain-object conversion.
    fn descriptor() -> &'static MessageDescriptor;

    /// The size of the encoded message, without a length prefix.
    fn encoded_len(&self) -> usize;

    /// Writes every present field in ascending field-number order. The
    /// caller guarantees there's enough capacity.
    fn encode_raw<B: BufMut>(&self, buf: &mut B);

    /// Reads the value of the field with the given key into `self`,
    /// skipping fields the schema doesn't declare.
    fn merge_field(
        &mut self,
        number: u32,
        wire_type: WireType,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>;

    /// Adds the plain-object form of every field to `object`.
    fn write_object(&self, options: &ConversionOptions, object: &mut JsonObject);

    /// Builds a message from the properties of a plain object. Properties
    /// that aren't fields are ignored.
    fn read_object(object: &JsonObject) -> Result<Self, ConversionError>;

    /// Encodes the message to a buffer.
    ///
    /// An error is returned if the buffer doesn't have enough capacity, in
    /// which case nothing has been written.
    fn encode<B: BufMut>(&self, buf: &mut B) -> Result<(), EncodeError> {
        let required = self.encoded_len();
        let remaining = buf.remaining_mut();
        if required > remaining {
            return Err(EncodeError::new(required, remaining));
        }
        self.encode_raw(buf);
        Ok(())
    }

    fn encode_to_vec(&self) -> Vec<u8> {
        let mut buf = Vec::with_capacity(self.encoded_len());
        self.encode_raw(&mut buf);
        buf
    }

    /// Encodes the message preceded by its length as a varint.
    fn encode_length_delimited<B: BufMut>(&self, buf: &mut B) -> Result<(), EncodeError> {
        let len = self.encoded_len();
        let required = varint::encoded_len(len as u64) + len;
        let remaining = buf.remaining_mut();
        if required > remaining {
            return Err(EncodeError::new(required, remaining));
        }
        varint::encode(len as u64, buf);
        self.encode_raw(buf);
        Ok(())
    }

    fn encode_length_delimited_to_vec(&self) -> Vec<u8> {
        let len = self.encoded_len();
        let mut buf = Vec::with_capacity(varint::encoded_len(len as u64) + len);
        varint::encode(len as u64, &mut buf);
        self.encode_raw(&mut buf);
        buf
    }

    /// Decodes a message that spans the whole buffer.
    fn decode(buf: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_with_options(buf, &DecodeOptions::default())
    }

    fn decode_with_options(buf: &[u8], options: &DecodeOptions) -> Result<Self, DecodeError> {
        let mut message = Self::default();
        message.merge_from(&mut Reader::new(buf), DecodeContext::new(options))?;
        Ok(message)
    }

    /// Decodes a message from the first `len` bytes of `buf`. Fails if the
    /// buffer is shorter than `len`.
    fn decode_with_length(buf: &[u8], len: usize) -> Result<Self, DecodeError> {
        Self::decode_with_length_and_options(buf, len, &DecodeOptions::default())
    }

    fn decode_with_length_and_options(
        buf: &[u8],
        len: usize,
        options: &DecodeOptions,
    ) -> Result<Self, DecodeError> {
        let mut body = Reader::new(buf).split_to(len)?;
        let mut message = Self::default();
        message.merge_from(&mut body, DecodeContext::new(options))?;
        Ok(message)
    }

    /// Decodes a message preceded by its length as a varint. Bytes after the
    /// message are left alone.
    fn decode_length_delimited(buf: &[u8]) -> Result<Self, DecodeError> {
        Self::decode_length_delimited_with_options(buf, &DecodeOptions::default())
    }

    fn decode_length_delimited_with_options(
        buf: &[u8],
        options: &DecodeOptions,
    ) -> Result<Self, DecodeError> {
        let mut body = Reader::new(buf).read_length_delimited()?;
        let mut message = Self::default();
        message.merge_from(&mut body, DecodeContext::new(options))?;
        Ok(message)
    }

    /// Reads fields until `reader` is exhausted. Fields already set are
    /// overwritten and repeated fields are appended to.
    fn merge_from(
        &mut self,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        while !reader.is_empty() {
            let (number, wire_type) = reader.read_key()?;
            self.merge_field(number, wire_type, reader, ctx)?;
        }
        Ok(())
    }

    /// Checks that a plain object could be converted to this message,
    /// reporting the first problem found.
    fn verify(object: &Value) -> Result<(), VerifyError> {
        verify::verify_message(Self::descriptor(), object)
    }

    fn to_object(&self, options: &ConversionOptions) -> Value {
        let mut object = JsonObject::new();
        self.write_object(options, &mut object);
        Value::Object(object)
    }

    /// The plain-object form with longs as strings and enums as names.
    fn to_json(&self) -> Value {
        self.to_object(&ConversionOptions::JSON)
    }

    fn from_object(object: &Value) -> Result<Self, ConversionError> {
        Self::read_object(as_object(object)?)
    }
}

/// Either a message or its already encoded form.
///
/// Encoded bytes are written out unchanged, which lets a producer forward a
/// message it received without decoding it first.
#[derive(Clone, Debug, PartialEq)]
pub enum MaybeEncoded<M> {
    Message(M),
    Encoded(Bytes),
}

impl<M: Message> MaybeEncoded<M> {
    pub fn encoded(bytes: impl Into<Bytes>) -> Self {
        MaybeEncoded::Encoded(bytes.into())
    }

    /// Returns the message, decoding it if only the bytes are held.
    pub fn message(&self) -> Result<Cow<'_, M>, DecodeError> {
        match self {
            MaybeEncoded::Message(message) => Ok(Cow::Borrowed(message)),
            MaybeEncoded::Encoded(bytes) => M::decode(bytes).map(Cow::Owned),
        }
    }
}

impl<M: Default> Default for MaybeEncoded<M> {
    fn default() -> Self {
        MaybeEncoded::Message(M::default())
    }
}

impl<M> From<M> for MaybeEncoded<M> {
    fn from(message: M) -> Self {
        MaybeEncoded::Message(message)
    }
}
