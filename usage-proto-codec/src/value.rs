// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::object::{as_object, enum_default_json, enum_to_json, parse_enum};
use crate::{
    varint, ConversionError, ConversionOptions, DecodeContext, DecodeError, Enumeration,
    MaybeEncoded, Message, Reader, ValueKind, WireType,
};
use base64::prelude::BASE64_STANDARD;
use base64::Engine;
use bytes::{BufMut, Bytes};
use serde_json::Value;
use std::fmt::Debug;
use std::marker::PhantomData;
use tracing::debug;

/// How a single value is laid out on the wire, without its tag.
///
/// Field codecs combine a value type with a field number and a cardinality;
/// the value type only knows how to write, read and convert one occurrence.
pub trait ValueType {
    type Value: Clone + Debug + Default + PartialEq + Send + Sync;

    const WIRE_TYPE: WireType;
    const KIND: ValueKind;

    /// The number of bytes [`ValueType::encode`] writes, including the length
    /// prefix of length-delimited values.
    fn encoded_len(value: &Self::Value) -> usize;

    fn encode<B: BufMut>(value: &Self::Value, buf: &mut B);

    fn decode(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Self::Value, DecodeError>;

    fn to_json(value: &Self::Value, options: &ConversionOptions) -> Value;

    fn from_json(value: &Value) -> Result<Self::Value, ConversionError>;

    /// What `to_object` emits for an absent field when defaults are on.
    fn default_json(options: &ConversionOptions) -> Value;

    /// What a field accessor hands out: scalars and enums by value, strings
    /// and messages by reference.
    type Get<'a>
    where
        Self: 'a;

    /// Reads a singular field, falling back to the schema default when it
    /// is unset. Messages have no default and stay optional.
    fn get<'a>(value: Option<&'a Self::Value>) -> Self::Get<'a>
    where
        Self: 'a;
}

/// An open enum stored as its `i32` value. Unknown values round-trip.
pub struct EnumValue<E>(PhantomData<E>);

impl<E: Enumeration> ValueType for EnumValue<E> {
    type Value = i32;

    const WIRE_TYPE: WireType = WireType::Varint;
    const KIND: ValueKind = ValueKind::Enum(E::DESCRIPTOR);

    #[inline]
    fn encoded_len(value: &i32) -> usize {
        varint::encoded_len(*value as i64 as u64)
    }

    #[inline]
    fn encode<B: BufMut>(value: &i32, buf: &mut B) {
        varint::encode(*value as i64 as u64, buf)
    }

    fn decode(reader: &mut Reader<'_>, _ctx: DecodeContext) -> Result<i32, DecodeError> {
        reader.read_varint().map(|value| value as i32)
    }

    fn to_json(value: &i32, options: &ConversionOptions) -> Value {
        enum_to_json(E::DESCRIPTOR, *value, options)
    }

    fn from_json(value: &Value) -> Result<i32, ConversionError> {
        parse_enum(E::DESCRIPTOR, value)
    }

    fn default_json(options: &ConversionOptions) -> Value {
        enum_default_json(E::DESCRIPTOR, options)
    }

    /// Values outside the enum read as its default.
    type Get<'a> = E;

    fn get<'a>(value: Option<&'a i32>) -> E
    where
        Self: 'a,
    {
        value
            .and_then(|value| E::from_i32(*value))
            .unwrap_or_default()
    }
}

/// An embedded message.
pub struct MessageValue<M>(PhantomData<M>);

impl<M: Message> ValueType for MessageValue<M> {
    type Value = M;

    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const KIND: ValueKind = ValueKind::Message(M::descriptor);

    #[inline]
    fn encoded_len(value: &M) -> usize {
        let len = value.encoded_len();
        varint::encoded_len(len as u64) + len
    }

    fn encode<B: BufMut>(value: &M, buf: &mut B) {
        varint::encode(value.encoded_len() as u64, buf);
        value.encode_raw(buf);
    }

    fn decode(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<M, DecodeError> {
        let ctx = ctx.enter_recursion()?;
        let mut body = reader.read_length_delimited()?;
        let mut message = M::default();
        message.merge_from(&mut body, ctx)?;
        Ok(message)
    }

    fn to_json(value: &M, options: &ConversionOptions) -> Value {
        value.to_object(options)
    }

    fn from_json(value: &Value) -> Result<M, ConversionError> {
        M::read_object(as_object(value)?)
    }

    fn default_json(_options: &ConversionOptions) -> Value {
        Value::Null
    }

    type Get<'a>
        = Option<&'a M>
    where
        Self: 'a;

    fn get<'a>(value: Option<&'a M>) -> Option<&'a M>
    where
        Self: 'a,
    {
        value
    }
}

/// An embedded message behind a `Box`, for edges that make the schema
/// recursive.
pub struct BoxedValue<M>(PhantomData<M>);

impl<M: Message> ValueType for BoxedValue<M> {
    type Value = Box<M>;

    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const KIND: ValueKind = ValueKind::Message(M::descriptor);

    #[inline]
    fn encoded_len(value: &Box<M>) -> usize {
        MessageValue::<M>::encoded_len(value)
    }

    fn encode<B: BufMut>(value: &Box<M>, buf: &mut B) {
        MessageValue::<M>::encode(value, buf)
    }

    fn decode(reader: &mut Reader<'_>, ctx: DecodeContext) -> Result<Box<M>, DecodeError> {
        MessageValue::<M>::decode(reader, ctx).map(Box::new)
    }

    fn to_json(value: &Box<M>, options: &ConversionOptions) -> Value {
        value.to_object(options)
    }

    fn from_json(value: &Value) -> Result<Box<M>, ConversionError> {
        MessageValue::<M>::from_json(value).map(Box::new)
    }

    fn default_json(_options: &ConversionOptions) -> Value {
        Value::Null
    }

    type Get<'a>
        = Option<&'a M>
    where
        Self: 'a;

    fn get<'a>(value: Option<&'a Box<M>>) -> Option<&'a M>
    where
        Self: 'a,
    {
        value.map(|boxed| &**boxed)
    }
}

/// A message that may already be serialized. Encoded bytes are copied into
/// the output as they are; decoding always produces a parsed message.
pub struct MaybeEncodedValue<M>(PhantomData<M>);

impl<M: Message> ValueType for MaybeEncodedValue<M> {
    type Value = MaybeEncoded<M>;

    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const KIND: ValueKind = ValueKind::Message(M::descriptor);

    fn encoded_len(value: &MaybeEncoded<M>) -> usize {
        match value {
            MaybeEncoded::Message(message) => MessageValue::<M>::encoded_len(message),
            MaybeEncoded::Encoded(bytes) => varint::encoded_len(bytes.len() as u64) + bytes.len(),
        }
    }

    fn encode<B: BufMut>(value: &MaybeEncoded<M>, buf: &mut B) {
        match value {
            MaybeEncoded::Message(message) => MessageValue::<M>::encode(message, buf),
            MaybeEncoded::Encoded(bytes) => {
                varint::encode(bytes.len() as u64, buf);
                buf.put_slice(bytes);
            }
        }
    }

    fn decode(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<MaybeEncoded<M>, DecodeError> {
        MessageValue::<M>::decode(reader, ctx).map(MaybeEncoded::Message)
    }

    fn to_json(value: &MaybeEncoded<M>, options: &ConversionOptions) -> Value {
        match value {
            MaybeEncoded::Message(message) => message.to_object(options),
            MaybeEncoded::Encoded(bytes) => match M::decode(bytes) {
                Ok(message) => message.to_object(options),
                Err(error) => {
                    debug!(
                        message_type = M::descriptor().full_name,
                        %error,
                        "pre-encoded message does not decode, rendering it as base64"
                    );
                    Value::String(BASE64_STANDARD.encode(bytes))
                }
            },
        }
    }

    /// Objects become parsed messages and base64 strings become encoded
    /// bytes.
    fn from_json(value: &Value) -> Result<MaybeEncoded<M>, ConversionError> {
        match value {
            Value::String(text) => BASE64_STANDARD
                .decode(text)
                .map(|bytes| MaybeEncoded::Encoded(Bytes::from(bytes)))
                .map_err(|_| ConversionError::new("invalid base64 string")),
            value => MessageValue::<M>::from_json(value).map(MaybeEncoded::Message),
        }
    }

    fn default_json(_options: &ConversionOptions) -> Value {
        Value::Null
    }

    type Get<'a>
        = Option<&'a MaybeEncoded<M>>
    where
        Self: 'a;

    fn get<'a>(value: Option<&'a MaybeEncoded<M>>) -> Option<&'a MaybeEncoded<M>>
    where
        Self: 'a,
    {
        value
    }
}
