// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Value types for the scalar kinds the schema uses.

use crate::object::{
    double_to_json, parse_bool, parse_f64, parse_i32, parse_i64, parse_string, parse_u32,
    parse_u64, signed_long_to_json, unsigned_long_to_json,
};
use crate::{
    varint, ConversionError, ConversionOptions, DecodeContext, DecodeError, DecodeErrorKind,
    Reader, ScalarKind, ValueKind, ValueType, WireType,
};
use bytes::BufMut;
use serde_json::Value;

/// Declares a varint-encoded scalar from its conversions to and from the raw
/// `u64` on the wire.
macro_rules! varint_scalar {
    (
        $(#[$attr:meta])*
        $name:ident: $ty:ty, $kind:ident,
        encode: $encode:expr,
        decode: $decode:expr,
        to_json: $to_json:expr,
        from_json: $from_json:expr $(,)?
    ) => {
        $(#[$attr])*
        pub struct $name;

        impl ValueType for $name {
            type Value = $ty;

            const WIRE_TYPE: WireType = WireType::Varint;
            const KIND: ValueKind = ValueKind::Scalar(ScalarKind::$kind);

            #[inline]
            fn encoded_len(value: &$ty) -> usize {
                varint::encoded_len($encode(*value))
            }

            #[inline]
            fn encode<B: BufMut>(value: &$ty, buf: &mut B) {
                varint::encode($encode(*value), buf)
            }

            #[inline]
            fn decode(reader: &mut Reader<'_>, _ctx: DecodeContext) -> Result<$ty, DecodeError> {
                reader.read_varint().map($decode)
            }

            fn to_json(value: &$ty, options: &ConversionOptions) -> Value {
                $to_json(*value, options)
            }

            fn from_json(value: &Value) -> Result<$ty, ConversionError> {
                $from_json(value)
            }

            fn default_json(options: &ConversionOptions) -> Value {
                Self::to_json(&<$ty>::default(), options)
            }

            type Get<'a> = $ty;

            #[inline]
            fn get<'a>(value: Option<&'a $ty>) -> $ty
    where
        Self: 'a,
    {
                value.copied().unwrap_or_default()
            }
        }
    };
}

varint_scalar! {
    /// `int32`. Negative values are sign-extended and take ten bytes.
    Int32: i32, Int32,
    encode: |value: i32| value as i64 as u64,
    decode: |raw: u64| raw as i32,
    to_json: |value: i32, _: &ConversionOptions| Value::from(value),
    from_json: parse_i32,
}

varint_scalar! {
    Int64: i64, Int64,
    encode: |value: i64| value as u64,
    decode: |raw: u64| raw as i64,
    to_json: signed_long_to_json,
    from_json: parse_i64,
}

varint_scalar! {
    Uint32: u32, Uint32,
    encode: u64::from,
    decode: |raw: u64| raw as u32,
    to_json: |value: u32, _: &ConversionOptions| Value::from(value),
    from_json: parse_u32,
}

varint_scalar! {
    Uint64: u64, Uint64,
    encode: |value: u64| value,
    decode: |raw: u64| raw,
    to_json: unsigned_long_to_json,
    from_json: parse_u64,
}

varint_scalar! {
    /// `sint64`, zig-zag encoded. Used by the histogram bucket lists.
    Sint64: i64, Sint64,
    encode: varint::zigzag_encode64,
    decode: varint::zigzag_decode64,
    to_json: signed_long_to_json,
    from_json: parse_i64,
}

varint_scalar! {
    Bool: bool, Bool,
    encode: u64::from,
    decode: |raw: u64| raw != 0,
    to_json: |value: bool, _: &ConversionOptions| Value::Bool(value),
    from_json: parse_bool,
}

/// `double`, written as eight little-endian bytes.
pub struct Double;

impl ValueType for Double {
    type Value = f64;

    const WIRE_TYPE: WireType = WireType::Fixed64;
    const KIND: ValueKind = ValueKind::Scalar(ScalarKind::Double);

    #[inline]
    fn encoded_len(_value: &f64) -> usize {
        8
    }

    #[inline]
    fn encode<B: BufMut>(value: &f64, buf: &mut B) {
        buf.put_f64_le(*value)
    }

    fn decode(reader: &mut Reader<'_>, _ctx: DecodeContext) -> Result<f64, DecodeError> {
        reader.read_fixed64().map(f64::from_bits)
    }

    fn to_json(value: &f64, options: &ConversionOptions) -> Value {
        double_to_json(*value, options)
    }

    fn from_json(value: &Value) -> Result<f64, ConversionError> {
        parse_f64(value)
    }

    fn default_json(options: &ConversionOptions) -> Value {
        double_to_json(0.0, options)
    }

    type Get<'a> = f64;

    #[inline]
    fn get<'a>(value: Option<&'a f64>) -> f64
    where
        Self: 'a,
    {
        value.copied().unwrap_or_default()
    }
}

/// `string`: a length prefix followed by UTF-8 bytes.
pub struct Str;

impl ValueType for Str {
    type Value = String;

    const WIRE_TYPE: WireType = WireType::LengthDelimited;
    const KIND: ValueKind = ValueKind::Scalar(ScalarKind::String);

    #[inline]
    fn encoded_len(value: &String) -> usize {
        varint::encoded_len(value.len() as u64) + value.len()
    }

    fn encode<B: BufMut>(value: &String, buf: &mut B) {
        varint::encode(value.len() as u64, buf);
        buf.put_slice(value.as_bytes());
    }

    fn decode(reader: &mut Reader<'_>, _ctx: DecodeContext) -> Result<String, DecodeError> {
        let bytes = reader.read_bytes()?;
        match std::str::from_utf8(bytes) {
            Ok(text) => Ok(text.to_owned()),
            Err(_) => Err(DecodeErrorKind::InvalidUtf8.into()),
        }
    }

    fn to_json(value: &String, _options: &ConversionOptions) -> Value {
        Value::String(value.clone())
    }

    fn from_json(value: &Value) -> Result<String, ConversionError> {
        parse_string(value)
    }

    fn default_json(_options: &ConversionOptions) -> Value {
        Value::String(String::new())
    }

    type Get<'a> = &'a str;

    #[inline]
    fn get<'a>(value: Option<&'a String>) -> &'a str
    where
        Self: 'a,
    {
        value.map_or("", String::as_str)
    }
}
