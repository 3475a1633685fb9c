// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Plain-object conversion options and the per-kind helpers shared by the
//! value codecs and [`verify`](crate::Message::verify).

use crate::{ConversionError, EnumDescriptor};
use serde_json::{Map, Number, Value};

/// How 64-bit integers are rendered by `to_object`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum LongConversion {
    /// An exact JSON integer.
    #[default]
    Integer,
    /// A decimal string.
    String,
    /// A JSON number going through `f64`. Values above 2^53 lose precision.
    Number,
}

/// How enum values are rendered by `to_object`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum EnumConversion {
    #[default]
    Integer,
    /// The symbolic name, falling back to the number for unknown values.
    Name,
}

/// Options for [`Message::to_object`](crate::Message::to_object).
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub struct ConversionOptions {
    pub longs: LongConversion,
    pub enums: EnumConversion,
    /// Emits the default of every absent field: zero, `""`, `false`, `[]`,
    /// `{}`, or `null` for messages. Oneof members are never defaulted.
    pub defaults: bool,
    /// Emits empty lists even when `defaults` is off.
    pub arrays: bool,
    /// Emits empty maps even when `defaults` is off.
    pub objects: bool,
    /// Adds a property named after each set oneof group whose value is the
    /// name of the member that is set.
    pub oneofs: bool,
    /// Renders non-finite doubles as `"NaN"`, `"Infinity"` and `"-Infinity"`
    /// instead of `null`.
    pub json: bool,
}

impl ConversionOptions {
    /// The options used by [`Message::to_json`](crate::Message::to_json).
    pub const JSON: Self = Self {
        longs: LongConversion::String,
        enums: EnumConversion::Name,
        defaults: false,
        arrays: false,
        objects: false,
        oneofs: false,
        json: true,
    };
}

pub(crate) fn signed_long_to_json(value: i64, options: &ConversionOptions) -> Value {
    match options.longs {
        LongConversion::Integer => Value::from(value),
        LongConversion::String => Value::String(value.to_string()),
        LongConversion::Number => Value::from(value as f64),
    }
}

pub(crate) fn unsigned_long_to_json(value: u64, options: &ConversionOptions) -> Value {
    match options.longs {
        LongConversion::Integer => Value::from(value),
        LongConversion::String => Value::String(value.to_string()),
        LongConversion::Number => Value::from(value as f64),
    }
}

pub(crate) fn double_to_json(value: f64, options: &ConversionOptions) -> Value {
    match Number::from_f64(value) {
        Some(number) => Value::Number(number),
        // Without `json` this matches what serializing a raw NaN produces.
        None if options.json => Value::String(
            if value.is_nan() {
                "NaN"
            } else if value > 0.0 {
                "Infinity"
            } else {
                "-Infinity"
            }
            .to_owned(),
        ),
        None => Value::Null,
    }
}

pub(crate) fn enum_to_json(
    descriptor: &'static EnumDescriptor,
    value: i32,
    options: &ConversionOptions,
) -> Value {
    match options.enums {
        EnumConversion::Name => match descriptor.name_of(value) {
            Some(name) => Value::String(name.to_owned()),
            None => Value::from(value),
        },
        EnumConversion::Integer => Value::from(value),
    }
}

pub(crate) fn enum_default_json(
    descriptor: &'static EnumDescriptor,
    options: &ConversionOptions,
) -> Value {
    enum_to_json(descriptor, descriptor.default_value(), options)
}

/// A JSON number with no fractional part.
pub(crate) fn is_integer(value: &Value) -> bool {
    match value {
        Value::Number(number) => {
            number.is_i64()
                || number.is_u64()
                || number
                    .as_f64()
                    .is_some_and(|float| float.is_finite() && float.fract() == 0.0)
        }
        _ => false,
    }
}

/// An integer, or a `{low, high}` pair of 32-bit words.
pub(crate) fn is_long(value: &Value) -> bool {
    is_integer(value) || long_words(value).is_some()
}

fn long_words(value: &Value) -> Option<u64> {
    let object = value.as_object()?;
    let word = |key: &str| {
        object
            .get(key)
            .filter(|word| is_integer(word))
            .and_then(|word| word.as_i64().or_else(|| word.as_f64().map(|f| f as i64)))
    };
    let low = word("low")?;
    let high = word("high")?;
    Some((u64::from(high as u32) << 32) | u64::from(low as u32))
}

fn integral_f64(value: &Value) -> Option<f64> {
    value
        .as_f64()
        .filter(|float| float.is_finite() && float.fract() == 0.0)
}

pub(crate) fn parse_i64(value: &Value) -> Result<i64, ConversionError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            integral_f64(value)
                .filter(|float| *float >= i64::MIN as f64 && *float < i64::MAX as f64)
                .map(|float| float as i64)
        }),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        Value::Object(_) => long_words(value).map(|bits| bits as i64),
        _ => None,
    };
    parsed.ok_or_else(|| ConversionError::new("integer|Long expected"))
}

/// Negative inputs wrap to their two's complement, the same bits `int64`
/// would put on the wire.
pub(crate) fn parse_u64(value: &Value) -> Result<u64, ConversionError> {
    let parsed = match value {
        Value::Number(number) => number
            .as_u64()
            .or_else(|| number.as_i64().map(|signed| signed as u64))
            .or_else(|| {
                integral_f64(value)
                    .filter(|float| *float >= 0.0 && *float < u64::MAX as f64)
                    .map(|float| float as u64)
            }),
        Value::String(text) => {
            let text = text.trim();
            text.parse::<u64>()
                .ok()
                .or_else(|| text.parse::<i64>().ok().map(|signed| signed as u64))
        }
        Value::Object(_) => long_words(value),
        _ => None,
    };
    parsed.ok_or_else(|| ConversionError::new("integer|Long expected"))
}

pub(crate) fn parse_i32(value: &Value) -> Result<i32, ConversionError> {
    let wide = match value {
        Value::Number(_) => integral_f64(value).map(|float| float as i64),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    wide.and_then(|wide| i32::try_from(wide).ok())
        .ok_or_else(|| ConversionError::new("integer expected"))
}

pub(crate) fn parse_u32(value: &Value) -> Result<u32, ConversionError> {
    let wide = match value {
        Value::Number(_) => integral_f64(value).map(|float| float as i64),
        Value::String(text) => text.trim().parse::<i64>().ok(),
        _ => None,
    };
    wide.and_then(|wide| u32::try_from(wide).ok())
        .ok_or_else(|| ConversionError::new("integer expected"))
}

pub(crate) fn parse_f64(value: &Value) -> Result<f64, ConversionError> {
    match value {
        Value::Number(number) => number.as_f64(),
        Value::String(text) => match text.as_str() {
            "NaN" => Some(f64::NAN),
            "Infinity" => Some(f64::INFINITY),
            "-Infinity" => Some(f64::NEG_INFINITY),
            text => text.trim().parse::<f64>().ok(),
        },
        _ => None,
    }
    .ok_or_else(|| ConversionError::new("number expected"))
}

pub(crate) fn parse_bool(value: &Value) -> Result<bool, ConversionError> {
    value
        .as_bool()
        .ok_or_else(|| ConversionError::new("boolean expected"))
}

pub(crate) fn parse_string(value: &Value) -> Result<String, ConversionError> {
    value
        .as_str()
        .map(str::to_owned)
        .ok_or_else(|| ConversionError::new("string expected"))
}

/// Accepts a symbolic name or any 32-bit number, so values added by newer
/// schemas survive the conversion.
pub(crate) fn parse_enum(
    descriptor: &'static EnumDescriptor,
    value: &Value,
) -> Result<i32, ConversionError> {
    match value {
        Value::String(name) => descriptor.value_of(name),
        Value::Number(_) => integral_f64(value).and_then(|float| i32::try_from(float as i64).ok()),
        _ => None,
    }
    .ok_or_else(|| ConversionError::new("enum value expected"))
}

pub(crate) fn as_object(value: &Value) -> Result<&Map<String, Value>, ConversionError> {
    value
        .as_object()
        .ok_or_else(|| ConversionError::new("object expected"))
}
