// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Field codecs: a [`ValueType`] combined with a field number and a
//! cardinality. The `message!` macro stores one codec type per struct field
//! and routes every operation through it.

use crate::object::as_object;
use crate::{
    key_len, scalar, varint, BoxedValue, ConversionError, ConversionOptions, DecodeContext,
    DecodeError, DecodeErrorKind, EnumValue, FieldDescriptor, FieldKind, MaybeEncodedValue,
    MessageValue, Oneof, Reader, ScalarKind, Tag, ValueType, WireType,
};
use bytes::BufMut;
use indexmap::IndexMap;
use serde_json::Value;
use std::fmt::Debug;
use std::marker::PhantomData;

/// The plain-object type fields are converted to and from.
pub type JsonObject = serde_json::Map<String, Value>;

pub trait FieldCodec {
    type Value: Clone + Debug + Default + PartialEq + Send + Sync;

    const KIND: FieldKind;

    /// Whether a key with `number` belongs to the field declared as
    /// `declared`. Oneof groups declare no number and claim their members'.
    #[inline]
    fn accepts(declared: u32, number: u32) -> bool {
        declared == number
    }

    fn encoded_len(number: u32, value: &Self::Value) -> usize;

    fn encode<B: BufMut>(number: u32, value: &Self::Value, buf: &mut B);

    /// Reads one occurrence of the field into `value`. Errors are tagged
    /// with `message` and `name`.
    fn merge(
        message: &'static str,
        name: &'static str,
        number: u32,
        wire_type: WireType,
        value: &mut Self::Value,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>;

    fn to_json(
        name: &'static str,
        value: &Self::Value,
        options: &ConversionOptions,
        object: &mut JsonObject,
    );

    fn from_json(
        message: &'static str,
        name: &'static str,
        object: &JsonObject,
        value: &mut Self::Value,
    ) -> Result<(), ConversionError>;

    /// What the field's accessor returns.
    type Get<'a>
    where
        Self: 'a;

    fn get<'a>(value: &'a Self::Value) -> Self::Get<'a>
    where
        Self: 'a;
}

#[inline]
pub fn check_wire_type(expected: WireType, actual: WireType) -> Result<(), DecodeError> {
    if expected == actual {
        Ok(())
    } else {
        Err(DecodeErrorKind::UnexpectedWireType { expected, actual }.into())
    }
}

/// Looks up a property, treating `null` the same as a missing one.
fn property<'a>(object: &'a JsonObject, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

/// An optional field. `Some` is always written, even when it holds a zero.
pub struct Singular<T>(PhantomData<T>);

impl<T: ValueType> FieldCodec for Singular<T> {
    type Value = Option<T::Value>;

    const KIND: FieldKind = FieldKind::Singular(T::KIND);

    #[inline]
    fn encoded_len(number: u32, value: &Self::Value) -> usize {
        value
            .as_ref()
            .map_or(0, |value| key_len(number) + T::encoded_len(value))
    }

    #[inline]
    fn encode<B: BufMut>(number: u32, value: &Self::Value, buf: &mut B) {
        if let Some(value) = value {
            Tag::new(number, T::WIRE_TYPE).encode(buf);
            T::encode(value, buf);
        }
    }

    fn merge(
        message: &'static str,
        name: &'static str,
        _number: u32,
        wire_type: WireType,
        value: &mut Self::Value,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        check_wire_type(T::WIRE_TYPE, wire_type)
            .and_then(|()| T::decode(reader, ctx))
            .map(|decoded| *value = Some(decoded))
            .map_err(|err| err.push(message, name))
    }

    fn to_json(
        name: &'static str,
        value: &Self::Value,
        options: &ConversionOptions,
        object: &mut JsonObject,
    ) {
        match value {
            Some(value) => {
                object.insert(name.to_owned(), T::to_json(value, options));
            }
            None if options.defaults => {
                object.insert(name.to_owned(), T::default_json(options));
            }
            None => {}
        }
    }

    fn from_json(
        message: &'static str,
        name: &'static str,
        object: &JsonObject,
        value: &mut Self::Value,
    ) -> Result<(), ConversionError> {
        if let Some(property) = property(object, name) {
            *value = Some(T::from_json(property).map_err(|err| err.push(message, name))?);
        }
        Ok(())
    }

    type Get<'a>
        = T::Get<'a>
    where
        Self: 'a;

    #[inline]
    fn get<'a>(value: &'a Self::Value) -> T::Get<'a>
    where
        Self: 'a,
    {
        T::get(value.as_ref())
    }
}

/// A repeated field. Values that aren't length-delimited are written packed,
/// and accepted both packed and unpacked.
pub struct Repeated<T>(PhantomData<T>);

impl<T: ValueType> Repeated<T> {
    const PACKED: bool = T::KIND.is_packable();

    fn packed_len(values: &[T::Value]) -> usize {
        values.iter().map(T::encoded_len).sum()
    }
}

impl<T: ValueType> FieldCodec for Repeated<T> {
    type Value = Vec<T::Value>;

    const KIND: FieldKind = FieldKind::Repeated(T::KIND);

    fn encoded_len(number: u32, values: &Self::Value) -> usize {
        if values.is_empty() {
            0
        } else if Self::PACKED {
            let len = Self::packed_len(values);
            key_len(number) + varint::encoded_len(len as u64) + len
        } else {
            values
                .iter()
                .map(|value| key_len(number) + T::encoded_len(value))
                .sum()
        }
    }

    fn encode<B: BufMut>(number: u32, values: &Self::Value, buf: &mut B) {
        if values.is_empty() {
            return;
        }
        if Self::PACKED {
            Tag::new(number, WireType::LengthDelimited).encode(buf);
            varint::encode(Self::packed_len(values) as u64, buf);
            for value in values {
                T::encode(value, buf);
            }
        } else {
            for value in values {
                Tag::new(number, T::WIRE_TYPE).encode(buf);
                T::encode(value, buf);
            }
        }
    }

    fn merge(
        message: &'static str,
        name: &'static str,
        _number: u32,
        wire_type: WireType,
        values: &mut Self::Value,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        let result = if Self::PACKED && wire_type == WireType::LengthDelimited {
            reader.read_length_delimited().and_then(|mut packed| {
                while !packed.is_empty() {
                    values.push(T::decode(&mut packed, ctx)?);
                }
                Ok(())
            })
        } else {
            check_wire_type(T::WIRE_TYPE, wire_type)
                .and_then(|()| T::decode(reader, ctx))
                .map(|value| values.push(value))
        };
        result.map_err(|err| err.push(message, name))
    }

    fn to_json(
        name: &'static str,
        values: &Self::Value,
        options: &ConversionOptions,
        object: &mut JsonObject,
    ) {
        if !values.is_empty() || options.defaults || options.arrays {
            let array = values
                .iter()
                .map(|value| T::to_json(value, options))
                .collect();
            object.insert(name.to_owned(), Value::Array(array));
        }
    }

    fn from_json(
        message: &'static str,
        name: &'static str,
        object: &JsonObject,
        values: &mut Self::Value,
    ) -> Result<(), ConversionError> {
        let Some(property) = property(object, name) else {
            return Ok(());
        };
        let array = property
            .as_array()
            .ok_or_else(|| ConversionError::new("array expected").push(message, name))?;
        *values = array
            .iter()
            .map(T::from_json)
            .collect::<Result<_, _>>()
            .map_err(|err| err.push(message, name))?;
        Ok(())
    }

    type Get<'a>
        = &'a [T::Value]
    where
        Self: 'a;

    #[inline]
    fn get<'a>(values: &'a Self::Value) -> &'a [T::Value]
    where
        Self: 'a,
    {
        values
    }
}

/// A `map<string, V>` field, written as one entry message per pair with the
/// key in field 1 and the value in field 2. Iteration order is insertion
/// order, which is also the order entries are written in.
pub struct Map<V>(PhantomData<V>);

const MAP_KEY: u32 = 1;
const MAP_VALUE: u32 = 2;

impl<V: ValueType> Map<V> {
    fn entry_len(key: &str, value: &V::Value) -> usize {
        key_len(MAP_KEY)
            + varint::encoded_len(key.len() as u64)
            + key.len()
            + key_len(MAP_VALUE)
            + V::encoded_len(value)
    }

    fn merge_entry(
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(String, V::Value), DecodeError> {
        let ctx = ctx.enter_recursion()?;
        let mut entry = reader.read_length_delimited()?;
        let mut key = String::new();
        let mut value = V::Value::default();
        while !entry.is_empty() {
            match entry.read_key()? {
                (MAP_KEY, wire_type) => {
                    check_wire_type(WireType::LengthDelimited, wire_type)?;
                    key = scalar::Str::decode(&mut entry, ctx)?;
                }
                (MAP_VALUE, wire_type) => {
                    check_wire_type(V::WIRE_TYPE, wire_type)?;
                    value = V::decode(&mut entry, ctx)?;
                }
                (number, wire_type) => entry.skip_field(number, wire_type, ctx)?,
            }
        }
        Ok((key, value))
    }
}

impl<V: ValueType> FieldCodec for Map<V> {
    type Value = IndexMap<String, V::Value>;

    const KIND: FieldKind = FieldKind::Map(ScalarKind::String, V::KIND);

    fn encoded_len(number: u32, map: &Self::Value) -> usize {
        map.iter()
            .map(|(key, value)| {
                let len = Self::entry_len(key, value);
                key_len(number) + varint::encoded_len(len as u64) + len
            })
            .sum()
    }

    fn encode<B: BufMut>(number: u32, map: &Self::Value, buf: &mut B) {
        for (key, value) in map {
            Tag::new(number, WireType::LengthDelimited).encode(buf);
            varint::encode(Self::entry_len(key, value) as u64, buf);
            Tag::new(MAP_KEY, WireType::LengthDelimited).encode(buf);
            scalar::Str::encode(key, buf);
            Tag::new(MAP_VALUE, V::WIRE_TYPE).encode(buf);
            V::encode(value, buf);
        }
    }

    fn merge(
        message: &'static str,
        name: &'static str,
        _number: u32,
        wire_type: WireType,
        map: &mut Self::Value,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        check_wire_type(WireType::LengthDelimited, wire_type)
            .and_then(|()| Self::merge_entry(reader, ctx))
            .map(|(key, value)| {
                map.insert(key, value);
            })
            .map_err(|err| err.push(message, name))
    }

    fn to_json(
        name: &'static str,
        map: &Self::Value,
        options: &ConversionOptions,
        object: &mut JsonObject,
    ) {
        if !map.is_empty() || options.defaults || options.objects {
            let entries = map
                .iter()
                .map(|(key, value)| (key.clone(), V::to_json(value, options)))
                .collect();
            object.insert(name.to_owned(), Value::Object(entries));
        }
    }

    fn from_json(
        message: &'static str,
        name: &'static str,
        object: &JsonObject,
        map: &mut Self::Value,
    ) -> Result<(), ConversionError> {
        let Some(property) = property(object, name) else {
            return Ok(());
        };
        let entries = as_object(property).map_err(|err| err.push(message, name))?;
        *map = entries
            .iter()
            .map(|(key, value)| Ok((key.clone(), V::from_json(value)?)))
            .collect::<Result<_, ConversionError>>()
            .map_err(|err| err.push(message, name))?;
        Ok(())
    }

    type Get<'a>
        = &'a IndexMap<String, V::Value>
    where
        Self: 'a;

    #[inline]
    fn get<'a>(map: &'a Self::Value) -> &'a IndexMap<String, V::Value>
    where
        Self: 'a,
    {
        map
    }
}

/// A oneof group. The members are the variants of `O`, so at most one of
/// them can ever be written.
pub struct OneofField<O>(PhantomData<O>);

impl<O: Oneof> FieldCodec for OneofField<O> {
    type Value = Option<O>;

    const KIND: FieldKind = FieldKind::Oneof(O::FIELDS);

    #[inline]
    fn accepts(_declared: u32, number: u32) -> bool {
        O::FIELDS
            .iter()
            .any(|field: &FieldDescriptor| field.number == number)
    }

    #[inline]
    fn encoded_len(_number: u32, value: &Self::Value) -> usize {
        value.as_ref().map_or(0, O::encoded_len)
    }

    #[inline]
    fn encode<B: BufMut>(_number: u32, value: &Self::Value, buf: &mut B) {
        if let Some(value) = value {
            value.encode(buf);
        }
    }

    /// The member read last replaces whichever one was set before.
    fn merge(
        message: &'static str,
        _name: &'static str,
        number: u32,
        wire_type: WireType,
        value: &mut Self::Value,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError> {
        O::merge(message, number, wire_type, value, reader, ctx)
    }

    fn to_json(
        name: &'static str,
        value: &Self::Value,
        options: &ConversionOptions,
        object: &mut JsonObject,
    ) {
        if let Some(value) = value {
            value.to_json(options, object);
            if options.oneofs {
                object.insert(name.to_owned(), Value::from(value.field_name()));
            }
        }
    }

    fn from_json(
        message: &'static str,
        _name: &'static str,
        object: &JsonObject,
        value: &mut Self::Value,
    ) -> Result<(), ConversionError> {
        if let Some(member) = O::from_json(message, object)? {
            *value = Some(member);
        }
        Ok(())
    }

    type Get<'a>
        = Option<&'a O>
    where
        Self: 'a;

    #[inline]
    fn get<'a>(value: &'a Self::Value) -> Option<&'a O>
    where
        Self: 'a,
    {
        value.as_ref()
    }
}

pub type Double = Singular<scalar::Double>;
pub type Int32 = Singular<scalar::Int32>;
pub type Int64 = Singular<scalar::Int64>;
pub type Uint32 = Singular<scalar::Uint32>;
pub type Uint64 = Singular<scalar::Uint64>;
pub type Bool = Singular<scalar::Bool>;
pub type Str = Singular<scalar::Str>;
pub type Enumeration<E> = Singular<EnumValue<E>>;
pub type Msg<M> = Singular<MessageValue<M>>;
pub type BoxedMsg<M> = Singular<BoxedValue<M>>;
pub type RepeatedMsg<M> = Repeated<MessageValue<M>>;
pub type RepeatedMaybeEncoded<M> = Repeated<MaybeEncodedValue<M>>;
pub type MapMsg<M> = Map<MessageValue<M>>;
