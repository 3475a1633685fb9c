// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::field::JsonObject;
use crate::{
    ConversionError, ConversionOptions, DecodeContext, DecodeError, FieldDescriptor, Reader,
    WireType,
};
use bytes::BufMut;
use std::fmt::Debug;

/// The members of a oneof group, declared with [`oneof!`](crate::oneof).
///
/// Each variant is one member field, so a value can only ever hold one of
/// them. Messages store the group as `Option<Self>`.
pub trait Oneof: Clone + Debug + PartialEq + Send + Sync + Sized {
    /// The member fields, in declaration order.
    const FIELDS: &'static [FieldDescriptor];

    /// The plain-object name of the member that is set.
    fn field_name(&self) -> &'static str;

    /// The size of the member's tag and value.
    fn encoded_len(&self) -> usize;

    fn encode<B: BufMut>(&self, buf: &mut B);

    /// Reads the member with field `number` into `slot`, replacing whatever
    /// member was there.
    fn merge(
        message: &'static str,
        number: u32,
        wire_type: WireType,
        slot: &mut Option<Self>,
        reader: &mut Reader<'_>,
        ctx: DecodeContext,
    ) -> Result<(), DecodeError>;

    /// Adds the member's property to `object`.
    fn to_json(&self, options: &ConversionOptions, object: &mut JsonObject);

    /// Picks the member out of a plain object. When several members are set
    /// the one declared last wins.
    fn from_json(
        message: &'static str,
        object: &JsonObject,
    ) -> Result<Option<Self>, ConversionError>;
}

/// Declares the members of a oneof group as an enum.
///
/// Each variant names its field number, its plain-object name and the
/// [`ValueType`](crate::ValueType) used on the wire:
///
/// ```
/// usage_proto_codec::oneof! {
///     pub enum Id {
///         #[field(1, "responseName", usage_proto_codec::scalar::Str)]
///         ResponseName(String),
///         #[field(2, "index", usage_proto_codec::scalar::Uint32)]
///         Index(u32),
///     }
/// }
///
/// use usage_proto_codec::Oneof;
/// assert_eq!(Id::Index(3).field_name(), "index");
/// assert_eq!(Id::ResponseName("user".into()).encoded_len(), 6);
/// ```
#[macro_export]
macro_rules! oneof {
    (
        $(#[doc = $doc:expr])*
        $vis:vis enum $name:ident {
            $(
                $(#[doc = $variant_doc:expr])*
                #[field($number:literal, $json:literal, $value:ty)]
                $variant:ident($ty:ty),
            )+
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Clone, Debug, PartialEq)]
        $vis enum $name {
            $(
                $(#[doc = $variant_doc])*
                $variant($ty),
            )+
        }

        impl $crate::Oneof for $name {
            const FIELDS: &'static [$crate::FieldDescriptor] = &[
                $(
                    $crate::FieldDescriptor::new(
                        $json,
                        $number,
                        $crate::FieldKind::Singular(<$value as $crate::ValueType>::KIND),
                    ),
                )+
            ];

            fn field_name(&self) -> &'static str {
                match self {
                    $(Self::$variant(_) => $json,)+
                }
            }

            fn encoded_len(&self) -> usize {
                match self {
                    $(
                        Self::$variant(value) => {
                            $crate::key_len($number)
                                + <$value as $crate::ValueType>::encoded_len(value)
                        }
                    )+
                }
            }

            fn encode<B: $crate::__private::BufMut>(&self, buf: &mut B) {
                match self {
                    $(
                        Self::$variant(value) => {
                            $crate::Tag::new($number, <$value as $crate::ValueType>::WIRE_TYPE)
                                .encode(buf);
                            <$value as $crate::ValueType>::encode(value, buf);
                        }
                    )+
                }
            }

            fn merge(
                message: &'static str,
                number: u32,
                wire_type: $crate::WireType,
                slot: &mut ::core::option::Option<Self>,
                reader: &mut $crate::Reader<'_>,
                ctx: $crate::DecodeContext,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                match number {
                    $(
                        $number => $crate::field::check_wire_type(
                            <$value as $crate::ValueType>::WIRE_TYPE,
                            wire_type,
                        )
                        .and_then(|()| <$value as $crate::ValueType>::decode(reader, ctx))
                        .map(|value| *slot = ::core::option::Option::Some(Self::$variant(value)))
                        .map_err(|err| err.push(message, $json)),
                    )+
                    _ => reader.skip_field(number, wire_type, ctx),
                }
            }

            fn to_json(
                &self,
                options: &$crate::ConversionOptions,
                object: &mut $crate::field::JsonObject,
            ) {
                let (name, value) = match self {
                    $(
                        Self::$variant(value) => {
                            ($json, <$value as $crate::ValueType>::to_json(value, options))
                        }
                    )+
                };
                object.insert(::std::string::String::from(name), value);
            }

            fn from_json(
                message: &'static str,
                object: &$crate::field::JsonObject,
            ) -> ::core::result::Result<::core::option::Option<Self>, $crate::ConversionError> {
                let mut found: ::core::option::Option<Self> = ::core::option::Option::None;
                $(
                    if let ::core::option::Option::Some(value) =
                        object.get($json).filter(|value| !value.is_null())
                    {
                        let value = <$value as $crate::ValueType>::from_json(value)
                            .map_err(|err| err.push(message, $json))?;
                        if let ::core::option::Option::Some(previous) = &found {
                            $crate::__private::tracing::debug!(
                                message_type = message,
                                replaced = $crate::Oneof::field_name(previous),
                                member = $json,
                                "several oneof members set in plain object, keeping the last"
                            );
                        }
                        found = ::core::option::Option::Some(Self::$variant(value));
                    }
                )+
                ::core::result::Result::Ok(found)
            }
        }
    };
}
