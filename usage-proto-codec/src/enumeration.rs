// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::EnumDescriptor;
use std::fmt::Debug;

/// A protobuf enum declared with [`enumeration!`](crate::enumeration).
///
/// Fields keep the raw `i32` so values from newer schemas survive a
/// decode/encode cycle; this trait maps the known ones to variants.
pub trait Enumeration: Copy + Debug + Default + PartialEq + Send + Sync + 'static {
    const DESCRIPTOR: &'static EnumDescriptor;

    fn from_i32(value: i32) -> Option<Self>;

    fn as_i32(self) -> i32;

    fn as_str_name(self) -> &'static str {
        Self::DESCRIPTOR.name_of(self.as_i32()).unwrap_or_default()
    }

    fn from_str_name(name: &str) -> Option<Self> {
        Self::DESCRIPTOR.value_of(name).and_then(Self::from_i32)
    }
}

/// Declares a protobuf enum. The first variant is the default.
///
/// ```
/// usage_proto_codec::enumeration! {
///     pub enum Scope = "Trace.CachePolicy.Scope" {
///         Unknown = 0 => "UNKNOWN",
///         Public = 1 => "PUBLIC",
///         Private = 2 => "PRIVATE",
///     }
/// }
///
/// use usage_proto_codec::Enumeration;
/// assert_eq!(Scope::from_i32(1), Some(Scope::Public));
/// assert_eq!(Scope::Private.as_str_name(), "PRIVATE");
/// assert_eq!(Scope::default(), Scope::Unknown);
/// ```
#[macro_export]
macro_rules! enumeration {
    (
        $(#[doc = $doc:expr])*
        $vis:vis enum $name:ident = $full_name:literal {
            $(#[doc = $first_doc:expr])*
            $first:ident = $first_value:literal => $first_json:literal,
            $(
                $(#[doc = $variant_doc:expr])*
                $variant:ident = $value:literal => $json:literal,
            )*
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, PartialOrd, Ord)]
        #[repr(i32)]
        $vis enum $name {
            $(#[doc = $first_doc])*
            #[default]
            $first = $first_value,
            $(
                $(#[doc = $variant_doc])*
                $variant = $value,
            )*
        }

        impl $crate::Enumeration for $name {
            const DESCRIPTOR: &'static $crate::EnumDescriptor = &$crate::EnumDescriptor {
                full_name: $full_name,
                values: &[($first_json, $first_value), $(($json, $value),)*],
            };

            fn from_i32(value: i32) -> ::core::option::Option<Self> {
                match value {
                    $first_value => ::core::option::Option::Some(Self::$first),
                    $($value => ::core::option::Option::Some(Self::$variant),)*
                    _ => ::core::option::Option::None,
                }
            }

            #[inline]
            fn as_i32(self) -> i32 {
                self as i32
            }
        }

        impl ::core::convert::TryFrom<i32> for $name {
            type Error = i32;

            fn try_from(value: i32) -> ::core::result::Result<Self, i32> {
                <Self as $crate::Enumeration>::from_i32(value).ok_or(value)
            }
        }

        impl ::core::convert::From<$name> for i32 {
            fn from(value: $name) -> i32 {
                value as i32
            }
        }
    };
}
