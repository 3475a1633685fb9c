// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::WireType;
use std::borrow::Cow;
use std::fmt;

/// The message/field pairs an error passed through, innermost first.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct FieldPath(Vec<(&'static str, &'static str)>);

impl FieldPath {
    pub fn push(&mut self, message: &'static str, field: &'static str) {
        self.0.push((message, field));
    }

    /// Iterates from the outermost message to the innermost one.
    pub fn iter(&self) -> impl Iterator<Item = &(&'static str, &'static str)> {
        self.0.iter().rev()
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (message, field) in self.iter() {
            write!(f, "{message}.{field}: ")?;
        }
        Ok(())
    }
}

/// Represents the ways a buffer can fail to decode.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum DecodeErrorKind {
    #[error("buffer underflow: {needed} bytes needed but only {remaining} remaining")]
    Truncated { needed: usize, remaining: usize },
    #[error("length-delimited field declares {len} bytes but only {remaining} remaining")]
    LengthOverrun { len: u64, remaining: usize },
    #[error("invalid varint")]
    InvalidVarint,
    #[error("invalid key value: {0}")]
    InvalidKey(u64),
    #[error("invalid wire type value: {0}")]
    InvalidWireType(u64),
    #[error("invalid field number: 0")]
    InvalidFieldNumber,
    #[error("invalid wire type: {actual:?} (expected {expected:?})")]
    UnexpectedWireType {
        expected: WireType,
        actual: WireType,
    },
    #[error("invalid string value: data is not UTF-8 encoded")]
    InvalidUtf8,
    #[error("unexpected end group tag")]
    UnexpectedEndGroup,
    #[error("recursion limit reached")]
    RecursionLimitReached,
}

/// A decode failure, along with the path of fields that led to it.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to decode protobuf message: {path}{kind}")]
pub struct DecodeError {
    kind: DecodeErrorKind,
    path: FieldPath,
}

impl DecodeError {
    pub fn new(kind: DecodeErrorKind) -> Self {
        Self {
            kind,
            path: FieldPath::default(),
        }
    }

    pub fn kind(&self) -> &DecodeErrorKind {
        &self.kind
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// Records that the error happened while decoding `field` of `message`.
    pub fn push(mut self, message: &'static str, field: &'static str) -> Self {
        self.path.push(message, field);
        self
    }
}

impl From<DecodeErrorKind> for DecodeError {
    fn from(kind: DecodeErrorKind) -> Self {
        Self::new(kind)
    }
}

/// Encoding into a growable buffer never fails; this is only returned when a
/// fixed-capacity buffer is too small to hold the message.
#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to encode protobuf message; insufficient buffer capacity (required: {required}, remaining: {remaining})")]
pub struct EncodeError {
    required: usize,
    remaining: usize,
}

impl EncodeError {
    pub const fn new(required: usize, remaining: usize) -> Self {
        Self {
            required,
            remaining,
        }
    }

    pub const fn required_capacity(&self) -> usize {
        self.required
    }

    pub const fn remaining(&self) -> usize {
        self.remaining
    }
}

/// Failure to build a typed message out of a plain object.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("failed to convert plain object: {path}{reason}")]
pub struct ConversionError {
    reason: Cow<'static, str>,
    path: FieldPath,
}

impl ConversionError {
    pub fn new(reason: impl Into<Cow<'static, str>>) -> Self {
        Self {
            reason: reason.into(),
            path: FieldPath::default(),
        }
    }

    pub fn reason(&self) -> &str {
        &self.reason
    }

    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    pub fn push(mut self, message: &'static str, field: &'static str) -> Self {
        self.path.push(message, field);
        self
    }
}
