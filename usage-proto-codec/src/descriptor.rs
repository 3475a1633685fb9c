// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::WireType;

/// The static schema of one message type: every field with its number,
/// plain-object name and kind, in encoding order.
#[derive(Debug)]
pub struct MessageDescriptor {
    /// Dotted name relative to the package, e.g. `Trace.Node`.
    pub full_name: &'static str,
    pub fields: &'static [FieldDescriptor],
}

impl MessageDescriptor {
    /// Looks up a field by number, searching inside oneof groups too.
    pub fn field(&self, number: u32) -> Option<&'static FieldDescriptor> {
        self.leaf_fields().find(|field| field.number == number)
    }

    /// Looks up a field or oneof group by its plain-object name.
    pub fn field_by_name(&self, name: &str) -> Option<&'static FieldDescriptor> {
        self.fields
            .iter()
            .find(|field| field.name == name)
            .or_else(|| self.leaf_fields().find(|field| field.name == name))
    }

    /// Every field that occupies a number on the wire, with oneof groups
    /// flattened into their members.
    pub fn leaf_fields(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields.iter().flat_map(|field| match field.kind {
            FieldKind::Oneof(members) => members,
            _ => std::slice::from_ref(field),
        })
    }

    pub fn oneofs(&self) -> impl Iterator<Item = &'static FieldDescriptor> {
        self.fields
            .iter()
            .filter(|field| matches!(field.kind, FieldKind::Oneof(_)))
    }
}

#[derive(Clone, Copy, Debug)]
pub struct FieldDescriptor {
    /// The protobuf.js style camelCase name used by plain objects. For a
    /// oneof group this is the group name, e.g. `id`.
    pub name: &'static str,
    /// Zero for oneof groups, which have no number of their own.
    pub number: u32,
    pub kind: FieldKind,
}

impl FieldDescriptor {
    pub const fn new(name: &'static str, number: u32, kind: FieldKind) -> Self {
        Self { name, number, kind }
    }

    /// The wire type a non-packed occurrence of this field uses. Oneof
    /// groups have none.
    pub fn wire_type(&self) -> Option<WireType> {
        match self.kind {
            FieldKind::Singular(value) | FieldKind::Repeated(value) => Some(value.wire_type()),
            FieldKind::Map(..) => Some(WireType::LengthDelimited),
            FieldKind::Oneof(_) => None,
        }
    }
}

#[derive(Clone, Copy, Debug)]
pub enum FieldKind {
    Singular(ValueKind),
    Repeated(ValueKind),
    /// Map fields, with the key and value kinds.
    Map(ScalarKind, ValueKind),
    /// A oneof group and its member fields, which are all singular.
    Oneof(&'static [FieldDescriptor]),
}

#[derive(Clone, Copy, Debug)]
pub enum ValueKind {
    Scalar(ScalarKind),
    Enum(&'static EnumDescriptor),
    Message(fn() -> &'static MessageDescriptor),
}

impl ValueKind {
    pub const fn wire_type(self) -> WireType {
        match self {
            ValueKind::Scalar(scalar) => scalar.wire_type(),
            ValueKind::Enum(_) => WireType::Varint,
            ValueKind::Message(_) => WireType::LengthDelimited,
        }
    }

    /// Whether repeated fields of this kind are written packed.
    pub const fn is_packable(self) -> bool {
        !matches!(self.wire_type(), WireType::LengthDelimited)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ScalarKind {
    Double,
    Int32,
    Int64,
    Uint32,
    Uint64,
    Sint64,
    Bool,
    String,
}

impl ScalarKind {
    pub const fn wire_type(self) -> WireType {
        match self {
            ScalarKind::Double => WireType::Fixed64,
            ScalarKind::String => WireType::LengthDelimited,
            ScalarKind::Int32
            | ScalarKind::Int64
            | ScalarKind::Uint32
            | ScalarKind::Uint64
            | ScalarKind::Sint64
            | ScalarKind::Bool => WireType::Varint,
        }
    }

    /// The name used in .proto files.
    pub const fn proto_name(self) -> &'static str {
        match self {
            ScalarKind::Double => "double",
            ScalarKind::Int32 => "int32",
            ScalarKind::Int64 => "int64",
            ScalarKind::Uint32 => "uint32",
            ScalarKind::Uint64 => "uint64",
            ScalarKind::Sint64 => "sint64",
            ScalarKind::Bool => "bool",
            ScalarKind::String => "string",
        }
    }

    /// 64-bit kinds, which plain objects may carry as numbers, strings or
    /// `{low, high}` pairs.
    pub const fn is_long(self) -> bool {
        matches!(
            self,
            ScalarKind::Int64 | ScalarKind::Uint64 | ScalarKind::Sint64
        )
    }
}

#[derive(Debug)]
pub struct EnumDescriptor {
    pub full_name: &'static str,
    /// Symbolic names and their values, in declaration order. The first
    /// entry is the default.
    pub values: &'static [(&'static str, i32)],
}

impl EnumDescriptor {
    pub fn name_of(&self, value: i32) -> Option<&'static str> {
        self.values
            .iter()
            .find(|(_, v)| *v == value)
            .map(|(name, _)| *name)
    }

    pub fn value_of(&self, name: &str) -> Option<i32> {
        self.values
            .iter()
            .find(|(n, _)| *n == name)
            .map(|(_, value)| *value)
    }

    pub fn contains(&self, value: i32) -> bool {
        self.values.iter().any(|(_, v)| *v == value)
    }

    /// The value of the first entry, which unset fields read as.
    pub fn default_value(&self) -> i32 {
        self.values.first().map_or(0, |(_, value)| *value)
    }
}
