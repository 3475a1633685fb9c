// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Schema conformance checks for plain objects, walking the descriptor
//! tables. The error strings follow the wording protobuf.js uses so callers
//! migrating from it see the same messages.
//!
//! Fields are checked in field-number order, the order the descriptor holds
//! them in. When an object has several problems the one reported is the
//! first in that order, which can differ from the .proto declaration order
//! protobuf.js walks.

use crate::object::{is_integer, is_long};
use crate::{FieldDescriptor, FieldKind, MessageDescriptor, ScalarKind, ValueKind};
use serde_json::{Map, Value};

/// The first problem found in a plain object, qualified with the path of
/// property names leading to it, e.g. `root.child.id: multiple values`.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
#[error("{0}")]
pub struct VerifyError(String);

impl VerifyError {
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

pub(crate) fn verify_message(
    descriptor: &'static MessageDescriptor,
    value: &Value,
) -> Result<(), VerifyError> {
    check_message(descriptor, value).map_err(VerifyError)
}

fn check_message(descriptor: &'static MessageDescriptor, value: &Value) -> Result<(), String> {
    let Some(object) = value.as_object() else {
        return Err("object expected".to_owned());
    };
    for field in descriptor.fields {
        match field.kind {
            FieldKind::Oneof(members) => check_oneof(field, members, object)?,
            _ => {
                if let Some(value) = present(object, field.name) {
                    check_field(field, value)?;
                }
            }
        }
    }
    Ok(())
}

fn present<'a>(object: &'a Map<String, Value>, name: &str) -> Option<&'a Value> {
    object.get(name).filter(|value| !value.is_null())
}

fn check_oneof(
    group: &FieldDescriptor,
    members: &'static [FieldDescriptor],
    object: &Map<String, Value>,
) -> Result<(), String> {
    let mut seen = false;
    for member in members {
        let Some(value) = present(object, member.name) else {
            continue;
        };
        if seen {
            return Err(format!("{}: multiple values", group.name));
        }
        seen = true;
        check_field(member, value)?;
    }
    Ok(())
}

fn check_field(field: &FieldDescriptor, value: &Value) -> Result<(), String> {
    match field.kind {
        FieldKind::Singular(kind) => check_value(field.name, kind, value, ""),
        FieldKind::Repeated(kind) => {
            let Some(items) = value.as_array() else {
                return Err(invalid(field.name, "array", ""));
            };
            items
                .iter()
                .try_for_each(|item| check_value(field.name, kind, item, "[]"))
        }
        FieldKind::Map(key, kind) => {
            let Some(entries) = value.as_object() else {
                return Err(invalid(field.name, "object", ""));
            };
            let suffix = format!("{{k:{}}}", key.proto_name());
            entries
                .values()
                .try_for_each(|entry| check_value(field.name, kind, entry, &suffix))
        }
        // Nested groups don't exist in the schema language.
        FieldKind::Oneof(_) => Ok(()),
    }
}

fn check_value(name: &str, kind: ValueKind, value: &Value, suffix: &str) -> Result<(), String> {
    match kind {
        ValueKind::Scalar(scalar) => {
            let (valid, expected) = match scalar {
                ScalarKind::String => (value.is_string(), "string"),
                ScalarKind::Bool => (value.is_boolean(), "boolean"),
                ScalarKind::Double => (value.is_number(), "number"),
                ScalarKind::Int32 | ScalarKind::Uint32 => {
                    (is_integer(value), "integer")
                }
                ScalarKind::Int64 | ScalarKind::Uint64 | ScalarKind::Sint64 => {
                    (is_long(value), "integer|Long")
                }
            };
            if valid {
                Ok(())
            } else {
                Err(invalid(name, expected, suffix))
            }
        }
        ValueKind::Enum(descriptor) => {
            let known = is_integer(value)
                && value
                    .as_i64()
                    .or_else(|| value.as_f64().map(|number| number as i64))
                    .and_then(|number| i32::try_from(number).ok())
                    .is_some_and(|number| descriptor.contains(number));
            if known {
                Ok(())
            } else {
                Err(invalid(name, "enum value", suffix))
            }
        }
        ValueKind::Message(descriptor) => {
            check_message(descriptor(), value).map_err(|error| format!("{name}.{error}"))
        }
    }
}

fn invalid(name: &str, expected: &str, suffix: &str) -> String {
    format!("{name}: {expected}{suffix} expected")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::EnumDescriptor;
    use serde_json::json;

    static SCOPE: EnumDescriptor = EnumDescriptor {
        full_name: "Scope",
        values: &[("UNKNOWN", 0), ("PUBLIC", 1), ("PRIVATE", 2)],
    };

    static LEAF: MessageDescriptor = MessageDescriptor {
        full_name: "Leaf",
        fields: &[
            FieldDescriptor::new("scope", 1, FieldKind::Singular(ValueKind::Enum(&SCOPE))),
            FieldDescriptor::new(
                "maxAgeNs",
                2,
                FieldKind::Singular(ValueKind::Scalar(ScalarKind::Int64)),
            ),
        ],
    };

    fn leaf() -> &'static MessageDescriptor {
        &LEAF
    }

    static ID: [FieldDescriptor; 2] = [
        FieldDescriptor::new(
            "responseName",
            1,
            FieldKind::Singular(ValueKind::Scalar(ScalarKind::String)),
        ),
        FieldDescriptor::new(
            "index",
            2,
            FieldKind::Singular(ValueKind::Scalar(ScalarKind::Uint32)),
        ),
    ];

    static ROOT: MessageDescriptor = MessageDescriptor {
        full_name: "Root",
        fields: &[
            FieldDescriptor::new("id", 0, FieldKind::Oneof(&ID)),
            FieldDescriptor::new("leaf", 3, FieldKind::Singular(ValueKind::Message(leaf))),
            FieldDescriptor::new(
                "counts",
                4,
                FieldKind::Repeated(ValueKind::Scalar(ScalarKind::Sint64)),
            ),
            FieldDescriptor::new(
                "vars",
                5,
                FieldKind::Map(ScalarKind::String, ValueKind::Scalar(ScalarKind::String)),
            ),
            FieldDescriptor::new("leaves", 6, FieldKind::Repeated(ValueKind::Message(leaf))),
            FieldDescriptor::new(
                "secure",
                7,
                FieldKind::Singular(ValueKind::Scalar(ScalarKind::Bool)),
            ),
            FieldDescriptor::new(
                "weight",
                8,
                FieldKind::Singular(ValueKind::Scalar(ScalarKind::Double)),
            ),
        ],
    };

    fn verify(value: Value) -> Result<(), String> {
        verify_message(&ROOT, &value).map_err(|err| err.to_string())
    }

    #[test]
    fn accepts_well_formed_objects() {
        verify(json!({})).unwrap();
        verify(json!({
            "responseName": "user",
            "leaf": {"scope": 1, "maxAgeNs": {"low": 5, "high": 0}},
            "counts": [1, -2, 3],
            "vars": {"a": "1"},
            "leaves": [{"maxAgeNs": 9_007_199_254_740_993u64}],
            "secure": false,
            "weight": 0.5,
            "unknownProperty": [1, 2],
        }))
        .unwrap();
        // Nulls count as absent.
        verify(json!({"responseName": null, "index": 4})).unwrap();
    }

    #[test]
    fn scalar_mismatches() {
        assert_eq!(verify(json!([])).unwrap_err(), "object expected");
        assert_eq!(
            verify(json!({"responseName": 5})).unwrap_err(),
            "responseName: string expected"
        );
        assert_eq!(
            verify(json!({"index": 1.5})).unwrap_err(),
            "index: integer expected"
        );
        assert_eq!(
            verify(json!({"secure": "yes"})).unwrap_err(),
            "secure: boolean expected"
        );
        assert_eq!(
            verify(json!({"weight": "0.5"})).unwrap_err(),
            "weight: number expected"
        );
    }

    #[test]
    fn oneof_multiple_values() {
        assert_eq!(
            verify(json!({"responseName": "user", "index": 3})).unwrap_err(),
            "id: multiple values"
        );
    }

    #[test]
    fn nested_paths() {
        assert_eq!(
            verify(json!({"leaf": {"scope": 7}})).unwrap_err(),
            "leaf.scope: enum value expected"
        );
        assert_eq!(
            verify(json!({"leaf": {"scope": "PUBLIC"}})).unwrap_err(),
            "leaf.scope: enum value expected"
        );
        assert_eq!(
            verify(json!({"leaf": "nope"})).unwrap_err(),
            "leaf.object expected"
        );
        assert_eq!(
            verify(json!({"leaves": [{}, {"maxAgeNs": "5"}]})).unwrap_err(),
            "leaves.maxAgeNs: integer|Long expected"
        );
    }

    #[test]
    fn collection_shapes() {
        assert_eq!(
            verify(json!({"counts": 5})).unwrap_err(),
            "counts: array expected"
        );
        assert_eq!(
            verify(json!({"counts": [1, "2"]})).unwrap_err(),
            "counts: integer|Long[] expected"
        );
        assert_eq!(
            verify(json!({"vars": []})).unwrap_err(),
            "vars: object expected"
        );
        assert_eq!(
            verify(json!({"vars": {"a": 1}})).unwrap_err(),
            "vars: string{k:string} expected"
        );
    }
}
