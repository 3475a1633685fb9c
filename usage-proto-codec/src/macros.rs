// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

/// Declares a message: the struct, its [`Message`](crate::Message)
/// implementation and its [`MessageDescriptor`](crate::MessageDescriptor),
/// all from one field list.
///
/// Each field is annotated with its number, its plain-object name and the
/// [`FieldCodec`](crate::FieldCodec) that lays it out. Oneof groups use
/// `oneof` in place of a number. Fields must be listed in ascending
/// field-number order, which is the order they are encoded in.
///
/// Every field also gets an accessor of the same name. Unset scalars read
/// as their schema default (`0`, `""`, `false` or the first enum value),
/// messages as `None` and lists or maps as empty.
///
/// ```
/// use usage_proto_codec::field::{Repeated, Str, Uint64};
/// use usage_proto_codec::{scalar, Message};
///
/// usage_proto_codec::message! {
///     /// A histogram with a label.
///     pub struct Histogram = "Histogram" {
///         #[field(1, "label", Str)]
///         pub label: Option<String>,
///         #[field(2, "total", Uint64)]
///         pub total: Option<u64>,
///         #[field(3, "buckets", Repeated<scalar::Sint64>)]
///         pub buckets: Vec<i64>,
///     }
/// }
///
/// let histogram = Histogram {
///     label: Some("latency".into()),
///     total: Some(0),
///     buckets: vec![-1, 4],
/// };
/// let bytes = histogram.encode_to_vec();
/// assert_eq!(Histogram::decode(&bytes).unwrap(), histogram);
/// assert_eq!(Histogram::default().label(), "");
/// assert_eq!(Histogram::descriptor().field(3).unwrap().name, "buckets");
/// ```
#[macro_export]
macro_rules! message {
    (
        $(#[doc = $doc:expr])*
        $vis:vis struct $name:ident = $full_name:literal {
            $(
                $(#[doc = $field_doc:expr])*
                #[field($number:tt, $json:literal, $codec:ty)]
                $field_vis:vis $field:ident: $ty:ty,
            )*
        }
    ) => {
        $(#[doc = $doc])*
        #[derive(Clone, Debug, Default, PartialEq)]
        $vis struct $name {
            $(
                $(#[doc = $field_doc])*
                $field_vis $field: $ty,
            )*
        }

        impl $crate::Message for $name {
            fn descriptor() -> &'static $crate::MessageDescriptor {
                static DESCRIPTOR: $crate::MessageDescriptor = $crate::MessageDescriptor {
                    full_name: $full_name,
                    fields: &[
                        $(
                            $crate::FieldDescriptor::new(
                                $json,
                                $crate::__field_number!($number),
                                <$codec as $crate::FieldCodec>::KIND,
                            ),
                        )*
                    ],
                };
                &DESCRIPTOR
            }

            fn encoded_len(&self) -> usize {
                0 $(
                    + <$codec as $crate::FieldCodec>::encoded_len(
                        $crate::__field_number!($number),
                        &self.$field,
                    )
                )*
            }

            #[allow(unused_variables)]
            fn encode_raw<B: $crate::__private::BufMut>(&self, buf: &mut B) {
                $(
                    <$codec as $crate::FieldCodec>::encode(
                        $crate::__field_number!($number),
                        &self.$field,
                        buf,
                    );
                )*
            }

            fn merge_field(
                &mut self,
                number: u32,
                wire_type: $crate::WireType,
                reader: &mut $crate::Reader<'_>,
                ctx: $crate::DecodeContext,
            ) -> ::core::result::Result<(), $crate::DecodeError> {
                $(
                    if <$codec as $crate::FieldCodec>::accepts(
                        $crate::__field_number!($number),
                        number,
                    ) {
                        return <$codec as $crate::FieldCodec>::merge(
                            $full_name,
                            $json,
                            number,
                            wire_type,
                            &mut self.$field,
                            reader,
                            ctx,
                        );
                    }
                )*
                $crate::__private::tracing::trace!(
                    message_type = $full_name,
                    field = number,
                    ?wire_type,
                    "skipping unknown field"
                );
                reader.skip_field(number, wire_type, ctx)
            }

            #[allow(unused_variables)]
            fn write_object(
                &self,
                options: &$crate::ConversionOptions,
                object: &mut $crate::field::JsonObject,
            ) {
                $(
                    <$codec as $crate::FieldCodec>::to_json($json, &self.$field, options, object);
                )*
            }

            #[allow(unused_variables, unused_mut)]
            fn read_object(
                object: &$crate::field::JsonObject,
            ) -> ::core::result::Result<Self, $crate::ConversionError> {
                let mut message = <Self as ::core::default::Default>::default();
                $(
                    <$codec as $crate::FieldCodec>::from_json(
                        $full_name,
                        $json,
                        object,
                        &mut message.$field,
                    )?;
                )*
                ::core::result::Result::Ok(message)
            }
        }

        impl $name {
            $(
                #[doc = concat!("Returns `", $json, "`, or its schema default when unset.")]
                #[inline]
                $field_vis fn $field(&self) -> <$codec as $crate::FieldCodec>::Get<'_> {
                    <$codec as $crate::FieldCodec>::get(&self.$field)
                }
            )*
        }
    };
}

#[doc(hidden)]
#[macro_export]
macro_rules! __field_number {
    (oneof) => {
        0
    };
    ($number:literal) => {
        $number
    };
}

#[cfg(test)]
mod tests {
    use crate::field::{Enumeration, Int64, Map, Msg, OneofField, Repeated, Str, Uint64};
    use crate::{
        scalar, ConversionError, ConversionOptions, DecodeErrorKind, EnumConversion,
        LongConversion, Message, MessageValue, WireType,
    };
    use indexmap::IndexMap;
    use serde_json::json;

    crate::enumeration! {
        pub enum Scope = "Sample.Scope" {
            Unknown = 0 => "UNKNOWN",
            Public = 1 => "PUBLIC",
            Private = 2 => "PRIVATE",
        }
    }

    crate::oneof! {
        pub enum Id {
            #[field(1, "responseName", scalar::Str)]
            ResponseName(String),
            #[field(2, "index", scalar::Uint32)]
            Index(u32),
        }
    }

    crate::message! {
        pub struct Policy = "Sample.Policy" {
            #[field(1, "scope", Enumeration<Scope>)]
            pub scope: Option<i32>,
            #[field(2, "maxAgeNs", Int64)]
            pub max_age_ns: Option<i64>,
        }
    }

    crate::message! {
        /// Exercises every field shape.
        pub struct Sample = "Sample" {
            #[field(oneof, "id", OneofField<Id>)]
            pub id: Option<Id>,
            #[field(3, "name", Str)]
            pub name: Option<String>,
            #[field(4, "count", Uint64)]
            pub count: Option<u64>,
            #[field(5, "policy", Msg<Policy>)]
            pub policy: Option<Policy>,
            #[field(6, "buckets", Repeated<scalar::Sint64>)]
            pub buckets: Vec<i64>,
            #[field(7, "labels", Map<scalar::Str>)]
            pub labels: IndexMap<String, String>,
            #[field(8, "children", Repeated<MessageValue<Sample>>)]
            pub children: Vec<Sample>,
        }
    }

    fn sample() -> Sample {
        Sample {
            id: Some(Id::Index(3)),
            name: Some(String::new()),
            count: Some(9_007_199_254_740_993),
            policy: Some(Policy {
                scope: Some(Scope::Private as i32),
                max_age_ns: Some(-5),
            }),
            buckets: vec![0, -1, 1 << 40],
            labels: IndexMap::from([("a".into(), "1".into()), ("b".into(), "2".into())]),
            children: vec![Sample {
                id: Some(Id::ResponseName("user".into())),
                ..Default::default()
            }],
        }
    }

    #[test]
    fn descriptor_mirrors_declaration() {
        let descriptor = Sample::descriptor();
        assert_eq!(descriptor.full_name, "Sample");
        assert_eq!(descriptor.fields.len(), 7);
        assert_eq!(descriptor.fields[0].name, "id");
        assert_eq!(descriptor.fields[0].number, 0);
        assert_eq!(descriptor.field(2).unwrap().name, "index");
        assert_eq!(descriptor.field_by_name("labels").unwrap().number, 7);
        assert_eq!(
            descriptor.field(6).unwrap().wire_type(),
            Some(WireType::Varint)
        );
        assert!(descriptor.field(9).is_none());
        assert_eq!(descriptor.oneofs().count(), 1);
    }

    #[test]
    fn roundtrip() {
        let sample = sample();
        let bytes = sample.encode_to_vec();
        assert_eq!(bytes.len(), sample.encoded_len());
        assert_eq!(Sample::decode(&bytes).unwrap(), sample);
    }

    #[test]
    fn explicit_zero_is_written() {
        let sample = Sample {
            count: Some(0),
            ..Default::default()
        };
        assert_eq!(sample.encode_to_vec(), [0x20, 0x00]);
        assert_eq!(Sample::default().encode_to_vec(), [] as [u8; 0]);
    }

    #[test]
    fn fields_in_ascending_order() {
        let sample = Sample {
            buckets: vec![1],
            name: Some("n".into()),
            id: Some(Id::Index(1)),
            ..Default::default()
        };
        // index (2), name (3), packed buckets (6).
        assert_eq!(
            sample.encode_to_vec(),
            [0x10, 0x01, 0x1A, 0x01, b'n', 0x32, 0x01, 0x02]
        );
    }

    #[test]
    fn unknown_fields_are_skipped() {
        let mut bytes = vec![0xF8, 0x01, 0x2A]; // field 31, varint
        bytes.extend([0x1A, 0x02, b'h', b'i']);
        bytes.extend([0x99, 0x01, 0, 0, 0, 0, 0, 0, 0, 0]); // field 19, fixed64
        let sample = Sample::decode(&bytes).unwrap();
        assert_eq!(sample.name.as_deref(), Some("hi"));
    }

    #[test]
    fn oneof_last_member_wins() {
        // responseName then index.
        let bytes = [0x0A, 0x01, b'a', 0x10, 0x07];
        assert_eq!(Sample::decode(&bytes).unwrap().id, Some(Id::Index(7)));
        // index then responseName.
        let bytes = [0x10, 0x07, 0x0A, 0x01, b'a'];
        assert_eq!(
            Sample::decode(&bytes).unwrap().id,
            Some(Id::ResponseName("a".into()))
        );
    }

    #[test]
    fn packed_and_unpacked_agree() {
        let packed = [0x32, 0x03, 0x02, 0x01, 0x04];
        let unpacked = [0x30, 0x02, 0x30, 0x01, 0x30, 0x04];
        let expected = vec![1, -1, 2];
        assert_eq!(Sample::decode(&packed).unwrap().buckets, expected);
        assert_eq!(Sample::decode(&unpacked).unwrap().buckets, expected);
    }

    #[test]
    fn map_entries() {
        // {"a": "1"}, {"a": "2"}, then an entry with only a value.
        let bytes = [
            0x3A, 0x06, 0x0A, 0x01, b'a', 0x12, 0x01, b'1', //
            0x3A, 0x06, 0x0A, 0x01, b'a', 0x12, 0x01, b'2', //
            0x3A, 0x03, 0x12, 0x01, b'3',
        ];
        let sample = Sample::decode(&bytes).unwrap();
        assert_eq!(sample.labels.len(), 2);
        assert_eq!(sample.labels["a"], "2");
        assert_eq!(sample.labels[""], "3");
    }

    #[test]
    fn wrong_wire_type_reports_path() {
        // name (3) sent as a varint.
        let err = Sample::decode(&[0x18, 0x01]).unwrap_err();
        assert_eq!(
            err.kind(),
            &DecodeErrorKind::UnexpectedWireType {
                expected: WireType::LengthDelimited,
                actual: WireType::Varint,
            }
        );
        assert_eq!(
            err.to_string(),
            "failed to decode protobuf message: Sample.name: invalid wire type: Varint (expected LengthDelimited)"
        );
    }

    #[test]
    fn nested_error_path() {
        let mut bytes = vec![0x42, 0x03];
        bytes.extend([0x1A, 0x05, b'x']); // child.name overruns
        let err = Sample::decode(&bytes).unwrap_err();
        let path: Vec<_> = err.path().iter().copied().collect();
        assert_eq!(path, [("Sample", "children"), ("Sample", "name")]);
        assert!(matches!(err.kind(), DecodeErrorKind::LengthOverrun { .. }));
    }

    #[test]
    fn recursion_limit() {
        let mut sample = Sample::default();
        for _ in 0..5 {
            sample = Sample {
                children: vec![sample],
                ..Default::default()
            };
        }
        let bytes = sample.encode_to_vec();
        let options = crate::DecodeOptions { recursion_limit: 4 };
        let err = Sample::decode_with_options(&bytes, &options).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::RecursionLimitReached);
        let options = crate::DecodeOptions { recursion_limit: 5 };
        assert_eq!(Sample::decode_with_options(&bytes, &options).unwrap(), sample);
    }

    #[test]
    fn framed_decodes_honor_the_recursion_limit() {
        let mut sample = Sample::default();
        for _ in 0..5 {
            sample = Sample {
                children: vec![sample],
                ..Default::default()
            };
        }
        let framed = sample.encode_length_delimited_to_vec();
        let body = sample.encode_to_vec();
        let shallow = crate::DecodeOptions { recursion_limit: 4 };
        let err = Sample::decode_length_delimited_with_options(&framed, &shallow).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::RecursionLimitReached);
        let err = Sample::decode_with_length_and_options(&body, body.len(), &shallow).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::RecursionLimitReached);

        let deep = crate::DecodeOptions { recursion_limit: 5 };
        assert_eq!(
            Sample::decode_length_delimited_with_options(&framed, &deep).unwrap(),
            sample
        );
        assert_eq!(
            Sample::decode_with_length_and_options(&body, body.len(), &deep).unwrap(),
            sample
        );
    }

    #[test]
    fn accessors_fall_back_to_defaults() {
        let empty = Sample::default();
        assert_eq!(empty.name(), "");
        assert_eq!(empty.count(), 0);
        assert_eq!(empty.policy(), None);
        assert_eq!(empty.id(), None);
        assert!(empty.buckets().is_empty());
        assert!(empty.labels().is_empty());

        let full = sample();
        assert_eq!(full.name(), "");
        assert_eq!(full.count(), 9_007_199_254_740_993);
        assert_eq!(full.policy().map(|policy| policy.scope()), Some(Scope::Private));
        assert_eq!(full.policy().map(|policy| policy.max_age_ns()), Some(-5));
        assert_eq!(full.id(), Some(&Id::Index(3)));
        assert_eq!(full.buckets(), [0, -1, 1 << 40]);
        assert_eq!(full.labels()["b"], "2");

        // Values outside the enum read as its first value.
        let unknown = Policy {
            scope: Some(9),
            max_age_ns: None,
        };
        assert_eq!(unknown.scope(), Scope::Unknown);
        assert_eq!(unknown.max_age_ns(), 0);
    }

    #[test]
    fn length_delimited_framing() {
        let sample = sample();
        let mut bytes = sample.encode_length_delimited_to_vec();
        bytes.extend_from_slice(b"trailing");
        assert_eq!(Sample::decode_length_delimited(&bytes).unwrap(), sample);

        let body = sample.encode_to_vec();
        let mut padded = body.clone();
        padded.extend_from_slice(&[0xFF; 3]);
        assert_eq!(Sample::decode_with_length(&padded, body.len()).unwrap(), sample);
        let err = Sample::decode_with_length(&body, body.len() + 1).unwrap_err();
        assert!(matches!(err.kind(), DecodeErrorKind::LengthOverrun { .. }));
    }

    #[test]
    fn encode_checks_capacity() {
        let sample = sample();
        let mut small = [0u8; 4];
        let err = sample.encode(&mut &mut small[..]).unwrap_err();
        assert_eq!(err.required_capacity(), sample.encoded_len());
        assert_eq!(err.remaining(), 4);
        assert_eq!(small, [0; 4]);

        let mut buf = Vec::new();
        sample.encode(&mut buf).unwrap();
        assert_eq!(buf, sample.encode_to_vec());
    }

    #[test]
    fn to_object_defaults() {
        let object = Sample::default().to_object(&ConversionOptions {
            defaults: true,
            ..Default::default()
        });
        assert_eq!(
            object,
            json!({
                "name": "",
                "count": 0,
                "policy": null,
                "buckets": [],
                "labels": {},
                "children": [],
            })
        );
        assert_eq!(Sample::default().to_object(&Default::default()), json!({}));
    }

    #[test]
    fn to_json_preset() {
        let object = sample().to_json();
        assert_eq!(object["count"], json!("9007199254740993"));
        assert_eq!(object["policy"], json!({"scope": "PRIVATE", "maxAgeNs": "-5"}));
        assert_eq!(object["index"], json!(3));
        assert_eq!(object["buckets"], json!(["0", "-1", "1099511627776"]));
        assert_eq!(object["children"][0], json!({"responseName": "user"}));
        assert!(object.get("id").is_none());
    }

    #[test]
    fn oneof_discriminator() {
        let options = ConversionOptions {
            oneofs: true,
            enums: EnumConversion::Integer,
            longs: LongConversion::Integer,
            ..Default::default()
        };
        let object = sample().to_object(&options);
        assert_eq!(object["id"], json!("index"));
        assert_eq!(object["count"], json!(9_007_199_254_740_993u64));
        assert_eq!(object["policy"]["scope"], json!(2));
    }

    #[test]
    fn from_object_inverts_to_object() {
        let sample = sample();
        for options in [ConversionOptions::default(), ConversionOptions::JSON] {
            let object = sample.to_object(&options);
            assert_eq!(Sample::from_object(&object).unwrap(), sample);
        }
    }

    #[test]
    fn from_object_with_two_oneof_members() {
        let sample = Sample::from_object(&json!({"responseName": "a", "index": 2})).unwrap();
        assert_eq!(sample.id, Some(Id::Index(2)));
        assert!(Sample::verify(&json!({"responseName": "a", "index": 2})).is_err());
    }

    #[test]
    fn from_object_errors() {
        let err = Sample::from_object(&json!({"policy": {"scope": "PROTECTED"}})).unwrap_err();
        assert_eq!(
            err,
            ConversionError::new("enum value expected")
                .push("Sample.Policy", "scope")
                .push("Sample", "policy")
        );
        assert_eq!(
            err.to_string(),
            "failed to convert plain object: Sample.policy: Sample.Policy.scope: enum value expected"
        );
        let err = Sample::from_object(&json!({"buckets": 1})).unwrap_err();
        assert_eq!(err.reason(), "array expected");
        let err = Sample::from_object(&json!("nope")).unwrap_err();
        assert_eq!(err.reason(), "object expected");
    }
}
