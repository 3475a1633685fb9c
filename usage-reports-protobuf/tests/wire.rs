// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use usage_proto_codec::DecodeErrorKind;
use usage_reports_protobuf::trace::query_plan_node::{
    self, response_path_element, FetchNode, FlattenNode, ResponsePathElement, SequenceNode,
};
use usage_reports_protobuf::trace::{node, Details, Node, QueryPlanNode};
use usage_reports_protobuf::*;

#[test]
fn minimal_trace() {
    let trace = Trace {
        duration_ns: Some(42),
        client_name: Some("test".into()),
        ..Default::default()
    };
    let bytes = trace.encode_to_vec();
    assert_eq!(bytes, [0x3A, 0x04, b't', b'e', b's', b't', 0x58, 0x2A]);

    let decoded = Trace::decode(&bytes).unwrap();
    assert_eq!(decoded, trace);
    assert_eq!(decoded.duration_ns(), 42);
    assert_eq!(decoded.client_name(), "test");
    // Absent fields read back as their schema defaults.
    assert_eq!(decoded.signature(), "");
    assert_eq!(decoded.root(), None);
    assert!(!decoded.full_query_cache_hit());
    assert_eq!(decoded.field_execution_weight(), 0.0);
    assert_eq!(decoded.cache_policy().map(|policy| policy.scope()), None);
    assert!(decoded.details().is_none());
    // Presence is still visible on the fields themselves.
    assert_eq!(decoded.signature, None);
    assert_eq!(decoded.full_query_cache_hit, None);
}

#[test]
fn nested_query_plan() {
    let plan = QueryPlanNode {
        node: Some(query_plan_node::Node::Sequence(SequenceNode {
            nodes: vec![QueryPlanNode {
                node: Some(query_plan_node::Node::Fetch(FetchNode {
                    service_name: Some("accounts".into()),
                    trace: Some(Box::new(Trace {
                        duration_ns: Some(7),
                        ..Default::default()
                    })),
                    ..Default::default()
                })),
            }],
        })),
    };
    let decoded = QueryPlanNode::decode(&plan.encode_to_vec()).unwrap();
    let Some(query_plan_node::Node::Sequence(sequence)) = &decoded.node else {
        panic!("expected a sequence, got {decoded:?}");
    };
    let Some(query_plan_node::Node::Fetch(fetch)) = &sequence.nodes[0].node else {
        panic!("expected a fetch, got {:?}", sequence.nodes[0]);
    };
    assert_eq!(fetch.service_name.as_deref(), Some("accounts"));
    assert_eq!(fetch.trace.as_ref().unwrap().duration_ns, Some(7));
    assert_eq!(decoded, plan);
}

#[test]
fn response_path_oneof() {
    let flatten = FlattenNode {
        response_path: vec![
            ResponsePathElement {
                id: Some(response_path_element::Id::FieldName("user".into())),
            },
            ResponsePathElement {
                id: Some(response_path_element::Id::Index(3)),
            },
        ],
        node: None,
    };
    let decoded = FlattenNode::decode(&flatten.encode_to_vec()).unwrap();
    assert_eq!(decoded, flatten);

    let object = decoded.to_object(&ConversionOptions {
        oneofs: true,
        ..Default::default()
    });
    assert_eq!(object["responsePath"][0]["id"], "fieldName");
    assert_eq!(object["responsePath"][0]["fieldName"], "user");
    assert_eq!(object["responsePath"][1]["id"], "index");
    assert_eq!(object["responsePath"][1]["index"], 3);
}

#[test]
fn counts_keep_64_bits() {
    let stats = QueryLatencyStats {
        request_count: Some(9_007_199_254_740_993),
        ..Default::default()
    };
    let decoded = QueryLatencyStats::decode(&stats.encode_to_vec()).unwrap();
    assert_eq!(decoded.request_count, Some(9_007_199_254_740_993));
    assert_eq!(decoded.to_json()["requestCount"], "9007199254740993");
    assert_eq!(
        decoded.to_object(&Default::default())["requestCount"],
        serde_json::json!(9_007_199_254_740_993u64)
    );
}

#[test]
fn unknown_fields_are_ignored() {
    let mut bytes = vec![0x3A, 0x01, b'c'];
    bytes.extend([0x98, 0x06, 0x05]); // field 99, varint
    bytes.extend([0xA5, 0x06, 1, 2, 3, 4]); // field 100, fixed32
    bytes.extend([0xAA, 0x06, 0x02, 0xFF, 0xFF]); // field 101, length-delimited
    bytes.extend([0xB3, 0x06, 0x08, 0x01, 0xB4, 0x06]); // field 102, group
    bytes.extend([0x58, 0x2A]);
    let trace = Trace::decode(&bytes).unwrap();
    assert_eq!(
        trace,
        Trace {
            client_name: Some("c".into()),
            duration_ns: Some(42),
            ..Default::default()
        }
    );
}

#[test]
fn packed_and_unpacked_histograms_agree() {
    let packed = [0x4A, 0x03, 0x00, 0x03, 0x08];
    let unpacked = [0x48, 0x00, 0x48, 0x03, 0x48, 0x08];
    let packed = FieldStat::decode(&packed).unwrap();
    assert_eq!(packed.latency_count, [0, -2, 4]);
    assert_eq!(FieldStat::decode(&unpacked).unwrap(), packed);
}

#[test]
fn map_entries_roundtrip() {
    let details = Details {
        operation_name: Some("Op".into()),
        variables_json: IndexMap::from([("a".into(), "1".into()), ("b".into(), "2".into())]),
    };
    let bytes = details.encode_to_vec();
    assert_eq!(Details::decode(&bytes).unwrap(), details);

    // A second occurrence of a key replaces the first.
    let update = Details {
        operation_name: None,
        variables_json: IndexMap::from([("a".into(), "3".into())]),
    };
    let mut merged = bytes.clone();
    merged.extend(update.encode_to_vec());
    let decoded = Details::decode(&merged).unwrap();
    assert_eq!(decoded.variables_json.len(), 2);
    assert_eq!(decoded.variables_json["a"], "3");
    assert_eq!(decoded.variables_json["b"], "2");
    assert_eq!(decoded.operation_name.as_deref(), Some("Op"));
}

#[test]
fn oneof_last_occurrence_wins() {
    // responseName "a" followed by index 1.
    let bytes = [0x0A, 0x01, b'a', 0x10, 0x01];
    let decoded = Node::decode(&bytes).unwrap();
    assert_eq!(decoded.id, Some(node::Id::Index(1)));
}

#[test]
fn errors_carry_their_path() {
    // root declares 5 bytes, 3 follow.
    let err = Trace::decode(&[0x72, 0x05, 0x1A, 0x01, b'T']).unwrap_err();
    assert_eq!(
        err.to_string(),
        "failed to decode protobuf message: Trace.root: length-delimited field declares 5 bytes but only 3 remaining"
    );

    // root.child[0].type is not UTF-8.
    let err = Trace::decode(&[0x72, 0x05, 0x62, 0x03, 0x1A, 0x01, 0xFF]).unwrap_err();
    assert_eq!(err.kind(), &DecodeErrorKind::InvalidUtf8);
    let path: Vec<_> = err.path().iter().copied().collect();
    assert_eq!(
        path,
        [
            ("Trace", "root"),
            ("Trace.Node", "child"),
            ("Trace.Node", "type")
        ]
    );

    let err = Trace::decode(&[0x58]).unwrap_err();
    let path: Vec<_> = err.path().iter().copied().collect();
    assert_eq!(path, [("Trace", "durationNs")]);
}

#[test]
fn length_delimited_stream() {
    let reports: Vec<_> = (0..3)
        .map(|count| Report {
            operation_count: Some(count),
            ..Default::default()
        })
        .collect();
    let mut stream = Vec::new();
    for report in &reports {
        report.encode_length_delimited(&mut stream).unwrap();
    }

    let mut rest = stream.as_slice();
    let mut decoded = Vec::new();
    while !rest.is_empty() {
        let report = Report::decode_length_delimited(rest).unwrap();
        let len = report.encoded_len();
        rest = &rest[1 + len..];
        decoded.push(report);
    }
    assert_eq!(decoded, reports);
}

#[test]
fn encoded_traces_are_forwarded_untouched() {
    // Not a valid trace, but forwarded without being parsed.
    let opaque = bytes::Bytes::from_static(&[0xFF, 0xFF]);
    let mut report = Report::default();
    report
        .traces_and_stats_mut("{a}")
        .push_encoded_trace(opaque);
    let bytes = report.encode_to_vec();
    assert!(bytes.windows(3).any(|window| window == [0x02, 0xFF, 0xFF]));
    assert!(Report::decode(&bytes).is_err());
}
