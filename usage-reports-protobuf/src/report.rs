// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use crate::{ContextualizedStats, ReferencedFieldsForType, Timestamp, Trace};
use bytes::Bytes;
use indexmap::IndexMap;
use usage_proto_codec::field::{
    Bool, MapMsg, Msg, RepeatedMaybeEncoded, RepeatedMsg, Str, Uint64,
};
use usage_proto_codec::{message, MaybeEncoded};

message! {
    /// Describes the process that sent a report.
    pub struct ReportHeader = "ReportHeader" {
        #[field(5, "hostname", Str)]
        pub hostname: Option<String>,
        #[field(6, "agentVersion", Str)]
        pub agent_version: Option<String>,
        #[field(7, "serviceVersion", Str)]
        pub service_version: Option<String>,
        #[field(8, "runtimeVersion", Str)]
        pub runtime_version: Option<String>,
        #[field(9, "uname", Str)]
        pub uname: Option<String>,
        /// The hex SHA-256 of the schema the operations ran against.
        #[field(11, "executableSchemaId", Str)]
        pub executable_schema_id: Option<String>,
        /// The graph and variant, as `graph@variant`.
        #[field(12, "graphRef", Str)]
        pub graph_ref: Option<String>,
    }
}

message! {
    /// Everything reported for one operation signature.
    ///
    /// Traces can be kept as the bytes they were received or encoded as,
    /// which are then written out unchanged.
    pub struct TracesAndStats = "TracesAndStats" {
        #[field(1, "trace", RepeatedMaybeEncoded<Trace>)]
        pub trace: Vec<MaybeEncoded<Trace>>,
        #[field(2, "statsWithContext", RepeatedMsg<ContextualizedStats>)]
        pub stats_with_context: Vec<ContextualizedStats>,
        /// Traces that were also aggregated into `stats_with_context`.
        #[field(3, "internalTracesContributingToStats", RepeatedMaybeEncoded<Trace>)]
        pub internal_traces_contributing_to_stats: Vec<MaybeEncoded<Trace>>,
        /// Keyed by type name.
        #[field(4, "referencedFieldsByType", MapMsg<ReferencedFieldsForType>)]
        pub referenced_fields_by_type: IndexMap<String, ReferencedFieldsForType>,
    }
}

message! {
    pub struct OperationCountByType = "Report.OperationCountByType" {
        #[field(1, "type", Str)]
        pub r#type: Option<String>,
        #[field(2, "subtype", Str)]
        pub subtype: Option<String>,
        #[field(3, "operationCount", Uint64)]
        pub operation_count: Option<u64>,
    }
}

message! {
    /// The unit of reporting: everything observed over one interval.
    pub struct Report = "Report" {
        #[field(1, "header", Msg<ReportHeader>)]
        pub header: Option<ReportHeader>,
        /// The end of the reporting interval.
        #[field(2, "endTime", Msg<Timestamp>)]
        pub end_time: Option<Timestamp>,
        /// Keyed by operation signature, e.g. `# OperationName\nquery { ... }`.
        #[field(5, "tracesPerQuery", MapMsg<TracesAndStats>)]
        pub traces_per_query: IndexMap<String, TracesAndStats>,
        /// The total number of operations processed in the interval.
        #[field(6, "operationCount", Uint64)]
        pub operation_count: Option<u64>,
        /// Set when traces have already been aggregated into stats by the
        /// sender.
        #[field(7, "tracesPreAggregated", Bool)]
        pub traces_pre_aggregated: Option<bool>,
        #[field(8, "operationCountByType", RepeatedMsg<OperationCountByType>)]
        pub operation_count_by_type: Vec<OperationCountByType>,
    }
}

impl TracesAndStats {
    pub fn push_trace(&mut self, trace: Trace) {
        self.trace.push(trace.into());
    }

    /// Adds a trace that is already encoded, without decoding it.
    pub fn push_encoded_trace(&mut self, bytes: Bytes) {
        self.trace.push(MaybeEncoded::encoded(bytes));
    }
}

impl Report {
    /// The entry for `signature`, created on first use.
    pub fn traces_and_stats_mut(&mut self, signature: &str) -> &mut TracesAndStats {
        self.traces_per_query
            .entry(signature.to_owned())
            .or_default()
    }

    /// The number of traces across all signatures.
    pub fn trace_count(&self) -> usize {
        self.traces_per_query
            .values()
            .map(|entry| entry.trace.len())
            .sum()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prost_impls;
    use crate::{QueryLatencyStats, StatsContext};
    use prost::Message as _;
    use usage_proto_codec::Message;

    fn trace(duration_ns: u64) -> Trace {
        Trace {
            duration_ns: Some(duration_ns),
            signature: Some("{me{id}}".into()),
            ..Default::default()
        }
    }

    fn report() -> Report {
        let mut report = Report {
            header: Some(ReportHeader {
                hostname: Some("host-1".into()),
                agent_version: Some("usage-reports 1.0.0".into()),
                graph_ref: Some("shop@current".into()),
                ..Default::default()
            }),
            end_time: Some(Timestamp {
                seconds: Some(1_700_000_060),
                nanos: Some(0),
            }),
            operation_count: Some(3),
            operation_count_by_type: vec![OperationCountByType {
                r#type: Some("query".into()),
                subtype: Some(String::new()),
                operation_count: Some(3),
            }],
            ..Default::default()
        };
        let entry = report.traces_and_stats_mut("# Me\n{me{id}}");
        entry.push_trace(trace(10));
        entry.push_encoded_trace(trace(20).encode_to_vec().into());
        entry.stats_with_context.push(ContextualizedStats {
            context: Some(StatsContext {
                client_name: Some("web".into()),
                ..Default::default()
            }),
            query_latency_stats: Some(QueryLatencyStats {
                request_count: Some(3),
                latency_count: vec![-10, 3],
                ..Default::default()
            }),
            ..Default::default()
        });
        entry.referenced_fields_by_type.insert(
            "Query".into(),
            ReferencedFieldsForType {
                field_names: vec!["me".into()],
                is_interface: Some(false),
            },
        );
        report
    }

    #[test]
    fn matches_prost() {
        let report = report();
        let bytes = report.encode_to_vec();
        assert_eq!(bytes.len(), report.encoded_len());
        let expected = prost_impls::Report::from(&report);
        assert_eq!(bytes, expected.encode_to_vec());
        assert_eq!(prost_impls::Report::decode(bytes.as_slice()).unwrap(), expected);
    }

    #[test]
    fn encoded_traces_are_written_verbatim() {
        let encoded = trace(20).encode_to_vec();
        let mut entry = TracesAndStats::default();
        entry.push_encoded_trace(encoded.clone().into());
        let bytes = entry.encode_to_vec();
        let mut expected = vec![0x0A, encoded.len() as u8];
        expected.extend_from_slice(&encoded);
        assert_eq!(bytes, expected);

        let mut message_form = TracesAndStats::default();
        message_form.push_trace(trace(20));
        assert_eq!(message_form.encode_to_vec(), bytes);

        // Decoding always yields messages.
        let decoded = TracesAndStats::decode(&bytes).unwrap();
        assert_eq!(decoded.trace, [MaybeEncoded::Message(trace(20))]);
    }

    #[test]
    fn trace_count_spans_signatures() {
        let mut report = report();
        report.traces_and_stats_mut("{b}").push_trace(trace(1));
        assert_eq!(report.trace_count(), 3);
        assert_eq!(report.traces_per_query.len(), 2);
    }
}
