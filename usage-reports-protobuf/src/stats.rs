// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! Aggregated usage: latency histograms and error counts per operation, per
//! client and per schema field.

use indexmap::IndexMap;
use usage_proto_codec::field::{Bool, MapMsg, Msg, Repeated, Str, Uint64};
use usage_proto_codec::{message, scalar};

message! {
    /// Error counts for one path of the response, with its sub-paths as
    /// children.
    pub struct PathErrorStats = "PathErrorStats" {
        #[field(1, "children", MapMsg<PathErrorStats>)]
        pub children: IndexMap<String, PathErrorStats>,
        #[field(4, "errorsCount", Uint64)]
        pub errors_count: Option<u64>,
        #[field(5, "requestsWithErrorsCount", Uint64)]
        pub requests_with_errors_count: Option<u64>,
    }
}

message! {
    /// The latency histograms below are in DurationHistogram layout: bucket
    /// counts where a negative value `-n` stands for `n` empty buckets.
    pub struct QueryLatencyStats = "QueryLatencyStats" {
        #[field(2, "requestCount", Uint64)]
        pub request_count: Option<u64>,
        #[field(3, "cacheHits", Uint64)]
        pub cache_hits: Option<u64>,
        #[field(4, "persistedQueryHits", Uint64)]
        pub persisted_query_hits: Option<u64>,
        #[field(5, "persistedQueryMisses", Uint64)]
        pub persisted_query_misses: Option<u64>,
        #[field(7, "rootErrorStats", Msg<PathErrorStats>)]
        pub root_error_stats: Option<PathErrorStats>,
        #[field(8, "requestsWithErrorsCount", Uint64)]
        pub requests_with_errors_count: Option<u64>,
        #[field(11, "registeredOperationCount", Uint64)]
        pub registered_operation_count: Option<u64>,
        #[field(12, "forbiddenOperationCount", Uint64)]
        pub forbidden_operation_count: Option<u64>,
        #[field(13, "latencyCount", Repeated<scalar::Sint64>)]
        pub latency_count: Vec<i64>,
        #[field(14, "cacheLatencyCount", Repeated<scalar::Sint64>)]
        pub cache_latency_count: Vec<i64>,
        #[field(15, "publicCacheTtlCount", Repeated<scalar::Sint64>)]
        pub public_cache_ttl_count: Vec<i64>,
        #[field(16, "privateCacheTtlCount", Repeated<scalar::Sint64>)]
        pub private_cache_ttl_count: Vec<i64>,
        /// Requests that were not sampled for field-level stats.
        #[field(17, "requestsWithoutFieldInstrumentation", Uint64)]
        pub requests_without_field_instrumentation: Option<u64>,
    }
}

message! {
    /// Who sent the operations and what kind they were.
    pub struct StatsContext = "StatsContext" {
        #[field(2, "clientName", Str)]
        pub client_name: Option<String>,
        #[field(3, "clientVersion", Str)]
        pub client_version: Option<String>,
        #[field(4, "operationType", Str)]
        pub operation_type: Option<String>,
        #[field(5, "operationSubtype", Str)]
        pub operation_subtype: Option<String>,
    }
}

message! {
    pub struct ContextualizedQueryLatencyStats = "ContextualizedQueryLatencyStats" {
        #[field(1, "queryLatencyStats", Msg<QueryLatencyStats>)]
        pub query_latency_stats: Option<QueryLatencyStats>,
        #[field(2, "context", Msg<StatsContext>)]
        pub context: Option<StatsContext>,
    }
}

message! {
    pub struct ContextualizedTypeStats = "ContextualizedTypeStats" {
        #[field(1, "context", Msg<StatsContext>)]
        pub context: Option<StatsContext>,
        #[field(2, "perTypeStat", MapMsg<TypeStat>)]
        pub per_type_stat: IndexMap<String, TypeStat>,
    }
}

message! {
    pub struct FieldStat = "FieldStat" {
        /// The field's return type, e.g. `[String!]`.
        #[field(3, "returnType", Str)]
        pub return_type: Option<String>,
        #[field(4, "errorsCount", Uint64)]
        pub errors_count: Option<u64>,
        /// Executions actually seen in sampled traces.
        #[field(5, "observedExecutionCount", Uint64)]
        pub observed_execution_count: Option<u64>,
        #[field(6, "requestsWithErrorsCount", Uint64)]
        pub requests_with_errors_count: Option<u64>,
        /// Weighted by the sampling rate, so this is not necessarily a
        /// whole number of requests.
        #[field(9, "latencyCount", Repeated<scalar::Sint64>)]
        pub latency_count: Vec<i64>,
        /// Executions extrapolated from the sampled ones.
        #[field(10, "estimatedExecutionCount", Uint64)]
        pub estimated_execution_count: Option<u64>,
    }
}

message! {
    pub struct TypeStat = "TypeStat" {
        /// Keyed by field name.
        #[field(3, "perFieldStat", MapMsg<FieldStat>)]
        pub per_field_stat: IndexMap<String, FieldStat>,
    }
}

message! {
    /// The fields of one type that an operation references.
    pub struct ReferencedFieldsForType = "ReferencedFieldsForType" {
        #[field(1, "fieldNames", Repeated<scalar::Str>)]
        pub field_names: Vec<String>,
        #[field(2, "isInterface", Bool)]
        pub is_interface: Option<bool>,
    }
}

message! {
    pub struct ContextualizedStats = "ContextualizedStats" {
        #[field(1, "context", Msg<StatsContext>)]
        pub context: Option<StatsContext>,
        #[field(2, "queryLatencyStats", Msg<QueryLatencyStats>)]
        pub query_latency_stats: Option<QueryLatencyStats>,
        /// Keyed by type name.
        #[field(3, "perTypeStat", MapMsg<TypeStat>)]
        pub per_type_stat: IndexMap<String, TypeStat>,
    }
}

impl PathErrorStats {
    /// The stats of the sub-path `path`, created on first use.
    pub fn child_mut<'a>(&mut self, path: impl IntoIterator<Item = &'a str>) -> &mut Self {
        path.into_iter().fold(self, |stats, segment| {
            stats.children.entry(segment.to_owned()).or_default()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prost_impls;
    use prost::Message as _;
    use usage_proto_codec::Message;

    fn latency_stats(request_count: u64, latency_count: Vec<i64>) -> QueryLatencyStats {
        let mut root_error_stats = PathErrorStats {
            errors_count: Some(1),
            ..Default::default()
        };
        root_error_stats.child_mut(["user", "name"]).errors_count = Some(2);
        QueryLatencyStats {
            request_count: Some(request_count),
            cache_hits: Some(0),
            root_error_stats: Some(root_error_stats),
            cache_latency_count: vec![0, -3, 1],
            latency_count,
            ..Default::default()
        }
    }

    #[test]
    fn child_mut_builds_the_path() {
        let mut stats = PathErrorStats::default();
        stats.child_mut(["a", "b"]).requests_with_errors_count = Some(3);
        stats.child_mut(["a"]).errors_count = Some(1);
        assert_eq!(stats.children.len(), 1);
        let a = &stats.children["a"];
        assert_eq!(a.errors_count, Some(1));
        assert_eq!(a.children["b"].requests_with_errors_count, Some(3));
    }

    #[test]
    fn histograms_match_prost() {
        bolero::check!()
            .with_type::<(u64, Vec<i64>)>()
            .for_each(|(request_count, latency_count)| {
                let stats = latency_stats(*request_count, latency_count.clone());
                let bytes = stats.encode_to_vec();
                let expected = prost_impls::QueryLatencyStats::from(&stats);
                assert_eq!(bytes, expected.encode_to_vec());
                assert_eq!(QueryLatencyStats::decode(&bytes).unwrap(), stats);
            });
    }

    #[test]
    fn histograms_are_packed_zigzag() {
        let stats = QueryLatencyStats {
            latency_count: vec![0, -1, 1, -2],
            ..Default::default()
        };
        assert_eq!(stats.encode_to_vec(), [0x6A, 0x04, 0x00, 0x01, 0x02, 0x03]);
        // Unpacked encodings decode to the same list.
        let unpacked = [0x68, 0x00, 0x68, 0x01, 0x68, 0x02, 0x68, 0x03];
        assert_eq!(QueryLatencyStats::decode(&unpacked).unwrap(), stats);
    }

    #[test]
    fn per_type_stats_match_prost() {
        let stats = ContextualizedStats {
            context: Some(StatsContext {
                client_name: Some("ios".into()),
                client_version: Some("2.1".into()),
                operation_type: Some("query".into()),
                ..Default::default()
            }),
            query_latency_stats: Some(latency_stats(10, vec![5, -2, 5])),
            per_type_stat: IndexMap::from([
                (
                    "Query".into(),
                    TypeStat {
                        per_field_stat: IndexMap::from([(
                            "user".into(),
                            FieldStat {
                                return_type: Some("User".into()),
                                observed_execution_count: Some(10),
                                estimated_execution_count: Some(12),
                                latency_count: vec![-4, 10],
                                ..Default::default()
                            },
                        )]),
                    },
                ),
                (
                    "User".into(),
                    TypeStat {
                        per_field_stat: IndexMap::from([
                            (
                                "name".into(),
                                FieldStat {
                                    return_type: Some("String!".into()),
                                    errors_count: Some(1),
                                    requests_with_errors_count: Some(1),
                                    ..Default::default()
                                },
                            ),
                            (
                                "id".into(),
                                FieldStat {
                                    return_type: Some("ID!".into()),
                                    ..Default::default()
                                },
                            ),
                        ]),
                    },
                ),
            ]),
        };
        let bytes = stats.encode_to_vec();
        let expected = prost_impls::ContextualizedStats::from(&stats);
        assert_eq!(
            prost_impls::ContextualizedStats::decode(bytes.as_slice()).unwrap(),
            expected
        );
        assert_eq!(
            ContextualizedStats::decode(&expected.encode_to_vec()).unwrap(),
            stats
        );
    }

    fn context(client_name: &str) -> StatsContext {
        StatsContext {
            client_name: Some(client_name.into()),
            client_version: Some("2.1".into()),
            operation_type: Some("query".into()),
            operation_subtype: Some("subscription-event".into()),
        }
    }

    #[test]
    fn contextualized_latency_stats_match_prost() {
        bolero::check!()
            .with_type::<(u64, Vec<i64>, String)>()
            .for_each(|(request_count, latency_count, client_name)| {
                let stats = ContextualizedQueryLatencyStats {
                    query_latency_stats: Some(latency_stats(*request_count, latency_count.clone())),
                    context: Some(context(client_name)),
                };
                let bytes = stats.encode_to_vec();
                let expected = prost_impls::ContextualizedQueryLatencyStats::from(&stats);
                assert_eq!(bytes, expected.encode_to_vec());
                assert_eq!(ContextualizedQueryLatencyStats::decode(&bytes).unwrap(), stats);
            });
    }

    #[test]
    fn contextualized_type_stats_match_prost() {
        let stats = ContextualizedTypeStats {
            context: Some(context("web")),
            per_type_stat: IndexMap::from([(
                "Query".into(),
                TypeStat {
                    per_field_stat: IndexMap::from([(
                        "me".into(),
                        FieldStat {
                            return_type: Some("User".into()),
                            observed_execution_count: Some(3),
                            latency_count: vec![-2, 1, 1],
                            ..Default::default()
                        },
                    )]),
                },
            )]),
        };
        let bytes = stats.encode_to_vec();
        let expected = prost_impls::ContextualizedTypeStats::from(&stats);
        assert_eq!(bytes, expected.encode_to_vec());
        assert_eq!(ContextualizedTypeStats::decode(&bytes).unwrap(), stats);
        assert_eq!(
            ContextualizedTypeStats::decode(&expected.encode_to_vec()).unwrap(),
            stats
        );
        assert_eq!(stats.context().map(|context| context.client_name()), Some("web"));
    }

}
