// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The same messages declared for prost, so that encodings can be checked
//! against an independent implementation.

use crate::trace::{self as ours, query_plan_node as plan};
use indexmap::IndexMap;
use prost::Message as _;
use std::collections::HashMap;
use usage_proto_codec::MaybeEncoded;

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Timestamp {
    #[prost(int64, optional, tag = "1")]
    pub seconds: Option<i64>,
    #[prost(int32, optional, tag = "2")]
    pub nanos: Option<i32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Trace {
    #[prost(message, optional, tag = "3")]
    pub end_time: Option<Timestamp>,
    #[prost(message, optional, tag = "4")]
    pub start_time: Option<Timestamp>,
    #[prost(message, optional, tag = "6")]
    pub details: Option<Details>,
    #[prost(string, optional, tag = "7")]
    pub client_name: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub client_version: Option<String>,
    #[prost(message, optional, tag = "10")]
    pub http: Option<Http>,
    #[prost(uint64, optional, tag = "11")]
    pub duration_ns: Option<u64>,
    #[prost(message, optional, tag = "14")]
    pub root: Option<Node>,
    #[prost(message, optional, tag = "18")]
    pub cache_policy: Option<CachePolicy>,
    #[prost(string, optional, tag = "19")]
    pub signature: Option<String>,
    #[prost(bool, optional, tag = "20")]
    pub full_query_cache_hit: Option<bool>,
    #[prost(bool, optional, tag = "21")]
    pub persisted_query_hit: Option<bool>,
    #[prost(bool, optional, tag = "22")]
    pub persisted_query_register: Option<bool>,
    #[prost(bool, optional, tag = "24")]
    pub registered_operation: Option<bool>,
    #[prost(bool, optional, tag = "25")]
    pub forbidden_operation: Option<bool>,
    #[prost(message, optional, boxed, tag = "26")]
    pub query_plan: Option<Box<QueryPlanNode>>,
    #[prost(string, optional, tag = "27")]
    pub unexecuted_operation_body: Option<String>,
    #[prost(string, optional, tag = "28")]
    pub unexecuted_operation_name: Option<String>,
    #[prost(double, optional, tag = "31")]
    pub field_execution_weight: Option<f64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct CachePolicy {
    #[prost(int32, optional, tag = "1")]
    pub scope: Option<i32>,
    #[prost(int64, optional, tag = "2")]
    pub max_age_ns: Option<i64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Details {
    #[prost(string, optional, tag = "3")]
    pub operation_name: Option<String>,
    #[prost(map = "string, string", tag = "4")]
    pub variables_json: HashMap<String, String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Error {
    #[prost(string, optional, tag = "1")]
    pub message: Option<String>,
    #[prost(message, repeated, tag = "2")]
    pub location: Vec<Location>,
    #[prost(uint64, optional, tag = "3")]
    pub time_ns: Option<u64>,
    #[prost(string, optional, tag = "4")]
    pub json: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Location {
    #[prost(uint32, optional, tag = "1")]
    pub line: Option<u32>,
    #[prost(uint32, optional, tag = "2")]
    pub column: Option<u32>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Http {
    #[prost(int32, optional, tag = "1")]
    pub method: Option<i32>,
    #[prost(string, optional, tag = "2")]
    pub host: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub path: Option<String>,
    #[prost(map = "string, message", tag = "4")]
    pub request_headers: HashMap<String, HttpValues>,
    #[prost(map = "string, message", tag = "5")]
    pub response_headers: HashMap<String, HttpValues>,
    #[prost(uint32, optional, tag = "6")]
    pub status_code: Option<u32>,
    #[prost(bool, optional, tag = "8")]
    pub secure: Option<bool>,
    #[prost(string, optional, tag = "9")]
    pub protocol: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct HttpValues {
    #[prost(string, repeated, tag = "1")]
    pub value: Vec<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Node {
    #[prost(oneof = "NodeId", tags = "1, 2")]
    pub id: Option<NodeId>,
    #[prost(string, optional, tag = "3")]
    pub r#type: Option<String>,
    #[prost(message, optional, tag = "5")]
    pub cache_policy: Option<CachePolicy>,
    #[prost(uint64, optional, tag = "8")]
    pub start_time: Option<u64>,
    #[prost(uint64, optional, tag = "9")]
    pub end_time: Option<u64>,
    #[prost(message, repeated, tag = "11")]
    pub error: Vec<Error>,
    #[prost(message, repeated, tag = "12")]
    pub child: Vec<Node>,
    #[prost(string, optional, tag = "13")]
    pub parent_type: Option<String>,
    #[prost(string, optional, tag = "14")]
    pub original_field_name: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum NodeId {
    #[prost(string, tag = "1")]
    ResponseName(String),
    #[prost(uint32, tag = "2")]
    Index(u32),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryPlanNode {
    #[prost(oneof = "PlanNode", tags = "1, 2, 3, 4, 5, 6")]
    pub node: Option<PlanNode>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum PlanNode {
    #[prost(message, tag = "1")]
    Sequence(SequenceNode),
    #[prost(message, tag = "2")]
    Parallel(ParallelNode),
    #[prost(message, tag = "3")]
    Fetch(FetchNode),
    #[prost(message, tag = "4")]
    Flatten(FlattenNode),
    #[prost(message, tag = "5")]
    Defer(DeferNode),
    #[prost(message, tag = "6")]
    Condition(ConditionNode),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct SequenceNode {
    #[prost(message, repeated, tag = "1")]
    pub nodes: Vec<QueryPlanNode>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ParallelNode {
    #[prost(message, repeated, tag = "1")]
    pub nodes: Vec<QueryPlanNode>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FetchNode {
    #[prost(string, optional, tag = "1")]
    pub service_name: Option<String>,
    #[prost(bool, optional, tag = "2")]
    pub trace_parsing_failed: Option<bool>,
    #[prost(message, optional, boxed, tag = "3")]
    pub trace: Option<Box<Trace>>,
    #[prost(uint64, optional, tag = "4")]
    pub sent_time_offset: Option<u64>,
    #[prost(message, optional, tag = "5")]
    pub sent_time: Option<Timestamp>,
    #[prost(message, optional, tag = "6")]
    pub received_time: Option<Timestamp>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FlattenNode {
    #[prost(message, repeated, tag = "1")]
    pub response_path: Vec<ResponsePathElement>,
    #[prost(message, optional, boxed, tag = "2")]
    pub node: Option<Box<QueryPlanNode>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeferNode {
    #[prost(message, optional, tag = "1")]
    pub primary: Option<DeferNodePrimary>,
    #[prost(message, repeated, tag = "2")]
    pub deferred: Vec<DeferredNode>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeferNodePrimary {
    #[prost(message, optional, boxed, tag = "1")]
    pub node: Option<Box<QueryPlanNode>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeferredNode {
    #[prost(message, repeated, tag = "1")]
    pub depends: Vec<DeferredNodeDepends>,
    #[prost(string, optional, tag = "2")]
    pub label: Option<String>,
    #[prost(message, repeated, tag = "3")]
    pub path: Vec<ResponsePathElement>,
    #[prost(message, optional, boxed, tag = "4")]
    pub node: Option<Box<QueryPlanNode>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct DeferredNodeDepends {
    #[prost(string, optional, tag = "1")]
    pub id: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub defer_label: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ConditionNode {
    #[prost(string, optional, tag = "1")]
    pub condition: Option<String>,
    #[prost(message, optional, boxed, tag = "2")]
    pub if_clause: Option<Box<QueryPlanNode>>,
    #[prost(message, optional, boxed, tag = "3")]
    pub else_clause: Option<Box<QueryPlanNode>>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ResponsePathElement {
    #[prost(oneof = "PathElementId", tags = "1, 2")]
    pub id: Option<PathElementId>,
}

#[derive(Clone, PartialEq, ::prost::Oneof)]
pub enum PathElementId {
    #[prost(string, tag = "1")]
    FieldName(String),
    #[prost(uint32, tag = "2")]
    Index(u32),
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct PathErrorStats {
    #[prost(map = "string, message", tag = "1")]
    pub children: HashMap<String, PathErrorStats>,
    #[prost(uint64, optional, tag = "4")]
    pub errors_count: Option<u64>,
    #[prost(uint64, optional, tag = "5")]
    pub requests_with_errors_count: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct QueryLatencyStats {
    #[prost(uint64, optional, tag = "2")]
    pub request_count: Option<u64>,
    #[prost(uint64, optional, tag = "3")]
    pub cache_hits: Option<u64>,
    #[prost(uint64, optional, tag = "4")]
    pub persisted_query_hits: Option<u64>,
    #[prost(uint64, optional, tag = "5")]
    pub persisted_query_misses: Option<u64>,
    #[prost(message, optional, tag = "7")]
    pub root_error_stats: Option<PathErrorStats>,
    #[prost(uint64, optional, tag = "8")]
    pub requests_with_errors_count: Option<u64>,
    #[prost(uint64, optional, tag = "11")]
    pub registered_operation_count: Option<u64>,
    #[prost(uint64, optional, tag = "12")]
    pub forbidden_operation_count: Option<u64>,
    #[prost(sint64, repeated, packed = "true", tag = "13")]
    pub latency_count: Vec<i64>,
    #[prost(sint64, repeated, packed = "true", tag = "14")]
    pub cache_latency_count: Vec<i64>,
    #[prost(sint64, repeated, packed = "true", tag = "15")]
    pub public_cache_ttl_count: Vec<i64>,
    #[prost(sint64, repeated, packed = "true", tag = "16")]
    pub private_cache_ttl_count: Vec<i64>,
    #[prost(uint64, optional, tag = "17")]
    pub requests_without_field_instrumentation: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct StatsContext {
    #[prost(string, optional, tag = "2")]
    pub client_name: Option<String>,
    #[prost(string, optional, tag = "3")]
    pub client_version: Option<String>,
    #[prost(string, optional, tag = "4")]
    pub operation_type: Option<String>,
    #[prost(string, optional, tag = "5")]
    pub operation_subtype: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct FieldStat {
    #[prost(string, optional, tag = "3")]
    pub return_type: Option<String>,
    #[prost(uint64, optional, tag = "4")]
    pub errors_count: Option<u64>,
    #[prost(uint64, optional, tag = "5")]
    pub observed_execution_count: Option<u64>,
    #[prost(uint64, optional, tag = "6")]
    pub requests_with_errors_count: Option<u64>,
    #[prost(sint64, repeated, packed = "true", tag = "9")]
    pub latency_count: Vec<i64>,
    #[prost(uint64, optional, tag = "10")]
    pub estimated_execution_count: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TypeStat {
    #[prost(map = "string, message", tag = "3")]
    pub per_field_stat: HashMap<String, FieldStat>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReferencedFieldsForType {
    #[prost(string, repeated, tag = "1")]
    pub field_names: Vec<String>,
    #[prost(bool, optional, tag = "2")]
    pub is_interface: Option<bool>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextualizedStats {
    #[prost(message, optional, tag = "1")]
    pub context: Option<StatsContext>,
    #[prost(message, optional, tag = "2")]
    pub query_latency_stats: Option<QueryLatencyStats>,
    #[prost(map = "string, message", tag = "3")]
    pub per_type_stat: HashMap<String, TypeStat>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextualizedQueryLatencyStats {
    #[prost(message, optional, tag = "1")]
    pub query_latency_stats: Option<QueryLatencyStats>,
    #[prost(message, optional, tag = "2")]
    pub context: Option<StatsContext>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ContextualizedTypeStats {
    #[prost(message, optional, tag = "1")]
    pub context: Option<StatsContext>,
    #[prost(map = "string, message", tag = "2")]
    pub per_type_stat: HashMap<String, TypeStat>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct ReportHeader {
    #[prost(string, optional, tag = "5")]
    pub hostname: Option<String>,
    #[prost(string, optional, tag = "6")]
    pub agent_version: Option<String>,
    #[prost(string, optional, tag = "7")]
    pub service_version: Option<String>,
    #[prost(string, optional, tag = "8")]
    pub runtime_version: Option<String>,
    #[prost(string, optional, tag = "9")]
    pub uname: Option<String>,
    #[prost(string, optional, tag = "11")]
    pub executable_schema_id: Option<String>,
    #[prost(string, optional, tag = "12")]
    pub graph_ref: Option<String>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct TracesAndStats {
    #[prost(message, repeated, tag = "1")]
    pub trace: Vec<Trace>,
    #[prost(message, repeated, tag = "2")]
    pub stats_with_context: Vec<ContextualizedStats>,
    #[prost(message, repeated, tag = "3")]
    pub internal_traces_contributing_to_stats: Vec<Trace>,
    #[prost(map = "string, message", tag = "4")]
    pub referenced_fields_by_type: HashMap<String, ReferencedFieldsForType>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct OperationCountByType {
    #[prost(string, optional, tag = "1")]
    pub r#type: Option<String>,
    #[prost(string, optional, tag = "2")]
    pub subtype: Option<String>,
    #[prost(uint64, optional, tag = "3")]
    pub operation_count: Option<u64>,
}

#[derive(Clone, PartialEq, ::prost::Message)]
pub struct Report {
    #[prost(message, optional, tag = "1")]
    pub header: Option<ReportHeader>,
    #[prost(message, optional, tag = "2")]
    pub end_time: Option<Timestamp>,
    #[prost(map = "string, message", tag = "5")]
    pub traces_per_query: HashMap<String, TracesAndStats>,
    #[prost(uint64, optional, tag = "6")]
    pub operation_count: Option<u64>,
    #[prost(bool, optional, tag = "7")]
    pub traces_pre_aggregated: Option<bool>,
    #[prost(message, repeated, tag = "8")]
    pub operation_count_by_type: Vec<OperationCountByType>,
}

fn opt<A, B: for<'a> From<&'a A>>(value: &Option<A>) -> Option<B> {
    value.as_ref().map(B::from)
}

fn boxed<A, B: for<'a> From<&'a A>>(value: &Option<Box<A>>) -> Option<Box<B>> {
    value.as_deref().map(|value| Box::new(B::from(value)))
}

fn list<A, B: for<'a> From<&'a A>>(values: &[A]) -> Vec<B> {
    values.iter().map(B::from).collect()
}

fn map<A, B: for<'a> From<&'a A>>(values: &IndexMap<String, A>) -> HashMap<String, B> {
    values
        .iter()
        .map(|(key, value)| (key.clone(), B::from(value)))
        .collect()
}

fn traces(values: &[MaybeEncoded<crate::Trace>]) -> Vec<Trace> {
    values
        .iter()
        .map(|trace| match trace {
            MaybeEncoded::Message(trace) => trace.into(),
            MaybeEncoded::Encoded(bytes) => Trace::decode(bytes.clone()).unwrap_or_default(),
        })
        .collect()
}

impl From<&crate::Timestamp> for Timestamp {
    fn from(value: &crate::Timestamp) -> Self {
        Self {
            seconds: value.seconds,
            nanos: value.nanos,
        }
    }
}

impl From<&crate::Trace> for Trace {
    fn from(value: &crate::Trace) -> Self {
        Self {
            end_time: opt(&value.end_time),
            start_time: opt(&value.start_time),
            details: opt(&value.details),
            client_name: value.client_name.clone(),
            client_version: value.client_version.clone(),
            http: opt(&value.http),
            duration_ns: value.duration_ns,
            root: opt(&value.root),
            cache_policy: opt(&value.cache_policy),
            signature: value.signature.clone(),
            full_query_cache_hit: value.full_query_cache_hit,
            persisted_query_hit: value.persisted_query_hit,
            persisted_query_register: value.persisted_query_register,
            registered_operation: value.registered_operation,
            forbidden_operation: value.forbidden_operation,
            query_plan: boxed(&value.query_plan),
            unexecuted_operation_body: value.unexecuted_operation_body.clone(),
            unexecuted_operation_name: value.unexecuted_operation_name.clone(),
            field_execution_weight: value.field_execution_weight,
        }
    }
}

impl From<&ours::CachePolicy> for CachePolicy {
    fn from(value: &ours::CachePolicy) -> Self {
        Self {
            scope: value.scope,
            max_age_ns: value.max_age_ns,
        }
    }
}

impl From<&ours::Details> for Details {
    fn from(value: &ours::Details) -> Self {
        Self {
            operation_name: value.operation_name.clone(),
            variables_json: value.variables_json.clone().into_iter().collect(),
        }
    }
}

impl From<&ours::Error> for Error {
    fn from(value: &ours::Error) -> Self {
        Self {
            message: value.message.clone(),
            location: list(&value.location),
            time_ns: value.time_ns,
            json: value.json.clone(),
        }
    }
}

impl From<&ours::Location> for Location {
    fn from(value: &ours::Location) -> Self {
        Self {
            line: value.line,
            column: value.column,
        }
    }
}

impl From<&ours::Http> for Http {
    fn from(value: &ours::Http) -> Self {
        Self {
            method: value.method,
            host: value.host.clone(),
            path: value.path.clone(),
            request_headers: map(&value.request_headers),
            response_headers: map(&value.response_headers),
            status_code: value.status_code,
            secure: value.secure,
            protocol: value.protocol.clone(),
        }
    }
}

impl From<&ours::http::Values> for HttpValues {
    fn from(value: &ours::http::Values) -> Self {
        Self {
            value: value.value.clone(),
        }
    }
}

impl From<&ours::Node> for Node {
    fn from(value: &ours::Node) -> Self {
        Self {
            id: value.id.as_ref().map(|id| match id {
                ours::node::Id::ResponseName(name) => NodeId::ResponseName(name.clone()),
                ours::node::Id::Index(index) => NodeId::Index(*index),
            }),
            r#type: value.r#type.clone(),
            cache_policy: opt(&value.cache_policy),
            start_time: value.start_time,
            end_time: value.end_time,
            error: list(&value.error),
            child: list(&value.child),
            parent_type: value.parent_type.clone(),
            original_field_name: value.original_field_name.clone(),
        }
    }
}

impl From<&ours::QueryPlanNode> for QueryPlanNode {
    fn from(value: &ours::QueryPlanNode) -> Self {
        Self {
            node: value.node.as_ref().map(|node| match node {
                plan::Node::Sequence(node) => PlanNode::Sequence(SequenceNode {
                    nodes: list(&node.nodes),
                }),
                plan::Node::Parallel(node) => PlanNode::Parallel(ParallelNode {
                    nodes: list(&node.nodes),
                }),
                plan::Node::Fetch(node) => PlanNode::Fetch(node.into()),
                plan::Node::Flatten(node) => PlanNode::Flatten(FlattenNode {
                    response_path: list(&node.response_path),
                    node: boxed(&node.node),
                }),
                plan::Node::Defer(node) => PlanNode::Defer(node.into()),
                plan::Node::Condition(node) => PlanNode::Condition(ConditionNode {
                    condition: node.condition.clone(),
                    if_clause: boxed(&node.if_clause),
                    else_clause: boxed(&node.else_clause),
                }),
            }),
        }
    }
}

impl From<&plan::FetchNode> for FetchNode {
    fn from(value: &plan::FetchNode) -> Self {
        Self {
            service_name: value.service_name.clone(),
            trace_parsing_failed: value.trace_parsing_failed,
            trace: boxed(&value.trace),
            sent_time_offset: value.sent_time_offset,
            sent_time: opt(&value.sent_time),
            received_time: opt(&value.received_time),
        }
    }
}

impl From<&plan::DeferNode> for DeferNode {
    fn from(value: &plan::DeferNode) -> Self {
        Self {
            primary: value.primary.as_ref().map(|primary| DeferNodePrimary {
                node: boxed(&primary.node),
            }),
            deferred: value
                .deferred
                .iter()
                .map(|deferred| DeferredNode {
                    depends: deferred
                        .depends
                        .iter()
                        .map(|depends| DeferredNodeDepends {
                            id: depends.id.clone(),
                            defer_label: depends.defer_label.clone(),
                        })
                        .collect(),
                    label: deferred.label.clone(),
                    path: list(&deferred.path),
                    node: boxed(&deferred.node),
                })
                .collect(),
        }
    }
}

impl From<&plan::ResponsePathElement> for ResponsePathElement {
    fn from(value: &plan::ResponsePathElement) -> Self {
        Self {
            id: value.id.as_ref().map(|id| match id {
                plan::response_path_element::Id::FieldName(name) => {
                    PathElementId::FieldName(name.clone())
                }
                plan::response_path_element::Id::Index(index) => PathElementId::Index(*index),
            }),
        }
    }
}

impl From<&crate::PathErrorStats> for PathErrorStats {
    fn from(value: &crate::PathErrorStats) -> Self {
        Self {
            children: map(&value.children),
            errors_count: value.errors_count,
            requests_with_errors_count: value.requests_with_errors_count,
        }
    }
}

impl From<&crate::QueryLatencyStats> for QueryLatencyStats {
    fn from(value: &crate::QueryLatencyStats) -> Self {
        Self {
            request_count: value.request_count,
            cache_hits: value.cache_hits,
            persisted_query_hits: value.persisted_query_hits,
            persisted_query_misses: value.persisted_query_misses,
            root_error_stats: opt(&value.root_error_stats),
            requests_with_errors_count: value.requests_with_errors_count,
            registered_operation_count: value.registered_operation_count,
            forbidden_operation_count: value.forbidden_operation_count,
            latency_count: value.latency_count.clone(),
            cache_latency_count: value.cache_latency_count.clone(),
            public_cache_ttl_count: value.public_cache_ttl_count.clone(),
            private_cache_ttl_count: value.private_cache_ttl_count.clone(),
            requests_without_field_instrumentation: value.requests_without_field_instrumentation,
        }
    }
}

impl From<&crate::StatsContext> for StatsContext {
    fn from(value: &crate::StatsContext) -> Self {
        Self {
            client_name: value.client_name.clone(),
            client_version: value.client_version.clone(),
            operation_type: value.operation_type.clone(),
            operation_subtype: value.operation_subtype.clone(),
        }
    }
}

impl From<&crate::FieldStat> for FieldStat {
    fn from(value: &crate::FieldStat) -> Self {
        Self {
            return_type: value.return_type.clone(),
            errors_count: value.errors_count,
            observed_execution_count: value.observed_execution_count,
            requests_with_errors_count: value.requests_with_errors_count,
            latency_count: value.latency_count.clone(),
            estimated_execution_count: value.estimated_execution_count,
        }
    }
}

impl From<&crate::TypeStat> for TypeStat {
    fn from(value: &crate::TypeStat) -> Self {
        Self {
            per_field_stat: map(&value.per_field_stat),
        }
    }
}

impl From<&crate::ReferencedFieldsForType> for ReferencedFieldsForType {
    fn from(value: &crate::ReferencedFieldsForType) -> Self {
        Self {
            field_names: value.field_names.clone(),
            is_interface: value.is_interface,
        }
    }
}

impl From<&crate::ContextualizedStats> for ContextualizedStats {
    fn from(value: &crate::ContextualizedStats) -> Self {
        Self {
            context: opt(&value.context),
            query_latency_stats: opt(&value.query_latency_stats),
            per_type_stat: map(&value.per_type_stat),
        }
    }
}

impl From<&crate::ContextualizedQueryLatencyStats> for ContextualizedQueryLatencyStats {
    fn from(value: &crate::ContextualizedQueryLatencyStats) -> Self {
        Self {
            query_latency_stats: opt(&value.query_latency_stats),
            context: opt(&value.context),
        }
    }
}

impl From<&crate::ContextualizedTypeStats> for ContextualizedTypeStats {
    fn from(value: &crate::ContextualizedTypeStats) -> Self {
        Self {
            context: opt(&value.context),
            per_type_stat: map(&value.per_type_stat),
        }
    }
}

impl From<&crate::ReportHeader> for ReportHeader {
    fn from(value: &crate::ReportHeader) -> Self {
        Self {
            hostname: value.hostname.clone(),
            agent_version: value.agent_version.clone(),
            service_version: value.service_version.clone(),
            runtime_version: value.runtime_version.clone(),
            uname: value.uname.clone(),
            executable_schema_id: value.executable_schema_id.clone(),
            graph_ref: value.graph_ref.clone(),
        }
    }
}

impl From<&crate::TracesAndStats> for TracesAndStats {
    fn from(value: &crate::TracesAndStats) -> Self {
        Self {
            trace: traces(&value.trace),
            stats_with_context: list(&value.stats_with_context),
            internal_traces_contributing_to_stats: traces(
                &value.internal_traces_contributing_to_stats,
            ),
            referenced_fields_by_type: map(&value.referenced_fields_by_type),
        }
    }
}

impl From<&crate::OperationCountByType> for OperationCountByType {
    fn from(value: &crate::OperationCountByType) -> Self {
        Self {
            r#type: value.r#type.clone(),
            subtype: value.subtype.clone(),
            operation_count: value.operation_count,
        }
    }
}

impl From<&crate::Report> for Report {
    fn from(value: &crate::Report) -> Self {
        Self {
            header: opt(&value.header),
            end_time: opt(&value.end_time),
            traces_per_query: map(&value.traces_per_query),
            operation_count: value.operation_count,
            traces_pre_aggregated: value.traces_pre_aggregated,
            operation_count_by_type: list(&value.operation_count_by_type),
        }
    }
}
