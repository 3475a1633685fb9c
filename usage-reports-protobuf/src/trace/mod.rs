// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! A trace of one GraphQL operation: its timing, its resolver tree and, for
//! federated graphs, the query plan that fetched from each subgraph.

pub mod http;
pub mod node;
pub mod query_plan_node;

pub use http::Http;
pub use node::Node;
pub use query_plan_node::QueryPlanNode;

use crate::Timestamp;
use indexmap::IndexMap;
use usage_proto_codec::field::{
    Bool, BoxedMsg, Double, Enumeration, Int64, Map, Msg, RepeatedMsg, Str, Uint32, Uint64,
};
use usage_proto_codec::{message, scalar};

message! {
    pub struct Trace = "Trace" {
        /// Wallclock time when the trace ended.
        #[field(3, "endTime", Msg<Timestamp>)]
        pub end_time: Option<Timestamp>,
        /// Wallclock time when the trace began.
        #[field(4, "startTime", Msg<Timestamp>)]
        pub start_time: Option<Timestamp>,
        #[field(6, "details", Msg<Details>)]
        pub details: Option<Details>,
        #[field(7, "clientName", Str)]
        pub client_name: Option<String>,
        #[field(8, "clientVersion", Str)]
        pub client_version: Option<String>,
        #[field(10, "http", Msg<Http>)]
        pub http: Option<Http>,
        /// High precision duration of the trace; may not equal
        /// `end_time - start_time`.
        #[field(11, "durationNs", Uint64)]
        pub duration_ns: Option<u64>,
        /// The resolver tree of a non-federated operation.
        #[field(14, "root", Msg<Node>)]
        pub root: Option<Node>,
        #[field(18, "cachePolicy", Msg<CachePolicy>)]
        pub cache_policy: Option<CachePolicy>,
        #[field(19, "signature", Str)]
        pub signature: Option<String>,
        #[field(20, "fullQueryCacheHit", Bool)]
        pub full_query_cache_hit: Option<bool>,
        #[field(21, "persistedQueryHit", Bool)]
        pub persisted_query_hit: Option<bool>,
        #[field(22, "persistedQueryRegister", Bool)]
        pub persisted_query_register: Option<bool>,
        #[field(24, "registeredOperation", Bool)]
        pub registered_operation: Option<bool>,
        #[field(25, "forbiddenOperation", Bool)]
        pub forbidden_operation: Option<bool>,
        /// The plan of a federated operation. Subgraph traces hang off its
        /// fetch nodes.
        #[field(26, "queryPlan", BoxedMsg<QueryPlanNode>)]
        pub query_plan: Option<Box<QueryPlanNode>>,
        /// Set when the operation failed to parse or validate, in place of
        /// a signature.
        #[field(27, "unexecutedOperationBody", Str)]
        pub unexecuted_operation_body: Option<String>,
        #[field(28, "unexecutedOperationName", Str)]
        pub unexecuted_operation_name: Option<String>,
        /// The weight this trace carries when stats are extrapolated from
        /// sampled traces.
        #[field(31, "fieldExecutionWeight", Double)]
        pub field_execution_weight: Option<f64>,
    }
}

pub mod cache_policy {
    usage_proto_codec::enumeration! {
        pub enum Scope = "Trace.CachePolicy.Scope" {
            Unknown = 0 => "UNKNOWN",
            Public = 1 => "PUBLIC",
            Private = 2 => "PRIVATE",
        }
    }
}

message! {
    pub struct CachePolicy = "Trace.CachePolicy" {
        #[field(1, "scope", Enumeration<cache_policy::Scope>)]
        pub scope: Option<i32>,
        /// Use 0 for absent, -1 for 0.
        #[field(2, "maxAgeNs", Int64)]
        pub max_age_ns: Option<i64>,
    }
}

impl CachePolicy {
    pub fn set_scope(&mut self, scope: cache_policy::Scope) {
        self.scope = Some(scope.into());
    }
}

message! {
    pub struct Details = "Trace.Details" {
        #[field(3, "operationName", Str)]
        pub operation_name: Option<String>,
        /// Variable values keyed by name, each rendered as JSON.
        #[field(4, "variablesJson", Map<scalar::Str>)]
        pub variables_json: IndexMap<String, String>,
    }
}

message! {
    pub struct Error = "Trace.Error" {
        /// The error message, without its locations.
        #[field(1, "message", Str)]
        pub message: Option<String>,
        #[field(2, "location", RepeatedMsg<Location>)]
        pub location: Vec<Location>,
        #[field(3, "timeNs", Uint64)]
        pub time_ns: Option<u64>,
        /// The whole error rendered as JSON.
        #[field(4, "json", Str)]
        pub json: Option<String>,
    }
}

message! {
    pub struct Location = "Trace.Location" {
        #[field(1, "line", Uint32)]
        pub line: Option<u32>,
        #[field(2, "column", Uint32)]
        pub column: Option<u32>,
    }
}
