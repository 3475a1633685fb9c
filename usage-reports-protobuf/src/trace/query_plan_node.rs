// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

//! The query plan of a federated operation. Each fetch node carries the
//! trace the subgraph sent back.

use crate::{Timestamp, Trace};
use usage_proto_codec::field::{Bool, BoxedMsg, Msg, OneofField, RepeatedMsg, Str, Uint64};
use usage_proto_codec::{message, oneof, MessageValue};

oneof! {
    pub enum Node {
        #[field(1, "sequence", MessageValue<SequenceNode>)]
        Sequence(SequenceNode),
        #[field(2, "parallel", MessageValue<ParallelNode>)]
        Parallel(ParallelNode),
        #[field(3, "fetch", MessageValue<FetchNode>)]
        Fetch(FetchNode),
        #[field(4, "flatten", MessageValue<FlattenNode>)]
        Flatten(FlattenNode),
        #[field(5, "defer", MessageValue<DeferNode>)]
        Defer(DeferNode),
        #[field(6, "condition", MessageValue<ConditionNode>)]
        Condition(ConditionNode),
    }
}

message! {
    pub struct QueryPlanNode = "Trace.QueryPlanNode" {
        #[field(oneof, "node", OneofField<Node>)]
        pub node: Option<Node>,
    }
}

message! {
    /// Runs its nodes one after the other.
    pub struct SequenceNode = "Trace.QueryPlanNode.SequenceNode" {
        #[field(1, "nodes", RepeatedMsg<QueryPlanNode>)]
        pub nodes: Vec<QueryPlanNode>,
    }
}

message! {
    /// Runs its nodes concurrently.
    pub struct ParallelNode = "Trace.QueryPlanNode.ParallelNode" {
        #[field(1, "nodes", RepeatedMsg<QueryPlanNode>)]
        pub nodes: Vec<QueryPlanNode>,
    }
}

message! {
    /// One request to a subgraph.
    pub struct FetchNode = "Trace.QueryPlanNode.FetchNode" {
        #[field(1, "serviceName", Str)]
        pub service_name: Option<String>,
        #[field(2, "traceParsingFailed", Bool)]
        pub trace_parsing_failed: Option<bool>,
        /// The subgraph's own trace. Its timestamps are from the
        /// subgraph's clock.
        #[field(3, "trace", BoxedMsg<Trace>)]
        pub trace: Option<Box<Trace>>,
        /// Relative to the outer trace's start time, in ns.
        #[field(4, "sentTimeOffset", Uint64)]
        pub sent_time_offset: Option<u64>,
        /// Wallclock times measured in the gateway.
        #[field(5, "sentTime", Msg<Timestamp>)]
        pub sent_time: Option<Timestamp>,
        #[field(6, "receivedTime", Msg<Timestamp>)]
        pub received_time: Option<Timestamp>,
    }
}

message! {
    /// Runs its node once per entity found at the response path.
    pub struct FlattenNode = "Trace.QueryPlanNode.FlattenNode" {
        #[field(1, "responsePath", RepeatedMsg<ResponsePathElement>)]
        pub response_path: Vec<ResponsePathElement>,
        #[field(2, "node", BoxedMsg<QueryPlanNode>)]
        pub node: Option<Box<QueryPlanNode>>,
    }
}

message! {
    /// A primary block that runs first and deferred blocks that stream in
    /// after it.
    pub struct DeferNode = "Trace.QueryPlanNode.DeferNode" {
        #[field(1, "primary", Msg<DeferNodePrimary>)]
        pub primary: Option<DeferNodePrimary>,
        #[field(2, "deferred", RepeatedMsg<DeferredNode>)]
        pub deferred: Vec<DeferredNode>,
    }
}

message! {
    pub struct DeferNodePrimary = "Trace.QueryPlanNode.DeferNodePrimary" {
        #[field(1, "node", BoxedMsg<QueryPlanNode>)]
        pub node: Option<Box<QueryPlanNode>>,
    }
}

message! {
    pub struct DeferredNode = "Trace.QueryPlanNode.DeferredNode" {
        #[field(1, "depends", RepeatedMsg<DeferredNodeDepends>)]
        pub depends: Vec<DeferredNodeDepends>,
        #[field(2, "label", Str)]
        pub label: Option<String>,
        #[field(3, "path", RepeatedMsg<ResponsePathElement>)]
        pub path: Vec<ResponsePathElement>,
        #[field(4, "node", BoxedMsg<QueryPlanNode>)]
        pub node: Option<Box<QueryPlanNode>>,
    }
}

message! {
    pub struct DeferredNodeDepends = "Trace.QueryPlanNode.DeferredNodeDepends" {
        #[field(1, "id", Str)]
        pub id: Option<String>,
        #[field(2, "deferLabel", Str)]
        pub defer_label: Option<String>,
    }
}

message! {
    /// Picks a branch on the value of a boolean variable.
    pub struct ConditionNode = "Trace.QueryPlanNode.ConditionNode" {
        #[field(1, "condition", Str)]
        pub condition: Option<String>,
        #[field(2, "ifClause", BoxedMsg<QueryPlanNode>)]
        pub if_clause: Option<Box<QueryPlanNode>>,
        #[field(3, "elseClause", BoxedMsg<QueryPlanNode>)]
        pub else_clause: Option<Box<QueryPlanNode>>,
    }
}

pub mod response_path_element {
    use usage_proto_codec::scalar;

    usage_proto_codec::oneof! {
        pub enum Id {
            #[field(1, "fieldName", scalar::Str)]
            FieldName(String),
            #[field(2, "index", scalar::Uint32)]
            Index(u32),
        }
    }
}

message! {
    /// One step of a path into the response: a field name or a list index.
    pub struct ResponsePathElement = "Trace.QueryPlanNode.ResponsePathElement" {
        #[field(oneof, "id", OneofField<response_path_element::Id>)]
        pub id: Option<response_path_element::Id>,
    }
}

impl QueryPlanNode {
    /// Calls `f` with every fetch in the plan, in plan order.
    pub fn for_each_fetch<'a>(&'a self, f: &mut impl FnMut(&'a FetchNode)) {
        match &self.node {
            None => {}
            Some(Node::Fetch(fetch)) => f(fetch),
            Some(
                Node::Sequence(SequenceNode { nodes }) | Node::Parallel(ParallelNode { nodes }),
            ) => {
                for node in nodes {
                    node.for_each_fetch(f);
                }
            }
            Some(Node::Flatten(flatten)) => for_each_fetch_in(&flatten.node, f),
            Some(Node::Defer(defer)) => {
                if let Some(primary) = &defer.primary {
                    for_each_fetch_in(&primary.node, f);
                }
                for deferred in &defer.deferred {
                    for_each_fetch_in(&deferred.node, f);
                }
            }
            Some(Node::Condition(condition)) => {
                for_each_fetch_in(&condition.if_clause, f);
                for_each_fetch_in(&condition.else_clause, f);
            }
        }
    }
}

fn for_each_fetch_in<'a>(node: &'a Option<Box<QueryPlanNode>>, f: &mut impl FnMut(&'a FetchNode)) {
    if let Some(node) = node {
        node.for_each_fetch(f);
    }
}
