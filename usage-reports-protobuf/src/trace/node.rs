// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use super::{CachePolicy, Error};
use usage_proto_codec::field::{Msg, OneofField, RepeatedMsg, Str, Uint64};
use usage_proto_codec::{message, oneof, scalar};

oneof! {
    /// Where the node sits in the response.
    pub enum Id {
        /// The field's alias, or its name when it has none.
        #[field(1, "responseName", scalar::Str)]
        ResponseName(String),
        /// The position within a list.
        #[field(2, "index", scalar::Uint32)]
        Index(u32),
    }
}

message! {
    /// One resolver call. The root node of a trace has no id.
    pub struct Node = "Trace.Node" {
        #[field(oneof, "id", OneofField<Id>)]
        pub id: Option<Id>,
        /// The GraphQL type of the field's value, e.g. `[String!]`.
        #[field(3, "type", Str)]
        pub r#type: Option<String>,
        #[field(5, "cachePolicy", Msg<CachePolicy>)]
        pub cache_policy: Option<CachePolicy>,
        /// Relative to the trace's start time, in ns.
        #[field(8, "startTime", Uint64)]
        pub start_time: Option<u64>,
        /// Relative to the trace's start time, in ns.
        #[field(9, "endTime", Uint64)]
        pub end_time: Option<u64>,
        #[field(11, "error", RepeatedMsg<Error>)]
        pub error: Vec<Error>,
        #[field(12, "child", RepeatedMsg<Node>)]
        pub child: Vec<Node>,
        #[field(13, "parentType", Str)]
        pub parent_type: Option<String>,
        /// Set when the field was aliased.
        #[field(14, "originalFieldName", Str)]
        pub original_field_name: Option<String>,
    }
}

impl Node {
    /// The number of nodes in this subtree, this one included.
    pub fn node_count(&self) -> usize {
        1 + self.child.iter().map(Node::node_count).sum::<usize>()
    }

    /// Visits this subtree depth first, parents before children.
    pub fn walk<'a>(&'a self, f: &mut impl FnMut(&'a Node)) {
        f(self);
        for child in &self.child {
            child.walk(f);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use usage_proto_codec::{DecodeErrorKind, DecodeOptions, Message};

    fn chain(depth: usize) -> Node {
        (0..depth).fold(Node::default(), |node, index| Node {
            id: Some(Id::Index(index as u32)),
            child: vec![node],
            ..Default::default()
        })
    }

    #[test]
    fn id_members() {
        // responseName "a", then type "T".
        let bytes = [0x0A, 0x01, b'a', 0x1A, 0x01, b'T'];
        let node = Node::decode(&bytes).unwrap();
        assert_eq!(node.id, Some(Id::ResponseName("a".into())));
        assert_eq!(node.r#type.as_deref(), Some("T"));
        assert_eq!(node.encode_to_vec(), bytes);
    }

    #[test]
    fn walk_visits_every_node() {
        let node = chain(4);
        assert_eq!(node.node_count(), 5);
        let mut ids = Vec::new();
        node.walk(&mut |node| ids.push(node.id.clone()));
        assert_eq!(
            ids,
            [
                Some(Id::Index(3)),
                Some(Id::Index(2)),
                Some(Id::Index(1)),
                Some(Id::Index(0)),
                None
            ]
        );
    }

    #[test]
    fn deep_trees_hit_the_recursion_limit() {
        let bytes = chain(150).encode_to_vec();
        let err = Node::decode(&bytes).unwrap_err();
        assert_eq!(err.kind(), &DecodeErrorKind::RecursionLimitReached);
        let options = DecodeOptions {
            recursion_limit: 200,
        };
        assert_eq!(Node::decode_with_options(&bytes, &options).unwrap().node_count(), 151);
    }
}
