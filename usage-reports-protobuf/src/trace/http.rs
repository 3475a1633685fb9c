// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use indexmap::IndexMap;
use usage_proto_codec::field::{Bool, Enumeration, MapMsg, Repeated, Str, Uint32};
use usage_proto_codec::{enumeration, message, scalar};

enumeration! {
    pub enum Method = "Trace.HTTP.Method" {
        Unknown = 0 => "UNKNOWN",
        Options = 1 => "OPTIONS",
        Get = 2 => "GET",
        Head = 3 => "HEAD",
        Post = 4 => "POST",
        Put = 5 => "PUT",
        Delete = 6 => "DELETE",
        Trace = 7 => "TRACE",
        Connect = 8 => "CONNECT",
        Patch = 9 => "PATCH",
    }
}

message! {
    pub struct Values = "Trace.HTTP.Values" {
        #[field(1, "value", Repeated<scalar::Str>)]
        pub value: Vec<String>,
    }
}

message! {
    /// The HTTP request that carried the operation.
    pub struct Http = "Trace.HTTP" {
        #[field(1, "method", Enumeration<Method>)]
        pub method: Option<i32>,
        #[field(2, "host", Str)]
        pub host: Option<String>,
        #[field(3, "path", Str)]
        pub path: Option<String>,
        /// Should exclude manual blacklist ("Auth" by default).
        #[field(4, "requestHeaders", MapMsg<Values>)]
        pub request_headers: IndexMap<String, Values>,
        #[field(5, "responseHeaders", MapMsg<Values>)]
        pub response_headers: IndexMap<String, Values>,
        #[field(6, "statusCode", Uint32)]
        pub status_code: Option<u32>,
        /// TLS was used.
        #[field(8, "secure", Bool)]
        pub secure: Option<bool>,
        /// By convention "HTTP/1.0", "HTTP/1.1", "HTTP/2" or "h2".
        #[field(9, "protocol", Str)]
        pub protocol: Option<String>,
    }
}

impl Http {
    pub fn set_method(&mut self, method: Method) {
        self.method = Some(method.into());
    }
}
