// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

#![cfg_attr(not(test), deny(clippy::panic))]
#![cfg_attr(not(test), deny(clippy::unwrap_used))]
#![cfg_attr(not(test), deny(clippy::expect_used))]
#![cfg_attr(not(test), deny(clippy::unimplemented))]

//! The messages of the GraphQL usage reporting protocol.
//!
//! A [`Report`] batches the usage of one reporting interval: full [`Trace`]s
//! of individual operations and aggregated stats, keyed by operation
//! signature. Every message is declared once with the codec's `message!`
//! macro, so its field numbers, encoding, decoding, [`Message::verify`] and
//! plain-object conversion all come from the same table.
//!
//! ```
//! use usage_reports_protobuf::{Message, Trace};
//!
//! let trace = Trace {
//!     duration_ns: Some(42),
//!     client_name: Some("test".into()),
//!     ..Default::default()
//! };
//! let bytes = trace.encode_to_vec();
//! assert_eq!(Trace::decode(&bytes).unwrap(), trace);
//! ```

mod report;
mod stats;
mod timestamp;
pub mod trace;

#[cfg(any(test, feature = "prost_impls"))]
pub mod prost_impls;

pub use report::*;
pub use stats::*;
pub use timestamp::*;
pub use trace::Trace;

pub use usage_proto_codec::{
    ConversionError, ConversionOptions, DecodeError, DecodeOptions, EncodeError, EnumConversion,
    Enumeration, LongConversion, MaybeEncoded, Message, MessageDescriptor, VerifyError,
};
