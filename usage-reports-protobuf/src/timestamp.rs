// Copyright 2025-Present Datadog, Inc. https://www.datadoghq.com/
// SPDX-License-Identifier: Apache-2.0

use std::time::{Duration, SystemTime, UNIX_EPOCH};
use usage_proto_codec::field::{Int32, Int64};
use usage_proto_codec::message;

const NANOS_PER_SECOND: u32 = 1_000_000_000;

message! {
    /// A point in time independent of any time zone, as seconds and
    /// nanoseconds since the Unix epoch. Times before the epoch have negative
    /// seconds and non-negative nanos.
    pub struct Timestamp = "google.protobuf.Timestamp" {
        #[field(1, "seconds", Int64)]
        pub seconds: Option<i64>,
        #[field(2, "nanos", Int32)]
        pub nanos: Option<i32>,
    }
}

impl Timestamp {
    pub fn now() -> Self {
        SystemTime::now().into()
    }
}

impl From<SystemTime> for Timestamp {
    fn from(time: SystemTime) -> Self {
        let (seconds, nanos) = match time.duration_since(UNIX_EPOCH) {
            Ok(since) => (
                i64::try_from(since.as_secs()).unwrap_or(i64::MAX),
                since.subsec_nanos(),
            ),
            Err(err) => {
                let before = err.duration();
                let seconds = i64::try_from(before.as_secs()).map_or(i64::MIN, |secs| -secs);
                match before.subsec_nanos() {
                    0 => (seconds, 0),
                    nanos => (seconds.saturating_sub(1), NANOS_PER_SECOND - nanos),
                }
            }
        };
        Self {
            seconds: Some(seconds),
            nanos: Some(nanos as i32),
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, thiserror::Error)]
pub enum TimestampError {
    #[error("timestamp nanos must be within 0..1000000000, got {0}")]
    InvalidNanos(i32),
    #[error("timestamp is outside the range of SystemTime")]
    OutOfRange,
}

impl TryFrom<&Timestamp> for SystemTime {
    type Error = TimestampError;

    fn try_from(timestamp: &Timestamp) -> Result<Self, Self::Error> {
        let seconds = timestamp.seconds.unwrap_or_default();
        let nanos = timestamp.nanos.unwrap_or_default();
        let nanos = u32::try_from(nanos)
            .ok()
            .filter(|nanos| *nanos < NANOS_PER_SECOND)
            .ok_or(TimestampError::InvalidNanos(nanos))?;
        let whole = Duration::from_secs(seconds.unsigned_abs());
        let time = if seconds >= 0 {
            UNIX_EPOCH.checked_add(whole)
        } else {
            UNIX_EPOCH.checked_sub(whole)
        };
        time.and_then(|time| time.checked_add(Duration::from_nanos(u64::from(nanos))))
            .ok_or(TimestampError::OutOfRange)
    }
}

impl TryFrom<Timestamp> for SystemTime {
    type Error = TimestampError;

    fn try_from(timestamp: Timestamp) -> Result<Self, Self::Error> {
        SystemTime::try_from(&timestamp)
    }
}
