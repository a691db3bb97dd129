//! Time window computation for event fetches.

use serde::Serialize;
use std::time::Duration;

use crate::error::{ClientError, Result};

/// Half-open time range `[start, end)` in Unix seconds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct TimeWindow {
    pub start: u64,
    pub end: u64,
}

impl TimeWindow {
    /// Create an explicit window. Fails unless `start < end`.
    pub fn new(start: u64, end: u64) -> Result<Self> {
        if start >= end {
            return Err(ClientError::InvalidWindow { start, end });
        }
        Ok(Self { start, end })
    }

    /// The most recently completed interval-aligned window ending at or
    /// before `now`.
    ///
    /// `end` is `now` rounded down to an interval boundary and `start` is one
    /// interval earlier, so consecutive scheduled runs tile the timeline
    /// without gaps or overlaps.
    pub fn latest_completed(now: u64, interval: Duration) -> Self {
        let interval = interval.as_secs().max(1);
        let end = (now / interval) * interval;
        Self {
            start: end.saturating_sub(interval),
            end,
        }
    }
}
