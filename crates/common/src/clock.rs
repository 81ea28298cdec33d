//! Timestamp utilities for response windows.
//!
//! Responses report the drag window as UTC wall-clock timestamps with
//! microsecond precision. The end of the window is the start plus the
//! requested time budget.

use std::time::Instant;

use chrono::{DateTime, Duration, Utc};

/// Canonical timestamp layout, e.g. `2024-05-01T12:30:45.123000Z`.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%dT%H:%M:%S%.6fZ";

/// Format a UTC instant in the canonical response layout.
pub fn format_timestamp(ts: DateTime<Utc>) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Start/end wall-clock bounds of a synthesized drag.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResponseWindow {
    start: DateTime<Utc>,
    end: DateTime<Utc>,
}

impl ResponseWindow {
    /// Window beginning now and lasting `budget_ms`.
    pub fn starting_now(budget_ms: u64) -> Self {
        Self::starting_at(Utc::now(), budget_ms)
    }

    /// Window beginning at `start` and lasting `budget_ms`.
    pub fn starting_at(start: DateTime<Utc>, budget_ms: u64) -> Self {
        let millis = i64::try_from(budget_ms).unwrap_or(i64::MAX);
        let end = start
            .checked_add_signed(Duration::milliseconds(millis))
            .unwrap_or(DateTime::<Utc>::MAX_UTC);
        Self { start, end }
    }

    pub fn start(&self) -> DateTime<Utc> {
        self.start
    }

    pub fn end(&self) -> DateTime<Utc> {
        self.end
    }

    pub fn start_string(&self) -> String {
        format_timestamp(self.start)
    }

    pub fn end_string(&self) -> String {
        format_timestamp(self.end)
    }
}

/// Monotonic stopwatch for stage timings in logs.
#[derive(Debug, Clone, Copy)]
pub struct StageTimer {
    started: Instant,
}

impl StageTimer {
    pub fn start() -> Self {
        Self {
            started: Instant::now(),
        }
    }

    /// Milliseconds elapsed since the timer started.
    pub fn elapsed_ms(&self) -> f64 {
        self.started.elapsed().as_secs_f64() * 1000.0
    }
}
