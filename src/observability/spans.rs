//! Span Helpers for Poll Tracing

use tracing::{span, Level, Span};

/// Create a span for one poll cycle of an instance
#[inline]
pub fn poll_span(instance: &str, cycle: u64) -> Span {
    span!(
        Level::INFO,
        "redis.poll",
        redis.instance = %instance,
        poll.cycle = cycle
    )
}

/// Create a span for the INFO fetch and extraction
#[inline]
pub fn info_span() -> Span {
    span!(Level::DEBUG, "redis.info")
}

/// Create a span for one latency event
#[inline]
pub fn latency_span(event: &str) -> Span {
    span!(Level::DEBUG, "redis.latency", latency.event = %event)
}
