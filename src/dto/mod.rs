//! Request and response shapes of the HTTP and SSE surface.

use std::time::SystemTime;
use time::{OffsetDateTime, format_description::well_known::Rfc3339};

/// Account administration payloads.
pub mod account;
/// Healthcheck response.
pub mod health;
/// Region and distillery projections.
pub mod reference;
/// Reveal view projection.
pub mod reveal;
/// Session requests and projections.
pub mod session;
/// SSE envelope and handshake payloads.
pub mod sse;
/// Guess submission payloads.
pub mod submission;
/// Validation error mapping.
pub mod validation;
/// Whisky requests and projections.
pub mod whisky;

pub(crate) fn format_system_time(time: SystemTime) -> String {
    OffsetDateTime::from(time)
        .format(&Rfc3339)
        .unwrap_or_else(|_| "invalid-timestamp".into())
}
