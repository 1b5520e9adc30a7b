//! Service layer: business logic between the HTTP routes and the dao.

/// OpenAPI documentation generation.
pub mod documentation;
/// Builders for the live feed event payloads.
pub mod feed_events;
/// Live feed subscriptions and SSE streaming.
pub mod feed_service;
/// Health check service.
pub mod health_service;
/// Identity gate and account procedures.
pub mod identity_service;
/// Read-only region and distillery lookups.
pub mod reference_service;
/// Reveal projection joining whiskies with every guess.
pub mod reveal_service;
/// Session creation, joining, and lifecycle advancement.
pub mod session_service;
/// Storage connection supervision and degraded mode handling.
pub mod storage_supervisor;
/// Guess submission and update flow.
pub mod submission_service;
/// Whisky lineup management.
pub mod whisky_service;

#[cfg(test)]
pub(crate) mod test_support;
