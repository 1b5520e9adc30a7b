//! Persistence layer: domain entities, storage errors, and the pluggable
//! session store backends.

/// Domain entities crossing the dao boundary.
pub mod models;
/// The session store trait and its backends.
pub mod session_store;
/// Storage error types.
pub mod storage;
