use serde::Serialize;
use utoipa::ToSchema;

/// Response returned by the `/healthcheck` route.
#[derive(Debug, Serialize, ToSchema)]
pub struct HealthResponse {
    /// Health status ("ok" or "degraded").
    pub status: String,
    /// Random key used for the storage probe read.
    pub probe: String,
    /// How many rows the probe read matched (usually zero).
    pub found: u64,
    /// RFC3339 timestamp of the check.
    pub timestamp: String,
}

impl HealthResponse {
    /// Create a health response indicating the system is operational.
    pub fn ok(probe: String, found: u64, timestamp: String) -> Self {
        Self {
            status: "ok".to_string(),
            probe,
            found,
            timestamp,
        }
    }

    /// Create a health response indicating the system is in degraded mode.
    pub fn degraded(probe: String, timestamp: String) -> Self {
        Self {
            status: "degraded".to_string(),
            probe,
            found: 0,
            timestamp,
        }
    }
}
