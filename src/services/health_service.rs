use std::time::SystemTime;

use rand::Rng;
use tracing::warn;

use crate::{dto::health::HealthResponse, state::SharedState};

const PROBE_KEY_LENGTH: usize = 12;
const PROBE_ALPHABET: &[u8] = b"abcdefghijklmnopqrstuvwxyz0123456789";

/// Respond with a liveness payload backed by a storage probe read.
///
/// The probe queries a random key, so a healthy answer is almost always
/// zero matching rows; what matters is that the round trip succeeded.
/// Storage trouble reports `degraded` without failing the request.
pub async fn health_status(state: &SharedState) -> HealthResponse {
    let probe = generate_probe_key();
    let timestamp = crate::dto::format_system_time(SystemTime::now());

    match state.require_session_store().await {
        Ok(store) => match store.keep_alive_probe(probe.clone()).await {
            Ok(found) => HealthResponse::ok(probe, found, timestamp),
            Err(err) => {
                warn!(error = %err, "storage keep-alive probe failed");
                HealthResponse::degraded(probe, timestamp)
            }
        },
        Err(_) => {
            warn!("storage unavailable (degraded mode)");
            HealthResponse::degraded(probe, timestamp)
        }
    }
}

fn generate_probe_key() -> String {
    let mut rng = rand::rng();
    (0..PROBE_KEY_LENGTH)
        .map(|_| {
            let idx = rng.random_range(0..PROBE_ALPHABET.len());
            PROBE_ALPHABET[idx] as char
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn probe_keys_are_lowercase_alphanumeric() {
        let key = generate_probe_key();
        assert_eq!(key.len(), PROBE_KEY_LENGTH);
        assert!(key.chars().all(|c| c.is_ascii_lowercase() || c.is_ascii_digit()));
    }
}
