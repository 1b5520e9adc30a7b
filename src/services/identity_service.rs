use tracing::warn;
use uuid::Uuid;

use crate::{
    dto::account::AccountStatusResponse,
    error::ServiceError,
    state::SharedState,
};

/// Reject requests from administratively disabled accounts.
///
/// Anonymous requests (`user_id` absent) and accounts whose profile has not
/// been provisioned yet pass. A disabled account is rejected and additionally
/// signed out at the provider, so the client's next auth check lands on the
/// sign-in screen.
pub async fn ensure_active(
    state: &SharedState,
    user_id: Option<Uuid>,
) -> Result<(), ServiceError> {
    let Some(user_id) = user_id else {
        return Ok(());
    };

    let store = state.require_session_store().await?;
    let Some(profile) = store.find_user_profile(user_id).await? else {
        // Profile rows are provisioned asynchronously after sign-up.
        return Ok(());
    };

    if profile.is_disabled {
        if let Err(err) = state.identity().sign_out(user_id).await {
            warn!(%user_id, error = %err, "failed to sign out disabled account at provider");
        }
        return Err(ServiceError::Unauthorized("account is disabled".into()));
    }

    Ok(())
}

/// Disable an account and revoke its provider credentials.
pub async fn disable_account(
    state: &SharedState,
    user_id: Uuid,
    disabled_by: Option<Uuid>,
) -> Result<AccountStatusResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(profile) = store.disable_user_account(user_id, disabled_by).await? else {
        return Err(ServiceError::NotFound(format!(
            "no account with id {user_id}"
        )));
    };

    // The flag is already persisted; a failed sign-out only delays the
    // lockout until the next identity gate check.
    if let Err(err) = state.identity().sign_out(user_id).await {
        warn!(%user_id, error = %err, "failed to sign out disabled account at provider");
    }

    Ok(AccountStatusResponse::from(&profile))
}

/// Re-enable a previously disabled account.
pub async fn enable_account(
    state: &SharedState,
    user_id: Uuid,
) -> Result<AccountStatusResponse, ServiceError> {
    let store = state.require_session_store().await?;
    let Some(profile) = store.enable_user_account(user_id).await? else {
        return Err(ServiceError::NotFound(format!(
            "no account with id {user_id}"
        )));
    };

    Ok(AccountStatusResponse::from(&profile))
}

/// Relay a password reset request to the identity provider.
pub async fn request_password_reset(
    state: &SharedState,
    email: String,
) -> Result<(), ServiceError> {
    state
        .identity()
        .request_password_reset(email)
        .await
        .map_err(Into::into)
}

#[cfg(test)]
mod tests {
    use std::time::SystemTime;

    use super::*;
    use crate::{dao::models::UserProfileEntity, services::test_support};

    fn profile(user_id: Uuid, disabled: bool) -> UserProfileEntity {
        UserProfileEntity {
            id: user_id,
            email: "ben@example.com".into(),
            name: Some("Ben".into()),
            is_disabled: disabled,
            disabled_at: disabled.then(SystemTime::now),
            disabled_by: None,
        }
    }

    #[tokio::test]
    async fn anonymous_and_unprovisioned_accounts_pass() {
        let harness = test_support::harness().await;

        ensure_active(&harness.state, None).await.unwrap();
        // No profile row yet: provisioning lag is tolerated.
        ensure_active(&harness.state, Some(Uuid::new_v4()))
            .await
            .unwrap();
        assert!(harness.identity.signed_out().is_empty());
    }

    #[tokio::test]
    async fn disabled_account_is_rejected_and_signed_out() {
        let harness = test_support::harness().await;
        let user_id = Uuid::new_v4();
        harness.store.put_user_profile(profile(user_id, true));

        let err = ensure_active(&harness.state, Some(user_id))
            .await
            .unwrap_err();

        assert!(matches!(err, ServiceError::Unauthorized(_)));
        assert_eq!(harness.identity.signed_out(), vec![user_id]);
    }

    #[tokio::test]
    async fn disable_then_enable_roundtrip() {
        let harness = test_support::harness().await;
        let user_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();
        harness.store.put_user_profile(profile(user_id, false));

        let disabled = disable_account(&harness.state, user_id, Some(admin_id))
            .await
            .unwrap();
        assert!(disabled.is_disabled);
        assert_eq!(disabled.disabled_by, Some(admin_id));
        assert_eq!(harness.identity.signed_out(), vec![user_id]);

        let enabled = enable_account(&harness.state, user_id).await.unwrap();
        assert!(!enabled.is_disabled);
        assert_eq!(enabled.disabled_at, None);
    }

    #[tokio::test]
    async fn disabling_an_unknown_account_is_not_found() {
        let harness = test_support::harness().await;

        let err = disable_account(&harness.state, Uuid::new_v4(), None)
            .await
            .unwrap_err();
        assert!(matches!(err, ServiceError::NotFound(_)));
    }
}
