use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::{dao::models::UserProfileEntity, dto::format_system_time};

/// Request body for disabling an account.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct DisableAccountRequest {
    /// Account of the administrator performing the action.
    pub disabled_by: Option<Uuid>,
}

/// Request body for relaying a password reset to the identity provider.
#[derive(Debug, Deserialize, Validate, ToSchema)]
pub struct PasswordResetRequest {
    /// Address the reset link is sent to.
    #[validate(email)]
    pub email: String,
}

/// Projection of an account profile after a status change.
#[derive(Debug, Serialize, ToSchema)]
pub struct AccountStatusResponse {
    /// Account identifier.
    pub user_id: Uuid,
    /// Whether the account is currently disabled.
    pub is_disabled: bool,
    /// RFC3339 timestamp of when the account was disabled.
    pub disabled_at: Option<String>,
    /// Who disabled the account.
    pub disabled_by: Option<Uuid>,
}

impl From<&UserProfileEntity> for AccountStatusResponse {
    fn from(profile: &UserProfileEntity) -> Self {
        Self {
            user_id: profile.id,
            is_disabled: profile.is_disabled,
            disabled_at: profile.disabled_at.map(format_system_time),
            disabled_by: profile.disabled_by,
        }
    }
}
