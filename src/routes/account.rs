use axum::{
    Json, Router,
    extract::{Path, State},
    http::StatusCode,
    routing::post,
};
use uuid::Uuid;
use validator::Validate;

use crate::{
    dto::account::{AccountStatusResponse, DisableAccountRequest, PasswordResetRequest},
    error::AppError,
    services::identity_service,
    state::SharedState,
};

/// Routes exposing the account admin procedures.
pub fn router() -> Router<SharedState> {
    Router::new()
        .route("/accounts/{id}/disable", post(disable_account))
        .route("/accounts/{id}/enable", post(enable_account))
        .route("/accounts/password-reset", post(password_reset))
}

/// Disable an account and revoke its credentials at the identity provider.
#[utoipa::path(
    post,
    path = "/accounts/{id}/disable",
    tag = "account",
    params(("id" = Uuid, Path, description = "Identifier of the account")),
    request_body = DisableAccountRequest,
    responses(
        (status = 200, description = "Account disabled", body = AccountStatusResponse),
        (status = 404, description = "Account does not exist")
    )
)]
pub async fn disable_account(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
    payload: Option<Json<DisableAccountRequest>>,
) -> Result<Json<AccountStatusResponse>, AppError> {
    let disabled_by = payload.map(|Json(body)| body.disabled_by).unwrap_or(None);
    let response = identity_service::disable_account(&state, id, disabled_by).await?;
    Ok(Json(response))
}

/// Re-enable a previously disabled account.
#[utoipa::path(
    post,
    path = "/accounts/{id}/enable",
    tag = "account",
    params(("id" = Uuid, Path, description = "Identifier of the account")),
    responses(
        (status = 200, description = "Account enabled", body = AccountStatusResponse),
        (status = 404, description = "Account does not exist")
    )
)]
pub async fn enable_account(
    State(state): State<SharedState>,
    Path(id): Path<Uuid>,
) -> Result<Json<AccountStatusResponse>, AppError> {
    let response = identity_service::enable_account(&state, id).await?;
    Ok(Json(response))
}

/// Relay a password reset request to the identity provider.
#[utoipa::path(
    post,
    path = "/accounts/password-reset",
    tag = "account",
    request_body = PasswordResetRequest,
    responses(
        (status = 204, description = "Reset relayed to the provider"),
        (status = 503, description = "Provider unreachable or timed out")
    )
)]
pub async fn password_reset(
    State(state): State<SharedState>,
    Json(payload): Json<PasswordResetRequest>,
) -> Result<StatusCode, AppError> {
    payload.validate()?;
    identity_service::request_password_reset(&state, payload.email).await?;
    Ok(StatusCode::NO_CONTENT)
}
