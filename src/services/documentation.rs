use utoipa::OpenApi;

#[derive(OpenApi)]
/// Aggregated OpenAPI specification for Blind Dram Back.
#[openapi(
    paths(
        crate::routes::health::healthcheck,
        crate::routes::sse::session_events,
        crate::routes::session::create_session,
        crate::routes::session::join_session,
        crate::routes::session::get_session,
        crate::routes::session::advance_status,
        crate::routes::whisky::add_whisky,
        crate::routes::whisky::update_whisky,
        crate::routes::whisky::reorder_whisky,
        crate::routes::submission::submit_guess,
        crate::routes::submission::reveal,
        crate::routes::reference::list_regions,
        crate::routes::reference::list_distilleries,
        crate::routes::account::disable_account,
        crate::routes::account::enable_account,
        crate::routes::account::password_reset,
    ),
    components(
        schemas(
            crate::dto::health::HealthResponse,
            crate::dto::sse::Handshake,
            crate::dto::sse::SessionUpdatedEvent,
            crate::dto::sse::ParticipantJoinedEvent,
            crate::dto::sse::WhiskyCreatedEvent,
            crate::dto::sse::WhiskyUpdatedEvent,
            crate::dto::sse::WhiskyReorderedEvent,
            crate::dto::sse::SubmissionEvent,
            crate::dto::session::CreateSessionRequest,
            crate::dto::session::JoinSessionRequest,
            crate::dto::session::AdvanceStatusRequest,
            crate::dto::session::SessionSummary,
            crate::dto::session::ParticipantSummary,
            crate::dto::session::SessionAggregateResponse,
            crate::dto::session::JoinSessionResponse,
            crate::dto::whisky::WhiskyInput,
            crate::dto::whisky::ReorderDirection,
            crate::dto::whisky::ReorderRequest,
            crate::dto::whisky::WhiskySummary,
            crate::dto::whisky::ReorderResponse,
            crate::dto::submission::GuessInput,
            crate::dto::submission::SubmitGuessRequest,
            crate::dto::submission::SubmissionSummary,
            crate::dto::submission::SubmitGuessResponse,
            crate::dto::reveal::RevealedGuess,
            crate::dto::reveal::RevealedWhisky,
            crate::dto::reveal::RevealResponse,
            crate::dto::reference::RegionSummary,
            crate::dto::reference::DistillerySummary,
            crate::dto::account::DisableAccountRequest,
            crate::dto::account::PasswordResetRequest,
            crate::dto::account::AccountStatusResponse,
            crate::state::lifecycle::SessionStatus,
            crate::dao::models::BottlingType,
        )
    ),
    tags(
        (name = "health", description = "Health check endpoints"),
        (name = "feed", description = "Per-session server-sent event feed"),
        (name = "session", description = "Session creation, joining, and lifecycle"),
        (name = "whisky", description = "Host-side whisky lineup management"),
        (name = "submission", description = "Guess submission and the reveal view"),
        (name = "reference", description = "Read-only regions and distilleries"),
        (name = "account", description = "Account admin procedures"),
    )
)]
pub struct ApiDoc;
