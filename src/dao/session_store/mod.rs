pub mod memory;
#[cfg(feature = "mongo-store")]
pub mod mongodb;

use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    dao::{
        models::{
            DistilleryEntity, GuessFields, ParticipantEntity, RegionEntity, SessionAggregate,
            SessionEntity, SubmissionEntity, UserProfileEntity, WhiskyEntity, WhiskyFields,
        },
        storage::StorageResult,
    },
    state::lifecycle::Transition,
};

/// Outcome of an idempotent submission upsert.
///
/// The store resolves insert-vs-update atomically on the
/// (`participant_id`, `whisky_id`) uniqueness key; callers never decide this
/// from a client-side cache.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmissionUpsert {
    /// First guess for the pair; a new row was inserted.
    Created(SubmissionEntity),
    /// The pair already had a guess; the row was updated in place.
    Updated(SubmissionEntity),
}

impl SubmissionUpsert {
    /// The stored row regardless of which branch was taken.
    pub fn submission(&self) -> &SubmissionEntity {
        match self {
            SubmissionUpsert::Created(submission) | SubmissionUpsert::Updated(submission) => {
                submission
            }
        }
    }
}

/// Abstraction over the persistence layer for tasting sessions, reference
/// data, and account profiles.
///
/// Methods returning `Option` yield `None` when the addressed session (or
/// row within it) does not exist. Status preconditions are enforced inside
/// the same atomic write and surface as
/// [`StorageError::StatusConflict`](crate::dao::storage::StorageError).
pub trait SessionStore: Send + Sync {
    /// Persist a freshly created session; fails with `CodeTaken` when the
    /// join code collides with an existing session.
    fn create_session(&self, session: SessionEntity)
    -> BoxFuture<'static, StorageResult<SessionEntity>>;

    /// Look up a session by its join code; the code is matched
    /// case-insensitively.
    fn find_session_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>>;

    /// Load the full object graph of a session.
    fn load_aggregate(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SessionAggregate>>>;

    /// Compare-and-swap the session status along a validated transition,
    /// returning the updated row. A concurrent advance surfaces as
    /// `StatusConflict` carrying the status actually found.
    fn advance_status(
        &self,
        session_id: Uuid,
        transition: Transition,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>>;

    /// Add a participant to an existing session. Joining is legal in every
    /// status; late joiners simply see fewer remaining drams.
    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>>;

    /// Append a whisky to the lineup with `order_index` equal to the current
    /// count. Requires the session to be in `waiting`.
    fn insert_whisky(
        &self,
        session_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>>;

    /// Replace the editable attributes of a whisky. Requires `waiting`.
    fn update_whisky(
        &self,
        session_id: Uuid,
        whisky_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>>;

    /// Swap the `order_index` of two whiskies in one atomic write, keeping
    /// the indices pairwise distinct at every observable point. Requires
    /// `waiting`. Returns both rows as stored after the swap.
    fn swap_whisky_order(
        &self,
        session_id: Uuid,
        first: Uuid,
        second: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<(WhiskyEntity, WhiskyEntity)>>>;

    /// Insert or update the guess for a (participant, whisky) pair in one
    /// idempotent write. Requires `collecting`.
    fn upsert_submission(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        whisky_id: Uuid,
        guess: GuessFields,
    ) -> BoxFuture<'static, StorageResult<Option<SubmissionUpsert>>>;

    /// All regions, sorted by name.
    fn list_regions(&self) -> BoxFuture<'static, StorageResult<Vec<RegionEntity>>>;

    /// Distilleries of one region, sorted by name.
    fn distilleries_by_region(
        &self,
        region_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DistilleryEntity>>>;

    /// Fetch an account profile by identity.
    fn find_user_profile(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>>;

    /// Flag an account as disabled, recording who did it and when.
    fn disable_user_account(
        &self,
        user_id: Uuid,
        disabled_by: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>>;

    /// Clear the disabled flag on an account.
    fn enable_user_account(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>>;

    /// Trivial read by a random probe key, returning the number of matching
    /// rows (expected zero). Exists solely to keep a dormant store instance
    /// active.
    fn keep_alive_probe(&self, key: String) -> BoxFuture<'static, StorageResult<u64>>;

    /// Cheap liveness check against the backend.
    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>>;

    /// Attempt to re-establish a dropped backend connection.
    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>>;
}
