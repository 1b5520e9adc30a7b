//! In-memory [`SessionStore`] backend.
//!
//! Used for development without a database and throughout the test suite.
//! Each session's object graph lives under a single map entry, so the entry
//! lock gives the same per-session write atomicity the document store
//! provides.

use std::{sync::Arc, time::SystemTime};

use dashmap::{DashMap, mapref::entry::Entry};
use futures::future::BoxFuture;
use uuid::Uuid;

use crate::{
    dao::{
        models::{
            DistilleryEntity, GuessFields, ParticipantEntity, RegionEntity, SessionAggregate,
            SessionEntity, SubmissionEntity, UserProfileEntity, WhiskyEntity, WhiskyFields,
        },
        session_store::{SessionStore, SubmissionUpsert},
        storage::{StorageError, StorageResult},
    },
    state::lifecycle::{SessionStatus, Transition},
};

/// Process-local store keeping every session aggregate in a [`DashMap`].
#[derive(Clone, Default)]
pub struct MemorySessionStore {
    inner: Arc<MemoryInner>,
}

#[derive(Default)]
struct MemoryInner {
    sessions: DashMap<Uuid, SessionAggregate>,
    codes: DashMap<String, Uuid>,
    regions: Vec<RegionEntity>,
    distilleries: Vec<DistilleryEntity>,
    profiles: DashMap<Uuid, UserProfileEntity>,
}

impl MemorySessionStore {
    /// Create an empty store with no reference data.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a store seeded with region and distillery reference rows.
    pub fn with_reference_data(
        mut regions: Vec<RegionEntity>,
        mut distilleries: Vec<DistilleryEntity>,
    ) -> Self {
        regions.sort_by(|a, b| a.name.cmp(&b.name));
        distilleries.sort_by(|a, b| a.name.cmp(&b.name));
        Self {
            inner: Arc::new(MemoryInner {
                regions,
                distilleries,
                ..MemoryInner::default()
            }),
        }
    }

    /// Insert or replace an account profile. Profiles are provisioned by the
    /// identity provider in production; this hook stands in for that.
    pub fn put_user_profile(&self, profile: UserProfileEntity) {
        self.inner.profiles.insert(profile.id, profile);
    }
}

impl MemoryInner {
    fn with_session<T>(
        &self,
        session_id: Uuid,
        apply: impl FnOnce(&mut SessionAggregate) -> StorageResult<T>,
    ) -> StorageResult<Option<T>> {
        match self.sessions.get_mut(&session_id) {
            Some(mut doc) => apply(&mut doc).map(Some),
            None => Ok(None),
        }
    }
}

fn require_status(actual: SessionStatus, required: SessionStatus) -> StorageResult<()> {
    if actual == required {
        Ok(())
    } else {
        Err(StorageError::StatusConflict { required, actual })
    }
}

impl SessionStore for MemorySessionStore {
    fn create_session(
        &self,
        session: SessionEntity,
    ) -> BoxFuture<'static, StorageResult<SessionEntity>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            match inner.codes.entry(session.code.clone()) {
                Entry::Occupied(_) => Err(StorageError::CodeTaken {
                    code: session.code.clone(),
                }),
                Entry::Vacant(slot) => {
                    slot.insert(session.id);
                    inner.sessions.insert(
                        session.id,
                        SessionAggregate {
                            session: session.clone(),
                            participants: Vec::new(),
                            whiskies: Vec::new(),
                            submissions: Vec::new(),
                        },
                    );
                    Ok(session)
                }
            }
        })
    }

    fn find_session_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let normalized = code.to_uppercase();
            let Some(session_id) = inner.codes.get(&normalized).map(|id| *id) else {
                return Ok(None);
            };
            Ok(inner
                .sessions
                .get(&session_id)
                .map(|doc| doc.session.clone()))
        })
    }

    fn load_aggregate(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SessionAggregate>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner.sessions.get(&session_id).map(|doc| {
                let mut aggregate = doc.clone();
                aggregate.whiskies.sort_by_key(|w| w.order_index);
                aggregate
            }))
        })
    }

    fn advance_status(
        &self,
        session_id: Uuid,
        transition: Transition,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.with_session(session_id, |doc| {
                require_status(doc.session.status, transition.from)?;
                doc.session.status = transition.to;
                doc.session.updated_at = SystemTime::now();
                Ok(doc.session.clone())
            })
        })
    }

    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.with_session(participant.session_id, |doc| {
                doc.participants.push(participant.clone());
                Ok(participant)
            })
        })
    }

    fn insert_whisky(
        &self,
        session_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            inner.with_session(session_id, |doc| {
                require_status(doc.session.status, SessionStatus::Waiting)?;
                let whisky = WhiskyEntity {
                    id: Uuid::new_v4(),
                    session_id,
                    order_index: doc.whiskies.len() as u32,
                    fields,
                    created_at: SystemTime::now(),
                };
                doc.whiskies.push(whisky.clone());
                Ok(whisky)
            })
        })
    }

    fn update_whisky(
        &self,
        session_id: Uuid,
        whisky_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let updated = inner.with_session(session_id, |doc| {
                require_status(doc.session.status, SessionStatus::Waiting)?;
                let whisky = doc.whiskies.iter_mut().find(|w| w.id == whisky_id);
                Ok(whisky.map(|w| {
                    w.fields = fields;
                    w.clone()
                }))
            })?;
            Ok(updated.flatten())
        })
    }

    fn swap_whisky_order(
        &self,
        session_id: Uuid,
        first: Uuid,
        second: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<(WhiskyEntity, WhiskyEntity)>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let swapped = inner.with_session(session_id, |doc| {
                require_status(doc.session.status, SessionStatus::Waiting)?;
                let first_pos = doc.whiskies.iter().position(|w| w.id == first);
                let second_pos = doc.whiskies.iter().position(|w| w.id == second);
                let (Some(a), Some(b)) = (first_pos, second_pos) else {
                    return Ok(None);
                };

                // Both rows sit under the same entry lock; the swap is
                // observed all-or-nothing.
                let index_a = doc.whiskies[a].order_index;
                let index_b = doc.whiskies[b].order_index;
                doc.whiskies[a].order_index = index_b;
                doc.whiskies[b].order_index = index_a;
                Ok(Some((doc.whiskies[a].clone(), doc.whiskies[b].clone())))
            })?;
            Ok(swapped.flatten())
        })
    }

    fn upsert_submission(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        whisky_id: Uuid,
        guess: GuessFields,
    ) -> BoxFuture<'static, StorageResult<Option<SubmissionUpsert>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            let outcome = inner.with_session(session_id, |doc| {
                require_status(doc.session.status, SessionStatus::Collecting)?;

                let participant_known = doc.participants.iter().any(|p| p.id == participant_id);
                let whisky_known = doc.whiskies.iter().any(|w| w.id == whisky_id);
                if !participant_known || !whisky_known {
                    return Ok(None);
                }

                let now = SystemTime::now();
                let existing = doc
                    .submissions
                    .iter_mut()
                    .find(|s| s.participant_id == participant_id && s.whisky_id == whisky_id);

                match existing {
                    Some(submission) => {
                        submission.guess = guess;
                        submission.updated_at = now;
                        Ok(Some(SubmissionUpsert::Updated(submission.clone())))
                    }
                    None => {
                        let submission = SubmissionEntity {
                            id: Uuid::new_v4(),
                            session_id,
                            participant_id,
                            whisky_id,
                            guess,
                            created_at: now,
                            updated_at: now,
                        };
                        doc.submissions.push(submission.clone());
                        Ok(Some(SubmissionUpsert::Created(submission)))
                    }
                }
            })?;
            Ok(outcome.flatten())
        })
    }

    fn list_regions(&self) -> BoxFuture<'static, StorageResult<Vec<RegionEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.regions.clone()) })
    }

    fn distilleries_by_region(
        &self,
        region_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DistilleryEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner
                .distilleries
                .iter()
                .filter(|d| d.region_id == region_id)
                .cloned()
                .collect())
        })
    }

    fn find_user_profile(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move { Ok(inner.profiles.get(&user_id).map(|p| p.clone())) })
    }

    fn disable_user_account(
        &self,
        user_id: Uuid,
        disabled_by: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner.profiles.get_mut(&user_id).map(|mut profile| {
                profile.is_disabled = true;
                profile.disabled_at = Some(SystemTime::now());
                profile.disabled_by = disabled_by;
                profile.clone()
            }))
        })
    }

    fn enable_user_account(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let inner = self.inner.clone();
        Box::pin(async move {
            Ok(inner.profiles.get_mut(&user_id).map(|mut profile| {
                profile.is_disabled = false;
                profile.disabled_at = None;
                profile.disabled_by = None;
                profile.clone()
            }))
        })
    }

    fn keep_alive_probe(&self, _key: String) -> BoxFuture<'static, StorageResult<u64>> {
        // The probe key is random; an empty table never matches.
        Box::pin(async move { Ok(0) })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        Box::pin(async move { Ok(()) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dao::models::BottlingType;

    fn session(code: &str) -> SessionEntity {
        SessionEntity {
            id: Uuid::new_v4(),
            code: code.to_string(),
            host_name: "Sam".to_string(),
            host_user_id: None,
            status: SessionStatus::initial(),
            created_at: SystemTime::now(),
            updated_at: SystemTime::now(),
        }
    }

    fn whisky_fields(name: &str) -> WhiskyFields {
        WhiskyFields {
            name: name.to_string(),
            age: Some(15),
            abv: 46.0,
            region: "Speyside".to_string(),
            distillery: "Glenfarclas".to_string(),
            category: "Single Malt".to_string(),
            bottling_type: BottlingType::Ob,
            cask_type: None,
            host_score: None,
            whiskybase_link: None,
            tasting_reference: None,
        }
    }

    fn guess(name: &str, score: u8) -> GuessFields {
        GuessFields {
            guessed_name: name.to_string(),
            guessed_score: score,
            guessed_age: Some(12),
            guessed_abv: 43.0,
            guessed_region: "Speyside".to_string(),
            guessed_distillery: "Macallan".to_string(),
            guessed_category: "Single Malt".to_string(),
            guessed_bottling_type: BottlingType::Ob,
        }
    }

    async fn participant(store: &MemorySessionStore, session_id: Uuid) -> ParticipantEntity {
        store
            .insert_participant(ParticipantEntity {
                id: Uuid::new_v4(),
                session_id,
                name: "Ben".to_string(),
                user_id: None,
                created_at: SystemTime::now(),
            })
            .await
            .unwrap()
            .unwrap()
    }

    #[tokio::test]
    async fn code_lookup_is_case_insensitive() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("AB12CD")).await.unwrap();

        let found = store
            .find_session_by_code("ab12cd".to_string())
            .await
            .unwrap()
            .unwrap();
        assert_eq!(found.id, created.id);
    }

    #[tokio::test]
    async fn duplicate_code_is_rejected() {
        let store = MemorySessionStore::new();
        store.create_session(session("AB12CD")).await.unwrap();

        let err = store.create_session(session("AB12CD")).await.unwrap_err();
        assert!(matches!(err, StorageError::CodeTaken { code } if code == "AB12CD"));
    }

    #[tokio::test]
    async fn whiskies_are_appended_in_order() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ1")).await.unwrap();

        for name in ["First", "Second", "Third"] {
            store
                .insert_whisky(created.id, whisky_fields(name))
                .await
                .unwrap()
                .unwrap();
        }

        let aggregate = store.load_aggregate(created.id).await.unwrap().unwrap();
        let indices: Vec<u32> = aggregate.whiskies.iter().map(|w| w.order_index).collect();
        assert_eq!(indices, vec![0, 1, 2]);
    }

    #[tokio::test]
    async fn whisky_insert_requires_waiting() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ2")).await.unwrap();
        store
            .insert_whisky(created.id, whisky_fields("Only"))
            .await
            .unwrap()
            .unwrap();
        store
            .advance_status(
                created.id,
                SessionStatus::Waiting
                    .advance_to(SessionStatus::Collecting)
                    .unwrap(),
            )
            .await
            .unwrap()
            .unwrap();

        let err = store
            .insert_whisky(created.id, whisky_fields("Late"))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::StatusConflict {
                required: SessionStatus::Waiting,
                actual: SessionStatus::Collecting,
            }
        ));
    }

    #[tokio::test]
    async fn swap_keeps_order_indices_distinct() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ3")).await.unwrap();

        let first = store
            .insert_whisky(created.id, whisky_fields("First"))
            .await
            .unwrap()
            .unwrap();
        let second = store
            .insert_whisky(created.id, whisky_fields("Second"))
            .await
            .unwrap()
            .unwrap();

        let (a, b) = store
            .swap_whisky_order(created.id, second.id, first.id)
            .await
            .unwrap()
            .unwrap();
        assert_eq!(a.order_index, 0);
        assert_eq!(b.order_index, 1);

        let aggregate = store.load_aggregate(created.id).await.unwrap().unwrap();
        assert_eq!(aggregate.whiskies[0].fields.name, "Second");
        assert_eq!(aggregate.whiskies[1].fields.name, "First");
        assert_ne!(
            aggregate.whiskies[0].order_index,
            aggregate.whiskies[1].order_index
        );
    }

    #[tokio::test]
    async fn submitting_twice_updates_the_single_row() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ4")).await.unwrap();
        let whisky = store
            .insert_whisky(created.id, whisky_fields("Mystery"))
            .await
            .unwrap()
            .unwrap();
        let ben = participant(&store, created.id).await;
        store
            .advance_status(
                created.id,
                SessionStatus::Waiting
                    .advance_to(SessionStatus::Collecting)
                    .unwrap(),
            )
            .await
            .unwrap()
            .unwrap();

        let first = store
            .upsert_submission(created.id, ben.id, whisky.id, guess("Macallan 12", 3))
            .await
            .unwrap()
            .unwrap();
        assert!(matches!(&first, SubmissionUpsert::Created(_)));

        let second = store
            .upsert_submission(created.id, ben.id, whisky.id, guess("Glenlivet 18", 4))
            .await
            .unwrap()
            .unwrap();
        let SubmissionUpsert::Updated(updated) = second else {
            panic!("second submit must update, not insert");
        };
        assert_eq!(updated.guess.guessed_name, "Glenlivet 18");
        assert_eq!(updated.guess.guessed_score, 4);

        let aggregate = store.load_aggregate(created.id).await.unwrap().unwrap();
        assert_eq!(aggregate.submissions.len(), 1);
        assert_eq!(
            aggregate.submissions[0].guess.guessed_name,
            "Glenlivet 18"
        );
        assert_eq!(first.submission().id, aggregate.submissions[0].id);
    }

    #[tokio::test]
    async fn submissions_are_rejected_outside_collecting() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ5")).await.unwrap();
        let whisky = store
            .insert_whisky(created.id, whisky_fields("Mystery"))
            .await
            .unwrap()
            .unwrap();
        let ben = participant(&store, created.id).await;

        let err = store
            .upsert_submission(created.id, ben.id, whisky.id, guess("Macallan 12", 3))
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::StatusConflict {
                required: SessionStatus::Collecting,
                actual: SessionStatus::Waiting,
            }
        ));
    }

    #[tokio::test]
    async fn stale_status_advance_is_rejected() {
        let store = MemorySessionStore::new();
        let created = store.create_session(session("QQQQQ6")).await.unwrap();
        store
            .insert_whisky(created.id, whisky_fields("Only"))
            .await
            .unwrap()
            .unwrap();

        let transition = SessionStatus::Waiting
            .advance_to(SessionStatus::Collecting)
            .unwrap();
        store
            .advance_status(created.id, transition)
            .await
            .unwrap()
            .unwrap();

        // Replaying the same transition must fail: the stored status moved on.
        let err = store
            .advance_status(created.id, transition)
            .await
            .unwrap_err();
        assert!(matches!(
            err,
            StorageError::StatusConflict {
                required: SessionStatus::Waiting,
                actual: SessionStatus::Collecting,
            }
        ));
    }

    #[tokio::test]
    async fn disable_and_enable_roundtrip() {
        let store = MemorySessionStore::new();
        let user_id = Uuid::new_v4();
        let admin_id = Uuid::new_v4();
        store.put_user_profile(UserProfileEntity {
            id: user_id,
            email: "ben@example.com".to_string(),
            name: Some("Ben".to_string()),
            is_disabled: false,
            disabled_at: None,
            disabled_by: None,
        });

        let disabled = store
            .disable_user_account(user_id, Some(admin_id))
            .await
            .unwrap()
            .unwrap();
        assert!(disabled.is_disabled);
        assert_eq!(disabled.disabled_by, Some(admin_id));

        let enabled = store.enable_user_account(user_id).await.unwrap().unwrap();
        assert!(!enabled.is_disabled);
        assert_eq!(enabled.disabled_at, None);
    }

    #[tokio::test]
    async fn missing_session_reads_return_none() {
        let store = MemorySessionStore::new();
        assert!(
            store
                .find_session_by_code("NOSUCH".to_string())
                .await
                .unwrap()
                .is_none()
        );
        assert!(
            store
                .load_aggregate(Uuid::new_v4())
                .await
                .unwrap()
                .is_none()
        );
    }
}
