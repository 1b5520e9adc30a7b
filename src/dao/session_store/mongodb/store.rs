use std::{sync::Arc, time::SystemTime};

use futures::{TryStreamExt, future::BoxFuture};
use mongodb::{
    Client, Collection, Database,
    bson::{Bson, DateTime, Document, doc, serialize_to_document},
    error::{Error as MongoError, ErrorKind, WriteFailure},
    options::{IndexOptions, ReturnDocument},
};
use tokio::sync::RwLock;
use uuid::Uuid;

use super::{
    config::MongoConfig,
    connection::open_database,
    error::{MongoDaoError, MongoResult},
    models::{
        DISTILLERY_COLLECTION, DistilleryDocument, KEEP_ALIVE_COLLECTION, PROFILE_COLLECTION,
        ParticipantDocument, REGION_COLLECTION, RegionDocument, SESSION_COLLECTION,
        SessionDocument, SubmissionDocument, UserProfileDocument, WhiskyDocument,
    },
};
use crate::{
    dao::{
        models::{
            DistilleryEntity, GuessFields, ParticipantEntity, RegionEntity, SessionAggregate,
            SessionEntity, UserProfileEntity, WhiskyEntity, WhiskyFields,
        },
        session_store::{SessionStore, SubmissionUpsert},
        storage::{StorageError, StorageResult},
    },
    state::lifecycle::{SessionStatus, Transition},
};

/// MongoDB-backed [`SessionStore`].
///
/// Each session's object graph is one document, so status preconditions,
/// the pairwise order swap, and the submission upsert all commit as single
/// atomic document updates.
#[derive(Clone)]
pub struct MongoSessionStore {
    inner: Arc<MongoInner>,
}

struct MongoInner {
    state: RwLock<MongoState>,
    config: MongoConfig,
}

struct MongoState {
    client: Client,
    database: Database,
}

fn is_duplicate_key(err: &MongoError) -> bool {
    matches!(
        *err.kind,
        ErrorKind::Write(WriteFailure::WriteError(ref write_err)) if write_err.code == 11000
    )
}

fn query_error(
    collection: &'static str,
    operation: &'static str,
) -> impl FnOnce(MongoError) -> MongoDaoError {
    move |source| MongoDaoError::Query {
        collection,
        operation,
        source,
    }
}

fn encode_error(detail: &str) -> impl FnOnce(mongodb::bson::error::Error) -> MongoDaoError + '_ {
    move |source| MongoDaoError::CorruptDocument {
        collection: SESSION_COLLECTION,
        detail: format!("{detail}: {source}"),
    }
}

fn pair_condition(participant_id: &str, whisky_id: &str) -> Document {
    doc! {
        "$and": [
            { "$eq": ["$$this.participant_id", participant_id] },
            { "$eq": ["$$this.whisky_id", whisky_id] },
        ]
    }
}

impl MongoSessionStore {
    /// Establish a connection to MongoDB and ensure indexes are present.
    pub async fn connect(config: MongoConfig) -> MongoResult<Self> {
        let (client, database) = open_database(&config).await?;

        let inner = Arc::new(MongoInner {
            state: RwLock::new(MongoState { client, database }),
            config,
        });

        let store = Self { inner };
        store.ensure_indexes().await?;
        Ok(store)
    }

    async fn database(&self) -> Database {
        let guard = self.inner.state.read().await;
        guard.database.clone()
    }

    async fn sessions(&self) -> Collection<SessionDocument> {
        self.database()
            .await
            .collection::<SessionDocument>(SESSION_COLLECTION)
    }

    async fn ensure_indexes(&self) -> MongoResult<()> {
        let database = self.database().await;

        let sessions = database.collection::<Document>(SESSION_COLLECTION);
        let code_index = mongodb::IndexModel::builder()
            .keys(doc! {"code": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("session_code_idx".to_owned()))
                    .unique(Some(true))
                    .build(),
            )
            .build();
        sessions
            .create_index(code_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: SESSION_COLLECTION,
                index: "code",
                source,
            })?;

        let distilleries = database.collection::<Document>(DISTILLERY_COLLECTION);
        let region_index = mongodb::IndexModel::builder()
            .keys(doc! {"region_id": 1})
            .options(
                IndexOptions::builder()
                    .name(Some("distillery_region_idx".to_owned()))
                    .build(),
            )
            .build();
        distilleries
            .create_index(region_index)
            .await
            .map_err(|source| MongoDaoError::EnsureIndex {
                collection: DISTILLERY_COLLECTION,
                index: "region_id",
                source,
            })?;

        Ok(())
    }

    async fn find_session_doc(&self, session_id: &str) -> MongoResult<Option<SessionDocument>> {
        self.sessions()
            .await
            .find_one(doc! {"_id": session_id})
            .await
            .map_err(query_error(SESSION_COLLECTION, "find session"))
    }

    /// Classify a failed preconditioned write: a status mismatch becomes a
    /// [`StorageError::StatusConflict`]; a missing session, or a session in
    /// the required status whose addressed row is absent, signals not-found
    /// (`Ok`).
    async fn precondition_failure(
        &self,
        session_id: &str,
        required: SessionStatus,
    ) -> StorageResult<()> {
        let Some(current) = self.find_session_doc(session_id).await? else {
            return Ok(());
        };
        if current.status != required {
            return Err(StorageError::StatusConflict {
                required,
                actual: current.status,
            });
        }
        Ok(())
    }

    async fn ping(&self) -> MongoResult<()> {
        let database = self.database().await;
        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(|source| MongoDaoError::HealthPing { source })?;
        Ok(())
    }

    async fn reconnect(&self) -> MongoResult<()> {
        let (client, database) = open_database(&self.inner.config).await?;
        let mut guard = self.inner.state.write().await;
        guard.client = client;
        guard.database = database;
        Ok(())
    }

    async fn do_create_session(&self, session: SessionEntity) -> StorageResult<SessionEntity> {
        let document = SessionDocument::from_new_session(&session);
        match self.sessions().await.insert_one(&document).await {
            Ok(_) => Ok(session),
            Err(err) if is_duplicate_key(&err) => Err(StorageError::CodeTaken {
                code: session.code,
            }),
            Err(source) => Err(query_error(SESSION_COLLECTION, "insert session")(source).into()),
        }
    }

    async fn do_find_by_code(&self, code: String) -> StorageResult<Option<SessionEntity>> {
        let normalized = code.to_uppercase();
        let document = self
            .sessions()
            .await
            .find_one(doc! {"code": normalized})
            .await
            .map_err(query_error(SESSION_COLLECTION, "find session by code"))?;
        match document {
            Some(doc) => Ok(Some(doc.to_session_entity()?)),
            None => Ok(None),
        }
    }

    async fn do_load_aggregate(&self, session_id: Uuid) -> StorageResult<Option<SessionAggregate>> {
        let document = self.find_session_doc(&session_id.to_string()).await?;
        match document {
            Some(doc) => Ok(Some(doc.into_aggregate()?)),
            None => Ok(None),
        }
    }

    async fn do_advance_status(
        &self,
        session_id: Uuid,
        transition: Transition,
    ) -> StorageResult<Option<SessionEntity>> {
        let id = session_id.to_string();
        let updated = self
            .sessions()
            .await
            .find_one_and_update(
                doc! {"_id": &id, "status": transition.from.as_str()},
                doc! {"$set": {
                    "status": transition.to.as_str(),
                    "updated_at": DateTime::now(),
                }},
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(SESSION_COLLECTION, "advance status"))?;

        match updated {
            Some(doc) => Ok(Some(doc.to_session_entity()?)),
            None => {
                self.precondition_failure(&id, transition.from).await?;
                Ok(None)
            }
        }
    }

    async fn do_insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> StorageResult<Option<ParticipantEntity>> {
        let document = serialize_to_document(&ParticipantDocument::from_entity(&participant))
            .map_err(encode_error("failed to encode participant"))?;

        let result = self
            .sessions()
            .await
            .update_one(
                doc! {"_id": participant.session_id.to_string()},
                doc! {"$push": {"participants": document}},
            )
            .await
            .map_err(query_error(SESSION_COLLECTION, "insert participant"))?;

        if result.matched_count == 0 {
            Ok(None)
        } else {
            Ok(Some(participant))
        }
    }

    async fn do_insert_whisky(
        &self,
        session_id: Uuid,
        fields: WhiskyFields,
    ) -> StorageResult<Option<WhiskyEntity>> {
        let id = session_id.to_string();
        let whisky_id = Uuid::new_v4();
        let mut whisky_doc = serialize_to_document(&WhiskyDocument::from_fields(
            whisky_id,
            0,
            &fields,
            SystemTime::now(),
        ))
        .map_err(encode_error("failed to encode whisky"))?;
        // The position is computed server-side from the current lineup
        // length, so concurrent appends cannot collide.
        whisky_doc.remove("order_index");

        let pipeline = vec![doc! {
            "$set": {
                "whiskies": {
                    "$concatArrays": [
                        "$whiskies",
                        [{
                            "$mergeObjects": [
                                { "$literal": whisky_doc },
                                { "order_index": { "$size": "$whiskies" } },
                            ]
                        }]
                    ]
                }
            }
        }];

        let updated = self
            .sessions()
            .await
            .find_one_and_update(
                doc! {"_id": &id, "status": SessionStatus::Waiting.as_str()},
                pipeline,
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(SESSION_COLLECTION, "insert whisky"))?;

        match updated {
            Some(doc) => {
                let aggregate = doc.into_aggregate()?;
                Ok(aggregate.whisky(whisky_id).cloned())
            }
            None => {
                self.precondition_failure(&id, SessionStatus::Waiting)
                    .await?;
                Ok(None)
            }
        }
    }

    async fn do_update_whisky(
        &self,
        session_id: Uuid,
        whisky_id: Uuid,
        fields: WhiskyFields,
    ) -> StorageResult<Option<WhiskyEntity>> {
        let id = session_id.to_string();
        let wid = whisky_id.to_string();

        let updated = self
            .sessions()
            .await
            .find_one_and_update(
                doc! {
                    "_id": &id,
                    "status": SessionStatus::Waiting.as_str(),
                    "whiskies.id": &wid,
                },
                doc! {"$set": {
                    "whiskies.$.name": &fields.name,
                    "whiskies.$.age": fields.age,
                    "whiskies.$.abv": fields.abv,
                    "whiskies.$.region": &fields.region,
                    "whiskies.$.distillery": &fields.distillery,
                    "whiskies.$.category": &fields.category,
                    "whiskies.$.bottling_type": fields.bottling_type.as_str(),
                    "whiskies.$.cask_type": fields.cask_type.as_deref(),
                    "whiskies.$.host_score": fields.host_score.map(i32::from),
                    "whiskies.$.whiskybase_link": fields.whiskybase_link.as_deref(),
                    "whiskies.$.tasting_reference": fields.tasting_reference.as_deref(),
                }},
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(SESSION_COLLECTION, "update whisky"))?;

        match updated {
            Some(doc) => {
                let aggregate = doc.into_aggregate()?;
                Ok(aggregate.whisky(whisky_id).cloned())
            }
            None => {
                self.precondition_failure(&id, SessionStatus::Waiting)
                    .await?;
                Ok(None)
            }
        }
    }

    async fn do_swap_whisky_order(
        &self,
        session_id: Uuid,
        first: Uuid,
        second: Uuid,
    ) -> StorageResult<Option<(WhiskyEntity, WhiskyEntity)>> {
        let id = session_id.to_string();
        let first_id = first.to_string();
        let second_id = second.to_string();

        // Both order indices change in one document update; no intermediate
        // state with duplicated indices is ever observable.
        let pipeline = vec![doc! {
            "$set": {
                "whiskies": {
                    "$let": {
                        "vars": {
                            "first": { "$first": { "$filter": {
                                "input": "$whiskies",
                                "cond": { "$eq": ["$$this.id", &first_id] },
                            }}},
                            "second": { "$first": { "$filter": {
                                "input": "$whiskies",
                                "cond": { "$eq": ["$$this.id", &second_id] },
                            }}},
                        },
                        "in": { "$map": {
                            "input": "$whiskies",
                            "in": { "$switch": {
                                "branches": [
                                    {
                                        "case": { "$eq": ["$$this.id", &first_id] },
                                        "then": { "$mergeObjects": [
                                            "$$this",
                                            { "order_index": "$$second.order_index" },
                                        ]},
                                    },
                                    {
                                        "case": { "$eq": ["$$this.id", &second_id] },
                                        "then": { "$mergeObjects": [
                                            "$$this",
                                            { "order_index": "$$first.order_index" },
                                        ]},
                                    },
                                ],
                                "default": "$$this",
                            }},
                        }},
                    }
                }
            }
        }];

        let updated = self
            .sessions()
            .await
            .find_one_and_update(
                doc! {
                    "_id": &id,
                    "status": SessionStatus::Waiting.as_str(),
                    "whiskies.id": { "$all": [&first_id, &second_id] },
                },
                pipeline,
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(SESSION_COLLECTION, "swap whisky order"))?;

        match updated {
            Some(doc) => {
                let aggregate = doc.into_aggregate()?;
                let first_row = aggregate.whisky(first).cloned();
                let second_row = aggregate.whisky(second).cloned();
                Ok(first_row.zip(second_row))
            }
            None => {
                self.precondition_failure(&id, SessionStatus::Waiting)
                    .await?;
                Ok(None)
            }
        }
    }

    async fn do_upsert_submission(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        whisky_id: Uuid,
        guess: GuessFields,
    ) -> StorageResult<Option<SubmissionUpsert>> {
        let id = session_id.to_string();
        let pid = participant_id.to_string();
        let wid = whisky_id.to_string();
        let now = SystemTime::now();

        // Advisory read for created-vs-updated event naming only; the write
        // below resolves insert-vs-update atomically on the pair key.
        let existed = match self.find_session_doc(&id).await? {
            Some(doc) => doc
                .submissions
                .iter()
                .any(|s| s.participant_id == pid && s.whisky_id == wid),
            None => return Ok(None),
        };

        let new_doc = serialize_to_document(&SubmissionDocument::from_guess(
            Uuid::new_v4(),
            participant_id,
            whisky_id,
            &guess,
            now,
        ))
        .map_err(encode_error("failed to encode submission"))?;

        let mut refresh = doc! {
            "guessed_name": &guess.guessed_name,
            "guessed_score": i32::from(guess.guessed_score),
            "guessed_age": guess.guessed_age,
            "guessed_abv": guess.guessed_abv,
            "guessed_region": &guess.guessed_region,
            "guessed_distillery": &guess.guessed_distillery,
            "guessed_category": &guess.guessed_category,
            "guessed_bottling_type": guess.guessed_bottling_type.as_str(),
        };
        refresh.insert("updated_at", Bson::DateTime(DateTime::from_system_time(now)));

        let pipeline = vec![doc! {
            "$set": {
                "submissions": {
                    "$let": {
                        "vars": {
                            "existing": { "$filter": {
                                "input": "$submissions",
                                "cond": pair_condition(&pid, &wid),
                            }},
                        },
                        "in": { "$concatArrays": [
                            { "$filter": {
                                "input": "$submissions",
                                "cond": { "$not": [pair_condition(&pid, &wid)] },
                            }},
                            [{ "$cond": [
                                { "$gt": [{ "$size": "$$existing" }, 0] },
                                { "$mergeObjects": [
                                    { "$first": "$$existing" },
                                    { "$literal": refresh },
                                ]},
                                { "$literal": new_doc },
                            ]}],
                        ]},
                    }
                }
            }
        }];

        let updated = self
            .sessions()
            .await
            .find_one_and_update(
                doc! {
                    "_id": &id,
                    "status": SessionStatus::Collecting.as_str(),
                    "participants.id": &pid,
                    "whiskies.id": &wid,
                },
                pipeline,
            )
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(SESSION_COLLECTION, "upsert submission"))?;

        match updated {
            Some(doc) => {
                let aggregate = doc.into_aggregate()?;
                let Some(stored) = aggregate.submission_for(participant_id, whisky_id).cloned()
                else {
                    return Err(MongoDaoError::CorruptDocument {
                        collection: SESSION_COLLECTION,
                        detail: format!(
                            "submission pair ({pid}, {wid}) missing right after upsert"
                        ),
                    }
                    .into());
                };
                Ok(Some(if existed {
                    SubmissionUpsert::Updated(stored)
                } else {
                    SubmissionUpsert::Created(stored)
                }))
            }
            None => {
                self.precondition_failure(&id, SessionStatus::Collecting)
                    .await?;
                Ok(None)
            }
        }
    }

    async fn do_list_regions(&self) -> StorageResult<Vec<RegionEntity>> {
        let collection = self
            .database()
            .await
            .collection::<RegionDocument>(REGION_COLLECTION);
        let documents: Vec<RegionDocument> = collection
            .find(doc! {})
            .sort(doc! {"name": 1})
            .await
            .map_err(query_error(REGION_COLLECTION, "list regions"))?
            .try_collect()
            .await
            .map_err(query_error(REGION_COLLECTION, "collect regions"))?;

        Ok(documents
            .iter()
            .map(RegionDocument::to_entity)
            .collect::<MongoResult<Vec<_>>>()?)
    }

    async fn do_distilleries_by_region(
        &self,
        region_id: Uuid,
    ) -> StorageResult<Vec<DistilleryEntity>> {
        let collection = self
            .database()
            .await
            .collection::<DistilleryDocument>(DISTILLERY_COLLECTION);
        let documents: Vec<DistilleryDocument> = collection
            .find(doc! {"region_id": region_id.to_string()})
            .sort(doc! {"name": 1})
            .await
            .map_err(query_error(DISTILLERY_COLLECTION, "list distilleries"))?
            .try_collect()
            .await
            .map_err(query_error(DISTILLERY_COLLECTION, "collect distilleries"))?;

        Ok(documents
            .iter()
            .map(DistilleryDocument::to_entity)
            .collect::<MongoResult<Vec<_>>>()?)
    }

    async fn do_find_user_profile(
        &self,
        user_id: Uuid,
    ) -> StorageResult<Option<UserProfileEntity>> {
        let collection = self
            .database()
            .await
            .collection::<UserProfileDocument>(PROFILE_COLLECTION);
        let document = collection
            .find_one(doc! {"_id": user_id.to_string()})
            .await
            .map_err(query_error(PROFILE_COLLECTION, "find profile"))?;
        match document {
            Some(doc) => Ok(Some(doc.to_entity()?)),
            None => Ok(None),
        }
    }

    async fn do_set_account_disabled(
        &self,
        user_id: Uuid,
        disabled_by: Option<Uuid>,
        disabled: bool,
    ) -> StorageResult<Option<UserProfileEntity>> {
        let update = if disabled {
            doc! {"$set": {
                "is_disabled": true,
                "disabled_at": DateTime::now(),
                "disabled_by": disabled_by.map(|id| id.to_string()),
            }}
        } else {
            doc! {"$set": {
                "is_disabled": false,
                "disabled_at": Bson::Null,
                "disabled_by": Bson::Null,
            }}
        };

        let collection = self
            .database()
            .await
            .collection::<UserProfileDocument>(PROFILE_COLLECTION);
        let document = collection
            .find_one_and_update(doc! {"_id": user_id.to_string()}, update)
            .return_document(ReturnDocument::After)
            .await
            .map_err(query_error(PROFILE_COLLECTION, "set disabled flag"))?;
        match document {
            Some(doc) => Ok(Some(doc.to_entity()?)),
            None => Ok(None),
        }
    }

    async fn do_keep_alive_probe(&self, key: String) -> StorageResult<u64> {
        let collection = self
            .database()
            .await
            .collection::<Document>(KEEP_ALIVE_COLLECTION);
        let found = collection
            .count_documents(doc! {"name": key})
            .await
            .map_err(query_error(KEEP_ALIVE_COLLECTION, "keep-alive probe"))?;
        Ok(found)
    }
}

impl SessionStore for MongoSessionStore {
    fn create_session(
        &self,
        session: SessionEntity,
    ) -> BoxFuture<'static, StorageResult<SessionEntity>> {
        let store = self.clone();
        Box::pin(async move { store.do_create_session(session).await })
    }

    fn find_session_by_code(
        &self,
        code: String,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_find_by_code(code).await })
    }

    fn load_aggregate(
        &self,
        session_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<SessionAggregate>>> {
        let store = self.clone();
        Box::pin(async move { store.do_load_aggregate(session_id).await })
    }

    fn advance_status(
        &self,
        session_id: Uuid,
        transition: Transition,
    ) -> BoxFuture<'static, StorageResult<Option<SessionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_advance_status(session_id, transition).await })
    }

    fn insert_participant(
        &self,
        participant: ParticipantEntity,
    ) -> BoxFuture<'static, StorageResult<Option<ParticipantEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_insert_participant(participant).await })
    }

    fn insert_whisky(
        &self,
        session_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_insert_whisky(session_id, fields).await })
    }

    fn update_whisky(
        &self,
        session_id: Uuid,
        whisky_id: Uuid,
        fields: WhiskyFields,
    ) -> BoxFuture<'static, StorageResult<Option<WhiskyEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_update_whisky(session_id, whisky_id, fields).await })
    }

    fn swap_whisky_order(
        &self,
        session_id: Uuid,
        first: Uuid,
        second: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<(WhiskyEntity, WhiskyEntity)>>> {
        let store = self.clone();
        Box::pin(async move { store.do_swap_whisky_order(session_id, first, second).await })
    }

    fn upsert_submission(
        &self,
        session_id: Uuid,
        participant_id: Uuid,
        whisky_id: Uuid,
        guess: GuessFields,
    ) -> BoxFuture<'static, StorageResult<Option<SubmissionUpsert>>> {
        let store = self.clone();
        Box::pin(async move {
            store
                .do_upsert_submission(session_id, participant_id, whisky_id, guess)
                .await
        })
    }

    fn list_regions(&self) -> BoxFuture<'static, StorageResult<Vec<RegionEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_list_regions().await })
    }

    fn distilleries_by_region(
        &self,
        region_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Vec<DistilleryEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_distilleries_by_region(region_id).await })
    }

    fn find_user_profile(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_find_user_profile(user_id).await })
    }

    fn disable_user_account(
        &self,
        user_id: Uuid,
        disabled_by: Option<Uuid>,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_set_account_disabled(user_id, disabled_by, true).await })
    }

    fn enable_user_account(
        &self,
        user_id: Uuid,
    ) -> BoxFuture<'static, StorageResult<Option<UserProfileEntity>>> {
        let store = self.clone();
        Box::pin(async move { store.do_set_account_disabled(user_id, None, false).await })
    }

    fn keep_alive_probe(&self, key: String) -> BoxFuture<'static, StorageResult<u64>> {
        let store = self.clone();
        Box::pin(async move { store.do_keep_alive_probe(key).await })
    }

    fn health_check(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.ping().await?) })
    }

    fn try_reconnect(&self) -> BoxFuture<'static, StorageResult<()>> {
        let store = self.clone();
        Box::pin(async move { Ok(store.reconnect().await?) })
    }
}
