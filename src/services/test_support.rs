//! Shared fixtures for service-level tests.

use std::sync::Arc;

use crate::{
    config::AppConfig,
    dao::{
        models::{BottlingType, WhiskyFields},
        session_store::memory::MemorySessionStore,
    },
    identity::NoopIdentityProvider,
    state::{AppState, SharedState},
};

pub(crate) struct TestHarness {
    pub state: SharedState,
    pub store: MemorySessionStore,
    pub identity: Arc<NoopIdentityProvider>,
}

pub(crate) async fn harness() -> TestHarness {
    harness_with_store(MemorySessionStore::new()).await
}

pub(crate) async fn harness_with_store(store: MemorySessionStore) -> TestHarness {
    let identity = Arc::new(NoopIdentityProvider::new());
    let state = AppState::new(AppConfig::default(), identity.clone());
    state.install_session_store(Arc::new(store.clone())).await;
    TestHarness {
        state,
        store,
        identity,
    }
}

pub(crate) fn whisky_fields(name: &str) -> WhiskyFields {
    WhiskyFields {
        name: name.to_owned(),
        age: Some(12),
        abv: 46.0,
        region: "Speyside".into(),
        distillery: "Benriach".into(),
        category: "Single Malt".into(),
        bottling_type: BottlingType::Ob,
        cask_type: None,
        host_score: None,
        whiskybase_link: None,
        tasting_reference: None,
    }
}
