//! Blind Dram Back binary entrypoint wiring REST, SSE, and storage layers.

use std::{env, net::SocketAddr, sync::Arc};

use anyhow::Context;
use axum::Router;
use tokio::net::TcpListener;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use blind_dram_back::{
    config::AppConfig,
    dao::session_store::{SessionStore, memory::MemorySessionStore},
    identity::{HttpIdentityProvider, IdentityProvider, NoopIdentityProvider},
    routes,
    services::storage_supervisor,
    state::{AppState, SharedState},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    init_tracing();

    let config = AppConfig::load();
    let identity = build_identity_provider(&config)?;
    let app_state = AppState::new(config, identity);

    spawn_storage_supervisor(app_state.clone());
    let app = build_router(app_state);

    let port = env::var("PORT")
        .or_else(|_| env::var("SERVER_PORT"))
        .ok()
        .and_then(|value| value.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!(%addr, "starting server");

    let listener = TcpListener::bind(addr).await.context("binding server")?;
    let service = app.into_make_service();
    axum::serve(listener, service)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("serving axum")?;

    Ok(())
}

/// Construct the identity provider client, falling back to the inert one
/// when no provider is configured.
fn build_identity_provider(config: &AppConfig) -> anyhow::Result<Arc<dyn IdentityProvider>> {
    match HttpIdentityProvider::from_env(config.identity_timeout)
        .context("building identity provider client")?
    {
        Some(provider) => {
            info!("identity provider configured");
            Ok(Arc::new(provider))
        }
        None => {
            info!("no identity provider configured; account checks are inert");
            Ok(Arc::new(NoopIdentityProvider::new()))
        }
    }
}

/// Start the storage supervisor for the backend selected via `STORE_BACKEND`.
fn spawn_storage_supervisor(state: SharedState) {
    let backend = env::var("STORE_BACKEND").unwrap_or_else(|_| default_backend().into());

    match backend.as_str() {
        "memory" => {
            info!("using in-memory session store");
            tokio::spawn(storage_supervisor::run(state, || async {
                Ok(Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>)
            }));
        }
        other => {
            #[cfg(feature = "mongo-store")]
            {
                use blind_dram_back::dao::{
                    session_store::mongodb::{MongoConfig, MongoSessionStore},
                    storage::StorageError,
                };

                info!(backend = other, "using MongoDB session store");
                tokio::spawn(storage_supervisor::run(state, || async {
                    let config = MongoConfig::from_env().await.map_err(StorageError::from)?;
                    let store = MongoSessionStore::connect(config)
                        .await
                        .map_err(StorageError::from)?;
                    Ok(Arc::new(store) as Arc<dyn SessionStore>)
                }));
            }
            #[cfg(not(feature = "mongo-store"))]
            {
                tracing::warn!(
                    backend = other,
                    "mongo-store feature disabled; falling back to in-memory session store"
                );
                tokio::spawn(storage_supervisor::run(state, || async {
                    Ok(Arc::new(MemorySessionStore::new()) as Arc<dyn SessionStore>)
                }));
            }
        }
    }
}

const fn default_backend() -> &'static str {
    if cfg!(feature = "mongo-store") {
        "mongo"
    } else {
        "memory"
    }
}

/// Build the top-level router and attach cross-cutting middleware layers.
fn build_router(state: SharedState) -> Router<()> {
    routes::router(state)
        .layer(CorsLayer::permissive())
        .layer(TraceLayer::new_for_http())
}

/// Configure tracing subscribers so logs include spans by default.
fn init_tracing() {
    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info,tower_http=debug".into());
    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Wait for Ctrl+C or SIGTERM and shut the server down gracefully.
async fn shutdown_signal() {
    #[cfg(unix)]
    {
        use tokio::signal::unix::{SignalKind, signal};

        let mut term = signal(SignalKind::terminate()).expect("install SIGTERM handler");
        tokio::select! {
            _ = tokio::signal::ctrl_c() => {},
            _ = term.recv() => {},
        }
    }

    #[cfg(not(unix))]
    {
        let _ = tokio::signal::ctrl_c().await;
    }
}
