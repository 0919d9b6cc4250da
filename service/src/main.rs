use std::time::Duration;

use quire_common::MemoryDataService;
use quire_common::data::DataService;
use quire_common::database;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crate::domain::AppState;
use crate::infrastructure::AppStateImpl;
use crate::infrastructure::auth::FixedCredentialVerifier;
use crate::infrastructure::http::{HttpServer, HttpServerConfig};
use crate::infrastructure::persistence::PostgresDataService;
use crate::infrastructure::settings::{Settings, StorageBackend};

mod domain;
mod infrastructure;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let settings = Settings::from_env()?;

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(storage = ?settings.storage.backend, "configuration loaded");

    match settings.storage.backend {
        StorageBackend::Memory => serve(MemoryDataService::blog(), &settings).await,
        StorageBackend::Postgres => {
            let database = database::connect(settings.storage.database()?).await?;
            serve(PostgresDataService::new(database), &settings).await
        }
    }
}

async fn serve(data: impl DataService, settings: &Settings) -> anyhow::Result<()> {
    let verifier = FixedCredentialVerifier::new(&settings.admin);
    let state = AppStateImpl::new(data, verifier, settings.site.clone());

    let sessions = state.sessions().clone();
    let max_idle = settings.sessions.max_idle();
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(Duration::from_secs(60));
        loop {
            ticker.tick().await;
            sessions.purge_idle(max_idle).await;
        }
    });

    let server_config = HttpServerConfig {
        port: &settings.server_port,
    };
    let http_server = HttpServer::new(state, server_config).await?;
    http_server.run().await
}
