//! # Crewbase API Server
//!
//! HTTP server for Crewbase: employee records, projects, and task
//! assignment with role-gated access.
//!
//! ## Usage
//!
//! ```bash
//! cargo run -p crewbase-api
//! ```

use std::sync::Arc;

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use crewbase_api::{
    app::{build_router, AppState},
    config::{Config, StoreBackend},
};
use crewbase_shared::db::{migrations, pool};
use crewbase_shared::store::{memory::MemStore, postgres::PgStore, Store};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "crewbase_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    tracing::info!(
        "Crewbase API Server v{} starting...",
        env!("CARGO_PKG_VERSION")
    );

    let config = Config::from_env()?;

    let store: Arc<dyn Store> = match config.store.backend {
        StoreBackend::Postgres => {
            let url = config.store.database_url.clone().ok_or_else(|| {
                anyhow::anyhow!("DATABASE_URL is required for the postgres backend")
            })?;

            let db_pool = pool::create_pool(pool::DatabaseConfig {
                url,
                max_connections: config.store.max_connections,
                ..Default::default()
            })
            .await?;

            migrations::run_migrations(&db_pool).await?;
            Arc::new(PgStore::new(db_pool))
        }
        StoreBackend::Memory => {
            tracing::warn!("Using in-memory store; data will not survive a restart");
            Arc::new(MemStore::new())
        }
    };

    let bind_address = config.bind_address();
    let state = AppState::new(store, config);
    let app = build_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_address).await?;
    tracing::info!("Server listening on http://{}", bind_address);

    axum::serve(listener, app).await?;

    Ok(())
}
