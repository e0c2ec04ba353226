//! User Enrichment Service Library
//!
//! HTTP service that stores users enriched with age, gender and nationality
//! looked up from external providers.

pub mod api;
pub mod config;
pub mod enrichment;
pub mod infra;
pub mod lifecycle;
pub mod repository;
pub mod service;

use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;

use sea_orm::DbErr;
use tracing::{info, warn};

use crate::api::{create_router, AppState};
use crate::config::UserServiceConfig;
use crate::enrichment::EnrichmentAggregator;
use crate::infra::Database;
use crate::lifecycle::{shutdown_signal, Lifecycle};
use crate::repository::UserStore;
use crate::service::UserManager;

/// Run the HTTP server until SIGINT or SIGTERM.
pub async fn run_server(config: UserServiceConfig) -> Result<(), Box<dyn std::error::Error>> {
    run_server_until(config, shutdown_signal()).await
}

/// Run the HTTP server until `signal` resolves.
///
/// The database connection is closed on every exit path once it was opened.
pub async fn run_server_until<S>(
    config: UserServiceConfig,
    signal: S,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: Future<Output = ()> + Send + 'static,
{
    let db = Database::connect(&config.database).await?;

    let served = serve(&config, db.clone(), signal).await;

    keep_result(served, db.close().await)
}

/// Log the outcome of closing the database; `result` passes through unchanged.
fn keep_result<T, E>(result: Result<T, E>, closed: Result<(), DbErr>) -> Result<T, E> {
    match closed {
        Ok(()) => info!("Database connection closed"),
        Err(e) => warn!(error = %e, "Failed to close database connection"),
    }
    result
}

async fn serve<S>(
    config: &UserServiceConfig,
    db: Database,
    signal: S,
) -> Result<(), Box<dyn std::error::Error>>
where
    S: Future<Output = ()> + Send + 'static,
{
    // Wire the layers
    let enricher = Arc::new(EnrichmentAggregator::from_config(&config.providers)?);
    let user_repo = Arc::new(UserStore::new(db.get_connection()));
    let user_service = Arc::new(UserManager::new(user_repo, enricher));

    let lifecycle = Lifecycle::new();
    let state = AppState::new(user_service, db, lifecycle.abort());
    let app = create_router(state);

    let addr: SocketAddr = config.service.addr().parse()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    info!("User enrichment service listening on {}", addr);

    let watchdog = lifecycle.watch(signal, config.shutdown_grace());
    let draining = lifecycle.draining();

    let served = axum::serve(listener, app)
        .with_graceful_shutdown(async move { draining.cancelled().await })
        .await;

    watchdog.abort();
    served?;
    info!("Server stopped");

    Ok(())
}

/// Run migrations (for CLI commands).
pub async fn run_migrations(
    config: &UserServiceConfig,
    action: MigrateAction,
) -> Result<(), Box<dyn std::error::Error>> {
    let db = Database::connect_without_migrations(&config.database).await?;

    let result = match action {
        MigrateAction::Up => db.run_migrations().await.map(|()| {
            info!("Migrations applied successfully");
        }),
        MigrateAction::Down => db.rollback_migration().await.map(|()| {
            info!("Rolled back last migration");
        }),
        MigrateAction::Status => db.migration_status().await.map(|status| {
            for (name, applied) in status {
                let marker = if applied { "[x]" } else { "[ ]" };
                println!("{} {}", marker, name);
            }
        }),
        MigrateAction::Fresh => db.fresh_migrations().await.map(|()| {
            info!("Database reset and migrations applied");
        }),
    };

    let closed = db.close().await;
    Ok(keep_result(result, closed)?)
}

/// Migration action type.
#[derive(Debug, Clone, Copy)]
pub enum MigrateAction {
    Up,
    Down,
    Status,
    Fresh,
}
