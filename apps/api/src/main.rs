//! Fieldkit API composition root.

#![forbid(unsafe_code)]

mod api_config;
mod api_router;
mod dto;
mod error;
mod handlers;
mod middleware;
mod state;

use std::sync::Arc;

use fieldkit_application::{AccessControlService, AuthorizationService, UserAccessService};
use fieldkit_core::AppError;
use fieldkit_infrastructure::{
    PostgresAuthorizationRepository, PostgresDirectoryRepository, PostgresScopedRecordRepository,
    PostgresUserAccessRepository,
};
use sqlx::postgres::PgPoolOptions;
use tracing::info;

use crate::api_config::{ApiConfig, init_tracing};
use crate::state::AppState;

#[tokio::main]
async fn main() -> Result<(), AppError> {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ApiConfig::load()?;

    let pool = PgPoolOptions::new()
        .max_connections(config.database_max_connections)
        .connect(&config.database_url)
        .await
        .map_err(|error| AppError::Internal(format!("failed to connect to database: {error}")))?;

    sqlx::migrate!("../../crates/infrastructure/migrations")
        .run(&pool)
        .await
        .map_err(|error| AppError::Internal(format!("failed to run migrations: {error}")))?;

    if config.migrate_only {
        info!("database migrations applied successfully");
        return Ok(());
    }

    let user_access_repository = Arc::new(PostgresUserAccessRepository::new(pool.clone()));
    let authorization_service = AuthorizationService::new(
        Arc::new(PostgresAuthorizationRepository::new(pool.clone())),
        user_access_repository.clone(),
    );
    let directory = Arc::new(PostgresDirectoryRepository::new(pool.clone()));

    let app_state = AppState {
        user_access_service: UserAccessService::new(
            authorization_service.clone(),
            user_access_repository,
            directory.clone(),
            directory.clone(),
        ),
        access_control_service: AccessControlService::new(
            authorization_service,
            Arc::new(PostgresScopedRecordRepository::new(pool)),
        ),
        user_directory: directory,
        auth_user_header: config.auth_user_header.clone(),
    };

    let app = api_router::build_router(app_state);
    let address = config.socket_address()?;

    let listener = tokio::net::TcpListener::bind(address)
        .await
        .map_err(|error| AppError::Internal(format!("failed to bind listener: {error}")))?;

    info!(%address, "fieldkit-api listening");

    axum::serve(listener, app)
        .await
        .map_err(|error| AppError::Internal(format!("api server error: {error}")))
}
