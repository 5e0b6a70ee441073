pub mod config;
pub mod db;
pub mod errors;
pub mod format;
pub mod models;
pub mod routes;
pub mod services;
pub mod store;

use crate::store::PgStatStore;

/// Shared application state passed to all Axum handlers.
#[derive(Debug, Clone)]
pub struct AppState {
    pub store: PgStatStore,
    pub config: config::AppConfig,
}
