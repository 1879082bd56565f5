use std::sync::Arc;

use yamdb_core::confirmation::ConfirmationCodes;
use yamdb_mail::Mailer;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: yamdb_db::DbPool,
    /// Server configuration.
    pub config: Arc<ServerConfig>,
    /// Signs and verifies signup confirmation codes.
    pub codes: Arc<ConfirmationCodes>,
    /// Delivers confirmation codes.
    pub mailer: Arc<dyn Mailer>,
}

impl AppState {
    pub fn new(pool: yamdb_db::DbPool, config: ServerConfig, mailer: Arc<dyn Mailer>) -> Self {
        let codes = Arc::new(config.codes.build());
        Self {
            pool,
            config: Arc::new(config),
            codes,
            mailer,
        }
    }
}
