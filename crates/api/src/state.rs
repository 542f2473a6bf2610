use std::sync::Arc;

use tempo_db::store::SurveyStore;

use crate::config::ServerConfig;

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// Cheaply cloneable; everything is behind `Arc`.
#[derive(Clone)]
pub struct AppState {
    /// Survey persistence, PostgreSQL or in-memory.
    pub store: Arc<dyn SurveyStore>,
    pub config: Arc<ServerConfig>,
}
