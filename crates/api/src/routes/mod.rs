pub mod health;
pub mod survey;
pub mod template;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// Route hierarchy:
///
/// ```text
/// /surveys                       list (?type=), create
/// /surveys/{id}                  get, update, delete (owner only)
/// /surveys/{id}/draft            editable form (owner only)
///
/// /drafts                        save a draft (create or update)
///
/// /templates                     list built-in templates
/// /templates/{key}/draft         instantiate a template
/// ```
///
/// Every route requires a Bearer token.
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/surveys", survey::router())
        .nest("/drafts", survey::drafts_router())
        .nest("/templates", template::router())
}
