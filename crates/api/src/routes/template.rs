use axum::routing::get;
use axum::Router;

use crate::handlers::template;
use crate::state::AppState;

/// Template routes, registered as `/templates`.
///
/// ```text
/// GET    /                list_templates
/// GET    /{key}/draft     get_template_draft
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(template::list_templates))
        .route("/{key}/draft", get(template::get_template_draft))
}
