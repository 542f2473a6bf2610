//! Route definitions for surveys and drafts.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::survey;
use crate::state::AppState;

/// Survey routes, registered as `/surveys`.
///
/// ```text
/// GET    /                list_surveys (?type=)
/// POST   /                create_survey
/// GET    /{id}            get_survey
/// PUT    /{id}            update_survey
/// DELETE /{id}            delete_survey
/// GET    /{id}/draft      get_survey_draft
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(survey::list_surveys).post(survey::create_survey))
        .route(
            "/{id}",
            get(survey::get_survey)
                .put(survey::update_survey)
                .delete(survey::delete_survey),
        )
        .route("/{id}/draft", get(survey::get_survey_draft))
}

/// Draft routes, registered as `/drafts`.
///
/// ```text
/// POST   /                save_draft
/// ```
pub fn drafts_router() -> Router<AppState> {
    Router::new().route("/", post(survey::save_draft))
}
