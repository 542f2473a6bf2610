//! Handlers for the built-in survey templates.

use axum::extract::Path;
use axum::response::IntoResponse;
use axum::Json;

use tempo_core::template::{find_template, templates};

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;

/// GET /templates
pub async fn list_templates(_auth: AuthUser) -> AppResult<impl IntoResponse> {
    Ok(Json(DataResponse { data: templates() }))
}

/// GET /templates/{key}/draft
///
/// A fresh editable draft built from the template.
pub async fn get_template_draft(
    _auth: AuthUser,
    Path(key): Path<String>,
) -> AppResult<impl IntoResponse> {
    let template = find_template(&key)
        .ok_or_else(|| AppError::NotFound(format!("Template '{key}' not found")))?;
    Ok(Json(DataResponse {
        data: template.instantiate(),
    }))
}
