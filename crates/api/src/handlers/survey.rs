//! Handlers for surveys and editable drafts.
//!
//! Every survey endpoint is scoped to the authenticated user: lists only
//! return their surveys and single-survey endpoints answer 403 for anyone
//! else's.

use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::Json;
use serde::{Deserialize, Serialize};

use tempo_core::editor::SurveyLocal;
use tempo_core::error::CoreError;
use tempo_core::filter::FilterState;
use tempo_core::survey::{validate_survey_input, PageType, Survey, SurveyInput};
use tempo_core::types::DbId;
use tempo_db::repositories::SurveyRepo;

use crate::error::{AppError, AppResult};
use crate::middleware::auth::AuthUser;
use crate::response::DataResponse;
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Request / response types
// ---------------------------------------------------------------------------

#[derive(Debug, Deserialize)]
pub struct ListSurveysParams {
    /// Page type filter (`text`, `link`, `rating`, `mcq`).
    #[serde(rename = "type")]
    pub page_type: Option<String>,
}

/// Body of `POST /drafts`.
#[derive(Debug, Deserialize)]
pub struct SaveDraftRequest {
    /// Existing survey to replace; absent to create a new one.
    pub survey_id: Option<DbId>,
    pub draft: SurveyLocal,
}

/// A saved survey plus the draft with its page ids resynced.
#[derive(Debug, Serialize)]
pub struct SavedDraft {
    pub survey: Survey,
    pub draft: SurveyLocal,
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

/// Fetch a survey and check the caller owns it.
async fn ensure_owned_survey(state: &AppState, auth: &AuthUser, id: DbId) -> AppResult<Survey> {
    let survey = SurveyRepo::find_by_id(state.store.as_ref(), id).await?;
    auth.ensure_owner(&survey.user_id)?;
    Ok(survey)
}

fn parse_filter(params: &ListSurveysParams) -> AppResult<FilterState> {
    let selected_type = match params.page_type.as_deref() {
        None | Some("") => None,
        Some(raw) => Some(raw.parse::<PageType>().map_err(|e| match e {
            CoreError::Validation(msg) => AppError::BadRequest(msg),
            other => AppError::Core(other),
        })?),
    };
    Ok(FilterState { selected_type })
}

// ---------------------------------------------------------------------------
// Survey CRUD
// ---------------------------------------------------------------------------

/// GET /surveys
///
/// List the caller's surveys, newest first, optionally filtered by `?type=`.
pub async fn list_surveys(
    auth: AuthUser,
    State(state): State<AppState>,
    Query(params): Query<ListSurveysParams>,
) -> AppResult<impl IntoResponse> {
    let filters = parse_filter(&params)?;
    let surveys =
        SurveyRepo::list_for_user(state.store.as_ref(), &auth.user_id, &filters).await?;
    Ok(Json(DataResponse { data: surveys }))
}

/// POST /surveys
pub async fn create_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(input): Json<SurveyInput>,
) -> AppResult<impl IntoResponse> {
    validate_survey_input(&input)?;

    let survey = SurveyRepo::create(state.store.as_ref(), &input, &auth.user_id).await?;

    tracing::info!(
        survey_id = survey.id,
        user_id = %auth.user_id,
        page_count = survey.pages.len(),
        "Survey created"
    );

    Ok((StatusCode::CREATED, Json(DataResponse { data: survey })))
}

/// GET /surveys/{id}
pub async fn get_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let survey = ensure_owned_survey(&state, &auth, id).await?;
    Ok(Json(DataResponse { data: survey }))
}

/// PUT /surveys/{id}
///
/// Replace the survey's pages and options with the submitted ones.
pub async fn update_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
    Json(input): Json<SurveyInput>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_survey(&state, &auth, id).await?;
    validate_survey_input(&input)?;

    let survey = SurveyRepo::update(state.store.as_ref(), id, &input).await?;

    tracing::info!(
        survey_id = id,
        user_id = %auth.user_id,
        page_count = survey.pages.len(),
        "Survey updated"
    );

    Ok(Json(DataResponse { data: survey }))
}

/// DELETE /surveys/{id}
pub async fn delete_survey(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    ensure_owned_survey(&state, &auth, id).await?;
    SurveyRepo::delete(state.store.as_ref(), id).await?;

    tracing::info!(survey_id = id, user_id = %auth.user_id, "Survey deleted");

    Ok(StatusCode::NO_CONTENT)
}

// ---------------------------------------------------------------------------
// Drafts
// ---------------------------------------------------------------------------

/// GET /surveys/{id}/draft
///
/// The survey in its editable form.
pub async fn get_survey_draft(
    auth: AuthUser,
    State(state): State<AppState>,
    Path(id): Path<DbId>,
) -> AppResult<impl IntoResponse> {
    let survey = ensure_owned_survey(&state, &auth, id).await?;
    Ok(Json(DataResponse {
        data: SurveyLocal::from_survey(&survey),
    }))
}

/// POST /drafts
///
/// Create or replace a survey from an editable draft. Responds 201 on create
/// and 200 on update, with the draft's page ids replaced by the stored ones.
pub async fn save_draft(
    auth: AuthUser,
    State(state): State<AppState>,
    Json(request): Json<SaveDraftRequest>,
) -> AppResult<impl IntoResponse> {
    let SaveDraftRequest {
        survey_id,
        mut draft,
    } = request;

    if let Some(id) = survey_id {
        ensure_owned_survey(&state, &auth, id).await?;
    }

    let input = draft.to_input();
    validate_survey_input(&input)?;

    let survey = SurveyRepo::save(state.store.as_ref(), &input, survey_id, &auth.user_id).await?;
    draft.resync_ids(&survey);

    tracing::info!(
        survey_id = survey.id,
        user_id = %auth.user_id,
        created = survey_id.is_none(),
        "Draft saved"
    );

    let status = if survey_id.is_none() {
        StatusCode::CREATED
    } else {
        StatusCode::OK
    };
    Ok((
        status,
        Json(DataResponse {
            data: SavedDraft { survey, draft },
        }),
    ))
}
