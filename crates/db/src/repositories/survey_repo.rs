//! Survey create/update/delete cascades.
//!
//! Updates replace a survey's pages and options wholesale: delete every
//! option of the survey's pages, delete the pages, insert the new pages in
//! order with their options, then update the survey row. Steps run one at a
//! time; the first failure aborts the rest and nothing already written is
//! rolled back.

use tempo_core::editor::SurveyLocal;
use tempo_core::error::CoreError;
use tempo_core::filter::{filter_surveys, FilterState};
use tempo_core::survey::{PageInput, Survey, SurveyInput};
use tempo_core::types::DbId;

use crate::models::survey::{options_for_page, CreateSurvey, CreateSurveyPage, UpdateSurvey};
use crate::store::{StoreError, SurveyStore};

/// Failure of a repository operation.
#[derive(Debug, thiserror::Error)]
pub enum SurveyError {
    #[error(transparent)]
    Core(#[from] CoreError),

    /// The named store step failed; later steps did not run.
    #[error("{operation} failed: {source}")]
    Store {
        operation: &'static str,
        #[source]
        source: StoreError,
    },
}

impl SurveyError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, SurveyError::Core(CoreError::NotFound { .. }))
    }
}

/// Tag a store error with the step that produced it.
fn step(operation: &'static str) -> impl FnOnce(StoreError) -> SurveyError {
    move |source| SurveyError::Store { operation, source }
}

fn not_found(id: DbId) -> SurveyError {
    SurveyError::Core(CoreError::NotFound {
        entity: "Survey",
        id,
    })
}

/// Provides the survey operations over any [`SurveyStore`].
pub struct SurveyRepo;

impl SurveyRepo {
    /// Create when `existing_id` is `None`, otherwise replace that survey.
    pub async fn save(
        store: &dyn SurveyStore,
        input: &SurveyInput,
        existing_id: Option<DbId>,
        user_id: &str,
    ) -> Result<Survey, SurveyError> {
        match existing_id {
            Some(id) => Self::update(store, id, input).await,
            None => Self::create(store, input, user_id).await,
        }
    }

    /// Insert a survey owned by `user_id`, then its pages and options.
    pub async fn create(
        store: &dyn SurveyStore,
        input: &SurveyInput,
        user_id: &str,
    ) -> Result<Survey, SurveyError> {
        let row = store
            .insert_survey(&CreateSurvey {
                title: input.title.clone(),
                description: input.description.clone(),
                user_id: user_id.to_string(),
            })
            .await
            .map_err(step("insert_survey"))?;

        Self::insert_pages(store, row.id, &input.pages).await?;

        tracing::debug!(
            survey_id = row.id,
            page_count = input.pages.len(),
            "Survey inserted"
        );
        Self::find_by_id(store, row.id).await
    }

    /// Replace the pages and options of survey `id` and update its title
    /// and description.
    pub async fn update(
        store: &dyn SurveyStore,
        id: DbId,
        input: &SurveyInput,
    ) -> Result<Survey, SurveyError> {
        if !store
            .survey_exists(id)
            .await
            .map_err(step("survey_exists"))?
        {
            return Err(not_found(id));
        }

        Self::delete_children(store, id).await?;
        Self::insert_pages(store, id, &input.pages).await?;

        store
            .update_survey(
                id,
                &UpdateSurvey {
                    title: input.title.clone(),
                    description: input.description.clone(),
                },
            )
            .await
            .map_err(step("update_survey"))?
            .ok_or_else(|| not_found(id))?;

        tracing::debug!(
            survey_id = id,
            page_count = input.pages.len(),
            "Survey pages replaced"
        );
        Self::find_by_id(store, id).await
    }

    /// Fetch a survey with its pages and options.
    pub async fn find_by_id(store: &dyn SurveyStore, id: DbId) -> Result<Survey, SurveyError> {
        let record = store
            .find_survey(id)
            .await
            .map_err(step("find_survey"))?
            .ok_or_else(|| not_found(id))?;
        record.into_survey().map_err(step("find_survey"))
    }

    /// The user's surveys, newest first, narrowed by `filters`.
    pub async fn list_for_user(
        store: &dyn SurveyStore,
        user_id: &str,
        filters: &FilterState,
    ) -> Result<Vec<Survey>, SurveyError> {
        let surveys = store
            .list_surveys_by_user(user_id)
            .await
            .map_err(step("list_surveys"))?
            .into_iter()
            .map(|record| record.into_survey())
            .collect::<Result<Vec<_>, _>>()
            .map_err(step("list_surveys"))?;

        Ok(filter_surveys(surveys, filters))
    }

    /// Fetch a survey as an editable draft.
    pub async fn load_editable(store: &dyn SurveyStore, id: DbId) -> Result<SurveyLocal, SurveyError> {
        let survey = Self::find_by_id(store, id).await?;
        Ok(SurveyLocal::from_survey(&survey))
    }

    /// Delete options, pages, then the survey itself.
    pub async fn delete(store: &dyn SurveyStore, id: DbId) -> Result<(), SurveyError> {
        Self::delete_children(store, id).await?;

        let removed = store
            .delete_survey(id)
            .await
            .map_err(step("delete_survey"))?;
        if removed == 0 {
            return Err(not_found(id));
        }

        tracing::debug!(survey_id = id, "Survey deleted");
        Ok(())
    }

    async fn insert_pages(
        store: &dyn SurveyStore,
        survey_id: DbId,
        pages: &[PageInput],
    ) -> Result<(), SurveyError> {
        for page in pages {
            let row = store
                .insert_page(&CreateSurveyPage::from_input(survey_id, page))
                .await
                .map_err(step("insert_page"))?;

            let options = options_for_page(row.id, page);
            if !options.is_empty() {
                store
                    .insert_options(&options)
                    .await
                    .map_err(step("insert_options"))?;
            }
        }
        Ok(())
    }

    async fn delete_children(store: &dyn SurveyStore, survey_id: DbId) -> Result<(), SurveyError> {
        let page_ids = store
            .list_page_ids(survey_id)
            .await
            .map_err(step("list_page_ids"))?;

        if !page_ids.is_empty() {
            store
                .delete_options_for_pages(&page_ids)
                .await
                .map_err(step("delete_options"))?;
        }

        store
            .delete_pages(survey_id)
            .await
            .map_err(step("delete_pages"))?;
        Ok(())
    }
}
