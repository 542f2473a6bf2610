//! In-memory [`SurveyStore`] for tests and local development.
//!
//! Behaves like the PostgreSQL store minus foreign keys: deleting pages does
//! not remove their options, so the repository's cascade ordering is
//! observable. A single operation can be armed to fail.

use async_trait::async_trait;
use chrono::Utc;
use tempo_core::types::DbId;
use tokio::sync::RwLock;

use crate::models::survey::{
    CreateSurvey, CreateSurveyOption, CreateSurveyPage, SurveyOptionRow, SurveyPageRow,
    SurveyRecord, SurveyRow, UpdateSurvey,
};
use crate::store::{StoreError, SurveyStore};

/// Store operations that can be armed to fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StoreOp {
    InsertSurvey,
    InsertPage,
    InsertOptions,
    SurveyExists,
    FindSurvey,
    ListSurveys,
    ListPageIds,
    DeleteOptions,
    DeletePages,
    UpdateSurvey,
    DeleteSurvey,
}

#[derive(Debug, Clone, Copy)]
struct FailPoint {
    op: StoreOp,
    /// Calls of `op` that still succeed before the failure.
    skip: usize,
}

#[derive(Debug, Default)]
struct Tables {
    surveys: Vec<SurveyRow>,
    pages: Vec<SurveyPageRow>,
    options: Vec<SurveyOptionRow>,
    last_survey_id: DbId,
    last_page_id: DbId,
    last_option_id: DbId,
    fail_point: Option<FailPoint>,
    healthy: bool,
}

impl Tables {
    fn check(&mut self, op: StoreOp) -> Result<(), StoreError> {
        let Some(point) = self.fail_point.as_mut() else {
            return Ok(());
        };
        if point.op != op {
            return Ok(());
        }
        if point.skip > 0 {
            point.skip -= 1;
            return Ok(());
        }
        self.fail_point = None;
        Err(StoreError::Backend(format!("injected failure in {op:?}")))
    }

    fn expand(&self, surveys: Vec<SurveyRow>) -> Vec<SurveyRecord> {
        let ids: Vec<DbId> = surveys.iter().map(|s| s.id).collect();
        let pages: Vec<SurveyPageRow> = self
            .pages
            .iter()
            .filter(|p| ids.contains(&p.survey_id))
            .cloned()
            .collect();
        let options: Vec<SurveyOptionRow> = self
            .options
            .iter()
            .filter(|o| pages.iter().any(|p| p.id == o.page_id))
            .cloned()
            .collect();
        SurveyRecord::assemble(surveys, pages, options)
    }
}

#[derive(Debug)]
pub struct MemorySurveyStore {
    tables: RwLock<Tables>,
}

impl Default for MemorySurveyStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemorySurveyStore {
    pub fn new() -> Self {
        Self {
            tables: RwLock::new(Tables {
                healthy: true,
                ..Tables::default()
            }),
        }
    }

    /// Make the next call of `op` fail.
    pub async fn fail_on(&self, op: StoreOp) {
        self.fail_on_nth(op, 0).await;
    }

    /// Let `skip` calls of `op` succeed, then fail the next one. The failure
    /// fires once.
    pub async fn fail_on_nth(&self, op: StoreOp, skip: usize) {
        self.tables.write().await.fail_point = Some(FailPoint { op, skip });
    }

    /// Toggle the result of [`SurveyStore::ping`].
    pub async fn set_healthy(&self, healthy: bool) {
        self.tables.write().await.healthy = healthy;
    }

    pub async fn survey_count(&self) -> usize {
        self.tables.read().await.surveys.len()
    }

    pub async fn page_count(&self, survey_id: DbId) -> usize {
        let tables = self.tables.read().await;
        tables.pages.iter().filter(|p| p.survey_id == survey_id).count()
    }

    pub async fn option_count(&self) -> usize {
        self.tables.read().await.options.len()
    }

    /// Options whose page no longer exists.
    pub async fn orphaned_option_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables
            .options
            .iter()
            .filter(|o| !tables.pages.iter().any(|p| p.id == o.page_id))
            .count()
    }

    /// Pages whose survey no longer exists.
    pub async fn orphaned_page_count(&self) -> usize {
        let tables = self.tables.read().await;
        tables
            .pages
            .iter()
            .filter(|p| !tables.surveys.iter().any(|s| s.id == p.survey_id))
            .count()
    }
}

#[async_trait]
impl SurveyStore for MemorySurveyStore {
    async fn insert_survey(&self, input: &CreateSurvey) -> Result<SurveyRow, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::InsertSurvey)?;

        tables.last_survey_id += 1;
        let row = SurveyRow {
            id: tables.last_survey_id,
            title: input.title.clone(),
            description: input.description.clone(),
            user_id: input.user_id.clone(),
            created_at: Utc::now(),
        };
        tables.surveys.push(row.clone());
        Ok(row)
    }

    async fn insert_page(&self, input: &CreateSurveyPage) -> Result<SurveyPageRow, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::InsertPage)?;

        tables.last_page_id += 1;
        let row = SurveyPageRow {
            id: tables.last_page_id,
            survey_id: input.survey_id,
            title: input.title.clone(),
            description: input.description.clone(),
            page_type: input.page_type.as_str().to_string(),
            placeholder: input.placeholder.clone(),
            redirect_url: input.redirect_url.clone(),
            link_text: input.link_text.clone(),
            rating_type: input.rating_type.map(|t| t.as_str().to_string()),
            low_label: input.low_label.clone(),
            high_label: input.high_label.clone(),
            rating_scale: input.rating_scale,
            allow_multiple: input.allow_multiple,
        };
        tables.pages.push(row.clone());
        Ok(row)
    }

    async fn insert_options(
        &self,
        options: &[CreateSurveyOption],
    ) -> Result<Vec<SurveyOptionRow>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::InsertOptions)?;

        let mut rows = Vec::with_capacity(options.len());
        for option in options {
            tables.last_option_id += 1;
            rows.push(SurveyOptionRow {
                id: tables.last_option_id,
                page_id: option.page_id,
                option_text: option.option_text.clone(),
            });
        }
        tables.options.extend(rows.iter().cloned());
        Ok(rows)
    }

    async fn survey_exists(&self, id: DbId) -> Result<bool, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::SurveyExists)?;
        Ok(tables.surveys.iter().any(|s| s.id == id))
    }

    async fn find_survey(&self, id: DbId) -> Result<Option<SurveyRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::FindSurvey)?;

        let Some(row) = tables.surveys.iter().find(|s| s.id == id).cloned() else {
            return Ok(None);
        };
        Ok(tables.expand(vec![row]).into_iter().next())
    }

    async fn list_surveys_by_user(&self, user_id: &str) -> Result<Vec<SurveyRecord>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::ListSurveys)?;

        let mut rows: Vec<SurveyRow> = tables
            .surveys
            .iter()
            .filter(|s| s.user_id == user_id)
            .cloned()
            .collect();
        rows.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(tables.expand(rows))
    }

    async fn list_page_ids(&self, survey_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::ListPageIds)?;
        Ok(tables
            .pages
            .iter()
            .filter(|p| p.survey_id == survey_id)
            .map(|p| p.id)
            .collect())
    }

    async fn delete_options_for_pages(&self, page_ids: &[DbId]) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::DeleteOptions)?;

        let before = tables.options.len();
        tables.options.retain(|o| !page_ids.contains(&o.page_id));
        Ok((before - tables.options.len()) as u64)
    }

    async fn delete_pages(&self, survey_id: DbId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::DeletePages)?;

        let before = tables.pages.len();
        tables.pages.retain(|p| p.survey_id != survey_id);
        Ok((before - tables.pages.len()) as u64)
    }

    async fn update_survey(
        &self,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<SurveyRow>, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::UpdateSurvey)?;

        let Some(row) = tables.surveys.iter_mut().find(|s| s.id == id) else {
            return Ok(None);
        };
        row.title = input.title.clone();
        row.description = input.description.clone();
        Ok(Some(row.clone()))
    }

    async fn delete_survey(&self, id: DbId) -> Result<u64, StoreError> {
        let mut tables = self.tables.write().await;
        tables.check(StoreOp::DeleteSurvey)?;

        let before = tables.surveys.len();
        tables.surveys.retain(|s| s.id != id);
        Ok((before - tables.surveys.len()) as u64)
    }

    async fn ping(&self) -> Result<(), StoreError> {
        if self.tables.read().await.healthy {
            Ok(())
        } else {
            Err(StoreError::Backend("store marked unhealthy".into()))
        }
    }
}
