//! The store capability the survey repository runs against.
//!
//! [`SurveyStore`] exposes typed single-table operations. Multi-step
//! sequences (create, replace, delete cascades) live in
//! [`crate::repositories::SurveyRepo`] so every backend gets the same
//! ordering.

use async_trait::async_trait;
use tempo_core::types::DbId;

use crate::models::survey::{
    CreateSurvey, CreateSurveyOption, CreateSurveyPage, SurveyOptionRow, SurveyPageRow,
    SurveyRecord, SurveyRow, UpdateSurvey,
};

pub mod memory;
pub mod postgres;

pub use memory::{MemorySurveyStore, StoreOp};
pub use postgres::PgSurveyStore;

/// Failure inside a store backend.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    /// A persisted value could not be mapped back to the domain model.
    #[error("Malformed stored value: {0}")]
    Decode(String),

    #[error("Store backend error: {0}")]
    Backend(String),
}

#[async_trait]
pub trait SurveyStore: Send + Sync {
    async fn insert_survey(&self, input: &CreateSurvey) -> Result<SurveyRow, StoreError>;

    async fn insert_page(&self, input: &CreateSurveyPage) -> Result<SurveyPageRow, StoreError>;

    /// Insert a batch of options, returning the rows in input order.
    async fn insert_options(
        &self,
        options: &[CreateSurveyOption],
    ) -> Result<Vec<SurveyOptionRow>, StoreError>;

    async fn survey_exists(&self, id: DbId) -> Result<bool, StoreError>;

    /// A survey with its pages and options expanded, or `None`.
    async fn find_survey(&self, id: DbId) -> Result<Option<SurveyRecord>, StoreError>;

    /// Every survey owned by `user_id`, newest first, expanded.
    async fn list_surveys_by_user(&self, user_id: &str) -> Result<Vec<SurveyRecord>, StoreError>;

    /// Page ids of a survey in step order.
    async fn list_page_ids(&self, survey_id: DbId) -> Result<Vec<DbId>, StoreError>;

    async fn delete_options_for_pages(&self, page_ids: &[DbId]) -> Result<u64, StoreError>;

    async fn delete_pages(&self, survey_id: DbId) -> Result<u64, StoreError>;

    /// Update the survey's scalar fields. Returns `None` if it does not exist.
    async fn update_survey(
        &self,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<SurveyRow>, StoreError>;

    /// Delete the survey row. Returns the number of rows removed.
    async fn delete_survey(&self, id: DbId) -> Result<u64, StoreError>;

    /// Cheap connectivity check.
    async fn ping(&self) -> Result<(), StoreError>;
}
