//! PostgreSQL-backed [`SurveyStore`].

use async_trait::async_trait;
use sqlx::{PgPool, Postgres, QueryBuilder};
use tempo_core::survey::RatingType;
use tempo_core::types::DbId;

use crate::models::survey::{
    CreateSurvey, CreateSurveyOption, CreateSurveyPage, SurveyOptionRow, SurveyPageRow,
    SurveyRecord, SurveyRow, UpdateSurvey,
};
use crate::store::{StoreError, SurveyStore};

/// Column list for `surveys` queries.
const SURVEY_COLUMNS: &str = "id, title, description, user_id, created_at";

/// Column list for `survey_pages` queries.
const PAGE_COLUMNS: &str = "id, survey_id, title, description, type, placeholder, \
    redirect_url, link_text, rating_type, low_label, high_label, rating_scale, allow_multiple";

/// Column list for `survey_options` queries.
const OPTION_COLUMNS: &str = "id, page_id, option_text";

#[derive(Debug, Clone)]
pub struct PgSurveyStore {
    pool: PgPool,
}

impl PgSurveyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }

    /// Load pages and options for the given survey rows in two queries.
    async fn expand(&self, surveys: Vec<SurveyRow>) -> Result<Vec<SurveyRecord>, StoreError> {
        if surveys.is_empty() {
            return Ok(Vec::new());
        }
        let survey_ids: Vec<DbId> = surveys.iter().map(|s| s.id).collect();

        let query = format!(
            "SELECT {PAGE_COLUMNS} FROM survey_pages \
             WHERE survey_id = ANY($1) ORDER BY id"
        );
        let pages = sqlx::query_as::<_, SurveyPageRow>(&query)
            .bind(&survey_ids)
            .fetch_all(&self.pool)
            .await?;

        let page_ids: Vec<DbId> = pages.iter().map(|p| p.id).collect();
        let options = if page_ids.is_empty() {
            Vec::new()
        } else {
            let query = format!(
                "SELECT {OPTION_COLUMNS} FROM survey_options \
                 WHERE page_id = ANY($1) ORDER BY id"
            );
            sqlx::query_as::<_, SurveyOptionRow>(&query)
                .bind(&page_ids)
                .fetch_all(&self.pool)
                .await?
        };

        Ok(SurveyRecord::assemble(surveys, pages, options))
    }
}

#[async_trait]
impl SurveyStore for PgSurveyStore {
    async fn insert_survey(&self, input: &CreateSurvey) -> Result<SurveyRow, StoreError> {
        let query = format!(
            "INSERT INTO surveys (title, description, user_id)
             VALUES ($1, $2, $3)
             RETURNING {SURVEY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(&input.title)
            .bind(&input.description)
            .bind(&input.user_id)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_page(&self, input: &CreateSurveyPage) -> Result<SurveyPageRow, StoreError> {
        let query = format!(
            "INSERT INTO survey_pages
                (survey_id, title, description, type, placeholder, redirect_url, link_text,
                 rating_type, low_label, high_label, rating_scale, allow_multiple)
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12)
             RETURNING {PAGE_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SurveyPageRow>(&query)
            .bind(input.survey_id)
            .bind(&input.title)
            .bind(&input.description)
            .bind(input.page_type.as_str())
            .bind(&input.placeholder)
            .bind(&input.redirect_url)
            .bind(&input.link_text)
            .bind(input.rating_type.map(RatingType::as_str))
            .bind(&input.low_label)
            .bind(&input.high_label)
            .bind(input.rating_scale)
            .bind(input.allow_multiple)
            .fetch_one(&self.pool)
            .await?;
        Ok(row)
    }

    async fn insert_options(
        &self,
        options: &[CreateSurveyOption],
    ) -> Result<Vec<SurveyOptionRow>, StoreError> {
        if options.is_empty() {
            return Ok(Vec::new());
        }

        let mut builder =
            QueryBuilder::<Postgres>::new("INSERT INTO survey_options (page_id, option_text) ");
        builder.push_values(options, |mut row, option| {
            row.push_bind(option.page_id).push_bind(&option.option_text);
        });
        builder.push(format!(" RETURNING {OPTION_COLUMNS}"));

        let mut rows = builder
            .build_query_as::<SurveyOptionRow>()
            .fetch_all(&self.pool)
            .await?;
        // RETURNING order is not guaranteed; ids follow VALUES order.
        rows.sort_by_key(|r| r.id);
        Ok(rows)
    }

    async fn survey_exists(&self, id: DbId) -> Result<bool, StoreError> {
        let exists: bool =
            sqlx::query_scalar("SELECT EXISTS(SELECT 1 FROM surveys WHERE id = $1)")
            .bind(id)
            .fetch_one(&self.pool)
            .await?;
        Ok(exists)
    }

    async fn find_survey(&self, id: DbId) -> Result<Option<SurveyRecord>, StoreError> {
        let query = format!("SELECT {SURVEY_COLUMNS} FROM surveys WHERE id = $1");
        let Some(row) = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
        else {
            return Ok(None);
        };
        Ok(self.expand(vec![row]).await?.into_iter().next())
    }

    async fn list_surveys_by_user(&self, user_id: &str) -> Result<Vec<SurveyRecord>, StoreError> {
        let query = format!(
            "SELECT {SURVEY_COLUMNS} FROM surveys
             WHERE user_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        let rows = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(user_id)
            .fetch_all(&self.pool)
            .await?;
        self.expand(rows).await
    }

    async fn list_page_ids(&self, survey_id: DbId) -> Result<Vec<DbId>, StoreError> {
        let ids = sqlx::query_scalar::<_, DbId>(
            "SELECT id FROM survey_pages WHERE survey_id = $1 ORDER BY id",
        )
            .bind(survey_id)
            .fetch_all(&self.pool)
            .await?;
        Ok(ids)
    }

    async fn delete_options_for_pages(&self, page_ids: &[DbId]) -> Result<u64, StoreError> {
        if page_ids.is_empty() {
            return Ok(0);
        }
        let result = sqlx::query("DELETE FROM survey_options WHERE page_id = ANY($1)")
            .bind(page_ids)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn delete_pages(&self, survey_id: DbId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM survey_pages WHERE survey_id = $1")
            .bind(survey_id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn update_survey(
        &self,
        id: DbId,
        input: &UpdateSurvey,
    ) -> Result<Option<SurveyRow>, StoreError> {
        let query = format!(
            "UPDATE surveys SET title = $2, description = $3
             WHERE id = $1
             RETURNING {SURVEY_COLUMNS}"
        );
        let row = sqlx::query_as::<_, SurveyRow>(&query)
            .bind(id)
            .bind(&input.title)
            .bind(&input.description)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row)
    }

    async fn delete_survey(&self, id: DbId) -> Result<u64, StoreError> {
        let result = sqlx::query("DELETE FROM surveys WHERE id = $1")
            .bind(id)
            .execute(&self.pool)
            .await?;
        Ok(result.rows_affected())
    }

    async fn ping(&self) -> Result<(), StoreError> {
        crate::health_check(&self.pool).await?;
        Ok(())
    }
}
