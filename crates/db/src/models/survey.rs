//! Survey, page, and option rows.
//!
//! Pages store every type-specific column side by side; only the columns of
//! the row's `type` are populated. [`SurveyRecord::into_survey`] lifts the
//! flat rows back into the tagged [`PageContent`] model.

use std::collections::HashMap;

use serde::Serialize;
use sqlx::FromRow;
use tempo_core::survey::{Page, PageContent, PageInput, PageType, RatingType, Survey};
use tempo_core::types::{DbId, Timestamp};

use crate::store::StoreError;

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// A row from the `surveys` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyRow {
    pub id: DbId,
    pub title: String,
    pub description: String,
    pub user_id: String,
    pub created_at: Timestamp,
}

/// A row from the `survey_pages` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyPageRow {
    pub id: DbId,
    pub survey_id: DbId,
    pub title: String,
    pub description: String,
    #[sqlx(rename = "type")]
    pub page_type: String,
    pub placeholder: Option<String>,
    pub redirect_url: Option<String>,
    pub link_text: Option<String>,
    pub rating_type: Option<String>,
    pub low_label: Option<String>,
    pub high_label: Option<String>,
    pub rating_scale: Option<i32>,
    pub allow_multiple: bool,
}

/// A row from the `survey_options` table.
#[derive(Debug, Clone, FromRow, Serialize)]
pub struct SurveyOptionRow {
    pub id: DbId,
    pub page_id: DbId,
    pub option_text: String,
}

// ---------------------------------------------------------------------------
// DTOs
// ---------------------------------------------------------------------------

/// DTO for creating a new survey row.
#[derive(Debug, Clone)]
pub struct CreateSurvey {
    pub title: String,
    pub description: String,
    pub user_id: String,
}

/// DTO for updating a survey's own scalar fields.
#[derive(Debug, Clone)]
pub struct UpdateSurvey {
    pub title: String,
    pub description: String,
}

/// DTO for inserting a page row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSurveyPage {
    pub survey_id: DbId,
    pub title: String,
    pub description: String,
    pub page_type: PageType,
    pub placeholder: Option<String>,
    pub redirect_url: Option<String>,
    pub link_text: Option<String>,
    pub rating_type: Option<RatingType>,
    pub low_label: Option<String>,
    pub high_label: Option<String>,
    pub rating_scale: Option<i32>,
    pub allow_multiple: bool,
}

impl CreateSurveyPage {
    /// Flatten a page input into columns. Options are inserted separately.
    pub fn from_input(survey_id: DbId, page: &PageInput) -> Self {
        let mut row = Self {
            survey_id,
            title: page.title.clone(),
            description: page.description.clone(),
            page_type: page.page_type(),
            placeholder: None,
            redirect_url: None,
            link_text: None,
            rating_type: None,
            low_label: None,
            high_label: None,
            rating_scale: None,
            allow_multiple: false,
        };

        match &page.content {
            PageContent::Text { placeholder } => {
                row.placeholder = placeholder.clone();
            }
            PageContent::Link {
                redirect_url,
                link_text,
            } => {
                row.redirect_url = redirect_url.clone();
                row.link_text = link_text.clone();
            }
            PageContent::Rating {
                rating_type,
                low_label,
                high_label,
                rating_scale,
            } => {
                row.rating_type = *rating_type;
                row.low_label = low_label.clone();
                row.high_label = high_label.clone();
                row.rating_scale = *rating_scale;
            }
            PageContent::Mcq { allow_multiple, .. } => {
                row.allow_multiple = *allow_multiple;
            }
        }
        row
    }
}

/// DTO for inserting one option row.
#[derive(Debug, Clone, PartialEq)]
pub struct CreateSurveyOption {
    pub page_id: DbId,
    pub option_text: String,
}

// ---------------------------------------------------------------------------
// Nested records
// ---------------------------------------------------------------------------

/// A page row with its option rows in insertion order.
#[derive(Debug, Clone)]
pub struct PageRecord {
    pub page: SurveyPageRow,
    pub options: Vec<SurveyOptionRow>,
}

/// A survey row with its pages in step order.
#[derive(Debug, Clone)]
pub struct SurveyRecord {
    pub survey: SurveyRow,
    pub pages: Vec<PageRecord>,
}

impl SurveyRecord {
    /// Group page and option rows under their surveys.
    ///
    /// Surveys keep the given order; pages and options keep the order in
    /// which they are passed (callers pass them sorted by id). Rows whose
    /// parent is not in the input are dropped.
    pub fn assemble(
        surveys: Vec<SurveyRow>,
        pages: Vec<SurveyPageRow>,
        options: Vec<SurveyOptionRow>,
    ) -> Vec<SurveyRecord> {
        let mut options_by_page: HashMap<DbId, Vec<SurveyOptionRow>> = HashMap::new();
        for option in options {
            options_by_page.entry(option.page_id).or_default().push(option);
        }

        let mut pages_by_survey: HashMap<DbId, Vec<PageRecord>> = HashMap::new();
        for page in pages {
            let options = options_by_page.remove(&page.id).unwrap_or_default();
            pages_by_survey
                .entry(page.survey_id)
                .or_default()
                .push(PageRecord { page, options });
        }

        surveys
            .into_iter()
            .map(|survey| SurveyRecord {
                pages: pages_by_survey.remove(&survey.id).unwrap_or_default(),
                survey,
            })
            .collect()
    }

    /// Convert to the domain model. Fails only on a malformed stored `type`
    /// or `rating_type`.
    pub fn into_survey(self) -> Result<Survey, StoreError> {
        let pages = self
            .pages
            .into_iter()
            .map(PageRecord::into_page)
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Survey {
            id: self.survey.id,
            title: self.survey.title,
            description: self.survey.description,
            user_id: self.survey.user_id,
            created_at: self.survey.created_at,
            pages,
        })
    }
}

impl PageRecord {
    /// Lift the flat row into its tagged content. Columns that belong to
    /// other page types are ignored.
    pub fn into_page(self) -> Result<Page, StoreError> {
        let row = self.page;
        let page_type: PageType = row.page_type.parse().map_err(|_| {
            StoreError::Decode(format!(
                "survey_pages.type '{}' on page {}",
                row.page_type, row.id
            ))
        })?;

        let content = match page_type {
            PageType::Text => PageContent::Text {
                placeholder: row.placeholder,
            },
            PageType::Link => PageContent::Link {
                redirect_url: row.redirect_url,
                link_text: row.link_text,
            },
            PageType::Rating => {
                let rating_type = row
                    .rating_type
                    .as_deref()
                    .map(str::parse::<RatingType>)
                    .transpose()
                    .map_err(|_| {
                        StoreError::Decode(format!(
                            "survey_pages.rating_type '{}' on page {}",
                            row.rating_type.as_deref().unwrap_or_default(),
                            row.id
                        ))
                    })?;
                PageContent::Rating {
                    rating_type,
                    low_label: row.low_label,
                    high_label: row.high_label,
                    rating_scale: row.rating_scale,
                }
            }
            PageType::Mcq => PageContent::Mcq {
                options: self.options.into_iter().map(|o| o.option_text).collect(),
                allow_multiple: row.allow_multiple,
            },
        };

        Ok(Page {
            id: row.id,
            survey_id: row.survey_id,
            title: row.title,
            description: row.description,
            content,
        })
    }
}

/// Option rows for an mcq page input; empty for every other type.
pub fn options_for_page(page_id: DbId, page: &PageInput) -> Vec<CreateSurveyOption> {
    page.content
        .options()
        .iter()
        .map(|text| CreateSurveyOption {
            page_id,
            option_text: text.clone(),
        })
        .collect()
}
