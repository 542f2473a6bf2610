//! Survey list filtering by page type.

use serde::{Deserialize, Serialize};

use crate::survey::{PageType, Survey};

/// The active list filter. `selected_type: None` means unfiltered.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FilterState {
    pub selected_type: Option<PageType>,
}

impl FilterState {
    pub fn by_type(page_type: PageType) -> Self {
        Self {
            selected_type: Some(page_type),
        }
    }

    /// Select `page_type`, or clear the filter if it is already selected.
    pub fn toggle(&mut self, page_type: PageType) {
        self.selected_type = if self.selected_type == Some(page_type) {
            None
        } else {
            Some(page_type)
        };
    }

    pub fn clear(&mut self) {
        self.selected_type = None;
    }

    /// Whether a survey passes the filter.
    pub fn matches(&self, survey: &Survey) -> bool {
        match self.selected_type {
            Some(page_type) => survey.has_page_type(page_type),
            None => true,
        }
    }
}

/// Keep the surveys that have at least one page of the selected type,
/// preserving order. Returns the input untouched when no type is selected.
pub fn filter_surveys(mut surveys: Vec<Survey>, filters: &FilterState) -> Vec<Survey> {
    if filters.selected_type.is_some() {
        surveys.retain(|s| filters.matches(s));
    }
    surveys
}
