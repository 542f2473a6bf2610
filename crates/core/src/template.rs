//! Built-in survey templates offered as starting drafts.

use serde::Serialize;

use crate::editor::{PageLocal, SurveyLocal};
use crate::survey::{PageType, RatingType};

/// Title used when a template has none.
pub const FALLBACK_TITLE: &str = "New Survey";

/// Description used when a template has none.
pub const FALLBACK_DESCRIPTION: &str = "Survey description";

/// A named starting point for a new survey.
#[derive(Debug, Clone, Serialize)]
pub struct SurveyTemplate {
    pub key: &'static str,
    pub title: &'static str,
    pub description: &'static str,
    pub pages: Vec<PageLocal>,
}

impl SurveyTemplate {
    /// Create an editable draft. Page ids are `template-<index>`.
    pub fn instantiate(&self) -> SurveyLocal {
        let or_fallback = |value: &str, fallback: &str| {
            if value.is_empty() {
                fallback.to_string()
            } else {
                value.to_string()
            }
        };

        SurveyLocal {
            title: or_fallback(self.title, FALLBACK_TITLE),
            description: or_fallback(self.description, FALLBACK_DESCRIPTION),
            pages: self
                .pages
                .iter()
                .enumerate()
                .map(|(index, page)| PageLocal {
                    id: format!("template-{index}"),
                    ..page.clone()
                })
                .collect(),
        }
    }
}

fn page(page_type: PageType, title: &str) -> PageLocal {
    PageLocal {
        page_type,
        title: title.to_string(),
        ..PageLocal::default()
    }
}

/// All built-in templates, in display order.
pub fn templates() -> Vec<SurveyTemplate> {
    vec![
        SurveyTemplate {
            key: "text-feedback",
            title: "Text Feedback",
            description: "Collect open-ended feedback using a text input.",
            pages: vec![PageLocal {
                description: "Is there anything we can do to make tempo better for you?".into(),
                placeholder: "Type your answer here".into(),
                ..page(PageType::Text, "What can we do better?")
            }],
        },
        SurveyTemplate {
            key: "rating-feedback",
            title: "Rating Survey",
            description: "Let users rate your product or service.",
            pages: vec![PageLocal {
                description: "Rate from 1 to 5 stars".into(),
                rating_type: Some(RatingType::Number),
                rating_scale: Some(10),
                low_label: "Poor".into(),
                high_label: "Excellent".into(),
                ..page(PageType::Rating, "How satisfied are you?")
            }],
        },
        SurveyTemplate {
            key: "mcq-feedback",
            title: "Multiple Choice",
            description: "Ask a question with several possible answers.",
            pages: vec![PageLocal {
                options: vec!["Search".into(), "Dashboard".into(), "Notifications".into()],
                allow_multiple: false,
                rating_type: Some(RatingType::Number),
                rating_scale: Some(10),
                low_label: "Poor".into(),
                high_label: "Excellent".into(),
                ..page(PageType::Mcq, "What feature do you use the most?")
            }],
        },
        SurveyTemplate {
            key: "link-redirect",
            title: "Link Redirect",
            description: "Send users to a URL after answering a question.",
            pages: vec![PageLocal {
                redirect_url: "https://tempo.new".into(),
                ..page(PageType::Link, "Thanks for your interest!")
            }],
        },
        SurveyTemplate {
            key: "emoji-rating",
            title: "Customer Effort Score",
            description: "Evaluates ease of use. A low score indicates a high level of effort and potential churn.",
            pages: vec![PageLocal {
                rating_type: Some(RatingType::Emoji),
                low_label: "Poor".into(),
                high_label: "Excellent".into(),
                ..page(PageType::Rating, "How easy was it to use our product?")
            }],
        },
    ]
}

/// Look up a template by key.
pub fn find_template(key: &str) -> Option<SurveyTemplate> {
    templates().into_iter().find(|t| t.key == key)
}
