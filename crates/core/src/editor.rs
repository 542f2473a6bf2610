//! Local editing model for a survey draft.
//!
//! Pages are held in a wide form that carries the fields of every page type.
//! Changing a page's type only flips [`PageLocal::page_type`]; the other
//! fields stay put so switching back restores what the author typed. Only
//! [`SurveyLocal::to_input`] narrows a page down to its active type.
//!
//! Page ids here are editing-session identities: `"1"` for the built-in
//! draft, `"template-<n>"` for template pages, `"local-<uuid>"` for added
//! pages, or the persisted id rendered as a string once a survey was fetched.
//! They never leave this module as store ids; [`PageInput`] has no id.

use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::CoreError;
use crate::survey::{
    non_empty, null_as_default, Page, PageContent, PageInput, PageType, RatingType, Survey,
    SurveyInput, DEFAULT_RATING_SCALE,
};

/// Generate a fresh placeholder id for a page that has not been saved yet.
pub fn new_local_id() -> String {
    format!("local-{}", Uuid::new_v4())
}

// ---------------------------------------------------------------------------
// PageLocal
// ---------------------------------------------------------------------------

/// One page of a draft, carrying every page type's fields.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PageLocal {
    pub id: String,
    #[serde(rename = "type")]
    pub page_type: PageType,
    #[serde(deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(deserialize_with = "null_as_default")]
    pub placeholder: String,
    #[serde(deserialize_with = "null_as_default")]
    pub redirect_url: String,
    #[serde(deserialize_with = "null_as_default")]
    pub link_text: String,
    #[serde(deserialize_with = "null_as_default")]
    pub low_label: String,
    #[serde(deserialize_with = "null_as_default")]
    pub high_label: String,
    pub rating_type: Option<RatingType>,
    pub rating_scale: Option<i32>,
    #[serde(deserialize_with = "null_as_default")]
    pub options: Vec<String>,
    #[serde(deserialize_with = "null_as_default")]
    pub allow_multiple: bool,
}

impl Default for PageLocal {
    fn default() -> Self {
        Self {
            id: String::new(),
            page_type: PageType::Text,
            title: String::new(),
            description: String::new(),
            placeholder: String::new(),
            redirect_url: String::new(),
            link_text: String::new(),
            low_label: String::new(),
            high_label: String::new(),
            rating_type: None,
            rating_scale: None,
            options: Vec::new(),
            allow_multiple: false,
        }
    }
}

impl PageLocal {
    /// A blank page of the given type with the rating defaults pre-filled.
    pub fn new(id: impl Into<String>, page_type: PageType) -> Self {
        Self {
            id: id.into(),
            page_type,
            rating_type: Some(RatingType::Nps),
            rating_scale: Some(DEFAULT_RATING_SCALE),
            ..Self::default()
        }
    }

    /// Widen a persisted page. Fields of inactive types are left blank.
    pub fn from_page(page: &Page) -> Self {
        let mut local = Self {
            id: page.id.to_string(),
            page_type: page.page_type(),
            title: page.title.clone(),
            description: page.description.clone(),
            ..Self::default()
        };

        match &page.content {
            PageContent::Text { placeholder } => {
                local.placeholder = placeholder.clone().unwrap_or_default();
            }
            PageContent::Link {
                redirect_url,
                link_text,
            } => {
                local.redirect_url = redirect_url.clone().unwrap_or_default();
                local.link_text = link_text.clone().unwrap_or_default();
            }
            PageContent::Rating {
                rating_type,
                low_label,
                high_label,
                rating_scale,
            } => {
                local.rating_type = *rating_type;
                local.low_label = low_label.clone().unwrap_or_default();
                local.high_label = high_label.clone().unwrap_or_default();
                local.rating_scale = *rating_scale;
            }
            PageContent::Mcq {
                options,
                allow_multiple,
            } => {
                local.options = options.clone();
                local.allow_multiple = *allow_multiple;
            }
        }

        local
    }

    /// Narrow to the input form: drop the id, keep only the active type's
    /// fields, and turn empty optional text into `None`.
    pub fn to_input(&self) -> PageInput {
        let content = match self.page_type {
            PageType::Text => PageContent::Text {
                placeholder: non_empty(&self.placeholder),
            },
            PageType::Link => PageContent::Link {
                redirect_url: non_empty(&self.redirect_url),
                link_text: non_empty(&self.link_text),
            },
            PageType::Rating => PageContent::Rating {
                rating_type: self.rating_type,
                low_label: non_empty(&self.low_label),
                high_label: non_empty(&self.high_label),
                rating_scale: self.rating_scale,
            },
            PageType::Mcq => PageContent::Mcq {
                options: self.options.clone(),
                allow_multiple: self.allow_multiple,
            },
        };

        PageInput {
            title: self.title.clone(),
            description: self.description.clone(),
            content,
        }
    }

    fn apply(&mut self, field: PageField) {
        match field {
            PageField::Type(t) => self.page_type = t,
            PageField::Title(v) => self.title = v,
            PageField::Description(v) => self.description = v,
            PageField::Placeholder(v) => self.placeholder = v,
            PageField::RedirectUrl(v) => self.redirect_url = v,
            PageField::LinkText(v) => self.link_text = v,
            PageField::LowLabel(v) => self.low_label = v,
            PageField::HighLabel(v) => self.high_label = v,
            PageField::RatingType(t) => self.rating_type = Some(t),
            PageField::RatingScale(s) => self.rating_scale = Some(s),
            PageField::Options(v) => self.options = v,
            PageField::AllowMultiple(b) => self.allow_multiple = b,
        }
    }
}

/// A single field edit on one page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PageField {
    Type(PageType),
    Title(String),
    Description(String),
    Placeholder(String),
    RedirectUrl(String),
    LinkText(String),
    LowLabel(String),
    HighLabel(String),
    RatingType(RatingType),
    RatingScale(i32),
    Options(Vec<String>),
    AllowMultiple(bool),
}

// ---------------------------------------------------------------------------
// SurveyLocal
// ---------------------------------------------------------------------------

/// A survey draft being edited.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyLocal {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<PageLocal>,
}

impl Default for SurveyLocal {
    /// The "Open question" draft offered when no survey or template is
    /// selected. Its single text page is pre-filled for every other type.
    fn default() -> Self {
        Self {
            title: "Open question".into(),
            description: "Gather open-ended thoughts your users have about a topic.".into(),
            pages: vec![PageLocal {
                id: "1".into(),
                page_type: PageType::Text,
                title: "What could we do better".into(),
                description: "Is there anything we could do to make tempo better for you?"
                    .into(),
                placeholder: String::new(),
                redirect_url: "https://tempo.new".into(),
                link_text: "Link Text".into(),
                low_label: "Poor".into(),
                high_label: "Excellent".into(),
                rating_type: Some(RatingType::Nps),
                rating_scale: Some(DEFAULT_RATING_SCALE),
                options: vec!["Excellent".into()],
                allow_multiple: false,
            }],
        }
    }
}

impl SurveyLocal {
    /// Build a draft from a persisted survey. Page ids become the persisted
    /// ids; options keep their persisted order.
    pub fn from_survey(survey: &Survey) -> Self {
        Self {
            title: survey.title.clone(),
            description: survey.description.clone(),
            pages: survey.pages.iter().map(PageLocal::from_page).collect(),
        }
    }

    /// Build the create/update input for this draft.
    pub fn to_input(&self) -> SurveyInput {
        SurveyInput {
            title: self.title.clone(),
            description: self.description.clone(),
            pages: self.pages.iter().map(PageLocal::to_input).collect(),
        }
    }

    pub fn page(&self, page_id: &str) -> Option<&PageLocal> {
        self.pages.iter().find(|p| p.id == page_id)
    }

    fn page_mut(&mut self, page_id: &str) -> Result<&mut PageLocal, CoreError> {
        self.pages
            .iter_mut()
            .find(|p| p.id == page_id)
            .ok_or_else(|| CoreError::Validation(format!("No page with id '{page_id}' in draft")))
    }

    pub fn set_title(&mut self, title: impl Into<String>) {
        self.title = title.into();
    }

    pub fn set_description(&mut self, description: impl Into<String>) {
        self.description = description.into();
    }

    /// Set one field of one page. The draft is unchanged if the page is unknown.
    pub fn apply(&mut self, page_id: &str, field: PageField) -> Result<(), CoreError> {
        self.page_mut(page_id)?.apply(field);
        Ok(())
    }

    /// Append a blank page of the given type and return it.
    pub fn add_page(&mut self, page_type: PageType) -> &PageLocal {
        self.pages.push(PageLocal::new(new_local_id(), page_type));
        &self.pages[self.pages.len() - 1]
    }

    /// Remove a page, returning it if it existed.
    pub fn remove_page(&mut self, page_id: &str) -> Option<PageLocal> {
        let index = self.pages.iter().position(|p| p.id == page_id)?;
        Some(self.pages.remove(index))
    }

    /// Append an option to a page. Surrounding whitespace is trimmed; blank
    /// text is ignored and reported as `Ok(false)`.
    pub fn add_option(&mut self, page_id: &str, text: &str) -> Result<bool, CoreError> {
        let page = self.page_mut(page_id)?;
        let text = text.trim();
        if text.is_empty() {
            return Ok(false);
        }
        page.options.push(text.to_string());
        Ok(true)
    }

    /// Remove the option at `index`, returning it if it existed.
    pub fn remove_option(
        &mut self,
        page_id: &str,
        index: usize,
    ) -> Result<Option<String>, CoreError> {
        let page = self.page_mut(page_id)?;
        if index >= page.options.len() {
            return Ok(None);
        }
        Ok(Some(page.options.remove(index)))
    }

    /// Adopt the store-assigned page ids after a successful save.
    ///
    /// Pages are matched by position, which the save preserves. If the page
    /// counts disagree the draft is rebuilt from the saved survey.
    pub fn resync_ids(&mut self, saved: &Survey) {
        if self.pages.len() != saved.pages.len() {
            *self = Self::from_survey(saved);
            return;
        }
        for (local, page) in self.pages.iter_mut().zip(&saved.pages) {
            local.id = page.id.to_string();
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    /// Stand-in for a store round trip: assign ids in order.
    fn persist(input: &SurveyInput, survey_id: i64, first_page_id: i64) -> Survey {
        Survey {
            id: survey_id,
            title: input.title.clone(),
            description: input.description.clone(),
            user_id: "u1".into(),
            created_at: Utc::now(),
            pages: input
                .pages
                .iter()
                .enumerate()
                .map(|(i, p)| Page {
                    id: first_page_id + i as i64,
                    survey_id,
                    title: p.title.clone(),
                    description: p.description.clone(),
                    content: p.content.clone(),
                })
                .collect(),
        }
    }

    fn authored_draft() -> SurveyLocal {
        let mut text = PageLocal::new("local-a", PageType::Text);
        text.title = "Tell us more".into();
        text.placeholder = "Type here".into();

        let mut link = PageLocal::new("local-b", PageType::Link);
        link.title = "Thanks".into();
        link.redirect_url = "https://tempo.new".into();

        let mut rating = PageLocal::new("local-c", PageType::Rating);
        rating.title = "Rate us".into();
        rating.low_label = "Poor".into();
        rating.high_label = "Excellent".into();
        rating.rating_type = Some(RatingType::Emoji);
        rating.rating_scale = Some(5);

        let mut mcq = PageLocal::new("local-d", PageType::Mcq);
        mcq.title = "Pick".into();
        mcq.options = vec!["B".into(), "A".into(), "B".into(), "".into()];
        mcq.allow_multiple = true;

        // Inactive fields blank; those are not persisted.
        for page in [&mut text, &mut link, &mut mcq] {
            page.rating_type = None;
            page.rating_scale = None;
        }

        SurveyLocal {
            title: "Feedback".into(),
            description: "All types".into(),
            pages: vec![text, link, rating, mcq],
        }
    }

    fn without_ids(mut draft: SurveyLocal) -> SurveyLocal {
        for page in &mut draft.pages {
            page.id.clear();
        }
        draft
    }

    // -- Default draft -------------------------------------------------------

    #[test]
    fn default_draft_has_one_text_page() {
        let draft = SurveyLocal::default();
        assert_eq!(draft.title, "Open question");
        assert_eq!(draft.pages.len(), 1);
        assert_eq!(draft.pages[0].id, "1");
        assert_eq!(draft.pages[0].page_type, PageType::Text);
    }

    // -- to_input ------------------------------------------------------------

    #[test]
    fn to_input_keeps_only_active_fields() {
        let input = SurveyLocal::default().to_input();
        assert_eq!(input.pages.len(), 1);
        assert_eq!(input.pages[0].title, "What could we do better");
        // Empty placeholder is absent, not "".
        assert_eq!(input.pages[0].content, PageContent::Text { placeholder: None });
    }

    #[test]
    fn to_input_maps_blank_labels_to_none() {
        let mut page = PageLocal::new("x", PageType::Rating);
        page.low_label = "Poor".into();
        let input = page.to_input();
        assert_eq!(
            input.content,
            PageContent::Rating {
                rating_type: Some(RatingType::Nps),
                low_label: Some("Poor".into()),
                high_label: None,
                rating_scale: Some(DEFAULT_RATING_SCALE),
            }
        );
    }

    #[test]
    fn to_input_copies_options_verbatim() {
        let draft = authored_draft();
        let input = draft.to_input();
        assert_eq!(
            input.pages[3].content,
            PageContent::Mcq {
                options: vec!["B".into(), "A".into(), "B".into(), "".into()],
                allow_multiple: true,
            }
        );
    }

    #[test]
    fn to_input_preserves_page_order() {
        let types: Vec<PageType> = authored_draft()
            .to_input()
            .pages
            .iter()
            .map(PageInput::page_type)
            .collect();
        assert_eq!(
            types,
            vec![PageType::Text, PageType::Link, PageType::Rating, PageType::Mcq]
        );
    }

    // -- from_survey ---------------------------------------------------------

    #[test]
    fn from_survey_uses_persisted_ids_and_order() {
        let saved = persist(&authored_draft().to_input(), 9, 100);
        let draft = SurveyLocal::from_survey(&saved);
        let ids: Vec<&str> = draft.pages.iter().map(|p| p.id.as_str()).collect();
        assert_eq!(ids, vec!["100", "101", "102", "103"]);
        assert_eq!(draft.pages[3].options, vec!["B", "A", "B", ""]);
    }

    #[test]
    fn from_survey_leaves_inactive_fields_blank() {
        let saved = persist(&SurveyLocal::default().to_input(), 1, 1);
        let page = &SurveyLocal::from_survey(&saved).pages[0];
        assert!(page.options.is_empty());
        assert_eq!(page.low_label, "");
        assert_eq!(page.rating_scale, None);
    }

    #[test]
    fn round_trip_equals_draft_except_ids() {
        let draft = authored_draft();
        let saved = persist(&draft.to_input(), 1, 10);
        let reloaded = SurveyLocal::from_survey(&saved);
        assert_eq!(without_ids(reloaded), without_ids(draft));
    }

    // -- Editing -------------------------------------------------------------

    #[test]
    fn switching_type_preserves_other_fields() {
        let mut draft = SurveyLocal::default();
        draft
            .apply("1", PageField::Type(PageType::Mcq))
            .unwrap();
        draft
            .apply("1", PageField::Options(vec!["Yes".into(), "No".into()]))
            .unwrap();
        draft.apply("1", PageField::Type(PageType::Text)).unwrap();
        draft
            .apply("1", PageField::Placeholder("Say more".into()))
            .unwrap();

        // While text, the input carries no options.
        assert_eq!(
            draft.to_input().pages[0].content,
            PageContent::Text {
                placeholder: Some("Say more".into())
            }
        );

        draft.apply("1", PageField::Type(PageType::Mcq)).unwrap();
        let page = draft.page("1").unwrap();
        assert_eq!(page.options, vec!["Yes", "No"]);
        assert_eq!(page.placeholder, "Say more");
    }

    #[test]
    fn apply_unknown_page_is_an_error_and_leaves_draft_unchanged() {
        let mut draft = SurveyLocal::default();
        let before = draft.clone();
        let result = draft.apply("nope", PageField::Title("x".into()));
        assert!(matches!(result, Err(CoreError::Validation(_))));
        assert_eq!(draft, before);
    }

    #[test]
    fn add_and_remove_pages() {
        let mut draft = SurveyLocal::default();
        let id = draft.add_page(PageType::Rating).id.clone();
        assert!(id.starts_with("local-"));
        assert_eq!(draft.pages.len(), 2);
        assert_eq!(draft.page(&id).unwrap().rating_scale, Some(DEFAULT_RATING_SCALE));

        let removed = draft.remove_page(&id).unwrap();
        assert_eq!(removed.page_type, PageType::Rating);
        assert!(draft.remove_page(&id).is_none());
    }

    #[test]
    fn added_pages_get_distinct_ids() {
        let mut draft = SurveyLocal::default();
        let a = draft.add_page(PageType::Text).id.clone();
        let b = draft.add_page(PageType::Text).id.clone();
        assert_ne!(a, b);
    }

    #[test]
    fn add_option_trims_and_ignores_blank() {
        let mut draft = SurveyLocal::default();
        assert!(draft.add_option("1", "  Good  ").unwrap());
        assert!(!draft.add_option("1", "   ").unwrap());
        assert_eq!(draft.page("1").unwrap().options, vec!["Excellent", "Good"]);
    }

    #[test]
    fn remove_option_by_index() {
        let mut draft = SurveyLocal::default();
        draft.add_option("1", "Good").unwrap();
        assert_eq!(draft.remove_option("1", 0).unwrap(), Some("Excellent".to_string()));
        assert_eq!(draft.remove_option("1", 5).unwrap(), None);
        assert_eq!(draft.page("1").unwrap().options, vec!["Good"]);
        assert!(draft.remove_option("missing", 0).is_err());
    }

    // -- Resync --------------------------------------------------------------

    #[test]
    fn resync_adopts_saved_ids_and_keeps_inactive_fields() {
        let mut draft = SurveyLocal::default();
        let saved = persist(&draft.to_input(), 4, 40);
        draft.resync_ids(&saved);
        assert_eq!(draft.pages[0].id, "40");
        // The text page still remembers its mcq options for a later switch.
        assert_eq!(draft.pages[0].options, vec!["Excellent"]);
    }

    #[test]
    fn resync_with_mismatched_pages_reloads() {
        let mut draft = authored_draft();
        let saved = persist(&SurveyLocal::default().to_input(), 4, 40);
        draft.resync_ids(&saved);
        assert_eq!(draft, SurveyLocal::from_survey(&saved));
    }

    // -- Serde ---------------------------------------------------------------

    #[test]
    fn page_local_tolerates_missing_fields() {
        let page: PageLocal =
            serde_json::from_value(serde_json::json!({"id": "7", "type": "link"})).unwrap();
        assert_eq!(page.page_type, PageType::Link);
        assert_eq!(page.redirect_url, "");
        assert!(page.options.is_empty());
    }

    #[test]
    fn explicit_nulls_read_as_defaults() {
        let draft: SurveyLocal = serde_json::from_value(serde_json::json!({
            "title": "Draft",
            "description": null,
            "pages": [{
                "id": "1",
                "type": "mcq",
                "title": null,
                "placeholder": null,
                "options": null,
                "allow_multiple": null
            }]
        }))
        .unwrap();

        let page = &draft.pages[0];
        assert_eq!(draft.description, "");
        assert_eq!(page.title, "");
        assert_eq!(page.placeholder, "");
        assert!(page.options.is_empty());
        assert!(!page.allow_multiple);

        let empty: SurveyLocal =
            serde_json::from_value(serde_json::json!({"title": "t", "pages": null})).unwrap();
        assert!(empty.pages.is_empty());
    }
}
