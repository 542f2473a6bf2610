//! Survey model shared by the persisted and input representations.
//!
//! Page-type specific fields live in [`PageContent`], a tagged variant with
//! one case per page type. The wide editing form lives in [`crate::editor`].

use std::fmt;
use std::str::FromStr;
use std::sync::LazyLock;

use regex::Regex;
use serde::{Deserialize, Deserializer, Serialize};

use crate::error::CoreError;
use crate::types::{DbId, Timestamp, UserId};

// ---------------------------------------------------------------------------
// Limits
// ---------------------------------------------------------------------------

/// Maximum length of a survey or page title.
pub const MAX_TITLE_LEN: usize = 200;

/// Maximum length of a survey or page description.
pub const MAX_DESCRIPTION_LEN: usize = 2000;

/// Maximum number of pages in one survey.
pub const MAX_PAGES: usize = 50;

/// Maximum number of options on a multiple-choice page.
pub const MAX_OPTIONS: usize = 50;

/// Maximum length of a single option text.
pub const MAX_OPTION_LEN: usize = 200;

/// Smallest allowed rating scale.
pub const MIN_RATING_SCALE: i32 = 1;

/// Largest allowed rating scale.
pub const MAX_RATING_SCALE: i32 = 10;

/// Rating scale used by new rating pages.
pub const DEFAULT_RATING_SCALE: i32 = 10;

static REDIRECT_URL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^https?://[^\s/?#]+[^\s]*$").expect("valid regex"));

// ---------------------------------------------------------------------------
// Page and rating types
// ---------------------------------------------------------------------------

/// The kind of a survey page. Determines which type-specific fields are active.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PageType {
    Text,
    Link,
    Rating,
    Mcq,
}

impl PageType {
    /// All page types, in the order the editor offers them.
    pub const ALL: [PageType; 4] = [
        PageType::Text,
        PageType::Link,
        PageType::Rating,
        PageType::Mcq,
    ];

    /// Stored and wire name (`text`, `link`, `rating`, `mcq`).
    pub fn as_str(self) -> &'static str {
        match self {
            PageType::Text => "text",
            PageType::Link => "link",
            PageType::Rating => "rating",
            PageType::Mcq => "mcq",
        }
    }

    /// Human-readable label.
    pub fn label(self) -> &'static str {
        match self {
            PageType::Text => "Text",
            PageType::Link => "Link",
            PageType::Rating => "Rating",
            PageType::Mcq => "Multi-Choice",
        }
    }
}

impl fmt::Display for PageType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PageType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PageType::ALL
            .into_iter()
            .find(|t| t.as_str() == s)
            .ok_or_else(|| {
                CoreError::Validation(format!(
                    "Invalid page type '{s}'. Must be one of: text, link, rating, mcq"
                ))
            })
    }
}

/// How a rating page renders its scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum RatingType {
    #[serde(alias = "nps")]
    Nps,
    #[serde(alias = "number")]
    Number,
    #[serde(alias = "emoji")]
    Emoji,
}

impl RatingType {
    pub fn as_str(self) -> &'static str {
        match self {
            RatingType::Nps => "NPS",
            RatingType::Number => "NUMBER",
            RatingType::Emoji => "EMOJI",
        }
    }
}

impl fmt::Display for RatingType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for RatingType {
    type Err = CoreError;

    /// Case-insensitive: older templates stored `number` and `emoji`.
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "NPS" => Ok(RatingType::Nps),
            "NUMBER" => Ok(RatingType::Number),
            "EMOJI" => Ok(RatingType::Emoji),
            _ => Err(CoreError::Validation(format!(
                "Invalid rating type '{s}'. Must be one of: NPS, NUMBER, EMOJI"
            ))),
        }
    }
}

// ---------------------------------------------------------------------------
// Page content
// ---------------------------------------------------------------------------

/// Type-specific page fields. Serialized inline with a `type` tag, so a page
/// reads as `{"type": "mcq", "options": [...], "allow_multiple": false}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum PageContent {
    Text {
        placeholder: Option<String>,
    },
    Link {
        redirect_url: Option<String>,
        link_text: Option<String>,
    },
    Rating {
        rating_type: Option<RatingType>,
        low_label: Option<String>,
        high_label: Option<String>,
        rating_scale: Option<i32>,
    },
    Mcq {
        #[serde(default, deserialize_with = "null_as_default")]
        options: Vec<String>,
        #[serde(default, deserialize_with = "null_as_default")]
        allow_multiple: bool,
    },
}

impl PageContent {
    /// Content of the given type with every field absent.
    pub fn empty(page_type: PageType) -> Self {
        match page_type {
            PageType::Text => PageContent::Text { placeholder: None },
            PageType::Link => PageContent::Link {
                redirect_url: None,
                link_text: None,
            },
            PageType::Rating => PageContent::Rating {
                rating_type: None,
                low_label: None,
                high_label: None,
                rating_scale: None,
            },
            PageType::Mcq => PageContent::Mcq {
                options: Vec::new(),
                allow_multiple: false,
            },
        }
    }

    pub fn page_type(&self) -> PageType {
        match self {
            PageContent::Text { .. } => PageType::Text,
            PageContent::Link { .. } => PageType::Link,
            PageContent::Rating { .. } => PageType::Rating,
            PageContent::Mcq { .. } => PageType::Mcq,
        }
    }

    /// Option texts of a multiple-choice page; empty for every other type.
    pub fn options(&self) -> &[String] {
        match self {
            PageContent::Mcq { options, .. } => options,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Persisted survey
// ---------------------------------------------------------------------------

/// A persisted page with its options flattened into the content.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page {
    pub id: DbId,
    pub survey_id: DbId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(flatten)]
    pub content: PageContent,
}

impl Page {
    pub fn page_type(&self) -> PageType {
        self.content.page_type()
    }
}

/// A persisted survey with its pages in step order.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Survey {
    pub id: DbId,
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    pub user_id: UserId,
    pub created_at: Timestamp,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<Page>,
}

impl Survey {
    /// `true` if at least one page has the given type.
    pub fn has_page_type(&self, page_type: PageType) -> bool {
        self.pages.iter().any(|p| p.page_type() == page_type)
    }
}

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// A page as submitted for create/update. Carries no id.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PageInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(flatten)]
    pub content: PageContent,
}

impl PageInput {
    pub fn page_type(&self) -> PageType {
        self.content.page_type()
    }
}

/// DTO for creating or replacing a survey and all of its pages.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SurveyInput {
    #[serde(default, deserialize_with = "null_as_default")]
    pub title: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub description: String,
    #[serde(default, deserialize_with = "null_as_default")]
    pub pages: Vec<PageInput>,
}

/// Deserialize an explicit `null` the same as a missing field.
pub fn null_as_default<'de, D, T>(deserializer: D) -> Result<T, D::Error>
where
    D: Deserializer<'de>,
    T: Default + Deserialize<'de>,
{
    Ok(Option::<T>::deserialize(deserializer)?.unwrap_or_default())
}

/// `None` for the empty string. Used to avoid persisting meaningless empty
/// columns.
pub fn non_empty(value: &str) -> Option<String> {
    if value.is_empty() {
        None
    } else {
        Some(value.to_string())
    }
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

/// Validate a survey title (non-blank, <= 200 chars).
pub fn validate_survey_title(title: &str) -> Result<(), CoreError> {
    if title.trim().is_empty() {
        return Err(CoreError::Validation("Survey title must not be empty".into()));
    }
    if title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Survey title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    Ok(())
}

/// Validate a rating scale against the slider bounds.
pub fn validate_rating_scale(scale: i32) -> Result<(), CoreError> {
    if !(MIN_RATING_SCALE..=MAX_RATING_SCALE).contains(&scale) {
        return Err(CoreError::Validation(format!(
            "Rating scale must be between {MIN_RATING_SCALE} and {MAX_RATING_SCALE}, got {scale}"
        )));
    }
    Ok(())
}

/// Validate a redirect target (absolute http or https URL).
pub fn validate_redirect_url(url: &str) -> Result<(), CoreError> {
    if !REDIRECT_URL_RE.is_match(url) {
        return Err(CoreError::Validation(format!(
            "Redirect URL '{url}' must be an http:// or https:// URL"
        )));
    }
    Ok(())
}

/// Validate multiple-choice options (count and per-option length).
pub fn validate_options(options: &[String]) -> Result<(), CoreError> {
    if options.len() > MAX_OPTIONS {
        return Err(CoreError::Validation(format!(
            "A page may have at most {MAX_OPTIONS} options"
        )));
    }
    if let Some(long) = options
        .iter()
        .find(|o| o.chars().count() > MAX_OPTION_LEN)
    {
        return Err(CoreError::Validation(format!(
            "Option '{}...' exceeds {MAX_OPTION_LEN} characters",
            long.chars().take(20).collect::<String>()
        )));
    }
    Ok(())
}

fn validate_page(index: usize, page: &PageInput) -> Result<(), CoreError> {
    let step = index + 1;
    if page.title.chars().count() > MAX_TITLE_LEN {
        return Err(CoreError::Validation(format!(
            "Page {step}: title must be at most {MAX_TITLE_LEN} characters"
        )));
    }
    if page.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Page {step}: description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }

    let in_page = |err: CoreError| match err {
        CoreError::Validation(msg) => CoreError::Validation(format!("Page {step}: {msg}")),
        other => other,
    };

    match &page.content {
        PageContent::Text { .. } => {}
        PageContent::Link { redirect_url, .. } => {
            if let Some(url) = redirect_url {
                validate_redirect_url(url).map_err(in_page)?;
            }
        }
        PageContent::Rating { rating_scale, .. } => {
            if let Some(scale) = rating_scale {
                validate_rating_scale(*scale).map_err(in_page)?;
            }
        }
        PageContent::Mcq { options, .. } => validate_options(options).map_err(in_page)?,
    }
    Ok(())
}

/// Validate a full survey input before it is saved.
///
/// The repository layer does not call this; it is a helper for whichever
/// surface accepts user input.
pub fn validate_survey_input(input: &SurveyInput) -> Result<(), CoreError> {
    validate_survey_title(&input.title)?;
    if input.description.chars().count() > MAX_DESCRIPTION_LEN {
        return Err(CoreError::Validation(format!(
            "Survey description must be at most {MAX_DESCRIPTION_LEN} characters"
        )));
    }
    if input.pages.len() > MAX_PAGES {
        return Err(CoreError::Validation(format!(
            "A survey may have at most {MAX_PAGES} pages"
        )));
    }
    for (index, page) in input.pages.iter().enumerate() {
        validate_page(index, page)?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn mcq_input(options: &[&str]) -> PageInput {
        PageInput {
            title: "Pick one".into(),
            description: String::new(),
            content: PageContent::Mcq {
                options: options.iter().map(|s| s.to_string()).collect(),
                allow_multiple: false,
            },
        }
    }

    fn survey_input(pages: Vec<PageInput>) -> SurveyInput {
        SurveyInput {
            title: "CSAT".into(),
            description: "d".into(),
            pages,
        }
    }

    // -- PageType / RatingType -----------------------------------------------

    #[test]
    fn page_type_parses_wire_names() {
        for t in PageType::ALL {
            assert_eq!(t.as_str().parse::<PageType>().unwrap(), t);
        }
    }

    #[test]
    fn page_type_rejects_unknown() {
        let err = "video".parse::<PageType>().unwrap_err();
        assert!(err.to_string().contains("video"));
    }

    #[test]
    fn rating_type_parse_is_case_insensitive() {
        assert_eq!("number".parse::<RatingType>().unwrap(), RatingType::Number);
        assert_eq!("EMOJI".parse::<RatingType>().unwrap(), RatingType::Emoji);
        assert_eq!("Nps".parse::<RatingType>().unwrap(), RatingType::Nps);
        assert!("stars".parse::<RatingType>().is_err());
    }

    #[test]
    fn rating_type_accepts_lowercase_alias_in_json() {
        let t: RatingType = serde_json::from_value(json!("emoji")).unwrap();
        assert_eq!(t, RatingType::Emoji);
        assert_eq!(serde_json::to_value(t).unwrap(), json!("EMOJI"));
    }

    // -- Serialization shape -------------------------------------------------

    #[test]
    fn page_input_reads_flat_tagged_json() {
        let page: PageInput = serde_json::from_value(json!({
            "type": "rating",
            "title": "How satisfied are you?",
            "description": "Rate from 1 to 5",
            "rating_type": "NUMBER",
            "rating_scale": 5,
            "low_label": "Poor"
        }))
        .unwrap();

        assert_eq!(page.page_type(), PageType::Rating);
        assert_eq!(
            page.content,
            PageContent::Rating {
                rating_type: Some(RatingType::Number),
                low_label: Some("Poor".into()),
                high_label: None,
                rating_scale: Some(5),
            }
        );
    }

    #[test]
    fn page_input_ignores_fields_of_other_types() {
        let page: PageInput = serde_json::from_value(json!({
            "type": "text",
            "title": "Feedback",
            "placeholder": "Type here",
            "options": ["A"],
            "redirect_url": "https://tempo.new"
        }))
        .unwrap();

        assert_eq!(
            page.content,
            PageContent::Text {
                placeholder: Some("Type here".into())
            }
        );
    }

    #[test]
    fn mcq_defaults_options_and_allow_multiple() {
        let page: PageInput =
            serde_json::from_value(json!({"type": "mcq", "title": "Q"})).unwrap();
        assert_eq!(page.content, PageContent::empty(PageType::Mcq));
    }

    #[test]
    fn null_options_and_pages_read_as_empty() {
        let input: SurveyInput = serde_json::from_value(json!({
            "title": "t",
            "description": null,
            "pages": [{"type": "mcq", "title": "q", "options": null, "allow_multiple": null}]
        }))
        .unwrap();
        assert_eq!(input.description, "");
        assert_eq!(input.pages[0].content, PageContent::empty(PageType::Mcq));

        let input: SurveyInput =
            serde_json::from_value(json!({"title": "t", "pages": null})).unwrap();
        assert!(input.pages.is_empty());

        let survey: Survey = serde_json::from_value(json!({
            "id": 1,
            "user_id": "u1",
            "created_at": "2025-01-01T00:00:00Z",
            "pages": null
        }))
        .unwrap();
        assert!(survey.pages.is_empty());
    }

    #[test]
    fn page_serializes_type_tag_inline() {
        let page = Page {
            id: 7,
            survey_id: 3,
            title: "Pick".into(),
            description: String::new(),
            content: PageContent::Mcq {
                options: vec!["A".into(), "B".into()],
                allow_multiple: true,
            },
        };
        let value = serde_json::to_value(&page).unwrap();
        assert_eq!(value["type"], "mcq");
        assert_eq!(value["options"], json!(["A", "B"]));
        assert_eq!(value["allow_multiple"], true);
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn survey_without_pages_deserializes_as_empty() {
        let survey: Survey = serde_json::from_value(json!({
            "id": 1,
            "user_id": "u1",
            "created_at": "2025-01-01T00:00:00Z"
        }))
        .unwrap();
        assert!(survey.pages.is_empty());
        assert_eq!(survey.title, "");
        assert_eq!(survey.description, "");
    }

    #[test]
    fn non_empty_maps_empty_string_to_none() {
        assert_eq!(non_empty(""), None);
        assert_eq!(non_empty(" "), Some(" ".to_string()));
        assert_eq!(non_empty("x"), Some("x".to_string()));
    }

    // -- Validation ----------------------------------------------------------

    #[test]
    fn valid_input_passes() {
        assert!(validate_survey_input(&survey_input(vec![mcq_input(&["A", "B"])])).is_ok());
    }

    #[test]
    fn blank_title_rejected() {
        let mut input = survey_input(vec![]);
        input.title = "   ".into();
        assert!(validate_survey_input(&input).is_err());
    }

    #[test]
    fn too_long_title_rejected() {
        assert!(validate_survey_title(&"a".repeat(201)).is_err());
        assert!(validate_survey_title(&"a".repeat(200)).is_ok());
    }

    #[test]
    fn too_many_pages_rejected() {
        let pages = (0..=MAX_PAGES).map(|_| mcq_input(&["A"])).collect();
        assert!(validate_survey_input(&survey_input(pages)).is_err());
    }

    #[test]
    fn rating_scale_bounds() {
        assert!(validate_rating_scale(1).is_ok());
        assert!(validate_rating_scale(10).is_ok());
        assert!(validate_rating_scale(0).is_err());
        assert!(validate_rating_scale(11).is_err());
    }

    #[test]
    fn rating_scale_error_names_the_page() {
        let rating = PageInput {
            title: "Rate".into(),
            description: String::new(),
            content: PageContent::Rating {
                rating_type: Some(RatingType::Nps),
                low_label: None,
                high_label: None,
                rating_scale: Some(42),
            },
        };
        let input = survey_input(vec![mcq_input(&["A"]), rating]);
        let msg = validate_survey_input(&input).unwrap_err().to_string();
        assert!(msg.contains("Page 2"), "got: {msg}");
    }

    #[test]
    fn redirect_url_requires_http_scheme() {
        assert!(validate_redirect_url("https://tempo.new").is_ok());
        assert!(validate_redirect_url("http://example.com/a?b=c").is_ok());
        assert!(validate_redirect_url("ftp://example.com").is_err());
        assert!(validate_redirect_url("tempo.new").is_err());
        assert!(validate_redirect_url("https://").is_err());
    }

    #[test]
    fn option_limits() {
        let many: Vec<String> = (0..=MAX_OPTIONS).map(|i| i.to_string()).collect();
        assert!(validate_options(&many).is_err());
        assert!(validate_options(&["a".repeat(MAX_OPTION_LEN + 1)]).is_err());
        assert!(validate_options(&["".to_string(), "dup".to_string(), "dup".to_string()]).is_ok());
    }
}
