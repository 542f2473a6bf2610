//! Repositories: multi-step operations over a [`crate::store::SurveyStore`].

pub mod survey_repo;

pub use survey_repo::{SurveyError, SurveyRepo};
