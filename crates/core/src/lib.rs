//! Tempo survey domain.
//!
//! Pure logic with no database or HTTP dependencies: the survey model in its
//! persisted and input forms, the local editing model, list filtering,
//! built-in templates, and form validation helpers.

pub mod account;
pub mod editor;
pub mod error;
pub mod filter;
pub mod survey;
pub mod template;
pub mod types;
