//! Row models and DTOs.
//!
//! Each submodule contains:
//! - `FromRow` structs matching the database rows
//! - create/update DTOs for inserts and patches
//! - nested records assembled from rows on read

pub mod survey;
