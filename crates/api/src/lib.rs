//! HTTP surface for the survey builder.
//!
//! Exposes survey CRUD, draft load/save, and templates under `/api/v1`,
//! authenticated with HS256 bearer tokens.

pub mod auth;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
