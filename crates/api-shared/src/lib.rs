//! # API Shared
//!
//! Shared utilities and definitions for the Health Assistant HTTP surfaces.
//!
//! Contains:
//! - Request/response bodies with OpenAPI schemas (`types` module)
//! - Shared services like `HealthService`
//!
//! Used by `api-rest` for the JSON API and its OpenAPI document.

pub mod health;
pub mod types;

pub use health::HealthService;
pub use types::*;
