//! Constants used throughout the Health Assistant core crate.
//!
//! Directory names, file extensions and environment defaults live here so the
//! binaries and the registry agree on them.

/// Default directory holding the exported classifier models.
pub const DEFAULT_MODELS_DIR: &str = "saved_models";

/// Model file extensions the registry will look for, in lookup order.
pub const MODEL_FILE_EXTENSIONS: [&str; 3] = ["yaml", "yml", "json"];

/// Suffix appended to a panel's stem to form its model file name.
pub const MODEL_FILE_SUFFIX: &str = "_model";

/// Default address for the REST/HTML server.
pub const DEFAULT_REST_ADDR: &str = "0.0.0.0:3000";

/// Heading of the panel selection menu.
pub const MENU_TITLE: &str = "Multiple Disease Prediction System";

/// Application name used in page titles.
pub const APP_NAME: &str = "Health Assistant";
