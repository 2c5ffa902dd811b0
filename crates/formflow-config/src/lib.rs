//! Formflow Config
//!
//! This crate contains the serializable deployment settings for formflow:
//! where the database lives, which role string identifies employees, the
//! entry document, the template catalog, and the names of the views inside
//! the entry document.
//!
//! Configuration is loaded from a JSON file (via CLI with `--config`). Every
//! field has a default, so an empty object is a valid configuration.

mod app;
mod document;
mod error;
mod view;

pub use app::{AppConfig, DatabaseConfig, RoleConfig};
pub use document::DocumentSource;
pub use error::ConfigError;
pub use view::{View, ViewNames};
