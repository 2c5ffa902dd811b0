use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::document::DocumentSource;
use crate::error::ConfigError;
use crate::view::ViewNames;

/// Top-level formflow configuration.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AppConfig {
  pub database: DatabaseConfig,
  pub roles: RoleConfig,
  /// The landing document every session starts from and returns to.
  pub entry: DocumentSource,
  /// Blank forms offered to employees, in display order.
  pub templates: Vec<DocumentSource>,
  pub views: ViewNames,
}

impl Default for AppConfig {
  fn default() -> Self {
    Self {
      database: DatabaseConfig::default(),
      roles: RoleConfig::default(),
      entry: DocumentSource::from_path("forms/workflow.xlsx"),
      templates: vec![
        DocumentSource::from_path("forms/form_leave.xlsx"),
        DocumentSource::from_path("forms/business_trip.xlsx"),
        DocumentSource::from_path("forms/performance_report.xlsx"),
      ],
      views: ViewNames::default(),
    }
  }
}

impl AppConfig {
  /// Load a config file. Relative paths inside it are resolved against the
  /// file's directory.
  pub fn load(path: &Path) -> Result<Self, ConfigError> {
    let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
      path: path.to_path_buf(),
      source,
    })?;
    Self::from_json(&content, path)
  }

  /// Parse config file content that was read from `path`.
  ///
  /// For callers that read the file themselves, such as from async code.
  pub fn from_json(content: &str, path: &Path) -> Result<Self, ConfigError> {
    let mut config: AppConfig =
      serde_json::from_str(content).map_err(|source| ConfigError::Parse {
        path: path.to_path_buf(),
        source,
      })?;

    if let Some(base) = path.parent() {
      config.resolve_paths(base);
    }
    Ok(config)
  }

  /// Make every relative path absolute against `base`.
  pub fn resolve_paths(&mut self, base: &Path) {
    self.entry.resolve_against(base);
    for template in &mut self.templates {
      template.resolve_against(base);
    }
    if self.database.path.is_relative() {
      self.database.path = base.join(&self.database.path);
    }
  }
}

/// Database location.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DatabaseConfig {
  /// SQLite database file, created if missing.
  pub path: PathBuf,
}

impl Default for DatabaseConfig {
  fn default() -> Self {
    Self {
      path: PathBuf::from("formflow.db"),
    }
  }
}

/// Role classification settings.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RoleConfig {
  /// Role string that identifies an employee. Any other non-empty role is a
  /// supervisor.
  pub employee: String,
}

impl Default for RoleConfig {
  fn default() -> Self {
    Self {
      employee: "employee".to_string(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::View;

  #[test]
  fn test_empty_object_uses_defaults() {
    let config: AppConfig = serde_json::from_str("{}").unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.roles.employee, "employee");
    assert_eq!(config.entry.name, "workflow.xlsx");
    assert_eq!(config.templates.len(), 3);
    assert_eq!(config.views.name(View::Pending), "submission list");
  }

  #[test]
  fn test_partial_views_keep_other_defaults() {
    let config: AppConfig =
      serde_json::from_str(r#"{ "views": { "login": "sign in" } }"#).unwrap();
    assert_eq!(config.views.login, "sign in");
    assert_eq!(config.views.templates, "form list");
    assert_eq!(config.views.view("sign in"), Some(View::Login));
    assert_eq!(config.views.view("login"), None);
  }

  #[test]
  fn test_load_resolves_relative_paths() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("formflow.json");
    std::fs::write(
      &path,
      r#"{
        "roles": { "employee": "staff" },
        "entry": { "name": "entry.xlsx", "path": "books/entry.xlsx" },
        "templates": [{ "name": "leave", "path": "/abs/leave.xlsx" }]
      }"#,
    )
    .unwrap();

    let config = AppConfig::load(&path).unwrap();
    assert_eq!(config.roles.employee, "staff");
    assert_eq!(config.entry.path, dir.path().join("books/entry.xlsx"));
    assert_eq!(config.templates[0].path, PathBuf::from("/abs/leave.xlsx"));
    assert_eq!(config.database.path, dir.path().join("formflow.db"));
  }

  #[test]
  fn test_from_json_resolves_against_source_path() {
    let config = AppConfig::from_json(
      r#"{ "database": { "path": "data/formflow.db" } }"#,
      Path::new("/srv/formflow/config.json"),
    )
    .unwrap();

    assert_eq!(
      config.database.path,
      PathBuf::from("/srv/formflow/data/formflow.db")
    );
    assert_eq!(
      config.entry.path,
      PathBuf::from("/srv/formflow/forms/workflow.xlsx")
    );
  }

  #[test]
  fn test_from_json_reports_parse_errors_with_path() {
    let err = AppConfig::from_json("[]", Path::new("/srv/formflow/config.json")).unwrap_err();
    assert!(
      matches!(err, ConfigError::Parse { ref path, .. } if path == Path::new("/srv/formflow/config.json"))
    );
  }

  #[test]
  fn test_load_reports_parse_errors() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("broken.json");
    std::fs::write(&path, "{ not json").unwrap();

    let err = AppConfig::load(&path).unwrap_err();
    assert!(matches!(err, ConfigError::Parse { .. }));
  }

  #[test]
  fn test_load_reports_missing_file() {
    let err = AppConfig::load(Path::new("/nonexistent/formflow.json")).unwrap_err();
    assert!(matches!(err, ConfigError::Read { .. }));
  }
}
