use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

/// A named document read from disk, e.g. the entry document or a template.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DocumentSource {
  /// Name the document is loaded under, e.g. "form_leave.xlsx"
  pub name: String,

  /// Location of the raw bytes. Relative paths are resolved against the
  /// directory of the config file.
  pub path: PathBuf,
}

impl DocumentSource {
  /// A source whose name is the file name of `path`.
  pub fn from_path(path: impl Into<PathBuf>) -> Self {
    let path = path.into();
    let name = path
      .file_name()
      .map(|n| n.to_string_lossy().into_owned())
      .unwrap_or_default();
    Self { name, path }
  }

  pub(crate) fn resolve_against(&mut self, base: &Path) {
    if self.path.is_relative() {
      self.path = base.join(&self.path);
    }
  }
}
