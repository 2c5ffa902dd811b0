//! Document rendering collaborator.
//!
//! The session never looks inside a document. Documents are opaque byte
//! payloads keyed by name; the renderer turns them into something a user can
//! see and click, and turns the user's edits back into bytes.

use formflow_store::Submission;

/// Errors reported by a [`DocumentRenderer`].
#[derive(Debug, thiserror::Error)]
pub enum DocumentError {
  /// No document is loaded under this name.
  #[error("document not found: {0}")]
  Missing(String),

  /// The payload could not be rendered.
  #[error("document '{name}' could not be rendered: {message}")]
  Corrupt { name: String, message: String },

  /// The active document has no section with this name.
  #[error("no view named '{view}' in the active document")]
  UnknownView { view: String },
}

impl DocumentError {
  pub fn corrupt(name: impl Into<String>, message: impl Into<String>) -> Self {
    Self::Corrupt {
      name: name.into(),
      message: message.into(),
    }
  }
}

/// The UI surface of one session.
///
/// Exactly one document is active at a time. Loading a document replaces the
/// active one.
pub trait DocumentRenderer: Send {
  /// Render `bytes` as the active document under `name`.
  fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<(), DocumentError>;

  /// Current content of a loaded document, including the user's edits.
  fn export_document(&self, name: &str) -> Result<Vec<u8>, DocumentError>;

  /// Name of the active document.
  fn active_document(&self) -> Option<&str>;

  /// Show a section of the active document and hide the current one.
  fn show_view(&mut self, view: &str) -> Result<(), DocumentError>;

  /// Show or hide a named control (button) of the active document.
  fn set_control_visible(&mut self, control: &str, visible: bool);

  /// Fill a section with the names of the available templates.
  fn render_templates(&mut self, view: &str, names: &[&str]);

  /// Fill a section with submission rows.
  fn render_submissions(&mut self, view: &str, rows: &[Submission]);

  /// Display a message in the well-known message location.
  fn show_message(&mut self, message: &str);
}
