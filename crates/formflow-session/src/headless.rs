//! In-memory renderer for tests and headless operation.

use std::collections::{HashMap, HashSet};

use formflow_store::Submission;

use crate::document::{DocumentError, DocumentRenderer};

/// A renderer that keeps documents as plain bytes and records everything the
/// session asked it to display.
///
/// An empty payload is treated as corrupt. Any section name is accepted once
/// a document is active.
#[derive(Debug, Default)]
pub struct HeadlessRenderer {
  documents: HashMap<String, Vec<u8>>,
  active: Option<String>,
  visible_view: Option<String>,
  hidden_controls: HashSet<String>,
  templates: Vec<String>,
  submissions: Vec<i64>,
  messages: Vec<String>,
  loads: usize,
}

impl HeadlessRenderer {
  pub fn new() -> Self {
    Self::default()
  }

  /// Replace the content of the active document, as a user filling a form
  /// would.
  pub fn edit(&mut self, bytes: impl Into<Vec<u8>>) -> Result<(), DocumentError> {
    let name = self
      .active
      .clone()
      .ok_or_else(|| DocumentError::Missing("<none>".to_string()))?;
    self.documents.insert(name, bytes.into());
    Ok(())
  }

  /// Section currently shown.
  pub fn visible_view(&self) -> Option<&str> {
    self.visible_view.as_deref()
  }

  pub fn is_control_visible(&self, control: &str) -> bool {
    !self.hidden_controls.contains(control)
  }

  /// Template names from the most recent template listing.
  pub fn templates(&self) -> &[String] {
    &self.templates
  }

  /// Submission ids from the most recent submission listing.
  pub fn submissions(&self) -> &[i64] {
    &self.submissions
  }

  pub fn messages(&self) -> &[String] {
    &self.messages
  }

  pub fn last_message(&self) -> Option<&str> {
    self.messages.last().map(String::as_str)
  }

  /// Number of successful document loads.
  pub fn loads(&self) -> usize {
    self.loads
  }
}

impl DocumentRenderer for HeadlessRenderer {
  fn load_document(&mut self, name: &str, bytes: &[u8]) -> Result<(), DocumentError> {
    if bytes.is_empty() {
      return Err(DocumentError::corrupt(name, "empty payload"));
    }
    self.documents.insert(name.to_string(), bytes.to_vec());
    self.active = Some(name.to_string());
    self.visible_view = None;
    self.hidden_controls.clear();
    self.loads += 1;
    Ok(())
  }

  fn export_document(&self, name: &str) -> Result<Vec<u8>, DocumentError> {
    self
      .documents
      .get(name)
      .cloned()
      .ok_or_else(|| DocumentError::Missing(name.to_string()))
  }

  fn active_document(&self) -> Option<&str> {
    self.active.as_deref()
  }

  fn show_view(&mut self, view: &str) -> Result<(), DocumentError> {
    if self.active.is_none() {
      return Err(DocumentError::UnknownView {
        view: view.to_string(),
      });
    }
    self.visible_view = Some(view.to_string());
    Ok(())
  }

  fn set_control_visible(&mut self, control: &str, visible: bool) {
    if visible {
      self.hidden_controls.remove(control);
    } else {
      self.hidden_controls.insert(control.to_string());
    }
  }

  fn render_templates(&mut self, _view: &str, names: &[&str]) {
    self.templates = names.iter().map(|n| n.to_string()).collect();
  }

  fn render_submissions(&mut self, _view: &str, rows: &[Submission]) {
    self.submissions = rows.iter().map(|s| s.id).collect();
  }

  fn show_message(&mut self, message: &str) {
    self.messages.push(message.to_string());
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_empty_payload_is_corrupt() {
    let mut renderer = HeadlessRenderer::new();
    let result = renderer.load_document("broken.xlsx", &[]);
    assert!(matches!(result, Err(DocumentError::Corrupt { .. })));
    assert_eq!(renderer.active_document(), None);
  }

  #[test]
  fn test_edits_are_exported() {
    let mut renderer = HeadlessRenderer::new();
    renderer.load_document("leave.doc", b"blank").unwrap();
    renderer.edit("filled").unwrap();

    assert_eq!(renderer.export_document("leave.doc").unwrap(), b"filled");
  }

  #[test]
  fn test_loading_resets_view_and_controls() {
    let mut renderer = HeadlessRenderer::new();
    renderer.load_document("a", b"a").unwrap();
    renderer.show_view("login").unwrap();
    renderer.set_control_visible("submit", false);

    renderer.load_document("b", b"b").unwrap();
    assert_eq!(renderer.active_document(), Some("b"));
    assert_eq!(renderer.visible_view(), None);
    assert!(renderer.is_control_visible("submit"));
  }
}
