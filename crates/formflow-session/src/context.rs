//! Per-client session state.

use formflow_store::Submission;

use crate::catalog::{EntryDocument, Template};
use crate::error::SessionError;

/// The two behaviors a role string can select.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RoleKind {
  Employee,
  Supervisor,
}

/// A logged-in role: the string the user typed and its classification.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Role {
  name: String,
  kind: RoleKind,
}

impl Role {
  /// Classify a role string.
  ///
  /// An exact match on `employee` is an employee; any other non-empty string
  /// is a supervisor. There is no credential check.
  pub fn classify(name: &str, employee: &str) -> Result<Self, SessionError> {
    if name.is_empty() {
      return Err(SessionError::MissingRole);
    }
    let kind = if name == employee {
      RoleKind::Employee
    } else {
      RoleKind::Supervisor
    };
    Ok(Self {
      name: name.to_string(),
      kind,
    })
  }

  pub fn name(&self) -> &str {
    &self.name
  }

  pub fn kind(&self) -> RoleKind {
    self.kind
  }
}

/// State owned by exactly one client session.
#[derive(Debug)]
pub struct SessionContext {
  role: Option<Role>,
  entry: EntryDocument,
  item_under_review: Option<Submission>,
  /// Listing shown to an employee by the latest role routing.
  templates: Vec<Template>,
  /// Listing shown to a supervisor by the latest role routing.
  pending: Vec<Submission>,
}

impl SessionContext {
  pub fn new(entry: EntryDocument) -> Self {
    Self {
      role: None,
      entry,
      item_under_review: None,
      templates: Vec::new(),
      pending: Vec::new(),
    }
  }

  pub fn entry(&self) -> &EntryDocument {
    &self.entry
  }

  pub fn role(&self) -> Option<&Role> {
    self.role.as_ref()
  }

  pub fn role_kind(&self) -> Option<RoleKind> {
    self.role.as_ref().map(Role::kind)
  }

  /// Set the role for this session.
  pub fn login(&mut self, name: &str, employee: &str) -> Result<&Role, SessionError> {
    let role = Role::classify(name, employee)?;
    self.item_under_review = None;
    Ok(self.role.insert(role))
  }

  /// Clear the role and everything derived from it.
  pub fn logout(&mut self) {
    self.role = None;
    self.item_under_review = None;
    self.templates.clear();
    self.pending.clear();
  }

  pub fn item_under_review(&self) -> Option<&Submission> {
    self.item_under_review.as_ref()
  }

  pub fn begin_review(&mut self, submission: Submission) {
    self.item_under_review = Some(submission);
  }

  pub fn take_review(&mut self) -> Option<Submission> {
    self.item_under_review.take()
  }

  pub fn templates(&self) -> &[Template] {
    &self.templates
  }

  pub fn set_templates(&mut self, templates: Vec<Template>) {
    self.templates = templates;
  }

  pub fn find_template(&self, name: &str) -> Option<&Template> {
    self.templates.iter().find(|t| t.name == name)
  }

  pub fn pending(&self) -> &[Submission] {
    &self.pending
  }

  pub fn set_pending(&mut self, pending: Vec<Submission>) {
    self.pending = pending;
  }

  pub fn find_pending(&self, id: i64) -> Option<&Submission> {
    self.pending.iter().find(|s| s.id == id)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn entry() -> EntryDocument {
    EntryDocument {
      name: "workflow.xlsx".to_string(),
      bytes: b"entry".to_vec(),
    }
  }

  #[test]
  fn test_exact_sentinel_is_employee() {
    assert_eq!(
      Role::classify("employee", "employee").unwrap().kind(),
      RoleKind::Employee
    );
    assert_eq!(
      Role::classify("Employee", "employee").unwrap().kind(),
      RoleKind::Supervisor
    );
    assert_eq!(
      Role::classify("manager", "employee").unwrap().kind(),
      RoleKind::Supervisor
    );
  }

  #[test]
  fn test_empty_role_is_rejected() {
    assert!(matches!(
      Role::classify("", "employee"),
      Err(SessionError::MissingRole)
    ));
  }

  #[test]
  fn test_logout_clears_everything_but_entry() {
    let mut context = SessionContext::new(entry());
    context.login("manager", "employee").unwrap();
    context.set_templates(vec![Template {
      name: "form_leave.xlsx".to_string(),
      bytes: b"t".to_vec(),
    }]);

    context.logout();

    assert!(context.role().is_none());
    assert!(context.item_under_review().is_none());
    assert!(context.templates().is_empty());
    assert!(context.pending().is_empty());
    assert_eq!(context.entry(), &entry());
  }

  #[test]
  fn test_failed_login_keeps_previous_role() {
    let mut context = SessionContext::new(entry());
    context.login("employee", "employee").unwrap();

    assert!(context.login("", "employee").is_err());
    assert_eq!(context.role_kind(), Some(RoleKind::Employee));
  }
}
