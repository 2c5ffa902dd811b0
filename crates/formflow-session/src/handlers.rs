//! UI events and the handler table they are resolved against.
//!
//! A session has exactly one [`HandlerTable`] at a time. Navigation replaces
//! it wholesale, so a binding from a previous view or document can never
//! fire after the view changed.

use std::collections::HashMap;

use formflow_config::View;
use serde::{Deserialize, Serialize};

use crate::context::RoleKind;

pub const BUTTON_LOGIN: &str = "login";
pub const BUTTON_LOGOUT: &str = "logout";
pub const BUTTON_SUBMIT: &str = "submit";
pub const BUTTON_APPROVE: &str = "approve";
pub const BUTTON_REJECT: &str = "reject";

/// Kind of user interaction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
  /// A button was pressed. The target is the button name.
  Click,
  /// A cell in a listing was selected. The target is the section name.
  CellSelect,
}

/// A notification from the event source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UiEvent {
  pub kind: EventKind,
  pub target: String,
  /// Text associated with the event: the typed role for the login button,
  /// the selected cell's text for a cell selection.
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub value: Option<String>,
}

impl UiEvent {
  pub fn click(button: impl Into<String>) -> Self {
    Self {
      kind: EventKind::Click,
      target: button.into(),
      value: None,
    }
  }

  pub fn click_with(button: impl Into<String>, value: impl Into<String>) -> Self {
    Self {
      kind: EventKind::Click,
      target: button.into(),
      value: Some(value.into()),
    }
  }

  pub fn select(section: impl Into<String>, cell: impl Into<String>) -> Self {
    Self {
      kind: EventKind::CellSelect,
      target: section.into(),
      value: Some(cell.into()),
    }
  }
}

/// What the user is currently looking at.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Surface {
  /// A section of the entry document.
  Entry(View),
  /// An imported template or submission.
  Form,
}

/// An interactive element of a surface.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Control {
  Button(String),
  /// Any cell of the surface's listing.
  Cells,
}

/// What a bound control does.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Action {
  Login,
  Logout,
  SelectTemplate,
  OpenSubmission,
  Submit,
  Approve,
  Reject,
}

/// Bindings from `(surface, control)` to the action they trigger.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct HandlerTable {
  bindings: HashMap<(Surface, Control), Action>,
}

impl HandlerTable {
  pub fn empty() -> Self {
    Self::default()
  }

  /// Bindings for the entry document.
  ///
  /// Listing selection is only bound once a role is known, and only on the
  /// listing that role sees.
  pub fn entry(role: Option<RoleKind>) -> Self {
    let mut table = Self::empty();
    table.bind(Surface::Entry(View::Login), button(BUTTON_LOGIN), Action::Login);
    table.bind(Surface::Entry(View::Templates), button(BUTTON_LOGOUT), Action::Logout);
    table.bind(Surface::Entry(View::Pending), button(BUTTON_LOGOUT), Action::Logout);

    match role {
      Some(RoleKind::Employee) => {
        table.bind(Surface::Entry(View::Templates), Control::Cells, Action::SelectTemplate);
      }
      Some(RoleKind::Supervisor) => {
        table.bind(Surface::Entry(View::Pending), Control::Cells, Action::OpenSubmission);
      }
      None => {}
    }
    table
  }

  /// Bindings for an opened form.
  pub fn form(role: RoleKind) -> Self {
    let mut table = Self::empty();
    match role {
      RoleKind::Employee => {
        table.bind(Surface::Form, button(BUTTON_SUBMIT), Action::Submit);
      }
      RoleKind::Supervisor => {
        table.bind(Surface::Form, button(BUTTON_APPROVE), Action::Approve);
        table.bind(Surface::Form, button(BUTTON_REJECT), Action::Reject);
      }
    }
    table
  }

  pub fn bind(&mut self, surface: Surface, control: Control, action: Action) {
    self.bindings.insert((surface, control), action);
  }

  pub fn lookup(&self, surface: Surface, control: &Control) -> Option<Action> {
    self.bindings.get(&(surface, control.clone())).copied()
  }

  pub fn len(&self) -> usize {
    self.bindings.len()
  }

  pub fn is_empty(&self) -> bool {
    self.bindings.is_empty()
  }
}

fn button(name: &str) -> Control {
  Control::Button(name.to_string())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_logged_out_entry_has_no_listing_bindings() {
    let table = HandlerTable::entry(None);
    assert_eq!(
      table.lookup(Surface::Entry(View::Login), &button(BUTTON_LOGIN)),
      Some(Action::Login)
    );
    assert_eq!(table.lookup(Surface::Entry(View::Templates), &Control::Cells), None);
    assert_eq!(table.lookup(Surface::Entry(View::Pending), &Control::Cells), None);
  }

  #[test]
  fn test_listing_binding_follows_role() {
    let employee = HandlerTable::entry(Some(RoleKind::Employee));
    assert_eq!(
      employee.lookup(Surface::Entry(View::Templates), &Control::Cells),
      Some(Action::SelectTemplate)
    );
    assert_eq!(employee.lookup(Surface::Entry(View::Pending), &Control::Cells), None);

    let supervisor = HandlerTable::entry(Some(RoleKind::Supervisor));
    assert_eq!(
      supervisor.lookup(Surface::Entry(View::Pending), &Control::Cells),
      Some(Action::OpenSubmission)
    );
    assert_eq!(supervisor.lookup(Surface::Entry(View::Templates), &Control::Cells), None);
  }

  #[test]
  fn test_form_actions_follow_role() {
    let employee = HandlerTable::form(RoleKind::Employee);
    assert_eq!(employee.len(), 1);
    assert_eq!(
      employee.lookup(Surface::Form, &button(BUTTON_SUBMIT)),
      Some(Action::Submit)
    );
    assert_eq!(employee.lookup(Surface::Form, &button(BUTTON_APPROVE)), None);

    let supervisor = HandlerTable::form(RoleKind::Supervisor);
    assert_eq!(supervisor.len(), 2);
    assert_eq!(supervisor.lookup(Surface::Form, &button(BUTTON_SUBMIT)), None);
    assert_eq!(
      supervisor.lookup(Surface::Form, &button(BUTTON_REJECT)),
      Some(Action::Reject)
    );
  }

  #[test]
  fn test_surface_scopes_bindings() {
    let table = HandlerTable::entry(None);
    // The login button is only bound on the login view.
    assert_eq!(table.lookup(Surface::Entry(View::Templates), &button(BUTTON_LOGIN)), None);
    assert_eq!(table.lookup(Surface::Form, &button(BUTTON_LOGOUT)), None);
  }
}
