//! Keeps what the renderer shows consistent with the session context.

use std::sync::Arc;

use formflow_config::{View, ViewNames};
use formflow_store::Submission;
use formflow_workflow::WorkflowEngine;
use tracing::{debug, warn};

use crate::catalog::{Template, TemplateCatalog};
use crate::context::{RoleKind, SessionContext};
use crate::document::{DocumentError, DocumentRenderer};
use crate::error::SessionError;
use crate::handlers::{
  Action, BUTTON_APPROVE, BUTTON_REJECT, BUTTON_SUBMIT, Control, EventKind, HandlerTable,
  Surface, UiEvent,
};

/// The view a role lands on after login.
pub fn landing_view(role: Option<RoleKind>) -> View {
  match role {
    None => View::Login,
    Some(RoleKind::Employee) => View::Templates,
    Some(RoleKind::Supervisor) => View::Pending,
  }
}

/// Decides which view or document to present, and owns the handler table
/// that matches it.
pub struct NavigationController<R: DocumentRenderer> {
  renderer: R,
  views: ViewNames,
  handlers: HandlerTable,
  surface: Surface,
  engine: Arc<WorkflowEngine>,
  catalog: Arc<dyn TemplateCatalog>,
}

impl<R: DocumentRenderer> NavigationController<R> {
  pub fn new(
    renderer: R,
    views: ViewNames,
    engine: Arc<WorkflowEngine>,
    catalog: Arc<dyn TemplateCatalog>,
  ) -> Self {
    Self {
      renderer,
      views,
      handlers: HandlerTable::empty(),
      surface: Surface::Entry(View::Login),
      engine,
      catalog,
    }
  }

  pub fn renderer(&self) -> &R {
    &self.renderer
  }

  pub fn renderer_mut(&mut self) -> &mut R {
    &mut self.renderer
  }

  pub fn surface(&self) -> Surface {
    self.surface
  }

  pub fn handlers(&self) -> &HandlerTable {
    &self.handlers
  }

  /// Map an event to the action currently bound to it.
  ///
  /// Cell selections only count when they come from the section on screen.
  pub fn resolve(&self, event: &UiEvent) -> Option<Action> {
    let control = match event.kind {
      EventKind::Click => Control::Button(event.target.clone()),
      EventKind::CellSelect => {
        let Surface::Entry(view) = self.surface else {
          return None;
        };
        if self.views.view(&event.target) != Some(view) {
          return None;
        }
        Control::Cells
      }
    };
    self.handlers.lookup(self.surface, &control)
  }

  /// Load the entry document and show the login view.
  pub fn initialize(&mut self, context: &mut SessionContext) -> Result<(), SessionError> {
    self.reload_entry(context)?;
    self.show(context, View::Login)
  }

  /// Present `target`.
  ///
  /// When the user is on a form rather than the entry document, the entry
  /// document is reloaded from the cached bytes and the role's routing is
  /// replayed before `target` is shown.
  pub async fn navigate_to(
    &mut self,
    context: &mut SessionContext,
    target: View,
  ) -> Result<(), SessionError> {
    let on_entry = self.renderer.active_document() == Some(context.entry().name.as_str());
    if on_entry {
      return self.show(context, target);
    }

    debug!(?target, entry = %context.entry().name, "reloading entry document");
    self.reload_entry(context)?;
    let landed = self.enter_role_view(context).await?;
    if landed != target {
      self.show(context, target)?;
    }
    Ok(())
  }

  /// Recompute the role's listing and show its landing view.
  ///
  /// The landing view and its handlers are installed even when the listing
  /// cannot be read, so the user can still log out. The listing is left
  /// empty and the read error is returned.
  pub async fn enter_role_view(
    &mut self,
    context: &mut SessionContext,
  ) -> Result<View, SessionError> {
    let role = context.role_kind();
    let view = landing_view(role);
    let listed = self.render_listing(context, role, view).await;
    self.show(context, view)?;
    listed?;
    Ok(view)
  }

  /// Open a blank template as the active document.
  pub async fn open_template(
    &mut self,
    context: &mut SessionContext,
    template: &Template,
  ) -> Result<(), SessionError> {
    let role = context.role_kind().ok_or(SessionError::NotLoggedIn)?;
    self.replace_handlers(HandlerTable::empty(), self.surface);

    if let Err(e) = self.renderer.load_document(&template.name, &template.bytes) {
      return self.fall_back(context, e).await;
    }
    self.present_form(role);
    Ok(())
  }

  /// Open a waiting submission for review and make it the item under review.
  pub async fn open_submission(
    &mut self,
    context: &mut SessionContext,
    submission: Submission,
  ) -> Result<(), SessionError> {
    let role = context.role_kind().ok_or(SessionError::NotLoggedIn)?;
    if !submission.is_waiting() {
      return Err(SessionError::NotPending {
        id: submission.id,
        state: submission.state,
      });
    }
    self.replace_handlers(HandlerTable::empty(), self.surface);

    if let Err(e) = self
      .renderer
      .load_document(&submission.form_name, &submission.form_bytes)
    {
      return self.fall_back(context, e).await;
    }
    context.begin_review(submission);
    self.present_form(role);
    Ok(())
  }

  async fn render_listing(
    &mut self,
    context: &mut SessionContext,
    role: Option<RoleKind>,
    view: View,
  ) -> Result<(), SessionError> {
    match role {
      None => Ok(()),
      Some(RoleKind::Employee) => match self.catalog.templates().await {
        Ok(templates) => {
          let names: Vec<&str> = templates.iter().map(|t| t.name.as_str()).collect();
          self.renderer.render_templates(self.views.name(view), &names);
          context.set_templates(templates);
          Ok(())
        }
        Err(e) => {
          warn!(error = %e, "failed to list templates");
          self.renderer.render_templates(self.views.name(view), &[]);
          context.set_templates(Vec::new());
          Err(e.into())
        }
      },
      Some(RoleKind::Supervisor) => match self.engine.list_pending().await {
        Ok(pending) => {
          self.renderer.render_submissions(self.views.name(view), &pending);
          context.set_pending(pending);
          Ok(())
        }
        Err(e) => {
          warn!(error = %e, "failed to list pending submissions");
          self.renderer.render_submissions(self.views.name(view), &[]);
          context.set_pending(Vec::new());
          Err(e.into())
        }
      },
    }
  }

  fn reload_entry(&mut self, context: &SessionContext) -> Result<(), SessionError> {
    let entry = context.entry();
    self
      .renderer
      .load_document(&entry.name, &entry.bytes)
      .map_err(|source| SessionError::EntryReload { source })?;
    self.replace_handlers(HandlerTable::entry(context.role_kind()), Surface::Entry(View::Login));
    Ok(())
  }

  fn show(&mut self, context: &SessionContext, view: View) -> Result<(), SessionError> {
    self.renderer.show_view(self.views.name(view))?;
    self.replace_handlers(HandlerTable::entry(context.role_kind()), Surface::Entry(view));
    Ok(())
  }

  fn present_form(&mut self, role: RoleKind) {
    let employee = role == RoleKind::Employee;
    self.renderer.set_control_visible(BUTTON_SUBMIT, employee);
    self.renderer.set_control_visible(BUTTON_APPROVE, !employee);
    self.renderer.set_control_visible(BUTTON_REJECT, !employee);
    self.replace_handlers(HandlerTable::form(role), Surface::Form);
  }

  /// Return to the role's landing view after a form failed to load, then
  /// report the load failure.
  async fn fall_back(
    &mut self,
    context: &mut SessionContext,
    error: DocumentError,
  ) -> Result<(), SessionError> {
    warn!(error = %error, "document failed to load, returning to entry document");
    let view = landing_view(context.role_kind());
    if let Err(e) = self.navigate_to(context, view).await {
      // The caller only sees the later error; report the load failure here.
      self.renderer.show_message(&error.to_string());
      return Err(e);
    }
    Err(SessionError::Document(error))
  }

  fn replace_handlers(&mut self, handlers: HandlerTable, surface: Surface) {
    self.handlers = handlers;
    self.surface = surface;
  }
}
