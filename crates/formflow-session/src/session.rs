//! One client's session: context, navigation, and the actions behind each
//! bound control.

use std::sync::Arc;

use formflow_config::{AppConfig, View, ViewNames};
use formflow_workflow::{Decision, WorkflowEngine, WorkflowError};
use tracing::{Instrument, debug, error, info, info_span, trace, warn};

use crate::catalog::{EntryDocument, TemplateCatalog};
use crate::context::SessionContext;
use crate::document::DocumentRenderer;
use crate::error::SessionError;
use crate::handlers::{Action, UiEvent};
use crate::navigation::NavigationController;

/// Deployment settings a session needs.
#[derive(Debug, Clone)]
pub struct SessionSettings {
  /// Role string that identifies an employee.
  pub employee_role: String,
  pub views: ViewNames,
}

impl From<&AppConfig> for SessionSettings {
  fn from(config: &AppConfig) -> Self {
    Self {
      employee_role: config.roles.employee.clone(),
      views: config.views.clone(),
    }
  }
}

impl Default for SessionSettings {
  fn default() -> Self {
    Self::from(&AppConfig::default())
  }
}

/// A connected client.
///
/// Events are handled one at a time through [`Session::dispatch`], which is
/// also the error boundary: failures are logged and shown to the user rather
/// than ending the session, unless the entry document itself is lost.
pub struct Session<R: DocumentRenderer> {
  session_id: String,
  employee_role: String,
  context: SessionContext,
  navigation: NavigationController<R>,
  engine: Arc<WorkflowEngine>,
}

impl<R: DocumentRenderer> Session<R> {
  /// Create a session and show the login view of the entry document.
  pub fn start(
    entry: EntryDocument,
    renderer: R,
    settings: SessionSettings,
    engine: Arc<WorkflowEngine>,
    catalog: Arc<dyn TemplateCatalog>,
  ) -> Result<Self, SessionError> {
    let session_id = uuid::Uuid::new_v4().to_string();
    let mut context = SessionContext::new(entry);
    let mut navigation =
      NavigationController::new(renderer, settings.views, engine.clone(), catalog);

    if let Err(e) = navigation.initialize(&mut context) {
      error!(%session_id, error = %e, "failed to start session");
      navigation.renderer_mut().show_message(&e.to_string());
      return Err(e);
    }

    info!(%session_id, entry = %context.entry().name, "session started");
    Ok(Self {
      session_id,
      employee_role: settings.employee_role,
      context,
      navigation,
      engine,
    })
  }

  pub fn session_id(&self) -> &str {
    &self.session_id
  }

  pub fn context(&self) -> &SessionContext {
    &self.context
  }

  pub fn navigation(&self) -> &NavigationController<R> {
    &self.navigation
  }

  pub fn renderer(&self) -> &R {
    self.navigation.renderer()
  }

  pub fn renderer_mut(&mut self) -> &mut R {
    self.navigation.renderer_mut()
  }

  /// Handle one UI event.
  ///
  /// Events with no binding on the current surface are ignored. Only a fatal
  /// error is returned; everything else is shown as a message.
  pub async fn dispatch(&mut self, event: UiEvent) -> Result<(), SessionError> {
    let Some(action) = self.navigation.resolve(&event) else {
      trace!(session_id = %self.session_id, ?event, "no handler bound");
      return Ok(());
    };

    let span = info_span!("dispatch", session_id = %self.session_id, ?action);
    let result = self.handle(action, event).instrument(span).await;

    match result {
      Ok(()) => Ok(()),
      Err(e) if e.is_fatal() => {
        error!(session_id = %self.session_id, error = %e, "session failed");
        self.renderer_mut().show_message(&e.to_string());
        Err(e)
      }
      Err(e) => {
        warn!(session_id = %self.session_id, ?action, error = %e, "action failed");
        self.renderer_mut().show_message(&e.to_string());
        Ok(())
      }
    }
  }

  async fn handle(&mut self, action: Action, event: UiEvent) -> Result<(), SessionError> {
    debug!(target_element = %event.target, "handling event");
    match action {
      Action::Login => self.login(event.value.as_deref().unwrap_or_default()).await,
      Action::Logout => self.logout().await,
      Action::SelectTemplate => self.select_template(event.value.unwrap_or_default()).await,
      Action::OpenSubmission => self.open_submission(event.value.unwrap_or_default()).await,
      Action::Submit => self.submit().await,
      Action::Approve => self.decide(Decision::Approve).await,
      Action::Reject => self.decide(Decision::Reject).await,
    }
  }

  async fn login(&mut self, role: &str) -> Result<(), SessionError> {
    let role = self.context.login(role, &self.employee_role)?;
    info!(role = role.name(), kind = ?role.kind(), "logged in");
    self.navigation.enter_role_view(&mut self.context).await?;
    Ok(())
  }

  async fn logout(&mut self) -> Result<(), SessionError> {
    self.context.logout();
    info!("logged out");
    self.navigation.navigate_to(&mut self.context, View::Login).await
  }

  async fn select_template(&mut self, name: String) -> Result<(), SessionError> {
    let template = self
      .context
      .find_template(&name)
      .cloned()
      .ok_or(SessionError::UnknownTemplate(name))?;
    self
      .navigation
      .open_template(&mut self.context, &template)
      .await
  }

  async fn open_submission(&mut self, cell: String) -> Result<(), SessionError> {
    let submission = cell
      .trim()
      .parse::<i64>()
      .ok()
      .and_then(|id| self.context.find_pending(id))
      .cloned()
      .ok_or(SessionError::UnknownSubmission(cell))?;
    self
      .navigation
      .open_submission(&mut self.context, submission)
      .await
  }

  async fn submit(&mut self) -> Result<(), SessionError> {
    let owner = self
      .context
      .role()
      .map(|r| r.name().to_string())
      .ok_or(SessionError::NotLoggedIn)?;
    let form_name = self
      .renderer()
      .active_document()
      .map(str::to_string)
      .ok_or(SessionError::NoActiveDocument)?;
    let form_bytes = self.renderer().export_document(&form_name)?;

    self
      .engine
      .submit(&form_bytes, &form_name, Some(&owner))
      .await?;
    self
      .navigation
      .navigate_to(&mut self.context, View::Templates)
      .await
  }

  async fn decide(&mut self, decision: Decision) -> Result<(), SessionError> {
    let mut submission = self
      .context
      .take_review()
      .ok_or(SessionError::NothingUnderReview)?;

    match self.engine.decide(&mut submission, decision).await {
      Ok(()) => {}
      Err(WorkflowError::Persistence(e)) => {
        // Keep the form open so the supervisor can try again.
        self.context.begin_review(submission);
        return Err(WorkflowError::Persistence(e).into());
      }
      Err(e) => {
        self
          .navigation
          .navigate_to(&mut self.context, View::Pending)
          .await?;
        return Err(e.into());
      }
    }

    self
      .navigation
      .navigate_to(&mut self.context, View::Pending)
      .await
  }
}
