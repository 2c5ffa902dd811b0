//! Formflow Session
//!
//! This crate provides per-client sessions for formflow. A session holds the
//! client's role, keeps the presented view consistent with it, and turns UI
//! events into workflow operations.
//!
//! # Architecture
//!
//! ```text
//! ┌─────────────────────────────────────────────────────────────┐
//! │                      SessionRunner                          │
//! │  - owns mpsc channel of UiEvents                            │
//! │  - start(cancel) dispatches events one at a time            │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                         Session                             │
//! │  - SessionContext: role, entry document, item under review  │
//! │  - error boundary: messages on the view, fatal errors out   │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                  NavigationController                       │
//! │  - navigate_to / open_template / open_submission            │
//! │  - swaps the whole HandlerTable on every view change        │
//! │  - DocumentRenderer + TemplateCatalog collaborators         │
//! └─────────────────────────────────────────────────────────────┘
//!                               │
//!                               ▼
//! ┌─────────────────────────────────────────────────────────────┐
//! │                     WorkflowEngine                          │
//! │  - submit / approve / reject, shared by every session       │
//! └─────────────────────────────────────────────────────────────┘
//! ```

mod catalog;
mod context;
mod document;
mod error;
mod handlers;
mod headless;
mod navigation;
mod runner;
mod session;

pub use catalog::{CatalogError, EntryDocument, FsTemplateCatalog, Template, TemplateCatalog};
pub use context::{Role, RoleKind, SessionContext};
pub use document::{DocumentError, DocumentRenderer};
pub use error::SessionError;
pub use handlers::{
  Action, BUTTON_APPROVE, BUTTON_LOGIN, BUTTON_LOGOUT, BUTTON_REJECT, BUTTON_SUBMIT, Control,
  EventKind, HandlerTable, Surface, UiEvent,
};
pub use headless::HeadlessRenderer;
pub use navigation::{NavigationController, landing_view};
pub use runner::SessionRunner;
pub use session::{Session, SessionSettings};
