//! Formflow Workflow
//!
//! The submission lifecycle state machine:
//!
//! ```text
//! WAITING --approve--> APPROVED   (terminal)
//! WAITING --reject --> REJECTED   (terminal)
//! ```
//!
//! [`WorkflowEngine`] validates and timestamps each transition and persists
//! it through a [`formflow_store::Store`]. A decision on a submission that is
//! no longer waiting fails with [`WorkflowError::InvalidTransition`] and
//! leaves both the record and the caller's value untouched.

mod decision;
mod engine;
mod error;

pub use decision::{Decision, next_update};
pub use engine::WorkflowEngine;
pub use error::WorkflowError;
