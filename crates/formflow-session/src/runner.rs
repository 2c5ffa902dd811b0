//! Session runner with channel-based event delivery.
//!
//! The `SessionRunner` owns an mpsc channel for receiving UI events and feeds
//! them to its session one at a time.

use tokio::sync::mpsc;
use tokio_util::sync::CancellationToken;
use tracing::{error, info};

use crate::document::DocumentRenderer;
use crate::error::SessionError;
use crate::handlers::UiEvent;
use crate::session::Session;

/// A runner that drives one session from a stream of UI events.
///
/// # Usage
///
/// ```ignore
/// let runner = SessionRunner::new(session);
///
/// // Give the sender to the event source (UI bridge, websocket, etc.)
/// let sender = runner.sender();
///
/// // Start the dispatch loop
/// let cancel = CancellationToken::new();
/// let session = runner.start(cancel).await?;
/// ```
pub struct SessionRunner<R: DocumentRenderer> {
  sender: mpsc::Sender<UiEvent>,
  receiver: mpsc::Receiver<UiEvent>,
  session: Session<R>,
}

impl<R: DocumentRenderer> SessionRunner<R> {
  /// Create a new session runner.
  pub fn new(session: Session<R>) -> Self {
    Self::with_buffer_size(session, 100)
  }

  /// Create a new session runner with a custom buffer size.
  pub fn with_buffer_size(session: Session<R>, buffer_size: usize) -> Self {
    let (sender, receiver) = mpsc::channel(buffer_size);
    Self {
      sender,
      receiver,
      session,
    }
  }

  /// Get a sender handle for delivering events to this session.
  pub fn sender(&self) -> mpsc::Sender<UiEvent> {
    self.sender.clone()
  }

  /// Get a reference to the session.
  pub fn session(&self) -> &Session<R> {
    &self.session
  }

  /// Start the dispatch loop.
  ///
  /// Runs until the cancellation token is triggered, every sender is dropped,
  /// or the session fails fatally. On a clean exit the session is handed
  /// back to the caller.
  pub async fn start(mut self, cancel: CancellationToken) -> Result<Session<R>, SessionError> {
    // Only external senders should keep the loop alive.
    drop(self.sender);
    let session_id = self.session.session_id().to_string();
    info!(%session_id, "starting session runner");

    loop {
      tokio::select! {
          _ = cancel.cancelled() => {
              info!(%session_id, "session runner cancelled");
              break;
          }
          event = self.receiver.recv() => {
              match event {
                  Some(event) => {
                      if let Err(e) = self.session.dispatch(event).await {
                          error!(%session_id, error = %e, "session runner stopped");
                          return Err(e);
                      }
                  }
                  None => {
                      info!(%session_id, "session runner channel closed");
                      break;
                  }
              }
          }
      }
    }

    Ok(self.session)
  }
}
