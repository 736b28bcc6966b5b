//! Copy-to-clipboard feedback for code snippets.
//!
//! A copy attempt switches the indicator to `Copied` or `Failed`; after
//! [`COPY_RESET_WINDOW`] it returns to `Idle`. A newer attempt restarts the
//! window, and dropping the feedback cancels any pending reset.

use std::{sync::Arc, time::Duration};

use async_trait::async_trait;
use serde::Serialize;
use thiserror::Error;
use tokio::{sync::watch, task::JoinHandle};
use tracing::warn;

/// How long the copy outcome stays visible.
pub const COPY_RESET_WINDOW: Duration = Duration::from_secs(2);

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum CopyIndicator {
    Idle,
    Copied,
    Failed,
}

impl CopyIndicator {
    /// Button label shown for this state.
    pub fn label(self) -> &'static str {
        match self {
            CopyIndicator::Idle => "Copy",
            CopyIndicator::Copied => "Copied!",
            CopyIndicator::Failed => "Copy failed",
        }
    }
}

#[derive(Debug, Error)]
pub enum ClipboardError {
    #[error("clipboard write rejected: {0}")]
    Rejected(String),
}

/// System clipboard seam.
#[async_trait]
pub trait Clipboard: Send + Sync {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError>;
}

/// Clipboard kept in memory, for headless environments and tests.
#[derive(Debug, Default)]
pub struct MemoryClipboard {
    contents: tokio::sync::Mutex<Option<String>>,
}

impl MemoryClipboard {
    pub async fn contents(&self) -> Option<String> {
        self.contents.lock().await.clone()
    }
}

#[async_trait]
impl Clipboard for MemoryClipboard {
    async fn write_text(&self, text: &str) -> Result<(), ClipboardError> {
        *self.contents.lock().await = Some(text.to_string());
        Ok(())
    }
}

/// Per-snippet copy indicator with a self-resetting timer.
pub struct CopyFeedback {
    state: Arc<watch::Sender<CopyIndicator>>,
    window: Duration,
    reset: Option<JoinHandle<()>>,
}

impl CopyFeedback {
    pub fn new() -> Self {
        Self::with_window(COPY_RESET_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        let (state, _) = watch::channel(CopyIndicator::Idle);
        Self {
            state: Arc::new(state),
            window,
            reset: None,
        }
    }

    pub fn indicator(&self) -> CopyIndicator {
        *self.state.borrow()
    }

    /// Observe indicator changes, e.g. to re-render the button label.
    pub fn subscribe(&self) -> watch::Receiver<CopyIndicator> {
        self.state.subscribe()
    }

    /// Copy `code` and report the outcome. Must be called inside a Tokio
    /// runtime; the reset runs as a spawned task.
    pub async fn copy(&mut self, clipboard: &dyn Clipboard, code: &str) -> CopyIndicator {
        let outcome = match clipboard.write_text(code).await {
            Ok(()) => CopyIndicator::Copied,
            Err(err) => {
                warn!(
                    target = "application::clipboard",
                    error = %err,
                    "copy to clipboard failed"
                );
                CopyIndicator::Failed
            }
        };

        self.state.send_replace(outcome);
        self.schedule_reset();
        outcome
    }

    fn schedule_reset(&mut self) {
        self.cancel_reset();

        let state = Arc::clone(&self.state);
        let window = self.window;
        self.reset = Some(tokio::spawn(async move {
            tokio::time::sleep(window).await;
            state.send_replace(CopyIndicator::Idle);
        }));
    }

    fn cancel_reset(&mut self) {
        if let Some(handle) = self.reset.take() {
            handle.abort();
        }
    }
}

impl Default for CopyFeedback {
    fn default() -> Self {
        Self::new()
    }
}

impl Drop for CopyFeedback {
    fn drop(&mut self) {
        self.cancel_reset();
    }
}
