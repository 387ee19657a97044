//! Ordered progress output
//!
//! All progress goes through a single writer so that lines produced by
//! concurrent probe workers never interleave.

use crate::errors::{CheckerError, Result};
use crate::model::SiteReport;
use crate::render::Renderer;
use std::io::Write;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tracing::debug;

const CHANNEL_CAPACITY: usize = 64;

#[derive(Clone, Debug, PartialEq)]
pub enum CheckEvent {
    ServiceStarted { name: String },
    SiteChecked(SiteReport),
    ServiceFinished { name: String, available: bool },
}

/// Cloneable handle used by the engine and its workers to emit events.
#[derive(Clone, Debug)]
pub struct EventSender {
    tx: mpsc::Sender<CheckEvent>,
}

impl EventSender {
    pub async fn emit(&self, event: CheckEvent) {
        if self.tx.send(event).await.is_err() {
            debug!("Output writer has stopped, dropping event");
        }
    }
}

/// Channel plus the dedicated writer draining it into `W`.
pub struct OutputSink<W> {
    sender: EventSender,
    writer: JoinHandle<std::io::Result<W>>,
}

impl<W> OutputSink<W>
where
    W: Write + Send + 'static,
{
    /// Start the writer. Events are rendered in the order they are received.
    pub fn spawn(mut out: W, renderer: Renderer) -> Self {
        let (tx, mut rx) = mpsc::channel::<CheckEvent>(CHANNEL_CAPACITY);

        let writer = tokio::task::spawn_blocking(move || {
            while let Some(event) = rx.blocking_recv() {
                out.write_all(renderer.render_event(&event).as_bytes())?;
                out.flush()?;
            }
            Ok(out)
        });

        Self {
            sender: EventSender { tx },
            writer,
        }
    }

    pub fn sender(&self) -> EventSender {
        self.sender.clone()
    }

    /// Close the sink and wait until every event has been written.
    ///
    /// Completes once all senders handed out by [`OutputSink::sender`] are
    /// dropped.
    pub async fn finish(self) -> Result<W> {
        drop(self.sender);

        let out = self
            .writer
            .await
            .map_err(|e| CheckerError::Other(format!("Output writer failed: {}", e)))??;

        Ok(out)
    }
}
