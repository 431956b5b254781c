//! Push-based result stream for paginated API queries
//!
//! A traversal produces [`PageEvent`]s through a [`PageSink`]; the consumer
//! reads them from the matching [`ResultStream`]. Events are buffered in an
//! unbounded channel, so a consumer that starts reading late still sees every
//! page in order.
//!
//! ```text
//! producer (traversal task)            consumer (command / renderer)
//!   sink.write(page 1)  ──Page──►        on_page_received(page 1)
//!   sink.write(page 2)  ──Page──►        on_page_received(page 2)
//!   sink.last_page()    ──LastPage─►     on_last_page()
//! ```
//!
//! Terminal signals consume the sink, so nothing can be written after a
//! stream has completed or failed.

use crate::error::{CliError, Result};
use futures::Stream;
use serde_json::Value;
use std::pin::Pin;
use std::task::{Context, Poll};
use tokio::sync::mpsc;

/// One event of a paginated query
#[derive(Debug)]
pub enum PageEvent {
    /// Items embedded in one fetched page, in server order
    Page(Vec<Value>),
    /// No more pages will follow
    LastPage,
    /// Traversal stopped on an error
    Failed(CliError),
}

impl PageEvent {
    /// Whether no further event can follow this one
    #[must_use]
    pub const fn is_terminal(&self) -> bool {
        matches!(self, Self::LastPage | Self::Failed(_))
    }
}

/// Create a connected producer/consumer pair
#[must_use]
pub fn result_stream() -> (PageSink, ResultStream) {
    let (tx, rx) = mpsc::unbounded_channel();
    (
        PageSink { tx },
        ResultStream {
            rx,
            finished: false,
        },
    )
}

/// Producer half of a result stream
#[derive(Debug)]
pub struct PageSink {
    tx: mpsc::UnboundedSender<PageEvent>,
}

impl PageSink {
    /// Emit the items of one page
    ///
    /// Returns `false` once the consumer has dropped its [`ResultStream`];
    /// producers use that to stop fetching.
    pub fn write(&self, items: Vec<Value>) -> bool {
        self.tx.send(PageEvent::Page(items)).is_ok()
    }

    /// Signal failure and close the stream
    pub fn fail(self, error: CliError) {
        let _ = self.tx.send(PageEvent::Failed(error));
    }

    /// Signal completion and close the stream
    pub fn last_page(self) {
        let _ = self.tx.send(PageEvent::LastPage);
    }

    /// Whether the consumer is gone
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.tx.is_closed()
    }
}

/// Consumer half of a result stream
///
/// Yields events until the first terminal one. If the producer goes away
/// without a terminal signal the stream simply ends.
#[derive(Debug)]
pub struct ResultStream {
    rx: mpsc::UnboundedReceiver<PageEvent>,
    finished: bool,
}

impl Stream for ResultStream {
    type Item = PageEvent;

    fn poll_next(mut self: Pin<&mut Self>, cx: &mut Context<'_>) -> Poll<Option<Self::Item>> {
        if self.finished {
            return Poll::Ready(None);
        }
        match self.rx.poll_recv(cx) {
            Poll::Ready(Some(event)) => {
                if event.is_terminal() {
                    self.finished = true;
                    self.rx.close();
                }
                Poll::Ready(Some(event))
            }
            Poll::Ready(None) => {
                self.finished = true;
                Poll::Ready(None)
            }
            Poll::Pending => Poll::Pending,
        }
    }
}

/// Receives the events of a [`ResultStream`]
///
/// Every method has an empty default, so a handler only implements the
/// events it cares about.
pub trait PageHandler {
    /// Called once per fetched page
    fn on_page_received(&mut self, _items: Vec<Value>) {}

    /// Called once when the traversal completes
    fn on_last_page(&mut self) {}

    /// Called once when the traversal fails
    fn on_error(&mut self, _error: CliError) {}
}

impl ResultStream {
    /// Feed every event to `handler` until the stream ends
    pub async fn dispatch<H: PageHandler + ?Sized>(mut self, handler: &mut H) {
        while let Some(event) = self.next_event().await {
            match event {
                PageEvent::Page(items) => handler.on_page_received(items),
                PageEvent::LastPage => handler.on_last_page(),
                PageEvent::Failed(error) => handler.on_error(error),
            }
        }
    }

    /// Concatenate all pages into one list
    ///
    /// # Errors
    ///
    /// Returns the error the traversal failed with.
    pub async fn collect_items(mut self) -> Result<Vec<Value>> {
        let mut all = Vec::new();
        while let Some(event) = self.next_event().await {
            match event {
                PageEvent::Page(items) => all.extend(items),
                PageEvent::LastPage => break,
                PageEvent::Failed(error) => return Err(error),
            }
        }
        Ok(all)
    }

    async fn next_event(&mut self) -> Option<PageEvent> {
        futures::StreamExt::next(self).await
    }
}
