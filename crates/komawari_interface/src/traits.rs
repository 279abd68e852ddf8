//! Oracle and progress traits.

use async_trait::async_trait;
use komawari_core::{OracleRequest, OracleResponse, WindowProgress};
use komawari_error::KomawariResult;
use std::sync::Arc;
use tokio::sync::mpsc::{Sender, UnboundedSender};

/// External text-labeling service.
///
/// One request goes in, one free-form text comes back. Implementations
/// report an authorization failure as an `OracleErrorKind::Unauthorized`
/// error so callers can tell it apart from window-local failures.
#[async_trait]
pub trait Oracle: Send + Sync {
    /// Send a request and return the response text.
    async fn complete(&self, req: &OracleRequest) -> KomawariResult<OracleResponse>;

    /// Provider name (e.g., "openai").
    fn provider_name(&self) -> &'static str;

    /// Model identifier (e.g., "gpt-4o-mini").
    fn model_name(&self) -> &str;
}

#[async_trait]
impl<T: Oracle + ?Sized> Oracle for Arc<T> {
    async fn complete(&self, req: &OracleRequest) -> KomawariResult<OracleResponse> {
        (**self).complete(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

#[async_trait]
impl<T: Oracle + ?Sized> Oracle for Box<T> {
    async fn complete(&self, req: &OracleRequest) -> KomawariResult<OracleResponse> {
        (**self).complete(req).await
    }

    fn provider_name(&self) -> &'static str {
        (**self).provider_name()
    }

    fn model_name(&self) -> &str {
        (**self).model_name()
    }
}

/// Receives a notification after each window is turned into cuts.
///
/// Implemented for closures and for tokio channel senders. A closed
/// channel is ignored; progress reporting never fails a run.
pub trait ProgressSink: Send + Sync {
    /// Called once per window, in window order.
    fn window_finished(&self, progress: &WindowProgress);
}

impl<F> ProgressSink for F
where
    F: Fn(&WindowProgress) + Send + Sync,
{
    fn window_finished(&self, progress: &WindowProgress) {
        self(progress)
    }
}

impl ProgressSink for UnboundedSender<WindowProgress> {
    fn window_finished(&self, progress: &WindowProgress) {
        let _ = self.send(progress.clone());
    }
}

impl ProgressSink for Sender<WindowProgress> {
    fn window_finished(&self, progress: &WindowProgress) {
        let _ = self.try_send(progress.clone());
    }
}
