//! Managed background service lifecycle.

use crate::{handler::DiagnosticHandler, observer::RequestObserver};
use async_trait::async_trait;
use hostwatch_core::BoxError;
use tokio_util::sync::CancellationToken;

/// A component started and stopped by its host.
///
/// `start` returns once the service is running and `stop` once it has shut
/// down. The token lets a host give up on a slow transition; services whose
/// transitions are instantaneous may ignore it.
#[async_trait]
pub trait HostedService: Send + Sync {
    /// Start the service.
    async fn start(&self, cancel: CancellationToken) -> Result<(), BoxError>;

    /// Stop the service.
    async fn stop(&self, cancel: CancellationToken) -> Result<(), BoxError>;
}

#[async_trait]
impl<O: RequestObserver> HostedService for DiagnosticHandler<O> {
    async fn start(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        self.subscribe();
        Ok(())
    }

    async fn stop(&self, _cancel: CancellationToken) -> Result<(), BoxError> {
        self.unsubscribe();
        Ok(())
    }
}
