//! Tokio runtime spawner implementation.

use std::future::Future;
use std::sync::Arc;

use tokio::runtime::Handle;

use crate::core::{AirfieldError, Spawn};

/// Tokio-based spawner that executes tasks on a tokio runtime.
#[derive(Clone, Debug)]
pub struct TokioSpawner {
    handle: Arc<Handle>,
}

impl TokioSpawner {
    /// Create a new `TokioSpawner` from a tokio runtime handle.
    #[must_use]
    pub fn new(handle: Handle) -> Self {
        Self {
            handle: Arc::new(handle),
        }
    }

    /// Spawner for the runtime the caller is running on.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::Runtime`] when called outside a tokio runtime.
    pub fn current() -> Result<Self, AirfieldError> {
        Handle::try_current()
            .map(Self::new)
            .map_err(|e| AirfieldError::Runtime(e.to_string()))
    }
}

impl Spawn for TokioSpawner {
    fn spawn<F>(&self, fut: F)
    where
        F: Future<Output = ()> + Send + 'static,
    {
        self.handle.spawn(fut);
    }
}
