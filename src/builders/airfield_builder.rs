//! Assemble an [`Airfield`] from an [`AirfieldConfig`].

use std::sync::Arc;

use crate::config::AirfieldConfig;
use crate::core::events::{EventRecorder, EventSink};
use crate::core::status::{StatusRegister, StatusValue};
use crate::core::{AirfieldError, Spawn};
use crate::runtime::{Airfield, TokioSpawner};

/// Validates configuration and wires the shared resources.
#[derive(Debug)]
pub struct AirfieldBuilder {
    config: AirfieldConfig,
    events: EventRecorder,
    initial_status: Option<StatusValue>,
}

impl AirfieldBuilder {
    /// Start from `config`; events are only logged until a sink is set.
    #[must_use]
    pub fn new(config: AirfieldConfig) -> Self {
        Self {
            config,
            events: EventRecorder::log_only(),
            initial_status: None,
        }
    }

    /// Forward events to `sink`.
    #[must_use]
    pub fn event_sink(mut self, sink: Box<dyn EventSink>) -> Self {
        self.events = EventRecorder::new(sink);
        self
    }

    /// Use an existing recorder.
    #[must_use]
    pub fn events(mut self, events: EventRecorder) -> Self {
        self.events = events;
        self
    }

    /// Preset the status register instead of starting at 0.
    #[must_use]
    pub const fn initial_status(mut self, status: StatusValue) -> Self {
        self.initial_status = Some(status);
        self
    }

    /// Build on an explicit spawner.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::InvalidConfig`] if the configuration fails validation.
    pub fn build_with<S>(self, spawner: S) -> Result<Airfield<S>, AirfieldError>
    where
        S: Spawn + Clone + Send + Sync + 'static,
    {
        self.config
            .validate()
            .map_err(AirfieldError::InvalidConfig)?;
        let status = Arc::new(
            self.initial_status
                .map_or_else(StatusRegister::new, StatusRegister::with_value),
        );
        tracing::debug!(
            gate_capacity = self.config.gate_capacity,
            runways = self.config.runway_count,
            queue_capacity = self.config.effective_queue_capacity(),
            retry_limit = self.config.retry_limit,
            "airfield built"
        );
        Ok(Airfield::new(self.config, status, self.events, spawner))
    }

    /// Build on the current tokio runtime.
    ///
    /// # Errors
    ///
    /// [`AirfieldError::InvalidConfig`] on a bad configuration and
    /// [`AirfieldError::Runtime`] outside a tokio runtime.
    pub fn build(self) -> Result<Airfield<TokioSpawner>, AirfieldError> {
        let spawner = TokioSpawner::current()?;
        self.build_with(spawner)
    }
}
