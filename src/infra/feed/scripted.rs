//! Pre-recorded status feed.

use std::collections::VecDeque;
use std::time::Duration;

use async_trait::async_trait;

use super::StatusSource;
use crate::core::AirfieldError;

/// Replays `(delay, message)` steps, sleeping `delay` before each message.
#[derive(Debug, Clone, Default)]
pub struct ScriptedFeed {
    steps: VecDeque<(Duration, String)>,
}

impl ScriptedFeed {
    /// Feed from explicit steps.
    pub fn new<I, M>(steps: I) -> Self
    where
        I: IntoIterator<Item = (Duration, M)>,
        M: Into<String>,
    {
        Self {
            steps: steps
                .into_iter()
                .map(|(delay, message)| (delay, message.into()))
                .collect(),
        }
    }

    /// Feed delivering every message without delay.
    pub fn immediate<I, M>(messages: I) -> Self
    where
        I: IntoIterator<Item = M>,
        M: Into<String>,
    {
        Self::new(messages.into_iter().map(|m| (Duration::ZERO, m)))
    }

    /// Steps not yet delivered.
    #[must_use]
    pub fn remaining(&self) -> usize {
        self.steps.len()
    }
}

#[async_trait]
impl StatusSource for ScriptedFeed {
    async fn next_message(&mut self) -> Result<Option<String>, AirfieldError> {
        let Some((delay, message)) = self.steps.pop_front() else {
            return Ok(None);
        };
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        Ok(Some(message))
    }
}
