//! Airfield configuration structures.
//!
//! All values are fixed at startup. Durations are stored as milliseconds so the
//! JSON and environment forms stay plain integers.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Simulated stage durations and backoff intervals.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StageTimings {
    /// Tower handling time after admission.
    pub tower_handling_ms: u64,
    /// Runway occupation time.
    pub landing_ms: u64,
    /// Gate occupation after the runway is released.
    pub disembark_ms: u64,
    /// Wait before requeueing after congestion.
    pub congestion_backoff_ms: u64,
    /// Wait before requeueing after a policy denial.
    pub denial_backoff_ms: u64,
    /// Pause between consecutive dispatches.
    pub dispatch_pacing_ms: u64,
}

impl Default for StageTimings {
    fn default() -> Self {
        Self {
            tower_handling_ms: 3_000,
            landing_ms: 4_000,
            disembark_ms: 3_000,
            congestion_backoff_ms: 5_000,
            denial_backoff_ms: 3_000,
            dispatch_pacing_ms: 2_000,
        }
    }
}

impl StageTimings {
    /// Same duration for every stage; convenient in tests.
    #[must_use]
    pub const fn uniform(ms: u64) -> Self {
        Self {
            tower_handling_ms: ms,
            landing_ms: ms,
            disembark_ms: ms,
            congestion_backoff_ms: ms,
            denial_backoff_ms: ms,
            dispatch_pacing_ms: ms,
        }
    }

    /// Tower handling as a `Duration`.
    #[must_use]
    pub const fn tower_handling(&self) -> Duration {
        Duration::from_millis(self.tower_handling_ms)
    }

    /// Landing as a `Duration`.
    #[must_use]
    pub const fn landing(&self) -> Duration {
        Duration::from_millis(self.landing_ms)
    }

    /// Disembarkation as a `Duration`.
    #[must_use]
    pub const fn disembark(&self) -> Duration {
        Duration::from_millis(self.disembark_ms)
    }

    /// Congestion backoff as a `Duration`.
    #[must_use]
    pub const fn congestion_backoff(&self) -> Duration {
        Duration::from_millis(self.congestion_backoff_ms)
    }

    /// Denial backoff as a `Duration`.
    #[must_use]
    pub const fn denial_backoff(&self) -> Duration {
        Duration::from_millis(self.denial_backoff_ms)
    }

    /// Dispatch pacing as a `Duration`.
    #[must_use]
    pub const fn dispatch_pacing(&self) -> Duration {
        Duration::from_millis(self.dispatch_pacing_ms)
    }
}

/// Root airfield configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct AirfieldConfig {
    /// Maximum units inside the tower pipeline at once.
    pub gate_capacity: u32,
    /// Number of runways.
    pub runway_count: usize,
    /// Unit queue bound; the gate capacity when unset.
    pub queue_capacity: Option<usize>,
    /// Attempts allowed per unit before it is dropped.
    pub retry_limit: u32,
    /// Per-attempt watchdog in milliseconds.
    pub attempt_timeout_ms: u64,
    /// Whole-batch budget in milliseconds.
    pub batch_timeout_ms: u64,
    /// Stage durations.
    pub timings: StageTimings,
}

impl Default for AirfieldConfig {
    fn default() -> Self {
        Self {
            gate_capacity: 5,
            runway_count: 3,
            queue_capacity: None,
            retry_limit: 5,
            attempt_timeout_ms: 30_000,
            batch_timeout_ms: 60_000,
            timings: StageTimings::default(),
        }
    }
}

impl AirfieldConfig {
    /// Effective queue bound.
    #[must_use]
    pub fn effective_queue_capacity(&self) -> usize {
        self.queue_capacity
            .unwrap_or(self.gate_capacity as usize)
    }

    /// Per-attempt watchdog as a `Duration`.
    #[must_use]
    pub const fn attempt_timeout(&self) -> Duration {
        Duration::from_millis(self.attempt_timeout_ms)
    }

    /// Batch budget as a `Duration`.
    #[must_use]
    pub const fn batch_timeout(&self) -> Duration {
        Duration::from_millis(self.batch_timeout_ms)
    }

    /// Validate configuration values.
    ///
    /// # Errors
    ///
    /// Describes the first offending field.
    pub fn validate(&self) -> Result<(), String> {
        if self.gate_capacity == 0 {
            return Err("gate_capacity must be greater than 0".into());
        }
        if self.runway_count == 0 {
            return Err("runway_count must be greater than 0".into());
        }
        if self.effective_queue_capacity() == 0 {
            return Err("queue_capacity must be greater than 0".into());
        }
        if self.retry_limit == 0 {
            return Err("retry_limit must be greater than 0".into());
        }
        if self.attempt_timeout_ms == 0 {
            return Err("attempt_timeout_ms must be greater than 0".into());
        }
        if self.batch_timeout_ms == 0 {
            return Err("batch_timeout_ms must be greater than 0".into());
        }
        Ok(())
    }

    /// Parse configuration from a JSON string and validate.
    ///
    /// # Errors
    ///
    /// Parse failures and validation failures, as text.
    pub fn from_json_str(input: &str) -> Result<Self, String> {
        let cfg: Self = serde_json::from_str(input).map_err(|e| format!("parse error: {e}"))?;
        cfg.validate()?;
        Ok(cfg)
    }

    /// Build configuration from defaults overridden by `AIRFIELD_*` variables.
    ///
    /// A `.env` file in the working directory is loaded first if present.
    ///
    /// # Errors
    ///
    /// Unparseable variables and validation failures, as text.
    pub fn from_env() -> Result<Self, String> {
        let _ = dotenvy::dotenv();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build configuration from an arbitrary key lookup.
    ///
    /// # Errors
    ///
    /// Unparseable values and validation failures, as text.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, String>
    where
        F: Fn(&str) -> Option<String>,
    {
        fn parse<T: std::str::FromStr>(
            lookup: &impl Fn(&str) -> Option<String>,
            key: &str,
            slot: &mut T,
        ) -> Result<(), String> {
            if let Some(raw) = lookup(key) {
                *slot = raw
                    .trim()
                    .parse()
                    .map_err(|_| format!("{key}: cannot parse {raw:?}"))?;
            }
            Ok(())
        }

        let mut cfg = Self::default();
        parse(&lookup, "AIRFIELD_GATE_CAPACITY", &mut cfg.gate_capacity)?;
        parse(&lookup, "AIRFIELD_RUNWAY_COUNT", &mut cfg.runway_count)?;
        parse(&lookup, "AIRFIELD_RETRY_LIMIT", &mut cfg.retry_limit)?;
        parse(&lookup, "AIRFIELD_ATTEMPT_TIMEOUT_MS", &mut cfg.attempt_timeout_ms)?;
        parse(&lookup, "AIRFIELD_BATCH_TIMEOUT_MS", &mut cfg.batch_timeout_ms)?;
        if lookup("AIRFIELD_QUEUE_CAPACITY").is_some() {
            let mut capacity = 0usize;
            parse(&lookup, "AIRFIELD_QUEUE_CAPACITY", &mut capacity)?;
            cfg.queue_capacity = Some(capacity);
        }

        let t = &mut cfg.timings;
        parse(&lookup, "AIRFIELD_TOWER_HANDLING_MS", &mut t.tower_handling_ms)?;
        parse(&lookup, "AIRFIELD_LANDING_MS", &mut t.landing_ms)?;
        parse(&lookup, "AIRFIELD_DISEMBARK_MS", &mut t.disembark_ms)?;
        parse(&lookup, "AIRFIELD_CONGESTION_BACKOFF_MS", &mut t.congestion_backoff_ms)?;
        parse(&lookup, "AIRFIELD_DENIAL_BACKOFF_MS", &mut t.denial_backoff_ms)?;
        parse(&lookup, "AIRFIELD_DISPATCH_PACING_MS", &mut t.dispatch_pacing_ms)?;

        cfg.validate()?;
        Ok(cfg)
    }
}
