// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Configuration for the recovery subsystem.

use std::time::Duration;

/// Recovery configuration.
#[derive(Debug, Clone)]
pub struct RecoveryConfig {
    /// Elements handled per transaction during batched recovery.
    pub batch_size: usize,
    /// Page size used while scanning for recovery candidates.
    pub scan_page_size: usize,
    /// Age below which an element is not yet considered stuck.
    pub stuck_threshold: Duration,
    /// Delay between two periodic recovery runs.
    pub trigger_interval: Duration,
    /// Delay before the first periodic recovery run.
    pub trigger_initial_delay: Duration,
}

impl Default for RecoveryConfig {
    fn default() -> Self {
        Self {
            batch_size: 1000,
            scan_page_size: 5000,
            stuck_threshold: Duration::from_secs(60 * 60),
            trigger_interval: Duration::from_secs(30 * 60),
            trigger_initial_delay: Duration::from_secs(2 * 60 * 60),
        }
    }
}

impl RecoveryConfig {
    /// Load configuration from environment variables.
    ///
    /// All variables are optional:
    ///
    /// | Variable | Default | Description |
    /// |----------|---------|-------------|
    /// | `PROVENA_RECOVERY_BATCH_SIZE` | `1000` | Elements per recovery transaction |
    /// | `PROVENA_RECOVERY_SCAN_PAGE_SIZE` | `5000` | Candidate scan page size |
    /// | `PROVENA_RECOVERY_STUCK_THRESHOLD_SECS` | `3600` | Age below which an element is not stuck |
    /// | `PROVENA_RECOVERY_INTERVAL_SECS` | `1800` | Delay between periodic runs |
    /// | `PROVENA_RECOVERY_INITIAL_DELAY_SECS` | `7200` | Delay before the first periodic run |
    pub fn from_env() -> Result<Self, ConfigError> {
        let defaults = Self::default();

        Ok(Self {
            batch_size: read_count("PROVENA_RECOVERY_BATCH_SIZE", defaults.batch_size)?,
            scan_page_size: read_count("PROVENA_RECOVERY_SCAN_PAGE_SIZE", defaults.scan_page_size)?,
            stuck_threshold: read_secs(
                "PROVENA_RECOVERY_STUCK_THRESHOLD_SECS",
                defaults.stuck_threshold,
            )?,
            trigger_interval: read_positive_secs(
                "PROVENA_RECOVERY_INTERVAL_SECS",
                defaults.trigger_interval,
            )?,
            trigger_initial_delay: read_secs(
                "PROVENA_RECOVERY_INITIAL_DELAY_SECS",
                defaults.trigger_initial_delay,
            )?,
        })
    }
}

fn read_count(var: &'static str, default: usize) -> Result<usize, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    let value: usize = raw
        .parse()
        .map_err(|_| ConfigError::Invalid(var, "must be a positive integer"))?;
    if value == 0 {
        return Err(ConfigError::Invalid(var, "must be greater than zero"));
    }
    Ok(value)
}

fn read_secs(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let Ok(raw) = std::env::var(var) else {
        return Ok(default);
    };
    let secs: u64 = raw
        .parse()
        .map_err(|_| ConfigError::Invalid(var, "must be a number of seconds"))?;
    Ok(Duration::from_secs(secs))
}

fn read_positive_secs(var: &'static str, default: Duration) -> Result<Duration, ConfigError> {
    let value = read_secs(var, default)?;
    if value.is_zero() {
        return Err(ConfigError::Invalid(var, "must be greater than zero"));
    }
    Ok(value)
}

/// Configuration errors.
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// An environment variable has an invalid value.
    #[error("invalid value for {0}: {1}")]
    Invalid(&'static str, &'static str),
}
