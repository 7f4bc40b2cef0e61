// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Periodic trigger for stuck-element recovery.
//!
//! Drives [`RecoveryService::recover_stuck`] on a fixed interval, after an
//! initial delay. Whether a given tick actually recovers anything is decided
//! by the cluster coordinator inside the service; this loop only provides
//! the cadence and survives every failure.

use std::sync::Arc;
use std::time::Duration;

use tokio::sync::Notify;
use tracing::{debug, error, info};

use crate::config::RecoveryConfig;
use crate::service::RecoveryService;

/// Periodic recovery trigger, run as a background task.
pub struct RecoveryScheduler {
    service: Arc<RecoveryService>,
    trigger_interval: Duration,
    trigger_initial_delay: Duration,
    shutdown: Arc<Notify>,
}

impl RecoveryScheduler {
    /// Scheduler over `service`, using the configured interval and initial
    /// delay.
    pub fn new(service: Arc<RecoveryService>, config: &RecoveryConfig) -> Self {
        Self {
            service,
            trigger_interval: config.trigger_interval,
            trigger_initial_delay: config.trigger_initial_delay,
            shutdown: Arc::new(Notify::new()),
        }
    }

    /// Handle to signal shutdown.
    pub fn shutdown_handle(&self) -> Arc<Notify> {
        self.shutdown.clone()
    }

    /// Run the periodic recovery loop.
    ///
    /// Waits the initial delay, then triggers a recovery pass every
    /// interval. A failed pass is logged and retried at the next tick; it
    /// never stops the loop.
    pub async fn run(self) {
        info!(
            interval_secs = self.trigger_interval.as_secs(),
            initial_delay_secs = self.trigger_initial_delay.as_secs(),
            "recovery scheduler started"
        );

        tokio::select! {
            biased;

            _ = self.shutdown.notified() => {
                info!("recovery scheduler shutting down before the first run");
                return;
            }

            _ = tokio::time::sleep(self.trigger_initial_delay) => {}
        }

        loop {
            match self.service.recover_stuck().await {
                Ok(Some(counts)) => {
                    debug!(
                        recovered = counts.total(),
                        "periodic recovery pass finished"
                    );
                }
                Ok(None) => {}
                Err(e) => {
                    error!(
                        error = %e,
                        "periodic recovery pass failed, will retry at the next interval"
                    );
                }
            }

            tokio::select! {
                biased;

                _ = self.shutdown.notified() => break,

                _ = tokio::time::sleep(self.trigger_interval) => {}
            }
        }

        info!("recovery scheduler stopped");
    }
}
