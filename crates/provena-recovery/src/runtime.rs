// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Embeddable runtime for the recovery subsystem.
//!
//! This module provides [`RecoveryRuntime`] which allows embedding the
//! recovery machinery into a node's startup sequence: one full recovery
//! pass runs synchronously before the node accepts new work, then the
//! periodic trigger keeps running in the background.
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use provena_recovery::runtime::RecoveryRuntime;
//!
//! #[tokio::main]
//! async fn main() -> anyhow::Result<()> {
//!     let runtime = RecoveryRuntime::builder()
//!         .reader(reader)
//!         .works(works)
//!         .states(states)
//!         .gateways(gateways)
//!         .transactions(transactions)
//!         .cluster(cluster)
//!         .build()?
//!         .start()
//!         .await?;
//!
//!     // ... node serves traffic ...
//!
//!     runtime.shutdown().await?;
//!     Ok(())
//! }
//! ```

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::Notify;
use tokio::task::JoinHandle;
use tracing::{error, info};

use crate::cluster::ClusterCoordinator;
use crate::config::RecoveryConfig;
use crate::reader::RecoveryReader;
use crate::scheduler::RecoveryScheduler;
use crate::service::RecoveryService;
use crate::states::{FlowNodeStateRegistry, GatewayEvaluator};
use crate::transaction::TransactionExecutor;
use crate::work::WorkService;

/// Builder for creating a [`RecoveryRuntime`].
#[derive(Default)]
pub struct RecoveryRuntimeBuilder {
    reader: Option<Arc<dyn RecoveryReader>>,
    works: Option<Arc<dyn WorkService>>,
    states: Option<Arc<dyn FlowNodeStateRegistry>>,
    gateways: Option<Arc<dyn GatewayEvaluator>>,
    transactions: Option<Arc<dyn TransactionExecutor>>,
    cluster: Option<Arc<dyn ClusterCoordinator>>,
    config: Option<RecoveryConfig>,
}

impl std::fmt::Debug for RecoveryRuntimeBuilder {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryRuntimeBuilder")
            .field("reader", &self.reader.as_ref().map(|_| "..."))
            .field("works", &self.works.as_ref().map(|_| "..."))
            .field("states", &self.states.as_ref().map(|_| "..."))
            .field("gateways", &self.gateways.as_ref().map(|_| "..."))
            .field("transactions", &self.transactions.as_ref().map(|_| "..."))
            .field("cluster", &self.cluster.as_ref().map(|_| "..."))
            .field("config", &self.config)
            .finish()
    }
}

impl RecoveryRuntimeBuilder {
    /// Create a new builder with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the read layer (required).
    pub fn reader(mut self, reader: Arc<dyn RecoveryReader>) -> Self {
        self.reader = Some(reader);
        self
    }

    /// Set the work-submission service (required).
    pub fn works(mut self, works: Arc<dyn WorkService>) -> Self {
        self.works = Some(works);
        self
    }

    /// Set the flow-node state registry (required).
    pub fn states(mut self, states: Arc<dyn FlowNodeStateRegistry>) -> Self {
        self.states = Some(states);
        self
    }

    /// Set the gateway merge-condition evaluator (required).
    pub fn gateways(mut self, gateways: Arc<dyn GatewayEvaluator>) -> Self {
        self.gateways = Some(gateways);
        self
    }

    /// Set the transaction executor (required).
    pub fn transactions(mut self, transactions: Arc<dyn TransactionExecutor>) -> Self {
        self.transactions = Some(transactions);
        self
    }

    /// Set the cluster coordinator (required).
    pub fn cluster(mut self, cluster: Arc<dyn ClusterCoordinator>) -> Self {
        self.cluster = Some(cluster);
        self
    }

    /// Set the recovery configuration.
    ///
    /// Default: [`RecoveryConfig::default`].
    pub fn config(mut self, config: RecoveryConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Build the runtime configuration.
    ///
    /// Returns an error if a required collaborator is missing.
    pub fn build(self) -> Result<RecoveryRuntimeConfig> {
        let reader = self.reader.ok_or_else(|| anyhow::anyhow!("reader is required"))?;
        let works = self.works.ok_or_else(|| anyhow::anyhow!("works is required"))?;
        let states = self.states.ok_or_else(|| anyhow::anyhow!("states is required"))?;
        let gateways = self
            .gateways
            .ok_or_else(|| anyhow::anyhow!("gateways is required"))?;
        let transactions = self
            .transactions
            .ok_or_else(|| anyhow::anyhow!("transactions is required"))?;
        let cluster = self
            .cluster
            .ok_or_else(|| anyhow::anyhow!("cluster is required"))?;
        let config = self.config.unwrap_or_default();

        Ok(RecoveryRuntimeConfig {
            service: Arc::new(RecoveryService::new(
                reader,
                works,
                states,
                gateways,
                transactions,
                cluster,
                config.clone(),
            )),
            config,
        })
    }
}

/// Configuration for a [`RecoveryRuntime`].
pub struct RecoveryRuntimeConfig {
    service: Arc<RecoveryService>,
    config: RecoveryConfig,
}

impl std::fmt::Debug for RecoveryRuntimeConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RecoveryRuntimeConfig")
            .field("service", &"...")
            .field("config", &self.config)
            .finish()
    }
}

impl RecoveryRuntimeConfig {
    /// Start the runtime.
    ///
    /// Runs one full recovery pass synchronously before returning, then
    /// spawns the periodic scheduler task. A failure of the startup pass is
    /// fatal and surfaces here, before the node accepts any new work.
    pub async fn start(self) -> Result<RecoveryRuntime> {
        let counts = self.service.recover_all().await?;
        info!(recovered = counts.total(), "startup recovery pass finished");

        let scheduler = RecoveryScheduler::new(self.service.clone(), &self.config);
        let shutdown = scheduler.shutdown_handle();
        let scheduler_handle = tokio::spawn(scheduler.run());

        info!("RecoveryRuntime started");

        Ok(RecoveryRuntime {
            service: self.service,
            scheduler_handle,
            shutdown,
        })
    }
}

/// A running recovery subsystem that can be embedded in a node.
///
/// Call [`shutdown`](Self::shutdown) for graceful termination.
pub struct RecoveryRuntime {
    service: Arc<RecoveryService>,
    scheduler_handle: JoinHandle<()>,
    shutdown: Arc<Notify>,
}

impl RecoveryRuntime {
    /// Create a new builder for configuring the runtime.
    pub fn builder() -> RecoveryRuntimeBuilder {
        RecoveryRuntimeBuilder::new()
    }

    /// Get a reference to the recovery service, e.g. to trigger an
    /// on-demand pass.
    pub fn service(&self) -> &Arc<RecoveryService> {
        &self.service
    }

    /// Check if the periodic scheduler is still running.
    pub fn is_running(&self) -> bool {
        !self.scheduler_handle.is_finished()
    }

    /// Gracefully shut down the periodic scheduler and wait for it to stop.
    pub async fn shutdown(self) -> Result<()> {
        info!("RecoveryRuntime shutting down...");
        self.shutdown.notify_one();

        match self.scheduler_handle.await {
            Ok(()) => {
                info!("RecoveryRuntime shutdown complete");
                Ok(())
            }
            Err(e) => {
                error!("recovery scheduler task panicked: {}", e);
                Err(anyhow::anyhow!("scheduler task panicked: {}", e))
            }
        }
    }
}
