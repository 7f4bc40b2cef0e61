// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Top-level orchestration of a recovery run.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::batch::BatchCoordinator;
use crate::cluster::ClusterCoordinator;
use crate::config::RecoveryConfig;
use crate::decider::FlowNodeResumeDecider;
use crate::element::{ElementKind, ElementToRecover};
use crate::error::{RecoveryError, Result};
use crate::flow_nodes::FlowNodeResumer;
use crate::monitor::{ProgressMonitor, RecoveryCounts};
use crate::processes::ProcessResumer;
use crate::reader::RecoveryReader;
use crate::scanner::CandidateElementScanner;
use crate::states::{FlowNodeStateRegistry, GatewayEvaluator};
use crate::transaction::TransactionExecutor;
use crate::work::WorkService;

/// Orchestrates crash recovery of flow nodes and process instances.
///
/// Two entry points: [`recover_all`](Self::recover_all) runs once at node
/// startup and recovers everything regardless of age;
/// [`recover_stuck`](Self::recover_stuck) runs on the periodic trigger and
/// recovers elements older than the configured threshold, on the one node
/// the cluster holds responsible.
///
/// Only candidate-scan failures propagate out of either entry point. Batch
/// and per-element failures are logged, counted and absorbed, so one bad
/// element never blocks recovery of the rest.
pub struct RecoveryService {
    scanner: CandidateElementScanner,
    flow_nodes: FlowNodeResumer,
    processes: ProcessResumer,
    batch: BatchCoordinator,
    transactions: Arc<dyn TransactionExecutor>,
    cluster: Arc<dyn ClusterCoordinator>,
    config: RecoveryConfig,
}

impl RecoveryService {
    /// Wire a recovery service from its collaborators.
    pub fn new(
        reader: Arc<dyn RecoveryReader>,
        works: Arc<dyn WorkService>,
        states: Arc<dyn FlowNodeStateRegistry>,
        gateways: Arc<dyn GatewayEvaluator>,
        transactions: Arc<dyn TransactionExecutor>,
        cluster: Arc<dyn ClusterCoordinator>,
        config: RecoveryConfig,
    ) -> Self {
        let scanner = CandidateElementScanner::new(reader.clone(), config.scan_page_size);
        let decider = FlowNodeResumeDecider::new(states);
        let flow_nodes = FlowNodeResumer::new(reader.clone(), works.clone(), gateways, decider);
        let processes = ProcessResumer::new(reader, works);
        let batch = BatchCoordinator::new(transactions.clone());

        Self {
            scanner,
            flow_nodes,
            processes,
            batch,
            transactions,
            cluster,
            config,
        }
    }

    /// Recover every element parked in a transient state, regardless of age.
    ///
    /// Runs once at node startup, before the node accepts new work. A scan
    /// failure is fatal and propagates; the startup sequence is expected to
    /// fail loudly on it.
    pub async fn recover_all(&self) -> Result<RecoveryCounts> {
        info!("starting full recovery of transient flow nodes and process instances");
        let elements = self.scan(Utc::now()).await?;
        Ok(self.recover(elements).await)
    }

    /// Recover elements stuck for longer than the configured threshold.
    ///
    /// Runs on the periodic trigger. Returns `Ok(None)` without side effects
    /// when another node is responsible for periodic recovery.
    pub async fn recover_stuck(&self) -> Result<Option<RecoveryCounts>> {
        if !self.cluster.is_responsible_for_recovery().await {
            info!("another node is responsible for periodic recovery, skipping");
            return Ok(None);
        }

        let threshold = chrono::Duration::from_std(self.config.stuck_threshold)
            .map_err(|e| RecoveryError::Other(format!("invalid stuck threshold: {}", e)))?;
        info!(
            stuck_threshold_secs = self.config.stuck_threshold.as_secs(),
            "starting periodic recovery of stuck elements"
        );
        let elements = self.scan(Utc::now() - threshold).await?;
        Ok(Some(self.recover(elements).await))
    }

    /// Obtain the full candidate set inside one transaction.
    async fn scan(&self, stuck_before: DateTime<Utc>) -> Result<Vec<ElementToRecover>> {
        let mut elements = Vec::new();
        self.transactions
            .in_transaction(Box::pin(async {
                elements = self.scanner.scan(stuck_before).await?;
                Ok(())
            }))
            .await?;
        Ok(elements)
    }

    /// Recover the scanned elements, flow nodes strictly before process
    /// instances: a process's completion handling relies on its child nodes
    /// being dispositioned first.
    async fn recover(&self, elements: Vec<ElementToRecover>) -> RecoveryCounts {
        let mut monitor = ProgressMonitor::new(elements.len() as u64);
        let (flow_node_ids, process_ids) = partition(elements);
        info!(
            flow_nodes = flow_node_ids.len(),
            processes = process_ids.len(),
            "recovering elements"
        );

        self.batch
            .run_in_batches(
                &mut monitor,
                &flow_node_ids,
                self.config.batch_size,
                &self.flow_nodes,
            )
            .await;
        self.batch
            .run_in_batches(
                &mut monitor,
                &process_ids,
                self.config.batch_size,
                &self.processes,
            )
            .await;

        monitor.log_summary();
        monitor.into_counts()
    }
}

fn partition(elements: Vec<ElementToRecover>) -> (Vec<i64>, Vec<i64>) {
    let mut flow_nodes = Vec::new();
    let mut processes = Vec::new();
    for element in elements {
        match element.kind {
            ElementKind::FlowNode => flow_nodes.push(element.id),
            ElementKind::Process => processes.push(element.id),
        }
    }
    (flow_nodes, processes)
}
