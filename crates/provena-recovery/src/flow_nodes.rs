// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Batch resumption of flow-node instances.

use std::collections::HashSet;
use std::sync::Arc;

use async_trait::async_trait;
use provena_process_model::{FlowNodeKind, FlowNodeSnapshot};
use tracing::{debug, warn};

use crate::batch::BatchExecutor;
use crate::decider::FlowNodeResumeDecider;
use crate::error::Result;
use crate::monitor::{ElementOutcome, RecoveryCounts};
use crate::reader::RecoveryReader;
use crate::states::GatewayEvaluator;
use crate::work::WorkService;

/// Resumes one batch of flow-node instances inside the caller's transaction.
pub struct FlowNodeResumer {
    reader: Arc<dyn RecoveryReader>,
    works: Arc<dyn WorkService>,
    gateways: Arc<dyn GatewayEvaluator>,
    decider: FlowNodeResumeDecider,
}

impl FlowNodeResumer {
    /// Resumer over the given collaborators.
    pub fn new(
        reader: Arc<dyn RecoveryReader>,
        works: Arc<dyn WorkService>,
        gateways: Arc<dyn GatewayEvaluator>,
        decider: FlowNodeResumeDecider,
    ) -> Self {
        Self {
            reader,
            works,
            gateways,
            decider,
        }
    }

    async fn recover_flow_node(&self, node: &mut FlowNodeSnapshot) -> Result<ElementOutcome> {
        if node.terminal {
            debug!(
                flow_node = node.id,
                state = %node.state_name,
                "terminal flow node, notifying parent"
            );
            self.works
                .submit_notify_parent_finished(
                    node.process_definition_id,
                    node.parent_process_instance_id,
                    node.id,
                )
                .await?;
            return Ok(ElementOutcome::Finishing);
        }

        self.refresh_gateway_merge(node).await?;

        if self.decider.should_resume(node)? {
            debug!(
                flow_node = node.id,
                state = %node.state_name,
                "resuming flow node"
            );
            self.works
                .submit_execute_flow_node(
                    node.process_definition_id,
                    node.parent_process_instance_id,
                    node.id,
                )
                .await?;
            Ok(ElementOutcome::Executing)
        } else {
            debug!(
                flow_node = node.id,
                state = %node.state_name,
                "flow node not executable in its current state"
            );
            Ok(ElementOutcome::NotExecutable)
        }
    }

    /// Re-derive a gateway's merge condition against the live process
    /// definition. The flag loaded with the snapshot may predate branch
    /// arrivals that raced the candidate scan.
    async fn refresh_gateway_merge(&self, node: &mut FlowNodeSnapshot) -> Result<()> {
        if node.state_category.is_interrupting() {
            // An interrupted gateway resumes unconditionally; the merge flag
            // never reaches the decision.
            return Ok(());
        }
        let process_definition_id = node.process_definition_id;
        let gateway_id = node.id;
        if let FlowNodeKind::Gateway(details) = &mut node.kind {
            details.merge_complete = self
                .gateways
                .merging_condition_met(process_definition_id, gateway_id)
                .await?;
        }
        Ok(())
    }
}

#[async_trait]
impl BatchExecutor for FlowNodeResumer {
    /// Handle every flow-node id in `ids`, producing exactly one outcome
    /// per id.
    ///
    /// Ids the read layer no longer resolves count as not-found (they were
    /// dispositioned through normal means between scan and recovery). A
    /// failure on one snapshot counts it in-error and never stops the rest
    /// of the batch.
    async fn execute(&self, ids: &[i64]) -> Result<RecoveryCounts> {
        let mut counts = RecoveryCounts::default();
        let mut unresolved: HashSet<i64> = ids.iter().copied().collect();

        let snapshots = self.reader.flow_node_snapshots(ids).await?;
        for mut node in snapshots {
            unresolved.remove(&node.id);
            match self.recover_flow_node(&mut node).await {
                Ok(outcome) => counts.record(outcome),
                Err(e) => {
                    warn!(
                        flow_node = node.id,
                        name = %node.name,
                        error = %e,
                        "failed to recover flow node"
                    );
                    counts.record(ElementOutcome::InError);
                }
            }
        }

        for id in &unresolved {
            debug!(flow_node = id, "flow node gone before recovery, skipping");
        }
        counts.not_found += unresolved.len() as u64;

        Ok(counts)
    }
}
