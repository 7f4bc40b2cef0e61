// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Batch resumption of process instances.

use std::sync::Arc;

use async_trait::async_trait;
use provena_process_model::{ConnectorEvent, ProcessInstanceSnapshot, ProcessState};
use tracing::{debug, warn};

use crate::batch::BatchExecutor;
use crate::error::{RecoveryError, Result};
use crate::monitor::{ElementOutcome, RecoveryCounts};
use crate::reader::RecoveryReader;
use crate::work::WorkService;

/// Resumes one batch of process instances inside the caller's transaction.
pub struct ProcessResumer {
    reader: Arc<dyn RecoveryReader>,
    works: Arc<dyn WorkService>,
}

impl ProcessResumer {
    /// Resumer over the given collaborators.
    pub fn new(reader: Arc<dyn RecoveryReader>, works: Arc<dyn WorkService>) -> Self {
        Self { reader, works }
    }

    async fn recover_process_instance(&self, id: i64) -> Result<ElementOutcome> {
        let Some(instance) = self.reader.process_instance(id).await? else {
            // Completed and archived through normal means between scan and
            // recovery.
            debug!(
                process_instance = id,
                "process instance gone before recovery, skipping"
            );
            return Ok(ElementOutcome::NotFound);
        };

        let Some(definition) = self
            .reader
            .process_definition(instance.process_definition_id)
            .await?
        else {
            return Err(RecoveryError::Read(format!(
                "process definition {} not found for instance {}",
                instance.process_definition_id, id
            )));
        };

        match instance.state {
            // Completed instances are archived synchronously on completion;
            // seeing one here means completion handling was cut short.
            ProcessState::Aborted | ProcessState::Cancelled | ProcessState::Completed => {
                self.propagate_completion(&instance).await?;
                Ok(ElementOutcome::Finishing)
            }
            ProcessState::Completing => {
                debug!(
                    process_instance = id,
                    process = %definition.name,
                    "registering on-finish connectors"
                );
                self.works
                    .register_connectors_to_execute(
                        instance.process_definition_id,
                        instance.id,
                        ConnectorEvent::OnFinish,
                    )
                    .await?;
                Ok(ElementOutcome::Finishing)
            }
            ProcessState::Initializing => {
                debug!(
                    process_instance = id,
                    process = %definition.name,
                    "registering on-enter connectors"
                );
                self.works
                    .register_connectors_to_execute(
                        instance.process_definition_id,
                        instance.id,
                        ConnectorEvent::OnEnter,
                    )
                    .await?;
                Ok(ElementOutcome::Executing)
            }
            state => {
                debug!(
                    process_instance = id,
                    state = %state,
                    "process instance not recoverable in its current state"
                );
                Ok(ElementOutcome::NotExecutable)
            }
        }
    }

    /// Wake the call activity that started a finished sub-process, so the
    /// caller advances past it.
    async fn propagate_completion(&self, instance: &ProcessInstanceSnapshot) -> Result<()> {
        if instance.interrupted_by_event {
            // The interrupting event handling owns completion propagation.
            return Ok(());
        }
        let Some(caller_id) = instance.caller_id else {
            return Ok(());
        };

        match self.reader.activity_instance(caller_id).await? {
            Some(parent) if !parent.failed => {
                debug!(
                    process_instance = instance.id,
                    caller = caller_id,
                    "notifying parent call activity"
                );
                self.works
                    .submit_execute_flow_node(
                        parent.process_definition_id,
                        parent.parent_process_instance_id,
                        parent.id,
                    )
                    .await?;
            }
            Some(_) => {
                debug!(
                    process_instance = instance.id,
                    caller = caller_id,
                    "parent call activity failed, not notifying"
                );
            }
            None => {
                debug!(
                    process_instance = instance.id,
                    caller = caller_id,
                    "parent call activity gone, not notifying"
                );
            }
        }
        Ok(())
    }
}

#[async_trait]
impl BatchExecutor for ProcessResumer {
    /// Handle every process-instance id in `ids` independently, producing
    /// exactly one outcome per id; a failure on one id never stops the rest
    /// of the batch.
    async fn execute(&self, ids: &[i64]) -> Result<RecoveryCounts> {
        let mut counts = RecoveryCounts::default();
        for &id in ids {
            match self.recover_process_instance(id).await {
                Ok(outcome) => counts.record(outcome),
                Err(e) => {
                    warn!(
                        process_instance = id,
                        error = %e,
                        "failed to recover process instance"
                    );
                    counts.record(ElementOutcome::InError);
                }
            }
        }
        Ok(counts)
    }
}
