// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transactional batching over element ids.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::error;

use crate::error::Result;
use crate::monitor::{ProgressMonitor, RecoveryCounts};
use crate::transaction::TransactionExecutor;

/// One kind of batched recovery work, executed inside a caller-supplied
/// transaction.
#[async_trait]
pub trait BatchExecutor: Send + Sync {
    /// Handle every id in `ids`, returning the batch's outcome counters.
    ///
    /// Implementations must produce exactly one outcome per id and absorb
    /// per-element failures; an `Err` means the batch as a whole could not
    /// be processed.
    async fn execute(&self, ids: &[i64]) -> Result<RecoveryCounts>;
}

/// Runs element batches sequentially, one transaction per batch, isolating
/// batch-level failures.
pub struct BatchCoordinator {
    transactions: Arc<dyn TransactionExecutor>,
}

impl BatchCoordinator {
    /// Coordinator committing through the given transaction executor.
    pub fn new(transactions: Arc<dyn TransactionExecutor>) -> Self {
        Self { transactions }
    }

    /// Split `ids` into consecutive chunks of `batch_size` and run each
    /// chunk through `executor` inside its own transaction.
    ///
    /// A failed batch is logged with its element ids for manual follow-up
    /// and skipped; its elements contribute nothing to the monitor, and the
    /// run always continues with the next batch. A progress line is emitted
    /// after every batch.
    ///
    /// # Panics
    ///
    /// Panics if `batch_size` is zero.
    pub async fn run_in_batches(
        &self,
        monitor: &mut ProgressMonitor,
        ids: &[i64],
        batch_size: usize,
        executor: &dyn BatchExecutor,
    ) {
        assert!(batch_size > 0, "batch_size must be greater than zero");

        for chunk in ids.chunks(batch_size) {
            let mut outcome = RecoveryCounts::default();
            let result = self
                .transactions
                .in_transaction(Box::pin(async {
                    outcome = executor.execute(chunk).await?;
                    Ok(())
                }))
                .await;

            match result {
                Ok(()) => monitor.merge(outcome),
                Err(e) => {
                    error!(
                        error = %e,
                        elements = ?chunk,
                        "recovery batch failed, continuing with the next batch"
                    );
                }
            }
            monitor.log_progress();
        }
    }
}
