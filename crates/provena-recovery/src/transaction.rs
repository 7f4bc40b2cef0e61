// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Transactional execution contract.

use async_trait::async_trait;
use futures::future::BoxFuture;

use crate::error::RecoveryError;

/// Unit of work executed inside one transaction.
pub type TransactionWork<'a> = BoxFuture<'a, Result<(), RecoveryError>>;

/// Atomic execution of a unit of work.
///
/// The implementation opens a transaction, drives `work` to completion and
/// commits. An `Err` from the work (or from the commit itself) rolls the
/// transaction back and is returned to the caller; no partially applied
/// state survives.
#[async_trait]
pub trait TransactionExecutor: Send + Sync {
    /// Run `work` inside one transaction.
    async fn in_transaction(&self, work: TransactionWork<'_>) -> Result<(), RecoveryError>;
}
