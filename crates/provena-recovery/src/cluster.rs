// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Cluster-coordination contract.

use async_trait::async_trait;

/// Leader election for cluster-wide periodic recovery.
///
/// At most one node of a cluster may answer `true` at any given moment;
/// periodic recovery runs only on that node. Single-node deployments answer
/// `true` unconditionally.
#[async_trait]
pub trait ClusterCoordinator: Send + Sync {
    /// Whether this node currently performs periodic recovery.
    async fn is_responsible_for_recovery(&self) -> bool;
}
