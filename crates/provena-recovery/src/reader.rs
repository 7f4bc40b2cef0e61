// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Read-layer contract consumed by the recovery subsystem.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use provena_process_model::{
    ActivityHandle, FlowNodeSnapshot, ProcessDefinitionHandle, ProcessInstanceSnapshot,
};

use crate::error::RecoveryError;

/// Read access to the engine's instance stores.
///
/// Implemented by the host's persistence layer. Listing calls paginate with
/// `limit`/`offset`; `stuck_before` restricts candidates to elements whose
/// last state change predates the given instant.
#[async_trait]
pub trait RecoveryReader: Send + Sync {
    /// Ids of flow-node instances parked in a transient state.
    async fn list_flow_node_ids_to_recover(
        &self,
        stuck_before: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<i64>, RecoveryError>;

    /// Ids of process instances parked in a recoverable lifecycle state.
    async fn list_process_instance_ids_to_recover(
        &self,
        stuck_before: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<i64>, RecoveryError>;

    /// Snapshots for the given flow-node instance ids.
    ///
    /// Ids that no longer resolve to a live row are simply absent from the
    /// result; that is not an error.
    async fn flow_node_snapshots(&self, ids: &[i64])
    -> Result<Vec<FlowNodeSnapshot>, RecoveryError>;

    /// One process instance, or `None` when it no longer exists.
    async fn process_instance(
        &self,
        id: i64,
    ) -> Result<Option<ProcessInstanceSnapshot>, RecoveryError>;

    /// One deployed process definition, or `None` when unknown.
    async fn process_definition(
        &self,
        id: i64,
    ) -> Result<Option<ProcessDefinitionHandle>, RecoveryError>;

    /// One activity instance, or `None` when it no longer exists.
    async fn activity_instance(&self, id: i64) -> Result<Option<ActivityHandle>, RecoveryError>;
}
