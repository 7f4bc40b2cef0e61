// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Work-submission contract for asynchronous resumption.

use async_trait::async_trait;
use provena_process_model::ConnectorEvent;

use crate::error::RecoveryError;

/// Submission of asynchronous engine work.
///
/// Submissions are fire-and-forget: they enqueue work that executes off the
/// caller's stack once the surrounding transaction commits, and nothing is
/// awaited or reported back. Submissions are at-least-once across crashes,
/// so the executing side must tolerate duplicates for the same element.
#[async_trait]
pub trait WorkService: Send + Sync {
    /// Enqueue execution of a flow node.
    async fn submit_execute_flow_node(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    ) -> Result<(), RecoveryError>;

    /// Enqueue notification that a terminal flow node finished, so its
    /// parent can advance past it.
    async fn submit_notify_parent_finished(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    ) -> Result<(), RecoveryError>;

    /// Enqueue evaluation of a process's connectors for the given lifecycle
    /// event.
    async fn register_connectors_to_execute(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        event: ConnectorEvent,
    ) -> Result<(), RecoveryError>;
}
