// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Process lifecycle states, instance views, and connector events.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Lifecycle state of a process instance.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ProcessState {
    /// Created; on-enter connectors have not finished yet.
    Initializing,
    /// Actively executing flow nodes.
    Started,
    /// Paused by an operator; no flow nodes advance.
    Suspended,
    /// All flow nodes done; on-finish connectors are running.
    Completing,
    /// Finished successfully.
    Completed,
    /// Being torn down after an abort.
    Aborting,
    /// Torn down by an abort.
    Aborted,
    /// Being torn down after a cancellation.
    Cancelling,
    /// Torn down by a cancellation.
    Cancelled,
}

impl ProcessState {
    /// Whether this state is final.
    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            ProcessState::Completed | ProcessState::Aborted | ProcessState::Cancelled
        )
    }
}

impl fmt::Display for ProcessState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            ProcessState::Initializing => "initializing",
            ProcessState::Started => "started",
            ProcessState::Suspended => "suspended",
            ProcessState::Completing => "completing",
            ProcessState::Completed => "completed",
            ProcessState::Aborting => "aborting",
            ProcessState::Aborted => "aborted",
            ProcessState::Cancelling => "cancelling",
            ProcessState::Cancelled => "cancelled",
        };
        write!(f, "{}", name)
    }
}

/// Read-only view of one process instance.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessInstanceSnapshot {
    /// Process instance id.
    pub id: i64,
    /// Display name from the process definition.
    pub name: String,
    /// Definition this instance was started from.
    pub process_definition_id: i64,
    /// Current lifecycle state.
    pub state: ProcessState,
    /// Call activity that started this instance, when it runs as a
    /// sub-process.
    pub caller_id: Option<i64>,
    /// Whether the instance was torn down by an interrupting event, in which
    /// case completion is propagated by the event handling itself.
    pub interrupted_by_event: bool,
}

/// Handle on a deployed process definition.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ProcessDefinitionHandle {
    /// Definition id.
    pub id: i64,
    /// Process name.
    pub name: String,
    /// Deployed version string.
    pub version: String,
}

/// Read-only view of an activity instance, as needed for call-activity
/// parent lookups.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ActivityHandle {
    /// Activity instance id.
    pub id: i64,
    /// Display name from the process definition.
    pub name: String,
    /// Definition of the process this activity belongs to.
    pub process_definition_id: i64,
    /// Process instance directly containing this activity.
    pub parent_process_instance_id: i64,
    /// Whether the activity is in the failed state.
    pub failed: bool,
}

/// Point in a process's lifecycle at which registered connectors run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ConnectorEvent {
    /// Connectors evaluated while the process is initializing.
    OnEnter,
    /// Connectors evaluated while the process is completing.
    OnFinish,
}

impl fmt::Display for ConnectorEvent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConnectorEvent::OnEnter => write!(f, "ON_ENTER"),
            ConnectorEvent::OnFinish => write!(f, "ON_FINISH"),
        }
    }
}
