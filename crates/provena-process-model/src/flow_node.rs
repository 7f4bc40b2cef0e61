// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flow-node states, categories, kinds, and instance snapshots.

use serde::{Deserialize, Serialize};

/// Cross-cutting classification of how a flow node is being torn down.
///
/// Orthogonal to the specific state id: a node keeps its current state while
/// the category records that the enclosing scope is aborting or cancelling.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StateCategory {
    /// Regular forward execution.
    Normal,
    /// The node is being torn down because its scope was aborted (e.g. by an
    /// interrupting event).
    Aborting,
    /// The node is being torn down because its scope was explicitly cancelled.
    Cancelling,
}

impl StateCategory {
    /// Whether this category interrupts regular forward execution.
    pub fn is_interrupting(self) -> bool {
        matches!(self, StateCategory::Aborting | StateCategory::Cancelling)
    }
}

/// State-machine metadata for one flow-node state.
///
/// The engine's state registry maps every state id to one of these; services
/// consult it to learn attributes of a state a node is about to enter.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FlowNodeState {
    /// Numeric state id, unique within the state machine.
    pub id: u32,
    /// Stable state name (e.g. `"waiting"`, `"completed"`).
    pub name: &'static str,
    /// Whether the state only changes on external stimulus.
    pub stable: bool,
    /// Whether the state is final.
    pub terminal: bool,
    /// The category this state itself belongs to.
    pub category: StateCategory,
}

/// Gateway flavor, deciding how incoming branches are merged.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum GatewayType {
    /// First arriving branch wins.
    Exclusive,
    /// All activated incoming branches must arrive.
    Inclusive,
    /// All incoming branches must arrive.
    Parallel,
}

/// Gateway-specific snapshot fields.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct GatewayDetails {
    /// How this gateway merges its incoming branches.
    pub gateway_type: GatewayType,
    /// Whether the merge condition is met, derived against the process
    /// definition when the snapshot was materialized.
    pub merge_complete: bool,
}

/// The kind of a flow node, with kind-specific fields on the variant that
/// needs them.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FlowNodeKind {
    /// Service/script task executed by the engine itself.
    AutomaticTask,
    /// Task assigned to a human actor.
    UserTask,
    /// Task performed outside the engine and reported done.
    ManualTask,
    /// Node that starts another process as a sub-process.
    CallActivity,
    /// Embedded sub-process scope.
    SubProcess,
    /// Converging/diverging gateway.
    Gateway(GatewayDetails),
    /// Scope entry event.
    StartEvent,
    /// Scope exit event.
    EndEvent,
    /// Event the node waits on (timer, message, signal).
    IntermediateCatchEvent,
    /// Event the node emits while passing through.
    IntermediateThrowEvent,
    /// Event attached to an activity's boundary.
    BoundaryEvent,
}

impl FlowNodeKind {
    /// Whether this node is a gateway.
    pub fn is_gateway(&self) -> bool {
        matches!(self, FlowNodeKind::Gateway(_))
    }
}

/// Read-only view of one flow-node instance, as returned by the engine's
/// activity read layer.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FlowNodeSnapshot {
    /// Flow-node instance id.
    pub id: i64,
    /// Display name from the process definition.
    pub name: String,
    /// Id of the state the node is currently in.
    pub state_id: u32,
    /// Name of the state the node is currently in.
    pub state_name: String,
    /// Whether the current state is stable.
    pub stable: bool,
    /// Whether the current state is terminal.
    pub terminal: bool,
    /// Tear-down category the node is currently under.
    pub state_category: StateCategory,
    /// Node kind, with kind-specific fields where applicable.
    pub kind: FlowNodeKind,
    /// Definition of the process this node belongs to.
    pub process_definition_id: i64,
    /// Process instance directly containing this node.
    pub parent_process_instance_id: i64,
}

impl FlowNodeSnapshot {
    /// Whether the node is being torn down by an abort.
    pub fn is_aborting(&self) -> bool {
        self.state_category == StateCategory::Aborting
    }

    /// Whether the node is being torn down by a cancellation.
    pub fn is_canceling(&self) -> bool {
        self.state_category == StateCategory::Cancelling
    }

    /// Whether the node is a gateway.
    pub fn is_gateway(&self) -> bool {
        self.kind.is_gateway()
    }
}
