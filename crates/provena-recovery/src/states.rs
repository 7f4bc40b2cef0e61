// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Flow-node state registry and gateway evaluation contracts.

use std::collections::HashMap;

use async_trait::async_trait;
use provena_process_model::FlowNodeState;

use crate::error::RecoveryError;

/// Lookup of flow-node state metadata by state id.
pub trait FlowNodeStateRegistry: Send + Sync {
    /// Metadata for `state_id`, or `None` when the id is unknown.
    fn state_for(&self, state_id: u32) -> Option<&FlowNodeState>;
}

/// Map-backed state registry, populated from the host's state machine.
#[derive(Debug, Default)]
pub struct StateCatalog {
    states: HashMap<u32, FlowNodeState>,
}

impl StateCatalog {
    /// Empty catalog.
    pub fn new() -> Self {
        Self::default()
    }

    /// Catalog over the given states.
    pub fn with_states(states: impl IntoIterator<Item = FlowNodeState>) -> Self {
        Self {
            states: states.into_iter().map(|state| (state.id, state)).collect(),
        }
    }

    /// Add one state, replacing any previous state with the same id.
    pub fn insert(&mut self, state: FlowNodeState) {
        self.states.insert(state.id, state);
    }
}

impl FlowNodeStateRegistry for StateCatalog {
    fn state_for(&self, state_id: u32) -> Option<&FlowNodeState> {
        self.states.get(&state_id)
    }
}

/// Live evaluation of a gateway's merge condition against its process
/// definition.
#[async_trait]
pub trait GatewayEvaluator: Send + Sync {
    /// Whether all required incoming branches of the gateway have arrived.
    async fn merging_condition_met(
        &self,
        process_definition_id: i64,
        gateway_instance_id: i64,
    ) -> Result<bool, RecoveryError>;
}
