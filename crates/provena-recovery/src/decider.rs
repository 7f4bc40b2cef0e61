// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Decision logic for resuming a flow node.

use std::sync::Arc;

use provena_process_model::{FlowNodeKind, FlowNodeSnapshot};

use crate::error::{RecoveryError, Result};
use crate::states::FlowNodeStateRegistry;

/// Decides whether a flow node left behind by a crash must be resumed.
///
/// Pure over its inputs: the same snapshot always yields the same answer.
pub struct FlowNodeResumeDecider {
    states: Arc<dyn FlowNodeStateRegistry>,
}

impl FlowNodeResumeDecider {
    /// Decider over the given state registry.
    pub fn new(states: Arc<dyn FlowNodeStateRegistry>) -> Self {
        Self { states }
    }

    /// Whether the node must be resumed. Rules, first match wins:
    ///
    /// 1. A stable, non-terminal node under an aborting/cancelling category
    ///    is resumed only when its current state belongs to a different
    ///    category. Such a node still has work to do before the tear-down
    ///    can proceed (a call activity waiting for its children during an
    ///    abort), whereas a node parked in a state of the tear-down's own
    ///    category is already where the tear-down wants it (a cancelled
    ///    boundary event waiting out its scope).
    /// 2. A gateway is resumed when it is aborting, cancelling, or its merge
    ///    condition is met. Gateways are otherwise parked unstable while
    ///    waiting for sibling branches and must not fire early.
    /// 3. Anything else was interrupted mid-execution and simply continues.
    pub fn should_resume(&self, node: &FlowNodeSnapshot) -> Result<bool> {
        if node.state_category.is_interrupting() && !node.terminal && node.stable {
            let state = self
                .states
                .state_for(node.state_id)
                .ok_or(RecoveryError::UnknownState(node.state_id))?;
            return Ok(state.category != node.state_category);
        }

        if let FlowNodeKind::Gateway(details) = &node.kind {
            return Ok(node.is_aborting() || node.is_canceling() || details.merge_complete);
        }

        Ok(true)
    }
}
