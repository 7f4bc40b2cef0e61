// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Recovery plan units.

use serde::Serialize;

/// Which id space a recovery candidate id belongs to.
///
/// Flow-node instance ids and process instance ids are independent and are
/// never compared with each other.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ElementKind {
    /// A flow-node instance.
    FlowNode,
    /// A process instance.
    Process,
}

/// One recoverable unit discovered by a candidate scan.
///
/// Transient: created during scanning, consumed once by the orchestrator,
/// never persisted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ElementToRecover {
    /// Instance id, interpreted according to `kind`.
    pub id: i64,
    /// Which id space the id belongs to.
    pub kind: ElementKind,
}

impl ElementToRecover {
    /// A flow-node instance to recover.
    pub fn flow_node(id: i64) -> Self {
        Self {
            id,
            kind: ElementKind::FlowNode,
        }
    }

    /// A process instance to recover.
    pub fn process(id: i64) -> Self {
        Self {
            id,
            kind: ElementKind::Process,
        }
    }
}
