// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Provena Process Model - Engine Domain Types
//!
//! This crate provides the read-only domain model shared across the Provena
//! engine: flow-node state metadata, the flow-node kind taxonomy, and
//! snapshot views of running flow-node and process instances as returned by
//! the engine's read layer.
//!
//! Snapshots are plain data. Services that act on them (execution,
//! recovery, supervision) consume these types through their own collaborator
//! seams; nothing in this crate performs I/O.
//!
//! # Flow-Node State Model
//!
//! Every flow-node instance is in exactly one state at a time. A state
//! carries three orthogonal attributes:
//!
//! | Attribute | Meaning |
//! |-----------|---------|
//! | `stable` | The state does not change without external stimulus (e.g. a user task waiting for assignment) |
//! | `terminal` | The state is final; the node only awaits completion notification |
//! | `category` | Why the node is being torn down: `Normal`, `Aborting`, or `Cancelling` |
//!
//! The category is orthogonal to the state id: a call activity can sit in
//! its regular "waiting for children" state while its category says the
//! enclosing scope is aborting.
//!
//! # Process Lifecycle
//!
//! ```text
//!                  ┌──────────────┐
//!                  │ INITIALIZING │
//!                  └──────┬───────┘
//!                         │ enter connectors done
//!                         ▼
//!                  ┌──────────────┐
//!       ┌──────────│   STARTED    │──────────┐
//!       │          └──────┬───────┘          │
//!       │                 │                  │
//!  abort│          all nodes done       cancel
//!       │                 │                  │
//!       ▼                 ▼                  ▼
//! ┌──────────┐     ┌──────────────┐   ┌────────────┐
//! │ ABORTING │     │  COMPLETING  │   │ CANCELLING │
//! └────┬─────┘     └──────┬───────┘   └─────┬──────┘
//!      │                  │ finish          │
//!      │                  │ connectors done │
//!      ▼                  ▼                 ▼
//! ┌──────────┐     ┌──────────────┐   ┌────────────┐
//! │ ABORTED  │     │  COMPLETED   │   │ CANCELLED  │
//! └──────────┘     └──────────────┘   └────────────┘
//! ```
//!
//! # Modules
//!
//! - [`flow_node`]: flow-node states, categories, kinds, and instance snapshots
//! - [`process`]: process lifecycle states, instance/definition/activity views,
//!   connector activation events

#![deny(missing_docs)]

/// Flow-node state metadata, kind taxonomy, and instance snapshots.
pub mod flow_node;

/// Process lifecycle states, instance views, and connector events.
pub mod process;

pub use flow_node::{
    FlowNodeKind, FlowNodeSnapshot, FlowNodeState, GatewayDetails, GatewayType, StateCategory,
};
pub use process::{
    ActivityHandle, ConnectorEvent, ProcessDefinitionHandle, ProcessInstanceSnapshot, ProcessState,
};
