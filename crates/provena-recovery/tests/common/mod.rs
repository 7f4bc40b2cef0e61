// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Common test infrastructure for provena-recovery integration tests.
//!
//! Provides an in-memory engine standing in for every collaborator the
//! recovery subsystem consumes, with call recording and failure injection.

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use provena_process_model::{
    ActivityHandle, ConnectorEvent, FlowNodeKind, FlowNodeSnapshot, FlowNodeState, GatewayDetails,
    GatewayType, ProcessDefinitionHandle, ProcessInstanceSnapshot, ProcessState, StateCategory,
};
use provena_recovery::transaction::TransactionWork;
use provena_recovery::{
    ClusterCoordinator, GatewayEvaluator, RecoveryConfig, RecoveryError, RecoveryReader,
    RecoveryService, StateCatalog, TransactionExecutor, WorkService,
};

/// State id of the transient "executing" state.
pub const EXECUTING_STATE: u32 = 2;
/// State id of the stable "waiting" state.
pub const WAITING_STATE: u32 = 4;
/// State id of the terminal "completed" state.
pub const COMPLETED_STATE: u32 = 5;

/// Initialize test logging once; repeated calls are no-ops.
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(tracing_subscriber::EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// The state machine used by the integration tests.
pub fn default_catalog() -> StateCatalog {
    StateCatalog::with_states([
        FlowNodeState {
            id: EXECUTING_STATE,
            name: "executing",
            stable: false,
            terminal: false,
            category: StateCategory::Normal,
        },
        FlowNodeState {
            id: WAITING_STATE,
            name: "waiting",
            stable: true,
            terminal: false,
            category: StateCategory::Normal,
        },
        FlowNodeState {
            id: COMPLETED_STATE,
            name: "completed",
            stable: false,
            terminal: true,
            category: StateCategory::Normal,
        },
    ])
}

/// One work submission recorded by the in-memory engine.
#[derive(Debug, Clone, PartialEq)]
pub enum SubmittedWork {
    /// Flow-node execution was enqueued.
    ExecuteFlowNode {
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    },
    /// A finished-notification for a terminal flow node was enqueued.
    NotifyParentFinished {
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    },
    /// Connector evaluation was enqueued.
    Connectors {
        process_definition_id: i64,
        process_instance_id: i64,
        event: ConnectorEvent,
    },
}

/// In-memory engine standing in for every collaborator of the recovery
/// subsystem.
#[derive(Default)]
pub struct InMemoryEngine {
    pub flow_node_candidates: Mutex<Vec<i64>>,
    pub process_candidates: Mutex<Vec<i64>>,
    pub flow_nodes: Mutex<HashMap<i64, FlowNodeSnapshot>>,
    pub process_instances: Mutex<HashMap<i64, ProcessInstanceSnapshot>>,
    pub definitions: Mutex<HashMap<i64, ProcessDefinitionHandle>>,
    pub activities: Mutex<HashMap<i64, ActivityHandle>>,
    pub merge_results: Mutex<HashMap<i64, bool>>,
    pub submitted: Mutex<Vec<SubmittedWork>>,
    pub transactions_begun: AtomicUsize,
    /// 1-based indices of transactions that fail before running their work.
    pub fail_transactions: Mutex<HashSet<usize>>,
    pub fail_scan: AtomicBool,
    pub responsible: AtomicBool,
    pub list_calls: AtomicUsize,
    pub last_cutoff: Mutex<Option<DateTime<Utc>>>,
}

impl InMemoryEngine {
    /// Engine on the node responsible for periodic recovery.
    pub fn responsible() -> Arc<Self> {
        let engine = Self::default();
        engine.responsible.store(true, Ordering::SeqCst);
        Arc::new(engine)
    }

    /// Register a flow node as a recovery candidate with its snapshot.
    pub fn add_flow_node(&self, snapshot: FlowNodeSnapshot) {
        self.flow_node_candidates.lock().unwrap().push(snapshot.id);
        self.flow_nodes.lock().unwrap().insert(snapshot.id, snapshot);
    }

    /// Register a candidate id whose flow node is already gone.
    pub fn add_stale_flow_node(&self, id: i64) {
        self.flow_node_candidates.lock().unwrap().push(id);
    }

    /// Register a process instance as a recovery candidate, along with a
    /// definition for it.
    pub fn add_process(&self, snapshot: ProcessInstanceSnapshot) {
        self.definitions
            .lock()
            .unwrap()
            .entry(snapshot.process_definition_id)
            .or_insert_with(|| ProcessDefinitionHandle {
                id: snapshot.process_definition_id,
                name: "order fulfilment".to_string(),
                version: "1.0".to_string(),
            });
        self.process_candidates.lock().unwrap().push(snapshot.id);
        self.process_instances
            .lock()
            .unwrap()
            .insert(snapshot.id, snapshot);
    }

    /// Register a candidate id whose process instance is already archived.
    pub fn add_stale_process(&self, id: i64) {
        self.process_candidates.lock().unwrap().push(id);
    }

    fn page(source: &[i64], limit: i64, offset: i64) -> Vec<i64> {
        source
            .iter()
            .skip(offset as usize)
            .take(limit as usize)
            .copied()
            .collect()
    }
}

#[async_trait]
impl RecoveryReader for InMemoryEngine {
    async fn list_flow_node_ids_to_recover(
        &self,
        stuck_before: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<i64>, RecoveryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_cutoff.lock().unwrap() = Some(stuck_before);
        if self.fail_scan.load(Ordering::SeqCst) {
            return Err(RecoveryError::Read("read layer unavailable".to_string()));
        }
        Ok(Self::page(
            &self.flow_node_candidates.lock().unwrap(),
            limit,
            offset,
        ))
    }

    async fn list_process_instance_ids_to_recover(
        &self,
        stuck_before: DateTime<Utc>,
        limit: i64,
        offset: i64,
    ) -> Result<Vec<i64>, RecoveryError> {
        self.list_calls.fetch_add(1, Ordering::SeqCst);
        *self.last_cutoff.lock().unwrap() = Some(stuck_before);
        if self.fail_scan.load(Ordering::SeqCst) {
            return Err(RecoveryError::Read("read layer unavailable".to_string()));
        }
        Ok(Self::page(
            &self.process_candidates.lock().unwrap(),
            limit,
            offset,
        ))
    }

    async fn flow_node_snapshots(
        &self,
        ids: &[i64],
    ) -> Result<Vec<FlowNodeSnapshot>, RecoveryError> {
        let nodes = self.flow_nodes.lock().unwrap();
        Ok(ids.iter().filter_map(|id| nodes.get(id).cloned()).collect())
    }

    async fn process_instance(
        &self,
        id: i64,
    ) -> Result<Option<ProcessInstanceSnapshot>, RecoveryError> {
        Ok(self.process_instances.lock().unwrap().get(&id).cloned())
    }

    async fn process_definition(
        &self,
        id: i64,
    ) -> Result<Option<ProcessDefinitionHandle>, RecoveryError> {
        Ok(self.definitions.lock().unwrap().get(&id).cloned())
    }

    async fn activity_instance(&self, id: i64) -> Result<Option<ActivityHandle>, RecoveryError> {
        Ok(self.activities.lock().unwrap().get(&id).cloned())
    }
}

#[async_trait]
impl WorkService for InMemoryEngine {
    async fn submit_execute_flow_node(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    ) -> Result<(), RecoveryError> {
        self.submitted
            .lock()
            .unwrap()
            .push(SubmittedWork::ExecuteFlowNode {
                process_definition_id,
                process_instance_id,
                flow_node_instance_id,
            });
        Ok(())
    }

    async fn submit_notify_parent_finished(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        flow_node_instance_id: i64,
    ) -> Result<(), RecoveryError> {
        self.submitted
            .lock()
            .unwrap()
            .push(SubmittedWork::NotifyParentFinished {
                process_definition_id,
                process_instance_id,
                flow_node_instance_id,
            });
        Ok(())
    }

    async fn register_connectors_to_execute(
        &self,
        process_definition_id: i64,
        process_instance_id: i64,
        event: ConnectorEvent,
    ) -> Result<(), RecoveryError> {
        self.submitted.lock().unwrap().push(SubmittedWork::Connectors {
            process_definition_id,
            process_instance_id,
            event,
        });
        Ok(())
    }
}

#[async_trait]
impl GatewayEvaluator for InMemoryEngine {
    async fn merging_condition_met(
        &self,
        _process_definition_id: i64,
        gateway_instance_id: i64,
    ) -> Result<bool, RecoveryError> {
        Ok(self
            .merge_results
            .lock()
            .unwrap()
            .get(&gateway_instance_id)
            .copied()
            .unwrap_or(false))
    }
}

#[async_trait]
impl TransactionExecutor for InMemoryEngine {
    async fn in_transaction(&self, work: TransactionWork<'_>) -> Result<(), RecoveryError> {
        let n = self.transactions_begun.fetch_add(1, Ordering::SeqCst) + 1;
        if self.fail_transactions.lock().unwrap().contains(&n) {
            return Err(RecoveryError::Transaction(format!(
                "injected failure of transaction {}",
                n
            )));
        }
        work.await
    }
}

#[async_trait]
impl ClusterCoordinator for InMemoryEngine {
    async fn is_responsible_for_recovery(&self) -> bool {
        self.responsible.load(Ordering::SeqCst)
    }
}

/// Wire a recovery service entirely onto the in-memory engine.
pub fn wire(engine: &Arc<InMemoryEngine>, config: RecoveryConfig) -> RecoveryService {
    RecoveryService::new(
        engine.clone(),
        engine.clone(),
        Arc::new(default_catalog()),
        engine.clone(),
        engine.clone(),
        engine.clone(),
        config,
    )
}

/// A task mid-execution: resumes unconditionally.
pub fn executing_task(id: i64) -> FlowNodeSnapshot {
    FlowNodeSnapshot {
        id,
        name: format!("task-{}", id),
        state_id: EXECUTING_STATE,
        state_name: "executing".to_string(),
        stable: false,
        terminal: false,
        state_category: StateCategory::Normal,
        kind: FlowNodeKind::AutomaticTask,
        process_definition_id: 500,
        parent_process_instance_id: 600,
    }
}

/// A task in its terminal state: only the finished-notification is left.
pub fn terminal_task(id: i64) -> FlowNodeSnapshot {
    FlowNodeSnapshot {
        state_id: COMPLETED_STATE,
        state_name: "completed".to_string(),
        terminal: true,
        ..executing_task(id)
    }
}

/// A gateway waiting for sibling branches.
pub fn waiting_gateway(id: i64, merge_complete: bool) -> FlowNodeSnapshot {
    FlowNodeSnapshot {
        kind: FlowNodeKind::Gateway(GatewayDetails {
            gateway_type: GatewayType::Parallel,
            merge_complete,
        }),
        ..executing_task(id)
    }
}

/// A process instance in the given lifecycle state.
pub fn process_instance(id: i64, state: ProcessState) -> ProcessInstanceSnapshot {
    ProcessInstanceSnapshot {
        id,
        name: format!("instance-{}", id),
        process_definition_id: 500,
        state,
        caller_id: None,
        interrupted_by_event: false,
    }
}
