// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Paginated discovery of recovery candidates.

use std::sync::Arc;

use chrono::{DateTime, Utc};
use tracing::info;

use crate::element::ElementToRecover;
use crate::error::{RecoveryError, Result};
use crate::reader::RecoveryReader;

/// Discovers every element needing recovery, page by page.
pub struct CandidateElementScanner {
    reader: Arc<dyn RecoveryReader>,
    page_size: usize,
}

impl CandidateElementScanner {
    /// Scanner reading pages of `page_size` ids at a time.
    pub fn new(reader: Arc<dyn RecoveryReader>, page_size: usize) -> Self {
        Self { reader, page_size }
    }

    /// All elements needing recovery whose last state change predates
    /// `stuck_before`.
    ///
    /// Both sources are drained fully before any recovery work starts: the
    /// returned plan is a point-in-time candidate set, not a stream. Each
    /// source is read until a page comes back shorter than requested.
    pub async fn scan(&self, stuck_before: DateTime<Utc>) -> Result<Vec<ElementToRecover>> {
        let mut elements = Vec::new();

        let mut offset = 0i64;
        loop {
            let page = self
                .reader
                .list_flow_node_ids_to_recover(stuck_before, self.page_size as i64, offset)
                .await
                .map_err(|e| RecoveryError::Scan(e.to_string()))?;
            let full_page = page.len() >= self.page_size;
            offset += page.len() as i64;
            elements.extend(page.into_iter().map(ElementToRecover::flow_node));
            if !full_page {
                break;
            }
        }
        let flow_nodes = elements.len();

        let mut offset = 0i64;
        loop {
            let page = self
                .reader
                .list_process_instance_ids_to_recover(stuck_before, self.page_size as i64, offset)
                .await
                .map_err(|e| RecoveryError::Scan(e.to_string()))?;
            let full_page = page.len() >= self.page_size;
            offset += page.len() as i64;
            elements.extend(page.into_iter().map(ElementToRecover::process));
            if !full_page {
                break;
            }
        }

        info!(
            flow_nodes,
            processes = elements.len() - flow_nodes,
            stuck_before = %stuck_before,
            "candidate scan finished"
        );
        Ok(elements)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::element::ElementKind;
    use async_trait::async_trait;
    use provena_process_model::{
        ActivityHandle, FlowNodeSnapshot, ProcessDefinitionHandle, ProcessInstanceSnapshot,
    };
    use std::sync::Mutex;

    /// Reader serving candidate ids from fixed lists, recording each page
    /// request.
    struct PagedReader {
        flow_node_ids: Vec<i64>,
        process_ids: Vec<i64>,
        requests: Mutex<Vec<(ElementKind, i64, i64)>>,
        fail: bool,
    }

    impl PagedReader {
        fn new(flow_node_ids: Vec<i64>, process_ids: Vec<i64>) -> Self {
            Self {
                flow_node_ids,
                process_ids,
                requests: Mutex::new(Vec::new()),
                fail: false,
            }
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
    impl RecoveryReader for PagedReader {
        async fn list_flow_node_ids_to_recover(
            &self,
            _stuck_before: DateTime<Utc>,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<i64>> {
            if self.fail {
                return Err(RecoveryError::Read("connection reset".to_string()));
            }
            self.requests
                .lock()
                .unwrap()
                .push((ElementKind::FlowNode, limit, offset));
            Ok(Self::page(&self.flow_node_ids, limit, offset))
        }

        async fn list_process_instance_ids_to_recover(
            &self,
            _stuck_before: DateTime<Utc>,
            limit: i64,
            offset: i64,
        ) -> Result<Vec<i64>> {
            self.requests
                .lock()
                .unwrap()
                .push((ElementKind::Process, limit, offset));
            Ok(Self::page(&self.process_ids, limit, offset))
        }

        async fn flow_node_snapshots(&self, _ids: &[i64]) -> Result<Vec<FlowNodeSnapshot>> {
            Ok(Vec::new())
        }

        async fn process_instance(&self, _id: i64) -> Result<Option<ProcessInstanceSnapshot>> {
            Ok(None)
        }

        async fn process_definition(&self, _id: i64) -> Result<Option<ProcessDefinitionHandle>> {
            Ok(None)
        }

        async fn activity_instance(&self, _id: i64) -> Result<Option<ActivityHandle>> {
            Ok(None)
        }
    }

    #[tokio::test]
    async fn test_short_page_ends_each_sub_scan() {
        let reader = Arc::new(PagedReader::new(vec![1, 2, 3], vec![10, 11]));
        let scanner = CandidateElementScanner::new(reader.clone(), 2);

        let elements = scanner.scan(Utc::now()).await.unwrap();

        assert_eq!(
            elements,
            vec![
                ElementToRecover::flow_node(1),
                ElementToRecover::flow_node(2),
                ElementToRecover::flow_node(3),
                ElementToRecover::process(10),
                ElementToRecover::process(11),
            ]
        );
        // Flow nodes: pages at offsets 0 and 2 (second one short). The
        // process page comes back exactly full, forcing one empty read.
        assert_eq!(
            *reader.requests.lock().unwrap(),
            vec![
                (ElementKind::FlowNode, 2, 0),
                (ElementKind::FlowNode, 2, 2),
                (ElementKind::Process, 2, 0),
                (ElementKind::Process, 2, 2),
            ]
        );
    }

    #[tokio::test]
    async fn test_empty_sources_produce_an_empty_plan() {
        let reader = Arc::new(PagedReader::new(Vec::new(), Vec::new()));
        let scanner = CandidateElementScanner::new(reader, 100);

        let elements = scanner.scan(Utc::now()).await.unwrap();
        assert!(elements.is_empty());
    }

    #[tokio::test]
    async fn test_flow_node_scan_completes_before_process_scan_starts() {
        let reader = Arc::new(PagedReader::new(vec![1, 2, 3, 4], vec![10]));
        let scanner = CandidateElementScanner::new(reader.clone(), 2);

        scanner.scan(Utc::now()).await.unwrap();

        let requests = reader.requests.lock().unwrap();
        let first_process = requests
            .iter()
            .position(|(kind, _, _)| *kind == ElementKind::Process)
            .unwrap();
        assert!(
            requests[..first_process]
                .iter()
                .all(|(kind, _, _)| *kind == ElementKind::FlowNode)
        );
        assert!(
            requests[first_process..]
                .iter()
                .all(|(kind, _, _)| *kind == ElementKind::Process)
        );
    }

    #[tokio::test]
    async fn test_read_failure_surfaces_as_scan_error() {
        let reader = Arc::new(PagedReader {
            fail: true,
            ..PagedReader::new(vec![1], Vec::new())
        });
        let scanner = CandidateElementScanner::new(reader, 2);

        let err = scanner.scan(Utc::now()).await.unwrap_err();
        assert!(matches!(err, RecoveryError::Scan(_)));
    }
}
