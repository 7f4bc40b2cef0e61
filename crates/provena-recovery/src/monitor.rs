// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Outcome accounting and progress reporting for one recovery run.

use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::info;

/// Disposition of a single recovered element.
///
/// Every id handed to a resumer maps to exactly one of these.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ElementOutcome {
    /// Resumption work was submitted.
    Executing,
    /// The element is terminal; completion handling was submitted.
    Finishing,
    /// The element cannot be resumed in its current state.
    NotExecutable,
    /// The id no longer resolves to a live element.
    NotFound,
    /// Handling the element failed.
    InError,
}

/// Outcome counters for a batch or a whole recovery run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize)]
pub struct RecoveryCounts {
    /// Elements for which resumption work was submitted.
    pub executing: u64,
    /// Terminal elements for which completion handling was submitted.
    pub finishing: u64,
    /// Elements not resumable in their current state.
    pub not_executable: u64,
    /// Ids that no longer resolved to a live element.
    pub not_found: u64,
    /// Elements whose handling failed.
    pub in_error: u64,
}

impl RecoveryCounts {
    /// Record one element outcome.
    pub fn record(&mut self, outcome: ElementOutcome) {
        match outcome {
            ElementOutcome::Executing => self.executing += 1,
            ElementOutcome::Finishing => self.finishing += 1,
            ElementOutcome::NotExecutable => self.not_executable += 1,
            ElementOutcome::NotFound => self.not_found += 1,
            ElementOutcome::InError => self.in_error += 1,
        }
    }

    /// Fold another set of counters into this one.
    pub fn merge(&mut self, other: RecoveryCounts) {
        self.executing += other.executing;
        self.finishing += other.finishing;
        self.not_executable += other.not_executable;
        self.not_found += other.not_found;
        self.in_error += other.in_error;
    }

    /// Total number of elements accounted for.
    pub fn total(&self) -> u64 {
        self.executing + self.finishing + self.not_executable + self.not_found + self.in_error
    }
}

/// Progress tracking for one recovery run.
///
/// Owned by a single orchestration run and discarded with it. Resumers
/// return per-batch counters; the batch coordinator merges them in once the
/// batch's transaction has committed, so elements of a failed batch never
/// show up here.
#[derive(Debug)]
pub struct ProgressMonitor {
    counts: RecoveryCounts,
    elements_to_process: u64,
    started: Instant,
}

impl ProgressMonitor {
    /// Monitor for a run over `elements_to_process` elements.
    ///
    /// The start instant is captured here; there is no way to restart a
    /// monitor.
    pub fn new(elements_to_process: u64) -> Self {
        Self {
            counts: RecoveryCounts::default(),
            elements_to_process,
            started: Instant::now(),
        }
    }

    /// Counters accumulated so far.
    pub fn counts(&self) -> RecoveryCounts {
        self.counts
    }

    /// Number of elements accounted for so far.
    pub fn processed(&self) -> u64 {
        self.counts.total()
    }

    /// Number of elements this run was sized to.
    pub fn elements_to_process(&self) -> u64 {
        self.elements_to_process
    }

    /// Time since the run started.
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }

    /// Merge one committed batch's counters.
    pub fn merge(&mut self, batch: RecoveryCounts) {
        self.counts.merge(batch);
    }

    /// Emit a progress line for the current position in the run.
    pub fn log_progress(&self) {
        info!(
            processed = self.processed(),
            total = self.elements_to_process,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "recovery in progress"
        );
    }

    /// Emit the final summary for this run.
    pub fn log_summary(&self) {
        info!(
            executing = self.counts.executing,
            finishing = self.counts.finishing,
            not_executable = self.counts.not_executable,
            not_found = self.counts.not_found,
            in_error = self.counts.in_error,
            elements = self.elements_to_process,
            elapsed_ms = self.elapsed().as_millis() as u64,
            "recovery run finished"
        );
    }

    /// Consume the monitor, returning the final counters.
    pub fn into_counts(self) -> RecoveryCounts {
        self.counts
    }
}
