// Copyright (C) 2025 SyncMyOrders Sp. z o.o.
// SPDX-License-Identifier: AGPL-3.0-or-later
//! Error types for provena-recovery.

use thiserror::Error;

/// Recovery errors.
#[derive(Debug, Error)]
#[non_exhaustive]
pub enum RecoveryError {
    /// Configuration loading failed.
    #[error("Configuration error: {0}")]
    Config(#[from] crate::config::ConfigError),

    /// The read layer failed while listing recovery candidates.
    ///
    /// Fatal to the current run: without a complete candidate set no
    /// recovery is attempted.
    #[error("Candidate scan failed: {0}")]
    Scan(String),

    /// The read layer failed while loading an element.
    #[error("Read error: {0}")]
    Read(String),

    /// A snapshot references a state id the state registry does not know.
    #[error("Unknown flow-node state id {0}")]
    UnknownState(u32),

    /// Submitting asynchronous work failed.
    #[error("Work submission failed: {0}")]
    Work(String),

    /// A transaction could not be completed.
    #[error("Transaction error: {0}")]
    Transaction(String),

    /// Other error.
    #[error("{0}")]
    Other(String),
}

/// Result type using RecoveryError.
pub type Result<T> = std::result::Result<T, RecoveryError>;
