//! State machine for the upload-and-extract flow.
//!
//! `Idle -> NeedsIndex -> BuildingIndex -> IndexReady -> RunningQuery -> AnswerReady`
//!
//! Any successful edit to the document text, chunk size, or overlap resets
//! the flow to `NeedsIndex`. Running a query is only reachable from
//! `IndexReady`.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::errors::{DomainError, DomainResult};

/// States of the upload-and-extract flow.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum UploadFlowState {
    Idle,
    NeedsIndex,
    BuildingIndex,
    IndexReady,
    RunningQuery,
    AnswerReady,
}

impl fmt::Display for UploadFlowState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            UploadFlowState::Idle => "idle",
            UploadFlowState::NeedsIndex => "needs_index",
            UploadFlowState::BuildingIndex => "building_index",
            UploadFlowState::IndexReady => "index_ready",
            UploadFlowState::RunningQuery => "running_query",
            UploadFlowState::AnswerReady => "answer_ready",
        };
        write!(f, "{}", s)
    }
}

impl Default for UploadFlowState {
    fn default() -> Self {
        Self::Idle
    }
}

/// Tracks where one upload-and-extract session is in its lifecycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct UploadFlow {
    state: UploadFlowState,
}

impl UploadFlow {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn state(&self) -> UploadFlowState {
        self.state
    }

    /// Document text or chunking settings changed: a fresh index is required.
    /// Legal from every state.
    pub fn mark_dirty(&mut self) {
        self.state = UploadFlowState::NeedsIndex;
    }

    /// Start building the index. Only legal when a rebuild is pending.
    pub fn begin_build(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::NeedsIndex, UploadFlowState::BuildingIndex)
    }

    /// Index build finished successfully.
    pub fn build_succeeded(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::BuildingIndex, UploadFlowState::IndexReady)
    }

    /// Index build failed; the user may fix inputs and retry.
    pub fn build_failed(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::BuildingIndex, UploadFlowState::NeedsIndex)
    }

    /// Start a query. Only reachable from `IndexReady`.
    pub fn begin_query(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::IndexReady, UploadFlowState::RunningQuery)
    }

    /// Query finished (success or surfaced error); the index remains usable.
    pub fn query_finished(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::RunningQuery, UploadFlowState::AnswerReady)
    }

    /// Run another query against the same index.
    pub fn run_again(&mut self) -> DomainResult<()> {
        self.transition(UploadFlowState::AnswerReady, UploadFlowState::RunningQuery)
    }

    fn transition(&mut self, from: UploadFlowState, to: UploadFlowState) -> DomainResult<()> {
        if self.state != from {
            return Err(DomainError::InvalidStateTransition {
                from: self.state.to_string(),
                to: to.to_string(),
            });
        }
        self.state = to;
        Ok(())
    }
}
