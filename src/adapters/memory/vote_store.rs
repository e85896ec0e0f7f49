//! In-memory ballot store for tests and local development.
//!
//! Emulates the storage guarantees the postgres adapter gets from the
//! database: the unique ballot constraint and the all-or-nothing write
//! of a submission plus its selection rows.

use async_trait::async_trait;
use std::sync::Mutex;

use crate::domain::foundation::{DomainError, ErrorCode, ProcessInstanceId, ProfileId};
use crate::domain::voting::{VoteProposalSelection, VoteSubmission};
use crate::ports::VoteRepository;

#[derive(Default)]
struct Inner {
    submissions: Vec<VoteSubmission>,
    selections: Vec<VoteProposalSelection>,
}

/// In-memory implementation of [`VoteRepository`].
#[derive(Default)]
pub struct InMemoryVoteStore {
    inner: Mutex<Inner>,
    fail_selection_insert: bool,
}

impl InMemoryVoteStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// A store whose selection insert fails mid-write, for atomicity
    /// tests.
    pub fn failing_selection_insert() -> Self {
        Self {
            inner: Mutex::new(Inner::default()),
            fail_selection_insert: true,
        }
    }

    /// Every stored submission.
    pub fn submissions(&self) -> Vec<VoteSubmission> {
        self.inner.lock().unwrap().submissions.clone()
    }

    /// Every stored selection row.
    pub fn selections(&self) -> Vec<VoteProposalSelection> {
        self.inner.lock().unwrap().selections.clone()
    }
}

#[async_trait]
impl VoteRepository for InMemoryVoteStore {
    async fn find_by_instance_and_profile(
        &self,
        instance_id: &ProcessInstanceId,
        profile_id: &ProfileId,
    ) -> Result<Option<VoteSubmission>, DomainError> {
        Ok(self
            .inner
            .lock()
            .unwrap()
            .submissions
            .iter()
            .find(|s| {
                s.process_instance_id() == instance_id && s.submitted_by_profile_id() == profile_id
            })
            .cloned())
    }

    async fn record_ballot(
        &self,
        submission: &VoteSubmission,
        selections: &[VoteProposalSelection],
    ) -> Result<(), DomainError> {
        let mut inner = self.inner.lock().unwrap();

        let duplicate = inner.submissions.iter().any(|s| {
            s.process_instance_id() == submission.process_instance_id()
                && s.submitted_by_profile_id() == submission.submitted_by_profile_id()
        });
        if duplicate {
            return Err(DomainError::already_voted());
        }

        if self.fail_selection_insert {
            // The whole write rolls back; nothing becomes visible.
            return Err(DomainError::new(
                ErrorCode::DatabaseError,
                "Simulated selection insert failure",
            ));
        }

        inner.submissions.push(submission.clone());
        inner.selections.extend_from_slice(selections);
        Ok(())
    }
}
