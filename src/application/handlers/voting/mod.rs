//! Voting handlers: ballot submission and its read-only companions.

mod context;
#[cfg(test)]
pub(crate) mod fixtures;
mod get_voting_status;
mod submit_vote;
mod validate_vote_selection;

pub use get_voting_status::{
    GetVotingStatusError, GetVotingStatusHandler, GetVotingStatusQuery, VotingStatus,
};
pub use submit_vote::{SubmitVoteCommand, SubmitVoteError, SubmitVoteHandler, SubmitVoteResult};
pub use validate_vote_selection::{
    ValidateVoteSelectionError, ValidateVoteSelectionHandler, ValidateVoteSelectionQuery,
};
