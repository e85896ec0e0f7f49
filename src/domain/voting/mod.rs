//! Ballots: submission shapes, selection validation, and signatures.

mod ballot;
mod selection;
mod signature;

pub use ballot::{
    SubmissionMetadata, VoteData, VoteProposalSelection, VoteSubmission, VOTE_SCHEMA_VERSION,
};
pub use selection::{validate_selection, SelectionValidation};
pub use signature::BallotSigner;
