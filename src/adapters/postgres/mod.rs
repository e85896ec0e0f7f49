//! PostgreSQL adapters.

mod process_repository;
mod proposal_reader;
mod role_repository;
mod vote_repository;

pub use process_repository::PostgresProcessRepository;
pub use proposal_reader::PostgresProposalReader;
pub use role_repository::PostgresRoleRepository;
pub use vote_repository::PostgresVoteRepository;
