//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the engine and the outside world. Adapters implement these ports.
//!
//! - `ProcessRepository` - process definitions and running instances
//! - `ProposalReader` - read side over an instance's proposals
//! - `VoteRepository` - atomic ballot persistence with the uniqueness
//!   guarantee
//! - `RoleRepository` - packed role permissions, decoded at the boundary
//! - `DecisionAccessChecker` - capability assertion for callers
//! - `ProfileResolver` - auth token to profile resolution
//! - `ConfigStructureValidator` - structural validation consumed by the
//!   domain's schema registry

mod access_checker;
mod process_repository;
mod profile_resolver;
mod proposal_reader;
mod role_repository;
mod schema_validator;
mod vote_repository;

pub use access_checker::DecisionAccessChecker;
pub use process_repository::ProcessRepository;
pub use profile_resolver::ProfileResolver;
pub use proposal_reader::ProposalReader;
pub use role_repository::RoleRepository;
pub use schema_validator::ConfigStructureValidator;
pub use vote_repository::VoteRepository;
