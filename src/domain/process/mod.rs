//! Decision processes, their phases, instances, and proposals.

mod definition;
mod instance;
mod proposal;
pub mod resolver;
mod state;

pub use definition::{DecisionProcess, ProcessSchema, MAX_NAME_LENGTH};
pub use instance::{CancellationOutcome, InstanceData, InstanceStatus, ProcessInstance};
pub use proposal::{Proposal, ProposalStatus};
pub use state::{PhaseSchedule, StateConfig, StateDefinition};
