//! Command and query handlers orchestrating the domain through ports.

pub mod roles;
pub mod voting;
