//! Commonground - Decision Process & Voting Engine
//!
//! This crate implements the schema-driven decision processes behind the
//! Commonground collaboration platform: multi-phase participatory
//! budgeting and grantmaking, compiled proposal and rubric forms, packed
//! per-role permissions, and exactly-once member ballots.

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
