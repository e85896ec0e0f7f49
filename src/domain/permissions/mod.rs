//! Role permission packing for decision processes.

mod bitfield;

pub use bitfield::{Capability, DecisionRolePermissions, PermissionBits};
