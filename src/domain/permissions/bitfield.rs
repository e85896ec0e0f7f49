//! Packed permission bitfield codec.
//!
//! Each organization role carries one integer per zone. Bits 0-3 are the
//! standard CRUD permissions shared with the rest of the platform; bit 4
//! is admin; bits 5-8 are decision-process capabilities. The layout is
//! frozen: renumbering a bit requires a storage migration.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

/// One named capability, mapping to a single bit.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum Capability {
    Delete,
    Update,
    Read,
    Create,
    Admin,
    InviteMembers,
    Review,
    SubmitProposals,
    Vote,
}

impl Capability {
    /// All capabilities in bit order.
    pub const ALL: [Capability; 9] = [
        Capability::Delete,
        Capability::Update,
        Capability::Read,
        Capability::Create,
        Capability::Admin,
        Capability::InviteMembers,
        Capability::Review,
        Capability::SubmitProposals,
        Capability::Vote,
    ];

    /// The bit value assigned to this capability.
    pub fn bit(self) -> u32 {
        match self {
            Capability::Delete => PermissionBits::DELETE,
            Capability::Update => PermissionBits::UPDATE,
            Capability::Read => PermissionBits::READ,
            Capability::Create => PermissionBits::CREATE,
            Capability::Admin => PermissionBits::ADMIN,
            Capability::InviteMembers => PermissionBits::INVITE_MEMBERS,
            Capability::Review => PermissionBits::REVIEW,
            Capability::SubmitProposals => PermissionBits::SUBMIT_PROPOSALS,
            Capability::Vote => PermissionBits::VOTE,
        }
    }
}

impl fmt::Display for Capability {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Capability::Delete => "delete",
            Capability::Update => "update",
            Capability::Read => "read",
            Capability::Create => "create",
            Capability::Admin => "admin",
            Capability::InviteMembers => "inviteMembers",
            Capability::Review => "review",
            Capability::SubmitProposals => "submitProposals",
            Capability::Vote => "vote",
        };
        write!(f, "{}", s)
    }
}

/// Decoded capability set for one role in one zone.
///
/// This is the shape that crosses API boundaries; the packed integer
/// stays inside the codec and the storage adapters.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DecisionRolePermissions {
    pub delete: bool,
    pub update: bool,
    pub read: bool,
    pub create: bool,
    pub admin: bool,
    pub invite_members: bool,
    pub review: bool,
    pub submit_proposals: bool,
    pub vote: bool,
}

impl DecisionRolePermissions {
    /// No capabilities at all.
    pub fn none() -> Self {
        Self::default()
    }

    /// Builds the capability set for a new decision role.
    ///
    /// Read is forced on: a decision role without read access cannot see
    /// the process it is supposed to participate in.
    pub fn decision_role(
        invite_members: bool,
        review: bool,
        submit_proposals: bool,
        vote: bool,
    ) -> Self {
        Self {
            read: true,
            invite_members,
            review,
            submit_proposals,
            vote,
            ..Self::default()
        }
    }

    /// Packs the capability set into its integer form.
    pub fn encode(&self) -> PermissionBits {
        let mut bits = 0u32;
        if self.delete {
            bits |= PermissionBits::DELETE;
        }
        if self.update {
            bits |= PermissionBits::UPDATE;
        }
        if self.read {
            bits |= PermissionBits::READ;
        }
        if self.create {
            bits |= PermissionBits::CREATE;
        }
        if self.admin {
            bits |= PermissionBits::ADMIN;
        }
        if self.invite_members {
            bits |= PermissionBits::INVITE_MEMBERS;
        }
        if self.review {
            bits |= PermissionBits::REVIEW;
        }
        if self.submit_proposals {
            bits |= PermissionBits::SUBMIT_PROPOSALS;
        }
        if self.vote {
            bits |= PermissionBits::VOTE;
        }
        PermissionBits(bits)
    }

    /// Checks whether a single capability is granted.
    pub fn grants(&self, capability: Capability) -> bool {
        match capability {
            Capability::Delete => self.delete,
            Capability::Update => self.update,
            Capability::Read => self.read,
            Capability::Create => self.create,
            Capability::Admin => self.admin,
            Capability::InviteMembers => self.invite_members,
            Capability::Review => self.review,
            Capability::SubmitProposals => self.submit_proposals,
            Capability::Vote => self.vote,
        }
    }
}

/// Packed permission integer stored per (role, zone) pair.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PermissionBits(u32);

impl PermissionBits {
    pub const DELETE: u32 = 1 << 0;
    pub const UPDATE: u32 = 1 << 1;
    pub const READ: u32 = 1 << 2;
    pub const CREATE: u32 = 1 << 3;
    pub const ADMIN: u32 = 1 << 4;
    pub const INVITE_MEMBERS: u32 = 1 << 5;
    pub const REVIEW: u32 = 1 << 6;
    pub const SUBMIT_PROPOSALS: u32 = 1 << 7;
    pub const VOTE: u32 = 1 << 8;

    /// The four standard CRUD bits (0-3).
    pub const CRUD_MASK: u32 = Self::DELETE | Self::UPDATE | Self::READ | Self::CREATE;

    /// Every bit the codec knows about.
    pub const KNOWN_MASK: u32 = Self::CRUD_MASK
        | Self::ADMIN
        | Self::INVITE_MEMBERS
        | Self::REVIEW
        | Self::SUBMIT_PROPOSALS
        | Self::VOTE;

    /// An empty bitfield.
    pub fn empty() -> Self {
        Self(0)
    }

    /// Wraps a stored integer, rejecting bits outside the known layout.
    ///
    /// Storage adapters use this when reading persisted values so that a
    /// corrupted or future-layout row surfaces as an error instead of
    /// silently decoding to nonsense.
    pub fn try_from_raw(raw: u32) -> Result<Self, ValidationError> {
        if raw & !Self::KNOWN_MASK != 0 {
            return Err(ValidationError::invalid_format(
                "permissionBits",
                format!("unknown bits set: {:#b}", raw & !Self::KNOWN_MASK),
            ));
        }
        Ok(Self(raw))
    }

    /// Returns the raw integer for storage.
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Unpacks into the capability struct.
    pub fn decode(&self) -> DecisionRolePermissions {
        DecisionRolePermissions {
            delete: self.0 & Self::DELETE != 0,
            update: self.0 & Self::UPDATE != 0,
            read: self.0 & Self::READ != 0,
            create: self.0 & Self::CREATE != 0,
            admin: self.0 & Self::ADMIN != 0,
            invite_members: self.0 & Self::INVITE_MEMBERS != 0,
            review: self.0 & Self::REVIEW != 0,
            submit_proposals: self.0 & Self::SUBMIT_PROPOSALS != 0,
            vote: self.0 & Self::VOTE != 0,
        }
    }

    /// Applies an admin/decision capability update, leaving CRUD bits as
    /// they were.
    ///
    /// CRUD bits of `caps` are ignored: only the decision-role editor
    /// calls this, and it has no authority over the standard CRUD grants.
    pub fn apply_decision_update(self, caps: &DecisionRolePermissions) -> PermissionBits {
        let crud = self.0 & Self::CRUD_MASK;
        let rest = caps.encode().0 & !Self::CRUD_MASK;
        PermissionBits(crud | rest)
    }

    /// Checks whether a single capability bit is set.
    pub fn contains(&self, capability: Capability) -> bool {
        self.0 & capability.bit() != 0
    }
}

impl Default for PermissionBits {
    fn default() -> Self {
        Self::empty()
    }
}
