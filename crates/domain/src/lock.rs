//! Lock snapshots and their projection onto presentation state.
//!
//! A [`LockSnapshot`] is the raw record a vendor cloud returns for one lock.
//! [`project`] turns an optional snapshot into a [`Projection`]: a
//! [`LockState`] plus the attribute set shown next to it. The projection is a
//! pure function of its input; nothing is remembered between polls.

use serde::{Deserialize, Serialize};

use crate::entity::{AttributeValue, Attributes, EntityState};

/// Attribute key carrying the actor behind the last state change.
pub const ATTR_CHANGED_BY: &str = "changed_by";

/// Raw state of one lock as reported by the vendor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LockSnapshot {
    /// Vendor device identifier, stable across polls.
    pub device_id: String,
    pub name: String,
    pub model_name: String,
    pub firmware_version: String,
    pub is_locked: bool,
    pub is_jammed: bool,
    /// Who or what last changed the lock (e.g. `"thumbturn"`, `"keypad - Alice"`).
    pub last_changed_by: Option<String>,
}

/// Derived presentation state of a lock.
///
/// Precedence: no snapshot → `Unavailable`; jammed beats locked/unlocked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LockState {
    Locked,
    Unlocked,
    Jammed,
    Unavailable,
}

impl From<LockState> for EntityState {
    fn from(state: LockState) -> Self {
        match state {
            LockState::Locked => Self::Locked,
            LockState::Unlocked => Self::Unlocked,
            LockState::Jammed => Self::Jammed,
            LockState::Unavailable => Self::Unavailable,
        }
    }
}

/// Result of projecting a snapshot.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    pub state: LockState,
    pub attributes: Attributes,
}

/// Map an optional snapshot onto a [`Projection`].
///
/// `changed_by` is only present when the snapshot names an actor; an absent
/// snapshot always yields an empty attribute set.
#[must_use]
pub fn project(snapshot: Option<&LockSnapshot>) -> Projection {
    let Some(snapshot) = snapshot else {
        return Projection {
            state: LockState::Unavailable,
            attributes: Attributes::new(),
        };
    };

    let state = if snapshot.is_jammed {
        LockState::Jammed
    } else if snapshot.is_locked {
        LockState::Locked
    } else {
        LockState::Unlocked
    };

    let mut attributes = Attributes::new();
    if let Some(actor) = &snapshot.last_changed_by {
        attributes.insert(
            ATTR_CHANGED_BY.to_string(),
            AttributeValue::String(actor.clone()),
        );
    }

    Projection { state, attributes }
}
