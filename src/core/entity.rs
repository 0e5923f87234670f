//! Entity identification system.
//!
//! Every live board object has a unique id:
//! - `CreatureId` for placed creatures (visible or hidden)
//! - `IceId` for ice covers
//!
//! Ids are allocated by the session from monotonically increasing counters
//! and are never reused within a session, even across level resets, so a
//! stale id from a previous level can never alias a new creature.
//!
//! ## Usage
//!
//! ```
//! use rust_critters::core::{CreatureId, IceId, VisualId};
//!
//! let creature = CreatureId::new(3);
//! let ice = IceId::new(3);
//!
//! assert_eq!(creature.raw(), 3);
//! assert_ne!(VisualId::from(creature), VisualId::from(ice));
//! ```

use serde::{Deserialize, Serialize};

/// Unique identifier for a creature.
///
/// The grid stores these as cell occupants.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct CreatureId(pub u32);

impl CreatureId {
    /// Create a new creature ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl From<u32> for CreatureId {
    fn from(id: u32) -> Self {
        Self(id)
    }
}

impl std::fmt::Display for CreatureId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Creature({})", self.0)
    }
}

/// Unique identifier for an ice cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct IceId(pub u32);

impl IceId {
    /// Create a new ice ID.
    #[must_use]
    pub const fn new(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw ID value.
    #[must_use]
    pub const fn raw(self) -> u32 {
        self.0
    }
}

impl std::fmt::Display for IceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Ice({})", self.0)
    }
}

/// Handle the renderer uses to identify a visual element.
///
/// Creatures and ice covers share one visual namespace on the renderer side.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualId {
    /// Visual for a creature.
    Creature(CreatureId),
    /// Visual for an ice cover.
    Ice(IceId),
}

impl From<CreatureId> for VisualId {
    fn from(id: CreatureId) -> Self {
        VisualId::Creature(id)
    }
}

impl From<IceId> for VisualId {
    fn from(id: IceId) -> Self {
        VisualId::Ice(id)
    }
}

impl std::fmt::Display for VisualId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            VisualId::Creature(id) => write!(f, "{}", id),
            VisualId::Ice(id) => write!(f, "{}", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_creature_id() {
        let id = CreatureId::new(7);
        assert_eq!(id.raw(), 7);
        assert_eq!(CreatureId::from(7), id);
        assert_eq!(format!("{}", id), "Creature(7)");
    }

    #[test]
    fn test_ice_id() {
        let id = IceId::new(2);
        assert_eq!(id.raw(), 2);
        assert_eq!(format!("{}", id), "Ice(2)");
    }

    #[test]
    fn test_creature_id_ordering() {
        let mut ids = vec![CreatureId(5), CreatureId(1), CreatureId(3)];
        ids.sort();
        assert_eq!(ids, vec![CreatureId(1), CreatureId(3), CreatureId(5)]);
    }

    #[test]
    fn test_visual_id_namespaces() {
        let creature: VisualId = CreatureId(1).into();
        let ice: VisualId = IceId(1).into();

        assert_ne!(creature, ice);
        assert_eq!(format!("{}", creature), "Creature(1)");
        assert_eq!(format!("{}", ice), "Ice(1)");
    }

    #[test]
    fn test_serialization() {
        let id = CreatureId(123);
        let json = serde_json::to_string(&id).unwrap();
        let deserialized: CreatureId = serde_json::from_str(&json).unwrap();
        assert_eq!(id, deserialized);

        let visual = VisualId::Ice(IceId(9));
        let json = serde_json::to_string(&visual).unwrap();
        let deserialized: VisualId = serde_json::from_str(&json).unwrap();
        assert_eq!(visual, deserialized);
    }
}
