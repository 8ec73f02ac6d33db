//! Semantic lane registry.
//!
//! # Responsibility
//! - Define the four fixed semantic lanes with their numeric slots, allowed
//!   content kinds, and default property overlays.
//! - Provide the explicit slot-to-lane mapping used by conflict detection.
//!
//! # Invariants
//! - The registry is immutable and total over slots 0..=3.
//! - `slot_to_lane` returns `None` for every slot outside the fixed range.
//! - Registry order matches `LaneId` declaration order, so `lane(id)` is a
//!   direct index.

use crate::model::item::{ItemKind, ItemProperties};
use once_cell::sync::Lazy;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};

/// Stable identity of one fixed semantic lane.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum LaneId {
    /// Code capture lane (slot 0).
    Code,
    /// Screen visuals lane: footage, titles, stills (slot 1).
    Visual,
    /// Voiceover audio lane (slot 2).
    Narration,
    /// Presenter camera overlay lane (slot 3).
    You,
}

impl LaneId {
    /// All lane identities in slot order.
    pub const ALL: [LaneId; 4] = [LaneId::Code, LaneId::Visual, LaneId::Narration, LaneId::You];

    /// Lowercase stable identifier used in stamps and diagnostics.
    pub fn as_str(self) -> &'static str {
        match self {
            LaneId::Code => "code",
            LaneId::Visual => "visual",
            LaneId::Narration => "narration",
            LaneId::You => "you",
        }
    }
}

impl Display for LaneId {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One fixed semantic lane definition.
///
/// Pure data: the engine consults the registry, it never constructs lanes.
#[derive(Debug, Clone, PartialEq)]
pub struct Lane {
    /// Stable lane identity.
    pub id: LaneId,
    /// User-facing lane name.
    pub name: &'static str,
    /// Numeric slot this lane occupies in the fixed arrangement.
    pub slot: u32,
    /// Content kinds this lane is meant to host.
    pub allowed_kinds: &'static [ItemKind],
    /// Property overlay applied under item-level values during migration.
    pub default_properties: ItemProperties,
}

impl Lane {
    /// Returns whether `kind` belongs on this lane.
    pub fn allows(&self, kind: ItemKind) -> bool {
        self.allowed_kinds.contains(&kind)
    }
}

static LANES: Lazy<[Lane; 4]> = Lazy::new(|| {
    [
        Lane {
            id: LaneId::Code,
            name: "Code",
            slot: 0,
            allowed_kinds: &[ItemKind::Code],
            default_properties: ItemProperties {
                opacity: Some(1.0),
                z_index: Some(0),
                theme: Some("midnight".to_string()),
                ..ItemProperties::default()
            },
        },
        Lane {
            id: LaneId::Visual,
            name: "Visual",
            slot: 1,
            allowed_kinds: &[ItemKind::Video, ItemKind::Title, ItemKind::VisualAsset],
            default_properties: ItemProperties {
                opacity: Some(1.0),
                scale: Some(1.0),
                z_index: Some(1),
                ..ItemProperties::default()
            },
        },
        Lane {
            id: LaneId::Narration,
            name: "Narration",
            slot: 2,
            allowed_kinds: &[ItemKind::Audio],
            default_properties: ItemProperties {
                volume: Some(1.0),
                muted: Some(false),
                ..ItemProperties::default()
            },
        },
        Lane {
            id: LaneId::You,
            name: "You",
            slot: 3,
            allowed_kinds: &[ItemKind::Video],
            default_properties: ItemProperties {
                scale: Some(0.25),
                position_x: Some(0.72),
                position_y: Some(0.70),
                z_index: Some(3),
                ..ItemProperties::default()
            },
        },
    ]
});

/// Returns the full lane registry in slot order.
pub fn lanes() -> &'static [Lane] {
    &*LANES
}

/// Returns the registry entry for one lane identity.
pub fn lane(id: LaneId) -> &'static Lane {
    &lanes()[id as usize]
}

/// Explicit total mapping from numeric slot to its fixed semantic lane.
///
/// Slots outside 0..=3 have no fixed lane and map to `None`.
pub fn slot_to_lane(slot: u32) -> Option<LaneId> {
    match slot {
        0 => Some(LaneId::Code),
        1 => Some(LaneId::Visual),
        2 => Some(LaneId::Narration),
        3 => Some(LaneId::You),
        _ => None,
    }
}

/// Returns every lane that accepts `kind`, in slot order.
pub fn lanes_allowing(kind: ItemKind) -> Vec<LaneId> {
    lanes()
        .iter()
        .filter(|lane| lane.allows(kind))
        .map(|lane| lane.id)
        .collect()
}

/// Returns whether `kind` is hosted by at least one fixed lane.
pub fn kind_is_supported(kind: ItemKind) -> bool {
    lanes().iter().any(|lane| lane.allows(kind))
}
