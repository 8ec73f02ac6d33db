//! Timeline item model.
//!
//! # Responsibility
//! - Define the timed content item placed on numbered slots.
//! - Provide the typed property overlay used when lane defaults are merged
//!   under item-level values.
//!
//! # Invariants
//! - `id` is stable and never reused for another item.
//! - Pre-migration items carry `assigned_lane = None` and `metadata = None`.
//! - Property merging is field-by-field; an item value always wins over a
//!   lane default.

use crate::model::container::AssetId;
use crate::model::lane::LaneId;
use serde::{Deserialize, Serialize};
use std::fmt::{Display, Formatter};
use uuid::Uuid;

/// Stable identifier for one timeline item.
pub type ItemId = Uuid;

/// Content kind of a timeline item or its backing asset.
///
/// `Caption` exists in the editor but is hosted by no fixed lane; the
/// validator reports it as unsupported.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ItemKind {
    Code,
    Video,
    Title,
    Audio,
    VisualAsset,
    Caption,
}

impl ItemKind {
    /// All kinds known by the editor, in declaration order.
    pub const ALL: [ItemKind; 6] = [
        ItemKind::Code,
        ItemKind::Video,
        ItemKind::Title,
        ItemKind::Audio,
        ItemKind::VisualAsset,
        ItemKind::Caption,
    ];

    /// Kebab-case identifier matching the external schema naming.
    pub fn as_str(self) -> &'static str {
        match self {
            ItemKind::Code => "code",
            ItemKind::Video => "video",
            ItemKind::Title => "title",
            ItemKind::Audio => "audio",
            ItemKind::VisualAsset => "visual-asset",
            ItemKind::Caption => "caption",
        }
    }
}

impl Display for ItemKind {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Typed render properties of one item.
///
/// Every field is optional so the same record can express a sparse item
/// override or a lane default overlay.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ItemProperties {
    pub opacity: Option<f64>,
    pub scale: Option<f64>,
    pub position_x: Option<f64>,
    pub position_y: Option<f64>,
    pub volume: Option<f64>,
    pub muted: Option<bool>,
    pub z_index: Option<i64>,
    /// Code rendering theme; meaningful for `ItemKind::Code` items.
    pub theme: Option<String>,
}

impl ItemProperties {
    /// Merges `self` over lane `defaults`: item values win field by field,
    /// lane defaults fill the gaps.
    pub fn overlaid_on(&self, defaults: &ItemProperties) -> ItemProperties {
        ItemProperties {
            opacity: self.opacity.or(defaults.opacity),
            scale: self.scale.or(defaults.scale),
            position_x: self.position_x.or(defaults.position_x),
            position_y: self.position_y.or(defaults.position_y),
            volume: self.volume.or(defaults.volume),
            muted: self.muted.or(defaults.muted),
            z_index: self.z_index.or(defaults.z_index),
            theme: self.theme.clone().or_else(|| defaults.theme.clone()),
        }
    }
}

/// Authoring difficulty stamped into item metadata.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Difficulty {
    Beginner,
    Intermediate,
    Advanced,
}

/// Semantic metadata stamped onto an item by migration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ItemMetadata {
    /// What the item is for on its lane, e.g. `demonstration`, `voiceover`.
    pub purpose: String,
    /// Always stamped `beginner`; later authoring passes may raise it.
    pub difficulty: Difficulty,
    /// Free-form tags; migration stamps an empty set.
    pub tags: Vec<String>,
}

/// One timed content item placed on a numbered slot.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Item {
    /// Stable item id used in conflicts, decisions, and diagnostics.
    pub id: ItemId,
    /// Backing asset reference; `None` for asset-less items such as bare
    /// title cards.
    pub asset_id: Option<AssetId>,
    /// Numeric slot the item currently occupies.
    pub slot: u32,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// Timeline start in epoch-relative milliseconds.
    pub start_ms: i64,
    /// Playback duration in milliseconds.
    pub duration_ms: i64,
    /// Sparse item-level property overrides.
    pub properties: ItemProperties,
    /// Semantic lane assigned by migration; `None` before migration.
    pub assigned_lane: Option<LaneId>,
    /// Low-confidence annotation left for review when the classifier was
    /// unsure; `None` otherwise.
    pub suggested_lane: Option<LaneId>,
    /// Semantic metadata stamped by migration; `None` before migration.
    pub metadata: Option<ItemMetadata>,
}

impl Item {
    /// Creates a pre-migration item with a generated stable id.
    pub fn new(kind: ItemKind, slot: u32) -> Self {
        Self::with_id(Uuid::new_v4(), kind, slot)
    }

    /// Creates a pre-migration item with a caller-provided stable id.
    ///
    /// Used by import paths where identity already exists externally.
    pub fn with_id(id: ItemId, kind: ItemKind, slot: u32) -> Self {
        Self {
            id,
            asset_id: None,
            slot,
            kind,
            start_ms: 0,
            duration_ms: 0,
            properties: ItemProperties::default(),
            assigned_lane: None,
            suggested_lane: None,
            metadata: None,
        }
    }

    /// Returns whether migration has stamped this item onto a lane.
    pub fn is_migrated(&self) -> bool {
        self.assigned_lane.is_some()
    }
}
