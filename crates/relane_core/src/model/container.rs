//! Container and asset model.
//!
//! # Responsibility
//! - Define the project container the engine receives, mutates, and
//!   snapshots.
//! - Keep the whole graph fully owned so `Clone` produces an independent
//!   deep copy.
//!
//! # Invariants
//! - Timestamps are epoch milliseconds.
//! - No shared mutable substructure: snapshots and rollback results never
//!   alias the live container.

use crate::model::item::{Item, ItemKind};
use serde::{Deserialize, Serialize};
use std::time::{SystemTime, UNIX_EPOCH};
use uuid::Uuid;

/// Stable identifier for one project container.
pub type ContainerId = Uuid;

/// Stable identifier for one content asset.
pub type AssetId = Uuid;

/// One content asset referenced by timeline items.
///
/// Assets are owned by the external asset library; the container carries the
/// resolved list so classification and validation can see it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Asset {
    /// Stable asset id.
    pub id: AssetId,
    /// Serialized as `type` to match the external schema naming.
    #[serde(rename = "type")]
    pub kind: ItemKind,
    /// User-facing asset name, e.g. an original file name.
    pub name: String,
    /// Media duration when known.
    pub duration_ms: Option<i64>,
}

impl Asset {
    /// Creates an asset with a generated stable id.
    pub fn new(kind: ItemKind, name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            kind,
            name: name.into(),
            duration_ms: None,
        }
    }
}

/// The project container: a user-built arrangement of timed items plus the
/// assets backing them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Container {
    /// Stable container id; backups are retained per container.
    pub id: ContainerId,
    /// User-chosen project name.
    pub name: String,
    /// Version tag; migration appends its marker here exactly once.
    pub version: String,
    /// Timed content items, in authoring order.
    pub items: Vec<Item>,
    /// Assets referenced by items; may be incomplete (orphaned items).
    pub assets: Vec<Asset>,
    /// Epoch ms creation timestamp.
    pub created_at: i64,
    /// Epoch ms timestamp of the last mutation.
    pub updated_at: i64,
}

impl Container {
    /// Creates an empty container with a generated stable id.
    pub fn new(name: impl Into<String>) -> Self {
        Self::with_id(Uuid::new_v4(), name)
    }

    /// Creates an empty container with a caller-provided stable id.
    pub fn with_id(id: ContainerId, name: impl Into<String>) -> Self {
        let now = epoch_ms_now();
        Self {
            id,
            name: name.into(),
            version: "1.0".to_string(),
            items: Vec::new(),
            assets: Vec::new(),
            created_at: now,
            updated_at: now,
        }
    }

    /// Refreshes the `updated_at` timestamp.
    pub fn touch(&mut self) {
        self.updated_at = epoch_ms_now();
    }

    /// Looks up an asset carried by this container.
    pub fn asset(&self, id: AssetId) -> Option<&Asset> {
        self.assets.iter().find(|asset| asset.id == id)
    }
}

/// Current wall-clock time in epoch milliseconds.
///
/// Clamps to 0 if the clock reports a pre-epoch time instead of panicking.
pub(crate) fn epoch_ms_now() -> i64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|elapsed| elapsed.as_millis() as i64)
        .unwrap_or(0)
}

#[cfg(test)]
mod tests {
    use super::{Asset, Container};
    use crate::model::item::{Item, ItemKind};

    #[test]
    fn new_container_starts_empty_with_version_tag() {
        let container = Container::new("rust ownership walkthrough");
        assert!(container.items.is_empty());
        assert!(container.assets.is_empty());
        assert_eq!(container.version, "1.0");
        assert_eq!(container.created_at, container.updated_at);
    }

    #[test]
    fn asset_lookup_finds_carried_assets_only() {
        let mut container = Container::new("demo");
        let carried = Asset::new(ItemKind::Audio, "voiceover.wav");
        let foreign = Asset::new(ItemKind::Video, "screen.mp4");
        container.assets.push(carried.clone());

        assert_eq!(container.asset(carried.id), Some(&carried));
        assert!(container.asset(foreign.id).is_none());
    }

    #[test]
    fn clone_is_an_independent_deep_copy() {
        let mut container = Container::new("demo");
        let mut item = Item::new(ItemKind::Code, 0);
        item.properties.theme = Some("midnight".to_string());
        container.items.push(item);

        let snapshot = container.clone();
        container.items[0].slot = 9;
        container.items[0].properties.theme = Some("paper".to_string());
        container.name.push_str(" edited");

        assert_eq!(snapshot.items[0].slot, 0);
        assert_eq!(snapshot.items[0].properties.theme.as_deref(), Some("midnight"));
        assert_eq!(snapshot.name, "demo");
    }
}
