//! Classifier SPI, fallback table, and the built-in kind-based classifier.
//!
//! # Responsibility
//! - Declare the `PlacementClassifier` contract the engine consumes.
//! - Map items without a resolvable asset through the static fallback table.
//!
//! # Invariants
//! - `Classification.confidence` is clamped to 0..=100 at construction.
//! - The fallback path uses `FALLBACK_CONFIDENCE` and never inspects assets.

use crate::model::container::{Asset, Container};
use crate::model::item::{Item, ItemKind};
use crate::model::lane::LaneId;
use once_cell::sync::Lazy;
use regex::Regex;

/// Confidence given to assignments derived from the static fallback table.
pub const FALLBACK_CONFIDENCE: u8 = 30;

/// Assignments below this confidence are annotated for review and produce a
/// warning.
pub const LOW_CONFIDENCE_THRESHOLD: u8 = 70;

static CAMERA_NAME_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)\b(webcam|camera|facecam|selfie|presenter)\b").expect("valid camera regex")
});

/// One classifier suggestion for an item. Ephemeral, never persisted.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Classification {
    /// Lane the classifier believes the item belongs on.
    pub suggested_lane: LaneId,
    /// Self-reported certainty, 0..=100.
    pub confidence: u8,
    /// Human-readable justification surfaced in conflicts and warnings.
    pub reason: String,
}

impl Classification {
    /// Creates a classification, clamping `confidence` into 0..=100.
    pub fn new(suggested_lane: LaneId, confidence: u8, reason: impl Into<String>) -> Self {
        Self {
            suggested_lane,
            confidence: confidence.min(100),
            reason: reason.into(),
        }
    }
}

/// Classification context shared by one engine operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ClassifyContext {
    /// Name of the container being reconciled.
    pub container_name: String,
    /// Total item count in the container.
    pub item_count: usize,
}

impl ClassifyContext {
    /// Builds the context for one container.
    pub fn for_container(container: &Container) -> Self {
        Self {
            container_name: container.name.clone(),
            item_count: container.items.len(),
        }
    }
}

/// Placement classifier contract.
///
/// The engine only requires this interface; richer content-aware classifiers
/// live outside the core and are injected by the host.
pub trait PlacementClassifier {
    /// Suggests a lane for `item` based on its backing `asset`.
    fn classify(&self, item: &Item, asset: &Asset, context: &ClassifyContext) -> Classification;
}

/// Built-in classifier mapping asset kinds to lanes.
///
/// Video assets whose name reads like a camera recording suggest the
/// presenter lane; everything else follows the kind directly.
#[derive(Debug, Default, Clone, Copy)]
pub struct KindBasedClassifier;

impl KindBasedClassifier {
    pub fn new() -> Self {
        Self
    }
}

impl PlacementClassifier for KindBasedClassifier {
    fn classify(&self, _item: &Item, asset: &Asset, _context: &ClassifyContext) -> Classification {
        match asset.kind {
            ItemKind::Code => Classification::new(
                LaneId::Code,
                95,
                "code asset belongs on the code lane",
            ),
            ItemKind::Audio => Classification::new(
                LaneId::Narration,
                90,
                "audio asset reads as narration",
            ),
            ItemKind::Title => Classification::new(
                LaneId::Visual,
                85,
                "title card belongs on the visual lane",
            ),
            ItemKind::VisualAsset => Classification::new(
                LaneId::Visual,
                85,
                "visual asset belongs on the visual lane",
            ),
            ItemKind::Video => {
                if CAMERA_NAME_RE.is_match(&asset.name) {
                    Classification::new(
                        LaneId::You,
                        75,
                        format!("asset name `{}` reads as a presenter recording", asset.name),
                    )
                } else {
                    Classification::new(
                        LaneId::Visual,
                        80,
                        "video asset defaults to the visual lane",
                    )
                }
            }
            ItemKind::Caption => Classification::new(
                LaneId::Visual,
                40,
                "caption has no dedicated lane; visual is the closest fit",
            ),
        }
    }
}

/// Classifies one item through the classifier, or through the fallback table
/// when its asset cannot be resolved.
pub fn classify_or_fallback(
    classifier: &dyn PlacementClassifier,
    item: &Item,
    assets: &[Asset],
    context: &ClassifyContext,
) -> Classification {
    match resolve_asset(item, assets) {
        Some(asset) => classifier.classify(item, asset, context),
        None => fallback_for_kind(item.kind),
    }
}

/// Static kind-to-lane fallback used when no asset is resolvable.
///
/// Kinds outside the fixed table (captions) fall back to the visual lane,
/// the editor's catch-all overlay.
pub fn fallback_for_kind(kind: ItemKind) -> Classification {
    let lane = match kind {
        ItemKind::Code => LaneId::Code,
        ItemKind::Video => LaneId::Visual,
        ItemKind::Title => LaneId::Visual,
        ItemKind::Audio => LaneId::Narration,
        ItemKind::VisualAsset => LaneId::Visual,
        ItemKind::Caption => LaneId::Visual,
    };
    Classification::new(
        lane,
        FALLBACK_CONFIDENCE,
        format!("no asset found, using fallback for {kind}"),
    )
}

fn resolve_asset<'a>(item: &Item, assets: &'a [Asset]) -> Option<&'a Asset> {
    let asset_id = item.asset_id?;
    assets.iter().find(|asset| asset.id == asset_id)
}
