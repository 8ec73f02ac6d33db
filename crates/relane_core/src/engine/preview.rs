//! Dry-run migration report.
//!
//! # Responsibility
//! - Produce the full proposed slot-to-lane mapping plus the conflict list
//!   without touching the container or the backup store.
//!
//! # Invariants
//! - Zero mutation: the container is only read.
//! - Every item appears in the placement list, not only conflicting ones.

use crate::classify::classifier::{
    classify_or_fallback, ClassifyContext, PlacementClassifier, LOW_CONFIDENCE_THRESHOLD,
};
use crate::engine::conflict::{detect_conflicts, Conflict};
use crate::model::container::Container;
use crate::model::item::ItemId;
use crate::model::lane::LaneId;

/// Proposed placement for one item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlacementProposal {
    pub item_id: ItemId,
    pub current_slot: u32,
    pub suggested_lane: LaneId,
    pub confidence: u8,
    pub reason: String,
}

/// Full dry-run report for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PreviewReport {
    /// Placement disagreements a real migration would have to resolve.
    pub conflicts: Vec<Conflict>,
    /// Proposed mapping for every item, in container order.
    pub placements: Vec<PlacementProposal>,
    /// Low-confidence caveats a real migration would also emit.
    pub warnings: Vec<String>,
}

/// Computes the dry-run report: conflicts plus a placement proposal per item.
pub fn preview_container(
    container: &Container,
    classifier: &dyn PlacementClassifier,
) -> PreviewReport {
    let context = ClassifyContext::for_container(container);
    let conflicts = detect_conflicts(&container.items, &container.assets, classifier, &context);

    let mut placements = Vec::with_capacity(container.items.len());
    let mut warnings = Vec::new();
    for item in &container.items {
        let classification = classify_or_fallback(classifier, item, &container.assets, &context);
        if classification.confidence < LOW_CONFIDENCE_THRESHOLD {
            warnings.push(format!(
                "item {} would land on the {} lane with low confidence {}: `{}`",
                item.id,
                classification.suggested_lane,
                classification.confidence,
                classification.reason
            ));
        }
        placements.push(PlacementProposal {
            item_id: item.id,
            current_slot: item.slot,
            suggested_lane: classification.suggested_lane,
            confidence: classification.confidence,
            reason: classification.reason,
        });
    }

    PreviewReport {
        conflicts,
        placements,
        warnings,
    }
}
