//! Assignment resolution from classifier output and caller decisions.
//!
//! # Responsibility
//! - Merge explicit caller decisions with automatic classification into one
//!   final lane assignment per item.
//!
//! # Invariants
//! - Every item receives exactly one assignment; resolution never re-runs
//!   conflict detection.
//! - A decision matching an item always wins over its classification.

use crate::classify::classifier::{classify_or_fallback, ClassifyContext, PlacementClassifier};
use crate::model::container::Asset;
use crate::model::item::{Item, ItemId};
use crate::model::lane::LaneId;

/// Confidence recorded when the caller explicitly overrode the classifier.
pub const USER_OVERRIDE_CONFIDENCE: u8 = 100;

/// Confidence recorded when the caller picked among offered alternatives.
pub const USER_DECISION_CONFIDENCE: u8 = 80;

/// Caller-supplied resolution for one flagged item.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Decision {
    /// Id of the conflict being resolved; equals the flagged item's id.
    pub conflict_id: ItemId,
    /// Lane the caller chose for the item.
    pub selected_lane: LaneId,
    /// True when the caller overrode the classifier outright rather than
    /// picking one of the offered alternatives.
    pub user_override: bool,
}

/// Final per-item lane assignment fed to the executor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LaneAssignment {
    pub item_id: ItemId,
    pub lane: LaneId,
    pub confidence: u8,
    pub reason: String,
}

/// Resolves one assignment per item.
///
/// An item with a matching decision takes the decision's lane; everything
/// else is classified through the collaborator or the fallback table. Once a
/// caller has opted into resolution, every item proceeds to assignment
/// whether or not it was originally flagged.
pub fn resolve_assignments(
    items: &[Item],
    assets: &[Asset],
    decisions: &[Decision],
    classifier: &dyn PlacementClassifier,
    context: &ClassifyContext,
) -> Vec<LaneAssignment> {
    items
        .iter()
        .map(|item| {
            match decisions
                .iter()
                .find(|decision| decision.conflict_id == item.id)
            {
                Some(decision) => assignment_from_decision(item.id, decision),
                None => {
                    let classification = classify_or_fallback(classifier, item, assets, context);
                    LaneAssignment {
                        item_id: item.id,
                        lane: classification.suggested_lane,
                        confidence: classification.confidence,
                        reason: classification.reason,
                    }
                }
            }
        })
        .collect()
}

fn assignment_from_decision(item_id: ItemId, decision: &Decision) -> LaneAssignment {
    let (confidence, reason) = if decision.user_override {
        (USER_OVERRIDE_CONFIDENCE, "user override")
    } else {
        (USER_DECISION_CONFIDENCE, "user decision")
    };
    LaneAssignment {
        item_id,
        lane: decision.selected_lane,
        confidence,
        reason: reason.to_string(),
    }
}
