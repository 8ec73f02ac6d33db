//! Aggregate container reporting.
//!
//! # Responsibility
//! - Summarize a container: item totals per suggested lane and per kind,
//!   mean classification confidence, and pending conflict count.
//!
//! # Invariants
//! - Both count maps are zero-initialized over the full key sets, so absent
//!   categories report 0 instead of being omitted.
//! - Lane counts follow the classifier suggestion, not an already stamped
//!   assignment.
//! - The mean confidence over zero items is exactly 0.

use crate::classify::classifier::{classify_or_fallback, ClassifyContext, PlacementClassifier};
use crate::engine::conflict::detect_conflicts;
use crate::model::container::Container;
use crate::model::item::ItemKind;
use crate::model::lane::LaneId;
use std::collections::BTreeMap;

/// Aggregate report for one container.
#[derive(Debug, Clone, PartialEq)]
pub struct ContainerStats {
    pub total_items: usize,
    /// Item count per lane, keyed by classifier suggestion.
    pub items_by_lane: BTreeMap<LaneId, usize>,
    /// Item count per content kind.
    pub items_by_kind: BTreeMap<ItemKind, usize>,
    /// Mean classification confidence; 0 for an empty container.
    pub average_confidence: f64,
    /// Number of conflicts a migration attempt would flag right now.
    pub conflict_count: usize,
}

/// Computes the aggregate report.
pub fn container_stats(
    container: &Container,
    classifier: &dyn PlacementClassifier,
) -> ContainerStats {
    let context = ClassifyContext::for_container(container);

    let mut items_by_lane: BTreeMap<LaneId, usize> =
        LaneId::ALL.iter().map(|lane| (*lane, 0)).collect();
    let mut items_by_kind: BTreeMap<ItemKind, usize> =
        ItemKind::ALL.iter().map(|kind| (*kind, 0)).collect();

    let mut confidence_total: u64 = 0;
    for item in &container.items {
        let classification = classify_or_fallback(classifier, item, &container.assets, &context);
        if let Some(count) = items_by_lane.get_mut(&classification.suggested_lane) {
            *count += 1;
        }
        if let Some(count) = items_by_kind.get_mut(&item.kind) {
            *count += 1;
        }
        confidence_total += u64::from(classification.confidence);
    }

    let average_confidence = if container.items.is_empty() {
        0.0
    } else {
        confidence_total as f64 / container.items.len() as f64
    };

    let conflict_count =
        detect_conflicts(&container.items, &container.assets, classifier, &context).len();

    ContainerStats {
        total_items: container.items.len(),
        items_by_lane,
        items_by_kind,
        average_confidence,
        conflict_count,
    }
}
