//! Slot-group conflict detection.
//!
//! # Responsibility
//! - Group items by their current numeric slot and flag disagreement about
//!   which semantic lane the group members belong on.
//! - Offer alternative lanes for every flagged item.
//!
//! # Invariants
//! - Pure over its inputs: no item or asset is mutated.
//! - A slot group of size one never yields a conflict.
//! - Alternatives never include the suggested lane itself.

use crate::classify::classifier::{classify_or_fallback, ClassifyContext, PlacementClassifier};
use crate::model::container::Asset;
use crate::model::item::{Item, ItemId, ItemKind};
use crate::model::lane::{lanes_allowing, slot_to_lane, LaneId};
use std::collections::{BTreeMap, BTreeSet};

/// One flagged placement disagreement. Ephemeral, produced per attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conflict {
    /// Item whose suggested lane disagrees with its current slot.
    pub item_id: ItemId,
    /// Numeric slot the item currently occupies.
    pub current_slot: u32,
    /// Lane the classifier (or fallback) wants the item on.
    pub suggested_lane: LaneId,
    /// Human-readable justification from the classification.
    pub reason: String,
    /// Other lanes that host the item's kind, excluding the suggested one.
    pub alternatives: Vec<LaneId>,
}

/// Detects placement conflicts between items sharing a slot.
///
/// Items are grouped by `slot`; lone items are skipped because they can be
/// relocated silently. Within a group of two or more, every member is
/// classified, and when the members disagree about their target lane, a
/// conflict is emitted for each item whose suggestion differs from the lane
/// fixed to its current slot.
pub fn detect_conflicts(
    items: &[Item],
    assets: &[Asset],
    classifier: &dyn PlacementClassifier,
    context: &ClassifyContext,
) -> Vec<Conflict> {
    let mut groups: BTreeMap<u32, Vec<&Item>> = BTreeMap::new();
    for item in items {
        groups.entry(item.slot).or_default().push(item);
    }

    let mut conflicts = Vec::new();
    for (slot, group) in groups {
        if group.len() <= 1 {
            continue;
        }

        let classified: Vec<_> = group
            .into_iter()
            .map(|item| {
                let classification = classify_or_fallback(classifier, item, assets, context);
                (item, classification)
            })
            .collect();

        let distinct_suggestions: BTreeSet<LaneId> = classified
            .iter()
            .map(|(_, classification)| classification.suggested_lane)
            .collect();
        if distinct_suggestions.len() <= 1 {
            continue;
        }

        // Slots outside the fixed range have no current lane, so every
        // suggestion there counts as differing.
        let current_lane = slot_to_lane(slot);
        for (item, classification) in classified {
            if current_lane == Some(classification.suggested_lane) {
                continue;
            }
            conflicts.push(Conflict {
                item_id: item.id,
                current_slot: slot,
                suggested_lane: classification.suggested_lane,
                reason: classification.reason,
                alternatives: alternatives_for(item.kind, classification.suggested_lane),
            });
        }
    }

    conflicts
}

fn alternatives_for(kind: ItemKind, suggested: LaneId) -> Vec<LaneId> {
    lanes_allowing(kind)
        .into_iter()
        .filter(|lane| *lane != suggested)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::{detect_conflicts, Conflict};
    use crate::classify::classifier::{ClassifyContext, KindBasedClassifier};
    use crate::model::container::Asset;
    use crate::model::item::{Item, ItemKind};
    use crate::model::lane::LaneId;

    fn context(item_count: usize) -> ClassifyContext {
        ClassifyContext {
            container_name: "conflict tests".to_string(),
            item_count,
        }
    }

    fn item_with_asset(kind: ItemKind, slot: u32, asset: &Asset) -> Item {
        let mut item = Item::new(kind, slot);
        item.asset_id = Some(asset.id);
        item
    }

    #[test]
    fn lone_item_on_a_slot_is_never_flagged() {
        let asset = Asset::new(ItemKind::Audio, "voiceover.wav");
        // Audio on the code slot disagrees with the slot lane, but it is the
        // only occupant and gets relocated silently.
        let items = vec![item_with_asset(ItemKind::Audio, 0, &asset)];

        let conflicts = detect_conflicts(
            &items,
            std::slice::from_ref(&asset),
            &KindBasedClassifier::new(),
            &context(1),
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn agreeing_group_is_not_flagged() {
        let asset_a = Asset::new(ItemKind::Video, "screen take 1.mp4");
        let asset_b = Asset::new(ItemKind::Video, "screen take 2.mp4");
        let items = vec![
            item_with_asset(ItemKind::Video, 1, &asset_a),
            item_with_asset(ItemKind::Video, 1, &asset_b),
        ];

        let conflicts = detect_conflicts(
            &items,
            &[asset_a, asset_b],
            &KindBasedClassifier::new(),
            &context(2),
        );
        assert!(conflicts.is_empty());
    }

    #[test]
    fn disagreeing_group_flags_items_off_their_slot_lane() {
        let code_asset = Asset::new(ItemKind::Code, "main.rs");
        let video_asset = Asset::new(ItemKind::Video, "terminal capture.mp4");
        let audio_asset = Asset::new(ItemKind::Audio, "voiceover.wav");
        let code_item = item_with_asset(ItemKind::Code, 0, &code_asset);
        let video_item = item_with_asset(ItemKind::Video, 0, &video_asset);
        let audio_item = item_with_asset(ItemKind::Audio, 0, &audio_asset);

        let items = vec![code_item.clone(), video_item.clone(), audio_item.clone()];
        let assets = vec![code_asset, video_asset, audio_asset];
        let conflicts =
            detect_conflicts(&items, &assets, &KindBasedClassifier::new(), &context(3));

        // Slot 0 belongs to the code lane, so the code item agrees with its
        // slot and stays silent; the other two are flagged.
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|conflict| conflict.current_slot == 0));
        assert!(conflicts
            .iter()
            .all(|conflict| conflict.item_id != code_item.id));

        let video_conflict = find_conflict(&conflicts, &video_item);
        assert_eq!(video_conflict.suggested_lane, LaneId::Visual);
        assert_eq!(video_conflict.alternatives, vec![LaneId::You]);

        let audio_conflict = find_conflict(&conflicts, &audio_item);
        assert_eq!(audio_conflict.suggested_lane, LaneId::Narration);
        assert!(audio_conflict.alternatives.is_empty());
    }

    #[test]
    fn fallback_classification_drives_detection_without_assets() {
        let video_item = Item::new(ItemKind::Video, 0);
        let code_item = Item::new(ItemKind::Code, 0);
        let items = vec![video_item.clone(), code_item.clone()];

        let conflicts = detect_conflicts(&items, &[], &KindBasedClassifier::new(), &context(2));

        // Fallback suggests Visual for the video item and Code for the code
        // item; only the video item differs from the slot-0 lane.
        assert_eq!(conflicts.len(), 1);
        assert_eq!(conflicts[0].item_id, video_item.id);
        assert_eq!(conflicts[0].suggested_lane, LaneId::Visual);
        assert!(conflicts[0].reason.contains("no asset found"));
    }

    #[test]
    fn out_of_range_slot_flags_every_disagreeing_member() {
        let code_item = Item::new(ItemKind::Code, 7);
        let audio_item = Item::new(ItemKind::Audio, 7);
        let items = vec![code_item, audio_item];

        let conflicts = detect_conflicts(&items, &[], &KindBasedClassifier::new(), &context(2));

        // Slot 7 has no fixed lane, so both suggestions count as differing.
        assert_eq!(conflicts.len(), 2);
        assert!(conflicts.iter().all(|conflict| conflict.current_slot == 7));
    }

    fn find_conflict<'a>(conflicts: &'a [Conflict], item: &Item) -> &'a Conflict {
        conflicts
            .iter()
            .find(|conflict| conflict.item_id == item.id)
            .expect("conflict for item should exist")
    }
}
