//! Assignment application and container stamping.
//!
//! # Responsibility
//! - Apply final lane assignments to the container: merge lane default
//!   properties under item values, stamp lane identity and semantic
//!   metadata, refresh the container timestamp and version marker.
//!
//! # Invariants
//! - Preconditions are checked before any mutation; a failed execution
//!   leaves the container untouched.
//! - An item's own property values always win over lane defaults.
//! - The version marker is appended exactly once, guarded by a substring
//!   check, so repeated migrations never double-stamp.
//! - Kind/lane mismatch and low confidence are warnings, never failures.

use crate::classify::classifier::LOW_CONFIDENCE_THRESHOLD;
use crate::engine::resolve::LaneAssignment;
use crate::model::container::Container;
use crate::model::item::{Difficulty, ItemId, ItemKind, ItemMetadata};
use crate::model::lane::{lane, LaneId};
use std::collections::HashSet;
use std::error::Error;
use std::fmt::{Display, Formatter};

/// Marker appended to the container version by a completed migration.
pub const LANE_MIGRATION_MARKER: &str = "[lanes-v2]";

pub type ExecutionResult<T> = Result<T, ExecutionError>;

/// Precondition failures surfaced before any container mutation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ExecutionError {
    /// An assignment targets an item the container does not hold.
    UnknownItem(ItemId),
    /// Two assignments target the same item.
    DuplicateAssignment(ItemId),
}

impl Display for ExecutionError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::UnknownItem(id) => write!(f, "assignment targets unknown item: {id}"),
            Self::DuplicateAssignment(id) => {
                write!(f, "item is targeted by more than one assignment: {id}")
            }
        }
    }
}

impl Error for ExecutionError {}

/// Outcome of a completed assignment application.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExecutionOutcome {
    /// Number of items stamped onto a lane.
    pub migrated_count: usize,
    /// Non-fatal caveats: kind/lane mismatches and low-confidence stamps.
    pub warnings: Vec<String>,
}

/// Applies lane assignments to the container.
///
/// Items without an assignment are carried over unchanged. Per assigned
/// item: a kind the lane does not host appends a warning but the assignment
/// still proceeds; properties become the lane-default overlay with item
/// values winning; lane identity and metadata are stamped; a confidence
/// below the review threshold records a `suggested_lane` annotation and a
/// warning quoting the reason. Afterwards the item list is replaced, the
/// container timestamp refreshed, and the version marker appended once.
pub fn apply_assignments(
    container: &mut Container,
    assignments: &[LaneAssignment],
) -> ExecutionResult<ExecutionOutcome> {
    let mut targeted = HashSet::with_capacity(assignments.len());
    for assignment in assignments {
        if !container
            .items
            .iter()
            .any(|item| item.id == assignment.item_id)
        {
            return Err(ExecutionError::UnknownItem(assignment.item_id));
        }
        if !targeted.insert(assignment.item_id) {
            return Err(ExecutionError::DuplicateAssignment(assignment.item_id));
        }
    }

    let mut warnings = Vec::new();
    let mut migrated_count = 0;
    let mut migrated_items = Vec::with_capacity(container.items.len());

    for item in &container.items {
        let Some(assignment) = assignments
            .iter()
            .find(|assignment| assignment.item_id == item.id)
        else {
            migrated_items.push(item.clone());
            continue;
        };

        let target = lane(assignment.lane);
        let mut migrated = item.clone();

        if !target.allows(item.kind) {
            warnings.push(format!(
                "item {} of kind `{}` is not hosted by the {} lane; migrating anyway",
                item.id, item.kind, target.name
            ));
        }

        migrated.properties = item.properties.overlaid_on(&target.default_properties);
        migrated.assigned_lane = Some(target.id);
        migrated.metadata = Some(ItemMetadata {
            purpose: purpose_for(target.id, item.kind).to_string(),
            difficulty: Difficulty::Beginner,
            tags: Vec::new(),
        });

        if assignment.confidence < LOW_CONFIDENCE_THRESHOLD {
            migrated.suggested_lane = Some(assignment.lane);
            warnings.push(format!(
                "item {} assigned to the {} lane with low confidence {}: `{}`",
                item.id, target.name, assignment.confidence, assignment.reason
            ));
        }

        migrated_items.push(migrated);
        migrated_count += 1;
    }

    container.items = migrated_items;
    container.touch();
    stamp_version_marker(container);

    Ok(ExecutionOutcome {
        migrated_count,
        warnings,
    })
}

/// Returns the semantic purpose stamped for one lane/kind pairing.
pub fn purpose_for(lane_id: LaneId, kind: ItemKind) -> &'static str {
    match (lane_id, kind) {
        (LaneId::Code, _) => "code-walkthrough",
        (LaneId::Visual, ItemKind::Title) => "section-title",
        (LaneId::Visual, ItemKind::VisualAsset) => "illustration",
        (LaneId::Visual, _) => "screen-footage",
        (LaneId::Narration, _) => "voiceover",
        (LaneId::You, _) => "presenter-overlay",
    }
}

fn stamp_version_marker(container: &mut Container) {
    if container.version.contains(LANE_MIGRATION_MARKER) {
        return;
    }
    container.version.push(' ');
    container.version.push_str(LANE_MIGRATION_MARKER);
}
