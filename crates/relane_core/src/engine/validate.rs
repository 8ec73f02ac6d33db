//! Pre-flight migration eligibility checks.
//!
//! # Responsibility
//! - Report everything that would make a migration questionable before any
//!   mutation happens.
//!
//! # Invariants
//! - Every check is evaluated independently; multiple issues can coexist.
//! - `can_migrate` is true only when the issue list is empty.
//! - An item without an asset reference is legal; only a dangling reference
//!   counts as orphaned.

use crate::model::container::Container;
use crate::model::item::ItemKind;
use crate::model::lane::{kind_is_supported, slot_to_lane};
use std::collections::BTreeSet;

/// Pre-flight report for one container.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ValidationReport {
    /// True only when no issue was found.
    pub can_migrate: bool,
    /// Human-readable findings; the caller decides whether to proceed.
    pub issues: Vec<String>,
}

/// Runs all eligibility checks over the container.
///
/// Checks: empty item list, empty asset list, orphaned items (dangling
/// asset references), kinds hosted by no lane, and items sitting on slots
/// outside the fixed lane range.
pub fn validate_container(container: &Container) -> ValidationReport {
    let mut issues = Vec::new();

    if container.items.is_empty() {
        issues.push("container has no items".to_string());
    }
    if container.assets.is_empty() {
        issues.push("container has no assets".to_string());
    }

    let orphaned = container
        .items
        .iter()
        .filter(|item| {
            item.asset_id
                .is_some_and(|asset_id| container.asset(asset_id).is_none())
        })
        .count();
    if orphaned > 0 {
        issues.push(format!("items referencing a missing asset: {orphaned}"));
    }

    let unsupported_kinds: BTreeSet<ItemKind> = container
        .items
        .iter()
        .map(|item| item.kind)
        .filter(|kind| !kind_is_supported(*kind))
        .collect();
    if !unsupported_kinds.is_empty() {
        let names: Vec<&str> = unsupported_kinds.iter().map(|kind| kind.as_str()).collect();
        issues.push(format!(
            "item kinds hosted by no lane: {}",
            names.join(", ")
        ));
    }

    let out_of_range = container
        .items
        .iter()
        .filter(|item| slot_to_lane(item.slot).is_none())
        .count();
    if out_of_range > 0 {
        issues.push(format!(
            "items on slots outside the fixed lane range: {out_of_range}"
        ));
    }

    ValidationReport {
        can_migrate: issues.is_empty(),
        issues,
    }
}
