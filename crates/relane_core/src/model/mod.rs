//! Domain model for timeline containers and semantic lanes.
//!
//! # Responsibility
//! - Define the canonical data structures used by the reconciliation engine.
//! - Keep the container graph fully owned so snapshots are deep copies by
//!   construction.
//!
//! # Invariants
//! - Every domain object is identified by a stable UUID.
//! - Exactly one semantic lane exists per slot 0..=3; the registry is fixed
//!   at compile time.

pub mod container;
pub mod item;
pub mod lane;
