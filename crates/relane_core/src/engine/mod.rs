//! Reconciliation engine.
//!
//! # Responsibility
//! - Detect placement conflicts, resolve assignments, and apply migrations.
//! - Provide the dry-run, validation, and statistics entry points the
//!   service facade composes.
//!
//! # Invariants
//! - Detection, preview, validation, and statistics never mutate their
//!   inputs.
//! - Only `execute` mutates a container, and only after its preconditions
//!   passed.

pub mod conflict;
pub mod execute;
pub mod preview;
pub mod resolve;
pub mod stats;
pub mod validate;
