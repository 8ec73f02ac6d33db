//! Placement classification contracts.
//!
//! # Responsibility
//! - Define the classifier SPI consumed by the reconciliation engine.
//! - Provide the asset-less fallback table and the built-in kind-based
//!   classifier.
//!
//! # Invariants
//! - Confidence is always within 0..=100; `Classification::new` clamps.
//! - Fallback classification never consults an asset.

pub mod classifier;
