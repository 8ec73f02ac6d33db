//! Core domain logic for Relane.
//! This crate is the single source of truth for lane reconciliation invariants.

pub mod backup;
pub mod classify;
pub mod db;
pub mod engine;
pub mod logging;
pub mod model;
pub mod service;

pub use backup::{
    BackupEntry, BackupError, BackupId, BackupRepository, BackupResult, MemoryBackupRepository,
    SqliteBackupRepository, BACKUP_RETENTION_LIMIT,
};
pub use classify::classifier::{
    Classification, ClassifyContext, KindBasedClassifier, PlacementClassifier,
    LOW_CONFIDENCE_THRESHOLD,
};
pub use engine::conflict::Conflict;
pub use engine::execute::LANE_MIGRATION_MARKER;
pub use engine::preview::{PlacementProposal, PreviewReport};
pub use engine::resolve::{Decision, LaneAssignment};
pub use engine::stats::ContainerStats;
pub use engine::validate::ValidationReport;
pub use logging::{default_log_level, init_logging, logging_status};
pub use model::container::{Asset, AssetId, Container, ContainerId};
pub use model::item::{Difficulty, Item, ItemId, ItemKind, ItemMetadata, ItemProperties};
pub use model::lane::{lane, lanes, slot_to_lane, Lane, LaneId};
pub use service::migration_service::{MigrationOptions, MigrationResult, MigrationService};

/// Minimal health-check API for early integration.
pub fn ping() -> &'static str {
    "pong"
}

/// Returns the core crate version.
pub fn core_version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
