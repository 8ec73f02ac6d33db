//! Lane migration use-case service.
//!
//! # Responsibility
//! - Compose detection, resolution, execution, and backups into the
//!   caller-facing migrate/preview/rollback flows.
//! - Convert execution and backup failures into result values; `migrate`
//!   itself never returns an error.
//!
//! # Invariants
//! - A conflicted container is never mutated unless the caller supplied
//!   decisions or opted into automatic resolution.
//! - With `preserve_original` set, nothing is mutated before the backup is
//!   safely recorded.
//! - `rollback` is the one service call that surfaces a hard error.

use crate::backup::{BackupEntry, BackupId, BackupRepository, BackupResult};
use crate::classify::classifier::{ClassifyContext, KindBasedClassifier, PlacementClassifier};
use crate::engine::conflict::{detect_conflicts, Conflict};
use crate::engine::execute::apply_assignments;
use crate::engine::preview::{preview_container, PreviewReport};
use crate::engine::resolve::{resolve_assignments, Decision};
use crate::engine::stats::{container_stats, ContainerStats};
use crate::engine::validate::{validate_container, ValidationReport};
use crate::model::container::{Container, ContainerId};
use log::{error, info};
use std::time::Instant;

/// Caller-selected migration behavior.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct MigrationOptions {
    /// Proceed through conflicts using classifier suggestions.
    pub auto_resolve_conflicts: bool,
    /// Record a backup before mutating anything.
    pub preserve_original: bool,
}

impl Default for MigrationOptions {
    fn default() -> Self {
        Self {
            auto_resolve_conflicts: false,
            preserve_original: true,
        }
    }
}

/// Result envelope for one migration attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MigrationResult {
    /// Whether the container was migrated.
    pub success: bool,
    /// Number of items stamped onto a lane.
    pub migrated_count: usize,
    /// Conflicts still pending after this attempt; empty on success.
    pub conflicts: Vec<Conflict>,
    /// Non-fatal caveats, or the failure message when `success` is false.
    pub warnings: Vec<String>,
    /// Backup recorded for this attempt, when `preserve_original` was set.
    /// Present even when a later step failed, so the caller can roll back.
    pub migration_id: Option<BackupId>,
}

/// Migration facade over the engine, a classifier, and a backup store.
pub struct MigrationService<B: BackupRepository, C: PlacementClassifier> {
    backups: B,
    classifier: C,
}

impl<B: BackupRepository> MigrationService<B, KindBasedClassifier> {
    /// Creates a service using the built-in kind-based classifier.
    pub fn with_default_classifier(backups: B) -> Self {
        Self::new(backups, KindBasedClassifier::new())
    }
}

impl<B: BackupRepository, C: PlacementClassifier> MigrationService<B, C> {
    /// Creates a service using the provided store and classifier.
    pub fn new(backups: B, classifier: C) -> Self {
        Self { backups, classifier }
    }

    /// Migrates the container's items onto semantic lanes.
    ///
    /// # Contract
    /// - Unresolved conflicts stop the attempt before any mutation unless
    ///   `decisions` covers them or `auto_resolve_conflicts` is set.
    /// - With `preserve_original`, a backup is recorded first; a backup
    ///   failure aborts the attempt.
    /// - Never panics and never returns an error; failures surface as
    ///   `success: false` with a `Migration failed: ...` warning.
    pub fn migrate(
        &mut self,
        container: &mut Container,
        decisions: &[Decision],
        options: &MigrationOptions,
    ) -> MigrationResult {
        let started_at = Instant::now();
        info!(
            "event=migrate module=service status=start container={} items={} auto_resolve={} preserve_original={}",
            container.id,
            container.items.len(),
            options.auto_resolve_conflicts,
            options.preserve_original
        );

        let context = ClassifyContext::for_container(container);
        let conflicts = detect_conflicts(
            &container.items,
            &container.assets,
            &self.classifier,
            &context,
        );

        if !conflicts.is_empty() && !options.auto_resolve_conflicts && decisions.is_empty() {
            info!(
                "event=migrate module=service status=conflicts_pending container={} conflicts={} duration_ms={}",
                container.id,
                conflicts.len(),
                started_at.elapsed().as_millis()
            );
            return MigrationResult {
                success: false,
                migrated_count: 0,
                conflicts,
                warnings: Vec::new(),
                migration_id: None,
            };
        }

        let migration_id = if options.preserve_original {
            match self.backups.record_backup(container) {
                Ok(migration_id) => Some(migration_id),
                Err(err) => {
                    error!(
                        "event=migrate module=service status=error container={} duration_ms={} error_code=backup_failed error={}",
                        container.id,
                        started_at.elapsed().as_millis(),
                        err
                    );
                    return MigrationResult {
                        success: false,
                        migrated_count: 0,
                        conflicts,
                        warnings: vec![format!("Migration failed: {err}")],
                        migration_id: None,
                    };
                }
            }
        } else {
            None
        };

        let assignments = resolve_assignments(
            &container.items,
            &container.assets,
            decisions,
            &self.classifier,
            &context,
        );

        match apply_assignments(container, &assignments) {
            Ok(outcome) => {
                info!(
                    "event=migrate module=service status=ok container={} migrated={} warnings={} duration_ms={}",
                    container.id,
                    outcome.migrated_count,
                    outcome.warnings.len(),
                    started_at.elapsed().as_millis()
                );
                MigrationResult {
                    success: true,
                    migrated_count: outcome.migrated_count,
                    conflicts: Vec::new(),
                    warnings: outcome.warnings,
                    migration_id,
                }
            }
            Err(err) => {
                error!(
                    "event=migrate module=service status=error container={} duration_ms={} error_code=execute_failed error={}",
                    container.id,
                    started_at.elapsed().as_millis(),
                    err
                );
                MigrationResult {
                    success: false,
                    migrated_count: 0,
                    conflicts,
                    warnings: vec![format!("Migration failed: {err}")],
                    migration_id,
                }
            }
        }
    }

    /// Computes the dry-run report without mutating anything.
    pub fn preview(&self, container: &Container) -> PreviewReport {
        preview_container(container, &self.classifier)
    }

    /// Runs the pre-flight eligibility checks.
    pub fn validate(&self, container: &Container) -> ValidationReport {
        validate_container(container)
    }

    /// Computes distribution and confidence statistics.
    pub fn stats(&self, container: &Container) -> ContainerStats {
        container_stats(container, &self.classifier)
    }

    /// Restores the snapshot recorded under `migration_id`.
    ///
    /// # Contract
    /// - Returns a fresh deep copy; the stored snapshot stays intact.
    /// - An unknown id is `BackupError::BackupNotFound`, not a soft failure.
    pub fn rollback(&self, migration_id: BackupId) -> BackupResult<Container> {
        let started_at = Instant::now();
        info!("event=rollback module=service status=start migration_id={migration_id}");

        match self.backups.load_snapshot(migration_id) {
            Ok(container) => {
                info!(
                    "event=rollback module=service status=ok migration_id={} container={} duration_ms={}",
                    migration_id,
                    container.id,
                    started_at.elapsed().as_millis()
                );
                Ok(container)
            }
            Err(err) => {
                error!(
                    "event=rollback module=service status=error migration_id={} duration_ms={} error_code=rollback_failed error={}",
                    migration_id,
                    started_at.elapsed().as_millis(),
                    err
                );
                Err(err)
            }
        }
    }

    /// Lists stored backups for one container, newest first.
    pub fn list_backups(&self, container_id: ContainerId) -> BackupResult<Vec<BackupEntry>> {
        self.backups.list_backups(container_id)
    }

    /// Manually trims one container's backups to `keep` entries.
    pub fn cleanup_backups(
        &mut self,
        container_id: ContainerId,
        keep: usize,
    ) -> BackupResult<usize> {
        self.backups.cleanup(container_id, keep)
    }

    /// Clears every stored backup. Test isolation/reset only.
    pub fn clear_backups(&mut self) -> BackupResult<()> {
        self.backups.clear_all()
    }
}
