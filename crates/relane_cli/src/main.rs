//! CLI smoke entry point.
//!
//! # Responsibility
//! - Provide a minimal executable to verify `relane_core` linkage.
//! - Walk one deterministic validate/preview/migrate/rollback round for
//!   quick local sanity checks.

use relane_core::{
    Asset, Container, Item, ItemKind, MemoryBackupRepository, MigrationOptions, MigrationService,
};
use uuid::Uuid;

fn main() {
    println!("relane_core ping={}", relane_core::ping());
    println!("relane_core version={}", relane_core::core_version());

    let mut container = demo_container();
    let mut service = MigrationService::with_default_classifier(MemoryBackupRepository::new());

    let validation = service.validate(&container);
    println!("validate can_migrate={}", validation.can_migrate);
    for issue in &validation.issues {
        println!("validate issue={issue}");
    }

    let preview = service.preview(&container);
    println!(
        "preview conflicts={} placements={} warnings={}",
        preview.conflicts.len(),
        preview.placements.len(),
        preview.warnings.len()
    );

    let options = MigrationOptions {
        auto_resolve_conflicts: true,
        preserve_original: true,
    };
    let result = service.migrate(&mut container, &[], &options);
    println!(
        "migrate success={} migrated={} warnings={}",
        result.success,
        result.migrated_count,
        result.warnings.len()
    );
    for item in &container.items {
        println!(
            "item kind={} lane={}",
            item.kind,
            item.assigned_lane.map_or("-", |lane| lane.as_str())
        );
    }
    println!("container version={}", container.version);

    let stats = service.stats(&container);
    println!(
        "stats total_items={} average_confidence={:.1} conflicts={}",
        stats.total_items, stats.average_confidence, stats.conflict_count
    );

    let backups = service
        .list_backups(container.id)
        .expect("memory store listing cannot fail");
    println!("backups recorded={}", backups.len());

    if let Some(migration_id) = result.migration_id {
        match service.rollback(migration_id) {
            Ok(restored) => println!(
                "rollback version={} migrated_items={}",
                restored.version,
                restored
                    .items
                    .iter()
                    .filter(|item| item.is_migrated())
                    .count()
            ),
            Err(err) => println!("rollback failed: {err}"),
        }

        let evicted = service
            .cleanup_backups(container.id, 0)
            .expect("memory store cleanup cannot fail");
        println!("cleanup evicted={evicted}");
    }
}

/// Builds the demo project: three items crowded onto slot 0, each backed by
/// a matching asset. Fixed ids keep output reproducible run to run.
fn demo_container() -> Container {
    let mut container = Container::with_id(Uuid::from_u128(1), "relane demo walkthrough");

    let assets = [
        (2u128, ItemKind::Code, "ownership.rs"),
        (3, ItemKind::Video, "screen-capture.mp4"),
        (4, ItemKind::Audio, "voiceover.wav"),
    ];
    for (raw_id, kind, name) in assets {
        container.assets.push(Asset {
            id: Uuid::from_u128(raw_id),
            kind,
            name: name.to_string(),
            duration_ms: None,
        });
    }

    let items = [
        (12u128, 2u128, ItemKind::Code),
        (13, 3, ItemKind::Video),
        (14, 4, ItemKind::Audio),
    ];
    for (raw_id, raw_asset_id, kind) in items {
        let mut item = Item::with_id(Uuid::from_u128(raw_id), kind, 0);
        item.asset_id = Some(Uuid::from_u128(raw_asset_id));
        container.items.push(item);
    }

    container
}
