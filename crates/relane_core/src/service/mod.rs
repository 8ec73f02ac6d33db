//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate engine and backup-store calls into use-case level APIs.
//! - Keep CLI/host layers decoupled from engine and storage details.

pub mod migration_service;
