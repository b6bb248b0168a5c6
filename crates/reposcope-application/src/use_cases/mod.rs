//! Use cases: one module per client-facing operation, each a thin
//! orchestration layer over [`crate::services::Services`].

pub mod analyze_repository;
pub mod query_analysis;
