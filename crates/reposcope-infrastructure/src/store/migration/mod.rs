//! Deterministic schema migrations for the reposcope database.
use sea_orm_migration::prelude::*;

mod m20260101_000001_initial_schema;

/// Registers all migrations in application order.
pub struct Migrator;

#[async_trait::async_trait]
impl MigratorTrait for Migrator {
    fn migrations() -> Vec<Box<dyn MigrationTrait>> {
        vec![Box::new(m20260101_000001_initial_schema::Migration)]
    }
}
