//! `RecordStore` adapter (C5): `SeaORM` entities, migrations, and the
//! concrete store implementation.

pub mod entities;
pub mod migration;
mod seaorm_store;

pub use seaorm_store::SeaOrmRecordStore;
