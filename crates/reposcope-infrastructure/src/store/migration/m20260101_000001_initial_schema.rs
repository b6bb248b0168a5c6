use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS analyses (
                id TEXT PRIMARY KEY,
                url TEXT NOT NULL,
                owner TEXT NOT NULL,
                name TEXT NOT NULL,
                branch TEXT NOT NULL,
                commit_sha TEXT,
                status TEXT NOT NULL,
                error TEXT,
                options_json TEXT NOT NULL,
                created_at TEXT NOT NULL,
                started_at TEXT,
                completed_at TEXT
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS file_trees (
                analysis_id TEXT PRIMARY KEY,
                tree_json TEXT NOT NULL,
                total_files INTEGER NOT NULL,
                total_directories INTEGER NOT NULL,
                total_lines INTEGER NOT NULL,
                total_size INTEGER NOT NULL,
                language_breakdown_json TEXT NOT NULL
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE TABLE IF NOT EXISTS parsed_files (
                id TEXT PRIMARY KEY,
                analysis_id TEXT NOT NULL,
                file_path TEXT NOT NULL,
                language TEXT NOT NULL,
                data_json TEXT NOT NULL
            )",
        )
        .await?;

        db.execute_unprepared(
            "CREATE UNIQUE INDEX IF NOT EXISTS idx_parsed_files_analysis_path
             ON parsed_files (analysis_id, file_path)",
        )
        .await?;

        db.execute_unprepared(
            "CREATE INDEX IF NOT EXISTS idx_analyses_created_at ON analyses (created_at)",
        )
        .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        let db = manager.get_connection();
        db.execute_unprepared("DROP TABLE IF EXISTS parsed_files").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS file_trees").await?;
        db.execute_unprepared("DROP TABLE IF EXISTS analyses").await?;
        Ok(())
    }
}
