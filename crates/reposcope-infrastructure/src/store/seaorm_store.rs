//! `SeaORM`-backed [`RecordStore`] (C5), grounded on
//! `mcb-providers/src/database/seaorm/repos/entity.rs`'s unified
//! repository: one struct over a shared `DatabaseConnection`, converting
//! between domain types and row models at the boundary.

use std::sync::Arc;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ActiveValue, ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect,
};

use reposcope_domain::entities::{
    AnalysisRecord, AnalysisStatus, ParsedFile, RepositoryCoordinates,
};
use reposcope_domain::ports::{AnalysisPage, AnalysisWithArtifacts, ListQuery, RecordStore};
use reposcope_domain::value_objects::{AnalysisId, FileTreeArtifact};
use reposcope_domain::{Error, Result};

use super::entities::{analysis, file_tree, parsed_file};

fn db_err(err: sea_orm::DbErr) -> Error {
    Error::database(err.to_string())
}

fn status_as_str(status: AnalysisStatus) -> &'static str {
    match status {
        AnalysisStatus::Queued => "queued",
        AnalysisStatus::Processing => "processing",
        AnalysisStatus::Completed => "completed",
        AnalysisStatus::Failed => "failed",
        AnalysisStatus::Cancelled => "cancelled",
    }
}

fn status_from_str(value: &str) -> Result<AnalysisStatus> {
    match value {
        "queued" => Ok(AnalysisStatus::Queued),
        "processing" => Ok(AnalysisStatus::Processing),
        "completed" => Ok(AnalysisStatus::Completed),
        "failed" => Ok(AnalysisStatus::Failed),
        "cancelled" => Ok(AnalysisStatus::Cancelled),
        other => Err(Error::database(format!("unknown analysis status: {other}"))),
    }
}

fn parse_timestamp(value: &str) -> Result<DateTime<Utc>> {
    DateTime::parse_from_rfc3339(value)
        .map(|dt| dt.with_timezone(&Utc))
        .map_err(|err| Error::database(format!("invalid timestamp {value}: {err}")))
}

fn record_to_active(record: &AnalysisRecord) -> Result<analysis::ActiveModel> {
    let options_json = serde_json::to_string(&record.options)?;
    Ok(analysis::ActiveModel {
        id: ActiveValue::Set(record.id.as_str()),
        url: ActiveValue::Set(record.repository.url.clone()),
        owner: ActiveValue::Set(record.repository.owner.clone()),
        name: ActiveValue::Set(record.repository.name.clone()),
        branch: ActiveValue::Set(record.branch.clone()),
        commit_sha: ActiveValue::Set(record.commit_sha.clone()),
        status: ActiveValue::Set(status_as_str(record.status).to_owned()),
        error: ActiveValue::Set(record.error.clone()),
        options_json: ActiveValue::Set(options_json),
        created_at: ActiveValue::Set(record.created_at.to_rfc3339()),
        started_at: ActiveValue::Set(record.started_at.map(|t| t.to_rfc3339())),
        completed_at: ActiveValue::Set(record.completed_at.map(|t| t.to_rfc3339())),
    })
}

fn model_to_record(model: analysis::Model) -> Result<AnalysisRecord> {
    let id = model
        .id
        .parse::<AnalysisId>()
        .map_err(|err| Error::database(format!("invalid analysis id in row: {err}")))?;
    Ok(AnalysisRecord {
        id,
        repository: RepositoryCoordinates {
            url: model.url,
            owner: model.owner,
            name: model.name,
        },
        branch: model.branch,
        commit_sha: model.commit_sha,
        status: status_from_str(&model.status)?,
        options: serde_json::from_str(&model.options_json)?,
        error: model.error,
        created_at: parse_timestamp(&model.created_at)?,
        started_at: model.started_at.map(|s| parse_timestamp(&s)).transpose()?,
        completed_at: model
            .completed_at
            .map(|s| parse_timestamp(&s))
            .transpose()?,
    })
}

fn model_to_parsed_file(model: parsed_file::Model) -> Result<ParsedFile> {
    Ok(serde_json::from_str(&model.data_json)?)
}

/// `SeaORM`-backed persistence for analyses, file trees and parsed files.
pub struct SeaOrmRecordStore {
    db: Arc<DatabaseConnection>,
}

impl SeaOrmRecordStore {
    /// Build a store over an already-connected, already-migrated
    /// database connection.
    #[must_use]
    pub fn new(db: Arc<DatabaseConnection>) -> Self {
        Self { db }
    }

    fn db(&self) -> &DatabaseConnection {
        self.db.as_ref()
    }
}

#[async_trait]
impl RecordStore for SeaOrmRecordStore {
    async fn create(&self, record: AnalysisRecord) -> Result<()> {
        let existing = analysis::Entity::find_by_id(record.id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?;
        if existing.is_some() {
            return Err(Error::Conflict {
                message: format!("analysis {} already exists", record.id),
            });
        }
        record_to_active(&record)?
            .insert(self.db())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn find_by_id(&self, id: AnalysisId) -> Result<Option<AnalysisWithArtifacts>> {
        let Some(model) = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
        else {
            return Ok(None);
        };
        let record = model_to_record(model)?;

        let file_tree = file_tree::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .map(|row| -> Result<FileTreeArtifact> {
                Ok(FileTreeArtifact {
                    root: serde_json::from_str(&row.tree_json)?,
                    statistics: reposcope_domain::value_objects::FileTreeStatistics {
                        total_files: row.total_files as u64,
                        total_directories: row.total_directories as u64,
                        total_lines: row.total_lines as u64,
                        total_size: row.total_size,
                        language_breakdown: serde_json::from_str(&row.language_breakdown_json)?,
                    },
                })
            })
            .transpose()?;

        let parsed_models = parsed_file::Entity::find()
            .filter(parsed_file::Column::AnalysisId.eq(id.as_str()))
            .all(self.db())
            .await
            .map_err(db_err)?;
        let parsed_files = parsed_models
            .into_iter()
            .map(model_to_parsed_file)
            .collect::<Result<Vec<_>>>()?;

        Ok(Some(AnalysisWithArtifacts {
            record,
            file_tree,
            parsed_files,
        }))
    }

    async fn update_status(
        &self,
        id: AnalysisId,
        status: AnalysisStatus,
        error: Option<String>,
    ) -> Result<()> {
        let model = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        let mut record = model_to_record(model)?;
        record.transition_to(status)?;
        if error.is_some() {
            record.error = error;
        }
        record_to_active(&record)?
            .update(self.db())
            .await
            .map_err(db_err)?;
        Ok(())
    }

    async fn update_commit_sha(&self, id: AnalysisId, sha: String) -> Result<()> {
        let model = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        let mut active = analysis::ActiveModel::from(model);
        active.commit_sha = ActiveValue::Set(Some(sha));
        active.update(self.db()).await.map_err(db_err)?;
        Ok(())
    }

    async fn update_branch(&self, id: AnalysisId, branch: String) -> Result<()> {
        let model = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .ok_or_else(|| Error::not_found(format!("analysis {id} not found")))?;
        let mut active = analysis::ActiveModel::from(model);
        active.branch = ActiveValue::Set(branch);
        active.update(self.db()).await.map_err(db_err)?;
        Ok(())
    }

    async fn list(&self, query: ListQuery) -> Result<AnalysisPage> {
        let mut select = analysis::Entity::find();
        if let Some(status) = query.status {
            select = select.filter(analysis::Column::Status.eq(status_as_str(status)));
        }
        let total = select
            .clone()
            .count(self.db())
            .await
            .map_err(db_err)?;
        let models = select
            .order_by_desc(analysis::Column::CreatedAt)
            .order_by_desc(analysis::Column::Id)
            .limit(u64::from(query.limit))
            .offset(u64::from(query.offset))
            .all(self.db())
            .await
            .map_err(db_err)?;
        let records = models
            .into_iter()
            .map(model_to_record)
            .collect::<Result<Vec<_>>>()?;
        Ok(AnalysisPage { records, total })
    }

    async fn delete(&self, id: AnalysisId) -> Result<bool> {
        let existing = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?;
        if existing.is_none() {
            return Ok(false);
        }
        parsed_file::Entity::delete_many()
            .filter(parsed_file::Column::AnalysisId.eq(id.as_str()))
            .exec(self.db())
            .await
            .map_err(db_err)?;
        file_tree::Entity::delete_by_id(id.as_str())
            .exec(self.db())
            .await
            .map_err(db_err)?;
        analysis::Entity::delete_by_id(id.as_str())
            .exec(self.db())
            .await
            .map_err(db_err)?;
        Ok(true)
    }

    async fn save_file_tree(&self, id: AnalysisId, tree: FileTreeArtifact) -> Result<()> {
        let exists = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(Error::not_found(format!("analysis {id} not found")));
        }
        file_tree::Entity::delete_by_id(id.as_str())
            .exec(self.db())
            .await
            .map_err(db_err)?;
        let active = file_tree::ActiveModel {
            analysis_id: ActiveValue::Set(id.as_str()),
            tree_json: ActiveValue::Set(serde_json::to_string(&tree.root)?),
            total_files: ActiveValue::Set(tree.statistics.total_files as i64),
            total_directories: ActiveValue::Set(tree.statistics.total_directories as i64),
            total_lines: ActiveValue::Set(tree.statistics.total_lines as i64),
            total_size: ActiveValue::Set(tree.statistics.total_size),
            language_breakdown_json: ActiveValue::Set(serde_json::to_string(
                &tree.statistics.language_breakdown,
            )?),
        };
        active.insert(self.db()).await.map_err(db_err)?;
        Ok(())
    }

    async fn save_parsed_files(&self, id: AnalysisId, files: Vec<ParsedFile>) -> Result<()> {
        let exists = analysis::Entity::find_by_id(id.as_str())
            .one(self.db())
            .await
            .map_err(db_err)?
            .is_some();
        if !exists {
            return Err(Error::not_found(format!("analysis {id} not found")));
        }
        parsed_file::Entity::delete_many()
            .filter(parsed_file::Column::AnalysisId.eq(id.as_str()))
            .exec(self.db())
            .await
            .map_err(db_err)?;
        if files.is_empty() {
            return Ok(());
        }
        let mut active_models = Vec::with_capacity(files.len());
        for file in files {
            active_models.push(parsed_file::ActiveModel {
                id: ActiveValue::Set(uuid::Uuid::new_v4().to_string()),
                analysis_id: ActiveValue::Set(id.as_str()),
                file_path: ActiveValue::Set(file.path.clone()),
                language: ActiveValue::Set(file.language.clone()),
                data_json: ActiveValue::Set(serde_json::to_string(&file)?),
            });
        }
        parsed_file::Entity::insert_many(active_models)
            .exec(self.db())
            .await
            .map_err(db_err)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use reposcope_domain::value_objects::AnalysisOptions;
    use sea_orm::Database;
    use sea_orm_migration::MigratorTrait;

    async fn memory_store() -> SeaOrmRecordStore {
        let db = Database::connect("sqlite::memory:").await.unwrap();
        crate::store::migration::Migrator::up(&db, None)
            .await
            .unwrap();
        SeaOrmRecordStore::new(Arc::new(db))
    }

    fn sample_record() -> AnalysisRecord {
        AnalysisRecord::new(
            RepositoryCoordinates {
                url: "https://github.com/acme/widgets".to_owned(),
                owner: "acme".to_owned(),
                name: "widgets".to_owned(),
            },
            "main".to_owned(),
            AnalysisOptions::default(),
        )
    }

    #[tokio::test]
    async fn create_then_find_round_trips() {
        let store = memory_store().await;
        let record = sample_record();
        let id = record.id;
        store.create(record).await.unwrap();

        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.record.id, id);
        assert!(found.file_tree.is_none());
        assert!(found.parsed_files.is_empty());
    }

    #[tokio::test]
    async fn duplicate_create_is_rejected() {
        let store = memory_store().await;
        let record = sample_record();
        store.create(record.clone()).await.unwrap();
        assert!(store.create(record).await.is_err());
    }

    #[tokio::test]
    async fn update_status_sets_timestamps() {
        let store = memory_store().await;
        let record = sample_record();
        let id = record.id;
        store.create(record).await.unwrap();

        store
            .update_status(id, AnalysisStatus::Processing, None)
            .await
            .unwrap();
        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert!(found.record.started_at.is_some());

        store
            .update_status(id, AnalysisStatus::Failed, Some("boom".to_owned()))
            .await
            .unwrap();
        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.record.status, AnalysisStatus::Failed);
        assert_eq!(found.record.error.as_deref(), Some("boom"));
    }

    #[tokio::test]
    async fn update_branch_persists_resolved_branch() {
        let store = memory_store().await;
        let mut record = sample_record();
        record.branch = String::new();
        let id = record.id;
        store.create(record).await.unwrap();

        store.update_branch(id, "main".to_owned()).await.unwrap();
        let found = store.find_by_id(id).await.unwrap().unwrap();
        assert_eq!(found.record.branch, "main");
    }

    #[tokio::test]
    async fn delete_is_idempotent_on_unknown_id() {
        let store = memory_store().await;
        assert!(!store.delete(AnalysisId::new()).await.unwrap());
    }

    #[tokio::test]
    async fn list_respects_status_filter_and_pagination() {
        let store = memory_store().await;
        for _ in 0..3 {
            store.create(sample_record()).await.unwrap();
        }
        let page = store
            .list(ListQuery {
                limit: 2,
                offset: 0,
                status: Some(AnalysisStatus::Queued),
            })
            .await
            .unwrap();
        assert_eq!(page.total, 3);
        assert_eq!(page.records.len(), 2);
    }
}
