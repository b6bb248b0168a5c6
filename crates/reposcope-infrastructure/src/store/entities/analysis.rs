//! `SeaORM` entity for the `analyses` table.
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "analyses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub url: String,
    pub owner: String,
    pub name: String,
    pub branch: String,
    pub commit_sha: Option<String>,
    pub status: String,
    pub error: Option<String>,
    pub options_json: String,
    pub created_at: String,
    pub started_at: Option<String>,
    pub completed_at: Option<String>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_one = "super::file_tree::Entity")]
    FileTree,
    #[sea_orm(has_many = "super::parsed_file::Entity")]
    ParsedFiles,
}

impl Related<super::file_tree::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::FileTree.def()
    }
}

impl Related<super::parsed_file::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ParsedFiles.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
