//! `SeaORM` entity for the `parsed_files` table. Uniqueness of
//! `(analysis_id, file_path)` is enforced by a migration index, not by
//! `SeaORM` column attributes (which only support single-column unique).
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "parsed_files")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: String,
    pub analysis_id: String,
    pub file_path: String,
    pub language: String,
    pub data_json: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::analysis::Entity",
        from = "Column::AnalysisId",
        to = "super::analysis::Column::Id"
    )]
    Analysis,
}

impl Related<super::analysis::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Analysis.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
