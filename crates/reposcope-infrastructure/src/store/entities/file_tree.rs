//! `SeaORM` entity for the `file_trees` table.
use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "file_trees")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub analysis_id: String,
    pub tree_json: String,
    pub total_files: i64,
    pub total_directories: i64,
    pub total_lines: i64,
    pub total_size: i64,
    pub language_breakdown_json: String,
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
