//! `cases` table entity.

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel)]
#[sea_orm(table_name = "cases")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub case_type: String,
    pub registration_year: i32,
    pub registration_num: i32,
    pub title: String,
    pub court_name: String,
    pub is_completed: bool,
    pub user_id: Uuid,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::user::Entity",
        from = "Column::UserId",
        to = "super::user::Column::Id"
    )]
    User,
    #[sea_orm(has_many = "super::petitioner::Entity")]
    Petitioner,
    #[sea_orm(has_many = "super::respondent::Entity")]
    Respondent,
    #[sea_orm(has_many = "super::hearing::Entity")]
    Hearing,
    #[sea_orm(has_many = "super::note::Entity")]
    Note,
    #[sea_orm(has_many = "super::upload::Entity")]
    Upload,
}

impl Related<super::user::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::User.def()
    }
}

impl Related<super::petitioner::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Petitioner.def()
    }
}

impl Related<super::respondent::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Respondent.def()
    }
}

impl Related<super::hearing::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Hearing.def()
    }
}

impl Related<super::note::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Note.def()
    }
}

impl Related<super::upload::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Upload.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl From<Model> for crate::domain::Case {
    fn from(model: Model) -> Self {
        Self {
            id: model.id,
            case_type: model.case_type,
            registration_year: model.registration_year,
            registration_num: model.registration_num,
            title: model.title,
            court_name: model.court_name,
            is_completed: model.is_completed,
            user_id: model.user_id,
            created_at: model.created_at,
            updated_at: model.updated_at,
        }
    }
}
