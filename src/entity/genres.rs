use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "genres")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    #[sea_orm(unique)]
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::play_genres::Entity")]
    PlayGenres,
}

impl Related<super::play_genres::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayGenres.def()
    }
}

impl Related<super::plays::Entity> for Entity {
    fn to() -> RelationDef {
        super::play_genres::Relation::Plays.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::play_genres::Relation::Genres.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
