use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "actors")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
}

impl Model {
    pub fn full_name(&self) -> String {
        format!("{} {}", self.first_name, self.last_name)
    }
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(has_many = "super::play_actors::Entity")]
    PlayActors,
}

impl Related<super::play_actors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::PlayActors.def()
    }
}

impl Related<super::plays::Entity> for Entity {
    fn to() -> RelationDef {
        super::play_actors::Relation::Plays.def()
    }

    fn via() -> Option<RelationDef> {
        Some(super::play_actors::Relation::Actors.def().rev())
    }
}

impl ActiveModelBehavior for ActiveModel {}
