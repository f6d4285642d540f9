use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "performances")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub play_id: i32,
    pub theatre_hall_id: i32,
    pub show_time: DateTimeWithTimeZone,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::plays::Entity",
        from = "Column::PlayId",
        to = "super::plays::Column::Id",
        on_delete = "Cascade"
    )]
    Plays,
    #[sea_orm(
        belongs_to = "super::theatre_halls::Entity",
        from = "Column::TheatreHallId",
        to = "super::theatre_halls::Column::Id",
        on_delete = "Cascade"
    )]
    TheatreHalls,
    #[sea_orm(has_many = "super::tickets::Entity")]
    Tickets,
}

impl Related<super::plays::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Plays.def()
    }
}

impl Related<super::theatre_halls::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::TheatreHalls.def()
    }
}

impl Related<super::tickets::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Tickets.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
