use sea_orm::{ActiveValue, QuerySelect};
use sea_orm::entity::prelude::*;

use crate::validation::{FieldError, validate_seat};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "tickets")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub performance_id: i32,
    pub reservation_id: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::performances::Entity",
        from = "Column::PerformanceId",
        to = "super::performances::Column::Id",
        on_delete = "Cascade"
    )]
    Performances,
    #[sea_orm(
        belongs_to = "super::reservations::Entity",
        from = "Column::ReservationId",
        to = "super::reservations::Column::Id",
        on_delete = "Cascade"
    )]
    Reservations,
}

impl Related<super::performances::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Performances.def()
    }
}

impl Related<super::reservations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Reservations.def()
    }
}

fn current<V>(value: &ActiveValue<V>) -> Option<V>
where
    V: Into<sea_orm::Value> + Clone,
{
    match value {
        ActiveValue::Set(v) | ActiveValue::Unchanged(v) => Some(v.clone()),
        ActiveValue::NotSet => None,
    }
}

/// Every ticket write re-checks its seat against the hall of its performance.
#[async_trait::async_trait]
impl ActiveModelBehavior for ActiveModel {
    async fn before_save<C>(self, db: &C, _insert: bool) -> Result<Self, DbErr>
    where
        C: ConnectionTrait,
    {
        let (Some(row), Some(seat), Some(performance_id)) = (
            current(&self.row),
            current(&self.seat),
            current(&self.performance_id),
        ) else {
            return Ok(self);
        };

        // FOR SHARE holds the hall and the performance steady until the
        // ticket commits, so neither can be resized or moved under it.
        let hall = super::theatre_halls::Entity::find()
            .inner_join(super::performances::Entity)
            .filter(super::performances::Column::Id.eq(performance_id))
            .lock_shared()
            .one(db)
            .await?
            .ok_or_else(|| {
                FieldError::new(
                    "performance",
                    format!("performance {performance_id} does not exist"),
                )
                .into_db_err()
            })?;

        validate_seat(seat, row, hall.seats_in_row, hall.rows).map_err(FieldError::into_db_err)?;
        Ok(self)
    }
}
