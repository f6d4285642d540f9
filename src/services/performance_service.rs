use std::collections::HashMap;

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, ConnectionTrait, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::sea_query::Expr;

use crate::{
    audit,
    dto::performances::{CreatePerformanceRequest, PerformanceList, UpdatePerformanceRequest},
    entity::{
        performances::{ActiveModel, Column, Entity as Performances, Model as PerformanceModel},
        plays::{Column as PlayCol, Entity as Plays},
        theatre_halls::{Column as HallCol, Entity as TheatreHalls},
        tickets::{Column as TicketCol, Entity as Tickets},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Performance, PerformanceDetail, PerformanceListItem, TakenSeat},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::{play_service::PlayRelations, theatre_hall_service::hall_from_entity},
    state::AppState,
    validation::FieldError,
};

/// Seats still on sale for a performance: hall capacity minus tickets sold.
pub fn tickets_available(rows: i32, seats_in_row: i32, sold: i64) -> i64 {
    i64::from(rows) * i64::from(seats_in_row) - sold
}

/// Furthest row and furthest seat among the tickets matching `filter`
/// (tickets joined with their performance), `(0, 0)` when nothing is sold.
pub(crate) async fn sold_seat_extent<C>(db: &C, filter: Condition) -> AppResult<(i32, i32)>
where
    C: ConnectionTrait,
{
    let extent: Option<(Option<i32>, Option<i32>)> = Tickets::find()
        .select_only()
        .column_as(Expr::col((Tickets, TicketCol::Row)).max(), "max_row")
        .column_as(Expr::col((Tickets, TicketCol::Seat)).max(), "max_seat")
        .inner_join(Performances)
        .filter(filter)
        .into_tuple()
        .one(db)
        .await?;
    let (max_row, max_seat) = extent.unwrap_or((None, None));
    Ok((max_row.unwrap_or(0), max_seat.unwrap_or(0)))
}

/// Ticket counts for the given performances, from one grouped `COUNT`.
/// Performances without tickets are absent from the map.
async fn sold_counts(state: &AppState, performance_ids: &[i32]) -> AppResult<HashMap<i32, i64>> {
    if performance_ids.is_empty() {
        return Ok(HashMap::new());
    }
    let rows: Vec<(i32, i64)> = Tickets::find()
        .select_only()
        .column(TicketCol::PerformanceId)
        .column_as(Expr::col(TicketCol::Id).count(), "sold")
        .filter(TicketCol::PerformanceId.is_in(performance_ids.to_vec()))
        .group_by(TicketCol::PerformanceId)
        .into_tuple()
        .all(&state.orm)
        .await?;
    Ok(rows.into_iter().collect())
}

pub async fn list_performances(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<PerformanceList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Performances::find()
        .order_by_asc(Column::ShowTime)
        .order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let performances = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = performances.iter().map(|p| p.id).collect();
    let play_ids: Vec<i32> = performances.iter().map(|p| p.play_id).collect();
    let hall_ids: Vec<i32> = performances.iter().map(|p| p.theatre_hall_id).collect();

    let plays: HashMap<i32, String> = Plays::find()
        .filter(PlayCol::Id.is_in(play_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|play| (play.id, play.title))
        .collect();
    let halls: HashMap<i32, _> = TheatreHalls::find()
        .filter(HallCol::Id.is_in(hall_ids))
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|hall| (hall.id, hall))
        .collect();
    let sold = sold_counts(state, &ids).await?;

    let items = performances
        .into_iter()
        .map(|performance| {
            let play_title = plays.get(&performance.play_id).cloned().ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "performance {} references missing play",
                    performance.id
                ))
            })?;
            let hall = halls.get(&performance.theatre_hall_id).ok_or_else(|| {
                AppError::Internal(anyhow::anyhow!(
                    "performance {} references missing theatre hall",
                    performance.id
                ))
            })?;
            let sold = sold.get(&performance.id).copied().unwrap_or(0);
            Ok::<_, AppError>(PerformanceListItem {
                id: performance.id,
                play: performance.play_id,
                play_title,
                theatre_hall: hall.id,
                theatre_hall_name: hall.name.clone(),
                theatre_hall_capacity: hall.capacity(),
                show_time: performance.show_time.with_timezone(&Utc),
                tickets_available: tickets_available(hall.rows, hall.seats_in_row, sold),
            })
        })
        .collect::<AppResult<Vec<_>>>()?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Performances",
        PerformanceList { items },
        Some(meta),
    ))
}

pub async fn get_performance(
    state: &AppState,
    id: i32,
) -> AppResult<ApiResponse<PerformanceDetail>> {
    let performance = Performances::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let play = Plays::find_by_id(performance.play_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let hall = TheatreHalls::find_by_id(performance.theatre_hall_id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let relations = PlayRelations::load(&state.orm, &[play.id]).await?;

    let taken_seats = Tickets::find()
        .filter(TicketCol::PerformanceId.eq(performance.id))
        .order_by_asc(TicketCol::Row)
        .order_by_asc(TicketCol::Seat)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|ticket| TakenSeat {
            row: ticket.row,
            seat: ticket.seat,
        })
        .collect();

    Ok(ApiResponse::success(
        "Performance",
        PerformanceDetail {
            id: performance.id,
            play: relations.summary(play),
            theatre_hall: hall_from_entity(hall),
            show_time: performance.show_time.with_timezone(&Utc),
            taken_seats,
        },
        None,
    ))
}

pub async fn create_performance(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePerformanceRequest,
) -> AppResult<ApiResponse<Performance>> {
    ensure_staff(user)?;
    ensure_play_exists(state, payload.play).await?;
    ensure_hall_exists(state, payload.theatre_hall).await?;

    let performance = ActiveModel {
        id: NotSet,
        play_id: Set(payload.play),
        theatre_hall_id: Set(payload.theatre_hall),
        show_time: Set(payload.show_time.into()),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "performance_create",
        "performances",
        serde_json::json!({ "performance_id": performance.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Performance created",
        performance_from_entity(performance),
        Some(Meta::empty()),
    ))
}

/// Moving a performance to another hall is refused when a ticket already
/// sold for it would fall outside the new hall.
pub async fn update_performance(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdatePerformanceRequest,
) -> AppResult<ApiResponse<Performance>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;
    // Ticket writes take a shared lock on the performance row.
    let existing = Performances::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(play_id) = payload.play {
        ensure_play_exists(state, play_id).await?;
        active.play_id = Set(play_id);
    }
    if let Some(hall_id) = payload.theatre_hall {
        if hall_id != existing.theatre_hall_id {
            let hall = TheatreHalls::find_by_id(hall_id)
                .one(&txn)
                .await?
                .ok_or(AppError::NotFound)?;
            let (max_row, max_seat) = sold_seat_extent(
                &txn,
                Condition::all().add(TicketCol::PerformanceId.eq(id)),
            )
            .await?;
            if max_row > hall.rows || max_seat > hall.seats_in_row {
                return Err(FieldError::new(
                    "theatre_hall",
                    format!(
                        "theatre hall {hall_id} has {} rows of {} seats, too small for tickets sold up to row {max_row}, seat {max_seat}",
                        hall.rows, hall.seats_in_row
                    ),
                )
                .into());
            }
        }
        active.theatre_hall_id = Set(hall_id);
    }
    if let Some(show_time) = payload.show_time {
        active.show_time = Set(show_time.into());
    }
    let performance = if active.is_changed() {
        active.update(&txn).await?
    } else {
        existing
    };
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "performance_update",
        "performances",
        serde_json::json!({ "performance_id": performance.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        performance_from_entity(performance),
        Some(Meta::empty()),
    ))
}

/// Deleting a performance also deletes the tickets sold for it.
pub async fn delete_performance(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = Performances::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "performance_delete",
        "performances",
        serde_json::json!({ "performance_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

async fn ensure_play_exists(state: &AppState, id: i32) -> AppResult<()> {
    Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}

async fn ensure_hall_exists(state: &AppState, id: i32) -> AppResult<()> {
    TheatreHalls::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(|_| ())
        .ok_or(AppError::NotFound)
}

fn performance_from_entity(model: PerformanceModel) -> Performance {
    Performance {
        id: model.id,
        play: model.play_id,
        theatre_hall: model.theatre_hall_id,
        show_time: model.show_time.with_timezone(&Utc),
    }
}
