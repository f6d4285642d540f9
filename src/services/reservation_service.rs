use std::collections::{HashMap, HashSet};

use chrono::Utc;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::reservations::{CreateReservationRequest, ReservationList, TicketRequest},
    entity::{
        performances::{Column as PerformanceCol, Entity as Performances},
        reservations::{
            ActiveModel as ReservationActive, Column as ReservationCol, Entity as Reservations,
            Model as ReservationModel,
        },
        theatre_halls::{Entity as TheatreHalls, Model as HallModel},
        tickets::{
            ActiveModel as TicketActive, Column as TicketCol, Entity as Tickets,
            Model as TicketModel,
        },
        users::Entity as Users,
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Reservation, Ticket},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    validation::{FieldError, validate_seat},
};

pub async fn list_reservations(
    state: &AppState,
    user: &AuthUser,
    pagination: Pagination,
) -> AppResult<ApiResponse<ReservationList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Reservations::find()
        .filter(ReservationCol::UserId.eq(user.user_id))
        .order_by_desc(ReservationCol::CreatedAt)
        .order_by_desc(ReservationCol::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let reservations = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = reservations.iter().map(|r| r.id).collect();
    let mut tickets_by_reservation: HashMap<i32, Vec<Ticket>> = HashMap::new();
    if !ids.is_empty() {
        let tickets = Tickets::find()
            .filter(TicketCol::ReservationId.is_in(ids))
            .order_by_asc(TicketCol::Id)
            .all(&state.orm)
            .await?;
        for ticket in tickets {
            tickets_by_reservation
                .entry(ticket.reservation_id)
                .or_default()
                .push(ticket_from_entity(ticket));
        }
    }

    let items = reservations
        .into_iter()
        .map(|reservation| {
            let tickets = tickets_by_reservation
                .remove(&reservation.id)
                .unwrap_or_default();
            reservation_from_entity(reservation, tickets)
        })
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Reservations",
        ReservationList { items },
        Some(meta),
    ))
}

/// Another user's reservation is reported as not found.
pub async fn get_reservation(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<Reservation>> {
    let reservation = Reservations::find()
        .filter(
            Condition::all()
                .add(ReservationCol::UserId.eq(user.user_id))
                .add(ReservationCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let tickets = Tickets::find()
        .filter(TicketCol::ReservationId.eq(reservation.id))
        .order_by_asc(TicketCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(ticket_from_entity)
        .collect();

    Ok(ApiResponse::success(
        "Reservation",
        reservation_from_entity(reservation, tickets),
        Some(Meta::empty()),
    ))
}

/// Creates a reservation and all of its tickets in one transaction.
///
/// Either every ticket is stored or nothing is: an empty ticket list, a seat
/// requested twice, an unknown performance, an out-of-range seat or a seat
/// already sold (including one taken by a concurrent request, caught by the
/// unique constraint at insert) rolls the whole reservation back.
pub async fn create_reservation(
    state: &AppState,
    user: &AuthUser,
    payload: CreateReservationRequest,
) -> AppResult<ApiResponse<Reservation>> {
    let requested = payload.tickets;
    if requested.is_empty() {
        return Err(FieldError::new("tickets", "tickets must contain at least one ticket").into());
    }
    ensure_distinct_seats(&requested)?;

    // A well-signed token can still name a user that was removed.
    if Users::find_by_id(user.user_id).one(&state.orm).await?.is_none() {
        return Err(AppError::Unauthorized("unknown principal".into()));
    }

    let txn = state.orm.begin().await?;

    let performance_ids: Vec<i32> = requested
        .iter()
        .map(|t| t.performance)
        .collect::<HashSet<_>>()
        .into_iter()
        .collect();
    let halls: HashMap<i32, HallModel> = Performances::find()
        .find_also_related(TheatreHalls)
        .filter(PerformanceCol::Id.is_in(performance_ids))
        .all(&txn)
        .await?
        .into_iter()
        .filter_map(|(performance, hall)| hall.map(|hall| (performance.id, hall)))
        .collect();

    for ticket in &requested {
        let hall = halls.get(&ticket.performance).ok_or(AppError::NotFound)?;
        validate_seat(ticket.seat, ticket.row, hall.seats_in_row, hall.rows)?;
    }

    let reservation = ReservationActive {
        id: NotSet,
        user_id: Set(user.user_id),
        created_at: NotSet,
    }
    .insert(&txn)
    .await?;

    let mut tickets = Vec::with_capacity(requested.len());
    for ticket in &requested {
        let stored = TicketActive {
            id: NotSet,
            row: Set(ticket.row),
            seat: Set(ticket.seat),
            performance_id: Set(ticket.performance),
            reservation_id: Set(reservation.id),
        }
        .insert(&txn)
        .await?;
        tickets.push(ticket_from_entity(stored));
    }

    txn.commit().await?;

    tracing::info!(
        reservation_id = reservation.id,
        tickets = tickets.len(),
        "reservation created"
    );
    audit::record(
        &state.pool,
        user.user_id,
        "reservation_create",
        "reservations",
        serde_json::json!({ "reservation_id": reservation.id, "tickets": tickets.len() }),
    )
    .await;

    Ok(ApiResponse::success(
        "Reservation created",
        reservation_from_entity(reservation, tickets),
        Some(Meta::empty()),
    ))
}

/// Cancels one of the user's reservations; its tickets go with it.
pub async fn delete_reservation(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    let result = Reservations::delete_many()
        .filter(
            Condition::all()
                .add(ReservationCol::UserId.eq(user.user_id))
                .add(ReservationCol::Id.eq(id)),
        )
        .exec(&state.orm)
        .await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "reservation_delete",
        "reservations",
        serde_json::json!({ "reservation_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

/// Rejects a request that asks for the same seat of the same performance
/// more than once.
pub fn ensure_distinct_seats(tickets: &[TicketRequest]) -> AppResult<()> {
    let mut seen = HashSet::with_capacity(tickets.len());
    for ticket in tickets {
        if !seen.insert((ticket.performance, ticket.row, ticket.seat)) {
            return Err(AppError::Conflict(format!(
                "row {} seat {} of performance {} is requested more than once",
                ticket.row, ticket.seat, ticket.performance
            )));
        }
    }
    Ok(())
}

fn ticket_from_entity(model: TicketModel) -> Ticket {
    Ticket {
        id: model.id,
        row: model.row,
        seat: model.seat,
        performance: model.performance_id,
    }
}

fn reservation_from_entity(model: ReservationModel, tickets: Vec<Ticket>) -> Reservation {
    Reservation {
        id: model.id,
        created_at: model.created_at.with_timezone(&Utc),
        tickets,
    }
}
