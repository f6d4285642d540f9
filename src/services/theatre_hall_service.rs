use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryOrder,
    QuerySelect, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    entity::{
        performances::Column as PerformanceCol,
        theatre_halls::{ActiveModel, Column, Entity as TheatreHalls, Model as HallModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::TheatreHall,
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    services::performance_service::sold_seat_extent,
    state::AppState,
    validation::{FieldError, require_positive, require_text},
};

const NAME_MAX_LEN: usize = 64;

pub async fn list_theatre_halls(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<TheatreHallList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = TheatreHalls::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(hall_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success(
        "Theatre halls",
        TheatreHallList { items },
        Some(meta),
    ))
}

pub async fn get_theatre_hall(state: &AppState, id: i32) -> AppResult<ApiResponse<TheatreHall>> {
    let hall = TheatreHalls::find_by_id(id)
        .one(&state.orm)
        .await?
        .map(hall_from_entity)
        .ok_or(AppError::NotFound)?;
    Ok(ApiResponse::success("Theatre hall", hall, None))
}

pub async fn create_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    payload: CreateTheatreHallRequest,
) -> AppResult<ApiResponse<TheatreHall>> {
    ensure_staff(user)?;
    require_text("name", &payload.name, NAME_MAX_LEN)?;
    require_positive("rows", payload.rows)?;
    require_positive("seats_in_row", payload.seats_in_row)?;

    let hall = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
        rows: Set(payload.rows),
        seats_in_row: Set(payload.seats_in_row),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "theatre_hall_create",
        "theatre_halls",
        serde_json::json!({ "theatre_hall_id": hall.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Theatre hall created",
        hall_from_entity(hall),
        Some(Meta::empty()),
    ))
}

/// A hall can only shrink down to the furthest row and seat already sold
/// for any of its performances.
pub async fn update_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateTheatreHallRequest,
) -> AppResult<ApiResponse<TheatreHall>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;
    // Ticket writes take a shared lock on the hall, so no seat can be sold
    // between the check below and the commit.
    let existing = TheatreHalls::find_by_id(id)
        .lock_exclusive()
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        require_text("name", &name, NAME_MAX_LEN)?;
        active.name = Set(name);
    }
    if let Some(rows) = payload.rows {
        require_positive("rows", rows)?;
        active.rows = Set(rows);
    }
    if let Some(seats_in_row) = payload.seats_in_row {
        require_positive("seats_in_row", seats_in_row)?;
        active.seats_in_row = Set(seats_in_row);
    }

    let rows = payload.rows.unwrap_or(existing.rows);
    let seats_in_row = payload.seats_in_row.unwrap_or(existing.seats_in_row);
    if rows < existing.rows || seats_in_row < existing.seats_in_row {
        let (max_row, max_seat) = sold_seat_extent(
            &txn,
            Condition::all().add(PerformanceCol::TheatreHallId.eq(id)),
        )
        .await?;
        if max_row > rows {
            return Err(FieldError::new(
                "rows",
                format!("rows must be at least {max_row} to keep sold tickets, not {rows}"),
            )
            .into());
        }
        if max_seat > seats_in_row {
            return Err(FieldError::new(
                "seats_in_row",
                format!(
                    "seats_in_row must be at least {max_seat} to keep sold tickets, not {seats_in_row}"
                ),
            )
            .into());
        }
    }

    let hall = if active.is_changed() {
        active.update(&txn).await?
    } else {
        existing
    };
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "theatre_hall_update",
        "theatre_halls",
        serde_json::json!({ "theatre_hall_id": hall.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        hall_from_entity(hall),
        Some(Meta::empty()),
    ))
}

pub async fn delete_theatre_hall(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = TheatreHalls::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "theatre_hall_delete",
        "theatre_halls",
        serde_json::json!({ "theatre_hall_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

pub(crate) fn hall_from_entity(model: HallModel) -> TheatreHall {
    TheatreHall {
        capacity: model.capacity(),
        id: model.id,
        name: model.name,
        rows: model.rows,
        seats_in_row: model.seats_in_row,
    }
}
