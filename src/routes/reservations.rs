use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::reservations::{CreateReservationRequest, ReservationList},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Reservation,
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::Pagination,
    },
    services::reservation_service,
    state::AppState,
};

/// Reservations are never updated in place.
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_reservations).post(create_reservation))
        .route("/{id}", get(get_reservation).delete(delete_reservation))
}

#[utoipa::path(
    get,
    path = "/api/reservations",
    params(Pagination),
    responses(
        (status = 200, description = "The caller's reservations", body = ApiResponse<ReservationList>),
        (status = 401, description = "Unauthorized"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn list_reservations(
    State(state): State<AppState>,
    user: AuthUser,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<ReservationList>>> {
    let resp = reservation_service::list_reservations(&state, &user, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/reservations/{id}",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation with its tickets", body = ApiResponse<Reservation>),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reservation not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn get_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<Reservation>>> {
    let resp = reservation_service::get_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/reservations",
    request_body = CreateReservationRequest,
    responses(
        (status = 201, description = "Reservation and tickets created", body = ApiResponse<Reservation>),
        (status = 400, description = "Seat or row out of range, or no tickets"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Performance not found"),
        (status = 409, description = "Seat already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn create_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateReservationRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Reservation>>)> {
    let resp = reservation_service::create_reservation(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    delete,
    path = "/api/reservations/{id}",
    params(
        ("id" = i32, Path, description = "Reservation ID")
    ),
    responses(
        (status = 200, description = "Reservation and its tickets deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 404, description = "Reservation not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Reservations"
)]
pub async fn delete_reservation(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = reservation_service::delete_reservation(&state, &user, id).await?;
    Ok(Json(resp))
}
