use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::theatre_halls::{CreateTheatreHallRequest, TheatreHallList, UpdateTheatreHallRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::TheatreHall,
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::Pagination,
    },
    services::theatre_hall_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_theatre_halls).post(create_theatre_hall))
        .route(
            "/{id}",
            get(get_theatre_hall)
                .put(update_theatre_hall)
                .delete(delete_theatre_hall),
        )
}

#[utoipa::path(
    get,
    path = "/api/theatre-halls",
    params(Pagination),
    responses(
        (status = 200, description = "List theatre halls", body = ApiResponse<TheatreHallList>)
    ),
    tag = "Theatre halls"
)]
pub async fn list_theatre_halls(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<TheatreHallList>>> {
    let resp = theatre_hall_service::list_theatre_halls(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/theatre-halls/{id}",
    params(
        ("id" = i32, Path, description = "Theatre hall ID")
    ),
    responses(
        (status = 200, description = "Get theatre hall", body = ApiResponse<TheatreHall>),
        (status = 404, description = "Theatre hall not found"),
    ),
    tag = "Theatre halls"
)]
pub async fn get_theatre_hall(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<TheatreHall>>> {
    let resp = theatre_hall_service::get_theatre_hall(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/theatre-halls",
    request_body = CreateTheatreHallRequest,
    responses(
        (status = 201, description = "Create theatre hall", body = ApiResponse<TheatreHall>),
        (status = 400, description = "Invalid dimensions"),
        (status = 403, description = "Staff only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn create_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateTheatreHallRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<TheatreHall>>)> {
    let resp = theatre_hall_service::create_theatre_hall(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/theatre-halls/{id}",
    params(
        ("id" = i32, Path, description = "Theatre hall ID")
    ),
    request_body = UpdateTheatreHallRequest,
    responses(
        (status = 200, description = "Updated theatre hall", body = ApiResponse<TheatreHall>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Theatre hall not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn update_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateTheatreHallRequest>,
) -> AppResult<Json<ApiResponse<TheatreHall>>> {
    let resp = theatre_hall_service::update_theatre_hall(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/theatre-halls/{id}",
    params(
        ("id" = i32, Path, description = "Theatre hall ID")
    ),
    responses(
        (status = 200, description = "Deleted theatre hall and its performances"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Theatre hall not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Theatre halls"
)]
pub async fn delete_theatre_hall(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = theatre_hall_service::delete_theatre_hall(&state, &user, id).await?;
    Ok(Json(resp))
}
