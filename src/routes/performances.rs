use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::performances::{CreatePerformanceRequest, PerformanceList, UpdatePerformanceRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Performance, PerformanceDetail},
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::Pagination,
    },
    services::performance_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_performances).post(create_performance))
        .route(
            "/{id}",
            get(get_performance)
                .put(update_performance)
                .delete(delete_performance),
        )
}

#[utoipa::path(
    get,
    path = "/api/performances",
    params(Pagination),
    responses(
        (status = 200, description = "List performances with the number of tickets still available", body = ApiResponse<PerformanceList>)
    ),
    tag = "Performances"
)]
pub async fn list_performances(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<PerformanceList>>> {
    let resp = performance_service::list_performances(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/performances/{id}",
    params(
        ("id" = i32, Path, description = "Performance ID")
    ),
    responses(
        (status = 200, description = "Performance with its play, hall and taken seats", body = ApiResponse<PerformanceDetail>),
        (status = 404, description = "Performance not found"),
    ),
    tag = "Performances"
)]
pub async fn get_performance(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<PerformanceDetail>>> {
    let resp = performance_service::get_performance(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/performances",
    request_body = CreatePerformanceRequest,
    responses(
        (status = 201, description = "Create performance", body = ApiResponse<Performance>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Play or theatre hall not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn create_performance(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreatePerformanceRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Performance>>)> {
    let resp = performance_service::create_performance(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/performances/{id}",
    params(
        ("id" = i32, Path, description = "Performance ID")
    ),
    request_body = UpdatePerformanceRequest,
    responses(
        (status = 200, description = "Updated performance", body = ApiResponse<Performance>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Performance, play or theatre hall not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn update_performance(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdatePerformanceRequest>,
) -> AppResult<Json<ApiResponse<Performance>>> {
    let resp = performance_service::update_performance(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/performances/{id}",
    params(
        ("id" = i32, Path, description = "Performance ID")
    ),
    responses(
        (status = 200, description = "Deleted performance and its tickets"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Performance not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Performances"
)]
pub async fn delete_performance(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = performance_service::delete_performance(&state, &user, id).await?;
    Ok(Json(resp))
}
