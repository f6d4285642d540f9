use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Genre, GenreDetail},
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::Pagination,
    },
    services::genre_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_genres).post(create_genre))
        .route(
            "/{id}",
            get(get_genre).put(update_genre).delete(delete_genre),
        )
}

#[utoipa::path(
    get,
    path = "/api/genres",
    params(Pagination),
    responses(
        (status = 200, description = "List genres", body = ApiResponse<GenreList>)
    ),
    tag = "Genres"
)]
pub async fn list_genres(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<GenreList>>> {
    let resp = genre_service::list_genres(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/genres/{id}",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Genre with the titles of its plays", body = ApiResponse<GenreDetail>),
        (status = 404, description = "Genre not found"),
    ),
    tag = "Genres"
)]
pub async fn get_genre(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<GenreDetail>>> {
    let resp = genre_service::get_genre(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/genres",
    request_body = CreateGenreRequest,
    responses(
        (status = 201, description = "Create genre", body = ApiResponse<Genre>),
        (status = 403, description = "Staff only"),
        (status = 409, description = "Genre name already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn create_genre(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateGenreRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Genre>>)> {
    let resp = genre_service::create_genre(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/genres/{id}",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    request_body = UpdateGenreRequest,
    responses(
        (status = 200, description = "Updated genre", body = ApiResponse<Genre>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Genre not found"),
        (status = 409, description = "Genre name already taken"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn update_genre(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateGenreRequest>,
) -> AppResult<Json<ApiResponse<Genre>>> {
    let resp = genre_service::update_genre(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/genres/{id}",
    params(
        ("id" = i32, Path, description = "Genre ID")
    ),
    responses(
        (status = 200, description = "Deleted genre"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Genre not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Genres"
)]
pub async fn delete_genre(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = genre_service::delete_genre(&state, &user, id).await?;
    Ok(Json(resp))
}
