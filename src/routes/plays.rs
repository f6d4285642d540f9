use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::{get, post},
};

use crate::{
    dto::plays::{CreatePlayRequest, PlayList, UpdatePlayRequest, UploadImageRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{PlayDetail, PlayImage, PlayListItem},
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::PlayQuery,
    },
    services::play_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_plays).post(create_play))
        .route(
            "/{id}",
            get(get_play).put(update_play).delete(delete_play),
        )
        .route("/{id}/upload-image", post(upload_image))
}

#[utoipa::path(
    get,
    path = "/api/plays",
    params(PlayQuery),
    responses(
        (status = 200, description = "List plays, optionally filtered by genre and actor ids", body = ApiResponse<PlayList>),
        (status = 400, description = "Malformed id list"),
    ),
    tag = "Plays"
)]
pub async fn list_plays(
    State(state): State<AppState>,
    QueryParams(query): QueryParams<PlayQuery>,
) -> AppResult<Json<ApiResponse<PlayList>>> {
    let resp = play_service::list_plays(&state, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/plays/{id}",
    params(
        ("id" = i32, Path, description = "Play ID")
    ),
    responses(
        (status = 200, description = "Play with nested genres and actors", body = ApiResponse<PlayDetail>),
        (status = 404, description = "Play not found"),
    ),
    tag = "Plays"
)]
pub async fn get_play(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<PlayDetail>>> {
    let resp = play_service::get_play(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plays",
    request_body = CreatePlayRequest,
    responses(
        (status = 201, description = "Create play", body = ApiResponse<PlayListItem>),
        (status = 400, description = "Invalid payload or unknown genre/actor id"),
        (status = 403, description = "Staff only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn create_play(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreatePlayRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<PlayListItem>>)> {
    let resp = play_service::create_play(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/plays/{id}",
    params(
        ("id" = i32, Path, description = "Play ID")
    ),
    request_body = UpdatePlayRequest,
    responses(
        (status = 200, description = "Updated play", body = ApiResponse<PlayListItem>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Play not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn update_play(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdatePlayRequest>,
) -> AppResult<Json<ApiResponse<PlayListItem>>> {
    let resp = play_service::update_play(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/plays/{id}",
    params(
        ("id" = i32, Path, description = "Play ID")
    ),
    responses(
        (status = 200, description = "Deleted play and its performances"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Play not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn delete_play(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = play_service::delete_play(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/plays/{id}/upload-image",
    params(
        ("id" = i32, Path, description = "Play ID")
    ),
    request_body = UploadImageRequest,
    responses(
        (status = 200, description = "Image reference stored", body = ApiResponse<PlayImage>),
        (status = 400, description = "Blank image reference"),
        (status = 403, description = "Admin only"),
        (status = 404, description = "Play not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Plays"
)]
pub async fn upload_image(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UploadImageRequest>,
) -> AppResult<Json<ApiResponse<PlayImage>>> {
    let resp = play_service::upload_image(&state, &user, id, payload).await?;
    Ok(Json(resp))
}
