use axum::{
    Json, Router,
    extract::State,
    http::StatusCode,
    routing::get,
};

use crate::{
    dto::actors::{ActorList, CreateActorRequest, UpdateActorRequest},
    error::AppResult,
    middleware::auth::AuthUser,
    models::{Actor, ActorDetail},
    response::ApiResponse,
    routes::{
        extract::{JsonBody, PathParam, QueryParams},
        params::Pagination,
    },
    services::actor_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(list_actors).post(create_actor))
        .route(
            "/{id}",
            get(get_actor).put(update_actor).delete(delete_actor),
        )
}

#[utoipa::path(
    get,
    path = "/api/actors",
    params(Pagination),
    responses(
        (status = 200, description = "List actors", body = ApiResponse<ActorList>)
    ),
    tag = "Actors"
)]
pub async fn list_actors(
    State(state): State<AppState>,
    QueryParams(pagination): QueryParams<Pagination>,
) -> AppResult<Json<ApiResponse<ActorList>>> {
    let resp = actor_service::list_actors(&state, pagination).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/actors/{id}",
    params(
        ("id" = i32, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Actor with the titles of their plays", body = ApiResponse<ActorDetail>),
        (status = 404, description = "Actor not found"),
    ),
    tag = "Actors"
)]
pub async fn get_actor(
    State(state): State<AppState>,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<ActorDetail>>> {
    let resp = actor_service::get_actor(&state, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/actors",
    request_body = CreateActorRequest,
    responses(
        (status = 201, description = "Create actor", body = ApiResponse<Actor>),
        (status = 400, description = "Invalid payload"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Staff only"),
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn create_actor(
    State(state): State<AppState>,
    user: AuthUser,
    JsonBody(payload): JsonBody<CreateActorRequest>,
) -> AppResult<(StatusCode, Json<ApiResponse<Actor>>)> {
    let resp = actor_service::create_actor(&state, &user, payload).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/actors/{id}",
    params(
        ("id" = i32, Path, description = "Actor ID")
    ),
    request_body = UpdateActorRequest,
    responses(
        (status = 200, description = "Updated actor", body = ApiResponse<Actor>),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Actor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn update_actor(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
    JsonBody(payload): JsonBody<UpdateActorRequest>,
) -> AppResult<Json<ApiResponse<Actor>>> {
    let resp = actor_service::update_actor(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/actors/{id}",
    params(
        ("id" = i32, Path, description = "Actor ID")
    ),
    responses(
        (status = 200, description = "Deleted actor"),
        (status = 403, description = "Staff only"),
        (status = 404, description = "Actor not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Actors"
)]
pub async fn delete_actor(
    State(state): State<AppState>,
    user: AuthUser,
    PathParam(id): PathParam<i32>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = actor_service::delete_actor(&state, &user, id).await?;
    Ok(Json(resp))
}
