use sea_orm::{
    ActiveModelTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::actors::{ActorList, CreateActorRequest, UpdateActorRequest},
    entity::{
        actors::{ActiveModel, Column, Entity as Actors, Model as ActorModel},
        plays::{Column as PlayCol, Entity as Plays},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Actor, ActorDetail},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    validation::require_text,
};

const NAME_MAX_LEN: usize = 256;

pub async fn list_actors(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<ActorList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Actors::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(actor_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Actors", ActorList { items }, Some(meta)))
}

pub async fn get_actor(state: &AppState, id: i32) -> AppResult<ApiResponse<ActorDetail>> {
    let actor = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let plays = actor
        .find_related(Plays)
        .order_by_asc(PlayCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|play| play.title)
        .collect();

    let full_name = actor.full_name();
    Ok(ApiResponse::success(
        "Actor",
        ActorDetail {
            id: actor.id,
            first_name: actor.first_name,
            last_name: actor.last_name,
            full_name,
            plays,
        },
        None,
    ))
}

pub async fn create_actor(
    state: &AppState,
    user: &AuthUser,
    payload: CreateActorRequest,
) -> AppResult<ApiResponse<Actor>> {
    ensure_staff(user)?;
    require_text("first_name", &payload.first_name, NAME_MAX_LEN)?;
    require_text("last_name", &payload.last_name, NAME_MAX_LEN)?;

    let actor = ActiveModel {
        id: NotSet,
        first_name: Set(payload.first_name),
        last_name: Set(payload.last_name),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "actor_create",
        "actors",
        serde_json::json!({ "actor_id": actor.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Actor created",
        actor_from_entity(actor),
        Some(Meta::empty()),
    ))
}

pub async fn update_actor(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateActorRequest,
) -> AppResult<ApiResponse<Actor>> {
    ensure_staff(user)?;
    let existing = Actors::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(first_name) = payload.first_name {
        require_text("first_name", &first_name, NAME_MAX_LEN)?;
        active.first_name = Set(first_name);
    }
    if let Some(last_name) = payload.last_name {
        require_text("last_name", &last_name, NAME_MAX_LEN)?;
        active.last_name = Set(last_name);
    }
    // An empty update body leaves the row untouched.
    let actor = if active.is_changed() {
        active.update(&state.orm).await?
    } else {
        existing
    };

    audit::record(
        &state.pool,
        user.user_id,
        "actor_update",
        "actors",
        serde_json::json!({ "actor_id": actor.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        actor_from_entity(actor),
        Some(Meta::empty()),
    ))
}

pub async fn delete_actor(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = Actors::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "actor_delete",
        "actors",
        serde_json::json!({ "actor_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

pub(crate) fn actor_from_entity(model: ActorModel) -> Actor {
    let full_name = model.full_name();
    Actor {
        id: model.id,
        first_name: model.first_name,
        last_name: model.last_name,
        full_name,
    }
}
