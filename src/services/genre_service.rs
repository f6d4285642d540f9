use sea_orm::{
    ActiveModelTrait, ColumnTrait, EntityTrait, ModelTrait, PaginatorTrait, QueryFilter,
    QueryOrder, QuerySelect, Set,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::genres::{CreateGenreRequest, GenreList, UpdateGenreRequest},
    entity::{
        genres::{ActiveModel, Column, Entity as Genres, Model as GenreModel},
        plays::{Column as PlayCol, Entity as Plays},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_staff},
    models::{Genre, GenreDetail},
    response::{ApiResponse, Meta},
    routes::params::Pagination,
    state::AppState,
    validation::require_text,
};

const NAME_MAX_LEN: usize = 64;

pub async fn list_genres(
    state: &AppState,
    pagination: Pagination,
) -> AppResult<ApiResponse<GenreList>> {
    let (page, limit, offset) = pagination.normalize();
    let finder = Genres::find().order_by_asc(Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let items = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(genre_from_entity)
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Genres", GenreList { items }, Some(meta)))
}

pub async fn get_genre(state: &AppState, id: i32) -> AppResult<ApiResponse<GenreDetail>> {
    let genre = Genres::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let plays = genre
        .find_related(Plays)
        .order_by_asc(PlayCol::Id)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|play| play.title)
        .collect();

    Ok(ApiResponse::success(
        "Genre",
        GenreDetail {
            id: genre.id,
            name: genre.name,
            plays,
        },
        None,
    ))
}

pub async fn create_genre(
    state: &AppState,
    user: &AuthUser,
    payload: CreateGenreRequest,
) -> AppResult<ApiResponse<Genre>> {
    ensure_staff(user)?;
    require_text("name", &payload.name, NAME_MAX_LEN)?;
    ensure_name_free(state, &payload.name, None).await?;

    let genre = ActiveModel {
        id: NotSet,
        name: Set(payload.name),
    }
    .insert(&state.orm)
    .await?;

    audit::record(
        &state.pool,
        user.user_id,
        "genre_create",
        "genres",
        serde_json::json!({ "genre_id": genre.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Genre created",
        genre_from_entity(genre),
        Some(Meta::empty()),
    ))
}

pub async fn update_genre(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdateGenreRequest,
) -> AppResult<ApiResponse<Genre>> {
    ensure_staff(user)?;
    let existing = Genres::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(name) = payload.name {
        require_text("name", &name, NAME_MAX_LEN)?;
        ensure_name_free(state, &name, Some(id)).await?;
        active.name = Set(name);
    }
    let genre = if active.is_changed() {
        active.update(&state.orm).await?
    } else {
        existing
    };

    audit::record(
        &state.pool,
        user.user_id,
        "genre_update",
        "genres",
        serde_json::json!({ "genre_id": genre.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        genre_from_entity(genre),
        Some(Meta::empty()),
    ))
}

pub async fn delete_genre(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = Genres::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "genre_delete",
        "genres",
        serde_json::json!({ "genre_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

/// The unique index on `genres.name` remains the final word.
async fn ensure_name_free(state: &AppState, name: &str, except: Option<i32>) -> AppResult<()> {
    let mut finder = Genres::find().filter(Column::Name.eq(name));
    if let Some(id) = except {
        finder = finder.filter(Column::Id.ne(id));
    }
    if finder.count(&state.orm).await? > 0 {
        return Err(AppError::Conflict(format!("genre '{name}' already exists")));
    }
    Ok(())
}

pub(crate) fn genre_from_entity(model: GenreModel) -> Genre {
    Genre {
        id: model.id,
        name: model.name,
    }
}
