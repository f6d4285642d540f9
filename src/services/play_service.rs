use std::collections::{BTreeSet, HashMap};

use chrono::{DateTime, Utc};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, EntityTrait, JoinType, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, RelationTrait, Set, TransactionTrait,
};
use sea_orm::ActiveValue::NotSet;

use crate::{
    audit,
    dto::plays::{CreatePlayRequest, PlayList, UpdatePlayRequest, UploadImageRequest},
    entity::{
        actors::{self, Entity as Actors},
        genres::{self, Entity as Genres},
        performances::{self, Entity as Performances},
        play_actors::{self, Entity as PlayActors},
        play_genres::{self, Entity as PlayGenres},
        plays::{self, ActiveModel, Entity as Plays, Model as PlayModel},
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin, ensure_staff},
    models::{PlayDetail, PlayImage, PlayListItem, PlaySummary},
    response::{ApiResponse, Meta},
    routes::params::PlayQuery,
    services::{actor_service::actor_from_entity, genre_service::genre_from_entity},
    state::AppState,
    validation::{FieldError, require_text},
};

const TITLE_MAX_LEN: usize = 256;

/// Related rows for a batch of plays, keyed by play id.
#[derive(Default)]
pub(crate) struct PlayRelations {
    genres: HashMap<i32, Vec<genres::Model>>,
    actors: HashMap<i32, Vec<actors::Model>>,
    show_times: HashMap<i32, Vec<DateTime<Utc>>>,
}

impl PlayRelations {
    pub(crate) async fn load<C>(db: &C, play_ids: &[i32]) -> AppResult<Self>
    where
        C: ConnectionTrait,
    {
        let mut relations = Self::default();
        if play_ids.is_empty() {
            return Ok(relations);
        }

        let genre_rows = PlayGenres::find()
            .find_also_related(Genres)
            .filter(play_genres::Column::PlayId.is_in(play_ids.to_vec()))
            .order_by_asc(genres::Column::Name)
            .all(db)
            .await?;
        for (link, genre) in genre_rows {
            if let Some(genre) = genre {
                relations.genres.entry(link.play_id).or_default().push(genre);
            }
        }

        let actor_rows = PlayActors::find()
            .find_also_related(Actors)
            .filter(play_actors::Column::PlayId.is_in(play_ids.to_vec()))
            .order_by_asc(actors::Column::LastName)
            .order_by_asc(actors::Column::FirstName)
            .all(db)
            .await?;
        for (link, actor) in actor_rows {
            if let Some(actor) = actor {
                relations.actors.entry(link.play_id).or_default().push(actor);
            }
        }

        let shows = Performances::find()
            .filter(performances::Column::PlayId.is_in(play_ids.to_vec()))
            .order_by_asc(performances::Column::ShowTime)
            .all(db)
            .await?;
        for show in shows {
            relations
                .show_times
                .entry(show.play_id)
                .or_default()
                .push(show.show_time.with_timezone(&Utc));
        }

        Ok(relations)
    }

    fn genre_names(&self, play_id: i32) -> Vec<String> {
        self.genres
            .get(&play_id)
            .map(|genres| genres.iter().map(|g| g.name.clone()).collect())
            .unwrap_or_default()
    }

    fn actor_names(&self, play_id: i32) -> Vec<String> {
        self.actors
            .get(&play_id)
            .map(|actors| actors.iter().map(actors::Model::full_name).collect())
            .unwrap_or_default()
    }

    fn show_times(&self, play_id: i32) -> Vec<DateTime<Utc>> {
        self.show_times.get(&play_id).cloned().unwrap_or_default()
    }

    pub(crate) fn list_item(&self, play: PlayModel) -> PlayListItem {
        PlayListItem {
            genres: self.genre_names(play.id),
            actors: self.actor_names(play.id),
            performances: self.show_times(play.id),
            id: play.id,
            title: play.title,
            description: play.description,
            image: play.image,
        }
    }

    pub(crate) fn summary(&self, play: PlayModel) -> PlaySummary {
        PlaySummary {
            genres: self.genre_names(play.id),
            actors: self.actor_names(play.id),
            id: play.id,
            title: play.title,
            description: play.description,
            image: play.image,
        }
    }

    fn detail(mut self, play: PlayModel) -> PlayDetail {
        PlayDetail {
            genres: self
                .genres
                .remove(&play.id)
                .unwrap_or_default()
                .into_iter()
                .map(genre_from_entity)
                .collect(),
            actors: self
                .actors
                .remove(&play.id)
                .unwrap_or_default()
                .into_iter()
                .map(actor_from_entity)
                .collect(),
            performances: self.show_times.remove(&play.id).unwrap_or_default(),
            id: play.id,
            title: play.title,
            description: play.description,
            image: play.image,
        }
    }
}

/// Lists plays, optionally restricted to the given genre and actor ids.
///
/// Each filter keeps plays linked to at least one of its ids and the two
/// filters combine with AND. The joins can yield a play once per matching
/// link, so the query is made `DISTINCT`.
pub async fn list_plays(state: &AppState, query: PlayQuery) -> AppResult<ApiResponse<PlayList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let genre_ids = query.genre_ids()?;
    let actor_ids = query.actor_ids()?;

    let mut finder = Plays::find();
    if let Some(ids) = genre_ids {
        finder = finder
            .join(JoinType::InnerJoin, plays::Relation::PlayGenres.def())
            .filter(play_genres::Column::GenreId.is_in(ids));
    }
    if let Some(ids) = actor_ids {
        finder = finder
            .join(JoinType::InnerJoin, plays::Relation::PlayActors.def())
            .filter(play_actors::Column::ActorId.is_in(ids));
    }
    let finder = finder.distinct().order_by_asc(plays::Column::Id);

    let total = finder.clone().count(&state.orm).await? as i64;

    let plays = finder
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;

    let ids: Vec<i32> = plays.iter().map(|p| p.id).collect();
    let relations = PlayRelations::load(&state.orm, &ids).await?;
    let items = plays
        .into_iter()
        .map(|play| relations.list_item(play))
        .collect();

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Plays", PlayList { items }, Some(meta)))
}

pub async fn get_play(state: &AppState, id: i32) -> AppResult<ApiResponse<PlayDetail>> {
    let play = Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let relations = PlayRelations::load(&state.orm, &[play.id]).await?;
    Ok(ApiResponse::success("Play", relations.detail(play), None))
}

pub async fn create_play(
    state: &AppState,
    user: &AuthUser,
    payload: CreatePlayRequest,
) -> AppResult<ApiResponse<PlayListItem>> {
    ensure_staff(user)?;
    require_text("title", &payload.title, TITLE_MAX_LEN)?;

    let txn = state.orm.begin().await?;

    let play = ActiveModel {
        id: NotSet,
        title: Set(payload.title),
        description: Set(payload.description),
        image: Set(None),
    }
    .insert(&txn)
    .await?;

    replace_genres(&txn, play.id, &payload.genres).await?;
    replace_actors(&txn, play.id, &payload.actors).await?;

    let relations = PlayRelations::load(&txn, &[play.id]).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "play_create",
        "plays",
        serde_json::json!({ "play_id": play.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Play created",
        relations.list_item(play),
        Some(Meta::empty()),
    ))
}

pub async fn update_play(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UpdatePlayRequest,
) -> AppResult<ApiResponse<PlayListItem>> {
    ensure_staff(user)?;

    let txn = state.orm.begin().await?;
    let existing = Plays::find_by_id(id)
        .one(&txn)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.clone().into();
    if let Some(title) = payload.title {
        require_text("title", &title, TITLE_MAX_LEN)?;
        active.title = Set(title);
    }
    if let Some(description) = payload.description {
        active.description = Set(description);
    }
    let play = if active.is_changed() {
        active.update(&txn).await?
    } else {
        existing
    };

    if let Some(genre_ids) = payload.genres {
        replace_genres(&txn, play.id, &genre_ids).await?;
    }
    if let Some(actor_ids) = payload.actors {
        replace_actors(&txn, play.id, &actor_ids).await?;
    }

    let relations = PlayRelations::load(&txn, &[play.id]).await?;
    txn.commit().await?;

    audit::record(
        &state.pool,
        user.user_id,
        "play_update",
        "plays",
        serde_json::json!({ "play_id": play.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Updated",
        relations.list_item(play),
        Some(Meta::empty()),
    ))
}

pub async fn delete_play(
    state: &AppState,
    user: &AuthUser,
    id: i32,
) -> AppResult<ApiResponse<serde_json::Value>> {
    ensure_staff(user)?;
    let result = Plays::delete_by_id(id).exec(&state.orm).await?;

    if result.rows_affected == 0 {
        return Err(AppError::NotFound);
    }

    audit::record(
        &state.pool,
        user.user_id,
        "play_delete",
        "plays",
        serde_json::json!({ "play_id": id }),
    )
    .await;

    Ok(ApiResponse::deleted())
}

/// Stores a reference to an already uploaded image. Admins only.
pub async fn upload_image(
    state: &AppState,
    user: &AuthUser,
    id: i32,
    payload: UploadImageRequest,
) -> AppResult<ApiResponse<PlayImage>> {
    ensure_admin(user)?;
    let image = payload.image.trim().to_string();
    if image.is_empty() {
        return Err(FieldError::new("image", "image must not be blank").into());
    }

    let existing = Plays::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let mut active: ActiveModel = existing.into();
    active.image = Set(Some(image));
    let play = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "play_upload_image",
        "plays",
        serde_json::json!({ "play_id": play.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Image uploaded",
        PlayImage {
            id: play.id,
            image: play.image,
        },
        Some(Meta::empty()),
    ))
}

async fn replace_genres<C>(db: &C, play_id: i32, genre_ids: &[i32]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let ids: BTreeSet<i32> = genre_ids.iter().copied().collect();
    let found = Genres::find()
        .filter(genres::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(FieldError::new("genres", "genres contains an unknown genre id").into());
    }

    PlayGenres::delete_many()
        .filter(play_genres::Column::PlayId.eq(play_id))
        .exec(db)
        .await?;

    if ids.is_empty() {
        return Ok(());
    }
    let links = ids.into_iter().map(|genre_id| play_genres::ActiveModel {
        play_id: Set(play_id),
        genre_id: Set(genre_id),
    });
    PlayGenres::insert_many(links).exec_without_returning(db).await?;
    Ok(())
}

async fn replace_actors<C>(db: &C, play_id: i32, actor_ids: &[i32]) -> AppResult<()>
where
    C: ConnectionTrait,
{
    let ids: BTreeSet<i32> = actor_ids.iter().copied().collect();
    let found = Actors::find()
        .filter(actors::Column::Id.is_in(ids.iter().copied()))
        .count(db)
        .await?;
    if found != ids.len() as u64 {
        return Err(FieldError::new("actors", "actors contains an unknown actor id").into());
    }

    PlayActors::delete_many()
        .filter(play_actors::Column::PlayId.eq(play_id))
        .exec(db)
        .await?;

    if ids.is_empty() {
        return Ok(());
    }
    let links = ids.into_iter().map(|actor_id| play_actors::ActiveModel {
        play_id: Set(play_id),
        actor_id: Set(actor_id),
    });
    PlayActors::insert_many(links).exec_without_returning(db).await?;
    Ok(())
}
