use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PlayListItem;

/// Write form of a play: relations are given as ids.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePlayRequest {
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub genres: Vec<i32>,
    #[serde(default)]
    pub actors: Vec<i32>,
}

/// `genres`/`actors`, when present, replace the play's current set.
#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePlayRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub genres: Option<Vec<i32>>,
    pub actors: Option<Vec<i32>>,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct UploadImageRequest {
    /// Reference (URL or storage key) of an already stored image.
    pub image: String,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PlayList {
    #[schema(value_type = Vec<PlayListItem>)]
    pub items: Vec<PlayListItem>,
}
