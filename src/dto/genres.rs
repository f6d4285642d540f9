use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Genre;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateGenreRequest {
    pub name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateGenreRequest {
    pub name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct GenreList {
    #[schema(value_type = Vec<Genre>)]
    pub items: Vec<Genre>,
}
