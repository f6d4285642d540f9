use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Actor;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateActorRequest {
    pub first_name: String,
    pub last_name: String,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateActorRequest {
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ActorList {
    #[schema(value_type = Vec<Actor>)]
    pub items: Vec<Actor>,
}
