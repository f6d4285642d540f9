use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::TheatreHall;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateTheatreHallRequest {
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateTheatreHallRequest {
    pub name: Option<String>,
    pub rows: Option<i32>,
    pub seats_in_row: Option<i32>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct TheatreHallList {
    #[schema(value_type = Vec<TheatreHall>)]
    pub items: Vec<TheatreHall>,
}
