use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::PerformanceListItem;

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreatePerformanceRequest {
    pub play: i32,
    pub theatre_hall: i32,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdatePerformanceRequest {
    pub play: Option<i32>,
    pub theatre_hall: Option<i32>,
    pub show_time: Option<DateTime<Utc>>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct PerformanceList {
    #[schema(value_type = Vec<PerformanceListItem>)]
    pub items: Vec<PerformanceListItem>,
}
