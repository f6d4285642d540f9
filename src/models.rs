//! Transport representations. Each resource has a compact shape used for
//! lists and write responses, and some have an expanded shape for retrieval.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Actor {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ActorDetail {
    pub id: i32,
    pub first_name: String,
    pub last_name: String,
    pub full_name: String,
    /// Titles of the plays the actor appears in.
    pub plays: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Genre {
    pub id: i32,
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct GenreDetail {
    pub id: i32,
    pub name: String,
    pub plays: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlayListItem {
    pub id: i32,
    pub title: String,
    pub description: String,
    /// Genre names.
    pub genres: Vec<String>,
    /// Actor full names.
    pub actors: Vec<String>,
    pub image: Option<String>,
    /// Show times of the play's performances.
    pub performances: Vec<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlayDetail {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genres: Vec<Genre>,
    pub actors: Vec<Actor>,
    pub image: Option<String>,
    pub performances: Vec<DateTime<Utc>>,
}

/// A play as embedded in a performance detail.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlaySummary {
    pub id: i32,
    pub title: String,
    pub description: String,
    pub genres: Vec<String>,
    pub actors: Vec<String>,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PlayImage {
    pub id: i32,
    pub image: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct TheatreHall {
    pub id: i32,
    pub name: String,
    pub rows: i32,
    pub seats_in_row: i32,
    pub capacity: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Performance {
    pub id: i32,
    pub play: i32,
    pub theatre_hall: i32,
    pub show_time: DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceListItem {
    pub id: i32,
    pub play: i32,
    pub play_title: String,
    pub theatre_hall: i32,
    pub theatre_hall_name: String,
    pub theatre_hall_capacity: i64,
    pub show_time: DateTime<Utc>,
    pub tickets_available: i64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct TakenSeat {
    pub row: i32,
    pub seat: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PerformanceDetail {
    pub id: i32,
    pub play: PlaySummary,
    pub theatre_hall: TheatreHall,
    pub show_time: DateTime<Utc>,
    pub taken_seats: Vec<TakenSeat>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Ticket {
    pub id: i32,
    pub row: i32,
    pub seat: i32,
    pub performance: i32,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct Reservation {
    pub id: i32,
    pub created_at: DateTime<Utc>,
    pub tickets: Vec<Ticket>,
}
