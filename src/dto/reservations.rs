use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::Reservation;

#[derive(Debug, Clone, Copy, Deserialize, ToSchema)]
pub struct TicketRequest {
    pub row: i32,
    pub seat: i32,
    pub performance: i32,
}

/// The owner and creation time are assigned by the server.
#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateReservationRequest {
    pub tickets: Vec<TicketRequest>,
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ReservationList {
    #[schema(value_type = Vec<Reservation>)]
    pub items: Vec<Reservation>,
}
