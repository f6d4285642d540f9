use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// JWT payload. `sub` is the user id, `role` one of `user`, `staff`, `admin`.
#[derive(Debug, Deserialize, Serialize, ToSchema)]
pub struct Claims {
    pub sub: String,
    pub role: String,
    pub exp: usize,
}
