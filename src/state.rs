use std::sync::Arc;

use crate::db::{DbPool, OrmConn, orm_from_pool};

#[derive(Clone)]
pub struct AppState {
    pub pool: DbPool,
    pub orm: OrmConn,
    pub jwt_secret: Arc<str>,
}

impl AppState {
    /// Both the ORM and raw queries share one pool.
    pub fn new(pool: DbPool, jwt_secret: impl Into<Arc<str>>) -> Self {
        Self {
            orm: orm_from_pool(pool.clone()),
            pool,
            jwt_secret: jwt_secret.into(),
        }
    }
}
