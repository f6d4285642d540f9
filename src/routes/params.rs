use serde::Deserialize;
use utoipa::{IntoParams, ToSchema};

use crate::validation::FieldError;

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    /// Returns `(page, per_page, offset)`. Pages far past the end saturate
    /// instead of overflowing and simply come back empty.
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

/// Query string of `GET /plays`. Pagination fields are declared inline
/// because `serde(flatten)` loses the numeric types in query strings.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct PlayQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    /// Comma-separated genre ids, e.g. `1,2`.
    pub genres: Option<String>,
    /// Comma-separated actor ids, e.g. `3,7`.
    pub actors: Option<String>,
}

impl PlayQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }

    pub fn genre_ids(&self) -> Result<Option<Vec<i32>>, FieldError> {
        optional_ids("genres", self.genres.as_deref())
    }

    pub fn actor_ids(&self) -> Result<Option<Vec<i32>>, FieldError> {
        optional_ids("actors", self.actors.as_deref())
    }
}

/// An absent or blank parameter means "no filter".
fn optional_ids(field: &str, raw: Option<&str>) -> Result<Option<Vec<i32>>, FieldError> {
    match raw {
        Some(raw) if !raw.trim().is_empty() => parse_ids(field, raw).map(Some),
        _ => Ok(None),
    }
}

/// Parses a comma-separated list of integer ids, keeping input order.
///
/// Each token may be surrounded by whitespace but must otherwise be a
/// non-empty run of ASCII digits that fits an `i32`.
pub fn parse_ids(field: &str, raw: &str) -> Result<Vec<i32>, FieldError> {
    raw.split(',')
        .map(|token| {
            let token = token.trim();
            let parsed = if !token.is_empty() && token.bytes().all(|b| b.is_ascii_digit()) {
                token.parse::<i32>().ok()
            } else {
                None
            };
            parsed.ok_or_else(|| {
                FieldError::new(
                    field,
                    format!("{field} must be a comma-separated list of integer ids, got '{token}'"),
                )
            })
        })
        .collect()
}
