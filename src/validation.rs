use sea_orm::DbErr;
use thiserror::Error;

const FIELD_ERROR_TAG: &str = "field_error:";

/// A validation failure tied to one input field, rendered to clients as
/// `{"<field>": "<message>"}`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{field}: {message}")]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    pub fn new(field: impl Into<String>, message: impl Into<String>) -> Self {
        Self {
            field: field.into(),
            message: message.into(),
        }
    }

    /// Entity hooks can only fail with a `DbErr`, so the field error rides
    /// inside `DbErr::Custom` and is recovered by [`FieldError::from_db_err`].
    pub fn into_db_err(self) -> DbErr {
        DbErr::Custom(format!("{FIELD_ERROR_TAG}{}:{}", self.field, self.message))
    }

    pub fn from_db_err(err: &DbErr) -> Option<Self> {
        let DbErr::Custom(raw) = err else {
            return None;
        };
        let (field, message) = raw.strip_prefix(FIELD_ERROR_TAG)?.split_once(':')?;
        Some(Self::new(field, message))
    }
}

/// Checks a seat/row pair against the dimensions of a hall.
///
/// The seat is checked first, so a ticket that is out of range on both axes
/// reports the seat.
pub fn validate_seat(seat: i32, row: i32, max_seats: i32, max_rows: i32) -> Result<(), FieldError> {
    check_range("seat", seat, max_seats)?;
    check_range("row", row, max_rows)
}

fn check_range(field: &str, value: i32, max: i32) -> Result<(), FieldError> {
    if (1..=max).contains(&value) {
        return Ok(());
    }
    Err(FieldError::new(
        field,
        format!("{field} must be in range [1, {max}], not {value}"),
    ))
}

pub fn require_text(field: &str, value: &str, max_len: usize) -> Result<(), FieldError> {
    if value.trim().is_empty() {
        return Err(FieldError::new(field, format!("{field} must not be blank")));
    }
    if value.chars().count() > max_len {
        return Err(FieldError::new(
            field,
            format!("{field} must be at most {max_len} characters"),
        ));
    }
    Ok(())
}

pub fn require_positive(field: &str, value: i32) -> Result<(), FieldError> {
    if value < 1 {
        return Err(FieldError::new(
            field,
            format!("{field} must be at least 1, not {value}"),
        ));
    }
    Ok(())
}
