use axum::{
    extract::rejection::{JsonRejection, PathRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use sea_orm::{DbErr, SqlErr};
use serde_json::{Map, Value, json};
use thiserror::Error;

use crate::{
    response::{ApiResponse, Meta},
    validation::FieldError,
};

#[derive(Debug, Error)]
pub enum AppError {
    #[error("Not Found")]
    NotFound,

    #[error("Bad Request {0}")]
    BadRequest(String),

    #[error("Validation failed")]
    Validation(FieldError),

    #[error("Unauthorized {0}")]
    Unauthorized(String),

    #[error("Forbidden")]
    Forbidden,

    #[error("Conflict {0}")]
    Conflict(String),

    #[error("Database error")]
    DbError(#[from] sqlx::Error),

    #[error("ORM error")]
    OrmError(DbErr),

    #[error("Internal Server Error")]
    Internal(#[from] anyhow::Error),
}

impl From<FieldError> for AppError {
    fn from(err: FieldError) -> Self {
        AppError::Validation(err)
    }
}

impl From<JsonRejection> for AppError {
    fn from(rejection: JsonRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<QueryRejection> for AppError {
    fn from(rejection: QueryRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<PathRejection> for AppError {
    fn from(rejection: PathRejection) -> Self {
        AppError::BadRequest(rejection.body_text())
    }
}

impl From<DbErr> for AppError {
    fn from(err: DbErr) -> Self {
        if let Some(field_error) = FieldError::from_db_err(&err) {
            return AppError::Validation(field_error);
        }
        match err.sql_err() {
            Some(SqlErr::UniqueConstraintViolation(detail)) => return AppError::Conflict(detail),
            Some(SqlErr::ForeignKeyConstraintViolation(detail)) => {
                tracing::debug!(detail = %detail, "foreign key violation");
                return AppError::BadRequest("referenced record does not exist".into());
            }
            _ => {}
        }
        match err {
            DbErr::RecordNotFound(_) => AppError::NotFound,
            other => AppError::OrmError(other),
        }
    }
}

impl AppError {
    pub fn status(&self) -> StatusCode {
        match self {
            AppError::NotFound => StatusCode::NOT_FOUND,
            AppError::BadRequest(_) | AppError::Validation(_) => StatusCode::BAD_REQUEST,
            AppError::Unauthorized(_) => StatusCode::UNAUTHORIZED,
            AppError::Forbidden => StatusCode::FORBIDDEN,
            AppError::Conflict(_) => StatusCode::CONFLICT,
            AppError::DbError(_) | AppError::OrmError(_) | AppError::Internal(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status();
        let data = match &self {
            AppError::Validation(field_error) => {
                let mut fields = Map::new();
                fields.insert(
                    field_error.field.clone(),
                    Value::String(field_error.message.clone()),
                );
                Value::Object(fields)
            }
            AppError::DbError(err) => {
                tracing::error!(error = %err, "database error");
                json!({ "error": self.to_string() })
            }
            AppError::OrmError(err) => {
                tracing::error!(error = %err, "orm error");
                json!({ "error": self.to_string() })
            }
            AppError::Internal(err) => {
                tracing::error!(error = %err, "internal error");
                json!({ "error": self.to_string() })
            }
            _ => json!({ "error": self.to_string() }),
        };

        let body = ApiResponse {
            message: self.to_string(),
            data: Some(data),
            meta: Some(Meta::empty()),
        };

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
