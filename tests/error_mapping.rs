use axum::{
    body::to_bytes,
    http::StatusCode,
    response::IntoResponse,
};
use sea_orm::DbErr;
use serde_json::Value;
use theatre_api::{error::AppError, validation::FieldError};

async fn body_of(err: AppError) -> (StatusCode, Value) {
    let response = err.into_response();
    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX)
        .await
        .expect("body");
    (status, serde_json::from_slice(&bytes).expect("json body"))
}

#[test]
fn db_errors_map_to_http_statuses() {
    let not_found: AppError = DbErr::RecordNotFound("performances".into()).into();
    assert_eq!(not_found.status(), StatusCode::NOT_FOUND);

    let tunneled: AppError = FieldError::new("seat", "seat must be in range [1, 8], not 9")
        .into_db_err()
        .into();
    assert!(matches!(tunneled, AppError::Validation(ref e) if e.field == "seat"));
    assert_eq!(tunneled.status(), StatusCode::BAD_REQUEST);

    let other: AppError = DbErr::Custom("connection reset".into()).into();
    assert_eq!(other.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn validation_errors_render_field_to_message() {
    let (status, body) =
        body_of(FieldError::new("row", "row must be in range [1, 5], not 6").into()).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    assert_eq!(body["message"], "Validation failed");
    assert_eq!(body["data"]["row"], "row must be in range [1, 5], not 6");
}

#[tokio::test]
async fn other_errors_render_an_error_string() {
    let (status, body) = body_of(AppError::Conflict("seat taken".into())).await;
    assert_eq!(status, StatusCode::CONFLICT);
    assert_eq!(body["data"]["error"], "Conflict seat taken");

    let (status, body) = body_of(AppError::Internal(anyhow::anyhow!("secret detail"))).await;
    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["data"]["error"], "Internal Server Error");
}
