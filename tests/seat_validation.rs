use proptest::prelude::*;
use sea_orm::DbErr;
use theatre_api::validation::{FieldError, require_positive, require_text, validate_seat};

#[test]
fn seat_inside_hall_is_accepted() {
    assert!(validate_seat(1, 1, 8, 5).is_ok());
    assert!(validate_seat(8, 5, 8, 5).is_ok());
    assert!(validate_seat(4, 3, 8, 5).is_ok());
}

#[test]
fn row_past_last_row_names_the_row() {
    let err = validate_seat(3, 6, 8, 5).unwrap_err();
    assert_eq!(err.field, "row");
    assert_eq!(err.message, "row must be in range [1, 5], not 6");
}

#[test]
fn seat_zero_names_the_seat() {
    let err = validate_seat(0, 2, 8, 5).unwrap_err();
    assert_eq!(err.field, "seat");
    assert_eq!(err.message, "seat must be in range [1, 8], not 0");
}

#[test]
fn seat_is_reported_before_row() {
    let err = validate_seat(9, 6, 8, 5).unwrap_err();
    assert_eq!(err.field, "seat");
}

#[test]
fn field_error_survives_a_trip_through_db_err() {
    let original = FieldError::new("row", "row must be in range [1, 5], not 6");
    let db_err = original.clone().into_db_err();
    assert_eq!(FieldError::from_db_err(&db_err), Some(original));
}

#[test]
fn unrelated_db_errors_are_not_field_errors() {
    assert_eq!(FieldError::from_db_err(&DbErr::Custom("boom".into())), None);
    assert_eq!(
        FieldError::from_db_err(&DbErr::RecordNotFound("plays".into())),
        None
    );
}

#[test]
fn text_and_number_helpers() {
    assert!(require_text("name", "Main Stage", 255).is_ok());
    assert_eq!(
        require_text("name", "   ", 255).unwrap_err().message,
        "name must not be blank"
    );
    assert_eq!(
        require_text("name", "abcdef", 5).unwrap_err().message,
        "name must be at most 5 characters"
    );
    assert!(require_positive("rows", 1).is_ok());
    assert_eq!(
        require_positive("rows", 0).unwrap_err().message,
        "rows must be at least 1, not 0"
    );
}

proptest! {
    #[test]
    fn accepts_exactly_the_seats_inside_the_hall(
        seat in -3i32..30,
        row in -3i32..30,
        max_seats in 1i32..25,
        max_rows in 1i32..25,
    ) {
        let inside = (1..=max_seats).contains(&seat) && (1..=max_rows).contains(&row);
        prop_assert_eq!(validate_seat(seat, row, max_seats, max_rows).is_ok(), inside);
    }
}
