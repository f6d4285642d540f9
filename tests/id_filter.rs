use proptest::prelude::*;
use theatre_api::routes::params::{Pagination, PlayQuery, parse_ids};

#[test]
fn parses_ids_in_order() {
    assert_eq!(parse_ids("genres", "1,2").unwrap(), vec![1, 2]);
    assert_eq!(parse_ids("genres", "7").unwrap(), vec![7]);
    assert_eq!(parse_ids("actors", " 3 , 1 ,2").unwrap(), vec![3, 1, 2]);
}

#[test]
fn malformed_lists_are_rejected() {
    for raw in ["a", "1,,2", "1,x", "-1", "1.5", "99999999999", "1,"] {
        let err = parse_ids("genres", raw).unwrap_err();
        assert_eq!(err.field, "genres", "input {raw:?}");
    }
    let err = parse_ids("actors", "4,abc").unwrap_err();
    assert_eq!(
        err.message,
        "actors must be a comma-separated list of integer ids, got 'abc'"
    );
}

#[test]
fn blank_or_missing_filters_mean_no_filter() {
    let query = PlayQuery {
        genres: Some("  ".into()),
        actors: None,
        ..Default::default()
    };
    assert_eq!(query.genre_ids().unwrap(), None);
    assert_eq!(query.actor_ids().unwrap(), None);

    let query = PlayQuery {
        genres: Some("2,5".into()),
        ..Default::default()
    };
    assert_eq!(query.genre_ids().unwrap(), Some(vec![2, 5]));
}

#[test]
fn pagination_defaults_and_clamps() {
    assert_eq!(Pagination::default().normalize(), (1, 20, 0));

    let large = Pagination {
        page: Some(3),
        per_page: Some(1000),
    };
    assert_eq!(large.normalize(), (3, 100, 200));

    let negative = Pagination {
        page: Some(-4),
        per_page: Some(0),
    };
    assert_eq!(negative.normalize(), (1, 1, 0));

    let far = Pagination {
        page: Some(i64::MAX),
        per_page: Some(100),
    };
    let (page, per_page, offset) = far.normalize();
    assert_eq!((page, per_page), (i64::MAX, 100));
    assert_eq!(offset, i64::MAX);
}

proptest! {
    #[test]
    fn joined_ids_parse_back(ids in prop::collection::vec(0i32..=i32::MAX, 1..12)) {
        let raw = ids.iter().map(i32::to_string).collect::<Vec<_>>().join(",");
        prop_assert_eq!(parse_ids("genres", &raw).unwrap(), ids);
    }
}
