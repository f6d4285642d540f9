use chrono::{TimeZone, Utc};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, ConnectionTrait, EntityTrait, PaginatorTrait, Set, Statement};
use theatre_api::{
    db::{create_pool, run_migrations},
    dto::{
        actors::CreateActorRequest,
        genres::CreateGenreRequest,
        performances::CreatePerformanceRequest,
        plays::{CreatePlayRequest, UpdatePlayRequest, UploadImageRequest},
        theatre_halls::CreateTheatreHallRequest,
    },
    entity::{Performances, users::ActiveModel as UserActive},
    error::AppError,
    middleware::auth::{AuthUser, ROLE_ADMIN, ROLE_STAFF},
    routes::params::PlayQuery,
    services::{
        actor_service, genre_service, performance_service, play_service, theatre_hall_service,
    },
    state::AppState,
};
use uuid::Uuid;

// Integration flow: staff builds a small catalog, then the play list is
// filtered by genre and actor ids.
#[tokio::test]
async fn catalog_filtering_and_maintenance() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let state = setup_state(&database_url).await?;
    let staff = create_user(&state, ROLE_STAFF, "staff@example.com").await?;
    let admin = create_user(&state, ROLE_ADMIN, "admin@example.com").await?;

    let mut genre_ids = Vec::new();
    for name in ["Drama", "Comedy", "Tragedy"] {
        let request = CreateGenreRequest { name: name.into() };
        let genre = genre_service::create_genre(&state, &staff, request)
            .await?
            .data
            .unwrap();
        genre_ids.push(genre.id);
    }
    let [drama, comedy, tragedy] = genre_ids[..] else {
        panic!("expected three genres");
    };

    let duplicate =
        genre_service::create_genre(&state, &staff, CreateGenreRequest { name: "Drama".into() })
            .await;
    assert!(matches!(duplicate, Err(AppError::Conflict(_))));

    let mut actor_ids = Vec::new();
    for (first_name, last_name) in [("Judi", "Dench"), ("Mark", "Rylance")] {
        let actor = actor_service::create_actor(
            &state,
            &staff,
            CreateActorRequest {
                first_name: first_name.into(),
                last_name: last_name.into(),
            },
        )
        .await?
        .data
        .unwrap();
        assert_eq!(actor.full_name, format!("{first_name} {last_name}"));
        actor_ids.push(actor.id);
    }
    let [dench, rylance] = actor_ids[..] else {
        panic!("expected two actors");
    };

    let new_play = |title: &str, genres: Vec<i32>, actors: Vec<i32>| CreatePlayRequest {
        title: title.into(),
        description: format!("{title} in three acts"),
        genres,
        actors,
    };
    let first_request = new_play("First", vec![drama, comedy], vec![dench]);
    let first = play_service::create_play(&state, &staff, first_request)
        .await?
        .data
        .unwrap();
    let second = play_service::create_play(&state, &staff, new_play("Second", vec![comedy], vec![]))
        .await?
        .data
        .unwrap();
    let third = play_service::create_play(
        &state,
        &staff,
        new_play("Third", vec![tragedy], vec![dench, rylance]),
    )
    .await?
    .data
    .unwrap();
    assert_eq!(first.genres, vec!["Comedy".to_string(), "Drama".to_string()]);

    let unknown =
        play_service::create_play(&state, &staff, new_play("Ghost", vec![9999], vec![])).await;
    match unknown {
        Err(AppError::Validation(e)) => assert_eq!(e.field, "genres"),
        other => panic!("expected validation error, got {other:?}"),
    }

    // A play matching several requested genres is listed once.
    let titles = list_titles(&state, Some(&format!("{drama},{comedy}")), None).await?;
    assert_eq!(titles, vec!["First", "Second"]);
    assert_eq!(
        list_titles(&state, Some(&format!("{drama},{comedy}")), Some(&dench.to_string())).await?,
        vec!["First"]
    );
    assert_eq!(
        list_titles(&state, None, Some(&format!("{dench},{rylance}"))).await?,
        vec!["First", "Third"]
    );
    assert_eq!(list_titles(&state, None, None).await?.len(), 3);

    let listed = play_service::list_plays(
        &state,
        PlayQuery {
            genres: Some(format!("{drama},{comedy}")),
            ..Default::default()
        },
    )
    .await?;
    assert_eq!(listed.meta.and_then(|m| m.total), Some(2));

    // Replacing relations and attaching an image.
    play_service::update_play(
        &state,
        &staff,
        second.id,
        UpdatePlayRequest {
            genres: Some(vec![tragedy]),
            actors: Some(vec![rylance]),
            ..Default::default()
        },
    )
    .await?;
    let image = play_service::upload_image(
        &state,
        &admin,
        second.id,
        UploadImageRequest {
            image: "plays/second.jpg".into(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(image.image.as_deref(), Some("plays/second.jpg"));

    let detail = play_service::get_play(&state, second.id).await?.data.unwrap();
    let genre_names: Vec<&str> = detail.genres.iter().map(|g| g.name.as_str()).collect();
    assert_eq!(genre_names, vec!["Tragedy"]);
    assert_eq!(detail.actors.len(), 1);
    assert_eq!(detail.actors[0].full_name, "Mark Rylance");
    assert_eq!(detail.image.as_deref(), Some("plays/second.jpg"));

    // Removing a hall takes its performances with it.
    let hall = theatre_hall_service::create_theatre_hall(
        &state,
        &staff,
        CreateTheatreHallRequest {
            name: "Studio".into(),
            rows: 3,
            seats_in_row: 4,
        },
    )
    .await?
    .data
    .unwrap();
    let performance = performance_service::create_performance(
        &state,
        &staff,
        CreatePerformanceRequest {
            play: third.id,
            theatre_hall: hall.id,
            show_time: Utc.with_ymd_and_hms(2026, 12, 1, 18, 30, 0).unwrap(),
        },
    )
    .await?
    .data
    .unwrap();
    assert_eq!(performance.theatre_hall, hall.id);

    let missing_hall = performance_service::create_performance(
        &state,
        &staff,
        CreatePerformanceRequest {
            play: third.id,
            theatre_hall: hall.id + 1000,
            show_time: Utc.with_ymd_and_hms(2026, 12, 2, 18, 30, 0).unwrap(),
        },
    )
    .await;
    assert!(matches!(missing_hall, Err(AppError::NotFound)));

    theatre_hall_service::delete_theatre_hall(&state, &staff, hall.id).await?;
    assert_eq!(Performances::find().count(&state.orm).await?, 0);

    Ok(())
}

async fn list_titles(
    state: &AppState,
    genres: Option<&str>,
    actors: Option<&str>,
) -> anyhow::Result<Vec<String>> {
    let plays = play_service::list_plays(
        state,
        PlayQuery {
            genres: genres.map(str::to_string),
            actors: actors.map(str::to_string),
            ..Default::default()
        },
    )
    .await?
    .data
    .unwrap();
    Ok(plays.items.into_iter().map(|p| p.title).collect())
}

async fn setup_state(database_url: &str) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url, 5).await?;
    let state = AppState::new(pool, "flow-test-secret");
    run_migrations(&state.orm).await?;

    // Clean tables between runs
    let backend = state.orm.get_database_backend();
    state
        .orm
        .execute(Statement::from_string(
            backend,
            "TRUNCATE TABLE tickets, reservations, performances, play_genres, play_actors, plays, genres, actors, theatre_halls, audit_logs, users RESTART IDENTITY CASCADE",
        ))
        .await?;

    Ok(state)
}

async fn create_user(state: &AppState, role: &str, email: &str) -> anyhow::Result<AuthUser> {
    let user = UserActive {
        id: Set(Uuid::new_v4()),
        email: Set(email.to_string()),
        role: Set(role.into()),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    Ok(AuthUser {
        user_id: user.id,
        role: user.role,
    })
}
