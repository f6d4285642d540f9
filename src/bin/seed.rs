use chrono::{Duration, Utc};
use theatre_api::{
    config::AppConfig,
    db::{create_pool, orm_from_pool, run_migrations},
    middleware::auth::{ROLE_ADMIN, ROLE_STAFF, ROLE_USER, issue_token},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.db_max_connections).await?;
    // Ensure migrations are applied.
    run_migrations(&orm_from_pool(pool.clone())).await?;

    let mut principals = Vec::new();
    for (email, role) in [
        ("admin@example.com", ROLE_ADMIN),
        ("staff@example.com", ROLE_STAFF),
        ("user@example.com", ROLE_USER),
    ] {
        let id = ensure_user(&pool, email, role).await?;
        principals.push((email, role, id));
    }
    seed_catalog(&pool).await?;

    let ttl = Duration::hours(config.token_ttl_hours);
    println!(
        "Seed completed. Bearer tokens (valid {} hours):",
        config.token_ttl_hours
    );
    for (email, role, id) in principals {
        let token = issue_token(&config.jwt_secret, id, role, ttl)?;
        println!("  {email} ({role}): Bearer {token}");
    }
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, role: &str) -> anyhow::Result<Uuid> {
    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, role)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn seed_catalog(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    let (plays,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM plays")
        .fetch_one(pool)
        .await?;
    if plays > 0 {
        println!("Catalog already present, skipping");
        return Ok(());
    }

    let mut tx = pool.begin().await?;

    let mut genre_ids = Vec::new();
    for name in ["Drama", "Comedy", "Tragedy"] {
        let (id,): (i32,) = sqlx::query_as(
            r#"
            INSERT INTO genres (name) VALUES ($1)
            ON CONFLICT (name) DO UPDATE SET name = EXCLUDED.name
            RETURNING id
            "#,
        )
        .bind(name)
        .fetch_one(&mut *tx)
        .await?;
        genre_ids.push(id);
    }

    let mut actor_ids = Vec::new();
    for (first_name, last_name) in [("Ian", "McKellen"), ("Judi", "Dench"), ("Mark", "Rylance")] {
        let (id,): (i32,) = sqlx::query_as(
            "INSERT INTO actors (first_name, last_name) VALUES ($1, $2) RETURNING id",
        )
        .bind(first_name)
        .bind(last_name)
        .fetch_one(&mut *tx)
        .await?;
        actor_ids.push(id);
    }

    let (hall_id,): (i32,) = sqlx::query_as(
        "INSERT INTO theatre_halls (name, rows, seats_in_row) VALUES ($1, $2, $3) RETURNING id",
    )
    .bind("Main Stage")
    .bind(12)
    .bind(20)
    .fetch_one(&mut *tx)
    .await?;

    let plays = [
        ("Hamlet", "The prince of Denmark seeks revenge.", genre_ids[2], actor_ids[0]),
        ("Twelfth Night", "Shipwrecked twins and mistaken identities.", genre_ids[1], actor_ids[2]),
        ("The Cherry Orchard", "An estate on the eve of its sale.", genre_ids[0], actor_ids[1]),
    ];
    for (offset, (title, description, genre_id, actor_id)) in plays.into_iter().enumerate() {
        let (play_id,): (i32,) = sqlx::query_as(
            "INSERT INTO plays (title, description) VALUES ($1, $2) RETURNING id",
        )
        .bind(title)
        .bind(description)
        .fetch_one(&mut *tx)
        .await?;

        sqlx::query("INSERT INTO play_genres (play_id, genre_id) VALUES ($1, $2)")
            .bind(play_id)
            .bind(genre_id)
            .execute(&mut *tx)
            .await?;
        sqlx::query("INSERT INTO play_actors (play_id, actor_id) VALUES ($1, $2)")
            .bind(play_id)
            .bind(actor_id)
            .execute(&mut *tx)
            .await?;

        sqlx::query(
            "INSERT INTO performances (play_id, theatre_hall_id, show_time) VALUES ($1, $2, $3)",
        )
        .bind(play_id)
        .bind(hall_id)
        .bind(Utc::now() + Duration::days(7 + offset as i64))
        .execute(&mut *tx)
        .await?;
    }

    tx.commit().await?;
    println!("Seeded catalog");
    Ok(())
}
