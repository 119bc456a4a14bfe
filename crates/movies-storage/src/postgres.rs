use crate::error::{is_unique_violation, map_sqlx_error, Result};
use crate::pool::PoolConfig;
use crate::timestamp::{from_micros, to_micros};
use async_trait::async_trait;
use movies_core::{
    Clock, CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    SystemClock, UpdateMovieParams,
};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use uuid::Uuid;

/// PostgreSQL implementation of the store contract.
///
/// Expects the `movies` table from `ddl/postgres/movies.sql` with a native
/// `UUID` primary key. Timestamps are Unix microseconds, as in the MySQL
/// backend.
#[derive(Debug, Clone)]
pub struct PostgresMoviesStore<C = SystemClock> {
    pool: PgPool,
    clock: C,
}

impl PostgresMoviesStore {
    pub fn new(pool: PgPool) -> Self {
        Self::with_clock(pool, SystemClock)
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, &PoolConfig::default()).await
    }

    pub async fn connect_with(database_url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = config
            .options::<sqlx::Postgres>()
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

impl<C: Clock> PostgresMoviesStore<C> {
    pub fn with_clock(pool: PgPool, clock: C) -> Self {
        Self { pool, clock }
    }

    pub fn pool(&self) -> &PgPool {
        &self.pool
    }
}

fn movie_from_row(row: &PgRow) -> Result<Movie> {
    let id: Uuid = row.try_get("id").map_err(map_sqlx_error)?;

    Ok(Movie {
        id: MovieId::from_uuid(id),
        title: row.try_get("title").map_err(map_sqlx_error)?,
        director: row.try_get("director").map_err(map_sqlx_error)?,
        release_date: from_micros(
            "release_date",
            row.try_get("release_date").map_err(map_sqlx_error)?,
        )?,
        ticket_price: row.try_get("ticket_price").map_err(map_sqlx_error)?,
        created_at: from_micros(
            "created_at",
            row.try_get("created_at").map_err(map_sqlx_error)?,
        )?,
        updated_at: from_micros(
            "updated_at",
            row.try_get("updated_at").map_err(map_sqlx_error)?,
        )?,
    })
}

#[async_trait]
impl<C: Clock> ReadMoviesStore for PostgresMoviesStore<C> {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        let rows = sqlx::query(
            r#"
            SELECT id, title, director, release_date, ticket_price, created_at, updated_at
            FROM movies
            "#,
        )
        .fetch_all(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        rows.iter().map(movie_from_row).collect()
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
        let row = sqlx::query(
            r#"
            SELECT id, title, director, release_date, ticket_price, created_at, updated_at
            FROM movies
            WHERE id = $1
            "#,
        )
        .bind(*id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        match row {
            Some(row) => movie_from_row(&row),
            None => Err(StoreError::NotFound(*id)),
        }
    }
}

#[async_trait]
impl<C: Clock> MoviesStore for PostgresMoviesStore<C> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        let movie = params.into_movie(self.clock.now());

        let result = sqlx::query(
            r#"
            INSERT INTO movies
                (id, title, director, release_date, ticket_price, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(*movie.id.as_uuid())
        .bind(&movie.title)
        .bind(&movie.director)
        .bind(to_micros(movie.release_date))
        .bind(movie.ticket_price)
        .bind(to_micros(movie.created_at))
        .bind(to_micros(movie.updated_at))
        .execute(&self.pool)
        .await;

        match result {
            Ok(_) => Ok(()),
            Err(err) if is_unique_violation(&err) => Err(StoreError::DuplicateKey(movie.id)),
            Err(err) => Err(map_sqlx_error(err)),
        }
    }

    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()> {
        let result = sqlx::query(
            r#"
            UPDATE movies
            SET title = $1,
                director = $2,
                release_date = $3,
                ticket_price = $4,
                updated_at = GREATEST(updated_at, $5)
            WHERE id = $6
            "#,
        )
        .bind(params.title)
        .bind(params.director)
        .bind(to_micros(params.release_date))
        .bind(params.ticket_price)
        .bind(to_micros(self.clock.now()))
        .bind(*id.as_uuid())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(*id));
        }

        Ok(())
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        sqlx::query("DELETE FROM movies WHERE id = $1")
            .bind(*id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(map_sqlx_error)?;

        Ok(())
    }
}
