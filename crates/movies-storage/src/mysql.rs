use crate::error::{is_unique_violation, map_sqlx_error, Result};
use crate::pool::PoolConfig;
use crate::timestamp::{from_micros, to_micros};
use async_trait::async_trait;
use movies_core::{
    Clock, CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    SystemClock, UpdateMovieParams,
};
use sqlx::mysql::MySqlRow;
use sqlx::{MySqlPool, Row};

/// MySQL implementation of the store contract.
///
/// Expects the `movies` table from `ddl/mysql/movies.sql`: the id is kept in
/// its hyphenated text form and every timestamp as Unix microseconds.
/// Uniqueness is enforced by the primary key; each operation is a single
/// statement on a pooled connection.
#[derive(Debug, Clone)]
pub struct MySqlMoviesStore<C = SystemClock> {
    pool: MySqlPool,
    clock: C,
}

impl MySqlMoviesStore {
    /// Creates a store from an existing MySQL connection pool.
    pub fn new(pool: MySqlPool) -> Self {
        Self::with_clock(pool, SystemClock)
    }

    /// Creates a store by opening a new pool with default settings.
    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, &PoolConfig::default()).await
    }

    /// Creates a store by opening a new pool with the given settings.
    pub async fn connect_with(database_url: &str, config: &PoolConfig) -> Result<Self> {
        let pool = config
            .options::<sqlx::MySql>()
            .connect(database_url)
            .await
            .map_err(map_sqlx_error)?;
        Ok(Self::new(pool))
    }
}

impl<C: Clock> MySqlMoviesStore<C> {
    /// Creates a store that takes its timestamps from `clock`.
    pub fn with_clock(pool: MySqlPool, clock: C) -> Self {
        Self { pool, clock }
    }

    /// Returns a reference to the underlying pool.
    pub fn pool(&self) -> &MySqlPool {
        &self.pool
    }
}

fn movie_from_row(row: &MySqlRow) -> Result<Movie> {
    let id: String = row.try_get("id").map_err(map_sqlx_error)?;
    let id = MovieId::parse(&id).map_err(|e| StoreError::InvalidData(e.to_string()))?;

    Ok(Movie {
        id,
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
impl<C: Clock> ReadMoviesStore for MySqlMoviesStore<C> {
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
            WHERE id = ?
            "#,
        )
        .bind(id.to_hyphenated())
        .fetch_optional(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        let Some(row) = row else {
            return Err(StoreError::NotFound(*id));
        };

        movie_from_row(&row)
    }
}

#[async_trait]
impl<C: Clock> MoviesStore for MySqlMoviesStore<C> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        let movie = params.into_movie(self.clock.now());

        let result = sqlx::query(
            r#"
            INSERT INTO movies
                (id, title, director, release_date, ticket_price, created_at, updated_at)
            VALUES (?, ?, ?, ?, ?, ?, ?)
            "#,
        )
        .bind(movie.id.to_hyphenated())
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
        let now = self.clock.now();

        let result = sqlx::query(
            r#"
            UPDATE movies
            SET title = ?,
                director = ?,
                release_date = ?,
                ticket_price = ?,
                updated_at = GREATEST(updated_at, ?)
            WHERE id = ?
            "#,
        )
        .bind(params.title)
        .bind(params.director)
        .bind(to_micros(params.release_date))
        .bind(params.ticket_price)
        .bind(to_micros(now))
        .bind(id.to_hyphenated())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        if result.rows_affected() == 0 {
            return Err(StoreError::NotFound(*id));
        }

        Ok(())
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        sqlx::query(
            r#"
            DELETE FROM movies
            WHERE id = ?
            "#,
        )
        .bind(id.to_hyphenated())
        .execute(&self.pool)
        .await
        .map_err(map_sqlx_error)?;

        Ok(())
    }
}
