use crate::error::{is_duplicate_key, map_mongo_error, Result};
use crate::pool::PoolConfig;
use crate::timestamp::{from_micros, to_micros};
use async_trait::async_trait;
use mongodb::bson::doc;
use mongodb::options::{ClientOptions, ServerApi, ServerApiVersion};
use mongodb::{Client, Collection, Database};
use movies_core::{
    Clock, CreateMovieParams, Movie, MovieId, MoviesStore, ReadMoviesStore, StoreError,
    SystemClock, UpdateMovieParams,
};
use serde::{Deserialize, Serialize};

/// Database used when the connection string names none.
pub const DEFAULT_DATABASE: &str = "movies";
pub const MOVIES_COLLECTION: &str = "movies";

/// Stored shape of a movie: the id doubles as `_id`, timestamps are Unix
/// microseconds.
#[derive(Debug, Serialize, Deserialize)]
struct MovieDocument {
    #[serde(rename = "_id")]
    id: String,
    title: String,
    director: String,
    release_date: i64,
    ticket_price: f64,
    created_at: i64,
    updated_at: i64,
}

impl From<&Movie> for MovieDocument {
    fn from(movie: &Movie) -> Self {
        Self {
            id: movie.id.to_hyphenated(),
            title: movie.title.clone(),
            director: movie.director.clone(),
            release_date: to_micros(movie.release_date),
            ticket_price: movie.ticket_price,
            created_at: to_micros(movie.created_at),
            updated_at: to_micros(movie.updated_at),
        }
    }
}

impl TryFrom<MovieDocument> for Movie {
    type Error = StoreError;

    fn try_from(document: MovieDocument) -> Result<Self> {
        Ok(Movie {
            id: MovieId::parse(&document.id)
                .map_err(|e| StoreError::InvalidData(e.to_string()))?,
            title: document.title,
            director: document.director,
            release_date: from_micros("release_date", document.release_date)?,
            ticket_price: document.ticket_price,
            created_at: from_micros("created_at", document.created_at)?,
            updated_at: from_micros("updated_at", document.updated_at)?,
        })
    }
}

/// MongoDB implementation of the store contract.
///
/// Movies live in the `movies` collection keyed by `_id`, so the server's
/// primary index enforces uniqueness. The client keeps its own connection
/// pool; every operation is a single command.
#[derive(Debug, Clone)]
pub struct MongoMoviesStore<C = SystemClock> {
    database: Database,
    collection: Collection<MovieDocument>,
    clock: C,
}

impl MongoMoviesStore {
    pub fn new(database: &Database) -> Self {
        Self::with_clock(database, SystemClock)
    }

    pub async fn connect(database_url: &str) -> Result<Self> {
        Self::connect_with(database_url, &PoolConfig::default()).await
    }

    /// Opens a client with the given pool settings and pings the server.
    ///
    /// The database comes from the connection string's path, falling back to
    /// [`DEFAULT_DATABASE`].
    pub async fn connect_with(database_url: &str, config: &PoolConfig) -> Result<Self> {
        let mut options = ClientOptions::parse(database_url)
            .await
            .map_err(map_mongo_error)?;
        options.server_api = Some(ServerApi::builder().version(ServerApiVersion::V1).build());
        options.max_pool_size = Some(config.max_connections);
        options.min_pool_size = Some(config.min_connections);
        options.server_selection_timeout = Some(config.acquire_timeout);

        let client = Client::with_options(options).map_err(map_mongo_error)?;
        let database = client
            .default_database()
            .unwrap_or_else(|| client.database(DEFAULT_DATABASE));

        database
            .run_command(doc! { "ping": 1 })
            .await
            .map_err(map_mongo_error)?;

        Ok(Self::new(&database))
    }
}

impl<C: Clock> MongoMoviesStore<C> {
    /// Creates a store over `database` that takes its timestamps from `clock`.
    pub fn with_clock(database: &Database, clock: C) -> Self {
        Self {
            database: database.clone(),
            collection: database.collection(MOVIES_COLLECTION),
            clock,
        }
    }

    pub fn database(&self) -> &Database {
        &self.database
    }
}

#[async_trait]
impl<C: Clock> ReadMoviesStore for MongoMoviesStore<C> {
    async fn get_all(&self) -> Result<Vec<Movie>> {
        let mut cursor = self
            .collection
            .find(doc! {})
            .await
            .map_err(map_mongo_error)?;

        let mut movies = Vec::new();
        while cursor.advance().await.map_err(map_mongo_error)? {
            let document = cursor.deserialize_current().map_err(map_mongo_error)?;
            movies.push(Movie::try_from(document)?);
        }

        Ok(movies)
    }

    async fn get_by_id(&self, id: &MovieId) -> Result<Movie> {
        let document = self
            .collection
            .find_one(doc! { "_id": id.to_hyphenated() })
            .await
            .map_err(map_mongo_error)?;

        match document {
            Some(document) => Movie::try_from(document),
            None => Err(StoreError::NotFound(*id)),
        }
    }
}

#[async_trait]
impl<C: Clock> MoviesStore for MongoMoviesStore<C> {
    async fn create(&self, params: CreateMovieParams) -> Result<()> {
        let movie = params.into_movie(self.clock.now());

        match self.collection.insert_one(MovieDocument::from(&movie)).await {
            Ok(_) => Ok(()),
            Err(err) if is_duplicate_key(&err) => Err(StoreError::DuplicateKey(movie.id)),
            Err(err) => Err(map_mongo_error(err)),
        }
    }

    async fn update(&self, id: &MovieId, params: UpdateMovieParams) -> Result<()> {
        let update = doc! {
            "$set": {
                "title": params.title,
                "director": params.director,
                "release_date": to_micros(params.release_date),
                "ticket_price": params.ticket_price,
            },
            "$max": { "updated_at": to_micros(self.clock.now()) },
        };

        let result = self
            .collection
            .update_one(doc! { "_id": id.to_hyphenated() }, update)
            .await
            .map_err(map_mongo_error)?;

        if result.matched_count == 0 {
            return Err(StoreError::NotFound(*id));
        }

        Ok(())
    }

    async fn delete(&self, id: &MovieId) -> Result<()> {
        self.collection
            .delete_one(doc! { "_id": id.to_hyphenated() })
            .await
            .map_err(map_mongo_error)?;

        Ok(())
    }
}
