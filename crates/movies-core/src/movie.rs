use crate::movie_id::MovieId;
use jiff::Timestamp;
use serde::{Deserialize, Serialize};

/// A stored movie record.
///
/// `created_at` and `updated_at` are owned by the store: they are set from
/// the store's clock and never taken from caller input.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Movie {
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl Movie {
    /// Overwrites the mutable fields with `params` and bumps `updated_at`.
    ///
    /// `updated_at` never moves backwards, even if `now` is earlier than
    /// the previously stored value.
    pub fn apply(&mut self, params: UpdateMovieParams, now: Timestamp) {
        self.title = params.title;
        self.director = params.director;
        self.release_date = params.release_date;
        self.ticket_price = params.ticket_price;
        self.updated_at = self.updated_at.max(now);
    }
}

/// Caller-supplied fields for a new movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CreateMovieParams {
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
}

impl CreateMovieParams {
    /// Builds the record to persist, stamping both timestamps with `now`.
    pub fn into_movie(self, now: Timestamp) -> Movie {
        Movie {
            id: self.id,
            title: self.title,
            director: self.director,
            release_date: self.release_date,
            ticket_price: self.ticket_price,
            created_at: now,
            updated_at: now,
        }
    }
}

/// Caller-supplied replacement values for an existing movie.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateMovieParams {
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
}
