use jiff::Timestamp;
use movies_core::{CoreError, CreateMovieParams, Movie, MovieId, UpdateMovieParams};
use serde::{Deserialize, Serialize};

#[derive(Debug, Deserialize)]
pub struct CreateMovieRequest {
    /// Parsed separately so a bad id is reported as such instead of as a
    /// generic body error.
    pub id: String,
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
}

impl TryFrom<CreateMovieRequest> for CreateMovieParams {
    type Error = CoreError;

    fn try_from(request: CreateMovieRequest) -> Result<Self, Self::Error> {
        Ok(CreateMovieParams {
            id: request.id.parse()?,
            title: request.title,
            director: request.director,
            release_date: request.release_date,
            ticket_price: request.ticket_price,
        })
    }
}

#[derive(Debug, Deserialize)]
pub struct UpdateMovieRequest {
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
}

impl From<UpdateMovieRequest> for UpdateMovieParams {
    fn from(request: UpdateMovieRequest) -> Self {
        UpdateMovieParams {
            title: request.title,
            director: request.director,
            release_date: request.release_date,
            ticket_price: request.ticket_price,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct MovieResponse {
    pub id: MovieId,
    pub title: String,
    pub director: String,
    pub release_date: Timestamp,
    pub ticket_price: f64,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

impl From<Movie> for MovieResponse {
    fn from(movie: Movie) -> Self {
        MovieResponse {
            id: movie.id,
            title: movie.title,
            director: movie.director,
            release_date: movie.release_date,
            ticket_price: movie.ticket_price,
            created_at: movie.created_at,
            updated_at: movie.updated_at,
        }
    }
}

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ErrorResponse {
    pub status: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn create_request_normalizes_release_date_to_utc() {
        let request: CreateMovieRequest = serde_json::from_str(
            r#"{
                "id": "11111111-1111-1111-1111-111111111111",
                "title": "Inception",
                "director": "Christopher Nolan",
                "release_date": "2010-07-16T02:00:00+02:00",
                "ticket_price": 12.5
            }"#,
        )
        .unwrap();

        let params = CreateMovieParams::try_from(request).unwrap();
        assert_eq!(
            params.release_date,
            "2010-07-16T00:00:00Z".parse::<Timestamp>().unwrap()
        );
    }

    #[test]
    fn create_request_with_bad_id_is_rejected() {
        let request = CreateMovieRequest {
            id: "not-a-uuid".to_string(),
            title: "Inception".to_string(),
            director: "Christopher Nolan".to_string(),
            release_date: Timestamp::UNIX_EPOCH,
            ticket_price: 12.5,
        };

        assert!(matches!(
            CreateMovieParams::try_from(request),
            Err(CoreError::InvalidMovieId(_))
        ));
    }
}
