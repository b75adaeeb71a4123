// Data model shared by the storage backends, the OMDb client and the UI.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

/// Sentinel stored when the metadata source returns no IMDb id.
pub const MISSING_IMDB_ID: &str = "No IMDb ID available";

/// Ratings are on IMDb's 0–10 scale.
pub const MAX_RATING: f64 = 10.0;

/// Whether `rating` is a finite value in `0.0..=10.0`. Anything else
/// cannot be stored (JSON has no NaN or infinity).
pub fn is_valid_rating(rating: f64) -> bool {
    rating.is_finite() && (0.0..=MAX_RATING).contains(&rating)
}

/// A collection keyed by title. Insertion order is kept so unsorted
/// listings come out in the order movies were added.
pub type Movies = IndexMap<String, MovieDetails>;

/// Everything stored for a movie except its title, which is the map key.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct MovieDetails {
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
    pub imdb_id: String,
}

/// A complete movie record, as produced by the metadata fetcher.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Movie {
    pub title: String,
    pub year: i32,
    pub rating: f64,
    pub poster_url: Option<String>,
    pub imdb_id: String,
}

impl Movie {
    /// Split into the map key and the stored value.
    pub fn into_entry(self) -> (String, MovieDetails) {
        (
            self.title,
            MovieDetails {
                year: self.year,
                rating: self.rating,
                poster_url: self.poster_url,
                imdb_id: self.imdb_id,
            },
        )
    }

    pub fn from_entry(title: &str, details: &MovieDetails) -> Self {
        Movie {
            title: title.to_string(),
            year: details.year,
            rating: details.rating,
            poster_url: details.poster_url.clone(),
            imdb_id: details.imdb_id.clone(),
        }
    }
}
