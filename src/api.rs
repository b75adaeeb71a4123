// API client module: a small blocking HTTP client for the OMDb API.
// One GET per lookup; the JSON body is only used to build a `Movie`.

use crate::model::{is_valid_rating, Movie, MISSING_IMDB_ID};
use reqwest::blocking::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::debug;

pub const DEFAULT_OMDB_URL: &str = "http://www.omdbapi.com/";

#[derive(Debug, Error)]
pub enum FetchError {
    #[error("OMDB API key is missing!")]
    MissingApiKey,

    #[error("Could not connect to OMDb API: {0}")]
    Transport(#[source] reqwest::Error),

    #[error("Could not decode JSON response: {0}")]
    Decode(#[source] reqwest::Error),

    /// OMDb answered with `"Response": "False"`.
    #[error("{0}")]
    Api(String),

    #[error("Invalid year format: {0}")]
    InvalidYear(String),

    #[error("Invalid rating format: {0}")]
    InvalidRating(String),
}

/// Anything that can turn a free-text title into a movie record.
pub trait MetadataSource {
    fn fetch(&self, title: &str) -> Result<Movie, FetchError>;
}

/// Raw OMDb response. Every field is optional because error responses
/// only carry `Response` and `Error`.
#[derive(Deserialize, Debug, Default)]
pub struct OmdbResponse {
    #[serde(rename = "Response", default)]
    pub response: String,
    #[serde(rename = "Title")]
    pub title: Option<String>,
    #[serde(rename = "Year")]
    pub year: Option<String>,
    #[serde(rename = "imdbRating")]
    pub imdb_rating: Option<String>,
    #[serde(rename = "Poster")]
    pub poster: Option<String>,
    #[serde(rename = "imdbID")]
    pub imdb_id: Option<String>,
    #[serde(rename = "Error")]
    pub error: Option<String>,
}

impl OmdbResponse {
    /// Map a decoded response into a `Movie`, applying OMDb's "N/A"
    /// conventions.
    pub fn into_movie(self) -> Result<Movie, FetchError> {
        if self.response != "True" {
            return Err(FetchError::Api(
                self.error.unwrap_or_else(|| "Unknown error".into()),
            ));
        }

        let year_str = self.year.unwrap_or_default();
        let year = extract_year(&year_str).ok_or(FetchError::InvalidYear(year_str))?;

        let rating = match self.imdb_rating.as_deref() {
            None | Some("N/A") | Some("") => 0.0,
            Some(r) => r
                .trim()
                .parse::<f64>()
                .ok()
                .filter(|rating| is_valid_rating(*rating))
                .ok_or_else(|| FetchError::InvalidRating(r.to_string()))?,
        };

        let poster_url = self.poster.filter(|p| p != "N/A" && !p.is_empty());
        let imdb_id = self
            .imdb_id
            .filter(|id| !id.is_empty())
            .unwrap_or_else(|| MISSING_IMDB_ID.to_string());

        Ok(Movie {
            title: self.title.unwrap_or_default(),
            year,
            rating,
            poster_url,
            imdb_id,
        })
    }
}

/// Leading run of digits in an OMDb year string. Series report ranges
/// such as "2010–2015" (sometimes with a mis-encoded dash), so anything
/// after the digits is ignored.
pub fn extract_year(year_str: &str) -> Option<i32> {
    let trimmed = year_str.trim();
    let end = trimmed
        .find(|c: char| !c.is_ascii_digit())
        .unwrap_or(trimmed.len());
    trimmed[..end].parse().ok()
}

/// Blocking OMDb client holding the HTTP client, endpoint and API key.
#[derive(Clone)]
pub struct OmdbClient {
    client: Client,
    base_url: String,
    api_key: Option<String>,
}

impl OmdbClient {
    pub fn new(base_url: impl Into<String>, api_key: Option<String>) -> Result<Self, FetchError> {
        let client = Client::builder().build().map_err(FetchError::Transport)?;
        Ok(OmdbClient {
            client,
            base_url: base_url.into(),
            api_key: api_key.filter(|k| !k.trim().is_empty()),
        })
    }

    pub fn has_api_key(&self) -> bool {
        self.api_key.is_some()
    }
}

impl MetadataSource for OmdbClient {
    fn fetch(&self, title: &str) -> Result<Movie, FetchError> {
        let api_key = self.api_key.as_deref().ok_or(FetchError::MissingApiKey)?;
        debug!(%title, url = %self.base_url, "querying OMDb");

        let res = self
            .client
            .get(&self.base_url)
            .query(&[("apikey", api_key), ("t", title)])
            .send()
            .and_then(|r| r.error_for_status())
            .map_err(FetchError::Transport)?;
        let body: OmdbResponse = res.json().map_err(FetchError::Decode)?;
        body.into_movie()
    }
}
