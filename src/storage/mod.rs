// Storage layer: one `MovieStorage` capability with a CSV and a JSON
// adapter. Adapters only know how to read and write their file format;
// the collection-level operations are provided methods on the trait so
// both backends behave the same way.

mod csv_store;
mod json_store;

pub use csv_store::CsvStorage;
pub use json_store::JsonStorage;

use crate::model::{is_valid_rating, Movie, MovieDetails, Movies};
use std::fs;
use std::io;
use std::path::Path;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, error, warn};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("malformed CSV data: {0}")]
    Csv(#[from] csv::Error),

    #[error("malformed JSON data: {0}")]
    Json(#[from] serde_json::Error),
}

impl StorageError {
    pub fn is_not_found(&self) -> bool {
        matches!(self, StorageError::Io(e) if e.kind() == io::ErrorKind::NotFound)
    }
}

pub type Result<T> = std::result::Result<T, StorageError>;

/// The two on-disk formats a collection can live in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum StorageKind {
    #[default]
    Json,
    Csv,
}

impl StorageKind {
    pub fn extension(self) -> &'static str {
        match self {
            StorageKind::Json => "json",
            StorageKind::Csv => "csv",
        }
    }

    /// Open the backend for `username` inside `data_dir`, creating an empty
    /// backend file on first use.
    pub fn open_for_user(self, data_dir: &Path, username: &str) -> Result<Box<dyn MovieStorage>> {
        let path = data_dir.join(format!("{}.{}", username, self.extension()));
        Ok(match self {
            StorageKind::Json => Box::new(JsonStorage::open(path)?),
            StorageKind::Csv => Box::new(CsvStorage::open(path)?),
        })
    }
}

impl FromStr for StorageKind {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "json" => Ok(StorageKind::Json),
            "csv" => Ok(StorageKind::Csv),
            other => Err(format!("unknown storage backend '{}'", other)),
        }
    }
}

/// Persistence for one user's movie collection.
///
/// Implementors provide `load`/`save` for their file format. The
/// collection operations never fail the caller: problems are logged and
/// turned into an empty collection or `false`.
pub trait MovieStorage {
    /// Location of the backing file.
    fn path(&self) -> &Path;

    /// Read the whole collection from disk.
    fn load(&self) -> Result<Movies>;

    /// Replace the backing file with `movies`.
    fn save(&self, movies: &Movies) -> Result<()>;

    /// Whether `add` refuses a movie whose IMDb id is already stored.
    fn rejects_duplicate_ids(&self) -> bool {
        true
    }

    /// All stored movies, or an empty collection if the file is missing or
    /// cannot be parsed.
    fn list(&self) -> Movies {
        match self.load() {
            Ok(movies) => movies,
            Err(e) if e.is_not_found() => {
                warn!("File not found: {}", self.path().display());
                Movies::new()
            }
            Err(e) => {
                error!("Could not read movies from {}: {}", self.path().display(), e);
                Movies::new()
            }
        }
    }

    /// Whether a stored movie already carries this IMDb id.
    fn contains_imdb_id(&self, imdb_id: &str) -> bool {
        self.list().values().any(|d| d.imdb_id == imdb_id)
    }

    /// Store `movie`. Returns `false` if it was rejected or could not be
    /// written.
    fn add(&self, movie: Movie) -> bool {
        if !is_valid_rating(movie.rating) {
            warn!("Movie '{}' has an invalid rating: {}", movie.title, movie.rating);
            return false;
        }
        let Some(mut movies) = load_for_update(self) else {
            return false;
        };
        if self.rejects_duplicate_ids() && movies.values().any(|d| d.imdb_id == movie.imdb_id) {
            warn!("Movie '{}' is already in the database.", movie.title);
            return false;
        }
        let (title, details) = movie.into_entry();
        movies.insert(title, details);
        persist(self, &movies)
    }

    /// Remove the movie with exactly this title.
    fn delete(&self, title: &str) -> bool {
        let Some(mut movies) = load_for_update(self) else {
            return false;
        };
        if movies.shift_remove(title).is_none() {
            warn!("Movie '{}' not found in the database.", title);
            return false;
        }
        persist(self, &movies)
    }

    /// Rename and re-rate a movie. Poster URL and IMDb id are kept.
    /// Renaming onto another stored title is refused.
    fn update(&self, title: &str, new_title: &str, new_year: i32, new_rating: f64) -> bool {
        if !is_valid_rating(new_rating) {
            warn!("Movie '{}' has an invalid rating: {}", title, new_rating);
            return false;
        }
        let Some(mut movies) = load_for_update(self) else {
            return false;
        };
        let Some(old) = movies.get(title).cloned() else {
            warn!("Movie '{}' not found in the database.", title);
            return false;
        };
        if title != new_title && movies.contains_key(new_title) {
            warn!("Cannot rename '{}': '{}' is already in the database.", title, new_title);
            return false;
        }
        if title != new_title {
            movies.shift_remove(title);
        }
        movies.insert(
            new_title.to_string(),
            MovieDetails {
                year: new_year,
                rating: new_rating,
                poster_url: old.poster_url,
                imdb_id: old.imdb_id,
            },
        );
        persist(self, &movies)
    }
}

/// Load ahead of a mutation. A missing file counts as empty; a file we
/// cannot parse is left alone rather than overwritten.
fn load_for_update<S: MovieStorage + ?Sized>(store: &S) -> Option<Movies> {
    match store.load() {
        Ok(movies) => Some(movies),
        Err(e) if e.is_not_found() => Some(Movies::new()),
        Err(e) => {
            error!("Could not read movies from {}: {}", store.path().display(), e);
            None
        }
    }
}

fn persist<S: MovieStorage + ?Sized>(store: &S, movies: &Movies) -> bool {
    match store.save(movies) {
        Ok(()) => {
            debug!(count = movies.len(), "saved movies to {}", store.path().display());
            true
        }
        Err(e) => {
            error!("Error saving to file {}: {}", store.path().display(), e);
            false
        }
    }
}

/// Make sure the parent directory exists and, if the file is missing,
/// create it with `initial` as its content.
fn ensure_file(path: &Path, initial: &[u8]) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        fs::create_dir_all(dir)?;
    }
    if !path.exists() {
        debug!("creating empty backend file {}", path.display());
        fs::write(path, initial)?;
    }
    Ok(())
}
