use super::{ensure_file, MovieStorage, Result};
use crate::model::Movies;
use serde::Serialize;
use serde_json::ser::{PrettyFormatter, Serializer};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::debug;

/// Collection stored as a JSON object mapping titles to their details.
#[derive(Debug, Clone)]
pub struct JsonStorage {
    path: PathBuf,
}

impl JsonStorage {
    /// Open (and if necessary create) the JSON file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_file(&path, b"{}")?;
        Ok(JsonStorage { path })
    }
}

impl MovieStorage for JsonStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn load(&self) -> Result<Movies> {
        debug!("reading {}", self.path.display());
        let data = fs::read_to_string(&self.path)?;
        Ok(serde_json::from_str(&data)?)
    }

    fn save(&self, movies: &Movies) -> Result<()> {
        let mut buf = Vec::new();
        let mut ser = Serializer::with_formatter(&mut buf, PrettyFormatter::with_indent(b"    "));
        movies.serialize(&mut ser)?;
        fs::write(&self.path, buf)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Movie;

    fn inception() -> Movie {
        Movie {
            title: "Inception".into(),
            year: 2010,
            rating: 8.8,
            poster_url: Some("https://example.com/inception.jpg".into()),
            imdb_id: "tt1375666".into(),
        }
    }

    #[test]
    fn writes_title_keyed_object() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStorage::open(dir.path().join("u.json")).unwrap();
        assert!(store.add(inception()));

        let raw: serde_json::Value =
            serde_json::from_str(&fs::read_to_string(store.path()).unwrap()).unwrap();
        assert_eq!(raw["Inception"]["year"], 2010);
        assert_eq!(raw["Inception"]["rating"], 8.8);
        assert_eq!(raw["Inception"]["poster_url"], "https://example.com/inception.jpg");
        assert_eq!(raw["Inception"]["imdb_id"], "tt1375666");
    }

    #[test]
    fn missing_poster_is_written_as_null() {
        let dir = tempfile::tempdir().unwrap();
        let store = JsonStorage::open(dir.path().join("u.json")).unwrap();
        let mut movie = inception();
        movie.poster_url = None;
        assert!(store.add(movie));

        let text = fs::read_to_string(store.path()).unwrap();
        assert!(text.contains("\"poster_url\": null"));
        assert!(text.contains("\n        \"year\": 2010"));
    }

    #[test]
    fn creates_parent_directory() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("u.json");
        let store = JsonStorage::open(&path).unwrap();
        assert_eq!(fs::read_to_string(path).unwrap(), "{}");
        assert!(store.list().is_empty());
    }

    #[test]
    fn malformed_file_lists_empty_and_is_not_overwritten() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.json");
        fs::write(&path, "{ not json").unwrap();
        let store = JsonStorage::open(&path).unwrap();

        assert!(store.list().is_empty());
        assert!(!store.add(inception()));
        assert_eq!(fs::read_to_string(&path).unwrap(), "{ not json");
    }
}
