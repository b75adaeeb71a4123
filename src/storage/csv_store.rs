use super::{ensure_file, MovieStorage, Result};
use crate::model::{MovieDetails, Movies};
use csv::{ReaderBuilder, WriterBuilder};
use serde::{Deserialize, Serialize};
use std::fs::File;
use std::path::{Path, PathBuf};
use tracing::debug;

const HEADER: [&str; 5] = ["Title", "Year", "Rating", "Poster URL", "IMDB ID"];

/// One line of the CSV file.
#[derive(Serialize, Deserialize, Debug)]
struct CsvRow {
    #[serde(rename = "Title")]
    title: String,
    #[serde(rename = "Year")]
    year: i32,
    #[serde(rename = "Rating")]
    rating: f64,
    #[serde(rename = "Poster URL")]
    poster_url: Option<String>,
    #[serde(rename = "IMDB ID")]
    imdb_id: String,
}

/// Collection stored as a CSV table with a header row.
#[derive(Debug, Clone)]
pub struct CsvStorage {
    path: PathBuf,
    unique_ids: bool,
}

impl CsvStorage {
    /// Open (and if necessary create) the CSV file at `path`.
    pub fn open(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        ensure_file(&path, format!("{}\n", HEADER.join(",")).as_bytes())?;
        Ok(CsvStorage {
            path,
            unique_ids: true,
        })
    }

    /// Accept several movies with the same IMDb id, as older versions of
    /// the tabular format did.
    pub fn allow_duplicate_ids(mut self) -> Self {
        self.unique_ids = false;
        self
    }
}

impl MovieStorage for CsvStorage {
    fn path(&self) -> &Path {
        &self.path
    }

    fn rejects_duplicate_ids(&self) -> bool {
        self.unique_ids
    }

    fn load(&self) -> Result<Movies> {
        debug!("reading {}", self.path.display());
        let file = File::open(&self.path)?;
        let mut reader = ReaderBuilder::new().has_headers(true).from_reader(file);
        let mut movies = Movies::new();
        for row in reader.deserialize() {
            let row: CsvRow = row?;
            // Repeated titles collapse to the last row, matching a re-read
            // of a file written without duplicate checks.
            movies.insert(
                row.title,
                MovieDetails {
                    year: row.year,
                    rating: row.rating,
                    // Older files spell a missing poster as "None".
                    poster_url: row.poster_url.filter(|url| !url.is_empty() && url != "None"),
                    imdb_id: row.imdb_id,
                },
            );
        }
        Ok(movies)
    }

    fn save(&self, movies: &Movies) -> Result<()> {
        let mut writer = WriterBuilder::new().has_headers(false).from_path(&self.path)?;
        writer.write_record(HEADER)?;
        for (title, details) in movies {
            writer.serialize(CsvRow {
                title: title.clone(),
                year: details.year,
                rating: details.rating,
                poster_url: details.poster_url.clone(),
                imdb_id: details.imdb_id.clone(),
            })?;
        }
        writer.flush()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Movie;
    use std::fs;

    fn movie(title: &str, imdb_id: &str) -> Movie {
        Movie {
            title: title.into(),
            year: 1999,
            rating: 8.7,
            poster_url: None,
            imdb_id: imdb_id.into(),
        }
    }

    #[test]
    fn new_file_has_only_the_header() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStorage::open(dir.path().join("u.csv")).unwrap();
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Title,Year,Rating,Poster URL,IMDB ID\n");
    }

    #[test]
    fn header_survives_deleting_the_last_movie() {
        let dir = tempfile::tempdir().unwrap();
        let store = CsvStorage::open(dir.path().join("u.csv")).unwrap();
        assert!(store.add(movie("The Matrix", "tt0133093")));
        assert!(store.delete("The Matrix"));
        let text = fs::read_to_string(store.path()).unwrap();
        assert_eq!(text, "Title,Year,Rating,Poster URL,IMDB ID\n");
    }

    #[test]
    fn reads_rows_with_blank_lines_and_empty_poster() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.csv");
        fs::write(
            &path,
            "Title,Year,Rating,Poster URL,IMDB ID\n\
             Alien,1979,8.5,,tt0078748\n\
             \n\
             \"Crouching Tiger, Hidden Dragon\",2000,7.9,https://example.com/ct.jpg,tt0190332\n",
        )
        .unwrap();
        let store = CsvStorage::open(&path).unwrap();
        let movies = store.list();

        assert_eq!(movies.len(), 2);
        assert_eq!(movies["Alien"].poster_url, None);
        assert_eq!(
            movies["Crouching Tiger, Hidden Dragon"].poster_url.as_deref(),
            Some("https://example.com/ct.jpg")
        );
    }

    #[test]
    fn none_poster_from_older_files_reads_as_missing() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.csv");
        fs::write(&path, "Title,Year,Rating,Poster URL,IMDB ID\nAlien,1979,8.5,None,tt0078748\n").unwrap();
        let store = CsvStorage::open(&path).unwrap();
        assert_eq!(store.list()["Alien"].poster_url, None);
    }

    #[test]
    fn malformed_row_lists_empty() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("u.csv");
        fs::write(&path, "Title,Year,Rating,Poster URL,IMDB ID\nAlien,nineteen,8.5,,tt1\n").unwrap();
        let store = CsvStorage::open(&path).unwrap();
        assert!(store.list().is_empty());
    }

    #[test]
    fn rejects_duplicate_ids_unless_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let strict = CsvStorage::open(dir.path().join("strict.csv")).unwrap();
        assert!(strict.add(movie("The Matrix", "tt0133093")));
        assert!(!strict.add(movie("Matrix, The", "tt0133093")));
        assert_eq!(strict.list().len(), 1);

        let legacy = CsvStorage::open(dir.path().join("legacy.csv"))
            .unwrap()
            .allow_duplicate_ids();
        assert!(legacy.add(movie("The Matrix", "tt0133093")));
        assert!(legacy.add(movie("Matrix, The", "tt0133093")));
        assert_eq!(legacy.list().len(), 2);
    }
}
