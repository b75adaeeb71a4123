// Static site generation: renders the collection through a Jinja-style
// template and writes the result next to it.

use crate::model::{Movie, Movies};
use minijinja::{context, path_loader, Environment, ErrorKind};
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::debug;

pub const TEMPLATE_NAME: &str = "index_template.html";
pub const OUTPUT_NAME: &str = "index.html";
pub const SITE_TITLE: &str = "My Movie App";

#[derive(Debug, Error)]
pub enum SiteError {
    #[error("index_template.html not found. Make sure the template file exists.")]
    TemplateMissing,

    #[error("could not render template: {0}")]
    Render(#[from] minijinja::Error),

    #[error("could not write {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Renders `index_template.html` from a template directory into
/// `index.html` in the same directory.
#[derive(Debug, Clone)]
pub struct SiteGenerator {
    template_dir: PathBuf,
}

impl SiteGenerator {
    pub fn new(template_dir: impl Into<PathBuf>) -> Self {
        SiteGenerator {
            template_dir: template_dir.into(),
        }
    }

    pub fn output_path(&self) -> PathBuf {
        self.template_dir.join(OUTPUT_NAME)
    }

    /// Render the page as a string without touching the output file.
    pub fn render(&self, movies: &Movies) -> Result<String, SiteError> {
        let mut env = Environment::new();
        env.set_loader(path_loader(&self.template_dir));
        let template = env.get_template(TEMPLATE_NAME).map_err(|e| {
            if e.kind() == ErrorKind::TemplateNotFound {
                SiteError::TemplateMissing
            } else {
                SiteError::Render(e)
            }
        })?;

        let movie_grid: Vec<Movie> = movies
            .iter()
            .map(|(title, details)| Movie::from_entry(title, details))
            .collect();
        Ok(template.render(context! { title => SITE_TITLE, movie_grid => movie_grid })?)
    }

    /// Render and write `index.html`, returning where it was written.
    pub fn generate(&self, movies: &Movies) -> Result<PathBuf, SiteError> {
        let html = self.render(movies)?;
        let path = self.output_path();
        write_file(&path, &html)?;
        debug!(count = movies.len(), "wrote {}", path.display());
        Ok(path)
    }
}

fn write_file(path: &Path, contents: &str) -> Result<(), SiteError> {
    fs::write(path, contents).map_err(|source| SiteError::Io {
        path: path.to_path_buf(),
        source,
    })
}
