// UI layer: the interactive movie menu. Input goes through the `Prompt`
// trait (backed by `dialoguer` on a terminal) and output through any
// `io::Write`, so the whole loop can be driven from tests.

use crate::api::MetadataSource;
use crate::model::MovieDetails;
use crate::stats::{rating_stats, search, sorted_by_rating, SortOrder};
use crate::storage::MovieStorage;
use crate::website::{SiteError, SiteGenerator};
use anyhow::{Context, Result};
use crossterm::style::Stylize;
use crossterm::tty::IsTty;
use dialoguer::Input;
use indicatif::{ProgressBar, ProgressStyle};
use rand::Rng;
use std::io::{self, Write};
use std::str::FromStr;
use std::time::Duration;
use tracing::debug;

/// Source of answers to the menu's questions.
pub trait Prompt {
    fn ask(&mut self, prompt: &str) -> Result<String>;
}

/// Reads answers from the terminal with `dialoguer`.
pub struct TerminalPrompt;

impl Prompt for TerminalPrompt {
    fn ask(&mut self, prompt: &str) -> Result<String> {
        let answer: String = Input::new()
            .with_prompt(prompt)
            .allow_empty(true)
            .interact_text()
            .context("Failed to read from terminal")?;
        Ok(answer)
    }
}

/// Menu entries, keyed by the number the user types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    List,
    Add,
    Delete,
    Stats,
    GenerateWebsite,
    Random,
    Search,
    SortByRating,
    Exit,
}

impl FromStr for Command {
    type Err = ();

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s.trim() {
            "1" => Command::List,
            "2" => Command::Add,
            "3" => Command::Delete,
            "4" => Command::Stats,
            "5" => Command::GenerateWebsite,
            "6" => Command::Random,
            "7" => Command::Search,
            "8" => Command::SortByRating,
            "0" => Command::Exit,
            _ => return Err(()),
        })
    }
}

const MENU: &[&str] = &[
    "1. List movies",
    "2. Add movie",
    "3. Delete movie",
    "4. Movie stats",
    "5. Generate website",
    "6. Random movie",
    "7. Search movie",
    "8. Movies sorted by rating",
    "0. Exit",
];

/// The movie application: a storage handle, a metadata source and a
/// site generator behind a numbered menu.
pub struct MovieApp<W: Write = io::Stdout> {
    storage: Box<dyn MovieStorage>,
    fetcher: Box<dyn MetadataSource>,
    site: SiteGenerator,
    prompt: Box<dyn Prompt>,
    out: W,
    styled: bool,
}

impl MovieApp<io::Stdout> {
    /// App wired to the terminal.
    pub fn new(
        storage: Box<dyn MovieStorage>,
        fetcher: Box<dyn MetadataSource>,
        site: SiteGenerator,
    ) -> Self {
        let styled = io::stdout().is_tty();
        let mut app =
            MovieApp::with_io(storage, fetcher, site, Box::new(TerminalPrompt), io::stdout());
        app.styled = styled;
        app
    }
}

impl<W: Write> MovieApp<W> {
    pub fn with_io(
        storage: Box<dyn MovieStorage>,
        fetcher: Box<dyn MetadataSource>,
        site: SiteGenerator,
        prompt: Box<dyn Prompt>,
        out: W,
    ) -> Self {
        MovieApp {
            storage,
            fetcher,
            site,
            prompt,
            out,
            styled: false,
        }
    }

    /// Consume the app and hand back its output sink.
    pub fn into_output(self) -> W {
        self.out
    }

    /// Main loop. Shows the menu until the user picks "0". Only terminal
    /// I/O failures end it early; storage and network problems are
    /// reported and the menu comes back.
    pub fn run(&mut self) -> Result<()> {
        loop {
            self.heading("*** Movie App Menu ***")?;
            for line in MENU {
                writeln!(self.out, "{}", line)?;
            }
            let choice = self.prompt.ask("Enter your choice (0-8)")?;
            match choice.parse::<Command>() {
                Ok(Command::Exit) => {
                    writeln!(self.out, "Exiting the movie app.")?;
                    break;
                }
                Ok(command) => self.dispatch(command)?,
                Err(()) => writeln!(self.out, "Invalid choice, please try again.")?,
            }
        }
        Ok(())
    }

    /// Run a single command.
    pub fn dispatch(&mut self, command: Command) -> Result<()> {
        debug!(?command, "dispatching");
        match command {
            Command::List => self.list_movies(),
            Command::Add => self.add_movie(),
            Command::Delete => self.delete_movie(),
            Command::Stats => self.movie_stats(),
            Command::GenerateWebsite => self.generate_website(),
            Command::Random => self.random_movie(),
            Command::Search => self.search_movie(),
            Command::SortByRating => self.sort_movies(),
            Command::Exit => Ok(()),
        }
    }

    fn list_movies(&mut self) -> Result<()> {
        let movies = self.storage.list();
        if movies.is_empty() {
            writeln!(self.out, "No movies found.")?;
            return Ok(());
        }
        for (title, movie) in &movies {
            writeln!(
                self.out,
                "{}: {:.1} ({}) - Poster: {}",
                title,
                movie.rating,
                movie.year,
                movie.poster_url.as_deref().unwrap_or("None")
            )?;
        }
        Ok(())
    }

    fn add_movie(&mut self) -> Result<()> {
        let title = self.prompt.ask("Enter the movie title")?;
        let title = title.trim();
        if title.is_empty() {
            writeln!(self.out, "Title cannot be empty.")?;
            return Ok(());
        }

        let spinner = ProgressBar::new_spinner();
        spinner.set_style(
            ProgressStyle::with_template("{spinner} {msg}")
                .unwrap_or_else(|_| ProgressStyle::default_spinner()),
        );
        spinner.set_message(format!("Looking up '{}'...", title));
        spinner.enable_steady_tick(Duration::from_millis(100));
        let fetched = self.fetcher.fetch(title);
        spinner.finish_and_clear();

        match fetched {
            Ok(movie) => {
                let name = movie.title.clone();
                if self.storage.rejects_duplicate_ids()
                    && self.storage.contains_imdb_id(&movie.imdb_id)
                {
                    writeln!(self.out, "Movie '{}' is already in the database.", name)?;
                } else if self.storage.add(movie) {
                    writeln!(self.out, "Movie '{}' added successfully!", name)?;
                } else {
                    writeln!(self.out, "Movie '{}' could not be saved.", name)?;
                }
            }
            Err(e) => writeln!(self.out, "Error: {}", e)?,
        }
        Ok(())
    }

    fn delete_movie(&mut self) -> Result<()> {
        if self.storage.list().is_empty() {
            writeln!(self.out, "No movies to delete.")?;
            return Ok(());
        }
        let title = self.prompt.ask("Enter movie title to delete")?;
        let title = title.trim();
        if self.storage.delete(title) {
            writeln!(self.out, "Movie '{}' deleted successfully.", title)?;
        } else {
            writeln!(self.out, "Movie '{}' not found.", title)?;
        }
        Ok(())
    }

    fn movie_stats(&mut self) -> Result<()> {
        let Some(stats) = rating_stats(&self.storage.list()) else {
            writeln!(self.out, "No movies to calculate stats.")?;
            return Ok(());
        };
        self.heading("Movie Stats:")?;
        writeln!(self.out, "  Average rating: {:.2}", stats.average)?;
        writeln!(self.out, "  Median rating: {:.2}", stats.median)?;
        writeln!(self.out, "  Best movie: {}, {:.1}", stats.best.0, stats.best.1)?;
        writeln!(self.out, "  Worst movie: {}, {:.1}", stats.worst.0, stats.worst.1)?;
        Ok(())
    }

    fn generate_website(&mut self) -> Result<()> {
        let movies = self.storage.list();
        if movies.is_empty() {
            writeln!(self.out, "No movies to display.")?;
            return Ok(());
        }
        match self.site.generate(&movies) {
            Ok(_) => writeln!(self.out, "Website was generated successfully.")?,
            Err(e @ SiteError::TemplateMissing) => writeln!(self.out, "Error: {}", e)?,
            Err(e) => writeln!(self.out, "An error occurred: {}", e)?,
        }
        Ok(())
    }

    fn random_movie(&mut self) -> Result<()> {
        let movies = self.storage.list();
        if movies.is_empty() {
            writeln!(self.out, "No movies in the database.")?;
            return Ok(());
        }
        let index = rand::thread_rng().gen_range(0..movies.len());
        if let Some((title, movie)) = movies.get_index(index) {
            writeln!(
                self.out,
                "Your movie for tonight: {}, it's rated {:.1}",
                title, movie.rating
            )?;
        }
        Ok(())
    }

    fn search_movie(&mut self) -> Result<()> {
        let movies = self.storage.list();
        if movies.is_empty() {
            writeln!(self.out, "No movies found.")?;
            return Ok(());
        }
        let term = self.prompt.ask("Enter search term")?;
        let found = search(&movies, term.trim());
        if found.is_empty() {
            writeln!(self.out, "No movies found.")?;
            return Ok(());
        }
        writeln!(self.out, "Found movies:")?;
        self.print_short(&found)
    }

    fn sort_movies(&mut self) -> Result<()> {
        let movies = self.storage.list();
        if movies.is_empty() {
            writeln!(self.out, "No movies to sort.")?;
            return Ok(());
        }
        let answer = self.prompt.ask("Sort order (A/D)")?;
        let order = match SortOrder::parse(&answer) {
            Some(order) => order,
            None => {
                writeln!(self.out, "Invalid order. Using ascending order.")?;
                SortOrder::Ascending
            }
        };
        writeln!(self.out, "Sorted movies:")?;
        self.print_short(&sorted_by_rating(&movies, order))
    }

    /// Blank line plus a header, bold only on a terminal.
    fn heading(&mut self, text: &str) -> Result<()> {
        if self.styled {
            writeln!(self.out, "\n{}", text.bold())?;
        } else {
            writeln!(self.out, "\n{}", text)?;
        }
        Ok(())
    }

    fn print_short(&mut self, movies: &[(&String, &MovieDetails)]) -> Result<()> {
        for (title, movie) in movies {
            writeln!(self.out, "{}: {:.1} ({})", title, movie.rating, movie.year)?;
        }
        Ok(())
    }
}
