// Entrypoint for the CLI application.
// - Keeps `main` small: read config, open the user's collection and hand
//   everything to the menu loop.
// - Returns `anyhow::Result`; only start-up and terminal failures end up here.

use anyhow::Context;
use dialoguer::Input;
use movie_shelf::{
    api::OmdbClient, config::Config, ui::MovieApp, website::SiteGenerator,
};
use tracing_subscriber::EnvFilter;

fn main() -> anyhow::Result<()> {
    // A missing .env file is fine; real environment variables still apply.
    dotenv::dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .with_writer(std::io::stderr)
        .with_target(false)
        .without_time()
        .init();

    let config = Config::from_env();
    tracing::debug!(?config, "loaded configuration");

    let username: String = Input::new()
        .with_prompt("Enter your username")
        .validate_with(|name: &String| -> Result<(), &str> {
            if name.trim().is_empty() || name.contains(['/', '\\']) {
                Err("Please enter a plain user name")
            } else {
                Ok(())
            }
        })
        .interact_text()?;

    let storage = config
        .storage
        .open_for_user(&config.data_dir, username.trim())
        .with_context(|| format!("Failed to open movie file in {}", config.data_dir.display()))?;
    let fetcher = OmdbClient::new(config.api_url.clone(), config.api_key.clone())?;
    if !fetcher.has_api_key() {
        tracing::warn!("OMDB_API_KEY is not set; adding movies will not work");
    }
    let site = SiteGenerator::new(config.template_dir.clone());

    // Start the interactive menu. This call blocks until the user exits.
    MovieApp::new(storage, Box::new(fetcher), site).run()?;
    Ok(())
}
