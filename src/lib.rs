// Library root
// -----------
// This crate exposes a small library surface for the CLI. The binary
// (`main.rs`) wires these modules together and runs the menu.
//
// Module responsibilities:
// - `model`: the movie record and the title-keyed collection.
// - `storage`: the `MovieStorage` trait with CSV and JSON backends.
// - `api`: blocking OMDb client that turns a title into a record.
// - `stats`: statistics, search and sorting over a collection.
// - `website`: renders the collection into a static HTML page.
// - `config`: settings read from the environment.
// - `ui`: the interactive menu loop.
pub mod api;
pub mod config;
pub mod model;
pub mod stats;
pub mod storage;
pub mod ui;
pub mod website;
