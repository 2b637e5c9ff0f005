//! Ratatui front-end for the publication browser. State and input handling
//! live in [`app`], rendering in [`screens`], and the terminal lifecycle in
//! [`terminal`].

mod app;
mod helpers;
mod screens;
mod terminal;

pub use app::{App, SEARCH_DEBOUNCE};
pub use terminal::run_app;
