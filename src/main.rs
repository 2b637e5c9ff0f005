//! Binary entry point that glues the publication catalog to the TUI.
//! Summarizing the bootstrapping pipeline here keeps the intent obvious when
//! revisiting the code: we resolve the catalog source, hydrate the initial app
//! state, and drive the Ratatui event loop until the user exits.
use std::path::PathBuf;

use clap::Parser;

use publication_browser::{catalog, run_app, App};

#[derive(Parser)]
#[command(version, about = "Browse a publication catalog from the terminal")]
struct Cli {
    /// Path to a publications JSON file. Defaults to the catalog under the
    /// home directory, falling back to a built-in sample.
    #[arg(short, long)]
    catalog: Option<PathBuf>,
}

/// Resolve the catalog, load it, and launch the Ratatui event loop.
///
/// Returning a `Result` bubbles up fatal initialization problems (for example
/// an unreadable catalog file passed on the command line) to the terminal
/// instead of crashing silently.
fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    let catalog = catalog::load(cli.catalog.as_deref())?;

    let mut app = App::new(catalog);
    run_app(&mut app)
}
