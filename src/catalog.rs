//! Catalog loading. A catalog is a single JSON document holding the
//! collection's canonical URL plus the publication records. Browsers can point
//! at an explicit file, fall back to a conventional per-user location, or run
//! entirely off the built-in sample collection so the binary works out of the
//! box.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::models::Publication;

/// Folder name used beneath the user's home directory for application data.
const DATA_DIR_NAME: &str = ".publication-browser";
/// Catalog file name stored inside the application data directory.
const CATALOG_FILE_NAME: &str = "publications.json";
/// Share target used when a catalog does not carry its own source URL.
const DEFAULT_SOURCE_URL: &str = "https://example.org/publications";

/// Errors raised while reading a catalog file. Wrapped in [`anyhow`] context by
/// the loader so the startup failure message names the offending path.
#[derive(Debug, Error)]
pub enum CatalogError {
    /// The file could not be read at all.
    #[error("failed to read catalog file: {0}")]
    Io(#[from] std::io::Error),
    /// The file was read but is not valid catalog JSON.
    #[error("failed to parse catalog JSON: {0}")]
    Parse(#[from] serde_json::Error),
}

#[derive(Debug, Clone, Serialize, Deserialize)]
/// A loaded collection: the page it stands in for plus its records.
pub struct Catalog {
    /// Canonical URL of the collection. The share action advertises this.
    #[serde(default = "default_source_url")]
    pub source: String,
    /// Publication records in catalog order. Order is preserved because card
    /// position is meaningful to the reader.
    pub publications: Vec<Publication>,
}

fn default_source_url() -> String {
    DEFAULT_SOURCE_URL.to_string()
}

impl Catalog {
    /// Read and parse a catalog from an explicit file path.
    pub fn from_path(path: &Path) -> Result<Catalog, CatalogError> {
        let raw = fs::read_to_string(path)?;
        Ok(serde_json::from_str(&raw)?)
    }

    /// The built-in sample collection used when no catalog file exists yet.
    /// Ten records spread across three years, three kinds and three
    /// categories, so every selector has something to bite on.
    pub fn sample() -> Catalog {
        Catalog {
            source: default_source_url(),
            publications: vec![
                record(
                    "Attention Is Not Always Needed: Lightweight Sequence Models for Edge Devices",
                    "Okafor, A., Lindqvist, M.",
                    "Journal of Machine Learning Systems",
                    "2023",
                    "journal",
                    "machine-learning",
                    "We revisit recurrent architectures for streaming inference on constrained \
                     hardware and show that careful quantization closes most of the quality gap \
                     to transformer baselines.",
                    &["Sequence Models", "Edge Computing"],
                    "https://example.org/papers/lightweight-sequence-models",
                ),
                record(
                    "Curriculum Pruning for Sparse Training",
                    "Ramaswamy, P.",
                    "International Conference on Learning Efficiency",
                    "2023",
                    "conference",
                    "machine-learning",
                    "A pruning schedule that removes weights in order of curriculum difficulty, \
                     reaching the same accuracy as dense training at a third of the compute.",
                    &["Sparse Training", "Pruning"],
                    "https://example.org/papers/curriculum-pruning",
                ),
                record(
                    "Deterministic Replay for Distributed Key-Value Stores",
                    "Nguyen, T., Farrell, S.",
                    "Transactions on Storage Systems",
                    "2023",
                    "journal",
                    "systems",
                    "We capture nondeterministic inputs at the replication boundary so that any \
                     replica divergence can be replayed and inspected offline.",
                    &["Distributed Systems", "Replay Debugging"],
                    "https://example.org/papers/deterministic-replay",
                ),
                record(
                    "Tight Bounds for Online Bin Packing with Advice",
                    "Szabo, E.",
                    "arXiv",
                    "2023",
                    "preprint",
                    "theory",
                    "We settle the advice complexity of online bin packing by matching the known \
                     lower bound with a constructive algorithm.",
                    &["Online Algorithms", "Lower Bounds"],
                    "",
                ),
                record(
                    "Oversmoothing Revisited: Spectral Rewiring for Message Passing",
                    "Calvino, R., Demir, A.",
                    "Journal of Machine Learning Systems",
                    "2024",
                    "journal",
                    "machine-learning",
                    "Graph Neural Networks lose expressive power as depth grows. We characterize \
                     the spectral causes of oversmoothing and propose a rewiring schedule that \
                     restores long-range signal.",
                    &["Graph Learning", "Spectral Methods"],
                    "https://example.org/papers/spectral-rewiring",
                ),
                record(
                    "Zero-Copy Ingestion for Columnar Event Logs",
                    "Martins, R., Devlin, K.",
                    "Symposium on Data-Intensive Systems",
                    "2024",
                    "conference",
                    "systems",
                    "An ingestion path that parses append-only event logs directly into columnar \
                     buffers, removing two copies and half the allocator traffic.",
                    &["Columnar Storage", "Ingestion"],
                    "https://example.org/papers/zero-copy-ingestion",
                ),
                record(
                    "Calibration Drift in Continually Trained Rankers",
                    "Haddad, L.",
                    "arXiv",
                    "2024",
                    "preprint",
                    "machine-learning",
                    "Longitudinal measurements of ranker calibration under continual training, \
                     with a simple temperature correction that survives distribution shift.",
                    &["Ranking", "Calibration"],
                    "",
                ),
                record(
                    "A Composition Theorem for Streaming Lower Bounds",
                    "Watanabe, H., Brandt, C.",
                    "Journal of Computational Complexity",
                    "2022",
                    "journal",
                    "theory",
                    "A composition theorem that lifts one-pass communication lower bounds to \
                     multi-pass streaming, unifying several ad hoc arguments.",
                    &["Streaming", "Communication Complexity"],
                    "https://example.org/papers/composition-theorem",
                ),
                record(
                    "Predictable Tail Latency with Cooperative Request Scheduling",
                    "Iverson, B., Park, S.",
                    "Conference on Operating Principles",
                    "2022",
                    "conference",
                    "systems",
                    "Request handlers yield at bounded intervals so the scheduler can keep \
                     p999 latency inside a declared budget without preemption.",
                    &["Scheduling", "Tail Latency"],
                    "https://example.org/papers/cooperative-scheduling",
                ),
                record(
                    "Label Noise as Implicit Regularization",
                    "Fontaine, M.",
                    "Journal of Statistical Learning",
                    "2022",
                    "journal",
                    "machine-learning",
                    "We show that moderate symmetric label noise acts as a regularizer whose \
                     strength can be predicted from the loss curvature.",
                    &["Label Noise", "Generalization"],
                    "",
                ),
            ],
        }
    }
}

/// Build one sample record. Only used by [`Catalog::sample`]; keeps the table
/// above readable.
#[allow(clippy::too_many_arguments)]
fn record(
    title: &str,
    authors: &str,
    journal: &str,
    year: &str,
    kind: &str,
    category: &str,
    abstract_text: &str,
    tags: &[&str],
    link: &str,
) -> Publication {
    Publication {
        title: title.to_string(),
        authors: authors.to_string(),
        journal: journal.to_string(),
        year: year.to_string(),
        kind: kind.to_string(),
        category: category.to_string(),
        abstract_text: abstract_text.to_string(),
        tags: tags.iter().map(|tag| tag.to_string()).collect(),
        link: link.to_string(),
    }
}

/// Resolve the conventional catalog location inside the user's home.
fn default_catalog_path() -> Option<PathBuf> {
    BaseDirs::new().map(|dirs| dirs.home_dir().join(DATA_DIR_NAME).join(CATALOG_FILE_NAME))
}

/// Load the catalog the browser should display. An explicit path must load or
/// the call fails; without one, a catalog at the conventional location wins
/// and the built-in sample collection is the quiet fallback.
pub fn load(path: Option<&Path>) -> Result<Catalog> {
    match path {
        Some(path) => Catalog::from_path(path)
            .with_context(|| format!("failed to load catalog from {}", path.display())),
        None => match default_catalog_path() {
            Some(default) if default.exists() => Catalog::from_path(&default)
                .with_context(|| format!("failed to load catalog from {}", default.display())),
            _ => Ok(Catalog::sample()),
        },
    }
}

#[cfg(test)]
mod tests {
    use std::io::Write;

    use super::*;

    #[test]
    fn parses_a_minimal_catalog_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(
            file,
            r#"{{
                "source": "https://lab.example/pubs",
                "publications": [{{
                    "title": "T",
                    "authors": "A",
                    "journal": "J",
                    "year": "2021",
                    "type": "journal",
                    "category": "systems",
                    "abstract": "Body text."
                }}]
            }}"#
        )
        .unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.source, "https://lab.example/pubs");
        assert_eq!(catalog.publications.len(), 1);
        let card = &catalog.publications[0];
        assert_eq!(card.kind, "journal");
        assert_eq!(card.abstract_text, "Body text.");
        assert!(card.tags.is_empty());
        assert!(card.link.is_empty());
    }

    #[test]
    fn missing_source_falls_back_to_the_default_url() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, r#"{{ "publications": [] }}"#).unwrap();

        let catalog = Catalog::from_path(file.path()).unwrap();
        assert_eq!(catalog.source, DEFAULT_SOURCE_URL);
    }

    #[test]
    fn invalid_json_reports_a_parse_error() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        write!(file, "{{ not json").unwrap();

        match Catalog::from_path(file.path()) {
            Err(CatalogError::Parse(_)) => {}
            other => panic!("expected a parse error, got {other:?}"),
        }
    }

    #[test]
    fn explicit_missing_path_is_a_hard_error() {
        let dir = tempfile::tempdir().unwrap();
        let missing = dir.path().join("nope.json");
        assert!(load(Some(&missing)).is_err());
    }

    #[test]
    fn sample_collection_exercises_every_selector() {
        let catalog = Catalog::sample();
        assert_eq!(catalog.publications.len(), 10);

        let years: std::collections::BTreeSet<_> =
            catalog.publications.iter().map(|p| p.year.as_str()).collect();
        assert_eq!(years.len(), 3);

        let from_2023 = catalog
            .publications
            .iter()
            .filter(|p| p.year == "2023")
            .count();
        assert_eq!(from_2023, 4);

        // Exactly one record should answer a search for "graph".
        let hits = catalog
            .publications
            .iter()
            .filter(|p| p.search_blob().contains("graph"))
            .count();
        assert_eq!(hits, 1);
    }
}
