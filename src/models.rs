//! Domain models for the publication catalog. These types deserialize straight
//! from the catalog JSON and get passed throughout the TUI. The intent is that
//! they stay light-weight data holders so other layers can focus on filtering
//! and presentation logic. Keeping the commentary here means later refactors
//! can reconstruct the assumptions even if other context is lost.

use std::fmt;

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Serialize, Deserialize)]
/// One publication record as it appears in the catalog file. Every field the
/// filters inspect is a plain string so the catalog author controls the
/// vocabulary; nothing here is an enum on purpose.
pub struct Publication {
    /// Title displayed on cards and echoed by most notifications.
    pub title: String,
    /// Author list as a single preformatted string, e.g. `"Smith, J., Lee, K."`.
    /// Kept unsplit because citations reproduce it verbatim.
    pub authors: String,
    /// Venue name. Shown on cards and in citations but deliberately left out of
    /// the search corpus, matching how readers actually search the page.
    pub journal: String,
    /// Publication year, kept as text because it is only ever compared for
    /// equality against a selector value.
    pub year: String,
    /// Publication kind such as `journal`, `conference` or `preprint`. The
    /// field is called `type` in catalog files.
    #[serde(rename = "type")]
    pub kind: String,
    /// Topic bucket used by the category selector, e.g. `machine-learning`.
    pub category: String,
    /// Short summary searched alongside title, authors and tags.
    #[serde(rename = "abstract")]
    pub abstract_text: String,
    /// Free-form topic labels. Displayed on cards and matched by the tag
    /// filter after normalization.
    #[serde(default)]
    pub tags: Vec<String>,
    /// Optional URL for the full text. Shown on list cards when present; the
    /// view action does not follow it.
    #[serde(default)]
    pub link: String,
}

impl fmt::Display for Publication {
    /// A publication displays as its title; card action notifications
    /// interpolate it directly.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.title)
    }
}

impl Publication {
    /// Compose the citation string handed to the clipboard by the cite action:
    /// `Authors (Year). Title. Journal.`
    pub fn citation(&self) -> String {
        format!(
            "{} ({}). {}. {}.",
            self.authors, self.year, self.title, self.journal
        )
    }

    /// Lower-cased haystack the search filter scans. Concatenates title,
    /// authors, abstract and tags. The journal is intentionally absent.
    pub fn search_blob(&self) -> String {
        format!(
            "{} {} {} {}",
            self.title,
            self.authors,
            self.abstract_text,
            self.tags.join(" ")
        )
        .to_lowercase()
    }

    /// Tags in the canonical form the tag filter compares against.
    pub fn normalized_tags(&self) -> Vec<String> {
        self.tags.iter().map(|tag| normalize_tag(tag)).collect()
    }
}

/// Canonical form of a tag label: lower-cased with whitespace runs collapsed
/// to single hyphens. Both the clicked label and every card tag go through
/// this, so matching is insensitive to case and spacing.
pub fn normalize_tag(label: &str) -> String {
    label
        .to_lowercase()
        .split_whitespace()
        .collect::<Vec<_>>()
        .join("-")
}
