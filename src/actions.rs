//! The four things a card can do. Each action runs against one publication
//! and reports back a message for the notification slot; failures degrade to
//! an error toast rather than an aborted UI.

use crate::clipboard::copy_to_clipboard;
use crate::models::Publication;
use crate::notify::Severity;

/// Closed set of per-card actions. Adding a variant forces every dispatch
/// site to handle it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CardAction {
    /// Announce the publication. The stub does not follow the card's link.
    View,
    /// Announce the (stubbed) PDF download.
    Download,
    /// Copy the formatted citation to the clipboard.
    Cite,
    /// Hand the publication to the mail client, falling back to copying the
    /// collection URL when no handler takes it.
    Share,
}

/// What an action produced, ready for the notification slot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActionOutcome {
    pub message: String,
    pub severity: Severity,
}

impl ActionOutcome {
    fn new(message: impl Into<String>, severity: Severity) -> ActionOutcome {
        ActionOutcome {
            message: message.into(),
            severity,
        }
    }
}

/// Run `action` against `card`. `share_url` is the collection's canonical
/// URL, advertised by the share action.
pub fn run(action: CardAction, card: &Publication, share_url: &str) -> ActionOutcome {
    match action {
        CardAction::View => ActionOutcome::new(format!("Opening: {card}"), Severity::Info),
        CardAction::Download => {
            ActionOutcome::new(format!("Downloading PDF: {card}"), Severity::Success)
        }
        CardAction::Cite => match copy_to_clipboard(&card.citation()) {
            Ok(()) => ActionOutcome::new("Citation copied to clipboard", Severity::Success),
            Err(_) => ActionOutcome::new("Failed to copy citation", Severity::Error),
        },
        CardAction::Share => share(card, share_url),
    }
}

fn share(card: &Publication, share_url: &str) -> ActionOutcome {
    let mailto = share_mailto(&card.title, share_url);
    if open::that(&mailto).is_ok() {
        ActionOutcome::new("Publication shared successfully", Severity::Success)
    } else {
        match copy_to_clipboard(share_url) {
            Ok(()) => ActionOutcome::new("Link copied to clipboard", Severity::Success),
            Err(_) => ActionOutcome::new("Failed to copy link", Severity::Error),
        }
    }
}

/// A `mailto:` URL carrying the publication title as the subject and a short
/// blurb plus the collection URL as the body.
fn share_mailto(title: &str, url: &str) -> String {
    let body = format!("Check out this publication: {title}\n{url}");
    format!(
        "mailto:?subject={}&body={}",
        percent_encode(title),
        percent_encode(&body)
    )
}

/// Percent-encode a `mailto:` component. Unreserved bytes pass through,
/// everything else becomes `%XX`.
fn percent_encode(input: &str) -> String {
    let mut encoded = String::with_capacity(input.len());
    for byte in input.as_bytes() {
        match byte {
            b'A'..=b'Z' | b'a'..=b'z' | b'0'..=b'9' | b'-' | b'_' | b'.' | b'~' => {
                encoded.push(*byte as char);
            }
            _ => encoded.push_str(&format!("%{:02X}", byte)),
        }
    }
    encoded
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Publication {
        Publication {
            title: "Spectral Rewiring".to_string(),
            authors: "Calvino, R.".to_string(),
            journal: "JMLS".to_string(),
            year: "2024".to_string(),
            kind: "journal".to_string(),
            category: "machine-learning".to_string(),
            abstract_text: String::new(),
            tags: Vec::new(),
            link: String::new(),
        }
    }

    #[test]
    fn view_announces_the_title() {
        let outcome = run(CardAction::View, &card(), "https://example.org");
        assert_eq!(outcome.message, "Opening: Spectral Rewiring");
        assert_eq!(outcome.severity, Severity::Info);
    }

    #[test]
    fn download_announces_the_stubbed_pdf() {
        let outcome = run(CardAction::Download, &card(), "https://example.org");
        assert_eq!(outcome.message, "Downloading PDF: Spectral Rewiring");
        assert_eq!(outcome.severity, Severity::Success);
    }

    #[test]
    fn percent_encode_leaves_unreserved_bytes_alone() {
        assert_eq!(percent_encode("abc-XYZ_0.9~"), "abc-XYZ_0.9~");
    }

    #[test]
    fn percent_encode_escapes_everything_else() {
        assert_eq!(percent_encode("a b"), "a%20b");
        assert_eq!(percent_encode("a&b=c"), "a%26b%3Dc");
        assert_eq!(percent_encode("line\nbreak"), "line%0Abreak");
    }

    #[test]
    fn share_mailto_carries_subject_and_body() {
        let mailto = share_mailto("A Title", "https://example.org/pubs");
        assert!(mailto.starts_with("mailto:?subject=A%20Title&body="));
        assert!(mailto.contains("Check%20out%20this%20publication%3A%20A%20Title"));
        assert!(mailto.contains("%0Ahttps%3A%2F%2Fexample.org%2Fpubs"));
    }
}
