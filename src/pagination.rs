//! The page control strip rendered under the card area. The strip is a fixed
//! row of entries built once from the full collection size; moving between
//! pages only repaints which entry is active and whether the prev/next
//! buttons accept input. Nothing here slices the collection itself, the strip
//! is a navigation affordance.

/// Cards a full page is assumed to hold when estimating page counts.
pub const CARDS_PER_PAGE: usize = 6;
/// Entry rows longer than this collapse their middle into an ellipsis.
const MAX_PLAIN_ENTRIES: u32 = 7;
/// Leading page numbers kept when the row is collapsed.
const COLLAPSED_HEAD: u32 = 5;

/// What one entry in the strip displays.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PageLabel {
    /// A numbered page button.
    Number(u32),
    /// The literal `…` placeholder for elided pages. Never active, never a
    /// navigation target.
    Ellipsis,
}

/// One rendered entry plus its highlight state.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageEntry {
    pub label: PageLabel,
    /// Whether this entry is painted as the current page.
    pub active: bool,
}

#[derive(Debug, Clone)]
pub struct PageControl {
    entries: Vec<PageEntry>,
    prev_disabled: bool,
    next_disabled: bool,
    /// Page count recomputed after each filter pass. Tracked but not surfaced
    /// anywhere yet; the entry row stays as built.
    /// TODO: rebuild the entry row from this once pages actually slice the
    /// visible collection instead of scrolling it.
    estimated_pages: usize,
}

impl PageControl {
    /// Build the strip for a collection of `count` cards. Collections that fit
    /// within [`MAX_PLAIN_ENTRIES`] pages list every number; longer ones list
    /// the first [`COLLAPSED_HEAD`], an ellipsis, and the final page. Page 1
    /// starts active.
    pub fn for_card_count(count: usize) -> Self {
        let pages = estimate_pages(count).max(1) as u32;

        let mut entries = Vec::new();
        if pages <= MAX_PLAIN_ENTRIES {
            for n in 1..=pages {
                entries.push(PageEntry {
                    label: PageLabel::Number(n),
                    active: false,
                });
            }
        } else {
            for n in 1..=COLLAPSED_HEAD {
                entries.push(PageEntry {
                    label: PageLabel::Number(n),
                    active: false,
                });
            }
            entries.push(PageEntry {
                label: PageLabel::Ellipsis,
                active: false,
            });
            entries.push(PageEntry {
                label: PageLabel::Number(pages),
                active: false,
            });
        }

        let mut control = PageControl {
            entries,
            prev_disabled: true,
            next_disabled: true,
            estimated_pages: estimate_pages(count),
        };
        control.go_to_page(1);
        control
    }

    /// Activate the entry labeled `page` and recompute the button states from
    /// the requested number. A request with no matching entry (an elided
    /// middle page) leaves every entry inactive; the current page then reads
    /// as 1 even though the buttons reflect the request.
    pub fn go_to_page(&mut self, page: u32) {
        for entry in &mut self.entries {
            entry.active = entry.label == PageLabel::Number(page);
        }
        self.prev_disabled = page <= 1;
        self.next_disabled = page >= self.max_page();
    }

    /// The page whose entry is active, defaulting to 1 when none is.
    pub fn current_page(&self) -> u32 {
        self.entries
            .iter()
            .find_map(|entry| match entry {
                PageEntry {
                    label: PageLabel::Number(n),
                    active: true,
                } => Some(*n),
                _ => None,
            })
            .unwrap_or(1)
    }

    /// The largest page number in the strip, defaulting to 1 when the strip
    /// is empty.
    pub fn max_page(&self) -> u32 {
        self.entries
            .iter()
            .filter_map(|entry| match entry.label {
                PageLabel::Number(n) => Some(n),
                PageLabel::Ellipsis => None,
            })
            .max()
            .unwrap_or(1)
    }

    /// Record how many pages the currently visible cards would fill. Runs on
    /// every filter pass; see the field note on `estimated_pages`.
    pub fn note_filtered_count(&mut self, visible: usize) {
        self.estimated_pages = estimate_pages(visible);
    }

    pub fn entries(&self) -> &[PageEntry] {
        &self.entries
    }

    pub fn prev_disabled(&self) -> bool {
        self.prev_disabled
    }

    pub fn next_disabled(&self) -> bool {
        self.next_disabled
    }

    pub fn estimated_pages(&self) -> usize {
        self.estimated_pages
    }
}

/// Pages needed for `count` cards at [`CARDS_PER_PAGE`] per page. Zero cards
/// estimate zero pages.
fn estimate_pages(count: usize) -> usize {
    (count + CARDS_PER_PAGE - 1) / CARDS_PER_PAGE
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn small_collections_list_every_page() {
        let control = PageControl::for_card_count(10);
        let labels: Vec<_> = control.entries().iter().map(|e| e.label).collect();
        assert_eq!(labels, vec![PageLabel::Number(1), PageLabel::Number(2)]);
        assert_eq!(control.current_page(), 1);
        assert!(control.prev_disabled());
        assert!(!control.next_disabled());
    }

    #[test]
    fn long_collections_collapse_into_an_ellipsis() {
        // 60 cards = 10 pages: 1..5, ellipsis, 10.
        let control = PageControl::for_card_count(60);
        let labels: Vec<_> = control.entries().iter().map(|e| e.label).collect();
        assert_eq!(
            labels,
            vec![
                PageLabel::Number(1),
                PageLabel::Number(2),
                PageLabel::Number(3),
                PageLabel::Number(4),
                PageLabel::Number(5),
                PageLabel::Ellipsis,
                PageLabel::Number(10),
            ]
        );
        assert_eq!(control.max_page(), 10);
    }

    #[test]
    fn moving_pages_repaints_the_active_entry_and_buttons() {
        let mut control = PageControl::for_card_count(60);
        control.go_to_page(10);
        assert_eq!(control.current_page(), 10);
        assert!(!control.prev_disabled());
        assert!(control.next_disabled());

        control.go_to_page(2);
        assert_eq!(control.current_page(), 2);
        assert!(!control.prev_disabled());
        assert!(!control.next_disabled());

        // Repeating the move changes nothing.
        let entries = control.entries().to_vec();
        control.go_to_page(2);
        assert_eq!(control.entries(), entries.as_slice());
        assert_eq!(control.current_page(), 2);
    }

    #[test]
    fn requesting_an_elided_page_leaves_no_entry_active() {
        let mut control = PageControl::for_card_count(60);
        control.go_to_page(7);
        assert!(control.entries().iter().all(|entry| !entry.active));
        // With nothing active the current page reads as 1, while the buttons
        // still reflect the requested number.
        assert_eq!(control.current_page(), 1);
        assert!(!control.prev_disabled());
        assert!(!control.next_disabled());
    }

    #[test]
    fn empty_collections_still_present_page_one() {
        let control = PageControl::for_card_count(0);
        assert_eq!(control.entries().len(), 1);
        assert_eq!(control.current_page(), 1);
        assert_eq!(control.max_page(), 1);
        assert!(control.prev_disabled());
        assert!(control.next_disabled());
        assert_eq!(control.estimated_pages(), 0);
    }

    #[test]
    fn filter_passes_update_the_estimate_without_touching_the_strip() {
        let mut control = PageControl::for_card_count(60);
        let before: Vec<_> = control.entries().to_vec();

        control.note_filtered_count(7);
        assert_eq!(control.estimated_pages(), 2);
        assert_eq!(control.entries(), before.as_slice());

        control.note_filtered_count(0);
        assert_eq!(control.estimated_pages(), 0);
    }
}
