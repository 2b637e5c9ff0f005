//! The card collection and every rule that decides which cards show. The full
//! record list never shrinks; filtering toggles a parallel visibility mask so
//! card identity (and per-card reveal state upstream) survives any filter
//! churn. Exactly one visibility source is in effect at a time; running
//! another replaces it wholesale rather than stacking.

use std::collections::BTreeSet;
use std::time::{Duration, Instant};

use crate::models::{normalize_tag, Publication};
use crate::pagination::PageControl;

/// How long the cosmetic post-filter loading pulse stays on the card area.
pub const LOADING_PULSE: Duration = Duration::from_millis(300);

/// How cards are laid out.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ViewMode {
    Grid,
    List,
}

/// The three selector values. `None` is the selector's "all" position.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FacetSelection {
    pub year: Option<String>,
    pub kind: Option<String>,
    pub category: Option<String>,
}

impl FacetSelection {
    /// True while every selector sits on "all".
    pub fn is_unset(&self) -> bool {
        self.year.is_none() && self.kind.is_none() && self.category.is_none()
    }

    /// A card passes when every set selector matches it exactly.
    fn matches(&self, card: &Publication) -> bool {
        self.year.as_deref().map_or(true, |y| card.year == y)
            && self.kind.as_deref().map_or(true, |k| card.kind == k)
            && self.category.as_deref().map_or(true, |c| card.category == c)
    }
}

/// Which visibility source last ran. The variants carry everything needed to
/// recompute the mask, so the mask is always a pure function of one of these.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum VisibilityFilter {
    /// Nothing hidden.
    All,
    /// The three selectors, combined conjunctively.
    Facets(FacetSelection),
    /// A substring search over each card's search blob. An empty query hides
    /// nothing.
    Search(String),
    /// A single normalized tag that must appear among a card's tags.
    Tag(String),
}

/// Distinct selector options per dimension, harvested once from the catalog.
#[derive(Debug, Clone, Default)]
pub struct FacetOptions {
    /// Years, newest first.
    pub years: Vec<String>,
    /// Kinds, alphabetical.
    pub kinds: Vec<String>,
    /// Categories, alphabetical.
    pub categories: Vec<String>,
}

impl FacetOptions {
    fn from_cards(cards: &[Publication]) -> FacetOptions {
        let years: BTreeSet<&str> = cards.iter().map(|c| c.year.as_str()).collect();
        let kinds: BTreeSet<&str> = cards.iter().map(|c| c.kind.as_str()).collect();
        let categories: BTreeSet<&str> = cards.iter().map(|c| c.category.as_str()).collect();
        FacetOptions {
            years: years.into_iter().rev().map(str::to_string).collect(),
            kinds: kinds.into_iter().map(str::to_string).collect(),
            categories: categories.into_iter().map(str::to_string).collect(),
        }
    }

    /// Options for one dimension, in display order.
    pub fn for_dimension(&self, dimension: FacetDimension) -> &[String] {
        match dimension {
            FacetDimension::Year => &self.years,
            FacetDimension::Kind => &self.kinds,
            FacetDimension::Category => &self.categories,
        }
    }
}

/// One of the three selector controls.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FacetDimension {
    Year,
    Kind,
    Category,
}

impl FacetDimension {
    /// Label shown next to the selector.
    pub fn label(self) -> &'static str {
        match self {
            FacetDimension::Year => "Year",
            FacetDimension::Kind => "Type",
            FacetDimension::Category => "Category",
        }
    }
}

/// The collection plus all of its view state: visibility mask, selector
/// values, page strip, layout mode, cursor and scroll position.
#[derive(Debug)]
pub struct CollectionView {
    cards: Vec<Publication>,
    /// Parallel to `cards`. Only [`CollectionView::refresh_visibility`]
    /// writes it.
    hidden: Vec<bool>,
    selection: FacetSelection,
    active: VisibilityFilter,
    options: FacetOptions,
    pages: PageControl,
    view_mode: ViewMode,
    /// Cursor position within the visible card list.
    selected: usize,
    /// First card row currently scrolled into the viewport.
    scroll_row: usize,
    /// End of the loading pulse started by the last selector pass, if any.
    loading_until: Option<Instant>,
}

impl CollectionView {
    pub fn new(cards: Vec<Publication>) -> CollectionView {
        let hidden = vec![false; cards.len()];
        let options = FacetOptions::from_cards(&cards);
        let pages = PageControl::for_card_count(cards.len());
        CollectionView {
            cards,
            hidden,
            selection: FacetSelection::default(),
            active: VisibilityFilter::All,
            options,
            pages,
            view_mode: ViewMode::Grid,
            selected: 0,
            scroll_row: 0,
            loading_until: None,
        }
    }

    /// Recompute the visibility mask from the active filter, then clamp the
    /// cursor into the surviving list. This is the only writer of `hidden`.
    fn refresh_visibility(&mut self) {
        let cards = self.cards.iter().zip(self.hidden.iter_mut());
        match &self.active {
            VisibilityFilter::All => {
                for (_, hidden) in cards {
                    *hidden = false;
                }
            }
            VisibilityFilter::Facets(selection) => {
                for (card, hidden) in cards {
                    *hidden = !selection.matches(card);
                }
            }
            VisibilityFilter::Search(query) => {
                let query = query.to_lowercase();
                for (card, hidden) in cards {
                    *hidden = !query.is_empty() && !card.search_blob().contains(&query);
                }
            }
            VisibilityFilter::Tag(tag) => {
                for (card, hidden) in cards {
                    *hidden = !card.normalized_tags().contains(tag);
                }
            }
        }

        let visible = self.visible_count();
        if visible == 0 {
            self.selected = 0;
        } else if self.selected >= visible {
            self.selected = visible - 1;
        }
    }

    /// Run the selector pass: whatever the three selectors currently hold
    /// becomes the active filter. Also starts the loading pulse and refreshes
    /// the page-count estimate.
    pub fn apply_filters(&mut self, now: Instant) {
        self.active = VisibilityFilter::Facets(self.selection.clone());
        self.refresh_visibility();
        self.loading_until = Some(now + LOADING_PULSE);
        let visible = self.visible_count();
        self.pages.note_filtered_count(visible);
    }

    /// Run a search pass. Replaces whatever filter was active; the selectors
    /// keep their values but stop affecting visibility until their next pass.
    pub fn perform_search(&mut self, query: &str) {
        self.active = VisibilityFilter::Search(query.to_string());
        self.refresh_visibility();
    }

    /// Run a tag pass from a clicked label. Resets the selectors to "all"
    /// first, then shows only cards carrying the normalized tag. Returns the
    /// normalized form for the caller's notification.
    pub fn filter_by_tag(&mut self, label: &str) -> String {
        let tag = normalize_tag(label);
        self.selection = FacetSelection::default();
        self.active = VisibilityFilter::Tag(tag.clone());
        self.refresh_visibility();
        tag
    }

    /// Reset the selectors and show everything. The search box text is not
    /// this function's concern; a later search pass re-reads it as is.
    pub fn clear_all_filters(&mut self) {
        self.selection = FacetSelection::default();
        self.active = VisibilityFilter::All;
        self.refresh_visibility();
    }

    /// Step one selector through its options: "all", then each option in
    /// display order, wrapping. Every step is a full selector pass.
    pub fn cycle_facet(&mut self, dimension: FacetDimension, step: i32, now: Instant) {
        let options = self.options.for_dimension(dimension).to_vec();
        let slot = match dimension {
            FacetDimension::Year => &mut self.selection.year,
            FacetDimension::Kind => &mut self.selection.kind,
            FacetDimension::Category => &mut self.selection.category,
        };

        // Position 0 is "all"; options occupy 1..=len.
        let len = options.len() as i32;
        let position = match slot.as_deref() {
            None => 0,
            Some(value) => options
                .iter()
                .position(|option| option == value)
                .map(|index| index as i32 + 1)
                .unwrap_or(0),
        };
        let next = (position + step).rem_euclid(len + 1);
        *slot = if next == 0 {
            None
        } else {
            Some(options[(next - 1) as usize].clone())
        };

        self.apply_filters(now);
    }

    /// Activate the page entry labeled `page` and snap the viewport back to
    /// the top, mirroring the scroll-to-top that accompanies page moves.
    pub fn go_to_page(&mut self, page: u32) {
        self.pages.go_to_page(page);
        self.scroll_row = 0;
    }

    /// One page back, ignored at the lower bound.
    pub fn go_to_previous_page(&mut self) {
        let current = self.pages.current_page();
        if current > 1 {
            self.go_to_page(current - 1);
        }
    }

    /// One page forward, ignored at the upper bound.
    pub fn go_to_next_page(&mut self) {
        let current = self.pages.current_page();
        if current < self.pages.max_page() {
            self.go_to_page(current + 1);
        }
    }

    /// Switch the card layout. The mode buttons are radio-like: activating
    /// one deactivates the other.
    pub fn select_view(&mut self, mode: ViewMode) {
        self.view_mode = mode;
    }

    /// Move the cursor by `offset` within the visible list. Moves that would
    /// land outside the list are ignored rather than clamped, so a cursor on
    /// the top row stays put when stepping up.
    pub fn move_selection(&mut self, offset: isize) {
        let visible = self.visible_count();
        if visible == 0 {
            return;
        }
        let target = self.selected as isize + offset;
        if target >= 0 && (target as usize) < visible {
            self.selected = target as usize;
        }
    }

    /// Scroll just far enough that the cursor's row sits inside a viewport of
    /// `rows_fit` rows at `columns` cards per row.
    pub fn ensure_selection_visible(&mut self, rows_fit: usize, columns: usize) {
        let columns = columns.max(1);
        let rows_fit = rows_fit.max(1);
        let row = self.selected / columns;
        if row < self.scroll_row {
            self.scroll_row = row;
        } else if row >= self.scroll_row + rows_fit {
            self.scroll_row = row + 1 - rows_fit;
        }
    }

    /// First card row the viewport shows at `columns` cards per row. A filter
    /// pass can leave the stored scroll position past the surviving rows, so
    /// every reader of the viewport window clamps through here; drawing and
    /// reveal tracking must agree on the same row.
    pub fn start_row(&self, columns: usize) -> usize {
        let columns = columns.max(1);
        let rows = (self.visible_count() + columns - 1) / columns;
        self.scroll_row.min(rows.saturating_sub(1))
    }

    /// Whether the post-filter loading pulse is still running at `now`.
    pub fn loading(&self, now: Instant) -> bool {
        self.loading_until.is_some_and(|until| now < until)
    }

    /// Indices into the full card list, in order, for every visible card.
    pub fn visible_indices(&self) -> Vec<usize> {
        self.hidden
            .iter()
            .enumerate()
            .filter(|(_, hidden)| !**hidden)
            .map(|(index, _)| index)
            .collect()
    }

    pub fn visible_count(&self) -> usize {
        self.hidden.iter().filter(|hidden| !**hidden).count()
    }

    /// The card under the cursor, if any card is visible.
    pub fn selected_card(&self) -> Option<&Publication> {
        let index = *self.visible_indices().get(self.selected)?;
        self.cards.get(index)
    }

    pub fn cards(&self) -> &[Publication] {
        &self.cards
    }

    pub fn selection(&self) -> &FacetSelection {
        &self.selection
    }

    pub fn active_filter(&self) -> &VisibilityFilter {
        &self.active
    }

    pub fn options(&self) -> &FacetOptions {
        &self.options
    }

    pub fn pages(&self) -> &PageControl {
        &self.pages
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn selected_position(&self) -> usize {
        self.selected
    }

    pub fn scroll_row(&self) -> usize {
        self.scroll_row
    }

    /// Selector setters for driving the controls programmatically. Each one
    /// is only a value change; visibility moves on the next selector pass.
    pub fn set_year(&mut self, year: Option<String>) {
        self.selection.year = year;
    }

    pub fn set_kind(&mut self, kind: Option<String>) {
        self.selection.kind = kind;
    }

    pub fn set_category(&mut self, category: Option<String>) {
        self.selection.category = category;
    }
}
