//! Application state and input handling. The browsing surface is always
//! present; fine-grained modes (search box, selector picker, tag picker)
//! layer on top of it and fold back into `Normal` when dismissed.

use std::mem;
use std::time::{Duration, Instant};

use crossterm::event::KeyCode;

use crate::actions::{self, CardAction};
use crate::catalog::Catalog;
use crate::collection::{CollectionView, FacetDimension, ViewMode};
use crate::notify::{Severity, Toast};

/// Number of publication cards shown in each row of the grid layout. Three
/// columns keep titles legible on most terminal sizes.
pub(super) const GRID_COLUMNS: usize = 3;
/// Height allocation per card in the grid layout.
pub(super) const GRID_CARD_HEIGHT: u16 = 7;
/// Height allocation per card in the list layout.
pub(super) const LIST_CARD_HEIGHT: u16 = 6;
/// Header space above the card area.
pub(super) const HEADER_HEIGHT: u16 = 4;
/// Row reserved for the page strip under the cards.
pub(super) const PAGE_STRIP_HEIGHT: u16 = 1;
/// Footer space reserved for counts and instructions.
pub(super) const FOOTER_HEIGHT: u16 = 3;
/// Pause between the last search keystroke and the search pass it schedules.
pub const SEARCH_DEBOUNCE: Duration = Duration::from_millis(300);
/// How long a freshly revealed card keeps its dim entry styling.
pub(super) const REVEAL_FADE: Duration = Duration::from_millis(300);

/// The selector picker's rows, top to bottom.
pub(super) const FACET_ROWS: [FacetDimension; 3] = [
    FacetDimension::Year,
    FacetDimension::Kind,
    FacetDimension::Category,
];

/// Fine-grained input modes layered over the browsing surface.
pub(super) enum Mode {
    Normal,
    /// Typing into the search box.
    Searching,
    /// Adjusting the three selector controls.
    FacetPicker(FacetPickerState),
    /// Choosing one of the selected card's tags.
    TagPicker(TagPickerState),
}

/// State for the selector picker: which of the three rows the cursor is on.
pub(super) struct FacetPickerState {
    pub(super) row: usize,
}

/// State for the tag picker popup.
pub(super) struct TagPickerState {
    /// Title of the card the tags came from, shown in the popup header.
    pub(super) title: String,
    /// Tag labels exactly as the card carries them.
    pub(super) tags: Vec<String>,
    pub(super) selected: usize,
}

/// A scheduled search pass. Each keystroke replaces the previous schedule
/// outright, which is the entire cancellation story.
struct PendingSearch {
    run_at: Instant,
    query: String,
}

/// Central application state shared across the TUI.
pub struct App {
    pub(super) collection: CollectionView,
    /// Canonical URL of the collection, advertised by the share action.
    pub(super) share_url: String,
    pub(super) mode: Mode,
    /// The single notification slot. Showing a new message drops the old one.
    pub(super) toast: Option<Toast>,
    /// Current text of the search box. Persists when the box loses focus and
    /// across filter resets; only typing changes it.
    pub(super) search_query: String,
    pending_search: Option<PendingSearch>,
    /// Per-card first-seen stamps, parallel to the full card list. A card is
    /// stamped the first time it scrolls into view and never unstamped.
    revealed: Vec<Option<Instant>>,
    /// Height available to the card area, derived from the terminal size.
    content_height: u16,
}

impl App {
    pub fn new(catalog: Catalog) -> Self {
        let revealed = vec![None; catalog.publications.len()];
        Self {
            collection: CollectionView::new(catalog.publications),
            share_url: catalog.source,
            mode: Mode::Normal,
            toast: None,
            search_query: String::new(),
            pending_search: None,
            revealed,
            content_height: 0,
        }
    }

    /// Record the terminal height so scrolling and reveal tracking know how
    /// many card rows fit. Called at startup and on every resize event.
    pub fn update_viewport(&mut self, height: u16) {
        self.content_height =
            height.saturating_sub(HEADER_HEIGHT + PAGE_STRIP_HEIGHT + FOOTER_HEIGHT);
    }

    /// Card rows that fit the viewport in the current layout.
    fn viewport_rows(&self) -> usize {
        let card_height = match self.collection.view_mode() {
            ViewMode::Grid => GRID_CARD_HEIGHT,
            ViewMode::List => LIST_CARD_HEIGHT,
        };
        ((self.content_height / card_height) as usize).max(1)
    }

    /// Cards per row in the current layout.
    pub(super) fn columns(&self) -> usize {
        match self.collection.view_mode() {
            ViewMode::Grid => GRID_COLUMNS,
            ViewMode::List => 1,
        }
    }

    /// Route a key press through the current mode. Returns `true` when the
    /// application should exit.
    pub fn handle_key(&mut self, code: KeyCode, now: Instant) -> bool {
        let mut exit = false;
        let mut mode = mem::replace(&mut self.mode, Mode::Normal);

        mode = match mode {
            Mode::Normal => self.handle_browse_key(code, &mut exit),
            Mode::Searching => self.handle_search_key(code, now),
            Mode::FacetPicker(state) => self.handle_facet_picker_key(code, now, state),
            Mode::TagPicker(state) => self.handle_tag_picker_key(code, state),
        };

        self.mode = mode;
        exit
    }

    fn handle_browse_key(&mut self, code: KeyCode, exit: &mut bool) -> Mode {
        match code {
            KeyCode::Char('q') => *exit = true,
            KeyCode::Esc => self.clear_all_filters(),
            KeyCode::Char('/') => return Mode::Searching,
            KeyCode::Char('f') => return Mode::FacetPicker(FacetPickerState { row: 0 }),
            KeyCode::Char('t') => return self.open_tag_picker(),
            KeyCode::Char('g') => self.select_view(ViewMode::Grid),
            KeyCode::Char('l') => self.select_view(ViewMode::List),
            KeyCode::Enter => self.view_selected(),
            KeyCode::Char('d') => self.download_selected(),
            KeyCode::Char('c') => self.cite_selected(),
            KeyCode::Char('s') => self.share_selected(),
            KeyCode::Char('[') => self.collection.go_to_previous_page(),
            KeyCode::Char(']') => self.collection.go_to_next_page(),
            KeyCode::Char(digit @ '1'..='9') => {
                if let Some(page) = digit.to_digit(10) {
                    self.go_to_page(page);
                }
            }
            KeyCode::Left => self.move_selection(-1),
            KeyCode::Right => self.move_selection(1),
            KeyCode::Up => self.move_selection(-(self.columns() as isize)),
            KeyCode::Down => self.move_selection(self.columns() as isize),
            _ => {}
        }
        Mode::Normal
    }

    fn handle_search_key(&mut self, code: KeyCode, now: Instant) -> Mode {
        match code {
            KeyCode::Enter | KeyCode::Esc => return Mode::Normal,
            KeyCode::Backspace => {
                self.search_query.pop();
                self.schedule_search(now);
            }
            KeyCode::Char(ch) => {
                self.search_query.push(ch);
                self.schedule_search(now);
            }
            _ => {}
        }
        Mode::Searching
    }

    fn handle_facet_picker_key(
        &mut self,
        code: KeyCode,
        now: Instant,
        mut state: FacetPickerState,
    ) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Enter | KeyCode::Char('f') => return Mode::Normal,
            KeyCode::Up => {
                if state.row > 0 {
                    state.row -= 1;
                }
            }
            KeyCode::Down => {
                if state.row + 1 < FACET_ROWS.len() {
                    state.row += 1;
                }
            }
            KeyCode::Left => self.collection.cycle_facet(FACET_ROWS[state.row], -1, now),
            KeyCode::Right => self.collection.cycle_facet(FACET_ROWS[state.row], 1, now),
            _ => {}
        }
        Mode::FacetPicker(state)
    }

    fn handle_tag_picker_key(&mut self, code: KeyCode, mut state: TagPickerState) -> Mode {
        match code {
            KeyCode::Esc | KeyCode::Char('t') => return Mode::Normal,
            KeyCode::Up => {
                if state.selected > 0 {
                    state.selected -= 1;
                }
            }
            KeyCode::Down => {
                if state.selected + 1 < state.tags.len() {
                    state.selected += 1;
                }
            }
            KeyCode::Enter => {
                if let Some(label) = state.tags.get(state.selected).cloned() {
                    self.filter_by_tag(&label);
                }
                return Mode::Normal;
            }
            _ => {}
        }
        Mode::TagPicker(state)
    }

    /// Advance time-based state: run a search pass that has waited out its
    /// debounce, drop an expired toast, and stamp reveal times for cards that
    /// just entered the viewport.
    pub fn tick(&mut self, now: Instant) {
        let due = self
            .pending_search
            .as_ref()
            .is_some_and(|pending| now >= pending.run_at);
        if due {
            if let Some(pending) = self.pending_search.take() {
                self.collection.perform_search(&pending.query);
                let (rows, columns) = (self.viewport_rows(), self.columns());
                self.collection.ensure_selection_visible(rows, columns);
            }
        }

        if let Some(toast) = &self.toast {
            if toast.is_expired(now) {
                self.toast = None;
            }
        }

        self.stamp_reveals(now);
    }

    /// (Re)arm the search debounce for the current box contents.
    fn schedule_search(&mut self, now: Instant) {
        self.pending_search = Some(PendingSearch {
            run_at: now + SEARCH_DEBOUNCE,
            query: self.search_query.clone(),
        });
    }

    /// Mark cards currently inside the viewport window. Stamps survive filter
    /// churn so a card only ever fades in once. The window starts at the same
    /// clamped row the renderers draw from.
    fn stamp_reveals(&mut self, now: Instant) {
        let columns = self.columns();
        let window = self.viewport_rows() * columns;
        let first = self.collection.start_row(columns) * columns;
        for index in self
            .collection
            .visible_indices()
            .into_iter()
            .skip(first)
            .take(window)
        {
            if let Some(slot) = self.revealed.get_mut(index) {
                if slot.is_none() {
                    *slot = Some(now);
                }
            }
        }
    }

    /// Whether the card at `index` (into the full card list) is still inside
    /// its reveal fade at `now`.
    pub(super) fn reveal_dim(&self, index: usize, now: Instant) -> bool {
        match self.revealed.get(index).copied().flatten() {
            Some(revealed_at) => now.saturating_duration_since(revealed_at) < REVEAL_FADE,
            None => true,
        }
    }

    /// Run the selector pass over the collection with the selectors' current
    /// values.
    pub fn apply_filters(&mut self) {
        self.collection.apply_filters(Instant::now());
    }

    /// Reset the selector controls and show the full collection. The search
    /// box keeps its text; only a later search pass re-reads it.
    pub fn clear_all_filters(&mut self) {
        self.collection.clear_all_filters();
        self.show_notification("All filters cleared", Severity::Info);
    }

    /// Filter down to one tag label and announce it.
    pub fn filter_by_tag(&mut self, label: &str) {
        let tag = self.collection.filter_by_tag(label);
        let display = tag.replace('-', " ");
        self.show_notification(format!("Filtering by tag: {display}"), Severity::Info);
    }

    /// Activate the page entry labeled `page`.
    pub fn go_to_page(&mut self, page: u32) {
        self.collection.go_to_page(page);
    }

    /// Replace whatever notification is up with a fresh one.
    pub fn show_notification(&mut self, message: impl Into<String>, severity: Severity) {
        self.toast = Some(Toast::show(message, severity, Instant::now()));
    }

    /// Announce the selected publication.
    pub fn view_selected(&mut self) {
        self.run_card_action(CardAction::View);
    }

    /// Announce the (stubbed) PDF download for the selected publication.
    pub fn download_selected(&mut self) {
        self.run_card_action(CardAction::Download);
    }

    /// Copy the selected publication's citation to the clipboard.
    pub fn cite_selected(&mut self) {
        self.run_card_action(CardAction::Cite);
    }

    /// Share the selected publication via the mail client, falling back to
    /// copying the collection URL.
    pub fn share_selected(&mut self) {
        self.run_card_action(CardAction::Share);
    }

    fn run_card_action(&mut self, action: CardAction) {
        if let Some(card) = self.collection.selected_card().cloned() {
            let outcome = actions::run(action, &card, &self.share_url);
            self.show_notification(outcome.message, outcome.severity);
        } else {
            self.show_notification("No publication selected.", Severity::Error);
        }
    }

    fn select_view(&mut self, mode: ViewMode) {
        self.collection.select_view(mode);
        let (rows, columns) = (self.viewport_rows(), self.columns());
        self.collection.ensure_selection_visible(rows, columns);
    }

    fn move_selection(&mut self, offset: isize) {
        self.collection.move_selection(offset);
        let (rows, columns) = (self.viewport_rows(), self.columns());
        self.collection.ensure_selection_visible(rows, columns);
    }

    fn open_tag_picker(&mut self) -> Mode {
        let selected = self
            .collection
            .selected_card()
            .map(|card| (card.title.clone(), card.tags.clone()));
        match selected {
            None => {
                self.show_notification("No publication selected.", Severity::Error);
                Mode::Normal
            }
            Some((_, tags)) if tags.is_empty() => {
                self.show_notification("No tags on this publication.", Severity::Info);
                Mode::Normal
            }
            Some((title, tags)) => Mode::TagPicker(TagPickerState {
                title,
                tags,
                selected: 0,
            }),
        }
    }

    pub fn collection(&self) -> &CollectionView {
        &self.collection
    }

    pub fn toast(&self) -> Option<&Toast> {
        self.toast.as_ref()
    }

    pub fn search_query(&self) -> &str {
        &self.search_query
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::collection::VisibilityFilter;

    fn app() -> App {
        let mut app = App::new(Catalog::sample());
        app.update_viewport(30);
        app
    }

    fn type_chars(app: &mut App, text: &str, now: Instant) {
        for ch in text.chars() {
            app.handle_key(KeyCode::Char(ch), now);
        }
    }

    #[test]
    fn slash_opens_the_search_box_and_escape_keeps_the_text() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(KeyCode::Char('/'), now);
        assert!(matches!(app.mode, Mode::Searching));

        type_chars(&mut app, "graph", now);
        assert_eq!(app.search_query(), "graph");

        app.handle_key(KeyCode::Esc, now);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.search_query(), "graph");
    }

    #[test]
    fn search_fires_once_the_debounce_has_elapsed() {
        let mut app = app();
        let start = Instant::now();

        app.handle_key(KeyCode::Char('/'), start);
        type_chars(&mut app, "graph", start);

        // Still inside the pause: nothing has run.
        app.tick(start + Duration::from_millis(200));
        assert_eq!(app.collection().visible_count(), 10);

        app.tick(start + SEARCH_DEBOUNCE);
        assert_eq!(app.collection().visible_count(), 1);
        assert_eq!(
            app.collection().active_filter(),
            &VisibilityFilter::Search("graph".to_string())
        );
    }

    #[test]
    fn each_keystroke_cancels_the_previous_schedule() {
        let mut app = app();
        let start = Instant::now();

        app.handle_key(KeyCode::Char('/'), start);
        type_chars(&mut app, "gr", start);

        // A later keystroke re-arms the timer; the original deadline passes
        // without a search pass.
        let later = start + Duration::from_millis(250);
        app.handle_key(KeyCode::Char('a'), later);
        app.tick(start + SEARCH_DEBOUNCE);
        assert_eq!(app.collection().visible_count(), 10);

        // The replacement schedule fires with the full query.
        app.tick(later + SEARCH_DEBOUNCE);
        assert_eq!(
            app.collection().active_filter(),
            &VisibilityFilter::Search("gra".to_string())
        );
        assert_eq!(app.collection().visible_count(), 1);
    }

    #[test]
    fn backspacing_to_an_empty_query_shows_everything_again() {
        let mut app = app();
        let start = Instant::now();

        app.handle_key(KeyCode::Char('/'), start);
        type_chars(&mut app, "q", start);
        app.tick(start + SEARCH_DEBOUNCE);
        assert_eq!(app.collection().visible_count(), 2);

        app.handle_key(KeyCode::Backspace, start);
        app.tick(start + SEARCH_DEBOUNCE + SEARCH_DEBOUNCE);
        assert_eq!(app.collection().visible_count(), 10);
    }

    #[test]
    fn a_new_notification_destroys_the_current_one() {
        let mut app = app();
        app.show_notification("first", Severity::Info);
        app.show_notification("second", Severity::Error);

        let toast = app.toast().unwrap();
        assert_eq!(toast.message, "second");
        assert_eq!(toast.severity, Severity::Error);
    }

    #[test]
    fn escape_clears_filters_and_announces_it() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(KeyCode::Char('f'), now);
        app.handle_key(KeyCode::Right, now);
        assert_eq!(app.collection().visible_count(), 3);
        app.handle_key(KeyCode::Esc, now);
        assert!(matches!(app.mode, Mode::Normal));

        app.handle_key(KeyCode::Esc, now);
        assert_eq!(app.collection().visible_count(), 10);
        let toast = app.toast().unwrap();
        assert_eq!(toast.message, "All filters cleared");
        assert_eq!(toast.severity, Severity::Info);
    }

    #[test]
    fn view_action_announces_the_selected_title() {
        let mut app = app();
        let now = Instant::now();
        app.handle_key(KeyCode::Enter, now);

        let toast = app.toast().unwrap();
        assert!(toast.message.starts_with("Opening: "));
        assert_eq!(toast.severity, Severity::Info);
    }

    #[test]
    fn download_action_reports_success() {
        let mut app = app();
        app.download_selected();

        let toast = app.toast().unwrap();
        assert!(toast.message.starts_with("Downloading PDF: "));
        assert_eq!(toast.severity, Severity::Success);
    }

    #[test]
    fn actions_degrade_to_an_error_toast_without_a_selection() {
        let mut app = App::new(Catalog {
            source: "https://example.org".to_string(),
            publications: Vec::new(),
        });
        app.view_selected();

        let toast = app.toast().unwrap();
        assert_eq!(toast.message, "No publication selected.");
        assert_eq!(toast.severity, Severity::Error);
    }

    #[test]
    fn tag_picker_applies_the_chosen_tag() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(KeyCode::Char('t'), now);
        assert!(matches!(app.mode, Mode::TagPicker(_)));

        // First card, first tag: "Sequence Models".
        app.handle_key(KeyCode::Enter, now);
        assert!(matches!(app.mode, Mode::Normal));
        assert_eq!(app.collection().visible_count(), 1);
        assert_eq!(
            app.collection().active_filter(),
            &VisibilityFilter::Tag("sequence-models".to_string())
        );

        let toast = app.toast().unwrap();
        assert_eq!(toast.message, "Filtering by tag: sequence models");
        assert_eq!(toast.severity, Severity::Info);
    }

    #[test]
    fn page_keys_move_within_the_strip_bounds() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.collection().pages().current_page(), 1);

        app.handle_key(KeyCode::Char(']'), now);
        assert_eq!(app.collection().pages().current_page(), 2);
        app.handle_key(KeyCode::Char(']'), now);
        assert_eq!(app.collection().pages().current_page(), 2);

        app.handle_key(KeyCode::Char('['), now);
        assert_eq!(app.collection().pages().current_page(), 1);

        app.handle_key(KeyCode::Char('2'), now);
        assert_eq!(app.collection().pages().current_page(), 2);
    }

    #[test]
    fn view_toggle_switches_the_layout() {
        let mut app = app();
        let now = Instant::now();
        assert_eq!(app.collection().view_mode(), ViewMode::Grid);

        app.handle_key(KeyCode::Char('l'), now);
        assert_eq!(app.collection().view_mode(), ViewMode::List);
        app.handle_key(KeyCode::Char('g'), now);
        assert_eq!(app.collection().view_mode(), ViewMode::Grid);
    }

    #[test]
    fn arrows_move_by_row_in_the_grid_and_by_card_in_the_list() {
        let mut app = app();
        let now = Instant::now();

        app.handle_key(KeyCode::Down, now);
        assert_eq!(app.collection().selected_position(), 3);
        app.handle_key(KeyCode::Right, now);
        assert_eq!(app.collection().selected_position(), 4);
        app.handle_key(KeyCode::Up, now);
        assert_eq!(app.collection().selected_position(), 1);

        app.handle_key(KeyCode::Char('l'), now);
        app.handle_key(KeyCode::Down, now);
        assert_eq!(app.collection().selected_position(), 2);
    }

    #[test]
    fn reveal_stamps_appear_once_and_age_out() {
        let mut app = app();
        let start = Instant::now();

        // Before any tick the cards are still unrevealed.
        assert!(app.reveal_dim(0, start));

        app.tick(start);
        assert!(app.reveal_dim(0, start + Duration::from_millis(100)));
        assert!(!app.reveal_dim(0, start + REVEAL_FADE));

        // Later ticks do not restart the fade.
        app.tick(start + Duration::from_secs(5));
        assert!(!app.reveal_dim(0, start + Duration::from_secs(6)));
    }

    #[test]
    fn reveal_stamps_follow_the_drawn_row_after_filtering_while_scrolled() {
        let mut app = app();
        // Exactly one grid row of cards fits this viewport.
        app.update_viewport(HEADER_HEIGHT + PAGE_STRIP_HEIGHT + FOOTER_HEIGHT + GRID_CARD_HEIGHT);
        let start = Instant::now();
        app.tick(start);

        // Scroll three rows down, then narrow to a card that has never been
        // on screen. The stored scroll position now points past the single
        // surviving row, but the drawn row is the clamped one.
        for _ in 0..3 {
            app.handle_key(KeyCode::Down, start);
        }
        app.filter_by_tag("Graph Learning");

        let later = start + Duration::from_secs(1);
        app.tick(later);

        let shown = app.collection().visible_indices()[0];
        assert!(app.reveal_dim(shown, later));
        assert!(!app.reveal_dim(shown, later + REVEAL_FADE));
    }

    #[test]
    fn toasts_expire_on_tick() {
        let mut app = app();
        app.show_notification("short lived", Severity::Info);
        assert!(app.toast().is_some());

        let far_future = Instant::now() + Duration::from_secs(10);
        app.tick(far_future);
        assert!(app.toast().is_none());
    }
}
