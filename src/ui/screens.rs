//! Rendering for the browsing surface. Everything here reads [`App`] state
//! and paints; nothing mutates. The card area honors the collection's scroll
//! row so page moves and cursor movement land where the state says they
//! should.

use std::time::Instant;

use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap};
use ratatui::Frame;

use crate::collection::{FacetDimension, ViewMode, VisibilityFilter};
use crate::models::Publication;
use crate::notify::Toast;
use crate::pagination::{PageControl, PageLabel};

use super::app::{
    App, FacetPickerState, Mode, TagPickerState, FACET_ROWS, FOOTER_HEIGHT, GRID_CARD_HEIGHT,
    GRID_COLUMNS, HEADER_HEIGHT, LIST_CARD_HEIGHT, PAGE_STRIP_HEIGHT,
};
use super::helpers::{centered_rect, truncate_chars};

/// Widest a toast is allowed to grow before its message clips.
const TOAST_MAX_WIDTH: u16 = 48;

pub(super) fn draw(app: &App, frame: &mut Frame, now: Instant) {
    let area = frame.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HEADER_HEIGHT),
            Constraint::Min(0),
            Constraint::Length(PAGE_STRIP_HEIGHT),
            Constraint::Length(FOOTER_HEIGHT),
        ])
        .split(area);

    draw_header(app, frame, chunks[0]);
    draw_cards(app, frame, chunks[1], now);
    draw_page_strip(app.collection.pages(), frame, chunks[2]);
    draw_footer(app, frame, chunks[3]);

    match &app.mode {
        Mode::Searching => draw_search_bar(app, frame, area),
        Mode::FacetPicker(state) => draw_facet_picker(app, frame, area, state),
        Mode::TagPicker(state) => draw_tag_picker(frame, area, state),
        Mode::Normal => {}
    }

    if let Some(toast) = &app.toast {
        draw_toast(frame, area, toast, now);
    }
}

fn draw_header(app: &App, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }

    let grid_active = app.collection.view_mode() == ViewMode::Grid;
    let button = |label: &str, active: bool| {
        if active {
            Span::styled(
                format!("[{label}]"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        } else {
            Span::styled(format!("[{label}]"), Style::default().fg(Color::DarkGray))
        }
    };

    let view_line = Line::from(vec![
        button("Grid", grid_active),
        Span::raw(" "),
        button("List", !grid_active),
        Span::raw(format!("   {} publications", app.collection.cards().len())),
    ]);

    let selection = app.collection.selection();
    let selector = |dimension: FacetDimension, value: Option<&str>| {
        vec![
            Span::styled(
                format!("{}: ", dimension.label()),
                Style::default().fg(Color::Gray),
            ),
            Span::styled(
                value.unwrap_or("All").to_string(),
                Style::default().add_modifier(Modifier::BOLD),
            ),
        ]
    };

    let mut filter_spans = Vec::new();
    filter_spans.extend(selector(FacetDimension::Year, selection.year.as_deref()));
    filter_spans.push(Span::raw("  "));
    filter_spans.extend(selector(FacetDimension::Kind, selection.kind.as_deref()));
    filter_spans.push(Span::raw("  "));
    filter_spans.extend(selector(
        FacetDimension::Category,
        selection.category.as_deref(),
    ));

    match app.collection.active_filter() {
        VisibilityFilter::Search(query) if !query.is_empty() => {
            filter_spans.push(Span::raw("  "));
            filter_spans.push(Span::styled(
                format!("Search: {query}"),
                Style::default().fg(Color::Cyan),
            ));
        }
        VisibilityFilter::Tag(tag) => {
            filter_spans.push(Span::raw("  "));
            filter_spans.push(Span::styled(
                format!("Tag: {tag}"),
                Style::default().fg(Color::Magenta),
            ));
        }
        _ => {}
    }

    let header = Paragraph::new(vec![view_line, Line::from(filter_spans)])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::ALL).title("Publications"));
    frame.render_widget(header, area);
}

fn draw_cards(app: &App, frame: &mut Frame, area: Rect, now: Instant) {
    if area.height == 0 {
        return;
    }

    if app.collection.cards().is_empty() {
        let message = Paragraph::new("No publications in the catalog.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(message, area);
        return;
    }

    let visible = app.collection.visible_indices();
    if visible.is_empty() {
        let message = Paragraph::new("No publications match the current filters.")
            .alignment(Alignment::Center)
            .block(Block::default().borders(Borders::NONE));
        frame.render_widget(message, area);
        return;
    }

    let loading = app.collection.loading(now);
    match app.collection.view_mode() {
        ViewMode::Grid => draw_card_grid(app, frame, area, &visible, loading, now),
        ViewMode::List => draw_card_list(app, frame, area, &visible, loading, now),
    }
}

fn draw_card_grid(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    visible: &[usize],
    loading: bool,
    now: Instant,
) {
    let rows_fit = ((area.height / GRID_CARD_HEIGHT) as usize).max(1);
    let start_row = app.collection.start_row(GRID_COLUMNS);

    for row in 0..rows_fit {
        let y = area.y + (row as u16) * GRID_CARD_HEIGHT;
        if y + GRID_CARD_HEIGHT > area.y + area.height {
            break;
        }
        let row_area = Rect {
            x: area.x,
            y,
            width: area.width,
            height: GRID_CARD_HEIGHT,
        };

        for (column, chunk) in split_columns(row_area).into_iter().enumerate() {
            let slot = (start_row + row) * GRID_COLUMNS + column;
            let card_index = match visible.get(slot) {
                Some(index) => *index,
                None => break,
            };
            let card = &app.collection.cards()[card_index];
            let selected = slot == app.collection.selected_position();
            let dimmed = loading || app.reveal_dim(card_index, now);
            render_grid_card(frame, chunk, card, selected, dimmed);
        }
    }
}

fn draw_card_list(
    app: &App,
    frame: &mut Frame,
    area: Rect,
    visible: &[usize],
    loading: bool,
    now: Instant,
) {
    let rows_fit = ((area.height / LIST_CARD_HEIGHT) as usize).max(1);
    let start_row = app.collection.start_row(1);

    for row in 0..rows_fit {
        let y = area.y + (row as u16) * LIST_CARD_HEIGHT;
        if y + LIST_CARD_HEIGHT > area.y + area.height {
            break;
        }
        let slot = start_row + row;
        let card_index = match visible.get(slot) {
            Some(index) => *index,
            None => break,
        };
        let chunk = Rect {
            x: area.x,
            y,
            width: area.width,
            height: LIST_CARD_HEIGHT,
        };
        let card = &app.collection.cards()[card_index];
        let selected = slot == app.collection.selected_position();
        let dimmed = loading || app.reveal_dim(card_index, now);
        render_list_card(frame, chunk, card, selected, dimmed);
    }
}

fn render_grid_card(
    frame: &mut Frame,
    area: Rect,
    card: &Publication,
    selected: bool,
    dimmed: bool,
) {
    let (block, base) = card_chrome(&card.kind, selected, dimmed);
    let width = area.width.saturating_sub(2) as usize;

    let title = if selected {
        format!("▶ {}", card.title)
    } else {
        card.title.clone()
    };
    let lines = vec![
        Line::from(Span::styled(
            truncate_chars(&title, width.saturating_mul(2)),
            base.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_chars(&card.authors, width),
            dim_or(Color::Gray, dimmed),
        )),
        Line::from(Span::styled(
            truncate_chars(&format!("{} • {}", card.journal, card.year), width),
            dim_or(Color::DarkGray, dimmed),
        )),
        tag_line(card, width, dimmed),
    ];

    let paragraph = Paragraph::new(lines)
        .block(block)
        .wrap(Wrap { trim: true })
        .alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

fn render_list_card(
    frame: &mut Frame,
    area: Rect,
    card: &Publication,
    selected: bool,
    dimmed: bool,
) {
    let (block, base) = card_chrome(&card.kind, selected, dimmed);
    let width = area.width.saturating_sub(2) as usize;
    let lines = list_card_lines(card, width, base, selected, dimmed);

    let paragraph = Paragraph::new(lines).block(block).alignment(Alignment::Left);
    frame.render_widget(paragraph, area);
}

/// Text rows of one list-mode card: title, byline, the reference link when
/// the card carries one, then the abstract.
fn list_card_lines(
    card: &Publication,
    width: usize,
    base: Style,
    selected: bool,
    dimmed: bool,
) -> Vec<Line<'static>> {
    let title = if selected {
        format!("▶ {}", card.title)
    } else {
        card.title.clone()
    };
    let byline = format!("{}  •  {} • {}", card.authors, card.journal, card.year);

    let mut lines = vec![
        Line::from(Span::styled(
            truncate_chars(&title, width),
            base.add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            truncate_chars(&byline, width),
            dim_or(Color::Gray, dimmed),
        )),
    ];
    if !card.link.is_empty() {
        lines.push(Line::from(Span::styled(
            truncate_chars(&card.link, width),
            dim_or(Color::Blue, dimmed),
        )));
    }
    lines.push(Line::from(Span::styled(
        truncate_chars(&card.abstract_text, width),
        dim_or(Color::DarkGray, dimmed),
    )));
    lines
}

/// Border, kind badge and base text style shared by both card layouts.
fn card_chrome(kind: &str, selected: bool, dimmed: bool) -> (Block<'static>, Style) {
    let mut block = Block::default()
        .borders(Borders::ALL)
        .title(format!(" {kind} "));
    if selected {
        block = block.style(Style::default().fg(Color::Yellow));
    } else if dimmed {
        block = block.style(Style::default().fg(Color::DarkGray));
    }

    let base = if dimmed && !selected {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default()
    };
    (block, base)
}

fn dim_or(color: Color, dimmed: bool) -> Style {
    if dimmed {
        Style::default().fg(Color::DarkGray)
    } else {
        Style::default().fg(color)
    }
}

fn tag_line(card: &Publication, width: usize, dimmed: bool) -> Line<'static> {
    if card.tags.is_empty() {
        return Line::from("");
    }
    let joined = card
        .tags
        .iter()
        .map(|tag| format!("[{tag}]"))
        .collect::<Vec<_>>()
        .join(" ");
    Line::from(Span::styled(
        truncate_chars(&joined, width),
        dim_or(Color::Magenta, dimmed),
    ))
}

fn split_columns(area: Rect) -> Vec<Rect> {
    let columns = GRID_COLUMNS.max(1) as u16;
    let percent = (100 / columns).max(1);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Percentage(percent); columns as usize])
        .split(area);
    chunks.iter().cloned().collect()
}

fn draw_page_strip(pages: &PageControl, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }

    let button = |label: &str, disabled: bool| {
        if disabled {
            Span::styled(label.to_string(), Style::default().fg(Color::DarkGray))
        } else {
            Span::styled(
                label.to_string(),
                Style::default()
                    .fg(Color::Cyan)
                    .add_modifier(Modifier::BOLD),
            )
        }
    };

    let mut spans = vec![button("« Prev", pages.prev_disabled()), Span::raw("  ")];
    for entry in pages.entries() {
        match entry.label {
            PageLabel::Number(n) if entry.active => spans.push(Span::styled(
                format!("[{n}]"),
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )),
            PageLabel::Number(n) => spans.push(Span::raw(format!(" {n} "))),
            PageLabel::Ellipsis => {
                spans.push(Span::styled(" … ", Style::default().fg(Color::DarkGray)))
            }
        }
    }
    spans.push(Span::raw("  "));
    spans.push(button("Next »", pages.next_disabled()));

    let strip = Paragraph::new(Line::from(spans)).alignment(Alignment::Center);
    frame.render_widget(strip, area);
}

fn draw_footer(app: &App, frame: &mut Frame, area: Rect) {
    if area.height == 0 {
        return;
    }
    let block = Block::default().borders(Borders::TOP);
    frame.render_widget(block.clone(), area);
    let inner = block.inner(area);

    let pages = app.collection.pages();
    let counts = Line::from(Span::styled(
        format!(
            "{} of {} publications   page {} of {}",
            app.collection.visible_count(),
            app.collection.cards().len(),
            pages.current_page(),
            pages.max_page(),
        ),
        Style::default().fg(Color::Gray),
    ));

    let paragraph =
        Paragraph::new(vec![counts, footer_instructions(app)]).wrap(Wrap { trim: true });
    frame.render_widget(paragraph, inner);
}

fn footer_instructions(app: &App) -> Line<'static> {
    let key_style = Style::default()
        .fg(Color::Cyan)
        .add_modifier(Modifier::BOLD);
    match &app.mode {
        Mode::Searching => Line::from(vec![
            Span::styled("[Enter/Esc]", key_style),
            Span::raw(" Close   results update as you type"),
        ]),
        Mode::FacetPicker(_) => Line::from(vec![
            Span::styled("[↑↓]", key_style),
            Span::raw(" Selector   "),
            Span::styled("[←→]", key_style),
            Span::raw(" Cycle   "),
            Span::styled("[Enter/Esc]", key_style),
            Span::raw(" Close"),
        ]),
        Mode::TagPicker(_) => Line::from(vec![
            Span::styled("[↑↓]", key_style),
            Span::raw(" Select   "),
            Span::styled("[Enter]", key_style),
            Span::raw(" Filter   "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Cancel"),
        ]),
        Mode::Normal => Line::from(vec![
            Span::styled("[←↑↓→]", key_style),
            Span::raw(" Move   "),
            Span::styled("[Enter]", key_style),
            Span::raw(" View   "),
            Span::styled("[d]", key_style),
            Span::raw(" PDF   "),
            Span::styled("[c]", key_style),
            Span::raw(" Cite   "),
            Span::styled("[s]", key_style),
            Span::raw(" Share   "),
            Span::styled("[/]", key_style),
            Span::raw(" Search   "),
            Span::styled("[f]", key_style),
            Span::raw(" Filters   "),
            Span::styled("[t]", key_style),
            Span::raw(" Tags   "),
            Span::styled("[g/l]", key_style),
            Span::raw(" Layout   "),
            Span::styled("[ [ ] ]", key_style),
            Span::raw(" Page   "),
            Span::styled("[Esc]", key_style),
            Span::raw(" Clear   "),
            Span::styled("[q]", key_style),
            Span::raw(" Quit"),
        ]),
    }
}

fn draw_search_bar(app: &App, frame: &mut Frame, area: Rect) {
    let height = 3u16.min(area.height);
    let popup_area = Rect {
        x: area.x,
        y: area.y,
        width: area.width,
        height,
    };
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .borders(Borders::ALL)
        .title("Search Publications");
    let paragraph = Paragraph::new(Span::raw(format!("Search: {}", app.search_query)))
        .block(block.clone())
        .wrap(Wrap { trim: true });
    frame.render_widget(paragraph, popup_area);

    let inner = block.inner(popup_area);
    let cursor_x = inner.x + "Search: ".len() as u16 + app.search_query.chars().count() as u16;
    let cursor_y = inner.y;
    frame.set_cursor_position((cursor_x, cursor_y));
}

fn draw_facet_picker(app: &App, frame: &mut Frame, area: Rect, state: &FacetPickerState) {
    let popup_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default().title("Filters").borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let selection = app.collection.selection();
    let mut lines = Vec::new();
    for (row, dimension) in FACET_ROWS.iter().enumerate() {
        let value = match dimension {
            FacetDimension::Year => selection.year.as_deref(),
            FacetDimension::Kind => selection.kind.as_deref(),
            FacetDimension::Category => selection.category.as_deref(),
        }
        .unwrap_or("All");

        let marker = if row == state.row { "▶ " } else { "  " };
        let text = format!("{marker}{:<10} ‹ {value} ›", dimension.label());
        let style = if row == state.row {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD)
        } else {
            Style::default()
        };
        lines.push(Line::from(Span::styled(text, style)));
    }
    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Every change filters immediately.",
        Style::default().fg(Color::DarkGray),
    )));

    let paragraph = Paragraph::new(lines).alignment(Alignment::Left);
    frame.render_widget(paragraph, inner);
}

fn draw_tag_picker(frame: &mut Frame, area: Rect, state: &TagPickerState) {
    let popup_area = centered_rect(50, 40, area);
    frame.render_widget(Clear, popup_area);

    let block = Block::default()
        .title(format!("Tags: {}", truncate_chars(&state.title, 40)))
        .borders(Borders::ALL);
    frame.render_widget(block.clone(), popup_area);
    let inner = block.inner(popup_area);

    let items: Vec<ListItem> = state
        .tags
        .iter()
        .map(|tag| ListItem::new(tag.clone()))
        .collect();
    let list = List::new(items)
        .block(Block::default().borders(Borders::NONE))
        .highlight_style(Style::default().fg(Color::Yellow))
        .highlight_symbol("▶ ");

    let mut list_state = ListState::default();
    list_state.select(Some(state.selected));
    frame.render_stateful_widget(list, inner, &mut list_state);
}

fn draw_toast(frame: &mut Frame, area: Rect, toast: &Toast, now: Instant) {
    let fraction = match toast.offset_fraction(now) {
        Some(fraction) => fraction,
        None => return,
    };
    if area.width < 3 || area.height < 2 {
        return;
    }

    let text = format!(" {} ", toast.message);
    let width = (text.chars().count() as u16)
        .min(TOAST_MAX_WIDTH)
        .min(area.width.saturating_sub(2));
    let visible_cols = ((1.0 - fraction) * f64::from(width)).round() as u16;
    if visible_cols == 0 {
        return;
    }

    let toast_area = Rect {
        x: area.x + area.width - visible_cols,
        y: area.y + 1,
        width: visible_cols,
        height: 1,
    };
    frame.render_widget(Clear, toast_area);

    let style = Style::default()
        .bg(toast.severity.color())
        .fg(Color::White)
        .add_modifier(Modifier::BOLD);
    frame.render_widget(Paragraph::new(text).style(style), toast_area);
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card(link: &str) -> Publication {
        Publication {
            title: "Zero-Copy Ingestion".to_string(),
            authors: "Martins, R.".to_string(),
            journal: "SDIS".to_string(),
            year: "2024".to_string(),
            kind: "conference".to_string(),
            category: "systems".to_string(),
            abstract_text: "An ingestion path.".to_string(),
            tags: Vec::new(),
            link: link.to_string(),
        }
    }

    #[test]
    fn list_cards_surface_the_reference_link() {
        let lines = list_card_lines(
            &card("https://example.org/papers/ingestion"),
            60,
            Style::default(),
            false,
            false,
        );
        assert_eq!(lines.len(), 4);
        assert_eq!(
            lines[2].spans[0].content.as_ref(),
            "https://example.org/papers/ingestion"
        );
    }

    #[test]
    fn list_cards_without_a_link_skip_the_link_row() {
        let lines = list_card_lines(&card(""), 60, Style::default(), false, false);
        assert_eq!(lines.len(), 3);
        assert_eq!(lines[0].spans[0].content.as_ref(), "Zero-Copy Ingestion");
    }
}
