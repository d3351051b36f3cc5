//! Frame rendering for roam.
//!
//! Reads session state plus config and produces widgets; no navigation
//! logic lives here. The layout is a title bar, a location bar, the
//! entry pane and a status line (which doubles as the go-to-path
//! prompt).

use crate::app::session::{NavigatorSession, SelectionMode};
use crate::utils::fit_width;

use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Modifier, Style},
    text::{Line, Span},
    widgets::{Block, BorderType, Borders, Paragraph},
};

/// Renders the whole frame and feeds the pane height back into the
/// session so selector clamping matches what is on screen.
pub fn render(frame: &mut Frame, session: &mut NavigatorSession) {
    let area = frame.area();
    let title_rows = u16::from(session.config().title_bar());

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(title_rows),
            Constraint::Length(1),
            Constraint::Min(1),
            Constraint::Length(1),
        ])
        .split(area);

    let pane = chunks[2];
    let visible = pane.height.saturating_sub(2).max(1);
    session.set_visible_rows(visible as usize);

    if session.config().title_bar() {
        render_title(frame, session, chunks[0]);
    }
    render_location(frame, session, chunks[1]);
    render_entries(frame, session, pane);
    render_status(frame, session, chunks[3]);
}

fn render_title(frame: &mut Frame, session: &NavigatorSession, area: Rect) {
    let accent = session.config().accent_style();
    let mut spans = vec![Span::styled(
        session.title().to_owned(),
        accent.add_modifier(Modifier::BOLD),
    )];
    if session.selection_mode() == SelectionMode::Single {
        spans.push(Span::raw("  "));
        spans.push(Span::styled("[select]", accent));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_location(frame: &mut Frame, session: &NavigatorSession, area: Rect) {
    let mut text = session.location_line();
    if session.fetching() {
        text.push_str("  ");
        text.push_str(session.spinner());
        text.push_str(" fetching… (Esc cancels)");
    }
    let line = fit_width(&text, area.width as usize);
    frame.render_widget(
        Paragraph::new(line).style(session.config().accent_style()),
        area,
    );
}

fn render_entries(frame: &mut Frame, session: &NavigatorSession, area: Rect) {
    let config = session.config();
    let block = Block::default()
        .borders(Borders::ALL)
        .border_type(BorderType::Rounded)
        .border_style(config.accent_style());
    let inner_width = area.width.saturating_sub(2) as usize;

    let mut lines: Vec<Line> = Vec::new();
    if let Some(listing) = session.listing() {
        let from = session.scroll_offset();
        let to = (from + session.visible_rows()).min(listing.len());
        for idx in from..to {
            let Some(entry) = listing.get(idx) else {
                break;
            };

            let marker = if session.marked_idx() == Some(idx) {
                config.marker_icon()
            } else {
                " "
            };
            let text = fit_width(
                &entry.display_text(config.dir_marker()),
                inner_width.saturating_sub(2),
            );

            let style = if idx == session.selected_idx() {
                config.selection_style()
            } else if entry.is_dir() {
                config.directory_style()
            } else {
                Style::default()
            };

            lines.push(Line::from(vec![
                Span::raw(format!("{marker} ")),
                Span::styled(text, style),
            ]));
        }
        if listing.is_empty() {
            lines.push(Line::from(Span::styled(
                "  (empty)",
                Style::default().add_modifier(Modifier::DIM),
            )));
        }
    }

    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_status(frame: &mut Frame, session: &NavigatorSession, area: Rect) {
    let config = session.config();

    // Prompt replaces the status line while open.
    if let Some(buffer) = session.prompt() {
        let prompt = format!("Go to: {buffer}▌");
        frame.render_widget(
            Paragraph::new(fit_width(&prompt, area.width as usize))
                .style(config.accent_style()),
            area,
        );
        return;
    }

    let left = if let Some(notice) = session.notice_text() {
        Span::styled(
            notice.to_owned(),
            Style::default().add_modifier(Modifier::BOLD),
        )
    } else if config.key_hints() {
        Span::styled(
            hint_text(session.selection_mode()).to_owned(),
            Style::default().add_modifier(Modifier::DIM),
        )
    } else {
        Span::raw("")
    };

    let mut right = format!("{} entries", session.entry_count());
    if session.max_depth() > 0 {
        right.push_str(&format!(
            "  depth {}/{}",
            session.rel().depth(),
            session.max_depth()
        ));
    }

    let left_width = area.width.saturating_sub(right.len() as u16 + 1);
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Length(left_width), Constraint::Min(1)])
        .split(area);

    frame.render_widget(Paragraph::new(Line::from(left)), columns[0]);
    frame.render_widget(
        Paragraph::new(right).right_aligned().style(config.accent_style()),
        columns[1],
    );
}

fn hint_text(mode: SelectionMode) -> &'static str {
    match mode {
        SelectionMode::Single => {
            "↑/↓ move  →/↵ enter  ← parent  space mark  ↵ pick  r refresh  g go to  q quit"
        }
        SelectionMode::Disabled => {
            "↑/↓ move  →/↵ enter  ← parent  r refresh  g go to  q quit"
        }
    }
}
