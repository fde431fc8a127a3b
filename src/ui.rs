use ratatui::layout::{Alignment, Constraint, Direction, Layout, Rect};
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Cell, Clear, Paragraph, Row, Table, TableState};
use ratatui::Frame;

use crate::model::AppState;
use crate::pagination::PageState;
use crate::theme::{
    error_style, header_style, muted_style, selected_style, title_style, value_style, ACCENT,
};
use crate::transcript::SUMMARY_COLUMNS;
use crate::ui_analysis::draw_analysis;

pub fn draw(f: &mut Frame, s: &AppState) {
    let area = f.size();
    f.render_widget(Clear, area);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3),
            Constraint::Min(5),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(area);

    draw_header(f, chunks[0], s);
    draw_body(f, chunks[1], s);
    draw_pager(f, chunks[2], s);
    draw_status(f, chunks[3], s);
}

fn draw_header(f: &mut Frame, area: Rect, s: &AppState) {
    let account = match (&s.profile, &s.profile_error) {
        (Some(profile), _) => Line::from(vec![
            Span::styled(profile.display_name().to_string(), header_style()),
            Span::raw("  ·  "),
            Span::styled(format!("{} minutes left", profile.minutes), value_style()),
        ]),
        (None, Some(_)) => Line::from(Span::styled("Profile unavailable", muted_style())),
        (None, None) => Line::from(Span::styled("Loading profile…", muted_style())),
    };
    let title = Line::from(vec![
        Span::styled("Audio Transcriptions", title_style()),
        Span::raw("  "),
        Span::styled(s.location.clone(), muted_style()),
    ]);

    let block = Paragraph::new(vec![title, account])
        .alignment(Alignment::Left)
        .block(Block::default().borders(Borders::BOTTOM));
    f.render_widget(block, area);
}

fn draw_body(f: &mut Frame, area: Rect, s: &AppState) {
    let analysis = s.transcriptions.selected_analysis();
    let (table_area, analysis_area) = if analysis.is_some() && !s.is_loading() {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Percentage(35), Constraint::Percentage(65)])
            .split(area);
        (chunks[0], Some(chunks[1]))
    } else {
        (area, None)
    };

    draw_table(f, table_area, s);

    if let (Some(record), Some(area)) = (analysis, analysis_area) {
        draw_analysis(
            f,
            area,
            &record,
            s.transcriptions.show_transcription,
            s.transcriptions.analysis_scroll,
        );
    }
}

fn draw_table(f: &mut Frame, area: Rect, s: &AppState) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title("Transcription Records");

    // Old rows are never shown under a pending fetch.
    if s.is_loading() {
        f.render_widget(block, area);
        render_loading_overlay(f, area, "Loading transcriptions…");
        return;
    }

    let Some(loaded) = s.transcriptions.table.as_ref() else {
        let message = if s.transcriptions.error.is_some() {
            "Transcriptions could not be loaded. Press r to retry."
        } else {
            "No data yet."
        };
        let placeholder = Paragraph::new(message)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    };

    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Transcription Records · page {}", loaded.page));
    if loaded.table.is_empty() {
        let lines = vec![
            Line::from(Span::styled("No transcriptions found", header_style())),
            Line::from(Span::styled(
                "Upload some audio files to get started",
                muted_style(),
            )),
        ];
        let placeholder = Paragraph::new(lines)
            .alignment(Alignment::Center)
            .block(block);
        f.render_widget(placeholder, area);
        return;
    }

    let header = Row::new(
        SUMMARY_COLUMNS
            .iter()
            .map(|column| Cell::from(column.label))
            .chain(std::iter::once(Cell::from("Actions"))),
    )
    .style(header_style().fg(ACCENT));

    let rows: Vec<Row> = loaded
        .summaries()
        .iter()
        .enumerate()
        .map(|(index, summary)| {
            let action = if !summary.has_analysis {
                Span::styled("No analysis available", muted_style())
            } else if s.transcriptions.expanded == Some(index) {
                Span::styled("Hide Analysis", value_style().add_modifier(Modifier::BOLD))
            } else {
                Span::styled("View Analysis ▸", value_style())
            };
            let mut cells: Vec<Cell> = summary
                .cells
                .iter()
                .map(|cell| Cell::from(cell.clone()))
                .collect();
            cells.push(Cell::from(action));
            Row::new(cells)
        })
        .collect();

    let widths = [
        Constraint::Length(8),
        Constraint::Min(16),
        Constraint::Length(24),
        Constraint::Length(22),
    ];
    let table = Table::new(rows, widths)
        .header(header)
        .block(block)
        .highlight_style(selected_style());

    let mut state = TableState::default();
    state.select(Some(s.transcriptions.cursor));
    f.render_stateful_widget(table, area, &mut state);
}

fn draw_pager(f: &mut Frame, area: Rect, s: &AppState) {
    let pagination = &s.pagination;
    let mut spans = Vec::new();
    if pagination.can_go_previous() {
        spans.push(Span::styled("◂ Previous (p)", value_style()));
        spans.push(Span::raw("   "));
    }
    let label = match pagination.total_pages() {
        Some(total) => format!("Page {} of {}", pagination.current_page(), total),
        None => format!("Page {}", pagination.current_page()),
    };
    spans.push(Span::styled(label, header_style()));
    if let PageState::Transitioning { from, to, .. } = pagination.state() {
        if from != to {
            spans.push(Span::styled(format!(" (from {from})"), muted_style()));
        }
    } else if let Some(count) = pagination.total_count() {
        spans.push(Span::styled(format!(" · {count} calls"), muted_style()));
    }
    spans.push(Span::raw("   "));
    let next_style = if pagination.can_go_next() {
        value_style()
    } else {
        muted_style()
    };
    spans.push(Span::styled("Next (n) ▸", next_style));

    let pager = Paragraph::new(Line::from(spans))
        .alignment(Alignment::Center)
        .block(Block::default().borders(Borders::TOP));
    f.render_widget(pager, area);
}

fn draw_status(f: &mut Frame, area: Rect, s: &AppState) {
    let line = match &s.transcriptions.error {
        Some(err) => Line::from(Span::styled(err.clone(), error_style())),
        None => Line::from(Span::styled(
            "↑/↓ select · Enter analysis · PgUp/PgDn scroll · n/p page · r reload · t transcript · q quit",
            muted_style(),
        )),
    };
    f.render_widget(Paragraph::new(line), area);
}

pub(crate) fn render_loading_overlay(f: &mut Frame, area: Rect, message: &str) {
    let text_width = (message.chars().count() as u16).saturating_add(4);
    let overlay_width = text_width.min(area.width);
    let overlay_height = 3.min(area.height).max(1);
    let x = area.x + (area.width.saturating_sub(overlay_width)) / 2;
    let y = area.y + (area.height.saturating_sub(overlay_height)) / 2;
    let overlay = Rect {
        x,
        y,
        width: overlay_width,
        height: overlay_height,
    };
    f.render_widget(Clear, overlay);
    let block = Paragraph::new(message)
        .alignment(Alignment::Center)
        .style(Style::default())
        .block(Block::default().borders(Borders::ALL));
    f.render_widget(block, overlay);
}

#[cfg(test)]
mod tests {
    use ratatui::backend::TestBackend;
    use ratatui::buffer::Buffer;
    use ratatui::Terminal;
    use serde_json::json;

    use super::*;
    use crate::model::AppEvent;
    use crate::transcript::TranscriptionPage;

    fn buffer_text(buffer: &Buffer) -> String {
        let area = buffer.area;
        let mut out = String::new();
        for y in 0..area.height {
            for x in 0..area.width {
                out.push_str(buffer.get(x, y).symbol());
            }
            out.push('\n');
        }
        out
    }

    fn render(state: &AppState) -> String {
        let backend = TestBackend::new(110, 30);
        let mut terminal = Terminal::new(backend).expect("terminal");
        terminal.draw(|f| draw(f, state)).expect("draw");
        buffer_text(terminal.backend().buffer())
    }

    fn loaded_state() -> AppState {
        let (mut state, fetch) = AppState::mount("/transcriptions?page=1", true);
        let page: TranscriptionPage = serde_json::from_value(json!({
            "headers": ["id", "name", "time", "pitch_followed_score", "strengths"],
            "table_data": [
                ["7", "Acme Call", "2024-03-01 09:00:00", "9", null],
                ["8", "Cold lead", "2024-03-02 10:15:00", null, "null"]
            ]
        }))
        .expect("payload");
        state.apply(AppEvent::PageLoaded {
            token: fetch.token,
            result: Ok(page),
        });
        state
    }

    #[test]
    fn loading_view_hides_rows() {
        let (state, _) = AppState::mount("/transcriptions", true);
        let text = render(&state);
        assert!(text.contains("Loading transcriptions"));
        assert!(!text.contains("Acme Call"));
    }

    #[test]
    fn page_change_hides_previous_rows_until_settled() {
        let mut state = loaded_state();
        assert!(render(&state).contains("Acme Call"));

        let fetch = state.next_page().expect("next page");
        assert!(state.is_loading());
        assert!(state.transcriptions.table.is_some());
        let text = render(&state);
        assert!(text.contains("Loading transcriptions"));
        assert!(!text.contains("Acme Call"));
        assert!(!text.contains("Cold lead"));

        state.apply(AppEvent::PageLoaded {
            token: fetch.token,
            result: Ok(serde_json::from_value(json!({
                "headers": ["id", "name", "time"],
                "table_data": [["9", "Renewal", "2024-03-04 11:00:00"]]
            }))
            .expect("payload")),
        });
        let text = render(&state);
        assert!(text.contains("Renewal"));
        assert!(!text.contains("Acme Call"));
    }

    #[test]
    fn table_shows_summary_and_actions() {
        let text = render(&loaded_state());
        assert!(text.contains("Acme Call"));
        assert!(text.contains("Mar 1, 2024, 09:00 AM"));
        assert!(text.contains("View Analysis"));
        assert!(text.contains("No analysis available"));
        assert!(text.contains("Page 1"));
        assert!(!text.contains("Previous"));
    }

    #[test]
    fn expanded_row_renders_analysis_panel() {
        let mut state = loaded_state();
        state.transcriptions.toggle_analysis();
        let text = render(&state);
        assert!(text.contains("Hide Analysis"));
        assert!(text.contains("Pitch Quality"));
        assert!(text.contains("9/10"));
        assert!(!text.contains("Energy Level"));
    }
}
