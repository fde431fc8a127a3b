use ratatui::layout::Rect;
use ratatui::style::{Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratatui::Frame;

use crate::theme::{band_style, dimension_color, header_style, muted_style, title_style, value_style};
use crate::transcript::analysis::{OverallSummary, Score};
use crate::transcript::{AnalysisRecord, DimensionSection};

pub fn draw_analysis(
    f: &mut Frame,
    area: Rect,
    record: &AnalysisRecord,
    show_transcription: bool,
    scroll: u16,
) {
    let lines = analysis_lines(record, show_transcription);
    let block = Paragraph::new(lines)
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title("Call Analysis & Feedback"),
        );
    f.render_widget(block, area);
}

fn analysis_lines(record: &AnalysisRecord, show_transcription: bool) -> Vec<Line<'static>> {
    let mut lines = Vec::new();
    if !record.has_any_content() {
        lines.push(Line::from(Span::styled("No analysis available", muted_style())));
        return lines;
    }

    if record.overall.is_offerable() {
        push_overall(&mut lines, &record.overall);
    }

    for section in record.offerable_sections() {
        push_section(&mut lines, section);
    }

    if let Some(transcription) = record.transcription.as_deref() {
        lines.push(Line::from(Span::styled("Call Transcription", title_style())));
        if show_transcription {
            for text in transcription.lines() {
                lines.push(Line::from(Span::styled(text.to_string(), value_style())));
            }
        } else {
            lines.push(Line::from(Span::styled("(hidden, press t to show)", muted_style())));
        }
        lines.push(Line::default());
    }

    lines
}

fn push_overall(lines: &mut Vec<Line<'static>>, overall: &OverallSummary) {
    let mut heading = vec![Span::styled("Overall Assessment", title_style())];
    if let Some(score) = &overall.overall_score {
        heading.push(Span::raw("   "));
        heading.extend(score_spans("Overall Score", score));
    }
    lines.push(Line::from(heading));
    push_labelled(lines, "Key Strengths", overall.strengths.as_deref());
    push_labelled(
        lines,
        "Areas for Improvement",
        overall.areas_for_improvement.as_deref(),
    );
    lines.push(Line::default());
}

fn push_section(lines: &mut Vec<Line<'static>>, section: &DimensionSection) {
    let heading_style = Style::default()
        .fg(dimension_color(section.dimension))
        .add_modifier(Modifier::BOLD);
    let mut heading = vec![Span::styled(section.dimension.title().to_string(), heading_style)];
    if let Some(score) = &section.score {
        heading.push(Span::raw("   "));
        heading.extend(score_spans("Score", score));
    }
    lines.push(Line::from(heading));
    push_labelled(lines, "Analysis", section.detail.as_deref());
    push_labelled(lines, "Positive Examples", section.positive.as_deref());
    push_labelled(lines, "Areas to Address", section.negative.as_deref());
    push_labelled(lines, "Suggestions", section.suggestions.as_deref());
    lines.push(Line::default());
}

fn score_spans(label: &str, score: &Score) -> Vec<Span<'static>> {
    let band = score.band();
    let mut spans = vec![
        Span::styled(format!("{label}: "), muted_style()),
        Span::styled(score.to_string(), band_style(band)),
    ];
    if let Some(band) = band {
        spans.push(Span::styled(format!(" ({})", band.label()), band_style(Some(band))));
    }
    spans
}

fn push_labelled(lines: &mut Vec<Line<'static>>, label: &str, text: Option<&str>) {
    let Some(text) = text else {
        return;
    };
    lines.push(Line::from(vec![
        Span::styled(format!("  {label}: "), header_style()),
        Span::styled(text.to_string(), value_style()),
    ]));
}
