use std::time::Instant;

use chrono::Local;
use ratatui::Frame;
use ratatui::layout::{Position, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::symbols::Marker;
use ratatui::text::{Line, Span, Text};
use ratatui::widgets::canvas::Canvas;
use ratatui::widgets::{Block, Borders, Clear, List, ListItem, Paragraph, Wrap};

use super::app::{HistoryPanel, MessageType, StatusMessage};
use super::layout::AppLayout;
use super::timestamps::format_message_time;
use crate::chat::{TYPING_TEXT, Transcript, markup};
use crate::effects::confetti::Confetti;
use crate::effects::{Bounds, Effect, EffectSwitcher};
use crate::history::{SummaryHistory, history_label};
use crate::models::{ChatMessage, EffectKind, Palette, Sender, Theme};
use crate::scene::Scene;
use crate::session::Session;
use crate::wordcloud::{UNITS_PER_COLUMN, UNITS_PER_ROW, WordCloud};

/// Everything a frame needs besides the layout
pub struct RenderState<'a> {
    pub session: &'a Session,
    pub scene: &'a Scene,
    pub effects: &'a EffectSwitcher,
    pub confetti: &'a Confetti,
    pub theme: Theme,
    /// Cyberpunk flicker phase; false dims the accent for this frame
    pub accent_on: bool,
    pub history_panel: Option<&'a HistoryPanel>,
    pub status_message: Option<&'a StatusMessage>,
    /// Rows scrolled back from the end of the transcript
    pub chat_scroll: u16,
    pub now: Instant,
}

/// Render the entire UI
pub fn render_ui(frame: &mut Frame, state: &RenderState) {
    let layout = AppLayout::new(frame.area(), state.history_panel.is_some());
    let palette = state.theme.palette();
    let accent = if state.accent_on { palette.accent } else { palette.muted };

    render_background(frame, layout.background_area, state);
    render_transcript(frame, layout.chat_area, state.session.transcript(), &palette, state.chat_scroll, state.now);
    render_input(frame, layout.input_area, state.session, &palette, accent);
    render_word_cloud(frame, layout.cloud_area, state.session.word_cloud(), &palette);
    if let (Some(area), Some(panel)) = (layout.history_area, state.history_panel) {
        render_history(frame, area, state.session.history(), panel, &palette);
    }
    render_status_bar(frame, layout.status_area, state, &palette);

    if let Some(message) = state.session.alert() {
        render_alert(frame, layout.background_area, message, &palette);
    }
}

/// Scene, background effect and confetti share one braille canvas behind everything
fn render_background(frame: &mut Frame, area: Rect, state: &RenderState) {
    let bounds = Bounds::from_cells(area.width, area.height);
    if bounds.is_empty() {
        return;
    }
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, bounds.width])
        .y_bounds([0.0, bounds.height])
        .paint(|ctx| {
            state.scene.draw(ctx, bounds);
            ctx.layer();
            state.effects.draw(ctx);
            if state.confetti.is_running() {
                ctx.layer();
                state.confetti.draw(ctx, bounds);
            }
        });
    frame.render_widget(canvas, area);
}

/// Header plus body of one message; `dots` animates the typing placeholder
fn message_lines<'a>(message: &ChatMessage, palette: &Palette, dots: usize) -> Vec<Line<'a>> {
    let (name, color) = match message.sender {
        Sender::User => ("You", palette.user),
        Sender::Bot => ("Gemini", palette.bot),
    };
    let mut header = vec![Span::styled(name, Style::default().fg(color).add_modifier(Modifier::BOLD))];
    if let Some(timestamp) = &message.timestamp {
        let time = format_message_time(timestamp, &Local::now());
        header.push(Span::styled(format!(" · {time}"), Style::default().fg(palette.muted)));
    }

    let mut lines = vec![Line::from(header)];
    if message.typing {
        let dots = ".".repeat(dots);
        lines.push(Line::styled(format!("{TYPING_TEXT}{dots}"), Style::default().fg(palette.muted)));
    } else {
        let text = markup::decode(&message.content);
        let style = if text.starts_with('❌') || text.starts_with('⚠') {
            Style::default().fg(palette.error)
        } else {
            Style::default().fg(palette.text)
        };
        lines.extend(text.split('\n').map(|line| Line::styled(line.to_string(), style)));
    }
    lines.push(Line::from(""));
    lines
}

/// Rows `lines` occupy once wrapped to `width` columns
fn wrapped_height(lines: &[Line], width: u16) -> u16 {
    let width = usize::from(width.max(1));
    let rows: usize = lines.iter().map(|line| line.width().div_ceil(width).max(1)).sum();
    u16::try_from(rows).unwrap_or(u16::MAX)
}

fn render_transcript(
    frame: &mut Frame,
    area: Rect,
    transcript: &Transcript,
    palette: &Palette,
    scroll_back: u16,
    now: Instant,
) {
    let dots = transcript.typing_dots(now);
    let mut lines: Vec<Line> = Vec::new();
    for message in transcript.messages() {
        lines.extend(message_lines(message, palette, dots));
    }
    if lines.is_empty() {
        lines.push(Line::styled(
            "Paste or type some text, then press Enter to ask or Ctrl+S to summarize.",
            Style::default().fg(palette.muted),
        ));
    }

    let inner_height = area.height.saturating_sub(2);
    let total = wrapped_height(&lines, area.width.saturating_sub(2));
    let scroll = total.saturating_sub(inner_height).saturating_sub(scroll_back);

    let paragraph = Paragraph::new(Text::from(lines))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.muted))
                .title(" Chat "),
        )
        .wrap(Wrap { trim: false })
        .scroll((scroll, 0));

    frame.render_widget(paragraph, area);
}

fn render_input(frame: &mut Frame, area: Rect, session: &Session, palette: &Palette, accent: Color) {
    let options = session.options();
    let memory = if options.memory { "on" } else { "off" };
    let busy = if session.is_pending() { "⏳ working... · " } else { "" };
    let title = format!(" {busy}lang {} · mode {} · memory {} ", options.language, options.mode, memory);

    let text = session.input();
    let lines: Vec<&str> = text.split('\n').collect();
    let inner_height = area.height.saturating_sub(2);
    let scroll = u16::try_from(lines.len()).unwrap_or(u16::MAX).saturating_sub(inner_height);

    let paragraph = Paragraph::new(text.to_string())
        .style(Style::default().fg(palette.text))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(accent))
                .title(title),
        )
        .scroll((scroll, 0));
    frame.render_widget(paragraph, area);

    // Cursor after the last character
    if area.width > 2 && area.height > 2 {
        let last = lines.last().map(|l| l.chars().count()).unwrap_or(0);
        let row = u16::try_from(lines.len().saturating_sub(1)).unwrap_or(u16::MAX).saturating_sub(scroll);
        let column = u16::try_from(last).unwrap_or(u16::MAX).min(area.width - 3);
        frame.set_cursor_position(Position::new(area.x + 1 + column, area.y + 1 + row.min(inner_height - 1)));
    }
}

fn render_word_cloud(frame: &mut Frame, area: Rect, cloud: &WordCloud, palette: &Palette) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(palette.muted))
        .title(" Keywords ");
    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.is_empty() {
        return;
    }

    if !cloud.is_running() {
        let hint = Paragraph::new("Keywords of the latest summary float here. Click one to focus on it.")
            .style(Style::default().fg(palette.muted))
            .wrap(Wrap { trim: true });
        frame.render_widget(hint, inner);
        return;
    }

    let (width, height) = (f64::from(inner.width) * UNITS_PER_COLUMN, f64::from(inner.height) * UNITS_PER_ROW);
    let canvas = Canvas::default()
        .marker(Marker::Braille)
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .paint(|ctx| cloud.draw(ctx));
    frame.render_widget(canvas, inner);
}

fn render_history(frame: &mut Frame, area: Rect, history: &SummaryHistory, panel: &HistoryPanel, palette: &Palette) {
    let offset = panel.offset(usize::from(area.height.saturating_sub(2)));
    let items: Vec<ListItem> = panel
        .matches
        .iter()
        .enumerate()
        .skip(offset)
        .filter_map(|(row, &idx)| history.get(idx).map(|entry| (row, entry)))
        .map(|(row, entry)| {
            let style = if row == panel.selected {
                Style::default().fg(palette.text).bg(palette.accent).add_modifier(Modifier::BOLD)
            } else {
                Style::default().fg(palette.muted)
            };
            ListItem::new(history_label(&entry.replace('\n', " "))).style(style)
        })
        .collect();

    let title = if panel.query.is_empty() {
        format!(" History ({}) ", history.len())
    } else {
        format!(" History ({}/{}) · {} ", panel.matches.len(), history.len(), panel.query)
    };
    let list = List::new(items).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(palette.accent))
            .title(title),
    );

    frame.render_widget(list, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, state: &RenderState, palette: &Palette) {
    let (status_text, style) = if let Some(message) = state.status_message {
        let fg = match message.message_type {
            MessageType::Success => palette.accent,
            MessageType::Error => palette.error,
        };
        (format!(" {} ", message.text), Style::default().fg(fg).bg(palette.status_bg))
    } else {
        let mut parts = vec![format!("[{}]", state.theme)];
        if state.effects.active_kind() != EffectKind::None {
            parts.push(format!("bg: {}", state.effects.active_kind()));
        }
        if state.history_panel.is_some() {
            parts.push("Enter: replay".to_string());
            parts.push("Esc: close".to_string());
        } else {
            parts.push("Enter: ask".to_string());
            parts.push("^S sum ^B bullets ^T takeaways ^L links ^R rephrase".to_string());
            parts.push("Tab: history".to_string());
        }
        parts.push("Ctrl+C: quit".to_string());
        (format!(" {} ", parts.join(" | ")), Style::default().fg(palette.text).bg(palette.status_bg))
    };

    frame.render_widget(Paragraph::new(status_text).style(style), area);
}

/// Modal alert centered over `area`
fn render_alert(frame: &mut Frame, area: Rect, message: &str, palette: &Palette) {
    let width = area.width.min(60);
    let height = area.height.min(5);
    let popup = Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    );

    let text = Text::from(vec![
        Line::styled(message.to_string(), Style::default().fg(palette.error)),
        Line::styled("Press Enter or Esc to dismiss", Style::default().fg(palette.muted)),
    ]);
    let paragraph = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Style::default().fg(palette.error))
                .title(" Alert "),
        )
        .wrap(Wrap { trim: true });

    frame.render_widget(Clear, popup);
    frame.render_widget(paragraph, popup);
}
