use ratatui::layout::{Constraint, Direction, Layout, Rect};

/// Rows taken by the input box, borders included
const INPUT_HEIGHT: u16 = 5;

/// Chat layout drawn over the full-screen background canvas
pub struct AppLayout {
    pub background_area: Rect,
    pub chat_area: Rect,
    pub input_area: Rect,
    pub cloud_area: Rect,
    pub history_area: Option<Rect>,
    pub status_area: Rect,
}

impl AppLayout {
    /// - Chat transcript and input box: 62% width (left)
    /// - Word cloud, with the history panel below it when shown: 38% width (right)
    /// - Status bar: bottom row
    pub fn new(area: Rect, show_history: bool) -> Self {
        let vertical_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(1)])
            .split(area);

        let horizontal_chunks = Layout::default()
            .direction(Direction::Horizontal)
            .constraints([Constraint::Percentage(62), Constraint::Percentage(38)])
            .split(vertical_chunks[0]);

        let chat_chunks = Layout::default()
            .direction(Direction::Vertical)
            .constraints([Constraint::Min(3), Constraint::Length(INPUT_HEIGHT)])
            .split(horizontal_chunks[0]);

        let (cloud_area, history_area) = if show_history {
            let side = Layout::default()
                .direction(Direction::Vertical)
                .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
                .split(horizontal_chunks[1]);
            (side[0], Some(side[1]))
        } else {
            (horizontal_chunks[1], None)
        };

        Self {
            background_area: area,
            chat_area: chat_chunks[0],
            input_area: chat_chunks[1],
            cloud_area,
            history_area,
            status_area: vertical_chunks[1],
        }
    }
}

/// Position of `(column, row)` relative to the inside of a bordered `area`
pub fn inner_position(area: Rect, column: u16, row: u16) -> Option<(u16, u16)> {
    let inner = Rect::new(
        area.x.saturating_add(1),
        area.y.saturating_add(1),
        area.width.saturating_sub(2),
        area.height.saturating_sub(2),
    );
    let inside = column >= inner.x
        && column < inner.x + inner.width
        && row >= inner.y
        && row < inner.y + inner.height;
    inside.then(|| (column - inner.x, row - inner.y))
}
