//! Floating keyword cloud.
//!
//! Entries live in a pixel-like space where one terminal cell is
//! [`UNITS_PER_COLUMN`] x [`UNITS_PER_ROW`] units, so placement margins, the
//! wrap margin and the click radius keep their on-screen proportions no
//! matter how large the panel is.

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::{Modifier, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::Context;

use crate::effects::shade;
use crate::keywords::Keyword;

pub const UNITS_PER_COLUMN: f64 = 8.0;
pub const UNITS_PER_ROW: f64 = 16.0;
pub const BASE_SIZE: f64 = 16.0;
pub const MAX_SIZE_BONUS: f64 = 36.0;
pub const WRAP_MARGIN: f64 = 50.0;
pub const CLICK_RADIUS: f64 = 60.0;
const BOLD_FROM_SIZE: f64 = 32.0;

/// Display size for a keyword seen `count` times
pub fn word_size(count: usize) -> f64 {
    BASE_SIZE + MAX_SIZE_BONUS.min(count as f64 * 8.0)
}

#[derive(Debug, Clone, PartialEq)]
pub struct WordCloudEntry {
    pub word: String,
    pub base_size: f64,
    pub size: f64,
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub alpha: f64,
}

pub struct WordCloud {
    entries: Vec<WordCloudEntry>,
    width: f64,
    height: f64,
    running: bool,
    rng: StdRng,
}

impl Default for WordCloud {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl WordCloud {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_seed(seed: u64) -> Self {
        Self::with_rng(StdRng::seed_from_u64(seed))
    }

    fn with_rng(rng: StdRng) -> Self {
        Self { entries: Vec::new(), width: 800.0, height: 260.0, running: false, rng }
    }

    /// Size the cloud to a panel of `columns` x `rows` cells
    pub fn set_area(&mut self, columns: u16, rows: u16) {
        self.width = f64::from(columns) * UNITS_PER_COLUMN;
        self.height = f64::from(rows) * UNITS_PER_ROW;
    }

    pub fn size(&self) -> (f64, f64) {
        (self.width, self.height)
    }

    pub fn entries(&self) -> &[WordCloudEntry] {
        &self.entries
    }

    pub fn is_running(&self) -> bool {
        self.running
    }

    /// Replace every entry with one per keyword and start animating
    pub fn build(&mut self, keywords: &[Keyword]) {
        let (w, h) = (self.width, self.height);
        let rng = &mut self.rng;
        self.entries = keywords
            .iter()
            .map(|k| {
                let size = word_size(k.count);
                let x = if w > 100.0 { rng.r#gen::<f64>() * (w - 100.0) + 50.0 } else { w / 2.0 };
                let y = if h > 60.0 { rng.r#gen::<f64>() * (h - 60.0) + 30.0 } else { h / 2.0 };
                WordCloudEntry {
                    word: k.word.clone(),
                    base_size: size,
                    size,
                    x,
                    y,
                    vx: (rng.r#gen::<f64>() - 0.5) * 0.4,
                    vy: (rng.r#gen::<f64>() - 0.5) * 0.4,
                    alpha: 0.6 + rng.r#gen::<f64>() * 0.4,
                }
            })
            .collect();
        self.running = true;
        tracing::debug!(words = self.entries.len(), "Word cloud rebuilt");
    }

    /// Drift, pulse and wrap every entry; `secs` is the animation clock
    pub fn step(&mut self, secs: f64) {
        if !self.running {
            return;
        }
        let (w, h) = (self.width, self.height);
        for e in &mut self.entries {
            e.x += e.vx;
            e.y += e.vy;
            e.size = e.base_size + (secs + e.x).sin() * 1.5;

            if e.x < -WRAP_MARGIN {
                e.x = w + WRAP_MARGIN;
            } else if e.x > w + WRAP_MARGIN {
                e.x = -WRAP_MARGIN;
            }
            if e.y < -WRAP_MARGIN {
                e.y = h + WRAP_MARGIN;
            } else if e.y > h + WRAP_MARGIN {
                e.y = -WRAP_MARGIN;
            }
        }
    }

    /// Word nearest to `(x, y)` when it lies within [`CLICK_RADIUS`]
    pub fn click(&self, x: f64, y: f64) -> Option<String> {
        if !self.running {
            return None;
        }
        self.entries
            .iter()
            .map(|e| (e, (e.x - x).hypot(e.y - y)))
            .min_by(|a, b| a.1.total_cmp(&b.1))
            .filter(|(_, distance)| *distance < CLICK_RADIUS)
            .map(|(e, _)| e.word.clone())
    }

    /// Click on a cell relative to the panel's top-left corner
    pub fn click_cell(&self, column: u16, row: u16) -> Option<String> {
        let x = (f64::from(column) + 0.5) * UNITS_PER_COLUMN;
        let y = (f64::from(row) + 0.5) * UNITS_PER_ROW;
        self.click(x, y)
    }

    pub fn stop(&mut self) {
        self.entries.clear();
        self.running = false;
    }

    /// Paint onto a canvas whose bounds are `[0, width] x [0, height]`
    pub fn draw(&self, ctx: &mut Context<'_>) {
        for e in &self.entries {
            let half_width = e.word.chars().count() as f64 * UNITS_PER_COLUMN / 2.0;
            let brightness = e.alpha * (0.5 + 0.5 * (e.size / (BASE_SIZE + MAX_SIZE_BONUS)).min(1.0));
            let mut style = Style::default().fg(shade((255.0, 255.0, 255.0), brightness));
            if e.base_size >= BOLD_FROM_SIZE {
                style = style.add_modifier(Modifier::BOLD);
            }
            ctx.print(e.x - half_width, self.height - e.y, Span::styled(e.word.clone(), style));
        }
    }
}
