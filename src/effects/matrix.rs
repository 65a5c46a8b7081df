//! Falling green glyph rain.

use std::collections::VecDeque;
use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use ratatui::style::{Color, Style};
use ratatui::text::Span;
use ratatui::widgets::canvas::Context;

use super::{Bounds, Effect, EffectStatus, flip_y, shade};

pub const GLYPHS: &str = "ABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789@#$%^&*()*&^%";

/// One column per terminal cell
pub const COLUMN_WIDTH: f64 = 2.0;
/// One glyph row per terminal row
pub const ROW_HEIGHT: f64 = 4.0;
/// Glyphs kept per column to fake the fading trail
const TRAIL_LEN: usize = 12;
const RESET_THRESHOLD: f64 = 0.975;

const HEAD_COLOR: Color = Color::Rgb(190, 255, 190);
const TRAIL_RGB: (f64, f64, f64) = (0.0, 255.0, 0.0);

#[derive(Debug, Clone)]
struct Column {
    drop: usize,
    trail: VecDeque<(usize, char)>,
}

pub struct Matrix {
    columns: Vec<Column>,
    glyphs: Vec<char>,
    rng: StdRng,
}

impl Matrix {
    pub fn new(bounds: Bounds, rng: StdRng) -> Self {
        let count = (bounds.width / COLUMN_WIDTH).floor().max(0.0) as usize;
        let columns = vec![Column { drop: 1, trail: VecDeque::with_capacity(TRAIL_LEN) }; count];
        Self { columns, glyphs: GLYPHS.chars().collect(), rng }
    }

    pub fn column_count(&self) -> usize {
        self.columns.len()
    }

    /// Row the next glyph of `column` lands on
    pub fn drop_row(&self, column: usize) -> Option<usize> {
        self.columns.get(column).map(|c| c.drop)
    }
}

impl Effect for Matrix {
    fn step(&mut self, _elapsed: Duration, bounds: Bounds) -> EffectStatus {
        for column in &mut self.columns {
            let glyph = self.glyphs[self.rng.gen_range(0..self.glyphs.len())];
            column.trail.push_front((column.drop, glyph));
            column.trail.truncate(TRAIL_LEN);

            if column.drop as f64 * ROW_HEIGHT > bounds.height && self.rng.r#gen::<f64>() > RESET_THRESHOLD {
                column.drop = 0;
            }
            column.drop += 1;
        }
        EffectStatus::Running
    }

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        for (i, column) in self.columns.iter().enumerate() {
            let x = i as f64 * COLUMN_WIDTH;
            for (age, &(row, glyph)) in column.trail.iter().enumerate() {
                let top = row as f64 * ROW_HEIGHT;
                if top >= bounds.height {
                    continue;
                }
                let color = if age == 0 {
                    HEAD_COLOR
                } else {
                    shade(TRAIL_RGB, 1.0 - age as f64 / TRAIL_LEN as f64)
                };
                let y = flip_y(top + ROW_HEIGHT / 2.0, bounds);
                ctx.print(x, y, Span::styled(glyph.to_string(), Style::default().fg(color)));
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use rand::SeedableRng;

    use super::*;

    fn matrix(bounds: Bounds) -> Matrix {
        Matrix::new(bounds, StdRng::seed_from_u64(7))
    }

    #[test]
    fn test_one_column_per_cell() {
        let m = matrix(Bounds::from_cells(80, 24));
        assert_eq!(m.column_count(), 80);
    }

    #[test]
    fn test_drops_start_at_row_one_and_advance() {
        let bounds = Bounds::from_cells(10, 24);
        let mut m = matrix(bounds);
        assert_eq!(m.drop_row(0), Some(1));

        m.step(Duration::ZERO, bounds);
        assert_eq!(m.drop_row(0), Some(2));
        m.step(Duration::ZERO, bounds);
        assert_eq!(m.drop_row(3), Some(3));
    }

    #[test]
    fn test_drops_never_reset_while_on_screen() {
        let bounds = Bounds::from_cells(10, 24);
        let mut m = matrix(bounds);
        for _ in 0..24 {
            m.step(Duration::ZERO, bounds);
        }
        for column in 0..m.column_count() {
            assert_eq!(m.drop_row(column), Some(25));
        }
    }

    #[test]
    fn test_drops_eventually_reset() {
        let bounds = Bounds::from_cells(4, 5);
        let mut m = matrix(bounds);
        for _ in 0..2000 {
            m.step(Duration::ZERO, bounds);
        }
        assert!((0..m.column_count()).all(|c| m.drop_row(c).unwrap() < 2000));
    }
}
