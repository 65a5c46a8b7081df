//! Celebratory confetti burst, drawn above everything else.

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::style::Color;
use ratatui::widgets::canvas::{Context, Line};

use super::{Bounds, Effect, EffectStatus, flip_y};

pub const PIECE_COUNT: usize = 150;
pub const FRAME_COUNT: u32 = 150;
/// Sizes and speeds are given for a 1080-high screen
const REFERENCE_HEIGHT: f64 = 1080.0;

/// Fully saturated, mid-lightness colour for `hue` in degrees
pub fn hue_to_rgb(hue: f64) -> Color {
    let h = hue.rem_euclid(360.0) / 60.0;
    let x = 1.0 - (h % 2.0 - 1.0).abs();
    let (r, g, b) = match h as u32 {
        0 => (1.0, x, 0.0),
        1 => (x, 1.0, 0.0),
        2 => (0.0, 1.0, x),
        3 => (0.0, x, 1.0),
        4 => (x, 0.0, 1.0),
        _ => (1.0, 0.0, x),
    };
    Color::Rgb((r * 255.0_f64).round() as u8, (g * 255.0_f64).round() as u8, (b * 255.0_f64).round() as u8)
}

#[derive(Debug, Clone, Copy)]
struct Piece {
    x: f64,
    y: f64,
    size: f64,
    speed: f64,
    rotation: f64,
    color: Color,
}

/// One-shot overlay; relaunching restarts the burst
pub struct Confetti {
    pieces: Vec<Piece>,
    frame: u32,
    rng: StdRng,
}

impl Default for Confetti {
    fn default() -> Self {
        Self::new()
    }
}

impl Confetti {
    pub fn new() -> Self {
        Self { pieces: Vec::new(), frame: 0, rng: StdRng::from_entropy() }
    }

    pub fn with_seed(seed: u64) -> Self {
        Self { rng: StdRng::seed_from_u64(seed), ..Self::new() }
    }

    /// Scatter fresh pieces above the top edge
    pub fn launch(&mut self, bounds: Bounds) {
        let scale = bounds.height / REFERENCE_HEIGHT;
        let rng = &mut self.rng;
        self.pieces = (0..PIECE_COUNT)
            .map(|_| Piece {
                x: rng.r#gen::<f64>() * bounds.width,
                y: rng.r#gen::<f64>() * bounds.height - bounds.height,
                size: (rng.r#gen::<f64>() * 8.0 + 4.0) * scale.max(0.25),
                speed: (rng.r#gen::<f64>() * 3.0 + 2.0) * scale,
                rotation: rng.r#gen::<f64>() * 360.0,
                color: hue_to_rgb(rng.r#gen::<f64>() * 360.0),
            })
            .collect();
        self.frame = 0;
    }

    pub fn is_running(&self) -> bool {
        !self.pieces.is_empty()
    }

    /// Advance one frame, clearing the overlay after the last one
    pub fn tick(&mut self) {
        if !self.is_running() {
            return;
        }
        self.frame += 1;
        if self.frame >= FRAME_COUNT {
            self.pieces.clear();
            return;
        }
        for piece in &mut self.pieces {
            piece.y += piece.speed;
            piece.rotation += 0.1;
        }
    }
}

impl Effect for Confetti {
    fn step(&mut self, _elapsed: Duration, _bounds: Bounds) -> EffectStatus {
        self.tick();
        if self.is_running() { EffectStatus::Running } else { EffectStatus::Finished }
    }

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        for piece in &self.pieces {
            if piece.y < 0.0 || piece.y > bounds.height {
                continue;
            }
            let half = piece.size / 2.0;
            let (dx, dy) = (piece.rotation.cos() * half, piece.rotation.sin() * half * 0.6);
            ctx.draw(&Line {
                x1: piece.x - dx,
                y1: flip_y(piece.y - dy, bounds),
                x2: piece.x + dx,
                y2: flip_y(piece.y + dy, bounds),
                color: piece.color,
            });
        }
    }
}
