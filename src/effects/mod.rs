//! Full-canvas decorative effects.
//!
//! [`EffectSwitcher`] owns the shared background canvas: exactly one
//! [`EffectKind`] animates at a time. Every `start` bumps the generation, and
//! `tick` only advances the effect whose generation is current, so a replaced
//! effect can never be stepped again.
//!
//! Effects work in canvas "dots" (two per terminal column, four per row when
//! drawn with braille markers), y pointing down. [`flip_y`] converts to the
//! y-up coordinates ratatui's canvas expects.

pub mod aurora;
pub mod bubbles;
pub mod confetti;
pub mod matrix;
pub mod particle;
pub mod stars;

use std::time::{Duration, Instant};

use rand::SeedableRng;
use rand::rngs::StdRng;
use ratatui::style::Color;
use ratatui::widgets::canvas::Context;

pub use confetti::Confetti;
pub use particle::Particle;

use crate::models::EffectKind;

/// Drawable area in canvas dots
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Bounds {
    pub width: f64,
    pub height: f64,
}

impl Bounds {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Braille resolution of a terminal area
    pub fn from_cells(columns: u16, rows: u16) -> Self {
        Self { width: f64::from(columns) * 2.0, height: f64::from(rows) * 4.0 }
    }

    pub fn is_empty(&self) -> bool {
        self.width <= 0.0 || self.height <= 0.0
    }
}

/// Convert a y-down effect coordinate to the canvas' y-up space
pub fn flip_y(y: f64, bounds: Bounds) -> f64 {
    bounds.height - y
}

/// Scale an RGB colour by `alpha` (0..=1) to fake transparency on a terminal
pub fn shade(rgb: (f64, f64, f64), alpha: f64) -> Color {
    let a = alpha.clamp(0.0, 1.0);
    Color::Rgb(
        (rgb.0 * a).round().clamp(0.0, 255.0) as u8,
        (rgb.1 * a).round().clamp(0.0, 255.0) as u8,
        (rgb.2 * a).round().clamp(0.0, 255.0) as u8,
    )
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EffectStatus {
    Running,
    Finished,
}

/// One animation: a per-frame state update plus a draw routine
pub trait Effect: Send {
    /// Advance one frame. `elapsed` is the time since the effect started.
    fn step(&mut self, elapsed: Duration, bounds: Bounds) -> EffectStatus;

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds);
}

/// Build the state for `kind` sized to `bounds`
pub fn build_effect(kind: EffectKind, bounds: Bounds, rng: StdRng) -> Option<Box<dyn Effect>> {
    match kind {
        EffectKind::None => None,
        EffectKind::Matrix => Some(Box::new(matrix::Matrix::new(bounds, rng))),
        EffectKind::Aurora => Some(Box::new(aurora::Aurora::new())),
        EffectKind::Stars => Some(Box::new(stars::Stars::new(bounds, rng))),
        EffectKind::Bubbles => Some(Box::new(bubbles::Bubbles::new(bounds, rng))),
    }
}

struct ActiveEffect {
    kind: EffectKind,
    generation: u64,
    started: Instant,
    effect: Box<dyn Effect>,
}

/// Runs at most one background effect
pub struct EffectSwitcher {
    bounds: Bounds,
    generation: u64,
    active: Option<ActiveEffect>,
    seed: Option<u64>,
}

impl EffectSwitcher {
    pub fn new(bounds: Bounds) -> Self {
        Self { bounds, generation: 0, active: None, seed: None }
    }

    /// Deterministic particle layouts, for tests
    pub fn with_seed(bounds: Bounds, seed: u64) -> Self {
        Self { seed: Some(seed), ..Self::new(bounds) }
    }

    fn rng(&self) -> StdRng {
        match self.seed {
            Some(seed) => StdRng::seed_from_u64(seed.wrapping_add(self.generation)),
            None => StdRng::from_entropy(),
        }
    }

    /// Stop whatever runs and start `kind`. Starting `None` just stops.
    pub fn start(&mut self, kind: EffectKind, now: Instant) {
        self.stop();
        if let Some(effect) = build_effect(kind, self.bounds, self.rng()) {
            self.install(kind, effect, now);
        }
    }

    fn install(&mut self, kind: EffectKind, effect: Box<dyn Effect>, now: Instant) {
        self.stop();
        self.generation += 1;
        tracing::debug!(effect = %kind, generation = self.generation, "Background effect started");
        self.active = Some(ActiveEffect { kind, generation: self.generation, started: now, effect });
    }

    /// Drop the running effect; nothing is drawn from the next frame on
    pub fn stop(&mut self) {
        if let Some(active) = self.active.take() {
            tracing::debug!(effect = %active.kind, "Background effect stopped");
        }
    }

    pub fn active_kind(&self) -> EffectKind {
        self.active.as_ref().map(|a| a.kind).unwrap_or_default()
    }

    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn bounds(&self) -> Bounds {
        self.bounds
    }

    /// Advance the current effect one frame. Returns false when nothing runs.
    pub fn tick(&mut self, now: Instant) -> bool {
        let generation = self.generation;
        let bounds = self.bounds;
        let Some(active) = self.active.as_mut() else {
            return false;
        };
        if active.generation != generation {
            self.active = None;
            return false;
        }

        let elapsed = now.saturating_duration_since(active.started);
        if active.effect.step(elapsed, bounds) == EffectStatus::Finished {
            self.stop();
        }
        true
    }

    /// Re-initialize the running effect for the new canvas size
    pub fn resize(&mut self, bounds: Bounds) {
        if bounds == self.bounds {
            return;
        }
        self.bounds = bounds;
        let rng = self.rng();
        if let Some(active) = self.active.as_mut()
            && let Some(effect) = build_effect(active.kind, bounds, rng)
        {
            active.effect = effect;
        }
    }

    pub fn draw(&self, ctx: &mut Context<'_>) {
        if let Some(active) = &self.active {
            active.effect.draw(ctx, self.bounds);
        }
    }
}
