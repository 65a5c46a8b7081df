//! Drifting, twinkling star field with the odd meteor.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use ratatui::style::Color;
use ratatui::widgets::canvas::{Context, Line, Points};

use super::{Bounds, Effect, EffectStatus, Particle, flip_y, shade};

pub const STAR_COUNT: usize = 120;
const BLINK_STEP: f64 = 0.02;
const METEOR_CHANCE: f64 = 0.01;
const METEOR_COLOR: Color = Color::Rgb(110, 110, 88);
/// Meteor horizontal travel is given for a 1920-wide screen
const REFERENCE_WIDTH: f64 = 1920.0;

/// Star brightness for a blink phase
pub fn star_alpha(phase: f64) -> f64 {
    0.5 + phase.sin().abs() * 0.5
}

/// A meteor streak from the top edge to the bottom edge
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Meteor {
    pub start_x: f64,
    pub end_x: f64,
}

pub struct Stars {
    stars: Vec<Particle>,
    meteor: Option<Meteor>,
    rng: StdRng,
}

impl Stars {
    pub fn new(bounds: Bounds, mut rng: StdRng) -> Self {
        let stars = (0..STAR_COUNT)
            .map(|_| Particle {
                x: rng.r#gen::<f64>() * bounds.width,
                y: rng.r#gen::<f64>() * bounds.height,
                vx: (rng.r#gen::<f64>() - 0.5) * 0.2,
                vy: (rng.r#gen::<f64>() - 0.5) * 0.2,
                size: rng.r#gen::<f64>() * 1.6 + 0.4,
                alpha: 1.0,
                phase: rng.r#gen::<f64>() * 1.5,
            })
            .collect();
        Self { stars, meteor: None, rng }
    }

    pub fn stars(&self) -> &[Particle] {
        &self.stars
    }

    pub fn meteor(&self) -> Option<Meteor> {
        self.meteor
    }
}

impl Effect for Stars {
    fn step(&mut self, _elapsed: Duration, bounds: Bounds) -> EffectStatus {
        for star in &mut self.stars {
            star.advance();
            star.phase += BLINK_STEP;
            star.alpha = star_alpha(star.phase);
            star.wrap(bounds.width, bounds.height, 0.0);
        }

        self.meteor = if self.rng.r#gen::<f64>() < METEOR_CHANCE {
            let start_x = self.rng.r#gen::<f64>() * bounds.width;
            let travel = (self.rng.r#gen::<f64>() * 300.0 + 200.0) * bounds.width / REFERENCE_WIDTH;
            Some(Meteor { start_x, end_x: start_x + travel })
        } else {
            None
        };
        EffectStatus::Running
    }

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        for star in &self.stars {
            let color = shade((255.0, 255.0, 255.0), star.alpha * (0.5 + star.size / 4.0));
            ctx.draw(&Points { coords: &[(star.x, flip_y(star.y, bounds))], color });
        }
        if let Some(meteor) = self.meteor {
            ctx.draw(&Line { x1: meteor.start_x, y1: bounds.height, x2: meteor.end_x, y2: 0.0, color: METEOR_COLOR });
        }
    }
}
