//! Faint bubbles rising for a few seconds.

use std::time::Duration;

use rand::Rng;
use rand::rngs::StdRng;
use ratatui::widgets::canvas::{Circle, Context};

use super::{Bounds, Effect, EffectStatus, Particle, flip_y, shade};

pub const BUBBLE_COUNT: usize = 50;
pub const BUBBLE_LIFETIME: Duration = Duration::from_secs(12);
const WRAP_MARGIN: f64 = 50.0;

pub struct Bubbles {
    bubbles: Vec<Particle>,
}

impl Bubbles {
    pub fn new(bounds: Bounds, mut rng: StdRng) -> Self {
        let bubbles = (0..BUBBLE_COUNT)
            .map(|_| Particle {
                x: rng.r#gen::<f64>() * bounds.width,
                y: rng.r#gen::<f64>() * bounds.height,
                vy: -0.2 - rng.r#gen::<f64>() * 0.8,
                size: rng.r#gen::<f64>() * 12.0 + 6.0,
                alpha: 0.02 + rng.r#gen::<f64>() * 0.08,
                ..Default::default()
            })
            .collect();
        Self { bubbles }
    }

    pub fn bubbles(&self) -> &[Particle] {
        &self.bubbles
    }
}

impl Effect for Bubbles {
    fn step(&mut self, elapsed: Duration, bounds: Bounds) -> EffectStatus {
        if elapsed >= BUBBLE_LIFETIME {
            return EffectStatus::Finished;
        }
        for bubble in &mut self.bubbles {
            bubble.y += bubble.vy;
            if bubble.y < -WRAP_MARGIN {
                bubble.y = bounds.height + WRAP_MARGIN;
            }
        }
        EffectStatus::Running
    }

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        for bubble in &self.bubbles {
            ctx.draw(&Circle {
                x: bubble.x,
                y: flip_y(bubble.y, bounds),
                radius: bubble.size,
                color: shade((255.0, 255.0, 255.0), 0.2 + bubble.alpha * 4.0),
            });
        }
    }
}
