//! Slowly shifting colour bands with waving lines.
//!
//! Stateless apart from the clock: every frame is a pure function of the
//! elapsed time. Geometry is laid out in a 1920x1080 reference space and
//! scaled to the canvas.

use std::time::Duration;

use ratatui::widgets::canvas::{Context, Line, Points};

use super::{Bounds, Effect, EffectStatus, flip_y, shade};

const REFERENCE_WIDTH: f64 = 1920.0;
const REFERENCE_HEIGHT: f64 = 1080.0;
const WAVE_COUNT: usize = 6;
const WAVE_STEP: f64 = 30.0;
const BAND_SPACING: f64 = 6.0;

/// Animation clock for `elapsed`
pub fn aurora_time(elapsed: Duration) -> f64 {
    elapsed.as_secs_f64() * 1000.0 * 0.0003
}

/// Vertical position of wave `i` at reference `x` around baseline `y`
pub fn wave_y(y: f64, x: f64, t: f64, i: usize) -> f64 {
    let i = i as f64;
    y + ((x + t * 200.0) * 0.01 + i).sin() * 30.0 * (t + i).sin()
}

/// The three gradient stops for time `t`, top-left to bottom-right
pub fn gradient_stops(t: f64) -> [(f64, f64, f64); 3] {
    let r1 = t.sin() * 0.5 + 0.5;
    let r2 = (t * 0.7).cos() * 0.5 + 0.5;
    [
        (50.0 + 200.0 * r1, 120.0 + 80.0 * r2, 200.0),
        (120.0 + 140.0 * r2, 60.0 + 120.0 * r1, 160.0 + 40.0 * r2),
        (100.0, 180.0, 220.0),
    ]
}

fn lerp(a: (f64, f64, f64), b: (f64, f64, f64), f: f64) -> (f64, f64, f64) {
    (a.0 + (b.0 - a.0) * f, a.1 + (b.1 - a.1) * f, a.2 + (b.2 - a.2) * f)
}

#[derive(Debug, Default)]
pub struct Aurora {
    t: f64,
}

impl Aurora {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn time(&self) -> f64 {
        self.t
    }

    fn gradient_at(&self, f: f64) -> (f64, f64, f64) {
        let [a, b, c] = gradient_stops(self.t);
        if f < 0.5 { lerp(a, b, f * 2.0) } else { lerp(b, c, (f - 0.5) * 2.0) }
    }
}

impl Effect for Aurora {
    fn step(&mut self, elapsed: Duration, _bounds: Bounds) -> EffectStatus {
        self.t = aurora_time(elapsed);
        EffectStatus::Running
    }

    fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        if bounds.is_empty() {
            return;
        }

        // Sparse diagonal gradient; a terminal has no translucent fill
        let diagonal = bounds.width + bounds.height;
        let mut y = 0.0;
        while y < bounds.height {
            let mut x = (y / BAND_SPACING) % 2.0 * (BAND_SPACING / 2.0);
            while x < bounds.width {
                let color = shade(self.gradient_at((x + y) / diagonal), 0.35);
                ctx.draw(&Points { coords: &[(x, flip_y(y, bounds))], color });
                x += BAND_SPACING;
            }
            y += BAND_SPACING;
        }
        ctx.layer();

        let sx = bounds.width / REFERENCE_WIDTH;
        let sy = bounds.height / REFERENCE_HEIGHT;
        for i in 0..WAVE_COUNT {
            let base = REFERENCE_HEIGHT * (i as f64 + 0.5) / WAVE_COUNT as f64;
            let color = shade((180.0, 220.0, 255.0), 0.35 + (self.t + i as f64).sin().abs() * 0.65);

            let mut prev = (0.0, base);
            let mut x = 0.0;
            while x < REFERENCE_WIDTH {
                let next = (x, wave_y(base, x, self.t, i));
                ctx.draw(&Line {
                    x1: prev.0 * sx,
                    y1: flip_y(prev.1 * sy, bounds),
                    x2: next.0 * sx,
                    y2: flip_y(next.1 * sy, bounds),
                    color,
                });
                prev = next;
                x += WAVE_STEP;
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_time_scale() {
        let t = aurora_time(Duration::from_secs(10));
        assert!((t - 3.0).abs() < 1e-9);
    }

    #[test]
    fn test_wave_flat_at_zero_time_for_first_line() {
        // sin(t + i) is zero for t = 0, i = 0
        assert_eq!(wave_y(100.0, 450.0, 0.0, 0), 100.0);
    }

    #[test]
    fn test_wave_amplitude_bounded() {
        for i in 0..WAVE_COUNT {
            for step in 0..100 {
                let y = wave_y(500.0, step as f64 * 17.0, step as f64 * 0.13, i);
                assert!((y - 500.0).abs() <= 30.0 + 1e-9);
            }
        }
    }

    #[test]
    fn test_step_is_pure_function_of_elapsed() {
        let bounds = Bounds::new(100.0, 100.0);
        let mut a = Aurora::new();
        let mut b = Aurora::new();

        a.step(Duration::from_millis(100), bounds);
        a.step(Duration::from_millis(5000), bounds);
        b.step(Duration::from_millis(5000), bounds);

        assert_eq!(a.time(), b.time());
    }

    #[test]
    fn test_gradient_last_stop_fixed() {
        assert_eq!(gradient_stops(0.0)[2], (100.0, 180.0, 220.0));
        assert_eq!(gradient_stops(42.0)[2], (100.0, 180.0, 220.0));
    }
}
