/// One animated visual unit: a star, bubble, confetti piece
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Particle {
    pub x: f64,
    pub y: f64,
    pub vx: f64,
    pub vy: f64,
    pub size: f64,
    pub alpha: f64,
    pub phase: f64,
}

impl Particle {
    /// Move by one frame of velocity
    pub fn advance(&mut self) {
        self.x += self.vx;
        self.y += self.vy;
    }

    /// Wrap to the opposite edge once `margin` past a boundary
    pub fn wrap(&mut self, width: f64, height: f64, margin: f64) {
        if self.x < -margin {
            self.x = width + margin;
        } else if self.x > width + margin {
            self.x = -margin;
        }
        if self.y < -margin {
            self.y = height + margin;
        } else if self.y > height + margin {
            self.y = -margin;
        }
    }
}
