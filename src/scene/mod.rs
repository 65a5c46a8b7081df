//! Morphing wireframe crystal behind the chat.
//!
//! A unit icosphere whose vertices breathe around their rest positions, a
//! camera that eases toward the pointer, and a cloud of grain points. The
//! whole scene turns slowly. Projection is a plain 75° perspective onto the
//! braille canvas, looking at the origin.

mod geometry;

use std::time::Duration;

use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use ratatui::widgets::canvas::{Context, Line, Points};

pub use geometry::{Icosphere, Vec3};

use crate::effects::{Bounds, shade};

pub const DETAIL: u32 = 2;
pub const CAMERA_DISTANCE: f64 = 3.5;
pub const FOV_DEGREES: f64 = 75.0;
pub const ROTATION_STEP: f64 = 0.0005;
const CAMERA_EASING: f64 = 0.05;
const NEAR: f64 = 0.1;
const GRAIN_COUNT: usize = 800;
const GRAIN_EXTENT: f64 = 10.0;

const WIRE_RGB: (f64, f64, f64) = (136.0, 136.0, 255.0);
const POINT_RGB: (f64, f64, f64) = (170.0, 170.0, 255.0);
const GRAIN_RGB: (f64, f64, f64) = (255.0, 255.0, 255.0);

/// Radial offset factor for a vertex at rest position `o`, `t` seconds in
pub fn displacement(o: Vec3, t: f64) -> f64 {
    (o.x * 2.0 + t * 1.5).sin() * 0.05 + (o.y * 3.0 + t * 2.0).cos() * 0.05 + (o.z * 2.5 + t).sin() * 0.05
}

pub struct Scene {
    rest: Vec<Vec3>,
    positions: Vec<Vec3>,
    edges: Vec<(usize, usize)>,
    grain: Vec<Vec3>,
    camera: Vec3,
    pointer: (f64, f64),
    rotation: f64,
}

impl Default for Scene {
    fn default() -> Self {
        Self::with_rng(StdRng::from_entropy())
    }
}

impl Scene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_rng(mut rng: StdRng) -> Self {
        let mesh = Icosphere::new(DETAIL);
        let grain = (0..GRAIN_COUNT)
            .map(|_| {
                Vec3::new(
                    (rng.r#gen::<f64>() - 0.5) * GRAIN_EXTENT,
                    (rng.r#gen::<f64>() - 0.5) * GRAIN_EXTENT,
                    (rng.r#gen::<f64>() - 0.5) * GRAIN_EXTENT,
                )
            })
            .collect();
        Self {
            positions: mesh.vertices.clone(),
            rest: mesh.vertices,
            edges: mesh.edges,
            grain,
            camera: Vec3::new(0.0, 0.0, CAMERA_DISTANCE),
            pointer: (0.0, 0.0),
            rotation: 0.0,
        }
    }

    /// Pointer position normalized to `[-1, 1]` on both axes, y down
    pub fn set_pointer(&mut self, x: f64, y: f64) {
        self.pointer = (x.clamp(-1.0, 1.0), y.clamp(-1.0, 1.0));
    }

    /// Pointer from a terminal cell inside an area of `columns` x `rows`
    pub fn set_pointer_cell(&mut self, column: u16, row: u16, columns: u16, rows: u16) {
        let nx = f64::from(column) / f64::from(columns.max(1)) * 2.0 - 1.0;
        let ny = f64::from(row) / f64::from(rows.max(1)) * 2.0 - 1.0;
        self.set_pointer(nx, ny);
    }

    pub fn camera(&self) -> Vec3 {
        self.camera
    }

    pub fn rotation(&self) -> f64 {
        self.rotation
    }

    pub fn positions(&self) -> &[Vec3] {
        &self.positions
    }

    pub fn rest_positions(&self) -> &[Vec3] {
        &self.rest
    }

    /// Advance one frame; `elapsed` is the time since the scene started
    pub fn step(&mut self, elapsed: Duration) {
        let t = elapsed.as_secs_f64();
        for (current, &rest) in self.positions.iter_mut().zip(&self.rest) {
            *current = rest * (1.0 + displacement(rest, t));
        }

        let (px, py) = self.pointer;
        self.camera.x += (px * 0.5 - self.camera.x) * CAMERA_EASING;
        self.camera.y += (-py * 0.5 - self.camera.y) * CAMERA_EASING;
        self.rotation += ROTATION_STEP;
    }

    fn to_world(&self, local: Vec3) -> Vec3 {
        local.rotate_y(self.rotation).rotate_x(self.rotation)
    }

    /// Project a world point to canvas coordinates (y up), or `None` when it
    /// sits behind the near plane
    pub fn project(&self, world: Vec3, bounds: Bounds) -> Option<(f64, f64)> {
        if bounds.is_empty() {
            return None;
        }
        let forward = (Vec3::default() - self.camera).normalize();
        let right = forward.cross(Vec3::new(0.0, 1.0, 0.0)).normalize();
        let up = right.cross(forward);

        let rel = world - self.camera;
        let depth = rel.dot(forward);
        if depth < NEAR {
            return None;
        }

        let focal = 1.0 / (FOV_DEGREES.to_radians() / 2.0).tan();
        let aspect = bounds.width / bounds.height;
        let ndc_x = focal * rel.dot(right) / (depth * aspect);
        let ndc_y = focal * rel.dot(up) / depth;
        Some(((ndc_x + 1.0) / 2.0 * bounds.width, (ndc_y + 1.0) / 2.0 * bounds.height))
    }

    pub fn draw(&self, ctx: &mut Context<'_>, bounds: Bounds) {
        let offset = Vec3::new(self.pointer.0 * 0.2, -self.pointer.1 * 0.2, 0.0);
        let grain: Vec<(f64, f64)> =
            self.grain.iter().filter_map(|&g| self.project(self.to_world(g + offset), bounds)).collect();
        ctx.draw(&Points { coords: &grain, color: shade(GRAIN_RGB, 0.5) });

        let projected: Vec<Option<(f64, f64)>> =
            self.positions.iter().map(|&p| self.project(self.to_world(p), bounds)).collect();

        let wire = shade(WIRE_RGB, 0.45);
        for &(a, b) in &self.edges {
            if let (Some((x1, y1)), Some((x2, y2))) = (projected[a], projected[b]) {
                ctx.draw(&Line { x1, y1, x2, y2, color: wire });
            }
        }

        let points: Vec<(f64, f64)> = projected.into_iter().flatten().collect();
        ctx.draw(&Points { coords: &points, color: shade(POINT_RGB, 0.8) });
    }
}
