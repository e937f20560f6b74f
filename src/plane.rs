use glam::Vec2;
use serde::Serialize;

/// Initial heading in degrees, before the first step derives it from velocity.
const INITIAL_HEADING_DEGREES: f32 = 90.0;

/// The moving body: position and velocity in world coordinates, a drag
/// coefficient, and a heading that is recomputed from velocity every step
/// rather than stored as independent state.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct Plane {
    pub position: Vec2,
    pub velocity: Vec2,
    pub drag: f32,
    pub heading_degrees: f32,
}

impl Plane {
    pub fn at(position: Vec2, drag: f32) -> Self {
        Self {
            position,
            velocity: Vec2::ZERO,
            drag,
            heading_degrees: INITIAL_HEADING_DEGREES,
        }
    }

    /// One integration step: first-order exponential decay of velocity toward
    /// zero, then position update, then heading derivation.
    pub fn step(&mut self) {
        self.velocity -= self.drag * self.velocity;
        self.position += self.velocity;
        self.heading_degrees = self.velocity.y.atan2(self.velocity.x).to_degrees();
    }

    /// Apply a directional impulse. There is no speed clamp.
    pub fn nudge(&mut self, delta: Vec2) {
        self.velocity += delta;
    }

    pub fn speed(&self) -> f32 {
        self.velocity.length()
    }
}
