use std::time::Instant;

use glam::Vec2;
use rand::SeedableRng;
use rand_chacha::ChaCha8Rng;
use serde::Serialize;

use crate::{
    input::InputCommand,
    landscape::{self, LandscapeConfig, Rect, TerrainElement},
    plane::Plane,
    scenario::{FlightConfig, Scenario, Viewport},
};

/// The plane spawns this far below the world center, just past the runway.
const PLANE_SPAWN_OFFSET_Y: f32 = 256.0;

/// The session is a one-way machine: it starts in the menu and, once flying,
/// never returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum SessionState {
    Menu,
    Flying,
}

/// What the HUD shows after one frame: elapsed time, speed, and where the
/// plane is pointing.
#[derive(Debug, Clone, Copy, Serialize)]
pub struct HudFrame {
    pub frame: u64,
    pub elapsed_seconds: f64,
    pub speed: f32,
    pub position: Vec2,
    pub heading_degrees: f32,
}

/// Static view of the generated world, sent to the renderer once per session.
#[derive(Debug, Clone, Serialize)]
pub struct WorldView {
    pub viewport: Viewport,
    pub world: Vec2,
    pub runway: Rect,
    pub elements: Vec<TerrainElement>,
}

/// All mutable state of one flight session. Created at session start, mutated
/// once per frame, discarded at teardown.
pub struct Session {
    name: String,
    state: SessionState,
    viewport: Viewport,
    world: Vec2,
    runway: Rect,
    flight: FlightConfig,
    landscape_config: LandscapeConfig,
    rng: ChaCha8Rng,
    elements: Vec<TerrainElement>,
    plane: Option<Plane>,
    frame: u64,
    started: Option<Instant>,
}

impl Session {
    pub fn new(scenario: &Scenario) -> Self {
        let world = scenario.viewport.world_size();
        let rng = match scenario.seed {
            Some(seed) => ChaCha8Rng::seed_from_u64(seed),
            None => ChaCha8Rng::from_entropy(),
        };
        Self {
            name: scenario.name.clone(),
            state: SessionState::Menu,
            viewport: scenario.viewport,
            world,
            runway: landscape::runway_rect(world),
            flight: scenario.flight,
            landscape_config: scenario.landscape,
            rng,
            elements: Vec::new(),
            plane: None,
            frame: 0,
            started: None,
        }
    }

    /// The start action: generate the landscape, place the plane, begin the
    /// clock. Starting an already-flying session does nothing.
    pub fn start(&mut self) {
        if self.state == SessionState::Flying {
            return;
        }
        self.elements = landscape::generate(
            &self.landscape_config,
            self.world,
            self.runway,
            &mut self.rng,
        );
        self.plane = Some(Plane::at(
            Vec2::new(self.world.x / 2.0, self.world.y / 2.0 + PLANE_SPAWN_OFFSET_Y),
            self.flight.drag,
        ));
        self.started = Some(Instant::now());
        self.state = SessionState::Flying;
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn plane(&self) -> Option<&Plane> {
        self.plane.as_ref()
    }

    pub fn elements(&self) -> &[TerrainElement] {
        &self.elements
    }

    pub fn apply_input(&mut self, command: InputCommand) {
        let step = self.flight.input_step;
        if let Some(plane) = self.plane.as_mut() {
            plane.nudge(command.delta(step));
        }
    }

    /// Advance one frame while flying. In the menu there is nothing to advance.
    pub fn advance_frame(&mut self) -> Option<HudFrame> {
        let started = self.started?;
        let plane = self.plane.as_mut()?;
        plane.step();
        self.frame += 1;
        Some(HudFrame {
            frame: self.frame,
            elapsed_seconds: started.elapsed().as_secs_f64(),
            speed: plane.speed(),
            position: plane.position,
            heading_degrees: plane.heading_degrees,
        })
    }

    pub fn world_view(&self) -> WorldView {
        WorldView {
            viewport: self.viewport,
            world: self.world,
            runway: self.runway,
            elements: self.elements.clone(),
        }
    }
}
