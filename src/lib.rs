pub mod engine;
pub mod input;
pub mod landscape;
pub mod plane;
pub mod recorder;
pub mod scenario;
pub mod session;
pub mod web;

pub use engine::{Engine, EngineBuilder, EngineSettings, StopHandle};
pub use scenario::{Scenario, ScenarioLoader};
pub use session::{HudFrame, Session, SessionState};
