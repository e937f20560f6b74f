use std::{
    fs,
    path::{Path, PathBuf},
};

use anyhow::{Context, Result};
use glam::Vec2;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::landscape::{LandscapeConfig, WORLD_SCALE};

fn default_drag() -> f32 {
    0.01
}

fn default_input_step() -> f32 {
    0.1
}

fn default_frame_rate() -> u32 {
    60
}

fn default_recorder_interval_frames() -> u64 {
    0
}

#[derive(Debug, Clone, Deserialize)]
pub struct Scenario {
    pub name: String,
    pub description: Option<String>,
    /// Landscape seed. Omitted means OS entropy: a fresh landscape per session.
    #[serde(default)]
    pub seed: Option<u64>,
    pub viewport: Viewport,
    #[serde(default)]
    pub flight: FlightConfig,
    #[serde(default)]
    pub landscape: LandscapeConfig,
    /// Default frame budget for headless runs.
    #[serde(default)]
    pub frames: Option<u64>,
    #[serde(default = "default_recorder_interval_frames")]
    pub recorder_interval_frames: u64,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Viewport {
    pub width: f32,
    pub height: f32,
}

impl Viewport {
    /// The world plane is sized at 3x the viewport in each dimension.
    pub fn world_size(&self) -> Vec2 {
        Vec2::new(self.width * WORLD_SCALE, self.height * WORLD_SCALE)
    }
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub struct FlightConfig {
    /// Fraction of velocity removed each frame.
    #[serde(default = "default_drag")]
    pub drag: f32,
    /// Velocity change per arrow-key press.
    #[serde(default = "default_input_step")]
    pub input_step: f32,
    /// Frame cadence for paced runs.
    #[serde(default = "default_frame_rate")]
    pub frame_rate: u32,
}

impl Default for FlightConfig {
    fn default() -> Self {
        Self {
            drag: default_drag(),
            input_step: default_input_step(),
            frame_rate: default_frame_rate(),
        }
    }
}

#[derive(Debug, Error)]
#[error("scenario validation error: {0}")]
pub struct ScenarioError(String);

pub struct ScenarioLoader {
    base_dir: PathBuf,
}

impl ScenarioLoader {
    pub fn new(base_dir: impl AsRef<Path>) -> Self {
        Self {
            base_dir: base_dir.as_ref().to_path_buf(),
        }
    }

    pub fn load(&self, file: impl AsRef<Path>) -> Result<Scenario> {
        let path = self.base_dir.join(file);
        let data = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read scenario file {}", path.display()))?;
        let scenario: Scenario = serde_yaml::from_str(&data)
            .with_context(|| format!("Failed to parse {}", path.display()))?;
        scenario.validate()?;
        Ok(scenario)
    }
}

impl Scenario {
    pub fn validate(&self) -> Result<(), ScenarioError> {
        if self.name.is_empty() {
            return Err(ScenarioError("scenario must define a name".into()));
        }
        if self.viewport.width <= 0.0 || self.viewport.height <= 0.0 {
            return Err(ScenarioError(format!(
                "viewport must be positive, got {}x{}",
                self.viewport.width, self.viewport.height
            )));
        }
        if !(0.0..1.0).contains(&self.flight.drag) {
            return Err(ScenarioError(format!(
                "drag must be in [0, 1), got {}",
                self.flight.drag
            )));
        }
        if self.flight.input_step <= 0.0 {
            return Err(ScenarioError(format!(
                "input step must be positive, got {}",
                self.flight.input_step
            )));
        }
        if self.flight.frame_rate == 0 {
            return Err(ScenarioError("frame rate must be positive".into()));
        }
        Ok(())
    }

    pub fn frames(&self, override_frames: Option<u64>) -> u64 {
        override_frames.or(self.frames).unwrap_or(600)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn minimal_yaml() -> &'static str {
        "name: test\nviewport:\n  width: 800\n  height: 600\n"
    }

    #[test]
    fn test_defaults_fill_in() {
        let scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        assert_eq!(scenario.seed, None);
        assert_eq!(scenario.flight.drag, 0.01);
        assert_eq!(scenario.flight.input_step, 0.1);
        assert_eq!(scenario.flight.frame_rate, 60);
        assert_eq!(scenario.landscape.clear_zone_margin, 300.0);
        assert_eq!(scenario.landscape.field_clusters, 10);
        assert_eq!(scenario.landscape.scatter_attempts, 300);
        assert_eq!(scenario.recorder_interval_frames, 0);
        assert_eq!(scenario.frames(None), 600);
        assert_eq!(scenario.frames(Some(42)), 42);
    }

    #[test]
    fn test_world_is_three_viewports() {
        let scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        let world = scenario.viewport.world_size();
        assert_eq!(world, Vec2::new(2400.0, 1800.0));
    }

    #[test]
    fn test_validation_rejects_bad_drag() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.flight.drag = 1.5;
        let err = scenario.validate().unwrap_err();
        assert!(err.to_string().contains("drag"));
    }

    #[test]
    fn test_validation_rejects_flat_viewport() {
        let mut scenario: Scenario = serde_yaml::from_str(minimal_yaml()).unwrap();
        scenario.viewport.height = 0.0;
        assert!(scenario.validate().is_err());
    }
}
