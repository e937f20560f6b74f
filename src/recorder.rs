//! Flight recorder - periodic HUD frame checkpoints on disk

use std::{
    fs,
    path::{Path, PathBuf},
};

use chrono::{DateTime, Utc};
use serde::Serialize;
use thiserror::Error;

use crate::session::HudFrame;

#[derive(Debug, Error)]
pub enum RecorderError {
    #[error("recorder io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("recorder encode error: {0}")]
    Encode(#[from] serde_json::Error),
}

#[derive(Debug, Serialize)]
struct SessionMeta<'a> {
    scenario: &'a str,
    started_at: DateTime<Utc>,
}

/// Writes a HUD frame as JSON every `interval_frames` frames, under
/// `<dir>/<scenario>/`. An interval of zero disables recording entirely.
/// Nothing ever reads these back into a session; this is observability only.
pub struct FrameRecorder {
    dir: PathBuf,
    interval_frames: u64,
}

impl FrameRecorder {
    pub fn new(dir: impl AsRef<Path>, interval_frames: u64) -> Self {
        Self {
            dir: dir.as_ref().to_path_buf(),
            interval_frames,
        }
    }

    pub fn enabled(&self) -> bool {
        self.interval_frames > 0
    }

    /// Stamp the session directory with scenario name and start time.
    pub fn begin_session(&self, scenario: &str) -> Result<Option<PathBuf>, RecorderError> {
        if !self.enabled() {
            return Ok(None);
        }
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)?;
        let path = dir.join("session.json");
        let meta = SessionMeta {
            scenario,
            started_at: Utc::now(),
        };
        fs::write(&path, serde_json::to_string_pretty(&meta)?)?;
        Ok(Some(path))
    }

    pub fn maybe_write(
        &self,
        scenario: &str,
        frame: &HudFrame,
    ) -> Result<Option<PathBuf>, RecorderError> {
        if !self.enabled() {
            return Ok(None);
        }
        if frame.frame % self.interval_frames != 0 {
            return Ok(None);
        }
        let dir = self.dir.join(scenario);
        fs::create_dir_all(&dir)?;
        let path = dir.join(format!("frame_{:06}.json", frame.frame));
        fs::write(&path, serde_json::to_string_pretty(frame)?)?;
        Ok(Some(path))
    }
}
