use std::{
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc,
    },
    time::{Duration, Instant},
};

use anyhow::{bail, Result};

use crate::{
    input::InputQueue,
    recorder::FrameRecorder,
    scenario::Scenario,
    session::{HudFrame, Session, SessionState},
};

pub struct EngineSettings {
    pub scenario_name: String,
    pub recorder_dir: PathBuf,
    pub recorder_interval_frames: u64,
    pub frame_rate: u32,
    /// Paced runs sleep out the remainder of each frame interval; unpaced
    /// runs (headless, tests) go flat out.
    pub paced: bool,
}

impl EngineSettings {
    pub fn from_scenario(scenario: &Scenario, recorder_dir: PathBuf) -> Self {
        Self {
            scenario_name: scenario.name.clone(),
            recorder_dir,
            recorder_interval_frames: scenario.recorder_interval_frames,
            frame_rate: scenario.flight.frame_rate,
            paced: false,
        }
    }

    pub fn paced(mut self) -> Self {
        self.paced = true;
        self
    }
}

pub struct EngineBuilder {
    settings: EngineSettings,
    inputs: InputQueue,
}

impl EngineBuilder {
    pub fn new(settings: EngineSettings) -> Self {
        Self {
            settings,
            inputs: InputQueue::new(),
        }
    }

    pub fn with_inputs(mut self, inputs: InputQueue) -> Self {
        self.inputs = inputs;
        self
    }

    pub fn build(self) -> Engine {
        Engine {
            inputs: self.inputs,
            recorder: FrameRecorder::new(
                &self.settings.recorder_dir,
                self.settings.recorder_interval_frames,
            ),
            settings: self.settings,
            stop: StopHandle::default(),
        }
    }
}

/// Cloneable signal that ends a running frame loop from another thread.
/// Interactive sessions run with no frame budget and stop through this.
#[derive(Clone, Default)]
pub struct StopHandle {
    flag: Arc<AtomicBool>,
}

impl StopHandle {
    pub fn stop(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    pub fn is_stopped(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Owner of the frame loop. Each frame is one atomic unit of work: drain
/// queued inputs, integrate, hand the HUD frame to the hook and the recorder,
/// then (when paced) sleep out the rest of the frame interval.
pub struct Engine {
    inputs: InputQueue,
    recorder: FrameRecorder,
    settings: EngineSettings,
    stop: StopHandle,
}

impl Engine {
    /// A handle for producers feeding this engine's input queue.
    pub fn inputs(&self) -> InputQueue {
        self.inputs.clone()
    }

    /// A handle that ends the loop at the next frame boundary.
    pub fn stop_handle(&self) -> StopHandle {
        self.stop.clone()
    }

    pub fn run(&mut self, session: &mut Session, frames: Option<u64>) -> Result<()> {
        self.run_with_hook(session, frames, |_| {})
    }

    /// Runs up to `frames` frames, or with `None` until the stop handle
    /// fires.
    pub fn run_with_hook(
        &mut self,
        session: &mut Session,
        frames: Option<u64>,
        mut hook: impl FnMut(HudFrame),
    ) -> Result<()> {
        if session.state() != SessionState::Flying {
            bail!("session has not been started");
        }
        let interval = Duration::from_secs_f64(1.0 / self.settings.frame_rate as f64);
        self.recorder.begin_session(&self.settings.scenario_name)?;
        let mut remaining = frames;
        loop {
            if self.stop.is_stopped() {
                break;
            }
            if let Some(left) = remaining.as_mut() {
                if *left == 0 {
                    break;
                }
                *left -= 1;
            }
            let frame_start = Instant::now();
            for command in self.inputs.drain() {
                session.apply_input(command);
            }
            let Some(frame) = session.advance_frame() else {
                break;
            };
            self.recorder
                .maybe_write(&self.settings.scenario_name, &frame)?;
            hook(frame);
            if self.settings.paced {
                std::thread::sleep(interval.saturating_sub(frame_start.elapsed()));
            }
        }
        Ok(())
    }
}
