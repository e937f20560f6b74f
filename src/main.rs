use std::path::PathBuf;

use anyhow::Result;
use clap::Parser;

use flyover::{
    engine::{EngineBuilder, EngineSettings},
    scenario::ScenarioLoader,
    session::Session,
    web::{self, WebServerConfig},
};

#[derive(Debug, Parser)]
#[command(author, version, about = "Flyover flight toy runner")]
struct Cli {
    /// Path to the scenario YAML file
    #[arg(long, default_value = "scenarios/default.yaml")]
    scenario: PathBuf,

    /// Override frame count (headless uses the scenario default when
    /// omitted; served flights run until shutdown)
    #[arg(long)]
    frames: Option<u64>,

    /// Pin the landscape seed (scenario seed, or OS entropy, when omitted)
    #[arg(long)]
    seed: Option<u64>,

    /// Directory for recorded HUD frames
    #[arg(long, default_value = "recordings")]
    recorder_dir: PathBuf,

    /// Override recorder interval in frames (0 disables)
    #[arg(long)]
    recorder_interval: Option<u64>,

    /// Serve the browser UI instead of running headless
    #[arg(long)]
    serve: bool,

    /// Directory holding plane.png and runway.png
    #[arg(long, default_value = "assets/sprites")]
    sprite_dir: PathBuf,

    #[arg(long, default_value = "127.0.0.1")]
    host: String,

    #[arg(long, default_value_t = 8080)]
    port: u16,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    let loader = ScenarioLoader::new(".");
    let mut scenario = loader.load(&cli.scenario)?;
    if cli.seed.is_some() {
        scenario.seed = cli.seed;
    }
    if let Some(interval) = cli.recorder_interval {
        scenario.recorder_interval_frames = interval;
    }
    if cli.serve {
        return web::run(WebServerConfig {
            scenario,
            frames: cli.frames,
            recorder_dir: cli.recorder_dir,
            sprite_dir: cli.sprite_dir,
            host: cli.host,
            port: cli.port,
        })
        .await;
    }

    let frames = scenario.frames(cli.frames);
    let settings = EngineSettings::from_scenario(&scenario, cli.recorder_dir);
    let mut engine = EngineBuilder::new(settings).build();
    let mut session = Session::new(&scenario);
    session.start();

    let mut last = None;
    engine.run_with_hook(&mut session, Some(frames), |frame| last = Some(frame))?;
    match last {
        Some(frame) => println!(
            "Flight '{}' completed after {} frames. Speed {:.2} at ({:.0}, {:.0}), heading {:.0} deg.",
            scenario.name, frame.frame, frame.speed, frame.position.x, frame.position.y,
            frame.heading_degrees
        ),
        None => println!("Flight '{}' completed with no frames.", scenario.name),
    }
    Ok(())
}
