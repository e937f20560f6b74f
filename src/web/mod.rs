mod assets;

use std::{
    convert::Infallible,
    net::SocketAddr,
    path::PathBuf,
    sync::{
        atomic::{AtomicBool, Ordering},
        Arc, Mutex,
    },
    time::Duration,
};

use anyhow::Result;
use axum::body::Body;
use axum::http::StatusCode;
use axum::{
    extract::{Path, State},
    http::header,
    response::{
        sse::{Event, KeepAlive, Sse},
        Html, IntoResponse, Response,
    },
    routing::{get, post},
    Json, Router,
};
use bytes::Bytes;
use serde::{Deserialize, Serialize};
use tokio::{net::TcpListener, sync::broadcast};
use tokio_stream::{wrappers::BroadcastStream, Stream, StreamExt};

use crate::{
    engine::{EngineBuilder, EngineSettings},
    input::{InputCommand, InputQueue},
    scenario::Scenario,
    session::{HudFrame, Session, WorldView},
};

#[derive(Clone, Copy, Serialize)]
pub struct UiFrame {
    pub frame: HudFrame,
    pub completed: bool,
}

#[derive(Serialize)]
pub struct StateEnvelope {
    pub scenario: String,
    /// `None` means the flight runs until the server shuts down.
    pub total_frames: Option<u64>,
    pub frame: Option<UiFrame>,
    pub completed: bool,
}

#[derive(Serialize)]
struct WorldEnvelope {
    scenario: String,
    world: Option<WorldView>,
}

#[derive(Serialize)]
struct StartResponse {
    started: bool,
}

#[derive(Deserialize)]
struct InputRequest {
    command: InputCommand,
}

#[derive(Clone)]
struct AppState {
    broadcaster: broadcast::Sender<String>,
    latest_frame: Arc<Mutex<Option<UiFrame>>>,
    world_view: Arc<Mutex<Option<WorldView>>>,
    inputs: InputQueue,
    start_requested: Arc<AtomicBool>,
    session_done: Arc<AtomicBool>,
    scenario_name: String,
    total_frames: Option<u64>,
    sprite_dir: PathBuf,
}

pub struct WebServerConfig {
    pub scenario: Scenario,
    /// Optional frame budget. Interactive flights normally pass `None` and
    /// run until the server shuts down.
    pub frames: Option<u64>,
    pub recorder_dir: PathBuf,
    pub sprite_dir: PathBuf,
    pub host: String,
    pub port: u16,
}

pub async fn run(config: WebServerConfig) -> Result<()> {
    let WebServerConfig {
        scenario,
        frames,
        recorder_dir,
        sprite_dir,
        host,
        port,
    } = config;

    let scenario_name = scenario.name.clone();
    let mut session = Session::new(&scenario);
    let settings = EngineSettings::from_scenario(&scenario, recorder_dir).paced();
    let mut engine = EngineBuilder::new(settings).build();

    let (tx, _) = broadcast::channel::<String>(512);
    let inputs = engine.inputs();
    let latest_frame: Arc<Mutex<Option<UiFrame>>> = Arc::new(Mutex::new(None));
    let world_view: Arc<Mutex<Option<WorldView>>> = Arc::new(Mutex::new(None));
    let start_requested = Arc::new(AtomicBool::new(false));
    let session_done = Arc::new(AtomicBool::new(false));
    let stop = engine.stop_handle();

    let latest_for_sim = latest_frame.clone();
    let world_for_sim = world_view.clone();
    let start_for_sim = start_requested.clone();
    let done_for_sim = session_done.clone();
    let stop_for_sim = stop.clone();
    let tx_for_sim = tx.clone();
    let scenario_label = scenario_name.clone();

    let sim_handle = tokio::task::spawn_blocking(move || -> Result<()> {
        // Menu state: wait for the one-way start action from the browser.
        while !start_for_sim.load(Ordering::SeqCst) {
            if stop_for_sim.is_stopped() {
                return Ok(());
            }
            std::thread::sleep(Duration::from_millis(25));
        }

        session.start();
        {
            let mut guard = world_for_sim.lock().expect("world view lock poisoned");
            *guard = Some(session.world_view());
        }

        engine.run_with_hook(&mut session, frames, |hud| {
            let frame = UiFrame {
                frame: hud,
                completed: false,
            };
            {
                let mut guard = latest_for_sim.lock().expect("latest frame lock poisoned");
                *guard = Some(frame);
            }
            if let Ok(payload) = serde_json::to_string(&frame) {
                let _ = tx_for_sim.send(payload);
            }
        })?;

        done_for_sim.store(true, Ordering::SeqCst);

        let final_frame = {
            let guard = latest_for_sim.lock().expect("latest frame lock poisoned");
            *guard
        };
        if let Some(mut frame) = final_frame {
            frame.completed = true;
            {
                let mut guard = latest_for_sim.lock().expect("latest frame lock poisoned");
                *guard = Some(frame);
            }
            if let Ok(payload) = serde_json::to_string(&frame) {
                let _ = tx_for_sim.send(payload);
            }
        }

        Ok(())
    });

    let state = Arc::new(AppState {
        broadcaster: tx.clone(),
        latest_frame: latest_frame.clone(),
        world_view: world_view.clone(),
        inputs,
        start_requested: start_requested.clone(),
        session_done: session_done.clone(),
        scenario_name: scenario_name.clone(),
        total_frames: frames,
        sprite_dir,
    });

    tokio::spawn(async move {
        match sim_handle.await {
            Ok(Ok(())) => {
                println!("[web] Flight session finished for '{}'.", scenario_label);
            }
            Ok(Err(err)) => {
                eprintln!("[web] Flight session error: {err:?}");
            }
            Err(err) => {
                eprintln!("[web] Flight task failed: {err:?}");
            }
        }
    });

    let router = Router::new()
        .route("/", get(index))
        .route("/styles.css", get(styles))
        .route("/app.js", get(script))
        .route("/sprites/:name", get(sprite))
        .route("/api/start", post(start_flight))
        .route("/api/world", get(world))
        .route("/api/state", get(latest_state))
        .route("/api/events", get(stream_events))
        .route("/api/input", post(push_input))
        .with_state(state);

    let addr: SocketAddr = format!("{}:{}", host, port)
        .parse()
        .expect("invalid address");

    println!(
        "Flyover live at http://{}:{} (Ctrl+C to stop)",
        host, port
    );

    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Ends an unbudgeted flight, or releases the sim thread if the menu
    // never advanced past waiting.
    stop.stop();

    Ok(())
}

async fn shutdown_signal() {
    let _ = tokio::signal::ctrl_c().await;
    println!("[web] Shutting down...");
}

async fn index() -> Html<&'static str> {
    Html(assets::INDEX_HTML)
}

async fn styles() -> impl IntoResponse {
    Response::builder()
        .header(header::CONTENT_TYPE, "text/css; charset=utf-8")
        .body(assets::STYLES_CSS.to_string())
        .unwrap()
}

async fn script() -> impl IntoResponse {
    Response::builder()
        .header(
            header::CONTENT_TYPE,
            "application/javascript; charset=utf-8",
        )
        .body(assets::APP_JS.to_string())
        .unwrap()
}

/// Sprites are served straight off disk; a missing file is a plain 404 and
/// the front-end simply skips that blit.
async fn sprite(Path(name): Path<String>, State(state): State<Arc<AppState>>) -> Response {
    let not_found = || {
        Response::builder()
            .status(StatusCode::NOT_FOUND)
            .body(Body::from(Bytes::new()))
            .unwrap()
    };
    if name.contains('/') || name.contains('\\') || name.contains("..") {
        return not_found();
    }
    match tokio::fs::read(state.sprite_dir.join(&name)).await {
        Ok(bytes) => Response::builder()
            .header(header::CONTENT_TYPE, "image/png")
            .body(Body::from(Bytes::from(bytes)))
            .unwrap(),
        Err(_) => not_found(),
    }
}

async fn start_flight(State(state): State<Arc<AppState>>) -> Json<StartResponse> {
    state.start_requested.store(true, Ordering::SeqCst);
    Json(StartResponse { started: true })
}

async fn world(State(state): State<Arc<AppState>>) -> Json<WorldEnvelope> {
    let world = state
        .world_view
        .lock()
        .expect("world view lock poisoned")
        .clone();
    Json(WorldEnvelope {
        scenario: state.scenario_name.clone(),
        world,
    })
}

async fn latest_state(State(state): State<Arc<AppState>>) -> Json<StateEnvelope> {
    let frame = *state
        .latest_frame
        .lock()
        .expect("latest frame lock poisoned");
    Json(StateEnvelope {
        scenario: state.scenario_name.clone(),
        total_frames: state.total_frames,
        frame,
        completed: state.session_done.load(Ordering::SeqCst),
    })
}

async fn push_input(
    State(state): State<Arc<AppState>>,
    Json(request): Json<InputRequest>,
) -> StatusCode {
    state.inputs.push(request.command);
    StatusCode::NO_CONTENT
}

async fn stream_events(
    State(state): State<Arc<AppState>>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let rx = state.broadcaster.subscribe();
    let stream = BroadcastStream::new(rx).filter_map(|msg| match msg {
        Ok(payload) => Some(Ok(Event::default().data(payload))),
        Err(_) => None,
    });
    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(2))
            .text("keep-alive"),
    )
}

#[cfg(test)]
mod tests {
    use super::assets;

    #[test]
    fn test_front_end_binds_flight_keys() {
        for key in ["ArrowUp", "ArrowDown", "ArrowLeft", "ArrowRight"] {
            assert!(assets::APP_JS.contains(key), "app.js should bind {key}");
        }
        // Escape closes the window, matching the desktop-toy exit shortcut.
        assert!(assets::APP_JS.contains("Escape"));
        assert!(assets::APP_JS.contains("window.close"));
    }
}
