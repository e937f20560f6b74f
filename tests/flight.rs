use flyover::{input::InputCommand, scenario::ScenarioLoader, session::Session};

fn loader() -> ScenarioLoader {
    ScenarioLoader::new(env!("CARGO_MANIFEST_DIR"))
}

fn started_session(seed: u64) -> Session {
    let mut scenario = loader()
        .load("scenarios/default.yaml")
        .expect("scenario loads");
    scenario.seed = Some(seed);
    let mut session = Session::new(&scenario);
    session.start();
    session
}

#[test]
fn resting_plane_stays_put() {
    let mut session = started_session(1);
    let before = session.plane().unwrap().position;
    for _ in 0..60 {
        session.advance_frame();
    }
    assert_eq!(session.plane().unwrap().position, before);
    assert_eq!(session.plane().unwrap().velocity.length(), 0.0);
}

#[test]
fn one_up_press_climbs_until_drag_wins() {
    let mut session = started_session(2);
    session.apply_input(InputCommand::Up);

    let mut prev_y = session.plane().unwrap().position.y;
    let mut steps = 0u32;
    while session.plane().unwrap().velocity.y <= -0.001 {
        session.advance_frame();
        let y = session.plane().unwrap().position.y;
        assert!(y < prev_y, "y should fall monotonically, {y} >= {prev_y}");
        prev_y = y;
        steps += 1;
        assert!(steps < 10_000, "drag never decayed the climb");
    }
    // 0.99^n decay from 0.1 to 0.001 takes a few hundred frames
    assert!(steps > 100, "climb died after only {steps} frames");
}

#[test]
fn opposite_presses_cancel() {
    let mut session = started_session(3);
    session.apply_input(InputCommand::Left);
    session.apply_input(InputCommand::Right);
    session.apply_input(InputCommand::Up);
    session.apply_input(InputCommand::Down);
    let before = session.plane().unwrap().position;
    for _ in 0..10 {
        session.advance_frame();
    }
    assert_eq!(session.plane().unwrap().position, before);
}

#[test]
fn speed_reported_to_hud_decays() {
    let mut session = started_session(4);
    session.apply_input(InputCommand::Right);
    session.apply_input(InputCommand::Down);

    let first = session.advance_frame().unwrap();
    let mut last = first;
    for _ in 0..120 {
        last = session.advance_frame().unwrap();
    }
    assert!(last.speed < first.speed);
    assert!(last.speed > 0.0);
}

#[test]
fn heading_tracks_the_velocity_vector() {
    let mut session = started_session(5);
    session.apply_input(InputCommand::Right);
    session.apply_input(InputCommand::Down);
    let frame = session.advance_frame().unwrap();
    // Equal x and y components point 45 degrees down-right
    assert!((frame.heading_degrees - 45.0).abs() < 1e-3);

    let mut session = started_session(6);
    session.apply_input(InputCommand::Up);
    let frame = session.advance_frame().unwrap();
    assert!((frame.heading_degrees - -90.0).abs() < 1e-3);
}
