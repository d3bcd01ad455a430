//! End-to-end scenarios driven headlessly through `Session`

use market_run::platform::PlatformProfile;
use market_run::sensors::{MotionSample, PermissionState};
use market_run::settings::{AdversarySettings, Settings, Tuning};
use market_run::sim::GameEvent;
use market_run::Session;

const ANDROID_UA: &str = "Mozilla/5.0 (Linux; Android 14; Pixel 8) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/120.0 Mobile Safari/537.36";

/// 15x15 room: wall border, empty inside, player in the middle
fn walled_room() -> Vec<Vec<u8>> {
    let mut level = vec![vec![0u8; 15]; 15];
    for i in 0..15 {
        level[0][i] = 1;
        level[14][i] = 1;
        level[i][0] = 1;
        level[i][14] = 1;
    }
    level[7][7] = 9;
    level
}

fn settings(level: Vec<Vec<u8>>) -> Settings {
    Settings {
        level,
        adversaries: Vec::new(),
        step_sensitivity: 1.2,
        ..Settings::default()
    }
}

fn headless(settings: Settings) -> Session<Vec<GameEvent>> {
    Session::new(settings, &PlatformProfile::headless(), Vec::new(), 1, 0.0).unwrap()
}

/// Tick until the game ends or `max` ticks pass. Returns ticks run.
fn run_until_over(session: &mut Session<Vec<GameEvent>>, max: u32) -> u32 {
    let mut ticks = 0;
    while ticks < max && session.tick() {
        ticks += 1;
    }
    ticks
}

fn accel(magnitude: f32) -> MotionSample {
    MotionSample::from_axes(Some(0.0), Some(0.0), Some(magnitude))
}

#[test]
fn test_motion_step_pushes_player_north() {
    let profile = PlatformProfile::from_user_agent(ANDROID_UA, true);
    let mut session =
        Session::new(settings(walled_room()), &profile, Vec::new(), 1, 0.0).unwrap();
    let sensors = session.sensors().clone();
    let start = session.state().player.pos;

    assert!(!sensors.on_motion(&accel(9.8), 100.0));
    assert_eq!(sensors.permission(), PermissionState::Granted);
    assert!(sensors.on_motion(&accel(11.3), 500.0));
    assert_eq!(sensors.snapshot().step_count, 1);
    assert_eq!(sensors.snapshot().heading, 0.0);

    assert!(session.tick());

    let player = &session.state().player;
    assert!(player.vel.y < 0.0);
    assert!(player.vel.x.abs() < 1e-4);
    assert!(player.pos.y < start.y);
    assert_eq!(player.last_step_count, 1);
}

#[test]
fn test_debounced_samples_give_one_step() {
    let profile = PlatformProfile::from_user_agent(ANDROID_UA, true);
    let session = Session::new(settings(walled_room()), &profile, Vec::new(), 1, 0.0).unwrap();
    let sensors = session.sensors();

    sensors.on_motion(&accel(9.8), 0.0);
    assert!(sensors.on_motion(&accel(11.3), 1000.0));
    assert!(!sensors.on_motion(&accel(9.8), 1200.0));
    assert_eq!(sensors.snapshot().step_count, 1);
}

#[test]
fn test_single_labelled_item_wins() {
    let mut level = walled_room();
    level[7][8] = 2;
    let session_settings = Settings {
        shopping_list: vec!["Milk".to_string()],
        ..settings(level)
    };
    let mut session = headless(session_settings);
    assert_eq!(session.state().items.label_at(8, 7), Some("Milk"));

    session.sensors().set_heading(90.0);
    session.sensors().simulate_step();
    run_until_over(&mut session, 600);

    assert_eq!(
        session.listener().as_slice(),
        &[
            GameEvent::ScoreUpdate(100),
            GameEvent::ItemCollected("Milk".to_string()),
            GameEvent::GameOver { won: true },
        ]
    );
}

#[test]
fn test_last_pellet_wins_once() {
    let level = vec![
        vec![1, 1, 1, 1, 1, 1],
        vec![1, 9, 2, 2, 0, 1],
        vec![1, 1, 1, 1, 1, 1],
    ];
    let mut session = headless(settings(level));
    session.sensors().set_heading(90.0);

    let mut ticks = 0;
    while !session.is_over() && ticks < 2000 {
        if ticks % 30 == 0 {
            session.sensors().simulate_step();
        }
        session.tick();
        ticks += 1;

        let events = session.listener();
        let scores = events
            .iter()
            .filter(|e| matches!(e, GameEvent::ScoreUpdate(_)))
            .count();
        // No game over while a pellet is still left
        if scores < 2 {
            assert!(!events.contains(&GameEvent::GameOver { won: true }));
        }
    }

    assert_eq!(
        session.listener().as_slice(),
        &[
            GameEvent::ScoreUpdate(10),
            GameEvent::ScoreUpdate(10),
            GameEvent::GameOver { won: true },
        ]
    );
    assert_eq!(session.state().score, 20);
}

#[test]
fn test_adversary_capture_ends_game_once() {
    let mut level = walled_room();
    level[7][8] = 8;
    level[3][3] = 2;
    let session_settings = Settings {
        adversaries: vec![AdversarySettings {
            speed: 10.0,
            ..AdversarySettings::default()
        }],
        tuning: Tuning {
            adversary_noise: 0.0,
            ..Tuning::default()
        },
        ..settings(level)
    };
    let mut session = headless(session_settings);

    assert!(session.tick());
    assert_eq!(
        session.listener().as_slice(),
        &[GameEvent::GameOver { won: false }]
    );

    // Terminal: later input changes nothing
    session.sensors().simulate_step();
    assert!(!session.tick());
    assert_eq!(session.advance(0.1, 1000.0), 0);
    assert_eq!(session.listener().len(), 1);
    assert_eq!(session.state().time_ticks, 1);
}

#[test]
fn test_wrap_around_right_edge() {
    let mut level = vec![vec![1u8; 15]; 3];
    level[1] = vec![0; 15];
    level[1][14] = 9;
    let mut session = headless(settings(level));
    let y = session.state().player.pos.y;
    let world_width = session.state().grid.world_width();

    session.sensors().set_heading(90.0);
    session.sensors().simulate_step();

    let mut wrapped = false;
    for _ in 0..20 {
        let before = session.state().player.pos.x;
        session.tick();
        let player = &session.state().player;
        if player.pos.x < before {
            assert!(before < world_width);
            assert!(player.pos.x < 10.0);
            assert!(player.vel.x > 0.0);
            wrapped = true;
            break;
        }
    }
    assert!(wrapped);
    assert_eq!(session.state().player.pos.y, y);
}

#[test]
fn test_teardown_ignores_late_callbacks() {
    let profile = PlatformProfile::from_user_agent(ANDROID_UA, true);
    let mut session = Session::new(settings(walled_room()), &profile, Vec::new(), 1, 0.0).unwrap();
    let late = session.sensors().clone();
    session.teardown();

    late.on_motion(&accel(9.8), 0.0);
    late.on_motion(&accel(15.0), 1000.0);
    late.simulate_step();
    late.set_heading(180.0);

    assert_eq!(late.snapshot().step_count, 0);
    assert_eq!(late.snapshot().heading, 0.0);
    assert!(!session.tick());
    assert!(session.listener().is_empty());
}

#[test]
fn test_silent_sensors_time_out_but_game_stays_playable() {
    let profile = PlatformProfile::from_user_agent(ANDROID_UA, true);
    let mut session =
        Session::new(settings(walled_room()), &profile, Vec::new(), 1, 0.0).unwrap();
    assert!(session.sensors().permission().is_pending());

    session.advance(1.0 / 60.0, 5000.0);
    assert_eq!(session.sensors().permission(), PermissionState::Timeout);

    // Samples after the timeout are ignored; manual control still works
    assert!(!session.sensors().on_motion(&accel(9.8), 5100.0));
    session.sensors().simulate_step();
    let start = session.state().player.pos;
    session.tick();
    assert!(session.state().player.pos.y < start.y);
}
