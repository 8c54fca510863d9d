//! Whole-session flows: hazards, riding, and the countdown driven through
//! the same per-tick API an embedder uses.

use bytes::Bytes;
use tokio::sync::mpsc;

use skydash_core::config::SessionConfig;
use skydash_core::net::messages::{ClientMessage, EndReason};
use skydash_core::net::protocol::decode_client_message;
use skydash_core::test_helpers::{demo_level, make_session_info, RecordingAudio, RecordingDisplay};

use skydash_session::entities::Platform;
use skydash_session::{ContactEvent, LevelSession, SessionEvent, TouchFlags, PLAYER_BODY_ID};

fn make_session(config: SessionConfig) -> (LevelSession, mpsc::UnboundedReceiver<Bytes>) {
    let (tx, rx) = mpsc::unbounded_channel();
    let mut session = LevelSession::new(make_session_info(), &demo_level(), config);
    session.set_outbound(tx);
    (session, rx)
}

fn drain_frames(rx: &mut mpsc::UnboundedReceiver<Bytes>) -> Vec<ClientMessage> {
    let mut out = Vec::new();
    while let Ok(frame) = rx.try_recv() {
        out.push(decode_client_message(&frame).expect("lobby frame should decode"));
    }
    out
}

fn penalty_values(frames: &[ClientMessage]) -> Vec<f64> {
    frames
        .iter()
        .filter_map(|f| match f {
            ClientMessage::UpdateTimer(m) if m.is_penalty => Some(m.time_left),
            _ => None,
        })
        .collect()
}

#[test]
fn repeated_spike_hits_walk_the_countdown_down() {
    let display = RecordingDisplay::default();
    let (mut session, mut lobby_rx) = make_session(SessionConfig::default());
    session.set_display(Box::new(display.clone()));
    session.start();
    drain_frames(&mut lobby_rx);

    let spike = session.entities().spikes[0].id;
    let hit = [ContactEvent::overlap(PLAYER_BODY_ID, spike)];

    session.update(0.0, &hit);
    assert_eq!(session.time_left(), 165.0);

    // Wait out the grace window (the countdown ticks twice meanwhile).
    session.update(2.0, &[]);
    session.update(0.0, &hit);
    assert_eq!(session.time_left(), 148.0);

    session.update(2.0, &[]);
    session.update(0.0, &hit);
    assert_eq!(session.time_left(), 131.0);

    assert_eq!(display.last(), Some(131.0));
    let frames = drain_frames(&mut lobby_rx);
    assert_eq!(penalty_values(&frames), vec![165.0, 148.0, 131.0]);
}

#[test]
fn instant_death_hit_then_expiry_on_the_next_tick() {
    let display = RecordingDisplay::default();
    let audio = RecordingAudio::default();
    let (mut session, mut lobby_rx) = make_session(SessionConfig {
        instant_death: true,
        ..SessionConfig::default()
    });
    session.set_display(Box::new(display.clone()));
    session.set_audio(Box::new(audio.clone()));
    session.start();
    drain_frames(&mut lobby_rx);

    let spike = session.entities().spikes[0].id;
    let events = session.update(0.0, &[ContactEvent::overlap(PLAYER_BODY_ID, spike)]);

    // All time gone, but the session survives until the next tick.
    assert_eq!(session.time_left(), 0.0);
    assert!(events.is_empty());
    assert!(!session.is_ended());

    let events = session.update(1.0, &[]);
    assert!(matches!(
        events.as_slice(),
        [SessionEvent::Ended {
            reason: EndReason::Timeout,
            ..
        }]
    ));
    assert_eq!(audio.fade_outs(), 1);
    let frames = drain_frames(&mut lobby_rx);
    assert!(frames
        .iter()
        .any(|f| matches!(f, ClientMessage::PlayerGameOver(_))));
    assert_eq!(display.last(), Some(0.0));
}

#[test]
fn full_timeout_run_ends_exactly_once() {
    let display = RecordingDisplay::default();
    let (mut session, mut lobby_rx) = make_session(SessionConfig::default());
    session.set_display(Box::new(display.clone()));
    session.start();

    let dt = 1.0_f32 / 60.0;
    let mut ended = 0;
    for _ in 0..(185 * 60) {
        for event in session.update(dt, &[]) {
            if matches!(event, SessionEvent::Ended { .. }) {
                ended += 1;
            }
        }
    }

    assert_eq!(ended, 1, "the session must end exactly once");
    assert!(session.is_ended());
    assert_eq!(session.time_left(), 0.0);
    assert_eq!(display.last(), Some(0.0));

    let frames = drain_frames(&mut lobby_rx);
    let game_overs = frames
        .iter()
        .filter(|f| matches!(f, ClientMessage::PlayerGameOver(_)))
        .count();
    assert_eq!(game_overs, 1);

    // The periodic share fires on every five-second boundary, zero included.
    let broadcasts: Vec<f64> = frames
        .iter()
        .filter_map(|f| match f {
            ClientMessage::UpdateTimer(m) if !m.is_penalty => Some(m.time_left),
            _ => None,
        })
        .collect();
    assert_eq!(broadcasts.first(), Some(&175.0));
    assert_eq!(broadcasts.last(), Some(&0.0));
    assert_eq!(broadcasts.len(), 36);
}

#[test]
fn descending_mover_carries_a_seated_player() {
    let (mut session, _lobby_rx) = make_session(SessionConfig::default());
    session.start();

    let dt = 1.0_f32 / 60.0;
    // The vertical mover spends its first period descending; seat the
    // player on it at rest and ride the leg down.
    let (mover_id, mover_x, mover_top) = {
        let mover = vertical_mover(session.entities().platforms.as_slice());
        (mover.id, mover.x, mover.bounds().top())
    };
    {
        let player = session.player_mut();
        player.x = mover_x;
        player.y = mover_top - player.height / 2.0;
        player.vx = 0.0;
        player.vy = 0.0;
    }

    let seated = TouchFlags {
        up: false,
        down: true,
    };
    let under = TouchFlags {
        up: true,
        down: false,
    };

    for _ in 0..60 {
        // Engine integration step, then the session tick with the contact.
        let vy = session.player().vy;
        session.player_mut().y += vy * dt;
        session.update(
            dt,
            &[ContactEvent::collision(
                PLAYER_BODY_ID,
                mover_id,
                seated,
                under,
            )],
        );

        let mover = vertical_mover(session.entities().platforms.as_slice());
        let gap = (session.player().bottom() - mover.bounds().top()).abs();
        assert!(gap < 5.0, "player drifted {gap} units off the mover");
        assert!(session.player().on_moving_platform);
    }
}

fn vertical_mover(platforms: &[Platform]) -> &Platform {
    platforms
        .iter()
        .find(|p| p.is_kinematic() && p.x == 1921.0)
        .expect("demo level has a vertical mover")
}
