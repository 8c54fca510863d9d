use std::time::Duration;

use bytes::Bytes;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

use skydash_core::net::protocol::decode_server_message;

use crate::session::{ContactEvent, LevelSession, SessionEvent};

/// Commands sent from the embedder to a running session task.
#[derive(Debug)]
pub enum SessionCommand {
    /// Contacts from the physics step, applied at the next tick.
    Contacts(Vec<ContactEvent>),
    /// A raw frame from the lobby connection.
    Net(Bytes),
    /// Latest known position of the other player.
    PeerPosition { x: f32, y: f32 },
    /// Charge the distance-scaled penalty (level variants with
    /// distance-priced hazards).
    DistancePenalty,
    /// Tear the session down without announcing a game over.
    Stop,
}

/// Spawn a session on its own tick loop.
///
/// The task starts the countdown immediately and exits when the session
/// ends or a [`SessionCommand::Stop`] arrives. Returns the command sender,
/// the session event receiver, and the join handle.
pub fn spawn_session(
    mut session: LevelSession,
) -> (
    mpsc::UnboundedSender<SessionCommand>,
    mpsc::UnboundedReceiver<SessionEvent>,
    JoinHandle<()>,
) {
    let (cmd_tx, cmd_rx) = mpsc::unbounded_channel();
    let (event_tx, event_rx) = mpsc::unbounded_channel();

    let handle = tokio::spawn(async move {
        run_session_loop(&mut session, cmd_rx, event_tx).await;
    });

    (cmd_tx, event_rx, handle)
}

async fn run_session_loop(
    session: &mut LevelSession,
    mut cmd_rx: mpsc::UnboundedReceiver<SessionCommand>,
    event_tx: mpsc::UnboundedSender<SessionEvent>,
) {
    let tick_rate = session.config().tick_rate_hz.max(1.0);
    let dt = 1.0 / tick_rate;
    let mut interval = tokio::time::interval(Duration::from_secs_f32(dt));
    interval.set_missed_tick_behavior(tokio::time::MissedTickBehavior::Skip);

    session.start();
    let mut pending_contacts: Vec<ContactEvent> = Vec::new();

    loop {
        tokio::select! {
            _ = interval.tick() => {
                let contacts = std::mem::take(&mut pending_contacts);
                for event in session.update(dt, &contacts) {
                    let ended = matches!(event, SessionEvent::Ended { .. });
                    let _ = event_tx.send(event);
                    if ended {
                        return;
                    }
                }
            }
            cmd = cmd_rx.recv() => {
                match cmd {
                    Some(SessionCommand::Contacts(mut contacts)) => {
                        pending_contacts.append(&mut contacts);
                    },
                    Some(SessionCommand::Net(frame)) => {
                        match decode_server_message(&frame) {
                            Ok(msg) => session.handle_net(msg),
                            Err(e) => {
                                tracing::warn!(error = %e, "Dropping undecodable lobby frame");
                            },
                        }
                    },
                    Some(SessionCommand::PeerPosition { x, y }) => {
                        session.set_peer_position(x, y);
                    },
                    Some(SessionCommand::DistancePenalty) => {
                        session.apply_distance_penalty();
                    },
                    Some(SessionCommand::Stop) | None => {
                        session.teardown();
                        return;
                    },
                }
            }
        }
    }
}
