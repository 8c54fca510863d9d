use bytes::Bytes;
use tokio::sync::mpsc;

use skydash_core::collab::{AmbientAudio, SessionInfo, TimerDisplay};
use skydash_core::config::SessionConfig;
use skydash_core::level::LevelDef;
use skydash_core::net::messages::{
    ClientMessage, EndReason, PlayerGameOverMsg, RequestTimerSyncMsg, ResetTimerMsg, ServerMessage,
    UpdateTimerMsg,
};
use skydash_core::net::protocol::encode_client_message;
use skydash_core::player::{MovementMode, PlayerBody};

use crate::entities::{BodyId, Entities, EntityKind};
use crate::hazards;
use crate::rider::{ride_platform, TouchPair};
use crate::scheduler::{DeferredAction, Scheduler};
use crate::timer::{CountdownTimer, TimerEvent};

/// Body id reserved for the player; level entities start above it.
pub const PLAYER_BODY_ID: BodyId = 0;

/// Per-body touching flags as the physics engine reports them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchFlags {
    pub up: bool,
    pub down: bool,
}

/// One contact or overlap reported by the physics engine for a tick.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub body_a: BodyId,
    pub body_b: BodyId,
    pub a_touching: TouchFlags,
    pub b_touching: TouchFlags,
}

impl ContactEvent {
    /// An overlap with no resolved touching flags (sensors, hazards).
    pub fn overlap(body_a: BodyId, body_b: BodyId) -> Self {
        Self {
            body_a,
            body_b,
            a_touching: TouchFlags::default(),
            b_touching: TouchFlags::default(),
        }
    }

    /// A resolved collision with the engine's touching flags.
    pub fn collision(
        body_a: BodyId,
        body_b: BodyId,
        a_touching: TouchFlags,
        b_touching: TouchFlags,
    ) -> Self {
        Self {
            body_a,
            body_b,
            a_touching,
            b_touching,
        }
    }
}

/// Events a session surfaces to its embedder.
#[derive(Debug, Clone, PartialEq)]
pub enum SessionEvent {
    /// A portal switched the player's movement mode.
    ModeChanged(MovementMode),
    /// The session reached its single terminal state.
    Ended { info: SessionInfo, reason: EndReason },
}

/// A running level session: the player, the level's interactive bodies, the
/// countdown, and the collaborators everything reports to.
///
/// The session is synchronous. The embedder integrates physics, feeds the
/// resulting contacts into [`update`](Self::update) once per tick, and
/// routes lobby frames through [`handle_net`](Self::handle_net). Every
/// collaborator is optional, so a session runs headless and offline without
/// any special casing.
pub struct LevelSession {
    info: SessionInfo,
    config: SessionConfig,
    player: PlayerBody,
    entities: Entities,
    scheduler: Scheduler,
    timer: CountdownTimer,
    display: Option<Box<dyn TimerDisplay>>,
    audio: Option<Box<dyn AmbientAudio>>,
    outbound: Option<mpsc::UnboundedSender<Bytes>>,
    peer_position: Option<(f32, f32)>,
    /// Fractional seconds carried between ticks; the countdown consumes
    /// whole seconds only.
    tick_accum: f64,
    ended: Option<EndReason>,
    events: Vec<SessionEvent>,
}

impl LevelSession {
    pub fn new(info: SessionInfo, level: &LevelDef, config: SessionConfig) -> Self {
        let timer = CountdownTimer::new(&config);
        Self {
            info,
            config,
            player: PlayerBody::new(level.spawn_x, level.spawn_y),
            entities: Entities::from_level(level, PLAYER_BODY_ID + 1),
            scheduler: Scheduler::new(),
            timer,
            display: None,
            audio: None,
            outbound: None,
            peer_position: None,
            tick_accum: 0.0,
            ended: None,
            events: Vec::new(),
        }
    }

    pub fn info(&self) -> &SessionInfo {
        &self.info
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn player(&self) -> &PlayerBody {
        &self.player
    }

    /// The physics engine owns pose integration; it writes the player body
    /// back through this between ticks.
    pub fn player_mut(&mut self) -> &mut PlayerBody {
        &mut self.player
    }

    pub fn entities(&self) -> &Entities {
        &self.entities
    }

    pub fn time_left(&self) -> f64 {
        self.timer.time_left()
    }

    pub fn is_ended(&self) -> bool {
        self.ended.is_some()
    }

    pub fn end_reason(&self) -> Option<EndReason> {
        self.ended
    }

    pub fn set_display(&mut self, display: Box<dyn TimerDisplay>) {
        self.display = Some(display);
    }

    pub fn set_audio(&mut self, audio: Box<dyn AmbientAudio>) {
        self.audio = Some(audio);
    }

    /// Attach the lobby connection. Frames are fully encoded before they
    /// leave the session.
    pub fn set_outbound(&mut self, outbound: mpsc::UnboundedSender<Bytes>) {
        self.outbound = Some(outbound);
    }

    /// Latest known position of the other player, fed by the lobby layer.
    pub fn set_peer_position(&mut self, x: f32, y: f32) {
        self.peer_position = Some((x, y));
    }

    /// Start (or restart) the countdown. No-op once the session has ended.
    pub fn start(&mut self) {
        if self.ended.is_some() {
            return;
        }
        tracing::info!(
            lobby = %self.info.lobby_id,
            level = %self.info.level,
            "Session started"
        );
        // A restart re-arms the cadence from a whole second.
        self.tick_accum = 0.0;
        let events = self.timer.start();
        self.route_timer_events(events);
    }

    /// Advance the session by one tick: scripted platforms first, then the
    /// engine's contacts, then deferred actions, then the countdown.
    pub fn update(&mut self, dt: f32, contacts: &[ContactEvent]) -> Vec<SessionEvent> {
        if self.ended.is_some() {
            return std::mem::take(&mut self.events);
        }

        self.entities.advance_motion(dt);

        for contact in contacts {
            self.handle_contact(*contact);
        }

        for (body, action) in self.scheduler.tick(dt) {
            self.apply_deferred(body, action);
        }

        self.tick_accum += f64::from(dt);
        while self.tick_accum >= 1.0 {
            self.tick_accum -= 1.0;
            let events = self.timer.tick_second();
            self.route_timer_events(events);
        }

        std::mem::take(&mut self.events)
    }

    /// Charge the distance-scaled hazard penalty, used by level variants
    /// where spikes cost time proportional to how far apart the players
    /// are. Without a peer feed there is no distance, so nothing happens.
    pub fn apply_distance_penalty(&mut self) {
        let Some((peer_x, peer_y)) = self.peer_position else {
            tracing::debug!("Distance penalty skipped, no peer position known");
            return;
        };
        let dx = f64::from(self.player.x - peer_x);
        let dy = f64::from(self.player.y - peer_y);
        let distance = (dx * dx + dy * dy).sqrt();
        let events = self.timer.apply_distance_penalty(distance);
        self.route_timer_events(events);
    }

    /// Feed one decoded lobby frame into the session.
    pub fn handle_net(&mut self, msg: ServerMessage) {
        match msg {
            ServerMessage::TimerSync(sync) => {
                let events = self.timer.receive_sync(sync.time_left);
                self.route_timer_events(events);
            }
        }
    }

    /// Move the session to its terminal state: fade the audio, tell the
    /// lobby, surface the end event. Repeat calls do nothing.
    pub fn terminate(&mut self, reason: EndReason) {
        if self.ended.is_some() {
            return;
        }
        self.ended = Some(reason);
        tracing::info!(
            lobby = %self.info.lobby_id,
            reason = reason.as_str(),
            "Session ended"
        );

        if let Some(audio) = self.audio.as_mut() {
            audio.fade_out();
        }
        self.send(ClientMessage::PlayerGameOver(PlayerGameOverMsg {
            lobby_id: self.info.lobby_id,
            reason,
        }));
        self.teardown();
        self.events.push(SessionEvent::Ended {
            info: self.info.clone(),
            reason,
        });
    }

    /// Detach the countdown and drop pending deferred actions without
    /// announcing a game over. Used when the player leaves the level; safe
    /// to call from any state, repeatedly.
    pub fn teardown(&mut self) {
        self.scheduler.cancel_all();
        self.timer.teardown();
    }

    fn handle_contact(&mut self, event: ContactEvent) {
        let (other, player_touching, other_touching) = if event.body_a == PLAYER_BODY_ID {
            (event.body_b, event.a_touching, event.b_touching)
        } else if event.body_b == PLAYER_BODY_ID {
            (event.body_a, event.b_touching, event.a_touching)
        } else {
            tracing::warn!(
                body_a = event.body_a,
                body_b = event.body_b,
                "Contact without the player body, ignoring"
            );
            return;
        };

        match self.entities.kind_of(other) {
            Some(EntityKind::Platform) => {
                let Some(platform) = self.entities.platform(other) else {
                    return;
                };
                ride_platform(
                    &mut self.player,
                    platform,
                    TouchPair {
                        player_down: player_touching.down,
                        platform_up: other_touching.up,
                    },
                );
            }
            Some(EntityKind::JumpPad) => {
                let Some(pad) = self.entities.jump_pad_mut(other) else {
                    return;
                };
                hazards::trigger_jump_pad(&mut self.player, pad, &mut self.scheduler, &self.config);
            }
            Some(EntityKind::Spike) => {
                let instant_death = self.timer.instant_death();
                if let Some(penalty) = hazards::spike_hit(
                    &mut self.player,
                    PLAYER_BODY_ID,
                    other,
                    &mut self.scheduler,
                    &self.config,
                    instant_death,
                ) {
                    let events = self.timer.apply_penalty(penalty);
                    self.route_timer_events(events);
                }
            }
            Some(EntityKind::Portal) => {
                let Some(portal) = self.entities.portal_mut(other) else {
                    return;
                };
                // Disabled portals are skipped before the handler runs.
                if !portal.enabled {
                    return;
                }
                if hazards::portal_contact(
                    portal,
                    Some(&mut self.player),
                    &mut self.scheduler,
                    &self.config,
                ) {
                    self.events.push(SessionEvent::ModeChanged(self.player.mode));
                }
            }
            None => {
                tracing::warn!(body = other, "Contact references an unknown body, ignoring");
            }
        }
    }

    fn apply_deferred(&mut self, body: BodyId, action: DeferredAction) {
        match action {
            DeferredAction::ClearJumpPadCooldown => {
                if let Some(pad) = self.entities.jump_pad_mut(body) {
                    pad.cooldown = false;
                }
            }
            DeferredAction::ClearInvulnerability => {
                self.player.invulnerable = false;
            }
            DeferredAction::ReenablePortal => {
                if let Some(portal) = self.entities.portal_mut(body) {
                    portal.enabled = true;
                }
            }
        }
    }

    fn route_timer_events(&mut self, events: Vec<TimerEvent>) {
        for event in events {
            match event {
                TimerEvent::Display(value) => {
                    if let Some(display) = self.display.as_mut() {
                        display.update_timer(value);
                    }
                }
                TimerEvent::RequestSync => {
                    self.send(ClientMessage::RequestTimerSync(RequestTimerSyncMsg {
                        lobby_id: self.info.lobby_id,
                    }));
                }
                TimerEvent::AnnounceReset(time_left) => {
                    self.send(ClientMessage::ResetTimer(ResetTimerMsg {
                        lobby_id: self.info.lobby_id,
                        time_left,
                    }));
                }
                TimerEvent::Broadcast {
                    time_left,
                    is_penalty,
                } => {
                    self.send(ClientMessage::UpdateTimer(UpdateTimerMsg {
                        lobby_id: self.info.lobby_id,
                        time_left,
                        is_penalty,
                    }));
                }
                TimerEvent::Expired => {
                    self.terminate(EndReason::Timeout);
                }
            }
        }
    }

    /// Encode and hand a frame to the lobby connection. Offline sessions
    /// skip this silently; a closed connection is the lobby's problem, not
    /// a session error.
    fn send(&mut self, msg: ClientMessage) {
        let Some(outbound) = self.outbound.as_ref() else {
            return;
        };
        match encode_client_message(&msg) {
            Ok(frame) => {
                let _ = outbound.send(Bytes::from(frame));
            }
            Err(e) => {
                tracing::error!(error = %e, "Failed to encode lobby frame");
            }
        }
    }
}
