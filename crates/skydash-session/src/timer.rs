use skydash_core::config::SessionConfig;

/// Lifecycle phase of the countdown.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TimerPhase {
    /// Constructed or torn down; ticks and penalties are ignored.
    #[default]
    Idle,
    Running,
    /// Reached zero. Terminal until an explicit restart.
    Expired,
}

/// Side effect requested by a timer operation. The session routes each one
/// to the matching collaborator.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TimerEvent {
    /// Push a value to the display surface.
    Display(f64),
    /// Ask the lobby for its current countdown value.
    RequestSync,
    /// Announce a restart at this value to the lobby.
    AnnounceReset(f64),
    /// Share the current value with the lobby.
    Broadcast { time_left: f64, is_penalty: bool },
    /// The countdown reached zero.
    Expired,
}

/// Locally-ticked countdown reconciled against peer values.
///
/// Every mutation returns the side effects it wants performed instead of
/// performing them, so the countdown logic stays synchronous and testable.
#[derive(Debug)]
pub struct CountdownTimer {
    time_left: f64,
    start_secs: f64,
    phase: TimerPhase,
    /// Re-entrancy guard: set while a value is being shared or adopted so a
    /// correction cannot trigger another broadcast cycle.
    syncing: bool,
    /// Whether this timer has asked to hear peer corrections. Survives
    /// restarts, cleared by teardown.
    sync_subscribed: bool,
    instant_death: bool,
    sync_period_secs: f64,
    deadband_secs: f64,
    distance_scale: f64,
}

impl CountdownTimer {
    pub fn new(config: &SessionConfig) -> Self {
        Self {
            time_left: config.session_duration_secs,
            start_secs: config.session_duration_secs,
            phase: TimerPhase::Idle,
            syncing: false,
            sync_subscribed: false,
            instant_death: config.instant_death,
            sync_period_secs: config.sync_period_secs,
            deadband_secs: config.sync_deadband_secs,
            distance_scale: config.distance_penalty_scale,
        }
    }

    pub fn time_left(&self) -> f64 {
        self.time_left
    }

    pub fn phase(&self) -> TimerPhase {
        self.phase
    }

    pub fn is_running(&self) -> bool {
        self.phase == TimerPhase::Running
    }

    pub fn instant_death(&self) -> bool {
        self.instant_death
    }

    /// (Re)start the countdown at the full duration. Valid from any phase;
    /// a running countdown resets rather than stacking.
    ///
    /// The first start after construction or teardown also asks the lobby
    /// for its value, so a late joiner converges instead of counting from
    /// the full duration while everyone else is lower.
    pub fn start(&mut self) -> Vec<TimerEvent> {
        self.time_left = self.start_secs;
        self.syncing = false;
        self.phase = TimerPhase::Running;

        let mut events = Vec::new();
        if !self.sync_subscribed {
            self.sync_subscribed = true;
            events.push(TimerEvent::RequestSync);
        }
        events.push(TimerEvent::Display(self.time_left));
        events.push(TimerEvent::AnnounceReset(self.time_left));
        events
    }

    /// Advance the countdown by one whole second.
    ///
    /// Shares the value with the lobby whenever it lands on a multiple of
    /// the sync period. Fractional values (left over from a distance
    /// penalty) never land on a multiple, which quietly suppresses the
    /// periodic share until the next correction rounds things out.
    pub fn tick_second(&mut self) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        self.time_left = (self.time_left - 1.0).max(0.0);
        let mut events = vec![TimerEvent::Display(self.time_left)];

        if !self.syncing && self.time_left % self.sync_period_secs == 0.0 {
            self.syncing = true;
            events.push(TimerEvent::Broadcast {
                time_left: self.time_left,
                is_penalty: false,
            });
            self.syncing = false;
        }

        if self.time_left <= 0.0 {
            self.phase = TimerPhase::Expired;
            events.push(TimerEvent::Expired);
        }
        events
    }

    /// Deduct a hazard penalty. In instant-death mode the penalty consumes
    /// all remaining time regardless of `seconds`.
    ///
    /// A penalty landing on zero does not expire the countdown by itself;
    /// the next tick observes zero and expires then.
    pub fn apply_penalty(&mut self, seconds: f64) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        let penalty = if self.instant_death {
            self.time_left
        } else {
            seconds
        };
        self.time_left = (self.time_left - penalty).max(0.0);
        tracing::debug!(penalty, time_left = self.time_left, "Applied time penalty");

        vec![
            TimerEvent::Display(self.time_left),
            TimerEvent::Broadcast {
                time_left: self.time_left,
                is_penalty: true,
            },
        ]
    }

    /// Deduct a distance-scaled penalty. The display gets a rounded value;
    /// the internal countdown keeps the fractional one.
    pub fn apply_distance_penalty(&mut self, distance: f64) -> Vec<TimerEvent> {
        if self.phase != TimerPhase::Running {
            return Vec::new();
        }

        let penalty = distance / self.distance_scale;
        self.time_left = (self.time_left - penalty).max(0.0);

        vec![
            TimerEvent::Display(self.time_left.round()),
            TimerEvent::Broadcast {
                time_left: self.time_left,
                is_penalty: true,
            },
        ]
    }

    /// Consider a peer's countdown value. Adopted only when it differs from
    /// the local value by more than the deadband; small drift is tolerated
    /// so two healthy timers do not fight over sub-second skew.
    pub fn receive_sync(&mut self, peer_time_left: f64) -> Vec<TimerEvent> {
        if !self.sync_subscribed || self.syncing {
            return Vec::new();
        }

        self.syncing = true;
        let mut events = Vec::new();
        if (self.time_left - peer_time_left).abs() > self.deadband_secs {
            tracing::debug!(
                local = self.time_left,
                peer = peer_time_left,
                "Adopting peer countdown value"
            );
            self.time_left = peer_time_left;
            events.push(TimerEvent::Display(self.time_left));
        }
        self.syncing = false;
        events
    }

    /// Detach the countdown: stop ticking and drop the sync subscription.
    /// Safe from any phase, idempotent.
    pub fn teardown(&mut self) {
        self.phase = TimerPhase::Idle;
        self.sync_subscribed = false;
        self.syncing = false;
    }
}
