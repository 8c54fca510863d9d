use serde::{Deserialize, Serialize};

/// Data-driven session tuning, loadable from TOML.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Countdown start value in seconds.
    pub session_duration_secs: f64,
    /// Interaction tick rate (Hz).
    pub tick_rate_hz: f32,
    /// Spike penalty in seconds.
    pub spike_penalty_secs: f64,
    /// Spike penalty in seconds while instant-death mode is active.
    pub spike_penalty_instant_secs: f64,
    /// When set, any hazard penalty consumes all remaining time.
    pub instant_death: bool,
    /// Vertical launch velocity applied by jump pads (+y is down, so
    /// launches are negative).
    pub jump_pad_impulse: f32,
    /// Delay before a jump pad can trigger again (seconds).
    pub jump_pad_cooldown_secs: f32,
    /// Invulnerability window after a spike hit (seconds).
    pub spike_grace_secs: f32,
    /// Delay before a triggered portal accepts contacts again (seconds).
    pub portal_reenable_secs: f32,
    /// The countdown broadcasts its value whenever it is a whole multiple of
    /// this many seconds.
    pub sync_period_secs: f64,
    /// Inbound corrections within this many seconds of the local value are
    /// ignored.
    pub sync_deadband_secs: f64,
    /// Divisor converting inter-player distance to seconds in the
    /// distance-penalty mode. Tunable; the default produces sub-second
    /// penalties across a whole level.
    pub distance_penalty_scale: f64,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_duration_secs: 180.0,
            tick_rate_hz: 60.0,
            spike_penalty_secs: 15.0,
            spike_penalty_instant_secs: 30.0,
            instant_death: false,
            jump_pad_impulse: -5300.0,
            jump_pad_cooldown_secs: 0.5,
            spike_grace_secs: 1.5,
            portal_reenable_secs: 1.5,
            sync_period_secs: 5.0,
            sync_deadband_secs: 2.0,
            distance_penalty_scale: 100_000.0,
        }
    }
}

impl SessionConfig {
    /// Load config from a TOML file. Falls back to defaults if the file is
    /// missing or unparseable.
    pub fn load() -> Self {
        let path = std::env::var("SKYDASH_SESSION_CONFIG")
            .unwrap_or_else(|_| "config/session.toml".to_string());
        match std::fs::read_to_string(&path) {
            Ok(content) => match toml::from_str::<SessionConfig>(&content) {
                Ok(cfg) => cfg,
                Err(e) => {
                    tracing::warn!("Failed to parse {path}: {e}, using defaults");
                    SessionConfig::default()
                },
            },
            Err(_) => SessionConfig::default(),
        }
    }
}
