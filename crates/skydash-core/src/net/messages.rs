use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Network message type discriminator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[repr(u8)]
pub enum MessageType {
    // Session -> Lobby
    ResetTimer = 0x01,
    RequestTimerSync = 0x02,
    UpdateTimer = 0x03,
    PlayerGameOver = 0x04,

    // Lobby -> Session
    TimerSync = 0x10,
}

impl MessageType {
    pub fn from_byte(b: u8) -> Option<Self> {
        match b {
            0x01 => Some(Self::ResetTimer),
            0x02 => Some(Self::RequestTimerSync),
            0x03 => Some(Self::UpdateTimer),
            0x04 => Some(Self::PlayerGameOver),
            0x10 => Some(Self::TimerSync),
            _ => None,
        }
    }
}

/// Reason a session ended.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EndReason {
    Timeout,
    Hazard,
    Manual,
}

impl EndReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Timeout => "timeout",
            Self::Hazard => "hazard",
            Self::Manual => "manual",
        }
    }
}

/// Announce a countdown restart to the whole lobby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResetTimerMsg {
    pub lobby_id: Uuid,
    pub time_left: f64,
}

/// Ask the lobby for its current countdown value (sent once on subscribe).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RequestTimerSyncMsg {
    pub lobby_id: Uuid,
}

/// Periodic countdown broadcast, or an immediate one when flagged as a
/// penalty.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UpdateTimerMsg {
    pub lobby_id: Uuid,
    pub time_left: f64,
    pub is_penalty: bool,
}

/// Notify the lobby that this session has ended.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PlayerGameOverMsg {
    pub lobby_id: Uuid,
    pub reason: EndReason,
}

/// Countdown correction from the lobby.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimerSyncMsg {
    pub time_left: f64,
}

/// Messages a session sends to its lobby.
#[derive(Debug, Clone, PartialEq)]
pub enum ClientMessage {
    ResetTimer(ResetTimerMsg),
    RequestTimerSync(RequestTimerSyncMsg),
    UpdateTimer(UpdateTimerMsg),
    PlayerGameOver(PlayerGameOverMsg),
}

impl ClientMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::ResetTimer(_) => MessageType::ResetTimer,
            Self::RequestTimerSync(_) => MessageType::RequestTimerSync,
            Self::UpdateTimer(_) => MessageType::UpdateTimer,
            Self::PlayerGameOver(_) => MessageType::PlayerGameOver,
        }
    }
}

/// Messages the lobby sends back to a session.
#[derive(Debug, Clone, PartialEq)]
pub enum ServerMessage {
    TimerSync(TimerSyncMsg),
}

impl ServerMessage {
    pub fn message_type(&self) -> MessageType {
        match self {
            Self::TimerSync(_) => MessageType::TimerSync,
        }
    }
}
