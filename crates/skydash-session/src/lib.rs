pub mod classify;
pub mod entities;
pub mod hazards;
pub mod motion;
pub mod rider;
pub mod runtime;
pub mod scheduler;
pub mod session;
pub mod timer;

pub use runtime::{spawn_session, SessionCommand};
pub use session::{ContactEvent, LevelSession, SessionEvent, TouchFlags, PLAYER_BODY_ID};
