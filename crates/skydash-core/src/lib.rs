pub mod collab;
pub mod config;
pub mod level;
pub mod net;
pub mod player;

#[cfg(any(test, feature = "test-helpers"))]
pub mod test_helpers {
    use std::sync::{Arc, Mutex};

    use uuid::Uuid;

    use crate::collab::{AmbientAudio, SessionInfo, TimerDisplay};
    use crate::level::{
        JumpPadDef, LevelDef, MotionAxis, MotionDef, PlatformDef, PortalDef, SpikeDef,
    };

    /// Create a SessionInfo with a fresh lobby id.
    pub fn make_session_info() -> SessionInfo {
        SessionInfo::new(Uuid::new_v4(), "demo", "Player1")
    }

    /// Countdown display fake that records every pushed value. Clone it
    /// before handing it to a session; clones share the recording.
    #[derive(Clone, Default)]
    pub struct RecordingDisplay {
        values: Arc<Mutex<Vec<f64>>>,
    }

    impl RecordingDisplay {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn last(&self) -> Option<f64> {
            self.values.lock().unwrap().last().copied()
        }

        pub fn all(&self) -> Vec<f64> {
            self.values.lock().unwrap().clone()
        }
    }

    impl TimerDisplay for RecordingDisplay {
        fn update_timer(&mut self, time_left: f64) {
            self.values.lock().unwrap().push(time_left);
        }
    }

    /// Audio fake counting fade-out requests.
    #[derive(Clone, Default)]
    pub struct RecordingAudio {
        fade_outs: Arc<Mutex<u32>>,
    }

    impl RecordingAudio {
        pub fn new() -> Self {
            Self::default()
        }

        pub fn fade_outs(&self) -> u32 {
            *self.fade_outs.lock().unwrap()
        }
    }

    impl AmbientAudio for RecordingAudio {
        fn fade_out(&mut self) {
            *self.fade_outs.lock().unwrap() += 1;
        }
    }

    /// A trimmed version of the first campaign level: a long scrolling world
    /// with static platforms, one mover per axis, pads, a spike row, and a
    /// portal.
    pub fn demo_level() -> LevelDef {
        LevelDef {
            name: "Demo".to_string(),
            width: 5040.0,
            height: 720.0,
            spawn_x: 90.0,
            spawn_y: 700.0,
            platforms: vec![
                PlatformDef {
                    x: 85.0,
                    y: 500.0,
                    width: 128.0,
                    height: 45.0,
                    motion: None,
                },
                PlatformDef {
                    x: 336.0,
                    y: 570.0,
                    width: 96.0,
                    height: 45.0,
                    motion: None,
                },
                PlatformDef {
                    x: 1211.0,
                    y: 493.0,
                    width: 128.0,
                    height: 45.0,
                    motion: None,
                },
                PlatformDef {
                    x: 1921.0,
                    y: 345.0,
                    width: 96.0,
                    height: 45.0,
                    // Descends first, then yoyos back up.
                    motion: Some(MotionDef {
                        axis: MotionAxis::Vertical,
                        range: 100.0,
                        period_secs: 2.0,
                    }),
                },
                PlatformDef {
                    x: 2433.0,
                    y: 500.0,
                    width: 384.0,
                    height: 45.0,
                    motion: None,
                },
                PlatformDef {
                    x: 3750.0,
                    y: 300.0,
                    width: 96.0,
                    height: 45.0,
                    // Sweeps left first.
                    motion: Some(MotionDef {
                        axis: MotionAxis::Horizontal,
                        range: -100.0,
                        period_secs: 1.6,
                    }),
                },
                PlatformDef {
                    x: 4250.0,
                    y: 530.0,
                    width: 128.0,
                    height: 45.0,
                    motion: None,
                },
            ],
            jump_pads: vec![
                JumpPadDef {
                    x: 380.0,
                    y: 555.0,
                    width: 32.0,
                    height: 16.0,
                },
                JumpPadDef {
                    x: 1250.0,
                    y: 480.0,
                    width: 32.0,
                    height: 16.0,
                },
            ],
            spikes: vec![
                SpikeDef {
                    x: 2368.0,
                    y: 480.0,
                    width: 32.0,
                    height: 32.0,
                },
                SpikeDef {
                    x: 2400.0,
                    y: 480.0,
                    width: 32.0,
                    height: 32.0,
                },
                SpikeDef {
                    x: 2432.0,
                    y: 480.0,
                    width: 32.0,
                    height: 32.0,
                },
            ],
            portals: vec![PortalDef {
                x: 3100.0,
                y: 400.0,
                width: 64.0,
                height: 64.0,
            }],
        }
    }
}
