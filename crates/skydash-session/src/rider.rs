use skydash_core::player::PlayerBody;

use crate::classify::classify;
use crate::entities::Platform;

/// Vertical gap within which a geometric contact counts as a landing.
pub const LANDING_GAP: f32 = 12.0;
/// Velocity difference below which the stored input speed is left alone,
/// filtering engine separation jitter.
pub const INPUT_NOISE_THRESHOLD: f32 = 10.0;
/// Per-tick displacement smaller than this is float noise, not input.
pub const INPUT_DISPLACEMENT_FLOOR: f32 = 0.1;
/// Smoothing factor pulling the player toward its platform-relative target.
pub const RIDE_LERP: f32 = 0.5;
/// Upward-moving platforms only carry players this close to their top.
pub const UPWARD_CARRY_GAP: f32 = 5.0;

/// Engine-reported touching flags for the two sides of a platform contact.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct TouchPair {
    /// The player body's touching-down flag.
    pub player_down: bool,
    /// The platform body's touching-up flag.
    pub platform_up: bool,
}

/// Carry the player with a platform it is standing on.
///
/// Riding is decided per tick from the engine's touching flags, with a
/// geometric fallback for the frame where the engine has not registered
/// the landing yet. Horizontal carry works through a platform-relative
/// offset rather than velocity alone: player input shifts the offset, and
/// the position is smoothed toward `platform.x + offset` every tick, so
/// input and platform motion compose instead of fighting.
pub fn ride_platform(player: &mut PlayerBody, platform: &Platform, touching: TouchPair) {
    let bounds = platform.bounds();
    let contact = classify(&player.bounds(), player.vy, &bounds);
    let mut touching = touching;

    let on_platform = (touching.player_down && touching.platform_up)
        || (contact.is_above
            && contact.horizontally_aligned
            && contact.vertical_gap < LANDING_GAP
            && contact.is_falling);

    // Landing-scoped state does not survive losing contact or jumping away.
    if (!on_platform && !touching.player_down) || player.vy < 0.0 {
        player.clear_ride_state();
    }

    if !on_platform {
        player.on_moving_platform = false;
        return;
    }

    // The engine has not separated the bodies yet on the landing frame;
    // snap onto the top edge so the carry math below starts from rest.
    if contact.is_above && contact.vertical_gap < LANDING_GAP && !touching.player_down {
        player.y = bounds.top() - player.height / 2.0;
        player.vy = 0.0;
        player.grounded = true;
        touching.player_down = true;
    }

    if platform.vx != 0.0 {
        if player.input_velocity_x.is_none() {
            player.input_velocity_x = Some(0.0);
        }
        let velocity_difference = player.vx - platform.vx;
        if velocity_difference.abs() > INPUT_NOISE_THRESHOLD {
            player.input_velocity_x = Some(velocity_difference);
        }
        player.vx = platform.vx + player.input_velocity_x.unwrap_or(0.0);

        if player.platform_relative_offset.is_none() {
            player.platform_relative_offset = Some(player.x - platform.x);
        }
        let input_movement = player.x - player.previous_x.unwrap_or(player.x);
        if input_movement.abs() > INPUT_DISPLACEMENT_FLOOR
            && let Some(offset) = player.platform_relative_offset.as_mut()
        {
            *offset += input_movement;
        }
        let target_x = platform.x + player.platform_relative_offset.unwrap_or(0.0);
        player.x = lerp(player.x, target_x, RIDE_LERP);
        player.previous_x = Some(player.x);
    }

    if platform.vy != 0.0 {
        if platform.vy > 0.0 {
            // Descending platforms drag the player down with them so the
            // engine does not leave it hovering.
            player.vy = platform.vy;
        } else {
            // Recomputed after any snap: only players seated on the top
            // edge ride an ascending platform.
            let distance_to_top = (player.bottom() - bounds.top()).abs();
            if distance_to_top < UPWARD_CARRY_GAP {
                player.vy = platform.vy;
            }
        }
    }

    player.on_moving_platform = true;
}

fn lerp(from: f32, to: f32, t: f32) -> f32 {
    from + (to - from) * t
}

#[cfg(test)]
mod tests {
    use super::*;

    fn platform(x: f32, y: f32, vx: f32, vy: f32) -> Platform {
        Platform {
            id: 7,
            x,
            y,
            width: 128.0,
            height: 20.0,
            vx,
            vy,
            immovable: true,
            motion: None,
        }
    }

    const SEATED: TouchPair = TouchPair {
        player_down: true,
        platform_up: true,
    };

    /// Place the player seated on the platform's top edge.
    fn seat_player(platform: &Platform) -> PlayerBody {
        let mut player = PlayerBody::new(platform.x, 0.0);
        player.y = platform.bounds().top() - player.height / 2.0;
        player.grounded = true;
        player
    }

    #[test]
    fn standing_player_converges_to_platform_velocity() {
        let dt = 1.0 / 60.0;
        let mut platform = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = seat_player(&platform);

        let mut displacement = 0.0;
        for _ in 0..40 {
            // Engine integration, then the scripted platform, then the rider.
            let before = player.x;
            player.x += player.vx * dt;
            platform.x += platform.vx * dt;
            ride_platform(&mut player, &platform, SEATED);
            displacement = player.x - before;
        }

        let platform_step = platform.vx * dt;
        assert!(
            (displacement - platform_step).abs() < platform_step * 0.01,
            "per-tick displacement {displacement} should match platform step {platform_step}"
        );
        assert!(player.on_moving_platform);
        // Offset was captured at landing and must not drift.
        let offset = player.platform_relative_offset.unwrap();
        assert!(offset.abs() < 5.0, "offset drifted to {offset}");
    }

    #[test]
    fn input_displacement_shifts_the_offset() {
        let carrier = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = seat_player(&carrier);
        player.vx = carrier.vx;
        player.input_velocity_x = Some(0.0);
        player.platform_relative_offset = Some(5.0);
        player.previous_x = Some(player.x);

        player.x += 3.0;
        ride_platform(&mut player, &carrier, SEATED);

        assert_eq!(player.platform_relative_offset, Some(8.0));
    }

    #[test]
    fn sub_floor_displacement_is_ignored() {
        let carrier = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = seat_player(&carrier);
        player.vx = carrier.vx;
        player.input_velocity_x = Some(0.0);
        player.platform_relative_offset = Some(5.0);
        player.previous_x = Some(player.x);

        player.x += 0.05;
        ride_platform(&mut player, &carrier, SEATED);

        assert_eq!(player.platform_relative_offset, Some(5.0));
    }

    #[test]
    fn landing_frame_snaps_onto_the_top_edge() {
        let carrier = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = PlayerBody::new(1000.0, 0.0);
        // Bottom 6 above the top edge, falling, engine flags not set yet.
        player.y = carrier.bounds().top() - 6.0 - player.height / 2.0;
        player.vy = 240.0;

        ride_platform(&mut player, &carrier, TouchPair::default());

        assert_eq!(player.bottom(), carrier.bounds().top());
        assert_eq!(player.vy, 0.0);
        assert!(player.grounded);
        assert!(player.on_moving_platform);
    }

    #[test]
    fn side_contact_is_not_a_ride() {
        let carrier = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = PlayerBody::new(carrier.bounds().left() - 10.0, carrier.y);
        player.vy = 50.0;
        player.platform_relative_offset = Some(4.0);

        ride_platform(&mut player, &carrier, TouchPair::default());

        assert!(!player.on_moving_platform);
        assert_eq!(player.platform_relative_offset, None);
        // Pose untouched.
        assert_eq!(player.y, carrier.y);
    }

    #[test]
    fn jumping_away_clears_ride_state() {
        let carrier = platform(1000.0, 300.0, 120.0, 0.0);
        let mut player = PlayerBody::new(1000.0, 100.0);
        player.vy = -300.0;
        player.platform_relative_offset = Some(4.0);
        player.previous_x = Some(999.0);
        player.input_velocity_x = Some(20.0);

        ride_platform(&mut player, &carrier, TouchPair::default());

        assert_eq!(player.platform_relative_offset, None);
        assert_eq!(player.previous_x, None);
        assert_eq!(player.input_velocity_x, None);
        assert!(!player.on_moving_platform);
    }

    #[test]
    fn descending_platform_drags_the_player() {
        let carrier = platform(1000.0, 300.0, 0.0, 80.0);
        let mut player = seat_player(&carrier);

        ride_platform(&mut player, &carrier, SEATED);

        assert_eq!(player.vy, 80.0);
    }

    #[test]
    fn ascending_platform_carries_only_seated_players() {
        let carrier = platform(1000.0, 300.0, 0.0, -80.0);

        // Seated on the top edge: carried.
        let mut player = seat_player(&carrier);
        ride_platform(&mut player, &carrier, SEATED);
        assert_eq!(player.vy, -80.0);

        // Touching but 8 above the top edge: left behind.
        let mut player = seat_player(&carrier);
        player.y -= 8.0;
        player.vy = 0.0;
        ride_platform(&mut player, &carrier, SEATED);
        assert_eq!(player.vy, 0.0);
    }

    #[test]
    fn snap_precedes_upward_carry() {
        let carrier = platform(1000.0, 300.0, 0.0, -80.0);
        let mut player = PlayerBody::new(1000.0, 0.0);
        // Landing 8 above the top edge: outside the carry gap until the
        // snap seats the player.
        player.y = carrier.bounds().top() - 8.0 - player.height / 2.0;
        player.vy = 240.0;

        ride_platform(&mut player, &carrier, TouchPair::default());

        assert_eq!(player.bottom(), carrier.bounds().top());
        assert_eq!(player.vy, -80.0);
    }

    #[test]
    fn stationary_axis_contributes_nothing() {
        let carrier = platform(1000.0, 300.0, 0.0, 0.0);
        let mut player = seat_player(&carrier);
        player.vx = 55.0;

        ride_platform(&mut player, &carrier, SEATED);

        // No horizontal carry, no vertical drag, but still riding.
        assert_eq!(player.vx, 55.0);
        assert_eq!(player.vy, 0.0);
        assert!(player.on_moving_platform);
        assert_eq!(player.platform_relative_offset, None);
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        proptest! {
            #[test]
            fn rider_state_stays_finite(
                vx in -500.0_f32..500.0,
                vy in -500.0_f32..500.0,
                nudge in -20.0_f32..20.0,
            ) {
                let mut carrier = platform(1000.0, 300.0, vx, vy);
                let mut player = seat_player(&carrier);
                player.x += nudge;

                let dt = 1.0 / 60.0;
                for _ in 0..120 {
                    player.x += player.vx * dt;
                    player.y += player.vy * dt;
                    carrier.x += carrier.vx * dt;
                    carrier.y += carrier.vy * dt;
                    ride_platform(&mut player, &carrier, SEATED);
                }

                prop_assert!(player.x.is_finite());
                prop_assert!(player.y.is_finite());
                prop_assert!(player.vx.is_finite());
                prop_assert!(player.vy.is_finite());
                if let Some(offset) = player.platform_relative_offset {
                    prop_assert!(offset.is_finite());
                }
            }
        }
    }
}
