use skydash_core::collab::ModeToggle;
use skydash_core::config::SessionConfig;
use skydash_core::player::PlayerBody;

use crate::classify::classify;
use crate::entities::{BodyId, JumpPad, Portal};
use crate::scheduler::{DeferredAction, Scheduler};

/// Launch the player off a jump pad if it arrives from above and the pad is
/// off cooldown. Returns whether the launch fired.
pub fn trigger_jump_pad(
    player: &mut PlayerBody,
    pad: &mut JumpPad,
    scheduler: &mut Scheduler,
    config: &SessionConfig,
) -> bool {
    let contact = classify(&player.bounds(), player.vy, &pad.bounds());
    if !contact.is_above {
        tracing::debug!(
            pad = pad.id,
            is_falling = contact.is_falling,
            "Jump pad contact from the side, ignoring"
        );
        return false;
    }
    if pad.cooldown {
        tracing::debug!(pad = pad.id, "Jump pad still on cooldown");
        return false;
    }

    player.vy = config.jump_pad_impulse;
    pad.cooldown = true;
    scheduler.schedule(
        pad.id,
        DeferredAction::ClearJumpPadCooldown,
        config.jump_pad_cooldown_secs,
    );
    true
}

/// Handle a spike overlap. Returns the penalty in seconds to charge, or
/// `None` while the player is inside its grace window.
///
/// Charging the timer is the caller's job; this only decides the amount
/// and arms the grace window keyed to the player body.
pub fn spike_hit(
    player: &mut PlayerBody,
    player_id: BodyId,
    spike_id: BodyId,
    scheduler: &mut Scheduler,
    config: &SessionConfig,
    instant_death: bool,
) -> Option<f64> {
    if player.invulnerable {
        return None;
    }

    let penalty = if instant_death {
        config.spike_penalty_instant_secs
    } else {
        config.spike_penalty_secs
    };
    player.invulnerable = true;
    scheduler.schedule(
        player_id,
        DeferredAction::ClearInvulnerability,
        config.spike_grace_secs,
    );
    tracing::debug!(spike = spike_id, penalty, "Player hit a spike");
    Some(penalty)
}

/// Handle a portal overlap: toggle the body's movement mode and debounce
/// the portal. Bodies without the mode-toggle capability pass through.
/// Returns whether a toggle happened.
pub fn portal_contact(
    portal: &mut Portal,
    toggle: Option<&mut dyn ModeToggle>,
    scheduler: &mut Scheduler,
    config: &SessionConfig,
) -> bool {
    if !portal.enabled {
        return false;
    }
    let Some(toggle) = toggle else {
        tracing::warn!(
            portal = portal.id,
            "Portal contact without a mode-toggle capability, ignoring"
        );
        return false;
    };

    let mode = toggle.toggle_mode();
    tracing::debug!(portal = portal.id, ?mode, "Portal toggled movement mode");
    portal.enabled = false;
    scheduler.schedule(
        portal.id,
        DeferredAction::ReenablePortal,
        config.portal_reenable_secs,
    );
    true
}

#[cfg(test)]
mod tests {
    use super::*;
    use skydash_core::player::MovementMode;

    fn pad() -> JumpPad {
        JumpPad {
            id: 4,
            x: 500.0,
            y: 500.0,
            width: 64.0,
            height: 16.0,
            cooldown: false,
        }
    }

    fn portal() -> Portal {
        Portal {
            id: 9,
            x: 500.0,
            y: 400.0,
            width: 64.0,
            height: 64.0,
            enabled: true,
        }
    }

    /// Player whose bottom edge sits on the pad's top edge.
    fn player_above_pad(pad: &JumpPad) -> PlayerBody {
        let mut player = PlayerBody::new(pad.x, 0.0);
        player.y = pad.bounds().top() - player.height / 2.0;
        player.vy = 300.0;
        player
    }

    #[test]
    fn pad_launches_from_above() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut pad = pad();
        let mut player = player_above_pad(&pad);

        assert!(trigger_jump_pad(
            &mut player,
            &mut pad,
            &mut scheduler,
            &config
        ));
        assert_eq!(player.vy, config.jump_pad_impulse);
        assert!(pad.cooldown);
        assert!(scheduler.is_pending(pad.id, DeferredAction::ClearJumpPadCooldown));
    }

    #[test]
    fn pad_ignores_side_contact() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut pad = pad();
        let mut player = PlayerBody::new(pad.x - 60.0, pad.y);
        player.vy = 300.0;

        assert!(!trigger_jump_pad(
            &mut player,
            &mut pad,
            &mut scheduler,
            &config
        ));
        assert_eq!(player.vy, 300.0);
        assert!(!pad.cooldown);
    }

    #[test]
    fn pad_launches_rising_player_too() {
        // Arriving from above is the only gate; a rising player clipping
        // the pad's top gets launched again.
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut pad = pad();
        let mut player = player_above_pad(&pad);
        player.vy = -100.0;

        assert!(trigger_jump_pad(
            &mut player,
            &mut pad,
            &mut scheduler,
            &config
        ));
        assert_eq!(player.vy, config.jump_pad_impulse);
    }

    #[test]
    fn pad_on_cooldown_does_not_launch() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut pad = pad();
        let mut player = player_above_pad(&pad);

        assert!(trigger_jump_pad(
            &mut player,
            &mut pad,
            &mut scheduler,
            &config
        ));
        player.vy = 300.0;
        assert!(!trigger_jump_pad(
            &mut player,
            &mut pad,
            &mut scheduler,
            &config
        ));
        assert_eq!(player.vy, 300.0);
    }

    #[test]
    fn spike_charges_and_arms_grace_window() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut player = PlayerBody::new(0.0, 0.0);

        let penalty = spike_hit(&mut player, 0, 6, &mut scheduler, &config, false);
        assert_eq!(penalty, Some(15.0));
        assert!(player.invulnerable);
        assert!(scheduler.is_pending(0, DeferredAction::ClearInvulnerability));

        // Second overlap inside the grace window is free.
        let penalty = spike_hit(&mut player, 0, 6, &mut scheduler, &config, false);
        assert_eq!(penalty, None);
    }

    #[test]
    fn spike_penalty_is_heavier_in_instant_death() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut player = PlayerBody::new(0.0, 0.0);

        let penalty = spike_hit(&mut player, 0, 6, &mut scheduler, &config, true);
        assert_eq!(penalty, Some(30.0));
    }

    #[test]
    fn portal_toggles_and_debounces() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut portal = portal();
        let mut player = PlayerBody::new(portal.x, portal.y);

        assert!(portal_contact(
            &mut portal,
            Some(&mut player),
            &mut scheduler,
            &config
        ));
        assert_eq!(player.mode, MovementMode::Flight);
        assert!(!portal.enabled);
        assert!(scheduler.is_pending(portal.id, DeferredAction::ReenablePortal));

        // Disabled portal ignores further contacts.
        assert!(!portal_contact(
            &mut portal,
            Some(&mut player),
            &mut scheduler,
            &config
        ));
        assert_eq!(player.mode, MovementMode::Flight);
    }

    #[test]
    fn portal_without_capability_is_a_no_op() {
        let config = SessionConfig::default();
        let mut scheduler = Scheduler::new();
        let mut portal = portal();

        assert!(!portal_contact(&mut portal, None, &mut scheduler, &config));
        assert!(portal.enabled);
        assert_eq!(scheduler.pending(), 0);
    }
}
