use skydash_core::level::Aabb;

/// Tolerance above an object's top edge within which a player still counts
/// as arriving from above rather than from the side.
pub const ABOVE_EPSILON: f32 = 10.0;
/// Horizontal margin shrinking an object's effective width so a corner clip
/// does not count as standing on it.
pub const EDGE_MARGIN: f32 = 5.0;

/// Geometric relationship between the player and one interactive object,
/// derived fresh from current poses and velocity on every contact event.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Contact {
    pub is_above: bool,
    pub is_falling: bool,
    pub horizontally_aligned: bool,
    /// Distance between the player's bottom edge and the object's top edge.
    pub vertical_gap: f32,
}

/// Classify a player/object pairing. Pure; mutates neither body.
///
/// +y is down, so a positive vertical velocity means falling.
pub fn classify(player: &Aabb, player_vy: f32, object: &Aabb) -> Contact {
    Contact {
        is_above: player.bottom() <= object.top() + ABOVE_EPSILON,
        is_falling: player_vy > 0.0,
        horizontally_aligned: player.right() > object.left() + EDGE_MARGIN
            && player.left() < object.right() - EDGE_MARGIN,
        vertical_gap: (player.bottom() - object.top()).abs(),
    }
}
