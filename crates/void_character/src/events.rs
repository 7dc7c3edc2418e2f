//! Events raised by the movement controller

use crate::state::BodyState;

/// Events emitted by a [`MovementController`](crate::mover::MovementController),
/// collected until drained by the owner
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum MoverEvent {
    /// The body state classification changed
    BodyStateChanged { old: BodyState, new: BodyState },
    /// Fast-turn mode flipped
    FastTurnToggled { enabled: bool },
    /// The climb sensor started or stopped touching a climbable surface
    ClimbableChanged { can_climb: bool },
}
