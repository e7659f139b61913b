/// Events emitted during a frame step.
/// The presentation layer consumes these for logging and the HUD.

use crate::domain::entity::PlatformKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum GameEvent {
    Jumped,
    /// Touched down on a platform after being airborne.
    Landed { kind: PlatformKind },
    HitCeiling { kind: PlatformKind },
    /// Touched down on the bottom of the screen instead of a platform.
    FloorClamped,
    /// Camera moved this many whole pixels (negative is leftward).
    Scrolled { pixels: i32 },
}
