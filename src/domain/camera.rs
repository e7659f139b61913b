/// Deadzone camera: horizontal scroll policy.
///
/// World and screen coordinates are separate:
///   - physics runs in world pixels and never sees the camera
///   - `screen_x = world_x - offset`, y is shared
///
/// The actor moves freely between the two boundaries. Pushing past a
/// boundary in the direction of travel scrolls the world by `vx * dt`,
/// truncated to whole pixels, and the actor's screen position is clamped
/// back into the band every frame.

use crate::config::ScreenConfig;
use super::entity::Actor;
use super::geom::Rect;

#[derive(Clone, Debug, PartialEq)]
pub struct Camera {
    left_boundary: f32,
    right_boundary: f32,
    /// Accumulated scroll in whole pixels; world x of the screen's left edge.
    offset: i32,
}

impl Camera {
    pub fn new(screen: &ScreenConfig) -> Self {
        Camera {
            left_boundary: screen.left_boundary(),
            right_boundary: screen.right_boundary(),
            offset: 0,
        }
    }

    pub fn offset(&self) -> i32 {
        self.offset
    }

    pub fn boundaries(&self) -> (f32, f32) {
        (self.left_boundary, self.right_boundary)
    }

    pub fn reset(&mut self) {
        self.offset = 0;
    }

    /// Actor bounds in screen space.
    pub fn actor_on_screen(&self, actor: &Actor) -> Rect {
        self.to_screen(actor.bounds())
    }

    pub fn to_screen(&self, world: Rect) -> Rect {
        world.translated(-(self.offset as f32), 0.0)
    }

    /// Unrounded scroll requested this frame; zero inside the deadzone.
    pub fn scroll_amount(&self, actor: &Actor, dt: f32) -> f32 {
        let on_screen = self.actor_on_screen(actor);
        if on_screen.right() >= self.right_boundary && actor.vx > 0.0 {
            actor.vx * dt
        } else if on_screen.left() <= self.left_boundary && actor.vx < 0.0 {
            actor.vx * dt
        } else {
            0.0
        }
    }

    /// Scroll for this frame, then clamp the actor's screen position into
    /// the band. Returns the whole pixels scrolled (negative is leftward).
    pub fn update(&mut self, actor: &mut Actor, dt: f32) -> i32 {
        // `as` truncates toward zero, matching the sub-pixel policy.
        let shift = self.scroll_amount(actor, dt) as i32;
        self.offset += shift;
        self.clamp_actor(actor);
        shift
    }

    fn clamp_actor(&self, actor: &mut Actor) {
        let offset = self.offset as f32;
        let screen_left = actor.x - offset;
        if screen_left < self.left_boundary {
            actor.x = self.left_boundary + offset;
        } else if screen_left + actor.width > self.right_boundary {
            actor.x = self.right_boundary - actor.width + offset;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn camera() -> Camera {
        Camera::new(&GameConfig::default().screen)
    }

    #[test]
    fn no_scroll_inside_deadzone() {
        let mut cam = camera();
        let mut a = Actor::new(700.0, 400.0, 40.0, 80.0);
        a.vx = 300.0;
        assert_eq!(cam.scroll_amount(&a, DT), 0.0);
        assert_eq!(cam.update(&mut a, DT), 0);
        assert_eq!(a.x, 700.0);
    }

    #[test]
    fn scrolls_right_at_right_margin() {
        let mut cam = camera();
        let mut a = Actor::new(1360.0, 400.0, 40.0, 80.0); // right edge at 1400
        a.vx = 300.0;
        let expected = (300.0 * DT).floor() as i32;
        assert_eq!(cam.scroll_amount(&a, DT), 300.0 * DT);
        assert_eq!(cam.update(&mut a, DT), expected);
        assert_eq!(cam.offset(), expected);
        // world position untouched; on screen the actor slid back by the shift
        assert_eq!(a.x, 1360.0);
        assert_eq!(cam.actor_on_screen(&a).right(), 1400.0 - expected as f32);
    }

    #[test]
    fn scrolls_left_at_left_margin() {
        let mut cam = camera();
        let mut a = Actor::new(200.0, 400.0, 40.0, 80.0);
        a.vx = -300.0;
        let shift = cam.update(&mut a, 0.25);
        assert_eq!(shift, -75);
        assert_eq!(cam.offset(), -75);
        assert_eq!(a.x, 200.0);
        assert_eq!(cam.actor_on_screen(&a).left(), 275.0);
    }

    #[test]
    fn margin_without_motion_does_not_scroll() {
        let mut cam = camera();
        let mut a = Actor::new(1360.0, 400.0, 40.0, 80.0);
        a.vx = 0.0;
        assert_eq!(cam.update(&mut a, DT), 0);
        // moving away from the margin does not scroll either
        a.vx = -300.0;
        assert_eq!(cam.update(&mut a, DT), 0);
    }

    #[test]
    fn sub_pixel_scroll_truncates_toward_zero() {
        let mut cam = camera();
        let mut a = Actor::new(1360.0, 400.0, 40.0, 80.0);
        a.vx = 30.0;
        assert_eq!(cam.update(&mut a, DT), 0); // 0.5px
        let mut b = Actor::new(200.0, 400.0, 40.0, 80.0);
        b.vx = -30.0;
        assert_eq!(cam.update(&mut b, DT), 0); // -0.5px
    }

    #[test]
    fn drift_past_boundary_is_clamped() {
        let mut cam = camera();
        let mut a = Actor::new(1450.0, 400.0, 40.0, 80.0);
        a.vx = 0.0;
        cam.update(&mut a, DT);
        assert_eq!(a.right(), 1400.0);

        let mut b = Actor::new(10.0, 400.0, 40.0, 80.0);
        cam.update(&mut b, DT);
        assert_eq!(b.x, 200.0);
    }

    #[test]
    fn screen_mapping_uses_offset() {
        let mut cam = camera();
        let mut a = Actor::new(1360.0, 400.0, 40.0, 80.0);
        a.vx = 300.0;
        cam.update(&mut a, 0.25); // 75px
        let tile = Rect::new(120.0, 0.0, 40.0, 40.0);
        assert_eq!(cam.to_screen(tile).x, 45.0);
        assert_eq!(cam.to_screen(tile).y, 0.0);
    }

    proptest! {
        #[test]
        fn actor_stays_in_band(
            x in -5000.0f32..5000.0,
            vx in -2000.0f32..2000.0,
            dt in 0.0f32..0.1,
        ) {
            let mut cam = camera();
            let mut a = Actor::new(x, 400.0, 40.0, 80.0);
            a.vx = vx;
            cam.update(&mut a, dt);
            let s = cam.actor_on_screen(&a);
            prop_assert!(s.left() >= 200.0 - 1e-3);
            prop_assert!(s.right() <= 1400.0 + 1e-3);
        }
    }
}
