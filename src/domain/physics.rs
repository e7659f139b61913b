/// Per-frame physics: integration, fallback floor, platform collision.
///
/// ## Order
///
///   1. `integrate`: gravity into velocity, velocity into position
///   2. `clamp_to_floor`: screen bottom acts as ground, re-evaluates `grounded`
///   3. collision: every platform overlapping the post-integration bounds
///      is resolved in platform order, vertically only
///
/// Horizontal movement is never corrected against platform sides. Later
/// resolutions in the same frame may override earlier ones; since every
/// resolution zeroes `vy`, the first hit usually settles the frame.

use crate::config::{PhysicsConfig, ScreenConfig};
use super::entity::{Actor, Contact, Facing, Platform, PlatformKind};

/// One collision outcome, reported for events and logging.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub struct Hit {
    pub contact: Contact,
    pub kind: PlatformKind,
}

/// Everything that happened to the actor in one physics step.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct StepReport {
    pub floor_clamped: bool,
    pub hits: Vec<Hit>,
}

/// Physics constants, fixed at construction.
#[derive(Clone, Debug, PartialEq)]
pub struct PhysicsStep {
    pub gravity: f32,
    pub jump_impulse: f32,
    pub run_speed: f32,
    pub one_way_tolerance: f32,
    pub one_way_blocks_rising: bool,
    pub floor_y: f32,
}

impl PhysicsStep {
    pub fn new(physics: &PhysicsConfig, screen: &ScreenConfig) -> Self {
        PhysicsStep {
            gravity: physics.gravity,
            jump_impulse: physics.jump_impulse,
            run_speed: physics.run_speed,
            one_way_tolerance: physics.one_way_tolerance,
            one_way_blocks_rising: physics.one_way_blocks_rising,
            floor_y: screen.height as f32,
        }
    }

    /// Horizontal input impulse.
    pub fn steer(&self, actor: &mut Actor, dir: Option<Facing>) {
        actor.apply_horizontal(dir, self.run_speed);
    }

    /// Jump impulse. No-op unless grounded.
    pub fn jump(&self, actor: &mut Actor) -> bool {
        actor.jump(self.jump_impulse)
    }

    /// Advance the actor by `dt` seconds and resolve it against `platforms`.
    pub fn advance(&self, actor: &mut Actor, platforms: &[Platform], dt: f32) -> StepReport {
        let prev_bottom = actor.bottom();
        actor.integrate(dt, self.gravity);
        let floor_clamped = actor.clamp_to_floor(self.floor_y);
        let hits = self.resolve_collisions(actor, platforms, prev_bottom);
        StepReport { floor_clamped, hits }
    }

    /// Resolve every platform overlapping the actor's current bounds.
    /// `prev_bottom` is the actor's bottom edge before integration.
    pub fn resolve_collisions(
        &self,
        actor: &mut Actor,
        platforms: &[Platform],
        prev_bottom: f32,
    ) -> Vec<Hit> {
        let bounds = actor.bounds();
        let overlapping: Vec<&Platform> = platforms.iter()
            .filter(|p| p.bounds.overlaps(&bounds))
            .collect();

        overlapping.into_iter()
            .filter_map(|p| {
                actor.resolve_against(p, prev_bottom, self.one_way_tolerance, self.one_way_blocks_rising)
                    .map(|contact| Hit { contact, kind: p.kind })
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::GameConfig;
    use crate::domain::geom::Rect;
    use proptest::prelude::*;

    const DT: f32 = 1.0 / 60.0;

    fn physics() -> PhysicsStep {
        let c = GameConfig::default();
        PhysicsStep::new(&c.physics, &c.screen)
    }

    fn tile(col: u32, row: u32, kind: PlatformKind) -> Platform {
        Platform::new(Rect::new(col as f32 * 40.0, row as f32 * 40.0, 40.0, 40.0), kind)
    }

    #[test]
    fn resting_actor_lands_on_solid_tile() {
        // 40px actor at y=800 resting on a tile whose top is at 840
        let p = physics();
        let mut a = Actor::new(400.0, 800.0, 40.0, 40.0);
        let floor = [Platform::new(Rect::new(400.0, 840.0, 40.0, 40.0), PlatformKind::Solid)];

        let report = p.advance(&mut a, &floor, DT);
        assert!(a.grounded);
        assert_eq!(a.bottom(), 840.0);
        assert_eq!(a.vy, 0.0);
        assert_eq!(report.hits, vec![Hit { contact: Contact::Landed, kind: PlatformKind::Solid }]);
        assert!(!report.floor_clamped);
    }

    #[test]
    fn landing_is_idempotent() {
        let p = physics();
        let mut a = Actor::new(400.0, 760.0, 40.0, 80.0);
        let floor = [tile(10, 21, PlatformKind::Solid)];
        p.advance(&mut a, &floor, DT);
        let settled = a.y;
        for _ in 0..120 {
            p.steer(&mut a, None);
            p.advance(&mut a, &floor, DT);
            assert_eq!(a.y, settled);
            assert!(a.grounded);
        }
    }

    #[test]
    fn free_fall_clamps_at_screen_bottom() {
        let p = physics();
        let mut a = Actor::new(0.0, 0.0, 40.0, 80.0);
        let mut clamped = false;
        for _ in 0..200 {
            clamped = p.advance(&mut a, &[], DT).floor_clamped;
            if clamped { break; }
        }
        assert!(clamped);
        assert_eq!(a.bottom(), 900.0);
        assert_eq!(a.vy, 0.0);
        assert!(a.grounded);
    }

    #[test]
    fn airborne_clears_grounded() {
        let p = physics();
        let mut a = Actor::new(0.0, 100.0, 40.0, 80.0);
        a.grounded = true;
        p.advance(&mut a, &[], DT);
        assert!(!a.grounded);
    }

    #[test]
    fn jump_leaves_ground_and_rises() {
        let p = physics();
        let mut a = Actor::new(400.0, 760.0, 40.0, 80.0);
        let floor = [tile(10, 21, PlatformKind::Solid)];
        p.advance(&mut a, &floor, DT);
        assert!(a.grounded);

        assert!(p.jump(&mut a));
        p.advance(&mut a, &floor, DT);
        assert!(a.y < 760.0);
        assert!(a.vy < 0.0);
        assert!(!a.grounded);
    }

    #[test]
    fn head_bump_stops_rise() {
        let p = physics();
        // ceiling tile bottom at 400, actor top just below
        let ceiling = [tile(10, 9, PlatformKind::Solid)];
        let mut a = Actor::new(400.0, 405.0, 40.0, 80.0);
        a.vy = -700.0;
        let report = p.advance(&mut a, &ceiling, DT);
        assert_eq!(a.y, 400.0);
        assert_eq!(a.vy, 0.0);
        assert_eq!(report.hits[0].contact, Contact::Ceiling);
    }

    #[test]
    fn rises_through_one_way_then_lands_on_it() {
        let p = physics();
        let ledge = [tile(10, 15, PlatformKind::OneWay)]; // top 600, bottom 640
        let mut a = Actor::new(400.0, 650.0, 40.0, 80.0);
        a.vy = -700.0;

        let mut landed = false;
        for _ in 0..120 {
            let report = p.advance(&mut a, &ledge, DT);
            if report.hits.iter().any(|h| h.contact == Contact::Ceiling) {
                panic!("one-way blocked a rising actor");
            }
            if a.grounded && !report.floor_clamped {
                landed = true;
                break;
            }
        }
        assert!(landed);
        assert_eq!(a.bottom(), 600.0);
    }

    #[test]
    fn blocking_flag_stops_rise_through_one_way() {
        let c = GameConfig::default();
        let mut physics = c.physics.clone();
        physics.one_way_blocks_rising = true;
        let p = PhysicsStep::new(&physics, &c.screen);

        let ledge = [tile(10, 15, PlatformKind::OneWay)];
        let mut a = Actor::new(400.0, 645.0, 40.0, 80.0);
        a.vy = -700.0;
        p.advance(&mut a, &ledge, DT);
        assert_eq!(a.y, 640.0);
        assert_eq!(a.vy, 0.0);
    }

    #[test]
    fn fast_fall_lands_on_one_way() {
        let p = physics();
        let ledge = [tile(10, 15, PlatformKind::OneWay)]; // top 600
        let mut a = Actor::new(400.0, 599.0 - 80.0, 40.0, 80.0);
        a.vy = 700.0;

        // one frame moves the bottom past top + tolerance
        let report = p.advance(&mut a, &ledge, DT);
        assert_eq!(report.hits, vec![Hit { contact: Contact::Landed, kind: PlatformKind::OneWay }]);
        assert_eq!(a.bottom(), 600.0);
        assert_eq!(a.vy, 0.0);
        assert!(a.grounded);
    }

    #[test]
    fn walking_into_one_way_from_the_side_does_not_snap_up() {
        let p = physics();
        let ledge = [tile(10, 15, PlatformKind::OneWay)]; // x 400..440, y 600..640
        // feet 20 px below the ledge top, moving right into it
        let mut a = Actor::new(362.0, 540.0, 40.0, 80.0);
        a.vx = 300.0;
        a.vy = 0.0;
        let report = p.advance(&mut a, &ledge, DT);
        assert!(report.hits.is_empty());
        assert!(a.bottom() > 620.0);
    }

    #[test]
    fn horizontal_motion_passes_through_walls() {
        let p = physics();
        let wall = [tile(11, 10, PlatformKind::Solid)]; // x 440..480, y 400..440
        let mut a = Actor::new(430.0, 380.0, 40.0, 80.0);
        a.vx = 300.0;
        a.vy = 0.0;
        p.advance(&mut a, &wall, DT);
        // falling into the tile lands; x is never corrected
        assert!(a.x > 430.0);
    }

    #[test]
    fn last_write_wins_across_platforms() {
        let p = physics();
        // two stacked solids both overlapping; the first landing zeroes vy
        let tiles = [tile(10, 20, PlatformKind::Solid), tile(10, 21, PlatformKind::Solid)];
        let mut a = Actor::new(400.0, 765.0, 40.0, 80.0); // bottom 845, overlaps both
        a.vy = 100.0;
        let hits = p.resolve_collisions(&mut a, &tiles, 840.0);
        assert_eq!(hits.len(), 1);
        assert_eq!(a.bottom(), 800.0);
    }

    proptest! {
        #[test]
        fn free_fall_velocity_grows(dts in proptest::collection::vec(0.001f32..0.05, 1..30)) {
            let p = physics();
            let mut a = Actor::new(0.0, -100_000.0, 40.0, 80.0);
            let mut prev = a.vy;
            for dt in dts {
                p.advance(&mut a, &[], dt);
                prop_assert!(a.vy > prev);
                prop_assert!(!a.grounded);
                prev = a.vy;
            }
        }

        #[test]
        fn falling_onto_one_way_lands_from_any_height(drop in 0.0f32..560.0) {
            let p = physics();
            let ledge = [tile(10, 15, PlatformKind::OneWay)]; // top 600, bottom 640
            let mut a = Actor::new(400.0, 600.0 - 80.0 - drop, 40.0, 80.0);
            for _ in 0..240 {
                let report = p.advance(&mut a, &ledge, DT);
                prop_assert!(!report.floor_clamped, "fell through from {} px", drop);
                if a.grounded { break; }
            }
            prop_assert!(a.grounded);
            prop_assert_eq!(a.bottom(), 600.0);
        }

        #[test]
        fn airborne_jump_never_changes_velocity(vy in -1000.0f32..1000.0) {
            let p = physics();
            let mut a = Actor::new(0.0, 0.0, 40.0, 80.0);
            a.vy = vy;
            a.grounded = false;
            prop_assert!(!p.jump(&mut a));
            prop_assert_eq!(a.vy, vy);
        }
    }
}
