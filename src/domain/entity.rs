/// Entities: the single controllable Actor and the static Platforms.
/// Plain data plus the behavior methods the physics step drives.

use super::geom::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Facing {
    Left,
    Right,
}

impl Facing {
    /// -1 for Left, +1 for Right.
    pub fn sign(self) -> f32 {
        match self {
            Facing::Left => -1.0,
            Facing::Right => 1.0,
        }
    }
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum PlatformKind {
    Solid,
    Hazard,
    OneWay,
}

impl PlatformKind {
    /// Hazard tiles collide exactly like Solid ones.
    pub fn is_solid(self) -> bool {
        matches!(self, PlatformKind::Solid | PlatformKind::Hazard)
    }
}

/// A level tile turned into a collision rectangle. Never mutated after load.
#[derive(Clone, Copy, PartialEq, Debug)]
pub struct Platform {
    pub bounds: Rect,
    pub kind: PlatformKind,
}

impl Platform {
    pub fn new(bounds: Rect, kind: PlatformKind) -> Self {
        Platform { bounds, kind }
    }
}

/// Which side of a platform the actor was pushed to.
#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Contact {
    /// Snapped onto the platform's top edge.
    Landed,
    /// Snapped under the platform's bottom edge.
    Ceiling,
}

/// The controllable entity. Position is the top-left corner, in world pixels.
#[derive(Clone, Debug, PartialEq)]
pub struct Actor {
    pub x: f32,
    pub y: f32,
    pub width: f32,
    pub height: f32,
    /// Pixels per second. Positive y is downward.
    pub vx: f32,
    pub vy: f32,
    pub facing: Facing,
    pub grounded: bool,
}

impl Actor {
    pub fn new(x: f32, y: f32, width: f32, height: f32) -> Self {
        Actor {
            x, y, width, height,
            vx: 0.0,
            vy: 0.0,
            facing: Facing::Right,
            grounded: false,
        }
    }

    /// Actor whose center sits at `(cx, cy)`.
    pub fn centered_at(cx: f32, cy: f32, width: f32, height: f32) -> Self {
        Actor::new(cx - width / 2.0, cy - height / 2.0, width, height)
    }

    pub fn bounds(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }

    pub fn bottom(&self) -> f32 { self.y + self.height }
    pub fn right(&self) -> f32 { self.x + self.width }

    /// Set horizontal velocity to `speed` signed by `dir`, or zero with no
    /// direction held. Facing only changes while moving.
    pub fn apply_horizontal(&mut self, dir: Option<Facing>, speed: f32) {
        match dir {
            Some(d) => {
                self.vx = speed * d.sign();
                if speed != 0.0 {
                    self.facing = d;
                }
            }
            None => self.vx = 0.0,
        }
    }

    /// Jump only from the ground. Returns true when the impulse was applied.
    pub fn jump(&mut self, impulse: f32) -> bool {
        if !self.grounded {
            return false;
        }
        self.vy = impulse;
        self.grounded = false;
        true
    }

    /// Semi-implicit Euler: gravity updates velocity, then velocity moves
    /// the position on both axes.
    pub fn integrate(&mut self, dt: f32, gravity: f32) {
        self.vy += gravity * dt;
        self.x += self.vx * dt;
        self.y += self.vy * dt;
    }

    /// Fallback floor at `floor_y`. Re-evaluates `grounded`: true only when
    /// the actor had to be clamped this frame. Returns that flag.
    pub fn clamp_to_floor(&mut self, floor_y: f32) -> bool {
        if self.bottom() > floor_y {
            self.y = floor_y - self.height;
            self.vy = 0.0;
            self.grounded = true;
        } else {
            self.grounded = false;
        }
        self.grounded
    }

    /// Vertical-only resolution against one overlapping platform.
    ///
    /// Falling: Solid/Hazard always land; OneWay lands only if the bottom
    /// edge before this frame's integration (`prev_bottom`) was no more than
    /// `one_way_tolerance` below the platform top.
    /// Rising: blocked by Solid/Hazard; OneWay blocks only when
    /// `one_way_blocks_rising` is set.
    pub fn resolve_against(
        &mut self,
        platform: &Platform,
        prev_bottom: f32,
        one_way_tolerance: f32,
        one_way_blocks_rising: bool,
    ) -> Option<Contact> {
        let p = &platform.bounds;
        if self.vy > 0.0 {
            let lands = match platform.kind {
                PlatformKind::OneWay => prev_bottom <= p.top() + one_way_tolerance,
                _ => true,
            };
            if lands {
                self.y = p.top() - self.height;
                self.vy = 0.0;
                self.grounded = true;
                return Some(Contact::Landed);
            }
        } else if self.vy < 0.0 {
            let blocks = platform.kind.is_solid() || one_way_blocks_rising;
            if blocks && self.y <= p.bottom() {
                self.y = p.bottom();
                self.vy = 0.0;
                return Some(Contact::Ceiling);
            }
        }
        None
    }
}
