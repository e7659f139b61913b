/// Maps world state to draw calls. No pixels are touched here.

use crossterm::style::Color;

use crate::domain::entity::PlatformKind;
use crate::sim::world::WorldState;
use super::canvas::{Canvas, Fill, Sprite};

pub const ACTOR_OUTLINE: Color = Color::Green;

/// Horizontal shift of the sprite toward the facing direction.
pub const SPRITE_OFFSET_X: f32 = 17.0;

pub fn platform_color(kind: PlatformKind) -> Color {
    match kind {
        PlatformKind::Solid => Color::Green,
        PlatformKind::Hazard => Color::Red,
        PlatformKind::OneWay => Color::DarkGreen,
    }
}

/// Platforms first, then the actor's hollow box, then its sprite.
pub fn draw_world<C: Canvas + ?Sized>(world: &WorldState, canvas: &mut C) {
    let cam = &world.camera;

    for p in &world.platforms {
        canvas.draw_rect(cam.to_screen(p.bounds), platform_color(p.kind), Fill::Solid);
    }

    let actor = cam.actor_on_screen(&world.actor);
    canvas.draw_rect(actor, ACTOR_OUTLINE, Fill::Outline);

    let (cx, cy) = actor.center();
    let center = (cx + SPRITE_OFFSET_X * world.actor.facing.sign(), cy);
    canvas.draw_sprite(Sprite::Knight, center, world.actor.facing);
}
