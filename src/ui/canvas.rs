/// Drawing surface the scene adapter talks to.
///
/// Coordinates are screen pixels. Implementations decide how pixels map
/// to their output (terminal cells, a test recorder, ...).

use crossterm::style::Color;

use crate::domain::entity::Facing;
use crate::domain::geom::Rect;

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Fill {
    Solid,
    Outline,
}

#[derive(Clone, Copy, PartialEq, Eq, Debug)]
pub enum Sprite {
    Knight,
}

impl Sprite {
    /// Image height in pixels; the art is top-aligned to it.
    pub fn height(self) -> f32 {
        match self {
            Sprite::Knight => 80.0,
        }
    }
}

pub trait Canvas {
    fn draw_rect(&mut self, bounds: Rect, color: Color, fill: Fill);

    /// Draw `sprite` with its image centered on `center`, mirrored for Left.
    fn draw_sprite(&mut self, sprite: Sprite, center: (f32, f32), facing: Facing);
}
