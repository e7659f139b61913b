/// Tile codes and their properties.
/// Properties are queried via methods, not stored as flags,
/// so tile semantics are centralized here.

use super::entity::PlatformKind;

#[derive(Clone, Copy, PartialEq, Eq, Debug, Default)]
pub enum TileCode {
    #[default]
    Empty,
    Solid,  // '1'
    Hazard, // '2': drawn red, collides like Solid
    OneWay, // '3': lands from above, passable from below
}

impl TileCode {
    /// Decode a single level character. Unknown codes are Empty.
    pub fn from_char(c: char) -> TileCode {
        match c {
            '1' => TileCode::Solid,
            '2' => TileCode::Hazard,
            '3' => TileCode::OneWay,
            _ => TileCode::Empty,
        }
    }

    /// Decode a comma-separated field. Only single-character fields are codes.
    pub fn from_field(field: &str) -> TileCode {
        let mut chars = field.chars();
        match (chars.next(), chars.next()) {
            (Some(c), None) => TileCode::from_char(c),
            _ => TileCode::Empty,
        }
    }

    /// Platform kind produced by this tile, or None for Empty.
    pub fn platform_kind(self) -> Option<PlatformKind> {
        match self {
            TileCode::Empty => None,
            TileCode::Solid => Some(PlatformKind::Solid),
            TileCode::Hazard => Some(PlatformKind::Hazard),
            TileCode::OneWay => Some(PlatformKind::OneWay),
        }
    }
}
