/// Level loader.
///
/// ## Sources (priority order):
///   1. The configured level file (`level.csv` by default)
///   2. Built-in embedded level, only when that file does not exist
///
/// An existing file that cannot be read or parsed is fatal: no partial
/// level is ever built.
///
/// ## Format
///   One row per line. A line containing `,` is split into comma-separated
///   fields (whitespace trimmed); otherwise every character is a cell.
///   Trailing blank lines are ignored.
///
/// ## Tile legend:
///   '0' = Empty    '1' = Solid    '2' = Hazard    '3' = One-way
///   anything else = Empty

use std::path::Path;

use crate::domain::entity::Platform;
use crate::domain::geom::Rect;
use crate::domain::tile::TileCode;
use crate::error::MalformedLevel;

/// Rectangular grid of tile codes. Immutable once built.
#[derive(Clone, Debug, PartialEq, Eq, Default)]
pub struct TileGrid {
    cells: Vec<Vec<TileCode>>,
    width: usize,
}

impl TileGrid {
    /// Build from rows; every row must have the same length.
    pub fn from_rows(cells: Vec<Vec<TileCode>>) -> Result<Self, MalformedLevel> {
        let width = cells.first().map_or(0, |r| r.len());
        if let Some((i, row)) = cells.iter().enumerate().find(|(_, r)| r.len() != width) {
            return Err(MalformedLevel::RaggedRow {
                row: i + 1,
                expected: width,
                found: row.len(),
            });
        }
        Ok(TileGrid { cells, width })
    }

    pub fn width(&self) -> usize { self.width }
    pub fn height(&self) -> usize { self.cells.len() }

    /// Tile at (col, row); out of range is Empty.
    pub fn get(&self, col: usize, row: usize) -> TileCode {
        self.cells.get(row)
            .and_then(|r| r.get(col))
            .copied()
            .unwrap_or_default()
    }

    /// One platform per non-Empty cell, row-major, no merging.
    pub fn platforms(&self, tile_size: u32) -> Vec<Platform> {
        let size = tile_size as f32;
        (0..self.height())
            .flat_map(|row| (0..self.width).map(move |col| (col, row)))
            .filter_map(|(col, row)| {
                self.get(col, row).platform_kind().map(|kind| {
                    let bounds = Rect::new(col as f32 * size, row as f32 * size, size, size);
                    Platform::new(bounds, kind)
                })
            })
            .collect()
    }
}

// ══════════════════════════════════════════════════════════════
// Public API
// ══════════════════════════════════════════════════════════════

/// Parse level text into a grid.
pub fn parse_level(text: &str) -> Result<TileGrid, MalformedLevel> {
    let mut lines: Vec<&str> = text.lines().collect();
    while lines.last().map_or(false, |l| l.trim().is_empty()) {
        lines.pop();
    }

    let rows = lines.into_iter().map(parse_row).collect();
    TileGrid::from_rows(rows)
}

/// Read and parse a level file.
pub fn load_level_file(path: &Path) -> Result<TileGrid, MalformedLevel> {
    let text = std::fs::read_to_string(path).map_err(|source| MalformedLevel::Unreadable {
        path: path.to_path_buf(),
        source,
    })?;
    parse_level(&text)
}

/// Load the configured level, or the built-in one when the file is absent.
pub fn load_level(path: &Path) -> Result<TileGrid, MalformedLevel> {
    if !path.exists() {
        tracing::info!(path = %path.display(), "level file not found, using built-in level");
        return Ok(embedded_level());
    }
    let grid = load_level_file(path)?;
    tracing::info!(
        path = %path.display(),
        rows = grid.height(),
        cols = grid.width(),
        "loaded level",
    );
    Ok(grid)
}

/// The level shipped inside the binary.
pub fn embedded_level() -> TileGrid {
    let rows = EMBEDDED_LEVEL.iter()
        .map(|r| parse_row(r))
        .collect();
    // Rows are fixed-width literals; a mismatch is a build-time typo.
    TileGrid::from_rows(rows).unwrap_or_default()
}

// ══════════════════════════════════════════════════════════════
// Internal
// ══════════════════════════════════════════════════════════════

fn parse_row(line: &str) -> Vec<TileCode> {
    if line.contains(',') {
        line.split(',').map(|f| TileCode::from_field(f.trim())).collect()
    } else {
        line.chars().map(TileCode::from_char).collect()
    }
}

const EMBEDDED_LEVEL: &[&str] = &[
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000000000000000000000000000000000000111110000000000000000000000000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000000000000",
    "00000000000000001111000000000000000000000000000000000000000000000000000000111110",
    "00000000000000000000000000000000000000000033330000000000000000000000000000000000",
    "00000000000000000000003333300000000000000000000000000000000000000000000000000000",
    "00000000333333000000000000000000000000000000000000000000000000333333000010000000",
    "00000000000000000000000000000000001111110000000000000000000000000000000010000000",
    "00000000000000000000000000000000000000000000000000000000000000000000000010000000",
    "00000000000000000000000000002200000000000000000000000000000020000000000010000000",
    "11111111111111111111111111111100011111111111111111111110011111111111111111111111",
];

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::entity::PlatformKind;
    use std::io::Write;

    #[test]
    fn three_row_grid_yields_four_platforms() {
        let grid = parse_level("0001\n0111\n0000\n").unwrap();
        let platforms = grid.platforms(40);
        let got: Vec<(f32, f32, PlatformKind)> = platforms.iter()
            .map(|p| (p.bounds.x, p.bounds.y, p.kind))
            .collect();
        assert_eq!(got, vec![
            (120.0, 0.0, PlatformKind::Solid),
            (40.0, 40.0, PlatformKind::Solid),
            (80.0, 40.0, PlatformKind::Solid),
            (120.0, 40.0, PlatformKind::Solid),
        ]);
        assert!(platforms.iter().all(|p| p.bounds.w == 40.0 && p.bounds.h == 40.0));
    }

    #[test]
    fn comma_separated_rows() {
        let grid = parse_level("0,0,3\r\n2, 1 ,0\r\n").unwrap();
        assert_eq!(grid.width(), 3);
        assert_eq!(grid.height(), 2);
        assert_eq!(grid.get(2, 0), TileCode::OneWay);
        assert_eq!(grid.get(0, 1), TileCode::Hazard);
        assert_eq!(grid.get(1, 1), TileCode::Solid);
    }

    #[test]
    fn unknown_codes_are_empty() {
        let grid = parse_level("1x9\n").unwrap();
        assert_eq!(grid.platforms(40).len(), 1);
        assert_eq!(grid.get(1, 0), TileCode::Empty);
    }

    #[test]
    fn ragged_rows_are_malformed() {
        let err = parse_level("0001\n011\n").unwrap_err();
        match err {
            MalformedLevel::RaggedRow { row, expected, found } => {
                assert_eq!((row, expected, found), (2, 4, 3));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn empty_level_has_no_platforms() {
        let grid = parse_level("").unwrap();
        assert_eq!(grid.height(), 0);
        assert!(grid.platforms(40).is_empty());
    }

    #[test]
    fn trailing_blank_lines_ignored() {
        let grid = parse_level("01\n10\n\n\n").unwrap();
        assert_eq!(grid.height(), 2);
    }

    #[test]
    fn out_of_range_is_empty() {
        let grid = parse_level("1\n").unwrap();
        assert_eq!(grid.get(5, 5), TileCode::Empty);
    }

    #[test]
    fn kinds_follow_codes() {
        let grid = parse_level("123\n").unwrap();
        let kinds: Vec<PlatformKind> = grid.platforms(10).iter().map(|p| p.kind).collect();
        assert_eq!(kinds, vec![PlatformKind::Solid, PlatformKind::Hazard, PlatformKind::OneWay]);
        assert_eq!(grid.platforms(10)[2].bounds.x, 20.0);
    }

    #[test]
    fn loads_file() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        writeln!(f, "0,1").unwrap();
        writeln!(f, "1,1").unwrap();
        let grid = load_level_file(f.path()).unwrap();
        assert_eq!(grid.platforms(40).len(), 3);
    }

    #[test]
    fn unreadable_file_is_malformed() {
        let dir = tempfile::tempdir().unwrap();
        // a directory cannot be read as text
        let err = load_level_file(dir.path()).unwrap_err();
        assert!(matches!(err, MalformedLevel::Unreadable { .. }));
    }

    #[test]
    fn missing_file_uses_embedded_level() {
        let dir = tempfile::tempdir().unwrap();
        let grid = load_level(&dir.path().join("nope.csv")).unwrap();
        assert_eq!(grid, embedded_level());
    }

    #[test]
    fn existing_malformed_file_is_fatal() {
        let mut f = tempfile::NamedTempFile::new().unwrap();
        write!(f, "01\n1\n").unwrap();
        assert!(load_level(f.path()).is_err());
    }

    #[test]
    fn embedded_level_is_rectangular() {
        let grid = embedded_level();
        assert!(grid.height() > 0);
        assert!(EMBEDDED_LEVEL.iter().all(|r| r.len() == grid.width()));
        assert!(!grid.platforms(40).is_empty());
    }
}
