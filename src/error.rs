/// Error types.
///
/// Only level construction can fail. Everything that runs per frame is a
/// total function over a valid world.

use std::path::PathBuf;

use thiserror::Error;

/// A level source that cannot be turned into a tile grid.
/// Fatal: reported before the simulation starts, no partial level is built.
#[derive(Debug, Error)]
pub enum MalformedLevel {
    #[error("level row {row} has {found} columns, expected {expected}")]
    RaggedRow {
        row: usize,
        expected: usize,
        found: usize,
    },
    #[error("failed to read level file {}: {source}", .path.display())]
    Unreadable {
        path: PathBuf,
        source: std::io::Error,
    },
}
