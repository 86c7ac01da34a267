//! Shared terrain, cell, and error types for the generation engine.

use std::fmt;

use serde::{Deserialize, Serialize};

/// Position in grid space. May be out of bounds; reads at out-of-bounds
/// positions resolve to the background sentinel.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub y: i32,
    pub x: i32,
}

/// Closed set of terrain kinds a cell can hold.
///
/// `Stone` is the background sentinel. `Floor` is the cave foreground and
/// `Hazard` is foreground reclassified by the finisher. The remaining kinds
/// are wall sub-types derived at foreground/background boundaries; their
/// orientation matters to downstream rendering, so they are distinct kinds
/// rather than a wall flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum TerrainKind {
    Stone,
    Floor,
    Hazard,
    WallH,
    WallV,
    CornerTl,
    CornerTr,
    CornerBl,
    CornerBr,
    TeeUp,
    TeeDown,
    TeeLeft,
    TeeRight,
    Cross,
}

impl TerrainKind {
    /// Foreground cells: walkable cave interior, before and after hazard
    /// reclassification.
    pub fn is_open(self) -> bool {
        matches!(self, Self::Floor | Self::Hazard)
    }

    pub fn is_wall(self) -> bool {
        !matches!(self, Self::Stone | Self::Floor | Self::Hazard)
    }

    /// Stable one-byte code used by canonical bytes, fingerprints, and the
    /// trace file's grid rows. Codes are part of the trace format and must
    /// never be renumbered.
    pub fn code(self) -> u8 {
        match self {
            Self::Stone => 0,
            Self::Floor => 1,
            Self::Hazard => 2,
            Self::WallH => 3,
            Self::WallV => 4,
            Self::CornerTl => 5,
            Self::CornerTr => 6,
            Self::CornerBl => 7,
            Self::CornerBr => 8,
            Self::TeeUp => 9,
            Self::TeeDown => 10,
            Self::TeeLeft => 11,
            Self::TeeRight => 12,
            Self::Cross => 13,
        }
    }

    pub fn from_code(code: u8) -> Option<Self> {
        Some(match code {
            0 => Self::Stone,
            1 => Self::Floor,
            2 => Self::Hazard,
            3 => Self::WallH,
            4 => Self::WallV,
            5 => Self::CornerTl,
            6 => Self::CornerTr,
            7 => Self::CornerBl,
            8 => Self::CornerBr,
            9 => Self::TeeUp,
            10 => Self::TeeDown,
            11 => Self::TeeLeft,
            12 => Self::TeeRight,
            13 => Self::Cross,
            _ => return None,
        })
    }

    /// Display glyph for ASCII dumps. Lossy: wall sub-types collapse onto
    /// the two classic wall glyphs.
    pub fn glyph(self) -> char {
        match self {
            Self::Stone => ' ',
            Self::Floor => '.',
            Self::Hazard => '~',
            Self::WallV | Self::TeeLeft | Self::TeeRight => '|',
            _ => '-',
        }
    }
}

/// One grid cell. Fixed layout: kind, lit flag, transient room id.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Cell {
    pub kind: TerrainKind,
    pub lit: bool,
    pub room_id: Option<u16>,
}

impl Cell {
    /// The sentinel returned for out-of-bounds reads.
    pub fn background() -> Self {
        Self { kind: TerrainKind::Stone, lit: false, room_id: None }
    }

    pub fn of_kind(kind: TerrainKind) -> Self {
        Self { kind, lit: false, room_id: None }
    }
}

/// Failures the generation engine can surface.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum GenerationError {
    /// Bad draw range or malformed configuration. Raised before any state
    /// is touched; the failing call consumes no draws.
    InvalidArgument { message: String },
    /// Grid mutation outside the fixed dimensions. Fatal to the single call.
    OutOfBounds { x: i32, y: i32 },
    /// The region joiner (or a configured region-count floor) exhausted its
    /// bounded retry budget. The caller decides whether to reseed and rerun.
    RetryExhausted { attempts: u32, message: String },
}

impl GenerationError {
    pub fn invalid(message: impl Into<String>) -> Self {
        Self::InvalidArgument { message: message.into() }
    }
}

impl fmt::Display for GenerationError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::InvalidArgument { message } => write!(f, "invalid argument: {message}"),
            Self::OutOfBounds { x, y } => write!(f, "grid write out of bounds at ({x}, {y})"),
            Self::RetryExhausted { attempts, message } => {
                write!(f, "generation retry budget exhausted after {attempts} attempts: {message}")
            }
        }
    }
}

impl std::error::Error for GenerationError {}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn terrain_codes_round_trip() {
        for code in 0..=13 {
            let kind = TerrainKind::from_code(code).expect("code in range");
            assert_eq!(kind.code(), code);
        }
        assert_eq!(TerrainKind::from_code(14), None);
    }

    #[test]
    fn background_cell_is_unlit_stone_without_room() {
        let cell = Cell::background();
        assert_eq!(cell.kind, TerrainKind::Stone);
        assert!(!cell.lit);
        assert_eq!(cell.room_id, None);
    }
}
