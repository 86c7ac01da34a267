//! Public configuration and output models for level generation.

use serde::{Deserialize, Serialize};
use xxhash_rust::xxh3::xxh3_64;

use crate::types::{Cell, GenerationError, Pos, TerrainKind};

/// How each identified region decides its lit flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum LightingMode {
    /// No draw is consumed; every region gets this flag.
    Forced { lit: bool },
    /// One depth-biased decision per kept region: `roll(1 + depth) < 11`
    /// and, only when that holds, `uniform(77) != 0`. The short-circuit is
    /// part of the call-order contract.
    DepthBiased { depth: u32 },
}

/// Sole external input to a generation run.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct LevelConfig {
    pub width: usize,
    pub height: usize,
    /// Chance in percent that an interior cell starts as foreground.
    pub fill_percent: i32,
    /// Minimum number of surviving regions; fewer fails the attempt as
    /// retry-exhaustible so the caller can reseed and rerun.
    pub min_regions: Option<usize>,
    pub lighting: LightingMode,
    pub hazards_enabled: bool,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            width: 80,
            height: 21,
            fill_percent: 40,
            min_regions: None,
            lighting: LightingMode::DepthBiased { depth: 1 },
            hazards_enabled: false,
        }
    }
}

impl LevelConfig {
    /// Reject malformed configurations before any draw is consumed.
    pub fn validate(&self) -> Result<(), GenerationError> {
        if self.width == 0 || self.height == 0 {
            return Err(GenerationError::invalid(format!(
                "level dimensions must be non-zero, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width < 5 || self.height < 5 {
            return Err(GenerationError::invalid(format!(
                "level dimensions must be at least 5x5, got {}x{}",
                self.width, self.height
            )));
        }
        if self.width > 4096 || self.height > 4096 {
            return Err(GenerationError::invalid(format!(
                "level dimensions must be at most 4096x4096, got {}x{}",
                self.width, self.height
            )));
        }
        if !(0..=100).contains(&self.fill_percent) {
            return Err(GenerationError::invalid(format!(
                "fill percent must be within 0..=100, got {}",
                self.fill_percent
            )));
        }
        Ok(())
    }
}

/// Inclusive bounding box in grid coordinates.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub lx: i32,
    pub ly: i32,
    pub hx: i32,
    pub hy: i32,
}

impl Bounds {
    pub fn point(x: i32, y: i32) -> Self {
        Self { lx: x, ly: y, hx: x, hy: y }
    }

    pub fn extend(&mut self, x: i32, y: i32) {
        self.lx = self.lx.min(x);
        self.hx = self.hx.max(x);
        self.ly = self.ly.min(y);
        self.hy = self.hy.max(y);
    }

    pub fn width(&self) -> i32 {
        self.hx - self.lx + 1
    }

    pub fn height(&self) -> i32 {
        self.hy - self.ly + 1
    }
}

/// One identified region: transient bookkeeping during generation,
/// exported afterwards as the room table.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoomInfo {
    pub id: u16,
    pub bounds: Bounds,
    pub lit: bool,
    pub cell_count: usize,
}

/// Immutable snapshot of a finished generation run.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct GeneratedLevel {
    pub width: usize,
    pub height: usize,
    /// Row-major cells.
    pub cells: Vec<Cell>,
    pub rooms: Vec<RoomInfo>,
}

impl GeneratedLevel {
    /// Out-of-bounds reads resolve to the background sentinel.
    pub fn cell_at(&self, pos: Pos) -> Cell {
        if pos.x < 0 || pos.y < 0 {
            return Cell::background();
        }
        let (x, y) = (pos.x as usize, pos.y as usize);
        if x >= self.width || y >= self.height {
            return Cell::background();
        }
        self.cells[y * self.width + x]
    }

    pub fn kind_at(&self, pos: Pos) -> TerrainKind {
        self.cell_at(pos).kind
    }

    /// Byte-stable serialization used for fingerprinting.
    pub fn canonical_bytes(&self) -> Vec<u8> {
        let mut bytes = Vec::new();
        bytes.extend((self.width as u32).to_le_bytes());
        bytes.extend((self.height as u32).to_le_bytes());
        for cell in &self.cells {
            bytes.push(cell.kind.code());
            bytes.push(u8::from(cell.lit));
            bytes.extend(cell.room_id.map_or(u16::MAX, |id| id).to_le_bytes());
        }
        bytes.extend((self.rooms.len() as u32).to_le_bytes());
        for room in &self.rooms {
            bytes.extend(room.id.to_le_bytes());
            bytes.extend(room.bounds.lx.to_le_bytes());
            bytes.extend(room.bounds.ly.to_le_bytes());
            bytes.extend(room.bounds.hx.to_le_bytes());
            bytes.extend(room.bounds.hy.to_le_bytes());
            bytes.push(u8::from(room.lit));
            bytes.extend((room.cell_count as u32).to_le_bytes());
        }
        bytes
    }

    pub fn fingerprint(&self) -> u64 {
        xxh3_64(&self.canonical_bytes())
    }

    /// Per-cell type codes, one base-36 digit per cell, one string per row.
    /// This is the structural fingerprint stored in trace files.
    pub fn type_code_rows(&self) -> Vec<String> {
        (0..self.height)
            .map(|y| {
                (0..self.width)
                    .map(|x| {
                        let code = self.cells[y * self.width + x].kind.code();
                        char::from_digit(code as u32, 36).unwrap_or('?')
                    })
                    .collect()
            })
            .collect()
    }

    /// Human-readable ASCII rendering (lossy on wall sub-types).
    pub fn render_ascii(&self) -> String {
        let mut out = String::with_capacity(self.height * (self.width + 1));
        for y in 0..self.height {
            for x in 0..self.width {
                out.push(self.cells[y * self.width + x].kind.glyph());
            }
            out.push('\n');
        }
        out
    }
}
