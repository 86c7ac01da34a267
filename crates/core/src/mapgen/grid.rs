//! Fixed-size row-major terrain grid.
//!
//! Reads never fail: anything outside the dimensions is the background
//! sentinel. Writes outside the dimensions are an error. The one-cell
//! border is never generated into directly; it only ever becomes wall
//! during finishing.

use crate::types::{Cell, GenerationError, TerrainKind};

/// Fixed probe order for the 8-neighborhood. Load-bearing for parity:
/// neighbor-dependent decisions (wall orientation in particular) take the
/// first match in this order.
pub(super) const NEIGHBORS_8: [(i32, i32); 8] =
    [(-1, -1), (0, -1), (1, -1), (-1, 0), (1, 0), (-1, 1), (0, 1), (1, 1)];

#[derive(Clone)]
pub struct LevelGrid {
    width: usize,
    height: usize,
    cells: Vec<Cell>,
}

impl LevelGrid {
    pub fn new(width: usize, height: usize) -> Self {
        Self { width, height, cells: vec![Cell::background(); width * height] }
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn in_bounds(&self, x: i32, y: i32) -> bool {
        x >= 0 && y >= 0 && (x as usize) < self.width && (y as usize) < self.height
    }

    /// Strictly inside the one-cell border.
    pub(super) fn in_interior(&self, x: i32, y: i32) -> bool {
        x >= 1 && y >= 1 && (x as usize) < self.width - 1 && (y as usize) < self.height - 1
    }

    /// Never fails; out-of-bounds reads return the background sentinel.
    pub fn get(&self, x: i32, y: i32) -> Cell {
        if !self.in_bounds(x, y) {
            return Cell::background();
        }
        self.cells[y as usize * self.width + x as usize]
    }

    pub fn kind(&self, x: i32, y: i32) -> TerrainKind {
        self.get(x, y).kind
    }

    /// Fails with `OutOfBounds` for coordinates outside the dimensions.
    pub fn set(&mut self, x: i32, y: i32, cell: Cell) -> Result<(), GenerationError> {
        if !self.in_bounds(x, y) {
            return Err(GenerationError::OutOfBounds { x, y });
        }
        self.cells[y as usize * self.width + x as usize] = cell;
        Ok(())
    }

    /// In-bounds mutable access for pipeline internals whose loops stay
    /// inside the dimensions by construction.
    pub(super) fn at_mut(&mut self, x: usize, y: usize) -> &mut Cell {
        &mut self.cells[y * self.width + x]
    }

    /// Reset every cell to the given background kind, unlit, no room.
    pub fn reset(&mut self, kind: TerrainKind) {
        for cell in &mut self.cells {
            *cell = Cell::of_kind(kind);
        }
    }

    pub fn cells(&self) -> &[Cell] {
        &self.cells
    }

    pub(super) fn into_cells(self) -> Vec<Cell> {
        self.cells
    }

    /// Count of open (foreground) cells in the fixed 8-neighborhood;
    /// out-of-bounds neighbors count as background.
    pub(super) fn open_neighbors(&self, x: i32, y: i32) -> usize {
        NEIGHBORS_8
            .iter()
            .filter(|(dx, dy)| self.get(x + dx, y + dy).kind.is_open())
            .count()
    }
}
