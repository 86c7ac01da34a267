//! Connected-region identification: scanline flood fill, room table,
//! lighting decisions.
//!
//! The discovery scan is row-major over the interior. Flood fill is
//! 8-connected: each horizontal run also probes the diagonal cells just
//! past its ends in the rows above and below. Regions of three cells or
//! fewer are erased back to background before any lighting draw happens,
//! so erased regions never touch the draw stream.

use crate::rng::DungeonRng;
use crate::types::{Cell, GenerationError, TerrainKind};

use super::grid::LevelGrid;
use super::model::{Bounds, LightingMode, RoomInfo};

/// Regions at or below this size are dissolved back into the background.
const TRIFLING_REGION_MAX: usize = 3;

struct Region {
    bounds: Bounds,
    cell_count: usize,
}

/// Scan the grid, label every connected foreground region, decide its lit
/// state, and return the room table in discovery order.
///
/// Postcondition: every surviving foreground cell carries a room id;
/// background cells carry none.
pub(super) fn identify_regions(
    grid: &mut LevelGrid,
    rng: &mut DungeonRng,
    lighting: LightingMode,
) -> Result<Vec<RoomInfo>, GenerationError> {
    let mut rooms: Vec<RoomInfo> = Vec::new();
    for y in 1..grid.height() as i32 - 1 {
        for x in 1..grid.width() as i32 - 1 {
            let cell = grid.get(x, y);
            if cell.kind != TerrainKind::Floor || cell.room_id.is_some() {
                continue;
            }
            if rooms.len() >= u16::MAX as usize {
                return Err(GenerationError::invalid("region count exceeds room id space"));
            }
            let id = rooms.len() as u16;
            let region = flood_fill(grid, x, y, id);
            if region.cell_count <= TRIFLING_REGION_MAX {
                erase_region(grid, &region, id);
                continue;
            }
            let lit = lit_state(rng, lighting)?;
            rooms.push(RoomInfo { id, bounds: region.bounds, lit, cell_count: region.cell_count });
        }
    }
    Ok(rooms)
}

/// One lighting decision for a kept region. The second draw happens only
/// when the first test passes; both draws are skipped entirely for forced
/// modes.
fn lit_state(rng: &mut DungeonRng, lighting: LightingMode) -> Result<bool, GenerationError> {
    match lighting {
        LightingMode::Forced { lit } => Ok(lit),
        LightingMode::DepthBiased { depth } => {
            let shallow = rng.roll(1 + depth as i32)? < 11;
            Ok(shallow && rng.uniform(77)? != 0)
        }
    }
}

fn fillable(grid: &LevelGrid, x: i32, y: i32) -> bool {
    let cell = grid.get(x, y);
    cell.kind == TerrainKind::Floor && cell.room_id.is_none()
}

/// Scanline fill from a seed cell, labeling the whole connected region.
fn flood_fill(grid: &mut LevelGrid, seed_x: i32, seed_y: i32, id: u16) -> Region {
    let mut bounds = Bounds::point(seed_x, seed_y);
    let mut cell_count = 0usize;
    let mut stack = vec![(seed_x, seed_y)];

    while let Some((x, y)) = stack.pop() {
        if !fillable(grid, x, y) {
            continue;
        }
        let mut lo = x;
        while fillable(grid, lo - 1, y) {
            lo -= 1;
        }
        let mut hi = x;
        while fillable(grid, hi + 1, y) {
            hi += 1;
        }
        for cx in lo..=hi {
            grid.at_mut(cx as usize, y as usize).room_id = Some(id);
            bounds.extend(cx, y);
            cell_count += 1;
        }
        // Probe the rows above and below across the run plus its diagonal
        // overhang; this is what makes the fill 8-connected.
        for dy in [-1, 1] {
            let ny = y + dy;
            for cx in lo - 1..=hi + 1 {
                if fillable(grid, cx, ny) {
                    stack.push((cx, ny));
                }
            }
        }
    }

    Region { bounds, cell_count }
}

/// Dissolve a labeled region back into plain background.
fn erase_region(grid: &mut LevelGrid, region: &Region, id: u16) {
    for y in region.bounds.ly..=region.bounds.hy {
        for x in region.bounds.lx..=region.bounds.hx {
            if grid.get(x, y).room_id == Some(id) {
                *grid.at_mut(x as usize, y as usize) = Cell::background();
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn grid_from_rows(rows: &[&str]) -> LevelGrid {
        let mut grid = LevelGrid::new(rows[0].len(), rows.len());
        for (y, row) in rows.iter().enumerate() {
            for (x, ch) in row.chars().enumerate() {
                if ch == '.' {
                    *grid.at_mut(x, y) = Cell::of_kind(TerrainKind::Floor);
                }
            }
        }
        grid
    }

    #[test]
    fn separate_blobs_get_distinct_ids_in_discovery_order() {
        let mut grid = grid_from_rows(&[
            "            ",
            " ....       ",
            " ....  .... ",
            "       .... ",
            "            ",
        ]);
        let mut rng = DungeonRng::new(1);
        let rooms =
            identify_regions(&mut grid, &mut rng, LightingMode::Forced { lit: false }).unwrap();
        assert_eq!(rooms.len(), 2);
        assert_eq!(rooms[0].id, 0);
        assert_eq!(rooms[1].id, 1);
        assert_eq!(rooms[0].bounds, Bounds { lx: 1, ly: 1, hx: 4, hy: 2 });
        assert_eq!(rooms[1].bounds, Bounds { lx: 7, ly: 2, hx: 10, hy: 3 });
        assert_eq!(grid.get(2, 1).room_id, Some(0));
        assert_eq!(grid.get(8, 3).room_id, Some(1));
    }

    #[test]
    fn diagonal_touch_is_one_region() {
        let mut grid = grid_from_rows(&[
            "         ",
            " ....    ",
            "     ....",
            "         ",
        ]);
        // Pad right edge into interior: shrink the second run so it ends
        // inside the border.
        *grid.at_mut(8, 2) = Cell::background();
        let mut rng = DungeonRng::new(1);
        let rooms =
            identify_regions(&mut grid, &mut rng, LightingMode::Forced { lit: false }).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].cell_count, 7);
        assert_eq!(grid.get(6, 2).room_id, Some(0));
    }

    #[test]
    fn trifling_regions_are_erased_without_consuming_draws() {
        let mut grid = grid_from_rows(&[
            "          ",
            " ..       ",
            " ..  ...  ",
            "     ...  ",
            "          ",
        ]);
        let mut rng = DungeonRng::new(4);
        rng.set_logging(true);
        let rooms =
            identify_regions(&mut grid, &mut rng, LightingMode::DepthBiased { depth: 3 }).unwrap();
        // The 4-cell block survives, the 6-cell block survives; nothing is
        // trifling here. Rebuild with a genuinely tiny blob instead.
        assert_eq!(rooms.len(), 2);

        let mut grid = grid_from_rows(&[
            "          ",
            " ..       ",
            " .   .... ",
            "     .... ",
            "          ",
        ]);
        let mut rng = DungeonRng::new(4);
        rng.set_logging(true);
        let rooms =
            identify_regions(&mut grid, &mut rng, LightingMode::DepthBiased { depth: 3 }).unwrap();
        assert_eq!(rooms.len(), 1);
        assert_eq!(rooms[0].cell_count, 8);
        // The trifling triple is gone entirely.
        assert_eq!(grid.get(1, 1).kind, TerrainKind::Stone);
        assert_eq!(grid.get(1, 2).room_id, None);
        // Exactly one region drew lighting: at most two draws in the log.
        assert!(rng.take_log().len() <= 2);
    }

    #[test]
    fn every_foreground_cell_ends_labeled() {
        let mut grid = grid_from_rows(&[
            "          ",
            " ......   ",
            " ..  ..   ",
            " ......   ",
            "          ",
        ]);
        let mut rng = DungeonRng::new(2);
        identify_regions(&mut grid, &mut rng, LightingMode::Forced { lit: true }).unwrap();
        for y in 0..5 {
            for x in 0..10 {
                let cell = grid.get(x, y);
                if cell.kind == TerrainKind::Floor {
                    assert!(cell.room_id.is_some(), "unlabeled floor at ({x}, {y})");
                } else {
                    assert_eq!(cell.room_id, None);
                }
            }
        }
    }
}
