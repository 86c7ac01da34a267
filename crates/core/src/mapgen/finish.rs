//! Final transforms: hazard reclassification, wall derivation, wall spine
//! orientation, and lighting.
//!
//! Hazard marking is the only draw consumer here and runs first, one
//! `uniform(20)` per foreground cell in row-major order. Wall derivation
//! reads a snapshot so late-derived walls never influence earlier cells.

use crate::rng::DungeonRng;
use crate::types::{GenerationError, TerrainKind};

use super::grid::{LevelGrid, NEIGHBORS_8};
use super::model::RoomInfo;

/// Chance denominator for hazard reclassification: one in twenty floor
/// cells becomes hazard terrain.
const HAZARD_ONE_IN: i32 = 20;

/// Reclassify a random subset of floor cells as hazard terrain.
pub(super) fn mark_hazards(
    grid: &mut LevelGrid,
    rng: &mut DungeonRng,
) -> Result<(), GenerationError> {
    for y in 1..grid.height() - 1 {
        for x in 1..grid.width() - 1 {
            if grid.kind(x as i32, y as i32) == TerrainKind::Floor
                && rng.uniform(HAZARD_ONE_IN)? == 0
            {
                grid.at_mut(x, y).kind = TerrainKind::Hazard;
            }
        }
    }
    Ok(())
}

/// Turn every background cell that touches foreground (8-adjacent) into a
/// wall. The provisional orientation comes from the first open neighbor in
/// the fixed probe order: a vertically offset neighbor makes a horizontal
/// wall, a same-row neighbor a vertical one. Spine refinement follows.
pub(super) fn wallify(grid: &mut LevelGrid) {
    let snapshot = grid.clone();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if snapshot.kind(x, y) != TerrainKind::Stone {
                continue;
            }
            for (dx, dy) in NEIGHBORS_8 {
                if snapshot.kind(x + dx, y + dy).is_open() {
                    grid.at_mut(x as usize, y as usize).kind =
                        if dy != 0 { TerrainKind::WallH } else { TerrainKind::WallV };
                    break;
                }
            }
        }
    }
}

/// Final wall sub-types from the fixed 16-entry spine table, indexed by
/// which of the four cardinal directions a wall spine extends into
/// (N bit 3, S bit 2, E bit 1, W bit 0). Mask 0 is a free-standing wall
/// and keeps its provisional type.
const SPINE_TABLE: [TerrainKind; 16] = [
    TerrainKind::WallV,    // 0b0000 free-standing (unused)
    TerrainKind::WallH,    // 0b0001 W
    TerrainKind::WallH,    // 0b0010 E
    TerrainKind::WallH,    // 0b0011 E+W
    TerrainKind::WallV,    // 0b0100 S
    TerrainKind::CornerTr, // 0b0101 S+W
    TerrainKind::CornerTl, // 0b0110 S+E
    TerrainKind::TeeDown,  // 0b0111 S+E+W
    TerrainKind::WallV,    // 0b1000 N
    TerrainKind::CornerBr, // 0b1001 N+W
    TerrainKind::CornerBl, // 0b1010 N+E
    TerrainKind::TeeUp,    // 0b1011 N+E+W
    TerrainKind::WallV,    // 0b1100 N+S
    TerrainKind::TeeLeft,  // 0b1101 N+S+W
    TerrainKind::TeeRight, // 0b1110 N+S+E
    TerrainKind::Cross,    // 0b1111
];

fn is_wall_at(grid: &LevelGrid, x: i32, y: i32) -> bool {
    grid.in_bounds(x, y) && grid.kind(x, y).is_wall()
}

/// Wall or solid rock; everything off-grid counts as rock.
fn is_solid_at(grid: &LevelGrid, x: i32, y: i32) -> bool {
    if !grid.in_bounds(x, y) {
        return true;
    }
    let kind = grid.kind(x, y);
    kind == TerrainKind::Stone || kind.is_wall()
}

/// Whether a wall spine extends from the center into direction (dx, dy).
/// A wall must be there, and the flanking solid pattern must be broken
/// somewhere; a spine fully buried in rock does not count.
fn spine_extends(solid: &[[bool; 3]; 3], wall_there: bool, dx: i32, dy: i32) -> bool {
    if !wall_there {
        return false;
    }
    if dx != 0 {
        let nx = (1 + dx) as usize;
        !(solid[1][0] && solid[1][2] && solid[nx][0] && solid[nx][2])
    } else {
        let ny = (1 + dy) as usize;
        !(solid[0][1] && solid[2][1] && solid[0][ny] && solid[2][ny])
    }
}

/// Rewrite every wall cell's sub-type from the spine table.
pub(super) fn refine_wall_spines(grid: &mut LevelGrid) {
    let snapshot = grid.clone();
    for y in 0..grid.height() as i32 {
        for x in 0..grid.width() as i32 {
            if !snapshot.kind(x, y).is_wall() {
                continue;
            }

            let mut solid = [[false; 3]; 3];
            for (ix, column) in solid.iter_mut().enumerate() {
                for (iy, entry) in column.iter_mut().enumerate() {
                    *entry = is_solid_at(&snapshot, x + ix as i32 - 1, y + iy as i32 - 1);
                }
            }

            let north = spine_extends(&solid, is_wall_at(&snapshot, x, y - 1), 0, -1);
            let south = spine_extends(&solid, is_wall_at(&snapshot, x, y + 1), 0, 1);
            let east = spine_extends(&solid, is_wall_at(&snapshot, x + 1, y), 1, 0);
            let west = spine_extends(&solid, is_wall_at(&snapshot, x - 1, y), -1, 0);

            let mask = usize::from(north) << 3
                | usize::from(south) << 2
                | usize::from(east) << 1
                | usize::from(west);
            if mask != 0 {
                grid.at_mut(x as usize, y as usize).kind = SPINE_TABLE[mask];
            }
        }
    }
}

/// Apply each room's lit flag to its member cells (corridors carry the id
/// of the region that absorbed them). Hazard cells glow on their own and
/// are always lit.
pub(super) fn apply_lighting(grid: &mut LevelGrid, rooms: &[RoomInfo]) {
    let mut lit_by_id = vec![false; rooms.len()];
    for room in rooms {
        if let Some(slot) = lit_by_id.get_mut(room.id as usize) {
            *slot = room.lit;
        }
    }
    for y in 0..grid.height() {
        for x in 0..grid.width() {
            let cell = grid.at_mut(x, y);
            if cell.kind == TerrainKind::Hazard {
                cell.lit = true;
            } else if let Some(id) = cell.room_id
                && *lit_by_id.get(id as usize).unwrap_or(&false)
            {
                cell.lit = true;
            }
        }
    }
}
