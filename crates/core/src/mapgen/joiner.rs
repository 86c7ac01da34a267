//! Corridor carving that joins every identified region into one.
//!
//! Pair selection is deterministic: the working list starts in discovery
//! order and the first two entries are always joined next; the merged
//! entry is removed with `swap_remove`, so the selection sequence is fully
//! determined by the room table. Draws are consumed by endpoint picking
//! and by per-step path jitter, in that order.

use crate::rng::DungeonRng;
use crate::types::{GenerationError, Pos, TerrainKind};

use super::grid::LevelGrid;
use super::model::RoomInfo;

/// Hard cap on corridor attempts for one generation run. Exceeding it
/// fails the attempt; the caller decides whether to reseed and rerun.
const JOIN_ATTEMPT_BUDGET: u32 = 200;

/// Rejection-sampling tries before falling back to an exhaustive scan.
const PICK_TRY_LIMIT: u32 = 100;

/// Safety valve on corridor length; never reached by the monotone walk on
/// sane dimensions.
const CORRIDOR_STEP_LIMIT: u32 = 500;

/// Join all regions into a single connected area.
pub(super) fn join_regions(
    grid: &mut LevelGrid,
    rng: &mut DungeonRng,
    rooms: &[RoomInfo],
) -> Result<(), GenerationError> {
    if rooms.len() <= 1 {
        return Ok(());
    }

    let mut pending: Vec<usize> = (0..rooms.len()).collect();
    let mut attempts = 0u32;

    while pending.len() > 1 {
        let first = &rooms[pending[0]];
        let second = &rooms[pending[1]];
        loop {
            if attempts >= JOIN_ATTEMPT_BUDGET {
                return Err(GenerationError::RetryExhausted {
                    attempts,
                    message: format!(
                        "could not connect region {} to region {}",
                        second.id, first.id
                    ),
                });
            }
            attempts += 1;
            let from = pick_point(grid, rng, first)?;
            let to = pick_point(grid, rng, second)?;
            if dig_corridor(grid, rng, from, to, first.id)? {
                break;
            }
        }
        pending.swap_remove(1);
    }

    Ok(())
}

/// Random cell belonging to the region: per try one x draw then one y draw
/// inside the bounding box, with an exhaustive row-major fallback.
fn pick_point(
    grid: &LevelGrid,
    rng: &mut DungeonRng,
    room: &RoomInfo,
) -> Result<Pos, GenerationError> {
    let member = |x: i32, y: i32| {
        let cell = grid.get(x, y);
        cell.kind == TerrainKind::Floor && cell.room_id == Some(room.id)
    };

    for _ in 0..PICK_TRY_LIMIT {
        let x = rng.uniform_from(room.bounds.width(), room.bounds.lx)?;
        let y = rng.uniform_from(room.bounds.height(), room.bounds.ly)?;
        if member(x, y) {
            return Ok(Pos { y, x });
        }
    }
    for y in room.bounds.ly..=room.bounds.hy {
        for x in room.bounds.lx..=room.bounds.hx {
            if member(x, y) {
                return Ok(Pos { y, x });
            }
        }
    }
    Err(GenerationError::invalid(format!("region {} has no member cells", room.id)))
}

/// Walk from `from` to `to` one cell per step, always toward the target,
/// carving floor through background. Existing floor is passed through; any
/// other terrain aborts the attempt. When both axis distances are nonzero,
/// `uniform(dix + diy)` against the lagging axis decides whether to turn.
fn dig_corridor(
    grid: &mut LevelGrid,
    rng: &mut DungeonRng,
    from: Pos,
    to: Pos,
    carve_id: u16,
) -> Result<bool, GenerationError> {
    let (mut x, mut y) = (from.x, from.y);
    let (tx, ty) = (to.x, to.y);

    let (mut dx, mut dy) = if tx > x {
        (1, 0)
    } else if ty > y {
        (0, 1)
    } else if tx < x {
        (-1, 0)
    } else if ty < y {
        (0, -1)
    } else {
        return Ok(true);
    };

    let mut steps = 0u32;
    loop {
        x += dx;
        y += dy;
        steps += 1;
        if steps > CORRIDOR_STEP_LIMIT || !grid.in_interior(x, y) {
            return Ok(false);
        }

        match grid.kind(x, y) {
            TerrainKind::Stone => {
                let cell = grid.at_mut(x as usize, y as usize);
                cell.kind = TerrainKind::Floor;
                cell.room_id = Some(carve_id);
            }
            kind if kind.is_open() => {}
            _ => return Ok(false),
        }

        if x == tx && y == ty {
            return Ok(true);
        }

        let dix = (tx - x).abs();
        let diy = (ty - y).abs();

        // Reached the target column or row: the turn is forced, no draw.
        if dx != 0 && dix == 0 {
            dx = 0;
            dy = if ty > y { 1 } else { -1 };
            continue;
        }
        if dy != 0 && diy == 0 {
            dy = 0;
            dx = if tx > x { 1 } else { -1 };
            continue;
        }

        // Both axes still lag: jitter toward the other one.
        if dx != 0 && diy > 0 && rng.uniform(dix + diy)? < diy {
            dx = 0;
            dy = if ty > y { 1 } else { -1 };
        } else if dy != 0 && dix > 0 && rng.uniform(dix + diy)? < dix {
            dy = 0;
            dx = if tx > x { 1 } else { -1 };
        }
    }
}
