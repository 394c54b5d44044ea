// Warp module - Square-to-disc projection of the 16x16 grid
//
// Grid coordinates are rescaled from [-0.5, 15.5] to [-1, 1] (half a cell of
// slack on each side, so edge cells aren't pinned to the disc boundary) and
// pushed through the elliptical square-to-disc warp. Each cell's maximum dot
// size comes from the distance between its warped diagonal corners, so dots
// shrink where the warp compresses cells and grow near the center.

use crate::digits::{GRID_CELLS, GRID_SIZE};
use crate::types::map_range;

const MIN_COORD: f32 = -0.5;
const MAX_COORD: f32 = 15.5;

// Fraction of the corner diagonal a dot may fill at |value| = 1.
const DOT_SCALE: f32 = 0.18;

/// Elliptical square-to-disc warp.
pub fn polar(x: f32, y: f32) -> (f32, f32) {
    (x * (1.0 - y * y / 2.0).sqrt(), y * (1.0 - x * x / 2.0).sqrt())
}

fn dist(p1: (f32, f32), p2: (f32, f32)) -> f32 {
    ((p2.0 - p1.0) * (p2.0 - p1.0) + (p2.1 - p1.1) * (p2.1 - p1.1)).sqrt()
}

/// One cell's place on the unit disc plus its radius allowance.
#[derive(Debug, Clone, Copy)]
pub struct DotPlacement {
    /// Warped position, each axis in [-1, 1].
    pub x: f32,
    pub y: f32,
    /// Maximum dot radius in the same normalized units.
    pub max_size: f32,
}

fn warp_cell(x: usize, y: usize) -> DotPlacement {
    let xp = map_range(x as f32, MIN_COORD, MAX_COORD, -1.0, 1.0);
    let yp = map_range(y as f32, MIN_COORD, MAX_COORD, -1.0, 1.0);
    let xw = map_range(x as f32 - 1.0, MIN_COORD, MAX_COORD, -1.0, 1.0);
    let yn = map_range(y as f32 - 1.0, MIN_COORD, MAX_COORD, -1.0, 1.0);
    let xe = map_range(x as f32 + 1.0, MIN_COORD, MAX_COORD, -1.0, 1.0);
    let ys = map_range(y as f32 + 1.0, MIN_COORD, MAX_COORD, -1.0, 1.0);

    let (px, py) = polar(xp, yp);
    let pnw = polar(xw, yn);
    let pne = polar(xe, yn);
    let psw = polar(xw, ys);
    let pse = polar(xe, ys);
    let max_size = dist(pnw, pse).min(dist(pne, psw)) * DOT_SCALE;

    DotPlacement { x: px, y: py, max_size }
}

/// Warped placements for all 256 cells. The warp doesn't depend on time, so
/// this is computed once and reused every frame.
#[derive(Debug, Clone)]
pub struct CellLayout {
    placements: [DotPlacement; GRID_CELLS],
}

impl Default for CellLayout {
    fn default() -> Self {
        Self::new()
    }
}

impl CellLayout {
    pub fn new() -> Self {
        let mut placements = [DotPlacement { x: 0.0, y: 0.0, max_size: 0.0 }; GRID_CELLS];
        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                placements[x + GRID_SIZE * y] = warp_cell(x, y);
            }
        }
        CellLayout { placements }
    }

    pub fn get(&self, x: usize, y: usize) -> DotPlacement {
        self.placements[x + GRID_SIZE * y]
    }

    #[cfg(test)]
    pub fn iter(&self) -> impl Iterator<Item = &DotPlacement> {
        self.placements.iter()
    }
}
