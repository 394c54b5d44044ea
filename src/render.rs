// Render module - Frame orchestration over an abstract drawing surface
//
// The renderer owns the digit smoothing buffer and the precomputed warp
// layout; everything else is recomputed per frame from the timestamp. The
// host supplies the surface, the bounds, and an overlay callback.

use crate::digits::{DigitLayer, GRID_SIZE};
use crate::field::{compose, PatternSelect};
use crate::types::{map_range, FrameTime, Rgb};
use crate::warp::CellLayout;

/// Minimal drawing surface the watchface needs from its host.
pub trait Surface {
    fn clear(&mut self, color: Rgb);
    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb);
}

/// Rectangular drawing bounds in surface units.
#[derive(Debug, Clone, Copy)]
pub struct Bounds {
    pub width: f32,
    pub height: f32,
}

impl Bounds {
    pub fn center(&self) -> (f32, f32) {
        (self.width / 2.0, self.height / 2.0)
    }

    /// Half the smaller dimension: the radius of the display disc.
    pub fn max_dim(&self) -> f32 {
        self.width.min(self.height) / 2.0
    }
}

/// Paints for positive and negative intensities.
#[derive(Debug, Clone, Copy)]
pub struct Paints {
    pub positive: Rgb,
    pub negative: Rgb,
}

impl Default for Paints {
    fn default() -> Self {
        Paints {
            positive: Rgb::WHITE,
            negative: Rgb { r: 255, g: 62, b: 75 },
        }
    }
}

pub struct FaceRenderer {
    digits: DigitLayer,
    layout: CellLayout,
    pub paints: Paints,
    pub select: PatternSelect,
}

impl FaceRenderer {
    pub fn new(paints: Paints, select: PatternSelect) -> Self {
        FaceRenderer {
            digits: DigitLayer::new(),
            layout: CellLayout::new(),
            paints,
            select,
        }
    }

    /// Render one frame. The overlay callback runs right after the background
    /// clear, before any dots: the dot field overdraws overlay content.
    pub fn render<S: Surface>(
        &mut self,
        surface: &mut S,
        bounds: Bounds,
        now: FrameTime,
        overlay: impl FnOnce(&mut S, FrameTime),
    ) {
        let (center_x, center_y) = bounds.center();
        let max_dim = bounds.max_dim();

        surface.clear(Rgb::BLACK);
        overlay(surface, now);

        self.digits.update(now.hour, now.minute, now.epoch_ms);
        let grid = compose(&self.digits, now.seconds(), self.select);

        for y in 0..GRID_SIZE {
            for x in 0..GRID_SIZE {
                let v = grid[x + GRID_SIZE * y];
                let p = self.layout.get(x, y);
                let radius = map_range(v.abs(), 0.0, 1.0, 0.0, max_dim * p.max_size);
                let color = if v >= 0.0 { self.paints.positive } else { self.paints.negative };
                surface.fill_circle(
                    map_range(p.x, -1.0, 1.0, center_x - max_dim, center_x + max_dim),
                    map_range(p.y, -1.0, 1.0, center_y - max_dim, center_y + max_dim),
                    radius,
                    color,
                );
            }
        }
    }
}
