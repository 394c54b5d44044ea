// Field module - Per-frame composition of the 16x16 intensity grid
//
// Blends the smoothed digit layer with the procedural pattern mix per cell.
// Rows near the digit band (|y - 8| <= 2) show the digits; rows far from it
// (|y - 8| >= 7) show the pattern, with a linear transition between.

use crate::digits::{DigitLayer, GRID_CELLS, GRID_SIZE};
use crate::patterns::{mix, Pattern};
use crate::types::{clamp_finite, lerp, map_range};

/// How the background pattern is chosen each frame.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PatternSelect {
    /// Walk the library continuously: selector = t * speed.
    Cycle { speed: f64 },
    /// Hold one library entry.
    Fixed(Pattern),
}

impl PatternSelect {
    fn eval(&self, t: f64, i: i32, x: i32, y: i32) -> f64 {
        match *self {
            PatternSelect::Cycle { speed } => mix(t, i, x, y, t * speed),
            PatternSelect::Fixed(p) => p.eval(t, i, x, y),
        }
    }
}

/// Compose the final grid for epoch-seconds `t`. Every value is finite and
/// clamped to [-1, 1].
pub fn compose(digits: &DigitLayer, t: f64, select: PatternSelect) -> [f32; GRID_CELLS] {
    let mut grid = [0.0f32; GRID_CELLS];

    for y in 0..GRID_SIZE {
        let weight = clamp_finite(
            map_range((y as f32 - 8.0).abs(), 2.0, 7.0, 0.0, 1.0),
            0.0,
            1.0,
        );
        for x in 0..GRID_SIZE {
            let i = (x + GRID_SIZE * y) as i32;
            let pattern = clamp_finite(
                select.eval(t, i, x as i32, y as i32) as f32,
                -1.0,
                1.0,
            );
            let blended = lerp(weight, digits.get(x, y), pattern);
            grid[x + GRID_SIZE * y] = clamp_finite(blended, -1.0, 1.0);
        }
    }

    grid
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settled_digits(hour: u8, minute: u8) -> DigitLayer {
        let mut layer = DigitLayer::new();
        for _ in 0..300 {
            layer.update(hour, minute, 0);
        }
        layer
    }

    #[test]
    fn test_all_cells_clamped() {
        let digits = settled_digits(12, 34);
        for &t in &[0.0, 17.3, 9_999.25, 1.7e9] {
            let grid = compose(&digits, t, PatternSelect::Cycle { speed: 0.025 });
            for v in grid {
                assert!(v.is_finite());
                assert!((-1.0..=1.0).contains(&v));
            }
        }
    }

    #[test]
    fn test_digit_band_shows_digits() {
        let digits = settled_digits(12, 34);
        let grid = compose(&digits, 1234.5, PatternSelect::Cycle { speed: 0.025 });

        // |y - 8| <= 2 -> weight clamps to 0 -> pure digit layer.
        for y in 6..=10 {
            for x in 0..GRID_SIZE {
                assert_eq!(grid[x + GRID_SIZE * y], clamp_finite(digits.get(x, y), -1.0, 1.0));
            }
        }
    }

    #[test]
    fn test_outer_rows_show_pattern() {
        let digits = settled_digits(12, 34);
        let select = PatternSelect::Fixed(Pattern::Noise);
        let grid = compose(&digits, 42.0, select);

        // y = 15 -> |y - 8| = 7 -> weight 1 -> pure (clamped) pattern.
        for x in 0..GRID_SIZE {
            let i = (x + GRID_SIZE * 15) as i32;
            let expected = clamp_finite(Pattern::Noise.eval(42.0, i, x as i32, 15) as f32, -1.0, 1.0);
            assert_eq!(grid[x + GRID_SIZE * 15], expected);
        }
        // y = 0 -> |y - 8| = 8 -> weight still clamped to 1.
        for x in 0..GRID_SIZE {
            let i = x as i32;
            let expected = clamp_finite(Pattern::Noise.eval(42.0, i, x as i32, 0) as f32, -1.0, 1.0);
            assert_eq!(grid[x], expected);
        }
    }

    #[test]
    fn test_transition_band_interpolates() {
        let digits = settled_digits(0, 0);
        let select = PatternSelect::Fixed(Pattern::Noise);
        let t = 7.0;
        let grid = compose(&digits, t, select);

        // Row 12: |y - 8| = 4 -> weight = (4 - 2) / 5 = 0.4.
        let y = 12;
        for x in 0..GRID_SIZE {
            let i = (x + GRID_SIZE * y) as i32;
            let pattern = clamp_finite(Pattern::Noise.eval(t, i, x as i32, y as i32) as f32, -1.0, 1.0);
            let expected = clamp_finite(lerp(0.4, digits.get(x, y), pattern), -1.0, 1.0);
            assert!((grid[x + GRID_SIZE * y] - expected).abs() < 1e-6);
        }
    }
}
