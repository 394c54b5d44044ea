// Digits module - Bitmap clock digits composited into the 16x16 field
//
// Four 4x5 digit glyphs (hour tens/units, minute tens/units) occupy rows
// 6..=10 at column offsets 0/4/8/12, plus a pulsing colon at column 8.
// Each affected cell is exponentially smoothed toward its target every frame,
// which morphs one digit into the next instead of snapping.

use std::f64::consts::PI;

use crate::types::lerp;

pub const GRID_SIZE: usize = 16;
pub const GRID_CELLS: usize = GRID_SIZE * GRID_SIZE;

// 5 rows x 4 bits per digit, highest bit = leftmost column.
const FONT: [u8; 50] = [
    // 0
    0b0011, 0b0101, 0b0101, 0b0101, 0b0110,
    // 1
    0b0010, 0b0110, 0b0010, 0b0010, 0b0111,
    // 2
    0b0110, 0b0001, 0b0010, 0b0100, 0b0111,
    // 3
    0b0110, 0b0001, 0b0011, 0b0001, 0b0110,
    // 4
    0b0001, 0b0101, 0b0111, 0b0001, 0b0001,
    // 5
    0b0111, 0b0100, 0b0110, 0b0001, 0b0110,
    // 6
    0b0011, 0b0100, 0b0110, 0b0101, 0b0010,
    // 7
    0b0111, 0b0001, 0b0010, 0b0100, 0b0100,
    // 8
    0b0011, 0b0101, 0b0010, 0b0101, 0b0110,
    // 9
    0b0011, 0b0101, 0b0111, 0b0001, 0b0110,
];

// Smoothing factor per frame: new = old * 0.9 + target * 0.1.
const SMOOTHING_ALPHA: f32 = 0.1;

const DIGIT_ROW_OFFSET: usize = 6;

/// Colon pulse, a pure function of epoch milliseconds.
pub fn colon_pulse(epoch_ms: i64) -> f32 {
    pulse_at(epoch_ms as f64) as f32
}

fn pulse_at(ms: f64) -> f64 {
    (ms / (PI * 125.0)).sin()
}

/// The digit intensity layer. This buffer is the only state retained across
/// frames; everything else is recomputed from the timestamp.
#[derive(Clone, Debug)]
pub struct DigitLayer {
    values: [f32; GRID_CELLS],
}

impl Default for DigitLayer {
    fn default() -> Self {
        Self::new()
    }
}

impl DigitLayer {
    pub fn new() -> Self {
        DigitLayer { values: [0.0; GRID_CELLS] }
    }

    /// Advance the smoothing state one frame toward the glyphs for
    /// `hour`/`minute`, then stamp the colon pulse.
    pub fn update(&mut self, hour: u8, minute: u8, epoch_ms: i64) {
        let ha = (hour / 10) as usize;
        let hb = (hour % 10) as usize;
        let ma = (minute / 10) as usize;
        let mb = (minute % 10) as usize;

        for row in 0..5 {
            let hour_tens_bits = FONT[ha * 5 + row];
            let hour_units_bits = FONT[hb * 5 + row];
            let min_tens_bits = FONT[ma * 5 + row];
            let min_units_bits = FONT[mb * 5 + row];

            for col in 0..4 {
                let mask = 0b1000 >> col;
                // Hour digits render in the negative paint, minute digits in
                // the positive one. A leading zero hour blanks its glyph.
                let hour_tens_target = if hour_tens_bits & mask != 0 {
                    if ha == 0 { 0.0 } else { -1.0 }
                } else {
                    0.0
                };
                let hour_units_target = if hour_units_bits & mask != 0 { -1.0 } else { 0.0 };
                let min_tens_target = if min_tens_bits & mask != 0 { 1.0 } else { 0.0 };
                let min_units_target = if min_units_bits & mask != 0 { 1.0 } else { 0.0 };

                let base = GRID_SIZE * (row + DIGIT_ROW_OFFSET) + col;
                self.smooth(base, hour_tens_target);
                self.smooth(base + 4, hour_units_target);
                self.smooth(base + 8, min_tens_target);
                self.smooth(base + 12, min_units_target);
            }
        }

        // The colon overwrites its two cells rather than blending.
        let colon = colon_pulse(epoch_ms);
        self.values[GRID_SIZE * 7 + 8] = colon;
        self.values[GRID_SIZE * 9 + 8] = colon;
    }

    fn smooth(&mut self, idx: usize, target: f32) {
        self.values[idx] = lerp(SMOOTHING_ALPHA, self.values[idx], target);
    }

    pub fn get(&self, x: usize, y: usize) -> f32 {
        self.values[GRID_SIZE * y + x]
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn settle(layer: &mut DigitLayer, hour: u8, minute: u8, frames: usize) {
        for _ in 0..frames {
            layer.update(hour, minute, 0);
        }
    }

    // Lit cells of a glyph within its 4-column block.
    fn glyph_cells(digit: usize, col_offset: usize) -> Vec<(usize, usize)> {
        let mut cells = Vec::new();
        for row in 0..5 {
            for col in 0..4 {
                if FONT[digit * 5 + row] & (0b1000 >> col) != 0 {
                    cells.push((col_offset + col, row + DIGIT_ROW_OFFSET));
                }
            }
        }
        cells
    }

    #[test]
    fn test_smoothing_converges_geometrically() {
        let mut layer = DigitLayer::new();
        // Minute units "0", top-right lit cell of the glyph.
        let (x, y) = glyph_cells(0, 12)[0];

        for k in 1..=60u32 {
            layer.update(0, 0, 0);
            let expected = 1.0 - 0.9f32.powi(k as i32);
            let got = layer.get(x, y);
            assert!((got - expected).abs() < 1e-4, "frame {}: {} vs {}", k, got, expected);
            assert!(got >= 0.0 && got <= 1.0);
        }
    }

    #[test]
    fn test_hour_tens_blanking() {
        // 07:xx -> hour tens is 0, so its glyph is suppressed entirely.
        let mut layer = DigitLayer::new();
        settle(&mut layer, 7, 30, 200);
        for (x, y) in glyph_cells(0, 0) {
            assert!(layer.get(x, y).abs() < 1e-6, "cell ({},{}) not blanked", x, y);
        }

        // 17:xx -> hour tens shows "1" in the negative direction.
        let mut layer = DigitLayer::new();
        settle(&mut layer, 17, 30, 200);
        for (x, y) in glyph_cells(1, 0) {
            assert!((layer.get(x, y) + 1.0).abs() < 1e-4, "cell ({},{}) = {}", x, y, layer.get(x, y));
        }
    }

    #[test]
    fn test_digit_signs_12_34() {
        let mut layer = DigitLayer::new();
        settle(&mut layer, 12, 34, 300);

        for (x, y) in glyph_cells(1, 0) {
            assert!(layer.get(x, y) < -0.99); // hour tens "1"
        }
        for (x, y) in glyph_cells(2, 4) {
            assert!(layer.get(x, y) < -0.99); // hour units "2"
        }
        for (x, y) in glyph_cells(3, 8) {
            // Colon cells are overwritten after smoothing.
            if (x, y) == (8, 7) || (x, y) == (8, 9) {
                continue;
            }
            assert!(layer.get(x, y) > 0.99); // minute tens "3"
        }
        for (x, y) in glyph_cells(4, 12) {
            assert!(layer.get(x, y) > 0.99); // minute units "4"
        }
    }

    #[test]
    fn test_midnight_steady_state() {
        let mut layer = DigitLayer::new();
        settle(&mut layer, 0, 0, 300);

        // Hour tens blanked at 00:xx.
        for (x, y) in glyph_cells(0, 0) {
            assert!(layer.get(x, y).abs() < 1e-4);
        }
        // Hour units "0" negative, minute digits "0" positive.
        for (x, y) in glyph_cells(0, 4) {
            assert!(layer.get(x, y) < -0.99);
        }
        for (x, y) in glyph_cells(0, 12) {
            assert!(layer.get(x, y) > 0.99);
        }
        // Unlit cells stay at rest.
        assert!(layer.get(0, 0).abs() < 1e-6);
        assert!(layer.get(15, 15).abs() < 1e-6);
    }

    #[test]
    fn test_colon_cells_track_pulse() {
        let mut layer = DigitLayer::new();
        let ms = 123_456_789;
        layer.update(9, 41, ms);
        let expected = colon_pulse(ms);
        assert_eq!(layer.get(8, 7), expected);
        assert_eq!(layer.get(8, 9), expected);
    }

    #[test]
    fn test_colon_pulse_periodic_and_bounded() {
        // sin(ms / (125 pi)) repeats when the argument advances by 2 pi,
        // i.e. every 250 pi^2 milliseconds.
        let period = 250.0 * PI * PI;
        for k in 0..50 {
            let ms = k as f64 * 97.3;
            assert!((pulse_at(ms) - pulse_at(ms + period)).abs() < 1e-9);
            assert!(pulse_at(ms).abs() <= 1.0);
        }
    }
}
