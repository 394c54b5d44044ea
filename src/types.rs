// Shared types module - Common types and math helpers used across modules
use anyhow::Result;
use time::OffsetDateTime;

// RGB color representation
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const WHITE: Rgb = Rgb { r: 255, g: 255, b: 255 };
    pub const BLACK: Rgb = Rgb { r: 0, g: 0, b: 0 };

    pub fn from_hex(hex: &str) -> Result<Self> {
        let hex = hex.trim_start_matches('#');
        if hex.len() != 6 {
            anyhow::bail!("Invalid hex color: {}", hex);
        }
        Ok(Rgb {
            r: u8::from_str_radix(&hex[0..2], 16)?,
            g: u8::from_str_radix(&hex[2..4], 16)?,
            b: u8::from_str_radix(&hex[4..6], 16)?,
        })
    }
}

// One frame's view of the clock: epoch milliseconds plus the local
// hour/minute the digit layer displays.
#[derive(Clone, Copy, Debug)]
pub struct FrameTime {
    pub epoch_ms: i64,
    pub hour: u8,
    pub minute: u8,
    pub second: u8,
}

impl FrameTime {
    /// Read the wall clock. Falls back to UTC when the local offset
    /// cannot be determined (e.g. multi-threaded Unix processes).
    pub fn now() -> Self {
        let now = OffsetDateTime::now_local().unwrap_or_else(|_| OffsetDateTime::now_utc());
        FrameTime {
            epoch_ms: (now.unix_timestamp_nanos() / 1_000_000) as i64,
            hour: now.hour(),
            minute: now.minute(),
            second: now.second(),
        }
    }

    /// Epoch time in seconds, the `t` fed to every pattern function.
    pub fn seconds(&self) -> f64 {
        self.epoch_ms as f64 / 1000.0
    }
}

/// Linearly rescale `value` from [from_start, from_end] to [to_start, to_end].
/// Extrapolates outside the source range; callers clamp when they need to.
pub fn map_range(value: f32, from_start: f32, from_end: f32, to_start: f32, to_end: f32) -> f32 {
    to_start + (to_end - to_start) * ((value - from_start) / (from_end - from_start))
}

/// Linear interpolation: `value` = 0 gives `start`, 1 gives `end`.
pub fn lerp(value: f32, start: f32, end: f32) -> f32 {
    start + (end - start) * value
}

pub fn lerp64(value: f64, start: f64, end: f64) -> f64 {
    start + (end - start) * value
}

/// Clamp to [a, b], treating NaN as 0. The pattern functions are allowed to
/// produce NaN (acos out of domain, division by near-zero); a NaN must never
/// reach a radius or color decision.
pub fn clamp_finite(x: f32, a: f32, b: f32) -> f32 {
    if x.is_nan() {
        0.0
    } else {
        x.max(a).min(b)
    }
}
