// Patterns module - Procedural scalar fields driving the background motion
//
// Each pattern is a pure closed-form function of (t, i, x, y): epoch seconds,
// flattened cell index, and integer grid coordinates. Values are unbounded
// and may go non-finite (acos out of domain, division near zero); the field
// composer clamps them before they reach a radius or color decision.

use crate::types::lerp64;

pub const PATTERN_COUNT: usize = 8;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Pattern {
    Noise = 0,
    Raindrops = 1,
    AlienDialogue = 2,
    Circles = 3,
    Sunrise = 4,
    HeartPulse = 5,
    HeartShell = 6,
    Xor = 7,
}

pub const ALL_PATTERNS: [Pattern; PATTERN_COUNT] = [
    Pattern::Noise,
    Pattern::Raindrops,
    Pattern::AlienDialogue,
    Pattern::Circles,
    Pattern::Sunrise,
    Pattern::HeartPulse,
    Pattern::HeartShell,
    Pattern::Xor,
];

impl Pattern {
    pub fn from_index(index: usize) -> Self {
        ALL_PATTERNS[index % PATTERN_COUNT]
    }

    pub fn from_string(s: &str) -> Option<Self> {
        match s.to_lowercase().as_str() {
            "noise" => Some(Pattern::Noise),
            "raindrops" | "rain" => Some(Pattern::Raindrops),
            "alien" | "alien_dialogue" | "dialogue" => Some(Pattern::AlienDialogue),
            "circles" | "waves" => Some(Pattern::Circles),
            "sunrise" | "sun" => Some(Pattern::Sunrise),
            "heart" | "heart1" | "heart_pulse" => Some(Pattern::HeartPulse),
            "heart2" | "heart_shell" => Some(Pattern::HeartShell),
            "xor" => Some(Pattern::Xor),
            _ => None,
        }
    }

    pub fn next(&self) -> Self {
        Self::from_index(*self as usize + 1)
    }

    pub fn name(&self) -> &'static str {
        match self {
            Pattern::Noise => "noise",
            Pattern::Raindrops => "raindrops",
            Pattern::AlienDialogue => "alien_dialogue",
            Pattern::Circles => "circles",
            Pattern::Sunrise => "sunrise",
            Pattern::HeartPulse => "heart_pulse",
            Pattern::HeartShell => "heart_shell",
            Pattern::Xor => "xor",
        }
    }

    /// Evaluate this pattern at epoch seconds `t`, cell index `i`, grid
    /// coordinates `(x, y)` with 0 <= x, y < 16.
    pub fn eval(&self, t: f64, i: i32, x: i32, y: i32) -> f64 {
        let (xf, yf, fi) = (x as f64, y as f64, i as f64);
        match self {
            Pattern::Noise => (t + fi + (x * y) as f64).cos(),
            Pattern::Raindrops => -0.4 / ((xf - t % 10.0).hypot(yf - t % 8.0) - (t % 2.0) * 9.0),
            Pattern::AlienDialogue => 1.0 / 32.0 * (t / 64.0 * xf * ((fi - xf).tan())).tan(),
            Pattern::Circles => (xf / 2.0).sin() - (xf - t).sin() - yf + 6.0,
            Pattern::Sunrise => {
                -((xf - 7.5) * (xf - 7.5) + (yf - 14.0) * (yf - 14.0)).sqrt() * 0.05
                    + ((xf - 7.5).atan2(yf - 14.0) * 12.0 + t).sin()
            }
            Pattern::HeartPulse => {
                let dx = (xf - 7.0).abs();
                let dy = yf - 9.0 + dx * 0.8;
                -((t.sin() * 9.0 + 25.0 - dx.hypot(dy).powi(2)) / 5.0).acos()
            }
            Pattern::HeartShell => {
                let dx = xf - 8.0;
                hypot3(dx, yf - 9.0 + dx.abs(), t.sin() * 2.0) - 5.0
            }
            Pattern::Xor => 6.0 * t.cos() + 3.0 * (t / 3.0).cos() - (x ^ y) as f64 + 7.5,
        }
    }
}

fn hypot3(x: f64, y: f64, z: f64) -> f64 {
    (x * x + y * y + z * z).sqrt()
}

/// Quintic easing: 0 below 0, 1 above 1, x^3 * (6x^2 - 15x + 10) between.
pub fn smootherstep(x: f64) -> f64 {
    if x > 1.0 {
        1.0
    } else if x < 0.0 {
        0.0
    } else {
        x * x * x * (10.0 - 15.0 * x + 6.0 * x * x)
    }
}

/// Cross-fade between adjacent library entries. The continuous selector `n`
/// picks patterns floor(n) and floor(n)+1 (cyclic); the eased factor is zero
/// for the first 90% of each unit interval, so a pattern holds nearly static
/// and then crossfades into the next over the last 10%.
pub fn mix(t: f64, i: i32, x: i32, y: i32, n: f64) -> f64 {
    let base = n.floor();
    let n_a = (base as usize) % PATTERN_COUNT;
    let n_b = (n_a + 1) % PATTERN_COUNT;
    let frac = n - base;
    let stepped = smootherstep(10.0 * frac - 9.0);

    // Hold phase: don't evaluate the next pattern at all. Besides skipping
    // work, this keeps a NaN from the inactive pattern out of the lerp.
    if stepped == 0.0 {
        return ALL_PATTERNS[n_a].eval(t, i, x, y);
    }

    lerp64(
        stepped,
        ALL_PATTERNS[n_a].eval(t, i, x, y),
        ALL_PATTERNS[n_b].eval(t, i, x, y),
    )
}

#[cfg(test)]
fn assert_same_value(a: f64, b: f64) {
    assert!(a == b || (a.is_nan() && b.is_nan()), "{} != {}", a, b);
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::clamp_finite;

    #[test]
    fn test_from_string() {
        assert_eq!(Pattern::from_string("noise"), Some(Pattern::Noise));
        assert_eq!(Pattern::from_string("XOR"), Some(Pattern::Xor));
        assert_eq!(Pattern::from_string("rain"), Some(Pattern::Raindrops));
        assert_eq!(Pattern::from_string("bogus"), None);
    }

    #[test]
    fn test_next_cycles() {
        let mut p = Pattern::Noise;
        for _ in 0..PATTERN_COUNT {
            p = p.next();
        }
        assert_eq!(p, Pattern::Noise);
        assert_eq!(Pattern::Xor.next(), Pattern::Noise);
    }

    #[test]
    fn test_all_patterns_clamp_finite() {
        // Sweep times chosen to hit the raindrops near-zero denominator and
        // the acos out-of-domain region; the clamped value must always land
        // in [-1, 1] with no NaN leaking through.
        let times = [0.0, 0.5, 1.0, 9.999, 1234.5678, 1.7e9, 1.7e9 + 0.125];
        for p in ALL_PATTERNS {
            for &t in &times {
                for y in 0..16 {
                    for x in 0..16 {
                        let v = p.eval(t, x + 16 * y, x, y);
                        let c = clamp_finite(v as f32, -1.0, 1.0);
                        assert!(c.is_finite(), "{:?} t={} -> {}", p, t, c);
                        assert!((-1.0..=1.0).contains(&c));
                    }
                }
            }
        }
    }

    #[test]
    fn test_xor_value() {
        // At t where cos terms are known: t = 0 gives 6 + 3 = 9.
        let v = Pattern::Xor.eval(0.0, 0, 5, 3);
        let expected = 9.0 - (5 ^ 3) as f64 + 7.5;
        assert!((v - expected).abs() < 1e-12);
    }

    #[test]
    fn test_noise_bounded() {
        for x in 0..16 {
            let v = Pattern::Noise.eval(42.0, x, x, 7);
            assert!(v.abs() <= 1.0);
        }
    }

    #[test]
    fn test_smootherstep_endpoints() {
        assert_eq!(smootherstep(-9.0), 0.0);
        assert_eq!(smootherstep(0.0), 0.0);
        assert_eq!(smootherstep(1.0), 1.0);
        assert_eq!(smootherstep(5.0), 1.0);
        assert!((smootherstep(0.5) - 0.5).abs() < 1e-12);
    }

    #[test]
    fn test_smootherstep_monotonic() {
        let mut prev = 0.0;
        for k in 0..=100 {
            let v = smootherstep(k as f64 / 100.0);
            assert!(v >= prev);
            prev = v;
        }
    }

    #[test]
    fn test_mix_holds_at_integer_selector() {
        // frac = 0 -> stepped = smootherstep(-9) = 0 -> pure pattern floor(n).
        let t = 12345.678;
        for k in 0..PATTERN_COUNT {
            let n = k as f64;
            let mixed = mix(t, 37, 5, 2, n);
            let held = Pattern::from_index(k).eval(t, 37, 5, 2);
            assert_same_value(mixed, held);
        }
    }

    #[test]
    fn test_mix_reaches_next_at_interval_end() {
        // frac = 0.9999 -> stepped ~= 1 -> essentially the next pattern.
        let t = 777.0;
        let mixed = mix(t, 0, 3, 11, 0.9999);
        let next = Pattern::Raindrops.eval(t, 0, 3, 11);
        assert!((mixed - next).abs() < 1e-3);
    }

    #[test]
    fn test_mix_wraps_library() {
        let t = 55.5;
        let mixed = mix(t, 9, 1, 1, 7.0);
        assert_same_value(mixed, Pattern::Xor.eval(t, 9, 1, 1));
        // Selector far beyond the library size still lands on index mod 8.
        let mixed = mix(t, 9, 1, 1, 8.0 * 1_000.0 + 2.0);
        assert_same_value(mixed, Pattern::AlienDialogue.eval(t, 9, 1, 1));
    }
}
