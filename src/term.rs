// Terminal module - RGB pixel frame and half-block rendering for the TUI
//
// The watchface draws into a PixelFrame through the Surface trait; the frame
// is then shown in the terminal as rows of half-block characters, packing two
// pixel rows into each character cell (foreground = upper, background =
// lower).

use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};

use crate::render::{Bounds, Surface};
use crate::types::Rgb;

pub struct PixelFrame {
    width: usize,
    height: usize,
    pixels: Vec<Rgb>,
}

impl PixelFrame {
    pub fn new(width: usize, height: usize) -> Self {
        PixelFrame {
            width,
            height,
            pixels: vec![Rgb::BLACK; width * height],
        }
    }

    pub fn bounds(&self) -> Bounds {
        Bounds {
            width: self.width as f32,
            height: self.height as f32,
        }
    }

    pub fn get(&self, x: usize, y: usize) -> Rgb {
        self.pixels[y * self.width + x]
    }

    /// Convert to terminal rows, two pixel rows per character row using the
    /// upper-half-block glyph.
    pub fn to_lines(&self) -> Vec<Line<'static>> {
        let mut lines = Vec::with_capacity(self.height / 2);
        for row in 0..self.height / 2 {
            let mut spans = Vec::with_capacity(self.width);
            for x in 0..self.width {
                let upper = self.get(x, row * 2);
                let lower = self.get(x, row * 2 + 1);
                spans.push(Span::styled(
                    "\u{2580}",
                    Style::default()
                        .fg(Color::Rgb(upper.r, upper.g, upper.b))
                        .bg(Color::Rgb(lower.r, lower.g, lower.b)),
                ));
            }
            lines.push(Line::from(spans));
        }
        lines
    }
}

impl Surface for PixelFrame {
    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fill_circle(&mut self, cx: f32, cy: f32, radius: f32, color: Rgb) {
        if !radius.is_finite() || radius <= 0.0 {
            return;
        }

        let x_min = ((cx - radius).floor().max(0.0)) as usize;
        let y_min = ((cy - radius).floor().max(0.0)) as usize;
        let x_max = ((cx + radius).ceil().min(self.width as f32 - 1.0)) as usize;
        let y_max = ((cy + radius).ceil().min(self.height as f32 - 1.0)) as usize;
        let r2 = radius * radius;

        for py in y_min..=y_max {
            for px in x_min..=x_max {
                // Sample at the pixel center.
                let dx = px as f32 + 0.5 - cx;
                let dy = py as f32 + 0.5 - cy;
                if dx * dx + dy * dy <= r2 {
                    self.pixels[py * self.width + px] = color;
                }
            }
        }
    }
}
