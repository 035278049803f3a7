//! Waveform rendering to PNG
//!
//! The image shows one period on a black background: x runs from 0 % to
//! 100 % of the period, y from -1.05 to 1.05. A dotted gray grid marks the
//! quarter periods and half amplitudes, with solid center lines, a white
//! frame and the trace in yellow.

use std::fs;
use std::path::Path;

use crate::config::PlotConfig;
use crate::waveform::Waveform;
use crate::{ArbError, Result};

/// RGBA color
pub type Rgba = [u8; 4];

/// Background
pub const BLACK: Rgba = [0, 0, 0, 255];
/// Grid lines
pub const GRAY: Rgba = [128, 128, 128, 255];
/// Frame
pub const WHITE: Rgba = [255, 255, 255, 255];
/// Trace
pub const YELLOW: Rgba = [255, 255, 0, 255];

/// Visible amplitude range
const Y_LIMIT: f64 = 1.05;

/// Grid positions along x, in percent of the period
const X_TICKS: [f64; 5] = [0.0, 25.0, 50.0, 75.0, 100.0];

/// Grid positions along y
const Y_TICKS: [f64; 5] = [-1.0, -0.5, 0.0, 0.5, 1.0];

/// RGBA8 pixel buffer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Canvas {
    /// Width in pixels
    pub width: u32,
    /// Height in pixels
    pub height: u32,
    /// Row-major RGBA bytes
    pub pixels: Vec<u8>,
}

impl Canvas {
    /// Canvas filled with one color
    #[must_use]
    pub fn new(width: u32, height: u32, fill: Rgba) -> Self {
        let pixels = fill.repeat(width as usize * height as usize);
        Self {
            width,
            height,
            pixels,
        }
    }

    /// Color at a pixel
    #[must_use]
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgba> {
        let i = self.offset(i64::from(x), i64::from(y))?;
        let mut color = [0; 4];
        color.copy_from_slice(&self.pixels[i..i + 4]);
        Some(color)
    }

    fn offset(&self, x: i64, y: i64) -> Option<usize> {
        if x < 0 || y < 0 || x >= i64::from(self.width) || y >= i64::from(self.height) {
            return None;
        }
        Some((y as usize * self.width as usize + x as usize) * 4)
    }

    fn put(&mut self, x: i64, y: i64, color: Rgba) {
        if let Some(i) = self.offset(x, y) {
            self.pixels[i..i + 4].copy_from_slice(&color);
        }
    }

    fn hline(&mut self, x0: i64, x1: i64, y: i64, color: Rgba, dotted: bool) {
        for x in x0..=x1 {
            if !dotted || (x / 2) % 2 == 0 {
                self.put(x, y, color);
            }
        }
    }

    fn vline(&mut self, x: i64, y0: i64, y1: i64, color: Rgba, dotted: bool) {
        for y in y0..=y1 {
            if !dotted || (y / 2) % 2 == 0 {
                self.put(x, y, color);
            }
        }
    }

    /// Bresenham line
    fn line(&mut self, (mut x0, mut y0): (i64, i64), (x1, y1): (i64, i64), color: Rgba) {
        let dx = (x1 - x0).abs();
        let dy = -(y1 - y0).abs();
        let sx = if x0 < x1 { 1 } else { -1 };
        let sy = if y0 < y1 { 1 } else { -1 };
        let mut err = dx + dy;

        loop {
            self.put(x0, y0, color);
            if x0 == x1 && y0 == y1 {
                break;
            }
            let e2 = 2 * err;
            if e2 >= dy {
                err += dy;
                x0 += sx;
            }
            if e2 <= dx {
                err += dx;
                y0 += sy;
            }
        }
    }
}

/// Maps period percent and amplitude into pixel coordinates
struct Frame {
    left: i64,
    right: i64,
    top: i64,
    bottom: i64,
}

impl Frame {
    fn new(config: &PlotConfig) -> Self {
        let margin = i64::from(config.margin);
        Self {
            left: margin,
            right: i64::from(config.width) - 1 - margin,
            top: margin,
            bottom: i64::from(config.height) - 1 - margin,
        }
    }

    fn x(&self, percent: f64) -> i64 {
        let span = (self.right - self.left) as f64;
        self.left + (percent / 100.0 * span).round() as i64
    }

    fn y(&self, amplitude: f64) -> i64 {
        let span = (self.bottom - self.top) as f64;
        let clipped = amplitude.clamp(-Y_LIMIT, Y_LIMIT);
        self.top + ((Y_LIMIT - clipped) / (2.0 * Y_LIMIT) * span).round() as i64
    }
}

/// Rasterize one waveform period
#[must_use]
pub fn render(waveform: &Waveform, config: &PlotConfig) -> Canvas {
    let mut canvas = Canvas::new(config.width, config.height, BLACK);
    let frame = Frame::new(config);

    for percent in X_TICKS {
        canvas.vline(frame.x(percent), frame.top, frame.bottom, GRAY, true);
    }
    for amplitude in Y_TICKS {
        canvas.hline(frame.left, frame.right, frame.y(amplitude), GRAY, true);
    }

    // Thicker center lines
    let (cx, cy) = (frame.x(50.0), frame.y(0.0));
    for offset in 0..2 {
        canvas.vline(cx + offset, frame.top, frame.bottom, GRAY, false);
        canvas.hline(frame.left, frame.right, cy + offset, GRAY, false);
    }

    let points: Vec<(i64, i64)> = waveform
        .samples()
        .iter()
        .enumerate()
        .filter(|(_, v)| v.is_finite())
        .map(|(i, &v)| (frame.x(Waveform::phase(i) * 100.0), frame.y(v)))
        .collect();
    for pair in points.windows(2) {
        canvas.line(pair[0], pair[1], YELLOW);
    }

    canvas.hline(frame.left, frame.right, frame.top, WHITE, false);
    canvas.hline(frame.left, frame.right, frame.bottom, WHITE, false);
    canvas.vline(frame.left, frame.top, frame.bottom, WHITE, false);
    canvas.vline(frame.right, frame.top, frame.bottom, WHITE, false);

    canvas
}

/// Encode a canvas as PNG bytes
///
/// # Errors
///
/// Returns `Png` if the encoder rejects the image
pub fn encode_png(canvas: &Canvas) -> Result<Vec<u8>> {
    let mut out = Vec::new();

    let mut encoder = png::Encoder::new(&mut out, canvas.width, canvas.height);
    encoder.set_color(png::ColorType::Rgba);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_compression(png::Compression::Default);

    let mut writer = encoder
        .write_header()
        .map_err(|e| ArbError::Png(e.to_string()))?;
    writer
        .write_image_data(&canvas.pixels)
        .map_err(|e| ArbError::Png(e.to_string()))?;
    writer.finish().map_err(|e| ArbError::Png(e.to_string()))?;

    Ok(out)
}

/// Render a waveform and write it as a PNG file
///
/// # Errors
///
/// Returns error if encoding or writing fails
pub fn write_png(path: &Path, waveform: &Waveform, config: &PlotConfig) -> Result<()> {
    let bytes = encode_png(&render(waveform, config))?;
    fs::write(path, bytes)?;
    Ok(())
}
