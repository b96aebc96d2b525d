//! Drawing of cells and grids onto anything implementing [Canvas]. Colours are supplied
//! through a [Palette] rather than being global, so several grids can be drawn with
//! different styles.
use serde::Deserialize;
use std::io::{self, Write};

use crate::cell::CellState;

#[derive(Clone, Copy, Debug, PartialEq, Eq, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

pub const WHITE: Rgb = Rgb(255, 255, 255);
pub const RED: Rgb = Rgb(252, 51, 51);
pub const ORANGE: Rgb = Rgb(255, 100, 0);
pub const BLACK: Rgb = Rgb(0, 0, 0);
pub const PURPLE: Rgb = Rgb(6, 65, 179);
pub const BLUE: Rgb = Rgb(2, 189, 247);
pub const GREEN: Rgb = Rgb(1, 174, 0);
pub const GREY: Rgb = Rgb(106, 106, 106);

/// Colour of every [CellState] plus the grid lines.
#[derive(Clone, Debug, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Palette {
    pub empty: Rgb,
    pub open: Rgb,
    pub closed: Rgb,
    pub barrier: Rgb,
    pub start: Rgb,
    pub end: Rgb,
    pub path: Rgb,
    pub grid_lines: Rgb,
}

impl Default for Palette {
    fn default() -> Palette {
        Palette {
            empty: WHITE,
            open: ORANGE,
            closed: RED,
            barrier: BLACK,
            start: PURPLE,
            end: BLUE,
            path: GREEN,
            grid_lines: GREY,
        }
    }
}

impl Palette {
    pub fn color(&self, state: CellState) -> Rgb {
        match state {
            CellState::Empty => self.empty,
            CellState::Open => self.open,
            CellState::Closed => self.closed,
            CellState::Barrier => self.barrier,
            CellState::Start => self.start,
            CellState::End => self.end,
            CellState::Path => self.path,
        }
    }
}

/// A 2D surface that can draw filled rectangles and axis-aligned lines.
pub trait Canvas {
    fn clear(&mut self, color: Rgb);
    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb);
    /// Draws a line between two pixel positions. Only horizontal and vertical lines are
    /// needed for grids.
    fn line(&mut self, from: (u32, u32), to: (u32, u32), color: Rgb);
}

/// In-memory RGB raster that can be saved as a binary PPM image.
#[derive(Clone, Debug)]
pub struct FrameBuffer {
    width: u32,
    height: u32,
    pixels: Vec<Rgb>,
}

impl FrameBuffer {
    pub fn new(width: u32, height: u32) -> FrameBuffer {
        FrameBuffer {
            width,
            height,
            pixels: vec![WHITE; width as usize * height as usize],
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    /// Returns the pixel at `(x, y)` or [None] outside the buffer.
    pub fn pixel(&self, x: u32, y: u32) -> Option<Rgb> {
        if x < self.width && y < self.height {
            Some(self.pixels[y as usize * self.width as usize + x as usize])
        } else {
            None
        }
    }

    fn put(&mut self, x: u32, y: u32, color: Rgb) {
        if x < self.width && y < self.height {
            self.pixels[y as usize * self.width as usize + x as usize] = color;
        }
    }

    pub fn write_ppm<W: Write>(&self, mut writer: W) -> io::Result<()> {
        write!(writer, "P6\n{} {}\n255\n", self.width, self.height)?;
        let bytes = self
            .pixels
            .iter()
            .flat_map(|&Rgb(r, g, b)| [r, g, b])
            .collect::<Vec<u8>>();
        writer.write_all(&bytes)?;
        writer.flush()
    }
}

impl Canvas for FrameBuffer {
    fn clear(&mut self, color: Rgb) {
        self.pixels.fill(color);
    }

    fn fill_rect(&mut self, x: u32, y: u32, width: u32, height: u32, color: Rgb) {
        let x_end = x.saturating_add(width).min(self.width);
        let y_end = y.saturating_add(height).min(self.height);
        for py in y..y_end {
            for px in x..x_end {
                self.put(px, py, color);
            }
        }
    }

    fn line(&mut self, from: (u32, u32), to: (u32, u32), color: Rgb) {
        let (x0, x1) = (from.0.min(to.0), from.0.max(to.0));
        let (y0, y1) = (from.1.min(to.1), from.1.max(to.1));
        if from.1 == to.1 {
            for x in x0..=x1 {
                self.put(x, from.1, color);
            }
        } else if from.0 == to.0 {
            for y in y0..=y1 {
                self.put(from.0, y, color);
            }
        } else {
            // Stepped line between the two endpoints.
            let steps = (x1 - x0).max(y1 - y0);
            for i in 0..=steps {
                let x = from.0 as i64 + (to.0 as i64 - from.0 as i64) * i as i64 / steps as i64;
                let y = from.1 as i64 + (to.1 as i64 - from.1 as i64) * i as i64 / steps as i64;
                self.put(x as u32, y as u32, color);
            }
        }
    }
}
