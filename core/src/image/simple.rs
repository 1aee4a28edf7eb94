use ndarray::Array2;

use crate::geom::Box2I;
use crate::image::pixel::WeightPixel;

/// Single-plane 2D grid with an origin offset in the shared mosaic frame.
///
/// Pixels are stored row-major with shape `(height, width)`. Used for the
/// weight map that runs alongside a coadd.
#[derive(Debug, Clone)]
pub struct Image<W> {
    pixels: Array2<W>,
    x0: i32,
    y0: i32,
}

impl<W: WeightPixel> Image<W> {
    /// Zero-filled image at origin (0, 0).
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            pixels: Array2::zeros((height, width)),
            x0: 0,
            y0: 0,
        }
    }

    /// Uniformly filled image at origin (0, 0).
    pub fn filled(width: usize, height: usize, value: W) -> Self {
        Self {
            pixels: Array2::from_elem((height, width), value),
            x0: 0,
            y0: 0,
        }
    }

    /// Relocates the image's origin within the shared frame.
    pub fn with_xy0(mut self, x0: i32, y0: i32) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    pub fn width(&self) -> usize {
        self.pixels.ncols()
    }

    pub fn height(&self) -> usize {
        self.pixels.nrows()
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.width(), self.height())
    }

    pub fn x0(&self) -> i32 {
        self.x0
    }

    pub fn y0(&self) -> i32 {
        self.y0
    }

    /// Footprint in the shared frame.
    pub fn bbox(&self) -> Box2I {
        Box2I::new(self.x0, self.y0, self.width(), self.height())
    }

    /// Reads the pixel at local coordinates `(x, y)`.
    pub fn get(&self, x: usize, y: usize) -> W {
        self.pixels[[y, x]]
    }

    pub fn set(&mut self, x: usize, y: usize, value: W) {
        self.pixels[[y, x]] = value;
    }

    pub fn pixels(&self) -> &Array2<W> {
        &self.pixels
    }

    pub fn pixels_mut(&mut self) -> &mut Array2<W> {
        &mut self.pixels
    }
}
