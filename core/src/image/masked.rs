use ndarray::Array2;

use crate::geom::Box2I;
use crate::image::pixel::{CoaddPixel, MaskPixel};

/// Three-plane 2D grid: per-pixel value, quality flags, and variance.
///
/// All planes are congruent and share one origin offset `(x0, y0)` locating
/// the grid within the shared mosaic frame. Storage is row-major with shape
/// `(height, width)`.
#[derive(Debug, Clone)]
pub struct MaskedImage<P> {
    image: Array2<P>,
    mask: Array2<MaskPixel>,
    variance: Array2<P>,
    x0: i32,
    y0: i32,
}

impl<P: CoaddPixel> MaskedImage<P> {
    /// Blank masked image at origin (0, 0): zero values, zero variance,
    /// no flags set.
    pub fn new(width: usize, height: usize) -> Self {
        Self {
            image: Array2::zeros((height, width)),
            mask: Array2::zeros((height, width)),
            variance: Array2::zeros((height, width)),
            x0: 0,
            y0: 0,
        }
    }

    /// Relocates the grid's origin within the shared frame.
    pub fn with_xy0(mut self, x0: i32, y0: i32) -> Self {
        self.x0 = x0;
        self.y0 = y0;
        self
    }

    pub fn width(&self) -> usize {
        self.image.ncols()
    }

    pub fn height(&self) -> usize {
        self.image.nrows()
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

    pub fn image(&self) -> &Array2<P> {
        &self.image
    }

    pub fn image_mut(&mut self) -> &mut Array2<P> {
        &mut self.image
    }

    pub fn mask(&self) -> &Array2<MaskPixel> {
        &self.mask
    }

    pub fn mask_mut(&mut self) -> &mut Array2<MaskPixel> {
        &mut self.mask
    }

    pub fn variance(&self) -> &Array2<P> {
        &self.variance
    }

    pub fn variance_mut(&mut self) -> &mut Array2<P> {
        &mut self.variance
    }

    /// Simultaneous mutable access to the value and mask planes.
    pub fn value_and_mask_mut(&mut self) -> (&mut Array2<P>, &mut Array2<MaskPixel>) {
        (&mut self.image, &mut self.mask)
    }

    /// Reads the value plane at local coordinates `(x, y)`.
    pub fn value(&self, x: usize, y: usize) -> P {
        self.image[[y, x]]
    }

    pub fn flags(&self, x: usize, y: usize) -> MaskPixel {
        self.mask[[y, x]]
    }

    pub fn variance_at(&self, x: usize, y: usize) -> P {
        self.variance[[y, x]]
    }

    /// Writes all three planes at local coordinates `(x, y)`.
    pub fn set_pixel(&mut self, x: usize, y: usize, value: P, flags: MaskPixel, variance: P) {
        self.image[[y, x]] = value;
        self.mask[[y, x]] = flags;
        self.variance[[y, x]] = variance;
    }

    /// Fills every pixel of all three planes with one triple.
    pub fn fill(&mut self, value: P, flags: MaskPixel, variance: P) {
        self.image.fill(value);
        self.mask.fill(flags);
        self.variance.fill(variance);
    }
}
