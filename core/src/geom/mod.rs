use serde::{Deserialize, Serialize};

/// Integer rectangle in the shared mosaic coordinate frame.
///
/// A grid's footprint runs from its origin `(x0, y0)` to
/// `(x0 + width, y0 + height)` exclusive. Extents are never negative; an
/// intersection that comes up empty normalizes to zero extent.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Box2I {
    x0: i32,
    y0: i32,
    width: usize,
    height: usize,
}

impl Box2I {
    pub fn new(x0: i32, y0: i32, width: usize, height: usize) -> Self {
        Self {
            x0,
            y0,
            width,
            height,
        }
    }

    pub fn min_x(&self) -> i32 {
        self.x0
    }

    pub fn min_y(&self) -> i32 {
        self.y0
    }

    /// Exclusive upper x bound.
    pub fn max_x(&self) -> i32 {
        self.x0 + self.width as i32
    }

    /// Exclusive upper y bound.
    pub fn max_y(&self) -> i32 {
        self.y0 + self.height as i32
    }

    pub fn width(&self) -> usize {
        self.width
    }

    pub fn height(&self) -> usize {
        self.height
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    pub fn area(&self) -> usize {
        self.width * self.height
    }

    /// Rectangular intersection of two footprints, possibly empty.
    pub fn intersection(&self, other: &Box2I) -> Box2I {
        let x0 = self.x0.max(other.x0);
        let y0 = self.y0.max(other.y0);
        let x1 = self.max_x().min(other.max_x());
        let y1 = self.max_y().min(other.max_y());
        if x1 <= x0 || y1 <= y0 {
            Box2I::new(x0, y0, 0, 0)
        } else {
            Box2I::new(x0, y0, (x1 - x0) as usize, (y1 - y0) as usize)
        }
    }

    pub fn contains(&self, x: i32, y: i32) -> bool {
        x >= self.x0 && y >= self.y0 && x < self.max_x() && y < self.max_y()
    }
}
