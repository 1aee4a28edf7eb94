use std::fmt::Debug;
use std::ops::AddAssign;

use num_traits::{Float, Zero};

/// Quality-flag word attached to every masked-image pixel.
pub type MaskPixel = u16;

/// Value/variance representations accepted for coadd and exposure pixels.
///
/// The accumulation formula needs a square root, so only floating-point
/// representations qualify.
pub trait CoaddPixel: Float + AddAssign + Debug + 'static {}

impl CoaddPixel for f32 {}
impl CoaddPixel for f64 {}

/// Representations accepted for weight-map pixels and the per-exposure
/// weight scalar.
pub trait WeightPixel: Copy + PartialEq + AddAssign + Zero + Debug + 'static {}

impl WeightPixel for f64 {}
impl WeightPixel for f32 {}
impl WeightPixel for i32 {}
impl WeightPixel for u16 {}
