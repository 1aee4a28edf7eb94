//! Core chi-squared coaddition for the Rust coadd platform.
//!
//! The modules mirror the classic chi-squared coaddition stack while
//! providing safe grid containers, explicit precondition checks, and a
//! single generic accumulation kernel shared by every supported pixel
//! representation.

pub mod accumulate;
pub mod coadd;
pub mod geom;
pub mod image;
pub mod prelude;
pub mod telemetry;

pub use accumulate::{add_to_coadd, add_to_coadd_aligned};
pub use coadd::{Coadd, CoaddConfig};
pub use geom::Box2I;
pub use image::{CoaddPixel, Image, MaskPixel, MaskedImage, WeightPixel};
pub use prelude::{CoaddError, CoaddResult};
