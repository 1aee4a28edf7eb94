pub mod masked;
pub mod pixel;
pub mod plane;
pub mod simple;

pub use masked::MaskedImage;
pub use pixel::{CoaddPixel, MaskPixel, WeightPixel};
pub use plane::{bad_pixel_mask_from_planes, mask_plane_bit, EDGE_PLANE};
pub use simple::Image;
