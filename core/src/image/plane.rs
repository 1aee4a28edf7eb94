use crate::image::pixel::MaskPixel;
use crate::prelude::{CoaddError, CoaddResult};

/// Fixed mask-plane registry: plane name and bit position within the flag
/// word.
const MASK_PLANES: &[(&str, u8)] = &[
    ("BAD", 0),
    ("SAT", 1),
    ("INTRP", 2),
    ("CR", 3),
    ("EDGE", 4),
    ("DETECTED", 5),
    ("SUSPECT", 6),
    ("NO_DATA", 7),
];

/// Plane set on coadd pixels that received no contribution at all.
pub const EDGE_PLANE: &str = "EDGE";

/// Flag word with only the named plane's bit set.
pub fn mask_plane_bit(name: &str) -> CoaddResult<MaskPixel> {
    MASK_PLANES
        .iter()
        .find(|(plane, _)| *plane == name)
        .map(|(_, bit)| 1 << bit)
        .ok_or_else(|| CoaddError::InvalidParameter(format!("unknown mask plane: {name}")))
}

/// OR of the named planes' bits, used as a bad-pixel mask.
pub fn bad_pixel_mask_from_planes<S: AsRef<str>>(names: &[S]) -> CoaddResult<MaskPixel> {
    let mut mask = 0;
    for name in names {
        mask |= mask_plane_bit(name.as_ref())?;
    }
    Ok(mask)
}
