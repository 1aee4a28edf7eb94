//! Post-accumulation normalization helpers.

use ndarray::Array2;

use crate::image::{CoaddPixel, Image, MaskPixel, MaskedImage, WeightPixel};
use crate::prelude::{CoaddError, CoaddResult};

/// Sets `edge_bit` on every mask pixel whose weight is zero, marking coadd
/// pixels that received no contribution from any exposure.
pub fn set_coadd_edge_bits<W: WeightPixel>(
    mask: &mut Array2<MaskPixel>,
    weight_map: &Image<W>,
    edge_bit: MaskPixel,
) -> CoaddResult<()> {
    if mask.dim() != weight_map.pixels().dim() {
        return Err(CoaddError::InvalidParameter(format!(
            "mask and weight map dimensions differ: {}x{} != {}x{}",
            mask.ncols(),
            mask.nrows(),
            weight_map.width(),
            weight_map.height()
        )));
    }
    for (mask_pixel, &weight) in mask.iter_mut().zip(weight_map.pixels().iter()) {
        if weight == W::zero() {
            *mask_pixel |= edge_bit;
        }
    }
    Ok(())
}

/// Divides the coadd's value plane by the weight map (and the variance plane
/// by its square). Zero-weight pixels are left as they are; callers flag
/// them via [`set_coadd_edge_bits`].
pub fn divide_by_weight_map<P>(coadd: &mut MaskedImage<P>, weight_map: &Image<P>) -> CoaddResult<()>
where
    P: CoaddPixel + WeightPixel,
{
    if coadd.dimensions() != weight_map.dimensions() {
        return Err(CoaddError::InvalidParameter(format!(
            "coadd and weight map dimensions differ: {}x{} != {}x{}",
            coadd.width(),
            coadd.height(),
            weight_map.width(),
            weight_map.height()
        )));
    }
    for (value, &weight) in coadd.image_mut().iter_mut().zip(weight_map.pixels().iter()) {
        if weight != P::zero() {
            *value = *value / weight;
        }
    }
    for (variance, &weight) in coadd
        .variance_mut()
        .iter_mut()
        .zip(weight_map.pixels().iter())
    {
        if weight != P::zero() {
            *variance = *variance / (weight * weight);
        }
    }
    Ok(())
}
