//! The accumulation kernel: add one exposure into a running chi-squared
//! coadd and its weight map.
//!
//! For good pixels (`exposure.mask & bad_pixel_mask == 0`) the kernel applies
//!
//! ```text
//! coadd.image  += (exposure.image / sqrt(exposure.variance))^2
//! coadd.mask   |= exposure.mask
//! weight_map   += weight
//! ```
//!
//! Bad pixels are skipped entirely. The coadd's variance plane is never
//! touched. The sqrt-then-square form is canonical; zero or negative
//! exposure variance produces ordinary NaN/Inf results that propagate into
//! the coadd unfiltered. Rejecting such pixels is the caller's job, via the
//! bad-pixel mask.

use crate::geom::Box2I;
use crate::image::{CoaddPixel, Image, MaskPixel, MaskedImage, WeightPixel};
use crate::prelude::{CoaddError, CoaddResult};

/// Per-pixel accumulation rule shared by both kernel variants.
#[inline]
fn accumulate_pixel<P: CoaddPixel, W: WeightPixel>(
    coadd_value: &mut P,
    coadd_flags: &mut MaskPixel,
    weight_pixel: &mut W,
    value: P,
    variance: P,
    flags: MaskPixel,
    bad_pixel_mask: MaskPixel,
    weight: W,
) {
    if flags & bad_pixel_mask != 0 {
        return;
    }
    let sn = value / variance.sqrt();
    *coadd_value += sn * sn;
    *coadd_flags |= flags;
    *weight_pixel += weight;
}

fn check_congruent<P: CoaddPixel, W: WeightPixel>(
    coadd: &MaskedImage<P>,
    weight_map: &Image<W>,
) -> CoaddResult<()> {
    if coadd.dimensions() != weight_map.dimensions() {
        return Err(CoaddError::InvalidParameter(format!(
            "coadd and weight map dimensions differ: {}x{} != {}x{}",
            coadd.width(),
            coadd.height(),
            weight_map.width(),
            weight_map.height()
        )));
    }
    Ok(())
}

/// Adds good pixels of `exposure` to `coadd` and `weight_map` over the
/// spatial overlap of the two footprints.
///
/// The coadd and weight map must be congruent in both dimensions and origin;
/// the exposure may sit anywhere in the shared frame. Returns the overlap
/// region in shared-frame coordinates. An empty overlap is a normal outcome:
/// the empty region is returned and nothing is read or written.
pub fn add_to_coadd<P, W>(
    coadd: &mut MaskedImage<P>,
    weight_map: &mut Image<W>,
    exposure: &MaskedImage<P>,
    bad_pixel_mask: MaskPixel,
    weight: W,
) -> CoaddResult<Box2I>
where
    P: CoaddPixel,
    W: WeightPixel,
{
    check_congruent(coadd, weight_map)?;
    if (coadd.x0(), coadd.y0()) != (weight_map.x0(), weight_map.y0()) {
        return Err(CoaddError::InvalidParameter(format!(
            "coadd and weight map xy0 differ: ({},{}) != ({},{})",
            coadd.x0(),
            coadd.y0(),
            weight_map.x0(),
            weight_map.y0()
        )));
    }

    let overlap = coadd.bbox().intersection(&exposure.bbox());
    if overlap.is_empty() {
        return Ok(overlap);
    }

    // Local offset of the overlap within each grid. The overlap is contained
    // in both footprints, so these never go negative.
    let cx = (overlap.min_x() - coadd.x0()) as usize;
    let cy = (overlap.min_y() - coadd.y0()) as usize;
    let ex = (overlap.min_x() - exposure.x0()) as usize;
    let ey = (overlap.min_y() - exposure.y0()) as usize;

    let (coadd_image, coadd_mask) = coadd.value_and_mask_mut();
    let weights = weight_map.pixels_mut();
    for row in 0..overlap.height() {
        for col in 0..overlap.width() {
            let flags = exposure.mask()[[ey + row, ex + col]];
            let value = exposure.image()[[ey + row, ex + col]];
            let variance = exposure.variance()[[ey + row, ex + col]];
            accumulate_pixel(
                &mut coadd_image[[cy + row, cx + col]],
                &mut coadd_mask[[cy + row, cx + col]],
                &mut weights[[cy + row, cx + col]],
                value,
                variance,
                flags,
                bad_pixel_mask,
                weight,
            );
        }
    }
    Ok(overlap)
}

/// Adds good pixels of `exposure` to `coadd` and `weight_map`, with all
/// three grids required to share one footprint.
///
/// Origins are not compared; traversal runs over the full grid with
/// synchronized local indices. Per-pixel behavior matches [`add_to_coadd`].
pub fn add_to_coadd_aligned<P, W>(
    coadd: &mut MaskedImage<P>,
    weight_map: &mut Image<W>,
    exposure: &MaskedImage<P>,
    bad_pixel_mask: MaskPixel,
    weight: W,
) -> CoaddResult<()>
where
    P: CoaddPixel,
    W: WeightPixel,
{
    check_congruent(coadd, weight_map)?;
    if exposure.dimensions() != coadd.dimensions() {
        return Err(CoaddError::InvalidParameter(format!(
            "exposure and coadd dimensions differ: {}x{} != {}x{}",
            exposure.width(),
            exposure.height(),
            coadd.width(),
            coadd.height()
        )));
    }

    let (height, width) = (coadd.height(), coadd.width());
    let (coadd_image, coadd_mask) = coadd.value_and_mask_mut();
    let weights = weight_map.pixels_mut();
    for row in 0..height {
        for col in 0..width {
            let flags = exposure.mask()[[row, col]];
            let value = exposure.image()[[row, col]];
            let variance = exposure.variance()[[row, col]];
            accumulate_pixel(
                &mut coadd_image[[row, col]],
                &mut coadd_mask[[row, col]],
                &mut weights[[row, col]],
                value,
                variance,
                flags,
                bad_pixel_mask,
                weight,
            );
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::prelude::CoaddError;

    fn one_pixel_setup() -> (MaskedImage<f64>, Image<f64>, MaskedImage<f64>) {
        let mut coadd = MaskedImage::<f64>::new(1, 1);
        coadd.set_pixel(0, 0, 1.0, 0, 0.0);
        let mut weight_map = Image::<f64>::new(1, 1);
        weight_map.set(0, 0, 0.1);
        let mut exposure = MaskedImage::<f64>::new(1, 1);
        exposure.set_pixel(0, 0, 6.0, 0, 4.0);
        (coadd, weight_map, exposure)
    }

    #[test]
    fn good_pixel_accumulates_squared_signal_to_noise() {
        let (mut coadd, mut weight_map, exposure) = one_pixel_setup();
        let overlap = add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 2.5).unwrap();
        assert_eq!(overlap, Box2I::new(0, 0, 1, 1));
        assert_eq!(coadd.value(0, 0), 1.0 + (6.0f64 / 2.0).powi(2));
        assert_eq!(coadd.flags(0, 0), 0);
        assert_eq!(weight_map.get(0, 0), 0.1 + 2.5);
    }

    #[test]
    fn bad_pixel_is_skipped_entirely() {
        let (mut coadd, mut weight_map, mut exposure) = one_pixel_setup();
        exposure.set_pixel(0, 0, 6.0, 0b01, 4.0);
        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0b01, 2.5).unwrap();
        assert_eq!(coadd.value(0, 0), 1.0);
        assert_eq!(coadd.flags(0, 0), 0);
        assert_eq!(weight_map.get(0, 0), 0.1);
    }

    #[test]
    fn exposure_flags_union_into_coadd_mask() {
        let (mut coadd, mut weight_map, mut exposure) = one_pixel_setup();
        coadd.set_pixel(0, 0, 1.0, 0b10, 0.0);
        exposure.set_pixel(0, 0, 6.0, 0b01, 4.0);
        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 2.5).unwrap();
        assert_eq!(coadd.flags(0, 0), 0b11);
    }

    #[test]
    fn coadd_variance_plane_is_never_touched() {
        let (mut coadd, mut weight_map, exposure) = one_pixel_setup();
        coadd.variance_mut()[[0, 0]] = 9.0;
        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0).unwrap();
        assert_eq!(coadd.variance_at(0, 0), 9.0);
    }

    #[test]
    fn zero_variance_propagates_infinity() {
        let (mut coadd, mut weight_map, mut exposure) = one_pixel_setup();
        exposure.set_pixel(0, 0, 6.0, 0, 0.0);
        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0).unwrap();
        assert!(coadd.value(0, 0).is_infinite());
        // The pixel still counted as good.
        assert_eq!(weight_map.get(0, 0), 0.1 + 1.0);
    }

    #[test]
    fn dimension_mismatch_is_rejected_before_mutation() {
        let mut coadd = MaskedImage::<f32>::new(4, 4);
        coadd.fill(1.0, 0, 0.0);
        let mut weight_map = Image::<f32>::filled(3, 4, 0.5);
        let mut exposure = MaskedImage::<f32>::new(4, 4);
        exposure.fill(2.0, 0, 1.0);

        for _ in 0..2 {
            let err =
                add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0f32).unwrap_err();
            match err {
                CoaddError::InvalidParameter(message) => {
                    assert!(message.contains("dimensions differ"), "{message}");
                }
            }
            assert!(coadd.image().iter().all(|&v| v == 1.0));
            assert!(weight_map.pixels().iter().all(|&w| w == 0.5));
        }
    }

    #[test]
    fn origin_mismatch_is_rejected_before_mutation() {
        let mut coadd = MaskedImage::<f32>::new(4, 4).with_xy0(1, 0);
        let mut weight_map = Image::<f32>::new(4, 4);
        let exposure = MaskedImage::<f32>::new(4, 4).with_xy0(1, 0);

        let err = add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0f32).unwrap_err();
        match err {
            CoaddError::InvalidParameter(message) => {
                assert!(message.contains("xy0 differ"), "{message}");
            }
        }
        assert!(weight_map.pixels().iter().all(|&w| w == 0.0));
    }

    #[test]
    fn disjoint_exposure_is_a_silent_no_op() {
        let mut coadd = MaskedImage::<f64>::new(4, 4);
        coadd.fill(3.0, 0b1, 0.0);
        let mut weight_map = Image::<f64>::filled(4, 4, 0.25);
        let mut exposure = MaskedImage::<f64>::new(4, 4).with_xy0(100, 100);
        exposure.fill(5.0, 0, 1.0);

        let overlap = add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0).unwrap();
        assert!(overlap.is_empty());
        assert!(coadd.image().iter().all(|&v| v == 3.0));
        assert!(coadd.mask().iter().all(|&m| m == 0b1));
        assert!(weight_map.pixels().iter().all(|&w| w == 0.25));
    }

    #[test]
    fn partial_overlap_touches_only_the_translated_subregion() {
        let mut coadd = MaskedImage::<f64>::new(4, 4);
        coadd.fill(1.0, 0, 0.0);
        let mut weight_map = Image::<f64>::filled(4, 4, 0.5);
        let mut exposure = MaskedImage::<f64>::new(4, 4).with_xy0(2, 2);
        exposure.fill(4.0, 0b100, 4.0);

        let overlap = add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 2.0).unwrap();
        assert_eq!(overlap, Box2I::new(2, 2, 2, 2));

        for y in 0..4usize {
            for x in 0..4usize {
                let touched = x >= 2 && y >= 2;
                if touched {
                    // (4 / sqrt(4))^2 = 4 added to the sentinel.
                    assert_eq!(coadd.value(x, y), 5.0);
                    assert_eq!(coadd.flags(x, y), 0b100);
                    assert_eq!(weight_map.get(x, y), 2.5);
                } else {
                    assert_eq!(coadd.value(x, y), 1.0);
                    assert_eq!(coadd.flags(x, y), 0);
                    assert_eq!(weight_map.get(x, y), 0.5);
                }
            }
        }
    }

    #[test]
    fn overlap_reflects_both_origins() {
        let mut coadd = MaskedImage::<f32>::new(4, 4).with_xy0(10, 20);
        let mut weight_map = Image::<f32>::new(4, 4).with_xy0(10, 20);
        let exposure = MaskedImage::<f32>::new(4, 4).with_xy0(12, 21);

        let overlap = add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 1.0f32).unwrap();
        assert_eq!(overlap, Box2I::new(12, 21, 2, 3));
    }

    #[test]
    fn integer_weight_map_accumulates() {
        let mut coadd = MaskedImage::<f64>::new(2, 2);
        let mut weight_map = Image::<i32>::new(2, 2);
        let mut exposure = MaskedImage::<f64>::new(2, 2);
        exposure.fill(2.0, 0, 1.0);

        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 3i32).unwrap();
        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 3i32).unwrap();
        assert!(weight_map.pixels().iter().all(|&w| w == 6));
        assert!(coadd.image().iter().all(|&v| v == 8.0));
    }

    #[test]
    fn u16_weight_map_accumulates() {
        let mut coadd = MaskedImage::<f32>::new(1, 1);
        let mut weight_map = Image::<u16>::new(1, 1);
        let mut exposure = MaskedImage::<f32>::new(1, 1);
        exposure.set_pixel(0, 0, 1.0, 0, 1.0);

        add_to_coadd(&mut coadd, &mut weight_map, &exposure, 0, 2u16).unwrap();
        assert_eq!(weight_map.get(0, 0), 2);
    }

    #[test]
    fn aligned_variant_applies_the_same_rule() {
        let mut coadd = MaskedImage::<f64>::new(2, 1);
        coadd.set_pixel(0, 0, 1.0, 0, 0.0);
        let mut weight_map = Image::<f64>::new(2, 1);
        weight_map.set(0, 0, 0.1);
        let mut exposure = MaskedImage::<f64>::new(2, 1);
        exposure.set_pixel(0, 0, 6.0, 0, 4.0);
        exposure.set_pixel(1, 0, 6.0, 0b01, 4.0);

        add_to_coadd_aligned(&mut coadd, &mut weight_map, &exposure, 0b01, 2.5).unwrap();
        assert_eq!(coadd.value(0, 0), 10.0);
        assert_eq!(weight_map.get(0, 0), 2.6);
        // Flagged pixel skipped.
        assert_eq!(coadd.value(1, 0), 0.0);
        assert_eq!(weight_map.get(1, 0), 0.0);
    }

    #[test]
    fn aligned_variant_ignores_origin_offsets() {
        let mut coadd = MaskedImage::<f64>::new(2, 2).with_xy0(5, 5);
        let mut weight_map = Image::<f64>::new(2, 2).with_xy0(5, 5);
        let mut exposure = MaskedImage::<f64>::new(2, 2).with_xy0(-3, 0);
        exposure.fill(1.0, 0, 1.0);

        add_to_coadd_aligned(&mut coadd, &mut weight_map, &exposure, 0, 1.0).unwrap();
        assert!(coadd.image().iter().all(|&v| v == 1.0));
    }

    #[test]
    fn aligned_variant_rejects_exposure_dimension_mismatch() {
        let mut coadd = MaskedImage::<f64>::new(2, 2);
        let mut weight_map = Image::<f64>::new(2, 2);
        let mut exposure = MaskedImage::<f64>::new(3, 2);
        exposure.fill(5.0, 0, 1.0);

        for _ in 0..2 {
            let err = add_to_coadd_aligned(&mut coadd, &mut weight_map, &exposure, 0, 1.0)
                .unwrap_err();
            match err {
                CoaddError::InvalidParameter(message) => {
                    assert!(message.contains("exposure and coadd"), "{message}");
                }
            }
            assert!(coadd.image().iter().all(|&v| v == 0.0));
            assert!(weight_map.pixels().iter().all(|&w| w == 0.0));
        }
    }
}
