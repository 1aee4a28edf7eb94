use crate::accumulate::add_to_coadd;
use crate::coadd::config::CoaddConfig;
use crate::coadd::normalize::{divide_by_weight_map, set_coadd_edge_bits};
use crate::geom::Box2I;
use crate::image::{
    bad_pixel_mask_from_planes, mask_plane_bit, Image, MaskPixel, MaskedImage, EDGE_PLANE,
};
use crate::prelude::CoaddResult;
use crate::telemetry::log::LogManager;
use crate::telemetry::metrics::MetricsRecorder;

/// Running chi-squared coadd with its congruent weight map.
///
/// Owns the accumulation state across a whole coaddition run; each call to
/// [`Coadd::add_exposure`] folds one registered exposure into it. Exposures
/// must already be background-subtracted and warped onto the coadd's pixel
/// grid; only origin offsets are reconciled here.
pub struct Coadd {
    coadd: MaskedImage<f32>,
    weight_map: Image<f32>,
    bad_pixel_mask: MaskPixel,
    logger: LogManager,
    metrics: MetricsRecorder,
}

impl Coadd {
    /// Blank coadd covering `bbox`, rejecting the mask planes named in
    /// `config`.
    pub fn new(bbox: Box2I, config: &CoaddConfig) -> CoaddResult<Self> {
        let bad_pixel_mask = bad_pixel_mask_from_planes(&config.bad_mask_planes)?;
        let coadd =
            MaskedImage::<f32>::new(bbox.width(), bbox.height()).with_xy0(bbox.min_x(), bbox.min_y());
        let weight_map =
            Image::<f32>::new(bbox.width(), bbox.height()).with_xy0(bbox.min_x(), bbox.min_y());
        Ok(Self {
            coadd,
            weight_map,
            bad_pixel_mask,
            logger: LogManager::new(),
            metrics: MetricsRecorder::new(),
        })
    }

    /// Adds one exposure with the given relative weight; returns the overlap
    /// between the exposure and the coadd in shared-frame coordinates.
    pub fn add_exposure(
        &mut self,
        exposure: &MaskedImage<f32>,
        weight_factor: f32,
    ) -> CoaddResult<Box2I> {
        self.logger.record("add exposure to coadd");
        match add_to_coadd(
            &mut self.coadd,
            &mut self.weight_map,
            exposure,
            self.bad_pixel_mask,
            weight_factor,
        ) {
            Ok(overlap) => {
                self.metrics.record_exposure();
                self.logger.record_overlap(&overlap);
                Ok(overlap)
            }
            Err(err) => {
                self.metrics.record_error();
                Err(err)
            }
        }
    }

    /// The raw running chi-squared sum, un-normalized.
    pub fn running_coadd(&self) -> &MaskedImage<f32> {
        &self.coadd
    }

    pub fn weight_map(&self) -> &Image<f32> {
        &self.weight_map
    }

    pub fn bad_pixel_mask(&self) -> MaskPixel {
        self.bad_pixel_mask
    }

    pub fn bbox(&self) -> Box2I {
        self.coadd.bbox()
    }

    pub fn exposures_added(&self) -> usize {
        self.metrics.snapshot().0
    }

    /// The coadd as computed so far: a deep copy normalized by the weight
    /// map, with zero-weight pixels flagged `EDGE`. May be called at any
    /// time; the running state is unaffected.
    pub fn normalized_coadd(&self) -> CoaddResult<MaskedImage<f32>> {
        let mut scaled = self.coadd.clone();
        let edge = mask_plane_bit(EDGE_PLANE)?;
        set_coadd_edge_bits(scaled.mask_mut(), &self.weight_map, edge)?;
        divide_by_weight_map(&mut scaled, &self.weight_map)?;
        Ok(scaled)
    }
}
