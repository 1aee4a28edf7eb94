use anyhow::Context;
use coaddcore::{Box2I, Coadd, MaskedImage};
use log::info;
use rand::{rngs::StdRng, SeedableRng};
use serde::Serialize;

use crate::generator::noise::build_noise_exposure;
use crate::workflow::config::WorkflowConfig;

/// Summary of one noise-coadd run: the coadd pixel histogram against the
/// analytic chi-squared density, plus binwise residual statistics.
#[derive(Debug, Clone, Serialize)]
pub struct WorkflowResult {
    pub exposures_added: usize,
    pub hist_x: Vec<f64>,
    pub hist_y: Vec<f64>,
    pub chi_sq_y: Vec<f64>,
    pub residual_mean: f64,
    pub residual_std_dev: f64,
}

#[derive(Clone)]
pub struct Runner {
    config: WorkflowConfig,
}

impl Runner {
    pub fn new(config: WorkflowConfig) -> Self {
        Self { config }
    }

    /// Coadds `num_images` pure-noise exposures and compares the resulting
    /// pixel distribution with a chi-squared distribution whose order is the
    /// image count.
    pub fn execute(&self) -> anyhow::Result<WorkflowResult> {
        let config = &self.config;
        info!(
            "coadding {} noise exposures of {}x{}",
            config.num_images, config.width, config.height
        );

        let mut rng = StdRng::seed_from_u64(config.seed);
        let bbox = Box2I::new(0, 0, config.width, config.height);
        let mut coadd =
            Coadd::new(bbox, &config.to_coadd_config()).context("creating coadd")?;

        for index in 0..config.num_images {
            let exposure =
                build_noise_exposure(config.width, config.height, config.noise_sigma, &mut rng);
            coadd
                .add_exposure(&exposure, 1.0)
                .with_context(|| format!("adding exposure {index} to coadd"))?;
        }

        let normalized = coadd.normalized_coadd().context("normalizing coadd")?;
        let (hist_x, hist_y, chi_sq_y) =
            chi_squared_histogram(&normalized, config.num_images, config.hist_bins)?;

        let residuals: Vec<f64> = hist_y
            .iter()
            .zip(chi_sq_y.iter())
            .map(|(&h, &c)| (h - c) * config.hist_bins as f64)
            .collect();
        let residual_mean = residuals.iter().sum::<f64>() / residuals.len() as f64;
        let residual_std_dev = (residuals
            .iter()
            .map(|&r| (r - residual_mean) * (r - residual_mean))
            .sum::<f64>()
            / residuals.len() as f64)
            .sqrt();

        Ok(WorkflowResult {
            exposures_added: coadd.exposures_added(),
            hist_x,
            hist_y,
            chi_sq_y,
            residual_mean,
            residual_std_dev,
        })
    }
}

/// Histogram of the coadd pixel values next to the chi-squared density of
/// order `num_images`, both normalized to unit sum.
///
/// Normalization by the weight map is undone first so that each pixel is a
/// plain sum of `num_images` squared standard-normal draws. Non-finite
/// pixels and the far tail (values of 50 and above) are discarded before
/// binning.
fn chi_squared_histogram(
    coadd: &MaskedImage<f32>,
    num_images: usize,
    num_bins: usize,
) -> anyhow::Result<(Vec<f64>, Vec<f64>, Vec<f64>)> {
    anyhow::ensure!(num_bins > 0, "histogram needs at least one bin");
    let data: Vec<f64> = coadd
        .image()
        .iter()
        .map(|&v| v as f64 * num_images as f64)
        .filter(|v| v.is_finite() && *v < 50.0)
        .collect();
    anyhow::ensure!(!data.is_empty(), "no finite coadd pixels to histogram");

    let min = data.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = data.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let bin_width = (max - min) / num_bins as f64;
    anyhow::ensure!(bin_width > 0.0, "degenerate histogram range");

    let mut hist_y = vec![0.0f64; num_bins];
    for &value in &data {
        let bin = (((value - min) / bin_width) as usize).min(num_bins - 1);
        hist_y[bin] += 1.0;
    }
    let total = data.len() as f64;
    for count in &mut hist_y {
        *count /= total;
    }

    let hist_x: Vec<f64> = (0..num_bins)
        .map(|bin| min + bin as f64 * bin_width)
        .collect();

    let order = num_images as f64;
    let mut chi_sq_y: Vec<f64> = hist_x
        .iter()
        .map(|&x| x.powf(order / 2.0 - 1.0) * (-x / 2.0).exp())
        .collect();
    let chi_sq_total: f64 = chi_sq_y.iter().sum();
    anyhow::ensure!(
        chi_sq_total.is_finite() && chi_sq_total > 0.0,
        "chi-squared reference is degenerate over the histogram range"
    );
    for value in &mut chi_sq_y {
        *value /= chi_sq_total;
    }

    Ok((hist_x, hist_y, chi_sq_y))
}
