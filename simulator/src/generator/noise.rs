use coaddcore::MaskedImage;
use rand::{rngs::StdRng, Rng};
use std::f32::consts::PI;

/// One standard-normal sample via the Box-Muller transform.
fn sample_normal(rng: &mut StdRng) -> f32 {
    // 1 - u keeps the argument of ln strictly positive.
    let u1 = 1.0 - rng.gen::<f32>();
    let u2 = rng.gen::<f32>();
    (-2.0 * u1.ln()).sqrt() * (2.0 * PI * u2).cos()
}

/// Builds a Gaussian-noise masked image: values drawn from N(0, sigma^2),
/// variance plane set to sigma^2, no flags raised.
pub fn build_noise_exposure(
    width: usize,
    height: usize,
    sigma: f32,
    rng: &mut StdRng,
) -> MaskedImage<f32> {
    let mut exposure = MaskedImage::<f32>::new(width, height);
    let variance = sigma * sigma;
    for y in 0..height {
        for x in 0..width {
            exposure.set_pixel(x, y, sigma * sample_normal(rng), 0, variance);
        }
    }
    exposure
}
