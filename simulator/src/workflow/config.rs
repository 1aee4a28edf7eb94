use anyhow::Context;
use coaddcore::CoaddConfig;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

#[derive(Clone, Debug, Serialize, Deserialize)]
#[serde(default)]
pub struct WorkflowConfig {
    pub num_images: usize,
    pub width: usize,
    pub height: usize,
    pub noise_sigma: f32,
    pub seed: u64,
    pub bad_mask_planes: Vec<String>,
    pub hist_bins: usize,
}

impl Default for WorkflowConfig {
    fn default() -> Self {
        Self {
            num_images: 4,
            width: 150,
            height: 150,
            noise_sigma: 1.0,
            seed: 0,
            bad_mask_planes: vec!["EDGE".to_string()],
            hist_bins: 200,
        }
    }
}

impl WorkflowConfig {
    pub fn load<P: AsRef<Path>>(path: P) -> anyhow::Result<Self> {
        let path_ref = path.as_ref();
        let contents = fs::read_to_string(path_ref)
            .with_context(|| format!("reading workflow config {}", path_ref.display()))?;
        let config: WorkflowConfig = serde_yaml::from_str(&contents)
            .with_context(|| format!("parsing workflow config {}", path_ref.display()))?;
        Ok(config)
    }

    pub fn from_args(num_images: usize, width: usize, height: usize, seed: u64) -> Self {
        Self {
            num_images,
            width,
            height,
            seed,
            ..Default::default()
        }
    }

    pub fn to_coadd_config(&self) -> CoaddConfig {
        CoaddConfig {
            bad_mask_planes: self.bad_mask_planes.clone(),
        }
    }
}
