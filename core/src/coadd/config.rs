use serde::{Deserialize, Serialize};

/// Parameters controlling which exposure pixels are rejected from a coadd.
///
/// `bad_mask_planes` names the mask planes whose flagged pixels are skipped;
/// it should normally include `EDGE` so that warped-in border pixels never
/// contribute.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct CoaddConfig {
    pub bad_mask_planes: Vec<String>,
}

impl Default for CoaddConfig {
    fn default() -> Self {
        Self {
            bad_mask_planes: vec!["EDGE".to_string()],
        }
    }
}
