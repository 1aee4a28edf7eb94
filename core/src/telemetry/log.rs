use log::{debug, info};

use crate::geom::Box2I;

pub struct LogManager;

impl LogManager {
    pub fn new() -> Self {
        Self
    }

    pub fn record(&self, message: &str) {
        info!("{}", message);
    }

    pub fn record_overlap(&self, overlap: &Box2I) {
        debug!(
            "overlap region {}x{} at ({},{})",
            overlap.width(),
            overlap.height(),
            overlap.min_x(),
            overlap.min_y()
        );
    }
}

impl Default for LogManager {
    fn default() -> Self {
        Self::new()
    }
}
