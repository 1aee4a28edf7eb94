pub mod config;
pub mod driver;
pub mod normalize;

pub use config::CoaddConfig;
pub use driver::Coadd;
pub use normalize::{divide_by_weight_map, set_coadd_edge_bits};
