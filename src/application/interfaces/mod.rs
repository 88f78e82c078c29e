mod dataset_store;
mod star_source;

pub use dataset_store::*;
pub use star_source::*;
