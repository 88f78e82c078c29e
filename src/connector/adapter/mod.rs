mod github_star_source;
mod json_dataset_store;
mod mock_star_source;

pub use github_star_source::*;
pub use json_dataset_store::*;
pub use mock_star_source::*;
