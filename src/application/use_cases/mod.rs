mod collect_batch;
mod collect_repository;
mod evaluate_forecast;
mod forecast_growth;
mod sample_history;

pub use collect_batch::*;
pub use collect_repository::*;
pub use evaluate_forecast::*;
pub use forecast_growth::*;
pub use sample_history::*;
