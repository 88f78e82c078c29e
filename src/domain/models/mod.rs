mod dataset;
mod forecast;
mod identity;
mod snapshot;
mod time_series;

pub use dataset::*;
pub use forecast::*;
pub use identity::*;
pub use snapshot::*;
pub use time_series::*;
