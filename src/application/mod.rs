//! # Application Layer
//!
//! Port traits and the use cases orchestrating collection, forecasting, and
//! evaluation.

pub mod interfaces;
pub mod use_cases;

pub use interfaces::*;
pub use use_cases::*;
