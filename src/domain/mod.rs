//! # Domain Layer
//!
//! Core models and the error taxonomy. Independent of transport, storage,
//! and the forecasting engine.

pub mod error;
pub mod models;

pub use error::*;
pub use models::*;
