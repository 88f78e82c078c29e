//! # Forecast Engine
//!
//! Additive trend + seasonality modeling of cumulative star counts:
//! least-squares trend, weekly/yearly seasonal offsets fit on residuals,
//! and residual-based uncertainty intervals.

mod confidence;
mod engine;
mod seasonality;
mod trend;

pub use confidence::*;
pub use engine::*;
pub use seasonality::*;
pub use trend::*;
