//! # Connector Layer
//!
//! External integrations implementing the application ports:
//! - GitHub REST API (snapshot + paginated stargazer stream)
//! - JSON file storage for collection-run documents
//! - In-memory mock source for tests and offline use

pub mod adapter;

pub use adapter::*;
