//! Common types and utilities shared across all climate-hexmap services.

pub mod bounds;
pub mod error;
pub mod resolution;

pub use bounds::GeoBounds;
pub use error::{AtlasError, AtlasResult, ReducerError};
pub use resolution::CellResolution;
