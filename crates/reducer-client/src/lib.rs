//! Region Reducer implementations.
//!
//! Two sources satisfy the [`hex_engine::RegionReducer`] contract:
//!
//! - [`PlatformReducer`]: the real one. An HTTP client against the remote
//!   geospatial-analysis platform's batch reduce endpoint, constructed once
//!   at startup and injected everywhere. Every call carries an explicit
//!   timeout.
//! - [`SyntheticReducer`]: a deterministic local-development source. It is
//!   selected only by explicit configuration and reports `Synthetic`
//!   provenance, so a response built from it can never claim `isRealData`.
//!
//! The two are never mixed: a failed real-data request propagates its error
//! instead of falling back to synthetic values.

pub mod config;
pub mod platform;
pub mod synthetic;

pub use config::{ReducerConfig, ReducerMode};
pub use platform::{PlatformReducer, TileSpec, TileUrlInfo, PLATFORM_BATCH_LIMIT};
pub use synthetic::SyntheticReducer;
