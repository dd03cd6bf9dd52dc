//! HTTP handlers, one module per endpoint family.

pub mod common;
pub mod groundwater;
pub mod health;
pub mod heat_island;
pub mod precipitation;
pub mod temperature;
pub mod tiles;
pub mod wet_bulb;

pub use groundwater::groundwater_handler;
pub use health::{health_handler, metrics_handler, status_handler};
pub use heat_island::heat_island_handler;
pub use precipitation::precipitation_handler;
pub use temperature::temperature_projection_handler;
pub use tiles::{
    groundwater_tiles_handler, heat_island_tiles_handler, precipitation_tiles_handler,
    temperature_tiles_handler,
};
pub use wet_bulb::wet_bulb_handler;
