pub mod bounds;
pub mod config;
pub mod constants;
pub mod crs;
pub mod fit;
pub mod geo;
pub mod map;
pub mod viewport;
