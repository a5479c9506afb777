//! # imagemap
//!
//! A Rust-native engine for showing very large raster images inside a
//! pannable, zoomable viewport, using the slippy-map model with a flat
//! (`Simple`) coordinate reference system where one map unit is one image
//! pixel at zoom 0.
//!
//! The heart of the crate is the cover-fit computation:
//!
//! ```text
//! cover_zoom = log2(max(viewport_w / image_w, viewport_h / image_h))
//! ```
//!
//! around which [`ViewSession`] drives a [`DisplaySurface`] through the view
//! lifecycle: attach the layer, open the view, lock the minimum zoom, lock the
//! pan bounds once layout is stable and refit on every resize.
//!
//! ```rust
//! use imagemap::prelude::*;
//!
//! let viewport = ViewportSize::new(1000.0, 800.0);
//! let image = ImageSize::new(4000.0, 2000.0);
//! let cover = ViewportFitCalculator::compute_cover_zoom(viewport, image).unwrap();
//! assert!((cover - 0.4_f64.log2()).abs() < 1e-12);
//! ```

pub mod core;
pub mod input;
pub mod layers;
pub mod loader;
pub mod prelude;
pub mod session;
pub mod tiles;
pub mod traits;
pub use crate::core::constants;

// Re-export public API
pub use crate::core::{
    bounds::Bounds,
    crs::{SimpleCrs, VerticalAxis},
    fit::{FitOptions, FitResult, ViewportFitCalculator},
    geo::{ImageSize, LatLng, LatLngBounds, Point, TileCoord, ViewportSize},
    map::Map,
    viewport::Viewport,
};

pub use layers::{base::LayerTrait, image::ImageOverlay, tile::TileLayer};

pub use input::{events::MapEvent, handler::EventManager};

pub use loader::{FileLoader, ImageLoader, StaticLoader};

pub use session::{LoadOutcome, LoadTicket, SessionInput, SessionState, View, ViewCatalog, ViewSession};

pub use tiles::{pyramid::TilePyramid, source::TemplateSource};

pub use traits::DisplaySurface;

/// Install `env_logger` as the `log` backend, configured from `RUST_LOG`.
/// Later calls are no-ops.
#[cfg(feature = "debug")]
pub fn init_logging() {
    let _ = env_logger::Builder::from_default_env()
        .format_timestamp_millis()
        .try_init();
}

/// Result type used throughout the library
pub type Result<T> = std::result::Result<T, MapError>;

/// Common error types
#[derive(Debug, thiserror::Error)]
pub enum MapError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Failed to load asset {locator}: {reason}")]
    AssetLoad { locator: String, reason: String },

    #[error("Unknown view: {0}")]
    UnknownView(String),

    #[error("Layer error: {0}")]
    Layer(String),

    #[error("Config error: {0}")]
    Config(String),
}

/// Error type alias for convenience
pub type Error = MapError;
