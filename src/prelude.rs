//! Prelude module for common imagemap types and traits
//!
//! This module re-exports the most commonly used types, traits, and functions
//! for easy importing with `use imagemap::prelude::*;`

pub use crate::core::{
    bounds::Bounds,
    config::{ViewerConfig, ViewerOptions, ViewerProfile},
    constants::{DEFAULT_BOOST, RIGID_VISCOSITY, TILE_SIZE},
    crs::{SimpleCrs, VerticalAxis},
    fit::{FitOptions, FitResult, ViewportFitCalculator},
    geo::{ImageSize, LatLng, LatLngBounds, Point, TileCoord, ViewportSize},
    map::Map,
    viewport::Viewport,
};

pub use crate::layers::{
    base::{LayerTrait, LayerType},
    image::ImageOverlay,
    manager::LayerManager,
    tile::TileLayer,
};

pub use crate::tiles::{pyramid::TilePyramid, source::TemplateSource, source::TileSource};

pub use crate::input::{
    events::{MapEvent, SessionInput},
    handler::EventManager,
};

pub use crate::loader::{FileLoader, ImageLoader, StaticLoader};

pub use crate::session::{LoadOutcome, LoadTicket, SessionState, View, ViewCatalog, ViewSession};

pub use crate::traits::DisplaySurface;

pub use crate::{MapError, Result};

pub use fxhash::{FxHashMap as HashMap, FxHashSet as HashSet};
