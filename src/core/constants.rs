//! Engine-wide defaults taken from the Leaflet `CRS.Simple` image-viewer setup.
//! Keeping them in a single place makes it easier to tweak magic numbers.

/// Default square tile size in pixels.
pub const TILE_SIZE: u32 = 256;

/// Zoom added on top of cover zoom when a view is first opened.
pub const DEFAULT_BOOST: f64 = 0.5;

/// Lowest zoom the widget permits before a fit narrows it.
pub const DEFAULT_MIN_ZOOM: f64 = -2.0;

/// Highest zoom the widget permits.
pub const DEFAULT_MAX_ZOOM: f64 = 2.0;

/// Snap zoom levels to these quanta.
pub const DEFAULT_ZOOM_SNAP: f64 = 0.1;

/// Programmatic +/- zoom step.
pub const DEFAULT_ZOOM_DELTA: f64 = 0.1;

/// Bounds viscosity that forbids any overshoot past max bounds.
pub const RIGID_VISCOSITY: f64 = 1.0;

/// Tolerance for floating point zoom comparisons.
pub const ZOOM_EPSILON: f64 = 1e-9;
