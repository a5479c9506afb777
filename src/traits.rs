//! Shared trait abstractions
//!
//! `LayerOperations` is what every layer exposes to the layer manager, and
//! `DisplaySurface` is the capability surface of the display widget that a
//! view session drives.

use crate::{
    core::{
        geo::{LatLng, LatLngBounds, ViewportSize},
        viewport::Viewport,
    },
    Result,
};

/// The operations a view session needs from a display widget.
///
/// The widget owns pan/zoom/tile rendering; the session only sequences these
/// calls. Implementations must clamp the current zoom when a new minimum is
/// set above it, and must keep the visible area inside max bounds when the
/// viscosity is solid (1.0).
pub trait DisplaySurface {
    /// Current container size in pixels. May be zero before layout settles.
    fn size(&self) -> ViewportSize;

    /// Attach a layer to the display
    fn attach_layer(&mut self, layer: Box<dyn LayerOperations>) -> Result<()>;

    /// Detach and drop a layer; returns whether it was attached
    fn remove_layer(&mut self, layer_id: &str) -> Result<bool>;

    /// Ids of the layers currently attached, in render order
    fn active_layers(&self) -> Vec<String>;

    /// Center the view and set the zoom
    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()>;

    /// Lower zoom limit
    fn set_min_zoom(&mut self, zoom: f64) -> Result<()>;

    /// Restrict panning; `viscosity` 1.0 allows no overshoot
    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>, viscosity: f64) -> Result<()>;

    /// Re-query the container after a resize
    fn invalidate_size(&mut self, size: ViewportSize) -> Result<()>;

    /// Current zoom
    fn zoom(&self) -> f64;

    /// Lower zoom limit
    fn min_zoom(&self) -> f64;

    /// Upper zoom limit
    fn max_zoom(&self) -> f64;
}

/// Trait for layer-like objects
pub trait LayerOperations: Send + Sync {
    /// Get layer ID
    fn id(&self) -> &str;

    /// Get layer name
    fn name(&self) -> &str;

    /// Get layer type
    fn layer_type(&self) -> crate::layers::base::LayerType;

    /// Check if layer is visible
    fn is_visible(&self) -> bool;

    /// Set layer visibility
    fn set_visible(&mut self, visible: bool);

    /// Get layer opacity (0.0 to 1.0)
    fn opacity(&self) -> f32;

    /// Set layer opacity
    fn set_opacity(&mut self, opacity: f32);

    /// Get layer z-index for ordering
    fn z_index(&self) -> i32;

    /// Set layer z-index
    fn set_z_index(&mut self, z_index: i32);

    /// Refresh whatever the layer derives from the viewport
    fn update(&mut self, _viewport: &Viewport) -> Result<()> {
        Ok(())
    }

    /// Get layer bounds if applicable
    fn bounds(&self) -> Option<LatLngBounds> {
        None
    }

    /// Check if layer intersects with given bounds
    fn intersects_bounds(&self, bounds: &LatLngBounds) -> bool {
        if let Some(layer_bounds) = self.bounds() {
            layer_bounds.intersects(bounds)
        } else {
            true
        }
    }

    /// Get layer options
    fn options(&self) -> serde_json::Value;

    /// Set layer options
    fn set_options(&mut self, options: serde_json::Value) -> Result<()>;

    /// Dynamic casting support
    fn as_any(&self) -> &dyn std::any::Any;
    fn as_any_mut(&mut self) -> &mut dyn std::any::Any;
}
