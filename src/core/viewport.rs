use crate::core::{
    constants::{DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, RIGID_VISCOSITY, ZOOM_EPSILON},
    crs::SimpleCrs,
    geo::{LatLng, LatLngBounds, Point},
};
use serde::{Deserialize, Serialize};

/// Manages the current view of the map: center, zoom, and screen dimensions
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    /// The center of the view in map coordinates
    pub center: LatLng,
    /// The current zoom level
    pub zoom: f64,
    /// The size of the viewport in pixels
    pub size: Point,
    /// The minimum allowed zoom level
    pub min_zoom: f64,
    /// The maximum allowed zoom level
    pub max_zoom: f64,
    /// Zoom levels snap to multiples of this value (0 disables snapping)
    pub zoom_snap: f64,
    /// Maximum bounds for panning
    max_bounds: Option<LatLngBounds>,
    /// Viscosity for bounds enforcement (0.0 = loose, 1.0 = solid)
    max_bounds_viscosity: f64,
}

impl Viewport {
    /// Creates a new viewport
    pub fn new(center: LatLng, zoom: f64, size: Point) -> Self {
        Self {
            center,
            zoom: zoom.clamp(DEFAULT_MIN_ZOOM, DEFAULT_MAX_ZOOM),
            size,
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_snap: 0.0,
            max_bounds: None,
            max_bounds_viscosity: 0.0,
        }
    }

    /// Sets the maximum bounds for the map and re-clamps the center
    pub fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>, viscosity: Option<f64>) {
        self.max_bounds = bounds;
        self.max_bounds_viscosity = viscosity.unwrap_or(0.0).clamp(0.0, RIGID_VISCOSITY);
        self.center = self.clamp_center(self.center);
    }

    /// Sets the center of the viewport with bounds checking
    pub fn set_center(&mut self, center: LatLng) {
        self.center = self.clamp_center(center);
    }

    /// Sets the zoom level, snapping and clamping to the valid range
    pub fn set_zoom(&mut self, zoom: f64) {
        self.zoom = self.snap_zoom(zoom).clamp(self.min_zoom, self.max_zoom);
        self.center = self.clamp_center(self.center);
    }

    /// Sets the viewport size
    pub fn set_size(&mut self, size: Point) {
        self.size = size;
        self.center = self.clamp_center(self.center);
    }

    /// Sets the zoom limits.
    /// A maximum below the minimum is raised to the minimum.
    pub fn set_zoom_limits(&mut self, min_zoom: f64, max_zoom: f64) {
        if max_zoom < min_zoom {
            log::warn!("max zoom {max_zoom} below min zoom {min_zoom}, raising max");
        }
        self.min_zoom = min_zoom;
        self.max_zoom = max_zoom.max(min_zoom);
        self.zoom = self.zoom.clamp(self.min_zoom, self.max_zoom);
        self.center = self.clamp_center(self.center);
    }

    /// Sets only the minimum zoom, pulling the current zoom up if needed
    pub fn set_min_zoom(&mut self, min_zoom: f64) {
        self.set_zoom_limits(min_zoom, self.max_zoom);
    }

    /// Gets the scale factor for the current zoom level
    pub fn scale(&self) -> f64 {
        SimpleCrs::scale(self.zoom)
    }

    /// Converts a map coordinate to container pixels
    pub fn lat_lng_to_pixel(&self, lat_lng: &LatLng) -> Point {
        let point = SimpleCrs::project(lat_lng, self.zoom);
        let origin = SimpleCrs::project(&self.center, self.zoom);
        point
            .subtract(&origin)
            .add(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
    }

    /// Converts container pixels back to a map coordinate
    pub fn pixel_to_lat_lng(&self, pixel: &Point) -> LatLng {
        let origin = SimpleCrs::project(&self.center, self.zoom);
        let world = pixel
            .subtract(&Point::new(self.size.x / 2.0, self.size.y / 2.0))
            .add(&origin);
        SimpleCrs::unproject(&world, self.zoom)
    }

    /// Pans the viewport by the given pixel offset with bounds checking.
    /// Returns the pixel delta that was actually applied.
    pub fn pan(&mut self, delta: Point) -> Point {
        let before = SimpleCrs::project(&self.center, self.zoom);
        let target = SimpleCrs::unproject(&before.subtract(&delta), self.zoom);
        self.set_center(target);
        let after = SimpleCrs::project(&self.center, self.zoom);
        before.subtract(&after)
    }

    /// Zooms to a level, keeping `focus_point` (container pixels) stationary
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) {
        let new_zoom = self.snap_zoom(zoom).clamp(self.min_zoom, self.max_zoom);
        let old_zoom = self.zoom;

        if (new_zoom - old_zoom).abs() < ZOOM_EPSILON {
            return;
        }

        match focus_point {
            Some(focus_screen) => {
                let focus = self.pixel_to_lat_lng(&focus_screen);
                let ratio = SimpleCrs::scale(old_zoom) / SimpleCrs::scale(new_zoom);
                let center = LatLng::new(
                    focus.lat + (self.center.lat - focus.lat) * ratio,
                    focus.lng + (self.center.lng - focus.lng) * ratio,
                );
                self.zoom = new_zoom;
                self.set_center(center);
            }
            None => {
                self.zoom = new_zoom;
                self.center = self.clamp_center(self.center);
            }
        }
    }

    /// Gets the currently visible area in map coordinates
    pub fn bounds(&self) -> LatLngBounds {
        let half = self.half_span();
        LatLngBounds::from_coords(
            self.center.lat - half.lat,
            self.center.lng - half.lng,
            self.center.lat + half.lat,
            self.center.lng + half.lng,
        )
    }

    /// Get the maximum bounds for the map if set
    pub fn max_bounds(&self) -> Option<&LatLngBounds> {
        self.max_bounds.as_ref()
    }

    pub fn max_bounds_viscosity(&self) -> f64 {
        self.max_bounds_viscosity
    }

    fn snap_zoom(&self, zoom: f64) -> f64 {
        if self.zoom_snap > 0.0 {
            (zoom / self.zoom_snap).round() * self.zoom_snap
        } else {
            zoom
        }
    }

    /// Half of the visible span in map units
    fn half_span(&self) -> LatLng {
        let scale = self.scale();
        LatLng::new(self.size.y / 2.0 / scale, self.size.x / 2.0 / scale)
    }

    /// Clamps the center against max bounds.
    ///
    /// With a solid viscosity the visible rectangle, not just the center, must
    /// stay inside the bounds; an axis wider than the bounds is pinned to the
    /// bounds center. Softer viscosities keep the center inside the bounds and
    /// pull an overshooting edge back proportionally.
    fn clamp_center(&self, center: LatLng) -> LatLng {
        let Some(bounds) = &self.max_bounds else {
            return center;
        };
        let half = self.half_span();

        let limit = |value: f64, lo: f64, hi: f64, half: f64| -> f64 {
            let inner_lo = lo + half;
            let inner_hi = hi - half;
            if self.max_bounds_viscosity >= RIGID_VISCOSITY {
                if inner_lo > inner_hi {
                    (lo + hi) / 2.0
                } else {
                    value.clamp(inner_lo, inner_hi)
                }
            } else {
                let value = value.clamp(lo, hi);
                if inner_lo <= inner_hi && value < inner_lo {
                    value + (inner_lo - value) * self.max_bounds_viscosity
                } else if inner_lo <= inner_hi && value > inner_hi {
                    value - (value - inner_hi) * self.max_bounds_viscosity
                } else {
                    value
                }
            }
        };

        LatLng::new(
            limit(
                center.lat,
                bounds.south_west.lat,
                bounds.north_east.lat,
                half.lat,
            ),
            limit(
                center.lng,
                bounds.south_west.lng,
                bounds.north_east.lng,
                half.lng,
            ),
        )
    }
}

impl Default for Viewport {
    fn default() -> Self {
        Self::new(LatLng::new(0.0, 0.0), 0.0, Point::new(800.0, 600.0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_viewport_creation() {
        let viewport = Viewport::new(LatLng::new(1000.0, 2000.0), 5.0, Point::new(800.0, 600.0));

        assert_eq!(viewport.zoom, DEFAULT_MAX_ZOOM);
        assert_eq!(viewport.center.lat, 1000.0);
        assert_eq!(viewport.size.x, 800.0);
    }

    #[test]
    fn test_coordinate_conversion() {
        let viewport = Viewport::new(LatLng::new(100.0, 200.0), 1.0, Point::new(512.0, 512.0));

        let center = viewport.pixel_to_lat_lng(&Point::new(256.0, 256.0));
        assert_eq!(center, LatLng::new(100.0, 200.0));

        // one screen pixel is half a map unit at zoom 1; screen y grows downward
        let below = viewport.pixel_to_lat_lng(&Point::new(256.0, 258.0));
        assert_eq!(below, LatLng::new(99.0, 200.0));
        assert_eq!(viewport.lat_lng_to_pixel(&below), Point::new(256.0, 258.0));
    }

    #[test]
    fn test_zoom_limits() {
        let mut viewport = Viewport::default();
        viewport.set_zoom_limits(-1.0, 1.5);

        viewport.set_zoom(-3.0);
        assert_eq!(viewport.zoom, -1.0);

        viewport.set_zoom(20.0);
        assert_eq!(viewport.zoom, 1.5);

        viewport.set_min_zoom(3.0);
        assert_eq!(viewport.zoom, 3.0);
        assert_eq!(viewport.max_zoom, 3.0);
    }

    #[test]
    fn test_zoom_snap() {
        let mut viewport = Viewport::default();
        viewport.zoom_snap = 0.1;
        viewport.set_zoom(0.4488);
        assert!((viewport.zoom - 0.4).abs() < 1e-9);
    }

    #[test]
    fn test_pan_moves_center() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(512.0, 512.0));
        let applied = viewport.pan(Point::new(10.0, 10.0));

        assert_eq!(viewport.center, LatLng::new(10.0, -10.0));
        assert_eq!(applied, Point::new(10.0, 10.0));
    }

    #[test]
    fn test_rigid_bounds_keep_edges_inside() {
        let mut viewport = Viewport::new(LatLng::new(1000.0, 2000.0), -1.0, Point::new(1000.0, 800.0));
        let bounds = LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0);
        viewport.set_max_bounds(Some(bounds.clone()), Some(1.0));

        viewport.pan(Point::new(-100_000.0, 100_000.0));
        assert!(bounds.contains_bounds(&viewport.bounds()));

        let applied = viewport.pan(Point::new(-50.0, 0.0));
        assert_eq!(applied, Point::new(0.0, 0.0));
    }

    #[test]
    fn test_rigid_bounds_pin_axis_wider_than_image() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), -2.0, Point::new(1000.0, 800.0));
        viewport.set_max_bounds(Some(LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0)), Some(1.0));
        viewport.set_center(LatLng::new(0.0, 0.0));
        assert_eq!(viewport.center.lat, 1000.0);
        assert_eq!(viewport.center.lng, 2000.0);
    }

    #[test]
    fn test_zoom_to_keeps_focus_stationary() {
        let mut viewport = Viewport::new(LatLng::new(0.0, 0.0), 0.0, Point::new(400.0, 400.0));
        let focus = Point::new(300.0, 100.0);
        let before = viewport.pixel_to_lat_lng(&focus);

        viewport.zoom_to(1.0, Some(focus));
        let after = viewport.pixel_to_lat_lng(&focus);

        assert!((before.lat - after.lat).abs() < 1e-9);
        assert!((before.lng - after.lng).abs() < 1e-9);
    }
}
