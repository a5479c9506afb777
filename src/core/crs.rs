//! Flat coordinate reference system for image viewing.
//!
//! Inside the crate every position on an image is expressed in image pixels
//! with the origin at the top-left corner and `y` growing downward. The
//! display widget instead works in `LatLng` map units, where `lat` grows
//! upward. [`VerticalAxis`] is the one place where the two meet: it decides
//! where the image sits in map space and converts points both ways.
//!
//! Projection follows Leaflet's `CRS.Simple`: one map unit equals one screen
//! pixel at zoom 0, and every zoom step doubles the scale.

use crate::core::geo::{ImageSize, LatLng, LatLngBounds, Point};
use serde::{Deserialize, Serialize};

/// Zoom/scale arithmetic and projection for the flat CRS
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct SimpleCrs;

impl SimpleCrs {
    /// Screen pixels per map unit at `zoom`
    pub fn scale(zoom: f64) -> f64 {
        2_f64.powf(zoom)
    }

    /// Inverse of [`SimpleCrs::scale`]
    pub fn zoom(scale: f64) -> f64 {
        scale.log2()
    }

    /// Projects a map coordinate to world pixels at `zoom`.
    /// Screen `y` grows downward, so `lat` is negated.
    pub fn project(lat_lng: &LatLng, zoom: f64) -> Point {
        let scale = Self::scale(zoom);
        Point::new(lat_lng.lng * scale, -lat_lng.lat * scale)
    }

    /// Unprojects world pixels at `zoom` back to a map coordinate
    pub fn unproject(point: &Point, zoom: f64) -> LatLng {
        let scale = Self::scale(zoom);
        LatLng::new(-point.y / scale, point.x / scale)
    }
}

/// Where the image's vertical axis is anchored in map space.
///
/// `BottomLeft` puts the image in the positive quadrant, spanning
/// `(0, 0)` to `(height, width)`; this is what a single image overlay uses.
/// `TopLeft` negates the vertical axis so that map space matches top-left
/// raster addressing, spanning `(-height, 0)` to `(0, width)`; tile pyramids
/// use it. Whichever is chosen must be applied to both the bounds and every
/// focus point, which is why all conversions go through this type.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum VerticalAxis {
    #[default]
    BottomLeft,
    TopLeft,
}

impl VerticalAxis {
    /// The image's native extent in map space, never padded
    pub fn image_bounds(&self, image: ImageSize) -> LatLngBounds {
        match self {
            VerticalAxis::BottomLeft => {
                LatLngBounds::from_coords(0.0, 0.0, image.height, image.width)
            }
            VerticalAxis::TopLeft => {
                LatLngBounds::from_coords(-image.height, 0.0, 0.0, image.width)
            }
        }
    }

    /// Converts an image pixel (top-left origin, y down) to map space
    pub fn image_to_lat_lng(&self, pixel: Point, image: ImageSize) -> LatLng {
        match self {
            VerticalAxis::BottomLeft => LatLng::new(image.height - pixel.y, pixel.x),
            VerticalAxis::TopLeft => LatLng::new(-pixel.y, pixel.x),
        }
    }

    /// Converts a map coordinate back to an image pixel
    pub fn lat_lng_to_image(&self, lat_lng: LatLng, image: ImageSize) -> Point {
        match self {
            VerticalAxis::BottomLeft => Point::new(lat_lng.lng, image.height - lat_lng.lat),
            VerticalAxis::TopLeft => Point::new(lat_lng.lng, -lat_lng.lat),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scale_and_zoom_are_inverse() {
        assert_eq!(SimpleCrs::scale(0.0), 1.0);
        assert_eq!(SimpleCrs::scale(-1.0), 0.5);
        assert!((SimpleCrs::zoom(SimpleCrs::scale(-1.3219)) + 1.3219).abs() < 1e-12);
    }

    #[test]
    fn test_project_negates_latitude() {
        let point = SimpleCrs::project(&LatLng::new(100.0, 50.0), 1.0);
        assert_eq!(point, Point::new(100.0, -200.0));
        assert_eq!(SimpleCrs::unproject(&point, 1.0), LatLng::new(100.0, 50.0));
    }

    #[test]
    fn test_bottom_left_bounds_carry_height_on_lat() {
        let bounds = VerticalAxis::BottomLeft.image_bounds(ImageSize::new(4000.0, 2000.0));
        assert_eq!(bounds, LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0));
    }

    #[test]
    fn test_top_left_bounds_are_negated() {
        let bounds = VerticalAxis::TopLeft.image_bounds(ImageSize::new(11520.0, 6480.0));
        assert_eq!(bounds, LatLngBounds::from_coords(-6480.0, 0.0, 0.0, 11520.0));
    }

    #[test]
    fn test_focus_point_lands_inside_bounds_for_both_conventions() {
        let image = ImageSize::new(1640.0, 4660.0);
        let focus = Point::new(820.0, 1000.0);
        for axis in [VerticalAxis::BottomLeft, VerticalAxis::TopLeft] {
            let lat_lng = axis.image_to_lat_lng(focus, image);
            assert!(axis.image_bounds(image).contains(&lat_lng));
            assert_eq!(axis.lat_lng_to_image(lat_lng, image), focus);
        }
        assert_eq!(
            VerticalAxis::BottomLeft.image_to_lat_lng(focus, image),
            LatLng::new(3660.0, 820.0)
        );
        assert_eq!(
            VerticalAxis::TopLeft.image_to_lat_lng(focus, image),
            LatLng::new(-1000.0, 820.0)
        );
    }
}
