use crate::{MapError, Result};
use serde::{Deserialize, Serialize};

/// A coordinate in the flat map space.
///
/// The names follow the slippy-map convention even though nothing here is
/// geographic: `lat` is the vertical (row) axis and `lng` the horizontal
/// (column) axis. Keeping the vertical axis first is what makes the image
/// height land on `lat` in [`LatLngBounds`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LatLng {
    pub lat: f64,
    pub lng: f64,
}

impl LatLng {
    /// Creates a new LatLng coordinate
    pub fn new(lat: f64, lng: f64) -> Self {
        Self { lat, lng }
    }
}

impl Default for LatLng {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Represents a point in screen, image or projected coordinates
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    pub fn add(&self, other: &Point) -> Point {
        Point::new(self.x + other.x, self.y + other.y)
    }

    pub fn subtract(&self, other: &Point) -> Point {
        Point::new(self.x - other.x, self.y - other.y)
    }

    pub fn multiply(&self, scalar: f64) -> Point {
        Point::new(self.x * scalar, self.y * scalar)
    }
}

impl Default for Point {
    fn default() -> Self {
        Self::new(0.0, 0.0)
    }
}

/// Rectangle in map coordinates, south-west (min) to north-east (max)
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatLngBounds {
    pub south_west: LatLng,
    pub north_east: LatLng,
}

impl LatLngBounds {
    pub fn new(south_west: LatLng, north_east: LatLng) -> Self {
        Self {
            south_west,
            north_east,
        }
    }

    /// Creates bounds from individual coordinates
    pub fn from_coords(south: f64, west: f64, north: f64, east: f64) -> Self {
        Self::new(LatLng::new(south, west), LatLng::new(north, east))
    }

    /// Checks if the bounds contain a point
    pub fn contains(&self, point: &LatLng) -> bool {
        point.lat >= self.south_west.lat
            && point.lat <= self.north_east.lat
            && point.lng >= self.south_west.lng
            && point.lng <= self.north_east.lng
    }

    /// Checks if `other` lies entirely inside these bounds
    pub fn contains_bounds(&self, other: &LatLngBounds) -> bool {
        self.contains(&other.south_west) && self.contains(&other.north_east)
    }

    /// Checks if the bounds intersect with another bounds
    pub fn intersects(&self, other: &LatLngBounds) -> bool {
        !(other.north_east.lat < self.south_west.lat
            || other.south_west.lat > self.north_east.lat
            || other.north_east.lng < self.south_west.lng
            || other.south_west.lng > self.north_east.lng)
    }
}

/// Represents a tile coordinate in a z/x/y pyramid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct TileCoord {
    pub x: u32,
    pub y: u32,
    pub z: u8,
}

impl TileCoord {
    pub fn new(x: u32, y: u32, z: u8) -> Self {
        Self { x, y, z }
    }
}

fn check_dimension(kind: &str, axis: &str, value: f64) -> Result<()> {
    if !value.is_finite() || value <= 0.0 {
        return Err(MapError::InvalidInput(format!(
            "{kind} {axis} must be a positive number, got {value}"
        )));
    }
    Ok(())
}

/// Pixels available to render into
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ViewportSize {
    pub width: f64,
    pub height: f64,
}

impl ViewportSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    /// Rejects sizes that are zero, negative or not finite.
    ///
    /// A zero-sized viewport usually means layout has not settled yet, so
    /// callers should retry once the container reports a real size.
    pub fn validate(&self) -> Result<()> {
        check_dimension("viewport", "width", self.width)?;
        check_dimension("viewport", "height", self.height)
    }

    pub fn as_point(&self) -> Point {
        Point::new(self.width, self.height)
    }
}

impl From<Point> for ViewportSize {
    fn from(point: Point) -> Self {
        Self::new(point.x, point.y)
    }
}

/// Natural pixel dimensions of a source asset
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct ImageSize {
    pub width: f64,
    pub height: f64,
}

impl ImageSize {
    pub fn new(width: f64, height: f64) -> Self {
        Self { width, height }
    }

    pub fn validate(&self) -> Result<()> {
        check_dimension("image", "width", self.width)?;
        check_dimension("image", "height", self.height)
    }

    /// Image center in image pixel coordinates (top-left origin)
    pub fn center(&self) -> Point {
        Point::new(self.width / 2.0, self.height / 2.0)
    }
}

impl From<(u32, u32)> for ImageSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self::new(width as f64, height as f64)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lat_lng_creation() {
        let coord = LatLng::new(2000.0, 4000.0);
        assert_eq!(coord.lat, 2000.0);
        assert_eq!(coord.lng, 4000.0);
        assert_eq!(LatLng::default(), LatLng::new(0.0, 0.0));
    }

    #[test]
    fn test_bounds_contains() {
        let bounds = LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0);
        assert!(bounds.contains(&LatLng::new(1000.0, 2000.0)));
        assert!(!bounds.contains(&LatLng::new(-1.0, 2000.0)));
        assert!(bounds.contains_bounds(&LatLngBounds::from_coords(10.0, 10.0, 20.0, 20.0)));
        assert!(!bounds.contains_bounds(&LatLngBounds::from_coords(10.0, 10.0, 20.0, 4001.0)));
        assert!(bounds.intersects(&LatLngBounds::from_coords(1999.0, 3999.0, 3000.0, 5000.0)));
    }

    #[test]
    fn test_size_validation() {
        assert!(ImageSize::new(4000.0, 2000.0).validate().is_ok());
        assert!(ImageSize::new(0.0, 2000.0).validate().is_err());
        assert!(ImageSize::new(4000.0, -1.0).validate().is_err());
        assert!(ViewportSize::new(0.0, 800.0).validate().is_err());
        assert!(ViewportSize::new(1000.0, f64::INFINITY).validate().is_err());
    }
}
