//! Geometry of a z/x/y tile pyramid cut from one large image.
//!
//! Map units are full-resolution image pixels, so the pyramid slots into the
//! same flat CRS as a single image overlay. Level `max_level` holds the image
//! at full resolution and is shown at map zoom 0; every level below halves the
//! resolution, so level `n` corresponds to map zoom `n - max_level`. Tiles are
//! addressed from the top-left corner, which is why pyramids always use the
//! [`VerticalAxis::TopLeft`] convention.

use crate::{
    core::{
        bounds::Bounds,
        constants::TILE_SIZE,
        crs::VerticalAxis,
        fit::{FitOptions, FitResult, ViewportFitCalculator},
        geo::{ImageSize, LatLng, LatLngBounds, Point, TileCoord, ViewportSize},
    },
    MapError, Result,
};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TilePyramid {
    image: ImageSize,
    tile_size: u32,
    max_level: u8,
}

impl TilePyramid {
    pub fn new(image: ImageSize, max_level: u8) -> Result<Self> {
        Self::with_tile_size(image, max_level, TILE_SIZE)
    }

    pub fn with_tile_size(image: ImageSize, max_level: u8, tile_size: u32) -> Result<Self> {
        image.validate()?;
        if tile_size == 0 {
            return Err(MapError::InvalidInput("tile size must be positive".into()));
        }
        if max_level > 30 {
            return Err(MapError::InvalidInput(format!(
                "max tile level {max_level} is out of range"
            )));
        }
        Ok(Self {
            image,
            tile_size,
            max_level,
        })
    }

    /// Number of levels a tiler produces for `image` so that level 0 fits a single tile
    pub fn levels_needed(image: ImageSize, tile_size: u32) -> u8 {
        let longest = image.width.max(image.height) / tile_size as f64;
        if longest <= 1.0 {
            0
        } else {
            longest.log2().ceil() as u8
        }
    }

    pub fn image(&self) -> ImageSize {
        self.image
    }

    pub fn tile_size(&self) -> u32 {
        self.tile_size
    }

    pub fn max_level(&self) -> u8 {
        self.max_level
    }

    pub fn level_count(&self) -> usize {
        self.max_level as usize + 1
    }

    /// Map units covered by one tile edge at `level`
    pub fn units_per_tile(&self, level: u8) -> f64 {
        let level = level.min(self.max_level);
        self.tile_size as f64 * 2_f64.powi((self.max_level - level) as i32)
    }

    /// Tile-space zoom (pyramid level, fractional) for a map zoom
    pub fn tile_space_zoom(&self, map_zoom: f64) -> f64 {
        map_zoom + self.max_level as f64
    }

    /// Level to draw at `map_zoom`: rounded, then clamped to the pyramid.
    /// Zooms past the last level overzoom the full-resolution tiles.
    pub fn level_for_zoom(&self, map_zoom: f64) -> u8 {
        self.tile_space_zoom(map_zoom)
            .round()
            .clamp(0.0, self.max_level as f64) as u8
    }

    /// Image size in pixels at `level`
    pub fn extent_at_level(&self, level: u8) -> ImageSize {
        let factor = 2_f64.powi((self.max_level - level.min(self.max_level)) as i32);
        ImageSize::new(self.image.width / factor, self.image.height / factor)
    }

    /// Columns and rows of tiles at `level`
    pub fn tiles_at_level(&self, level: u8) -> (u32, u32) {
        let unit = self.units_per_tile(level);
        (
            (self.image.width / unit).ceil() as u32,
            (self.image.height / unit).ceil() as u32,
        )
    }

    /// The pyramid's full extent in map space
    pub fn bounds(&self) -> LatLngBounds {
        VerticalAxis::TopLeft.image_bounds(self.image)
    }

    /// Map-space bounds of a single tile, clipped to the image
    pub fn tile_bounds(&self, coord: TileCoord) -> LatLngBounds {
        let unit = self.units_per_tile(coord.z);
        let min_x = coord.x as f64 * unit;
        let min_y = coord.y as f64 * unit;
        let max_x = (min_x + unit).min(self.image.width);
        let max_y = (min_y + unit).min(self.image.height);
        LatLngBounds::new(
            VerticalAxis::TopLeft.image_to_lat_lng(Point::new(min_x, max_y), self.image),
            VerticalAxis::TopLeft.image_to_lat_lng(Point::new(max_x, min_y), self.image),
        )
    }

    /// Tiles at `level` that intersect `visible` (map space)
    pub fn tile_range(&self, visible: &LatLngBounds, level: u8) -> Vec<TileCoord> {
        let level = level.min(self.max_level);
        let axis = VerticalAxis::TopLeft;
        let nw = axis.lat_lng_to_image(LatLng::new(visible.north_east.lat, visible.south_west.lng), self.image);
        let se = axis.lat_lng_to_image(LatLng::new(visible.south_west.lat, visible.north_east.lng), self.image);

        let image_rect = Bounds::from_coords(0.0, 0.0, self.image.width, self.image.height);
        let Some(area) = Bounds::new(nw, se).intersection(&image_rect) else {
            return Vec::new();
        };
        if area.width() <= 0.0 || area.height() <= 0.0 {
            return Vec::new();
        }

        let unit = self.units_per_tile(level);
        let tile_area = area.scaled(1.0 / unit);
        let (cols, rows) = self.tiles_at_level(level);
        let x0 = tile_area.min.x.floor() as u32;
        let y0 = tile_area.min.y.floor() as u32;
        let x1 = (tile_area.max.x.ceil() as u32).min(cols);
        let y1 = (tile_area.max.y.ceil() as u32).min(rows);

        let mut coords = Vec::with_capacity(((x1 - x0) * (y1 - y0)) as usize);
        for y in y0..y1 {
            for x in x0..x1 {
                coords.push(TileCoord::new(x, y, level));
            }
        }
        coords
    }

    /// Cover fit in map units, always in the top-left convention
    pub fn fit(&self, viewport: ViewportSize, options: &FitOptions) -> Result<FitResult> {
        let options = FitOptions {
            axis: VerticalAxis::TopLeft,
            ..options.clone()
        };
        ViewportFitCalculator::fit(viewport, self.image, &options)
    }

    /// Pyramid level needed to draw the image at cover zoom
    pub fn cover_level(&self, viewport: ViewportSize) -> Result<u8> {
        let cover = ViewportFitCalculator::compute_cover_zoom(viewport, self.image)?;
        Ok(self.level_for_zoom(cover))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn atlas() -> TilePyramid {
        TilePyramid::new(ImageSize::new(11520.0, 6480.0), 6).unwrap()
    }

    #[test]
    fn test_bounds_negate_vertical_axis() {
        assert_eq!(
            atlas().bounds(),
            LatLngBounds::from_coords(-6480.0, 0.0, 0.0, 11520.0)
        );
    }

    #[test]
    fn test_levels() {
        let pyramid = atlas();
        assert_eq!(pyramid.level_count(), 7);
        assert_eq!(pyramid.tiles_at_level(6), (45, 26));
        assert_eq!(pyramid.tiles_at_level(0), (1, 1));
        assert_eq!(pyramid.extent_at_level(5), ImageSize::new(5760.0, 3240.0));
        assert_eq!(TilePyramid::levels_needed(ImageSize::new(11520.0, 6480.0), 256), 6);
        assert_eq!(TilePyramid::levels_needed(ImageSize::new(200.0, 100.0), 256), 0);
    }

    #[test]
    fn test_level_for_zoom() {
        let pyramid = atlas();
        assert_eq!(pyramid.level_for_zoom(0.0), 6);
        assert_eq!(pyramid.level_for_zoom(1.5), 6);
        assert_eq!(pyramid.level_for_zoom(-3.2), 3);
        assert_eq!(pyramid.level_for_zoom(-20.0), 0);
    }

    #[test]
    fn test_tile_range_covers_visible_area() {
        let pyramid = atlas();
        let visible = LatLngBounds::from_coords(-600.0, 100.0, -10.0, 700.0);
        let tiles = pyramid.tile_range(&visible, 6);

        assert_eq!(tiles.len(), 3 * 3);
        assert!(tiles.contains(&TileCoord::new(0, 0, 6)));
        assert!(tiles.contains(&TileCoord::new(2, 2, 6)));
        for tile in &tiles {
            assert!(pyramid.tile_bounds(*tile).intersects(&visible));
        }
    }

    #[test]
    fn test_tile_range_outside_image_is_empty() {
        let visible = LatLngBounds::from_coords(10.0, 0.0, 500.0, 500.0);
        assert!(atlas().tile_range(&visible, 6).is_empty());
    }

    #[test]
    fn test_edge_tile_bounds_are_clipped() {
        let pyramid = atlas();
        let bounds = pyramid.tile_bounds(TileCoord::new(44, 25, 6));
        assert_eq!(bounds.north_east.lng, 11520.0);
        assert_eq!(bounds.south_west.lat, -6480.0);
    }

    #[test]
    fn test_fit_in_tile_space() {
        let pyramid = atlas();
        let viewport = ViewportSize::new(1280.0, 720.0);
        let fit = pyramid.fit(viewport, &FitOptions::default()).unwrap();

        assert_eq!(fit.bounds, pyramid.bounds());
        assert!((fit.cover_zoom - (1.0_f64 / 9.0).log2()).abs() < 1e-12);
        assert_eq!(pyramid.cover_level(viewport).unwrap(), 3);
    }
}
