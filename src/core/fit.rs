//! Cover-fit zoom and bounds computation.
//!
//! Given the pixel size of the viewport and of an image, work out the zoom at
//! which the image covers the viewport edge to edge (CSS `object-fit: cover`),
//! the zoom to open the view at, and the pan bounds that keep the image filling
//! the screen. With the flat CRS, `scale = 2^zoom`, so the cover zoom is the
//! base-2 logarithm of the larger of the two axis ratios.

use crate::{
    core::{
        constants::DEFAULT_BOOST,
        crs::{SimpleCrs, VerticalAxis},
        geo::{ImageSize, LatLng, LatLngBounds, Point, ViewportSize},
    },
    Result,
};
use serde::{Deserialize, Serialize};

/// Knobs for [`ViewportFitCalculator::fit`]
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FitOptions {
    /// Zoom added on top of cover zoom for the opening view
    pub boost: f64,
    /// Upper limit for the start zoom, normally the widget's max zoom
    pub max_zoom: Option<f64>,
    /// Vertical convention used for bounds and focus points
    pub axis: VerticalAxis,
    /// Point to open the view on, in image pixels (top-left origin)
    pub focus: Option<Point>,
}

impl Default for FitOptions {
    fn default() -> Self {
        Self {
            boost: DEFAULT_BOOST,
            max_zoom: None,
            axis: VerticalAxis::BottomLeft,
            focus: None,
        }
    }
}

/// Derived view parameters; recomputed on every size change, never stored
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FitResult {
    pub cover_zoom: f64,
    /// Zoom requested for the opening view. A widget with zoom snapping lands
    /// on the nearest snap step at or above `cover_zoom` instead.
    pub start_zoom: f64,
    pub bounds: LatLngBounds,
    pub center: LatLng,
}

/// Stateless calculator for cover zoom, start zoom and bounds
pub struct ViewportFitCalculator;

impl ViewportFitCalculator {
    /// Zoom at which the image exactly fills the viewport along its more
    /// constrained axis without under-filling the other one.
    pub fn compute_cover_zoom(viewport: ViewportSize, image: ImageSize) -> Result<f64> {
        image.validate()?;
        viewport.validate()?;

        let scale_x = viewport.width / image.width;
        let scale_y = viewport.height / image.height;
        Ok(SimpleCrs::zoom(scale_x.max(scale_y)))
    }

    /// Opening zoom: cover zoom plus a non-negative boost.
    /// Negative boosts are treated as zero so the view never opens below cover.
    pub fn compute_start_zoom(cover_zoom: f64, boost: f64) -> f64 {
        cover_zoom + boost.max(0.0)
    }

    /// Keeps the start zoom inside `[cover_zoom, max_zoom]`.
    /// When the widget maximum is below cover zoom, cover wins: showing
    /// background would break the cover invariant.
    pub fn clamp_start_zoom(start_zoom: f64, cover_zoom: f64, max_zoom: f64) -> f64 {
        start_zoom.clamp(cover_zoom, max_zoom.max(cover_zoom))
    }

    /// The image's native extent in map space. Depends only on the image.
    pub fn compute_bounds(image: ImageSize, axis: VerticalAxis) -> Result<LatLngBounds> {
        image.validate()?;
        Ok(axis.image_bounds(image))
    }

    /// Full fit: cover zoom, clamped start zoom, bounds and opening center
    pub fn fit(viewport: ViewportSize, image: ImageSize, options: &FitOptions) -> Result<FitResult> {
        let cover_zoom = Self::compute_cover_zoom(viewport, image)?;
        let mut start_zoom = Self::compute_start_zoom(cover_zoom, options.boost);
        if let Some(max_zoom) = options.max_zoom {
            start_zoom = Self::clamp_start_zoom(start_zoom, cover_zoom, max_zoom);
        }

        let bounds = Self::compute_bounds(image, options.axis)?;
        let focus = options
            .focus
            .map(|p| Point::new(p.x.clamp(0.0, image.width), p.y.clamp(0.0, image.height)))
            .unwrap_or_else(|| image.center());
        let center = options.axis.image_to_lat_lng(focus, image);

        log::debug!(
            "fit {}x{} into {}x{}: cover={:.4} start={:.4}",
            image.width,
            image.height,
            viewport.width,
            viewport.height,
            cover_zoom,
            start_zoom
        );

        Ok(FitResult {
            cover_zoom,
            start_zoom,
            bounds,
            center,
        })
    }
}
