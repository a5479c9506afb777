//! Configuration for the viewer widget and the views it can show
//!
//! Options are grouped the same way the viewer uses them: widget behaviour
//! (`ViewerOptions`), fit behaviour (`FitOptions`) and the declared views.
//! Profiles provide presets for the two kinds of asset the viewer handles,
//! and a whole [`ViewerConfig`] can be loaded from a JSON file.

use crate::{
    core::{
        constants::{
            DEFAULT_BOOST, DEFAULT_MAX_ZOOM, DEFAULT_MIN_ZOOM, DEFAULT_ZOOM_DELTA,
            DEFAULT_ZOOM_SNAP,
        },
        crs::VerticalAxis,
        fit::FitOptions,
    },
    prelude::HashSet,
    session::View,
    tiles::source::TemplateSource,
    MapError, Result,
};
use serde::{Deserialize, Serialize};
use std::path::Path;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ViewerProfile {
    /// One large image stretched over its bounds
    #[default]
    SingleImage,
    /// A z/x/y pyramid addressed from the top-left corner
    TilePyramid,
}

impl ViewerProfile {
    pub fn resolve(&self) -> (ViewerOptions, FitOptions) {
        match self {
            Self::SingleImage => (
                ViewerOptions::default(),
                FitOptions {
                    boost: DEFAULT_BOOST,
                    max_zoom: Some(DEFAULT_MAX_ZOOM),
                    axis: VerticalAxis::BottomLeft,
                    focus: None,
                },
            ),
            Self::TilePyramid => (
                ViewerOptions {
                    min_zoom: -6.0,
                    max_zoom: 0.0,
                    ..ViewerOptions::default()
                },
                FitOptions {
                    boost: 0.4,
                    max_zoom: Some(0.0),
                    axis: VerticalAxis::TopLeft,
                    focus: None,
                },
            ),
        }
    }
}

/// Widget behaviour, mirroring the options a slippy-map widget is created with
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ViewerOptions {
    pub min_zoom: f64,
    pub max_zoom: f64,
    pub zoom_snap: f64,
    pub zoom_delta: f64,
    /// Whether `Map::pan` moves the view
    pub dragging: bool,
}

impl Default for ViewerOptions {
    fn default() -> Self {
        Self {
            min_zoom: DEFAULT_MIN_ZOOM,
            max_zoom: DEFAULT_MAX_ZOOM,
            zoom_snap: DEFAULT_ZOOM_SNAP,
            zoom_delta: DEFAULT_ZOOM_DELTA,
            dragging: true,
        }
    }
}

impl ViewerOptions {
    pub fn validate(&self) -> Result<()> {
        if !(self.min_zoom.is_finite() && self.max_zoom.is_finite()) {
            return Err(MapError::Config("zoom limits must be finite".into()));
        }
        if self.min_zoom > self.max_zoom {
            return Err(MapError::Config(format!(
                "min_zoom {} is above max_zoom {}",
                self.min_zoom, self.max_zoom
            )));
        }
        if self.zoom_snap < 0.0 || self.zoom_delta <= 0.0 {
            return Err(MapError::Config(
                "zoom_snap must be >= 0 and zoom_delta > 0".into(),
            ));
        }
        Ok(())
    }
}

/// Everything needed to stand up a viewer: widget options, fit options and
/// the catalog of views the toggle cycles through.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ViewerConfig {
    #[serde(default)]
    pub options: ViewerOptions,
    #[serde(default)]
    pub fit: FitOptions,
    pub views: Vec<View>,
}

impl ViewerConfig {
    pub fn from_json_str(json: &str) -> Result<Self> {
        let config: ViewerConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        log::debug!("loading viewer config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }

    pub fn validate(&self) -> Result<()> {
        self.options.validate()?;
        if self.views.is_empty() {
            return Err(MapError::Config("at least one view must be declared".into()));
        }

        let mut seen = HashSet::default();
        for view in &self.views {
            if !seen.insert(view.id.as_str()) {
                return Err(MapError::Config(format!("duplicate view id '{}'", view.id)));
            }
            if let Some(size) = view.size {
                size.validate()?;
            }
            if view.is_tiled() && !TemplateSource::is_template(&view.locator) {
                return Err(MapError::Config(format!(
                    "tiled view '{}' needs a {{z}}/{{x}}/{{y}} locator",
                    view.id
                )));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const CONFIG: &str = r#"{
        "options": { "min_zoom": -3.0, "max_zoom": 1.0 },
        "fit": { "boost": 0.4 },
        "views": [
            { "id": "map", "locator": "https://example.com/map.png",
              "size": { "width": 4000.0, "height": 2000.0 } },
            { "id": "atlas", "locator": "https://example.com/tiles/{z}/{x}/{y}.png",
              "size": { "width": 11520.0, "height": 6480.0 }, "max_tile_zoom": 6 }
        ]
    }"#;

    #[test]
    fn test_profiles_resolve() {
        let (options, fit) = ViewerProfile::SingleImage.resolve();
        assert_eq!(options.min_zoom, -2.0);
        assert_eq!(options.zoom_snap, 0.1);
        assert_eq!(fit.axis, VerticalAxis::BottomLeft);

        let (_, fit) = ViewerProfile::TilePyramid.resolve();
        assert_eq!(fit.axis, VerticalAxis::TopLeft);

        assert_eq!(ViewerProfile::default(), ViewerProfile::SingleImage);
    }

    #[test]
    fn test_parse_config() {
        let config = ViewerConfig::from_json_str(CONFIG).unwrap();
        assert_eq!(config.options.min_zoom, -3.0);
        assert_eq!(config.options.zoom_snap, DEFAULT_ZOOM_SNAP);
        assert_eq!(config.fit.boost, 0.4);
        assert_eq!(config.fit.axis, VerticalAxis::BottomLeft);
        assert_eq!(config.views.len(), 2);
        assert!(config.views[1].is_tiled());
    }

    #[test]
    fn test_rejects_duplicate_ids_and_empty_catalog() {
        let dup = r#"{ "views": [ { "id": "a", "locator": "x" }, { "id": "a", "locator": "y" } ] }"#;
        assert!(matches!(ViewerConfig::from_json_str(dup), Err(MapError::Config(_))));

        let empty = r#"{ "views": [] }"#;
        assert!(matches!(ViewerConfig::from_json_str(empty), Err(MapError::Config(_))));
    }

    #[test]
    fn test_tiled_view_needs_template() {
        let json = r#"{ "views": [ { "id": "a", "locator": "atlas.png", "max_tile_zoom": 4 } ] }"#;
        assert!(matches!(ViewerConfig::from_json_str(json), Err(MapError::Config(_))));
    }

    #[test]
    fn test_rejects_inverted_zoom_limits() {
        let options = ViewerOptions {
            min_zoom: 2.0,
            max_zoom: -2.0,
            ..ViewerOptions::default()
        };
        assert!(options.validate().is_err());
    }

    #[test]
    fn test_from_path() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("viewer.json");
        std::fs::write(&path, CONFIG).unwrap();

        let config = ViewerConfig::from_path(&path).unwrap();
        assert_eq!(config.views[0].id, "map");
        assert!(ViewerConfig::from_path(dir.path().join("missing.json")).is_err());
    }
}
