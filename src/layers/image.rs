use crate::{
    core::geo::LatLngBounds,
    layers::base::{LayerProperties, LayerTrait, LayerType},
    Result,
};

/// A single image stretched over fixed bounds
pub struct ImageOverlay {
    properties: LayerProperties,
    url: String,
    bounds: LatLngBounds,
}

impl ImageOverlay {
    pub fn new(id: String, url: String, bounds: LatLngBounds) -> Self {
        let properties = LayerProperties::new(id, "Image Overlay".to_string(), LayerType::Image);
        Self {
            properties,
            url,
            bounds,
        }
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl LayerTrait for ImageOverlay {
    crate::impl_layer_trait!(ImageOverlay, properties);

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(self.bounds.clone())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "url": self.url,
            "opacity": self.properties.opacity,
            "z_index": self.properties.z_index,
            "bounds": {
                "south": self.bounds.south_west.lat,
                "west": self.bounds.south_west.lng,
                "north": self.bounds.north_east.lat,
                "east": self.bounds.north_east.lng
            }
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        self.properties.apply_options(&options);
        if let Some(url) = options.get("url").and_then(|v| v.as_str()) {
            self.url = url.to_string();
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_overlay_reports_bounds_and_options() {
        let bounds = LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0);
        let mut overlay = ImageOverlay::new("map".to_string(), "map.png".to_string(), bounds.clone());

        assert_eq!(overlay.layer_type(), LayerType::Image);
        assert_eq!(overlay.bounds(), Some(bounds));
        assert_eq!(overlay.options()["bounds"]["north"], 2000.0);

        overlay
            .set_options(serde_json::json!({ "url": "other.png", "opacity": 0.5 }))
            .unwrap();
        assert_eq!(overlay.url(), "other.png");
        assert_eq!(overlay.opacity(), 0.5);
    }
}
