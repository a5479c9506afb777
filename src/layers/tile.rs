use crate::{
    core::{geo::{LatLngBounds, TileCoord}, viewport::Viewport},
    layers::base::{LayerProperties, LayerTrait, LayerType},
    tiles::{pyramid::TilePyramid, source::TileSource},
    Result,
};

/// Tile layer over a z/x/y pyramid of one large image
pub struct TileLayer {
    properties: LayerProperties,
    source: Box<dyn TileSource>,
    pyramid: TilePyramid,
    /// Tiles needed for the last viewport this layer was updated with
    visible_tiles: Vec<TileCoord>,
    current_level: Option<u8>,
}

impl TileLayer {
    pub fn new(id: String, source: Box<dyn TileSource>, pyramid: TilePyramid) -> Self {
        let properties = LayerProperties::new(id, "Tile Layer".to_string(), LayerType::Tile);
        Self {
            properties,
            source,
            pyramid,
            visible_tiles: Vec::new(),
            current_level: None,
        }
    }

    pub fn pyramid(&self) -> &TilePyramid {
        &self.pyramid
    }

    pub fn visible_tiles(&self) -> &[TileCoord] {
        &self.visible_tiles
    }

    pub fn current_level(&self) -> Option<u8> {
        self.current_level
    }

    /// URLs for the tiles needed by the last viewport update
    pub fn tile_urls(&self) -> Vec<String> {
        self.visible_tiles
            .iter()
            .map(|coord| self.source.url(*coord))
            .collect()
    }
}

impl LayerTrait for TileLayer {
    crate::impl_layer_trait!(TileLayer, properties);

    fn update(&mut self, viewport: &Viewport) -> Result<()> {
        let level = self.pyramid.level_for_zoom(viewport.zoom);
        self.visible_tiles = self.pyramid.tile_range(&viewport.bounds(), level);
        self.current_level = Some(level);
        log::trace!(
            "tile layer {}: level {} needs {} tiles",
            self.properties.id,
            level,
            self.visible_tiles.len()
        );
        Ok(())
    }

    fn bounds(&self) -> Option<LatLngBounds> {
        Some(self.pyramid.bounds())
    }

    fn options(&self) -> serde_json::Value {
        serde_json::json!({
            "tile_size": self.pyramid.tile_size(),
            "max_native_zoom": self.pyramid.max_level(),
            "opacity": self.properties.opacity,
            "z_index": self.properties.z_index,
        })
    }

    fn set_options(&mut self, options: serde_json::Value) -> Result<()> {
        self.properties.apply_options(&options);
        Ok(())
    }
}
