use crate::{
    core::viewport::Viewport, layers::base::LayerTrait, prelude::HashMap, MapError, Result,
};

/// Manages layers for the map, handling ordering and viewport updates
pub struct LayerManager {
    /// All layers indexed by ID
    layers: HashMap<String, Box<dyn LayerTrait>>,
    /// Ordered list of layer IDs for rendering (sorted by z-index)
    render_order: Vec<String>,
}

impl LayerManager {
    pub fn new() -> Self {
        Self {
            layers: HashMap::default(),
            render_order: Vec::new(),
        }
    }

    /// Adds a layer to the manager. Ids must be unique.
    pub fn add_layer(&mut self, layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        if self.layers.contains_key(&layer_id) {
            return Err(MapError::Layer(format!("layer '{layer_id}' already attached")));
        }
        let z_index = layer.z_index();

        self.layers.insert(layer_id.clone(), layer);

        // Insert in sorted order by z-index
        let insert_pos = self
            .render_order
            .iter()
            .position(|id| {
                self.layers
                    .get(id)
                    .map(|l| l.z_index() > z_index)
                    .unwrap_or(false)
            })
            .unwrap_or(self.render_order.len());

        self.render_order.insert(insert_pos, layer_id);
        Ok(())
    }

    /// Removes a layer from the manager
    pub fn remove_layer(&mut self, layer_id: &str) -> Option<Box<dyn LayerTrait>> {
        self.render_order.retain(|id| id != layer_id);
        self.layers.remove(layer_id)
    }

    /// Gets a reference to a layer by ID
    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layers.get(layer_id).map(|l| l.as_ref())
    }

    /// Layer ids in render order
    pub fn list_layers(&self) -> Vec<String> {
        self.render_order.clone()
    }

    /// Lets every visible layer that intersects the view refresh itself
    pub fn update(&mut self, viewport: &Viewport) -> Result<()> {
        let view_bounds = viewport.bounds();
        for id in &self.render_order {
            if let Some(layer) = self.layers.get_mut(id) {
                if layer.is_visible() && layer.intersects_bounds(&view_bounds) {
                    layer.update(viewport)?;
                }
            }
        }
        Ok(())
    }

    /// Gets the number of layers
    pub fn len(&self) -> usize {
        self.layers.len()
    }

    /// Checks if the manager is empty
    pub fn is_empty(&self) -> bool {
        self.layers.is_empty()
    }
}

impl Default for LayerManager {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{core::geo::LatLngBounds, layers::image::ImageOverlay};

    fn overlay(id: &str, z: i32) -> Box<dyn LayerTrait> {
        let mut layer = ImageOverlay::new(
            id.to_string(),
            format!("{id}.png"),
            LatLngBounds::from_coords(0.0, 0.0, 10.0, 10.0),
        );
        layer.set_z_index(z);
        Box::new(layer)
    }

    #[test]
    fn test_render_order_follows_z_index() {
        let mut manager = LayerManager::new();
        manager.add_layer(overlay("top", 5)).unwrap();
        manager.add_layer(overlay("bottom", 0)).unwrap();
        manager.add_layer(overlay("middle", 2)).unwrap();

        assert_eq!(manager.list_layers(), vec!["bottom", "middle", "top"]);
    }

    #[test]
    fn test_duplicate_ids_rejected() {
        let mut manager = LayerManager::new();
        manager.add_layer(overlay("a", 0)).unwrap();
        assert!(matches!(manager.add_layer(overlay("a", 1)), Err(MapError::Layer(_))));
        assert_eq!(manager.len(), 1);
    }

    #[test]
    fn test_remove_layer() {
        let mut manager = LayerManager::new();
        manager.add_layer(overlay("a", 0)).unwrap();
        assert!(manager.remove_layer("a").is_some());
        assert!(manager.remove_layer("a").is_none());
        assert!(manager.is_empty());
        assert!(manager.list_layers().is_empty());
    }
}
