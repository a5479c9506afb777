use crate::{
    core::{
        config::ViewerOptions,
        geo::{LatLng, LatLngBounds, Point, ViewportSize},
        viewport::Viewport,
    },
    input::{events::MapEvent, handler::EventManager},
    layers::{base::LayerTrait, manager::LayerManager},
    traits::DisplaySurface,
    Result,
};

/// Headless display widget: a viewport, its layers and an event queue.
///
/// This is the in-process implementation of [`DisplaySurface`]. It keeps the
/// same rules a browser slippy-map widget applies (zoom snapping, zoom limits,
/// max bounds) so that view sessions behave identically against it.
pub struct Map {
    pub viewport: Viewport,
    layer_manager: LayerManager,
    event_manager: EventManager,
    options: ViewerOptions,
}

impl Map {
    pub fn new(size: ViewportSize) -> Self {
        Self::with_options(size, ViewerOptions::default())
    }

    pub fn with_options(size: ViewportSize, options: ViewerOptions) -> Self {
        let mut viewport = Viewport::new(LatLng::default(), 0.0, size.as_point());
        viewport.set_zoom_limits(options.min_zoom, options.max_zoom);
        viewport.zoom_snap = options.zoom_snap;

        Self {
            viewport,
            layer_manager: LayerManager::new(),
            event_manager: EventManager::new(),
            options,
        }
    }

    pub fn viewport(&self) -> &Viewport {
        &self.viewport
    }

    pub fn options(&self) -> &ViewerOptions {
        &self.options
    }

    pub fn get_layer(&self, layer_id: &str) -> Option<&dyn LayerTrait> {
        self.layer_manager.get_layer(layer_id)
    }

    pub fn on<F>(&mut self, event_type: &str, callback: F)
    where
        F: Fn(&MapEvent) + Send + Sync + 'static,
    {
        self.event_manager.on(event_type, callback);
    }

    pub fn process_events(&mut self) -> Vec<MapEvent> {
        self.event_manager.process_events()
    }

    /// Drag the view by a pixel delta; returns the delta actually applied
    pub fn pan(&mut self, delta: Point) -> Result<Point> {
        if !self.options.dragging {
            return Ok(Point::default());
        }
        let applied = self.viewport.pan(delta);
        self.after_view_change()?;
        Ok(applied)
    }

    /// Zoom to `zoom`, keeping `focus_point` (container pixels) in place
    pub fn zoom_to(&mut self, zoom: f64, focus_point: Option<Point>) -> Result<()> {
        self.viewport.zoom_to(zoom, focus_point);
        self.after_view_change()
    }

    pub fn zoom_in(&mut self) -> Result<()> {
        self.zoom_to(self.viewport.zoom + self.options.zoom_delta, None)
    }

    pub fn zoom_out(&mut self) -> Result<()> {
        self.zoom_to(self.viewport.zoom - self.options.zoom_delta, None)
    }

    fn after_view_change(&mut self) -> Result<()> {
        self.event_manager.emit(MapEvent::ViewChanged {
            center: self.viewport.center,
            zoom: self.viewport.zoom,
        });
        self.layer_manager.update(&self.viewport)
    }
}

impl DisplaySurface for Map {
    fn size(&self) -> ViewportSize {
        ViewportSize::from(self.viewport.size)
    }

    fn attach_layer(&mut self, mut layer: Box<dyn LayerTrait>) -> Result<()> {
        let layer_id = layer.id().to_string();
        layer.update(&self.viewport)?;
        self.layer_manager.add_layer(layer)?;
        log::debug!("attached layer {layer_id}");
        self.event_manager.emit(MapEvent::LayerAdd { layer_id });
        Ok(())
    }

    fn remove_layer(&mut self, layer_id: &str) -> Result<bool> {
        if self.layer_manager.remove_layer(layer_id).is_some() {
            log::debug!("removed layer {layer_id}");
            self.event_manager.emit(MapEvent::LayerRemove {
                layer_id: layer_id.to_string(),
            });
            Ok(true)
        } else {
            Ok(false)
        }
    }

    fn active_layers(&self) -> Vec<String> {
        self.layer_manager.list_layers()
    }

    fn set_view(&mut self, center: LatLng, zoom: f64) -> Result<()> {
        let old_center = self.viewport.center;
        let old_zoom = self.viewport.zoom;

        // zoom first: how far the center may move depends on the visible span
        self.viewport.set_zoom(zoom);
        self.viewport.set_center(center);

        if self.viewport.center != old_center || self.viewport.zoom != old_zoom {
            self.after_view_change()?;
        }
        Ok(())
    }

    fn set_min_zoom(&mut self, zoom: f64) -> Result<()> {
        let old_zoom = self.viewport.zoom;
        self.viewport.set_min_zoom(zoom);
        self.event_manager.emit(MapEvent::ZoomLimitsChanged {
            min_zoom: self.viewport.min_zoom,
            max_zoom: self.viewport.max_zoom,
        });
        if self.viewport.zoom != old_zoom {
            self.after_view_change()?;
        }
        Ok(())
    }

    fn set_max_bounds(&mut self, bounds: Option<LatLngBounds>, viscosity: f64) -> Result<()> {
        let old_center = self.viewport.center;
        self.viewport.set_max_bounds(bounds.clone(), Some(viscosity));
        self.event_manager
            .emit(MapEvent::MaxBoundsChanged { bounds, viscosity });
        if self.viewport.center != old_center {
            self.after_view_change()?;
        }
        Ok(())
    }

    fn invalidate_size(&mut self, size: ViewportSize) -> Result<()> {
        if ViewportSize::from(self.viewport.size) == size {
            return Ok(());
        }
        self.viewport.set_size(size.as_point());
        self.event_manager.emit(MapEvent::Resize { size });
        self.layer_manager.update(&self.viewport)
    }

    fn zoom(&self) -> f64 {
        self.viewport.zoom
    }

    fn min_zoom(&self) -> f64 {
        self.viewport.min_zoom
    }

    fn max_zoom(&self) -> f64 {
        self.viewport.max_zoom
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::layers::image::ImageOverlay;

    fn test_map() -> Map {
        let options = ViewerOptions {
            zoom_snap: 0.0,
            ..ViewerOptions::default()
        };
        Map::with_options(ViewportSize::new(1000.0, 800.0), options)
    }

    #[test]
    fn test_map_creation() {
        let map = Map::new(ViewportSize::new(1000.0, 800.0));
        assert_eq!(map.size(), ViewportSize::new(1000.0, 800.0));
        assert_eq!(map.viewport().min_zoom, -2.0);
        assert_eq!(map.viewport().zoom_snap, 0.1);
        assert!(map.active_layers().is_empty());
    }

    #[test]
    fn test_layer_management() {
        let mut map = test_map();
        let overlay = ImageOverlay::new(
            "map".to_string(),
            "map.png".to_string(),
            LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0),
        );
        map.attach_layer(Box::new(overlay)).unwrap();
        assert_eq!(map.active_layers(), vec!["map"]);

        assert!(map.remove_layer("map").unwrap());
        assert!(!map.remove_layer("map").unwrap());

        let events = map.process_events();
        assert_eq!(
            events,
            vec![
                MapEvent::LayerAdd { layer_id: "map".to_string() },
                MapEvent::LayerRemove { layer_id: "map".to_string() },
            ]
        );
    }

    #[test]
    fn test_min_zoom_pulls_current_zoom_up() {
        let mut map = test_map();
        map.set_view(LatLng::new(1000.0, 2000.0), -1.8).unwrap();
        map.set_min_zoom(-1.3).unwrap();
        assert_eq!(map.zoom(), -1.3);
    }

    #[test]
    fn test_rigid_bounds_block_panning_past_image() {
        let mut map = test_map();
        let bounds = LatLngBounds::from_coords(0.0, 0.0, 2000.0, 4000.0);
        map.set_view(LatLng::new(1000.0, 2000.0), -1.0).unwrap();
        map.set_max_bounds(Some(bounds.clone()), 1.0).unwrap();

        map.pan(Point::new(5000.0, -5000.0)).unwrap();
        assert!(bounds.contains_bounds(&map.viewport().bounds()));
    }

    #[test]
    fn test_pan_ignored_when_dragging_disabled() {
        let options = ViewerOptions {
            dragging: false,
            ..ViewerOptions::default()
        };
        let mut map = Map::with_options(ViewportSize::new(1000.0, 800.0), options);
        map.set_view(LatLng::new(1000.0, 2000.0), -1.0).unwrap();
        map.process_events();

        let before = map.viewport().center;
        assert_eq!(map.pan(Point::new(300.0, 0.0)).unwrap(), Point::default());
        assert_eq!(map.viewport().center, before);
        assert!(map.process_events().is_empty());
    }

    #[test]
    fn test_invalidate_size_emits_resize_once() {
        let mut map = test_map();
        map.invalidate_size(ViewportSize::new(500.0, 500.0)).unwrap();
        map.invalidate_size(ViewportSize::new(500.0, 500.0)).unwrap();

        let resizes = map
            .process_events()
            .into_iter()
            .filter(|e| matches!(e, MapEvent::Resize { .. }))
            .count();
        assert_eq!(resizes, 1);
        assert_eq!(map.size(), ViewportSize::new(500.0, 500.0));
    }

    #[test]
    fn test_zoom_in_uses_zoom_delta() {
        let mut map = test_map();
        map.zoom_in().unwrap();
        assert!((map.zoom() - 0.1).abs() < 1e-9);
        map.zoom_out().unwrap();
        map.zoom_out().unwrap();
        assert!((map.zoom() + 0.1).abs() < 1e-9);
    }
}
