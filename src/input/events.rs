use crate::core::geo::{LatLng, LatLngBounds, ViewportSize};

/// Map event types that can be emitted by the map
#[derive(Debug, Clone, PartialEq)]
pub enum MapEvent {
    /// Map view has changed (center or zoom)
    ViewChanged { center: LatLng, zoom: f64 },
    /// Zoom limits changed
    ZoomLimitsChanged { min_zoom: f64, max_zoom: f64 },
    /// Pan restriction changed
    MaxBoundsChanged {
        bounds: Option<LatLngBounds>,
        viscosity: f64,
    },
    /// Container was resized
    Resize { size: ViewportSize },
    /// Layer was added to the map
    LayerAdd { layer_id: String },
    /// Layer was removed from the map
    LayerRemove { layer_id: String },
}

impl MapEvent {
    /// Listener key for this event
    pub fn event_type(&self) -> &'static str {
        match self {
            MapEvent::ViewChanged { .. } => "viewchanged",
            MapEvent::ZoomLimitsChanged { .. } => "zoomlevelschange",
            MapEvent::MaxBoundsChanged { .. } => "maxboundschange",
            MapEvent::Resize { .. } => "resize",
            MapEvent::LayerAdd { .. } => "layeradd",
            MapEvent::LayerRemove { .. } => "layerremove",
        }
    }
}

/// UI-side triggers a view session reacts to
#[derive(Debug, Clone, PartialEq)]
pub enum SessionInput {
    /// The view-toggle button was pressed
    ToggleView,
    /// Open a specific declared view
    SwitchView(String),
    /// The container was resized
    Resize(ViewportSize),
    /// Container layout has settled and its size can be trusted
    LayoutStable,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_event_types() {
        let event = MapEvent::LayerAdd {
            layer_id: "map".to_string(),
        };
        assert_eq!(event.event_type(), "layeradd");

        let event = MapEvent::Resize {
            size: ViewportSize::new(10.0, 10.0),
        };
        assert_eq!(event.event_type(), "resize");
    }
}
