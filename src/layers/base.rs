// LayerTrait is the shared LayerOperations trait
pub use crate::traits::LayerOperations as LayerTrait;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LayerType {
    /// Single image stretched over its bounds
    Image,
    /// z/x/y tile pyramid
    Tile,
}

impl std::fmt::Display for LayerType {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LayerType::Image => write!(f, "image"),
            LayerType::Tile => write!(f, "tile"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct LayerProperties {
    pub id: String,
    pub name: String,
    pub layer_type: LayerType,
    pub z_index: i32,
    pub opacity: f32,
    pub visible: bool,
}

impl LayerProperties {
    pub fn new(id: String, name: String, layer_type: LayerType) -> Self {
        Self {
            id,
            name,
            layer_type,
            z_index: 0,
            opacity: 1.0,
            visible: true,
        }
    }

    /// Applies the shared keys of a JSON options object
    pub fn apply_options(&mut self, options: &serde_json::Value) {
        if let Some(opacity) = options.get("opacity").and_then(|v| v.as_f64()) {
            self.opacity = (opacity as f32).clamp(0.0, 1.0);
        }
        if let Some(z_index) = options.get("z_index").and_then(|v| v.as_i64()) {
            self.z_index = z_index as i32;
        }
        if let Some(visible) = options.get("visible").and_then(|v| v.as_bool()) {
            self.visible = visible;
        }
    }
}
