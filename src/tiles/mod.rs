pub mod pyramid;
pub mod source;

// Re-exports for convenience
pub use pyramid::TilePyramid;
pub use source::{TemplateSource, TileSource};
