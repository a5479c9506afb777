pub mod base;
pub mod image;
pub mod macros;
pub mod manager;
pub mod tile;
