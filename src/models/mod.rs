pub mod detection;
pub mod image;
pub mod point;
pub mod rect;

pub use detection::Detection;
pub use image::{ColorRange, Image, PixelFormat};
pub use point::{PixelCoord, Point};
pub use rect::Rect;
