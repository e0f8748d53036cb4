pub mod gemini;
pub mod history;
pub mod image;
pub mod sketch;

pub use gemini::*;
pub use history::*;
pub use image::*;
pub use sketch::*;
