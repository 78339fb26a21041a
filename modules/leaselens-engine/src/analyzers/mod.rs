pub mod image;
pub mod text;

pub use image::ClaudePhotoAnalyzer;
pub use text::ClaudeListingAnalyzer;
