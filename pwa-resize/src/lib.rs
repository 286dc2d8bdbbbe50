pub mod image;
pub mod job;
pub mod resize;
pub mod size;

// Re-export commonly used types
pub use image::{EncodeOptions, ImageFormat, PngCompression};
pub use job::{JobTable, Preset, ResizeJob};
pub use resize::{resize_file, run, Outcome, Report, RunOptions};
pub use size::Size;
