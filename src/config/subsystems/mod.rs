pub mod extraction;
pub mod render;
pub mod logging;

pub use extraction::{ExtractionConfig, MalformedPolicy};
pub use render::RenderConfig;
pub use logging::LoggingConfig;
