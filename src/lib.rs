//! chatcloud turns an exported chat transcript into two word clouds, one for
//! Arabic and one for English. It extracts message text from the loosely
//! structured export, removes stop words, splits tokens by script and hands
//! each half to a word-cloud renderer.

// Module declarations
pub mod error;
pub mod types;
pub mod parser;
pub mod render;
pub mod stats;
pub mod utils;
pub mod config;

// Re-exports
pub use error::{Error, Result};
pub use parser::{extract_text, tokenize, ClassifiedTokens, StopWordSet};
pub use render::{FontData, LayoutRenderer, WordCloudImage, WordCloudRenderer};
pub use stats::{ChatStatistics, OutputPaths, ProcessedText};

// Re-export the config from config module
pub use config::{ChatCloudConfig, ConfigOverrides};
