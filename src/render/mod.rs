//! Word-cloud rendering.
//!
//! The pipeline only needs "text in, image out"; [`WordCloudRenderer`] is that
//! seam and [`LayoutRenderer`] is the implementation the binary uses.

pub mod layout;

use ab_glyph::FontRef;
use image::{ImageFormat, RgbImage};
use log::debug;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};

pub use self::layout::{count_words, LayoutRenderer, PlacedWord};

pub trait WordCloudRenderer {
    /// Renders `text`, using `font` or the renderer's own default when `None`.
    fn generate(&self, text: &str, font: Option<&FontData>) -> Result<WordCloudImage>;
}

/// The raw bytes of a font file, read once and parsed by the renderer.
pub struct FontData {
    source: PathBuf,
    bytes: Vec<u8>,
}

impl FontData {
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let bytes = fs::read(path).map_err(|e| Error::from_io_at(e, path))?;
        debug!("Read {} bytes of font data from {:?}", bytes.len(), path);
        Ok(Self::from_bytes(path, bytes))
    }

    pub fn from_bytes<P: Into<PathBuf>>(source: P, bytes: Vec<u8>) -> Self {
        Self { source: source.into(), bytes }
    }

    pub fn source(&self) -> &Path {
        &self.source
    }

    pub fn parse(&self) -> Result<FontRef<'_>> {
        FontRef::try_from_slice(&self.bytes)
            .map_err(|e| Error::font(format!("{:?}: {}", self.source, e)))
    }
}

impl fmt::Debug for FontData {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("FontData")
            .field("source", &self.source)
            .field("len", &self.bytes.len())
            .finish()
    }
}

/// A rendered cloud and the layout that produced it.
#[derive(Debug, Clone)]
pub struct WordCloudImage {
    image: RgbImage,
    words: Vec<PlacedWord>,
}

impl WordCloudImage {
    pub fn new(image: RgbImage, words: Vec<PlacedWord>) -> Self {
        Self { image, words }
    }

    pub fn words(&self) -> &[PlacedWord] {
        &self.words
    }

    /// Writes the image as PNG regardless of the file extension.
    pub fn to_file<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        self.image.save_with_format(path, ImageFormat::Png)?;
        debug!("Wrote {}x{} word cloud to {:?}", self.image.width(), self.image.height(), path);
        Ok(())
    }
}
