//! Image references shared by tile sets and image layers.

use std::path::PathBuf;

use super::{Color, Size};

/// A reference to an image file.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Image {
    /// Path to the image, relative to the referencing document.
    pub source: PathBuf,
    /// Color to treat as transparent, if any.
    pub transparent: Option<Color>,
    /// Pixel size; zero components are omitted from documents.
    pub size: Size,
}

impl Image {
    pub fn new(source: impl Into<PathBuf>, size: Size) -> Self {
        Self { source: source.into(), transparent: None, size }
    }
}
