use std::fmt;
use std::fs;
use std::path::Path;
use std::sync::Arc;

use thiserror::Error;

#[derive(Error, Debug)]
pub enum FontError {
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("font parse error: {0}")]
    Parse(String),
}

/// An opaque font handle: a shared font face plus a pixel size.
///
/// Cards store these inside queued text commands; only the renderer looks
/// through the handle to rasterize glyphs. Cloning is cheap (the face is
/// shared).
#[derive(Clone)]
pub struct Font {
    face: Arc<fontdue::Font>,
    px: f32,
}

impl Font {
    /// Load a TrueType/OpenType font from a file at the given pixel size.
    pub fn load(path: impl AsRef<Path>, px: f32) -> Result<Self, FontError> {
        let bytes = fs::read(path.as_ref())?;
        Self::from_bytes(&bytes, px)
    }

    /// Parse a font from raw bytes at the given pixel size.
    pub fn from_bytes(bytes: &[u8], px: f32) -> Result<Self, FontError> {
        let face = fontdue::Font::from_bytes(bytes, fontdue::FontSettings::default())
            .map_err(|err| FontError::Parse(err.to_string()))?;
        Ok(Self {
            face: Arc::new(face),
            px,
        })
    }

    /// The pixel size this handle was created with.
    pub fn size(&self) -> f32 {
        self.px
    }

    /// The same face at a different pixel size.
    pub fn with_size(&self, px: f32) -> Self {
        Self {
            face: Arc::clone(&self.face),
            px,
        }
    }

    /// The underlying face, for glyph measurement and rasterization.
    pub fn face(&self) -> &fontdue::Font {
        &self.face
    }
}

impl fmt::Debug for Font {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Font").field("px", &self.px).finish_non_exhaustive()
    }
}
