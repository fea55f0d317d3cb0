//! # Cardwright Renderer
//!
//! CPU raster rendering for cards and decks: resolves each queued draw
//! command against its target layout (alignment, image scale policy) into
//! concrete pixel coordinates, then paints onto an RGBA canvas. Finished
//! rasters are encoded as PNG files or single-/multi-page PDF documents.

pub mod canvas;
pub mod output;
pub mod renderer;

pub use canvas::{Canvas, HAnchor, VAnchor};
pub use output::{PdfMode, PdfOptions, Renderer};
pub use renderer::{RenderError, SingleImageRenderer};
