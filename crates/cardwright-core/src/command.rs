use std::path::PathBuf;

use crate::font::Font;
use crate::Color;

/// One queued paint operation, bound to a named layout on its card.
///
/// Commands are stored in append order; append order is paint order. Unset
/// optional parameters stay `None` in the queue and are resolved to defaults
/// by the renderer, not by the card.
#[derive(Debug, Clone)]
pub enum DrawCommand {
    /// A single anchored line of text.
    Text {
        layout: String,
        text: String,
        font: Option<Font>,
        color: Option<Color>,
    },
    /// An outlined box, optionally filled with the same color.
    Rectangle {
        layout: String,
        color: Option<Color>,
        thickness: Option<u32>,
        filled: bool,
    },
    /// An external image, scaled and placed per the layout's policy.
    Image { layout: String, path: PathBuf },
}

impl DrawCommand {
    /// Name of the layout this command draws into.
    pub fn layout_name(&self) -> &str {
        match self {
            DrawCommand::Text { layout, .. } => layout,
            DrawCommand::Rectangle { layout, .. } => layout,
            DrawCommand::Image { layout, .. } => layout,
        }
    }
}
