use serde::{Deserialize, Serialize};

/// A rectangle in card-local pixel coordinates.
///
/// Width and height are expected to be non-negative; rendering with negative
/// extents is undefined.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    /// X coordinate for the start of the rectangle.
    pub x: f64,
    /// Y coordinate for the start of the rectangle.
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
        }
    }
}

/// Where to align items within a layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Alignment {
    /// Left if horizontal, top if vertical.
    Begin,
    /// Centered.
    Middle,
    /// Right if horizontal, bottom if vertical.
    End,
}

impl Default for Alignment {
    fn default() -> Self {
        Alignment::Begin
    }
}

/// How images are scaled within their layout.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Scale {
    /// Scale the image up or down to fit the layout.
    Fit,
    /// Only scale the image up, never down.
    Up,
    /// Only scale the image down, never up.
    Down,
    /// Disable scaling.
    None,
}

impl Default for Scale {
    fn default() -> Self {
        Scale::Fit
    }
}

/// A box for drawing into, plus alignment information for the box's contents.
///
/// Unknown keys are rejected during deserialization so that malformed entries
/// in imported layout files surface as conversion failures instead of being
/// silently accepted.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct LayoutDef {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
    /// Horizontal alignment of the box's contents.
    #[serde(default)]
    pub h_align: Alignment,
    /// Vertical alignment of the box's contents.
    #[serde(default)]
    pub v_align: Alignment,
    /// How (and if) images are scaled to the box.
    #[serde(default)]
    pub scale: Scale,
}

impl LayoutDef {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self {
            x,
            y,
            width,
            height,
            h_align: Alignment::default(),
            v_align: Alignment::default(),
            scale: Scale::default(),
        }
    }

    pub fn with_h_align(mut self, h_align: Alignment) -> Self {
        self.h_align = h_align;
        self
    }

    pub fn with_v_align(mut self, v_align: Alignment) -> Self {
        self.v_align = v_align;
        self
    }

    pub fn with_scale(mut self, scale: Scale) -> Self {
        self.scale = scale;
        self
    }

    /// The bounding box of this layout, without alignment information.
    pub fn rect(&self) -> Rect {
        Rect::new(self.x, self.y, self.width, self.height)
    }
}

impl From<Rect> for LayoutDef {
    fn from(rect: Rect) -> Self {
        Self::new(rect.x, rect.y, rect.width, rect.height)
    }
}
