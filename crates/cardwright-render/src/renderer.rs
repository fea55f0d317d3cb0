use std::collections::HashMap;
use std::io;
use std::path::Path;

use cardwright_core::{Alignment, Color, DrawCommand, Font, LayoutDef, Scale};
use image::imageops::{self, FilterType};
use image::RgbaImage;
use thiserror::Error;

use crate::canvas::{Canvas, HAnchor, VAnchor};

pub(crate) const DEFAULT_THICKNESS: u32 = 1;

pub(crate) fn default_color() -> Color {
    Color::new(0.0, 0.0, 0.0, 1.0)
}

#[derive(Error, Debug)]
pub enum RenderError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("PDF error: {0}")]
    Pdf(#[from] printpdf::Error),

    #[error("missing layout '{0}'")]
    MissingLayout(String),

    #[error("text command has no font and no default font is configured")]
    MissingFont,
}

/// Renders one card's command list onto a single raster image.
///
/// Stateless given the layout map bound at construction: commands are applied
/// in order onto a freshly allocated canvas, later commands painting over
/// earlier ones.
pub struct SingleImageRenderer<'a> {
    layouts: &'a HashMap<String, LayoutDef>,
    default_font: Option<&'a Font>,
}

impl<'a> SingleImageRenderer<'a> {
    pub fn new(layouts: &'a HashMap<String, LayoutDef>) -> Self {
        Self {
            layouts,
            default_font: None,
        }
    }

    /// Font used for text commands that carry none.
    pub fn with_default_font(mut self, font: &'a Font) -> Self {
        self.default_font = Some(font);
        self
    }

    pub fn render(
        &self,
        width: u32,
        height: u32,
        background: &Color,
        commands: &[DrawCommand],
    ) -> Result<RgbaImage, RenderError> {
        let mut canvas = Canvas::new(width, height, background);
        for command in commands {
            match command {
                DrawCommand::Text {
                    layout,
                    text,
                    font,
                    color,
                } => self.render_text(&mut canvas, layout, text, font.as_ref(), color.as_ref())?,
                DrawCommand::Rectangle {
                    layout,
                    color,
                    thickness,
                    filled,
                } => self.render_rectangle(&mut canvas, layout, color.as_ref(), *thickness, *filled)?,
                DrawCommand::Image { layout, path } => {
                    self.render_image(&mut canvas, layout, path)?
                }
            }
        }
        Ok(canvas.into_image())
    }

    fn layout(&self, name: &str) -> Result<&LayoutDef, RenderError> {
        self.layouts
            .get(name)
            .ok_or_else(|| RenderError::MissingLayout(name.to_string()))
    }

    fn render_text(
        &self,
        canvas: &mut Canvas,
        layout_name: &str,
        text: &str,
        font: Option<&Font>,
        color: Option<&Color>,
    ) -> Result<(), RenderError> {
        log::debug!("rendering text '{text}' at {layout_name}");
        let layout = self.layout(layout_name)?;
        let (x, y, h_anchor, v_anchor) = text_anchor(layout);
        let font = font.or(self.default_font).ok_or(RenderError::MissingFont)?;
        let color = color.cloned().unwrap_or_else(default_color);
        canvas.draw_text(x, y, h_anchor, v_anchor, text, font, &color);
        Ok(())
    }

    fn render_rectangle(
        &self,
        canvas: &mut Canvas,
        layout_name: &str,
        color: Option<&Color>,
        thickness: Option<u32>,
        filled: bool,
    ) -> Result<(), RenderError> {
        log::debug!("rendering rectangle on {layout_name}");
        let layout = self.layout(layout_name)?;
        let color = color.cloned().unwrap_or_else(default_color);
        let thickness = thickness.unwrap_or(DEFAULT_THICKNESS);
        let (x0, y0) = (layout.x, layout.y);
        let (x1, y1) = (layout.x + layout.width, layout.y + layout.height);
        if filled {
            canvas.fill_rect(x0, y0, x1, y1, &color);
        }
        canvas.stroke_rect(x0, y0, x1, y1, &color, thickness);
        Ok(())
    }

    fn render_image(
        &self,
        canvas: &mut Canvas,
        layout_name: &str,
        path: &Path,
    ) -> Result<(), RenderError> {
        log::debug!("rendering image {} at {layout_name}", path.display());
        let layout = self.layout(layout_name)?;
        let art = image::open(path)?.to_rgba8();

        let native = art.dimensions();
        let fitted = fit_size(native.0, native.1, layout.width, layout.height);
        let (target_w, target_h) = scaled_size(layout.scale, native, fitted);
        if target_w == 0 || target_h == 0 {
            return Ok(());
        }
        let art = if (target_w, target_h) == native {
            art
        } else {
            imageops::resize(&art, target_w, target_h, FilterType::Lanczos3)
        };

        let (art_w, art_h) = art.dimensions();
        let left = match layout.h_align {
            Alignment::Begin => layout.x,
            Alignment::Middle => layout.x + ((layout.width - f64::from(art_w)) / 2.0).floor(),
            Alignment::End => layout.x + layout.width - f64::from(art_w),
        };
        let top = match layout.v_align {
            Alignment::Begin => layout.y,
            Alignment::Middle => layout.y + ((layout.height - f64::from(art_h)) / 2.0).floor(),
            Alignment::End => layout.y + layout.height - f64::from(art_h),
        };
        canvas.composite(&art, left.floor() as i64, top.floor() as i64);
        Ok(())
    }
}

/// Resolve a layout's alignment into a text anchor point and anchor pair.
pub(crate) fn text_anchor(layout: &LayoutDef) -> (f64, f64, HAnchor, VAnchor) {
    let (x, h_anchor) = match layout.h_align {
        Alignment::Begin => (layout.x, HAnchor::Left),
        Alignment::Middle => (layout.x + layout.width / 2.0, HAnchor::Center),
        Alignment::End => (layout.x + layout.width, HAnchor::Right),
    };
    let (y, v_anchor) = match layout.v_align {
        Alignment::Begin => (layout.y, VAnchor::Ascender),
        Alignment::Middle => (layout.y + layout.height / 2.0, VAnchor::Middle),
        Alignment::End => (layout.y + layout.height, VAnchor::Descender),
    };
    (x, y, h_anchor, v_anchor)
}

/// The largest size that inscribes `native` within the layout box while
/// preserving aspect ratio. The larger of the two axis ratios dominates both
/// axes: shrinking picks the factor that keeps both within bounds, growing
/// picks the one that maximally fills the box.
pub(crate) fn fit_size(native_w: u32, native_h: u32, box_w: f64, box_h: f64) -> (u32, u32) {
    let (nw, nh) = (f64::from(native_w), f64::from(native_h));
    if nw == box_w && nh == box_h {
        return (native_w, native_h);
    }
    if box_w <= 0.0 || box_h <= 0.0 {
        return (0, 0);
    }
    let scale_factor = (nw / box_w).max(nh / box_h);
    (
        (nw / scale_factor).floor() as u32,
        (nh / scale_factor).floor() as u32,
    )
}

/// Apply the layout's scale policy: the size the image is actually drawn at.
pub(crate) fn scaled_size(policy: Scale, native: (u32, u32), fitted: (u32, u32)) -> (u32, u32) {
    match policy {
        Scale::Fit => fitted,
        Scale::Up if native.0 < fitted.0 || native.1 < fitted.1 => fitted,
        Scale::Down if native.0 > fitted.0 || native.1 > fitted.1 => fitted,
        _ => native,
    }
}
