//! Thin wrapper over the 2D imaging primitives: an RGBA canvas with opaque
//! rectangle paint, anchored single-line text, and alpha-aware compositing.

use cardwright_core::{Color, Font};
use fontdue::layout::{CoordinateSystem, Layout, LayoutSettings, TextStyle};
use image::{imageops, Rgba, RgbaImage, RgbImage};

/// Horizontal text anchor at the draw point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HAnchor {
    Left,
    Center,
    Right,
}

/// Vertical text anchor at the draw point.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum VAnchor {
    /// The point sits on the ascent line (the top of the text).
    Ascender,
    /// The point sits in the middle of the ascent-to-descent box.
    Middle,
    /// The point sits on the descent line (the bottom of the text).
    Descender,
}

/// A raster canvas for a single card.
pub struct Canvas {
    pixels: RgbaImage,
}

impl Canvas {
    /// Allocate a canvas filled with `background` (alpha allowed).
    pub fn new(width: u32, height: u32, background: &Color) -> Self {
        let [r, g, b, a] = background.to_rgba8();
        Self {
            pixels: RgbaImage::from_pixel(width, height, Rgba([r, g, b, a])),
        }
    }

    pub fn width(&self) -> u32 {
        self.pixels.width()
    }

    pub fn height(&self) -> u32 {
        self.pixels.height()
    }

    pub fn into_image(self) -> RgbaImage {
        self.pixels
    }

    fn in_bounds(&self, x: i64, y: i64) -> bool {
        x >= 0 && y >= 0 && x < i64::from(self.pixels.width()) && y < i64::from(self.pixels.height())
    }

    /// Opaque paint: the pixel is set to `color`, alpha included.
    fn set_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>) {
        if self.in_bounds(x, y) {
            self.pixels.put_pixel(x as u32, y as u32, color);
        }
    }

    /// Coverage-weighted source-over blend, for antialiased glyph edges.
    fn blend_pixel(&mut self, x: i64, y: i64, color: Rgba<u8>, coverage: u8) {
        if !self.in_bounds(x, y) {
            return;
        }
        let src_a = u32::from(color[3]) * u32::from(coverage) / 255;
        if src_a == 0 {
            return;
        }
        let inv = 255 - src_a;
        let dst = self.pixels.get_pixel_mut(x as u32, y as u32);
        for channel in 0..3 {
            dst[channel] =
                ((u32::from(color[channel]) * src_a + u32::from(dst[channel]) * inv) / 255) as u8;
        }
        dst[3] = (src_a + u32::from(dst[3]) * inv / 255) as u8;
    }

    /// Fill the box with corners `(x0, y0)`..`(x1, y1)`, inclusive.
    pub fn fill_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &Color) {
        let px = to_rgba(color);
        let (x0, y0, x1, y1) = round_box(x0, y0, x1, y1);
        for y in y0..=y1 {
            for x in x0..=x1 {
                self.set_pixel(x, y, px);
            }
        }
    }

    /// Outline the box with corners `(x0, y0)`..`(x1, y1)`, inclusive, with
    /// the stroke growing inward.
    pub fn stroke_rect(&mut self, x0: f64, y0: f64, x1: f64, y1: f64, color: &Color, thickness: u32) {
        let px = to_rgba(color);
        let (x0, y0, x1, y1) = round_box(x0, y0, x1, y1);
        for inset in 0..i64::from(thickness) {
            let (left, top, right, bottom) = (x0 + inset, y0 + inset, x1 - inset, y1 - inset);
            if left > right || top > bottom {
                break;
            }
            for x in left..=right {
                self.set_pixel(x, top, px);
                self.set_pixel(x, bottom, px);
            }
            for y in top..=bottom {
                self.set_pixel(left, y, px);
                self.set_pixel(right, y, px);
            }
        }
    }

    /// Draw one line of text anchored at `(x, y)`.
    pub fn draw_text(
        &mut self,
        x: f64,
        y: f64,
        h_anchor: HAnchor,
        v_anchor: VAnchor,
        text: &str,
        font: &Font,
        color: &Color,
    ) {
        let face = font.face();
        let px_size = font.size();

        let mut layout = Layout::new(CoordinateSystem::PositiveYDown);
        layout.reset(&LayoutSettings::default());
        layout.append(&[face], &TextStyle::new(text, px_size, 0));

        let width = layout
            .glyphs()
            .iter()
            .map(|glyph| glyph.x + glyph.width as f32)
            .fold(0.0_f32, f32::max);
        let (ascent, descent) = match face.horizontal_line_metrics(px_size) {
            Some(metrics) => (metrics.ascent, metrics.descent),
            None => (px_size, 0.0),
        };
        // descent is negative, so this is the full ascent-to-descent height
        let line_height = ascent - descent;

        let origin_x = x - match h_anchor {
            HAnchor::Left => 0.0,
            HAnchor::Center => f64::from(width) / 2.0,
            HAnchor::Right => f64::from(width),
        };
        let origin_y = y - match v_anchor {
            VAnchor::Ascender => 0.0,
            VAnchor::Middle => f64::from(line_height) / 2.0,
            VAnchor::Descender => f64::from(line_height),
        };

        let px = to_rgba(color);
        for glyph in layout.glyphs() {
            if glyph.width == 0 || glyph.height == 0 {
                continue;
            }
            let (metrics, bitmap) = face.rasterize_config(glyph.key);
            let glyph_x = (origin_x + f64::from(glyph.x)).round() as i64;
            let glyph_y = (origin_y + f64::from(glyph.y)).round() as i64;
            for row in 0..metrics.height {
                for col in 0..metrics.width {
                    let coverage = bitmap[row * metrics.width + col];
                    if coverage > 0 {
                        self.blend_pixel(glyph_x + col as i64, glyph_y + row as i64, px, coverage);
                    }
                }
            }
        }
    }

    /// Alpha-composite a decoded image at the given top-left offset; pixels
    /// falling outside the canvas are clipped.
    pub fn composite(&mut self, art: &RgbaImage, left: i64, top: i64) {
        imageops::overlay(&mut self.pixels, art, left, top);
    }
}

/// Flatten the alpha channel onto an opaque background color. PDF output has
/// no alpha channel, so rasters are flattened before encoding.
pub fn flatten_onto(image: &RgbaImage, background: &Color) -> RgbImage {
    let [bg_r, bg_g, bg_b, _] = background.to_rgba8();
    let bg = [u32::from(bg_r), u32::from(bg_g), u32::from(bg_b)];
    let mut out = RgbImage::new(image.width(), image.height());
    for (x, y, px) in image.enumerate_pixels() {
        let alpha = u32::from(px[3]);
        let inv = 255 - alpha;
        let flat = out.get_pixel_mut(x, y);
        for channel in 0..3 {
            flat[channel] = ((u32::from(px[channel]) * alpha + bg[channel] * inv) / 255) as u8;
        }
    }
    out
}

fn to_rgba(color: &Color) -> Rgba<u8> {
    let [r, g, b, a] = color.to_rgba8();
    Rgba([r, g, b, a])
}

fn round_box(x0: f64, y0: f64, x1: f64, y1: f64) -> (i64, i64, i64, i64) {
    (
        x0.round() as i64,
        y0.round() as i64,
        x1.round() as i64,
        y1.round() as i64,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    fn color(css: &str) -> Color {
        css.parse().unwrap()
    }

    #[test]
    fn test_canvas_fills_background() {
        let canvas = Canvas::new(2, 2, &color("#336699"));
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 0).0, [0x33, 0x66, 0x99, 0xff]);
        assert_eq!(image.get_pixel(1, 1).0, [0x33, 0x66, 0x99, 0xff]);
    }

    #[test]
    fn test_fill_rect_inclusive_corners() {
        let mut canvas = Canvas::new(10, 10, &color("white"));
        canvas.fill_rect(2.0, 2.0, 4.0, 4.0, &color("black"));
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(2, 2).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(4, 4).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(5, 5).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_stroke_rect_grows_inward() {
        let mut canvas = Canvas::new(10, 10, &color("white"));
        canvas.stroke_rect(0.0, 0.0, 9.0, 9.0, &color("black"), 2);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 1).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(2, 2).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(9, 9).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_paint_clips_outside_canvas() {
        let mut canvas = Canvas::new(4, 4, &color("white"));
        canvas.fill_rect(-2.0, -2.0, 6.0, 1.0, &color("black"));
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 0).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(3, 1).0, [0, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 2).0, [255, 255, 255, 255]);
    }

    #[test]
    fn test_composite_blends_alpha() {
        let mut canvas = Canvas::new(2, 1, &color("black"));
        let art = RgbaImage::from_pixel(1, 1, Rgba([255, 255, 255, 255]));
        canvas.composite(&art, 0, 0);
        let image = canvas.into_image();
        assert_eq!(image.get_pixel(0, 0).0, [255, 255, 255, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [0, 0, 0, 255]);
    }

    #[test]
    fn test_flatten_onto_removes_alpha() {
        let translucent = RgbaImage::from_pixel(1, 1, Rgba([255, 0, 0, 128]));
        let flat = flatten_onto(&translucent, &color("black"));
        let px = flat.get_pixel(0, 0).0;
        assert_eq!(px[0], 128);
        assert_eq!(px[1], 0);
        assert_eq!(px[2], 0);
    }
}
