//! Deck- and card-level output: PNG files and single- or multi-page PDF,
//! with `{index}` filename templating.

use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use cardwright_core::{Card, Deck, Font};
use image::{ImageFormat, RgbaImage};
use printpdf::{Image as PdfImage, ImageTransform, Mm, PdfDocument};

use crate::canvas::flatten_onto;
use crate::renderer::{RenderError, SingleImageRenderer};

/// How a deck maps onto PDF output files.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PdfMode {
    /// One document with one page per card.
    SingleDocument,
    /// One document per card, named through the filename template.
    FilePerCard,
}

#[derive(Debug, Clone, Copy)]
pub struct PdfOptions {
    /// Resolution the raster is embedded at; also fixes the page size.
    pub dpi: f64,
    pub mode: PdfMode,
}

impl Default for PdfOptions {
    fn default() -> Self {
        Self {
            dpi: 300.0,
            mode: PdfMode::SingleDocument,
        }
    }
}

/// Rendering front end holding the defaults applied to queued commands with
/// unset optional parameters.
#[derive(Debug, Default)]
pub struct Renderer {
    default_font: Option<Font>,
}

impl Renderer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Font used for text commands that carry none. Without it, rendering
    /// such a command fails.
    pub fn with_default_font(mut self, font: Font) -> Self {
        self.default_font = Some(font);
        self
    }

    /// Render one card to a raster image.
    pub fn render_card(&self, card: &Card) -> Result<RgbaImage, RenderError> {
        let mut renderer = SingleImageRenderer::new(card.layout_map());
        if let Some(font) = &self.default_font {
            renderer = renderer.with_default_font(font);
        }
        renderer.render(
            card.width(),
            card.height(),
            card.background_color(),
            card.commands(),
        )
    }

    /// Render one card to a PNG file.
    pub fn render_png(&self, card: &Card, path: impl AsRef<Path>) -> Result<(), RenderError> {
        let path = path.as_ref();
        log::debug!("rendering {}", path.display());
        self.render_card(card)?.save_with_format(path, ImageFormat::Png)?;
        Ok(())
    }

    /// Render every card in the deck to its own PNG file.
    ///
    /// `{index}` in the template is replaced with the zero-based card index.
    pub fn render_deck_png(&self, deck: &Deck, template: &str) -> Result<(), RenderError> {
        log::debug!("rendering deck to {template}");
        warn_if_untemplated(template, deck.len());
        for (index, card) in deck.iter().enumerate() {
            self.render_png(card, card_filename(template, index))?;
        }
        Ok(())
    }

    /// Render the deck to PDF, either packed into one multi-page document or
    /// one file per card. Rasters are flattened onto the card background
    /// first; PDF output carries no alpha channel.
    pub fn render_deck_pdf(
        &self,
        deck: &Deck,
        template: &str,
        options: PdfOptions,
    ) -> Result<(), RenderError> {
        log::debug!("rendering deck to {template} ({options:?})");
        match options.mode {
            PdfMode::SingleDocument => self.render_pdf_document(deck, template, options.dpi),
            PdfMode::FilePerCard => {
                warn_if_untemplated(template, deck.len());
                for (index, card) in deck.iter().enumerate() {
                    let (page_w, page_h) = page_size(card, options.dpi);
                    let (doc, page, layer) = PdfDocument::new("card", page_w, page_h, "card");
                    self.pdf_image(card)?.add_to_layer(
                        doc.get_page(page).get_layer(layer),
                        image_transform(options.dpi),
                    );
                    let file = File::create(card_filename(template, index))?;
                    doc.save(&mut BufWriter::new(file))?;
                }
                Ok(())
            }
        }
    }

    fn render_pdf_document(&self, deck: &Deck, path: &str, dpi: f64) -> Result<(), RenderError> {
        let Some(first) = deck.get(0) else {
            log::debug!("empty deck, no PDF written");
            return Ok(());
        };
        let (page_w, page_h) = page_size(first, dpi);
        let (doc, mut page, mut layer) = PdfDocument::new("deck", page_w, page_h, "card 0");
        for (index, card) in deck.iter().enumerate() {
            if index > 0 {
                let (next_w, next_h) = page_size(card, dpi);
                let (next_page, next_layer) = doc.add_page(next_w, next_h, format!("card {index}"));
                page = next_page;
                layer = next_layer;
            }
            self.pdf_image(card)?
                .add_to_layer(doc.get_page(page).get_layer(layer), image_transform(dpi));
        }
        let file = File::create(path)?;
        doc.save(&mut BufWriter::new(file))?;
        Ok(())
    }

    /// Render a card and repack it as an opaque RGB image for embedding.
    fn pdf_image(&self, card: &Card) -> Result<PdfImage, RenderError> {
        let flat = flatten_onto(&self.render_card(card)?, card.background_color());
        let (width, height) = flat.dimensions();
        // repack through printpdf's own image crate so the buffer matches
        // the version it was compiled against
        let mut buffer = printpdf::image_crate::RgbImage::new(width, height);
        for (x, y, px) in flat.enumerate_pixels() {
            buffer.put_pixel(x, y, printpdf::image_crate::Rgb(px.0));
        }
        let embedded = printpdf::image_crate::DynamicImage::ImageRgb8(buffer);
        Ok(PdfImage::from_dynamic_image(&embedded))
    }
}

fn page_size(card: &Card, dpi: f64) -> (Mm, Mm) {
    (
        Mm((f64::from(card.width()) / dpi * 25.4) as f32),
        Mm((f64::from(card.height()) / dpi * 25.4) as f32),
    )
}

fn image_transform(dpi: f64) -> ImageTransform {
    ImageTransform {
        dpi: Some(dpi as f32),
        ..Default::default()
    }
}

/// Substitute the zero-based card index into a filename template.
pub(crate) fn card_filename(template: &str, index: usize) -> String {
    template.replace("{index}", &index.to_string())
}

fn warn_if_untemplated(template: &str, card_count: usize) {
    if card_count > 1 && !template.contains("{index}") {
        log::warn!("'{{index}}' isn't in '{template}', so outputs may overwrite one another");
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use cardwright_core::{CardOps, LayoutDef};

    fn decorated_deck(card_count: usize) -> Deck {
        let mut deck = Deck::new(card_count, 20, 30);
        deck.background("#eeeeee".parse().unwrap());
        deck.layout("border", LayoutDef::new(1.0, 1.0, 18.0, 28.0));
        deck.rectangle("border", Some(&"black".parse().unwrap()), Some(2))
            .unwrap();
        deck
    }

    #[test]
    fn test_card_filename_substitution() {
        assert_eq!(card_filename("card_{index}.png", 2), "card_2.png");
        assert_eq!(card_filename("deck.pdf", 7), "deck.pdf");
    }

    #[test]
    fn test_render_determinism() {
        let deck = decorated_deck(1);
        let renderer = Renderer::new();
        let first = renderer.render_card(&deck[0]).unwrap();
        let second = renderer.render_card(&deck[0]).unwrap();
        assert_eq!(first.as_raw(), second.as_raw());
    }

    #[test]
    fn test_render_deck_png_writes_one_file_per_card() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("card_{index}.png");
        let deck = decorated_deck(2);
        Renderer::new()
            .render_deck_png(&deck, template.to_str().unwrap())
            .unwrap();
        assert!(dir.path().join("card_0.png").exists());
        assert!(dir.path().join("card_1.png").exists());
    }

    #[test]
    fn test_render_deck_pdf_single_document() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("deck.pdf");
        let deck = decorated_deck(2);
        Renderer::new()
            .render_deck_pdf(&deck, path.to_str().unwrap(), PdfOptions::default())
            .unwrap();
        let bytes = std::fs::read(&path).unwrap();
        assert!(bytes.starts_with(b"%PDF"));
    }

    #[test]
    fn test_render_deck_pdf_file_per_card() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("card_{index}.pdf");
        let deck = decorated_deck(2);
        let options = PdfOptions {
            mode: PdfMode::FilePerCard,
            ..Default::default()
        };
        Renderer::new()
            .render_deck_pdf(&deck, template.to_str().unwrap(), options)
            .unwrap();
        assert!(dir.path().join("card_0.pdf").exists());
        assert!(dir.path().join("card_1.pdf").exists());
    }

    #[test]
    fn test_image_command_scales_into_layout() {
        let dir = tempfile::tempdir().unwrap();
        let art_path = dir.path().join("art.png");
        image::RgbaImage::from_pixel(4, 2, image::Rgba([255, 0, 0, 255]))
            .save_with_format(&art_path, ImageFormat::Png)
            .unwrap();

        let mut card = Card::new(4, 4);
        card.background("#00000000".parse().unwrap());
        card.layout("art", LayoutDef::new(0.0, 0.0, 2.0, 2.0));
        card.image(&art_path, "art").unwrap();

        let image = Renderer::new().render_card(&card).unwrap();
        // 4×2 native fitted into a 2×2 box is 2×1, placed at the box origin
        assert_eq!(image.get_pixel(0, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(1, 0).0, [255, 0, 0, 255]);
        assert_eq!(image.get_pixel(0, 1).0[3], 0);
        assert_eq!(image.get_pixel(2, 0).0[3], 0);
    }
}
