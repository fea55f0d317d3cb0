use std::collections::HashMap;
use std::path::Path;

use thiserror::Error;

use crate::command::DrawCommand;
use crate::font::Font;
use crate::geometry::LayoutDef;
use crate::Color;

#[derive(Error, Debug)]
pub enum CardError {
    #[error("missing layout '{0}'")]
    MissingLayout(String),

    #[error("mismatched names/layoutdefs arguments: {names} names, {defs} defs")]
    ArityMismatch { names: usize, defs: usize },
}

/// Operations shared by [`Card`] and [`Deck`](crate::Deck).
///
/// On a card the call mutates that card; on a deck the same call is broadcast
/// to every card in the deck.
pub trait CardOps {
    /// Set the background color used to initialize the canvas. Last value wins.
    fn background(&mut self, color: Color);

    /// Create (or overwrite) a named layout.
    fn layout(&mut self, name: &str, layoutdef: LayoutDef);

    /// Create multiple layouts pairwise. Fails before any mutation if the
    /// slices differ in length.
    fn layouts(&mut self, names: &[&str], layoutdefs: &[LayoutDef]) -> Result<(), CardError>;

    /// Create multiple layouts from a name → definition map.
    fn layouts_map(&mut self, layouts: &HashMap<String, LayoutDef>);

    /// Queue a line of text in the named layout.
    fn text(
        &mut self,
        text: &str,
        layout: &str,
        font: Option<&Font>,
        color: Option<&Color>,
    ) -> Result<(), CardError>;

    /// Queue an outlined rectangle around the named layout.
    fn rectangle(
        &mut self,
        layout: &str,
        color: Option<&Color>,
        thickness: Option<u32>,
    ) -> Result<(), CardError>;

    /// Queue a filled rectangle over the named layout.
    fn filled_rectangle(&mut self, layout: &str, color: &Color) -> Result<(), CardError>;

    /// Queue an external image in the named layout.
    fn image(&mut self, image: impl AsRef<Path>, layout: &str) -> Result<(), CardError>;
}

/// A single card: fixed pixel dimensions, a background, a named layout map,
/// and an ordered draw-command buffer.
///
/// All draw calls validate their layout reference eagerly, at append time;
/// rendering never observes an unknown layout name that came through a card.
#[derive(Debug, Clone)]
pub struct Card {
    width: u32,
    height: u32,
    background: Color,
    layouts: HashMap<String, LayoutDef>,
    commands: Vec<DrawCommand>,
}

impl Card {
    pub fn new(width: u32, height: u32) -> Self {
        Self {
            width,
            height,
            // transparent white
            background: Color::new(1.0, 1.0, 1.0, 0.0),
            layouts: HashMap::new(),
            commands: Vec::new(),
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn background_color(&self) -> &Color {
        &self.background
    }

    pub fn layout_map(&self) -> &HashMap<String, LayoutDef> {
        &self.layouts
    }

    /// The queued draw commands, in append (= paint) order.
    pub fn commands(&self) -> &[DrawCommand] {
        &self.commands
    }

    fn check_layout(&self, layout: &str) -> Result<(), CardError> {
        if self.layouts.contains_key(layout) {
            Ok(())
        } else {
            Err(CardError::MissingLayout(layout.to_string()))
        }
    }
}

impl Default for Card {
    /// A poker-size card: 2.5 × 3.5 inches at 300 dpi.
    fn default() -> Self {
        Self::new(750, 1050)
    }
}

impl CardOps for Card {
    fn background(&mut self, color: Color) {
        log::debug!("setting background to {color:?}");
        self.background = color;
    }

    fn layout(&mut self, name: &str, layoutdef: LayoutDef) {
        log::debug!("creating layout area {name}");
        self.layouts.insert(name.to_string(), layoutdef);
    }

    fn layouts(&mut self, names: &[&str], layoutdefs: &[LayoutDef]) -> Result<(), CardError> {
        if names.len() != layoutdefs.len() {
            return Err(CardError::ArityMismatch {
                names: names.len(),
                defs: layoutdefs.len(),
            });
        }
        for (name, layoutdef) in names.iter().zip(layoutdefs) {
            self.layout(name, *layoutdef);
        }
        Ok(())
    }

    fn layouts_map(&mut self, layouts: &HashMap<String, LayoutDef>) {
        for (name, layoutdef) in layouts {
            self.layout(name, *layoutdef);
        }
    }

    fn text(
        &mut self,
        text: &str,
        layout: &str,
        font: Option<&Font>,
        color: Option<&Color>,
    ) -> Result<(), CardError> {
        self.check_layout(layout)?;
        log::debug!("adding '{text}' in {layout}");
        self.commands.push(DrawCommand::Text {
            layout: layout.to_string(),
            text: text.to_string(),
            font: font.cloned(),
            color: color.cloned(),
        });
        Ok(())
    }

    fn rectangle(
        &mut self,
        layout: &str,
        color: Option<&Color>,
        thickness: Option<u32>,
    ) -> Result<(), CardError> {
        self.check_layout(layout)?;
        log::debug!("adding rectangle for {layout}");
        self.commands.push(DrawCommand::Rectangle {
            layout: layout.to_string(),
            color: color.cloned(),
            thickness,
            filled: false,
        });
        Ok(())
    }

    fn filled_rectangle(&mut self, layout: &str, color: &Color) -> Result<(), CardError> {
        self.check_layout(layout)?;
        log::debug!("adding filled rectangle for {layout}");
        self.commands.push(DrawCommand::Rectangle {
            layout: layout.to_string(),
            color: Some(color.clone()),
            thickness: None,
            filled: true,
        });
        Ok(())
    }

    fn image(&mut self, image: impl AsRef<Path>, layout: &str) -> Result<(), CardError> {
        self.check_layout(layout)?;
        let path = image.as_ref().to_path_buf();
        log::debug!("adding image {} for {layout}", path.display());
        self.commands.push(DrawCommand::Image {
            layout: layout.to_string(),
            path,
        });
        Ok(())
    }
}
