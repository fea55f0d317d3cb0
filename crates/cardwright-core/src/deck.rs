use std::collections::HashMap;
use std::ops::{Add, Index, IndexMut};
use std::path::{Path, PathBuf};

use crate::card::{Card, CardError, CardOps};
use crate::font::Font;
use crate::geometry::LayoutDef;
use crate::Color;

/// A scalar-or-sequence argument for the per-card deck operations.
///
/// `One` applies the same value to every card; `Many` assigns by card index,
/// wrapping modulo the sequence length when the deck is longer. Each
/// parameter of a plural call cycles independently, so mismatched lengths
/// across parameters are legal.
#[derive(Debug, Clone)]
pub enum Cycled<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> Cycled<T> {
    /// The value for card `index`, wrapping modulo the sequence length.
    /// Returns `None` only for an empty `Many`.
    pub fn get(&self, index: usize) -> Option<&T> {
        match self {
            Cycled::One(value) => Some(value),
            Cycled::Many(values) if values.is_empty() => None,
            Cycled::Many(values) => Some(&values[index % values.len()]),
        }
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, Cycled::Many(values) if values.is_empty())
    }
}

impl<T> From<T> for Cycled<T> {
    fn from(value: T) -> Self {
        Cycled::One(value)
    }
}

impl<T> From<Vec<T>> for Cycled<T> {
    fn from(values: Vec<T>) -> Self {
        Cycled::Many(values)
    }
}

impl<T: Clone> From<&[T]> for Cycled<T> {
    fn from(values: &[T]) -> Self {
        Cycled::Many(values.to_vec())
    }
}

impl From<&str> for Cycled<String> {
    fn from(value: &str) -> Self {
        Cycled::One(value.to_string())
    }
}

impl From<Vec<&str>> for Cycled<String> {
    fn from(values: Vec<&str>) -> Self {
        Cycled::Many(values.into_iter().map(str::to_string).collect())
    }
}

/// A deck of zero or more cards, all created with the same dimensions.
///
/// The deck mirrors the [`CardOps`] surface, broadcasting each call to every
/// card, and adds plural variants whose arguments cycle per card.
#[derive(Debug, Clone, Default)]
pub struct Deck {
    cards: Vec<Card>,
}

impl Deck {
    pub fn new(card_count: usize, width: u32, height: u32) -> Self {
        Self {
            cards: (0..card_count).map(|_| Card::new(width, height)).collect(),
        }
    }

    pub fn from_cards(cards: Vec<Card>) -> Self {
        Self { cards }
    }

    // ── Card sequence ────────────────────────────────────────────────

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }

    pub fn get(&self, index: usize) -> Option<&Card> {
        self.cards.get(index)
    }

    pub fn get_mut(&mut self, index: usize) -> Option<&mut Card> {
        self.cards.get_mut(index)
    }

    pub fn push(&mut self, card: Card) {
        self.cards.push(card);
    }

    pub fn insert(&mut self, index: usize, card: Card) {
        self.cards.insert(index, card);
    }

    pub fn remove(&mut self, index: usize) -> Option<Card> {
        if index < self.cards.len() {
            Some(self.cards.remove(index))
        } else {
            None
        }
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Card> {
        self.cards.iter()
    }

    pub fn iter_mut(&mut self) -> std::slice::IterMut<'_, Card> {
        self.cards.iter_mut()
    }

    // ── Per-card cycling ─────────────────────────────────────────────

    /// Set backgrounds per card, cycling a shorter sequence.
    pub fn backgrounds(&mut self, colors: impl Into<Cycled<Color>>) {
        let colors = colors.into();
        log::debug!("Deck.backgrounds(...)");
        for (index, card) in self.cards.iter_mut().enumerate() {
            let Some(color) = colors.get(index) else { break };
            card.background(color.clone());
        }
    }

    /// Queue text per card. Every parameter cycles independently against the
    /// card index; an empty sequence makes the whole call a no-op.
    pub fn texts(
        &mut self,
        texts: impl Into<Cycled<String>>,
        layouts: impl Into<Cycled<String>>,
        fonts: Option<Cycled<Font>>,
        colors: Option<Cycled<Color>>,
    ) -> Result<(), CardError> {
        let texts = texts.into();
        let layouts = layouts.into();
        log::debug!("Deck.texts(...)");
        if fonts.as_ref().is_some_and(Cycled::is_empty)
            || colors.as_ref().is_some_and(Cycled::is_empty)
        {
            return Ok(());
        }
        for (index, card) in self.cards.iter_mut().enumerate() {
            let (Some(text), Some(layout)) = (texts.get(index), layouts.get(index)) else {
                break;
            };
            let font = fonts.as_ref().and_then(|fonts| fonts.get(index));
            let color = colors.as_ref().and_then(|colors| colors.get(index));
            card.text(text, layout, font, color)?;
        }
        Ok(())
    }

    /// Queue external images per card, cycling both parameters independently.
    pub fn images(
        &mut self,
        images: impl Into<Cycled<PathBuf>>,
        layouts: impl Into<Cycled<String>>,
    ) -> Result<(), CardError> {
        let images = images.into();
        let layouts = layouts.into();
        log::debug!("Deck.images(...)");
        for (index, card) in self.cards.iter_mut().enumerate() {
            let (Some(image), Some(layout)) = (images.get(index), layouts.get(index)) else {
                break;
            };
            card.image(image, layout)?;
        }
        Ok(())
    }

    /// Run `action` on the card at each index where `predicate` accepts the
    /// matching value. Cards beyond `values` are untouched.
    pub fn for_each_if<T, P, A>(
        &mut self,
        values: &[T],
        predicate: P,
        mut action: A,
    ) -> Result<(), CardError>
    where
        P: Fn(&T) -> bool,
        A: FnMut(&mut Card, &T) -> Result<(), CardError>,
    {
        for (card, value) in self.cards.iter_mut().zip(values) {
            if predicate(value) {
                action(card, value)?;
            }
        }
        Ok(())
    }
}

// ── Broadcast card manipulation ──────────────────────────────────────

impl CardOps for Deck {
    fn background(&mut self, color: Color) {
        log::debug!("Deck.background({color:?})");
        for card in &mut self.cards {
            card.background(color.clone());
        }
    }

    fn layout(&mut self, name: &str, layoutdef: LayoutDef) {
        log::debug!("Deck.layout({name}, ...)");
        for card in &mut self.cards {
            card.layout(name, layoutdef);
        }
    }

    fn layouts(&mut self, names: &[&str], layoutdefs: &[LayoutDef]) -> Result<(), CardError> {
        log::debug!("Deck.layouts(...)");
        for card in &mut self.cards {
            card.layouts(names, layoutdefs)?;
        }
        Ok(())
    }

    fn layouts_map(&mut self, layouts: &HashMap<String, LayoutDef>) {
        log::debug!("Deck.layouts_map(...)");
        for card in &mut self.cards {
            card.layouts_map(layouts);
        }
    }

    fn text(
        &mut self,
        text: &str,
        layout: &str,
        font: Option<&Font>,
        color: Option<&Color>,
    ) -> Result<(), CardError> {
        log::debug!("Deck.text({text})");
        for card in &mut self.cards {
            card.text(text, layout, font, color)?;
        }
        Ok(())
    }

    fn rectangle(
        &mut self,
        layout: &str,
        color: Option<&Color>,
        thickness: Option<u32>,
    ) -> Result<(), CardError> {
        log::debug!("Deck.rectangle({layout})");
        for card in &mut self.cards {
            card.rectangle(layout, color, thickness)?;
        }
        Ok(())
    }

    fn filled_rectangle(&mut self, layout: &str, color: &Color) -> Result<(), CardError> {
        log::debug!("Deck.filled_rectangle({layout})");
        for card in &mut self.cards {
            card.filled_rectangle(layout, color)?;
        }
        Ok(())
    }

    fn image(&mut self, image: impl AsRef<Path>, layout: &str) -> Result<(), CardError> {
        let path = image.as_ref();
        log::debug!("Deck.image({})", path.display());
        for card in &mut self.cards {
            card.image(path, layout)?;
        }
        Ok(())
    }
}

// ── Container conveniences ───────────────────────────────────────────

impl Add<&Deck> for &Deck {
    type Output = Deck;

    /// Concatenate two decks into a new deck. Card order and contents are
    /// preserved; both operands are left intact.
    fn add(self, other: &Deck) -> Deck {
        let mut cards = Vec::with_capacity(self.cards.len() + other.cards.len());
        cards.extend_from_slice(&self.cards);
        cards.extend_from_slice(&other.cards);
        Deck { cards }
    }
}

impl Index<usize> for Deck {
    type Output = Card;

    fn index(&self, index: usize) -> &Card {
        &self.cards[index]
    }
}

impl IndexMut<usize> for Deck {
    fn index_mut(&mut self, index: usize) -> &mut Card {
        &mut self.cards[index]
    }
}

impl IntoIterator for Deck {
    type Item = Card;
    type IntoIter = std::vec::IntoIter<Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.into_iter()
    }
}

impl<'a> IntoIterator for &'a Deck {
    type Item = &'a Card;
    type IntoIter = std::slice::Iter<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter()
    }
}

impl<'a> IntoIterator for &'a mut Deck {
    type Item = &'a mut Card;
    type IntoIter = std::slice::IterMut<'a, Card>;

    fn into_iter(self) -> Self::IntoIter {
        self.cards.iter_mut()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::command::DrawCommand;

    fn rgba(color: &Color) -> [u8; 4] {
        color.to_rgba8()
    }

    fn queued_text(card: &Card, index: usize) -> &str {
        match &card.commands()[index] {
            DrawCommand::Text { text, .. } => text,
            other => panic!("expected text command, got {other:?}"),
        }
    }

    #[test]
    fn test_broadcast_background() {
        let mut deck = Deck::new(3, 100, 100);
        deck.background("red".parse().unwrap());
        for card in &deck {
            assert_eq!(rgba(card.background_color()), [255, 0, 0, 255]);
        }
    }

    #[test]
    fn test_broadcast_layout_and_text() {
        let mut deck = Deck::new(2, 100, 100);
        deck.layout("title", LayoutDef::new(0.0, 0.0, 100.0, 20.0));
        deck.text("hello", "title", None, None).unwrap();
        for card in &deck {
            assert_eq!(card.commands().len(), 1);
        }
    }

    #[test]
    fn test_texts_cycle_shorter_sequence() {
        let mut deck = Deck::new(3, 100, 100);
        deck.layout("title", LayoutDef::new(0.0, 0.0, 100.0, 20.0));
        deck.texts(vec!["A", "B"], "title", None, None).unwrap();
        assert_eq!(queued_text(&deck[0], 0), "A");
        assert_eq!(queued_text(&deck[1], 0), "B");
        assert_eq!(queued_text(&deck[2], 0), "A");
    }

    #[test]
    fn test_texts_empty_sequence_is_noop() {
        let mut deck = Deck::new(2, 100, 100);
        deck.layout("title", LayoutDef::new(0.0, 0.0, 100.0, 20.0));
        deck.texts(Vec::<String>::new(), "title", None, None).unwrap();
        for card in &deck {
            assert!(card.commands().is_empty());
        }
    }

    #[test]
    fn test_backgrounds_cycle() {
        let mut deck = Deck::new(3, 100, 100);
        let colors: Vec<Color> = vec!["red".parse().unwrap(), "blue".parse().unwrap()];
        deck.backgrounds(colors);
        assert_eq!(rgba(deck[0].background_color()), [255, 0, 0, 255]);
        assert_eq!(rgba(deck[1].background_color()), [0, 0, 255, 255]);
        assert_eq!(rgba(deck[2].background_color()), [255, 0, 0, 255]);
    }

    #[test]
    fn test_images_cycle_against_single_layout() {
        let mut deck = Deck::new(2, 100, 100);
        deck.layout("art", LayoutDef::new(0.0, 0.0, 50.0, 50.0));
        deck.images(vec![PathBuf::from("a.png"), PathBuf::from("b.png")], "art")
            .unwrap();
        assert!(matches!(
            &deck[0].commands()[0],
            DrawCommand::Image { path, .. } if path == &PathBuf::from("a.png")
        ));
        assert!(matches!(
            &deck[1].commands()[0],
            DrawCommand::Image { path, .. } if path == &PathBuf::from("b.png")
        ));
    }

    #[test]
    fn test_for_each_if_touches_matching_indices_only() {
        #[derive(Default)]
        struct Data {
            stats: Option<&'static str>,
        }

        let mut deck = Deck::new(2, 100, 100);
        deck.layout("stats", LayoutDef::new(0.0, 0.0, 100.0, 20.0));
        let values = [
            Data::default(),
            Data {
                stats: Some("1/1"),
            },
        ];
        deck.for_each_if(
            &values,
            |data| data.stats.is_some(),
            |card, data| card.text(data.stats.unwrap_or(""), "stats", None, None),
        )
        .unwrap();
        assert!(deck[0].commands().is_empty());
        assert_eq!(deck[1].commands().len(), 1);
    }

    #[test]
    fn test_concatenation() {
        let mut a = Deck::new(2, 100, 100);
        let mut b = Deck::new(1, 100, 100);
        a.background("red".parse().unwrap());
        b.background("blue".parse().unwrap());

        let combined = &a + &b;
        assert_eq!(combined.len(), 3);
        assert_eq!(rgba(combined[0].background_color()), [255, 0, 0, 255]);
        assert_eq!(rgba(combined[2].background_color()), [0, 0, 255, 255]);

        // operands stay usable
        a.background("green".parse().unwrap());
        assert_eq!(a.len(), 2);
        assert_eq!(b.len(), 1);
        assert_eq!(rgba(combined[0].background_color()), [255, 0, 0, 255]);
    }

    #[test]
    fn test_sequence_operations() {
        let mut deck = Deck::new(1, 100, 100);
        deck.push(Card::new(10, 10));
        assert_eq!(deck.len(), 2);
        assert_eq!(deck[1].width(), 10);

        deck.insert(0, Card::new(20, 20));
        assert_eq!(deck[0].width(), 20);

        let removed = deck.remove(0).unwrap();
        assert_eq!(removed.width(), 20);
        assert!(deck.remove(5).is_none());
        assert_eq!(deck.len(), 2);
    }

    #[test]
    fn test_cycled_get_wraps() {
        let cycled = Cycled::Many(vec![1, 2]);
        assert_eq!(cycled.get(0), Some(&1));
        assert_eq!(cycled.get(3), Some(&2));
        assert_eq!(Cycled::One(7).get(42), Some(&7));
        assert_eq!(Cycled::<i32>::Many(Vec::new()).get(0), None);
    }
}
