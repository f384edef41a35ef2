//! Turning a character list into what the user sees

use serde::{Deserialize, Serialize};
use std::io::{self, Write};

use crate::character::{Character, FavoriteEntry};

pub const NO_RESULTS: &str = "No characters found.";
pub const NO_FAVORITES: &str = "No favorites yet.";

/// One displayed character
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: String,
    pub name: String,
    pub image: String,
    /// `None` when the character has no occupation
    pub occupation_label: Option<String>,
    pub favorite: bool,
}

impl Card {
    /// URL to open for the image action; `None` means the action does nothing
    pub fn open_target(&self) -> Option<&str> {
        if self.image.is_empty() {
            None
        } else {
            Some(self.image.as_str())
        }
    }
}

/// Full gallery contents
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "content", rename_all = "snake_case")]
pub enum Frame {
    Cards(Vec<Card>),
    Placeholder(String),
}

impl Frame {
    /// Cleared gallery: no cards and no message
    pub fn empty() -> Self {
        Frame::Cards(Vec::new())
    }

    pub fn cards(&self) -> &[Card] {
        match self {
            Frame::Cards(cards) => cards,
            Frame::Placeholder(_) => &[],
        }
    }

    pub fn card(&self, id: &str) -> Option<&Card> {
        self.cards().iter().find(|c| c.id == id)
    }

    /// Update the favorite marker of one card in place
    pub fn mark_favorite(&mut self, id: &str, favorite: bool) {
        if let Frame::Cards(cards) = self {
            for card in cards.iter_mut().filter(|c| c.id == id) {
                card.favorite = favorite;
            }
        }
    }
}

pub fn occupation_label(occupation: &str) -> Option<String> {
    if occupation.is_empty() {
        None
    } else {
        Some(format!("Occupation: {}", occupation))
    }
}

/// One card per character, in the given order. Favorite markers come from
/// `favorites` as read at call time.
pub fn render(list: &[Character], favorites: &[FavoriteEntry]) -> Frame {
    if list.is_empty() {
        return Frame::Placeholder(NO_RESULTS.to_string());
    }

    let cards = list
        .iter()
        .map(|c| Card {
            id: c.id.clone(),
            name: c.name.clone(),
            image: c.image.clone(),
            occupation_label: occupation_label(&c.occupation),
            favorite: favorites.iter().any(|f| f.id == c.id),
        })
        .collect();

    Frame::Cards(cards)
}

/// Human-readable gallery
pub fn write_text<W: Write + ?Sized>(writer: &mut W, frame: &Frame) -> io::Result<()> {
    match frame {
        Frame::Placeholder(message) => writeln!(writer, "{}", message)?,
        Frame::Cards(cards) => {
            for (idx, card) in cards.iter().enumerate() {
                let marker = if card.favorite { "★" } else { "☆" };
                writeln!(writer, "\n--- {} {} [{}] ---", idx + 1, marker, card.id)?;
                writeln!(writer, "{}", card.name)?;
                if let Some(label) = &card.occupation_label {
                    writeln!(writer, "{}", label)?;
                }
                if !card.image.is_empty() {
                    writeln!(writer, "Image: {}", card.image)?;
                }
            }
        }
    }
    Ok(())
}

/// Gallery as a single JSON line
pub fn write_json<W: Write + ?Sized>(writer: &mut W, frame: &Frame) -> io::Result<()> {
    let json = serde_json::to_string(frame)?;
    writeln!(writer, "{}", json)
}
