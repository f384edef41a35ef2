//! Favorites persisted as one JSON array under a versioned storage key

use anyhow::Context;
use serde_json::Value;
use std::collections::HashSet;
use tracing::{debug, warn};

use crate::character::{Character, FavoriteEntry};
use crate::error::GalleryResult;
use crate::storage::KeyValueStore;

/// Storage key; bump the suffix when the entry layout changes
pub const FAVORITES_KEY: &str = "gallery_favorites_v1";

pub struct FavoritesStore<K> {
    store: K,
}

impl<K: KeyValueStore> FavoritesStore<K> {
    pub fn new(store: K) -> Self {
        Self { store }
    }

    pub fn inner(&self) -> &K {
        &self.store
    }

    /// All stored favorites in insertion order. Missing or unreadable data
    /// reads as an empty list; entries that do not decode are skipped so
    /// the rest survive the next write.
    pub fn get_favorites(&self) -> Vec<FavoriteEntry> {
        let blob = match self.store.get(FAVORITES_KEY) {
            Ok(Some(blob)) => blob,
            Ok(None) => return Vec::new(),
            Err(e) => {
                warn!(error = %e, "favorites storage unreadable, treating as empty");
                return Vec::new();
            }
        };

        let values: Vec<Value> = match serde_json::from_str(&blob) {
            Ok(values) => values,
            Err(e) => {
                warn!(error = %e, "malformed favorites data, treating as empty");
                return Vec::new();
            }
        };

        let mut seen = HashSet::new();
        values
            .into_iter()
            .filter_map(|value| match serde_json::from_value::<FavoriteEntry>(value) {
                Ok(entry) => Some(entry),
                Err(e) => {
                    warn!(error = %e, "skipping malformed favorite entry");
                    None
                }
            })
            .filter(|entry| seen.insert(entry.id.clone()))
            .collect()
    }

    /// Overwrite the stored list
    pub fn set_favorites(&self, entries: &[FavoriteEntry]) -> GalleryResult<()> {
        let json = serde_json::to_string(entries).context("Failed to serialize favorites")?;
        self.store.set(FAVORITES_KEY, &json)?;
        Ok(())
    }

    pub fn is_favorite(&self, id: &str) -> bool {
        self.get_favorites().iter().any(|f| f.id == id)
    }

    /// Add the character if absent, remove it if present. Returns whether it
    /// is a favorite afterwards.
    pub fn toggle_favorite(&self, character: &Character) -> GalleryResult<bool> {
        let mut favorites = self.get_favorites();

        let now_favorite = match favorites.iter().position(|f| f.id == character.id) {
            Some(idx) => {
                favorites.remove(idx);
                false
            }
            None => {
                favorites.push(FavoriteEntry::from(character));
                true
            }
        };

        self.set_favorites(&favorites)?;
        debug!(id = %character.id, now_favorite, "favorite toggled");
        Ok(now_favorite)
    }
}
