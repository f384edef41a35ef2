//! gallery_core - random character gallery with persistent favorites
//!
//! Modules:
//! - character: raw service records, normalization, favorite entries
//! - source: remote character service (HTTP)
//! - batch: all-or-nothing parallel batch fetch
//! - storage: persistent key-value blobs (file, memory)
//! - favorites: favorites list kept in storage
//! - render: cards and placeholders, text/JSON output
//! - presenter: display sink driven by the controller
//! - controller: view state and user events
//! - config: runtime settings

pub mod batch;
pub mod character;
pub mod config;
pub mod controller;
pub mod error;
pub mod favorites;
pub mod presenter;
pub mod render;
pub mod source;
pub mod storage;

pub use character::{normalize, normalize_batch, Character, FavoriteEntry, Occupation, RawCharacter, RawId};

pub use config::{GalleryConfig, DEFAULT_BATCH_SIZE, DEFAULT_ENDPOINT};

pub use controller::{GalleryController, ViewMode, LOAD_ERROR};

pub use error::{GalleryError, GalleryResult};

pub use favorites::{FavoritesStore, FAVORITES_KEY};

pub use presenter::{Presenter, TerminalPresenter};

pub use render::{Card, Frame};

pub use source::{CharacterSource, HttpSource};

pub use storage::{FileStore, KeyValueStore, MemoryStore};
