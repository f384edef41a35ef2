//! Gallery Controller
//!
//! Owns the view state (last loaded batch, view mode, what is on screen)
//! and reacts to the user events: load a batch, type a filter, show the
//! favorites, toggle a favorite, open an image.

use serde::{Deserialize, Serialize};
use tracing::{info, warn};

use crate::batch;
use crate::character::{normalize_batch, Character};
use crate::error::{GalleryError, GalleryResult};
use crate::favorites::FavoritesStore;
use crate::presenter::Presenter;
use crate::render::{self, Frame, NO_FAVORITES};
use crate::source::CharacterSource;
use crate::storage::KeyValueStore;

/// Shown when a batch fails; the only recovery is loading again
pub const LOAD_ERROR: &str = "Could not load characters. Please try again.";

/// Which list the filter and renderer work over
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub enum ViewMode {
    #[default]
    Random,
    Favorites,
}

pub struct GalleryController<S, K, P> {
    source: S,
    favorites: FavoritesStore<K>,
    presenter: P,
    batch_size: usize,
    current_list: Vec<Character>,
    view_mode: ViewMode,
    /// Characters behind the cards currently on screen
    visible: Vec<Character>,
    frame: Frame,
    loading: bool,
    error: Option<String>,
}

impl<S, K, P> GalleryController<S, K, P>
where
    S: CharacterSource,
    K: KeyValueStore,
    P: Presenter,
{
    pub fn new(source: S, favorites: FavoritesStore<K>, presenter: P, batch_size: usize) -> Self {
        Self {
            source,
            favorites,
            presenter,
            batch_size,
            current_list: Vec::new(),
            view_mode: ViewMode::Random,
            visible: Vec::new(),
            frame: Frame::empty(),
            loading: false,
            error: None,
        }
    }

    /// The character source, for inspecting or feeding the collaborator the
    /// controller was built with (e.g. a scripted source in tests)
    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn current_list(&self) -> &[Character] {
        &self.current_list
    }

    pub fn view_mode(&self) -> ViewMode {
        self.view_mode
    }

    pub fn frame(&self) -> &Frame {
        &self.frame
    }

    pub fn is_loading(&self) -> bool {
        self.loading
    }

    pub fn error(&self) -> Option<&str> {
        self.error.as_deref()
    }

    pub fn favorites(&self) -> &FavoritesStore<K> {
        &self.favorites
    }

    pub fn presenter(&self) -> &P {
        &self.presenter
    }

    /// Replace the current list with a fresh batch. On any failed fetch the
    /// list is cleared, nothing is rendered and the load error is shown.
    pub async fn load_batch(&mut self) -> GalleryResult<()> {
        self.view_mode = ViewMode::Random;
        self.set_error(None);
        self.set_loading(true);
        self.show(Vec::new(), Frame::empty());

        let result = batch::load_batch(&self.source, self.batch_size).await;
        self.set_loading(false);

        match result {
            Ok(records) => {
                self.current_list = normalize_batch(&records);
                info!(count = self.current_list.len(), "batch loaded");
                let list = self.current_list.clone();
                self.render_list(list);
                Ok(())
            }
            Err(e) => {
                warn!(error = %e, "showing load error");
                self.current_list.clear();
                self.set_error(Some(LOAD_ERROR));
                Err(e)
            }
        }
    }

    /// Re-render the active source narrowed to names containing `query`,
    /// ignoring case and surrounding whitespace.
    pub fn apply_filter(&mut self, query: &str) -> &Frame {
        let query = query.trim().to_lowercase();

        let source: Vec<Character> = match self.view_mode {
            ViewMode::Favorites => self
                .favorites
                .get_favorites()
                .iter()
                .map(Character::from)
                .collect(),
            ViewMode::Random => self.current_list.clone(),
        };

        let filtered = source
            .into_iter()
            .filter(|c| c.name.to_lowercase().contains(&query))
            .collect();

        self.render_list(filtered);
        &self.frame
    }

    /// Switch to the favorites list, regardless of any filter text
    pub fn show_favorites(&mut self) -> &Frame {
        self.view_mode = ViewMode::Favorites;

        let list: Vec<Character> = self
            .favorites
            .get_favorites()
            .iter()
            .map(Character::from)
            .collect();

        if list.is_empty() {
            self.show(Vec::new(), Frame::Placeholder(NO_FAVORITES.to_string()));
        } else {
            self.render_list(list);
        }
        &self.frame
    }

    /// Flip the favorite state of a displayed card. The card stays on screen
    /// even in the favorites view; only its marker changes.
    pub fn toggle_favorite(&mut self, id: &str) -> GalleryResult<bool> {
        let character = self
            .visible
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or_else(|| GalleryError::UnknownCharacter(id.to_string()))?;

        let now_favorite = self.favorites.toggle_favorite(&character)?;
        self.frame.mark_favorite(id, now_favorite);
        self.presenter.mark_favorite(id, now_favorite);
        Ok(now_favorite)
    }

    /// Open a displayed card's image. Cards without an image do nothing.
    pub fn open_image(&mut self, id: &str) -> GalleryResult<Option<String>> {
        let card = self
            .frame
            .card(id)
            .ok_or_else(|| GalleryError::UnknownCharacter(id.to_string()))?;

        let target = card.open_target().map(str::to_string);
        if let Some(url) = &target {
            self.presenter.open_image(url);
        }
        Ok(target)
    }

    fn render_list(&mut self, list: Vec<Character>) {
        let favorites = self.favorites.get_favorites();
        let frame = render::render(&list, &favorites);
        self.show(list, frame);
    }

    fn show(&mut self, visible: Vec<Character>, frame: Frame) {
        self.visible = visible;
        self.frame = frame;
        self.presenter.render(&self.frame);
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.presenter.show_loader(loading);
    }

    fn set_error(&mut self, message: Option<&str>) {
        self.error = message.map(str::to_string);
        self.presenter.show_error(message);
    }
}
