// gallery_core/tests/controller_tests.rs
// Drives the controller through user events with a scripted source

use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use serde_json::json;

use gallery_core::presenter::Presenter;
use gallery_core::render::{NO_FAVORITES, NO_RESULTS};
use gallery_core::{
    CharacterSource, FavoriteEntry, FavoritesStore, Frame, GalleryController, GalleryError,
    GalleryResult, KeyValueStore, MemoryStore, RawCharacter, ViewMode, FAVORITES_KEY, LOAD_ERROR,
};

/// Hands out queued responses in call order
struct ScriptedSource {
    responses: Mutex<VecDeque<GalleryResult<RawCharacter>>>,
}

impl ScriptedSource {
    fn new(responses: Vec<GalleryResult<RawCharacter>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
        }
    }

    fn push(&self, responses: Vec<GalleryResult<RawCharacter>>) {
        self.responses.lock().unwrap().extend(responses);
    }
}

#[async_trait]
impl CharacterSource for ScriptedSource {
    async fn fetch_random(&self) -> GalleryResult<RawCharacter> {
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or(Err(GalleryError::Http { status: 404 }))
    }
}

#[derive(Debug, Clone, PartialEq)]
enum Event {
    Loader(bool),
    Error(Option<String>),
    Render(Frame),
    Favorite(String, bool),
    Open(String),
}

#[derive(Default)]
struct Recorder {
    events: Vec<Event>,
}

impl Presenter for Recorder {
    fn show_loader(&mut self, visible: bool) {
        self.events.push(Event::Loader(visible));
    }
    fn show_error(&mut self, message: Option<&str>) {
        self.events.push(Event::Error(message.map(str::to_string)));
    }
    fn render(&mut self, frame: &Frame) {
        self.events.push(Event::Render(frame.clone()));
    }
    fn mark_favorite(&mut self, id: &str, favorite: bool) {
        self.events.push(Event::Favorite(id.to_string(), favorite));
    }
    fn open_image(&mut self, url: &str) {
        self.events.push(Event::Open(url.to_string()));
    }
}

/// Memory store that counts writes
#[derive(Default)]
struct CountingStore {
    inner: MemoryStore,
    writes: AtomicUsize,
}

impl KeyValueStore for CountingStore {
    fn get(&self, key: &str) -> anyhow::Result<Option<String>> {
        self.inner.get(key)
    }

    fn set(&self, key: &str, value: &str) -> anyhow::Result<()> {
        self.writes.fetch_add(1, Ordering::SeqCst);
        self.inner.set(key, value)
    }
}

fn record(id: u32, name: &str) -> GalleryResult<RawCharacter> {
    Ok(serde_json::from_value(json!({
        "id": id,
        "name": name,
        "image": format!("https://cdn.example/{}.webp", id),
        "occupation": ["Resident"],
    }))
    .unwrap())
}

fn springfield() -> Vec<GalleryResult<RawCharacter>> {
    vec![
        record(1, "Homer Simpson"),
        record(2, "Marge Simpson"),
        record(3, "Bart Simpson"),
        record(4, "Lisa Simpson"),
        record(5, "Moe Szyslak"),
        record(6, "Ned Flanders"),
    ]
}

fn gallery(
    responses: Vec<GalleryResult<RawCharacter>>,
) -> GalleryController<ScriptedSource, MemoryStore, Recorder> {
    GalleryController::new(
        ScriptedSource::new(responses),
        FavoritesStore::new(MemoryStore::new()),
        Recorder::default(),
        6,
    )
}

fn names(frame: &Frame) -> Vec<&str> {
    frame.cards().iter().map(|c| c.name.as_str()).collect()
}

#[tokio::test]
async fn test_load_renders_full_batch_in_order() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();

    assert_eq!(g.current_list().len(), 6);
    assert_eq!(g.view_mode(), ViewMode::Random);
    assert!(!g.is_loading());
    assert_eq!(g.error(), None);
    assert_eq!(
        names(g.frame()),
        vec!["Homer Simpson", "Marge Simpson", "Bart Simpson", "Lisa Simpson", "Moe Szyslak", "Ned Flanders"]
    );
    assert_eq!(
        g.frame().cards()[0].occupation_label.as_deref(),
        Some("Occupation: Resident")
    );

    let events = &g.presenter().events;
    assert_eq!(events[0], Event::Error(None));
    assert_eq!(events[1], Event::Loader(true));
    assert_eq!(events[2], Event::Render(Frame::empty()));
    assert_eq!(events[3], Event::Loader(false));
    assert!(matches!(&events[4], Event::Render(Frame::Cards(cards)) if cards.len() == 6));
}

#[tokio::test]
async fn test_one_failed_fetch_fails_whole_batch() {
    let mut responses = springfield();
    responses[2] = Err(GalleryError::Http { status: 500 });

    let mut g = gallery(responses);
    let err = g.load_batch().await.unwrap_err();

    assert!(matches!(err, GalleryError::Http { status: 500 }));
    assert!(g.current_list().is_empty());
    assert!(g.frame().cards().is_empty());
    assert_eq!(g.error(), Some(LOAD_ERROR));
    assert!(!g.is_loading());

    let events = &g.presenter().events;
    assert_eq!(events.last(), Some(&Event::Error(Some(LOAD_ERROR.to_string()))));
    assert!(events.contains(&Event::Loader(false)));
    // No partial list ever reaches the screen
    assert!(!events
        .iter()
        .any(|e| matches!(e, Event::Render(Frame::Cards(cards)) if !cards.is_empty())));
}

#[tokio::test]
async fn test_oddly_typed_record_still_loads_with_batch() {
    let mut responses = springfield();
    responses[4] = Ok(serde_json::from_value(json!({
        "id": true,
        "name": 42,
        "image": { "url": "x" },
        "occupation": [7],
    }))
    .unwrap());

    let mut g = gallery(responses);
    g.load_batch().await.unwrap();

    assert_eq!(g.frame().cards().len(), 6);
    let odd = &g.current_list()[4];
    assert_eq!(odd.name, "42");
    assert!(odd.id.starts_with("42-"));
    assert_eq!(odd.image, "");
    assert_eq!(odd.occupation, "7");
}

#[tokio::test]
async fn test_failed_reload_clears_previous_list_and_error_resets() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();

    g.source().push(vec![record(7, "Apu"), Err(GalleryError::Http { status: 502 })]);
    assert!(g.load_batch().await.is_err());
    assert!(g.current_list().is_empty());
    assert!(g.frame().cards().is_empty());

    g.source().push(springfield());
    g.load_batch().await.unwrap();
    assert_eq!(g.error(), None);
    assert_eq!(g.current_list().len(), 6);
}

#[tokio::test]
async fn test_filter_is_case_insensitive_substring_and_does_not_compound() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();

    assert_eq!(names(g.apply_filter("  SIMPSON ")).len(), 4);
    assert_eq!(names(g.apply_filter("flan")), vec!["Ned Flanders"]);
    // Re-evaluated from the whole batch, not from the previous result
    assert_eq!(names(g.apply_filter("moe")), vec!["Moe Szyslak"]);
    assert_eq!(names(g.apply_filter("")).len(), 6);
    assert_eq!(g.apply_filter("krusty"), &Frame::Placeholder(NO_RESULTS.to_string()));

    assert_eq!(g.current_list().len(), 6);
}

#[tokio::test]
async fn test_favorites_view_filter_matches_homer() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.toggle_favorite("1").unwrap();

    g.show_favorites();
    assert_eq!(g.view_mode(), ViewMode::Favorites);

    let frame = g.apply_filter("HOMER");
    assert_eq!(names(frame), vec!["Homer Simpson"]);
    assert!(frame.cards()[0].favorite);
}

#[tokio::test]
async fn test_random_view_filter_never_touches_favorites_list() {
    let store = CountingStore::default();
    store
        .inner
        .set(
            FAVORITES_KEY,
            &serde_json::to_string(&vec![FavoriteEntry {
                id: "99".into(),
                name: "Homer Clone".into(),
                image: String::new(),
                occupation: String::new(),
            }])
            .unwrap(),
        )
        .unwrap();

    let mut g = GalleryController::new(
        ScriptedSource::new(springfield()),
        FavoritesStore::new(store),
        Recorder::default(),
        6,
    );
    g.load_batch().await.unwrap();

    let frame = g.apply_filter("homer").clone();
    assert_eq!(names(&frame), vec!["Homer Simpson"]);
    assert!(frame.card("99").is_none());
    assert_eq!(g.favorites().inner().writes.load(Ordering::SeqCst), 0);
    assert_eq!(g.favorites().get_favorites().len(), 1);
}

#[tokio::test]
async fn test_show_favorites_empty_shows_placeholder() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.apply_filter("bart");

    assert_eq!(g.show_favorites(), &Frame::Placeholder(NO_FAVORITES.to_string()));

    g.toggle_favorite("3").unwrap_err();
}

#[tokio::test]
async fn test_show_favorites_lists_all_regardless_of_filter() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.toggle_favorite("1").unwrap();
    g.toggle_favorite("2").unwrap();

    g.apply_filter("marge");
    let frame = g.show_favorites();
    assert_eq!(names(frame), vec!["Homer Simpson", "Marge Simpson"]);
    assert!(frame.cards().iter().all(|c| c.favorite));
}

#[tokio::test]
async fn test_toggle_twice_restores_store() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.toggle_favorite("4").unwrap();
    let before = g.favorites().get_favorites();

    assert!(g.toggle_favorite("5").unwrap());
    assert!(g.frame().card("5").unwrap().favorite);
    assert!(!g.toggle_favorite("5").unwrap());
    assert!(!g.frame().card("5").unwrap().favorite);

    assert_eq!(g.favorites().get_favorites(), before);
    assert!(g
        .presenter()
        .events
        .ends_with(&[Event::Favorite("5".into(), true), Event::Favorite("5".into(), false)]));
}

#[tokio::test]
async fn test_unfavorite_in_favorites_view_keeps_card_visible() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.toggle_favorite("1").unwrap();
    g.show_favorites();

    assert!(!g.toggle_favorite("1").unwrap());
    assert!(g.favorites().get_favorites().is_empty());
    let card = g.frame().card("1").unwrap();
    assert_eq!(card.name, "Homer Simpson");
    assert!(!card.favorite);

    // Toggling again brings it back
    assert!(g.toggle_favorite("1").unwrap());
    assert!(g.favorites().is_favorite("1"));

    // Refreshing the view is what drops removed entries
    g.toggle_favorite("1").unwrap();
    assert_eq!(g.show_favorites(), &Frame::Placeholder(NO_FAVORITES.to_string()));
}

#[tokio::test]
async fn test_render_reads_favorites_at_render_time() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.toggle_favorite("6").unwrap();

    g.source().push(springfield());
    g.load_batch().await.unwrap();
    assert!(g.frame().card("6").unwrap().favorite);
    assert!(!g.frame().card("1").unwrap().favorite);
}

#[tokio::test]
async fn test_load_resets_view_mode() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    g.show_favorites();
    assert_eq!(g.view_mode(), ViewMode::Favorites);

    g.source().push(springfield());
    g.load_batch().await.unwrap();
    assert_eq!(g.view_mode(), ViewMode::Random);
}

#[tokio::test]
async fn test_unknown_id_errors() {
    let mut g = gallery(springfield());
    g.load_batch().await.unwrap();
    assert!(matches!(
        g.toggle_favorite("404"),
        Err(GalleryError::UnknownCharacter(_))
    ));
    assert!(matches!(g.open_image("404"), Err(GalleryError::UnknownCharacter(_))));
}

#[tokio::test]
async fn test_open_image() {
    let mut responses = springfield();
    responses[5] = Ok(serde_json::from_value(json!({ "id": 6, "name": "Ned Flanders" })).unwrap());

    let mut g = gallery(responses);
    g.load_batch().await.unwrap();

    assert_eq!(
        g.open_image("1").unwrap().as_deref(),
        Some("https://cdn.example/1.webp")
    );
    assert_eq!(g.open_image("6").unwrap(), None);

    let opens: Vec<_> = g
        .presenter()
        .events
        .iter()
        .filter(|e| matches!(e, Event::Open(_)))
        .collect();
    assert_eq!(opens, vec![&Event::Open("https://cdn.example/1.webp".into())]);
}

#[tokio::test]
async fn test_corrupt_favorites_blob_is_silent() {
    let store = MemoryStore::new();
    store.set(FAVORITES_KEY, "not json at all").unwrap();

    let mut g = GalleryController::new(
        ScriptedSource::new(springfield()),
        FavoritesStore::new(store),
        Recorder::default(),
        6,
    );
    g.load_batch().await.unwrap();
    assert_eq!(g.frame().cards().len(), 6);
    assert_eq!(g.show_favorites(), &Frame::Placeholder(NO_FAVORITES.to_string()));
    assert_eq!(g.error(), None);
}
