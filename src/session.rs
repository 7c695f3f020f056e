use std::sync::Arc;
use tokio::sync::{mpsc, watch};

use crate::catalog::CatalogLoader;
use crate::errors::LoadError;
use crate::models::{Category, Flashcard, Language};
use crate::speech::{self, SpeechOutput, Utterance};
use crate::{log_service_error, log_service_success, log_session_event};

/// Starting preferences for a session
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSettings {
    pub default_category: Category,
    pub speech_rate: f32,
    pub autoplay_enabled: bool,
    pub pitch_multiplier: f32,
}

impl Default for SessionSettings {
    fn default() -> Self {
        Self {
            default_category: Category::default(),
            speech_rate: speech::DEFAULT_SPEECH_RATE,
            autoplay_enabled: false,
            pitch_multiplier: speech::DEFAULT_PITCH_MULTIPLIER,
        }
    }
}

/// Everything the presentation layer renders
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSnapshot {
    pub current_card: Option<Flashcard>,
    pub current_category: Category,
    pub menu_visible: bool,
    pub last_error: Option<LoadError>,
    pub speech_rate: f32,
    pub autoplay_enabled: bool,
    pub loading: bool,
    /// Cursor position and size of the filtered deck
    pub position: Option<usize>,
    pub visible_count: usize,
}

type LoadResult = Result<Vec<Flashcard>, LoadError>;

/// Owns flashcard session state: catalog, category filter, cursor and
/// playback preferences.
///
/// All mutation happens through `&mut self`, so the owner decides which task
/// the session lives on. The catalog load is the only background work; its
/// result comes back over a channel and is applied by the owner.
pub struct SessionController {
    loader: Arc<dyn CatalogLoader>,
    speech: Arc<dyn SpeechOutput>,

    all_cards: Vec<Flashcard>,
    // indices into `all_cards`, in catalog order
    visible: Vec<usize>,
    cursor: usize,
    selected_category: Category,
    menu_visible: bool,
    speech_rate: f32,
    autoplay_enabled: bool,
    pitch_multiplier: f32,
    last_error: Option<LoadError>,

    pending_loads: usize,
    load_tx: mpsc::UnboundedSender<LoadResult>,
    load_rx: mpsc::UnboundedReceiver<LoadResult>,
    state_tx: watch::Sender<SessionSnapshot>,
}

impl SessionController {
    pub fn new(loader: Arc<dyn CatalogLoader>, speech: Arc<dyn SpeechOutput>) -> Self {
        Self::with_settings(loader, speech, SessionSettings::default())
    }

    pub fn with_settings(
        loader: Arc<dyn CatalogLoader>,
        speech: Arc<dyn SpeechOutput>,
        settings: SessionSettings,
    ) -> Self {
        let (load_tx, load_rx) = mpsc::unbounded_channel();
        let initial = SessionSnapshot {
            current_card: None,
            current_category: settings.default_category,
            menu_visible: false,
            last_error: None,
            speech_rate: speech::clamp_rate(settings.speech_rate),
            autoplay_enabled: settings.autoplay_enabled,
            loading: false,
            position: None,
            visible_count: 0,
        };
        let (state_tx, _) = watch::channel(initial);

        Self {
            loader,
            speech,
            all_cards: Vec::new(),
            visible: Vec::new(),
            cursor: 0,
            selected_category: settings.default_category,
            menu_visible: false,
            speech_rate: speech::clamp_rate(settings.speech_rate),
            autoplay_enabled: settings.autoplay_enabled,
            pitch_multiplier: settings.pitch_multiplier,
            last_error: None,
            pending_loads: 0,
            load_tx,
            load_rx,
            state_tx,
        }
    }

    /// Start loading the catalog on a background task.
    ///
    /// Returns immediately; the session shows a loading state until the
    /// result is applied by `wait_for_load`, `poll_load` or the session
    /// runtime. Calling this again retries the load. Must be called from
    /// within a tokio runtime.
    pub fn initialize(&mut self) {
        self.pending_loads += 1;
        let loader = Arc::clone(&self.loader);
        let tx = self.load_tx.clone();
        tokio::spawn(async move {
            // A loader that panics or is cancelled still reports back
            let result = match tokio::spawn(async move { loader.load().await }).await {
                Ok(result) => result,
                Err(e) => Err(LoadError::interrupted(e.to_string())),
            };
            // Receiver lives as long as the controller
            let _ = tx.send(result);
        });
        self.publish();
    }

    /// Wait for the next in-flight load and apply it.
    ///
    /// Returns false when no load is pending.
    pub async fn wait_for_load(&mut self) -> bool {
        if self.pending_loads == 0 {
            return false;
        }
        match self.load_rx.recv().await {
            Some(result) => {
                self.apply_load_result(result);
                true
            }
            None => false,
        }
    }

    /// Apply any load results that have already arrived
    pub fn poll_load(&mut self) -> bool {
        let mut applied = false;
        while let Ok(result) = self.load_rx.try_recv() {
            self.apply_load_result(result);
            applied = true;
        }
        applied
    }

    /// Next load result, for callers multiplexing it with other events
    pub(crate) async fn recv_load_result(&mut self) -> Option<LoadResult> {
        self.load_rx.recv().await
    }

    pub(crate) fn apply_load_result(&mut self, result: LoadResult) {
        self.pending_loads = self.pending_loads.saturating_sub(1);
        match result {
            Ok(cards) => {
                log_service_success!("session", "load", format!("{} flashcards", cards.len()));
                self.all_cards = cards;
                self.last_error = None;
                self.apply_filter();
            }
            Err(err) => {
                log_service_error!("session", "load", kind = err.kind(), error = &err);
                self.last_error = Some(err);
            }
        }
        self.publish();
    }

    pub fn select_category(&mut self, category: Category) {
        self.selected_category = category;
        self.apply_filter();
        self.menu_visible = false;
        log_session_event!(category, category = category, visible = self.visible.len());
        self.publish();
    }

    pub fn toggle_menu(&mut self) {
        self.menu_visible = !self.menu_visible;
        self.publish();
    }

    pub fn next_card(&mut self) {
        if self.visible.is_empty() {
            log_session_event!(skipped, "next_card", "no visible cards");
            return;
        }
        self.cursor = (self.cursor + 1) % self.visible.len();
        self.after_navigation("next");
    }

    pub fn previous_card(&mut self) {
        if self.visible.is_empty() {
            log_session_event!(skipped, "previous_card", "no visible cards");
            return;
        }
        let len = self.visible.len();
        self.cursor = (self.cursor + len - 1) % len;
        self.after_navigation("previous");
    }

    /// Speak the current card's word, interrupting anything already playing
    pub fn speak(&self, language: Language) {
        let Some(card) = self.current_card() else {
            log_session_event!(skipped, "speak", "no current card");
            return;
        };

        log_session_event!(speech, language = language.tag(), rate = self.speech_rate);
        let utterance = Utterance::new(card.word(language), language, self.speech_rate)
            .with_pitch(self.pitch_multiplier);
        self.speech.stop();
        self.speech.speak(utterance);
    }

    /// Set the speech rate, clamped to the supported range
    pub fn set_speech_rate(&mut self, rate: f32) {
        self.speech_rate = speech::clamp_rate(rate);
        self.publish();
    }

    pub fn set_autoplay(&mut self, enabled: bool) {
        self.autoplay_enabled = enabled;
        self.publish();
    }

    pub fn current_card(&self) -> Option<&Flashcard> {
        self.visible.get(self.cursor).map(|&i| &self.all_cards[i])
    }

    /// Cursor into the filtered deck, or `None` when it is empty
    pub fn cursor(&self) -> Option<usize> {
        (!self.visible.is_empty()).then_some(self.cursor)
    }

    pub fn all_cards(&self) -> &[Flashcard] {
        &self.all_cards
    }

    pub fn visible_cards(&self) -> Vec<&Flashcard> {
        self.visible.iter().map(|&i| &self.all_cards[i]).collect()
    }

    pub fn selected_category(&self) -> Category {
        self.selected_category
    }

    pub fn menu_visible(&self) -> bool {
        self.menu_visible
    }

    pub fn speech_rate(&self) -> f32 {
        self.speech_rate
    }

    pub fn autoplay_enabled(&self) -> bool {
        self.autoplay_enabled
    }

    pub fn last_error(&self) -> Option<&LoadError> {
        self.last_error.as_ref()
    }

    pub fn is_loading(&self) -> bool {
        self.pending_loads > 0
    }

    pub fn snapshot(&self) -> SessionSnapshot {
        SessionSnapshot {
            current_card: self.current_card().cloned(),
            current_category: self.selected_category,
            menu_visible: self.menu_visible,
            last_error: self.last_error.clone(),
            speech_rate: self.speech_rate,
            autoplay_enabled: self.autoplay_enabled,
            loading: self.is_loading(),
            position: self.cursor(),
            visible_count: self.visible.len(),
        }
    }

    /// Observe snapshots; a new value is published after every state change
    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state_tx.subscribe()
    }

    fn apply_filter(&mut self) {
        let category = self.selected_category;
        self.visible = self
            .all_cards
            .iter()
            .enumerate()
            .filter(|(_, card)| card.category == category)
            .map(|(i, _)| i)
            .collect();
        self.cursor = 0;
    }

    fn after_navigation(&mut self, direction: &'static str) {
        log_session_event!(
            navigate,
            direction = direction,
            cursor = self.cursor,
            visible = self.visible.len()
        );
        if self.autoplay_enabled {
            self.speak(Language::English);
        }
        self.publish();
    }

    fn publish(&self) {
        self.state_tx.send_replace(self.snapshot());
    }
}
