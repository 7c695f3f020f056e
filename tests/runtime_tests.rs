use async_trait::async_trait;
use flashcards::{
    spawn_session, CatalogLoader, Category, CommandError, Flashcard, Language, LoadError,
    LoadErrorKind, SessionController, SpeechOutput, Translations, Utterance,
};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tokio::sync::Notify;
use uuid::Uuid;

/// Reports a missing resource until `available` is set
struct SwitchableLoader {
    available: AtomicBool,
}

#[async_trait]
impl CatalogLoader for SwitchableLoader {
    async fn load(&self) -> Result<Vec<Flashcard>, LoadError> {
        if !self.available.load(Ordering::SeqCst) {
            return Err(LoadError::not_found("flashcards.json"));
        }
        Ok(vec![
            card("dog", Category::Animals),
            card("cat", Category::Animals),
            card("red", Category::Colors),
        ])
    }
}

/// Holds each load until the gate is opened
#[derive(Default)]
struct GatedLoader {
    gate: Notify,
}

#[async_trait]
impl CatalogLoader for GatedLoader {
    async fn load(&self) -> Result<Vec<Flashcard>, LoadError> {
        self.gate.notified().await;
        Ok(vec![card("red", Category::Colors)])
    }
}

struct PanickingLoader;

#[async_trait]
impl CatalogLoader for PanickingLoader {
    async fn load(&self) -> Result<Vec<Flashcard>, LoadError> {
        panic!("catalog backend crashed");
    }
}

#[derive(Default)]
struct SpokenTexts(Mutex<Vec<String>>);

impl SpeechOutput for SpokenTexts {
    fn stop(&self) {}

    fn speak(&self, utterance: Utterance) {
        self.0.lock().unwrap().push(utterance.text);
    }
}

fn card(english: &str, category: Category) -> Flashcard {
    Flashcard {
        id: Uuid::new_v4(),
        image_name: english.to_string(),
        translations: Translations {
            english: english.to_string(),
            ..Default::default()
        },
        category,
    }
}

#[tokio::test]
async fn test_commands_drive_running_session() {
    let loader = Arc::new(SwitchableLoader {
        available: AtomicBool::new(true),
    });
    let speech = Arc::new(SpokenTexts::default());
    let mut controller = SessionController::new(loader, speech.clone());
    controller.initialize();

    let handle = spawn_session(controller);
    let snapshot = handle.wait_until_loaded().await.unwrap();
    assert!(snapshot.last_error.is_none());
    assert_eq!(snapshot.current_category, Category::FoodAndDrink);
    assert!(snapshot.current_card.is_none());

    handle.toggle_menu().await.unwrap();
    assert!(handle.current().await.unwrap().menu_visible);

    handle.select_category(Category::Animals).await.unwrap();
    handle.set_autoplay(true).await.unwrap();
    handle.next_card().await.unwrap();
    let snapshot = handle.current().await.unwrap();
    assert!(!snapshot.menu_visible);
    assert_eq!(snapshot.position, Some(1));
    assert_eq!(snapshot.visible_count, 2);
    assert!(snapshot.autoplay_enabled);
    assert_eq!(snapshot.current_card.unwrap().word(Language::English), "cat");

    handle.previous_card().await.unwrap();
    handle.set_speech_rate(0.9).await.unwrap();
    handle.speak(Language::English).await.unwrap();
    let snapshot = handle.current().await.unwrap();
    assert_eq!(snapshot.speech_rate, 0.9);
    assert_eq!(snapshot, handle.latest());

    assert_eq!(*speech.0.lock().unwrap(), vec!["cat", "dog", "dog"]);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_retry_through_handle_recovers() {
    let loader = Arc::new(SwitchableLoader {
        available: AtomicBool::new(false),
    });
    let mut controller =
        SessionController::new(loader.clone(), Arc::new(SpokenTexts::default()));
    controller.initialize();

    let handle = spawn_session(controller);
    let snapshot = handle.wait_until_loaded().await.unwrap();
    assert_eq!(
        snapshot.last_error.map(|e| e.kind()),
        Some(LoadErrorKind::ResourceNotFound)
    );
    assert!(snapshot.current_card.is_none());

    loader.available.store(true, Ordering::SeqCst);
    handle.select_category(Category::Colors).await.unwrap();
    handle.retry().await.unwrap();

    let snapshot = handle.wait_until_loaded().await.unwrap();
    assert!(snapshot.last_error.is_none());
    assert_eq!(snapshot.current_card.unwrap().word(Language::English), "red");

    handle.shutdown().await;
}

#[tokio::test]
async fn test_retry_returns_once_loading_is_published() {
    let loader = Arc::new(GatedLoader::default());
    let controller =
        SessionController::new(loader.clone(), Arc::new(SpokenTexts::default()));
    let handle = spawn_session(controller);
    assert!(!handle.latest().loading);

    handle.retry().await.unwrap();
    assert!(handle.latest().loading);

    loader.gate.notify_one();
    let snapshot = handle.wait_until_loaded().await.unwrap();
    assert!(!snapshot.loading);
    assert_eq!(snapshot.visible_count, 0);
    handle.select_category(Category::Colors).await.unwrap();
    assert_eq!(handle.current().await.unwrap().visible_count, 1);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_panicking_loader_does_not_hang_session() {
    let mut controller =
        SessionController::new(Arc::new(PanickingLoader), Arc::new(SpokenTexts::default()));
    controller.initialize();

    let handle = spawn_session(controller);
    let snapshot = tokio::time::timeout(Duration::from_secs(2), handle.wait_until_loaded())
        .await
        .expect("session should leave the loading state")
        .unwrap();
    assert_eq!(
        snapshot.last_error.map(|e| e.kind()),
        Some(LoadErrorKind::Interrupted)
    );

    handle.shutdown().await;
}

#[tokio::test]
async fn test_snapshots_are_published_to_subscribers() {
    let loader = Arc::new(SwitchableLoader {
        available: AtomicBool::new(true),
    });
    let mut controller = SessionController::new(loader, Arc::new(SpokenTexts::default()));
    controller.initialize();

    let handle = spawn_session(controller);
    let mut updates = handle.subscribe();
    handle.wait_until_loaded().await.unwrap();

    handle.select_category(Category::Animals).await.unwrap();
    let snapshot = updates
        .wait_for(|snapshot| snapshot.current_category == Category::Animals)
        .await
        .unwrap()
        .clone();
    assert_eq!(snapshot.visible_count, 2);

    handle.shutdown().await;
}

#[tokio::test]
async fn test_commands_after_shutdown_fail() {
    let loader = Arc::new(SwitchableLoader {
        available: AtomicBool::new(true),
    });
    let controller = SessionController::new(loader, Arc::new(SpokenTexts::default()));
    let handle = spawn_session(controller);

    handle.send(flashcards::SessionCommand::Shutdown).await.unwrap();
    // Wait for the loop to drop its receiver
    let mut updates = handle.subscribe();
    let _ = updates.changed().await;

    assert!(matches!(
        handle.next_card().await,
        Err(CommandError::SessionClosed)
    ));
}
