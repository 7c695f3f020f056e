use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;

use crate::errors::{CommandError, LoadError};
use crate::log_system_event;
use crate::models::{Category, Flashcard, Language};
use crate::session::{SessionController, SessionSnapshot};

/// Commands the presentation layer sends to a running session
#[derive(Debug)]
pub enum SessionCommand {
    SelectCategory(Category),
    ToggleMenu,
    NextCard,
    PreviousCard,
    Speak(Language),
    SetSpeechRate(f32),
    SetAutoplay(bool),
    /// Re-run the catalog load after a failure; acknowledged once the
    /// session reports `loading`
    Retry(oneshot::Sender<()>),
    /// Reply with the snapshot once every earlier command has been applied
    Snapshot(oneshot::Sender<SessionSnapshot>),
    Shutdown,
}

enum SessionEvent {
    Command(SessionCommand),
    Loaded(Result<Vec<Flashcard>, LoadError>),
    Closed,
}

/// Handle to a session running on its own task
pub struct SessionHandle {
    sender: mpsc::Sender<SessionCommand>,
    state: watch::Receiver<SessionSnapshot>,
    task: JoinHandle<()>,
}

impl SessionHandle {
    pub async fn send(&self, command: SessionCommand) -> Result<(), CommandError> {
        self.sender
            .send(command)
            .await
            .map_err(|_| CommandError::SessionClosed)
    }

    pub async fn select_category(&self, category: Category) -> Result<(), CommandError> {
        self.send(SessionCommand::SelectCategory(category)).await
    }

    pub async fn toggle_menu(&self) -> Result<(), CommandError> {
        self.send(SessionCommand::ToggleMenu).await
    }

    pub async fn next_card(&self) -> Result<(), CommandError> {
        self.send(SessionCommand::NextCard).await
    }

    pub async fn previous_card(&self) -> Result<(), CommandError> {
        self.send(SessionCommand::PreviousCard).await
    }

    pub async fn speak(&self, language: Language) -> Result<(), CommandError> {
        self.send(SessionCommand::Speak(language)).await
    }

    pub async fn set_speech_rate(&self, rate: f32) -> Result<(), CommandError> {
        self.send(SessionCommand::SetSpeechRate(rate)).await
    }

    pub async fn set_autoplay(&self, enabled: bool) -> Result<(), CommandError> {
        self.send(SessionCommand::SetAutoplay(enabled)).await
    }

    /// Start a new catalog load.
    ///
    /// Returns after the session has published `loading = true`, so a
    /// following `wait_until_loaded` observes this load.
    pub async fn retry(&self) -> Result<(), CommandError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Retry(tx)).await?;
        rx.await.map_err(|_| CommandError::SessionClosed)
    }

    /// Snapshot after all previously sent commands have been applied
    pub async fn current(&self) -> Result<SessionSnapshot, CommandError> {
        let (tx, rx) = oneshot::channel();
        self.send(SessionCommand::Snapshot(tx)).await?;
        rx.await.map_err(|_| CommandError::SessionClosed)
    }

    /// Wait until no catalog load is in flight and return that snapshot
    pub async fn wait_until_loaded(&self) -> Result<SessionSnapshot, CommandError> {
        let mut state = self.state.clone();
        let snapshot = state
            .wait_for(|snapshot| !snapshot.loading)
            .await
            .map_err(|_| CommandError::SessionClosed)?;
        Ok(snapshot.clone())
    }

    pub fn subscribe(&self) -> watch::Receiver<SessionSnapshot> {
        self.state.clone()
    }

    /// Latest published snapshot, without waiting for queued commands
    pub fn latest(&self) -> SessionSnapshot {
        self.state.borrow().clone()
    }

    /// Stop the session task and wait for it to exit
    pub async fn shutdown(self) {
        let _ = self.sender.send(SessionCommand::Shutdown).await;
        let _ = self.task.await;
    }
}

/// Run the session on a dedicated task.
///
/// Every command and every load result is applied on that one task, in
/// arrival order. The caller may have already called
/// `SessionController::initialize`; a load started before spawning is
/// picked up by the loop.
pub fn spawn_session(controller: SessionController) -> SessionHandle {
    let (tx, rx) = mpsc::channel(32);
    let state = controller.subscribe();

    let task = tokio::spawn(async move {
        session_loop(controller, rx).await;
    });

    SessionHandle {
        sender: tx,
        state,
        task,
    }
}

async fn session_loop(mut controller: SessionController, mut commands: mpsc::Receiver<SessionCommand>) {
    log_system_event!(startup, component = "session", "session loop started");

    loop {
        let event = tokio::select! {
            Some(result) = controller.recv_load_result() => SessionEvent::Loaded(result),
            command = commands.recv() => match command {
                Some(command) => SessionEvent::Command(command),
                None => SessionEvent::Closed,
            },
        };

        match event {
            SessionEvent::Loaded(result) => controller.apply_load_result(result),
            SessionEvent::Command(SessionCommand::Shutdown) | SessionEvent::Closed => break,
            SessionEvent::Command(command) => apply_command(&mut controller, command),
        }
    }

    log_system_event!(shutdown, component = "session", "session loop stopped");
}

fn apply_command(controller: &mut SessionController, command: SessionCommand) {
    match command {
        SessionCommand::SelectCategory(category) => controller.select_category(category),
        SessionCommand::ToggleMenu => controller.toggle_menu(),
        SessionCommand::NextCard => controller.next_card(),
        SessionCommand::PreviousCard => controller.previous_card(),
        SessionCommand::Speak(language) => controller.speak(language),
        SessionCommand::SetSpeechRate(rate) => controller.set_speech_rate(rate),
        SessionCommand::SetAutoplay(enabled) => controller.set_autoplay(enabled),
        SessionCommand::Retry(ack) => {
            controller.initialize();
            let _ = ack.send(());
        }
        SessionCommand::Snapshot(reply) => {
            let _ = reply.send(controller.snapshot());
        }
        SessionCommand::Shutdown => {}
    }
}
