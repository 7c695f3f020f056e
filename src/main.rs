use anyhow::Result;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_appender::non_blocking::WorkerGuard;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter, Layer};

use flashcards::config::LoggingConfig;
use flashcards::{
    log_system_event, spawn_session, BundledCatalogLoader, Category, Config, Language,
    SessionController, TracingSpeech,
};

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize logging first so configuration events are captured
    let _guard = setup_logging(&LoggingConfig::from_env()?)?;

    let config = Config::from_env()?;
    config.validate()?;

    log_system_event!(startup, component = "flashcards", "starting flashcard session");

    let loader = BundledCatalogLoader::new(
        &config.catalog.resource_dir,
        &config.catalog.resource_name,
    );
    let mut controller = SessionController::with_settings(
        Arc::new(loader),
        Arc::new(TracingSpeech),
        config.session_settings(),
    );
    controller.initialize();

    let handle = spawn_session(controller);
    let snapshot = handle.wait_until_loaded().await?;

    if let Some(err) = &snapshot.last_error {
        warn!(kind = ?err.kind(), "{}", err.user_message());
        handle.shutdown().await;
        return Err(err.clone().into());
    }

    // Per-category counts, in menu order
    let mut total = 0;
    for category in Category::ALL {
        handle.select_category(category).await?;
        let counts = handle.current().await?;
        total += counts.visible_count;
        info!(
            category = %category,
            icon = category.icon(),
            card_count = counts.visible_count,
            "Catalog category"
        );
    }
    info!(card_count = total, "Catalog summary");

    handle.select_category(config.session.default_category).await?;
    let snapshot = handle.current().await?;
    match &snapshot.current_card {
        Some(card) => {
            info!(
                image = %card.image_name,
                english = card.word(Language::English),
                mandarin = card.word(Language::Mandarin),
                cantonese = card.word(Language::Cantonese),
                "First card of {}",
                snapshot.current_category
            );
            handle.speak(Language::English).await?;
        }
        None => info!("No flashcards in {}", snapshot.current_category),
    }

    handle.shutdown().await;
    log_system_event!(shutdown, component = "flashcards", "flashcard session finished");
    Ok(())
}

fn setup_logging(config: &LoggingConfig) -> Result<Option<WorkerGuard>> {
    use std::fs;
    use tracing_subscriber::fmt;

    let env_filter = EnvFilter::try_new(&config.level)
        .unwrap_or_else(|_| EnvFilter::new("info"));

    // Configure console output
    let console_layer = config.console_enabled.then(|| {
        fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_ansi(true)
            .boxed()
    });

    // Configure file output (no ANSI colors for files)
    let (file_layer, guard) = if config.file_enabled {
        fs::create_dir_all(&config.log_directory).unwrap_or_else(|e| {
            eprintln!("Warning: Could not create logs directory: {}", e);
        });
        let file_appender = tracing_appender::rolling::daily(&config.log_directory, "flashcards.log");
        let (non_blocking_file, guard) = tracing_appender::non_blocking(file_appender);
        let layer = fmt::layer()
            .with_target(true)
            .with_thread_ids(true)
            .with_file(true)
            .with_line_number(true)
            .with_ansi(false)
            .with_writer(non_blocking_file)
            .boxed();
        (Some(layer), Some(guard))
    } else {
        (None, None)
    };

    tracing_subscriber::registry()
        .with(env_filter)
        .with(console_layer)
        .with(file_layer)
        .init();

    info!(
        file_enabled = config.file_enabled,
        log_directory = %config.log_directory,
        "Logging initialized"
    );

    Ok(guard)
}
