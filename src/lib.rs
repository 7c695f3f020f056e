pub mod catalog;
pub mod config;
pub mod errors;
pub mod logging;
pub mod models;
pub mod runtime;
pub mod session;
pub mod speech;

pub use catalog::{BundledCatalogLoader, CatalogLoader};
pub use config::Config;
pub use errors::*;
pub use models::*;
pub use runtime::{spawn_session, SessionCommand, SessionHandle};
pub use session::{SessionController, SessionSettings, SessionSnapshot};
pub use speech::{SpeechOutput, TracingSpeech, Utterance};
