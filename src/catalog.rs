use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::time::Instant;
use tracing::debug;
use uuid::Uuid;

use crate::errors::{ErrorContext, LoadError};
use crate::models::{Category, Flashcard, FlashcardData, FlashcardResponse, Translations};
use crate::{log_service_start, log_service_success, log_service_warn};

pub const DEFAULT_RESOURCE_NAME: &str = "flashcards.json";

/// Source of the flashcard catalog
///
/// Injected into the session so tests can substitute a fake.
#[async_trait]
pub trait CatalogLoader: Send + Sync {
    async fn load(&self) -> Result<Vec<Flashcard>, LoadError>;
}

/// Loads the catalog from a JSON file shipped alongside the application
#[derive(Debug, Clone)]
pub struct BundledCatalogLoader {
    resource_dir: PathBuf,
    resource_name: String,
}

impl BundledCatalogLoader {
    pub fn new(resource_dir: impl Into<PathBuf>, resource_name: impl Into<String>) -> Self {
        Self {
            resource_dir: resource_dir.into(),
            resource_name: resource_name.into(),
        }
    }

    /// Loader for `flashcards.json` inside `resource_dir`
    pub fn in_dir(resource_dir: impl Into<PathBuf>) -> Self {
        Self::new(resource_dir, DEFAULT_RESOURCE_NAME)
    }

    pub fn resource_path(&self) -> PathBuf {
        self.resource_dir.join(&self.resource_name)
    }

    pub fn resource_dir(&self) -> &Path {
        &self.resource_dir
    }
}

#[async_trait]
impl CatalogLoader for BundledCatalogLoader {
    async fn load(&self) -> Result<Vec<Flashcard>, LoadError> {
        let path = self.resource_path();
        let started = Instant::now();
        log_service_start!("catalog", "load", resource = path.display());

        let bytes = match tokio::fs::read(&path).await {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let err = LoadError::not_found(&self.resource_name);
                err.log_with_context(&ErrorContext::new("load", &self.resource_name));
                return Err(err);
            }
            Err(e) => {
                let err = LoadError::io(&self.resource_name, e);
                err.log_with_context(&ErrorContext::new("load", &self.resource_name));
                return Err(err);
            }
        };

        let cards = parse_catalog(&self.resource_name, &bytes).inspect_err(|err| {
            err.log_with_context(&ErrorContext::new("decode", &self.resource_name));
        })?;

        if cards.is_empty() {
            log_service_warn!("catalog", "load", "catalog contains no flashcards");
        }
        log_service_success!(
            "catalog",
            "load",
            card_count = cards.len(),
            duration_ms = started.elapsed().as_millis() as u64
        );
        Ok(cards)
    }
}

/// Decode catalog bytes into flashcards
///
/// The whole file fails as one unit; there is no partial recovery of valid
/// records from a malformed file.
pub fn parse_catalog(resource_name: &str, bytes: &[u8]) -> Result<Vec<Flashcard>, LoadError> {
    let response: FlashcardResponse =
        serde_json::from_slice(bytes).map_err(|e| LoadError::decode(resource_name, e))?;

    Ok(response.flashcards.into_iter().map(into_flashcard).collect())
}

fn into_flashcard(data: FlashcardData) -> Flashcard {
    let id = Uuid::parse_str(&data.id).unwrap_or_else(|_| {
        debug!(raw_id = %data.id, "Unparseable flashcard id, generating a new one");
        Uuid::new_v4()
    });

    let category = Category::from_label(&data.category).unwrap_or_else(|| {
        debug!(
            raw_category = %data.category,
            fallback = %Category::FALLBACK,
            "Unknown flashcard category"
        );
        Category::FALLBACK
    });

    Flashcard {
        id,
        translations: Translations::from_raw(&data.translations),
        image_name: data.image_name,
        category,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::errors::LoadErrorKind;
    use crate::models::Language;

    const SAMPLE: &str = r#"{
        "flashcards": [
            {
                "id": "5f0c6a3e-8a63-4c1e-9d55-0c1f3b1c2a10",
                "imageName": "apple",
                "translations": {"en": "apple", "zh-CN": "苹果", "zh-HK": "蘋果"},
                "category": "Food and Drink"
            },
            {
                "id": "not-a-uuid",
                "imageName": "dog",
                "translations": {"en": "dog", "zh-CN": "狗"},
                "category": "Dinosaurs"
            }
        ]
    }"#;

    #[test]
    fn test_parse_catalog_maps_records() {
        let cards = parse_catalog("sample.json", SAMPLE.as_bytes()).unwrap();
        assert_eq!(cards.len(), 2);

        let apple = &cards[0];
        assert_eq!(
            apple.id,
            Uuid::parse_str("5f0c6a3e-8a63-4c1e-9d55-0c1f3b1c2a10").unwrap()
        );
        assert_eq!(apple.image_name, "apple");
        assert_eq!(apple.category, Category::FoodAndDrink);
        assert_eq!(apple.word(Language::Cantonese), "蘋果");
    }

    #[test]
    fn test_unknown_category_falls_back() {
        let cards = parse_catalog("sample.json", SAMPLE.as_bytes()).unwrap();
        assert_eq!(cards[1].category, Category::CommonNouns);
    }

    #[test]
    fn test_missing_translation_is_empty() {
        let cards = parse_catalog("sample.json", SAMPLE.as_bytes()).unwrap();
        assert_eq!(cards[1].word(Language::English), "dog");
        assert_eq!(cards[1].word(Language::Cantonese), "");
    }

    #[test]
    fn test_unparseable_id_gets_fresh_identity() {
        let first = parse_catalog("sample.json", SAMPLE.as_bytes()).unwrap();
        let second = parse_catalog("sample.json", SAMPLE.as_bytes()).unwrap();
        assert_eq!(first[0].id, second[0].id);
        assert_ne!(first[1].id, second[1].id);
    }

    #[test]
    fn test_missing_required_field_is_decode_error() {
        let json = r#"{"flashcards": [{"id": "1", "translations": {}, "category": "Colors"}]}"#;
        let err = parse_catalog("sample.json", json.as_bytes()).unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decode);
    }

    #[test]
    fn test_malformed_json_is_decode_error() {
        let err = parse_catalog("sample.json", b"{\"flashcards\": [").unwrap_err();
        assert_eq!(err.kind(), LoadErrorKind::Decode);
    }

    #[test]
    fn test_resource_path() {
        let loader = BundledCatalogLoader::in_dir("resources");
        assert_eq!(loader.resource_path(), PathBuf::from("resources/flashcards.json"));
        assert_eq!(loader.resource_dir(), Path::new("resources"));
    }
}
