use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use uuid::Uuid;

/// Languages a flashcard word is shown and spoken in
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Language {
    English,
    Mandarin,
    Cantonese,
}

impl Language {
    /// Order of the speak buttons under a card
    pub const ALL: [Language; 3] = [Language::English, Language::Mandarin, Language::Cantonese];

    /// Locale tag handed to the speech backend and used as the raw data key
    pub fn tag(self) -> &'static str {
        match self {
            Language::English => "en",
            Language::Mandarin => "zh-CN",
            Language::Cantonese => "zh-HK",
        }
    }

    pub fn flag(self) -> &'static str {
        match self {
            Language::English => "🇺🇸",
            Language::Mandarin => "🇨🇳",
            Language::Cantonese => "🇭🇰",
        }
    }
}

/// Topic categories, declared in menu order
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum Category {
    CommonNouns,
    People,
    BodyParts,
    Animals,
    #[default]
    FoodAndDrink,
    Clothing,
    ToysAndPlay,
    Colors,
    Numbers,
    Shapes,
    Transportation,
    Actions,
    DescriptiveWords,
    Prepositions,
    Pronouns,
    QuestionWords,
}

impl Category {
    pub const ALL: [Category; 16] = [
        Category::CommonNouns,
        Category::People,
        Category::BodyParts,
        Category::Animals,
        Category::FoodAndDrink,
        Category::Clothing,
        Category::ToysAndPlay,
        Category::Colors,
        Category::Numbers,
        Category::Shapes,
        Category::Transportation,
        Category::Actions,
        Category::DescriptiveWords,
        Category::Prepositions,
        Category::Pronouns,
        Category::QuestionWords,
    ];

    /// Category assigned to records whose tag is not recognised
    pub const FALLBACK: Category = Category::CommonNouns;

    /// Display label; also the tag used in the catalog file
    pub fn label(self) -> &'static str {
        match self {
            Category::CommonNouns => "Common Nouns",
            Category::People => "People",
            Category::BodyParts => "Body Parts",
            Category::Animals => "Animals",
            Category::FoodAndDrink => "Food and Drink",
            Category::Clothing => "Clothing",
            Category::ToysAndPlay => "Toys and Play",
            Category::Colors => "Colors",
            Category::Numbers => "Numbers",
            Category::Shapes => "Shapes",
            Category::Transportation => "Transportation",
            Category::Actions => "Actions",
            Category::DescriptiveWords => "Descriptive Words",
            Category::Prepositions => "Prepositions",
            Category::Pronouns => "Pronouns",
            Category::QuestionWords => "Question Words",
        }
    }

    /// Symbol name of the menu icon
    pub fn icon(self) -> &'static str {
        match self {
            Category::CommonNouns => "textformat",
            Category::People => "person.2",
            Category::BodyParts => "figure.stand",
            Category::Animals => "pawprint",
            Category::FoodAndDrink => "fork.knife",
            Category::Clothing => "tshirt",
            Category::ToysAndPlay => "gamecontroller",
            Category::Colors => "paintpalette",
            Category::Numbers => "number",
            Category::Shapes => "square.on.circle",
            Category::Transportation => "car",
            Category::Actions => "figure.walk",
            Category::DescriptiveWords => "text.bubble",
            Category::Prepositions => "arrow.up.right",
            Category::Pronouns => "person.text.rectangle",
            Category::QuestionWords => "questionmark.circle",
        }
    }

    /// Exact, case-sensitive lookup by catalog tag
    pub fn from_label(label: &str) -> Option<Category> {
        Category::ALL.into_iter().find(|c| c.label() == label)
    }
}

impl std::fmt::Display for Category {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

/// The word for one card in each supported language
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Translations {
    pub english: String,
    pub mandarin: String,
    pub cantonese: String,
}

impl Translations {
    /// Picks the three known locale keys out of a raw map, defaulting to ""
    pub fn from_raw(raw: &HashMap<String, String>) -> Self {
        let lookup = |language: Language| raw.get(language.tag()).cloned().unwrap_or_default();
        Self {
            english: lookup(Language::English),
            mandarin: lookup(Language::Mandarin),
            cantonese: lookup(Language::Cantonese),
        }
    }

    pub fn get(&self, language: Language) -> &str {
        match language {
            Language::English => &self.english,
            Language::Mandarin => &self.mandarin,
            Language::Cantonese => &self.cantonese,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Flashcard {
    pub id: Uuid,
    pub image_name: String,
    pub translations: Translations,
    pub category: Category,
}

impl Flashcard {
    pub fn word(&self, language: Language) -> &str {
        self.translations.get(language)
    }
}

/// On-disk envelope of the bundled catalog file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FlashcardResponse {
    pub flashcards: Vec<FlashcardData>,
}

/// A catalog record as written in the data file
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct FlashcardData {
    pub id: String,
    pub image_name: String,
    pub translations: HashMap<String, String>,
    pub category: String,
}
