use std::fmt;

use serde::{
    Deserialize,
    Serialize,
};

use super::{
    repository::Repository,
    LexyError,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct ProficiencyLevel(u8);

impl ProficiencyLevel {
    pub const MIN: u8 = 1;
    pub const MAX: u8 = 6;

    pub fn new(level: u8) -> Result<Self, LexyError> {
        if (Self::MIN..=Self::MAX).contains(&level) {
            Ok(ProficiencyLevel(level))
        } else {
            Err(LexyError::Validation(format!(
                "Proficiency level must be between {} and {}, got {}",
                Self::MIN,
                Self::MAX,
                level
            )))
        }
    }

    pub fn value(&self) -> u8 {
        self.0
    }

    pub fn name(&self) -> &'static str {
        match self.0 {
            1 => "Beginner",
            2 => "Survival",
            3 => "Functional",
            4 => "Professional",
            5 => "Fluent",
            _ => "Native-like",
        }
    }
}

impl Default for ProficiencyLevel {
    fn default() -> Self {
        ProficiencyLevel(Self::MIN)
    }
}

impl TryFrom<u8> for ProficiencyLevel {
    type Error = LexyError;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        ProficiencyLevel::new(value)
    }
}

impl From<ProficiencyLevel> for u8 {
    fn from(level: ProficiencyLevel) -> Self {
        level.0
    }
}

impl fmt::Display for ProficiencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name(), self.0)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum ExerciseType {
    MultipleChoice,
    AudioMatch,
    VideoLesson,
    TextTranslate,
    WordSort,
    SpeechCheck,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Exercise {
    pub id: String,
    #[serde(rename = "type")]
    pub exercise_type: ExerciseType,
    pub question: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub options: Option<Vec<String>>,
    pub answer: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_path: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub explanation: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub word_bank: Option<Vec<String>>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LessonStatus {
    #[default]
    Locked,
    Available,
    Completed,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lesson {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub exercises: Repository<Exercise>,
    #[serde(default)]
    pub status: LessonStatus,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub id: String,
    pub title: String,
    #[serde(default)]
    pub color: String,
    #[serde(default)]
    pub lessons: Repository<Lesson>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub level: Option<ProficiencyLevel>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AlphabetItem {
    pub id: String,
    pub character: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub phonetic: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub audio_url: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DictionaryEntry {
    pub id: String,
    pub word: String,
    pub translation: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub definition: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub example: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub is_phrase: Option<bool>,
}

impl DictionaryEntry {
    pub fn new(id: impl Into<String>, word: impl Into<String>, translation: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            word: word.into(),
            translation: translation.into(),
            definition: None,
            example: None,
            is_phrase: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GrammarLesson {
    pub id: String,
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub examples: Vec<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct BookRecommendation {
    pub id: String,
    pub title: String,
    pub author: String,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub image_url: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buy_url: Option<String>,
    #[serde(default)]
    pub level: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CultureCategory {
    #[serde(rename = "Famous people")]
    FamousPeople,
    #[serde(rename = "Art & Masterpieces")]
    ArtAndMasterpieces,
    #[serde(rename = "Books")]
    Books,
    #[serde(rename = "Movies & TV series")]
    MoviesAndTvSeries,
    #[serde(rename = "Music & Artists")]
    MusicAndArtists,
    #[serde(rename = "Folklore & Traditions")]
    FolkloreAndTraditions,
    #[serde(rename = "Icons & Landmarks")]
    IconsAndLandmarks,
    #[serde(rename = "Religion & Beliefs")]
    ReligionAndBeliefs,
    #[serde(rename = "Festivals")]
    Festivals,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetKind {
    Video,
    Audio,
    Pdf,
    Image,
    Youtube,
    Link,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CultureAsset {
    #[serde(rename = "type")]
    pub kind: AssetKind,
    pub value: String, // URL, package-relative path or data URL
    pub name: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CultureItem {
    pub id: String,
    pub title: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub subtitle: Option<String>,
    pub category: CultureCategory,
    pub description: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub assets: Option<Vec<CultureAsset>>,
    #[serde(default)]
    pub thumbnail_url: String,
    #[serde(rename = "type", default, skip_serializing_if = "Option::is_none")]
    pub media_type: Option<AssetKind>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub media_url: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub platform: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AICharacter {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub avatar: String,
    pub role: String,
    #[serde(default)]
    pub description: String,
    pub personality: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: String,
    pub course_title: String,
    pub language: String,
    #[serde(default)]
    pub units: Repository<Unit>,
    #[serde(default)]
    pub alphabet: Repository<AlphabetItem>,
    #[serde(default)]
    pub dictionary: Repository<DictionaryEntry>,
    #[serde(default)]
    pub grammar: Repository<GrammarLesson>,
    #[serde(default)]
    pub books: Repository<BookRecommendation>,
    #[serde(default)]
    pub culture_items: Repository<CultureItem>,
    #[serde(default)]
    pub ai_characters: Repository<AICharacter>,
}

impl Course {
    /// Blank course as the builder starts it; the id is assigned from the language on finalize.
    pub fn new(course_title: impl Into<String>, language: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            course_title: course_title.into(),
            language: language.into(),
            units: Repository::default(),
            alphabet: Repository::default(),
            dictionary: Repository::default(),
            grammar: Repository::default(),
            books: Repository::default(),
            culture_items: Repository::default(),
            ai_characters: Repository::default(),
        }
    }
}

/// A card in the culture feed. Books and culture items share the view but not the shape.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum CultureEntry<'a> {
    Book(&'a BookRecommendation),
    Item(&'a CultureItem),
}

impl<'a> CultureEntry<'a> {
    pub fn id(&self) -> &'a str {
        match self {
            CultureEntry::Book(book) => &book.id,
            CultureEntry::Item(item) => &item.id,
        }
    }

    pub fn title(&self) -> &'a str {
        match self {
            CultureEntry::Book(book) => &book.title,
            CultureEntry::Item(item) => &item.title,
        }
    }

    pub fn byline(&self) -> Option<String> {
        match self {
            CultureEntry::Book(book) => Some(format!("by {}", book.author)),
            CultureEntry::Item(item) => item.subtitle.clone(),
        }
    }

    pub fn image(&self) -> &'a str {
        match self {
            CultureEntry::Book(book) => &book.image_url,
            CultureEntry::Item(item) => &item.thumbnail_url,
        }
    }
}
