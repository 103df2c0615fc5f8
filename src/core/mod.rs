pub mod course;
pub mod errors;
pub mod logging;
pub mod models;
pub mod repository;
pub mod validation;

pub use errors::LexyError;
pub use models::{
    AICharacter,
    AlphabetItem,
    AssetKind,
    BookRecommendation,
    Course,
    CultureAsset,
    CultureCategory,
    CultureEntry,
    CultureItem,
    DictionaryEntry,
    Exercise,
    ExerciseType,
    GrammarLesson,
    Lesson,
    LessonStatus,
    ProficiencyLevel,
    Unit,
};
pub use repository::{
    new_record_id,
    Record,
    Repository,
};
