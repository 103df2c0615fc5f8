pub mod charset;
pub mod core;
pub mod library;
pub mod package;
pub mod persistence;
pub mod progress;
pub mod settings;

pub use charset::{
    CharacterFilter,
    CharsetJob,
    CharsetRequest,
    CharsetUpdate,
};
pub use crate::core::{
    Course,
    LexyError,
};
pub use library::{
    CourseLibrary,
    ImportOutcome,
    OverwriteConfirmation,
};
pub use package::{
    export_course,
    load_package,
    ExportOptions,
    ImportedPackage,
};
pub use progress::ProgressStore;
pub use settings::SettingsData;
