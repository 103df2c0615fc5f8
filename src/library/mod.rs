use std::path::{
    Path,
    PathBuf,
};

use tracing::{
    info,
    warn,
};

use crate::{
    core::{
        Course,
        LexyError,
        Repository,
    },
    package::{
        export_course,
        export_to_dir,
        load_package_bytes,
        ExportOptions,
        ImportedPackage,
    },
    persistence::{
        get_data_file_path,
        load_json,
        save_json,
    },
};

pub const LIBRARY_FILE: &str = "courses.json";

/// Asked before an import replaces a course that already exists.
pub trait OverwriteConfirmation {
    fn confirm_overwrite(&mut self, existing: &Course, incoming: &Course) -> bool;
}

impl<F> OverwriteConfirmation for F
where
    F: FnMut(&Course, &Course) -> bool,
{
    fn confirm_overwrite(&mut self, existing: &Course, incoming: &Course) -> bool {
        self(existing, incoming)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ImportOutcome {
    Added(String),
    Replaced(String),
    /// The user declined to overwrite; the library is unchanged.
    Cancelled(String),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SaveOutcome {
    pub id: String,
    /// Set when saving moved the course to a new id (its language was renamed).
    pub renamed_from: Option<String>,
}

#[derive(Debug, Default)]
pub struct CourseLibrary {
    courses: Repository<Course>,
    file_path: Option<PathBuf>,
}

impl CourseLibrary {
    /// A library that is never written to disk.
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn from_courses(courses: Vec<Course>) -> Result<Self, LexyError> {
        Ok(Self { courses: Repository::from_items(courses)?, file_path: None })
    }

    pub fn open(file_path: &Path) -> Result<Self, LexyError> {
        let courses: Repository<Course> = load_json(file_path)?;
        info!("Opened course library with {} courses", courses.len());
        Ok(Self { courses, file_path: Some(file_path.to_path_buf()) })
    }

    pub fn open_default() -> Result<Self, LexyError> {
        Self::open(&get_data_file_path(LIBRARY_FILE))
    }

    /// Applies `change` to a copy of the courses and keeps it only once it has been written.
    fn commit<T, F>(&mut self, change: F) -> Result<T, LexyError>
    where
        F: FnOnce(&mut Repository<Course>) -> Result<T, LexyError>,
    {
        let mut courses = self.courses.clone();
        let result = change(&mut courses)?;
        if let Some(path) = &self.file_path {
            save_json(&courses, path)?;
        }
        self.courses = courses;
        Ok(result)
    }

    pub fn get(&self, id: &str) -> Option<&Course> {
        self.courses.get(id)
    }

    pub fn courses(&self) -> &[Course] {
        self.courses.as_slice()
    }

    pub fn ids(&self) -> Vec<&str> {
        self.courses.ids()
    }

    pub fn len(&self) -> usize {
        self.courses.len()
    }

    pub fn is_empty(&self) -> bool {
        self.courses.is_empty()
    }

    /// Adds a course that must not exist yet.
    pub fn add_course(&mut self, course: Course) -> Result<(), LexyError> {
        if self.courses.contains(&course.id) {
            return Err(LexyError::Conflict(course.id));
        }
        self.commit(|courses| courses.add(course))
    }

    /// Stores a course coming out of the builder. `original_id` is the id the course had
    /// when editing started; if the language changed, the old entry is dropped.
    pub fn save_course(&mut self, mut course: Course, original_id: Option<&str>) -> Result<SaveOutcome, LexyError> {
        course.finalize()?;
        let id = course.id.clone();

        let renamed_from = self.commit(|courses| match original_id {
            Some(old_id) if old_id != id && courses.contains(old_id) => {
                if courses.contains(&id) {
                    return Err(LexyError::Conflict(id.clone()));
                }
                courses.update(old_id, course)?;
                Ok(Some(old_id.to_string()))
            }
            _ => {
                if courses.contains(&id) {
                    courses.update(&id, course)?;
                } else {
                    courses.add(course)?;
                }
                Ok(None)
            }
        })?;

        if let Some(old_id) = &renamed_from {
            warn!("Course '{}' renamed to '{}'", old_id, id);
        }
        Ok(SaveOutcome { id, renamed_from })
    }

    pub fn remove_course(&mut self, id: &str) -> Result<Course, LexyError> {
        self.commit(|courses| courses.remove(id))
    }

    /// Imports a package, asking `confirm` before replacing an existing course with the
    /// same id. Loading happens before anything is changed, so errors and cancellations
    /// leave the library as it was.
    pub fn import_package<C: OverwriteConfirmation>(
        &mut self,
        bytes: &[u8],
        mut confirm: C,
    ) -> Result<ImportOutcome, LexyError> {
        let ImportedPackage { course, .. } = load_package_bytes(bytes)?;
        let id = course.id.clone();

        let replacing = match self.courses.get(&id) {
            Some(existing) => {
                if !confirm.confirm_overwrite(existing, &course) {
                    info!("Import of '{}' cancelled, existing course kept", id);
                    return Ok(ImportOutcome::Cancelled(id));
                }
                true
            }
            None => false,
        };

        let outcome = self.commit(|courses| {
            if replacing {
                courses.update(&id, course)?;
                Ok(ImportOutcome::Replaced(id.clone()))
            } else {
                courses.add(course)?;
                Ok(ImportOutcome::Added(id.clone()))
            }
        })?;

        info!("Import finished: {:?}", outcome);
        Ok(outcome)
    }

    pub fn import_file<C: OverwriteConfirmation>(
        &mut self,
        path: &Path,
        confirm: C,
    ) -> Result<ImportOutcome, LexyError> {
        let bytes = std::fs::read(path)?;
        self.import_package(&bytes, confirm)
    }

    pub fn export_course(&self, id: &str, options: &ExportOptions) -> Result<Vec<u8>, LexyError> {
        let course = self.get(id).ok_or_else(|| LexyError::NotFound(id.to_string()))?;
        export_course(course, options)
    }

    pub fn export_course_to_dir(
        &self,
        id: &str,
        options: &ExportOptions,
        output_dir: &Path,
    ) -> Result<PathBuf, LexyError> {
        let course = self.get(id).ok_or_else(|| LexyError::NotFound(id.to_string()))?;
        export_to_dir(course, options, output_dir)
    }
}

#[cfg(test)]
mod tests {
    use tempfile::TempDir;

    use super::*;
    use crate::core::DictionaryEntry;

    fn course(language: &str, word: &str) -> Course {
        let mut course = Course::new(format!("{} course", language), language);
        course.dictionary.add(DictionaryEntry::new("w1", word, "translation")).unwrap();
        course.finalize().unwrap();
        course
    }

    #[test]
    fn test_save_course_handles_language_rename() {
        let mut library = CourseLibrary::in_memory();
        let outcome = library.save_course(course("Spanish", "Hola"), None).unwrap();
        assert_eq!(outcome, SaveOutcome { id: "Spanish".to_string(), renamed_from: None });

        let mut edited = library.get("Spanish").unwrap().clone();
        edited.language = "Catalan".to_string();
        let outcome = library.save_course(edited, Some("Spanish")).unwrap();

        assert_eq!(outcome.id, "Catalan");
        assert_eq!(outcome.renamed_from.as_deref(), Some("Spanish"));
        assert_eq!(library.ids(), vec!["Catalan"]);
    }

    #[test]
    fn test_rename_onto_existing_course_is_a_conflict() {
        let mut library = CourseLibrary::in_memory();
        library.save_course(course("Spanish", "Hola"), None).unwrap();
        library.save_course(course("French", "Bonjour"), None).unwrap();

        let mut edited = library.get("Spanish").unwrap().clone();
        edited.language = "French".to_string();
        let err = library.save_course(edited, Some("Spanish")).unwrap_err();

        assert!(matches!(err, LexyError::Conflict(id) if id == "French"));
        assert_eq!(library.get("French").unwrap().dictionary.get("w1").unwrap().word, "Bonjour");
        assert!(library.get("Spanish").is_some());
    }

    #[test]
    fn test_add_course_rejects_existing_id() {
        let mut library = CourseLibrary::in_memory();
        library.add_course(course("Korean", "안녕")).unwrap();
        assert!(matches!(library.add_course(course("Korean", "네")), Err(LexyError::Conflict(_))));
        assert_eq!(library.len(), 1);
    }

    /// Opens a library whose directory is then replaced by a plain file, so every write fails.
    fn unwritable_library(dir: &TempDir) -> CourseLibrary {
        let sub = dir.path().join("sub");
        let mut library = CourseLibrary::open(&sub.join(LIBRARY_FILE)).unwrap();
        library.save_course(course("Italian", "Ciao"), None).unwrap();

        std::fs::remove_dir_all(&sub).unwrap();
        std::fs::write(&sub, "not a directory").unwrap();
        library
    }

    #[test]
    fn test_failed_write_leaves_library_unchanged() {
        let dir = TempDir::new().unwrap();
        let mut library = unwritable_library(&dir);
        let before = library.courses().to_vec();

        let bytes = export_course(&course("Spanish", "Hola"), &ExportOptions::default()).unwrap();
        assert!(library.import_package(&bytes, |_: &Course, _: &Course| true).is_err());
        assert!(library.add_course(course("Korean", "안녕")).is_err());
        assert!(library.remove_course("Italian").is_err());

        let mut edited = library.get("Italian").unwrap().clone();
        edited.language = "Sicilian".to_string();
        assert!(library.save_course(edited, Some("Italian")).is_err());

        assert_eq!(library.courses(), before.as_slice());
        assert_eq!(library.ids(), vec!["Italian"]);
    }

    #[test]
    fn test_library_persists_between_opens() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(LIBRARY_FILE);

        let mut library = CourseLibrary::open(&path).unwrap();
        assert!(library.is_empty());
        library.save_course(course("Italian", "Ciao"), None).unwrap();

        let reopened = CourseLibrary::open(&path).unwrap();
        assert_eq!(reopened.ids(), vec!["Italian"]);
        assert_eq!(reopened.get("Italian"), library.get("Italian"));

        let mut reopened = reopened;
        reopened.remove_course("Italian").unwrap();
        assert!(CourseLibrary::open(&path).unwrap().is_empty());
    }
}
