use tracing::debug;

use super::{
    models::{
        Course,
        CultureEntry,
        Lesson,
        LessonStatus,
        ProficiencyLevel,
        Unit,
    },
    repository::{
        Record,
        Repository,
    },
    LexyError,
};

const DEFAULT_UNIT_COLOR: &str = "bg-[#ad46ff]";

impl Course {
    /// Applies the builder's "finish" step: basics must be filled in, the id follows the
    /// language, and an empty course gets a starter unit.
    pub fn finalize(&mut self) -> Result<(), LexyError> {
        self.validate()?;

        self.language = self.language.trim().to_string();
        self.id = self.language.clone();

        if self.units.is_empty() {
            let mut lessons = Repository::new();
            lessons.add(Lesson {
                id: "l1".to_string(),
                title: "Hello".to_string(),
                description: "Basic greetings".to_string(),
                exercises: Repository::new(),
                status: LessonStatus::Available,
            })?;

            self.units.add(Unit {
                id: "unit-init".to_string(),
                title: "Introduction".to_string(),
                color: DEFAULT_UNIT_COLOR.to_string(),
                lessons,
                level: None,
            })?;
        }

        Ok(())
    }

    /// Marks a lesson completed and unlocks the one after it in the same unit.
    pub fn complete_lesson(&mut self, lesson_id: &str) -> bool {
        for unit in self.units.iter_mut() {
            let Some(index) = unit.lessons.iter().position(|l| l.id == lesson_id) else {
                continue;
            };

            let mut lessons = unit.lessons.iter_mut().skip(index);
            if let Some(lesson) = lessons.next() {
                lesson.status = LessonStatus::Completed;
            }
            if let Some(next) = lessons.next() {
                if next.status == LessonStatus::Locked {
                    next.status = LessonStatus::Available;
                }
            }

            debug!("Completed lesson '{}' in unit '{}'", lesson_id, unit.id);
            return true;
        }

        false
    }

    /// Locks everything except the very first lesson of the course.
    pub fn reset_progress(&mut self) {
        for (unit_idx, unit) in self.units.iter_mut().enumerate() {
            for (lesson_idx, lesson) in unit.lessons.iter_mut().enumerate() {
                lesson.status = if unit_idx == 0 && lesson_idx == 0 {
                    LessonStatus::Available
                } else {
                    LessonStatus::Locked
                };
            }
        }
    }

    pub fn units_for_level(&self, level: ProficiencyLevel) -> Vec<&Unit> {
        self.units.iter().filter(|u| u.level.map_or(true, |l| l == level)).collect()
    }

    /// Level shown for the course in the language picker.
    pub fn display_level(&self) -> ProficiencyLevel {
        self.units.first().and_then(|u| u.level).unwrap_or_default()
    }

    pub fn culture_entries(&self) -> Vec<CultureEntry<'_>> {
        self.culture_items
            .iter()
            .map(CultureEntry::Item)
            .chain(self.books.iter().map(CultureEntry::Book))
            .collect()
    }
}
