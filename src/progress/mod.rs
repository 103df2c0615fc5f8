use std::{
    collections::BTreeMap,
    path::{
        Path,
        PathBuf,
    },
};

use chrono::{
    DateTime,
    Timelike,
    Utc,
};
use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    info,
};

use crate::{
    core::{
        Exercise,
        LexyError,
        ProficiencyLevel,
    },
    persistence::{
        get_data_file_path,
        load_json,
        save_json,
    },
};

pub const STATS_FILE: &str = "user_stats.json";
pub const MAX_HEARTS: u32 = 5;
pub const XP_PER_LEVEL: u32 = 1000;
pub const MISTAKE_HISTORY_LIMIT: usize = 20;

pub const ACHIEVEMENT_EARLY_BIRD: &str = "1";
pub const ACHIEVEMENT_XP_TITAN: &str = "2";
pub const ACHIEVEMENT_PERFECT_STREAK: &str = "3";

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Achievement {
    pub id: String,
    pub title: String,
    pub description: String,
    pub icon: String,
    pub requirement: u32,
    pub current_value: u32,
    pub unlocked: bool,
}

impl Achievement {
    fn new(id: &str, title: &str, description: &str, icon: &str, requirement: u32) -> Self {
        Self {
            id: id.to_string(),
            title: title.to_string(),
            description: description.to_string(),
            icon: icon.to_string(),
            requirement,
            current_value: 0,
            unlocked: false,
        }
    }

    fn progress_to(&mut self, value: u32) {
        self.current_value = value;
        self.unlocked = self.unlocked || value >= self.requirement;
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct UserStats {
    pub xp: u32,
    pub level: u32,
    pub proficiency_level: ProficiencyLevel,
    pub streak: u32,
    pub hearts: u32,
    pub gems: u32,
    pub last_active_date: Option<DateTime<Utc>>,
    pub achievements: Vec<Achievement>,
    pub failed_exercises: Vec<Exercise>,
    pub saved_word_ids: BTreeMap<String, Vec<String>>, // language -> word ids
    pub current_course_id: String,
    pub lessons_completed: u32,
    pub perfect_lessons: u32,
}

impl Default for UserStats {
    fn default() -> Self {
        Self {
            xp: 0,
            level: 1,
            proficiency_level: ProficiencyLevel::default(),
            streak: 0,
            hearts: MAX_HEARTS,
            gems: 100,
            last_active_date: None,
            achievements: vec![
                Achievement::new(ACHIEVEMENT_EARLY_BIRD, "Early Bird", "Complete a lesson before 9AM", "☀️", 1),
                Achievement::new(ACHIEVEMENT_XP_TITAN, "XP Titan", "Reach 1000 Total XP", "⚡", 1000),
                Achievement::new(ACHIEVEMENT_PERFECT_STREAK, "Perfect Streak", "Reach a 7-day streak", "🔥", 7),
            ],
            failed_exercises: Vec::new(),
            saved_word_ids: BTreeMap::new(),
            current_course_id: String::new(),
            lessons_completed: 0,
            perfect_lessons: 0,
        }
    }
}

impl UserStats {
    fn achievement_mut(&mut self, id: &str) -> Option<&mut Achievement> {
        self.achievements.iter_mut().find(|a| a.id == id)
    }

    pub fn is_word_saved(&self, language: &str, word_id: &str) -> bool {
        self.saved_word_ids.get(language).map_or(false, |ids| ids.iter().any(|id| id == word_id))
    }

    fn touch_streak(&mut self, now: DateTime<Utc>) {
        let today = now.date_naive();
        self.streak = match self.last_active_date.map(|d| d.date_naive()) {
            Some(last) if last == today => self.streak.max(1),
            Some(last) if last.succ_opt() == Some(today) => self.streak.saturating_add(1),
            _ => 1,
        };
        self.last_active_date = Some(now);
    }
}

/// Learner progress loaded once and written back on every change.
#[derive(Debug)]
pub struct ProgressStore {
    stats: UserStats,
    file_path: PathBuf,
}

impl ProgressStore {
    pub fn open(file_path: &Path) -> Result<Self, LexyError> {
        let exists = file_path.exists();
        let stats: UserStats = load_json(file_path)?;
        let store = Self { stats, file_path: file_path.to_path_buf() };
        if !exists {
            store.save()?;
        }
        Ok(store)
    }

    pub fn open_default() -> Result<Self, LexyError> {
        Self::open(&get_data_file_path(STATS_FILE))
    }

    pub fn stats(&self) -> &UserStats {
        &self.stats
    }

    fn save(&self) -> Result<(), LexyError> {
        save_json(&self.stats, &self.file_path)
    }

    /// Applies `change` and writes the result immediately. If the write fails the
    /// in-memory stats stay as they were.
    pub fn update<T, F>(&mut self, change: F) -> Result<T, LexyError>
    where
        F: FnOnce(&mut UserStats) -> T,
    {
        let mut stats = self.stats.clone();
        let result = change(&mut stats);
        save_json(&stats, &self.file_path)?;
        self.stats = stats;
        Ok(result)
    }

    pub fn record_lesson(&mut self, xp_gained: u32, mistakes: Vec<Exercise>) -> Result<(), LexyError> {
        self.record_lesson_at(xp_gained, mistakes, Utc::now())
    }

    pub fn record_lesson_at(
        &mut self,
        xp_gained: u32,
        mistakes: Vec<Exercise>,
        now: DateTime<Utc>,
    ) -> Result<(), LexyError> {
        self.update(|stats| {
            stats.xp = stats.xp.saturating_add(xp_gained);
            stats.level = stats.xp / XP_PER_LEVEL + 1;
            stats.lessons_completed = stats.lessons_completed.saturating_add(1);
            if mistakes.is_empty() {
                stats.perfect_lessons = stats.perfect_lessons.saturating_add(1);
            }

            stats.failed_exercises.extend(mistakes);
            let overflow = stats.failed_exercises.len().saturating_sub(MISTAKE_HISTORY_LIMIT);
            stats.failed_exercises.drain(..overflow);

            stats.touch_streak(now);

            let xp = stats.xp;
            let streak = stats.streak;
            if let Some(a) = stats.achievement_mut(ACHIEVEMENT_XP_TITAN) {
                a.progress_to(xp);
            }
            if let Some(a) = stats.achievement_mut(ACHIEVEMENT_PERFECT_STREAK) {
                a.progress_to(streak);
            }
            if now.hour() < 9 {
                if let Some(a) = stats.achievement_mut(ACHIEVEMENT_EARLY_BIRD) {
                    a.progress_to(a.current_value.saturating_add(1));
                }
            }

            debug!("Lesson recorded: +{} xp, level {}, streak {}", xp_gained, stats.level, stats.streak);
        })
    }

    /// Returns the hearts left.
    pub fn lose_heart(&mut self) -> Result<u32, LexyError> {
        self.update(|stats| {
            stats.hearts = stats.hearts.saturating_sub(1);
            stats.hearts
        })
    }

    pub fn refill_hearts(&mut self) -> Result<(), LexyError> {
        self.update(|stats| stats.hearts = MAX_HEARTS)
    }

    pub fn set_proficiency(&mut self, level: ProficiencyLevel) -> Result<(), LexyError> {
        self.update(|stats| stats.proficiency_level = level)
    }

    pub fn set_current_course(&mut self, course_id: &str) -> Result<(), LexyError> {
        self.update(|stats| stats.current_course_id = course_id.to_string())
    }

    /// Returns whether the word is saved after the toggle.
    pub fn toggle_saved_word(&mut self, language: &str, word_id: &str) -> Result<bool, LexyError> {
        self.update(|stats| {
            let ids = stats.saved_word_ids.entry(language.to_string()).or_default();
            if let Some(pos) = ids.iter().position(|id| id == word_id) {
                ids.remove(pos);
                false
            } else {
                ids.push(word_id.to_string());
                true
            }
        })
    }

    /// Moves progress keyed by a course id over to its new id.
    pub fn rename_course(&mut self, old_id: &str, new_id: &str) -> Result<(), LexyError> {
        if old_id == new_id {
            return Ok(());
        }
        self.update(|stats| {
            if let Some(ids) = stats.saved_word_ids.remove(old_id) {
                let target = stats.saved_word_ids.entry(new_id.to_string()).or_default();
                for id in ids {
                    if !target.contains(&id) {
                        target.push(id);
                    }
                }
            }
            if stats.current_course_id == old_id {
                stats.current_course_id = new_id.to_string();
            }
        })?;
        info!("Migrated progress from '{}' to '{}'", old_id, new_id);
        Ok(())
    }

    pub fn reset(&mut self) -> Result<(), LexyError> {
        self.update(|stats| *stats = UserStats::default())?;
        info!("Progress reset");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use chrono::TimeZone;
    use tempfile::TempDir;

    use super::*;
    use crate::core::ExerciseType;

    fn mistake(id: &str) -> Exercise {
        Exercise {
            id: id.to_string(),
            exercise_type: ExerciseType::TextTranslate,
            question: "Translate: hello".to_string(),
            options: None,
            answer: "hola".to_string(),
            media_path: None,
            explanation: None,
            word_bank: None,
        }
    }

    fn at(day: u32, hour: u32) -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2024, 5, day, hour, 0, 0).unwrap()
    }

    #[test]
    fn test_open_writes_initial_stats() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATS_FILE);

        let store = ProgressStore::open(&path).unwrap();
        assert!(path.exists());
        assert_eq!(store.stats(), &UserStats::default());
        assert_eq!(store.stats().hearts, MAX_HEARTS);
        assert_eq!(store.stats().achievements.len(), 3);
    }

    #[test]
    fn test_every_change_is_written() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join(STATS_FILE);

        let mut store = ProgressStore::open(&path).unwrap();
        assert_eq!(store.lose_heart().unwrap(), 4);
        assert!(store.toggle_saved_word("Spanish", "w1").unwrap());
        store.set_proficiency(ProficiencyLevel::new(3).unwrap()).unwrap();

        let reopened = ProgressStore::open(&path).unwrap();
        assert_eq!(reopened.stats().hearts, 4);
        assert!(reopened.stats().is_word_saved("Spanish", "w1"));
        assert_eq!(reopened.stats().proficiency_level.value(), 3);
    }

    #[test]
    fn test_record_lesson_levels_and_trims_mistakes() {
        let dir = TempDir::new().unwrap();
        let mut store = ProgressStore::open(&dir.path().join(STATS_FILE)).unwrap();

        store.record_lesson_at(600, vec![mistake("m0")], at(1, 12)).unwrap();
        assert_eq!(store.stats().level, 1);
        assert_eq!(store.stats().perfect_lessons, 0);

        let many: Vec<Exercise> = (1..=25).map(|i| mistake(&format!("m{}", i))).collect();
        store.record_lesson_at(500, many, at(1, 13)).unwrap();

        let stats = store.stats();
        assert_eq!(stats.xp, 1100);
        assert_eq!(stats.level, 2);
        assert_eq!(stats.failed_exercises.len(), MISTAKE_HISTORY_LIMIT);
        assert_eq!(stats.failed_exercises.first().unwrap().id, "m6");
        assert_eq!(stats.failed_exercises.last().unwrap().id, "m25");

        let titan = stats.achievements.iter().find(|a| a.id == ACHIEVEMENT_XP_TITAN).unwrap();
        assert!(titan.unlocked);
        assert_eq!(titan.current_value, 1100);
    }

    #[test]
    fn test_streak_follows_consecutive_days() {
        let dir = TempDir::new().unwrap();
        let mut store = ProgressStore::open(&dir.path().join(STATS_FILE)).unwrap();

        store.record_lesson_at(10, vec![], at(1, 8)).unwrap();
        store.record_lesson_at(10, vec![], at(1, 20)).unwrap();
        assert_eq!(store.stats().streak, 1);

        store.record_lesson_at(10, vec![], at(2, 20)).unwrap();
        assert_eq!(store.stats().streak, 2);

        store.record_lesson_at(10, vec![], at(5, 20)).unwrap();
        assert_eq!(store.stats().streak, 1);

        let early = store.stats().achievements.iter().find(|a| a.id == ACHIEVEMENT_EARLY_BIRD).unwrap();
        assert!(early.unlocked);
    }

    #[test]
    fn test_xp_saturates_instead_of_overflowing() {
        let dir = TempDir::new().unwrap();
        let mut store = ProgressStore::open(&dir.path().join(STATS_FILE)).unwrap();

        store.record_lesson_at(u32::MAX - 5, vec![], at(1, 12)).unwrap();
        store.record_lesson_at(100, vec![], at(1, 13)).unwrap();

        assert_eq!(store.stats().xp, u32::MAX);
        assert_eq!(store.stats().level, u32::MAX / XP_PER_LEVEL + 1);
        assert_eq!(store.stats().lessons_completed, 2);
    }

    #[test]
    fn test_failed_write_keeps_previous_stats() {
        let dir = TempDir::new().unwrap();
        let sub = dir.path().join("sub");
        let mut store = ProgressStore::open(&sub.join(STATS_FILE)).unwrap();
        store.record_lesson_at(50, vec![], at(1, 12)).unwrap();
        let before = store.stats().clone();

        std::fs::remove_dir_all(&sub).unwrap();
        std::fs::write(&sub, "not a directory").unwrap();

        assert!(store.record_lesson_at(70, vec![mistake("m1")], at(2, 12)).is_err());
        assert!(store.lose_heart().is_err());
        assert_eq!(store.stats(), &before);
    }

    #[test]
    fn test_rename_course_migrates_saved_words() {
        let dir = TempDir::new().unwrap();
        let mut store = ProgressStore::open(&dir.path().join(STATS_FILE)).unwrap();
        store.set_current_course("Spanish").unwrap();
        store.toggle_saved_word("Spanish", "w1").unwrap();
        store.toggle_saved_word("Spanish", "w2").unwrap();

        store.rename_course("Spanish", "Castilian").unwrap();

        let stats = store.stats();
        assert_eq!(stats.current_course_id, "Castilian");
        assert!(!stats.saved_word_ids.contains_key("Spanish"));
        assert_eq!(stats.saved_word_ids["Castilian"], vec!["w1", "w2"]);

        store.reset().unwrap();
        assert_eq!(store.stats(), &UserStats::default());
    }
}
