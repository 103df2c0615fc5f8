use std::path::PathBuf;

use serde::{
    Deserialize,
    Serialize,
};

use crate::{
    charset::CharacterFilter,
    core::LexyError,
    package::{
        export::DEFAULT_AUTHOR,
        ExportOptions,
    },
    persistence::{
        get_data_file_path,
        load_json_or_default,
        save_json,
    },
};

pub const SETTINGS_FILE: &str = "settings.json";
pub const DEFAULT_CHARACTER_LIMIT: usize = 500;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SettingsData {
    pub author: String,
    pub pretty_json: bool,
    pub extended_export: bool,
    pub character_limit: usize,
    pub character_filter: CharacterFilter,
}

impl Default for SettingsData {
    fn default() -> Self {
        Self {
            author: DEFAULT_AUTHOR.to_string(),
            pretty_json: true,
            extended_export: true,
            character_limit: DEFAULT_CHARACTER_LIMIT,
            character_filter: CharacterFilter::default(),
        }
    }
}

impl SettingsData {
    pub fn file_path() -> PathBuf {
        get_data_file_path(SETTINGS_FILE)
    }

    pub fn load() -> Self {
        load_json_or_default(&Self::file_path())
    }

    pub fn save(&self) -> Result<(), LexyError> {
        save_json(self, &Self::file_path())
    }

    pub fn export_options(&self) -> ExportOptions {
        ExportOptions {
            author: self.author.clone(),
            extended: self.extended_export,
            pretty_json: self.pretty_json,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_partial_settings_fill_in_defaults() {
        let settings: SettingsData =
            serde_json::from_str(r#"{"author": "Profe Ana", "character_filter": "letters-and-marks"}"#)
                .unwrap();

        assert_eq!(settings.author, "Profe Ana");
        assert_eq!(settings.character_filter, CharacterFilter::LettersAndMarks);
        assert_eq!(settings.character_limit, DEFAULT_CHARACTER_LIMIT);

        let options = settings.export_options();
        assert_eq!(options.author, "Profe Ana");
        assert!(options.extended);
    }
}
