use std::collections::BTreeMap;

use serde::{
    Deserialize,
    Serialize,
};

pub const PACKAGE_FORMAT: &str = "lexy-package";
pub const PACKAGE_VERSION: u32 = 1;
pub const MANIFEST_PATH: &str = "manifest.json";
pub const ASSET_DIR: &str = "assets/";

/// The JSON documents a package can carry under `data/`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DataFile {
    Dictionary,
    Grammar,
    Culture,
    Units,
    AiChats,
    Alphabet,
    Books,
}

impl DataFile {
    pub const STANDARD: [DataFile; 5] =
        [DataFile::Dictionary, DataFile::Grammar, DataFile::Culture, DataFile::Units, DataFile::AiChats];

    pub const EXTENDED: [DataFile; 7] = [
        DataFile::Dictionary,
        DataFile::Grammar,
        DataFile::Culture,
        DataFile::Units,
        DataFile::AiChats,
        DataFile::Alphabet,
        DataFile::Books,
    ];

    /// Logical name used as the key in the manifest's `dataFiles` table.
    pub fn key(&self) -> &'static str {
        match self {
            DataFile::Dictionary => "dictionary",
            DataFile::Grammar => "grammar",
            DataFile::Culture => "culture",
            DataFile::Units => "units",
            DataFile::AiChats => "ai_chats",
            DataFile::Alphabet => "alphabet",
            DataFile::Books => "books",
        }
    }

    pub fn default_path(&self) -> String {
        format!("data/{}.json", self.key())
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ManifestFields {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub title: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub author: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub language: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AssetEntry {
    pub mime_type: String,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DataFileEntry {
    pub path: String,
    #[serde(default = "default_data_version")]
    pub version: u32,
}

fn default_data_version() -> u32 {
    PACKAGE_VERSION
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Manifest {
    #[serde(default)]
    pub format: Option<String>,
    #[serde(default)]
    pub version: u32,
    #[serde(default)]
    pub fields: ManifestFields,
    #[serde(default)]
    pub assets: BTreeMap<String, AssetEntry>, // package path -> MIME type
    #[serde(default)]
    pub data_files: BTreeMap<String, DataFileEntry>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub course_id: Option<String>,
}

impl Manifest {
    pub fn new(fields: ManifestFields, course_id: impl Into<String>) -> Self {
        Self {
            format: Some(PACKAGE_FORMAT.to_string()),
            version: PACKAGE_VERSION,
            fields,
            assets: BTreeMap::new(),
            data_files: BTreeMap::new(),
            course_id: Some(course_id.into()),
        }
    }

    pub fn is_lexy_package(&self) -> bool {
        self.format.as_deref() == Some(PACKAGE_FORMAT)
    }

    pub fn declare_data_file(&mut self, kind: DataFile) -> String {
        let path = kind.default_path();
        self.data_files
            .insert(kind.key().to_string(), DataFileEntry { path: path.clone(), version: PACKAGE_VERSION });
        path
    }

    pub fn data_file_path(&self, kind: DataFile) -> Option<&str> {
        self.data_files.get(kind.key()).map(|entry| entry.path.as_str())
    }

    pub fn asset_mime_type(&self, path: &str) -> Option<&str> {
        self.assets.get(path).map(|entry| entry.mime_type.as_str())
    }

    /// Non-empty course id declared by the package.
    pub fn declared_course_id(&self) -> Option<&str> {
        self.course_id.as_deref().map(str::trim).filter(|id| !id.is_empty())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_manifest_json_shape() {
        let mut manifest = Manifest::new(
            ManifestFields {
                title: Some("French Basics".to_string()),
                description: Some("A custom language course for French".to_string()),
                author: Some("Lexy User".to_string()),
                language: Some("French".to_string()),
            },
            "French",
        );
        manifest.declare_data_file(DataFile::AiChats);

        let value = serde_json::to_value(&manifest).unwrap();
        assert_eq!(value["format"], "lexy-package");
        assert_eq!(value["version"], 1);
        assert_eq!(value["courseId"], "French");
        assert_eq!(value["dataFiles"]["ai_chats"]["path"], "data/ai_chats.json");
        assert_eq!(value["dataFiles"]["ai_chats"]["version"], 1);
        assert!(value["assets"].as_object().unwrap().is_empty());
    }

    #[test]
    fn test_parses_builder_manifest() {
        let json = r#"{
            "format": "lexy-package",
            "version": 1,
            "fields": { "title": "Mi curso", "description": "", "author": "Lexy User" },
            "assets": {},
            "dataFiles": {
                "dictionary": { "path": "data/dictionary.json", "version": 1 },
                "units": { "path": "data/units.json", "version": 1 }
            },
            "courseId": "Spanish"
        }"#;
        let manifest: Manifest = serde_json::from_str(json).unwrap();

        assert!(manifest.is_lexy_package());
        assert_eq!(manifest.declared_course_id(), Some("Spanish"));
        assert_eq!(manifest.data_file_path(DataFile::Dictionary), Some("data/dictionary.json"));
        assert_eq!(manifest.data_file_path(DataFile::Grammar), None);
        assert_eq!(manifest.fields.language, None);
    }

    #[test]
    fn test_missing_format_is_not_a_package() {
        let manifest: Manifest = serde_json::from_str(r#"{"version": 1}"#).unwrap();
        assert!(!manifest.is_lexy_package());
        assert_eq!(manifest.declared_course_id(), None);
    }
}
