/// A writing system: the codepoint ranges to scan and the Unicode script name that
/// candidates must belong to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Script {
    pub name: &'static str,
    pub ranges: &'static [(u32, u32)], // inclusive
}

impl Script {
    /// Pattern matching a single character of this script.
    pub fn pattern(&self) -> String {
        format!(r"^\p{{{}}}$", self.name)
    }

    pub fn codepoint_count(&self) -> u64 {
        self.ranges.iter().map(|&(start, end)| u64::from(end - start) + 1).sum()
    }
}

pub const SCRIPTS: &[Script] = &[
    Script { name: "Latin", ranges: &[(0x0041, 0x007A), (0x00C0, 0x024F), (0x1E00, 0x1EFF)] },
    Script { name: "Greek", ranges: &[(0x0370, 0x03FF), (0x1F00, 0x1FFF)] },
    Script { name: "Cyrillic", ranges: &[(0x0400, 0x04FF), (0x0500, 0x052F)] },
    Script { name: "Armenian", ranges: &[(0x0530, 0x058F)] },
    Script { name: "Hebrew", ranges: &[(0x0590, 0x05FF)] },
    Script { name: "Arabic", ranges: &[(0x0600, 0x06FF), (0x0750, 0x077F)] },
    Script { name: "Devanagari", ranges: &[(0x0900, 0x097F)] },
    Script { name: "Bengali", ranges: &[(0x0980, 0x09FF)] },
    Script { name: "Tamil", ranges: &[(0x0B80, 0x0BFF)] },
    Script { name: "Thai", ranges: &[(0x0E00, 0x0E7F)] },
    Script { name: "Georgian", ranges: &[(0x10A0, 0x10FF)] },
    Script { name: "Ethiopic", ranges: &[(0x1200, 0x137F)] },
    Script { name: "Hangul", ranges: &[(0x1100, 0x11FF), (0x3130, 0x318F), (0xAC00, 0xD7A3)] },
    Script { name: "Hiragana", ranges: &[(0x3040, 0x309F)] },
    Script { name: "Katakana", ranges: &[(0x30A0, 0x30FF), (0x31F0, 0x31FF)] },
    Script { name: "Han", ranges: &[(0x4E00, 0x9FFF)] },
];

pub const LANGUAGE_SCRIPTS: &[(&str, &[&str])] = &[
    ("English", &["Latin"]),
    ("Spanish", &["Latin"]),
    ("French", &["Latin"]),
    ("German", &["Latin"]),
    ("Italian", &["Latin"]),
    ("Portuguese", &["Latin"]),
    ("Dutch", &["Latin"]),
    ("Polish", &["Latin"]),
    ("Turkish", &["Latin"]),
    ("Vietnamese", &["Latin"]),
    ("Russian", &["Cyrillic"]),
    ("Ukrainian", &["Cyrillic"]),
    ("Greek", &["Greek"]),
    ("Arabic", &["Arabic"]),
    ("Persian", &["Arabic"]),
    ("Hebrew", &["Hebrew"]),
    ("Hindi", &["Devanagari"]),
    ("Bengali", &["Bengali"]),
    ("Tamil", &["Tamil"]),
    ("Thai", &["Thai"]),
    ("Georgian", &["Georgian"]),
    ("Armenian", &["Armenian"]),
    ("Amharic", &["Ethiopic"]),
    ("Korean", &["Hangul"]),
    ("Japanese", &["Hiragana", "Katakana", "Han"]),
    ("Chinese", &["Han"]),
];

pub fn script(name: &str) -> Option<&'static Script> {
    SCRIPTS.iter().find(|s| s.name == name)
}

/// Scripts configured for a language, in table order. Unknown languages have none.
pub fn scripts_for_language(language: &str) -> Vec<&'static Script> {
    let language = language.trim();
    LANGUAGE_SCRIPTS
        .iter()
        .find(|(name, _)| name.eq_ignore_ascii_case(language))
        .map(|(_, names)| names.iter().filter_map(|name| script(name)).collect())
        .unwrap_or_default()
}

pub fn supported_languages() -> Vec<&'static str> {
    LANGUAGE_SCRIPTS.iter().map(|(name, _)| *name).collect()
}
