use std::{
    fmt,
    str::FromStr,
};

use regex::Regex;
use serde::{
    Deserialize,
    Serialize,
};

use crate::core::LexyError;

/// Unicode category a generated character must belong to, on top of its script.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum CharacterFilter {
    Any,
    #[default]
    Letters,
    LettersAndMarks,
    LettersAndDigits,
}

impl CharacterFilter {
    pub const ALL: [CharacterFilter; 4] = [
        CharacterFilter::Any,
        CharacterFilter::Letters,
        CharacterFilter::LettersAndMarks,
        CharacterFilter::LettersAndDigits,
    ];

    pub fn pattern(&self) -> Option<&'static str> {
        match self {
            CharacterFilter::Any => None,
            CharacterFilter::Letters => Some(r"^\p{L}$"),
            CharacterFilter::LettersAndMarks => Some(r"^[\p{L}\p{M}]$"),
            CharacterFilter::LettersAndDigits => Some(r"^[\p{L}\p{Nd}]$"),
        }
    }

    pub fn compile(&self) -> Result<Option<Regex>, LexyError> {
        self.pattern().map(Regex::new).transpose().map_err(LexyError::from)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            CharacterFilter::Any => "any",
            CharacterFilter::Letters => "letters",
            CharacterFilter::LettersAndMarks => "letters-and-marks",
            CharacterFilter::LettersAndDigits => "letters-and-digits",
        }
    }
}

impl fmt::Display for CharacterFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for CharacterFilter {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();
        CharacterFilter::ALL.into_iter().find(|f| f.as_str() == s).ok_or_else(|| {
            let options: Vec<&str> = CharacterFilter::ALL.iter().map(|f| f.as_str()).collect();
            format!("unknown character filter '{}' (expected one of: {})", s, options.join(", "))
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn accepts(filter: CharacterFilter, c: char) -> bool {
        match filter.compile().unwrap() {
            Some(re) => re.is_match(c.encode_utf8(&mut [0u8; 4])),
            None => true,
        }
    }

    #[test]
    fn test_categories() {
        assert!(accepts(CharacterFilter::Letters, 'ß'));
        assert!(!accepts(CharacterFilter::Letters, '\u{0301}')); // combining acute
        assert!(accepts(CharacterFilter::LettersAndMarks, '\u{0301}'));
        assert!(!accepts(CharacterFilter::LettersAndMarks, '7'));
        assert!(accepts(CharacterFilter::LettersAndDigits, '٣')); // Arabic-Indic three
        assert!(!accepts(CharacterFilter::LettersAndDigits, '?'));
        assert!(accepts(CharacterFilter::Any, '?'));
    }

    #[test]
    fn test_parse_round_trips_display() {
        for filter in CharacterFilter::ALL {
            assert_eq!(filter.to_string().parse::<CharacterFilter>().unwrap(), filter);
        }
        assert!("vowels".parse::<CharacterFilter>().is_err());
    }
}
