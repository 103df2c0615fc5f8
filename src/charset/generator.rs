use std::collections::HashSet;

use regex::Regex;
use tracing::debug;

use super::{
    filter::CharacterFilter,
    scripts::scripts_for_language,
};
use crate::core::LexyError;

/// Progress is reported at least this often, in codepoints scanned.
pub const PROGRESS_INTERVAL: u64 = 100;

const SURROGATES: std::ops::RangeInclusive<u32> = 0xD800..=0xDFFF;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CharsetRequest {
    pub language: String,
    pub filter: CharacterFilter,
    pub max_count: usize,
}

impl CharsetRequest {
    pub fn new(language: impl Into<String>, filter: CharacterFilter, max_count: usize) -> Self {
        Self { language: language.into(), filter, max_count }
    }
}

fn percent(processed: u64, total: u64) -> u8 {
    if total == 0 {
        100
    } else {
        (processed.saturating_mul(100) / total).min(100) as u8
    }
}

/// Walks every codepoint of the language's scripts in range order and collects distinct
/// characters that belong to the script and pass the filter, stopping at `max_count`.
/// `on_progress` receives percentages of the codepoints scanned and always ends with 100.
pub fn generate_characters<F>(request: &CharsetRequest, mut on_progress: F) -> Result<Vec<char>, LexyError>
where
    F: FnMut(u8),
{
    let scripts = scripts_for_language(&request.language);
    let total: u64 = scripts.iter().map(|s| s.codepoint_count()).sum();
    let category = request.filter.compile()?;

    let mut characters = Vec::new();
    let mut seen = HashSet::new();
    let mut processed: u64 = 0;

    if request.max_count > 0 {
        'scripts: for script in &scripts {
            let membership = Regex::new(&script.pattern())?;

            for &(start, end) in script.ranges {
                for codepoint in start..=end {
                    processed += 1;
                    if processed % PROGRESS_INTERVAL == 0 {
                        on_progress(percent(processed, total));
                    }

                    if SURROGATES.contains(&codepoint) {
                        continue;
                    }
                    let Some(c) = char::from_u32(codepoint) else {
                        continue;
                    };

                    let mut buffer = [0u8; 4];
                    let text = c.encode_utf8(&mut buffer);
                    if !membership.is_match(text) {
                        continue;
                    }
                    if let Some(category) = &category {
                        if !category.is_match(text) {
                            continue;
                        }
                    }

                    if seen.insert(c) {
                        characters.push(c);
                        if characters.len() >= request.max_count {
                            break 'scripts;
                        }
                    }
                }
            }
        }
    }

    on_progress(100);
    debug!(
        "Generated {} characters for '{}' ({} of {} codepoints scanned)",
        characters.len(),
        request.language,
        processed,
        total
    );
    Ok(characters)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn generate(language: &str, filter: CharacterFilter, max_count: usize) -> Vec<char> {
        generate_characters(&CharsetRequest::new(language, filter, max_count), |_| {}).unwrap()
    }

    #[test]
    fn test_japanese_starts_with_hiragana() {
        let chars = generate("Japanese", CharacterFilter::Letters, 5);
        assert_eq!(chars, vec!['ぁ', 'あ', 'ぃ', 'い', 'ぅ']);
    }

    #[test]
    fn test_output_is_bounded_and_distinct() {
        for filter in CharacterFilter::ALL {
            for max in [0, 1, 37, 400] {
                let chars = generate("Japanese", filter, max);
                assert!(chars.len() <= max);

                let unique: HashSet<char> = chars.iter().copied().collect();
                assert_eq!(unique.len(), chars.len());
            }
        }
    }

    #[test]
    fn test_filters_hold_for_every_character() {
        let letter = Regex::new(r"^\p{L}$").unwrap();
        let letter_or_mark = Regex::new(r"^[\p{L}\p{M}]$").unwrap();

        for language in ["Hindi", "Thai", "Vietnamese", "Hebrew"] {
            for c in generate(language, CharacterFilter::Letters, 10_000) {
                assert!(letter.is_match(&c.to_string()), "{:?} in {}", c, language);
            }
            for c in generate(language, CharacterFilter::LettersAndMarks, 10_000) {
                assert!(letter_or_mark.is_match(&c.to_string()), "{:?} in {}", c, language);
            }
        }
    }

    #[test]
    fn test_marks_only_with_marks_filter() {
        let letters = generate("Hindi", CharacterFilter::Letters, 10_000);
        let with_marks = generate("Hindi", CharacterFilter::LettersAndMarks, 10_000);

        assert!(!letters.contains(&'\u{093F}')); // vowel sign i
        assert!(with_marks.contains(&'\u{093F}'));
        assert!(with_marks.len() > letters.len());
    }

    #[test]
    fn test_script_membership_excludes_common_characters() {
        let latin = generate("Spanish", CharacterFilter::Any, 10_000);
        assert!(latin.contains(&'ñ'));
        assert!(!latin.contains(&'['));
        assert!(!latin.contains(&'×'));
    }

    #[test]
    fn test_unknown_language_is_empty() {
        let mut ticks = Vec::new();
        let chars = generate_characters(
            &CharsetRequest::new("Klingon", CharacterFilter::Letters, 100),
            |p| ticks.push(p),
        )
        .unwrap();

        assert!(chars.is_empty());
        assert_eq!(ticks, vec![100]);
    }

    #[test]
    fn test_progress_is_monotonic_and_finishes() {
        let mut ticks = Vec::new();
        generate_characters(&CharsetRequest::new("Russian", CharacterFilter::Letters, 10_000), |p| {
            ticks.push(p)
        })
        .unwrap();

        // 304 Cyrillic codepoints: ticks at 100, 200 and 300, then completion
        assert_eq!(ticks.len(), 4);
        assert!(ticks.windows(2).all(|w| w[0] <= w[1]));
        assert_eq!(ticks.last(), Some(&100));
    }

    #[test]
    fn test_early_stop_still_reports_completion() {
        let mut ticks = Vec::new();
        let chars = generate_characters(&CharsetRequest::new("Chinese", CharacterFilter::Letters, 3), |p| {
            ticks.push(p)
        })
        .unwrap();

        assert_eq!(chars, vec!['一', '丁', '丂']);
        assert_eq!(ticks, vec![100]);
    }
}
