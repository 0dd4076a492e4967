//! Filename normalization and tokenization
//!
//! Turns a file path into the cleaned text both classifier stages work on,
//! and splits that text into word tokens and character n-grams.
//! Every function here is pure and deterministic.

use std::collections::BTreeSet;
use std::sync::LazyLock;

use ahash::{AHashMap, AHashSet};

/// Number of trailing parent folders folded into the classifiable text
pub const MAX_PARENT_SEGMENTS: usize = 6;

/// Default n-gram range used by the similarity stage
pub const DEFAULT_MIN_NGRAM: usize = 3;
pub const DEFAULT_MAX_NGRAM: usize = 5;

/// Prefix that keeps n-gram features out of the word-token namespace.
/// Word tokens are purely alphanumeric, so they can never start with it.
pub const NGRAM_MARKER: char = '#';

// Sound libraries are full of junk tokens; this list stays small on purpose.
static STOP_WORDS: LazyLock<AHashSet<&'static str>> = LazyLock::new(|| {
    [
        "and", "the", "for", "with", "from",
        "mono", "stereo", "loop", "loops", "one", "shot", "oneshot", "take",
        "final", "edit", "mix", "master",
        "dry", "wet", "close", "far", "dist", "distant", "near", "room", "mic", "mics",
        "sfx", "wav", "mp3", "flac", "ogg", "aiff", "aif", "aac", "m4a",
    ]
    .into_iter()
    .collect()
});

static SYNONYMS: LazyLock<AHashMap<&'static str, &'static str>> = LazyLock::new(|| {
    [
        ("flyby", "passby"),
        ("flybys", "passby"),
        ("driveby", "passby"),
        ("passbys", "passby"),
        ("whooshes", "whoosh"),
        ("woosh", "whoosh"),
        ("swoosh", "whoosh"),
        ("swish", "whoosh"),
        ("footsteps", "footstep"),
        ("gunshots", "gunshot"),
        ("gunfire", "gunshot"),
        ("ambiance", "ambience"),
        ("ambient", "ambience"),
        ("atmos", "ambience"),
        ("atmosphere", "ambience"),
        ("impacts", "impact"),
        ("hits", "hit"),
        ("doors", "door"),
        ("birds", "bird"),
        ("dogs", "dog"),
        ("cars", "car"),
        ("engines", "engine"),
        ("clicks", "click"),
        ("buttons", "button"),
        ("rifles", "rifle"),
        ("risers", "riser"),
        ("drones", "drone"),
        ("creaks", "creak"),
    ]
    .into_iter()
    .collect()
});

/// A path split into the pieces the classifiers look at
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts<'a> {
    /// File name without its extension
    pub stem: &'a str,
    /// Non-blank parent folder segments, outermost first
    pub parents: Vec<&'a str>,
}

impl<'a> PathParts<'a> {
    /// Split on both `/` and `\` so paths from either platform behave the same.
    pub fn parse(path: &'a str) -> Self {
        let mut segments: Vec<&str> = path.split(['/', '\\']).collect();
        let file_name = segments.pop().unwrap_or("");
        let parents = segments
            .into_iter()
            .filter(|s| !s.trim().is_empty())
            .collect();

        Self {
            stem: file_stem(file_name),
            parents,
        }
    }

    /// Last non-blank parent folder, if any
    pub fn last_parent(&self) -> Option<&'a str> {
        self.parents.last().map(|s| s.trim())
    }

    /// Parent folders nearest the file, at most `MAX_PARENT_SEGMENTS`
    pub fn recent_parents(&self) -> &[&'a str] {
        let skip = self.parents.len().saturating_sub(MAX_PARENT_SEGMENTS);
        &self.parents[skip..]
    }

    /// The filename segment before the first underscore, or the whole stem.
    pub fn leading_token(&self) -> &'a str {
        match self.stem.find('_') {
            Some(idx) if idx > 0 => &self.stem[..idx],
            _ => self.stem,
        }
    }
}

fn file_stem(file_name: &str) -> &str {
    match file_name.rfind('.') {
        Some(idx) if idx > 0 => &file_name[..idx],
        _ => file_name,
    }
}

/// Build the classifiable text for a path: the last parent folders plus the
/// filename stem, normalized.
pub fn classifiable_text(path: &str) -> String {
    let parts = PathParts::parse(path);
    let mut combined = parts.recent_parents().join(" ");
    combined.push(' ');
    combined.push_str(parts.stem);
    normalize(&combined)
}

/// Lowercase, fold typographic punctuation to ASCII, turn separators into
/// spaces and collapse whitespace runs.
pub fn normalize(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    let mut pending_space = false;

    for c in text.chars().flat_map(char::to_lowercase) {
        let c = match c {
            '\u{2018}' | '\u{2019}' | '\u{201B}' | '\u{2032}' => '\'',
            '\u{201C}' | '\u{201D}' | '\u{201F}' | '\u{2033}' => '"',
            '\u{2010}'..='\u{2015}' | '\u{2212}' => '-',
            other => other,
        };

        if c.is_whitespace() || matches!(c, '_' | '-' | ',' | '.' | '(' | ')') {
            pending_space = true;
            continue;
        }

        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }

    out
}

/// Word tokens of `text` as a set
pub fn tokenize_words(text: &str) -> BTreeSet<String> {
    word_tokens(text).collect()
}

/// Character n-grams of the cleaned text, each tagged with `NGRAM_MARKER`
pub fn tokenize_char_ngrams(text: &str, min_n: usize, max_n: usize) -> BTreeSet<String> {
    char_ngrams(&normalize(text), min_n, max_n).collect()
}

/// All similarity features of `text` in order, repeats kept so that term
/// frequencies can be counted.
pub fn features(text: &str) -> Vec<String> {
    let cleaned = normalize(text);
    word_tokens(&cleaned)
        .chain(char_ngrams(&cleaned, DEFAULT_MIN_NGRAM, DEFAULT_MAX_NGRAM))
        .collect()
}

pub(crate) fn word_tokens(text: &str) -> impl Iterator<Item = String> + '_ {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|raw| !raw.is_empty())
        .map(str::to_lowercase)
        .filter(|raw| keep_word(raw))
        .filter_map(|raw| {
            let word = match SYNONYMS.get(raw.as_str()) {
                Some(canonical) => (*canonical).to_string(),
                None => raw,
            };
            keep_word(&word).then_some(word)
        })
}

fn keep_word(word: &str) -> bool {
    let len = word.chars().count();
    if len <= 2 || STOP_WORDS.contains(word) {
        return false;
    }
    let digits = word.chars().filter(char::is_ascii_digit).count();
    digits + 1 < len
}

fn char_ngrams(cleaned: &str, min_n: usize, max_n: usize) -> impl Iterator<Item = String> {
    let chars: Vec<char> = cleaned
        .chars()
        .map(|c| if c == ' ' { '_' } else { c })
        .collect();
    let min_n = min_n.max(1);

    (min_n..=max_n).flat_map(move |n| {
        let windows: Vec<String> = if chars.len() < n {
            Vec::new()
        } else {
            chars
                .windows(n)
                .map(|w| {
                    let mut gram = String::with_capacity(n + 1);
                    gram.push(NGRAM_MARKER);
                    gram.extend(w);
                    gram
                })
                .collect()
        };
        windows.into_iter()
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_normalize_separators_and_case() {
        assert_eq!(normalize("  AMB_Wind--Gusty (01).WAV "), "amb wind gusty 01 wav");
        assert_eq!(normalize("Door\u{2014}Creak \u{2018}old\u{2019}"), "door creak 'old'");
        assert_eq!(normalize(""), "");
        assert_eq!(normalize("___"), "");
    }

    #[test]
    fn test_path_parts() {
        let parts = PathParts::parse("C:\\Library\\Foley/Cloth\\CLOTH_Rustle_03.wav");
        assert_eq!(parts.stem, "CLOTH_Rustle_03");
        assert_eq!(parts.parents, vec!["C:", "Library", "Foley", "Cloth"]);
        assert_eq!(parts.last_parent(), Some("Cloth"));
        assert_eq!(parts.leading_token(), "CLOTH");

        let bare = PathParts::parse("gunshot.wav");
        assert!(bare.parents.is_empty());
        assert_eq!(bare.leading_token(), "gunshot");

        let hidden = PathParts::parse("/a/.hidden");
        assert_eq!(hidden.stem, ".hidden");
    }

    #[test]
    fn test_leading_token_ignores_leading_underscore() {
        let parts = PathParts::parse("_AMB_test.wav");
        assert_eq!(parts.leading_token(), "_AMB_test");
    }

    #[test]
    fn test_classifiable_text_keeps_last_six_parents() {
        let text = classifiable_text("/a/b/c/d/e/f/g/h/Rain_Roof.wav");
        assert_eq!(text, "c d e f g h rain roof");
    }

    #[test]
    fn test_word_filters() {
        let words = tokenize_words("the UI click v12 a1b 2024 stereo flyby Whooshes ok");
        assert!(words.contains("click"));
        assert!(words.contains("passby"));
        assert!(words.contains("whoosh"));
        assert!(!words.contains("the"));
        assert!(!words.contains("ui"));
        assert!(!words.contains("v12"));
        assert!(!words.contains("2024"));
        assert!(!words.contains("stereo"));
        assert!(!words.contains("ok"));
        assert!(words.contains("a1b"));
    }

    #[test]
    fn test_ngrams_are_marked_and_keep_boundaries() {
        let grams = tokenize_char_ngrams("ab cd", 3, 5);
        assert!(grams.contains("#ab_"));
        assert!(grams.contains("#b_c"));
        assert!(grams.contains("#ab_cd"));
        assert!(grams.iter().all(|g| g.starts_with(NGRAM_MARKER)));
        assert!(tokenize_char_ngrams("ab", 3, 5).is_empty());
    }

    #[test]
    fn test_tokenize_is_deterministic() {
        let text = "Explosions Big Xk92 misc debris";
        assert_eq!(tokenize_words(text), tokenize_words(text));
        assert_eq!(tokenize_char_ngrams(text, 3, 5), tokenize_char_ngrams(text, 3, 5));
        assert_eq!(features(text), features(text));
    }

    #[test]
    fn test_features_keep_repeats() {
        let feats = features("rain rain");
        assert_eq!(feats.iter().filter(|f| *f == "rain").count(), 2);
    }

    #[test]
    fn test_unicode_input() {
        let text = classifiable_text("/Bibliothèque/Ödland/Wind_Böe_Straße.wav");
        assert_eq!(text, "bibliothèque ödland wind böe straße");
        assert!(tokenize_words(&text).contains("straße"));
        assert!(!features(&text).is_empty());
    }
}
