use crate::models::element::ElementKind;
use crate::partition::patterns::{
    BULLET_PREFIX, CITY_STATE_ZIP, ENUMERATED_PREFIX, PAGE_BREAK, STATE_ZIP,
};

/// Titles longer than this many words are treated as body text.
pub const TITLE_MAX_WORDS: usize = 12;
/// Titles longer than this many characters are treated as body text.
pub const TITLE_MAX_CHARS: usize = 120;
/// Second address shape only applies to short lines.
const ADDRESS_MAX_WORDS: usize = 10;
/// Maximum share of non-alphabetic, non-space characters in a title.
const TITLE_MAX_NON_ALPHA_RATIO: f64 = 0.5;

const SENTENCE_ENDINGS: [char; 3] = ['.', '!', '?'];

/// Outcome of classifying one segment.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Classification {
    /// Separator line; dropped from the output.
    PageBreak,
    Element(ElementKind),
}

impl Classification {
    #[must_use]
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::PageBreak => "PageBreak",
            Self::Element(kind) => kind.as_str(),
        }
    }
}

/// Assigns a semantic type to a segment. Implementations must be pure:
/// the same text always yields the same classification.
pub trait ElementClassifier: Send + Sync {
    fn classify(&self, text: &str) -> Classification;
}

impl<F> ElementClassifier for F
where
    F: Fn(&str) -> Classification + Send + Sync,
{
    fn classify(&self, text: &str) -> Classification {
        self(text)
    }
}

/// Ordered pattern checks: page break, list item, address, title,
/// narrative text, then uncategorized.
#[derive(Debug, Clone, Copy, Default)]
pub struct RuleClassifier;

impl ElementClassifier for RuleClassifier {
    fn classify(&self, text: &str) -> Classification {
        classify(text)
    }
}

#[must_use]
pub fn classify(text: &str) -> Classification {
    let text = text.trim();
    if is_page_break(text) {
        return Classification::PageBreak;
    }

    let kind = if is_list_item(text) {
        ElementKind::ListItem
    } else if is_address(text) {
        ElementKind::Address
    } else if is_possible_title(text) {
        ElementKind::Title
    } else if is_possible_narrative(text) {
        ElementKind::NarrativeText
    } else {
        ElementKind::UncategorizedText
    };
    Classification::Element(kind)
}

#[must_use]
pub fn is_page_break(text: &str) -> bool {
    PAGE_BREAK.is_match(text)
}

#[must_use]
pub fn is_bulleted(text: &str) -> bool {
    BULLET_PREFIX.is_match(text)
}

#[must_use]
pub fn is_list_item(text: &str) -> bool {
    is_bulleted(text) || ENUMERATED_PREFIX.is_match(text)
}

#[must_use]
pub fn is_address(text: &str) -> bool {
    CITY_STATE_ZIP.is_match(text)
        || (text.split_whitespace().count() <= ADDRESS_MAX_WORDS && STATE_ZIP.is_match(text))
}

#[must_use]
pub fn is_possible_title(text: &str) -> bool {
    let words: Vec<&str> = text.split_whitespace().collect();
    if words.is_empty() || words.len() > TITLE_MAX_WORDS || text.chars().count() > TITLE_MAX_CHARS
    {
        return false;
    }
    if !text.chars().any(char::is_alphabetic) || exceeds_non_alpha_ratio(text) {
        return false;
    }
    if text.ends_with(SENTENCE_ENDINGS) {
        return false;
    }
    !is_mostly_lowercase(&words)
}

#[must_use]
pub fn is_possible_narrative(text: &str) -> bool {
    text.split_whitespace().nth(1).is_some()
        && text.chars().any(char::is_alphabetic)
        && text.contains(SENTENCE_ENDINGS)
}

/// Strip a leading bullet marker. Enumerators are kept since they carry content.
#[must_use]
pub fn clean_bullets(text: &str) -> &str {
    match BULLET_PREFIX.find(text) {
        Some(m) => text[m.end()..].trim(),
        None => text,
    }
}

fn exceeds_non_alpha_ratio(text: &str) -> bool {
    let (total, alpha) = text
        .chars()
        .filter(|c| !c.is_whitespace())
        .fold((0usize, 0usize), |(total, alpha), c| {
            (total + 1, alpha + usize::from(c.is_alphabetic()))
        });
    total == 0 || (total - alpha) as f64 / total as f64 > TITLE_MAX_NON_ALPHA_RATIO
}

/// Lowercase first letter, or more than half of the words longer than
/// three letters starting lowercase.
fn is_mostly_lowercase(words: &[&str]) -> bool {
    if words
        .iter()
        .find_map(|w| first_letter(w))
        .is_some_and(char::is_lowercase)
    {
        return true;
    }

    let significant: Vec<char> = words
        .iter()
        .filter(|w| w.chars().filter(|c| c.is_alphabetic()).count() > 3)
        .filter_map(|w| first_letter(w))
        .collect();
    let lowercase = significant.iter().filter(|c| c.is_lowercase()).count();
    lowercase * 2 > significant.len()
}

fn first_letter(word: &str) -> Option<char> {
    word.chars().find(|c| c.is_alphabetic())
}
