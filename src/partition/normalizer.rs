use crate::error::{Result, TextpartError};

pub const DEFAULT_MIN_PARTITION: usize = 7;
pub const DEFAULT_MAX_PARTITION: usize = 1500;

/// Validated character-count bounds, `0 < min <= max`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PartitionBounds {
    min: usize,
    max: usize,
}

impl PartitionBounds {
    pub fn new(min_partition: usize, max_partition: usize) -> Result<Self> {
        if min_partition == 0 {
            return Err(TextpartError::Config(
                "min_partition must be greater than zero".into(),
            ));
        }
        if min_partition > max_partition {
            return Err(TextpartError::Config(format!(
                "min_partition ({min_partition}) cannot exceed max_partition ({max_partition})"
            )));
        }
        Ok(Self {
            min: min_partition,
            max: max_partition,
        })
    }

    #[must_use]
    pub fn min(&self) -> usize {
        self.min
    }

    #[must_use]
    pub fn max(&self) -> usize {
        self.max
    }
}

impl Default for PartitionBounds {
    fn default() -> Self {
        Self {
            min: DEFAULT_MIN_PARTITION,
            max: DEFAULT_MAX_PARTITION,
        }
    }
}

/// Length in Unicode scalar values.
#[must_use]
pub fn char_len(s: &str) -> usize {
    s.chars().count()
}

/// Only ASCII whitespace counts as a break point.
fn is_break(c: char) -> bool {
    matches!(c, ' ' | '\t' | '\n' | '\r')
}

/// Split oversized paragraphs, then merge undersized neighbours.
#[must_use]
pub fn normalize<S: AsRef<str>>(paragraphs: &[S], bounds: PartitionBounds) -> Vec<String> {
    let split: Vec<String> = paragraphs
        .iter()
        .flat_map(|p| split_to_fit_max(p.as_ref(), bounds.max))
        .collect();
    combine_less_than_min(split, bounds)
}

/// Greedily pack whole words into pieces of at most `max_partition`
/// characters. A paragraph that already fits is returned unchanged; a
/// single word longer than the bound becomes its own piece.
#[must_use]
pub fn split_to_fit_max(paragraph: &str, max_partition: usize) -> Vec<String> {
    let paragraph = paragraph.trim_matches(is_break);
    if paragraph.is_empty() {
        return Vec::new();
    }
    if char_len(paragraph) <= max_partition {
        return vec![paragraph.to_string()];
    }

    let mut pieces = Vec::new();
    let mut current = String::new();
    let mut current_len = 0;

    for word in paragraph.split(is_break).filter(|w| !w.is_empty()) {
        let word_len = char_len(word);
        if current.is_empty() {
            current.push_str(word);
            current_len = word_len;
        } else if current_len + 1 + word_len <= max_partition {
            current.push(' ');
            current.push_str(word);
            current_len += 1 + word_len;
        } else {
            pieces.push(std::mem::take(&mut current));
            current.push_str(word);
            current_len = word_len;
        }
    }
    if !current.is_empty() {
        pieces.push(current);
    }

    pieces
}

/// Merge segments shorter than `min` into their neighbours without
/// exceeding `max`. A short trailing segment folds back into the previous
/// one when it fits, otherwise it is kept on its own.
#[must_use]
pub fn combine_less_than_min(segments: Vec<String>, bounds: PartitionBounds) -> Vec<String> {
    let mut combined: Vec<String> = Vec::with_capacity(segments.len());
    let mut acc: Option<(String, usize)> = None;

    for segment in segments {
        let len = char_len(&segment);
        acc = Some(match acc.take() {
            None => (segment, len),
            Some((text, acc_len)) if acc_len >= bounds.min || acc_len + 1 + len > bounds.max => {
                combined.push(text);
                (segment, len)
            }
            Some((mut text, acc_len)) => {
                text.push(' ');
                text.push_str(&segment);
                (text, acc_len + 1 + len)
            }
        });
    }

    if let Some((text, len)) = acc {
        match combined.last_mut() {
            Some(last) if len < bounds.min && char_len(last) + 1 + len <= bounds.max => {
                last.push(' ');
                last.push_str(&text);
            }
            _ => combined.push(text),
        }
    }

    combined
}
