use crate::partition::classifier::is_bulleted;

/// Blocks whose lines all have fewer words than this keep one paragraph per line.
const SHORT_LINE_WORDS: usize = 5;

/// Turns raw lines into logical paragraphs, typically by re-joining lines
/// that were soft-wrapped mid-sentence.
pub trait ParagraphGrouper: Send + Sync {
    fn group(&self, lines: &[&str]) -> Vec<String>;
}

impl<F> ParagraphGrouper for F
where
    F: Fn(&[&str]) -> Vec<String> + Send + Sync,
{
    fn group(&self, lines: &[&str]) -> Vec<String> {
        self(lines)
    }
}

/// Default grouping heuristic for text with hard line wraps.
///
/// Blank lines always separate paragraphs. Inside a blank-line block, a
/// new paragraph starts at a bulleted line, or where a line ending in
/// `.`, `!` or `?` is followed by a line starting with an uppercase
/// letter. Blocks made only of short lines (address blocks, license
/// headers) keep one paragraph per line. Everything else is joined with
/// single spaces.
#[derive(Debug, Clone, Copy, Default)]
pub struct BrokenParagraphGrouper;

impl ParagraphGrouper for BrokenParagraphGrouper {
    fn group(&self, lines: &[&str]) -> Vec<String> {
        let mut paragraphs = Vec::new();

        for block in blank_line_blocks(lines) {
            if block
                .iter()
                .all(|line| line.split_whitespace().count() < SHORT_LINE_WORDS)
            {
                paragraphs.extend(block.iter().map(|line| (*line).to_string()));
                continue;
            }

            let mut current = String::new();
            let mut prev: Option<&str> = None;
            for line in block {
                if prev.is_some_and(|p| is_genuine_break(p, line)) && !current.is_empty() {
                    paragraphs.push(std::mem::take(&mut current));
                }
                if !current.is_empty() {
                    current.push(' ');
                }
                current.push_str(line);
                prev = Some(line);
            }
            if !current.is_empty() {
                paragraphs.push(current);
            }
        }

        paragraphs
    }
}

/// Group trimmed, non-empty lines into runs separated by blank lines.
fn blank_line_blocks<'a>(lines: &[&'a str]) -> Vec<Vec<&'a str>> {
    let mut blocks = Vec::new();
    let mut current = Vec::new();
    for line in lines {
        let trimmed = line.trim();
        if trimmed.is_empty() {
            if !current.is_empty() {
                blocks.push(std::mem::take(&mut current));
            }
        } else {
            current.push(trimmed);
        }
    }
    if !current.is_empty() {
        blocks.push(current);
    }
    blocks
}

fn is_genuine_break(prev: &str, next: &str) -> bool {
    if is_bulleted(next) {
        return true;
    }
    prev.ends_with(['.', '!', '?']) && next.chars().next().is_some_and(char::is_uppercase)
}
