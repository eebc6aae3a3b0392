use serde::{Deserialize, Serialize};

use crate::partition::grouping::ParagraphGrouper;

/// Where the segmenter draws paragraph boundaries when no grouping
/// strategy is supplied.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BoundaryRule {
    /// Every line break ends a paragraph; blank-line runs collapse.
    #[default]
    Line,
    /// Only blank lines end a paragraph; internal newlines are kept.
    BlankLine,
}

/// Split raw text into ordered, trimmed, non-empty paragraphs.
#[must_use]
pub fn segment(
    text: &str,
    boundary: BoundaryRule,
    grouper: Option<&dyn ParagraphGrouper>,
) -> Vec<String> {
    if text.trim().is_empty() {
        return Vec::new();
    }

    let lines: Vec<&str> = text.lines().collect();
    let paragraphs = match (grouper, boundary) {
        (Some(grouper), _) => grouper.group(&lines),
        (None, BoundaryRule::Line) => lines.iter().map(|line| (*line).to_string()).collect(),
        (None, BoundaryRule::BlankLine) => blank_line_paragraphs(&lines),
    };

    paragraphs
        .into_iter()
        .map(|p| p.trim().to_string())
        .filter(|p| !p.is_empty())
        .collect()
}

fn blank_line_paragraphs(lines: &[&str]) -> Vec<String> {
    let mut paragraphs = Vec::new();
    let mut current: Vec<&str> = Vec::new();
    for line in lines {
        let line = line.trim_end();
        if line.is_empty() {
            if !current.is_empty() {
                paragraphs.push(current.join("\n"));
                current.clear();
            }
        } else {
            current.push(line);
        }
    }
    if !current.is_empty() {
        paragraphs.push(current.join("\n"));
    }
    paragraphs
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::partition::grouping::BrokenParagraphGrouper;

    #[test]
    fn empty_and_whitespace_input() {
        assert!(segment("", BoundaryRule::Line, None).is_empty());
        assert!(segment(" \n\t\n  ", BoundaryRule::BlankLine, None).is_empty());
    }

    #[test]
    fn line_rule_splits_every_line() {
        let text = "\n    VERY IMPORTANT MEMO\n    DOYLESTOWN, PA 18901\n    ";
        assert_eq!(
            segment(text, BoundaryRule::Line, None),
            vec!["VERY IMPORTANT MEMO", "DOYLESTOWN, PA 18901"]
        );
    }

    #[test]
    fn line_rule_collapses_blank_runs() {
        let text = "one\n\n\n\ntwo\r\n\r\nthree";
        assert_eq!(segment(text, BoundaryRule::Line, None), vec!["one", "two", "three"]);
    }

    #[test]
    fn blank_line_rule_keeps_internal_newlines() {
        let text = "first line\nsecond line   \n\n  \nnext paragraph";
        assert_eq!(
            segment(text, BoundaryRule::BlankLine, None),
            vec!["first line\nsecond line", "next paragraph"]
        );
    }

    #[test]
    fn grouper_overrides_boundary_rule() {
        let text = "The big brown fox\nwas walking down the lane.";
        let grouper = BrokenParagraphGrouper;
        assert_eq!(
            segment(text, BoundaryRule::Line, Some(&grouper)),
            vec!["The big brown fox was walking down the lane."]
        );
    }
}
