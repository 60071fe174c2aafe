//! List segmentation: turns a list-type section body into bullet items.
//!
//! Strategies run in order and the first one that yields items wins:
//!
//! 1. `marker_groups`: bullet or numbered items, each spanning lines until
//!    the next marker, a blank line, or the end of the block.
//! 2. `lines`: one item per non-empty line, markers stripped.
//! 3. `whole_block`: the block itself as a single item.
//!
//! Before any strategy runs, a single leading bullet is stripped from the
//! block; the text it introduced is the first item. A single-line block that
//! started with a bullet is a *flattened list*: inline ` - ` separators also
//! start new items (`- a - b` → `a`, `b`).
//!
//! Afterwards, empty items and bare bullet characters are dropped, as are
//! one-character items that no marker introduced.

use std::sync::LazyLock;

use regex::Regex;
use tracing::debug;

const BULLET_CHARS: &[&str] = &["-", "•", "*"];

static LEADING_BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^\s*[-•*](?:\s+|$)").expect("valid regex"));

static LINE_MARKER_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?m)^[ \t]*(?:[-•*]|\d+[.)])[ \t]+").expect("valid regex")
});

static INLINE_MARKER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"[ \t]+[-•*][ \t]+").expect("valid regex"));

static LINE_PREFIX_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[ \t]*(?:[-•]|\*(?:[ \t]|$)|\d+[.)])[ \t]*").expect("valid regex")
});

static BLANK_LINE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\n[ \t]*\n").expect("valid regex"));

/// A block with its leading bullet removed.
#[derive(Debug, Clone, Copy)]
struct Block<'a> {
    text: &'a str,
    /// A leading bullet was stripped, so position 0 starts an item.
    bulleted: bool,
    /// Bulleted and on one line: inline separators also start items.
    flattened: bool,
}

struct Strategy {
    name: &'static str,
    /// Every item it yields was introduced by a marker.
    marked: bool,
    run: fn(Block<'_>) -> Option<Vec<String>>,
}

const STRATEGIES: &[Strategy] = &[
    Strategy {
        name: "marker_groups",
        marked: true,
        run: marker_groups,
    },
    Strategy {
        name: "lines",
        marked: false,
        run: lines,
    },
    Strategy {
        name: "whole_block",
        marked: false,
        run: whole_block,
    },
];

pub fn segment_list(raw: &str) -> Vec<String> {
    let block = strip_leading_bullet(raw);

    let items: Vec<String> = STRATEGIES
        .iter()
        .find_map(|strategy| {
            (strategy.run)(block).map(|items| {
                debug!(strategy = strategy.name, count = items.len(), "segmented list section");
                items
                    .into_iter()
                    .filter(|item| is_real_item(item, strategy.marked))
                    .collect()
            })
        })
        .unwrap_or_default();

    if items.is_empty() {
        fallback(block)
    } else {
        items
    }
}

fn strip_leading_bullet(raw: &str) -> Block<'_> {
    let trimmed = raw.trim();
    match LEADING_BULLET_RE.find(trimmed) {
        Some(m) => {
            let text = trimmed[m.end()..].trim();
            Block {
                text,
                bulleted: true,
                flattened: !text.contains('\n'),
            }
        }
        None => Block {
            text: trimmed,
            bulleted: false,
            flattened: false,
        },
    }
}

fn is_real_item(item: &str, marked: bool) -> bool {
    !item.is_empty() && !BULLET_CHARS.contains(&item) && (marked || item.chars().count() > 1)
}

/// The cleaned block as one item: line markers stripped, artifact lines
/// dropped. Empty when nothing survives.
fn fallback(block: Block<'_>) -> Vec<String> {
    let cleaned = block
        .text
        .lines()
        .map(|line| LINE_PREFIX_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty() && !BULLET_CHARS.contains(&line.as_str()))
        .collect::<Vec<_>>()
        .join("\n");

    if cleaned.is_empty() {
        Vec::new()
    } else {
        vec![cleaned]
    }
}

/// Items start at line-start markers, at the block start when a bullet was
/// stripped, and for a flattened list also at inline separators.
fn marker_groups(block: Block<'_>) -> Option<Vec<String>> {
    let text = block.text;

    // (marker start, content start)
    let mut starts: Vec<(usize, usize)> = LINE_MARKER_RE
        .find_iter(text)
        .map(|m| (m.start(), m.end()))
        .collect();

    if block.bulleted {
        starts.push((0, 0));
    }
    if block.flattened {
        starts.extend(INLINE_MARKER_RE.find_iter(text).map(|m| (m.start(), m.end())));
    }

    if starts.is_empty() {
        return None;
    }

    starts.sort_unstable();
    let mut merged: Vec<(usize, usize)> = Vec::with_capacity(starts.len());
    for (marker, content) in starts {
        match merged.last_mut() {
            // Overlapping matches describe the same marker; keep the longer one.
            Some(last) if marker == last.0 || marker < last.1 => {
                last.1 = last.1.max(content);
            }
            _ => merged.push((marker, content)),
        }
    }

    let items = merged
        .iter()
        .enumerate()
        .map(|(i, &(_, content))| {
            let end = merged.get(i + 1).map_or(text.len(), |next| next.0);
            let body = &text[content..end];
            let body = match BLANK_LINE_RE.find(body) {
                Some(blank) => &body[..blank.start()],
                None => body,
            };
            body.trim().to_string()
        })
        .collect();

    Some(items)
}

fn lines(block: Block<'_>) -> Option<Vec<String>> {
    if !block.text.contains('\n') {
        return None;
    }

    let items = block
        .text
        .lines()
        .map(|line| LINE_PREFIX_RE.replace(line, "").trim().to_string())
        .filter(|line| !line.is_empty())
        .collect();

    Some(items)
}

fn whole_block(block: Block<'_>) -> Option<Vec<String>> {
    Some(vec![block.text.to_string()])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_dash_bullets() {
        assert_eq!(segment_list("- a\n- b\n- c"), vec!["a", "b", "c"]);
    }

    #[test]
    fn test_round_bullets_and_asterisks() {
        assert_eq!(
            segment_list("• first point\n* second point"),
            vec!["first point", "second point"]
        );
    }

    #[test]
    fn test_numbered_items() {
        assert_eq!(
            segment_list("1. Define the schema\n2) Add an index\n10. Benchmark"),
            vec!["Define the schema", "Add an index", "Benchmark"]
        );
    }

    #[test]
    fn test_item_continues_over_lines() {
        assert_eq!(
            segment_list("- Explained the trade-off\n  between latency and cost\n- Gave an example"),
            vec![
                "Explained the trade-off\n  between latency and cost",
                "Gave an example"
            ]
        );
    }

    #[test]
    fn test_blank_line_ends_an_item() {
        assert_eq!(
            segment_list("- Good structure\n\nOverall a solid answer.\n- Clear wording"),
            vec!["Good structure", "Clear wording"]
        );
    }

    #[test]
    fn test_flattened_single_line_list() {
        assert_eq!(
            segment_list("- Clear explanation - Good example"),
            vec!["Clear explanation", "Good example"]
        );
    }

    #[test]
    fn test_hyphen_in_prose_is_not_a_separator() {
        assert_eq!(
            segment_list("Could mention edge cases - especially empty input"),
            vec!["Could mention edge cases - especially empty input"]
        );
    }

    #[test]
    fn test_intro_line_before_bullets_is_dropped() {
        assert_eq!(
            segment_list("You did well on:\n- pacing\n- examples"),
            vec!["pacing", "examples"]
        );
    }

    #[test]
    fn test_plain_lines_fallback() {
        assert_eq!(
            segment_list("Clear structure\n\nGood use of examples\n"),
            vec!["Clear structure", "Good use of examples"]
        );
    }

    #[test]
    fn test_lines_strip_tight_markers() {
        assert_eq!(segment_list("Intro\n-tight\n3.also"), vec!["Intro", "tight", "also"]);
    }

    #[test]
    fn test_single_blob() {
        assert_eq!(
            segment_list("Could mention edge cases"),
            vec!["Could mention edge cases"]
        );
    }

    #[test]
    fn test_bold_text_is_not_a_bullet() {
        assert_eq!(segment_list("**Depth** of answer"), vec!["**Depth** of answer"]);
    }

    #[test]
    fn test_lone_asterisk_yields_empty_list() {
        assert!(segment_list("*").is_empty());
    }

    #[test]
    fn test_empty_section_yields_empty_list() {
        assert!(segment_list("").is_empty());
        assert!(segment_list("  \n ").is_empty());
    }

    #[test]
    fn test_bullets_with_dash_separated_detail_stay_whole() {
        assert_eq!(
            segment_list(
                "- **Clarity** - you explained the trade-offs well\n- **Examples** - concrete and relevant"
            ),
            vec![
                "**Clarity** - you explained the trade-offs well",
                "**Examples** - concrete and relevant"
            ]
        );
    }

    #[test]
    fn test_artifacts_filtered_out() {
        assert_eq!(segment_list("- a\n- real item\n- *"), vec!["a", "real item"]);
    }

    #[test]
    fn test_unmarked_single_characters_dropped() {
        assert_eq!(segment_list("Pacing\nx\nExamples"), vec!["Pacing", "Examples"]);
    }

    #[test]
    fn test_artifact_only_block_keeps_no_markers() {
        assert!(segment_list("- *\n- -").is_empty());
    }

    #[test]
    fn test_all_artifacts_fall_back_to_whole_block() {
        assert_eq!(segment_list("- x"), vec!["x"]);
    }
}
