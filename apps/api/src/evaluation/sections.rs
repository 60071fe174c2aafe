//! Section extraction: locates labeled sections in a free-form evaluation.
//!
//! Each section's heading is resolved once: a heading at the start of a line
//! wins over mid-sentence mentions of the same words. A section then runs up
//! to the nearest resolved heading of any later section (canonical order), or
//! to the end of the text.

use regex::{Match, Regex};

use crate::evaluation::headings::{HeadingTable, ParserConfigError, SectionKind};

/// Optional emphasis/colon tail consumed after a heading word:
/// `Strengths:`, `**Strengths:**`, `**Strengths**:`.
const HEADING_TAIL: &str = r"(?:\*\*|__)?[ \t]*:?(?:\*\*|__)?";

/// Optional markdown lead-in consumed before a heading word:
/// `### `, `2. `, `**`.
const HEADING_LEAD: &str = r"(?:#{1,6}[ \t]*)?(?:\d+[.)][ \t]*)?(?:\*\*|__)?";

/// Compiled matchers for one section's heading variants.
#[derive(Debug, Clone)]
struct HeadingMatcher {
    line_start: Regex,
    anywhere: Regex,
}

impl HeadingMatcher {
    fn new(variants: &[String]) -> Result<Self, ParserConfigError> {
        let alternatives = variants
            .iter()
            .map(|v| regex::escape(v))
            .collect::<Vec<_>>()
            .join("|");
        let heading = format!(r"{HEADING_LEAD}\b(?:{alternatives})\b{HEADING_TAIL}");

        Ok(Self {
            line_start: Regex::new(&format!(r"(?im)^[ \t]*{heading}"))?,
            anywhere: Regex::new(&format!(r"(?i){heading}"))?,
        })
    }

    fn find<'t>(&self, text: &'t str) -> Option<Match<'t>> {
        self.line_start
            .find(text)
            .or_else(|| self.anywhere.find(text))
    }
}

/// Raw, trimmed section bodies indexed by [`SectionKind`]. `None` means the
/// heading never appeared.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct RawSections<'a> {
    bodies: [Option<&'a str>; 5],
}

impl<'a> RawSections<'a> {
    pub fn get(&self, kind: SectionKind) -> Option<&'a str> {
        self.bodies[kind.index()]
    }
}

#[derive(Debug, Clone)]
pub struct SectionExtractor {
    matchers: Vec<HeadingMatcher>,
}

impl SectionExtractor {
    pub fn new(table: &HeadingTable) -> Result<Self, ParserConfigError> {
        let matchers = SectionKind::ALL
            .iter()
            .map(|&kind| HeadingMatcher::new(&table.normalized(kind)?))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { matchers })
    }

    pub fn extract<'a>(&self, text: &'a str) -> RawSections<'a> {
        let headings: Vec<Option<Match<'a>>> =
            self.matchers.iter().map(|m| m.find(text)).collect();

        let mut sections = RawSections::default();
        for (i, heading) in headings.iter().enumerate() {
            let Some(heading) = heading else {
                continue;
            };
            let start = heading.end();
            let end = next_boundary(&headings[i + 1..], start).unwrap_or(text.len());
            sections.bodies[i] = Some(text[start..end].trim());
        }

        sections
    }
}

/// Start of the earliest of `later` headings found at or after `from`.
fn next_boundary(later: &[Option<Match<'_>>], from: usize) -> Option<usize> {
    later
        .iter()
        .flatten()
        .map(|m| m.start())
        .filter(|&start| start >= from)
        .min()
}
