//! Answer evaluation parser.
//!
//! Turns the free-form evaluation text returned by the model into a
//! [`ParsedEvaluation`]. Parsing is a pure function of the input: it never
//! fails, and absent sections simply leave their field at the default.
//!
//! Pipeline: score extraction (independent) → section extraction → list
//! segmentation for the three list sections → per-field sanitizing.

pub mod headings;
pub mod sanitizer;
pub mod score;
pub mod sections;
pub mod segmenter;

use std::sync::LazyLock;

use serde::{Deserialize, Serialize};

use crate::evaluation::headings::{HeadingTable, ParserConfigError, SectionKind};
use crate::evaluation::sanitizer::{sanitize_follow_up, sanitize_ideal_response, SanitizerOptions};
use crate::evaluation::score::extract_score;
use crate::evaluation::sections::SectionExtractor;
use crate::evaluation::segmenter::segment_list;

/// Structured evaluation, rendered by the client as score out of 5, three
/// bullet lists and two markdown blocks.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ParsedEvaluation {
    /// 0 when no score was found (indistinguishable from a real 0).
    pub score: f64,
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missed_points: Vec<String>,
    pub follow_up: String,
    pub ideal_response: String,
}

/// A compiled parser. Immutable and cheap to share behind an `Arc`.
#[derive(Debug, Clone)]
pub struct EvaluationParser {
    sections: SectionExtractor,
    options: SanitizerOptions,
}

static DEFAULT_PARSER: LazyLock<EvaluationParser> = LazyLock::new(|| {
    EvaluationParser::new(&HeadingTable::default(), SanitizerOptions::default())
        .expect("default heading table compiles")
});

impl EvaluationParser {
    pub fn new(table: &HeadingTable, options: SanitizerOptions) -> Result<Self, ParserConfigError> {
        Ok(Self {
            sections: SectionExtractor::new(table)?,
            options,
        })
    }

    pub fn parse(&self, text: &str) -> ParsedEvaluation {
        let raw = self.sections.extract(text);
        let list = |kind: SectionKind| raw.get(kind).map(segment_list).unwrap_or_default();

        ParsedEvaluation {
            score: extract_score(text),
            strengths: list(SectionKind::Strengths),
            improvements: list(SectionKind::Improvements),
            missed_points: list(SectionKind::MissedPoints),
            follow_up: raw
                .get(SectionKind::FollowUp)
                .map(sanitize_follow_up)
                .unwrap_or_default(),
            ideal_response: raw
                .get(SectionKind::IdealResponse)
                .map(|body| sanitize_ideal_response(body, &self.options))
                .unwrap_or_default(),
        }
    }
}

impl Default for EvaluationParser {
    fn default() -> Self {
        DEFAULT_PARSER.clone()
    }
}

/// Parses with the built-in heading table and default options.
pub fn parse_evaluation(text: &str) -> ParsedEvaluation {
    DEFAULT_PARSER.parse(text)
}
