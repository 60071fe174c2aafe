//! Heading table: the accepted heading variants for each evaluation section.
//!
//! Upstream prompt wording drifts, so the variants live in data rather than
//! in the matching code. The table can be replaced at startup from a JSON file
//! (see `Config::evaluation_headings_path`).

use serde::{Deserialize, Serialize};
use thiserror::Error;

/// The five labeled sections of an evaluation, in canonical order.
///
/// The order is load-bearing: a section's body runs until the heading of any
/// *later* section, so later sections act as stop boundaries for earlier ones.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SectionKind {
    Strengths,
    Improvements,
    MissedPoints,
    FollowUp,
    IdealResponse,
}

impl SectionKind {
    pub const ALL: [SectionKind; 5] = [
        SectionKind::Strengths,
        SectionKind::Improvements,
        SectionKind::MissedPoints,
        SectionKind::FollowUp,
        SectionKind::IdealResponse,
    ];

    pub fn index(self) -> usize {
        match self {
            SectionKind::Strengths => 0,
            SectionKind::Improvements => 1,
            SectionKind::MissedPoints => 2,
            SectionKind::FollowUp => 3,
            SectionKind::IdealResponse => 4,
        }
    }
}

#[derive(Debug, Error)]
pub enum ParserConfigError {
    #[error("heading table has no variants for section {0:?}")]
    EmptyVariants(SectionKind),

    #[error("invalid heading pattern: {0}")]
    Pattern(#[from] regex::Error),

    #[error("failed to read heading table: {0}")]
    Io(#[from] std::io::Error),

    #[error("failed to parse heading table: {0}")]
    Json(#[from] serde_json::Error),
}

/// Accepted heading variants per section.
///
/// Within one list, longer variants must come before their prefixes
/// ("Follow-up Question" before "Follow-up") so the whole heading is consumed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HeadingTable {
    pub strengths: Vec<String>,
    pub improvements: Vec<String>,
    pub missed_points: Vec<String>,
    pub follow_up: Vec<String>,
    pub ideal_response: Vec<String>,
}

const DEFAULT_STRENGTHS: &[&str] = &["Key Strengths", "Strengths"];

const DEFAULT_IMPROVEMENTS: &[&str] = &[
    "Areas for Improvement",
    "Areas to Improve",
    "Improvements",
    "Improvement",
];

const DEFAULT_MISSED_POINTS: &[&str] = &[
    "Key Points Missed",
    "Missed Points",
    "Missing Points",
    "Points Missed",
];

const DEFAULT_FOLLOW_UP: &[&str] = &[
    "Follow-up Question",
    "Follow up Question",
    "Followup Question",
    "Follow-up",
    "Follow up",
    "Followup",
];

const DEFAULT_IDEAL_RESPONSE: &[&str] = &[
    "Ideal Response",
    "Ideal Answer",
    "Model Answer",
    "Sample Answer",
];

fn owned(variants: &[&str]) -> Vec<String> {
    variants.iter().map(|v| v.to_string()).collect()
}

impl Default for HeadingTable {
    fn default() -> Self {
        Self {
            strengths: owned(DEFAULT_STRENGTHS),
            improvements: owned(DEFAULT_IMPROVEMENTS),
            missed_points: owned(DEFAULT_MISSED_POINTS),
            follow_up: owned(DEFAULT_FOLLOW_UP),
            ideal_response: owned(DEFAULT_IDEAL_RESPONSE),
        }
    }
}

impl HeadingTable {
    /// Loads a table from a JSON file with the same field names as this struct.
    pub fn from_json_file(path: &str) -> Result<Self, ParserConfigError> {
        let raw = std::fs::read_to_string(path)?;
        let table: HeadingTable = serde_json::from_str(&raw)?;
        Ok(table)
    }

    pub fn variants(&self, kind: SectionKind) -> &[String] {
        match kind {
            SectionKind::Strengths => &self.strengths,
            SectionKind::Improvements => &self.improvements,
            SectionKind::MissedPoints => &self.missed_points,
            SectionKind::FollowUp => &self.follow_up,
            SectionKind::IdealResponse => &self.ideal_response,
        }
    }

    /// Returns the cleaned variants for a section: trimmed, trailing colon
    /// removed, blanks dropped. Errors if nothing usable is left.
    pub fn normalized(&self, kind: SectionKind) -> Result<Vec<String>, ParserConfigError> {
        let cleaned: Vec<String> = self
            .variants(kind)
            .iter()
            .map(|v| v.trim().trim_end_matches(':').trim_end().to_string())
            .filter(|v| !v.is_empty())
            .collect();

        if cleaned.is_empty() {
            return Err(ParserConfigError::EmptyVariants(kind));
        }
        Ok(cleaned)
    }
}
