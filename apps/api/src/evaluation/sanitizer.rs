//! Field-specific markdown cleanup.
//!
//! Every rule here is idempotent: running it on its own output is a no-op.

use std::borrow::Cow;
use std::sync::LazyLock;

use regex::Regex;

pub const DEFAULT_CODE_LANGUAGE: &str = "text";

const FENCE: &str = "```";

static H3_PREFIX_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^###(?:[ \t]+|$)").expect("valid regex"));

static INLINE_FENCE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"([^\s`])[ \t]*```").expect("valid regex"));

static STRAY_BACKTICKS_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^`{1,2}([^`]*)$").expect("valid regex"));

/// Strips a leading `###` and emphasis asterisks around a follow-up question.
pub fn sanitize_follow_up(raw: &str) -> String {
    let mut text = raw.trim().to_string();
    loop {
        let next = H3_PREFIX_RE
            .replace(&text, "")
            .trim_matches('*')
            .trim()
            .to_string();
        if next == text {
            return text;
        }
        text = next;
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SanitizerOptions {
    /// Tag inserted into code-fence openers that carry no language.
    pub default_code_language: String,
}

impl Default for SanitizerOptions {
    fn default() -> Self {
        Self {
            default_code_language: DEFAULT_CODE_LANGUAGE.to_string(),
        }
    }
}

type Rule = for<'a> fn(&'a str, &SanitizerOptions) -> Cow<'a, str>;

/// Ideal-response rules in application order.
pub const IDEAL_RESPONSE_RULES: &[(&str, Rule)] = &[
    ("fences_on_own_line", fences_on_own_line),
    ("drop_stray_backticks", drop_stray_backticks),
    ("normalize_fences", normalize_fences),
];

pub fn sanitize_ideal_response(raw: &str, options: &SanitizerOptions) -> String {
    let text = IDEAL_RESPONSE_RULES
        .iter()
        .fold(raw.trim().to_string(), |text, (_, rule)| {
            rule(text.as_str(), options).into_owned()
        });
    text.trim().to_string()
}

/// A triple backtick that follows content on the same line is moved onto its
/// own line, so every fence starts a line.
fn fences_on_own_line<'a>(text: &'a str, _: &SanitizerOptions) -> Cow<'a, str> {
    INLINE_FENCE_RE.replace_all(text, "$1\n```")
}

/// Removes one or two backticks opening a line when nothing on that line
/// closes them.
fn drop_stray_backticks<'a>(text: &'a str, _: &SanitizerOptions) -> Cow<'a, str> {
    if !text.lines().any(|line| STRAY_BACKTICKS_RE.is_match(line)) {
        return Cow::Borrowed(text);
    }

    let cleaned = text
        .split('\n')
        .map(|line| STRAY_BACKTICKS_RE.replace(line, "$1"))
        .collect::<Vec<_>>()
        .join("\n");
    Cow::Owned(cleaned)
}

/// Normalizes fence lines: a lone fence padded with spaces becomes a bare
/// fence, and a bare opener (followed by more lines) gets the default
/// language tag. Closers are left bare.
fn normalize_fences<'a>(text: &'a str, options: &SanitizerOptions) -> Cow<'a, str> {
    let lines: Vec<&str> = text.split('\n').collect();
    let mut out: Vec<Cow<'_, str>> = Vec::with_capacity(lines.len());
    let mut in_fence = false;
    let mut changed = false;

    for (i, &line) in lines.iter().enumerate() {
        let trimmed = line.trim();
        if !trimmed.starts_with(FENCE) {
            out.push(Cow::Borrowed(line));
            continue;
        }

        let is_bare = trimmed == FENCE;
        let normalized: Cow<'_, str> = if in_fence {
            if !is_bare {
                // Fence-like line inside a block with an info string is content.
                out.push(Cow::Borrowed(line));
                continue;
            }
            in_fence = false;
            Cow::Borrowed(FENCE)
        } else {
            in_fence = true;
            let has_more = i + 1 < lines.len();
            if is_bare && has_more {
                Cow::Owned(format!("{FENCE}{}", options.default_code_language))
            } else if is_bare {
                Cow::Borrowed(FENCE)
            } else {
                Cow::Borrowed(line)
            }
        };

        if normalized != line {
            changed = true;
        }
        out.push(normalized);
    }

    if changed {
        Cow::Owned(out.join("\n"))
    } else {
        Cow::Borrowed(text)
    }
}
