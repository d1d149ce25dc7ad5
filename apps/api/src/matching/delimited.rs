//! Response Parser for the delimited-text reply form.
//!
//! The reply is split into sections by a line state machine. Any line that
//! starts with a known label switches state; every other line belongs to the
//! section currently open. Sections may be missing or reordered, and a section
//! whose successor never appears simply runs to the end of the reply.
//!
//! ```text
//! SCORE: 85
//! MATCHES (what fits):
//! - Rust
//! MISSING:
//! - Kubernetes
//! REASONING:
//! Strong backend profile.
//! ```

use std::sync::LazyLock;

use regex::Regex;
use tracing::warn;

use crate::matching::models::{
    clamp_score, JobPosting, MatchResult, INCOMPLETE_ANALYSIS_REASONING, PARSE_FAILURE_REASONING,
};

/// A label line: optional markdown decoration, the label, up to three
/// qualifying words, an optional parenthetical, then a colon (with the rest of
/// the line as content) or the end of the line. Qualifying words are only
/// accepted together with the colon, see `parse_label_line`.
static LABEL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?i)^\s*(?:#+\s*)?(?:\*\*)?\s*(match(?:ing)?\s+score|score|matchningspoäng|matches|matching|matchningar|missing|gaps|saknas|saknade|reasoning|summary|motivering)((?:\s+[\p{L}\-]+){0,3}?)\s*(?:\*\*)?\s*(?:\([^)]*\))?\s*(?:\*\*)?\s*(?:(:)\s*(?:\*\*)?\s*(.*)|$)",
    )
    .expect("valid label regex")
});

/// Bracketed ranges such as `[0-100]` echoed from the template.
static RANGE_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"\[[^\]]*\]").expect("valid range regex"));

static BULLET_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"^(?:[-*•]|\d+\.)\s+(.*)$").expect("valid bullet regex"));

static INTEGER_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"-?\d+").expect("valid integer regex"));

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Section {
    Score,
    Matches,
    Missing,
    Reasoning,
}

impl Section {
    fn from_label(label: &str) -> Self {
        let label = label.to_lowercase();
        if label.contains("score") || label == "matchningspoäng" {
            Section::Score
        } else if label == "matches" || label == "matching" || label == "matchningar" {
            Section::Matches
        } else if matches!(label.as_str(), "missing" | "gaps" | "saknas" | "saknade") {
            Section::Missing
        } else {
            Section::Reasoning
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum ParseState {
    BeforeScore,
    InScore,
    InMatches,
    InMissing,
    InReasoning,
}

impl From<Section> for ParseState {
    fn from(section: Section) -> Self {
        match section {
            Section::Score => ParseState::InScore,
            Section::Matches => ParseState::InMatches,
            Section::Missing => ParseState::InMissing,
            Section::Reasoning => ParseState::InReasoning,
        }
    }
}

/// Body lines of each section. `None` means the section's label never appeared.
#[derive(Debug, Default)]
pub struct Sections<'a> {
    score: Option<Vec<&'a str>>,
    matches: Option<Vec<&'a str>>,
    missing: Option<Vec<&'a str>>,
    reasoning: Option<Vec<&'a str>>,
    labels_seen: usize,
}

impl<'a> Sections<'a> {
    /// Runs the state machine over `raw`.
    pub fn split(raw: &'a str) -> Self {
        let mut sections = Sections::default();
        let mut state = ParseState::BeforeScore;

        for line in raw.lines() {
            if let Some((section, rest)) = parse_label_line(line) {
                sections.labels_seen += 1;
                state = ParseState::from(section);
                let body = sections.open(section);
                if !rest.trim().is_empty() {
                    body.push(rest);
                }
                continue;
            }

            let body = match state {
                ParseState::BeforeScore => continue,
                ParseState::InScore => sections.score.as_mut(),
                ParseState::InMatches => sections.matches.as_mut(),
                ParseState::InMissing => sections.missing.as_mut(),
                ParseState::InReasoning => sections.reasoning.as_mut(),
            };
            if let Some(body) = body {
                body.push(line);
            }
        }

        sections
    }

    /// Opens a section for writing. Lists accumulate across repeated labels;
    /// a repeated score or reasoning label starts over so the last one wins.
    fn open(&mut self, section: Section) -> &mut Vec<&'a str> {
        let (body, restart) = match section {
            Section::Score => (&mut self.score, true),
            Section::Matches => (&mut self.matches, false),
            Section::Missing => (&mut self.missing, false),
            Section::Reasoning => (&mut self.reasoning, true),
        };
        let body = body.get_or_insert_with(Vec::new);
        if restart {
            body.clear();
        }
        body
    }

    /// The section's full body, or `None` when its label never appeared.
    pub fn body(&self, section: Section) -> Option<String> {
        let lines = match section {
            Section::Score => &self.score,
            Section::Matches => &self.matches,
            Section::Missing => &self.missing,
            Section::Reasoning => &self.reasoning,
        };
        lines.as_ref().map(|l| l.join("\n").trim().to_string())
    }

    pub fn labels_seen(&self) -> usize {
        self.labels_seen
    }

    /// First integer in the score section outside bracketed ranges, clamped
    /// to 0..=100.
    pub fn score(&self) -> Option<u8> {
        self.score.as_ref()?.iter().find_map(|line| {
            let line = RANGE_RE.replace_all(line, " ");
            INTEGER_RE
                .find(&line)
                .map(|m| parse_clamped(m.as_str()))
        })
    }
}

fn parse_label_line(line: &str) -> Option<(Section, &str)> {
    let caps = LABEL_RE.captures(line)?;
    let qualified = caps.get(2).is_some_and(|m| !m.as_str().is_empty());
    if qualified && caps.get(3).is_none() {
        // "Missing experience" without a colon is prose, not a header.
        return None;
    }
    let section = Section::from_label(caps.get(1)?.as_str());
    let rest = caps.get(4).map(|m| m.as_str()).unwrap_or("");
    Some((section, rest))
}

fn parse_clamped(digits: &str) -> u8 {
    match digits.parse::<i64>() {
        Ok(value) => clamp_score(value),
        // Overflowing digit runs saturate toward their sign.
        Err(_) if digits.starts_with('-') => 0,
        Err(_) => 100,
    }
}

/// Extracts bullet entries from a block of text.
///
/// A line qualifies when, after trimming, it starts with `-`, `*`, `•` or
/// `<digits>.` followed by whitespace. Non-bullet lines are ignored, nested
/// bullets are flattened, and empty entries are dropped.
pub fn extract_bullets(text: &str) -> Vec<String> {
    text.lines()
        .filter_map(|line| BULLET_RE.captures(line.trim()))
        .filter_map(|caps| caps.get(1))
        .map(|m| m.as_str().trim().to_string())
        .filter(|point| !point.is_empty())
        .collect()
}

/// First paragraph of a body: leading blank lines skipped, stops at the next
/// blank line.
fn first_paragraph(body: &str) -> String {
    body.lines()
        .skip_while(|line| line.trim().is_empty())
        .take_while(|line| !line.trim().is_empty())
        .collect::<Vec<_>>()
        .join("\n")
        .trim()
        .to_string()
}

/// Parses a delimited reply into a `MatchResult`. Never fails: whatever was
/// recovered is kept. A reply with no recognizable label gets the fixed
/// parse-failure reasoning; one without a score or reasoning is marked
/// incomplete.
pub fn parse_delimited(raw: &str, job: &JobPosting) -> MatchResult {
    let mut result = MatchResult::for_job(job);
    let sections = Sections::split(raw);

    let score = sections.score();
    if let Some(score) = score {
        result.score = score;
    }
    if let Some(body) = sections.body(Section::Matches) {
        result.matches = extract_bullets(&body);
    }
    if let Some(body) = sections.body(Section::Missing) {
        result.missing = extract_bullets(&body);
    }
    if let Some(body) = sections.body(Section::Reasoning) {
        result.reasoning = first_paragraph(&body);
    }

    if sections.labels_seen() == 0 {
        warn!(job_id = %job.id, "Delimited reply contained no recognizable labels");
        result.reasoning = PARSE_FAILURE_REASONING.to_string();
    } else if score.is_none() || result.reasoning.is_empty() {
        warn!(
            job_id = %job.id,
            has_score = score.is_some(),
            "Delimited reply is incomplete"
        );
        result.reasoning = if result.reasoning.is_empty() {
            INCOMPLETE_ANALYSIS_REASONING.to_string()
        } else {
            format!("{}\n\n{INCOMPLETE_ANALYSIS_REASONING}", result.reasoning)
        };
    }

    result
}
