//! Instruction parsing
//!
//! Extracts an ordered sequence of placement commands and a parts summary
//! from unstructured generator text. The generator gives no structural
//! guarantee, so parsing is defensive throughout: unparseable step lines
//! become skip diagnostics, markdown noise is stripped, and the parser
//! itself never fails: a hopeless response just yields a plan with zero
//! placements, which the caller decides what to do with.
//!
//! Step lines follow the grammar
//!
//! ```text
//! Step <n>: Place <W>x<L> <color> <brick type...> at (<x>,<y>,<z>)[, [facing ]<orientation>]
//! ```
//!
//! matched case-insensitively by a small hand-written cursor over each
//! line. Both orientation vocabularies are normalized here; this is the
//! single point where they are reconciled.

use crate::brick::{BrickPlacement, BrickSize, Orientation, Position};
use serde::Serialize;
use std::fmt;

/// Parser output for one generator response. Created once per response and
/// discarded after validation; all derived state lives elsewhere.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct BuildPlan {
    /// First free-text line before the summary marker, if any.
    pub description: Option<String>,
    /// Recognized placements, in instruction order.
    pub placements: Vec<BrickPlacement>,
    /// Cleaned lines following the summary marker, kept verbatim. Never
    /// semantically parsed here; quantities are a presentation concern.
    pub parts_summary: Vec<String>,
    /// Step-shaped lines that could not be parsed.
    pub skipped: Vec<ParseSkip>,
}

/// Diagnostic for a line that looked like a step but could not be parsed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ParseSkip {
    /// 1-based line number in the source text.
    pub line_number: usize,
    /// The offending line, as received.
    pub line: String,
    pub reason: SkipReason,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum SkipReason {
    /// A production of the step grammar failed; names the missing piece.
    MalformedStep(String),
    /// Orientation token outside the closed set.
    InvalidOrientation(String),
}

impl fmt::Display for SkipReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SkipReason::MalformedStep(what) => write!(f, "malformed step line ({})", what),
            SkipReason::InvalidOrientation(tok) => {
                write!(f, "unknown orientation token {:?}", tok)
            }
        }
    }
}

/// Parse one generator response into a [`BuildPlan`]. Infallible; degrades
/// to fewer recognized placements.
pub fn parse_instructions(text: &str) -> BuildPlan {
    let mut plan = BuildPlan::default();
    let mut in_summary = false;

    for (idx, raw) in text.lines().enumerate() {
        let line = clean_markup(raw);
        if line.is_empty() {
            continue;
        }

        if in_summary {
            plan.parts_summary.push(line);
            continue;
        }

        if is_summary_marker(&line) {
            in_summary = true;
            continue;
        }

        if looks_like_step(&line) {
            match parse_step_line(&line) {
                Ok(placement) => plan.placements.push(placement),
                Err(reason) => plan.skipped.push(ParseSkip {
                    line_number: idx + 1,
                    line: raw.trim().to_string(),
                    reason,
                }),
            }
        } else if plan.description.is_none() {
            plan.description = Some(line);
        }
        // Remaining free text before the marker is discarded.
    }

    plan
}

/// Strip bullet and bold markers so markdown-adorned responses parse the
/// same as plain ones.
fn clean_markup(line: &str) -> String {
    let without_bold = line.replace("**", "");
    let mut rest = without_bold.trim();
    loop {
        let stripped = rest
            .trim_start_matches(['-', '*', '•', '>'])
            .trim_start();
        if stripped == rest {
            break;
        }
        rest = stripped;
    }
    rest.to_string()
}

fn is_summary_marker(line: &str) -> bool {
    let lower = line.to_lowercase();
    lower.contains("parts used summary") || lower.contains("parts summary")
}

/// Whether a line is an *attempted* step: `Step <n>` prefix. Lines that
/// pass this but fail the full grammar are recorded as skips; everything
/// else is free text.
fn looks_like_step(line: &str) -> bool {
    let mut cur = Cursor::new(line);
    if !cur.keyword("step") {
        return false;
    }
    cur.char('#');
    cur.integer().is_some()
}

fn parse_step_line(line: &str) -> Result<BrickPlacement, SkipReason> {
    let malformed = |what: &str| SkipReason::MalformedStep(what.to_string());
    let mut cur = Cursor::new(line);

    if !cur.keyword("step") {
        return Err(malformed("step keyword"));
    }
    cur.char('#');
    let sequence_index = cur
        .integer()
        .filter(|n| *n > 0)
        .ok_or_else(|| malformed("step number"))?;
    if !cur.char(':') {
        return Err(malformed("colon after step number"));
    }
    if !cur.keyword("place") {
        return Err(malformed("place keyword"));
    }

    let width = cur
        .integer()
        .filter(|n| *n > 0)
        .ok_or_else(|| malformed("brick width"))?;
    if !cur.char('x') && !cur.char('X') {
        return Err(malformed("size separator"));
    }
    let length = cur
        .integer()
        .filter(|n| *n > 0)
        .ok_or_else(|| malformed("brick length"))?;

    let color = cur.word().ok_or_else(|| malformed("color"))?.to_string();

    // Brick type runs until the `at` keyword and may span several words
    // ("corner plate").
    let mut type_words: Vec<&str> = Vec::new();
    loop {
        if cur.keyword("at") {
            break;
        }
        match cur.word() {
            Some(word) => type_words.push(word),
            None => return Err(malformed("at keyword")),
        }
    }
    if type_words.is_empty() {
        return Err(malformed("brick type"));
    }

    if !cur.char('(') {
        return Err(malformed("opening parenthesis"));
    }
    let x = cur.integer().ok_or_else(|| malformed("x coordinate"))?;
    if !cur.char(',') {
        return Err(malformed("comma after x"));
    }
    let y = cur.integer().ok_or_else(|| malformed("y coordinate"))?;
    if !cur.char(',') {
        return Err(malformed("comma after y"));
    }
    let z = cur.integer().ok_or_else(|| malformed("z coordinate"))?;
    if !cur.char(')') {
        return Err(malformed("closing parenthesis"));
    }

    // Orientation is optional: the generator's first-draft format omits it
    // entirely, and corrections write `, facing <token>`.
    cur.char(',');
    cur.keyword("facing");
    let orientation = match cur.word() {
        None => Orientation::AlongX,
        Some(token) => {
            let token = token.trim_matches(|c: char| matches!(c, ',' | '.' | ';' | '!'));
            if token.is_empty() {
                Orientation::AlongX
            } else {
                Orientation::from_token(token)
                    .map_err(|err| SkipReason::InvalidOrientation(err.0))?
            }
        }
    };

    Ok(BrickPlacement {
        sequence_index: sequence_index as u32,
        size: BrickSize::new(width as u32, length as u32),
        color,
        brick_type: type_words.join(" "),
        position: Position::new(x, y, z),
        orientation,
    })
}

/// Cheap cursor over a single line. All consumption is left to right; each
/// method skips leading whitespace before matching.
#[derive(Clone, Copy)]
struct Cursor<'a> {
    rest: &'a str,
}

impl<'a> Cursor<'a> {
    fn new(line: &'a str) -> Self {
        Self { rest: line }
    }

    fn skip_ws(&mut self) {
        self.rest = self.rest.trim_start();
    }

    /// Consume a keyword case-insensitively. The keyword must end at a
    /// non-alphanumeric boundary so `at` never matches inside `attic`.
    fn keyword(&mut self, keyword: &str) -> bool {
        self.skip_ws();
        if self.rest.len() < keyword.len()
            || !self.rest[..keyword.len()].eq_ignore_ascii_case(keyword)
        {
            return false;
        }
        let after = &self.rest[keyword.len()..];
        if after
            .chars()
            .next()
            .is_some_and(|c| c.is_ascii_alphanumeric())
        {
            return false;
        }
        self.rest = after;
        true
    }

    fn char(&mut self, c: char) -> bool {
        self.skip_ws();
        match self.rest.strip_prefix(c) {
            Some(rest) => {
                self.rest = rest;
                true
            }
            None => false,
        }
    }

    /// A decimal integer with optional leading minus.
    fn integer(&mut self) -> Option<i32> {
        self.skip_ws();
        let bytes = self.rest.as_bytes();
        let mut end = usize::from(bytes.first() == Some(&b'-'));
        let digits_start = end;
        while bytes.get(end).is_some_and(u8::is_ascii_digit) {
            end += 1;
        }
        if end == digits_start {
            return None;
        }
        let value = self.rest[..end].parse().ok()?;
        self.rest = &self.rest[end..];
        Some(value)
    }

    /// Next whitespace-delimited word.
    fn word(&mut self) -> Option<&'a str> {
        self.skip_ws();
        let end = self
            .rest
            .find(char::is_whitespace)
            .unwrap_or(self.rest.len());
        if end == 0 {
            return None;
        }
        let (word, rest) = self.rest.split_at(end);
        self.rest = rest;
        Some(word)
    }
}
