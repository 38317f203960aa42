//! Dialogue script parsing
//!
//! A script is plain text where each line is either `Name: what they say`
//! or narration. Blank lines carry no speech and are dropped.

use log::debug;
use once_cell::sync::Lazy;
use regex::Regex;

/// Speaker used for lines with no `Name:` prefix
pub const NARRATOR: &str = "Narrator";

/// `Name: dialogue`, where the name is a single word
static DIALOGUE_PATTERN: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"^(\w+):\s*(.+)").expect("dialogue pattern is valid"));

/// One spoken line of a script
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScriptLine {
    /// Character name, or [`NARRATOR`]
    pub speaker: String,
    /// What gets spoken
    pub text: String,
}

impl ScriptLine {
    pub fn new(speaker: impl Into<String>, text: impl Into<String>) -> Self {
        Self {
            speaker: speaker.into(),
            text: text.into(),
        }
    }
}

/// Parse a single trimmed, non-empty line
fn parse_line(line: &str) -> ScriptLine {
    match DIALOGUE_PATTERN.captures(line) {
        Some(caps) => ScriptLine::new(&caps[1], &caps[2]),
        None => ScriptLine::new(NARRATOR, line),
    }
}

/// Characters that end a line: `\n`, `\r` (so `\r\n` too), vertical
/// tab, form feed, the file/group/record separators, NEL, and the Unicode
/// line and paragraph separators
fn is_line_break(c: char) -> bool {
    matches!(
        c,
        '\n' | '\r' | '\x0b' | '\x0c' | '\x1c' | '\x1d' | '\x1e' | '\u{85}' | '\u{2028}' | '\u{2029}'
    )
}

/// Split text into lines on any line break
///
/// A `\r\n` pair yields an empty piece between the two characters; empty
/// lines are dropped by the parser anyway.
pub fn split_lines(text: &str) -> impl Iterator<Item = &str> {
    text.split(is_line_break)
}

/// Parse raw script text into speaker/line pairs, in input order
pub fn parse_script(text: &str) -> Vec<ScriptLine> {
    parse_lines(split_lines(text))
}

/// Parse already-split lines
///
/// Each line is trimmed before matching; lines that are empty after
/// trimming are skipped. Any text parses.
pub fn parse_lines<'a, I>(lines: I) -> Vec<ScriptLine>
where
    I: IntoIterator<Item = &'a str>,
{
    let script: Vec<ScriptLine> = lines
        .into_iter()
        .map(str::trim)
        .filter(|line| !line.is_empty())
        .map(parse_line)
        .collect();

    debug!("Parsed {} script lines", script.len());
    script
}
