//! Script loading and parsing

pub mod input;
pub mod parser;

pub use input::ScriptSource;
pub use parser::{parse_lines, parse_script, split_lines, ScriptLine, NARRATOR};
