//! Script input loading
//!
//! Scripts come from a text file, from a literal string, or from stdin.
//! The file name (when there is one) later names the saved audio.

use crate::{Result, VoicecastError};
use log::{debug, info};
use std::fs;
use std::io::Read;
use std::path::{Path, PathBuf};

/// Raw script text plus where it came from
#[derive(Debug, Clone)]
pub struct ScriptSource {
    text: String,
    path: Option<PathBuf>,
}

impl ScriptSource {
    /// Read a script file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        info!("Loading script from {:?}", path);
        let text = fs::read_to_string(path)?;
        Ok(Self {
            text,
            path: Some(path.to_path_buf()),
        })
    }

    /// Use pasted text
    pub fn from_text(text: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            path: None,
        }
    }

    /// Read everything from a reader (stdin for the CLI)
    pub fn from_reader<R: Read>(mut reader: R) -> Result<Self> {
        let mut text = String::new();
        reader.read_to_string(&mut text)?;
        debug!("Read {} bytes of script text", text.len());
        Ok(Self::from_text(text))
    }

    /// Script text with surrounding whitespace removed
    ///
    /// Fails with [`VoicecastError::EmptyInput`] when nothing is left.
    pub fn text(&self) -> Result<&str> {
        let text = self.text.trim();
        if text.is_empty() {
            return Err(VoicecastError::EmptyInput);
        }
        Ok(text)
    }

    /// Path of the source file, if the script came from one
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Base name for the saved audio
    ///
    /// The file name up to its first `.`, else the first word of the
    /// text, else `output`.
    pub fn output_stem(&self) -> String {
        let from_file = self
            .path
            .as_deref()
            .and_then(Path::file_name)
            .and_then(|name| name.to_str())
            .and_then(|name| name.split('.').next())
            .filter(|stem| !stem.is_empty());

        let stem = match from_file {
            Some(stem) => stem,
            None => self.text.split_whitespace().next().unwrap_or("output"),
        };

        sanitize_stem(stem)
    }
}

/// Keep the stem a single path component
fn sanitize_stem(stem: &str) -> String {
    stem.chars()
        .map(|c| match c {
            '/' | '\\' | '\0' => '_',
            other => other,
        })
        .collect()
}
