//! Error types for voicecast

use std::io;
use thiserror::Error;

/// Main error type for voicecast
#[derive(Error, Debug)]
pub enum VoicecastError {
    #[error("Please enter text or upload a file.")]
    EmptyInput,

    #[error("The speech engine reported no voices")]
    NoVoices,

    #[error("Configuration error: {0}")]
    Config(String),

    #[error("Speech synthesis error: {0}")]
    Speech(String),

    #[error("Audio error: {0}")]
    Audio(String),

    #[error("Encoder error: {0}")]
    Encode(String),

    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    #[error("INI parse error: {0}")]
    IniParse(String),

    #[error("{0}")]
    Other(String),
}

/// Result type alias for voicecast operations
pub type Result<T> = std::result::Result<T, VoicecastError>;

impl From<String> for VoicecastError {
    fn from(s: String) -> Self {
        VoicecastError::Other(s)
    }
}

impl From<&str> for VoicecastError {
    fn from(s: &str) -> Self {
        VoicecastError::Other(s.to_string())
    }
}

impl From<hound::Error> for VoicecastError {
    fn from(e: hound::Error) -> Self {
        VoicecastError::Audio(format!("WAV error: {}", e))
    }
}
