//! voicecast - dialogue scripts read aloud
//!
//! Parses `Character: line` scripts, gives every character a stable
//! synthesized voice, and plays or saves the result.

pub mod audio;
pub mod cast;
pub mod error;
pub mod platform;
pub mod script;
pub mod speech;
pub mod state;

pub use error::{Result, VoicecastError};

/// Version information
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
pub const APP_NAME: &str = "voicecast";
