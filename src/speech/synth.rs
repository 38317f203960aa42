//! Speech synthesizer abstraction
//!
//! Provides a unified interface over the speech engines voicecast can
//! drive. Every call blocks: `speak` returns once the line has been
//! spoken and `render_to_wav` once the file is written.

use super::voice::{VoiceId, VoiceInfo};
use crate::platform::is_wsl;
use crate::{Result, VoicecastError};
use log::info;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Slowest rate any backend is asked for, in words per minute
pub const MIN_RATE_WPM: u16 = 80;
/// Fastest rate any backend is asked for, in words per minute
pub const MAX_RATE_WPM: u16 = 450;

/// Speech synthesizer trait
///
/// All backends implement this. A session drives it one script line at
/// a time: select the speaker's voice, set the rate, then speak or
/// render.
pub trait Synth: Send {
    /// Short backend name for logs and `--list-voices`
    fn name(&self) -> &'static str;

    /// Voices the engine offers, in engine order
    fn voices(&mut self) -> Result<Vec<VoiceInfo>>;

    /// Select the voice used for following utterances
    fn set_voice(&mut self, id: &VoiceId) -> Result<()>;

    /// Set speech rate in words per minute
    fn set_rate(&mut self, wpm: u16) -> Result<()>;

    /// Speak text and wait until it has been spoken
    fn speak(&mut self, text: &str) -> Result<()>;

    /// Whether `render_to_wav` is available
    fn can_render(&self) -> bool {
        false
    }

    /// Synthesize text into a WAV file instead of the speakers
    fn render_to_wav(&mut self, _text: &str, _path: &Path) -> Result<()> {
        Err(VoicecastError::Speech(format!(
            "The {} backend cannot save audio to a file",
            self.name()
        )))
    }

    /// Silence anything still playing
    fn stop(&mut self) -> Result<()>;
}

/// Which speech engine to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Backend {
    /// espeak-ng when installed, else the platform engine
    #[default]
    Auto,
    /// Platform engine through the tts crate
    Native,
    /// espeak-ng subprocess
    Espeak,
}

impl FromStr for Backend {
    type Err = VoicecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "auto" => Ok(Backend::Auto),
            "native" => Ok(Backend::Native),
            "espeak" | "espeak-ng" => Ok(Backend::Espeak),
            other => Err(VoicecastError::Config(format!(
                "Unknown backend '{}' (expected auto, native or espeak)",
                other
            ))),
        }
    }
}

impl fmt::Display for Backend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Backend::Auto => "auto",
            Backend::Native => "native",
            Backend::Espeak => "espeak",
        })
    }
}

/// Create a speech synthesizer
///
/// **auto:**
/// 1. espeak-ng (can save audio files; uses WSLg PulseAudio on WSL)
/// 2. Native platform TTS via the tts crate (playback only)
///
/// **native / espeak:** that backend or an error.
pub fn create_synth(backend: Backend) -> Result<Box<dyn Synth>> {
    use super::backends::espeak::EspeakSynth;
    use super::backends::native::NativeSynth;

    match backend {
        Backend::Native => {
            info!("Creating native speech synthesizer");
            Ok(Box::new(NativeSynth::new()?))
        }
        Backend::Espeak => {
            info!("Creating espeak-ng speech synthesizer");
            Ok(Box::new(EspeakSynth::new()?))
        }
        Backend::Auto => {
            if is_wsl() {
                info!("Detected WSL environment");
            }

            info!("Trying espeak-ng backend...");
            match EspeakSynth::new() {
                Ok(synth) => {
                    info!("✓ Successfully initialized espeak-ng backend");
                    return Ok(Box::new(synth));
                }
                Err(e) => {
                    info!("✗ espeak-ng backend unavailable: {}", e);
                }
            }

            info!("Trying native TTS backend...");
            match NativeSynth::new() {
                Ok(synth) => {
                    info!("✓ Successfully initialized native TTS backend");
                    Ok(Box::new(synth))
                }
                Err(e) => Err(VoicecastError::Speech(format!(
                    "No speech backend available on '{}'. Tried:\n\
                     1. espeak-ng (install: sudo apt install espeak-ng)\n\
                     2. Native platform TTS\n\
                     Error: {}",
                    std::env::consts::OS,
                    e
                ))),
            }
        }
    }
}
