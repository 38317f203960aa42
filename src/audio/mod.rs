//! Saved audio: formats, naming, and file assembly

pub mod mp3;
pub mod wav;

use crate::script::ScriptSource;
use crate::VoicecastError;
use std::fmt;
use std::str::FromStr;

pub use mp3::{encode_mp3, DEFAULT_ENCODER};
pub use wav::{concat_wavs, wav_duration};

/// Format of the saved recording
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OutputFormat {
    #[default]
    Wav,
    Mp3,
}

impl OutputFormat {
    /// File extension, without the dot
    pub fn extension(self) -> &'static str {
        match self {
            OutputFormat::Wav => "wav",
            OutputFormat::Mp3 => "mp3",
        }
    }
}

impl FromStr for OutputFormat {
    type Err = VoicecastError;

    fn from_str(s: &str) -> crate::Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "wav" => Ok(OutputFormat::Wav),
            "mp3" => Ok(OutputFormat::Mp3),
            other => Err(VoicecastError::Config(format!(
                "Unknown output format '{}' (expected wav or mp3)",
                other
            ))),
        }
    }
}

impl fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.extension())
    }
}

/// File name for the recording of `source`, e.g. `act1.mp3`
pub fn output_file_name(source: &ScriptSource, format: OutputFormat) -> String {
    format!("{}.{}", source.output_stem(), format.extension())
}
