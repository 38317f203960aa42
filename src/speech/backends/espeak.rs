//! espeak-ng backend
//!
//! Drives the `espeak-ng` command line tool. Each utterance is one
//! blocking process; `-w` writes the same speech to a WAV file, which is
//! what makes saving a cast recording possible.
//!
//! Dependencies:
//! - espeak-ng (install with: sudo apt install espeak-ng)
//! - PulseAudio for playback (WSLg provides one at /mnt/wslg/PulseServer)

use crate::platform::is_wsl;
use crate::speech::synth::{MAX_RATE_WPM, MIN_RATE_WPM};
use crate::speech::voice::{Gender, VoiceId, VoiceInfo};
use crate::speech::Synth;
use crate::{Result, VoicecastError};
use log::{debug, error, info, warn};
use std::collections::HashSet;
use std::io::Write;
use std::path::Path;
use std::process::{Command, Stdio};

/// Default rate in words per minute
const DEFAULT_RATE_WPM: u16 = 150;

/// espeak-ng subprocess backend
pub struct EspeakSynth {
    /// Selected espeak voice (`-v`)
    voice: String,

    /// Cached rate setting (wpm)
    rate: u16,

    /// Path to espeak-ng
    espeak_path: String,
}

impl EspeakSynth {
    /// Setup PulseAudio server environment
    ///
    /// Auto-detects the WSLg PulseAudio server and sets PULSE_SERVER if
    /// needed.
    fn setup_pulseaudio() -> Result<()> {
        const WSLG_PULSE_PATH: &str = "/mnt/wslg/PulseServer";

        if std::env::var("PULSE_SERVER").is_ok() {
            debug!("PULSE_SERVER already set via environment");
            return Ok(());
        }

        if Path::new(WSLG_PULSE_PATH).exists() {
            info!("Auto-detected WSLG PulseAudio server at {}", WSLG_PULSE_PATH);
            std::env::set_var("PULSE_SERVER", WSLG_PULSE_PATH);
            return Ok(());
        }

        if is_wsl() {
            // Rendering to files still works without a sound server
            warn!("WSLG PulseAudio server not found at {}", WSLG_PULSE_PATH);
            warn!("Playback may be silent; set PULSE_SERVER to fix it");
        }

        Ok(())
    }

    /// Create a new espeak-ng synthesizer
    ///
    /// Verifies espeak-ng is installed
    pub fn new() -> Result<Self> {
        debug!("Creating espeak-ng backend");

        Self::setup_pulseaudio()?;

        let espeak_path = Self::find_espeak()?;
        debug!("Found espeak-ng at: {}", espeak_path);

        Ok(Self {
            voice: "en".to_string(),
            rate: DEFAULT_RATE_WPM,
            espeak_path,
        })
    }

    /// Find espeak-ng executable
    fn find_espeak() -> Result<String> {
        let paths = ["espeak-ng", "/usr/bin/espeak-ng", "/usr/local/bin/espeak-ng"];

        for path in paths {
            if let Ok(status) = Command::new(path)
                .arg("--version")
                .stdout(Stdio::null())
                .stderr(Stdio::null())
                .status()
            {
                if status.success() {
                    return Ok(path.to_string());
                }
            }
        }

        Err(VoicecastError::Speech(
            "espeak-ng not found. Install with: sudo apt install espeak-ng".to_string(),
        ))
    }

    /// Run espeak-ng on `text`, optionally writing a WAV instead of playing
    fn run(&self, text: &str, wav: Option<&Path>) -> Result<()> {
        let mut cmd = Command::new(&self.espeak_path);
        cmd.arg("-v").arg(&self.voice);
        cmd.arg("-s").arg(self.rate.to_string());
        if let Some(path) = wav {
            cmd.arg("-w").arg(path);
        }
        // Text goes through stdin so lines starting with '-' aren't options
        cmd.arg("--stdin");
        cmd.stdin(Stdio::piped());
        cmd.stdout(Stdio::null());
        cmd.stderr(Stdio::piped());

        let mut child = cmd.spawn().map_err(|e| {
            error!("Failed to spawn espeak-ng: {}", e);
            VoicecastError::Speech(format!("Failed to start espeak-ng: {}", e))
        })?;

        if let Some(mut stdin) = child.stdin.take() {
            stdin.write_all(text.as_bytes())?;
        }

        let output = child.wait_with_output()?;
        if !output.status.success() {
            let stderr = String::from_utf8_lossy(&output.stderr);
            return Err(VoicecastError::Speech(format!(
                "espeak-ng failed: {}",
                stderr.trim()
            )));
        }

        Ok(())
    }
}

/// Parse the table printed by `espeak-ng --voices`
///
/// ```text
/// Pty Language       Age/Gender VoiceName          File                 Other Languages
///  5  en-us           --/M      English_(America)  gmw/en-US            (en 3)
/// ```
///
/// The language column is the id passed back to `-v`. Duplicate
/// languages keep their first row.
pub fn parse_voice_list(output: &str) -> Vec<VoiceInfo> {
    let mut seen = HashSet::new();
    let mut voices = Vec::new();

    for line in output.lines().skip(1) {
        let fields: Vec<&str> = line.split_whitespace().collect();
        if fields.len() < 4 {
            continue;
        }

        let language = fields[1];
        if !seen.insert(language.to_string()) {
            continue;
        }

        let gender = match fields[2].rsplit('/').next() {
            Some("M") => Some(Gender::Male),
            Some("F") => Some(Gender::Female),
            _ => None,
        };

        let mut voice = VoiceInfo::new(language, fields[3].replace('_', " "))
            .with_language(language);
        voice.gender = gender;
        voices.push(voice);
    }

    voices
}

impl Synth for EspeakSynth {
    fn name(&self) -> &'static str {
        "espeak"
    }

    fn voices(&mut self) -> Result<Vec<VoiceInfo>> {
        let output = Command::new(&self.espeak_path)
            .arg("--voices")
            .output()
            .map_err(|e| VoicecastError::Speech(format!("Failed to list voices: {}", e)))?;

        if !output.status.success() {
            return Err(VoicecastError::Speech(format!(
                "espeak-ng --voices failed: {}",
                String::from_utf8_lossy(&output.stderr).trim()
            )));
        }

        let voices = parse_voice_list(&String::from_utf8_lossy(&output.stdout));
        debug!("espeak-ng offers {} voices", voices.len());
        Ok(voices)
    }

    fn set_voice(&mut self, id: &VoiceId) -> Result<()> {
        debug!("Setting voice to {}", id);
        self.voice = id.as_str().to_string();
        Ok(())
    }

    fn set_rate(&mut self, wpm: u16) -> Result<()> {
        debug!("Setting rate to {} wpm", wpm);
        self.rate = wpm.clamp(MIN_RATE_WPM, MAX_RATE_WPM);
        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }
        debug!("Speaking: {}", text);
        self.run(text, None)
    }

    fn can_render(&self) -> bool {
        true
    }

    fn render_to_wav(&mut self, text: &str, path: &Path) -> Result<()> {
        debug!("Rendering {} chars to {:?}", text.len(), path);
        self.run(text, Some(path))
    }

    fn stop(&mut self) -> Result<()> {
        // Every utterance has already finished by the time speak returns
        Ok(())
    }
}
