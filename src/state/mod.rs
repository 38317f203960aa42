//! Session state
//!
//! A `Session` owns everything one run needs: the speech engine, the
//! voices it offers, the settings, and the cast built up as speakers
//! appear. It is passed around explicitly; nothing here is global.

pub mod config;

use crate::audio::{concat_wavs, encode_mp3, wav_duration, OutputFormat};
use crate::cast::VoiceMap;
use crate::script::ScriptLine;
use crate::speech::{Synth, VoiceId, VoiceInfo};
use crate::{Result, VoicecastError};
use config::Settings;
use log::{debug, info};
use std::path::{Path, PathBuf};

/// One reading of one or more scripts
pub struct Session {
    /// Speech synthesizer doing the talking
    synth: Box<dyn Synth>,

    /// Voices enumerated once at startup, in engine order
    voices: Vec<VoiceInfo>,

    /// Rate, pitch, voice mode and output preferences
    settings: Settings,

    /// Speaker -> voice assignments so far
    cast: VoiceMap,
}

impl Session {
    /// Start a session, enumerating the engine's voices
    pub fn new(mut synth: Box<dyn Synth>, settings: Settings) -> Result<Self> {
        let voices = synth.voices()?;
        if voices.is_empty() {
            return Err(VoicecastError::NoVoices);
        }
        info!(
            "{} backend ready with {} voices",
            synth.name(),
            voices.len()
        );

        Ok(Self {
            synth,
            voices,
            settings,
            cast: VoiceMap::new(),
        })
    }

    pub fn voices(&self) -> &[VoiceInfo] {
        &self.voices
    }

    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    /// Assignments made so far, in first-seen order
    pub fn cast(&self) -> &VoiceMap {
        &self.cast
    }

    /// Voice for `speaker` under the current voice mode
    pub fn voice_for(&mut self, speaker: &str) -> Result<VoiceId> {
        self.settings
            .voice_mode
            .select(speaker, &self.voices, &mut self.cast)
    }

    /// Point the engine at `line`'s speaker
    fn prepare(&mut self, line: &ScriptLine) -> Result<()> {
        let voice = self.voice_for(&line.speaker)?;
        self.synth.set_voice(&voice)?;
        self.synth.set_rate(self.settings.effective_rate())
    }

    /// Speak every line in order, each in its speaker's voice
    ///
    /// Blocks until the last line has been spoken.
    pub fn perform(&mut self, script: &[ScriptLine]) -> Result<()> {
        self.perform_each(script, |_| {})
    }

    /// Like [`Session::perform`], calling `on_line` before each line is spoken
    pub fn perform_each<F>(&mut self, script: &[ScriptLine], mut on_line: F) -> Result<()>
    where
        F: FnMut(&ScriptLine),
    {
        for line in script {
            debug!("Converting {}'s line to speech: {}", line.speaker, line.text);
            on_line(line);
            self.prepare(line)?;
            self.synth.speak(&line.text)?;
        }
        info!("Spoke {} lines", script.len());
        Ok(())
    }

    /// Save the whole script as one recording at `output`
    ///
    /// Lines are rendered separately with their speakers' voices and
    /// joined with `line_gap_ms` of silence. Returns the written path.
    pub fn render(&mut self, script: &[ScriptLine], output: &Path) -> Result<PathBuf> {
        if !self.synth.can_render() {
            return Err(VoicecastError::Speech(format!(
                "The {} backend cannot save audio; use the espeak backend",
                self.synth.name()
            )));
        }
        if script.is_empty() {
            return Err(VoicecastError::EmptyInput);
        }

        let scratch = tempfile::tempdir()?;
        let mut clips = Vec::with_capacity(script.len());

        for (i, line) in script.iter().enumerate() {
            self.prepare(line)?;
            let clip = scratch.path().join(format!("line_{:05}.wav", i));
            debug!("Rendering line {} ({}) to {:?}", i, line.speaker, clip);
            self.synth.render_to_wav(&line.text, &clip)?;
            clips.push(clip);
        }

        let length = match self.settings.format {
            OutputFormat::Wav => {
                concat_wavs(&clips, self.settings.line_gap_ms, output)?;
                wav_duration(output)?
            }
            OutputFormat::Mp3 => {
                let joined = scratch.path().join("joined.wav");
                concat_wavs(&clips, self.settings.line_gap_ms, &joined)?;
                let length = wav_duration(&joined)?;
                encode_mp3(&self.settings.mp3_encoder, &joined, output)?;
                length
            }
        };

        info!(
            "Saved {} lines ({:.1}s) to {:?}",
            script.len(),
            length.as_secs_f64(),
            output
        );
        Ok(output.to_path_buf())
    }

    /// Silence the engine
    pub fn stop(&mut self) -> Result<()> {
        self.synth.stop()
    }
}
