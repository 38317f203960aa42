//! Native TTS backend using the tts crate
//!
//! This backend uses the `tts` crate which provides a unified interface to:
//! - Speech Dispatcher on Linux
//! - AVFoundation on macOS
//! - WinRT / SAPI on Windows
//!
//! It plays through the system engine and cannot write audio files.

use crate::speech::synth::{MAX_RATE_WPM, MIN_RATE_WPM};
use crate::speech::voice::{Gender, VoiceId, VoiceInfo};
use crate::speech::Synth;
use crate::{Result, VoicecastError};
use log::{debug, error, warn};
use std::thread;
use std::time::Duration;
use tts::Tts as TtsCrate;

/// Rate that maps onto the engine's normal rate
const NORMAL_RATE_WPM: u16 = 150;

/// Id reported when the engine can't enumerate voices
const DEFAULT_VOICE_ID: &str = "default";

/// How often to check whether an utterance has finished
const SPEAKING_POLL: Duration = Duration::from_millis(20);

/// Native TTS backend using the tts crate
pub struct NativeSynth {
    /// The tts crate's TTS instance
    tts: TtsCrate,

    /// Voices as last enumerated, kept for id lookups
    voices: Vec<tts::Voice>,
}

impl NativeSynth {
    /// Create a new native TTS synthesizer
    pub fn new() -> Result<Self> {
        debug!("Creating native TTS backend");

        let tts = TtsCrate::default()
            .map_err(|e| VoicecastError::Speech(format!("Failed to initialize TTS: {}", e)))?;

        debug!("Native TTS backend created successfully");

        Ok(Self {
            tts,
            voices: Vec::new(),
        })
    }

    fn to_voice_info(voice: &tts::Voice) -> VoiceInfo {
        let mut info = VoiceInfo::new(voice.id(), voice.name())
            .with_language(voice.language().to_string());
        info.gender = voice.gender().map(|g| match g {
            tts::Gender::Male => Gender::Male,
            tts::Gender::Female => Gender::Female,
        });
        info
    }

    fn wait_until_done(&self) -> Result<()> {
        if !self.tts.supported_features().is_speaking {
            return Ok(());
        }

        loop {
            let speaking = self
                .tts
                .is_speaking()
                .map_err(|e| VoicecastError::Speech(format!("Failed to poll speech: {}", e)))?;
            if !speaking {
                return Ok(());
            }
            thread::sleep(SPEAKING_POLL);
        }
    }
}

/// Map words per minute onto the engine's rate range
///
/// `NORMAL_RATE_WPM` lands on `normal`, the wpm limits on `min` and `max`.
pub fn scale_rate(wpm: u16, min: f32, normal: f32, max: f32) -> f32 {
    let wpm = wpm.clamp(MIN_RATE_WPM, MAX_RATE_WPM) as f32;
    let normal_wpm = NORMAL_RATE_WPM as f32;

    let rate = if wpm <= normal_wpm {
        let span = normal_wpm - MIN_RATE_WPM as f32;
        normal - (normal - min) * (normal_wpm - wpm) / span
    } else {
        let span = MAX_RATE_WPM as f32 - normal_wpm;
        normal + (max - normal) * (wpm - normal_wpm) / span
    };

    rate.clamp(min.min(max), max.max(min))
}

impl Synth for NativeSynth {
    fn name(&self) -> &'static str {
        "native"
    }

    fn voices(&mut self) -> Result<Vec<VoiceInfo>> {
        if !self.tts.supported_features().voice {
            warn!("Voice selection not supported on this platform");
            return Ok(vec![VoiceInfo::new(DEFAULT_VOICE_ID, "System default")]);
        }

        self.voices = self
            .tts
            .voices()
            .map_err(|e| VoicecastError::Speech(format!("Failed to get voices: {}", e)))?;

        debug!("Native engine offers {} voices", self.voices.len());
        Ok(self.voices.iter().map(Self::to_voice_info).collect())
    }

    fn set_voice(&mut self, id: &VoiceId) -> Result<()> {
        if id.as_str() == DEFAULT_VOICE_ID && self.voices.is_empty() {
            return Ok(());
        }

        match self.voices.iter().find(|v| v.id() == id.as_str()) {
            Some(voice) => {
                debug!("Selecting voice: {}", id);
                self.tts
                    .set_voice(voice)
                    .map_err(|e| VoicecastError::Speech(format!("Failed to set voice: {}", e)))?;
                Ok(())
            }
            None => Err(VoicecastError::Speech(format!("Unknown voice '{}'", id))),
        }
    }

    fn set_rate(&mut self, wpm: u16) -> Result<()> {
        debug!("Setting rate to {} wpm", wpm);

        if !self.tts.supported_features().rate {
            warn!("Rate control not supported on this platform");
            return Ok(());
        }

        let rate = scale_rate(
            wpm,
            self.tts.min_rate(),
            self.tts.normal_rate(),
            self.tts.max_rate(),
        );
        self.tts
            .set_rate(rate)
            .map_err(|e| VoicecastError::Speech(format!("Failed to set rate: {}", e)))?;

        Ok(())
    }

    fn speak(&mut self, text: &str) -> Result<()> {
        if text.is_empty() {
            return Ok(());
        }

        debug!("Speaking: {}", text);
        self.tts.speak(text, false).map_err(|e| {
            error!("Failed to speak: {}", e);
            VoicecastError::Speech(format!("Speak failed: {}", e))
        })?;

        self.wait_until_done()
    }

    fn stop(&mut self) -> Result<()> {
        debug!("Stopping speech");
        if !self.tts.supported_features().stop {
            return Ok(());
        }
        self.tts.stop().map_err(|e| {
            error!("Failed to stop speech: {}", e);
            VoicecastError::Speech(format!("Stop failed: {}", e))
        })?;

        Ok(())
    }
}
