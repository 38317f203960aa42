//! Configuration management

use crate::audio::{OutputFormat, DEFAULT_ENCODER};
use crate::cast::VoiceMode;
use crate::speech::Backend;
use crate::{Result, VoicecastError};
use ini::Ini;
use log::{debug, info, warn};
use std::path::PathBuf;
use std::str::FromStr;

/// Slider range for speech rate, in words per minute
pub const RATE_RANGE: (u16, u16) = (100, 250);
pub const DEFAULT_RATE: u16 = 150;

/// Slider range for pitch; 100 is neutral
pub const PITCH_RANGE: (u16, u16) = (50, 150);
pub const DEFAULT_PITCH: u16 = 100;

pub const DEFAULT_LINE_GAP_MS: u32 = 250;

/// Resolved settings for one run
#[derive(Debug, Clone, PartialEq)]
pub struct Settings {
    /// Words per minute
    pub rate: u16,
    /// Simulated pitch; shifts the rate by 2 wpm per step from 100
    pub pitch: u16,
    pub voice_mode: VoiceMode,
    pub backend: Backend,
    pub format: OutputFormat,
    /// Silence between lines in saved audio
    pub line_gap_ms: u32,
    /// Where saved audio goes
    pub output_dir: PathBuf,
    /// LAME-compatible program used for MP3 output
    pub mp3_encoder: String,
}

/// Per-run values that take precedence over the config file
///
/// `None` leaves the configured value alone.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Overrides {
    pub rate: Option<u16>,
    pub pitch: Option<u16>,
    pub voice_mode: Option<VoiceMode>,
    pub backend: Option<Backend>,
    pub format: Option<OutputFormat>,
}

impl Settings {
    /// Replace configured values with any that were given for this run
    pub fn apply_overrides(&mut self, overrides: &Overrides) {
        if let Some(rate) = overrides.rate {
            self.rate = rate.clamp(RATE_RANGE.0, RATE_RANGE.1);
        }
        if let Some(pitch) = overrides.pitch {
            self.pitch = pitch.clamp(PITCH_RANGE.0, PITCH_RANGE.1);
        }
        if let Some(mode) = overrides.voice_mode {
            self.voice_mode = mode;
        }
        if let Some(backend) = overrides.backend {
            self.backend = backend;
        }
        if let Some(format) = overrides.format {
            self.format = format;
        }
    }

    /// Rate handed to the engine once pitch is folded in
    pub fn effective_rate(&self) -> u16 {
        let rate = self.rate as i32 + (self.pitch as i32 - DEFAULT_PITCH as i32) * 2;
        rate.clamp(
            crate::speech::synth::MIN_RATE_WPM as i32,
            crate::speech::synth::MAX_RATE_WPM as i32,
        ) as u16
    }
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            rate: DEFAULT_RATE,
            pitch: DEFAULT_PITCH,
            voice_mode: VoiceMode::default(),
            backend: Backend::default(),
            format: OutputFormat::default(),
            line_gap_ms: DEFAULT_LINE_GAP_MS,
            output_dir: PathBuf::from("."),
            mp3_encoder: DEFAULT_ENCODER.to_string(),
        }
    }
}

/// Application configuration
///
/// Persistent speech and output preferences, stored as INI.
pub struct Config {
    /// INI configuration storage
    ini: Ini,

    /// Config file path (~/.voicecast.cfg)
    path: PathBuf,
}

impl Config {
    /// Load configuration from ~/.voicecast.cfg, creating it if missing
    pub fn load() -> Result<Self> {
        Self::load_from(Self::config_path())
    }

    /// Load configuration from `path`, creating it with defaults if missing
    pub fn load_from(path: impl Into<PathBuf>) -> Result<Self> {
        let path = path.into();
        debug!("Loading config from {:?}", path);

        let ini = if path.exists() {
            Ini::load_from_file(&path)
                .map_err(|e| VoicecastError::IniParse(format!("Failed to load config: {}", e)))?
        } else {
            info!("Config file not found, creating default");
            let default = Self::default_config();
            default
                .write_to_file(&path)
                .map_err(|e| VoicecastError::IniParse(format!("Failed to write config: {}", e)))?;
            default
        };

        Ok(Self { ini, path })
    }

    /// Save configuration to disk
    pub fn save(&self) -> Result<()> {
        debug!("Saving config to {:?}", self.path);
        self.ini
            .write_to_file(&self.path)
            .map_err(|e| VoicecastError::Config(format!("Failed to save config: {}", e)))
    }

    /// Get config file path (~/.voicecast.cfg)
    fn config_path() -> PathBuf {
        dirs::home_dir()
            .unwrap_or_else(|| PathBuf::from("."))
            .join(".voicecast.cfg")
    }

    /// Expose the config file path for display
    pub fn path(&self) -> &PathBuf {
        &self.path
    }

    /// Create default configuration
    fn default_config() -> Ini {
        let mut ini = Ini::new();

        ini.with_section(Some("speech"))
            .set("rate", DEFAULT_RATE.to_string())
            .set("pitch", DEFAULT_PITCH.to_string())
            .set("voice_mode", VoiceMode::default().to_string())
            .set("backend", Backend::default().to_string());

        ini.with_section(Some("output"))
            .set("format", OutputFormat::default().to_string())
            .set("line_gap_ms", DEFAULT_LINE_GAP_MS.to_string())
            .set("directory", ".")
            .set("mp3_encoder", DEFAULT_ENCODER);

        ini
    }

    /// Get a string value from config
    pub fn get_string(&self, section: &str, key: &str, default: &str) -> String {
        self.ini
            .get_from(Some(section), key)
            .unwrap_or(default)
            .to_string()
    }

    /// Get an integer value from config
    pub fn get_int(&self, section: &str, key: &str, default: i64) -> i64 {
        self.ini
            .get_from(Some(section), key)
            .and_then(|v| v.trim().parse().ok())
            .unwrap_or(default)
    }

    /// Set a value in config
    pub fn set(&mut self, section: &str, key: &str, value: &str) {
        self.ini.with_section(Some(section)).set(key, value);
    }

    /// Parse a value with `FromStr`, warning and using `default` on junk
    fn get_parsed<T: FromStr + Copy>(&self, section: &str, key: &str, default: T) -> T {
        match self.ini.get_from(Some(section), key) {
            None => default,
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                warn!("Ignoring invalid {}.{} = {:?}", section, key, raw);
                default
            }),
        }
    }

    fn get_ranged(&self, section: &str, key: &str, default: u16, range: (u16, u16)) -> u16 {
        let value = self.get_int(section, key, default as i64);
        let clamped = value.clamp(range.0 as i64, range.1 as i64) as u16;
        if clamped as i64 != value {
            warn!(
                "{}.{} = {} is outside {}..={}, using {}",
                section, key, value, range.0, range.1, clamped
            );
        }
        clamped
    }

    /// Speech rate in words per minute
    pub fn rate(&self) -> u16 {
        self.get_ranged("speech", "rate", DEFAULT_RATE, RATE_RANGE)
    }

    /// Simulated pitch (100 = unchanged)
    pub fn pitch(&self) -> u16 {
        self.get_ranged("speech", "pitch", DEFAULT_PITCH, PITCH_RANGE)
    }

    pub fn voice_mode(&self) -> VoiceMode {
        self.get_parsed("speech", "voice_mode", VoiceMode::default())
    }

    pub fn backend(&self) -> Backend {
        self.get_parsed("speech", "backend", Backend::default())
    }

    pub fn format(&self) -> OutputFormat {
        self.get_parsed("output", "format", OutputFormat::default())
    }

    /// Silence between lines in saved audio
    pub fn line_gap_ms(&self) -> u32 {
        self.get_int("output", "line_gap_ms", DEFAULT_LINE_GAP_MS as i64)
            .clamp(0, 10_000) as u32
    }

    pub fn output_dir(&self) -> PathBuf {
        PathBuf::from(self.get_string("output", "directory", "."))
    }

    /// Program used to encode MP3 output
    pub fn mp3_encoder(&self) -> String {
        match self.get_string("output", "mp3_encoder", DEFAULT_ENCODER).trim() {
            "" => DEFAULT_ENCODER.to_string(),
            encoder => encoder.to_string(),
        }
    }

    /// Write `settings` back into the config (call [`Config::save`] to persist)
    pub fn store(&mut self, settings: &Settings) {
        self.set("speech", "rate", &settings.rate.to_string());
        self.set("speech", "pitch", &settings.pitch.to_string());
        self.set("speech", "voice_mode", &settings.voice_mode.to_string());
        self.set("speech", "backend", &settings.backend.to_string());
        self.set("output", "format", &settings.format.to_string());
        self.set("output", "line_gap_ms", &settings.line_gap_ms.to_string());
        self.set("output", "directory", &settings.output_dir.to_string_lossy());
        self.set("output", "mp3_encoder", &settings.mp3_encoder);
    }

    /// All settings resolved with defaults
    pub fn settings(&self) -> Settings {
        Settings {
            rate: self.rate(),
            pitch: self.pitch(),
            voice_mode: self.voice_mode(),
            backend: self.backend(),
            format: self.format(),
            line_gap_ms: self.line_gap_ms(),
            output_dir: self.output_dir(),
            mp3_encoder: self.mp3_encoder(),
        }
    }
}
