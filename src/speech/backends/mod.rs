//! Speech backends

// Native TTS backend using the tts crate (cross-platform, playback only)
pub mod native;

// espeak-ng subprocess backend (playback and WAV rendering)
pub mod espeak;
