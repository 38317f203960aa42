//! Speech synthesis system

pub mod backends;
pub mod synth;
pub mod voice;

pub use synth::{create_synth, Backend, Synth};
pub use voice::{Gender, VoiceId, VoiceInfo};
