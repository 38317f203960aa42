//! Character casting: which voice reads which speaker

pub mod mode;
pub mod voice_map;

pub use mode::VoiceMode;
pub use voice_map::VoiceMap;
