//! How speakers are matched to voices

use super::VoiceMap;
use crate::speech::{Gender, VoiceId, VoiceInfo};
use crate::{Result, VoicecastError};
use log::warn;
use std::fmt;
use std::str::FromStr;

/// Voice selection mode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum VoiceMode {
    /// Every speaker gets their own voice, round-robin
    #[default]
    Dynamic,
    /// Everyone uses the first male voice
    Male,
    /// Everyone uses the first female voice
    Female,
}

impl VoiceMode {
    fn gender(self) -> Option<Gender> {
        match self {
            VoiceMode::Dynamic => None,
            VoiceMode::Male => Some(Gender::Male),
            VoiceMode::Female => Some(Gender::Female),
        }
    }

    /// Pick the voice for `speaker` and record it in `cast`
    ///
    /// Gendered modes fall back to round-robin when no voice matches.
    pub fn select(self, speaker: &str, voices: &[VoiceInfo], cast: &mut VoiceMap) -> Result<VoiceId> {
        if let Some(gender) = self.gender() {
            match voices.iter().find(|v| v.matches_gender(gender)) {
                Some(voice) => return Ok(cast.assign_fixed(speaker, &voice.id)),
                None if !cast.contains(speaker) => {
                    warn!(
                        "No {} voice available, casting {} round-robin",
                        gender.word(),
                        speaker
                    );
                }
                None => {}
            }
        }

        cast.assign(speaker, voices)
    }
}

impl FromStr for VoiceMode {
    type Err = VoicecastError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_lowercase().as_str() {
            "dynamic" | "characters" => Ok(VoiceMode::Dynamic),
            "male" => Ok(VoiceMode::Male),
            "female" => Ok(VoiceMode::Female),
            other => Err(VoicecastError::Config(format!(
                "Unknown voice mode '{}' (expected dynamic, male or female)",
                other
            ))),
        }
    }
}

impl fmt::Display for VoiceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            VoiceMode::Dynamic => "dynamic",
            VoiceMode::Male => "male",
            VoiceMode::Female => "female",
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool() -> Vec<VoiceInfo> {
        vec![
            VoiceInfo::new("f1", "Samantha").with_gender(Gender::Female),
            VoiceInfo::new("m1", "Daniel").with_gender(Gender::Male),
            VoiceInfo::new("f2", "Karen").with_gender(Gender::Female),
        ]
    }

    #[test]
    fn test_male_mode_skips_female_voices() {
        let mut cast = VoiceMap::new();
        let id = VoiceMode::Male.select("Alice", &pool(), &mut cast).unwrap();
        assert_eq!(id.as_str(), "m1");
        assert_eq!(VoiceMode::Male.select("Bob", &pool(), &mut cast).unwrap().as_str(), "m1");
        assert_eq!(cast.len(), 2);
    }

    #[test]
    fn test_female_mode() {
        let mut cast = VoiceMap::new();
        let id = VoiceMode::Female.select("Bob", &pool(), &mut cast).unwrap();
        assert_eq!(id.as_str(), "f1");
    }

    #[test]
    fn test_male_mode_by_name_only() {
        // "female" must not satisfy a male search
        let voices = vec![
            VoiceInfo::new("a", "English Female"),
            VoiceInfo::new("b", "English Male"),
        ];
        let mut cast = VoiceMap::new();
        let id = VoiceMode::Male.select("Bob", &voices, &mut cast).unwrap();
        assert_eq!(id.as_str(), "b");
    }

    #[test]
    fn test_gender_fallback_to_round_robin() {
        let voices = vec![VoiceInfo::new("a", "Robot"), VoiceInfo::new("b", "Droid")];
        let mut cast = VoiceMap::new();
        assert_eq!(VoiceMode::Female.select("X", &voices, &mut cast).unwrap().as_str(), "a");
        assert_eq!(VoiceMode::Female.select("Y", &voices, &mut cast).unwrap().as_str(), "b");
    }

    #[test]
    fn test_dynamic_mode() {
        let mut cast = VoiceMap::new();
        let ids: Vec<String> = ["A", "B", "C", "D"]
            .iter()
            .map(|s| VoiceMode::Dynamic.select(s, &pool(), &mut cast).unwrap().to_string())
            .collect();
        assert_eq!(ids, vec!["f1", "m1", "f2", "f1"]);
    }

    #[test]
    fn test_from_str() {
        assert_eq!("Male".parse::<VoiceMode>().unwrap(), VoiceMode::Male);
        assert_eq!(" female ".parse::<VoiceMode>().unwrap(), VoiceMode::Female);
        assert_eq!("characters".parse::<VoiceMode>().unwrap(), VoiceMode::Dynamic);
        assert!("robot".parse::<VoiceMode>().is_err());
    }
}
