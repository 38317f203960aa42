//! Voice descriptions shared by all backends

use std::fmt;

/// Opaque identifier a backend uses to select one of its voices
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct VoiceId(String);

impl VoiceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for VoiceId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for VoiceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

impl From<String> for VoiceId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Voice gender as reported by the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Gender {
    Male,
    Female,
}

impl Gender {
    /// Word used for this gender in voice names
    pub fn word(self) -> &'static str {
        match self {
            Gender::Male => "male",
            Gender::Female => "female",
        }
    }
}

/// One voice the engine offers
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct VoiceInfo {
    pub id: VoiceId,
    /// Human-readable name
    pub name: String,
    /// `None` when the engine doesn't say
    pub gender: Option<Gender>,
    /// Language tag such as `en-us`
    pub language: Option<String>,
}

impl VoiceInfo {
    pub fn new(id: impl Into<VoiceId>, name: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            gender: None,
            language: None,
        }
    }

    pub fn with_gender(mut self, gender: Gender) -> Self {
        self.gender = Some(gender);
        self
    }

    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = Some(language.into());
        self
    }

    /// Does this voice look like the given gender?
    ///
    /// Uses the engine's gender when known, otherwise looks for the
    /// gender as a whole word in the name so "female" never counts as
    /// "male".
    pub fn matches_gender(&self, gender: Gender) -> bool {
        match self.gender {
            Some(g) => g == gender,
            None => self
                .name
                .to_lowercase()
                .split(|c: char| !c.is_alphanumeric())
                .any(|word| word == gender.word()),
        }
    }
}

impl fmt::Display for VoiceInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({})", self.name, self.id)?;
        if let Some(gender) = self.gender {
            write!(f, " {}", gender.word())?;
        }
        if let Some(language) = &self.language {
            write!(f, " [{}]", language)?;
        }
        Ok(())
    }
}
