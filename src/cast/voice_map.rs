//! Speaker to voice assignments
//!
//! Voices are handed out round-robin the first time a speaker shows up,
//! so a small pool of voices covers any number of characters and the
//! same script always gets the same casting.

use crate::speech::{VoiceId, VoiceInfo};
use crate::{Result, VoicecastError};
use log::debug;
use std::collections::HashMap;

/// Voice assignments for one run
///
/// Entries are only ever added. Iteration follows first-seen order.
#[derive(Debug, Default, Clone)]
pub struct VoiceMap {
    /// Speakers with their voices, in the order they were first seen
    entries: Vec<(String, VoiceId)>,

    /// Speaker -> index into `entries`
    index: HashMap<String, usize>,
}

impl VoiceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Voice for `speaker`, assigning the next one round-robin if unseen
    ///
    /// A new speaker gets `voices[len % voices.len()]`, where `len` is the
    /// number of speakers assigned so far.
    pub fn assign(&mut self, speaker: &str, voices: &[VoiceInfo]) -> Result<VoiceId> {
        if let Some(id) = self.get(speaker) {
            return Ok(id.clone());
        }

        if voices.is_empty() {
            return Err(VoicecastError::NoVoices);
        }

        let id = voices[self.entries.len() % voices.len()].id.clone();
        debug!("Cast {} as voice {}", speaker, id);
        self.insert(speaker, id.clone());
        Ok(id)
    }

    /// Record `speaker` with a voice chosen elsewhere
    ///
    /// Existing assignments are kept; returns the voice the speaker ends
    /// up with.
    pub fn assign_fixed(&mut self, speaker: &str, id: &VoiceId) -> VoiceId {
        if let Some(existing) = self.get(speaker) {
            return existing.clone();
        }
        self.insert(speaker, id.clone());
        id.clone()
    }

    fn insert(&mut self, speaker: &str, id: VoiceId) {
        self.index.insert(speaker.to_string(), self.entries.len());
        self.entries.push((speaker.to_string(), id));
    }

    /// Voice already assigned to `speaker`
    pub fn get(&self, speaker: &str) -> Option<&VoiceId> {
        self.index.get(speaker).map(|&i| &self.entries[i].1)
    }

    pub fn contains(&self, speaker: &str) -> bool {
        self.index.contains_key(speaker)
    }

    /// Number of speakers cast so far
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Assignments in first-seen order
    pub fn iter(&self) -> impl Iterator<Item = (&str, &VoiceId)> {
        self.entries.iter().map(|(s, id)| (s.as_str(), id))
    }
}
