use std::sync::Arc;

use super::{Playback, PlaybackError};

/// In-memory [`Playback`] that keeps loaded assets and logs every trigger.
///
/// Used when rendering without an audio device, and as the stand-in player
/// in tests.
#[derive(Debug, Default, Clone)]
pub struct SampleBank {
    assets: Vec<(String, Arc<[i16]>)>,
    played: Vec<String>,
}

impl SampleBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// PCM data loaded under `id`.
    pub fn get(&self, id: &str) -> Option<&[i16]> {
        self.assets
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, pcm)| &pcm[..])
    }

    /// Ids passed to successful `play` calls, in order.
    pub fn played(&self) -> &[String] {
        &self.played
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }
}

impl Playback for SampleBank {
    fn load(&mut self, id: &str, pcm: &[i16]) -> Result<(), PlaybackError> {
        let pcm: Arc<[i16]> = Arc::from(pcm);
        match self.assets.iter_mut().find(|(name, _)| name == id) {
            Some(slot) => slot.1 = pcm,
            None => self.assets.push((id.to_string(), pcm)),
        }
        Ok(())
    }

    fn play(&mut self, id: &str) -> Result<(), PlaybackError> {
        if self.get(id).is_none() {
            return Err(PlaybackError::NotLoaded(id.to_string()));
        }
        self.played.push(id.to_string());
        Ok(())
    }

    fn loaded_ids(&self) -> Vec<String> {
        self.assets.iter().map(|(name, _)| name.clone()).collect()
    }
}
