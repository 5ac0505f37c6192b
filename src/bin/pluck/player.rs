//! Audio output - plays loaded notes through the default device
//!
//! The scheduler thread pushes trigger commands into a lock-free ring; the
//! cpal callback drains it and mixes every sounding note. Notes are stored at
//! 44.1 kHz and stepped through at the device rate.

use color_eyre::eyre::{eyre, Result as EyreResult, WrapErr};
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use pluck_dsp::{
    dsp::dequantize,
    playback::{Playback, PlaybackError},
    SAMPLE_RATE,
};
use rtrb::{Producer, RingBuffer};
use std::sync::Arc;

/// Notes that can sound at once; the oldest is cut when exceeded.
const MAX_VOICES: usize = 16;
/// Pending triggers between the scheduler and the audio callback.
const COMMAND_CAPACITY: usize = 64;

/// One note being played back
struct Voice {
    samples: Arc<[f32]>,
    position: f64,
}

/// [`Playback`] backed by a cpal output stream
pub struct CpalPlayer {
    notes: Vec<(String, Arc<[f32]>)>,
    commands: Producer<Arc<[f32]>>,
    _stream: cpal::Stream,
}

impl CpalPlayer {
    /// Open the default output device and start a silent stream
    pub fn open() -> EyreResult<Self> {
        let host = cpal::default_host();
        let device = host
            .default_output_device()
            .ok_or_else(|| eyre!("no default output device available"))?;
        let config = device
            .default_output_config()
            .wrap_err("failed to fetch default output config")?;

        let device_rate = config.sample_rate().0 as f64;
        let channels = config.channels() as usize;
        let step = SAMPLE_RATE as f64 / device_rate;

        log::info!(
            "audio output: {} Hz, {} channel(s)",
            config.sample_rate().0,
            channels
        );

        let (commands, mut triggers) = RingBuffer::<Arc<[f32]>>::new(COMMAND_CAPACITY);
        let mut voices: Vec<Voice> = Vec::with_capacity(MAX_VOICES);

        let stream = device
            .build_output_stream(
                &config.into(),
                move |data: &mut [f32], _| {
                    while let Ok(samples) = triggers.pop() {
                        if voices.len() == MAX_VOICES {
                            voices.remove(0);
                        }
                        voices.push(Voice {
                            samples,
                            position: 0.0,
                        });
                    }

                    for frame in data.chunks_mut(channels) {
                        let mut mixed = 0.0f32;
                        for voice in voices.iter_mut() {
                            if let Some(&s) = voice.samples.get(voice.position as usize) {
                                mixed += s;
                            }
                            voice.position += step;
                        }
                        // Mono to all channels
                        frame.fill(mixed.clamp(-1.0, 1.0));
                    }

                    voices.retain(|v| (v.position as usize) < v.samples.len());
                },
                |err| log::error!("audio stream error: {err}"),
                None,
            )
            .wrap_err("failed to build output stream")?;

        stream.play().wrap_err("failed to start output stream")?;

        Ok(Self {
            notes: Vec::new(),
            commands,
            _stream: stream,
        })
    }
}

impl Playback for CpalPlayer {
    fn load(&mut self, id: &str, pcm: &[i16]) -> Result<(), PlaybackError> {
        let samples: Arc<[f32]> = dequantize(pcm).into();
        match self.notes.iter_mut().find(|(name, _)| name == id) {
            Some(slot) => slot.1 = samples,
            None => self.notes.push((id.to_string(), samples)),
        }
        Ok(())
    }

    fn play(&mut self, id: &str) -> Result<(), PlaybackError> {
        let samples = self
            .notes
            .iter()
            .find(|(name, _)| name == id)
            .map(|(_, samples)| samples.clone())
            .ok_or_else(|| PlaybackError::NotLoaded(id.to_string()))?;

        self.commands
            .push(samples)
            .map_err(|_| PlaybackError::Device("trigger queue is full".to_string()))
    }

    fn loaded_ids(&self) -> Vec<String> {
        self.notes.iter().map(|(name, _)| name.clone()).collect()
    }
}
