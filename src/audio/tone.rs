//! Cue sound synthesis
//!
//! Both cues are a pair of sine notes with a short linear fade, encoded as a
//! 16-bit mono PCM WAV file so any browser `<audio>` element can play them.

use std::f32::consts::PI;

use super::Cue;

pub const SAMPLE_RATE: u32 = 22_050;
const FADE_SECONDS: f32 = 0.02;
const AMPLITUDE: f32 = 0.4;

/// A sequence of notes, each a frequency in Hz held for a number of seconds
#[derive(Debug, Clone, PartialEq)]
pub struct Tone {
    pub notes: Vec<(f32, f32)>,
}

impl Tone {
    /// Rising fifth for the start of a working phase
    pub fn work_start() -> Self {
        Self { notes: vec![(523.25, 0.18), (783.99, 0.28)] }
    }

    /// Falling fifth for the end of a working phase
    pub fn phase_end() -> Self {
        Self { notes: vec![(783.99, 0.18), (523.25, 0.28)] }
    }

    pub fn for_cue(cue: Cue) -> Self {
        match cue {
            Cue::WorkStart => Self::work_start(),
            Cue::PhaseEnd => Self::phase_end(),
        }
    }

    /// Render the notes as samples in `-1.0..=1.0`
    pub fn samples(&self) -> Vec<f32> {
        let mut samples = Vec::new();

        for &(freq, duration) in &self.notes {
            let count = (SAMPLE_RATE as f32 * duration) as usize;
            for i in 0..count {
                let t = i as f32 / SAMPLE_RATE as f32;
                let envelope = if t < FADE_SECONDS {
                    t / FADE_SECONDS
                } else if t > duration - FADE_SECONDS {
                    ((duration - t) / FADE_SECONDS).max(0.0)
                } else {
                    1.0
                };
                samples.push((t * freq * 2.0 * PI).sin() * AMPLITUDE * envelope);
            }
        }

        samples
    }

    /// Encode as a RIFF/WAVE file
    pub fn to_wav(&self) -> Vec<u8> {
        let samples = self.samples();
        let data_len = (samples.len() * 2) as u32;
        let mut wav = Vec::with_capacity(44 + data_len as usize);

        wav.extend_from_slice(b"RIFF");
        wav.extend_from_slice(&(36 + data_len).to_le_bytes());
        wav.extend_from_slice(b"WAVE");

        wav.extend_from_slice(b"fmt ");
        wav.extend_from_slice(&16u32.to_le_bytes());
        wav.extend_from_slice(&1u16.to_le_bytes()); // PCM
        wav.extend_from_slice(&1u16.to_le_bytes()); // mono
        wav.extend_from_slice(&SAMPLE_RATE.to_le_bytes());
        wav.extend_from_slice(&(SAMPLE_RATE * 2).to_le_bytes());
        wav.extend_from_slice(&2u16.to_le_bytes());
        wav.extend_from_slice(&16u16.to_le_bytes());

        wav.extend_from_slice(b"data");
        wav.extend_from_slice(&data_len.to_le_bytes());
        for sample in samples {
            let pcm = (sample.clamp(-1.0, 1.0) * i16::MAX as f32) as i16;
            wav.extend_from_slice(&pcm.to_le_bytes());
        }

        wav
    }
}

/// Pre-rendered WAV files for both cues, built once at startup
#[derive(Debug, Clone)]
pub struct CueSounds {
    pub start: Vec<u8>,
    pub finish: Vec<u8>,
}

impl CueSounds {
    pub fn render() -> Self {
        Self {
            start: Tone::for_cue(Cue::WorkStart).to_wav(),
            finish: Tone::for_cue(Cue::PhaseEnd).to_wav(),
        }
    }

    pub fn get(&self, cue: Cue) -> &[u8] {
        match cue {
            Cue::WorkStart => &self.start,
            Cue::PhaseEnd => &self.finish,
        }
    }
}
