use crate::shared::constants::TRANSCRIPTION_SAMPLE_RATE;

/// Decoded audio: interleaved PCM samples normalized to [-1.0, 1.0].
#[derive(Clone, Debug)]
pub struct AudioSegment {
    samples: Vec<f32>,
    sample_rate: u32,
    channels: u16,
}

impl AudioSegment {
    pub fn new(samples: Vec<f32>, sample_rate: u32, channels: u16) -> Self {
        Self {
            samples,
            sample_rate,
            channels: channels.max(1),
        }
    }

    pub fn samples(&self) -> &[f32] {
        &self.samples
    }

    pub fn sample_rate(&self) -> u32 {
        self.sample_rate
    }

    pub fn channels(&self) -> u16 {
        self.channels
    }

    pub fn frame_count(&self) -> usize {
        self.samples.len() / self.channels as usize
    }

    pub fn duration(&self) -> f64 {
        if self.sample_rate == 0 {
            return 0.0;
        }
        self.frame_count() as f64 / self.sample_rate as f64
    }

    /// Collapses to one channel. Stereo is summed with a √2 gain and halved;
    /// any other layout keeps only the first channel.
    pub fn to_mono(&self) -> AudioSegment {
        let ch = self.channels as usize;
        let samples = match ch {
            1 => self.samples.clone(),
            2 => self
                .samples
                .chunks_exact(2)
                .map(|f| (std::f32::consts::SQRT_2 * (f[0] + f[1])) / 2.0)
                .collect(),
            _ => self.samples.chunks_exact(ch).map(|f| f[0]).collect(),
        };
        AudioSegment::new(samples, self.sample_rate, 1)
    }

    /// Linear-interpolation resample of a mono segment.
    pub fn resampled(&self, target_rate: u32) -> AudioSegment {
        let mono = if self.channels == 1 {
            self.clone()
        } else {
            self.to_mono()
        };
        if mono.sample_rate == target_rate || mono.sample_rate == 0 {
            return mono;
        }
        if mono.samples.is_empty() {
            return AudioSegment::new(Vec::new(), target_rate, 1);
        }

        let ratio = mono.sample_rate as f64 / target_rate as f64;
        let out_len = (mono.samples.len() as f64 / ratio).floor() as usize;
        let last = mono.samples.len() - 1;
        let samples = (0..out_len)
            .map(|i| {
                let pos = i as f64 * ratio;
                let idx = (pos.floor() as usize).min(last);
                let frac = (pos - idx as f64) as f32;
                let next = mono.samples[(idx + 1).min(last)];
                mono.samples[idx] + (next - mono.samples[idx]) * frac
            })
            .collect();
        AudioSegment::new(samples, target_rate, 1)
    }

    /// Mono at the recognizer's expected rate.
    pub fn for_recognition(&self) -> AudioSegment {
        self.resampled(TRANSCRIPTION_SAMPLE_RATE)
    }
}
