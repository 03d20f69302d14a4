//! Audio test fixture generator
//!
//! Writes small mono WAV files with an exact frame count so duration
//! arithmetic in the tests stays exact.

use std::path::Path;

/// Configuration for generated audio
#[derive(Debug, Clone)]
pub struct AudioConfig {
    pub num_frames: u32,
    pub sample_rate: u32,
}

/// Generate a mono 16-bit WAV file with exactly `num_frames` frames.
pub fn generate_test_wav(path: &Path, config: &AudioConfig) -> anyhow::Result<()> {
    let spec = hound::WavSpec {
        channels: 1,
        sample_rate: config.sample_rate,
        bits_per_sample: 16,
        sample_format: hound::SampleFormat::Int,
    };

    let mut writer = hound::WavWriter::create(path, spec)?;
    for i in 0..config.num_frames {
        // Simple tone; the content is irrelevant, only the length matters.
        let sample = ((i as f64 * 0.05).sin() * 8000.0) as i16;
        writer.write_sample(sample)?;
    }
    writer.finalize()?;

    Ok(())
}
