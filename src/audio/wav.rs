//! WAV stitching for saved recordings
//!
//! Each script line is rendered to its own clip; the clips are written
//! back to back into one file with a short silence between lines.

use crate::{Result, VoicecastError};
use hound::{SampleFormat, WavReader, WavSpec, WavWriter};
use log::{debug, warn};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Concatenate WAV clips into `output`
///
/// All clips must share one format. `gap_ms` of silence goes between
/// consecutive clips, not after the last. Every clip is checked before
/// `output` is created, and a failed write removes the partial file.
pub fn concat_wavs(inputs: &[PathBuf], gap_ms: u32, output: &Path) -> Result<()> {
    let first = inputs
        .first()
        .ok_or_else(|| VoicecastError::Audio("Nothing to write: no clips".to_string()))?;
    let spec = WavReader::open(first)?.spec();
    for path in &inputs[1..] {
        if WavReader::open(path)?.spec() != spec {
            return Err(VoicecastError::Audio(format!(
                "{:?} has a different format than {:?}",
                path, first
            )));
        }
    }

    debug!(
        "Joining {} clips ({} Hz, {} ch, {}-bit) into {:?}",
        inputs.len(),
        spec.sample_rate,
        spec.channels,
        spec.bits_per_sample,
        output
    );

    let result = write_joined(inputs, &spec, gap_ms, output);
    if result.is_err() {
        if let Err(e) = fs::remove_file(output) {
            warn!("Could not remove partial {:?}: {}", output, e);
        }
    }
    result
}

fn write_joined(inputs: &[PathBuf], spec: &WavSpec, gap_ms: u32, output: &Path) -> Result<()> {
    let gap_samples = silence_samples(spec, gap_ms);
    let mut writer = WavWriter::create(output, *spec)?;

    for (i, path) in inputs.iter().enumerate() {
        if i > 0 {
            write_silence(&mut writer, spec, gap_samples)?;
        }

        let mut reader = WavReader::open(path)?;
        match spec.sample_format {
            SampleFormat::Float => {
                for sample in reader.samples::<f32>() {
                    writer.write_sample(sample?)?;
                }
            }
            SampleFormat::Int => {
                for sample in reader.samples::<i32>() {
                    writer.write_sample(sample?)?;
                }
            }
        }
    }

    writer.finalize()?;
    Ok(())
}

/// Interleaved sample count for `gap_ms` of audio
fn silence_samples(spec: &WavSpec, gap_ms: u32) -> u64 {
    spec.sample_rate as u64 * gap_ms as u64 / 1000 * spec.channels as u64
}

fn write_silence<W>(writer: &mut WavWriter<W>, spec: &WavSpec, samples: u64) -> Result<()>
where
    W: std::io::Write + std::io::Seek,
{
    for _ in 0..samples {
        match spec.sample_format {
            SampleFormat::Float => writer.write_sample(0.0f32)?,
            SampleFormat::Int => writer.write_sample(0i32)?,
        }
    }
    Ok(())
}

/// Playing time of a WAV file
pub fn wav_duration(path: &Path) -> Result<Duration> {
    let reader = WavReader::open(path)?;
    let frames = reader.duration() as u64;
    let rate = reader.spec().sample_rate as u64;
    if rate == 0 {
        return Ok(Duration::ZERO);
    }
    Ok(Duration::from_millis(frames * 1000 / rate))
}
