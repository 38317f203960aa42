//! MP3 output through the LAME encoder
//!
//! Dependencies:
//! - lame (install with: sudo apt install lame)

use crate::{Result, VoicecastError};
use log::{debug, error};
use std::io::ErrorKind;
use std::path::Path;
use std::process::{Command, Stdio};

/// Encoder run when none is configured
pub const DEFAULT_ENCODER: &str = "lame";

/// Encode a WAV file to MP3 with a LAME-compatible `encoder` program
///
/// The encoder is called as `<encoder> --quiet <wav> <mp3>`.
pub fn encode_mp3(encoder: &str, wav: &Path, mp3: &Path) -> Result<()> {
    debug!("Encoding {:?} -> {:?} with {}", wav, mp3, encoder);

    let output = Command::new(encoder)
        .arg("--quiet")
        .arg(wav)
        .arg(mp3)
        .stdin(Stdio::null())
        .stdout(Stdio::null())
        .stderr(Stdio::piped())
        .output()
        .map_err(|e| {
            if e.kind() == ErrorKind::NotFound {
                VoicecastError::Encode(format!(
                    "{} not found. Install with: sudo apt install lame, or save as WAV",
                    encoder
                ))
            } else {
                error!("Failed to start {}: {}", encoder, e);
                VoicecastError::Encode(format!("Failed to start {}: {}", encoder, e))
            }
        })?;

    if !output.status.success() {
        return Err(VoicecastError::Encode(format!(
            "{} failed: {}",
            encoder,
            String::from_utf8_lossy(&output.stderr).trim()
        )));
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_missing_encoder() {
        let dir = tempfile::tempdir().unwrap();
        let result = encode_mp3(
            "voicecast-missing-encoder",
            &dir.path().join("in.wav"),
            &dir.path().join("out.mp3"),
        );

        match result {
            Err(VoicecastError::Encode(msg)) => {
                assert!(msg.contains("voicecast-missing-encoder not found"), "{}", msg)
            }
            other => panic!("expected an Encode error, got {:?}", other),
        }
        assert!(!dir.path().join("out.mp3").exists());
    }

    #[cfg(unix)]
    #[test]
    fn test_encoder_failure_is_reported() {
        // `false` always exits non-zero
        let dir = tempfile::tempdir().unwrap();
        let result = encode_mp3(
            "false",
            &dir.path().join("in.wav"),
            &dir.path().join("out.mp3"),
        );
        assert!(matches!(result, Err(VoicecastError::Encode(_))));
    }

    #[test]
    fn test_encode_with_lame() {
        let dir = tempfile::tempdir().unwrap();
        let wav = dir.path().join("tone.wav");
        let mp3 = dir.path().join("tone.mp3");

        let spec = hound::WavSpec {
            channels: 1,
            sample_rate: 22050,
            bits_per_sample: 16,
            sample_format: hound::SampleFormat::Int,
        };
        let mut writer = hound::WavWriter::create(&wav, spec).unwrap();
        for i in 0..22050u32 {
            writer.write_sample(((i % 50) as i16 - 25) * 400).unwrap();
        }
        writer.finalize().unwrap();

        match encode_mp3(DEFAULT_ENCODER, &wav, &mp3) {
            Ok(()) => assert!(mp3.metadata().unwrap().len() > 0),
            Err(e) => println!("⚠ lame not available (may be expected): {}", e),
        }
    }
}
