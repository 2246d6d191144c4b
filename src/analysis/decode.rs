use crate::foundation::error::{VizError, VizResult};
use std::path::Path;
use std::process::{Command, Stdio};

/// Decode a window of `path` to mono `f32` PCM at `sample_rate` using the system `ffmpeg`.
///
/// `duration_secs = None` decodes to the end of the file.
pub(crate) fn decode_mono_f32(
    path: &Path,
    sample_rate: u32,
    offset_secs: f64,
    duration_secs: Option<f64>,
) -> VizResult<Vec<f32>> {
    if sample_rate == 0 {
        return Err(VizError::input("decode sample_rate must be > 0"));
    }
    if !path.exists() {
        return Err(VizError::analysis(format!(
            "audio file '{}' does not exist",
            path.display()
        )));
    }
    if !is_ffmpeg_on_path() {
        return Err(VizError::analysis(
            "ffmpeg is required for audio decoding, but was not found on PATH",
        ));
    }

    let mut cmd = Command::new("ffmpeg");
    cmd.args(["-v", "error", "-ss", &format!("{offset_secs:.6}")]);
    if let Some(d) = duration_secs {
        cmd.args(["-t", &format!("{d:.6}")]);
    }
    cmd.arg("-i")
        .arg(path)
        .args([
            "-vn",
            "-f",
            "f32le",
            "-acodec",
            "pcm_f32le",
            "-ac",
            "1",
            "-ar",
            &sample_rate.to_string(),
            "pipe:1",
        ])
        .stdin(Stdio::null());

    let out = cmd.output().map_err(|e| {
        VizError::analysis(format!("failed to run ffmpeg for audio decode: {e}"))
    })?;
    if !out.status.success() {
        return Err(VizError::analysis(format!(
            "ffmpeg audio decode failed for '{}': {}",
            path.display(),
            String::from_utf8_lossy(&out.stderr).trim()
        )));
    }

    pcm_from_f32le(&out.stdout)
}

fn pcm_from_f32le(bytes: &[u8]) -> VizResult<Vec<f32>> {
    if !bytes.len().is_multiple_of(4) {
        return Err(VizError::analysis(
            "decoded audio byte length is not aligned to f32 samples",
        ));
    }
    Ok(bytes
        .chunks_exact(4)
        .map(|c| f32::from_le_bytes([c[0], c[1], c[2], c[3]]))
        .collect())
}

/// Return `true` when `ffmpeg` can be invoked from `PATH`.
pub fn is_ffmpeg_on_path() -> bool {
    Command::new("ffmpeg")
        .arg("-version")
        .stdout(Stdio::null())
        .stderr(Stdio::null())
        .status()
        .map(|s| s.success())
        .unwrap_or(false)
}
