use crate::encode::sink::{FrameSink, SinkConfig};
use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::Frame;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::process::{Child, ChildStdin, Command, Stdio};

pub use crate::analysis::decode::is_ffmpeg_on_path;

/// Options for [`FfmpegSink`] MP4 output.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct FfmpegSinkOpts {
    /// Output MP4 file path.
    pub out_path: PathBuf,
    /// Overwrite output file if it already exists.
    pub overwrite: bool,
}

impl FfmpegSinkOpts {
    /// Create options for outputting an MP4 to `out_path`.
    pub fn new(out_path: impl Into<PathBuf>) -> Self {
        Self {
            out_path: out_path.into(),
            overwrite: true,
        }
    }
}

/// Sink that spawns the system `ffmpeg` and streams raw RGB frames to its stdin.
///
/// Output is one H.264 (`yuv420p`) video stream plus, when `SinkConfig.audio` is set, one AAC
/// stream cut from the source audio at `offset_secs` for `duration_secs`.
pub struct FfmpegSink {
    opts: FfmpegSinkOpts,

    child: Option<Child>,
    stdin: Option<ChildStdin>,
    stderr_drain: Option<std::thread::JoinHandle<std::io::Result<Vec<u8>>>>,

    cfg: Option<SinkConfig>,
    last_idx: Option<FrameIndex>,
}

impl FfmpegSink {
    /// Create a new sink that streams into `ffmpeg`.
    pub fn new(opts: FfmpegSinkOpts) -> Self {
        Self {
            opts,
            child: None,
            stdin: None,
            stderr_drain: None,
            cfg: None,
            last_idx: None,
        }
    }

    fn validate(&self, cfg: &SinkConfig) -> VizResult<()> {
        if cfg.fps.num == 0 || cfg.fps.den == 0 {
            return Err(VizError::encoding("fps must be non-zero"));
        }
        if cfg.width == 0 || cfg.height == 0 {
            return Err(VizError::encoding(
                "ffmpeg sink width/height must be non-zero",
            ));
        }
        if !cfg.width.is_multiple_of(2) || !cfg.height.is_multiple_of(2) {
            return Err(VizError::encoding(
                "ffmpeg sink width/height must be even (required for yuv420p mp4 output)",
            ));
        }
        if !cfg.duration_secs.is_finite() || cfg.duration_secs <= 0.0 {
            return Err(VizError::encoding(format!(
                "clip duration must be positive, got {}",
                cfg.duration_secs
            )));
        }
        if let Some(audio) = cfg.audio.as_ref() {
            if !audio.offset_secs.is_finite() || audio.offset_secs < 0.0 {
                return Err(VizError::encoding(format!(
                    "audio offset must be finite and >= 0, got {}",
                    audio.offset_secs
                )));
            }
            if !audio.path.exists() {
                return Err(VizError::encoding(format!(
                    "audio file '{}' does not exist",
                    audio.path.display()
                )));
            }
        }
        if !self.opts.overwrite && self.opts.out_path.exists() {
            return Err(VizError::encoding(format!(
                "output file '{}' already exists",
                self.opts.out_path.display()
            )));
        }
        Ok(())
    }

    fn command(&self, cfg: &SinkConfig) -> Command {
        let duration = format!("{:.6}", cfg.duration_secs);
        let mut cmd = Command::new("ffmpeg");
        cmd.stdin(Stdio::piped())
            .stdout(Stdio::null())
            .stderr(Stdio::piped());

        if self.opts.overwrite {
            cmd.arg("-y");
        } else {
            cmd.arg("-n");
        }

        cmd.args([
            "-loglevel",
            "error",
            "-f",
            "rawvideo",
            "-pix_fmt",
            "rgb24",
            "-s",
            &format!("{}x{}", cfg.width, cfg.height),
        ]);
        push_input_fps(&mut cmd, cfg.fps);
        cmd.args(["-i", "pipe:0"]);

        if let Some(audio) = cfg.audio.as_ref() {
            cmd.args(["-ss", &format!("{:.6}", audio.offset_secs), "-t", &duration, "-i"])
                .arg(&audio.path)
                .args([
                    "-map", "0:v:0", "-map", "1:a:0", "-c:v", "libx264", "-pix_fmt", "yuv420p",
                    "-c:a", "aac",
                ]);
        } else {
            cmd.args(["-an", "-c:v", "libx264", "-pix_fmt", "yuv420p"]);
        }
        cmd.args(["-t", &duration, "-movflags", "+faststart"])
            .arg(&self.opts.out_path);
        cmd
    }

    fn join_stderr(&mut self) -> VizResult<Vec<u8>> {
        match self.stderr_drain.take() {
            Some(handle) => handle
                .join()
                .map_err(|_| VizError::encoding("ffmpeg stderr drain thread panicked"))?
                .map_err(|e| VizError::encoding(format!("ffmpeg stderr read failed: {e}"))),
            None => Ok(Vec::new()),
        }
    }
}

impl FrameSink for FfmpegSink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        self.validate(&cfg)?;
        ensure_parent_dir(&self.opts.out_path)?;

        if !is_ffmpeg_on_path() {
            return Err(VizError::encoding(
                "ffmpeg is required for MP4 encoding, but was not found on PATH",
            ));
        }

        let mut child = self.command(&cfg).spawn().map_err(|e| {
            VizError::encoding(format!(
                "failed to spawn ffmpeg (is it installed and on PATH?): {e}"
            ))
        })?;

        let stdin = child
            .stdin
            .take()
            .ok_or_else(|| VizError::encoding("failed to open ffmpeg stdin (unexpected)"))?;
        let mut stderr = child
            .stderr
            .take()
            .ok_or_else(|| VizError::encoding("failed to open ffmpeg stderr (unexpected)"))?;
        let stderr_drain = std::thread::spawn(move || {
            let mut stderr_bytes = Vec::new();
            stderr.read_to_end(&mut stderr_bytes)?;
            Ok(stderr_bytes)
        });

        tracing::debug!(
            out = %self.opts.out_path.display(),
            width = cfg.width,
            height = cfg.height,
            audio = cfg.audio.is_some(),
            "ffmpeg started"
        );
        self.child = Some(child);
        self.stdin = Some(stdin);
        self.stderr_drain = Some(stderr_drain);
        self.cfg = Some(cfg);
        self.last_idx = None;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> VizResult<()> {
        let cfg = self
            .cfg
            .as_ref()
            .ok_or_else(|| VizError::encoding("ffmpeg sink not started"))?;
        if let Some(last) = self.last_idx
            && idx.0 <= last.0
        {
            return Err(VizError::encoding(
                "ffmpeg sink received out-of-order frame index",
            ));
        }
        self.last_idx = Some(idx);

        if frame.width() != cfg.width || frame.height() != cfg.height {
            return Err(VizError::encoding(format!(
                "frame size mismatch: got {}x{}, expected {}x{}",
                frame.width(),
                frame.height(),
                cfg.width,
                cfg.height
            )));
        }

        let Some(stdin) = self.stdin.as_mut() else {
            return Err(VizError::encoding("ffmpeg sink is already finalized"));
        };

        use std::io::Write as _;
        stdin.write_all(frame.data()).map_err(|e| {
            VizError::encoding(format!("failed to write frame to ffmpeg stdin: {e}"))
        })?;
        Ok(())
    }

    fn end(&mut self) -> VizResult<()> {
        drop(self.stdin.take());
        let mut child = self
            .child
            .take()
            .ok_or_else(|| VizError::encoding("ffmpeg sink not started"))?;

        let status = child.wait().map_err(|e| {
            VizError::encoding(format!("failed to wait for ffmpeg to finish: {e}"))
        })?;
        let stderr_bytes = self.join_stderr()?;

        if !status.success() {
            let stderr = String::from_utf8_lossy(&stderr_bytes);
            return Err(VizError::encoding(format!(
                "ffmpeg exited with status {}: {}",
                status,
                stderr.trim()
            )));
        }

        self.cfg = None;
        Ok(())
    }

    fn abort(&mut self) {
        drop(self.stdin.take());
        if let Some(mut child) = self.child.take() {
            if let Err(e) = child.kill() {
                tracing::debug!(error = %e, "ffmpeg already exited");
            }
            let _ = child.wait();
        }
        match self.join_stderr() {
            Ok(bytes) if !bytes.is_empty() => {
                let stderr = String::from_utf8_lossy(&bytes);
                tracing::warn!(stderr = %stderr.trim(), "ffmpeg aborted");
            }
            Ok(_) => {}
            Err(e) => tracing::debug!(error = %e, "ffmpeg stderr unavailable"),
        }
        self.cfg = None;
    }
}

fn push_input_fps(cmd: &mut Command, fps: Fps) {
    // Rawvideo input rate goes before `-i`.
    cmd.args(["-r", &format!("{}/{}", fps.num, fps.den)]);
}

/// Ensure the parent directory of `path` exists.
pub fn ensure_parent_dir(path: &Path) -> VizResult<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent).map_err(|e| {
            VizError::encoding(format!(
                "failed to create output directory '{}': {e}",
                parent.display()
            ))
        })?;
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::encode::sink::AudioInputConfig;

    fn cfg(width: u32, height: u32) -> SinkConfig {
        SinkConfig {
            width,
            height,
            fps: Fps::integer(24).unwrap(),
            duration_secs: 1.0,
            audio: None,
        }
    }

    fn args(cmd: &Command) -> Vec<String> {
        cmd.get_args()
            .map(|a| a.to_string_lossy().into_owned())
            .collect()
    }

    #[test]
    fn odd_dimensions_are_rejected() {
        let sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
        assert!(matches!(
            sink.validate(&cfg(1601, 900)),
            Err(VizError::Encoding(_))
        ));
        assert!(sink.validate(&cfg(0, 900)).is_err());
        assert!(sink.validate(&cfg(1600, 900)).is_ok());
    }

    #[test]
    fn zero_duration_and_bad_fps_are_rejected() {
        let sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
        let mut c = cfg(16, 16);
        c.duration_secs = 0.0;
        assert!(matches!(sink.validate(&c), Err(VizError::Encoding(_))));

        let mut c = cfg(16, 16);
        c.fps = Fps { num: 0, den: 1 };
        assert!(sink.validate(&c).is_err());
    }

    #[test]
    fn existing_output_is_kept_without_overwrite() {
        let dir = tempfile::tempdir().unwrap();
        let out = dir.path().join("taken.mp4");
        std::fs::write(&out, b"x").unwrap();
        let sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: out,
            overwrite: false,
        });
        assert!(matches!(
            sink.validate(&cfg(16, 16)),
            Err(VizError::Encoding(_))
        ));
    }

    #[test]
    fn unwritable_output_dir_is_encoding_error() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("blocker");
        std::fs::write(&blocker, b"file, not a dir").unwrap();
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new(blocker.join("viz.mp4")));

        let err = sink.begin(cfg(16, 16)).unwrap_err();
        assert!(matches!(err, VizError::Encoding(_)), "{err}");
        assert_eq!(err.stage(), crate::foundation::error::Stage::Encode);
        assert!(err.to_string().contains("blocker"));
    }

    #[test]
    fn missing_audio_is_rejected() {
        let sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
        let mut c = cfg(16, 16);
        c.audio = Some(AudioInputConfig {
            path: "no/such/song.mp3".into(),
            offset_secs: 0.0,
        });
        assert!(matches!(sink.validate(&c), Err(VizError::Encoding(_))));
    }

    #[test]
    fn push_before_begin_fails() {
        let mut sink = FfmpegSink::new(FfmpegSinkOpts::new("out.mp4"));
        let err = sink.push_frame(FrameIndex(0), &Frame::new(2, 2)).unwrap_err();
        assert!(matches!(err, VizError::Encoding(_)));
        assert!(sink.end().is_err());
        sink.abort();
    }

    #[test]
    fn command_trims_audio_to_clip_window() {
        let sink = FfmpegSink::new(FfmpegSinkOpts::new("clip.mp4"));
        let mut c = cfg(1600, 900);
        c.duration_secs = 2.0;
        c.audio = Some(AudioInputConfig {
            path: "song.wav".into(),
            offset_secs: 12.5,
        });
        let a = args(&sink.command(&c));
        let joined = a.join(" ");
        assert!(joined.contains("-pix_fmt rgb24 -s 1600x900 -r 24/1 -i pipe:0"));
        assert!(joined.contains("-ss 12.500000 -t 2.000000 -i song.wav"));
        assert!(joined.contains("-c:v libx264 -pix_fmt yuv420p -c:a aac"));
        assert!(joined.ends_with("-t 2.000000 -movflags +faststart clip.mp4"));
        assert_eq!(a[0], "-y");
    }

    #[test]
    fn command_without_audio_drops_audio_stream() {
        let sink = FfmpegSink::new(FfmpegSinkOpts {
            out_path: "silent.mp4".into(),
            overwrite: false,
        });
        let a = args(&sink.command(&cfg(16, 16)));
        assert_eq!(a[0], "-n");
        assert!(a.iter().any(|x| x == "-an"));
        assert!(!a.iter().any(|x| x == "aac"));
    }
}
