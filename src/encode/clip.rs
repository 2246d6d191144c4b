use crate::encode::sink::{AudioInputConfig, FrameSink, SinkConfig};
use crate::foundation::core::{Canvas, ClipTiming, FrameIndex};
use crate::foundation::error::{VizError, VizResult};
use crate::render::frame::Frame;

/// Sample `frame_fn` at `i / fps` for `i in 0..round(duration * fps)` and stream each frame into
/// `sink`. Returns the number of frames written.
///
/// Frames are produced and pushed one at a time. On any failure the sink is aborted and the
/// error returned; a zero-frame clip is an encoding error and never reaches the sink.
pub fn encode_clip(
    frame_fn: &mut dyn FnMut(f64) -> VizResult<Frame>,
    timing: ClipTiming,
    canvas: Canvas,
    audio: Option<AudioInputConfig>,
    sink: &mut dyn FrameSink,
) -> VizResult<u64> {
    let frames = timing.frame_count();
    if frames == 0 {
        return Err(VizError::encoding(format!(
            "clip of {:.3}s at {} fps has no frames",
            timing.duration_secs,
            timing.fps.as_f64()
        )));
    }

    let cfg = SinkConfig {
        width: canvas.width,
        height: canvas.height,
        fps: timing.fps,
        duration_secs: timing.duration_secs,
        audio,
    };
    if let Err(e) = sink.begin(cfg) {
        sink.abort();
        return Err(e);
    }

    for i in 0..frames {
        let idx = FrameIndex(i);
        let pushed = frame_fn(timing.time_at(idx)).and_then(|frame| sink.push_frame(idx, &frame));
        if let Err(e) = pushed {
            sink.abort();
            return Err(e);
        }
    }

    sink.end()?;
    Ok(frames)
}
