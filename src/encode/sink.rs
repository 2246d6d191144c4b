use crate::foundation::core::{Fps, FrameIndex};
use crate::foundation::error::VizResult;
use crate::render::frame::Frame;
use std::path::PathBuf;

/// Configuration provided to a [`FrameSink`] before the first frame.
#[derive(Debug, Clone, PartialEq)]
pub struct SinkConfig {
    /// Frame width in pixels.
    pub width: u32,
    /// Frame height in pixels.
    pub height: u32,
    /// Output frames-per-second.
    pub fps: Fps,
    /// Clip length in seconds; the output is cut to this length.
    pub duration_secs: f64,
    /// Source audio to mux alongside the frames.
    pub audio: Option<AudioInputConfig>,
}

/// Audio track for sinks that mux sound.
#[derive(Debug, Clone, PartialEq)]
pub struct AudioInputConfig {
    /// Any container/codec `ffmpeg` can read.
    pub path: PathBuf,
    /// Where the clip starts in the source, in seconds. The sink takes `duration_secs` from here.
    pub offset_secs: f64,
}

/// Sink contract for consuming rendered frames in timeline order.
///
/// `push_frame` is called with strictly increasing indices. After a failure anywhere in the clip
/// the producer calls `abort` instead of `end`.
pub trait FrameSink: Send {
    /// Called once before any frames are pushed.
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()>;
    /// Push one frame.
    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> VizResult<()>;
    /// Called once after the last frame; finalizes the output.
    fn end(&mut self) -> VizResult<()>;
    /// Release resources after a failure. Partial output is left in place.
    fn abort(&mut self) {}
}

/// What [`InMemorySink`] keeps per frame.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameRecord {
    /// Frame position.
    pub index: FrameIndex,
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
    /// `xxh3` digest of the RGB bytes.
    pub digest: u64,
}

/// Sink that records frame metadata and digests, for tests and dry runs.
#[derive(Debug, Default)]
pub struct InMemorySink {
    cfg: Option<SinkConfig>,
    records: Vec<FrameRecord>,
    ended: bool,
    aborted: bool,
}

impl InMemorySink {
    /// Create an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Configuration captured in `begin`, if any.
    pub fn config(&self) -> Option<&SinkConfig> {
        self.cfg.as_ref()
    }

    /// Recorded frames in push order.
    pub fn records(&self) -> &[FrameRecord] {
        &self.records
    }

    /// `true` once `end` was called.
    pub fn ended(&self) -> bool {
        self.ended
    }

    /// `true` once `abort` was called.
    pub fn aborted(&self) -> bool {
        self.aborted
    }
}

impl FrameSink for InMemorySink {
    fn begin(&mut self, cfg: SinkConfig) -> VizResult<()> {
        self.cfg = Some(cfg);
        self.records.clear();
        self.ended = false;
        self.aborted = false;
        Ok(())
    }

    fn push_frame(&mut self, idx: FrameIndex, frame: &Frame) -> VizResult<()> {
        self.records.push(FrameRecord {
            index: idx,
            width: frame.width(),
            height: frame.height(),
            digest: xxhash_rust::xxh3::xxh3_64(frame.data()),
        });
        Ok(())
    }

    fn end(&mut self) -> VizResult<()> {
        self.ended = true;
        Ok(())
    }

    fn abort(&mut self) {
        self.aborted = true;
    }
}
