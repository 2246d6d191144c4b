//! Moodwave renders audio-reactive, mood-themed visualization videos.
//!
//! A job takes the features of an audio window ([`AudioAnalysis`]) and a [`MoodLabel`], picks
//! one of three rendering strategies at random and streams the resulting 1600x900 frames, with
//! the matching slice of the source audio, into an encoder:
//!
//! - Analyse audio with an [`AudioAnalyzer`] (or deserialize an [`AudioAnalysis`])
//! - Classify lyrics with a [`MoodClassifier`] through [`mood_for_lyrics`]
//! - Render with a [`VisualizationDirector`] into an MP4 or any [`FrameSink`]
#![forbid(unsafe_code)]
#![deny(missing_docs)]

mod foundation;

pub(crate) mod analysis;
/// Encoding sinks and the clip sampler.
pub mod encode;
pub(crate) mod mood;
pub(crate) mod particles;
pub(crate) mod render;
pub(crate) mod session;

pub use crate::foundation::core::{
    Canvas, ClipTiming, FRAME_CANVAS, Fps, FrameIndex, Point, Rgb, Vec2,
};
pub use crate::foundation::error::{Stage, VizError, VizResult};

pub use crate::analysis::AudioAnalysis;
pub use crate::analysis::analyzer::{AnalyzerOpts, AudioAnalyzer, FfmpegAnalyzer};
pub use crate::encode::clip::encode_clip;
pub use crate::encode::ffmpeg::{FfmpegSink, FfmpegSinkOpts, is_ffmpeg_on_path};
pub use crate::encode::sink::{
    AudioInputConfig, FrameRecord, FrameSink, InMemorySink, SinkConfig,
};
pub use crate::mood::classify::{
    FixedMood, LexiconMoodClassifier, MAX_LYRICS_CHARS, MoodClassifier, mood_for_lyrics,
};
pub use crate::mood::label::MoodLabel;
pub use crate::mood::palette::{ColorPair, ColorScheme, MoodPalette, SchemeLayout};
pub use crate::particles::system::{ParticleSystem, SpawnConfig};
pub use crate::particles::{
    BoundaryPolicy, MotionConfig, Shape, ShapeKind, ShapeSprite, VisualModel,
};
pub use crate::render::frame::Frame;
pub use crate::render::strategy::{FrameRenderer, StrategyKind, renderer_for};
pub use crate::session::director::{DirectorOpts, RenderReport, VisualizationDirector};
