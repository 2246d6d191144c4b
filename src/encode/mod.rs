//! Encoding sinks and the clip sampler that feeds them.
//!
//! Sinks consume rendered frames in timeline order; [`clip::encode_clip`] drives one frame
//! function across a clip and into a sink.

/// Clip sampling.
pub mod clip;
/// `ffmpeg`-based sink (MP4 output via system `ffmpeg`).
pub mod ffmpeg;
/// Generic frame sink trait and built-in sinks.
pub mod sink;
