//! Mood labels, the mood → color lookup, and the text classifier seam.

pub(crate) mod classify;
pub(crate) mod label;
pub(crate) mod palette;
