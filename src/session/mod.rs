//! Render jobs: strategy selection and the frame loop.

pub(crate) mod director;
