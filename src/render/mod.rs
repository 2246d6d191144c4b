//! Frame production: the raster surface, the spectrogram underlay and the three strategies.

pub(crate) mod frame;
pub(crate) mod gradient;
pub(crate) mod quadrant;
pub(crate) mod raster;
pub(crate) mod spectral;
pub(crate) mod spectrum;
pub(crate) mod strategy;
