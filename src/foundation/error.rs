/// Result alias used throughout the crate.
pub type VizResult<T> = Result<T, VizError>;

/// Pipeline stage a failure is attributed to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Stage {
    /// Audio decoding, feature extraction and analysis validation.
    Analysis,
    /// Frame production (particle simulation, rasterization).
    Render,
    /// Muxing frames and audio into the output container.
    Encode,
}

impl std::fmt::Display for Stage {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(match self {
            Self::Analysis => "analysis",
            Self::Render => "render",
            Self::Encode => "encode",
        })
    }
}

/// Error type for every fallible operation in the crate.
#[derive(thiserror::Error, Debug)]
pub enum VizError {
    /// Malformed or empty input (analysis, fps, clip window).
    #[error("input error: {0}")]
    Input(String),

    /// The audio-analysis collaborator failed (decode, feature extraction).
    #[error("analysis error: {0}")]
    Analysis(String),

    /// A sample or spectrum lookup fell outside the buffer.
    #[error("index error: {0}")]
    Index(String),

    /// Rasterization failed.
    #[error("render error: {0}")]
    Render(String),

    /// The video/audio muxer failed.
    #[error("encoding error: {0}")]
    Encoding(String),

    /// Any other failure, typically filesystem IO with context attached.
    #[error(transparent)]
    Other(#[from] anyhow::Error),
}

impl VizError {
    /// Build an [`VizError::Input`].
    pub fn input(msg: impl Into<String>) -> Self {
        Self::Input(msg.into())
    }

    /// Build an [`VizError::Analysis`].
    pub fn analysis(msg: impl Into<String>) -> Self {
        Self::Analysis(msg.into())
    }

    /// Build an [`VizError::Index`].
    pub fn index(msg: impl Into<String>) -> Self {
        Self::Index(msg.into())
    }

    /// Build an [`VizError::Render`].
    pub fn render(msg: impl Into<String>) -> Self {
        Self::Render(msg.into())
    }

    /// Build an [`VizError::Encoding`].
    pub fn encoding(msg: impl Into<String>) -> Self {
        Self::Encoding(msg.into())
    }

    /// Stage this failure belongs to.
    pub fn stage(&self) -> Stage {
        match self {
            Self::Input(_) | Self::Analysis(_) => Stage::Analysis,
            Self::Index(_) | Self::Render(_) | Self::Other(_) => Stage::Render,
            Self::Encoding(_) => Stage::Encode,
        }
    }
}
