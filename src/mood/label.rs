/// Emotional category assigned to a song; drives the color theme.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, serde::Serialize, serde::Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum MoodLabel {
    /// Joy.
    Joy,
    /// Sadness.
    Sadness,
    /// Anger.
    Anger,
    /// Neutral, also the fallback for anything unrecognized.
    #[default]
    Neutral,
    /// Fear.
    Fear,
    /// Disgust.
    Disgust,
    /// Surprise.
    Surprise,
}

impl MoodLabel {
    /// Every label, in palette-table order.
    pub const ALL: [MoodLabel; 7] = [
        Self::Joy,
        Self::Sadness,
        Self::Anger,
        Self::Neutral,
        Self::Fear,
        Self::Disgust,
        Self::Surprise,
    ];

    /// Parse a classifier label, case-insensitively. Unknown strings become [`MoodLabel::Neutral`].
    pub fn parse_lossy(s: &str) -> Self {
        let s = s.trim();
        Self::ALL
            .into_iter()
            .find(|m| m.as_str().eq_ignore_ascii_case(s))
            .unwrap_or(Self::Neutral)
    }

    /// Lowercase name.
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Joy => "joy",
            Self::Sadness => "sadness",
            Self::Anger => "anger",
            Self::Neutral => "neutral",
            Self::Fear => "fear",
            Self::Disgust => "disgust",
            Self::Surprise => "surprise",
        }
    }
}

impl std::fmt::Display for MoodLabel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
