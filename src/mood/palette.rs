use crate::foundation::core::Rgb;
use crate::mood::label::MoodLabel;

/// A (primary, secondary) color pair used to theme one region.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColorPair {
    /// Dominant color.
    pub primary: Rgb,
    /// Accent color.
    pub secondary: Rgb,
}

impl ColorPair {
    const fn hex(primary: u32, secondary: u32) -> Self {
        Self {
            primary: Rgb::hex(primary),
            secondary: Rgb::hex(secondary),
        }
    }

    /// Blend from primary (`t = 0`) to secondary (`t = 1`).
    pub fn blend(self, t: f64) -> Rgb {
        self.primary.lerp(self.secondary, t)
    }
}

/// How many regions a scheme has to cover.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum SchemeLayout {
    /// One pair for the whole frame (amplitude-driven strategies).
    Single,
    /// One pair per quadrant.
    Quadrants,
}

impl SchemeLayout {
    /// Number of color pairs in a scheme with this layout.
    pub fn pair_count(self) -> usize {
        match self {
            Self::Single => 1,
            Self::Quadrants => 4,
        }
    }
}

/// Ordered, immutable set of color pairs for one mood.
#[derive(Clone, Debug, PartialEq)]
pub struct ColorScheme {
    pairs: Vec<ColorPair>,
}

impl ColorScheme {
    /// Pair for region `i`, wrapping around.
    pub fn pair(&self, i: usize) -> ColorPair {
        self.pairs[i % self.pairs.len()]
    }

    /// Number of pairs.
    pub fn len(&self) -> usize {
        self.pairs.len()
    }

    /// Always `false`; schemes carry at least one pair.
    pub fn is_empty(&self) -> bool {
        self.pairs.is_empty()
    }
}

const JOY: [ColorPair; 4] = [
    ColorPair::hex(0xFFD700, 0xFF4500),
    ColorPair::hex(0x32CD32, 0x98FB98),
    ColorPair::hex(0x00BFFF, 0x4682B4),
    ColorPair::hex(0xFF6347, 0xFF1493),
];
const SADNESS: [ColorPair; 4] = [
    ColorPair::hex(0x4169E1, 0x87CEEB),
    ColorPair::hex(0x2F4F4F, 0x708090),
    ColorPair::hex(0x778899, 0xB0C4DE),
    ColorPair::hex(0xA9A9A9, 0xD3D3D3),
];
const ANGER: [ColorPair; 4] = [
    ColorPair::hex(0x8B0000, 0xFF0000),
    ColorPair::hex(0xB22222, 0xDC143C),
    ColorPair::hex(0xFF6347, 0xFF4500),
    ColorPair::hex(0xFF1493, 0xC71585),
];
const NEUTRAL: [ColorPair; 4] = [
    ColorPair::hex(0x808080, 0xFFFFFF),
    ColorPair::hex(0xA9A9A9, 0xD3D3D3),
    ColorPair::hex(0xBEBEBE, 0xDCDCDC),
    ColorPair::hex(0xC0C0C0, 0xDCDCDC),
];
const FEAR: [ColorPair; 4] = [
    ColorPair::hex(0x4B0082, 0x8A2BE2),
    ColorPair::hex(0x800080, 0x4B0082),
    ColorPair::hex(0x8B008B, 0x9932CC),
    ColorPair::hex(0x9400D3, 0x8B0000),
];
const DISGUST: [ColorPair; 4] = [
    ColorPair::hex(0x006400, 0x32CD32),
    ColorPair::hex(0x556B2F, 0x6B8E23),
    ColorPair::hex(0x228B22, 0xADFF2F),
    ColorPair::hex(0x9ACD32, 0x808000),
];
const SURPRISE: [ColorPair; 4] = [
    ColorPair::hex(0xFFA500, 0xFFFF00),
    ColorPair::hex(0xFF4500, 0xFF6347),
    ColorPair::hex(0xFFD700, 0xFF1493),
    ColorPair::hex(0xFF00FF, 0x8A2BE2),
];

/// Mood → color scheme lookup.
pub struct MoodPalette;

impl MoodPalette {
    /// Scheme for `mood` with `layout.pair_count()` pairs. Total and deterministic.
    pub fn lookup(mood: MoodLabel, layout: SchemeLayout) -> ColorScheme {
        let table = match mood {
            MoodLabel::Joy => &JOY,
            MoodLabel::Sadness => &SADNESS,
            MoodLabel::Anger => &ANGER,
            MoodLabel::Neutral => &NEUTRAL,
            MoodLabel::Fear => &FEAR,
            MoodLabel::Disgust => &DISGUST,
            MoodLabel::Surprise => &SURPRISE,
        };
        ColorScheme {
            pairs: table[..layout.pair_count()].to_vec(),
        }
    }

    /// Scheme for a raw label string; anything unrecognized gets the neutral scheme.
    pub fn lookup_str(mood: &str, layout: SchemeLayout) -> ColorScheme {
        Self::lookup(MoodLabel::parse_lossy(mood), layout)
    }

    /// The fallback scheme (neutral grays).
    pub fn fallback(layout: SchemeLayout) -> ColorScheme {
        Self::lookup(MoodLabel::Neutral, layout)
    }
}
