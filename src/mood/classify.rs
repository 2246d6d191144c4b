use crate::foundation::error::VizResult;
use crate::mood::label::MoodLabel;

/// Longest lyric prefix handed to a classifier, in characters.
pub const MAX_LYRICS_CHARS: usize = 1000;

/// Text → mood classifier collaborator.
///
/// Implementations may hold expensive state (a loaded model); callers construct one, pass it by
/// reference into [`mood_for_lyrics`] and drop it when done.
pub trait MoodClassifier {
    /// Classify `text` into one mood.
    fn classify(&mut self, text: &str) -> VizResult<MoodLabel>;
}

/// Mood for a song: neutral when lyrics are missing or blank, otherwise the classifier's label
/// for the first [`MAX_LYRICS_CHARS`] characters.
pub fn mood_for_lyrics(
    classifier: &mut dyn MoodClassifier,
    lyrics: Option<&str>,
) -> VizResult<MoodLabel> {
    let Some(text) = lyrics.map(str::trim).filter(|t| !t.is_empty()) else {
        return Ok(MoodLabel::Neutral);
    };
    let cut = text
        .char_indices()
        .nth(MAX_LYRICS_CHARS)
        .map(|(i, _)| i)
        .unwrap_or(text.len());
    classifier.classify(&text[..cut])
}

/// Classifier that ignores its input.
#[derive(Clone, Copy, Debug, Default)]
pub struct FixedMood(pub MoodLabel);

impl MoodClassifier for FixedMood {
    fn classify(&mut self, _text: &str) -> VizResult<MoodLabel> {
        Ok(self.0)
    }
}

/// Keyword-counting classifier. The mood with the most hits wins; no hits or a tie is neutral.
#[derive(Clone, Debug)]
pub struct LexiconMoodClassifier {
    lexicon: Vec<(&'static str, MoodLabel)>,
}

impl Default for LexiconMoodClassifier {
    fn default() -> Self {
        use MoodLabel::*;
        let groups: [(MoodLabel, &[&'static str]); 6] = [
            (
                Joy,
                &[
                    "happy", "joy", "smile", "sunshine", "dance", "love", "laugh", "celebrate",
                    "bright",
                ],
            ),
            (
                Sadness,
                &[
                    "sad", "cry", "tears", "alone", "lonely", "goodbye", "miss", "broken", "rain",
                ],
            ),
            (
                Anger,
                &["hate", "rage", "angry", "fight", "burn", "scream", "mad", "fury"],
            ),
            (
                Fear,
                &["fear", "afraid", "scared", "dark", "ghost", "terror", "nightmare", "run"],
            ),
            (
                Disgust,
                &["disgust", "sick", "rotten", "filth", "dirty", "gross", "vile"],
            ),
            (
                Surprise,
                &["surprise", "suddenly", "wow", "shock", "unexpected", "amazed"],
            ),
        ];
        let lexicon = groups
            .iter()
            .flat_map(|(mood, words)| words.iter().map(move |w| (*w, *mood)))
            .collect();
        Self { lexicon }
    }
}

impl MoodClassifier for LexiconMoodClassifier {
    fn classify(&mut self, text: &str) -> VizResult<MoodLabel> {
        let mut counts = [0usize; MoodLabel::ALL.len()];
        for word in text
            .split(|c: char| !c.is_alphanumeric() && c != '\'')
            .filter(|w| !w.is_empty())
        {
            let word = word.to_lowercase();
            for (key, mood) in &self.lexicon {
                if word == *key {
                    let slot = MoodLabel::ALL.iter().position(|m| m == mood).unwrap_or(0);
                    counts[slot] += 1;
                }
            }
        }

        let max = counts.iter().copied().max().unwrap_or(0);
        if max == 0 || counts.iter().filter(|&&c| c == max).count() > 1 {
            return Ok(MoodLabel::Neutral);
        }
        Ok(counts
            .iter()
            .position(|&c| c == max)
            .map(|i| MoodLabel::ALL[i])
            .unwrap_or(MoodLabel::Neutral))
    }
}
