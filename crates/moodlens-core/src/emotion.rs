// Emotion labels recognised by the classifier and their display glyphs.
//
// The service reports labels as plain strings. Known labels parse into
// `EmotionLabel`; anything else is displayed with `FALLBACK_ICON`.

use std::fmt;
use std::str::FromStr;

use thiserror::Error;

/// Glyph shown for labels outside the known set.
pub const FALLBACK_ICON: &str = "🎭";

/// The 28 GoEmotions categories, in the order the model was trained on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EmotionLabel {
    Admiration,
    Amusement,
    Anger,
    Annoyance,
    Approval,
    Caring,
    Confusion,
    Curiosity,
    Desire,
    Disappointment,
    Disapproval,
    Disgust,
    Embarrassment,
    Excitement,
    Fear,
    Gratitude,
    Grief,
    Joy,
    Love,
    Nervousness,
    Optimism,
    Pride,
    Realization,
    Relief,
    Remorse,
    Sadness,
    Surprise,
    Neutral,
}

impl EmotionLabel {
    pub const ALL: [EmotionLabel; 28] = [
        EmotionLabel::Admiration,
        EmotionLabel::Amusement,
        EmotionLabel::Anger,
        EmotionLabel::Annoyance,
        EmotionLabel::Approval,
        EmotionLabel::Caring,
        EmotionLabel::Confusion,
        EmotionLabel::Curiosity,
        EmotionLabel::Desire,
        EmotionLabel::Disappointment,
        EmotionLabel::Disapproval,
        EmotionLabel::Disgust,
        EmotionLabel::Embarrassment,
        EmotionLabel::Excitement,
        EmotionLabel::Fear,
        EmotionLabel::Gratitude,
        EmotionLabel::Grief,
        EmotionLabel::Joy,
        EmotionLabel::Love,
        EmotionLabel::Nervousness,
        EmotionLabel::Optimism,
        EmotionLabel::Pride,
        EmotionLabel::Realization,
        EmotionLabel::Relief,
        EmotionLabel::Remorse,
        EmotionLabel::Sadness,
        EmotionLabel::Surprise,
        EmotionLabel::Neutral,
    ];

    /// Wire name, as reported by the service.
    pub fn as_str(self) -> &'static str {
        match self {
            EmotionLabel::Admiration => "admiration",
            EmotionLabel::Amusement => "amusement",
            EmotionLabel::Anger => "anger",
            EmotionLabel::Annoyance => "annoyance",
            EmotionLabel::Approval => "approval",
            EmotionLabel::Caring => "caring",
            EmotionLabel::Confusion => "confusion",
            EmotionLabel::Curiosity => "curiosity",
            EmotionLabel::Desire => "desire",
            EmotionLabel::Disappointment => "disappointment",
            EmotionLabel::Disapproval => "disapproval",
            EmotionLabel::Disgust => "disgust",
            EmotionLabel::Embarrassment => "embarrassment",
            EmotionLabel::Excitement => "excitement",
            EmotionLabel::Fear => "fear",
            EmotionLabel::Gratitude => "gratitude",
            EmotionLabel::Grief => "grief",
            EmotionLabel::Joy => "joy",
            EmotionLabel::Love => "love",
            EmotionLabel::Nervousness => "nervousness",
            EmotionLabel::Optimism => "optimism",
            EmotionLabel::Pride => "pride",
            EmotionLabel::Realization => "realization",
            EmotionLabel::Relief => "relief",
            EmotionLabel::Remorse => "remorse",
            EmotionLabel::Sadness => "sadness",
            EmotionLabel::Surprise => "surprise",
            EmotionLabel::Neutral => "neutral",
        }
    }

    pub fn icon(self) -> &'static str {
        match self {
            EmotionLabel::Admiration => "👏",
            EmotionLabel::Amusement => "😄",
            EmotionLabel::Anger => "😡",
            EmotionLabel::Annoyance => "😒",
            EmotionLabel::Approval => "👍",
            EmotionLabel::Caring => "🤗",
            EmotionLabel::Confusion => "😕",
            EmotionLabel::Curiosity => "🤔",
            EmotionLabel::Desire => "😍",
            EmotionLabel::Disappointment => "😞",
            EmotionLabel::Disapproval => "👎",
            EmotionLabel::Disgust => "🤢",
            EmotionLabel::Embarrassment => "😳",
            EmotionLabel::Excitement => "🤩",
            EmotionLabel::Fear => "😨",
            EmotionLabel::Gratitude => "🙏",
            EmotionLabel::Grief => "😢",
            EmotionLabel::Joy => "😊",
            EmotionLabel::Love => "❤️",
            EmotionLabel::Nervousness => "😰",
            EmotionLabel::Optimism => "🌟",
            EmotionLabel::Pride => "😤",
            EmotionLabel::Realization => "💡",
            EmotionLabel::Relief => "😌",
            EmotionLabel::Remorse => "😔",
            EmotionLabel::Sadness => "😭",
            EmotionLabel::Surprise => "😮",
            EmotionLabel::Neutral => "😐",
        }
    }
}

impl fmt::Display for EmotionLabel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("unknown emotion label: {0}")]
pub struct UnknownLabel(pub String);

impl FromStr for EmotionLabel {
    type Err = UnknownLabel;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        EmotionLabel::ALL
            .iter()
            .copied()
            .find(|label| label.as_str() == s)
            .ok_or_else(|| UnknownLabel(s.to_string()))
    }
}

/// Look up the glyph for a label string, falling back to [`FALLBACK_ICON`].
///
/// Matching is exact: the service always emits lowercase names.
pub fn icon_for(label: &str) -> &'static str {
    label
        .parse::<EmotionLabel>()
        .map(EmotionLabel::icon)
        .unwrap_or(FALLBACK_ICON)
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn all_labels_have_unique_names() {
        let names: HashSet<&str> = EmotionLabel::ALL.iter().map(|l| l.as_str()).collect();
        assert_eq!(names.len(), 28);
    }

    #[test]
    fn parse_known_labels() {
        for label in EmotionLabel::ALL {
            assert_eq!(label.as_str().parse::<EmotionLabel>(), Ok(label));
        }
    }

    #[test]
    fn parse_unknown_label_fails() {
        let err = "schadenfreude".parse::<EmotionLabel>().unwrap_err();
        assert_eq!(err, UnknownLabel("schadenfreude".to_string()));
    }

    #[test]
    fn icon_for_known_labels() {
        assert_eq!(icon_for("joy"), "😊");
        assert_eq!(icon_for("anger"), "😡");
        assert_eq!(icon_for("neutral"), "😐");
        assert_eq!(icon_for("love"), "❤️");
    }

    #[test]
    fn icon_for_unknown_label_falls_back() {
        assert_eq!(icon_for("schadenfreude"), FALLBACK_ICON);
        assert_eq!(icon_for(""), FALLBACK_ICON);
        assert_eq!(icon_for("Joy"), FALLBACK_ICON);
    }

    #[test]
    fn display_uses_wire_name() {
        assert_eq!(EmotionLabel::Embarrassment.to_string(), "embarrassment");
    }
}
