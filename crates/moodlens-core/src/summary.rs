// Display formatting and summary statistics for a prediction.
//
// Everything here is pure: it turns scores into the strings and bar widths
// shown in the results panel.

use crate::emotion::icon_for;
use crate::protocol::EmotionScore;

/// Shown instead of rows when the service returns no scores.
pub const EMPTY_PLACEHOLDER: &str =
    "No emotions detected at the current threshold. Try lowering the threshold.";

/// Format a slider value in [0, 1] as a whole percentage, e.g. `0.5` -> `"50%"`.
pub fn format_threshold(value: f64) -> String {
    format!("{}%", (value * 100.0).round() as i64)
}

/// Format a percentage with one decimal, e.g. `80.0` -> `"80.0%"`.
///
/// Ties round away from zero (`6.25` -> `"6.3%"`); `{:.1}` alone would
/// round them to even.
pub fn format_percent(percent: f64) -> String {
    let rounded = (percent * 10.0).round() / 10.0;
    format!("{rounded:.1}%")
}

// ---------------------------------------------------------------------------
// Rows
// ---------------------------------------------------------------------------

/// One rendered line of the bar chart.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionRow {
    pub icon: &'static str,
    pub label: String,
    /// Bar width as a percentage of the full track (probability x 100).
    pub bar_percent: f64,
    /// Probability formatted to one decimal.
    pub value_text: String,
}

impl EmotionRow {
    pub fn from_score(score: &EmotionScore) -> Self {
        let percent = score.probability * 100.0;
        EmotionRow {
            icon: icon_for(&score.emotion),
            label: score.emotion.clone(),
            bar_percent: percent,
            value_text: format_percent(percent),
        }
    }
}

/// Build one row per score, preserving the order received.
pub fn build_rows(scores: &[EmotionScore]) -> Vec<EmotionRow> {
    scores.iter().map(EmotionRow::from_score).collect()
}

// ---------------------------------------------------------------------------
// Summary
// ---------------------------------------------------------------------------

/// Count, maximum and mean of a set of scores, in percent.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct Summary {
    pub count: usize,
    pub max_percent: f64,
    pub avg_percent: f64,
}

impl Summary {
    pub fn from_scores(scores: &[EmotionScore]) -> Self {
        if scores.is_empty() {
            return Summary::default();
        }

        let percents = scores.iter().map(|s| s.probability * 100.0);
        let max_percent = percents.clone().fold(f64::NEG_INFINITY, f64::max);
        let avg_percent = percents.sum::<f64>() / scores.len() as f64;

        Summary {
            count: scores.len(),
            max_percent,
            avg_percent,
        }
    }

    pub fn count_text(&self) -> String {
        self.count.to_string()
    }

    /// `"0%"` when there are no scores, otherwise one decimal.
    pub fn max_text(&self) -> String {
        if self.count == 0 {
            "0%".to_string()
        } else {
            format_percent(self.max_percent)
        }
    }

    /// `"0%"` when there are no scores, otherwise one decimal.
    pub fn avg_text(&self) -> String {
        if self.count == 0 {
            "0%".to_string()
        } else {
            format_percent(self.avg_percent)
        }
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::emotion::FALLBACK_ICON;

    fn score(emotion: &str, probability: f64) -> EmotionScore {
        EmotionScore {
            emotion: emotion.to_string(),
            probability,
        }
    }

    #[test]
    fn threshold_display_is_whole_percent() {
        assert_eq!(format_threshold(0.0), "0%");
        assert_eq!(format_threshold(0.5), "50%");
        assert_eq!(format_threshold(1.0), "100%");
        assert_eq!(format_threshold(0.05), "5%");
        assert_eq!(format_threshold(0.35), "35%");
    }

    #[test]
    fn threshold_display_rounds_to_nearest() {
        assert_eq!(format_threshold(0.456), "46%");
        assert_eq!(format_threshold(0.454), "45%");
        assert_eq!(format_threshold(0.999), "100%");
    }

    #[test]
    fn threshold_display_over_slider_range() {
        for step in 0..=100 {
            let v = step as f64 / 100.0;
            assert_eq!(format_threshold(v), format!("{step}%"));
        }
    }

    #[test]
    fn summary_of_empty_scores() {
        let summary = Summary::from_scores(&[]);
        assert_eq!(summary.count_text(), "0");
        assert_eq!(summary.max_text(), "0%");
        assert_eq!(summary.avg_text(), "0%");
    }

    #[test]
    fn summary_of_two_scores() {
        let scores = vec![score("joy", 0.8), score("sadness", 0.4)];
        let summary = Summary::from_scores(&scores);
        assert_eq!(summary.count_text(), "2");
        assert_eq!(summary.max_text(), "80.0%");
        assert_eq!(summary.avg_text(), "60.0%");
    }

    #[test]
    fn summary_max_is_not_order_dependent() {
        let scores = vec![score("fear", 0.55), score("surprise", 0.91), score("joy", 0.6)];
        let summary = Summary::from_scores(&scores);
        assert_eq!(summary.max_text(), "91.0%");
        assert_eq!(summary.avg_text(), "68.7%");
    }

    #[test]
    fn rows_preserve_input_order() {
        let scores = vec![score("joy", 0.8), score("sadness", 0.4)];
        let rows = build_rows(&scores);
        assert_eq!(rows.len(), 2);
        assert_eq!(rows[0].label, "joy");
        assert_eq!(rows[0].icon, "😊");
        assert!((rows[0].bar_percent - 80.0).abs() < 1e-9);
        assert_eq!(rows[0].value_text, "80.0%");
        assert_eq!(rows[1].label, "sadness");
        assert!((rows[1].bar_percent - 40.0).abs() < 1e-9);
        assert_eq!(rows[1].value_text, "40.0%");
    }

    #[test]
    fn percent_ties_round_up() {
        assert_eq!(format_percent(6.25), "6.3%");
        assert_eq!(EmotionRow::from_score(&score("joy", 0.0625)).value_text, "6.3%");

        let summary = Summary::from_scores(&[score("joy", 0.625), score("love", 0.5)]);
        assert_eq!(summary.max_text(), "62.5%");
        assert_eq!(summary.avg_text(), "56.3%");
    }

    #[test]
    fn row_for_unknown_label_uses_fallback_icon() {
        let row = EmotionRow::from_score(&score("ennui", 0.123));
        assert_eq!(row.icon, FALLBACK_ICON);
        assert_eq!(row.value_text, "12.3%");
    }
}
