// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Text presence — turns per-token OCR confidences into a has-text decision.

use bildwerk_core::config::AnalysisConfig;
use bildwerk_core::error::Result;
use image::RgbImage;
use tracing::{debug, warn};

/// OCR capability: reports one confidence per detected token.
///
/// Confidences are on a 0-100 scale. `None` marks a token whose confidence
/// is absent or unparseable; negative values mark regions that are not
/// characters. Both are excluded from the ratio.
pub trait TextRecognizer: Send + Sync {
    fn token_confidences(&self, image: &RgbImage) -> Result<Vec<Option<f32>>>;
}

/// Outcome of the text-presence measure.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct TextPresence {
    pub has_text: bool,
    /// Fraction of valid tokens at or above the confidence floor.
    pub confidence: f64,
}

/// Compute the good-token ratio from raw confidences.
///
/// With no valid confidences the ratio is 0 and no text is reported.
pub fn text_presence(
    confidences: &[Option<f32>],
    confidence_floor: f32,
    ratio_threshold: f64,
) -> TextPresence {
    let mut total = 0usize;
    let mut good = 0usize;
    for conf in confidences.iter().flatten() {
        if !conf.is_finite() || *conf < 0.0 {
            continue;
        }
        total += 1;
        if *conf >= confidence_floor {
            good += 1;
        }
    }

    let ratio = if total > 0 {
        good as f64 / total as f64
    } else {
        0.0
    };

    TextPresence {
        has_text: ratio > ratio_threshold,
        confidence: ratio,
    }
}

/// Score the words of one recognised line.
///
/// Each whitespace-separated word is a token whose confidence is the share
/// of alphanumeric characters, scaled to 0-100. A line that could not be
/// recognised at all contributes a single absent token.
pub fn line_token_confidences(line: Option<&str>) -> Vec<Option<f32>> {
    let Some(line) = line else {
        return vec![None];
    };
    line.split_whitespace()
        .map(|word| {
            let total = word.chars().count();
            let alnum = word.chars().filter(|c| c.is_alphanumeric()).count();
            Some(100.0 * alnum as f32 / total as f32)
        })
        .collect()
}

/// Run the OCR capability and score its output.
///
/// A missing recognizer or a failed pass degrades to "no text".
pub fn detect_text(
    recognizer: Option<&dyn TextRecognizer>,
    image: &RgbImage,
    config: &AnalysisConfig,
) -> TextPresence {
    let Some(recognizer) = recognizer else {
        debug!("No text recognizer available; assuming no text");
        return TextPresence::default();
    };

    match recognizer.token_confidences(image) {
        Ok(confidences) => {
            let presence = text_presence(
                &confidences,
                config.ocr_confidence_floor,
                config.text_ratio_threshold,
            );
            debug!(
                tokens = confidences.len(),
                ratio = presence.confidence,
                has_text = presence.has_text,
                "Text presence measured"
            );
            presence
        }
        Err(err) => {
            warn!(error = %err, "OCR pass failed; assuming no text");
            TextPresence::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::error::BildwerkError;

    #[test]
    fn line_words_scored_by_alphanumeric_share() {
        assert_eq!(
            line_token_confidences(Some("Invoice #4 ~~")),
            vec![Some(100.0), Some(50.0), Some(0.0)]
        );
        assert!(line_token_confidences(Some("   ")).is_empty());
        assert_eq!(line_token_confidences(None), vec![None]);
    }

    struct Fixed(Vec<Option<f32>>);

    impl TextRecognizer for Fixed {
        fn token_confidences(&self, _image: &RgbImage) -> Result<Vec<Option<f32>>> {
            Ok(self.0.clone())
        }
    }

    struct Broken;

    impl TextRecognizer for Broken {
        fn token_confidences(&self, _image: &RgbImage) -> Result<Vec<Option<f32>>> {
            Err(BildwerkError::OcrError("engine exploded".into()))
        }
    }

    #[test]
    fn no_valid_confidences_means_no_text() {
        let presence = text_presence(&[None, Some(-1.0), Some(f32::NAN)], 30.0, 0.12);
        assert_eq!(presence, TextPresence { has_text: false, confidence: 0.0 });

        let presence = text_presence(&[], 30.0, 0.12);
        assert_eq!(presence.confidence, 0.0);
        assert!(!presence.has_text);
    }

    #[test]
    fn invalid_tokens_are_excluded_not_counted_as_zero() {
        // 1 good of 2 valid; the absent and negative entries do not dilute.
        let presence = text_presence(&[Some(95.0), Some(10.0), None, Some(-1.0)], 30.0, 0.12);
        assert_eq!(presence.confidence, 0.5);
        assert!(presence.has_text);
    }

    #[test]
    fn floor_is_inclusive_and_ratio_threshold_strict() {
        let presence = text_presence(&[Some(30.0)], 30.0, 0.12);
        assert_eq!(presence.confidence, 1.0);

        // 3 of 25 good = 0.12 exactly, which is not above the threshold.
        let mut confs = vec![Some(90.0); 3];
        confs.extend(vec![Some(5.0); 22]);
        let presence = text_presence(&confs, 30.0, 0.12);
        assert!((presence.confidence - 0.12).abs() < 1e-12);
        assert!(!presence.has_text);
    }

    #[test]
    fn failing_recognizer_degrades_to_no_text() {
        let img = RgbImage::new(4, 4);
        let config = AnalysisConfig::default();
        assert_eq!(detect_text(Some(&Broken), &img, &config), TextPresence::default());
        assert_eq!(detect_text(None, &img, &config), TextPresence::default());
    }

    #[test]
    fn recognizer_output_is_scored_with_config() {
        let img = RgbImage::new(4, 4);
        let config = AnalysisConfig::default();
        let recognizer = Fixed(vec![Some(80.0), Some(70.0), Some(5.0), Some(0.0)]);
        let presence = detect_text(Some(&recognizer), &img, &config);
        assert!(presence.has_text);
        assert_eq!(presence.confidence, 0.5);
    }
}
