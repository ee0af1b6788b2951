// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Metric extraction — runs the four independent quality measures over the
// original image and assembles the quality report.

use bildwerk_core::config::AnalysisConfig;
use bildwerk_core::types::{Measurements, QualityReport};
use image::RgbImage;
use tracing::{info, instrument, warn};

use super::faces::{FaceDetector, face_count};
use super::laplacian::laplacian_stats;
use super::text::{TextPresence, TextRecognizer, detect_text};
use crate::raster;

/// Measures an image against the configured analysis thresholds.
///
/// The OCR and face-detection passes run on scoped threads alongside the
/// Laplacian statistics. They only read the image, so the result equals a
/// sequential run.
#[derive(Clone, Copy)]
pub struct MetricExtractor<'a> {
    config: &'a AnalysisConfig,
    text: Option<&'a dyn TextRecognizer>,
    faces: Option<&'a dyn FaceDetector>,
}

impl<'a> MetricExtractor<'a> {
    /// An extractor with no OCR or face capability attached.
    pub fn new(config: &'a AnalysisConfig) -> Self {
        Self {
            config,
            text: None,
            faces: None,
        }
    }

    pub fn with_text_recognizer(mut self, recognizer: Option<&'a dyn TextRecognizer>) -> Self {
        self.text = recognizer;
        self
    }

    pub fn with_face_detector(mut self, detector: Option<&'a dyn FaceDetector>) -> Self {
        self.faces = detector;
        self
    }

    /// Take the raw measurements of `image` at its own resolution.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn measure(&self, image: &RgbImage) -> Measurements {
        let luma = raster::luminance(image);
        let text_recognizer = self.text;
        let face_detector = self.faces;
        let config = self.config;

        let (stats, text, faces) = std::thread::scope(|scope| {
            let text_task = scope.spawn(|| detect_text(text_recognizer, image, config));
            let face_task =
                scope.spawn(|| face_count(face_detector, &luma, &config.face_detection));

            let stats = laplacian_stats(&luma);

            let text = text_task.join().unwrap_or_else(|_| {
                warn!("OCR pass panicked; assuming no text");
                TextPresence::default()
            });
            let faces = face_task.join().unwrap_or_else(|_| {
                warn!("Face detection panicked; assuming no faces");
                0
            });
            (stats, text, faces)
        });

        let measurements = Measurements {
            width: image.width(),
            height: image.height(),
            sharpness_score: stats.sharpness(),
            noise_estimate: stats.noise(),
            has_text: text.has_text,
            text_confidence: text.confidence,
            face_count: faces,
        };
        info!(
            sharpness = measurements.sharpness_score,
            noise = measurements.noise_estimate,
            has_text = measurements.has_text,
            faces = measurements.face_count,
            "Image measured"
        );
        measurements
    }

    /// Measure `image` and derive the remediation flags.
    pub fn assess(&self, image: &RgbImage) -> QualityReport {
        QualityReport::assess(self.measure(image), self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analysis::faces::FaceBox;
    use bildwerk_core::config::FaceDetectionParams;
    use bildwerk_core::error::Result;
    use image::{GrayImage, Rgb};

    struct AlwaysText;

    impl TextRecognizer for AlwaysText {
        fn token_confidences(&self, _image: &RgbImage) -> Result<Vec<Option<f32>>> {
            Ok(vec![Some(91.0), Some(88.0), Some(12.0)])
        }
    }

    struct OneFace;

    impl FaceDetector for OneFace {
        fn detect(&self, luma: &GrayImage, params: &FaceDetectionParams) -> Result<Vec<FaceBox>> {
            assert_eq!(params.min_neighbors, 4);
            Ok(vec![FaceBox {
                x: 0,
                y: 0,
                width: luma.width(),
                height: luma.height(),
            }])
        }
    }

    #[test]
    fn flat_small_image_needs_deblur_and_upscale() {
        let config = AnalysisConfig::default();
        let img = RgbImage::from_pixel(64, 48, Rgb([200, 180, 160]));
        let report = MetricExtractor::new(&config).assess(&img);

        assert_eq!(report.width(), 64);
        assert_eq!(report.height(), 48);
        assert_eq!(report.pixel_count(), 64 * 48);
        assert_eq!(report.sharpness_score(), 0.0);
        assert!(report.need_deblur());
        assert!(!report.need_denoise());
        assert!(report.need_upscale());
        assert!(!report.has_text());
        assert_eq!(report.face_count(), 0);
    }

    #[test]
    fn capabilities_feed_into_measurements() {
        let config = AnalysisConfig::default();
        let img = RgbImage::from_fn(40, 40, |x, y| {
            if (x / 2 + y / 2) % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([255, 255, 255])
            }
        });
        let m = MetricExtractor::new(&config)
            .with_text_recognizer(Some(&AlwaysText))
            .with_face_detector(Some(&OneFace))
            .measure(&img);

        assert!(m.has_text);
        assert!((m.text_confidence - 2.0 / 3.0).abs() < 1e-12);
        assert_eq!(m.face_count, 1);
        assert!(m.sharpness_score > 100.0);
        assert!((m.noise_estimate * m.noise_estimate - m.sharpness_score).abs() < 1e-6);
    }

    #[test]
    fn faint_coloured_stripes_are_sharp_enough() {
        // Luma alternates 0 / 6 by column: sharpness 144, noise 12.
        let config = AnalysisConfig::default();
        let img = RgbImage::from_fn(64, 64, |x, _| {
            if x % 2 == 0 {
                Rgb([0, 0, 0])
            } else {
                Rgb([20, 0, 0])
            }
        });
        let report = MetricExtractor::new(&config).assess(&img);

        assert_eq!(report.sharpness_score(), 144.0);
        assert_eq!(report.noise_estimate(), 12.0);
        assert!(!report.need_deblur());
        assert!(!report.need_denoise());
    }

    #[test]
    fn measuring_twice_gives_identical_results() {
        let config = AnalysisConfig::default();
        let img = RgbImage::from_fn(33, 17, |x, y| Rgb([(x * 7) as u8, (y * 13) as u8, 50]));
        let extractor = MetricExtractor::new(&config).with_text_recognizer(Some(&AlwaysText));
        assert_eq!(extractor.measure(&img), extractor.measure(&img));
    }
}
