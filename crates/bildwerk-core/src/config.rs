// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Application configuration.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::error::{BildwerkError, Result};

/// Thresholds and detector parameters used while measuring an image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AnalysisConfig {
    /// Laplacian variance below which the image needs deblurring.
    pub blur_threshold: f64,
    /// Laplacian standard deviation above which the image needs denoising.
    pub noise_threshold: f64,
    /// Pixel count below which the image needs upscaling (800x600).
    pub low_res_threshold: u64,
    /// Minimum per-token OCR confidence (0-100) counted as a good token.
    pub ocr_confidence_floor: f32,
    /// Good-token ratio above which the image is considered to contain text.
    pub text_ratio_threshold: f64,
    /// Parameters handed to the face detector.
    pub face_detection: FaceDetectionParams,
}

impl Default for AnalysisConfig {
    fn default() -> Self {
        Self {
            blur_threshold: 100.0,
            noise_threshold: 12.0,
            low_res_threshold: 800 * 600,
            ocr_confidence_floor: 30.0,
            text_ratio_threshold: 0.12,
            face_detection: FaceDetectionParams::default(),
        }
    }
}

/// Multi-scale sliding-window detection parameters.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct FaceDetectionParams {
    /// Scale step between detection pyramid levels.
    pub scale_factor: f32,
    /// Overlapping candidates required to confirm a detection.
    pub min_neighbors: u32,
    /// Smallest face side in pixels, at the original resolution.
    pub min_face_size: u32,
}

impl Default for FaceDetectionParams {
    fn default() -> Self {
        Self {
            scale_factor: 1.1,
            min_neighbors: 4,
            min_face_size: 30,
        }
    }
}

/// Constants that steer stage selection inside the restoration pipeline.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    /// Sharpness below which the motion-deblur mode replaces defocus deblur.
    pub motion_deblur_below: f64,
    /// Original sharpness below which detected faces are restored.
    pub face_restore_below: f64,
    /// Integer scale factor of the upscale operator.
    pub upscale_factor: u32,
    /// Weight of the pre-sharpen image in the edge-emphasis blend.
    pub edge_blend_original: f32,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            motion_deblur_below: 30.0,
            face_restore_below: 50.0,
            upscale_factor: 4,
            edge_blend_original: 0.9,
        }
    }
}

/// Top-level settings for a Bildwerk process.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BildwerkConfig {
    pub analysis: AnalysisConfig,
    pub pipeline: PipelineConfig,
    /// Directory restored images and their records are written to.
    pub output_dir: PathBuf,
    /// Directory holding `text-detection.rten` and `text-recognition.rten`.
    /// `None` uses the OCR engine's default cache directory.
    pub ocr_model_dir: Option<PathBuf>,
    /// OpenCV-format Haar cascade (`haarcascade_frontalface_default.xml`).
    /// `None` searches the usual OpenCV install locations.
    pub face_cascade_path: Option<PathBuf>,
}

impl Default for BildwerkConfig {
    fn default() -> Self {
        Self {
            analysis: AnalysisConfig::default(),
            pipeline: PipelineConfig::default(),
            output_dir: PathBuf::from("output"),
            ocr_model_dir: None,
            face_cascade_path: None,
        }
    }
}

impl BildwerkConfig {
    /// Load a JSON config file. Missing keys take their default values.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let data = std::fs::read_to_string(path.as_ref())?;
        let config: Self = serde_json::from_str(&data)?;
        config.validate()?;
        Ok(config)
    }

    /// Write the config as pretty-printed JSON.
    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        let json = serde_json::to_string_pretty(self)?;
        std::fs::write(path.as_ref(), json)?;
        Ok(())
    }

    /// Reject values the analyser and pipeline cannot work with.
    pub fn validate(&self) -> Result<()> {
        let a = &self.analysis;
        let p = &self.pipeline;

        for (name, value) in [
            ("analysis.blur_threshold", a.blur_threshold),
            ("analysis.noise_threshold", a.noise_threshold),
            ("pipeline.motion_deblur_below", p.motion_deblur_below),
            ("pipeline.face_restore_below", p.face_restore_below),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(BildwerkError::InvalidConfig(format!(
                    "{name} must be a finite non-negative number, got {value}"
                )));
            }
        }
        if !(0.0..=1.0).contains(&a.text_ratio_threshold) {
            return Err(BildwerkError::InvalidConfig(format!(
                "analysis.text_ratio_threshold must be within [0, 1], got {}",
                a.text_ratio_threshold
            )));
        }
        if !a.ocr_confidence_floor.is_finite() || a.ocr_confidence_floor < 0.0 {
            return Err(BildwerkError::InvalidConfig(format!(
                "analysis.ocr_confidence_floor must be non-negative, got {}",
                a.ocr_confidence_floor
            )));
        }
        if !(a.face_detection.scale_factor > 1.0) {
            return Err(BildwerkError::InvalidConfig(format!(
                "analysis.face_detection.scale_factor must be greater than 1, got {}",
                a.face_detection.scale_factor
            )));
        }
        if p.upscale_factor < 1 {
            return Err(BildwerkError::InvalidConfig(
                "pipeline.upscale_factor must be at least 1".into(),
            ));
        }
        if !(0.0..=1.0).contains(&p.edge_blend_original) {
            return Err(BildwerkError::InvalidConfig(format!(
                "pipeline.edge_blend_original must be within [0, 1], got {}",
                p.edge_blend_original
            )));
        }
        Ok(())
    }
}
