// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Core domain types for Bildwerk.

use std::path::PathBuf;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::config::AnalysisConfig;
use crate::decision::{RemediationFlags, decide};

/// Unique identifier for a restoration request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct RequestId(pub Uuid);

impl RequestId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }

    /// First 12 hex characters, used as the prefix of persisted filenames.
    pub fn short(&self) -> String {
        let mut hex = self.0.simple().to_string();
        hex.truncate(12);
        hex
    }
}

impl Default for RequestId {
    fn default() -> Self {
        Self::new()
    }
}

impl std::fmt::Display for RequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Raw signals measured from an image before any restoration.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Measurements {
    pub width: u32,
    pub height: u32,
    /// Variance of the Laplacian response; higher is sharper.
    pub sharpness_score: f64,
    /// Standard deviation of the same Laplacian response.
    pub noise_estimate: f64,
    pub has_text: bool,
    /// Fraction of valid OCR tokens that met the confidence floor, in [0, 1].
    pub text_confidence: f64,
    pub face_count: u32,
}

impl Measurements {
    pub fn pixel_count(&self) -> u64 {
        self.width as u64 * self.height as u64
    }
}

/// Immutable quality assessment of one input image.
///
/// The remediation flags are derived once, at construction, from the
/// measured fields. There are no setters.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct QualityReport {
    width: u32,
    height: u32,
    pixel_count: u64,
    sharpness_score: f64,
    noise_estimate: f64,
    has_text: bool,
    text_confidence: f64,
    face_count: u32,
    need_deblur: bool,
    need_denoise: bool,
    need_upscale: bool,
}

impl QualityReport {
    /// Build a report from measurements, deriving the flags with [`decide`].
    pub fn assess(measurements: Measurements, config: &AnalysisConfig) -> Self {
        let RemediationFlags {
            need_deblur,
            need_denoise,
            need_upscale,
        } = decide(&measurements, config);

        Self {
            width: measurements.width,
            height: measurements.height,
            pixel_count: measurements.pixel_count(),
            sharpness_score: measurements.sharpness_score,
            noise_estimate: measurements.noise_estimate,
            has_text: measurements.has_text,
            text_confidence: measurements.text_confidence,
            face_count: measurements.face_count,
            need_deblur,
            need_denoise,
            need_upscale,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn pixel_count(&self) -> u64 {
        self.pixel_count
    }

    pub fn sharpness_score(&self) -> f64 {
        self.sharpness_score
    }

    pub fn noise_estimate(&self) -> f64 {
        self.noise_estimate
    }

    pub fn has_text(&self) -> bool {
        self.has_text
    }

    pub fn text_confidence(&self) -> f64 {
        self.text_confidence
    }

    pub fn face_count(&self) -> u32 {
        self.face_count
    }

    pub fn need_deblur(&self) -> bool {
        self.need_deblur
    }

    pub fn need_denoise(&self) -> bool {
        self.need_denoise
    }

    pub fn need_upscale(&self) -> bool {
        self.need_upscale
    }

    pub fn flags(&self) -> RemediationFlags {
        RemediationFlags {
            need_deblur: self.need_deblur,
            need_denoise: self.need_denoise,
            need_upscale: self.need_upscale,
        }
    }
}

/// Operating mode of the denoise/deblur operator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DeblurMode {
    /// Generic (defocus) deblurring, the default.
    DefocusDeblur,
    /// Deblurring tuned for strong motion blur.
    MotionDeblur,
    /// Dedicated denoising; wins over both deblur modes.
    Denoise,
}

impl DeblurMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::DefocusDeblur => "defocus_deblur",
            Self::MotionDeblur => "motion_deblur",
            Self::Denoise => "denoise",
        }
    }
}

impl std::fmt::Display for DeblurMode {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Fixed operation-log tags for the deterministic stages.
pub mod tags {
    /// Prefix of the denoise/deblur tag; the mode follows the colon.
    pub const DENOISE_DEBLUR: &str = "denoise_deblur";
    pub const FACE_RESTORE: &str = "face_restore";
    pub const FACE_RESTORE_SKIPPED: &str = "face_restore_skipped";
    pub const TEXT_CONTRAST: &str = "text_contrast";
    pub const EDGE_EMPHASIS: &str = "edge_emphasis";
}

/// Ordered record of the pipeline stages that ran (or were explicitly
/// skipped) for one request.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OperationLog(Vec<String>);

impl OperationLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tag: impl Into<String>) {
        self.0.push(tag.into());
    }

    pub fn entries(&self) -> &[String] {
        &self.0
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.0.iter().any(|t| t == tag)
    }

    /// Comma-joined form, as handed to front ends.
    pub fn joined(&self) -> String {
        self.0.join(",")
    }
}

impl std::fmt::Display for OperationLog {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.joined())
    }
}

/// Machine-readable record persisted next to each restored image.
#[derive(Debug, Clone, Serialize)]
pub struct RestorationRecord {
    pub id: RequestId,
    pub processed_at: DateTime<Utc>,
    /// Original file name of the input.
    pub source: String,
    /// Where the restored image was written.
    pub output_path: PathBuf,
    pub report: QualityReport,
    pub applied: OperationLog,
}
