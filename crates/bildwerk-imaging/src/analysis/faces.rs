// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Face counting over luminance through a pluggable detector.

use bildwerk_core::config::FaceDetectionParams;
use bildwerk_core::error::Result;
use image::GrayImage;
use tracing::{debug, warn};

/// Bounding box of a detected face, in pixels of the analysed image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FaceBox {
    pub x: u32,
    pub y: u32,
    pub width: u32,
    pub height: u32,
}

/// Face-detection capability.
///
/// Implementations own overlap merging: every returned box is a distinct
/// face.
pub trait FaceDetector: Send + Sync {
    fn detect(&self, luma: &GrayImage, params: &FaceDetectionParams) -> Result<Vec<FaceBox>>;
}

/// Number of faces the detector finds; 0 when it is missing or fails.
pub fn face_count(
    detector: Option<&dyn FaceDetector>,
    luma: &GrayImage,
    params: &FaceDetectionParams,
) -> u32 {
    let Some(detector) = detector else {
        debug!("No face detector available; assuming no faces");
        return 0;
    };

    match detector.detect(luma, params) {
        Ok(faces) => {
            let count = u32::try_from(faces.len()).unwrap_or(u32::MAX);
            debug!(count, "Faces detected");
            count
        }
        Err(err) => {
            warn!(error = %err, "Face detection failed; assuming no faces");
            0
        }
    }
}
