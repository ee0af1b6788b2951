// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Pipeline orchestrator — runs the five restoration stages in their fixed
// order, each gated on the original quality report.

use std::sync::Arc;

use bildwerk_core::config::{BildwerkConfig, PipelineConfig};
use bildwerk_core::error::Result;
use bildwerk_core::types::{DeblurMode, OperationLog, QualityReport, tags};
use image::RgbImage;
use tracing::{debug, info, instrument, warn};

use super::postprocess::{edge_emphasis, text_contrast};
use crate::analysis::MetricExtractor;
use crate::raster;
use crate::restore::{ProviderRegistry, RestorationOperator};

/// Final image, the report it was planned from, and what ran.
#[derive(Debug, Clone)]
pub struct PipelineResult {
    pub image: RgbImage,
    pub report: QualityReport,
    pub log: OperationLog,
}

/// Pick the denoise/deblur mode for a report.
///
/// Defocus deblur by default, motion deblur when sharpness is below
/// `motion_deblur_below`, and denoise whenever denoising is needed.
pub fn select_mode(report: &QualityReport, config: &PipelineConfig) -> DeblurMode {
    let mut mode = DeblurMode::DefocusDeblur;
    if report.sharpness_score() < config.motion_deblur_below {
        mode = DeblurMode::MotionDeblur;
    }
    if report.need_denoise() {
        mode = DeblurMode::Denoise;
    }
    mode
}

/// Drives the restoration operators over one working image.
pub struct Orchestrator {
    config: PipelineConfig,
    deblur: Arc<dyn RestorationOperator>,
    upscale: Arc<dyn RestorationOperator>,
    face_restore: Arc<dyn RestorationOperator>,
}

impl Orchestrator {
    pub fn new(
        config: PipelineConfig,
        deblur: Arc<dyn RestorationOperator>,
        upscale: Arc<dyn RestorationOperator>,
        face_restore: Arc<dyn RestorationOperator>,
    ) -> Self {
        Self {
            config,
            deblur,
            upscale,
            face_restore,
        }
    }

    /// Take the operators from `registry`, initialising them if needed.
    pub fn from_registry(config: PipelineConfig, registry: &ProviderRegistry) -> Self {
        Self::new(
            config,
            registry.deblur(),
            registry.upscale(),
            registry.face_restore(),
        )
    }

    /// Run every stage against `image`, planned from `report`.
    ///
    /// Conditions always read `report`, never the intermediate image.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn run(&self, image: RgbImage, report: &QualityReport) -> (RgbImage, OperationLog) {
        let mut working = image;
        let mut log = OperationLog::new();

        // 1. Denoise / deblur, only for text images with a blur or noise defect.
        if (report.need_deblur() || report.need_denoise()) && report.has_text() {
            let mode = select_mode(report, &self.config);
            working = apply(self.deblur.as_ref(), working, Some(mode));
            log.push(format!("{}:{}", tags::DENOISE_DEBLUR, mode));
        }

        // 2. Upscale when resolution is low, and always for text.
        if report.need_upscale() || report.has_text() {
            working = apply(self.upscale.as_ref(), working, None);
            log.push(self.upscale.name());
        }

        // 3. Face restoration, only for photos that were blurry to begin with.
        if report.face_count() > 0 && report.sharpness_score() < self.config.face_restore_below {
            working = apply(self.face_restore.as_ref(), working, None);
            log.push(tags::FACE_RESTORE);
        } else {
            log.push(tags::FACE_RESTORE_SKIPPED);
        }

        // 4. Text contrast on the final-resolution pixels.
        if report.has_text() {
            text_contrast(&mut working);
            log.push(tags::TEXT_CONTRAST);
        }

        // 5. Edge emphasis after blackening.
        if report.has_text() {
            working = edge_emphasis(&working, self.config.edge_blend_original);
            log.push(tags::EDGE_EMPHASIS);
        }

        info!(
            applied = %log,
            out_w = working.width(),
            out_h = working.height(),
            "Pipeline complete"
        );
        (working, log)
    }
}

/// Invoke an operator, logging degraded runs, and continue with its image.
fn apply(op: &dyn RestorationOperator, image: RgbImage, mode: Option<DeblurMode>) -> RgbImage {
    debug!(operator = op.name(), "Invoking operator");
    let restored = op.transform(image, mode);
    if let Some(reason) = restored.degraded_reason() {
        warn!(operator = op.name(), reason, "Operator degraded");
    }
    restored.into_image()
}

/// Analyse `image` and run the full restoration pipeline over it.
///
/// Fails only for images with no pixels.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn restore(
    image: RgbImage,
    config: &BildwerkConfig,
    registry: &ProviderRegistry,
) -> Result<PipelineResult> {
    raster::ensure_not_empty(&image)?;

    let text = registry.text_recognizer();
    let faces = registry.face_detector();
    let report = MetricExtractor::new(&config.analysis)
        .with_text_recognizer(text.as_deref())
        .with_face_detector(faces.as_deref())
        .assess(&image);

    let orchestrator = Orchestrator::from_registry(config.pipeline.clone(), registry);
    let (image, log) = orchestrator.run(image, &report);

    Ok(PipelineResult { image, report, log })
}
