// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// bildwerk-imaging — Quality analysis and rule-based restoration.
//
// Measures an image (sharpness, noise, text presence, face count), plans the
// remediation from those measurements, and runs the restoration stages
// (denoise/deblur, upscale, face restoration, text contrast, edge emphasis)
// through a lazily initialised provider registry.

pub mod analysis;
#[cfg(feature = "faces")]
pub mod haar;
#[cfg(feature = "ocr")]
pub mod ocr;
pub mod pipeline;
pub mod raster;
pub mod restore;

// Re-export the entry points so callers can use `bildwerk_imaging::restore` etc.
pub use analysis::MetricExtractor;
pub use pipeline::{Orchestrator, PipelineResult, restore};
pub use restore::{ProviderRegistry, RestorationOperator, Restored};

#[cfg(feature = "faces")]
pub use haar::HaarCascade;
#[cfg(feature = "ocr")]
pub use ocr::OcrEngine;
