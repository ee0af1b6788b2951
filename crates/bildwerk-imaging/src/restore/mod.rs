// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restoration operators — the capability interface the pipeline drives,
// classical built-in providers, and the provider registry.

pub mod classical;
pub mod registry;

use bildwerk_core::types::DeblurMode;
use image::RgbImage;

pub use classical::{ClassicalDeblur, LanczosUpscaler, PassthroughFaceRestorer};
pub use registry::{ProviderRegistry, ProviderStatus, RegistryBuilder};

/// Outcome of one operator invocation. Both variants carry a usable image.
#[derive(Debug, Clone, PartialEq)]
pub enum Restored {
    /// The operator did its job.
    Ok(RgbImage),
    /// The operator fell back (passthrough or a simpler algorithm).
    Degraded(RgbImage, String),
}

impl Restored {
    pub fn into_image(self) -> RgbImage {
        match self {
            Self::Ok(image) | Self::Degraded(image, _) => image,
        }
    }

    pub fn degraded_reason(&self) -> Option<&str> {
        match self {
            Self::Ok(_) => None,
            Self::Degraded(_, reason) => Some(reason),
        }
    }
}

/// An opaque image transform: denoise/deblur, upscale, or face restoration.
///
/// Implementations never fail outward; internal failures become
/// [`Restored::Degraded`]. They must be safe to call from several requests
/// at once.
pub trait RestorationOperator: Send + Sync {
    /// Stable identifier. For the upscale operator this is also its
    /// operation-log tag.
    fn name(&self) -> &str;

    /// Transform the working image. Only the denoise/deblur operator reads
    /// `mode`.
    fn transform(&self, image: RgbImage, mode: Option<DeblurMode>) -> Restored;
}
