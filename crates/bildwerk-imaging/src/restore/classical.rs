// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Classical (non-learned) restoration operators. These are the built-in
// providers and the fallbacks for learned ones: median denoising, unsharp
// masking, Lanczos upscaling, and a passthrough face restorer.

use bildwerk_core::types::DeblurMode;
use image::imageops::FilterType;
use image::{Rgb, RgbImage};
use imageproc::filter::{gaussian_blur_f32, median_filter};
use tracing::{debug, info, instrument};

use super::{RestorationOperator, Restored};

/// Mode-selectable denoise/deblur operator.
///
/// - `Denoise`: 3x3 median filter per channel.
/// - `DefocusDeblur`: unsharp mask, sigma 1.0, amount 1.0.
/// - `MotionDeblur`: unsharp mask, sigma 2.0, amount 1.5.
#[derive(Debug, Clone, Default)]
pub struct ClassicalDeblur;

impl ClassicalDeblur {
    pub fn new() -> Self {
        Self
    }
}

impl RestorationOperator for ClassicalDeblur {
    fn name(&self) -> &str {
        "classical_deblur"
    }

    #[instrument(skip(self, image), fields(width = image.width(), height = image.height()))]
    fn transform(&self, image: RgbImage, mode: Option<DeblurMode>) -> Restored {
        let Some(mode) = mode else {
            return Restored::Degraded(image, "no denoise/deblur mode given".into());
        };
        info!(%mode, "Applying classical restoration");

        let restored = match mode {
            DeblurMode::Denoise => median_filter(&image, 1, 1),
            DeblurMode::DefocusDeblur => unsharp_mask(&image, 1.0, 1.0),
            DeblurMode::MotionDeblur => unsharp_mask(&image, 2.0, 1.5),
        };
        Restored::Ok(restored)
    }
}

/// Sharpen by adding back `amount` times the difference from a Gaussian blur.
fn unsharp_mask(image: &RgbImage, sigma: f32, amount: f32) -> RgbImage {
    let blurred = gaussian_blur_f32(image, sigma);
    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb(orig) = *image.get_pixel(x, y);
        let Rgb(blur) = *blurred.get_pixel(x, y);
        let adjust = |o: u8, b: u8| -> u8 {
            let o = o as f32;
            let val = o + amount * (o - b as f32);
            val.round().clamp(0.0, 255.0) as u8
        };
        Rgb([
            adjust(orig[0], blur[0]),
            adjust(orig[1], blur[1]),
            adjust(orig[2], blur[2]),
        ])
    })
}

/// Fixed-factor Lanczos3 upscaler.
#[derive(Debug, Clone)]
pub struct LanczosUpscaler {
    factor: u32,
    name: String,
}

impl LanczosUpscaler {
    /// `factor` is clamped to at least 1.
    pub fn new(factor: u32) -> Self {
        let factor = factor.max(1);
        Self {
            factor,
            name: format!("upscale_x{factor}"),
        }
    }

    pub fn factor(&self) -> u32 {
        self.factor
    }
}

impl RestorationOperator for LanczosUpscaler {
    fn name(&self) -> &str {
        &self.name
    }

    #[instrument(skip(self, image), fields(factor = self.factor))]
    fn transform(&self, image: RgbImage, _mode: Option<DeblurMode>) -> Restored {
        let (w, h) = image.dimensions();
        let (Some(new_w), Some(new_h)) = (w.checked_mul(self.factor), h.checked_mul(self.factor))
        else {
            return Restored::Degraded(
                image,
                format!("{}x{} cannot be scaled by {}", w, h, self.factor),
            );
        };

        info!(from_w = w, from_h = h, new_w, new_h, "Upscaling image");
        let resized = image::imageops::resize(&image, new_w, new_h, FilterType::Lanczos3);
        debug!("Upscale complete");
        Restored::Ok(resized)
    }
}

/// Stand-in used when no face-restoration model is configured. Returns the
/// image untouched and reports the run as degraded.
#[derive(Debug, Clone, Copy, Default)]
pub struct PassthroughFaceRestorer;

impl RestorationOperator for PassthroughFaceRestorer {
    fn name(&self) -> &str {
        "face_restore_passthrough"
    }

    fn transform(&self, image: RgbImage, _mode: Option<DeblurMode>) -> Restored {
        Restored::Degraded(image, "no face restoration model configured".into())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn edge_image() -> RgbImage {
        RgbImage::from_fn(16, 16, |x, _| {
            if x < 8 {
                Rgb([60, 60, 60])
            } else {
                Rgb([190, 190, 190])
            }
        })
    }

    #[test]
    fn denoise_removes_isolated_speck() {
        let mut img = RgbImage::from_pixel(9, 9, Rgb([100, 100, 100]));
        img.put_pixel(4, 4, Rgb([255, 0, 255]));
        let out = ClassicalDeblur::new()
            .transform(img, Some(DeblurMode::Denoise))
            .into_image();
        assert_eq!(out.get_pixel(4, 4), &Rgb([100, 100, 100]));
    }

    #[test]
    fn deblur_modes_increase_edge_contrast() {
        let img = edge_image();
        for mode in [DeblurMode::DefocusDeblur, DeblurMode::MotionDeblur] {
            let out = ClassicalDeblur::new().transform(img.clone(), Some(mode));
            assert!(out.degraded_reason().is_none());
            let out = out.into_image();
            assert_eq!(out.dimensions(), img.dimensions());
            // Dark side of the edge gets darker, bright side brighter.
            assert!(out.get_pixel(7, 8).0[0] < 60, "{mode}");
            assert!(out.get_pixel(8, 8).0[0] > 190, "{mode}");
        }
    }

    #[test]
    fn missing_mode_is_degraded_passthrough() {
        let img = edge_image();
        let out = ClassicalDeblur::new().transform(img.clone(), None);
        assert!(out.degraded_reason().is_some());
        assert_eq!(out.into_image(), img);
    }

    #[test]
    fn upscaler_multiplies_dimensions_and_names_itself() {
        let up = LanczosUpscaler::new(4);
        assert_eq!(up.name(), "upscale_x4");
        let out = up.transform(RgbImage::new(10, 7), None).into_image();
        assert_eq!(out.dimensions(), (40, 28));
    }

    #[test]
    fn upscaler_factor_is_at_least_one() {
        let up = LanczosUpscaler::new(0);
        assert_eq!(up.factor(), 1);
        assert_eq!(up.name(), "upscale_x1");
    }

    #[test]
    fn passthrough_face_restorer_keeps_pixels() {
        let img = edge_image();
        let out = PassthroughFaceRestorer.transform(img.clone(), None);
        assert!(out.degraded_reason().is_some());
        assert_eq!(out.into_image(), img);
    }
}
