// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Deterministic post-processing for images that contain text: forcing the
// dark Otsu class to pure black, then a light edge-emphasis pass.

use image::{Rgb, RgbImage};
use imageproc::contrast::otsu_level;
use tracing::{debug, instrument};

use crate::raster::{self, reflect_101};

/// 3x3 sharpening kernel, row-major.
pub const SHARPEN_KERNEL: [[f32; 3]; 3] = [[0.0, -1.0, 0.0], [-1.0, 5.0, -1.0], [0.0, -1.0, 0.0]];

/// Force every pixel in the dark Otsu class of the luminance to black.
///
/// The Otsu level is the last intensity of the dark class, so the mask is
/// `luma <= level`. All other pixels, coloured backgrounds included, keep
/// their values. Returns the number of masked pixels.
#[instrument(skip_all, fields(width = image.width(), height = image.height()))]
pub fn text_contrast(image: &mut RgbImage) -> usize {
    let gray = raster::luminance(image);
    let level = otsu_level(&gray);

    let mut masked = 0usize;
    for (pixel, luma) in image.pixels_mut().zip(gray.pixels()) {
        if luma.0[0] <= level {
            *pixel = Rgb([0, 0, 0]);
            masked += 1;
        }
    }

    debug!(level, masked, "Text contrast applied");
    masked
}

/// Sharpen with [`SHARPEN_KERNEL`] and blend with the input.
///
/// Output is `original_weight * input + (1 - original_weight) * sharpened`,
/// rounded and saturated to 8 bits. Borders are mirrored without repeating
/// the edge pixel.
#[instrument(skip(image), fields(width = image.width(), height = image.height()))]
pub fn edge_emphasis(image: &RgbImage, original_weight: f32) -> RgbImage {
    let sharpened = convolve3x3(image, &SHARPEN_KERNEL);
    let sharpened_weight = 1.0 - original_weight;

    RgbImage::from_fn(image.width(), image.height(), |x, y| {
        let Rgb(orig) = *image.get_pixel(x, y);
        let Rgb(sharp) = *sharpened.get_pixel(x, y);
        let blend = |o: u8, s: u8| -> u8 {
            let val = original_weight * o as f32 + sharpened_weight * s as f32;
            val.round().clamp(0.0, 255.0) as u8
        };
        Rgb([
            blend(orig[0], sharp[0]),
            blend(orig[1], sharp[1]),
            blend(orig[2], sharp[2]),
        ])
    })
}

/// Per-channel 3x3 convolution, saturated to 8 bits.
fn convolve3x3(image: &RgbImage, kernel: &[[f32; 3]; 3]) -> RgbImage {
    let (width, height) = image.dimensions();
    let mut output = RgbImage::new(width, height);

    for y in 0..height {
        for x in 0..width {
            let mut acc = [0.0f32; 3];
            for (ky, row) in kernel.iter().enumerate() {
                let sy = reflect_101(y as i64 + ky as i64 - 1, height);
                for (kx, &weight) in row.iter().enumerate() {
                    if weight == 0.0 {
                        continue;
                    }
                    let sx = reflect_101(x as i64 + kx as i64 - 1, width);
                    let Rgb(src) = *image.get_pixel(sx, sy);
                    for c in 0..3 {
                        acc[c] += weight * src[c] as f32;
                    }
                }
            }
            let clamp = |v: f32| v.round().clamp(0.0, 255.0) as u8;
            output.put_pixel(x, y, Rgb([clamp(acc[0]), clamp(acc[1]), clamp(acc[2])]));
        }
    }

    output
}
