// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Laplacian-response statistics: sharpness (variance) and noise (standard
// deviation) of the same second-derivative signal.

use image::GrayImage;

use crate::raster::reflect_101;

/// Population variance of the 3x3 Laplacian response over every pixel.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct LaplacianStats {
    pub variance: f64,
}

impl LaplacianStats {
    /// Sharpness score: the variance. Low means few edges, likely blurred.
    pub fn sharpness(&self) -> f64 {
        self.variance
    }

    /// Noise estimate: the standard deviation. Fine texture counts as noise
    /// here too.
    pub fn noise(&self) -> f64 {
        self.variance.sqrt()
    }
}

/// Apply the `0 1 0 / 1 -4 1 / 0 1 0` kernel and summarise its response.
///
/// The response is kept unsaturated, borders are mirrored without repeating
/// the edge pixel, and statistics divide by N.
pub fn laplacian_stats(luma: &GrayImage) -> LaplacianStats {
    let (width, height) = luma.dimensions();
    let count = width as u64 * height as u64;
    if count == 0 {
        return LaplacianStats { variance: 0.0 };
    }

    let at = |x: i64, y: i64| -> i64 {
        luma.get_pixel(reflect_101(x, width), reflect_101(y, height)).0[0] as i64
    };

    let mut sum = 0.0f64;
    let mut sum_sq = 0.0f64;
    for y in 0..height as i64 {
        for x in 0..width as i64 {
            let response =
                at(x, y - 1) + at(x - 1, y) + at(x + 1, y) + at(x, y + 1) - 4 * at(x, y);
            let v = response as f64;
            sum += v;
            sum_sq += v * v;
        }
    }

    let n = count as f64;
    let mean = sum / n;
    // Clamp tiny negative values from floating-point cancellation.
    let variance = (sum_sq / n - mean * mean).max(0.0);

    LaplacianStats { variance }
}
