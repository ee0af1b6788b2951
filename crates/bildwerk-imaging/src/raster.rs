// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Raster I/O — decoding uploaded bytes into RGB working images, saving
// results, luminance conversion, and border handling for 3x3 filters.

use std::path::Path;

use bildwerk_core::error::{BildwerkError, Result};
use image::{DynamicImage, GrayImage, ImageFormat, Luma, RgbImage};
use tracing::{debug, info, instrument};

/// Decode raw encoded bytes (PNG, JPEG, etc.) into an RGB image.
///
/// Alpha is dropped and every other colour type is converted to 8-bit RGB.
/// Fails if the bytes do not decode or the image has no pixels.
#[instrument(skip(data), fields(data_len = data.len()))]
pub fn decode(data: &[u8]) -> Result<RgbImage> {
    let img = image::load_from_memory(data)
        .map_err(|err| BildwerkError::ImageError(format!("failed to decode image: {}", err)))?;
    debug!(
        width = img.width(),
        height = img.height(),
        "Image decoded from bytes"
    );
    into_rgb(img)
}

/// Load an image from a file path.
#[instrument(skip_all, fields(path = %path.as_ref().display()))]
pub fn open(path: impl AsRef<Path>) -> Result<RgbImage> {
    let img = image::open(path.as_ref()).map_err(|err| {
        BildwerkError::ImageError(format!(
            "failed to open {}: {}",
            path.as_ref().display(),
            err
        ))
    })?;
    info!(width = img.width(), height = img.height(), "Image loaded");
    into_rgb(img)
}

/// Write an RGB image to `path` as PNG, regardless of the extension.
pub fn save_png(image: &RgbImage, path: impl AsRef<Path>) -> Result<()> {
    image
        .save_with_format(path.as_ref(), ImageFormat::Png)
        .map_err(|err| {
            BildwerkError::ImageError(format!(
                "failed to save image to {}: {}",
                path.as_ref().display(),
                err
            ))
        })
}

/// BT.601 luma weights in 14-bit fixed point; they sum to `1 << 14`.
const LUMA_R: u32 = 4899;
const LUMA_G: u32 = 9617;
const LUMA_B: u32 = 1868;
const LUMA_SHIFT: u32 = 14;

/// Single-channel luminance of an RGB image.
///
/// `Y = 0.299 R + 0.587 G + 0.114 B`, rounded to nearest. The analysis
/// thresholds are calibrated against this weighting.
pub fn luminance(image: &RgbImage) -> GrayImage {
    GrayImage::from_fn(image.width(), image.height(), |x, y| {
        let [r, g, b] = image.get_pixel(x, y).0;
        let weighted = LUMA_R * r as u32 + LUMA_G * g as u32 + LUMA_B * b as u32;
        Luma([((weighted + (1 << (LUMA_SHIFT - 1))) >> LUMA_SHIFT) as u8])
    })
}

/// Mirror an out-of-range coordinate back inside `0..len` without
/// repeating the edge pixel (`dcb|abcd|cba`).
pub(crate) fn reflect_101(i: i64, len: u32) -> u32 {
    let len = len as i64;
    if len <= 1 {
        return 0;
    }
    let period = 2 * (len - 1);
    let mut i = i.rem_euclid(period);
    if i >= len {
        i = period - i;
    }
    i as u32
}

/// Reject images with a zero dimension.
pub fn ensure_not_empty(image: &RgbImage) -> Result<()> {
    let (width, height) = image.dimensions();
    if width == 0 || height == 0 {
        return Err(BildwerkError::EmptyImage { width, height });
    }
    Ok(())
}

fn into_rgb(img: DynamicImage) -> Result<RgbImage> {
    let rgb = img.into_rgb8();
    ensure_not_empty(&rgb)?;
    Ok(rgb)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::Rgb;

    #[test]
    fn png_bytes_decode_back_to_same_pixels() {
        let img = RgbImage::from_fn(7, 5, |x, y| Rgb([(x * 30) as u8, (y * 40) as u8, 99]));
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode");
        let decoded = decode(&png).expect("decode");
        assert_eq!(decoded, img);
    }

    #[test]
    fn garbage_bytes_are_rejected() {
        let err = decode(b"definitely not an image").unwrap_err();
        assert!(matches!(err, BildwerkError::ImageError(_)));
    }

    #[test]
    fn empty_image_is_rejected() {
        let err = ensure_not_empty(&RgbImage::new(0, 4)).unwrap_err();
        assert!(matches!(err, BildwerkError::EmptyImage { width: 0, height: 4 }));
    }

    #[test]
    fn luminance_of_grey_is_grey() {
        let img = RgbImage::from_pixel(3, 3, Rgb([120, 120, 120]));
        let luma = luminance(&img);
        assert!(luma.pixels().all(|p| p.0[0] == 120));
    }

    #[test]
    fn luminance_uses_bt601_weights() {
        let img = RgbImage::from_fn(5, 1, |x, _| match x {
            0 => Rgb([255, 0, 0]),
            1 => Rgb([0, 255, 0]),
            2 => Rgb([0, 0, 255]),
            3 => Rgb([20, 0, 0]),
            _ => Rgb([255, 255, 255]),
        });
        let luma = luminance(&img);
        let values: Vec<u8> = luma.pixels().map(|p| p.0[0]).collect();
        assert_eq!(values, vec![76, 150, 29, 6, 255]);
    }

    #[test]
    fn reflect_101_mirrors_without_repeating_edge() {
        assert_eq!(reflect_101(-1, 5), 1);
        assert_eq!(reflect_101(5, 5), 3);
        assert_eq!(reflect_101(2, 5), 2);
        assert_eq!(reflect_101(-1, 1), 0);
    }
}
