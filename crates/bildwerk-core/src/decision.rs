// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Decision engine — maps measured quality signals to remediation flags.

use serde::Serialize;

use crate::config::AnalysisConfig;
use crate::types::Measurements;

/// Which classes of defect the pipeline should try to remedy.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
pub struct RemediationFlags {
    pub need_deblur: bool,
    pub need_denoise: bool,
    pub need_upscale: bool,
}

/// Derive remediation flags from measurements and fixed thresholds.
///
/// Pure: no I/O, no hidden state. Identical inputs always give identical
/// flags.
pub fn decide(measurements: &Measurements, config: &AnalysisConfig) -> RemediationFlags {
    RemediationFlags {
        need_deblur: measurements.sharpness_score < config.blur_threshold,
        need_denoise: measurements.noise_estimate > config.noise_threshold,
        need_upscale: measurements.pixel_count() < config.low_res_threshold,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn measurements(sharpness: f64, noise: f64, width: u32, height: u32) -> Measurements {
        Measurements {
            width,
            height,
            sharpness_score: sharpness,
            noise_estimate: noise,
            has_text: false,
            text_confidence: 0.0,
            face_count: 0,
        }
    }

    #[test]
    fn thresholds_are_strict() {
        let config = AnalysisConfig::default();

        // Exactly at every threshold: nothing is flagged.
        let flags = decide(&measurements(100.0, 12.0, 800, 600), &config);
        assert_eq!(flags, RemediationFlags::default());

        let flags = decide(&measurements(99.9, 12.1, 799, 600), &config);
        assert!(flags.need_deblur);
        assert!(flags.need_denoise);
        assert!(flags.need_upscale);
    }

    #[test]
    fn deciding_twice_is_idempotent() {
        let config = AnalysisConfig::default();
        let m = measurements(55.0, 20.0, 320, 240);
        assert_eq!(decide(&m, &config), decide(&m, &config));
    }

    #[test]
    fn custom_thresholds_are_honoured() {
        let config = AnalysisConfig {
            blur_threshold: 10.0,
            noise_threshold: 50.0,
            low_res_threshold: 100,
            ..AnalysisConfig::default()
        };
        let flags = decide(&measurements(20.0, 20.0, 10, 10), &config);
        assert_eq!(flags, RemediationFlags::default());
    }
}
