// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Bildwerk — Core types, decision rules, and error definitions shared across
// all crates.

pub mod config;
pub mod decision;
pub mod error;
pub mod human_errors;
pub mod types;

pub use config::{AnalysisConfig, BildwerkConfig, FaceDetectionParams, PipelineConfig};
pub use decision::{RemediationFlags, decide};
pub use error::BildwerkError;
pub use types::*;
