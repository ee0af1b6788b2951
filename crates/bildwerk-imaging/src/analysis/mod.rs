// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Quality analysis — sharpness, noise, text presence, and face count.

pub mod extractor;
pub mod faces;
pub mod laplacian;
pub mod text;

pub use extractor::MetricExtractor;
pub use faces::{FaceBox, FaceDetector};
pub use text::{TextPresence, TextRecognizer, line_token_confidences};
