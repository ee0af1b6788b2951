// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restoration pipeline — stage orchestration and text post-processing.

pub mod orchestrator;
pub mod postprocess;

pub use orchestrator::{Orchestrator, PipelineResult, restore, select_mode};
pub use postprocess::{edge_emphasis, text_contrast};
