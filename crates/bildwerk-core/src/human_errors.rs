// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Human-readable error messages for the command-line front end.
//
// Every technical error is mapped to plain English with a clear suggestion.

use crate::error::BildwerkError;

/// Severity of an error from the user's perspective.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    /// A retry may succeed (disk briefly full, file locked).
    Transient,
    /// The user must change something (path, permissions, config).
    ActionRequired,
    /// Retrying with the same input cannot help.
    Permanent,
}

/// A human-readable error with plain English message and actionable suggestion.
#[derive(Debug, Clone)]
pub struct HumanError {
    /// Plain English summary.
    pub message: String,
    /// What the user should try.
    pub suggestion: String,
    /// Whether running the same command again could succeed.
    pub retriable: bool,
    pub severity: Severity,
}

impl std::fmt::Display for HumanError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} {}", self.message, self.suggestion)
    }
}

/// Convert a `BildwerkError` into a `HumanError`.
pub fn humanize_error(err: &BildwerkError) -> HumanError {
    match err {
        BildwerkError::ImageError(_) => HumanError {
            message: "That file isn't an image we can read.".into(),
            suggestion: "The file may be damaged or in an unusual format. Try saving it as a PNG or JPEG first.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::EmptyImage { .. } => HumanError {
            message: "That image has no pixels.".into(),
            suggestion: "Check the file opens in an image viewer and has a size of at least 1x1.".into(),
            retriable: false,
            severity: Severity::Permanent,
        },

        BildwerkError::OcrError(_) => HumanError {
            message: "Text recognition isn't working.".into(),
            suggestion: "Check that the OCR model files are present in the model directory. Images are still restored without text detection.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::FaceDetection(_) | BildwerkError::CapabilityUnavailable(_) => HumanError {
            message: "One of the restoration helpers isn't available.".into(),
            suggestion: "Processing continues with a simpler fallback. Run `bildwerk health` to see what is missing.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::InvalidConfig(detail) => HumanError {
            message: "The configuration file has a problem.".into(),
            suggestion: format!("Fix the value in your config file and try again. ({detail})"),
            retriable: false,
            severity: Severity::ActionRequired,
        },

        BildwerkError::Io(io_err) => {
            if io_err.kind() == std::io::ErrorKind::NotFound {
                HumanError {
                    message: "The file couldn't be found.".into(),
                    suggestion: "Check the path is spelled correctly and the file still exists.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else if io_err.kind() == std::io::ErrorKind::PermissionDenied {
                HumanError {
                    message: "Permission denied.".into(),
                    suggestion: "Check you can read the input and write to the output directory.".into(),
                    retriable: false,
                    severity: Severity::ActionRequired,
                }
            } else {
                HumanError {
                    message: "There was a problem reading or writing a file.".into(),
                    suggestion: "Try again. If this keeps happening, your disk may be full.".into(),
                    retriable: true,
                    severity: Severity::Transient,
                }
            }
        }

        BildwerkError::Serialization(_) => HumanError {
            message: "A JSON file couldn't be read or written.".into(),
            suggestion: "If you passed --config, check that the file is valid JSON.".into(),
            retriable: false,
            severity: Severity::ActionRequired,
        },
    }
}
