// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// OCR backend for text-presence detection, built on `ocrs` with models
// executed by `rten`. Only compiled with the `ocr` feature.
//
// The engine needs two model files, `text-detection.rten` and
// `text-recognition.rten`. Running `ocrs-cli` once downloads them into
// `$XDG_CACHE_HOME/ocrs` (typically `~/.cache/ocrs`), which is the default
// location searched here.

use std::path::{Path, PathBuf};

use bildwerk_core::error::{BildwerkError, Result};
use image::RgbImage;
use ocrs::{ImageSource, OcrEngine as OcrsEngine, OcrEngineParams};
use rten::Model;
use tracing::{debug, info, instrument};

use crate::analysis::{TextRecognizer, line_token_confidences};

const DETECTION_MODEL_FILENAME: &str = "text-detection.rten";
const RECOGNITION_MODEL_FILENAME: &str = "text-recognition.rten";

/// `$XDG_CACHE_HOME/ocrs`, else `~/.cache/ocrs`, else `./ocrs-models`.
pub fn default_model_dir() -> PathBuf {
    if let Ok(xdg) = std::env::var("XDG_CACHE_HOME") {
        PathBuf::from(xdg).join("ocrs")
    } else if let Ok(home) = std::env::var("HOME") {
        PathBuf::from(home).join(".cache").join("ocrs")
    } else {
        PathBuf::from("ocrs-models")
    }
}

/// Locations of the two model files.
#[derive(Debug, Clone)]
pub struct OcrConfig {
    pub detection_model_path: PathBuf,
    pub recognition_model_path: PathBuf,
}

impl Default for OcrConfig {
    fn default() -> Self {
        Self::from_dir(default_model_dir())
    }
}

impl OcrConfig {
    /// Both models inside `dir`, under their well-known file names.
    pub fn from_dir(dir: impl AsRef<Path>) -> Self {
        let dir = dir.as_ref();
        Self {
            detection_model_path: dir.join(DETECTION_MODEL_FILENAME),
            recognition_model_path: dir.join(RECOGNITION_MODEL_FILENAME),
        }
    }

    /// Fail with [`BildwerkError::OcrError`] unless both files exist.
    pub fn validate(&self) -> Result<()> {
        for (kind, path) in [
            ("detection", &self.detection_model_path),
            ("recognition", &self.recognition_model_path),
        ] {
            if !path.exists() {
                return Err(BildwerkError::OcrError(format!(
                    "{kind} model not found at {}; run `ocrs-cli` once to download models",
                    path.display()
                )));
            }
        }
        Ok(())
    }
}

/// Text recognizer backed by a loaded `ocrs` engine.
///
/// Loading the models is the expensive step; build one engine per process
/// and share it. Debug builds of `ocrs`/`rten` are very slow.
pub struct OcrEngine {
    engine: OcrsEngine,
}

impl OcrEngine {
    #[instrument(skip_all, fields(
        detection = %config.detection_model_path.display(),
        recognition = %config.recognition_model_path.display(),
    ))]
    pub fn new(config: OcrConfig) -> Result<Self> {
        config.validate()?;

        let load = |kind: &str, path: &Path| {
            info!(model = kind, "Loading OCR model");
            Model::load_file(path).map_err(|err| {
                BildwerkError::OcrError(format!(
                    "failed to load {kind} model from {}: {err}",
                    path.display()
                ))
            })
        };
        let detection_model = load("detection", &config.detection_model_path)?;
        let recognition_model = load("recognition", &config.recognition_model_path)?;

        let engine = OcrsEngine::new(OcrEngineParams {
            detection_model: Some(detection_model),
            recognition_model: Some(recognition_model),
            ..Default::default()
        })
        .map_err(|err| BildwerkError::OcrError(format!("failed to initialise OCR engine: {err}")))?;

        info!("OCR engine ready");
        Ok(Self { engine })
    }

    /// Recognise every text line, keeping `None` for lines that failed.
    #[instrument(skip_all, fields(width = image.width(), height = image.height()))]
    pub fn recognize_lines(&self, image: &RgbImage) -> Result<Vec<Option<String>>> {
        let (width, height) = image.dimensions();
        let source = ImageSource::from_bytes(image.as_raw(), (width, height)).map_err(|err| {
            BildwerkError::OcrError(format!(
                "failed to create image source ({width}x{height}): {err}"
            ))
        })?;

        let input = self
            .engine
            .prepare_input(source)
            .map_err(|err| BildwerkError::OcrError(format!("OCR preprocessing failed: {err}")))?;

        let words = self
            .engine
            .detect_words(&input)
            .map_err(|err| BildwerkError::OcrError(format!("word detection failed: {err}")))?;
        let lines = self.engine.find_text_lines(&input, &words);
        debug!(words = words.len(), lines = lines.len(), "Text regions found");

        let recognised = self
            .engine
            .recognize_text(&input, &lines)
            .map_err(|err| BildwerkError::OcrError(format!("line recognition failed: {err}")))?;

        Ok(recognised
            .into_iter()
            .map(|line| line.map(|l| l.to_string()))
            .collect())
    }
}

impl TextRecognizer for OcrEngine {
    fn token_confidences(&self, image: &RgbImage) -> Result<Vec<Option<f32>>> {
        let lines = self.recognize_lines(image)?;
        let tokens: Vec<Option<f32>> = lines
            .iter()
            .flat_map(|line| line_token_confidences(line.as_deref()))
            .collect();
        debug!(lines = lines.len(), tokens = tokens.len(), "OCR tokens scored");
        Ok(tokens)
    }
}
