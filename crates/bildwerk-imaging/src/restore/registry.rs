// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Provider registry — owns every capability provider for the life of the
// process and initialises each one lazily, exactly once.
//
// Each slot is a `OnceLock`, so concurrent first use from several requests
// runs the factory a single time while the other callers wait for it. The
// registry itself is `Send + Sync` and is shared between requests via `Arc`.

use std::sync::{Arc, OnceLock};

use bildwerk_core::config::BildwerkConfig;
use serde::Serialize;
use tracing::info;

use super::classical::{ClassicalDeblur, LanczosUpscaler, PassthroughFaceRestorer};
use super::RestorationOperator;
use crate::analysis::{FaceDetector, TextRecognizer};

type Factory<T> = Box<dyn Fn() -> T + Send + Sync>;

/// A value built on first access and cached afterwards.
struct Lazy<T> {
    name: &'static str,
    cell: OnceLock<T>,
    init: Factory<T>,
}

impl<T> Lazy<T> {
    fn new(name: &'static str, init: Factory<T>) -> Self {
        Self {
            name,
            cell: OnceLock::new(),
            init,
        }
    }

    fn get(&self) -> &T {
        self.cell.get_or_init(|| {
            info!(provider = self.name, "Initialising provider");
            (self.init)()
        })
    }

    fn is_initialised(&self) -> bool {
        self.cell.get().is_some()
    }
}

/// Availability of one provider, as reported by [`ProviderRegistry::health`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProviderStatus {
    pub slot: &'static str,
    /// Provider name, or `None` when the capability is unavailable.
    pub provider: Option<String>,
}

/// Process-wide set of restoration operators and analysis capabilities.
pub struct ProviderRegistry {
    deblur: Lazy<Arc<dyn RestorationOperator>>,
    upscale: Lazy<Arc<dyn RestorationOperator>>,
    face_restore: Lazy<Arc<dyn RestorationOperator>>,
    text: Lazy<Option<Arc<dyn TextRecognizer>>>,
    faces: Lazy<Option<Arc<dyn FaceDetector>>>,
}

impl ProviderRegistry {
    /// Start from the built-in providers for `config`.
    pub fn builder(config: &BildwerkConfig) -> RegistryBuilder {
        RegistryBuilder::new(config)
    }

    /// Registry with built-in providers only.
    pub fn with_defaults(config: &BildwerkConfig) -> Self {
        Self::builder(config).build()
    }

    pub fn deblur(&self) -> Arc<dyn RestorationOperator> {
        Arc::clone(self.deblur.get())
    }

    pub fn upscale(&self) -> Arc<dyn RestorationOperator> {
        Arc::clone(self.upscale.get())
    }

    pub fn face_restore(&self) -> Arc<dyn RestorationOperator> {
        Arc::clone(self.face_restore.get())
    }

    pub fn text_recognizer(&self) -> Option<Arc<dyn TextRecognizer>> {
        self.text.get().clone()
    }

    pub fn face_detector(&self) -> Option<Arc<dyn FaceDetector>> {
        self.faces.get().clone()
    }

    /// Initialise every slot and report what is available.
    pub fn health(&self) -> Vec<ProviderStatus> {
        vec![
            ProviderStatus {
                slot: self.deblur.name,
                provider: Some(self.deblur().name().to_string()),
            },
            ProviderStatus {
                slot: self.upscale.name,
                provider: Some(self.upscale().name().to_string()),
            },
            ProviderStatus {
                slot: self.face_restore.name,
                provider: Some(self.face_restore().name().to_string()),
            },
            ProviderStatus {
                slot: self.text.name,
                provider: self.text_recognizer().map(|_| "ocr".to_string()),
            },
            ProviderStatus {
                slot: self.faces.name,
                provider: self.face_detector().map(|_| "face_detector".to_string()),
            },
        ]
    }

    /// Names of the slots that have been initialised so far.
    pub fn initialised_slots(&self) -> Vec<&'static str> {
        let mut slots = Vec::new();
        if self.deblur.is_initialised() {
            slots.push(self.deblur.name);
        }
        if self.upscale.is_initialised() {
            slots.push(self.upscale.name);
        }
        if self.face_restore.is_initialised() {
            slots.push(self.face_restore.name);
        }
        if self.text.is_initialised() {
            slots.push(self.text.name);
        }
        if self.faces.is_initialised() {
            slots.push(self.faces.name);
        }
        slots
    }
}

/// Configures which provider fills each registry slot.
///
/// Every slot starts with a built-in factory; the `with_*` methods replace
/// it. Factories run lazily, on first use.
pub struct RegistryBuilder {
    deblur: Factory<Arc<dyn RestorationOperator>>,
    upscale: Factory<Arc<dyn RestorationOperator>>,
    face_restore: Factory<Arc<dyn RestorationOperator>>,
    text: Factory<Option<Arc<dyn TextRecognizer>>>,
    faces: Factory<Option<Arc<dyn FaceDetector>>>,
}

impl RegistryBuilder {
    fn new(config: &BildwerkConfig) -> Self {
        let factor = config.pipeline.upscale_factor;
        Self {
            deblur: Box::new(|| Arc::new(ClassicalDeblur::new()) as Arc<dyn RestorationOperator>),
            upscale: Box::new(move || {
                Arc::new(LanczosUpscaler::new(factor)) as Arc<dyn RestorationOperator>
            }),
            face_restore: Box::new(|| {
                Arc::new(PassthroughFaceRestorer) as Arc<dyn RestorationOperator>
            }),
            text: default_text_factory(config),
            faces: default_face_factory(config),
        }
    }

    pub fn with_deblur(mut self, op: Arc<dyn RestorationOperator>) -> Self {
        self.deblur = Box::new(move || Arc::clone(&op));
        self
    }

    pub fn with_upscale(mut self, op: Arc<dyn RestorationOperator>) -> Self {
        self.upscale = Box::new(move || Arc::clone(&op));
        self
    }

    pub fn with_face_restore(mut self, op: Arc<dyn RestorationOperator>) -> Self {
        self.face_restore = Box::new(move || Arc::clone(&op));
        self
    }

    pub fn with_text_recognizer(mut self, recognizer: Option<Arc<dyn TextRecognizer>>) -> Self {
        self.text = Box::new(move || recognizer.clone());
        self
    }

    /// Replace the text-recognizer factory, e.g. with one that loads models.
    pub fn with_text_factory<F>(mut self, factory: F) -> Self
    where
        F: Fn() -> Option<Arc<dyn TextRecognizer>> + Send + Sync + 'static,
    {
        self.text = Box::new(factory);
        self
    }

    pub fn with_face_detector(mut self, detector: Option<Arc<dyn FaceDetector>>) -> Self {
        self.faces = Box::new(move || detector.clone());
        self
    }

    pub fn build(self) -> ProviderRegistry {
        ProviderRegistry {
            deblur: Lazy::new("deblur", self.deblur),
            upscale: Lazy::new("upscale", self.upscale),
            face_restore: Lazy::new("face_restore", self.face_restore),
            text: Lazy::new("text_recognizer", self.text),
            faces: Lazy::new("face_detector", self.faces),
        }
    }
}

#[cfg(feature = "ocr")]
fn default_text_factory(config: &BildwerkConfig) -> Factory<Option<Arc<dyn TextRecognizer>>> {
    use crate::ocr::{OcrConfig, OcrEngine};
    use tracing::warn;

    let ocr_config = match &config.ocr_model_dir {
        Some(dir) => OcrConfig::from_dir(dir),
        None => OcrConfig::default(),
    };
    Box::new(move || match OcrEngine::new(ocr_config.clone()) {
        Ok(engine) => Some(Arc::new(engine) as Arc<dyn TextRecognizer>),
        Err(err) => {
            warn!(error = %err, "OCR engine unavailable; text detection disabled");
            None
        }
    })
}

#[cfg(not(feature = "ocr"))]
fn default_text_factory(_config: &BildwerkConfig) -> Factory<Option<Arc<dyn TextRecognizer>>> {
    Box::new(|| {
        tracing::debug!("Built without the `ocr` feature; text detection disabled");
        None
    })
}

#[cfg(feature = "faces")]
fn default_face_factory(config: &BildwerkConfig) -> Factory<Option<Arc<dyn FaceDetector>>> {
    use crate::haar::{HaarCascade, resolve_cascade_path};
    use tracing::warn;

    let path = resolve_cascade_path(config.face_cascade_path.as_deref());
    Box::new(move || {
        let Some(path) = &path else {
            warn!("No face cascade found; face detection disabled");
            return None;
        };
        match HaarCascade::load(path) {
            Ok(cascade) => Some(Arc::new(cascade) as Arc<dyn FaceDetector>),
            Err(err) => {
                warn!(
                    path = %path.display(),
                    error = %err,
                    "Face cascade unavailable; face detection disabled"
                );
                None
            }
        }
    })
}

#[cfg(not(feature = "faces"))]
fn default_face_factory(_config: &BildwerkConfig) -> Factory<Option<Arc<dyn FaceDetector>>> {
    Box::new(|| {
        tracing::debug!("Built without the `faces` feature; face detection disabled");
        None
    })
}
