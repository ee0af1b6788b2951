// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Restoration service — one request end to end: decode the upload, run
// analysis and the pipeline, persist the result and its record.
//
// The service is cheap to clone. Clones share the provider registry, so
// models are loaded once per process however many requests run at once.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use bildwerk_core::error::Result;
use bildwerk_core::types::{QualityReport, RequestId, RestorationRecord};
use bildwerk_core::BildwerkConfig;
use bildwerk_imaging::{MetricExtractor, ProviderRegistry, raster};
use chrono::Utc;
use tracing::{info, instrument};

use super::data_dir::ensure_dir;

/// What one restore request produced.
#[derive(Debug, Clone)]
pub struct RestoreOutcome {
    pub record: RestorationRecord,
    /// Location of the JSON sidecar describing the run.
    pub record_path: PathBuf,
}

impl RestoreOutcome {
    pub fn report(&self) -> &QualityReport {
        &self.record.report
    }

    /// Comma-joined operation log, as returned to callers.
    pub fn applied(&self) -> String {
        self.record.applied.joined()
    }

    pub fn saved_path(&self) -> &Path {
        &self.record.output_path
    }
}

#[derive(Clone)]
pub struct RestoreService {
    config: Arc<BildwerkConfig>,
    registry: Arc<ProviderRegistry>,
}

impl RestoreService {
    /// Service with the built-in providers for `config`.
    pub fn new(config: BildwerkConfig) -> Self {
        let registry = Arc::new(ProviderRegistry::with_defaults(&config));
        Self::with_registry(config, registry)
    }

    pub fn with_registry(config: BildwerkConfig, registry: Arc<ProviderRegistry>) -> Self {
        Self {
            config: Arc::new(config),
            registry,
        }
    }

    pub fn registry(&self) -> &ProviderRegistry {
        &self.registry
    }

    /// Measure an image file without restoring it.
    #[instrument(skip(self), fields(path = %path.display()))]
    pub fn analyze_file(&self, path: &Path) -> Result<QualityReport> {
        let image = raster::decode(&std::fs::read(path)?)?;
        let text = self.registry.text_recognizer();
        let faces = self.registry.face_detector();
        Ok(MetricExtractor::new(&self.config.analysis)
            .with_text_recognizer(text.as_deref())
            .with_face_detector(faces.as_deref())
            .assess(&image))
    }

    /// Restore an image file; the output is named after its file stem.
    pub fn restore_file(&self, path: &Path) -> Result<RestoreOutcome> {
        let data = std::fs::read(path)?;
        let name = path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_else(|| "image".to_string());
        self.restore_bytes(&data, &name)
    }

    /// Restore an uploaded image and persist it under the output directory.
    ///
    /// Writes `<id>_<stem>.png` and `<id>_<stem>.json` where `<id>` is the
    /// first 12 hex characters of a fresh request id.
    #[instrument(skip(self, data), fields(bytes = data.len()))]
    pub fn restore_bytes(&self, data: &[u8], file_name: &str) -> Result<RestoreOutcome> {
        let id = RequestId::new();
        let image = raster::decode(data)?;

        let result = bildwerk_imaging::restore(image, &self.config, &self.registry)?;

        let out_dir = ensure_dir(&self.config.output_dir)?;
        let base = format!("{}_{}", id.short(), file_stem(file_name));
        let output_path = out_dir.join(format!("{base}.png"));
        raster::save_png(&result.image, &output_path)?;

        let record = RestorationRecord {
            id,
            processed_at: Utc::now(),
            source: file_name.to_string(),
            output_path,
            report: result.report,
            applied: result.log,
        };
        let record_path = out_dir.join(format!("{base}.json"));
        std::fs::write(&record_path, serde_json::to_string_pretty(&record)?)?;

        info!(
            id = %id,
            source = file_name,
            applied = %record.applied,
            saved = %record.output_path.display(),
            "Restoration saved"
        );
        Ok(RestoreOutcome {
            record,
            record_path,
        })
    }
}

/// File stem of an uploaded name, stripped of any directory components.
fn file_stem(file_name: &str) -> String {
    Path::new(file_name)
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .filter(|s| !s.is_empty())
        .unwrap_or_else(|| "image".to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use bildwerk_core::error::BildwerkError;
    use image::{ImageFormat, Rgb, RgbImage};

    fn service_in(dir: &Path) -> RestoreService {
        let config = BildwerkConfig {
            output_dir: dir.join("out"),
            face_cascade_path: Some(dir.join("no-cascade.xml")),
            ..BildwerkConfig::default()
        };
        RestoreService::new(config)
    }

    fn png_bytes(img: &RgbImage) -> Vec<u8> {
        let mut png = Vec::new();
        img.write_to(&mut std::io::Cursor::new(&mut png), ImageFormat::Png)
            .expect("encode");
        png
    }

    /// Flat photo at exactly the resolution floor.
    fn clean_photo() -> RgbImage {
        RgbImage::from_pixel(800, 600, Rgb([120, 130, 140]))
    }

    #[test]
    fn file_stem_drops_directories_and_extension() {
        assert_eq!(file_stem("scan.jpg"), "scan");
        assert_eq!(file_stem("../../etc/passwd"), "passwd");
        assert_eq!(file_stem(""), "image");
    }

    #[test]
    fn restore_persists_png_and_record() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let service = service_in(tmp.path());

        // Small flat image: blurry by the Laplacian measure and low resolution.
        let input = RgbImage::from_pixel(40, 30, Rgb([200, 190, 180]));
        let outcome = service
            .restore_bytes(&png_bytes(&input), "receipt.jpg")
            .expect("restore");

        assert!(outcome.report().need_upscale());
        assert_eq!(outcome.applied(), "upscale_x4,face_restore_skipped");

        let saved = outcome.saved_path();
        let name = saved.file_name().expect("name").to_string_lossy().into_owned();
        assert!(name.ends_with("_receipt.png"), "{name}");
        assert_eq!(name.len(), 12 + "_receipt.png".len());

        let restored = raster::open(saved).expect("saved image");
        assert_eq!(restored.dimensions(), (160, 120));

        let record: serde_json::Value =
            serde_json::from_str(&std::fs::read_to_string(&outcome.record_path).expect("read"))
                .expect("json");
        assert_eq!(record["source"], "receipt.jpg");
        assert_eq!(record["applied"][0], "upscale_x4");
        assert_eq!(record["report"]["need_upscale"], true);
    }

    #[test]
    fn clean_photo_is_saved_unchanged() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let service = service_in(tmp.path());
        let input = clean_photo();

        let outcome = service
            .restore_bytes(&png_bytes(&input), "holiday.png")
            .expect("restore");

        // A flat image has zero Laplacian variance, so it reads as blurry,
        // but with no text nothing acts on that.
        assert!(outcome.report().need_deblur());
        assert_eq!(outcome.applied(), "face_restore_skipped");
        assert_eq!(raster::open(outcome.saved_path()).expect("open"), input);
    }

    #[test]
    fn undecodable_upload_is_rejected() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let service = service_in(tmp.path());
        let err = service
            .restore_bytes(b"definitely not an image", "notes.txt")
            .unwrap_err();
        assert!(matches!(err, BildwerkError::ImageError(_)));
        assert!(!tmp.path().join("out").exists());
    }

    #[test]
    fn concurrent_requests_get_distinct_outputs() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let service = service_in(tmp.path());
        let data = png_bytes(&RgbImage::from_pixel(20, 20, Rgb([10, 200, 10])));

        let paths: Vec<PathBuf> = std::thread::scope(|scope| {
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let service = service.clone();
                    let data = &data;
                    scope.spawn(move || {
                        service
                            .restore_bytes(data, "same.png")
                            .expect("restore")
                            .saved_path()
                            .to_path_buf()
                    })
                })
                .collect();
            handles.into_iter().map(|h| h.join().expect("join")).collect()
        });

        let mut unique = paths.clone();
        unique.sort();
        unique.dedup();
        assert_eq!(unique.len(), 4);
        assert!(service.registry().initialised_slots().contains(&"upscale"));
    }

    #[test]
    fn analyze_file_reports_without_writing() {
        let tmp = tempfile::tempdir().expect("tempdir");
        let service = service_in(tmp.path());
        let path = tmp.path().join("in.png");
        raster::save_png(&RgbImage::from_pixel(10, 10, Rgb([1, 2, 3])), &path).expect("save");

        let report = service.analyze_file(&path).expect("analyze");
        assert_eq!((report.width(), report.height()), (10, 10));
        assert!(!report.has_text());
        assert!(!tmp.path().join("out").exists());
    }
}
