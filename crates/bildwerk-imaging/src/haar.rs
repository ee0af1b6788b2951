// SPDX-License-Identifier: PMPL-1.0-or-later
// Copyright (c) 2026 Jonathan D.A. Jewell (hyperpolymath) <jonathan.jewell@open.ac.uk>
//
// Haar-cascade face detector reading OpenCV's XML cascade format, such as
// the stock `haarcascade_frontalface_default.xml`. Only compiled with the
// `faces` feature.
//
// Every window position of a scale pyramid is pushed through the boosted
// stages; hits that overlap are grouped and a group only counts as a face
// when it has more than `min_neighbors` members.

use std::borrow::Cow;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use bildwerk_core::config::FaceDetectionParams;
use bildwerk_core::error::{BildwerkError, Result};
use image::GrayImage;
use image::imageops::{self, FilterType};
use roxmltree::{Document, Node};
use tracing::{debug, info, instrument};

use crate::analysis::{FaceBox, FaceDetector};

const CASCADE_FILENAME: &str = "haarcascade_frontalface_default.xml";

/// Relative edge tolerance when grouping overlapping hits.
pub const GROUP_EPS: f64 = 0.2;

/// Subtracted from each stage threshold so that sums landing exactly on it
/// still pass despite float rounding.
const STAGE_THRESHOLD_EPS: f64 = 1e-5;

/// Where OpenCV packages usually install the frontal-face cascade.
pub fn default_cascade_paths() -> Vec<PathBuf> {
    [
        "/usr/share/opencv4/haarcascades",
        "/usr/local/share/opencv4/haarcascades",
        "/usr/share/opencv/haarcascades",
        "/usr/local/share/opencv/haarcascades",
    ]
    .iter()
    .map(|dir| Path::new(dir).join(CASCADE_FILENAME))
    .collect()
}

/// The configured cascade, else the first default location that exists.
pub fn resolve_cascade_path(configured: Option<&Path>) -> Option<PathBuf> {
    match configured {
        Some(path) => Some(path.to_path_buf()),
        None => default_cascade_paths().into_iter().find(|p| p.exists()),
    }
}

#[derive(Debug, Clone, Copy)]
struct WeightedRect {
    x: u32,
    y: u32,
    width: u32,
    height: u32,
    weight: f64,
}

#[derive(Debug, Clone)]
struct Feature {
    rects: Vec<WeightedRect>,
}

/// One decision node. A child `<= 0` names leaf `-child`.
#[derive(Debug, Clone, Copy)]
struct Split {
    left: i32,
    right: i32,
    feature: usize,
    threshold: f64,
}

#[derive(Debug, Clone)]
struct WeakClassifier {
    splits: Vec<Split>,
    leaves: Vec<f64>,
}

impl WeakClassifier {
    fn eval(&self, value_of: impl Fn(usize) -> f64) -> f64 {
        let mut node = 0usize;
        loop {
            let split = self.splits[node];
            let next = if value_of(split.feature) < split.threshold {
                split.left
            } else {
                split.right
            };
            if next <= 0 {
                return self.leaves[next.unsigned_abs() as usize];
            }
            node = next as usize;
        }
    }
}

#[derive(Debug, Clone)]
struct Stage {
    threshold: f64,
    classifiers: Vec<WeakClassifier>,
}

/// A boosted cascade of Haar-like features over a fixed detection window.
#[derive(Debug, Clone)]
pub struct HaarCascade {
    window_width: u32,
    window_height: u32,
    stages: Vec<Stage>,
    features: Vec<Feature>,
}

impl HaarCascade {
    /// Read and parse a cascade file.
    #[instrument(skip_all, fields(path = %path.display()))]
    pub fn load(path: &Path) -> Result<Self> {
        let xml = std::fs::read_to_string(path)?;
        let cascade = Self::from_xml(&xml)?;
        info!(
            stages = cascade.stages.len(),
            features = cascade.features.len(),
            window = cascade.window_width,
            "Face cascade loaded"
        );
        Ok(cascade)
    }

    /// Parse an OpenCV `<cascade>` document with HAAR features.
    pub fn from_xml(xml: &str) -> Result<Self> {
        let doc = Document::parse(xml)
            .map_err(|err| malformed(format!("not valid XML: {err}")))?;
        let cascade = doc
            .descendants()
            .find(|n| n.has_tag_name("cascade"))
            .ok_or_else(|| malformed("no <cascade> element; old-style files are not supported"))?;

        if let Some(kind) = cascade.children().find(|n| n.has_tag_name("featureType")) {
            let kind = kind.text().map(str::trim).unwrap_or_default();
            if kind != "HAAR" {
                return Err(malformed(format!("unsupported feature type {kind:?}")));
            }
        }

        let window_width: u32 = scalar(cascade, "width")?;
        let window_height: u32 = scalar(cascade, "height")?;
        if window_width < 3 || window_height < 3 {
            return Err(malformed(format!(
                "detection window {window_width}x{window_height} is too small"
            )));
        }

        let features = items(child(cascade, "features")?)
            .map(parse_feature)
            .collect::<Result<Vec<_>>>()?;
        let stages = items(child(cascade, "stages")?)
            .map(parse_stage)
            .collect::<Result<Vec<_>>>()?;

        let cascade = Self {
            window_width,
            window_height,
            stages,
            features,
        };
        cascade.check()?;
        Ok(cascade)
    }

    /// Reject trees that would index out of range or loop.
    fn check(&self) -> Result<()> {
        if self.stages.is_empty() {
            return Err(malformed("cascade has no stages"));
        }
        for (f, feature) in self.features.iter().enumerate() {
            for r in &feature.rects {
                let right = r.x.saturating_add(r.width);
                let bottom = r.y.saturating_add(r.height);
                if right > self.window_width || bottom > self.window_height {
                    return Err(malformed(format!("feature {f} leaves the detection window")));
                }
            }
        }
        for (s, stage) in self.stages.iter().enumerate() {
            for weak in &stage.classifiers {
                for (i, split) in weak.splits.iter().enumerate() {
                    if split.feature >= self.features.len() {
                        return Err(malformed(format!(
                            "stage {s} uses feature {} of {}",
                            split.feature,
                            self.features.len()
                        )));
                    }
                    for next in [split.left, split.right] {
                        let valid = if next > 0 {
                            (next as usize) > i && (next as usize) < weak.splits.len()
                        } else {
                            (next.unsigned_abs() as usize) < weak.leaves.len()
                        };
                        if !valid {
                            return Err(malformed(format!("stage {s} has a dangling node {next}")));
                        }
                    }
                }
            }
        }
        Ok(())
    }

    /// Window origin positions (at the original scale) that pass every stage.
    fn scan(&self, luma: &GrayImage, scale_step: f64, min_face_size: u32) -> Vec<FaceBox> {
        let (width, height) = luma.dimensions();
        let mut hits = Vec::new();
        let mut factor = 1.0f64;

        loop {
            let win_w = (f64::from(self.window_width) * factor).round() as u32;
            let win_h = (f64::from(self.window_height) * factor).round() as u32;
            if win_w > width || win_h > height {
                break;
            }
            let scaled_w = (f64::from(width) / factor).round() as u32;
            let scaled_h = (f64::from(height) / factor).round() as u32;
            if scaled_w < self.window_width || scaled_h < self.window_height {
                break;
            }

            if win_w >= min_face_size && win_h >= min_face_size {
                let scaled: Cow<'_, GrayImage> = if (scaled_w, scaled_h) == (width, height) {
                    Cow::Borrowed(luma)
                } else {
                    Cow::Owned(imageops::resize(luma, scaled_w, scaled_h, FilterType::Triangle))
                };
                let integral = Integral::new(&scaled);
                let step = if factor > 2.0 { 1 } else { 2 };

                for y in (0..=scaled_h - self.window_height).step_by(step) {
                    for x in (0..=scaled_w - self.window_width).step_by(step) {
                        if self.accepts(&integral, x, y) {
                            hits.push(FaceBox {
                                x: (f64::from(x) * factor).round() as u32,
                                y: (f64::from(y) * factor).round() as u32,
                                width: win_w,
                                height: win_h,
                            });
                        }
                    }
                }
            }

            factor *= scale_step;
        }

        hits
    }

    /// Run the stages on the window at `(x, y)`. Feature values are divided
    /// by the window's contrast so the thresholds are lighting-independent.
    fn accepts(&self, integral: &Integral, x: u32, y: u32) -> bool {
        let (nw, nh) = (self.window_width - 2, self.window_height - 2);
        let area = f64::from(nw) * f64::from(nh);
        let sum = integral.sum(x + 1, y + 1, nw, nh) as f64;
        let sq_sum = integral.sq_sum(x + 1, y + 1, nw, nh) as f64;
        let spread = area * sq_sum - sum * sum;
        let norm = if spread > 0.0 { spread.sqrt() } else { 1.0 };

        self.stages.iter().all(|stage| {
            let total: f64 = stage
                .classifiers
                .iter()
                .map(|weak| weak.eval(|f| self.feature_value(integral, f, x, y) / norm))
                .sum();
            total >= stage.threshold
        })
    }

    fn feature_value(&self, integral: &Integral, feature: usize, x: u32, y: u32) -> f64 {
        self.features[feature]
            .rects
            .iter()
            .map(|r| r.weight * integral.sum(x + r.x, y + r.y, r.width, r.height) as f64)
            .sum()
    }
}

impl FaceDetector for HaarCascade {
    #[instrument(skip_all, fields(width = luma.width(), height = luma.height()))]
    fn detect(&self, luma: &GrayImage, params: &FaceDetectionParams) -> Result<Vec<FaceBox>> {
        let scale_step = f64::from(params.scale_factor);
        if !(scale_step > 1.0) {
            return Err(BildwerkError::FaceDetection(format!(
                "scale factor must be greater than 1, got {scale_step}"
            )));
        }

        let hits = self.scan(luma, scale_step, params.min_face_size);
        let faces = group_rectangles(&hits, params.min_neighbors, GROUP_EPS);
        debug!(hits = hits.len(), faces = faces.len(), "Cascade scan complete");
        Ok(faces)
    }
}

/// Summed-area tables of pixel values and of their squares.
///
/// Both are `(width+1) x (height+1)` with a zero first row and column, so
/// entry `(x, y)` holds the total over `[0, x) x [0, y)`.
struct Integral {
    stride: usize,
    sum: Vec<u64>,
    sq_sum: Vec<u64>,
}

impl Integral {
    fn new(gray: &GrayImage) -> Self {
        let (w, h) = gray.dimensions();
        let stride = w as usize + 1;
        let len = stride * (h as usize + 1);
        let mut sum = vec![0u64; len];
        let mut sq_sum = vec![0u64; len];

        for y in 0..h {
            let mut row = 0u64;
            let mut row_sq = 0u64;
            for x in 0..w {
                let v = u64::from(gray.get_pixel(x, y).0[0]);
                row += v;
                row_sq += v * v;
                let idx = (y as usize + 1) * stride + x as usize + 1;
                let above = y as usize * stride + x as usize + 1;
                sum[idx] = row + sum[above];
                sq_sum[idx] = row_sq + sq_sum[above];
            }
        }

        Self {
            stride,
            sum,
            sq_sum,
        }
    }

    fn sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        self.rect(&self.sum, x, y, w, h)
    }

    fn sq_sum(&self, x: u32, y: u32, w: u32, h: u32) -> u64 {
        self.rect(&self.sq_sum, x, y, w, h)
    }

    fn rect(&self, table: &[u64], x: u32, y: u32, w: u32, h: u32) -> u64 {
        let at = |x: u32, y: u32| table[y as usize * self.stride + x as usize];
        at(x + w, y + h) + at(x, y) - at(x + w, y) - at(x, y + h)
    }
}

/// Merge overlapping hits into one averaged box per group.
///
/// Two boxes join a group when each of their edges differs by at most
/// `eps * (min width + min height) / 2`. Groups with `min_neighbors` or
/// fewer members are dropped, as is any group lying inside a larger one
/// that has clearly more support. With `min_neighbors == 0` the hits are
/// returned as they are.
pub fn group_rectangles(rects: &[FaceBox], min_neighbors: u32, eps: f64) -> Vec<FaceBox> {
    if min_neighbors == 0 || rects.is_empty() {
        return rects.to_vec();
    }

    let n = rects.len();
    let mut parent: Vec<usize> = (0..n).collect();
    for i in 0..n {
        for j in i + 1..n {
            if similar(&rects[i], &rects[j], eps) {
                let (a, b) = (root(&mut parent, i), root(&mut parent, j));
                if a != b {
                    parent[b] = a;
                }
            }
        }
    }

    // Per group: member count and edge totals.
    let mut totals = vec![(0u32, [0u64; 4]); n];
    for (i, r) in rects.iter().enumerate() {
        let (count, edges) = &mut totals[root(&mut parent, i)];
        *count += 1;
        for (total, v) in edges.iter_mut().zip([r.x, r.y, r.width, r.height]) {
            *total += u64::from(v);
        }
    }

    let groups: Vec<(FaceBox, u32)> = totals
        .into_iter()
        .filter(|(count, _)| *count > 0)
        .map(|(count, [x, y, w, h])| {
            let avg = |total: u64| (total as f64 / f64::from(count)).round() as u32;
            let face = FaceBox {
                x: avg(x),
                y: avg(y),
                width: avg(w),
                height: avg(h),
            };
            (face, count)
        })
        .collect();

    groups
        .iter()
        .enumerate()
        .filter(|&(i, &(inner, n1))| {
            n1 > min_neighbors
                && !groups.iter().enumerate().any(|(j, &(outer, n2))| {
                    j != i
                        && n2 > min_neighbors
                        && (n2 > n1.max(3) || n1 < 3)
                        && nested(&inner, &outer, eps)
                })
        })
        .map(|(_, &(face, _))| face)
        .collect()
}

fn root(parent: &mut [usize], mut i: usize) -> usize {
    while parent[i] != i {
        parent[i] = parent[parent[i]];
        i = parent[i];
    }
    i
}

fn similar(a: &FaceBox, b: &FaceBox, eps: f64) -> bool {
    let delta = eps * f64::from(a.width.min(b.width) + a.height.min(b.height)) * 0.5;
    let close = |p: u32, q: u32| (f64::from(p) - f64::from(q)).abs() <= delta;
    close(a.x, b.x)
        && close(a.y, b.y)
        && close(a.x + a.width, b.x + b.width)
        && close(a.y + a.height, b.y + b.height)
}

/// Whether `inner` lies within `outer` grown by `eps` of its size.
fn nested(inner: &FaceBox, outer: &FaceBox, eps: f64) -> bool {
    let dx = (f64::from(outer.width) * eps).round() as i64;
    let dy = (f64::from(outer.height) * eps).round() as i64;
    let (ix, iy) = (i64::from(inner.x), i64::from(inner.y));
    let (ox, oy) = (i64::from(outer.x), i64::from(outer.y));
    ix >= ox - dx
        && iy >= oy - dy
        && ix + i64::from(inner.width) <= ox + i64::from(outer.width) + dx
        && iy + i64::from(inner.height) <= oy + i64::from(outer.height) + dy
}

// -- XML helpers --------------------------------------------------------------

fn malformed(detail: impl std::fmt::Display) -> BildwerkError {
    BildwerkError::FaceDetection(format!("malformed cascade: {detail}"))
}

fn child<'a, 'input>(node: Node<'a, 'input>, tag: &str) -> Result<Node<'a, 'input>> {
    node.children()
        .find(|n| n.has_tag_name(tag))
        .ok_or_else(|| malformed(format!("missing <{tag}>")))
}

/// The `<_>` list entries below `node`.
fn items<'a, 'input>(node: Node<'a, 'input>) -> impl Iterator<Item = Node<'a, 'input>> {
    node.children().filter(|n| n.has_tag_name("_"))
}

fn tokens<'a>(node: Node<'a, '_>) -> impl Iterator<Item = &'a str> {
    node.text().unwrap_or_default().split_whitespace()
}

fn parse<T: FromStr>(token: &str, tag: &str) -> Result<T> {
    token
        .parse()
        .map_err(|_| malformed(format!("bad value {token:?} in <{tag}>")))
}

fn scalar<T: FromStr>(node: Node<'_, '_>, tag: &str) -> Result<T> {
    let values: Vec<&str> = tokens(child(node, tag)?).collect();
    match values.as_slice() {
        [value] => parse(value, tag),
        _ => Err(malformed(format!("<{tag}> must hold one value"))),
    }
}

fn parse_feature(node: Node<'_, '_>) -> Result<Feature> {
    if let Ok(tilted) = child(node, "tilted") {
        if tokens(tilted).next() == Some("1") {
            return Err(malformed("tilted features are not supported"));
        }
    }

    let rects = items(child(node, "rects")?)
        .map(|rect| {
            let values: Vec<&str> = tokens(rect).collect();
            let [x, y, w, h, weight] = values.as_slice() else {
                return Err(malformed("a rect needs x y width height weight"));
            };
            Ok(WeightedRect {
                x: parse(x, "rects")?,
                y: parse(y, "rects")?,
                width: parse(w, "rects")?,
                height: parse(h, "rects")?,
                weight: parse(weight, "rects")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    if rects.is_empty() {
        return Err(malformed("feature without rects"));
    }
    Ok(Feature { rects })
}

fn parse_stage(node: Node<'_, '_>) -> Result<Stage> {
    let threshold = scalar::<f64>(node, "stageThreshold")? - STAGE_THRESHOLD_EPS;
    let classifiers = items(child(node, "weakClassifiers")?)
        .map(parse_weak_classifier)
        .collect::<Result<Vec<_>>>()?;
    Ok(Stage {
        threshold,
        classifiers,
    })
}

fn parse_weak_classifier(node: Node<'_, '_>) -> Result<WeakClassifier> {
    let values: Vec<&str> = tokens(child(node, "internalNodes")?).collect();
    if values.is_empty() || values.len() % 4 != 0 {
        return Err(malformed("<internalNodes> must hold groups of four values"));
    }
    let splits = values
        .chunks_exact(4)
        .map(|node| {
            Ok(Split {
                left: parse(node[0], "internalNodes")?,
                right: parse(node[1], "internalNodes")?,
                feature: parse(node[2], "internalNodes")?,
                threshold: parse(node[3], "internalNodes")?,
            })
        })
        .collect::<Result<Vec<_>>>()?;

    let leaves = tokens(child(node, "leafValues")?)
        .map(|v| parse(v, "leafValues"))
        .collect::<Result<Vec<f64>>>()?;

    Ok(WeakClassifier { splits, leaves })
}

/// One-stump cascade over a 24x24 window that fires where the lower half is
/// brighter than the upper half.
#[cfg(test)]
pub(crate) const EDGE_CASCADE_XML: &str = r#"<?xml version="1.0"?>
<opencv_storage>
<cascade type_id="opencv-cascade-classifier">
  <stageType>BOOST</stageType>
  <featureType>HAAR</featureType>
  <height>24</height>
  <width>24</width>
  <stageNum>1</stageNum>
  <stages>
    <!-- stage 0 -->
    <_>
      <maxWeakCount>1</maxWeakCount>
      <stageThreshold>0.</stageThreshold>
      <weakClassifiers>
        <_>
          <internalNodes>
            0 -1 0 5.0000000000000000e-01</internalNodes>
          <leafValues>
            -1. 1.</leafValues></_></weakClassifiers></_></stages>
  <features>
    <_>
      <rects>
        <_>
          0 0 24 12 -1.</_>
        <_>
          0 12 24 12 1.</_></rects></_></features></cascade>
</opencv_storage>
"#;

#[cfg(test)]
mod tests {
    use super::*;
    use image::Luma;

    fn edge_cascade() -> HaarCascade {
        HaarCascade::from_xml(EDGE_CASCADE_XML).expect("parse")
    }

    fn params() -> FaceDetectionParams {
        FaceDetectionParams {
            min_face_size: 24,
            ..FaceDetectionParams::default()
        }
    }

    /// Mid-grey scene with one 48x48 block: black top half, white bottom half.
    fn block_scene() -> GrayImage {
        GrayImage::from_fn(128, 128, |x, y| {
            let inside = (40..88).contains(&x) && (40..88).contains(&y);
            match (inside, y < 64) {
                (false, _) => Luma([128]),
                (true, true) => Luma([0]),
                (true, false) => Luma([255]),
            }
        })
    }

    #[test]
    fn parses_opencv_cascade_layout() {
        let cascade = edge_cascade();
        assert_eq!((cascade.window_width, cascade.window_height), (24, 24));
        assert_eq!(cascade.stages.len(), 1);
        assert_eq!(cascade.features.len(), 1);
        assert_eq!(cascade.features[0].rects.len(), 2);
        assert_eq!(cascade.features[0].rects[1].weight, 1.0);
        assert!(cascade.stages[0].threshold < 0.0);
    }

    #[test]
    fn rejects_unsupported_or_broken_cascades() {
        let lbp = EDGE_CASCADE_XML.replace("<featureType>HAAR", "<featureType>LBP");
        assert!(HaarCascade::from_xml(&lbp).is_err());

        let dangling = EDGE_CASCADE_XML.replace("0 -1 0 5.0", "0 -1 3 5.0");
        assert!(HaarCascade::from_xml(&dangling).is_err());

        let outside = EDGE_CASCADE_XML.replace("0 12 24 12 1.", "0 12 24 13 1.");
        assert!(HaarCascade::from_xml(&outside).is_err());

        let old_style = "<opencv_storage><haar type_id=\"opencv-haar-classifier\">\
                         <size>24 24</size></haar></opencv_storage>";
        assert!(matches!(
            HaarCascade::from_xml(old_style),
            Err(BildwerkError::FaceDetection(_))
        ));

        assert!(HaarCascade::from_xml("not xml at all <").is_err());
    }

    #[test]
    fn missing_cascade_file_is_an_io_error() {
        let path = Path::new("/nonexistent/bildwerk/cascade.xml");
        let err = HaarCascade::load(path).unwrap_err();
        assert!(matches!(err, BildwerkError::Io(_)));
    }

    #[test]
    fn load_reads_cascade_from_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join(CASCADE_FILENAME);
        std::fs::write(&path, EDGE_CASCADE_XML).expect("write");
        assert_eq!(HaarCascade::load(&path).expect("load").stages.len(), 1);
    }

    #[test]
    fn detects_the_pattern_it_was_built_for() {
        let cascade = edge_cascade();
        let faces = cascade.detect(&block_scene(), &params()).expect("detect");
        assert!(!faces.is_empty());
        for face in &faces {
            assert!(face.x < 88 && face.x + face.width >= 40, "{face:?}");
            assert!(face.y < 88 && face.y + face.height >= 40, "{face:?}");
        }
    }

    #[test]
    fn counts_through_the_face_detector_capability() {
        let cascade = edge_cascade();
        let count = crate::analysis::faces::face_count(Some(&cascade), &block_scene(), &params());
        assert!(count >= 1);
    }

    #[test]
    fn flat_image_has_no_faces() {
        let flat = GrayImage::from_pixel(100, 100, Luma([128]));
        let faces = edge_cascade().detect(&flat, &params()).expect("detect");
        assert!(faces.is_empty());
    }

    #[test]
    fn image_smaller_than_window_has_no_faces() {
        let tiny = GrayImage::from_pixel(10, 10, Luma([0]));
        let faces = edge_cascade().detect(&tiny, &params()).expect("detect");
        assert!(faces.is_empty());
    }

    #[test]
    fn non_growing_scale_is_rejected() {
        let params = FaceDetectionParams {
            scale_factor: 1.0,
            ..params()
        };
        assert!(edge_cascade().detect(&block_scene(), &params).is_err());
    }

    fn square(x: u32, y: u32, side: u32) -> FaceBox {
        FaceBox {
            x,
            y,
            width: side,
            height: side,
        }
    }

    #[test]
    fn grouping_averages_clusters_and_drops_lonely_hits() {
        let mut hits: Vec<FaceBox> = (10..15).map(|x| square(x, 10, 24)).collect();
        hits.push(square(100, 100, 24));

        assert_eq!(group_rectangles(&hits, 3, GROUP_EPS), vec![square(12, 10, 24)]);
        assert_eq!(group_rectangles(&hits, 0, GROUP_EPS), hits);
    }

    #[test]
    fn grouping_drops_weaker_cluster_inside_stronger_one() {
        let mut hits = vec![square(0, 0, 100); 6];
        hits.extend(vec![square(10, 10, 30); 4]);
        assert_eq!(group_rectangles(&hits, 2, GROUP_EPS), vec![square(0, 0, 100)]);
    }

    #[test]
    fn explicit_cascade_path_wins_over_defaults() {
        let path = Path::new("/opt/cascades/frontalface.xml");
        assert_eq!(resolve_cascade_path(Some(path)), Some(path.to_path_buf()));
        assert!(
            default_cascade_paths()
                .iter()
                .all(|p| p.ends_with(CASCADE_FILENAME))
        );
    }
}
