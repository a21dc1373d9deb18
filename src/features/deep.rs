//! Deep features from image crops.
//!
//! Each relationship is turned into one crop: the union of its subject and
//! object boxes, clipped to the image and resized to a square. Crops are fed
//! to a [`CropEmbedder`] in fixed-size batches; the embedder is whatever
//! network the caller plugs in. [`GridPoolEmbedder`] is a dependency-free
//! baseline that mean-pools RGB over a grid.

use crate::dataset::ImageRelationships;
use crate::{Error, Result};
use image::imageops::{self, FilterType};
use image::RgbImage;
use ndarray::Array2;
use rayon::prelude::*;
use std::path::{Path, PathBuf};
use vgrel_core::BBox;

/// Side length crops are resized to.
pub const DEFAULT_IMAGE_SIZE: u32 = 224;

/// Crops per embedder call.
pub const DEFAULT_BATCH_SIZE: usize = 8;

/// What to crop for one relationship.
#[derive(Debug, Clone, PartialEq)]
pub struct CropRequest {
    /// Image file name relative to the image directory (`{image_id}.jpg`)
    pub file_name: String,
    /// Subject box
    pub subject: BBox,
    /// Object box
    pub object: BBox,
}

/// One crop request per relationship, in corpus order.
#[must_use]
pub fn collect_crop_requests(relationships: &[ImageRelationships]) -> Vec<CropRequest> {
    relationships
        .iter()
        .flat_map(|a| {
            let file_name = a.image_file_name();
            a.relationships.iter().map(move |r| CropRequest {
                file_name: file_name.clone(),
                subject: r.subject.bbox(),
                object: r.object.bbox(),
            })
        })
        .collect()
}

/// Crop the union of `subject` and `object` out of `image` and resize it to
/// `size x size`.
pub fn crop_union(image: &RgbImage, subject: &BBox, object: &BBox, size: u32) -> Result<RgbImage> {
    let u = subject.union(object);
    let (w, h) = (f64::from(image.width()), f64::from(image.height()));
    let x0 = u.x0().max(0.0).floor();
    let y0 = u.y0().max(0.0).floor();
    let x1 = u.x1().min(w).ceil();
    let y1 = u.y1().min(h).ceil();
    if x1 <= x0 || y1 <= y0 {
        return Err(Error::invalid_input(format!(
            "crop {:?} lies outside the {}x{} image",
            u.get_bbox(),
            image.width(),
            image.height()
        )));
    }

    let cropped = imageops::crop_imm(image, x0 as u32, y0 as u32, (x1 - x0) as u32, (y1 - y0) as u32).to_image();
    Ok(imageops::resize(&cropped, size, size, FilterType::Triangle))
}

/// Crop requests bound to an image directory.
#[derive(Debug, Clone)]
pub struct BBoxDataset {
    requests: Vec<CropRequest>,
    image_dir: PathBuf,
    image_size: u32,
}

impl BBoxDataset {
    /// Dataset with [`DEFAULT_IMAGE_SIZE`] crops.
    pub fn new(requests: Vec<CropRequest>, image_dir: impl Into<PathBuf>) -> Self {
        Self {
            requests,
            image_dir: image_dir.into(),
            image_size: DEFAULT_IMAGE_SIZE,
        }
    }

    /// Override the crop side length.
    #[must_use]
    pub fn with_image_size(mut self, image_size: u32) -> Self {
        self.image_size = image_size;
        self
    }

    /// Number of crops.
    #[must_use]
    pub fn len(&self) -> usize {
        self.requests.len()
    }

    /// True when there is nothing to crop.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.requests.is_empty()
    }

    /// Crop side length.
    #[must_use]
    pub fn image_size(&self) -> u32 {
        self.image_size
    }

    /// Image directory.
    #[must_use]
    pub fn image_dir(&self) -> &Path {
        &self.image_dir
    }

    /// Load and crop request `i`.
    pub fn load(&self, i: usize) -> Result<RgbImage> {
        let req = self
            .requests
            .get(i)
            .ok_or_else(|| Error::invalid_input(format!("crop index {} out of range", i)))?;
        let path = self.image_dir.join(&req.file_name);
        let image = image::open(&path)
            .map_err(|e| {
                log::warn!("Failed to open {:?}: {}", path, e);
                e
            })?
            .to_rgb8();
        crop_union(&image, &req.subject, &req.object, self.image_size)
    }
}

/// Turns crops into fixed-length vectors.
pub trait CropEmbedder: Send + Sync {
    /// Output dimension.
    fn dim(&self) -> usize;

    /// Embed a batch; one vector of length [`dim`](Self::dim) per crop.
    fn embed(&self, crops: &[RgbImage]) -> Result<Vec<Vec<f32>>>;
}

/// Largest grid accepted by [`GridPoolEmbedder::new`].
pub const MAX_GRID: u32 = 256;

/// Mean RGB per cell of a `grid x grid` partition, scaled to `[0, 1]`.
#[derive(Debug, Clone, Copy)]
pub struct GridPoolEmbedder {
    grid: u32,
}

impl GridPoolEmbedder {
    /// Embedder with `grid x grid` cells; `grid` must be in `1..=MAX_GRID`.
    pub fn new(grid: u32) -> Result<Self> {
        if grid == 0 || grid > MAX_GRID {
            return Err(Error::invalid_input(format!(
                "grid must be between 1 and {}, got {}",
                MAX_GRID, grid
            )));
        }
        Ok(Self { grid })
    }

    fn embed_one(&self, crop: &RgbImage) -> Vec<f32> {
        let g = self.grid;
        let (w, h) = crop.dimensions();
        let mut out = Vec::with_capacity(self.dim());
        for gy in 0..g {
            for gx in 0..g {
                let (xs, xe) = (cell_edge(gx, w, g), cell_edge(gx + 1, w, g));
                let (ys, ye) = (cell_edge(gy, h, g), cell_edge(gy + 1, h, g));
                let mut sum = [0f64; 3];
                let mut n = 0u64;
                for y in ys..ye {
                    for x in xs..xe {
                        let p = crop.get_pixel(x, y);
                        for c in 0..3 {
                            sum[c] += f64::from(p[c]);
                        }
                        n += 1;
                    }
                }
                for s in sum {
                    out.push(if n == 0 { 0.0 } else { (s / n as f64 / 255.0) as f32 });
                }
            }
        }
        out
    }
}

/// `i * len / grid`, computed without u32 overflow; never exceeds `len`.
fn cell_edge(i: u32, len: u32, grid: u32) -> u32 {
    (u64::from(i) * u64::from(len) / u64::from(grid)) as u32
}

impl CropEmbedder for GridPoolEmbedder {
    fn dim(&self) -> usize {
        let g = self.grid as usize;
        3 * g * g
    }

    fn embed(&self, crops: &[RgbImage]) -> Result<Vec<Vec<f32>>> {
        Ok(crops.iter().map(|c| self.embed_one(c)).collect())
    }
}

/// Embed every crop of `dataset`; rows follow request order.
pub fn extract_deep_features(
    dataset: &BBoxDataset,
    embedder: &dyn CropEmbedder,
    batch_size: usize,
) -> Result<Array2<f32>> {
    extract_deep_features_with_progress(dataset, embedder, batch_size, |_| {})
}

/// [`extract_deep_features`] with a callback receiving the size of each finished batch.
pub fn extract_deep_features_with_progress<F>(
    dataset: &BBoxDataset,
    embedder: &dyn CropEmbedder,
    batch_size: usize,
    mut on_batch: F,
) -> Result<Array2<f32>>
where
    F: FnMut(usize),
{
    if batch_size == 0 {
        return Err(Error::invalid_input("batch size must be positive"));
    }
    let dim = embedder.dim();
    let n = dataset.len();
    let mut flat = Vec::with_capacity(n * dim);

    let mut start = 0;
    while start < n {
        let end = (start + batch_size).min(n);
        let crops: Vec<RgbImage> = (start..end)
            .into_par_iter()
            .map(|i| dataset.load(i))
            .collect::<Result<_>>()?;

        let rows = embedder.embed(&crops)?;
        if rows.len() != crops.len() {
            return Err(Error::embedding(format!(
                "embedder returned {} vectors for {} crops",
                rows.len(),
                crops.len()
            )));
        }
        for row in rows {
            if row.len() != dim {
                return Err(Error::embedding(format!(
                    "embedding has length {}, expected {}",
                    row.len(),
                    dim
                )));
            }
            flat.extend(row);
        }
        on_batch(end - start);
        start = end;
    }

    log::info!("Extracted {}x{} deep features", n, dim);
    Array2::from_shape_vec((n, dim), flat).map_err(|e| Error::embedding(e.to_string()))
}
