//! Relationship rendering for manual inspection.
//!
//! Boxes are drawn as 1-pixel outlines on a copy of the source image: the
//! subject in red, the object in cyan. Output goes to image files rather than
//! a window so that a batch of samples can be reviewed side by side.
//!
//! ```text
//! view_n_image_rels(n = 2)
//!   ├── 2417.png   "man <wearing> hat"
//!   └── 1033.png   "cup <on> table"
//! ```

use crate::dataset::ImageRelationships;
use crate::{Error, Result};
use image::{Rgb, RgbImage};
use rand::seq::SliceRandom;
use rand::Rng;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use vgrel_core::BBox;

/// Subject outline color.
pub const RED: Rgb<u8> = Rgb([255, 0, 0]);

/// Object outline color.
pub const CYAN: Rgb<u8> = Rgb([0, 255, 255]);

/// Draw the outline of `bbox` onto `image`, clipped to the image bounds.
pub fn draw_bbox(image: &mut RgbImage, bbox: &BBox, color: Rgb<u8>) {
    let (w, h) = (i64::from(image.width()), i64::from(image.height()));
    if w == 0 || h == 0 {
        return;
    }

    // Edges are clamped to one pixel beyond each side before the cast, so
    // extreme coordinates stay off-image instead of overflowing.
    let edge = |v: f64, size: i64| v.clamp(-1.0, (size + 1) as f64) as i64;
    let left = edge(bbox.x0().floor(), w);
    let top = edge(bbox.y0().floor(), h);
    // Last pixel column/row covered by the box.
    let right = (edge(bbox.x1().ceil(), w) - 1).max(left);
    let bottom = (edge(bbox.y1().ceil(), h) - 1).max(top);

    let mut put = |x: i64, y: i64| {
        if (0..w).contains(&x) && (0..h).contains(&y) {
            image.put_pixel(x as u32, y as u32, color);
        }
    };

    for x in left.max(0)..=right.min(w - 1) {
        put(x, top);
        put(x, bottom);
    }
    for y in top.max(0)..=bottom.min(h - 1) {
        put(left, y);
        put(right, y);
    }
}

/// Copy of `image` with red and cyan box outlines.
///
/// Boxes can be given as [`BBox`] or as `[top, bottom, left, right]`.
#[must_use]
pub fn render_boxes<R, C>(image: &RgbImage, red_bboxes: &[R], cyan_bboxes: &[C]) -> RgbImage
where
    R: Into<BBox> + Clone,
    C: Into<BBox> + Clone,
{
    let mut out = image.clone();
    for b in red_bboxes {
        draw_bbox(&mut out, &b.clone().into(), RED);
    }
    for b in cyan_bboxes {
        draw_bbox(&mut out, &b.clone().into(), CYAN);
    }
    out
}

/// Load `image_path`, draw the boxes and write the result to `output_path`.
pub fn show_image<R, C>(
    image_path: impl AsRef<Path>,
    red_bboxes: &[R],
    cyan_bboxes: &[C],
    output_path: impl AsRef<Path>,
) -> Result<RgbImage>
where
    R: Into<BBox> + Clone,
    C: Into<BBox> + Clone,
{
    let image = image::open(image_path.as_ref())?.to_rgb8();
    let rendered = render_boxes(&image, red_bboxes, cyan_bboxes);
    rendered.save(output_path.as_ref())?;
    log::debug!("Wrote {:?}", output_path.as_ref());
    Ok(rendered)
}

/// One rendered relationship.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RenderedRelationship {
    /// Source image id
    pub image_id: u64,
    /// `"{subject} <{predicate}> {object}"`
    pub caption: String,
    /// Written file
    pub output: PathBuf,
}

/// Render the first relationship of `n` distinct images, visited in random order.
///
/// Images without relationships are skipped. Each output is written to
/// `out_dir/{image_id}.png`; `out_dir` is created if missing. At most `n`
/// images are rendered, so `n = 0` renders none (the interactive viewer
/// this replaces always showed at least one).
pub fn view_n_image_rels<G: Rng + ?Sized>(
    relationships: &[ImageRelationships],
    n: usize,
    image_dir: impl AsRef<Path>,
    out_dir: impl AsRef<Path>,
    rng: &mut G,
) -> Result<Vec<RenderedRelationship>> {
    let (image_dir, out_dir) = (image_dir.as_ref(), out_dir.as_ref());
    fs::create_dir_all(out_dir).map_err(|e| Error::io_at(out_dir, e))?;

    let mut order: Vec<usize> = (0..relationships.len()).collect();
    order.shuffle(rng);

    let mut shown = Vec::with_capacity(n);
    for idx in order {
        if shown.len() >= n {
            break;
        }
        let a = &relationships[idx];
        let Some(rel) = a.relationships.first() else {
            continue;
        };

        let caption = format!(
            "{} <{}> {}",
            rel.subject.name()?,
            rel.predicate,
            rel.object.name()?
        );
        log::info!("{}", caption);

        let output = out_dir.join(format!("{}.png", a.image_id));
        show_image(
            image_dir.join(a.image_file_name()),
            &[rel.subject.bbox()],
            &[rel.object.bbox()],
            &output,
        )?;
        shown.push(RenderedRelationship {
            image_id: a.image_id,
            caption,
            output,
        });
    }
    Ok(shown)
}
