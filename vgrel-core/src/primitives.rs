//! Image-agnostic primitives for relationship features.
//!
//! # Coordinate Convention
//!
//! Boxes are pixel rectangles with the origin at the top-left corner of the
//! image. The canonical list form is `[top, bottom, left, right]`, which is
//! what [`BBox::new`] accepts and [`BBox::get_bbox`] returns:
//!
//! ```text
//!   (x0, y0) ───────────┐
//!      │                │  height = y1 - y0
//!      └────────── (x1, y1)
//!        width = x1 - x0
//! ```
//!
//! Visual Genome objects use `x, y, w, h`; see [`BBox::from_vg_object`].
//!
//! # Feature Layouts
//!
//! | Primitive | Length | Layout |
//! |-----------|--------|--------|
//! | `BBox` | 8 | x0, x1, y0, y1, width, height, area, perimeter |
//! | `SpatialPrim` | 7 | Δx0, Δx1, Δy0, Δy1, width ratio, height ratio, area ratio |
//! | `CategoricalPrim` | 2N | subject one-hot ++ object one-hot |

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use std::hash::{Hash, Hasher};

/// Length of [`BBox::extract_features`].
pub const BBOX_FEATURE_DIM: usize = 8;

/// Length of [`SpatialPrim::extract_features`].
pub const SPATIAL_FEATURE_DIM: usize = 7;

/// One-hot width used when none is given.
pub const DEFAULT_NUM_CATEGORIES: usize = 100;

// =============================================================================
// BBox
// =============================================================================

/// Axis-aligned bounding box.
///
/// Equality is bitwise on the four edges (with `-0.0` folded into `0.0`),
/// so `BBox` is `Eq` and `Hash` and can key a `HashSet`.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct BBox {
    x0: f64,
    y0: f64,
    x1: f64,
    y1: f64,
}

impl BBox {
    /// Create a box from `[top, bottom, left, right]`.
    #[must_use]
    pub fn new(bbox: [f64; 4]) -> Self {
        let [top, bottom, left, right] = bbox;
        Self {
            x0: left,
            y0: top,
            x1: right,
            y1: bottom,
        }
    }

    /// Create a box from a slice that must hold exactly `[top, bottom, left, right]`.
    pub fn from_slice(bbox: &[f64]) -> Result<Self> {
        let arr: [f64; 4] = bbox.try_into().map_err(|_| {
            Error::invalid_input(format!(
                "bbox needs 4 values [top, bottom, left, right], got {}",
                bbox.len()
            ))
        })?;
        Ok(Self::new(arr))
    }

    /// Create a box from a Visual Genome object (`x, y, w, h`).
    #[must_use]
    pub fn from_vg_object(x: f64, y: f64, w: f64, h: f64) -> Self {
        Self::new([y, y + h, x, x + w])
    }

    /// Left edge.
    #[must_use]
    pub const fn x0(&self) -> f64 {
        self.x0
    }

    /// Top edge.
    #[must_use]
    pub const fn y0(&self) -> f64 {
        self.y0
    }

    /// Right edge.
    #[must_use]
    pub const fn x1(&self) -> f64 {
        self.x1
    }

    /// Bottom edge.
    #[must_use]
    pub const fn y1(&self) -> f64 {
        self.y1
    }

    /// `x1 - x0`.
    #[must_use]
    pub fn width(&self) -> f64 {
        self.x1 - self.x0
    }

    /// `y1 - y0`.
    #[must_use]
    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }

    /// `width * height`.
    #[must_use]
    pub fn area(&self) -> f64 {
        self.width() * self.height()
    }

    /// `2 * width + 2 * height`.
    #[must_use]
    pub fn perimeter(&self) -> f64 {
        2.0 * self.width() + 2.0 * self.height()
    }

    /// True when the box has zero (or negative) width or height.
    #[must_use]
    pub fn is_degenerate(&self) -> bool {
        self.width() <= 0.0 || self.height() <= 0.0
    }

    /// Geometry features: `[x0, x1, y0, y1, width, height, area, perimeter]`.
    #[must_use]
    pub fn extract_features(&self) -> [f64; BBOX_FEATURE_DIM] {
        [
            self.x0,
            self.x1,
            self.y0,
            self.y1,
            self.width(),
            self.height(),
            self.area(),
            self.perimeter(),
        ]
    }

    /// The original list form, `[y0, y1, x0, x1]`.
    #[must_use]
    pub fn get_bbox(&self) -> [f64; 4] {
        [self.y0, self.y1, self.x0, self.x1]
    }

    /// Smallest box containing both `self` and `other`.
    #[must_use]
    pub fn union(&self, other: &Self) -> Self {
        Self {
            x0: self.x0.min(other.x0),
            y0: self.y0.min(other.y0),
            x1: self.x1.max(other.x1),
            y1: self.y1.max(other.y1),
        }
    }

    fn key(&self) -> [u64; 4] {
        // Adding 0.0 maps -0.0 to 0.0 so equal coordinates share bits.
        self.get_bbox().map(|v| (v + 0.0).to_bits())
    }
}

impl From<[f64; 4]> for BBox {
    fn from(bbox: [f64; 4]) -> Self {
        Self::new(bbox)
    }
}

impl PartialEq for BBox {
    fn eq(&self, other: &Self) -> bool {
        self.key() == other.key()
    }
}

impl Eq for BBox {}

impl Hash for BBox {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.key().hash(state);
    }
}

// =============================================================================
// CategoricalPrim
// =============================================================================

/// One-hot encoding of a subject/object category pair.
///
/// Deserialization goes through [`CategoricalPrim::new`], so an index that
/// does not fit `num_categories` is rejected there too.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
#[serde(try_from = "RawCategoricalPrim")]
pub struct CategoricalPrim {
    subject_index: usize,
    object_index: usize,
    num_categories: usize,
}

impl CategoricalPrim {
    /// Create a categorical primitive.
    ///
    /// Both indices must be smaller than `num_categories`.
    pub fn new(subject_index: usize, object_index: usize, num_categories: usize) -> Result<Self> {
        for index in [subject_index, object_index] {
            if index >= num_categories {
                return Err(Error::IndexOutOfRange {
                    index,
                    num_categories,
                });
            }
        }
        Ok(Self {
            subject_index,
            object_index,
            num_categories,
        })
    }

    /// Create with [`DEFAULT_NUM_CATEGORIES`].
    pub fn with_default_width(subject_index: usize, object_index: usize) -> Result<Self> {
        Self::new(subject_index, object_index, DEFAULT_NUM_CATEGORIES)
    }

    /// Subject category index.
    #[must_use]
    pub const fn subject_index(&self) -> usize {
        self.subject_index
    }

    /// Object category index.
    #[must_use]
    pub const fn object_index(&self) -> usize {
        self.object_index
    }

    /// One-hot width.
    #[must_use]
    pub const fn num_categories(&self) -> usize {
        self.num_categories
    }

    /// Subject one-hot followed by object one-hot (length `2 * num_categories`).
    #[must_use]
    pub fn extract_features(&self) -> Vec<u8> {
        let mut out = vec![0u8; 2 * self.num_categories];
        out[self.subject_index] = 1;
        out[self.num_categories + self.object_index] = 1;
        out
    }
}

#[derive(Deserialize)]
struct RawCategoricalPrim {
    subject_index: usize,
    object_index: usize,
    num_categories: usize,
}

impl TryFrom<RawCategoricalPrim> for CategoricalPrim {
    type Error = Error;

    fn try_from(raw: RawCategoricalPrim) -> Result<Self> {
        Self::new(raw.subject_index, raw.object_index, raw.num_categories)
    }
}

// Equality and hashing cover the pair only, not the width.
impl PartialEq for CategoricalPrim {
    fn eq(&self, other: &Self) -> bool {
        self.subject_index == other.subject_index && self.object_index == other.object_index
    }
}

impl Eq for CategoricalPrim {}

impl Hash for CategoricalPrim {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.subject_index.hash(state);
        self.object_index.hash(state);
    }
}

// =============================================================================
// SpatialPrim
// =============================================================================

/// Spatial relation between a subject box and an object box.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct SpatialPrim {
    /// Subject box; all ratios are normalized by its size.
    pub subject: BBox,
    /// Object box.
    pub object: BBox,
}

impl SpatialPrim {
    /// Create a spatial primitive.
    #[must_use]
    pub const fn new(subject: BBox, object: BBox) -> Self {
        Self { subject, object }
    }

    /// Offset and size ratios of the object relative to the subject.
    ///
    /// Fails with [`Error::DegenerateBox`] when the subject has zero width
    /// or height, since every value divides by one of them.
    pub fn extract_features(&self) -> Result<[f64; SPATIAL_FEATURE_DIM]> {
        let s = &self.subject;
        let o = &self.object;
        let (sw, sh) = (s.width(), s.height());
        if sw == 0.0 || sh == 0.0 {
            return Err(Error::degenerate_box(format!(
                "subject box {:?} has width {} and height {}",
                s.get_bbox(),
                sw,
                sh
            )));
        }

        Ok([
            (s.x0 - o.x0) / sw,
            (s.x1 - o.x1) / sw,
            (s.y0 - o.y0) / sh,
            (s.y1 - o.y1) / sh,
            o.width() / sw,
            o.height() / sh,
            o.area() / s.area(),
        ])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_bbox_derived_fields() {
        let b = BBox::new([10.0, 30.0, 5.0, 25.0]);
        assert_eq!(b.x0(), 5.0);
        assert_eq!(b.y0(), 10.0);
        assert_eq!(b.x1(), 25.0);
        assert_eq!(b.y1(), 30.0);
        assert_eq!(b.width(), 20.0);
        assert_eq!(b.height(), 20.0);
        assert_eq!(b.area(), 400.0);
        assert_eq!(b.perimeter(), 80.0);
    }

    #[test]
    fn test_bbox_features_layout() {
        let b = BBox::new([0.0, 2.0, 1.0, 4.0]);
        assert_eq!(
            b.extract_features(),
            [1.0, 4.0, 0.0, 2.0, 3.0, 2.0, 6.0, 10.0]
        );
    }

    #[test]
    fn test_bbox_from_vg_object() {
        let b = BBox::from_vg_object(5.0, 10.0, 20.0, 40.0);
        assert_eq!(b.get_bbox(), [10.0, 50.0, 5.0, 25.0]);
    }

    #[test]
    fn test_bbox_get_bbox_roundtrip() {
        let b = BBox::new([3.0, 9.0, 1.0, 7.5]);
        assert_eq!(BBox::new(b.get_bbox()), b);
    }

    #[test]
    fn test_bbox_from_slice_wrong_len() {
        assert!(BBox::from_slice(&[1.0, 2.0, 3.0]).is_err());
        assert!(BBox::from_slice(&[1.0, 2.0, 3.0, 4.0]).is_ok());
    }

    #[test]
    fn test_bbox_hash_consistent_with_eq() {
        let a = BBox::new([0.0, 1.0, 0.0, 1.0]);
        let b = BBox::new([-0.0, 1.0, 0.0, 1.0]);
        assert_eq!(a, b);
        let set: HashSet<BBox> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bbox_union() {
        let a = BBox::new([0.0, 10.0, 0.0, 10.0]);
        let b = BBox::new([5.0, 20.0, -5.0, 8.0]);
        assert_eq!(a.union(&b).get_bbox(), [0.0, 20.0, -5.0, 10.0]);
    }

    #[test]
    fn test_categorical_one_hot() {
        let c = CategoricalPrim::new(1, 2, 3).unwrap();
        assert_eq!(c.extract_features(), vec![0, 1, 0, 0, 0, 1]);
    }

    #[test]
    fn test_categorical_same_index() {
        let c = CategoricalPrim::new(0, 0, 2).unwrap();
        assert_eq!(c.extract_features(), vec![1, 0, 1, 0]);
    }

    #[test]
    fn test_categorical_out_of_range() {
        let err = CategoricalPrim::new(0, 3, 3).unwrap_err();
        assert_eq!(
            err,
            Error::IndexOutOfRange {
                index: 3,
                num_categories: 3
            }
        );
    }

    #[test]
    fn test_categorical_default_width() {
        let c = CategoricalPrim::with_default_width(4, 99).unwrap();
        assert_eq!(c.extract_features().len(), 2 * DEFAULT_NUM_CATEGORIES);
    }

    #[test]
    fn test_categorical_eq_ignores_width() {
        let a = CategoricalPrim::new(1, 2, 5).unwrap();
        let b = CategoricalPrim::new(1, 2, 50).unwrap();
        assert_eq!(a, b);
        assert_ne!(a, CategoricalPrim::new(2, 1, 5).unwrap());
    }

    #[test]
    fn test_categorical_serde_validates_indices() {
        let c: CategoricalPrim =
            serde_json::from_str(r#"{"subject_index":1,"object_index":0,"num_categories":2}"#).unwrap();
        assert_eq!(c.extract_features(), vec![0, 1, 1, 0]);

        let err = serde_json::from_str::<CategoricalPrim>(
            r#"{"subject_index":5,"object_index":0,"num_categories":2}"#,
        )
        .unwrap_err();
        assert!(err.to_string().contains("out of range"), "{}", err);
    }

    #[test]
    fn test_spatial_features() {
        // subject: x 0..10, y 0..20; object: x 5..10, y 10..30
        let s = BBox::new([0.0, 20.0, 0.0, 10.0]);
        let o = BBox::new([10.0, 30.0, 5.0, 10.0]);
        let f = SpatialPrim::new(s, o).extract_features().unwrap();
        let expected = [-0.5, 0.0, -0.5, -0.5, 0.5, 1.0, 0.5];
        for (got, want) in f.iter().zip(expected.iter()) {
            assert!((got - want).abs() < 1e-12, "{} != {}", got, want);
        }
    }

    #[test]
    fn test_spatial_identical_boxes() {
        let b = BBox::new([1.0, 4.0, 2.0, 8.0]);
        let f = SpatialPrim::new(b, b).extract_features().unwrap();
        assert_eq!(f, [0.0, 0.0, 0.0, 0.0, 1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_spatial_degenerate_subject() {
        let s = BBox::new([0.0, 0.0, 0.0, 10.0]);
        let o = BBox::new([0.0, 5.0, 0.0, 5.0]);
        let err = SpatialPrim::new(s, o).extract_features().unwrap_err();
        assert!(matches!(err, Error::DegenerateBox(_)));
    }

    #[test]
    fn test_spatial_degenerate_object_is_fine() {
        let s = BBox::new([0.0, 5.0, 0.0, 5.0]);
        let o = BBox::new([0.0, 0.0, 0.0, 0.0]);
        let f = SpatialPrim::new(s, o).extract_features().unwrap();
        assert_eq!(f[6], 0.0);
    }

    #[test]
    fn test_spatial_eq_and_hash() {
        let a = SpatialPrim::new(BBox::new([0.0, 1.0, 0.0, 1.0]), BBox::new([0.0, 2.0, 0.0, 2.0]));
        let b = a;
        let set: HashSet<SpatialPrim> = [a, b].into_iter().collect();
        assert_eq!(set.len(), 1);
    }

    #[test]
    fn test_bbox_serde() {
        let b = BBox::new([1.0, 2.0, 3.0, 4.0]);
        let json = serde_json::to_string(&b).unwrap();
        let back: BBox = serde_json::from_str(&json).unwrap();
        assert_eq!(b, back);
    }
}
