//! Per-relationship feature vectors.
//!
//! Every relationship becomes one row of each matrix:
//!
//! | Matrix | Width | Source |
//! |--------|-------|--------|
//! | spatial | 7 | [`SpatialPrim`] of subject vs. object box |
//! | categorical | 2E | [`CategoricalPrim`] over the entity list (E entries) |
//! | deep (optional) | D | [`deep::CropEmbedder`] over the union crop |
//!
//! Subject and object names are mapped to entity-list positions; a name that
//! is not itself an entity is replaced by its canonical name from the object
//! synonym table first.

pub mod deep;

use crate::dataset::{ImageRelationships, Relationship};
use crate::synonyms::SynonymTable;
use crate::{Error, Result};
use ndarray::Array2;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use vgrel_core::{CategoricalPrim, SpatialPrim, SPATIAL_FEATURE_DIM};

/// Features of one relationship.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PrimitiveFeatures {
    /// Spatial primitive values
    pub spatial: [f64; SPATIAL_FEATURE_DIM],
    /// Subject one-hot ++ object one-hot
    pub categorical: Vec<u8>,
}

/// Maps object names to entity-list positions.
#[derive(Debug, Clone)]
pub struct CategoryResolver<'a> {
    positions: HashMap<&'a str, usize>,
    synonyms: &'a SynonymTable,
    num_categories: usize,
}

impl<'a> CategoryResolver<'a> {
    /// Resolver over `entity_list`; duplicate entries resolve to their first position.
    #[must_use]
    pub fn new(entity_list: &'a [String], synonyms: &'a SynonymTable) -> Self {
        let mut positions = HashMap::with_capacity(entity_list.len());
        for (i, e) in entity_list.iter().enumerate() {
            positions.entry(e.as_str()).or_insert(i);
        }
        Self {
            positions,
            synonyms,
            num_categories: entity_list.len(),
        }
    }

    /// One-hot width.
    #[must_use]
    pub fn num_categories(&self) -> usize {
        self.num_categories
    }

    /// Entity-list position of `name`, going through the synonym table if needed.
    pub fn resolve(&self, name: &str) -> Result<usize> {
        if let Some(&i) = self.positions.get(name) {
            return Ok(i);
        }
        let canonical = self.synonyms.find_canonical(name)?;
        self.positions.get(canonical).copied().ok_or_else(|| {
            Error::invalid_input(format!(
                "{} resolves to {}, which is not in the entity list",
                name, canonical
            ))
        })
    }
}

/// Features of a single relationship.
pub fn relationship_features(r: &Relationship, resolver: &CategoryResolver<'_>) -> Result<PrimitiveFeatures> {
    let spatial = SpatialPrim::new(r.subject.bbox(), r.object.bbox()).extract_features()?;

    let sub_id = resolver.resolve(r.subject.name()?)?;
    let obj_id = resolver.resolve(r.object.name()?)?;
    let categorical = CategoricalPrim::new(sub_id, obj_id, resolver.num_categories())?.extract_features();

    Ok(PrimitiveFeatures {
        spatial,
        categorical,
    })
}

/// Features of every relationship on one image, in annotation order.
pub fn image_features(
    image: &ImageRelationships,
    resolver: &CategoryResolver<'_>,
) -> Result<Vec<PrimitiveFeatures>> {
    image
        .relationships
        .iter()
        .map(|r| relationship_features(r, resolver))
        .collect()
}

/// Features of every relationship in the corpus, in corpus order.
pub fn get_primitive_features(
    relationships: &[ImageRelationships],
    entity_list: &[String],
    object_synonyms: &SynonymTable,
) -> Result<Vec<PrimitiveFeatures>> {
    let resolver = CategoryResolver::new(entity_list, object_synonyms);
    let mut out = Vec::new();
    for image in relationships {
        out.extend(image_features(image, &resolver)?);
    }
    Ok(out)
}

/// Row-stacked feature matrices.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeatureMatrices {
    /// `N x 7`
    pub spatial: Array2<f64>,
    /// `N x 2E`
    pub categorical: Array2<u8>,
}

impl FeatureMatrices {
    /// Stack per-relationship features. `num_categories` fixes the
    /// categorical width even when `features` is empty.
    pub fn from_features(features: &[PrimitiveFeatures], num_categories: usize) -> Result<Self> {
        let n = features.len();
        let width = 2 * num_categories;

        let mut spatial = Vec::with_capacity(n * SPATIAL_FEATURE_DIM);
        let mut categorical = Vec::with_capacity(n * width);
        for (i, f) in features.iter().enumerate() {
            if f.categorical.len() != width {
                return Err(Error::dataset(format!(
                    "row {} has categorical width {}, expected {}",
                    i,
                    f.categorical.len(),
                    width
                )));
            }
            spatial.extend_from_slice(&f.spatial);
            categorical.extend_from_slice(&f.categorical);
        }

        Ok(Self {
            spatial: Array2::from_shape_vec((n, SPATIAL_FEATURE_DIM), spatial)
                .map_err(|e| Error::dataset(e.to_string()))?,
            categorical: Array2::from_shape_vec((n, width), categorical)
                .map_err(|e| Error::dataset(e.to_string()))?,
        })
    }

    /// Number of rows.
    #[must_use]
    pub fn len(&self) -> usize {
        self.spatial.nrows()
    }

    /// True when there are no rows.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
