//! Relationship corpus schema (`relationships.json`).
//!
//! Only the fields the pipeline reads are typed; everything else an
//! annotation carries (`relationship_id`, `synsets`, `object_id`, ...) is kept
//! in `extra` and written back unchanged.

use crate::{Error, Result};
use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::{BufReader, BufWriter, Write};
use std::path::Path;
use vgrel_core::BBox;

/// Predicate value of a relationship whose label was masked by sampling.
pub const UNLABELED: &str = "UNLABELED";

/// An annotated object (subject or object side of a relationship).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VgObject {
    /// Left edge in pixels
    pub x: f64,
    /// Top edge in pixels
    pub y: f64,
    /// Width in pixels
    pub w: f64,
    /// Height in pixels
    pub h: f64,
    /// Single name (newer annotation dumps)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    /// Name list (older annotation dumps); the first entry is used
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub names: Option<Vec<String>>,
    /// Untyped fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl VgObject {
    /// Object with a single `name` and no extra fields.
    #[must_use]
    pub fn new(name: impl Into<String>, x: f64, y: f64, w: f64, h: f64) -> Self {
        Self {
            x,
            y,
            w,
            h,
            name: Some(name.into()),
            names: None,
            extra: Map::new(),
        }
    }

    /// Name of the object: `name`, falling back to `names[0]`.
    pub fn name(&self) -> Result<&str> {
        if let Some(name) = &self.name {
            return Ok(name);
        }
        self.names
            .as_ref()
            .and_then(|n| n.first())
            .map(String::as_str)
            .ok_or_else(|| Error::dataset(format!("object at ({}, {}) has no name", self.x, self.y)))
    }

    /// Box in `[top, bottom, left, right]` geometry.
    #[must_use]
    pub fn bbox(&self) -> BBox {
        BBox::from_vg_object(self.x, self.y, self.w, self.h)
    }

    /// False when width or height is zero.
    #[must_use]
    pub fn has_valid_bbox(&self) -> bool {
        self.w != 0.0 && self.h != 0.0
    }
}

/// Free-function form of [`VgObject::name`].
pub fn object_name(obj: &VgObject) -> Result<&str> {
    obj.name()
}

/// A (subject, predicate, object) annotation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Relationship {
    /// Relation label, or [`UNLABELED`]
    pub predicate: String,
    /// Subject side
    pub subject: VgObject,
    /// Object side
    pub object: VgObject,
    /// Untyped fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl Relationship {
    /// Relationship with no extra fields.
    #[must_use]
    pub fn new(subject: VgObject, predicate: impl Into<String>, object: VgObject) -> Self {
        Self {
            predicate: predicate.into(),
            subject,
            object,
            extra: Map::new(),
        }
    }

    /// True when the label was masked.
    #[must_use]
    pub fn is_unlabeled(&self) -> bool {
        self.predicate == UNLABELED
    }
}

/// All relationships annotated on one image.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ImageRelationships {
    /// Image id; images live at `{image_dir}/{image_id}.jpg`
    pub image_id: u64,
    /// Relationships in annotation order
    pub relationships: Vec<Relationship>,
    /// Untyped fields, preserved verbatim
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl ImageRelationships {
    /// Image record with no extra fields.
    #[must_use]
    pub fn new(image_id: u64, relationships: Vec<Relationship>) -> Self {
        Self {
            image_id,
            relationships,
            extra: Map::new(),
        }
    }

    /// File name of the source image.
    #[must_use]
    pub fn image_file_name(&self) -> String {
        format!("{}.jpg", self.image_id)
    }
}

/// Total relationship count across images.
#[must_use]
pub fn relationship_count(annotations: &[ImageRelationships]) -> usize {
    annotations.iter().map(|a| a.relationships.len()).sum()
}

/// Iterate relationships across images in corpus order.
pub fn iter_relationships(annotations: &[ImageRelationships]) -> impl Iterator<Item = &Relationship> {
    annotations.iter().flat_map(|a| a.relationships.iter())
}

/// Parse a corpus from a JSON string.
pub fn parse_relationships(json: &str) -> Result<Vec<ImageRelationships>> {
    serde_json::from_str(json).map_err(|e| Error::parse(format!("relationships JSON: {}", e)))
}

/// Load a corpus (`relationships.json`).
pub fn load_relationships(path: impl AsRef<Path>) -> Result<Vec<ImageRelationships>> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|e| Error::io_at(path, e))?;
    let data: Vec<ImageRelationships> = serde_json::from_reader(BufReader::new(file))
        .map_err(|e| Error::parse(format!("{:?}: {}", path, e)))?;
    log::info!(
        "Loaded {} images / {} relationships from {:?}",
        data.len(),
        relationship_count(&data),
        path
    );
    Ok(data)
}

/// Write a corpus as a JSON array.
pub fn save_relationships(path: impl AsRef<Path>, data: &[ImageRelationships]) -> Result<()> {
    let path = path.as_ref();
    let mut writer = BufWriter::new(File::create(path).map_err(|e| Error::io_at(path, e))?);
    serde_json::to_writer(&mut writer, data)
        .map_err(|e| Error::parse(format!("Failed to serialize relationships: {}", e)))?;
    writer.flush()?;
    Ok(())
}
