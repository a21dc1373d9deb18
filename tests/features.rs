//! Primitive and deep feature extraction end to end.

use image::{Rgb, RgbImage};
use std::path::Path;
use vgrel::dataset::{ImageRelationships, Relationship, VgObject};
use vgrel::features::deep::{
    collect_crop_requests, extract_deep_features, BBoxDataset, CropEmbedder, GridPoolEmbedder,
};
use vgrel::features::{get_primitive_features, FeatureMatrices};
use vgrel::synonyms::{AliasMap, SynonymTable};
use vgrel::{Error, Result};

fn rel(sub: (&str, [f64; 4]), pred: &str, obj: (&str, [f64; 4])) -> Relationship {
    let [x, y, w, h] = sub.1;
    let [ox, oy, ow, oh] = obj.1;
    Relationship::new(VgObject::new(sub.0, x, y, w, h), pred, VgObject::new(obj.0, ox, oy, ow, oh))
}

fn corpus() -> Vec<ImageRelationships> {
    vec![
        ImageRelationships::new(
            1,
            vec![
                rel(("man", [0.0, 0.0, 20.0, 40.0]), "wearing", ("hat", [5.0, 0.0, 10.0, 8.0])),
                rel(("cup", [30.0, 20.0, 4.0, 4.0]), "on", ("desk", [20.0, 24.0, 40.0, 16.0])),
            ],
        ),
        ImageRelationships::new(2, vec![rel(("guy", [10.0, 10.0, 20.0, 20.0]), "holding", ("mug", [25.0, 20.0, 10.0, 10.0]))]),
    ]
}

fn entities_and_table() -> (Vec<String>, SynonymTable) {
    let entities: Vec<String> = ["cup", "hat", "man", "table"].iter().map(|s| s.to_string()).collect();
    let aliases = AliasMap::parse("man,guy\nhat,cap\ncup,mug\ntable,desk\n");
    let table = SynonymTable::from_closures(&aliases, &entities);
    (entities, table)
}

#[test]
fn test_primitive_matrices() {
    let (entities, table) = entities_and_table();
    let feats = get_primitive_features(&corpus(), &entities, &table).unwrap();
    let m = FeatureMatrices::from_features(&feats, entities.len()).unwrap();

    assert_eq!(m.spatial.dim(), (3, 7));
    assert_eq!(m.categorical.dim(), (3, 8));

    // man wearing hat: subject one-hot at "man" (2), object at "hat" (1)
    assert_eq!(m.categorical.row(0).to_vec(), vec![0, 0, 1, 0, 0, 1, 0, 0]);
    // cup on desk -> table
    assert_eq!(m.categorical.row(1).to_vec(), vec![1, 0, 0, 0, 0, 0, 0, 1]);
    // guy -> man, mug -> cup
    assert_eq!(m.categorical.row(2).to_vec(), vec![0, 0, 1, 0, 1, 0, 0, 0]);

    // every one-hot half has exactly one set bit
    for row in m.categorical.rows() {
        assert_eq!(row.iter().map(|&v| u32::from(v)).sum::<u32>(), 2);
    }

    // hat is half as wide and a fifth as tall as the man
    let s = m.spatial.row(0);
    assert!((s[4] - 0.5).abs() < 1e-12);
    assert!((s[5] - 0.2).abs() < 1e-12);
    assert!((s[6] - 0.1).abs() < 1e-12);
}

#[test]
fn test_unknown_object_name_fails() {
    let (entities, table) = entities_and_table();
    let data = vec![ImageRelationships::new(
        1,
        vec![rel(("giraffe", [0.0, 0.0, 5.0, 5.0]), "near", ("man", [1.0, 1.0, 2.0, 2.0]))],
    )];
    let err = get_primitive_features(&data, &entities, &table).unwrap_err();
    assert!(matches!(err, Error::UnknownName(ref n) if n == "giraffe"));
}

#[test]
fn test_degenerate_subject_fails() {
    let (entities, table) = entities_and_table();
    let data = vec![ImageRelationships::new(
        1,
        vec![rel(("man", [0.0, 0.0, 0.0, 5.0]), "near", ("hat", [1.0, 1.0, 2.0, 2.0]))],
    )];
    assert!(matches!(
        get_primitive_features(&data, &entities, &table),
        Err(Error::Core(_))
    ));
}

fn write_solid(dir: &Path, id: u64, w: u32, h: u32, color: [u8; 3]) {
    RgbImage::from_pixel(w, h, Rgb(color))
        .save(dir.join(format!("{}.jpg", id)))
        .unwrap();
}

#[test]
fn test_deep_features_follow_request_order() {
    let dir = tempfile::tempdir().unwrap();
    write_solid(dir.path(), 1, 64, 48, [255, 0, 0]);
    write_solid(dir.path(), 2, 64, 48, [0, 0, 255]);

    let requests = collect_crop_requests(&corpus());
    assert_eq!(requests.len(), 3);
    assert_eq!(requests[2].file_name, "2.jpg");

    let dataset = BBoxDataset::new(requests, dir.path()).with_image_size(16);
    let embedder = GridPoolEmbedder::new(2).unwrap();
    assert_eq!(embedder.dim(), 12);

    let one = extract_deep_features(&dataset, &embedder, 1).unwrap();
    let many = extract_deep_features(&dataset, &embedder, 8).unwrap();
    assert_eq!(one, many, "batching must not change results");
    assert_eq!(one.dim(), (3, 12));

    // rows 0-1 come from the red image, row 2 from the blue one
    for (row, (r, b)) in [(0, (1.0, 0.0)), (1, (1.0, 0.0)), (2, (0.0, 1.0))] {
        let v = one.row(row);
        assert!((v[0] - r).abs() < 0.05, "row {} red = {}", row, v[0]);
        assert!((v[2] - b).abs() < 0.05, "row {} blue = {}", row, v[2]);
    }
}

#[test]
fn test_deep_features_missing_image() {
    let dir = tempfile::tempdir().unwrap();
    let dataset = BBoxDataset::new(collect_crop_requests(&corpus()), dir.path());
    let embedder = GridPoolEmbedder::new(1).unwrap();
    assert!(matches!(
        extract_deep_features(&dataset, &embedder, 4),
        Err(Error::Image(_))
    ));
}

/// Embedder returning the wrong number of vectors.
struct Broken;

impl CropEmbedder for Broken {
    fn dim(&self) -> usize {
        4
    }

    fn embed(&self, _crops: &[RgbImage]) -> Result<Vec<Vec<f32>>> {
        Ok(vec![])
    }
}

#[test]
fn test_deep_features_validate_embedder_output() {
    let dir = tempfile::tempdir().unwrap();
    write_solid(dir.path(), 1, 64, 48, [10, 10, 10]);
    write_solid(dir.path(), 2, 64, 48, [10, 10, 10]);
    let dataset = BBoxDataset::new(collect_crop_requests(&corpus()), dir.path()).with_image_size(8);
    assert!(matches!(
        extract_deep_features(&dataset, &Broken, 2),
        Err(Error::Embedding(_))
    ));
}
