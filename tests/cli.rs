//! CLI tests: every subcommand against a temp corpus and config.

use assert_cmd::Command;
use image::{Rgb, RgbImage};
use predicates::prelude::*;
use std::fs;
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const CORPUS: &str = r#"[
  {"image_id": 1, "relationships": [
    {"predicate": "wearing",
     "subject": {"x": 0, "y": 0, "w": 10, "h": 20, "name": "man"},
     "object": {"x": 2, "y": 0, "w": 5, "h": 4, "name": "hat"}},
    {"predicate": "wears",
     "subject": {"x": 20, "y": 0, "w": 10, "h": 20, "names": ["guy"]},
     "object": {"x": 22, "y": 0, "w": 5, "h": 4, "name": "cap"}},
    {"predicate": "ON",
     "subject": {"x": 5, "y": 5, "w": 2, "h": 2, "name": "cup"},
     "object": {"x": 0, "y": 6, "w": 30, "h": 10, "name": "table"}}
  ]},
  {"image_id": 2, "relationships": [
    {"predicate": "holding",
     "subject": {"x": 0, "y": 0, "w": 10, "h": 20, "name": "man"},
     "object": {"x": 8, "y": 10, "w": 3, "h": 3, "name": "cup"}},
    {"predicate": "on",
     "subject": {"x": 1, "y": 1, "w": 0, "h": 5, "name": "dog"},
     "object": {"x": 0, "y": 6, "w": 30, "h": 10, "name": "table"}}
  ]}
]"#;

struct Fixture {
    dir: TempDir,
    config: PathBuf,
}

impl Fixture {
    fn new() -> Self {
        let dir = tempfile::tempdir().expect("Failed to create temp directory");
        let p = dir.path();
        fs::write(p.join("relationships.json"), CORPUS).unwrap();
        fs::write(p.join("object_alias.txt"), "man,guy,person\nhat,cap\ncup,mug\ntable,desk\n").unwrap();
        fs::write(p.join("relationship_alias.txt"), "wearing,wears\nholding,holds\non,on top of\n").unwrap();
        fs::create_dir_all(p.join("images")).unwrap();
        for id in [1, 2] {
            RgbImage::from_pixel(64, 48, Rgb([200, 30, 30]))
                .save(p.join("images").join(format!("{}.jpg", id)))
                .unwrap();
        }

        let config = p.join("config.toml");
        fs::write(
            &config,
            format!(
                "[paths]\nobject_alias = {:?}\npredicate_alias = {:?}\nrelationships = {:?}\nimage_dir = {:?}\n\n[sampling]\nn_per_pred = 1\n",
                p.join("object_alias.txt"),
                p.join("relationship_alias.txt"),
                p.join("relationships.json"),
                p.join("images"),
            ),
        )
        .unwrap();
        Self { dir, config }
    }

    fn path(&self) -> &Path {
        self.dir.path()
    }

    fn cmd(&self) -> Command {
        let mut cmd = Command::cargo_bin("vgrel").unwrap();
        cmd.arg("--config").arg(&self.config).arg("--quiet");
        cmd
    }
}

fn lines(path: &Path) -> Vec<String> {
    fs::read_to_string(path)
        .unwrap()
        .lines()
        .map(str::to_string)
        .collect()
}

#[test]
fn test_synonyms_union_and_table() {
    let f = Fixture::new();
    f.cmd()
        .args(["synonyms", "--kind", "predicate", "wearing"])
        .assert()
        .success()
        .stdout("wearing\nwears\n");

    f.cmd()
        .args(["synonyms", "--table", "--format", "json", "man,hat"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""hat": ["#).and(predicate::str::contains("\"guy\"")));
}

#[test]
fn test_count_formats() {
    let f = Fixture::new();
    f.cmd()
        .args(["count", "--format", "tsv"])
        .assert()
        .success()
        .stdout(predicate::str::contains("ON\t1").and(predicate::str::contains("_TOTAL\t5")));

    f.cmd()
        .args(["count", "--format", "json", "-p", "wearing"])
        .assert()
        .success()
        .stdout(predicate::str::contains(r#""wearing": 2"#).and(predicate::str::contains(r#""_TOTAL": 5"#)));
}

#[test]
fn test_filter_then_sample() {
    let f = Fixture::new();
    let filtered = f.path().join("filtered.json");
    let sampled = f.path().join("sampled.json");
    let counts = f.path().join("counts.json");

    f.cmd()
        .args(["filter", "-p", "wearing,on", "--canonicalize", "-o"])
        .arg(&filtered)
        .assert()
        .success();
    let text = fs::read_to_string(&filtered).unwrap();
    assert!(!text.contains("holding"));
    assert!(!text.contains("wears"));

    f.cmd()
        .args(["sample", "-i"])
        .arg(&filtered)
        .arg("-o")
        .arg(&sampled)
        .arg("--counts")
        .arg(&counts)
        .assert()
        .success();
    let text = fs::read_to_string(&sampled).unwrap();
    assert_eq!(text.matches("UNLABELED").count(), 1);
    assert!(fs::read_to_string(&counts).unwrap().contains(r#""wearing": 2"#));
}

#[test]
fn test_labels_from_sampled_corpus() {
    let f = Fixture::new();
    let filtered = f.path().join("filtered.json");
    let sampled = f.path().join("sampled.json");
    f.cmd().args(["filter", "-p", "wearing,on", "--expand", "-o"]).arg(&filtered).assert().success();
    f.cmd()
        .args(["sample", "-n", "5", "-i"])
        .arg(&filtered)
        .arg("-o")
        .arg(&sampled)
        .assert()
        .success();

    // "wears" is resolved through the predicate aliases
    f.cmd()
        .args(["labels", "-p", "wearing,on", "-i"])
        .arg(&sampled)
        .assert()
        .success()
        .stdout("on\twearing\n0\t1\n0\t1\n1\t0\n");

    f.cmd()
        .args(["labels", "--strict", "-p", "wearing,on", "-i"])
        .arg(&sampled)
        .assert()
        .failure()
        .stderr(predicate::str::contains("wears"));
}

#[test]
fn test_categories() {
    let f = Fixture::new();
    f.cmd()
        .args(["categories", "-p", "wearing,wears", "-O", "man,hat,cup,table"])
        .assert()
        .success()
        .stdout("hat\nman\n");
}

#[test]
fn test_pipeline_writes_everything() {
    let f = Fixture::new();
    let out = f.path().join("out");
    f.cmd()
        .args(["pipeline", "-p", "wearing,on", "-O", "man,hat,cup,table", "--deep", "--grid", "2", "--image-size", "16", "-o"])
        .arg(&out)
        .assert()
        .success();

    for name in ["sampled.json", "counts.json", "labels.tsv", "spatial.tsv", "categorical.tsv", "entities.txt", "deep.tsv"] {
        assert!(out.join(name).is_file(), "{} missing", name);
    }
    assert_eq!(lines(&out.join("entities.txt")), vec!["cup", "hat", "man", "table"]);

    let labels = lines(&out.join("labels.tsv"));
    assert_eq!(labels[0], "on\twearing");
    assert_eq!(labels.len(), 4);

    let spatial = lines(&out.join("spatial.tsv"));
    assert_eq!(spatial.len(), 3);
    assert!(spatial.iter().all(|l| l.split('\t').count() == 7));

    let categorical = lines(&out.join("categorical.tsv"));
    assert!(categorical.iter().all(|l| l.split('\t').count() == 8));

    let deep = lines(&out.join("deep.tsv"));
    assert_eq!(deep.len(), 3);
    assert!(deep.iter().all(|l| l.split('\t').count() == 12));
}

#[test]
fn test_features_from_entity_file() {
    let f = Fixture::new();
    let entities = f.path().join("entities.txt");
    fs::write(&entities, "cup\nhat\nman\ntable\n").unwrap();
    let filtered = f.path().join("filtered.json");
    f.cmd().args(["filter", "-p", "wearing,on", "--expand", "-o"]).arg(&filtered).assert().success();

    let out = f.path().join("feats");
    f.cmd()
        .args(["features", "-i"])
        .arg(&filtered)
        .arg("-e")
        .arg(format!("@{}", entities.display()))
        .arg("-o")
        .arg(&out)
        .assert()
        .success();
    assert_eq!(lines(&out.join("categorical.tsv"))[2], "1\t0\t0\t0\t0\t0\t0\t1");
    assert!(!out.join("deep.tsv").exists());
}

#[test]
fn test_oversized_grid_is_rejected() {
    let f = Fixture::new();
    let filtered = f.path().join("filtered.json");
    f.cmd().args(["filter", "-p", "wearing,on", "--expand", "-o"]).arg(&filtered).assert().success();
    f.cmd()
        .args(["features", "-e", "cup,hat,man,table", "--deep", "--grid", "65536", "-i"])
        .arg(&filtered)
        .arg("-o")
        .arg(f.path().join("feats"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("grid must be between 1 and 256"));
}

#[test]
fn test_show_renders_images() {
    let f = Fixture::new();
    let out = f.path().join("shown");
    f.cmd()
        .args(["show", "-n", "2", "--format", "tsv", "-o"])
        .arg(&out)
        .assert()
        .success()
        .stdout(predicate::str::contains("man <wearing> hat").and(predicate::str::contains("man <holding> cup")));
    assert!(out.join("1.png").is_file());
    assert!(out.join("2.png").is_file());
}

#[test]
fn test_config_show_and_init() {
    let f = Fixture::new();
    f.cmd()
        .args(["config", "show"])
        .assert()
        .success()
        .stdout(predicate::str::contains("n_per_pred = 1").and(predicate::str::contains("seed = 42")));

    let target = f.path().join("fresh.toml");
    f.cmd().args(["config", "init", "--path"]).arg(&target).assert().success();
    assert!(fs::read_to_string(&target).unwrap().contains("n_per_pred = 10"));

    f.cmd()
        .args(["config", "init", "--path"])
        .arg(&target)
        .assert()
        .failure()
        .stderr(predicate::str::contains("already exists"));
}

#[test]
fn test_missing_input_fails() {
    let f = Fixture::new();
    f.cmd()
        .args(["count", "-i"])
        .arg(f.path().join("nope.json"))
        .assert()
        .failure()
        .stderr(predicate::str::contains("error:"));
}

#[test]
fn test_bad_config_fails() {
    let f = Fixture::new();
    let bad = f.path().join("bad.toml");
    fs::write(&bad, "[sampling\n").unwrap();
    Command::cargo_bin("vgrel")
        .unwrap()
        .args(["--config"])
        .arg(&bad)
        .args(["config", "show"])
        .assert()
        .failure()
        .stderr(predicate::str::contains("config"));
}

#[test]
fn test_completions() {
    Command::cargo_bin("vgrel")
        .unwrap()
        .args(["completions", "bash"])
        .assert()
        .success()
        .stdout(predicate::str::contains("vgrel"));
}
