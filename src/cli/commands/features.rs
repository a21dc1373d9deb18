//! Features command - primitive and deep feature matrices

use clap::{Args, Parser};
use std::fs;
use std::path::{Path, PathBuf};

use super::super::output::{log_success, progress_bar};
use super::super::utils::{format_error, read_relationships, read_synonym_table, require_list, Context};
use crate::dataset::ImageRelationships;
use crate::export::save_matrix_tsv;
use crate::features::deep::{collect_crop_requests, extract_deep_features_with_progress, BBoxDataset, GridPoolEmbedder};
use crate::features::{get_primitive_features, FeatureMatrices};
use crate::synonyms::SynonymTable;

/// Deep-feature options shared with `pipeline`
#[derive(Args, Debug, Clone)]
pub struct DeepArgs {
    /// Also embed union crops into deep.tsv
    #[arg(long)]
    pub deep: bool,

    /// Directory holding {image_id}.jpg (overrides config)
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Crop side length (overrides config)
    #[arg(long, value_name = "PX")]
    pub image_size: Option<u32>,

    /// Crops per embedder call (overrides config)
    #[arg(long, value_name = "N")]
    pub batch_size: Option<usize>,

    /// Pooling grid side (overrides config)
    #[arg(long, value_name = "N")]
    pub grid: Option<u32>,
}

/// Extract feature matrices
#[derive(Parser, Debug)]
pub struct FeaturesArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Entity list (comma-separated, repeatable, or @file, e.g. @entities.txt)
    #[arg(short, long = "entities", value_name = "ENTITY", required = true)]
    pub entities: Vec<String>,

    /// Object alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub object_alias: Option<PathBuf>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: PathBuf,

    #[command(flatten)]
    pub deep: DeepArgs,
}

pub fn run(args: FeaturesArgs, ctx: &Context) -> Result<(), String> {
    let entities = require_list(&args.entities, "entities")?;
    let data = read_relationships(args.input.as_deref(), ctx)?;
    let alias = args
        .object_alias
        .as_deref()
        .unwrap_or(ctx.config.paths.object_alias.as_path());
    let table = read_synonym_table(alias, &entities)?;

    fs::create_dir_all(&args.out_dir).map_err(|e| format_error("create output directory", &e.to_string()))?;
    let rows = write_features(&data, &entities, &table, &args.out_dir, &args.deep, ctx)?;
    log_success(
        &format!("Wrote features for {} relationships to {}", rows, args.out_dir.display()),
        ctx.quiet,
    );
    Ok(())
}

/// Write `spatial.tsv`, `categorical.tsv` and, if asked, `deep.tsv` into `out_dir`.
///
/// Returns the number of rows.
pub(crate) fn write_features(
    data: &[ImageRelationships],
    entities: &[String],
    object_synonyms: &SynonymTable,
    out_dir: &Path,
    deep: &DeepArgs,
    ctx: &Context,
) -> Result<usize, String> {
    let features = get_primitive_features(data, entities, object_synonyms)
        .map_err(|e| format_error("extract primitive features", &e.to_string()))?;
    let matrices = FeatureMatrices::from_features(&features, entities.len())
        .map_err(|e| format_error("stack features", &e.to_string()))?;

    let no_header: Option<&[&str]> = None;
    save_matrix_tsv(out_dir.join("spatial.tsv"), &matrices.spatial, no_header)
        .map_err(|e| format_error("write spatial.tsv", &e.to_string()))?;
    save_matrix_tsv(out_dir.join("categorical.tsv"), &matrices.categorical, no_header)
        .map_err(|e| format_error("write categorical.tsv", &e.to_string()))?;

    if deep.deep {
        let cfg = &ctx.config.deep;
        let image_dir = deep
            .image_dir
            .clone()
            .unwrap_or_else(|| ctx.config.paths.image_dir.clone());
        let dataset = BBoxDataset::new(collect_crop_requests(data), image_dir)
            .with_image_size(deep.image_size.unwrap_or(cfg.image_size));
        let embedder = GridPoolEmbedder::new(deep.grid.unwrap_or(cfg.grid))
            .map_err(|e| format_error("create embedder", &e.to_string()))?;

        let pb = progress_bar(dataset.len(), "embedding crops", ctx.quiet);
        let embeddings = extract_deep_features_with_progress(
            &dataset,
            &embedder,
            deep.batch_size.unwrap_or(cfg.batch_size),
            |n| pb.inc(n as u64),
        )
        .map_err(|e| format_error("extract deep features", &e.to_string()))?;
        pb.finish_and_clear();

        save_matrix_tsv(out_dir.join("deep.tsv"), &embeddings, no_header)
            .map_err(|e| format_error("write deep.tsv", &e.to_string()))?;
    }

    Ok(matrices.len())
}
