//! Pipeline command - every stage from raw relationships to matrices
//!
//! ```text
//! load ─► synonym tables ─► filter ─► canonicalize ─► count ─► sample
//!                                                               │
//!            entities.txt ◄─ categories ◄─ labels.tsv ◄─────────┘
//!                 │
//!                 └─► spatial.tsv, categorical.tsv [, deep.tsv]
//! ```

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::BTreeSet;
use std::fs;
use std::path::PathBuf;
use std::time::Instant;

use super::super::output::{log_info, log_success, to_json, write_output};
use super::super::utils::{format_error, read_relationships, read_similar, require_list, Context};
use super::dataset::normalize_predicates;
use super::features::{write_features, DeepArgs};
use crate::dataset::{
    canonicalize_predicates, count_relationships, extract_obj_categories, filter_relationships_in_place,
    get_labels, relationship_count, sample_relationships, save_relationships,
};
use crate::export::save_matrix_tsv;

/// Full preparation pipeline
#[derive(Parser, Debug)]
pub struct PipelineArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Canonical predicates (comma-separated, repeatable, or @file)
    #[arg(short, long = "predicates", value_name = "PRED", required = true)]
    pub predicates: Vec<String>,

    /// Canonical object names
    #[arg(short = 'O', long = "objects", value_name = "OBJ", required = true)]
    pub objects: Vec<String>,

    /// Output directory
    #[arg(short, long, value_name = "DIR")]
    pub out_dir: PathBuf,

    /// Labeled examples per predicate (overrides config)
    #[arg(short, long, value_name = "N")]
    pub n_per_pred: Option<usize>,

    /// RNG seed (overrides config)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Object alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub object_alias: Option<PathBuf>,

    /// Predicate alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub predicate_alias: Option<PathBuf>,

    #[command(flatten)]
    pub deep: DeepArgs,
}

pub fn run(args: PipelineArgs, ctx: &Context) -> Result<(), String> {
    let start = Instant::now();
    let predicates = normalize_predicates(&args.predicates)?;
    let objects = require_list(&args.objects, "objects")?;
    let n_per_pred = args.n_per_pred.unwrap_or(ctx.config.sampling.n_per_pred);
    let seed = args.seed.unwrap_or(ctx.config.sampling.seed);

    let mut data = read_relationships(args.input.as_deref(), ctx)?;
    log_info(
        &format!("Loaded {} relationships on {} images", relationship_count(&data), data.len()),
        ctx.quiet,
    );

    let similar = read_similar(args.object_alias.as_deref(), args.predicate_alias.as_deref(), ctx)?;
    let pred_table = similar.predicate_synonyms(&predicates);
    let obj_table = similar.object_synonyms(&objects);
    let syns_to_preds = pred_table.invert();
    let allowed_preds = pred_table.all_names();
    let known_objects: BTreeSet<String> = obj_table.all_names();

    // Relationships whose endpoints have no category would fail feature extraction.
    let removed = filter_relationships_in_place(&mut data, |r| {
        allowed_preds.contains(&r.predicate)
            && [&r.subject, &r.object]
                .iter()
                .all(|o| o.name().map(|n| known_objects.contains(n)).unwrap_or(false))
    });
    let renamed = canonicalize_predicates(&mut data, &syns_to_preds);
    log_info(
        &format!(
            "Kept {} relationships ({} removed, {} predicates canonicalized)",
            relationship_count(&data),
            removed,
            renamed
        ),
        ctx.quiet,
    );

    let counts = count_relationships(&data, None);
    let mut rng = StdRng::seed_from_u64(seed);
    let sampled = sample_relationships(&data, &counts, n_per_pred, &mut rng)
        .map_err(|e| format_error("sample relationships", &e.to_string()))?;

    let labels = get_labels(&sampled, &predicates, Some(&syns_to_preds))
        .map_err(|e| format_error("build labels", &e.to_string()))?;
    let entities = extract_obj_categories(&data, &predicates, &obj_table)
        .map_err(|e| format_error("extract categories", &e.to_string()))?;

    fs::create_dir_all(&args.out_dir).map_err(|e| format_error("create output directory", &e.to_string()))?;
    let out = |name: &str| args.out_dir.join(name);

    save_relationships(out("sampled.json"), &sampled)
        .map_err(|e| format_error("write sampled.json", &e.to_string()))?;
    write_output(&to_json(&counts)?, Some(out("counts.json").as_path()))?;
    save_matrix_tsv(out("labels.tsv"), &labels.labels, Some(labels.predicates.as_slice()))
        .map_err(|e| format_error("write labels.tsv", &e.to_string()))?;
    let entity_lines: String = entities.iter().map(|e| format!("{}\n", e)).collect();
    write_output(&entity_lines, Some(out("entities.txt").as_path()))?;

    let rows = write_features(&sampled, &entities, &obj_table, &args.out_dir, &args.deep, ctx)?;

    log_success(
        &format!(
            "{} rows, {} labeled, {} predicates, {} entities in {:.1}s -> {}",
            rows,
            labels.num_labeled(),
            labels.predicates.len(),
            entities.len(),
            start.elapsed().as_secs_f64(),
            args.out_dir.display()
        ),
        ctx.quiet,
    );
    Ok(())
}
