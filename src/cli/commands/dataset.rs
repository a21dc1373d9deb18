//! Dataset commands - filter, count, sample, categories

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::collections::{BTreeSet, HashSet};
use std::path::PathBuf;

use super::super::output::{color, log_success, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{format_error, read_relationships, read_synonym_table, require_list, Context};
use crate::dataset::{
    canonicalize_predicates, count_relationships, extract_obj_categories, filter_relationships_in_place,
    relationship_count, sample_relationships, save_relationships, PredicateCounts, TOTAL_KEY,
};

/// Keep relationships whose predicate is of interest
#[derive(Parser, Debug)]
pub struct FilterArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the filtered corpus
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Predicates to keep (comma-separated, repeatable, or @file)
    #[arg(short, long = "predicates", value_name = "PRED", required = true)]
    pub predicates: Vec<String>,

    /// Also keep every synonym of the given predicates
    #[arg(long)]
    pub expand: bool,

    /// Rewrite synonyms to their canonical predicate (implies --expand)
    #[arg(long)]
    pub canonicalize: bool,

    /// Predicate alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub predicate_alias: Option<PathBuf>,
}

/// Count relationships per predicate
#[derive(Parser, Debug)]
pub struct CountArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Count synonyms of these predicates under the canonical name
    #[arg(short, long = "predicates", value_name = "PRED")]
    pub predicates: Vec<String>,

    /// Predicate alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub predicate_alias: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Keep N labeled examples per predicate, mask the rest
#[derive(Parser, Debug)]
pub struct SampleArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Where to write the sampled corpus
    #[arg(short, long, value_name = "PATH")]
    pub output: PathBuf,

    /// Labeled examples per predicate (overrides config)
    #[arg(short, long, value_name = "N")]
    pub n_per_pred: Option<usize>,

    /// RNG seed (overrides config)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Also write the per-predicate counts used for sampling
    #[arg(long, value_name = "PATH")]
    pub counts: Option<PathBuf>,
}

/// List object categories used by relationships of interest
#[derive(Parser, Debug)]
pub struct CategoriesArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Predicates of interest
    #[arg(short, long = "predicates", value_name = "PRED", required = true)]
    pub predicates: Vec<String>,

    /// Canonical object names
    #[arg(short = 'O', long = "objects", value_name = "OBJ", required = true)]
    pub objects: Vec<String>,

    /// Object alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub object_alias: Option<PathBuf>,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

/// Lower-cased, deduplicated predicate list in the order given.
///
/// Order matters: a synonym shared by two predicates belongs to the earlier one.
pub(crate) fn normalize_predicates(values: &[String]) -> Result<Vec<String>, String> {
    let mut seen = HashSet::new();
    Ok(require_list(values, "predicates")?
        .into_iter()
        .map(|p| p.to_lowercase())
        .filter(|p| seen.insert(p.clone()))
        .collect())
}

pub fn run_filter(args: FilterArgs, ctx: &Context) -> Result<(), String> {
    let predicates = normalize_predicates(&args.predicates)?;
    let mut data = read_relationships(args.input.as_deref(), ctx)?;

    let table = if args.expand || args.canonicalize {
        let alias = args
            .predicate_alias
            .as_deref()
            .unwrap_or(ctx.config.paths.predicate_alias.as_path());
        Some(read_synonym_table(alias, &predicates)?)
    } else {
        None
    };
    let allowed: BTreeSet<String> = match &table {
        Some(t) => t.all_names(),
        None => predicates.iter().cloned().collect(),
    };

    let removed = filter_relationships_in_place(&mut data, |r| allowed.contains(&r.predicate));
    if let (true, Some(t)) = (args.canonicalize, &table) {
        let n = canonicalize_predicates(&mut data, &t.invert());
        log::info!("Rewrote {} predicates to canonical names", n);
    }

    save_relationships(&args.output, &data).map_err(|e| format_error("write relationships", &e.to_string()))?;
    log_success(
        &format!(
            "Kept {} relationships ({} removed) -> {}",
            relationship_count(&data),
            removed,
            args.output.display()
        ),
        ctx.quiet,
    );
    Ok(())
}

pub fn run_count(args: CountArgs, ctx: &Context) -> Result<(), String> {
    let data = read_relationships(args.input.as_deref(), ctx)?;

    let syns_to_preds = if args.predicates.is_empty() {
        None
    } else {
        let predicates = normalize_predicates(&args.predicates)?;
        let alias = args
            .predicate_alias
            .as_deref()
            .unwrap_or(ctx.config.paths.predicate_alias.as_path());
        Some(read_synonym_table(alias, &predicates)?.invert())
    };
    let counts = count_relationships(&data, syns_to_preds.as_ref());

    write_output(&render_counts(&counts, args.format)?, args.output.as_deref())
}

pub(crate) fn render_counts(counts: &PredicateCounts, format: OutputFormat) -> Result<String, String> {
    Ok(match format {
        OutputFormat::Json => to_json(counts)?,
        OutputFormat::Tsv => {
            let mut s: String = counts.iter().map(|(p, n)| format!("{}\t{}\n", p, n)).collect();
            s.push_str(&format!("{}\t{}\n", TOTAL_KEY, counts.total()));
            s
        }
        OutputFormat::Human => {
            let width = counts.iter().map(|(p, _)| p.len()).max().unwrap_or(0).max(5);
            let mut s: String = counts
                .ascending()
                .into_iter()
                .map(|(p, n)| format!("{:<width$}  {:>8}\n", p, n, width = width))
                .collect();
            s.push_str(&format!(
                "{:<width$}  {:>8}\n",
                color("1", "total"),
                counts.total(),
                width = width
            ));
            s
        }
    })
}

pub fn run_sample(args: SampleArgs, ctx: &Context) -> Result<(), String> {
    let mut data = read_relationships(args.input.as_deref(), ctx)?;
    let n_per_pred = args.n_per_pred.unwrap_or(ctx.config.sampling.n_per_pred);
    let seed = args.seed.unwrap_or(ctx.config.sampling.seed);

    // Sampling keys on lower-cased predicates; count the same way.
    for r in data.iter_mut().flat_map(|a| a.relationships.iter_mut()) {
        r.predicate = r.predicate.to_lowercase();
    }
    let counts = count_relationships(&data, None);
    let mut rng = StdRng::seed_from_u64(seed);
    let sampled = sample_relationships(&data, &counts, n_per_pred, &mut rng)
        .map_err(|e| format_error("sample relationships", &e.to_string()))?;

    save_relationships(&args.output, &sampled).map_err(|e| format_error("write relationships", &e.to_string()))?;
    if let Some(path) = &args.counts {
        write_output(&to_json(&counts)?, Some(path.as_path()))?;
    }
    log_success(
        &format!(
            "Sampled up to {} per predicate over {} predicates (seed {}) -> {}",
            n_per_pred,
            counts.len(),
            seed,
            args.output.display()
        ),
        ctx.quiet,
    );
    Ok(())
}

pub fn run_categories(args: CategoriesArgs, ctx: &Context) -> Result<(), String> {
    let predicates = normalize_predicates(&args.predicates)?;
    let objects = require_list(&args.objects, "objects")?;
    let data = read_relationships(args.input.as_deref(), ctx)?;

    let alias = args
        .object_alias
        .as_deref()
        .unwrap_or(ctx.config.paths.object_alias.as_path());
    let table = read_synonym_table(alias, &objects)?;
    let categories = extract_obj_categories(&data, &predicates, &table)
        .map_err(|e| format_error("extract categories", &e.to_string()))?;

    let content = match args.format {
        OutputFormat::Json => to_json(&categories)?,
        OutputFormat::Human | OutputFormat::Tsv => categories.iter().map(|c| format!("{}\n", c)).collect(),
    };
    write_output(&content, args.output.as_deref())
}
