//! Labels command - label matrix for a sampled corpus

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{log_info, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{format_error, read_relationships, read_synonym_table, Context};
use super::dataset::normalize_predicates;
use crate::dataset::{get_labels, LabelMatrix};
use crate::export::matrix_to_tsv;

/// Build the label matrix
#[derive(Parser, Debug)]
pub struct LabelsArgs {
    /// Sampled relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Label columns (comma-separated, repeatable, or @file)
    #[arg(short, long = "predicates", value_name = "PRED", required = true)]
    pub predicates: Vec<String>,

    /// Fail on predicates that are not columns instead of resolving synonyms
    #[arg(long)]
    pub strict: bool,

    /// Predicate alias file (overrides config)
    #[arg(long, value_name = "PATH")]
    pub predicate_alias: Option<PathBuf>,

    /// Output format (human and tsv both print the matrix with a header row)
    #[arg(long, value_enum, default_value = "tsv")]
    pub format: OutputFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: LabelsArgs, ctx: &Context) -> Result<(), String> {
    let predicates = normalize_predicates(&args.predicates)?;
    let data = read_relationships(args.input.as_deref(), ctx)?;

    let syns_to_preds = if args.strict {
        None
    } else {
        let alias = args
            .predicate_alias
            .as_deref()
            .unwrap_or(ctx.config.paths.predicate_alias.as_path());
        Some(read_synonym_table(alias, &predicates)?.invert())
    };

    let matrix = get_labels(&data, &predicates, syns_to_preds.as_ref())
        .map_err(|e| format_error("build labels", &e.to_string()))?;
    log_info(
        &format!(
            "{} rows, {} labeled, {} columns",
            matrix.num_rows(),
            matrix.num_labeled(),
            matrix.predicates.len()
        ),
        ctx.quiet,
    );

    write_output(&render_labels(&matrix, args.format)?, args.output.as_deref())
}

pub(crate) fn render_labels(matrix: &LabelMatrix, format: OutputFormat) -> Result<String, String> {
    match format {
        OutputFormat::Json => {
            let rows: Vec<Vec<i8>> = matrix.labels.rows().into_iter().map(|r| r.to_vec()).collect();
            to_json(&serde_json::json!({
                "predicates": matrix.predicates,
                "labels": rows,
            }))
        }
        OutputFormat::Human | OutputFormat::Tsv => {
            matrix_to_tsv(&matrix.labels, Some(matrix.predicates.as_slice())).map_err(|e| e.to_string())
        }
    }
}
