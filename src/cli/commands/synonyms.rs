//! Synonyms command - expand seeds through an alias list

use clap::Parser;
use std::path::PathBuf;

use super::super::output::{color, to_json, write_output};
use super::super::parser::{CategoryKind, OutputFormat};
use super::super::utils::{format_error, require_list, Context};
use crate::synonyms::{AliasMap, SynonymTable};

/// Expand category seeds into synonym sets
#[derive(Parser, Debug)]
pub struct SynonymsArgs {
    /// Seeds (comma-separated, repeatable, or @file)
    #[arg(value_name = "SEED", required = true)]
    pub seeds: Vec<String>,

    /// Alias list to expand through
    #[arg(short, long, value_enum, default_value = "object")]
    pub kind: CategoryKind,

    /// Alias file (overrides config)
    #[arg(short, long, value_name = "PATH")]
    pub alias: Option<PathBuf>,

    /// One closure per seed (canonical → synonyms) instead of a single union
    #[arg(long)]
    pub table: bool,

    /// Output format
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,

    /// Write to file instead of stdout
    #[arg(short, long, value_name = "PATH")]
    pub output: Option<PathBuf>,
}

pub fn run(args: SynonymsArgs, ctx: &Context) -> Result<(), String> {
    let seeds = require_list(&args.seeds, "seeds")?;
    let path = args.alias.clone().unwrap_or_else(|| match args.kind {
        CategoryKind::Object => ctx.config.paths.object_alias.clone(),
        CategoryKind::Predicate => ctx.config.paths.predicate_alias.clone(),
    });
    let aliases = AliasMap::from_file(&path)
        .map_err(|e| format_error("load alias file", &format!("{}: {}", path.display(), e)))?;

    let content = if args.table {
        render_table(&SynonymTable::from_closures(&aliases, &seeds), args.format)?
    } else {
        render_closure(&aliases.closure(&seeds), args.format)?
    };
    write_output(&content, args.output.as_deref())
}

fn render_closure(names: &[String], format: OutputFormat) -> Result<String, String> {
    Ok(match format {
        OutputFormat::Json => to_json(names)?,
        OutputFormat::Human | OutputFormat::Tsv => {
            let mut s = names.join("\n");
            s.push('\n');
            s
        }
    })
}

fn render_table(table: &SynonymTable, format: OutputFormat) -> Result<String, String> {
    Ok(match format {
        OutputFormat::Json => to_json(table)?,
        OutputFormat::Tsv => table
            .iter()
            .map(|(k, syns)| format!("{}\t{}\n", k, syns.join(",")))
            .collect(),
        OutputFormat::Human => table
            .iter()
            .map(|(k, syns)| format!("{} ({}): {}\n", color("1;36", k), syns.len(), syns.join(", ")))
            .collect(),
    })
}
