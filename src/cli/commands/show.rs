//! Show command - render relationships for spot checks

use clap::Parser;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

use super::super::output::{color, log_success, to_json, write_output};
use super::super::parser::OutputFormat;
use super::super::utils::{format_error, read_relationships, Context};
use crate::visual::view_n_image_rels;

/// Render relationships for manual inspection
#[derive(Parser, Debug)]
pub struct ShowArgs {
    /// Relationship JSON (defaults to config paths.relationships)
    #[arg(short, long, value_name = "PATH")]
    pub input: Option<PathBuf>,

    /// Number of images to render
    #[arg(short, long, default_value = "5")]
    pub n: usize,

    /// Directory holding {image_id}.jpg (overrides config)
    #[arg(long, value_name = "DIR")]
    pub image_dir: Option<PathBuf>,

    /// Where rendered images go
    #[arg(short, long, value_name = "DIR", default_value = "vgrel-show")]
    pub out_dir: PathBuf,

    /// RNG seed (overrides config)
    #[arg(long, value_name = "SEED")]
    pub seed: Option<u64>,

    /// Output format for the caption list
    #[arg(long, value_enum, default_value = "human")]
    pub format: OutputFormat,
}

pub fn run(args: ShowArgs, ctx: &Context) -> Result<(), String> {
    let data = read_relationships(args.input.as_deref(), ctx)?;
    let image_dir = args.image_dir.unwrap_or_else(|| ctx.config.paths.image_dir.clone());
    let mut rng = StdRng::seed_from_u64(args.seed.unwrap_or(ctx.config.sampling.seed));

    let shown = view_n_image_rels(&data, args.n, &image_dir, &args.out_dir, &mut rng)
        .map_err(|e| format_error("render relationships", &e.to_string()))?;

    let content = match args.format {
        OutputFormat::Json => to_json(&shown)?,
        OutputFormat::Tsv => shown
            .iter()
            .map(|s| format!("{}\t{}\t{}\n", s.image_id, s.caption, s.output.display()))
            .collect(),
        OutputFormat::Human => shown
            .iter()
            .map(|s| format!("{}  {}\n", color("1;33", &s.image_id.to_string()), s.caption))
            .collect(),
    };
    write_output(&content, None)?;
    log_success(
        &format!("Rendered {} images into {}", shown.len(), args.out_dir.display()),
        ctx.quiet,
    );
    Ok(())
}
