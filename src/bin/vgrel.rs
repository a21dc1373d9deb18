//! vgrel - Visual Genome relationship preparation
//!
//! Turns raw Visual Genome relationship annotations into weak-supervision
//! training inputs: synonym-normalized predicates, a sampled label matrix and
//! per-relationship feature matrices.
//!
//! # Usage
//!
//! ```bash
//! # Synonyms of a seed
//! vgrel synonyms --kind predicate wearing
//!
//! # Predicate histogram
//! vgrel count -i relationships.json
//!
//! # Everything, written to out/
//! vgrel pipeline -p wearing,holding -O man,hat,cup -o out/
//!
//! # Spot-check five relationships
//! vgrel show -n 5 --image-dir images/ -o shown/
//! ```

use std::io;
use std::process::ExitCode;

use clap::{CommandFactory, Parser};
use clap_complete::generate;
use env_logger::Env;

use vgrel::cli::commands::{config, dataset, features, labels, pipeline, show, synonyms};
use vgrel::cli::output::color;
use vgrel::cli::{Cli, Commands, Context};

fn init_logging(verbose: u8, quiet: bool) {
    let level = if quiet {
        "error"
    } else {
        match verbose {
            0 => "warn",
            1 => "info",
            2 => "debug",
            _ => "trace",
        }
    };
    env_logger::Builder::from_env(Env::default().default_filter_or(level))
        .format_timestamp(None)
        .init();
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose, cli.quiet);

    let result: Result<(), String> = match cli.command {
        Commands::Completions { shell } => {
            generate(shell, &mut Cli::command(), "vgrel", &mut io::stdout());
            Ok(())
        }
        command => Context::load(cli.config.as_deref(), cli.quiet).and_then(|ctx| match command {
            Commands::Synonyms(args) => synonyms::run(args, &ctx),
            Commands::Filter(args) => dataset::run_filter(args, &ctx),
            Commands::Count(args) => dataset::run_count(args, &ctx),
            Commands::Sample(args) => dataset::run_sample(args, &ctx),
            Commands::Labels(args) => labels::run(args, &ctx),
            Commands::Categories(args) => dataset::run_categories(args, &ctx),
            Commands::Features(args) => features::run(args, &ctx),
            Commands::Show(args) => show::run(args, &ctx),
            Commands::Pipeline(args) => pipeline::run(args, &ctx),
            Commands::Config(args) => config::run(args, &ctx),
            Commands::Completions { .. } => Ok(()),
        }),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("{} {}", color("31", "error:"), e);
            ExitCode::FAILURE
        }
    }
}
