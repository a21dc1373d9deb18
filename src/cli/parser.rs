//! CLI argument parsing and structure definitions

use clap::{Parser, Subcommand, ValueEnum};
use std::path::PathBuf;

use super::commands;

/// Visual Genome relationship preparation for weak supervision
#[derive(Parser)]
#[command(name = "vgrel")]
#[command(
    author,
    version,
    about = "Visual Genome relationship preparation for weak supervision",
    long_about = r#"
vgrel - prepare Visual Genome relationships for weak-supervision labeling

STAGES:
  • synonyms   - expand category seeds through alias lists
  • filter     - keep relationships whose predicate is of interest
  • count      - per-predicate relationship counts
  • sample     - keep N labeled examples per predicate, mask the rest
  • labels     - one-hot label matrix (-1 for unlabeled rows)
  • features   - spatial + categorical primitives, optional crop embeddings
  • show       - render subject (red) / object (cyan) boxes for spot checks
  • pipeline   - all of the above in one go

CONFIG:
  Paths and defaults come from --config, else <config dir>/vgrel/config.toml,
  else built-ins. Flags override config values.

EXAMPLES:
  vgrel synonyms --kind predicate wearing
  vgrel count -i relationships.json --format json
  vgrel pipeline -p wearing,holding -O man,hat,cup -o out/
"#
)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,

    /// Config file (TOML)
    #[arg(long, global = true, value_name = "PATH")]
    pub config: Option<PathBuf>,

    /// More log output (-v info, -vv debug, -vvv trace)
    #[arg(short, long, global = true, action = clap::ArgAction::Count)]
    pub verbose: u8,

    /// Only errors; no progress bars
    #[arg(short, long, global = true)]
    pub quiet: bool,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Expand category seeds into synonym sets
    #[command(visible_alias = "syn")]
    Synonyms(commands::SynonymsArgs),

    /// Keep relationships whose predicate is of interest
    Filter(commands::FilterArgs),

    /// Count relationships per predicate
    Count(commands::CountArgs),

    /// Keep N labeled examples per predicate, mask the rest
    Sample(commands::SampleArgs),

    /// Build the label matrix
    Labels(commands::LabelsArgs),

    /// List object categories used by relationships of interest
    Categories(commands::CategoriesArgs),

    /// Extract feature matrices
    #[command(visible_alias = "feat")]
    Features(commands::FeaturesArgs),

    /// Render relationships for manual inspection
    Show(commands::ShowArgs),

    /// Full preparation pipeline
    #[command(visible_alias = "p")]
    Pipeline(commands::PipelineArgs),

    /// Manage the configuration file
    Config(commands::ConfigArgs),

    /// Generate shell completions
    Completions {
        /// Shell to generate completions for
        #[arg(value_enum)]
        shell: clap_complete::Shell,
    },
}

/// Output format
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum OutputFormat {
    /// Human-readable, colored on a terminal
    #[default]
    Human,
    /// JSON
    Json,
    /// Tab-separated values
    Tsv,
}

/// Which alias list to expand through
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, ValueEnum)]
pub enum CategoryKind {
    /// Object names
    #[default]
    Object,
    /// Predicates
    Predicate,
}
