//! Config command - Configuration management

use clap::{Parser, Subcommand};
use std::path::PathBuf;

use super::super::output::{color, log_success, write_output};
use super::super::utils::{default_config_path, format_error, get_config_dir, Context};
use crate::config::{VgrelConfig, CONFIG_FILE_NAME};

/// Configuration management
#[derive(Parser, Debug)]
pub struct ConfigArgs {
    /// Action to perform
    #[command(subcommand)]
    pub action: ConfigAction,
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a config file with the built-in defaults
    Init {
        /// Target file (defaults to <config dir>/vgrel/config.toml)
        #[arg(long, value_name = "PATH")]
        path: Option<PathBuf>,

        /// Overwrite an existing file
        #[arg(long)]
        force: bool,
    },

    /// Print the effective configuration
    Show,

    /// Print the default config file location
    Path,
}

pub fn run(args: ConfigArgs, ctx: &Context) -> Result<(), String> {
    match args.action {
        ConfigAction::Init { path, force } => {
            let path = match path {
                Some(p) => p,
                None => get_config_dir()?.join(CONFIG_FILE_NAME),
            };
            if path.exists() && !force {
                return Err(format!(
                    "{} already exists (use --force to overwrite)",
                    path.display()
                ));
            }
            VgrelConfig::default()
                .save(&path)
                .map_err(|e| format_error("write config", &e.to_string()))?;
            log_success(&format!("Wrote {}", path.display()), ctx.quiet);
            Ok(())
        }
        ConfigAction::Show => {
            let text = ctx
                .config
                .to_toml_string()
                .map_err(|e| format_error("serialize config", &e.to_string()))?;
            write_output(&text, None)
        }
        ConfigAction::Path => {
            let path = default_config_path()?;
            let status = if path.is_file() {
                color("32", "exists")
            } else {
                color("33", "not found")
            };
            println!("{} ({})", path.display(), status);
            Ok(())
        }
    }
}
