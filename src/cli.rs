use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::Config;

#[derive(Debug, Parser)]
#[command(author, version, about)]
pub struct Cli {
    #[command(flatten)]
    pub config: ConfigArgs,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Import Open Bible Stories into a destination namespace.
    Run(RunArgs),
}

/// Flags shared by every binary; they win over the config file and environment.
#[derive(Debug, Clone, Args)]
pub struct ConfigArgs {
    /// YAML config file.
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Wiki pages root (one directory per language namespace).
    #[arg(long, global = true)]
    pub pages_dir: Option<PathBuf>,

    /// Dataset URL template; `{lang}` is replaced by the source language code.
    #[arg(long, global = true)]
    pub dataset_url: Option<String>,

    /// Skip the regeneration script and git.
    #[arg(long, global = true)]
    pub no_publish: bool,
}

impl ConfigArgs {
    pub fn load(&self) -> anyhow::Result<Config> {
        let mut config = Config::load(self.config.as_deref())?;
        if let Some(pages_dir) = &self.pages_dir {
            config.pages_dir = pages_dir.clone();
        }
        if let Some(dataset_url) = &self.dataset_url {
            config.dataset_url = dataset_url.clone();
        }
        if self.no_publish {
            config.publish = false;
        }
        config.validate()?;
        Ok(config)
    }
}

#[derive(Debug, Args)]
pub struct RunArgs {
    /// Source language code (e.g. `en`).
    #[arg(long)]
    pub source_lang: String,

    /// Destination language, as a code or `Name (code)`.
    #[arg(long)]
    pub destination_lang: String,

    /// Server name used to decide whether git output is printed.
    #[arg(long, env = "SERVER_NAME")]
    pub server_name: Option<String>,

    /// Date written to the status page (default: today).
    #[arg(long)]
    pub date: Option<chrono::NaiveDate>,
}
