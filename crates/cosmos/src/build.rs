//! Site build command.

use std::path::PathBuf;

use clap::Args;
use cosmos_config::{CliSettings, Config};
use cosmos_hiera::MergeStrategy;
use cosmos_site::{BuildSettings, StaticSiteBuilder};

use crate::error::CliError;
use crate::output::Output;

/// Arguments for building the site.
#[derive(Args)]
pub(crate) struct BuildArgs {
    /// Cosmos project to document.
    #[arg(long)]
    project: PathBuf,

    /// Output directory for the generated site.
    #[arg(long)]
    output: PathBuf,

    /// Path to configuration file (default: auto-discover cosmos.toml).
    #[arg(short, long, env = "COSMOS_CONFIG")]
    config: Option<PathBuf>,

    /// Stylesheet copied into the site (overrides config).
    #[arg(long)]
    stylesheet: Option<PathBuf>,

    /// How multiple Hiera files in one directory are combined: replace or layered (overrides config).
    #[arg(long)]
    merge_strategy: Option<MergeStrategy>,

    /// Generate directory pages in parallel.
    #[arg(long)]
    parallel: bool,

    /// Enable verbose output.
    #[arg(short, long)]
    pub verbose: bool,
}

impl BuildArgs {
    pub(crate) fn execute(self) -> Result<(), CliError> {
        let output = Output::new();

        let cli_settings = CliSettings {
            stylesheet: self.stylesheet,
            merge_strategy: self.merge_strategy,
            parallel: self.parallel.then_some(true),
        };
        let config = Config::load(self.config.as_deref(), Some(&cli_settings))?;
        if let Some(path) = &config.config_path {
            tracing::debug!(config = %path.display(), "Loaded configuration");
        }

        output.info(&format!("Project: {}", self.project.display()));
        output.info(&format!("Output: {}", self.output.display()));

        let settings = build_settings(&config);
        let summary = StaticSiteBuilder::new(self.project, settings).build(&self.output)?;

        output.success(&format!(
            "Site built successfully to {} ({} pages, {} without data, {} managed sites)",
            self.output.display(),
            summary.pages_written,
            summary.pages_skipped,
            summary.managed_sites,
        ));
        Ok(())
    }
}

fn build_settings(config: &Config) -> BuildSettings {
    BuildSettings {
        global_dir: config.project.global_dir.clone(),
        puppet_dir: config.project.puppet_dir.clone(),
        hiera: config.hiera_resolved.clone(),
        renderer: config.tree_renderer(),
        stylesheet: config.site_resolved.stylesheet.clone(),
        parallel: config.site_resolved.parallel,
    }
}
