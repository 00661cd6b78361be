//! Static site builder for Cosmos projects.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use cosmos_hiera::{
    Classifier, DEFAULT_GLOBAL_DIR, DEFAULT_PUPPET_DIR, HieraError, HieraLoader, HieraSettings,
};
use cosmos_renderer::TreeRenderer;
use cosmos_tree::Value;
use rayon::prelude::*;

use crate::navigation::{Category, SiteIndex};
use crate::sites::ManagedSites;
use crate::template::{render_index, render_page};

/// Output directory of the Puppet rules page.
pub const RULES_PAGE: &str = "cosmos-rules";

/// Output directory of the managed sites page.
pub const SITES_PAGE: &str = "sites";

const INDEX_FILE: &str = "index.html";

/// Configuration for static site building.
#[derive(Debug, Clone)]
pub struct BuildSettings {
    /// Directory holding site-wide Hiera data.
    pub global_dir: String,
    /// Directory holding the Puppet rules, relative to the project root.
    pub puppet_dir: String,
    pub hiera: HieraSettings,
    pub renderer: TreeRenderer,
    /// Stylesheet copied into the output root.
    pub stylesheet: PathBuf,
    /// Load and render directory pages on the rayon pool.
    pub parallel: bool,
}

impl Default for BuildSettings {
    fn default() -> Self {
        Self {
            global_dir: DEFAULT_GLOBAL_DIR.to_owned(),
            puppet_dir: DEFAULT_PUPPET_DIR.to_owned(),
            hiera: HieraSettings::default(),
            renderer: TreeRenderer::default(),
            stylesheet: PathBuf::from("vanilla.css"),
            parallel: false,
        }
    }
}

/// Error returned by the static site builder.
#[derive(Debug, thiserror::Error)]
pub enum BuildError {
    #[error("{} is a file rather than a directory", .0.display())]
    OutputIsFile(PathBuf),
    #[error("Failed to copy stylesheet {}: {source}", path.display())]
    Stylesheet {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error(transparent)]
    Hiera(#[from] HieraError),
}

/// Counts reported after a successful build.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct BuildSummary {
    /// Directory pages written, including the fixed global pages.
    pub pages_written: usize,
    /// Host and common directories without Hiera data.
    pub pages_skipped: usize,
    /// Hostnames on the managed sites page.
    pub managed_sites: usize,
}

/// Builds a static HTML site from a Cosmos project.
#[derive(Debug)]
pub struct StaticSiteBuilder {
    classifier: Classifier,
    loader: HieraLoader,
    settings: BuildSettings,
}

impl StaticSiteBuilder {
    pub fn new(project_root: impl Into<PathBuf>, settings: BuildSettings) -> Self {
        let project_root = project_root.into();
        Self {
            classifier: Classifier::new(project_root.clone()),
            loader: HieraLoader::new(project_root).with_settings(settings.hiera.clone()),
            settings,
        }
    }

    pub fn settings(&self) -> &BuildSettings {
        &self.settings
    }

    /// Build the site into `output_dir`.
    ///
    /// Writes one page per host and common directory that has Hiera data,
    /// the global, rules and managed sites pages, and the top-level index.
    ///
    /// # Errors
    ///
    /// Returns [`BuildError::OutputIsFile`] without touching the filesystem
    /// if `output_dir` is a regular file. Any load, parse or write failure
    /// aborts the build.
    pub fn build(&self, output_dir: &Path) -> Result<BuildSummary, BuildError> {
        prepare_output(output_dir)?;
        let stylesheet = self.copy_stylesheet(output_dir)?;

        let mut index = SiteIndex::new();
        let mut summary = BuildSummary::default();

        let groups = [
            (Category::Hosts, self.classifier.hosts()),
            (Category::Common, self.classifier.common_dirs()),
        ];
        for (category, names) in groups {
            let written = self.write_directory_pages(&names, output_dir, &stylesheet)?;
            for (name, linked) in names.into_iter().zip(written) {
                if linked {
                    summary.pages_written += 1;
                } else {
                    summary.pages_skipped += 1;
                }
                index.push(category, name, linked);
            }
        }

        let global = self.loader.load(&self.settings.global_dir, false)?;
        let rules = self.loader.load(&self.settings.puppet_dir, true)?;
        let sites = ManagedSites::from_rules(&rules);
        summary.managed_sites = sites.len();

        let global_dir = self.settings.global_dir.as_str();
        self.write_page(output_dir, global_dir, &Value::Mapping(global), &stylesheet)?;
        self.write_page(output_dir, RULES_PAGE, &Value::Mapping(rules), &stylesheet)?;
        self.write_page(output_dir, SITES_PAGE, &sites.to_tree(), &stylesheet)?;
        summary.pages_written += 3;

        index.push(Category::Global, RULES_PAGE, true);
        index.push(Category::Global, global_dir, true);
        index.push(Category::Sites, SITES_PAGE, true);

        fs::write(output_dir.join(INDEX_FILE), render_index(&index, &stylesheet))?;

        tracing::info!(
            output = %output_dir.display(),
            written = summary.pages_written,
            skipped = summary.pages_skipped,
            sites = summary.managed_sites,
            "Site built"
        );
        Ok(summary)
    }

    /// Copy the stylesheet into the output root and return its file name.
    fn copy_stylesheet(&self, output_dir: &Path) -> Result<String, BuildError> {
        let source = &self.settings.stylesheet;
        let stylesheet_error = |e: io::Error| BuildError::Stylesheet {
            path: source.clone(),
            source: e,
        };

        let name = source
            .file_name()
            .and_then(|name| name.to_str())
            .ok_or_else(|| {
                stylesheet_error(io::Error::new(
                    io::ErrorKind::InvalidInput,
                    "stylesheet path has no file name",
                ))
            })?;
        fs::copy(source, output_dir.join(name)).map_err(stylesheet_error)?;
        Ok(name.to_owned())
    }

    /// Write pages for `names`, returning whether each one had data.
    fn write_directory_pages(
        &self,
        names: &[String],
        output_dir: &Path,
        stylesheet: &str,
    ) -> Result<Vec<bool>, BuildError> {
        if self.settings.parallel {
            names
                .par_iter()
                .map(|name| self.write_directory_page(name, output_dir, stylesheet))
                .collect()
        } else {
            names
                .iter()
                .map(|name| self.write_directory_page(name, output_dir, stylesheet))
                .collect()
        }
    }

    fn write_directory_page(
        &self,
        name: &str,
        output_dir: &Path,
        stylesheet: &str,
    ) -> Result<bool, BuildError> {
        let tree = self.loader.load(name, false)?;
        if tree.is_empty() {
            tracing::debug!(directory = name, "No Hiera data, skipping page");
            return Ok(false);
        }
        self.write_page(output_dir, name, &Value::Mapping(tree), stylesheet)?;
        Ok(true)
    }

    fn write_page(
        &self,
        output_dir: &Path,
        name: &str,
        tree: &Value,
        stylesheet: &str,
    ) -> Result<(), BuildError> {
        let dir = output_dir.join(name);
        fs::create_dir_all(&dir)?;
        let content = self.settings.renderer.render(tree);
        let path = dir.join(INDEX_FILE);
        fs::write(&path, render_page(&content, stylesheet))?;
        tracing::debug!(page = %path.display(), "Wrote page");
        Ok(())
    }
}

/// Make sure `output_dir` exists as a directory.
fn prepare_output(output_dir: &Path) -> Result<(), BuildError> {
    if output_dir.is_file() {
        return Err(BuildError::OutputIsFile(output_dir.to_path_buf()));
    }
    fs::create_dir_all(output_dir)?;
    Ok(())
}
