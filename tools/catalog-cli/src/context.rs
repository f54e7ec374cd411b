//! CLI execution context.

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context as _, Result};
use catalog_query::{CatalogResolver, ResolverConfig};
use catalog_store::{HttpProductStore, InMemoryStore, ProductStore, TimeoutConfig};
use tracing::debug;

use crate::config::CliConfig;
use crate::output::Output;

/// Config file names searched from the working directory upwards.
pub const CONFIG_NAMES: [&str; 3] = ["catalog.toml", ".catalog.toml", "catalog.json"];

/// Store handle shared by every command.
pub type SharedStore = Arc<dyn ProductStore>;

/// Execution context for CLI commands.
pub struct Context {
    /// CLI configuration.
    pub config: CliConfig,
    /// Output handler.
    pub output: Output,
    /// Working directory.
    pub cwd: PathBuf,
    /// File the config was read from, if any.
    pub config_path: Option<PathBuf>,
    /// Serve queries from a fixture file instead of the HTTP store.
    pub fixture: Option<PathBuf>,
}

impl Context {
    /// Load context from config file.
    pub fn load(config_path: Option<&str>, output: Output) -> Result<Self> {
        let cwd = std::env::current_dir().context("Failed to get current directory")?;

        let (config, config_path) = if let Some(path) = config_path {
            (CliConfig::load(path)?, Some(PathBuf::from(path)))
        } else {
            match find_config(&cwd) {
                Some((config, path)) => (config, Some(path)),
                None => (CliConfig::default(), None),
            }
        };

        Ok(Self {
            config,
            output,
            cwd,
            config_path,
            fixture: None,
        })
    }

    /// Override the store base URL from the command line.
    pub fn with_base_url(mut self, base_url: Option<String>) -> Self {
        if let Some(url) = base_url {
            self.config.store.base_url = url;
        }
        self
    }

    pub fn with_fixture(mut self, fixture: Option<&str>) -> Self {
        let fixture = fixture.map(|path| self.resolve_path(path));
        self.fixture = fixture;
        self
    }

    /// Build the configured product store.
    pub fn store(&self) -> Result<SharedStore> {
        if let Some(path) = &self.fixture {
            debug!(path = %path.display(), "using fixture store");
            let store = InMemoryStore::load(path)
                .with_context(|| format!("Failed to load fixture: {}", path.display()))?;
            return Ok(Arc::new(store));
        }

        let settings = &self.config.store;
        let timeout = TimeoutConfig::from_millis(settings.connect_timeout_ms, settings.timeout_ms);
        let mut store = HttpProductStore::new(&settings.base_url)
            .with_context(|| format!("Invalid store URL: {}", settings.base_url))?
            .with_timeout(timeout)?;
        if let Some(retries) = settings.max_retries {
            store = store.with_max_retries(retries);
        }
        debug!(base_url = %store.base_url(), "using http store");
        Ok(Arc::new(store))
    }

    /// Build a resolver over the configured store.
    pub fn resolver(&self) -> Result<CatalogResolver<SharedStore>> {
        let config = ResolverConfig {
            detail_concurrency: self.config.query.detail_concurrency.max(1),
        };
        Ok(CatalogResolver::new(self.store()?).with_config(config))
    }

    /// Resolve a path relative to the working directory.
    pub fn resolve_path(&self, path: &str) -> PathBuf {
        if Path::new(path).is_absolute() {
            PathBuf::from(path)
        } else {
            self.cwd.join(path)
        }
    }
}

/// Find a config file in the directory tree.
fn find_config(start: &Path) -> Option<(CliConfig, PathBuf)> {
    let mut current = start.to_path_buf();
    loop {
        for name in &CONFIG_NAMES {
            let config_path = current.join(name);
            if config_path.exists() {
                if let Ok(config) = CliConfig::load(config_path.to_str()?) {
                    return Some((config, config_path));
                }
            }
        }

        if !current.pop() {
            break;
        }
    }

    None
}
